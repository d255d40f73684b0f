//! Mining programming-by-example tasks from version-control history.
//!
//! Source code history is full of small, repetitive edits: a variable gets renamed in a dozen
//! places, an argument is added to every call of a function, a condition is negated. Each such
//! edit is a pair of lines (before, after), and a run of edits sharing the same transformation is
//! a ready-made programming-by-example task: given a few input-output pairs, learn the rule.
//!
//! This crate turns diff lines into such tasks. Lines are split into [tokens](token), pairs of
//! lines become [`Example`]s, and examples are clustered into [`Problem`]s. An example only joins
//! a problem if it is close to the problem's first example and if the first example's
//! transformation can be [explained](explain) by a simple rule that reproduces its own output.
//!
//! ```
//! use pbemine::{Config, Example, Problem};
//!
//! let config = Config::default();
//! let mut problem = Problem::new(config);
//! problem.add_example(Example::new("isVariableValid=true", "isThisVariableValid=true", config));
//! problem.add_example(Example::new("isSomethingValid=true", "isThisSomethingValid=true", config));
//!
//! assert_eq!(problem.examples().len(), 2);
//! // the first example's rule ("insert `this` at index 1") also explains the second one
//! assert_eq!(problem.synthesizable_from_first(), &[true, true]);
//! assert!(!problem.is_trivial());
//! ```
//!
//! The [extract] module drives this over the commits of a git repository.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod example;
pub mod explain;
pub mod extract;
pub mod levenshtein;
pub mod problem;
pub mod sample;
pub mod token;

pub use config::Config;
pub use error::{Error, Result};
pub use example::Example;
pub use problem::{Problem, ProblemRecord};
pub use sample::Sample;

use token::Token;

/// A rewrite of a token sequence.
///
/// This trait is sealed and not meant to be implemented outside this crate.
pub trait TokenProgram: private::Sealed {
    /// Runs the rewrite on the given tokens.
    ///
    /// Returns `None` if the rewrite does not apply, for example when an edit's index is out of
    /// range or no position satisfies an explanation's condition. Not applying is an ordinary
    /// outcome while searching for explanations, not an error.
    fn apply(&self, tokens: &[Token]) -> Option<Vec<Token>>;
}

mod private {
    pub trait Sealed {}

    impl Sealed for crate::explain::Edit {}
    impl Sealed for crate::explain::Explanation {}
    impl Sealed for crate::explain::WholeExplanation {}
}
