//! Rule-based explanations of token edits.
//!
//! An [`Edit`] records one change between two token sequences. An [`Explanation`] generalizes an
//! edit by guarding it with a [`Condition`]: instead of "insert `this` at index 1" it can say
//! "insert `this` after the first `is`". A [`WholeExplanation`] chains one explanation per edit of
//! an edit script, and can be replayed on a different input to see whether the same
//! transformation carries over.
//!
//! [`synthesize`] enumerates the whole explanations consistent with an edit script. The search
//! space is tiny per edit (at most four conditions) but multiplies across edits, so long scripts
//! are rejected outright.

mod language;
mod search;

pub use language::{Condition, Edit, Explanation, WholeExplanation};
pub use search::{synthesize, Explanations};

use crate::levenshtein;
use crate::token::Token;

/// Enumerates the whole explanations for the minimal edit script from `input` to `output`.
pub fn explain(input: &[Token], output: &[Token], max_edits: usize) -> Explanations {
    synthesize(input, &levenshtein::edit_script(input, output), max_edits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;
    use crate::TokenProgram;

    #[test]
    fn explanation_transfers_to_similar_input() {
        let found = explain(
            &tokenize("isVariableValid=true"),
            &tokenize("isThisVariableValid=true"),
            10,
        );
        let input = tokenize("isSomethingValid=true");
        let output = tokenize("isThisSomethingValid=true");
        let mut matching = found.filter(|w| w.apply(&input).as_ref() == Some(&output));
        assert_eq!(
            matching.next().map(|w| w.to_string()),
            Some("@(1) => \"I([this] @ 1)\"".to_string())
        );
    }

    #[test]
    fn no_explanation_for_unrelated_edit() {
        let found = explain(&tokenize("a = b"), &tokenize("a = c"), 10);
        let input = tokenize("x + y");
        let output = tokenize("x - y");
        assert!(found
            .into_iter()
            .all(|w| w.apply(&input).as_ref() != Some(&output)));
    }
}
