//! Candidate programming-by-example tasks: one input line and one output line.

use crate::config::Config;
use crate::explain::{self, Edit, Explanations, WholeExplanation};
use crate::levenshtein;
use crate::sample::Sample;
use crate::TokenProgram;
use log::trace;
use std::cell::OnceCell;
use std::fmt;

/// An input-output pair of samples, together with the edit script between them.
///
/// Besides its data, an example caches the first whole explanation that was found to carry its
/// transformation over to another example. The cache is not part of the example's identity and
/// is ignored by equality.
#[derive(Clone)]
pub struct Example {
    input: Sample,
    output: Sample,
    size: usize,
    script: Vec<Edit>,
    config: Config,
    last_explanation: OnceCell<WholeExplanation>,
}

impl Example {
    /// Builds an example from the text of an input and an output line.
    pub fn new(input: impl Into<String>, output: impl Into<String>, config: Config) -> Self {
        Self::from_samples(Sample::new(input), Sample::new(output), config)
    }

    /// Builds an example from already tokenized samples.
    pub fn from_samples(input: Sample, output: Sample, config: Config) -> Self {
        let size = input.len().min(output.len());
        let script = levenshtein::edit_script(input.tokens(), output.tokens());
        Self {
            input,
            output,
            size,
            script,
            config,
            last_explanation: OnceCell::new(),
        }
    }

    /// The input side.
    pub fn input(&self) -> &Sample {
        &self.input
    }

    /// The output side.
    pub fn output(&self) -> &Sample {
        &self.output
    }

    /// The characteristic size: the token count of the shorter side.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The minimal edit script from input to output.
    pub fn edit_script(&self) -> &[Edit] {
        &self.script
    }

    /// The first whole explanation found to transfer this example to another one, if any.
    pub fn last_explanation(&self) -> Option<&WholeExplanation> {
        self.last_explanation.get()
    }

    /// Candidate whole explanations of this example's own transformation.
    pub fn explanations(&self) -> Explanations {
        explain::synthesize(self.input.tokens(), &self.script, self.config.max_edit_size)
    }

    /// Normalized distance between input and output, divided once more by [`size`](Self::size).
    pub fn inner_distance(&self) -> f64 {
        normalized(self.input.distance(&self.output), self.size)
    }

    /// Whether some explanation of this example reproduces its own output.
    ///
    /// This holds for every example whose edit script is within the configured search limit, and
    /// fails for every other one.
    pub fn is_self_synthesizable(&self) -> bool {
        self.explanations().any(|w| self.reproduces(&w))
    }

    /// Whether some explanation of `other`'s transformation reproduces this example.
    ///
    /// Candidates are tried in enumeration order and the first one that turns this example's input
    /// into its output wins. It is remembered on `other`, and tried first the next time `other` is
    /// asked to explain an example.
    pub fn is_synthesizable(&self, other: &Example) -> bool {
        if let Some(cached) = other.last_explanation.get() {
            if self.reproduces(cached) {
                return true;
            }
        }
        match other.explanations().find(|w| self.reproduces(w)) {
            Some(found) => {
                trace!("explained {} by\n{}", self, found);
                // keeps the first success
                let _ = other.last_explanation.set(found);
                true
            }
            None => false,
        }
    }

    /// Sum of the input-side and output-side [`Sample::distance`]s, divided by the sizes of both
    /// examples.
    ///
    /// Each side is already normalized by its shorter sample, so the result is normalized twice.
    pub fn distance(&self, other: &Example) -> f64 {
        let d = self.input.distance(&other.input) + self.output.distance(&other.output);
        normalized(d, self.size + other.size)
    }

    /// Whether `other` is within the configured example distance.
    pub fn is_similar(&self, other: &Example) -> bool {
        self.distance(other) < self.config.max_example_distance
    }

    fn reproduces(&self, explanation: &WholeExplanation) -> bool {
        explanation.apply(self.input.tokens()).as_deref() == Some(self.output.tokens())
    }
}

fn normalized(distance: f64, size: usize) -> f64 {
    if size == 0 {
        if distance == 0.0 {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        distance / size as f64
    }
}

impl PartialEq for Example {
    fn eq(&self, other: &Self) -> bool {
        self.input == other.input && self.output == other.output
    }
}

impl Eq for Example {}

impl fmt::Debug for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Example")
            .field("input", &self.input.text())
            .field("output", &self.output.text())
            .field("script", &self.script)
            .finish()
    }
}

impl fmt::Display for Example {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\"{}\" -> \"{}\"",
            self.input.text().trim(),
            self.output.text().trim()
        )
    }
}
