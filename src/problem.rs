//! Clusters of examples that share one transformation.

use crate::config::Config;
use crate::example::Example;
use crate::sample::Sample;
use crate::token::Token;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

/// A run of examples gated against the run's first example.
///
/// The first accepted example is the anchor of the problem. Every example accepted after it is
/// recorded together with whether the anchor's transformation reproduces it and how far it is from
/// the anchor.
#[derive(Debug, Clone)]
pub struct Problem {
    config: Config,
    examples: Vec<Example>,
    synthesizable_from_first: Vec<bool>,
    distance_from_first: Vec<f64>,
}

impl Problem {
    /// Creates an empty problem.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            examples: Vec::new(),
            synthesizable_from_first: Vec::new(),
            distance_from_first: Vec::new(),
        }
    }

    /// The accepted examples, anchor first.
    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    /// The anchor, if any example has been accepted.
    pub fn first(&self) -> Option<&Example> {
        self.examples.first()
    }

    /// Per example, whether the anchor's transformation reproduces it.
    pub fn synthesizable_from_first(&self) -> &[bool] {
        &self.synthesizable_from_first
    }

    /// Per example, its distance from the anchor.
    pub fn distance_from_first(&self) -> &[f64] {
        &self.distance_from_first
    }

    /// Whether the problem is too small to be worth emitting.
    pub fn is_trivial(&self) -> bool {
        self.examples.len() <= 1
    }

    /// Whether `example` is close enough to the anchor to continue this problem.
    ///
    /// An empty problem accepts anything.
    pub fn is_similar(&self, example: &Example) -> bool {
        match self.first() {
            Some(first) => first.distance(example) < self.config.max_program_distance,
            None => true,
        }
    }

    /// Adds `example` to the problem, returning whether it was accepted.
    ///
    /// Examples whose input and output only differ in surrounding whitespace are dropped, and so
    /// are examples that cannot even explain themselves (edit script beyond the search limit).
    pub fn add_example(&mut self, example: Example) -> bool {
        if example.input().text().trim() == example.output().text().trim() {
            debug!("dropping unchanged line {}", example);
            return false;
        }
        if !example.is_self_synthesizable() {
            debug!(
                "dropping {}: no explanation for {} edits",
                example,
                example.edit_script().len()
            );
            return false;
        }
        let (synthesizable, distance) = match self.first() {
            Some(first) => (example.is_synthesizable(first), first.distance(&example)),
            None => (true, 0.0),
        };
        self.examples.push(example);
        self.synthesizable_from_first.push(synthesizable);
        self.distance_from_first.push(distance);
        true
    }

    /// Serializable form of the problem.
    pub fn to_record(&self) -> ProblemRecord {
        ProblemRecord {
            examples: self.examples.iter().map(ExampleRecord::from).collect(),
            synthesizable_from_first: self.synthesizable_from_first.clone(),
            distance_from_first: self
                .distance_from_first
                .iter()
                .map(|&d| d.is_finite().then_some(d))
                .collect(),
        }
    }
}

/// The serialized form of a [`Problem`], with examples in acceptance order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    /// The examples, anchor first.
    pub examples: Vec<ExampleRecord>,
    /// Per example, whether the anchor's transformation reproduces it.
    pub synthesizable_from_first: Vec<bool>,
    /// Per example, its distance from the anchor, `None` when the distance is infinite.
    pub distance_from_first: Vec<Option<f64>>,
}

/// The serialized form of an [`Example`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleRecord {
    /// The input line.
    pub input: SampleRecord,
    /// The output line.
    pub output: SampleRecord,
    /// The edit script, e.g. `I([this] @ 1)`.
    pub edits: String,
}

/// The serialized form of a [`Sample`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// The trimmed text.
    pub text: String,
    /// The tokens of the text.
    pub tokens: Vec<Token>,
}

impl From<&Sample> for SampleRecord {
    fn from(sample: &Sample) -> Self {
        Self {
            text: sample.text().trim().to_string(),
            tokens: sample.tokens().to_vec(),
        }
    }
}

impl From<&Example> for ExampleRecord {
    fn from(example: &Example) -> Self {
        Self {
            input: example.input().into(),
            output: example.output().into(),
            edits: example.edit_script().iter().join(", "),
        }
    }
}
