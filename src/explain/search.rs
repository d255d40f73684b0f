use super::language::{Condition, Edit, Explanation, WholeExplanation};
use crate::token::Token;
use crate::TokenProgram;
use log::trace;
use std::iter::FusedIterator;

/// Enumerates the whole explanations that could have produced `script` from `input`.
///
/// Every edit of the script gets a small set of candidate explanations: the edit at its absolute
/// index, and the edit wherever its current, previous or next token matches (whichever of these
/// exist). The candidates of each edit are built against the sequence as it stands when that
/// edit applies. The result is the cartesian product of the candidate sets, in the order the
/// edits appear in the script, with the last edit varying fastest. The first candidate is always
/// the script itself (every edit on its absolute index).
///
/// Scripts longer than `max_edits` produce no candidates at all; the product grows as `4^k` for a
/// script of `k` edits.
pub fn synthesize(input: &[Token], script: &[Edit], max_edits: usize) -> Explanations {
    if script.len() > max_edits {
        trace!(
            "not synthesizing a script of {} edits (limit {})",
            script.len(),
            max_edits
        );
        return Explanations::empty();
    }
    let mut state = input.to_vec();
    let mut candidates = Vec::with_capacity(script.len());
    for edit in script {
        candidates.push(candidates_for(&state, edit));
        state = match edit.apply(&state) {
            Some(next) => next,
            // the script does not belong to this input
            None => return Explanations::empty(),
        };
    }
    Explanations::new(candidates)
}

fn candidates_for(tokens: &[Token], edit: &Edit) -> Vec<Explanation> {
    let index = edit.index();
    let mut conditions = vec![Condition::OnIndex(index)];
    // an insertion has no current token
    if !edit.is_insert() {
        if let Some(t) = tokens.get(index) {
            conditions.push(Condition::ThisToken(t.clone()));
        }
    }
    if index > 0 {
        if let Some(t) = tokens.get(index - 1) {
            conditions.push(Condition::PreviousToken(t.clone()));
        }
    }
    if let Some(t) = tokens.get(index + 1) {
        conditions.push(Condition::NextToken(t.clone()));
    }
    conditions
        .into_iter()
        .map(|c| Explanation::new(c, edit.clone()))
        .collect()
}

/// A lazy iterator over candidate whole explanations, produced by [`synthesize`].
///
/// Candidates are built on demand, so a consumer that stops at the first useful candidate never
/// pays for the rest of the product.
#[derive(Debug, Clone)]
pub struct Explanations {
    candidates: Vec<Vec<Explanation>>,
    // one position per edit, or None once exhausted
    cursor: Option<Vec<usize>>,
}

impl Explanations {
    fn new(candidates: Vec<Vec<Explanation>>) -> Self {
        let cursor = if candidates.iter().any(Vec::is_empty) {
            None
        } else {
            Some(vec![0; candidates.len()])
        };
        Self { candidates, cursor }
    }

    fn empty() -> Self {
        Self {
            candidates: Vec::new(),
            cursor: None,
        }
    }

    fn remaining(&self) -> usize {
        let cursor = match &self.cursor {
            Some(cursor) => cursor,
            None => return 0,
        };
        // mixed-radix value of the cursor, subtracted from the total
        let mut done = 0usize;
        let mut total = 1usize;
        for (pos, options) in cursor.iter().zip(&self.candidates) {
            done = done.saturating_mul(options.len()).saturating_add(*pos);
            total = total.saturating_mul(options.len());
        }
        total - done
    }
}

impl Iterator for Explanations {
    type Item = WholeExplanation;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        let item = WholeExplanation(
            cursor
                .iter()
                .zip(&self.candidates)
                .map(|(&pos, options)| options[pos].clone())
                .collect(),
        );
        // advance like an odometer, last edit fastest
        let mut carry = true;
        for (pos, options) in cursor.iter_mut().zip(&self.candidates).rev() {
            *pos += 1;
            if *pos < options.len() {
                carry = false;
                break;
            }
            *pos = 0;
        }
        if carry {
            self.cursor = None;
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Explanations {}

impl FusedIterator for Explanations {}
