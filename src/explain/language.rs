use crate::token::Token;
use crate::TokenProgram;
use itertools::Itertools;
use std::fmt;
use std::ops::Range;

/// A single token edit.
///
/// The index of an edit refers to the sequence the edit is applied to, which (inside an edit
/// script) is the original sequence with all earlier edits of the script already applied.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Edit {
    /// Inserts `token` so that it ends up at `index`.
    Insert {
        /// Position of the new token.
        index: usize,
        /// Token to insert.
        token: Token,
    },
    /// Removes the token at `index`.
    Delete {
        /// Position of the removed token.
        index: usize,
        /// Token that was removed when the edit was recorded.
        token: Token,
    },
    /// Overwrites the token at `index` with `to`.
    Replace {
        /// Position of the replaced token.
        index: usize,
        /// Token that was replaced when the edit was recorded.
        from: Token,
        /// Replacement token.
        to: Token,
    },
}

impl Edit {
    /// The anchor index this edit was recorded at.
    pub fn index(&self) -> usize {
        match self {
            Edit::Insert { index, .. }
            | Edit::Delete { index, .. }
            | Edit::Replace { index, .. } => *index,
        }
    }

    /// Whether this edit inserts a token.
    pub fn is_insert(&self) -> bool {
        matches!(self, Edit::Insert { .. })
    }

    /// Applies the edit at `index` instead of its own anchor.
    ///
    /// Returns `None` if `index` is out of range for this kind of edit.
    pub fn apply_at(&self, tokens: &[Token], index: usize) -> Option<Vec<Token>> {
        if !self.positions(tokens.len()).contains(&index) {
            return None;
        }
        let mut result = tokens.to_vec();
        match self {
            Edit::Insert { token, .. } => result.insert(index, token.clone()),
            Edit::Delete { .. } => {
                result.remove(index);
            }
            Edit::Replace { to, .. } => result[index] = to.clone(),
        }
        Some(result)
    }

    // inserting after the last token is allowed, everything else needs an existing token
    fn positions(&self, len: usize) -> Range<usize> {
        if self.is_insert() {
            0..len + 1
        } else {
            0..len
        }
    }
}

impl TokenProgram for Edit {
    fn apply(&self, tokens: &[Token]) -> Option<Vec<Token>> {
        self.apply_at(tokens, self.index())
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::Insert { index, token } => write!(f, "I([{}] @ {})", token, index),
            Edit::Delete { index, token } => write!(f, "D([{}] @ {})", token, index),
            Edit::Replace { index, from, to } => write!(f, "R([{}] -> [{}] @ {})", from, to, index),
        }
    }
}

/// A predicate locating where an edit should be re-applied.
///
/// Conditions are always checked against the current state of the sequence being rewritten.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub enum Condition {
    /// Holds only at the given index.
    OnIndex(usize),
    /// Holds where the token before the index is the given token.
    PreviousToken(Token),
    /// Holds where the token after the index is the given token.
    NextToken(Token),
    /// Holds where the token at the index is the given token.
    ThisToken(Token),
}

impl Condition {
    /// Checks whether the condition holds at `index` in `tokens`.
    pub fn check(&self, tokens: &[Token], index: usize) -> bool {
        match self {
            Condition::OnIndex(i) => *i == index,
            Condition::PreviousToken(t) => index > 0 && tokens.get(index - 1) == Some(t),
            Condition::NextToken(t) => tokens.get(index + 1) == Some(t),
            Condition::ThisToken(t) => tokens.get(index) == Some(t),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::OnIndex(i) => write!(f, "@({})", i),
            Condition::PreviousToken(t) => write!(f, "P({})", t),
            Condition::NextToken(t) => write!(f, "N({})", t),
            Condition::ThisToken(t) => write!(f, "T({})", t),
        }
    }
}

/// An edit guarded by a condition.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct Explanation {
    /// Where to apply the edit.
    pub condition: Condition,
    /// What to apply.
    pub edit: Edit,
}

impl Explanation {
    /// Creates an explanation applying `edit` wherever `condition` first holds.
    pub fn new(condition: Condition, edit: Edit) -> Self {
        Self { condition, edit }
    }
}

impl TokenProgram for Explanation {
    /// Applies the edit at the first index where the condition holds.
    fn apply(&self, tokens: &[Token]) -> Option<Vec<Token>> {
        let index = self
            .edit
            .positions(tokens.len())
            .find(|&i| self.condition.check(tokens, i))?;
        self.edit.apply_at(tokens, index)
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => \"{}\"", self.condition, self.edit)
    }
}

/// A chain of explanations, applied one after another.
#[derive(Debug, PartialEq, Eq, Clone, Hash, Default)]
pub struct WholeExplanation(pub Vec<Explanation>);

impl TokenProgram for WholeExplanation {
    /// Threads `tokens` through every explanation in order; fails as soon as one of them fails.
    fn apply(&self, tokens: &[Token]) -> Option<Vec<Token>> {
        self.0
            .iter()
            .try_fold(tokens.to_vec(), |state, e| e.apply(&state))
    }
}

impl fmt::Display for WholeExplanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::tokenize;
    use pretty_assertions::assert_eq;
    use Condition::*;

    fn insert(index: usize, token: &str) -> Edit {
        Edit::Insert {
            index,
            token: token.to_string(),
        }
    }

    fn t(s: &str) -> Token {
        s.to_string()
    }

    #[test]
    fn edits_splice_at_anchor() {
        let tokens = tokenize("a b c");
        assert_eq!(insert(1, "x").apply(&tokens), Some(tokenize("a x b c")));
        assert_eq!(insert(3, "x").apply(&tokens), Some(tokenize("a b c x")));
        assert_eq!(insert(4, "x").apply(&tokens), None);
        let delete = Edit::Delete {
            index: 2,
            token: t("c"),
        };
        assert_eq!(delete.apply(&tokens), Some(tokenize("a b")));
        assert_eq!(delete.apply_at(&tokens, 3), None);
        let replace = Edit::Replace {
            index: 0,
            from: t("a"),
            to: t("z"),
        };
        assert_eq!(replace.apply(&tokens), Some(tokenize("z b c")));
    }

    #[test]
    fn conditions() {
        let tokens = tokenize("a b c");
        assert!(OnIndex(1).check(&tokens, 1));
        assert!(!OnIndex(1).check(&tokens, 2));
        assert!(ThisToken(t("b")).check(&tokens, 1));
        assert!(!ThisToken(t("b")).check(&tokens, 3));
        assert!(PreviousToken(t("a")).check(&tokens, 1));
        assert!(!PreviousToken(t("a")).check(&tokens, 0));
        assert!(PreviousToken(t("c")).check(&tokens, 3));
        assert!(NextToken(t("c")).check(&tokens, 1));
        assert!(!NextToken(t("c")).check(&tokens, 2));
    }

    #[test]
    fn explanation_fires_on_first_match() {
        let e = Explanation::new(PreviousToken(t("is")), insert(0, "this"));
        assert_eq!(
            e.apply(&tokenize("isValid || isReady")),
            Some(tokenize("isThisValid || isReady"))
        );
        assert_eq!(e.apply(&tokenize("valid")), None);
    }

    #[test]
    fn explanation_can_append() {
        let e = Explanation::new(PreviousToken(t(")")), insert(0, "?"));
        assert_eq!(e.apply(&tokenize("foo()")), Some(tokenize("foo()?")));
    }

    #[test]
    fn whole_explanation_short_circuits() {
        let whole = WholeExplanation(vec![
            Explanation::new(ThisToken(t("foo")), Edit::Delete {
                index: 0,
                token: t("foo"),
            }),
            Explanation::new(OnIndex(0), Edit::Replace {
                index: 0,
                from: t("bar"),
                to: t("baz"),
            }),
        ]);
        assert_eq!(whole.apply(&tokenize("foo bar")), Some(tokenize("baz")));
        assert_eq!(whole.apply(&tokenize("bar bar")), None);
        assert_eq!(
            WholeExplanation::default().apply(&tokenize("x y")),
            Some(tokenize("x y"))
        );
    }

    #[test]
    fn display() {
        let whole = WholeExplanation(vec![
            Explanation::new(OnIndex(1), insert(1, "this")),
            Explanation::new(NextToken(t("b")), Edit::Replace {
                index: 0,
                from: t("a"),
                to: t("c"),
            }),
        ]);
        assert_eq!(
            whole.to_string(),
            "@(1) => \"I([this] @ 1)\"\nN(b) => \"R([a] -> [c] @ 0)\""
        );
    }
}
