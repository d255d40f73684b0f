//! Levenshtein distance and minimal edit scripts over token sequences.

use crate::explain::Edit;
use crate::token::Token;
use crate::TokenProgram;

type Table = Vec<Vec<usize>>;

// dp[i][j] is the distance between a[..i] and b[..j]
fn table<T: PartialEq>(a: &[T], b: &[T]) -> Table {
    let mut dp = vec![vec![0; b.len() + 1]; a.len() + 1];
    for (i, row) in dp.iter_mut().enumerate() {
        row[0] = i;
    }
    for (j, cell) in dp[0].iter_mut().enumerate() {
        *cell = j;
    }
    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let delete = dp[i - 1][j] + 1;
            let insert = dp[i][j - 1] + 1;
            let diagonal = dp[i - 1][j - 1] + usize::from(a[i - 1] != b[j - 1]);
            dp[i][j] = delete.min(insert).min(diagonal);
        }
    }
    dp
}

/// Computes the Levenshtein distance between two sequences.
///
/// Insertions and deletions cost 1, substituting a different element costs 1 and keeping an
/// equal element costs nothing.
pub fn distance<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    table(a, b)[a.len()][b.len()]
}

/// Computes a minimal edit script turning `a` into `b`.
///
/// The script has exactly [`distance`]`(a, b)` operations, one per differing token. Each edit's
/// index refers to the sequence as it stands after all earlier edits in the script have been
/// applied, so applying the edits in order to `a` yields `b`.
///
/// When several minimal scripts exist, the backtrace prefers a deletion, then an insertion, then
/// a replacement at every step.
pub fn edit_script(a: &[Token], b: &[Token]) -> Vec<Edit> {
    let dp = table(a, b);
    let mut edits = Vec::with_capacity(dp[a.len()][b.len()]);
    let (mut i, mut j) = (a.len(), b.len());
    while i > 0 || j > 0 {
        let here = dp[i][j];
        // in the partially edited sequence, b[..j] is already in place in front of the cursor
        if i > 0 && here == dp[i - 1][j] + 1 {
            edits.push(Edit::Delete {
                index: j,
                token: a[i - 1].clone(),
            });
            i -= 1;
        } else if j > 0 && here == dp[i][j - 1] + 1 {
            edits.push(Edit::Insert {
                index: j - 1,
                token: b[j - 1].clone(),
            });
            j -= 1;
        } else if here == dp[i - 1][j - 1] + 1 {
            edits.push(Edit::Replace {
                index: j - 1,
                from: a[i - 1].clone(),
                to: b[j - 1].clone(),
            });
            i -= 1;
            j -= 1;
        } else {
            i -= 1;
            j -= 1;
        }
    }
    edits.reverse();
    edits
}

/// Applies an edit script in order, returning `None` if some edit is out of range.
pub fn apply_script(a: &[Token], script: &[Edit]) -> Option<Vec<Token>> {
    script
        .iter()
        .try_fold(a.to_vec(), |state, edit| edit.apply(&state))
}
