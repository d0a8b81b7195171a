//! Edit-script engine
//!
//! Classic unit-cost edit distance between the current owner list and the
//! aligned desired list, backtracked into an ordered list of swap, add and
//! remove operations.

use std::fmt;

use quorum_core::{Address, QuorumError, QuorumResult};

/// One owner-membership change
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditOperation {
    Swap { old: Address, new: Address },
    Add { owner: Address },
    Remove { owner: Address },
}

impl EditOperation {
    /// True for operations that change the owner count
    pub fn changes_membership_count(&self) -> bool {
        !matches!(self, EditOperation::Swap { .. })
    }
}

impl fmt::Debug for EditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOperation::Swap { old, new } => write!(f, "swap({old} -> {new})"),
            EditOperation::Add { owner } => write!(f, "add({owner})"),
            EditOperation::Remove { owner } => write!(f, "remove({owner})"),
        }
    }
}

/// Dense (m+1) x (n+1) cost table
struct CostTable {
    cols: usize,
    cells: Vec<usize>,
}

impl CostTable {
    fn build(current: &[Address], target: &[Address]) -> Self {
        let rows = current.len() + 1;
        let cols = target.len() + 1;
        let mut table = CostTable {
            cols,
            cells: vec![0; rows * cols],
        };

        for i in 0..rows {
            table.set(i, 0, i);
        }
        for j in 0..cols {
            table.set(0, j, j);
        }

        for i in 1..rows {
            for j in 1..cols {
                let substitution = if current[i - 1] == target[j - 1] { 0 } else { 1 };
                let cost = (table.get(i - 1, j - 1) + substitution)
                    .min(table.get(i, j - 1) + 1)
                    .min(table.get(i - 1, j) + 1);
                table.set(i, j, cost);
            }
        }

        table
    }

    #[inline]
    fn get(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.cols + j]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, value: usize) {
        self.cells[i * self.cols + j] = value;
    }
}

/// Unit-cost edit distance between two owner sequences
pub fn edit_distance(current: &[Address], target: &[Address]) -> usize {
    CostTable::build(current, target).get(current.len(), target.len())
}

/// Compute the minimal ordered edit script turning `current` into `target`.
///
/// Ties during backtracking resolve as match, then swap, then add, then
/// remove. Operations come out in ascending list position, which is also
/// their execution order.
pub fn edit_script(current: &[Address], target: &[Address]) -> QuorumResult<Vec<EditOperation>> {
    let table = CostTable::build(current, target);
    let mut ops = Vec::with_capacity(table.get(current.len(), target.len()));

    let (mut i, mut j) = (current.len(), target.len());
    while i > 0 || j > 0 {
        let here = table.get(i, j);

        if i > 0 && j > 0 && current[i - 1] == target[j - 1] && here == table.get(i - 1, j - 1) {
            i -= 1;
            j -= 1;
        } else if i > 0 && j > 0 && here == table.get(i - 1, j - 1) + 1 {
            ops.push(EditOperation::Swap {
                old: current[i - 1],
                new: target[j - 1],
            });
            i -= 1;
            j -= 1;
        } else if j > 0 && here == table.get(i, j - 1) + 1 {
            ops.push(EditOperation::Add {
                owner: target[j - 1],
            });
            j -= 1;
        } else if i > 0 && here == table.get(i - 1, j) + 1 {
            ops.push(EditOperation::Remove {
                owner: current[i - 1],
            });
            i -= 1;
        } else {
            return Err(QuorumError::BacktrackDeadEnd { row: i, col: j });
        }
    }

    ops.reverse();
    tracing::trace!(ops = ops.len(), "edit script computed");
    Ok(ops)
}
