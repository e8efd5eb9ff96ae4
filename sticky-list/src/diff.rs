use alloc::vec::Vec;

use crate::Entry;

/// One structural edit of a [`Patch`].
///
/// Positions are relative to the sequence as it stands after every earlier op of the same
/// patch has been applied.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatchOp<K, T> {
    Insert { position: usize, entry: Entry<K, T> },
    Remove { position: usize },
}

impl<K, T> PatchOp<K, T> {
    pub fn position(&self) -> usize {
        match self {
            Self::Insert { position, .. } | Self::Remove { position } => *position,
        }
    }
}

/// Consecutive ops of a [`Patch`] folded into a single range notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PatchRange {
    Inserted { position: usize, count: usize },
    Removed { position: usize, count: usize },
}

/// Failure to apply a [`Patch`] to a sequence it was not computed against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    #[error("op {op}: insert at {position} is past the end of a sequence of length {len}")]
    InsertOutOfBounds { op: usize, position: usize, len: usize },
    #[error("op {op}: remove at {position} is out of bounds for a sequence of length {len}")]
    RemoveOutOfBounds { op: usize, position: usize, len: usize },
}

/// An ordered list of inserts and removes transforming one sequence into another.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Patch<K, T> {
    ops: Vec<PatchOp<K, T>>,
}

impl<K, T> Default for Patch<K, T> {
    fn default() -> Self {
        Self { ops: Vec::new() }
    }
}

impl<K, T> Patch<K, T> {
    pub fn ops(&self) -> &[PatchOp<K, T>] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<PatchOp<K, T>> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn insert_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, PatchOp::Insert { .. }))
            .count()
    }

    pub fn remove_count(&self) -> usize {
        self.ops.len() - self.insert_count()
    }

    /// Folds runs of ops into range notifications.
    ///
    /// Removes at the same position collapse into one `Removed`, inserts at consecutive
    /// positions into one `Inserted`. Ranges keep the sequential-position contract of the ops.
    pub fn ranges(&self) -> Vec<PatchRange> {
        let mut out: Vec<PatchRange> = Vec::new();
        for op in &self.ops {
            let extended = match (op, out.last_mut()) {
                (PatchOp::Remove { position }, Some(PatchRange::Removed { position: at, count }))
                    if *at == *position =>
                {
                    *count += 1;
                    true
                }
                (
                    PatchOp::Insert { position, .. },
                    Some(PatchRange::Inserted { position: at, count }),
                ) if *at + *count == *position => {
                    *count += 1;
                    true
                }
                _ => false,
            };
            if extended {
                continue;
            }
            out.push(match op {
                PatchOp::Insert { position, .. } => PatchRange::Inserted {
                    position: *position,
                    count: 1,
                },
                PatchOp::Remove { position } => PatchRange::Removed {
                    position: *position,
                    count: 1,
                },
            });
        }
        out
    }

    /// Applies the patch to `target`.
    ///
    /// Every position is checked against the running length before anything is mutated, so on
    /// error `target` is left untouched.
    pub fn apply(&self, target: &mut Vec<Entry<K, T>>) -> Result<(), PatchError>
    where
        K: Clone,
        T: Clone,
    {
        self.check(target.len())?;
        for op in &self.ops {
            match op {
                PatchOp::Insert { position, entry } => target.insert(*position, entry.clone()),
                PatchOp::Remove { position } => {
                    target.remove(*position);
                }
            }
        }
        Ok(())
    }

    fn check(&self, mut len: usize) -> Result<(), PatchError> {
        for (op, edit) in self.ops.iter().enumerate() {
            match *edit {
                PatchOp::Insert { position, .. } => {
                    if position > len {
                        return Err(PatchError::InsertOutOfBounds { op, position, len });
                    }
                    len += 1;
                }
                PatchOp::Remove { position } => {
                    if position >= len {
                        return Err(PatchError::RemoveOutOfBounds { op, position, len });
                    }
                    len -= 1;
                }
            }
        }
        Ok(())
    }
}

/// Computes the patch turning `old` into `new`.
///
/// Entries are compared by full value equality; there is no identity separate from content,
/// so an item whose payload changed shows up as a remove plus an insert. The alignment is a
/// longest common subsequence over the slice left after trimming the common prefix and
/// suffix, which keeps the quadratic table small for the usual append-a-page update.
///
/// When that window is still larger than [`MAX_LCS_CELLS`] table cells, no alignment is
/// attempted: the patch removes the whole window and inserts its replacement. The result is
/// still exact, just not minimal, and memory stays bounded.
pub fn diff<K, T>(old: &[Entry<K, T>], new: &[Entry<K, T>]) -> Patch<K, T>
where
    K: PartialEq + Clone,
    T: PartialEq + Clone,
{
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let old_rest = &old[prefix..];
    let new_rest = &new[prefix..];
    let suffix = old_rest
        .iter()
        .rev()
        .zip(new_rest.iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old_mid = &old_rest[..old_rest.len() - suffix];
    let new_mid = &new_rest[..new_rest.len() - suffix];

    let mut ops = Vec::new();
    let mut position = prefix;
    let (mut i, mut j) = (0usize, 0usize);

    if let Some(table) = LcsTable::within_bound(old_mid, new_mid) {
        while i < old_mid.len() && j < new_mid.len() {
            if old_mid[i] == new_mid[j] {
                i += 1;
                j += 1;
                position += 1;
            } else if table.get(i + 1, j) >= table.get(i, j + 1) {
                ops.push(PatchOp::Remove { position });
                i += 1;
            } else {
                ops.push(PatchOp::Insert {
                    position,
                    entry: new_mid[j].clone(),
                });
                position += 1;
                j += 1;
            }
        }
    }

    for _ in i..old_mid.len() {
        ops.push(PatchOp::Remove { position });
    }
    for entry in &new_mid[j..] {
        ops.push(PatchOp::Insert {
            position,
            entry: entry.clone(),
        });
        position += 1;
    }

    ltrace!(
        old = old.len(),
        new = new.len(),
        prefix,
        suffix,
        ops = ops.len(),
        "diff"
    );
    Patch { ops }
}

/// Largest LCS table [`diff`] builds (16 MiB of `u32` cells, about 2047 x 2047 entries).
pub const MAX_LCS_CELLS: usize = 1 << 22;

/// Suffix LCS lengths: `get(i, j)` is the LCS length of `old[i..]` and `new[j..]`.
struct LcsTable {
    cols: usize,
    cells: Vec<u32>,
}

impl LcsTable {
    /// Builds the table unless either side is empty or it would exceed [`MAX_LCS_CELLS`].
    fn within_bound<E: PartialEq>(old: &[E], new: &[E]) -> Option<Self> {
        if old.is_empty() || new.is_empty() {
            return None;
        }
        let cells = (old.len() + 1).checked_mul(new.len() + 1)?;
        if cells > MAX_LCS_CELLS {
            ldebug!(
                old = old.len(),
                new = new.len(),
                cells,
                "diff: window too large to align, replacing it wholesale"
            );
            return None;
        }
        Some(Self::build(old, new))
    }

    fn build<E: PartialEq>(old: &[E], new: &[E]) -> Self {
        let cols = new.len() + 1;
        let mut cells = alloc::vec![0u32; (old.len() + 1) * cols];
        for i in (0..old.len()).rev() {
            for j in (0..new.len()).rev() {
                cells[i * cols + j] = if old[i] == new[j] {
                    cells[(i + 1) * cols + j + 1] + 1
                } else {
                    cells[(i + 1) * cols + j].max(cells[i * cols + j + 1])
                };
            }
        }
        Self { cols, cells }
    }

    fn get(&self, i: usize, j: usize) -> u32 {
        self.cells[i * self.cols + j]
    }
}
