#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

/// Maps a group key to the slot of its bucket while partitioning records.
#[cfg(feature = "std")]
pub(crate) type KeySlotMap<K> = HashMap<K, usize>;
#[cfg(not(feature = "std"))]
pub(crate) type KeySlotMap<K> = BTreeMap<K, usize>;

/// Bound required of group keys so records can be partitioned into buckets.
///
/// With `std` this is `Hash + Eq`; without it, `Ord`.
#[cfg(feature = "std")]
pub trait GroupKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> GroupKey for K {}

#[cfg(not(feature = "std"))]
pub trait GroupKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> GroupKey for K {}
