//! Hash map backing the tick → arena slot lookup of a `TickIndex`.
//!
//! Pick the hasher with a cargo feature; std `HashMap` when none (or
//! several) are enabled.

#[cfg(all(
    feature = "rustc-hash",
    not(any(feature = "ahash", feature = "std-hash"))
))]
pub type FastMap<K, V> = rustc_hash::FxHashMap<K, V>;

#[cfg(all(
    feature = "ahash",
    not(any(feature = "rustc-hash", feature = "std-hash"))
))]
pub type FastMap<K, V> = ahash::AHashMap<K, V>;

#[cfg(not(any(
    all(
        feature = "rustc-hash",
        not(any(feature = "ahash", feature = "std-hash"))
    ),
    all(
        feature = "ahash",
        not(any(feature = "rustc-hash", feature = "std-hash"))
    ),
)))]
pub type FastMap<K, V> = std::collections::HashMap<K, V>;

/// Tick index → position in the sorted arena.
pub type TickSlots = FastMap<i32, usize>;

/// Builds the slot map for ticks already sorted ascending.
pub(crate) fn slots_for(ticks: impl ExactSizeIterator<Item = i32>) -> TickSlots {
    let mut slots = TickSlots::default();
    slots.reserve(ticks.len());
    for (slot, tick) in ticks.enumerate() {
        slots.insert(tick, slot);
    }
    slots
}
