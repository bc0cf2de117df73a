//! Lock-free parameter value slots shared between the control and render contexts.
//!
//! Each parameter lives in a single `AtomicU64`: the low 32 bits hold the
//! `f32` bit pattern of the normalized value, bit 32 marks a value written by
//! the control context that the engine has not seen yet. Because value and
//! flag share one word, a reader can never observe half of an update.
//!
//! # Protocol
//!
//! - **Control context** ([`ParameterStore::set`]): one `store` of value + pending flag.
//! - **Render context, block start** ([`ParameterStore::drain_pending`]): `fetch_and`
//!   clears the flag and hands the value to the engine. A write racing with the
//!   drain simply sets the flag again and is picked up next block.
//! - **Render context, after `process()`** ([`ParameterStore::mirror`]): engine-side
//!   changes (program changes, internal modulation of stored values) are copied
//!   back into slots that have no pending write, using `compare_exchange` so a
//!   concurrent host write always wins.
//!
//! None of these operations allocate or block.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::types::{ParameterId, ParameterValue};

const PENDING: u64 = 1 << 32;
const VALUE_MASK: u64 = 0xFFFF_FFFF;

#[inline]
fn pack(value: ParameterValue, pending: bool) -> u64 {
    let bits = value.to_bits() as u64;
    if pending {
        bits | PENDING
    } else {
        bits
    }
}

#[inline]
fn unpack(word: u64) -> ParameterValue {
    f32::from_bits((word & VALUE_MASK) as u32)
}

struct ParameterSlot {
    id: ParameterId,
    word: AtomicU64,
}

/// Fixed-size set of atomic parameter slots, indexed by host index.
pub struct ParameterStore {
    slots: Box<[ParameterSlot]>,
}

impl ParameterStore {
    /// Build the store from `(internal id, initial value)` pairs in host-index order.
    ///
    /// Allocates once; call from the non-real-time construction path.
    pub fn new(parameters: impl IntoIterator<Item = (ParameterId, ParameterValue)>) -> Self {
        let slots = parameters
            .into_iter()
            .map(|(id, value)| ParameterSlot {
                id,
                word: AtomicU64::new(pack(value.clamp(0.0, 1.0), false)),
            })
            .collect();
        Self { slots }
    }

    /// Store with no parameters.
    pub fn empty() -> Self {
        Self {
            slots: Box::new([]),
        }
    }

    /// Number of parameters.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Internal engine id for a host index.
    #[inline]
    pub fn id(&self, index: u32) -> Option<ParameterId> {
        self.slots.get(index as usize).map(|slot| slot.id)
    }

    /// Current normalized value for a host index.
    #[inline]
    pub fn get(&self, index: u32) -> Option<ParameterValue> {
        self.slots
            .get(index as usize)
            .map(|slot| unpack(slot.word.load(Ordering::Acquire)))
    }

    /// Publish a new normalized value for the render context to apply.
    ///
    /// Values are clamped to [0.0, 1.0]. NaN and out-of-range indices are
    /// ignored and return `false`.
    #[inline]
    pub fn set(&self, index: u32, value: ParameterValue) -> bool {
        if value.is_nan() {
            return false;
        }
        match self.slots.get(index as usize) {
            Some(slot) => {
                slot.word
                    .store(pack(value.clamp(0.0, 1.0), true), Ordering::Release);
                true
            }
            None => false,
        }
    }

    /// Whether a host write is waiting for the next block start.
    #[inline]
    pub fn is_pending(&self, index: u32) -> bool {
        self.slots
            .get(index as usize)
            .is_some_and(|slot| slot.word.load(Ordering::Acquire) & PENDING != 0)
    }

    /// Claim every pending write and hand it to `apply`.
    ///
    /// Returns the number of values applied. Render context only.
    pub fn drain_pending(&self, mut apply: impl FnMut(ParameterId, ParameterValue)) -> usize {
        let mut applied = 0;
        for slot in self.slots.iter() {
            if slot.word.load(Ordering::Relaxed) & PENDING == 0 {
                continue;
            }
            let previous = slot.word.fetch_and(!PENDING, Ordering::AcqRel);
            if previous & PENDING != 0 {
                apply(slot.id, unpack(previous));
                applied += 1;
            }
        }
        applied
    }

    /// Copy engine-side values into slots with no pending write.
    ///
    /// Non-finite engine values are skipped. Render context only.
    pub fn mirror(&self, mut read: impl FnMut(ParameterId) -> ParameterValue) {
        for slot in self.slots.iter() {
            let current = slot.word.load(Ordering::Acquire);
            if current & PENDING != 0 {
                continue;
            }
            let engine_value = read(slot.id);
            if !engine_value.is_finite() {
                continue;
            }
            let next = pack(engine_value.clamp(0.0, 1.0), false);
            if next != current {
                // Losing the race means the host wrote in between; keep its value.
                let _ = slot.word.compare_exchange(
                    current,
                    next,
                    Ordering::AcqRel,
                    Ordering::Relaxed,
                );
            }
        }
    }
}

/// Cloneable, thread-safe view of a plugin's parameter store.
///
/// Handed to the control/UI context. Reads and writes go through the atomic
/// slots only; the engine itself is never reachable from here.
#[derive(Clone)]
pub struct ParameterHandle {
    store: Arc<ParameterStore>,
}

impl ParameterHandle {
    pub fn new(store: Arc<ParameterStore>) -> Self {
        Self { store }
    }

    /// Number of parameters.
    pub fn count(&self) -> u32 {
        self.store.len() as u32
    }

    /// Normalized value, or 0.0 for an unknown index.
    pub fn get(&self, index: u32) -> ParameterValue {
        self.store.get(index).unwrap_or(0.0)
    }

    /// Publish a normalized value. Out-of-range indices are ignored.
    pub fn set(&self, index: u32, value: ParameterValue) {
        self.store.set(index, value);
    }
}

impl std::fmt::Debug for ParameterHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParameterHandle")
            .field("count", &self.store.len())
            .finish()
    }
}
