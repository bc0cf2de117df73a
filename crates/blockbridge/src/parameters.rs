//! Host parameter index <-> engine parameter translation.
//!
//! The host sees a dense index space `[0, N)`; the engine uses its own ids.
//! The remap is pure, so it is evaluated once per index when the bridge is
//! built and stored beside each value slot.
//!
//! Host writes never touch the engine directly. They land in the atomic
//! [`ParameterStore`] and are applied with `force_immediate = true` at the
//! next block start by [`ParameterBridge::apply_pending`].

use std::sync::Arc;

use blockbridge_core::{
    ParameterDescriptor, ParameterHandle, ParameterId, ParameterStore, ParameterValue,
    SynthEngine,
};

/// Parameter side of the bridge.
pub struct ParameterBridge {
    store: Arc<ParameterStore>,
}

impl ParameterBridge {
    /// Snapshot remap table and current values from the engine.
    ///
    /// Allocates the slot table; call from the construction path only.
    pub fn new<E: SynthEngine>(engine: &E) -> Self {
        let store = ParameterStore::new((0..E::PARAMETER_COUNT).map(|index| {
            let id = engine.remap_external_api_to_internal_id(index);
            (id, engine.parameter_01(id))
        }));
        Self {
            store: Arc::new(store),
        }
    }

    /// Bridge with no parameters, used when the engine failed to build.
    pub fn inert() -> Self {
        Self {
            store: Arc::new(ParameterStore::empty()),
        }
    }

    /// Number of live parameter slots.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Internal engine id for a host index.
    #[inline]
    pub fn remap(&self, index: u32) -> Option<ParameterId> {
        self.store.id(index)
    }

    /// Normalized value for a host index, 0.0 when unknown.
    #[inline]
    pub fn get(&self, index: u32) -> ParameterValue {
        self.store.get(index).unwrap_or(0.0)
    }

    /// Publish a normalized value; applied at the next block start.
    #[inline]
    pub fn set(&self, index: u32, value: ParameterValue) {
        self.store.set(index, value);
    }

    /// Query the engine for name, symbol and default of a host index.
    ///
    /// The name is fetched on every call, never cached.
    pub fn describe<E: SynthEngine>(&self, engine: &E, index: u32) -> Option<ParameterDescriptor> {
        let id = self.remap(index)?;
        Some(ParameterDescriptor::new(
            engine.parameter_name(id),
            engine.parameter_01(id),
        ))
    }

    /// Push pending host writes into the engine. Render context only.
    #[inline]
    pub fn apply_pending<E: SynthEngine>(&self, engine: &mut E) -> usize {
        self.store
            .drain_pending(|id, value| engine.set_parameter_01(id, value, true))
    }

    /// Pull engine-side changes back into idle slots. Render context only.
    #[inline]
    pub fn mirror_from<E: SynthEngine>(&self, engine: &E) {
        self.store.mirror(|id| engine.parameter_01(id));
    }

    /// Thread-safe view for the control/UI context.
    pub fn handle(&self) -> ParameterHandle {
        ParameterHandle::new(Arc::clone(&self.store))
    }
}
