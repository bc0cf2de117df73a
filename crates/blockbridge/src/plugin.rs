//! Plugin lifecycle around one engine instance.
//!
//! [`SynthPlugin`] owns the engine, the parameter slots and the renderer. It
//! is the object the format glue holds for the lifetime of a plugin instance.
//!
//! If the engine factory fails the plugin stays *inert*: every entry point
//! still works but does nothing, and rendering leaves the host's buffers as
//! they are.

use blockbridge_core::{
    BridgeError, BridgeResult, Config, EngineTime, MidiEvent, ParameterDescriptor,
    ParameterHandle, ParameterValue, SynthEngine, TimePosition,
};

use crate::parameters::ParameterBridge;
use crate::render::{AudioBlockRenderer, RenderContext, RenderReport};

/// One plugin instance bridging a host to a [`SynthEngine`].
pub struct SynthPlugin<E: SynthEngine> {
    config: &'static Config,
    /// `None` when the factory failed.
    engine: Option<Box<E>>,
    parameters: ParameterBridge,
    renderer: AudioBlockRenderer,
    sample_rate: f64,
}

fn validate_sample_rate(sample_rate: f64) -> BridgeResult<f64> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(BridgeError::InvalidSampleRate(sample_rate))
    }
}

impl<E: SynthEngine> SynthPlugin<E> {
    /// Build the engine with `factory` and wire it to a fresh bridge.
    ///
    /// The factory receives the validated sample rate. Any failure is logged
    /// and yields an inert plugin.
    pub fn new<F>(config: &'static Config, sample_rate: f64, factory: F) -> Self
    where
        F: FnOnce(f64) -> BridgeResult<E>,
    {
        let engine = validate_sample_rate(sample_rate).and_then(factory);

        match engine {
            Ok(engine) => Self::with_engine(config, sample_rate, engine),
            Err(e) => {
                log::error!("{}: {}, plugin is inert", config.label, e);
                Self {
                    config,
                    engine: None,
                    parameters: ParameterBridge::inert(),
                    renderer: AudioBlockRenderer::new(),
                    sample_rate,
                }
            }
        }
    }

    /// Wire an already constructed engine.
    pub fn with_engine(config: &'static Config, sample_rate: f64, engine: E) -> Self {
        let mut engine = Box::new(engine);
        engine.set_sample_rate(sample_rate);
        engine.set_time(EngineTime::default());

        let parameters = ParameterBridge::new(&*engine);
        log::debug!(
            "{}: engine ready at {} Hz with {} parameters",
            config.label,
            sample_rate,
            parameters.len()
        );

        Self {
            config,
            engine: Some(engine),
            parameters,
            renderer: AudioBlockRenderer::new(),
            sample_rate,
        }
    }

    /// `true` when the engine failed to build.
    pub fn is_inert(&self) -> bool {
        self.engine.is_none()
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_deref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_deref_mut()
    }

    /// Static identification.
    pub fn info(&self) -> &'static Config {
        self.config
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Current offset inside the engine block.
    pub fn block_position(&self) -> usize {
        self.renderer.block_position()
    }

    // =========================================================================
    // Lifecycle (render context)
    // =========================================================================

    /// Host activation: restart on a block boundary and enable processing.
    pub fn activate(&mut self) {
        self.renderer.reset();
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.set_audio_processing_active(true);
        }
    }

    /// Host deactivation: silence every voice, then disable processing.
    pub fn deactivate(&mut self) {
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.all_notes_off();
            engine.set_audio_processing_active(false);
        }
    }

    /// Rewind the engine song position to zero.
    ///
    /// Takes effect at the next block start. Never called implicitly.
    pub fn reset_song_position(&mut self) {
        self.renderer.transport_mut().reset();
    }

    /// Forward a new sample rate. Invalid rates are logged and ignored.
    pub fn sample_rate_changed(&mut self, sample_rate: f64) {
        if let Err(e) = validate_sample_rate(sample_rate) {
            log::warn!("{}: {}, keeping {} Hz", self.config.label, e, self.sample_rate);
            return;
        }

        self.sample_rate = sample_rate;
        if let Some(engine) = self.engine.as_deref_mut() {
            engine.set_sample_rate(sample_rate);
        }
    }

    /// Render `frames` samples into `outputs`.
    ///
    /// `inputs` are accepted for host compatibility and ignored: the engine
    /// is an instrument.
    pub fn run(
        &mut self,
        _inputs: &[&[f32]],
        outputs: &mut [&mut [f32]],
        frames: usize,
        events: &[MidiEvent<'_>],
        position: &TimePosition,
    ) -> RenderReport {
        let Some(engine) = self.engine.as_deref_mut() else {
            return RenderReport::default();
        };

        self.renderer.render(
            engine,
            &self.parameters,
            outputs,
            &RenderContext {
                frames,
                events,
                position,
                sample_rate: self.sample_rate,
            },
        )
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Host-visible parameter count, fixed by the engine type.
    pub fn parameter_count(&self) -> u32 {
        E::PARAMETER_COUNT
    }

    /// Name, symbol and default for a host index. `None` when inert or out of range.
    pub fn parameter_descriptor(&self, index: u32) -> Option<ParameterDescriptor> {
        let engine = self.engine.as_deref()?;
        self.parameters.describe(engine, index)
    }

    /// Descriptors for every parameter, in host order. Allocates.
    pub fn parameter_descriptors(&self) -> Vec<ParameterDescriptor> {
        (0..self.parameter_count())
            .filter_map(|index| self.parameter_descriptor(index))
            .collect()
    }

    pub fn parameter_value(&self, index: u32) -> ParameterValue {
        self.parameters.get(index)
    }

    /// Queue a host write; the engine sees it at the next block start.
    pub fn set_parameter_value(&self, index: u32, value: ParameterValue) {
        self.parameters.set(index, value);
    }

    /// Thread-safe parameter view for the UI. `None` when inert.
    pub fn parameter_handle(&self) -> Option<ParameterHandle> {
        self.engine.as_ref().map(|_| self.parameters.handle())
    }
}
