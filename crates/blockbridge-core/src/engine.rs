//! Synthesis engine interface.
//!
//! The bridge treats the engine as an external collaborator: it renders one
//! fixed-size block per [`SynthEngine::process`] call into its own output
//! buffers, and exposes its parameters and MIDI entry points. Nothing here
//! prescribes how the engine makes sound.

use crate::types::{ParameterId, ParameterValue, BLOCK_SIZE};

/// Musical time pushed to the engine before each block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineTime {
    /// Tempo in beats per minute.
    pub tempo: f64,
    /// Running song position in quarter notes.
    pub ppq_position: f64,
}

impl Default for EngineTime {
    fn default() -> Self {
        Self {
            tempo: 120.0,
            ppq_position: 0.0,
        }
    }
}

/// Trait implemented by the embedded synthesis engine.
///
/// # Thread Safety
///
/// The engine is owned by the plugin bridge and only touched from the render
/// context, so it needs to be `Send` but not `Sync`. Every method except the
/// metadata queries may be called on the audio thread and must be real-time
/// safe:
/// - No allocations
/// - No locks
/// - No unbounded loops
pub trait SynthEngine: Send {
    /// Number of host-visible parameters. Fixed for the engine type.
    const PARAMETER_COUNT: u32;

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Render one block of [`BLOCK_SIZE`] samples into the output buffers and
    /// advance internal time.
    fn process(&mut self);

    /// Number of output channels the engine renders.
    fn num_outputs(&self) -> usize;

    /// Most recently rendered block for `channel`.
    ///
    /// Only called with `channel < num_outputs()`.
    fn output(&self, channel: usize) -> &[f32; BLOCK_SIZE];

    /// Update the engine's sample rate.
    fn set_sample_rate(&mut self, sample_rate: f64);

    /// Update tempo and song position ahead of the next block.
    fn set_time(&mut self, time: EngineTime);

    /// Toggle the engine's audio-processing flag (host activate/deactivate).
    fn set_audio_processing_active(&mut self, active: bool);

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Map a host parameter index in `[0, PARAMETER_COUNT)` to an internal id.
    ///
    /// Must be pure: the bridge computes it once per index at construction.
    fn remap_external_api_to_internal_id(&self, host_index: u32) -> ParameterId;

    /// Current normalized value of an internal parameter.
    fn parameter_01(&self, id: ParameterId) -> ParameterValue;

    /// Write a normalized value. `force_immediate` skips any smoothing.
    fn set_parameter_01(&mut self, id: ParameterId, value: ParameterValue, force_immediate: bool);

    /// Display name of an internal parameter.
    fn parameter_name(&self, id: ParameterId) -> &str;

    // =========================================================================
    // MIDI
    // =========================================================================

    fn play_note(&mut self, channel: u8, note: u8, velocity: u8, detune: i32);

    fn release_note(&mut self, channel: u8, note: u8, velocity: u8);

    /// Pitch bend, centered at 0, range -8192..=8191.
    fn pitch_bend(&mut self, channel: u8, value: i32);

    fn channel_controller(&mut self, channel: u8, controller: u8, value: u8);

    fn program_change(&mut self, channel: u8, program: u8);

    fn channel_aftertouch(&mut self, channel: u8, pressure: u8);

    fn poly_aftertouch(&mut self, channel: u8, note: u8, pressure: u8);

    /// Silence every sounding note immediately.
    fn all_notes_off(&mut self);
}
