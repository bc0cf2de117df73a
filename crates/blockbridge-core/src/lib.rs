//! # Blockbridge Core
//!
//! Format-agnostic abstractions shared by the bridge:
//!
//! - [`SynthEngine`] / [`Editor`] - the external collaborators the bridge drives
//! - [`MidiEvent`] - raw frame-stamped MIDI with inline/extended storage
//! - [`TimePosition`] - the host transport snapshot
//! - [`ParameterStore`] / [`ParameterHandle`] - lock-free parameter slots
//! - [`ParameterDescriptor`] - host-facing parameter metadata
//! - [`Config`] - static plugin identity
//! - [`BridgeError`] - construction-time errors

pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod midi;
pub mod parameter_info;
pub mod parameter_store;
pub mod transport;
pub mod types;

pub use config::{Config, FourCharCode, Version};
pub use editor::Editor;
pub use engine::{EngineTime, SynthEngine};
pub use error::{BridgeError, BridgeResult};
pub use midi::{MidiData, MidiEvent, MIDI_INLINE_CAPACITY};
pub use parameter_info::{make_basic, ParameterDescriptor, ParameterName, MAX_PARAMETER_NAME_SIZE};
pub use parameter_store::{ParameterHandle, ParameterStore};
pub use transport::{BarBeatTick, TimePosition};
pub use types::{ParameterId, ParameterValue, Rect, Size, WindowHandle, BLOCK_SIZE};
