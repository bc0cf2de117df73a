//! # Blockbridge
//!
//! Block-synchronized bridge between an audio plugin host and a synthesis
//! engine that only renders fixed blocks of [`BLOCK_SIZE`](blockbridge_core::BLOCK_SIZE)
//! samples.
//!
//! ## Architecture
//!
//! ```text
//! Host callback (any frame count, MIDI, transport, automation)
//!        ↓
//! SynthPlugin<E>  ── AudioBlockRenderer ── MidiDecoder / TransportSync
//!        │                    └── ParameterBridge (atomic slots)
//!        ↓
//! SynthEngine (fixed 32-sample blocks)
//!
//! Host UI thread ── EditorBridge<Ed> ── Editor (ParameterHandle only)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use blockbridge::prelude::*;
//!
//! static CONFIG: Config = Config::new("MySynth", "Mkr1", "Syn1").with_version(1, 0, 0);
//!
//! let mut plugin = create_plugin(&CONFIG, 48_000.0, |rate| MyEngine::new(rate));
//! plugin.activate();
//! plugin.run(&[], &mut outputs, frames, &events, &TimePosition::playing_at(128.0));
//!
//! let mut ui = create_ui(&plugin, window, |params| MyEditor::new(params));
//! ui.set_visible(true);
//! ```

// Re-export sub-crate
pub use blockbridge_core as core;

pub mod factory;
pub mod midi_decoder;
pub mod parameters;
pub mod plugin;
pub mod render;
pub mod transport_sync;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use factory::{create_plugin, create_ui};
pub use midi_decoder::MidiAction;
pub use parameters::ParameterBridge;
pub use plugin::SynthPlugin;
pub use render::{AudioBlockRenderer, RenderContext, RenderReport};
pub use transport_sync::{TransportSync, DEFAULT_TEMPO};
pub use ui::{EditorBridge, EditorState};

/// Prelude module for convenient imports.
///
/// Import everything you need to wire an engine and editor:
/// ```rust,ignore
/// use blockbridge::prelude::*;
/// ```
pub mod prelude {
    pub use blockbridge_core::{
        // Collaborator traits
        Editor, SynthEngine,
        // Plugin identity
        Config, FourCharCode, Version, fourcc,
        // Error types
        BridgeError, BridgeResult,
        // Engine-facing values
        EngineTime, ParameterId, ParameterValue, BLOCK_SIZE,
        // Parameter metadata and shared slots
        ParameterDescriptor, ParameterHandle, ParameterName,
        // MIDI and transport
        BarBeatTick, MidiEvent, TimePosition,
        // Geometry and windowing
        Rect, Size, WindowHandle,
    };

    pub use crate::{
        create_plugin, create_ui, EditorBridge, EditorState, RenderReport, SynthPlugin,
    };
}
