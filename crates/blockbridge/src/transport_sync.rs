//! Host transport to engine time base.
//!
//! Runs once per engine block, never per sample. Tempo and sample rate are
//! read at the block boundary, so changes take effect on the next block.

use blockbridge_core::{EngineTime, TimePosition, BLOCK_SIZE};

/// Tempo used when the host's beat grid is missing or invalid.
pub const DEFAULT_TEMPO: f64 = 120.0;

/// Running song position advanced in whole engine blocks.
#[derive(Debug, Clone, Default)]
pub struct TransportSync {
    /// Song position in quarter notes.
    ppq_position: f64,
}

impl TransportSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current song position in quarter notes.
    pub fn ppq_position(&self) -> f64 {
        self.ppq_position
    }

    /// Rewind the song position to zero.
    ///
    /// Nothing in the bridge calls this implicitly; stopping the transport
    /// only pauses the advance.
    pub fn reset(&mut self) {
        self.ppq_position = 0.0;
    }

    /// Quarter notes covered by one engine block.
    #[inline]
    pub fn quarters_per_block(tempo: f64, sample_rate: f64) -> f64 {
        if sample_rate > 0.0 && sample_rate.is_finite() {
            BLOCK_SIZE as f64 * tempo / (60.0 * sample_rate)
        } else {
            0.0
        }
    }

    /// Advance by one block and return the time to hand the engine.
    #[inline]
    pub fn advance(&mut self, position: &TimePosition, sample_rate: f64) -> EngineTime {
        let tempo = position.tempo().unwrap_or(DEFAULT_TEMPO);
        if position.playing {
            self.ppq_position += Self::quarters_per_block(tempo, sample_rate);
        }
        EngineTime {
            tempo,
            ppq_position: self.ppq_position,
        }
    }
}
