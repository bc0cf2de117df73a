//! Host transport snapshot.
//!
//! Only the fields the bridge consumes are modelled: play state, beat-grid
//! validity and tempo.

/// Bar/beat/tick information. Only meaningful when `valid` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarBeatTick {
    /// Whether the host filled in the beat grid.
    pub valid: bool,
    /// Tempo in beats per minute.
    pub beats_per_minute: f64,
}

impl Default for BarBeatTick {
    fn default() -> Self {
        Self {
            valid: false,
            beats_per_minute: 120.0,
        }
    }
}

/// Host time position for the current callback.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimePosition {
    /// Transport is rolling.
    pub playing: bool,
    /// Beat-grid information.
    pub bbt: BarBeatTick,
}

impl TimePosition {
    /// Stopped transport with no beat grid.
    pub const fn stopped() -> Self {
        Self {
            playing: false,
            bbt: BarBeatTick {
                valid: false,
                beats_per_minute: 120.0,
            },
        }
    }

    /// Rolling transport at `tempo` with a valid beat grid.
    pub const fn playing_at(tempo: f64) -> Self {
        Self {
            playing: true,
            bbt: BarBeatTick {
                valid: true,
                beats_per_minute: tempo,
            },
        }
    }

    /// Tempo reported by the host, if the beat grid is valid and usable.
    pub fn tempo(&self) -> Option<f64> {
        let bpm = self.bbt.beats_per_minute;
        (self.bbt.valid && bpm.is_finite() && bpm > 0.0).then_some(bpm)
    }
}
