//! Raw MIDI classification into engine actions.
//!
//! Decoding is pure and stateless: one message in, at most one [`MidiAction`]
//! out. Ordering and timing belong to the renderer.
//!
//! | Status | Action |
//! |--------|--------|
//! | `0x80`, or `0x90` with velocity 0 | [`MidiAction::ReleaseNote`] |
//! | `0x90` with velocity > 0 | [`MidiAction::PlayNote`] |
//! | `0xE0` | [`MidiAction::PitchBend`], centered on 0 |
//! | `0xB0` CC 123 / CC 126 | [`MidiAction::AllNotesOff`] |
//! | `0xB0` other | [`MidiAction::ChannelController`] |
//! | `0xC0` | [`MidiAction::ProgramChange`] |
//! | `0xD0` | [`MidiAction::ChannelAftertouch`] |
//! | `0xA0` | [`MidiAction::PolyAftertouch`] |
//! | `0xFC`, `0xFF` | [`MidiAction::AllNotesOff`] |

use blockbridge_core::{MidiEvent, SynthEngine};

/// Channel mode controller: All Notes Off.
pub const CC_ALL_NOTES_OFF: u8 = 0x7B;
/// Channel mode controller: Mono Mode On (implies all notes off).
pub const CC_MONO_MODE_ON: u8 = 0x7E;

/// System realtime: Stop.
pub const STATUS_STOP: u8 = 0xFC;
/// System realtime: System Reset.
pub const STATUS_RESET: u8 = 0xFF;

/// Center of the 14-bit pitch bend range.
pub const PITCH_BEND_CENTER: i32 = 8192;

/// Engine call selected for one MIDI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiAction {
    PlayNote {
        channel: u8,
        note: u8,
        velocity: u8,
        detune: i32,
    },
    ReleaseNote {
        channel: u8,
        note: u8,
        velocity: u8,
    },
    /// Bend value in -8192..=8191.
    PitchBend { channel: u8, value: i32 },
    ChannelController {
        channel: u8,
        controller: u8,
        value: u8,
    },
    ProgramChange { channel: u8, program: u8 },
    ChannelAftertouch { channel: u8, pressure: u8 },
    PolyAftertouch {
        channel: u8,
        note: u8,
        pressure: u8,
    },
    AllNotesOff,
}

impl MidiAction {
    /// Classify a raw message.
    ///
    /// Returns `None` for unknown statuses and for channel messages that are
    /// missing data bytes.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let &status_byte = bytes.first()?;

        // System realtime messages carry no channel, match the whole byte.
        if status_byte == STATUS_STOP || status_byte == STATUS_RESET {
            return Some(Self::AllNotesOff);
        }

        let status = status_byte & 0xF0;
        let channel = status_byte & 0x0F;
        let data1 = || bytes.get(1).map(|b| b & 0x7F);
        let data2 = || bytes.get(2).map(|b| b & 0x7F);

        let action = match status {
            0x80 | 0x90 => {
                let note = data1()?;
                let velocity = data2()?;
                if status == 0x80 || velocity == 0 {
                    Self::ReleaseNote {
                        channel,
                        note,
                        velocity,
                    }
                } else {
                    Self::PlayNote {
                        channel,
                        note,
                        velocity,
                        detune: 0,
                    }
                }
            }
            0xE0 => {
                let lsb = data1()? as i32;
                let msb = data2()? as i32;
                Self::PitchBend {
                    channel,
                    value: (lsb + (msb << 7)) - PITCH_BEND_CENTER,
                }
            }
            0xB0 => {
                let controller = data1()?;
                let value = data2()?;
                if controller == CC_ALL_NOTES_OFF || controller == CC_MONO_MODE_ON {
                    Self::AllNotesOff
                } else {
                    Self::ChannelController {
                        channel,
                        controller,
                        value,
                    }
                }
            }
            0xC0 => Self::ProgramChange {
                channel,
                program: data1()?,
            },
            0xD0 => Self::ChannelAftertouch {
                channel,
                pressure: data1()?,
            },
            0xA0 => Self::PolyAftertouch {
                channel,
                note: data1()?,
                pressure: data2()?,
            },
            _ => return None,
        };
        Some(action)
    }

    /// Forward this action to the engine.
    #[inline]
    pub fn apply<E: SynthEngine>(self, engine: &mut E) {
        match self {
            Self::PlayNote {
                channel,
                note,
                velocity,
                detune,
            } => engine.play_note(channel, note, velocity, detune),
            Self::ReleaseNote {
                channel,
                note,
                velocity,
            } => engine.release_note(channel, note, velocity),
            Self::PitchBend { channel, value } => engine.pitch_bend(channel, value),
            Self::ChannelController {
                channel,
                controller,
                value,
            } => engine.channel_controller(channel, controller, value),
            Self::ProgramChange { channel, program } => engine.program_change(channel, program),
            Self::ChannelAftertouch { channel, pressure } => {
                engine.channel_aftertouch(channel, pressure)
            }
            Self::PolyAftertouch {
                channel,
                note,
                pressure,
            } => engine.poly_aftertouch(channel, note, pressure),
            Self::AllNotesOff => engine.all_notes_off(),
        }
    }
}

/// Decode one event and apply it. Returns whether the engine was called.
#[inline]
pub fn dispatch<E: SynthEngine>(engine: &mut E, event: &MidiEvent<'_>) -> bool {
    match MidiAction::decode(event.bytes()) {
        Some(action) => {
            action.apply(engine);
            true
        }
        None => false,
    }
}
