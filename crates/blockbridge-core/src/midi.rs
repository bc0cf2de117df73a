//! Raw MIDI event type delivered by the host.
//!
//! Events are frame-stamped relative to the start of the current audio
//! callback. Short messages (the common case) are stored inline; longer ones
//! borrow the host's buffer for the duration of the callback, so building an
//! event never allocates.

/// Number of bytes a [`MidiEvent`] can hold without an extended buffer.
pub const MIDI_INLINE_CAPACITY: usize = 4;

/// Payload storage of a raw MIDI message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiData<'a> {
    /// Message stored in place. Only the first `len` bytes are valid.
    Inline {
        bytes: [u8; MIDI_INLINE_CAPACITY],
        len: u8,
    },
    /// Message larger than the inline capacity, borrowed from the host.
    Extended(&'a [u8]),
}

/// A raw MIDI message with its frame offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiEvent<'a> {
    /// Frame offset relative to the start of the current callback.
    pub frame: u32,
    /// Message bytes.
    pub data: MidiData<'a>,
}

impl<'a> MidiEvent<'a> {
    /// Build an event, storing the bytes inline when they fit.
    pub fn new(frame: u32, bytes: &'a [u8]) -> Self {
        if bytes.len() <= MIDI_INLINE_CAPACITY {
            let mut inline = [0u8; MIDI_INLINE_CAPACITY];
            inline[..bytes.len()].copy_from_slice(bytes);
            Self {
                frame,
                data: MidiData::Inline {
                    bytes: inline,
                    len: bytes.len() as u8,
                },
            }
        } else {
            Self {
                frame,
                data: MidiData::Extended(bytes),
            }
        }
    }

    /// Build a short event from literal bytes (at most 4).
    ///
    /// Extra bytes beyond the inline capacity are dropped.
    pub fn short(frame: u32, bytes: &[u8]) -> MidiEvent<'static> {
        let len = bytes.len().min(MIDI_INLINE_CAPACITY);
        let mut inline = [0u8; MIDI_INLINE_CAPACITY];
        inline[..len].copy_from_slice(&bytes[..len]);
        MidiEvent {
            frame,
            data: MidiData::Inline {
                bytes: inline,
                len: len as u8,
            },
        }
    }

    /// Valid message bytes, whichever storage they live in.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        match &self.data {
            MidiData::Inline { bytes, len } => &bytes[..(*len as usize).min(MIDI_INLINE_CAPACITY)],
            MidiData::Extended(slice) => slice,
        }
    }

    /// Message size in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the message needed the extended buffer.
    #[inline]
    pub fn is_extended(&self) -> bool {
        matches!(self.data, MidiData::Extended(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_message_inline() {
        let bytes = [0x90, 60, 100];
        let event = MidiEvent::new(12, &bytes);
        assert_eq!(event.frame, 12);
        assert!(!event.is_extended());
        assert_eq!(event.bytes(), &[0x90, 60, 100]);
    }

    #[test]
    fn test_long_message_extended() {
        let sysex = [0xF0, 0x41, 0x10, 0x42, 0x12, 0xF7];
        let event = MidiEvent::new(0, &sysex);
        assert!(event.is_extended());
        assert_eq!(event.len(), 6);
        assert_eq!(event.bytes(), &sysex);
    }

    #[test]
    fn test_short_truncates() {
        let event = MidiEvent::short(3, &[1, 2, 3, 4, 5]);
        assert_eq!(event.bytes(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_empty() {
        let event = MidiEvent::short(0, &[]);
        assert!(event.is_empty());
    }
}
