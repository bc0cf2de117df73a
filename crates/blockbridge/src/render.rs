//! Block-synchronized render loop.
//!
//! The engine only renders in fixed blocks of [`BLOCK_SIZE`] samples while the
//! host asks for arbitrary frame counts. The renderer keeps a block position
//! that survives across callbacks and copies out of the engine's most recent
//! block, rendering a new one each time the position wraps to zero.
//!
//! # Block start
//!
//! Every time `blockpos == 0` at output index `i`, in this order:
//! 1. pending host parameter writes are applied to the engine
//! 2. the transport advances one block and the engine time is updated
//! 3. MIDI events with `frame < i` are dispatched, in order
//! 4. `engine.process()` renders the block
//! 5. engine-side parameter values are mirrored back to idle slots
//!
//! # MIDI latency
//!
//! Events are only drained at block starts and only when their frame is
//! strictly before the current index. An event landing inside a block is
//! delayed to the next boundary (up to `BLOCK_SIZE - 1` samples late), an
//! event at frame 0 of a callback that starts on a boundary waits for the
//! following block, and events after the last boundary of a callback are not
//! dispatched at all: the renderer does not buffer events across callbacks.
//! [`RenderReport::events_dispatched`] lets the caller see how many were used.
//!
//! # Real-Time Safety
//!
//! No allocation, no locks, no panics: frame counts are clamped to the
//! shortest output buffer and channel counts to what both sides provide.

use blockbridge_core::{MidiEvent, SynthEngine, TimePosition, BLOCK_SIZE};

use crate::midi_decoder;
use crate::parameters::ParameterBridge;
use crate::transport_sync::TransportSync;

/// What one render call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderReport {
    /// Output frames written per channel.
    pub frames_rendered: usize,
    /// Number of `engine.process()` calls.
    pub blocks_processed: usize,
    /// MIDI events consumed from the event list.
    pub events_dispatched: usize,
}

/// Per-callback input to [`AudioBlockRenderer::render`].
pub struct RenderContext<'a, 'e> {
    /// Requested frame count.
    pub frames: usize,
    /// MIDI events sorted by non-decreasing frame.
    pub events: &'a [MidiEvent<'e>],
    /// Host transport snapshot for this callback.
    pub position: &'a TimePosition,
    /// Current sample rate in Hz.
    pub sample_rate: f64,
}

/// Scheduler reconciling host callbacks with fixed engine blocks.
#[derive(Debug, Default)]
pub struct AudioBlockRenderer {
    /// Offset into the engine's last rendered block. Always `< BLOCK_SIZE`.
    blockpos: usize,
    transport: TransportSync,
}

impl AudioBlockRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current position inside the engine block.
    #[inline]
    pub fn block_position(&self) -> usize {
        self.blockpos
    }

    /// Restart at a block boundary (host activation).
    pub fn reset(&mut self) {
        self.blockpos = 0;
    }

    pub fn transport(&self) -> &TransportSync {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut TransportSync {
        &mut self.transport
    }

    /// Fill `outputs` with `context.frames` samples from the engine.
    pub fn render<E: SynthEngine>(
        &mut self,
        engine: &mut E,
        parameters: &ParameterBridge,
        outputs: &mut [&mut [f32]],
        context: &RenderContext<'_, '_>,
    ) -> RenderReport {
        let frames = outputs
            .iter()
            .map(|channel| channel.len())
            .fold(context.frames, usize::min);
        let channels = outputs.len().min(engine.num_outputs());

        let mut report = RenderReport::default();
        let mut cursor = 0;
        let mut i = 0;

        while i < frames {
            if self.blockpos == 0 {
                parameters.apply_pending(engine);

                let time = self.transport.advance(context.position, context.sample_rate);
                engine.set_time(time);

                while let Some(event) = context.events.get(cursor) {
                    if (event.frame as usize) >= i {
                        break;
                    }
                    midi_decoder::dispatch(engine, event);
                    cursor += 1;
                }

                engine.process();
                report.blocks_processed += 1;

                parameters.mirror_from(engine);
            }

            // Copy up to the end of the current block or the callback, whichever is first.
            let run = (BLOCK_SIZE - self.blockpos).min(frames - i);
            for (channel, output) in outputs.iter_mut().take(channels).enumerate() {
                let block = engine.output(channel);
                output[i..i + run].copy_from_slice(&block[self.blockpos..self.blockpos + run]);
            }

            i += run;
            self.blockpos = (self.blockpos + run) % BLOCK_SIZE;
        }

        report.frames_rendered = frames;
        report.events_dispatched = cursor;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{EngineCall, TestEngine};

    const SAMPLE_RATE: f64 = 48_000.0;

    struct Fixture {
        engine: TestEngine,
        parameters: ParameterBridge,
        renderer: AudioBlockRenderer,
    }

    impl Fixture {
        fn new() -> Self {
            let engine = TestEngine::new();
            let parameters = ParameterBridge::new(&engine);
            Self {
                engine,
                parameters,
                renderer: AudioBlockRenderer::new(),
            }
        }

        fn render(
            &mut self,
            frames: usize,
            events: &[MidiEvent<'_>],
        ) -> (Vec<Vec<f32>>, RenderReport) {
            let mut left = vec![f32::NAN; frames];
            let mut right = vec![f32::NAN; frames];
            let position = TimePosition::playing_at(120.0);
            let report = {
                let mut outputs: [&mut [f32]; 2] = [&mut left, &mut right];
                self.renderer.render(
                    &mut self.engine,
                    &self.parameters,
                    &mut outputs,
                    &RenderContext {
                        frames,
                        events,
                        position: &position,
                        sample_rate: SAMPLE_RATE,
                    },
                )
            };
            (vec![left, right], report)
        }
    }

    #[test]
    fn test_two_full_blocks() {
        let mut fx = Fixture::new();
        let (out, report) = fx.render(64, &[]);

        assert_eq!(report.blocks_processed, 2);
        assert_eq!(fx.engine.blocks_rendered, 2);
        assert_eq!(fx.renderer.block_position(), 0);

        for channel in 0..2 {
            for s in 0..32 {
                assert_eq!(out[channel][s], TestEngine::expected_sample(1, channel, s));
                assert_eq!(out[channel][32 + s], TestEngine::expected_sample(2, channel, s));
            }
        }
    }

    #[test]
    fn test_blockpos_carries_across_callbacks() {
        let mut fx = Fixture::new();

        let (_, first) = fx.render(20, &[]);
        assert_eq!(first.blocks_processed, 1);
        assert_eq!(fx.renderer.block_position(), 20);

        let (out, second) = fx.render(12, &[]);
        assert_eq!(second.blocks_processed, 0);
        assert_eq!(fx.renderer.block_position(), 0);
        assert_eq!(out[0][0], TestEngine::expected_sample(1, 0, 20));
        assert_eq!(out[0][11], TestEngine::expected_sample(1, 0, 31));

        // The wrap to zero triggers the next process() at the start of the third callback
        let (out, third) = fx.render(1, &[]);
        assert_eq!(third.blocks_processed, 1);
        assert_eq!(out[1][0], TestEngine::expected_sample(2, 1, 0));
    }

    #[test]
    fn test_wrap_inside_callback() {
        let mut fx = Fixture::new();
        fx.render(20, &[]);
        let (out, report) = fx.render(20, &[]);

        // 12 samples finish block 1, the wrap inside this callback renders block 2
        assert_eq!(report.blocks_processed, 1);
        assert_eq!(fx.renderer.block_position(), 8);
        assert_eq!(out[0][11], TestEngine::expected_sample(1, 0, 31));
        assert_eq!(out[0][12], TestEngine::expected_sample(2, 0, 0));
        assert_eq!(out[0][19], TestEngine::expected_sample(2, 0, 7));
    }

    #[test]
    fn test_block_count_rounds_up() {
        // process() fires on the first sample after a wrap, so a partial
        // trailing block still costs one render
        let mut fx = Fixture::new();
        let (_, report) = fx.render(200, &[]);
        assert_eq!(report.blocks_processed, 7);
        assert_eq!(fx.renderer.block_position(), 200 % BLOCK_SIZE);

        // Finishing that block exactly renders nothing new
        let (_, report) = fx.render(BLOCK_SIZE - 200 % BLOCK_SIZE, &[]);
        assert_eq!(report.blocks_processed, 0);
        assert_eq!(fx.renderer.block_position(), 0);
        assert_eq!(fx.engine.blocks_rendered, 7);
    }

    #[test]
    fn test_output_independent_of_partition() {
        const TOTAL: usize = 200;
        let partitions: [&[usize]; 4] = [
            &[TOTAL],
            &[1; TOTAL],
            &[7, 13, 32, 64, 3, 81],
            &[31, 33, 0, 100, 36],
        ];

        let mut reference: Option<Vec<f32>> = None;
        for sizes in partitions {
            assert_eq!(sizes.iter().sum::<usize>(), TOTAL);
            let mut fx = Fixture::new();
            let mut left = Vec::new();
            let mut blocks = 0;
            for &size in sizes {
                let (out, report) = fx.render(size, &[]);
                assert_eq!(report.frames_rendered, size);
                blocks += report.blocks_processed;
                left.extend_from_slice(&out[0]);
            }

            assert_eq!(left.len(), TOTAL);
            assert_eq!(blocks, TOTAL.div_ceil(BLOCK_SIZE));
            assert!(fx.renderer.block_position() < BLOCK_SIZE);
            assert_eq!(fx.renderer.block_position(), TOTAL % BLOCK_SIZE);

            match &reference {
                Some(expected) => assert_eq!(&left, expected),
                None => reference = Some(left),
            }
        }
    }

    #[test]
    fn test_zero_frames_is_noop() {
        let mut fx = Fixture::new();
        let (_, report) = fx.render(0, &[]);
        assert_eq!(report, RenderReport::default());
        assert_eq!(fx.engine.blocks_rendered, 0);
    }

    #[test]
    fn test_midi_dispatched_before_matching_block() {
        let mut fx = Fixture::new();
        let events = [
            MidiEvent::short(0, &[0x90, 60, 100]),
            MidiEvent::short(10, &[0x80, 60, 0]),
            MidiEvent::short(32, &[0x90, 62, 100]),
            MidiEvent::short(40, &[0x90, 64, 100]),
        ];

        let (_, report) = fx.render(96, &events);

        // i = 0: nothing is < 0. i = 32: frames 0 and 10. i = 64: frames 32 and 40.
        assert_eq!(report.blocks_processed, 3);
        assert_eq!(report.events_dispatched, 4);
        let order: Vec<_> = fx
            .engine
            .calls
            .iter()
            .copied()
            .filter(|c| !matches!(c, EngineCall::SetParameter(..)))
            .collect();
        assert_eq!(
            order,
            vec![
                EngineCall::Process,
                EngineCall::PlayNote(0, 60, 100, 0),
                EngineCall::ReleaseNote(0, 60, 0),
                EngineCall::Process,
                EngineCall::PlayNote(0, 62, 100, 0),
                EngineCall::PlayNote(0, 64, 100, 0),
                EngineCall::Process,
            ]
        );
    }

    #[test]
    fn test_event_at_boundary_goes_to_next_block() {
        let mut fx = Fixture::new();
        let events = [MidiEvent::short(32, &[0xC0, 5])];

        let (_, report) = fx.render(64, &events);
        // 32 < 32 is false at the second block start, and there is no third block start
        assert_eq!(report.events_dispatched, 0);
        assert!(fx.engine.midi_calls().is_empty());
    }

    #[test]
    fn test_events_after_last_boundary_are_not_buffered() {
        let mut fx = Fixture::new();
        let events = [MidiEvent::short(5, &[0x90, 60, 100])];

        // Single block start at i = 0: the event is never reached
        let (_, report) = fx.render(32, &events);
        assert_eq!(report.events_dispatched, 0);

        // Next callback does not see it either
        fx.render(32, &[]);
        assert!(fx.engine.midi_calls().is_empty());
    }

    #[test]
    fn test_each_event_dispatched_once_in_order() {
        let mut fx = Fixture::new();
        let events: Vec<_> = (0..20u8)
            .map(|n| MidiEvent::short(n as u32 * 6, &[0xB0, n, n]))
            .collect();

        let (_, report) = fx.render(160, &events);

        // Block starts at 0, 32, 64, 96, 128: frames < 128 are dispatched
        let expected: Vec<_> = (0..20u8)
            .filter(|&n| (n as usize) * 6 < 128)
            .map(|n| EngineCall::ChannelController(0, n, n))
            .collect();
        assert_eq!(report.events_dispatched, expected.len());
        assert_eq!(fx.engine.midi_calls(), expected);
    }

    #[test]
    fn test_transport_once_per_block() {
        let mut fx = Fixture::new();
        fx.render(96, &[]);

        assert_eq!(fx.engine.times.len(), 3);
        let step = TransportSync::quarters_per_block(120.0, SAMPLE_RATE);
        for (n, time) in fx.engine.times.iter().enumerate() {
            assert_eq!(time.tempo, 120.0);
            assert!((time.ppq_position - step * (n + 1) as f64).abs() < 1e-12);
        }
    }

    #[test]
    fn test_parameters_applied_at_block_start() {
        let mut fx = Fixture::new();
        fx.render(10, &[]);

        fx.parameters.set(0, 0.6);
        fx.render(10, &[]);
        // Still inside block 1: not applied yet
        assert!(!fx
            .engine
            .calls
            .contains(&EngineCall::SetParameter(1, 0.6, true)));

        fx.render(20, &[]);
        let set_at = fx
            .engine
            .calls
            .iter()
            .position(|c| *c == EngineCall::SetParameter(1, 0.6, true))
            .expect("parameter applied at the wrap");
        assert_eq!(fx.engine.calls[set_at + 1], EngineCall::Process);
        assert_eq!(fx.parameters.get(0), 0.6);
    }

    #[test]
    fn test_program_change_mirrors_into_slots() {
        let mut fx = Fixture::new();
        fx.engine.program_change_value = Some(0.33);
        let events = [MidiEvent::short(0, &[0xC0, 1])];

        fx.render(64, &events);
        assert_eq!(fx.parameters.get(0), 0.33);
    }

    #[test]
    fn test_frames_clamped_to_shortest_buffer() {
        let mut fx = Fixture::new();
        let mut long = vec![0.0; 64];
        let mut short = vec![0.0; 40];
        let position = TimePosition::stopped();
        let mut outputs = [long.as_mut_slice(), short.as_mut_slice()];

        let report = fx.renderer.render(
            &mut fx.engine,
            &fx.parameters,
            &mut outputs,
            &RenderContext {
                frames: 64,
                events: &[],
                position: &position,
                sample_rate: SAMPLE_RATE,
            },
        );
        assert_eq!(report.frames_rendered, 40);
        assert_eq!(fx.renderer.block_position(), 8);
        assert_eq!(long[40], 0.0);
    }

    #[test]
    fn test_extra_host_channels_untouched() {
        let mut fx = Fixture::new();
        let mut a = vec![0.0; 32];
        let mut b = vec![0.0; 32];
        let mut c = vec![-1.0; 32];
        let position = TimePosition::stopped();
        let mut outputs: [&mut [f32]; 3] = [&mut a, &mut b, &mut c];

        fx.renderer.render(
            &mut fx.engine,
            &fx.parameters,
            &mut outputs,
            &RenderContext {
                frames: 32,
                events: &[],
                position: &position,
                sample_rate: SAMPLE_RATE,
            },
        );
        assert!(c.iter().all(|&s| s == -1.0));
        assert_eq!(b[3], TestEngine::expected_sample(1, 1, 3));
    }
}
