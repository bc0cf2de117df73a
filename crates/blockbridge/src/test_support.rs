//! Recording engine and editor doubles shared by the unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use blockbridge_core::{
    Editor, EngineTime, ParameterId, ParameterValue, Rect, SynthEngine, WindowHandle, BLOCK_SIZE,
};

pub const TEST_PARAMETER_COUNT: u32 = 8;
pub const TEST_OUTPUTS: usize = 2;

/// Every engine call that matters for ordering assertions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineCall {
    PlayNote(u8, u8, u8, i32),
    ReleaseNote(u8, u8, u8),
    PitchBend(u8, i32),
    ChannelController(u8, u8, u8),
    ProgramChange(u8, u8),
    ChannelAftertouch(u8, u8),
    PolyAftertouch(u8, u8, u8),
    AllNotesOff,
    SetParameter(ParameterId, ParameterValue, bool),
    Process,
}

/// Engine whose block contents are a pure function of (block, channel, sample).
pub struct TestEngine {
    pub calls: Vec<EngineCall>,
    pub times: Vec<EngineTime>,
    pub blocks_rendered: usize,
    pub sample_rate: f64,
    pub active: bool,
    pub values: Vec<ParameterValue>,
    /// When set, a program change rewrites internal parameter 1 to this value.
    pub program_change_value: Option<ParameterValue>,
    names: Vec<String>,
    outputs: [[f32; BLOCK_SIZE]; TEST_OUTPUTS],
}

impl TestEngine {
    pub fn new() -> Self {
        let internal = (TEST_PARAMETER_COUNT * 2) as usize;
        Self {
            calls: Vec::new(),
            times: Vec::new(),
            blocks_rendered: 0,
            sample_rate: 0.0,
            active: false,
            values: (0..internal).map(|i| i as f32 / internal as f32).collect(),
            program_change_value: None,
            names: (0..internal).map(|i| format!("Param {i} (%)")).collect(),
            outputs: [[0.0; BLOCK_SIZE]; TEST_OUTPUTS],
        }
    }

    /// Value written to `outputs[channel][sample]` by the `block`-th process call (1-based).
    pub fn expected_sample(block: usize, channel: usize, sample: usize) -> f32 {
        (block * 1000 + channel * 100 + sample) as f32
    }

    pub fn midi_calls(&self) -> Vec<EngineCall> {
        self.calls
            .iter()
            .copied()
            .filter(|c| !matches!(c, EngineCall::Process | EngineCall::SetParameter(..)))
            .collect()
    }
}

impl SynthEngine for TestEngine {
    const PARAMETER_COUNT: u32 = TEST_PARAMETER_COUNT;

    fn process(&mut self) {
        self.blocks_rendered += 1;
        for (channel, buffer) in self.outputs.iter_mut().enumerate() {
            for (sample, out) in buffer.iter_mut().enumerate() {
                *out = Self::expected_sample(self.blocks_rendered, channel, sample);
            }
        }
        self.calls.push(EngineCall::Process);
    }

    fn num_outputs(&self) -> usize {
        TEST_OUTPUTS
    }

    fn output(&self, channel: usize) -> &[f32; BLOCK_SIZE] {
        &self.outputs[channel]
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    fn set_time(&mut self, time: EngineTime) {
        self.times.push(time);
    }

    fn set_audio_processing_active(&mut self, active: bool) {
        self.active = active;
    }

    fn remap_external_api_to_internal_id(&self, host_index: u32) -> ParameterId {
        host_index * 2 + 1
    }

    fn parameter_01(&self, id: ParameterId) -> ParameterValue {
        self.values.get(id as usize).copied().unwrap_or(0.0)
    }

    fn set_parameter_01(&mut self, id: ParameterId, value: ParameterValue, force_immediate: bool) {
        if let Some(slot) = self.values.get_mut(id as usize) {
            *slot = value;
        }
        self.calls.push(EngineCall::SetParameter(id, value, force_immediate));
    }

    fn parameter_name(&self, id: ParameterId) -> &str {
        self.names.get(id as usize).map(String::as_str).unwrap_or("")
    }

    fn play_note(&mut self, channel: u8, note: u8, velocity: u8, detune: i32) {
        self.calls.push(EngineCall::PlayNote(channel, note, velocity, detune));
    }

    fn release_note(&mut self, channel: u8, note: u8, velocity: u8) {
        self.calls.push(EngineCall::ReleaseNote(channel, note, velocity));
    }

    fn pitch_bend(&mut self, channel: u8, value: i32) {
        self.calls.push(EngineCall::PitchBend(channel, value));
    }

    fn channel_controller(&mut self, channel: u8, controller: u8, value: u8) {
        self.calls.push(EngineCall::ChannelController(channel, controller, value));
    }

    fn program_change(&mut self, channel: u8, program: u8) {
        if let Some(value) = self.program_change_value {
            self.values[1] = value;
        }
        self.calls.push(EngineCall::ProgramChange(channel, program));
    }

    fn channel_aftertouch(&mut self, channel: u8, pressure: u8) {
        self.calls.push(EngineCall::ChannelAftertouch(channel, pressure));
    }

    fn poly_aftertouch(&mut self, channel: u8, note: u8, pressure: u8) {
        self.calls.push(EngineCall::PolyAftertouch(channel, note, pressure));
    }

    fn all_notes_off(&mut self) {
        self.calls.push(EngineCall::AllNotesOff);
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorCall {
    Open(WindowHandle),
    Close,
    Idle,
    ParameterChanged(u32, ParameterValue),
    Dropped,
}

/// Editor that logs into a shared list so tests can inspect it after drop.
pub struct TestEditor {
    pub log: Rc<RefCell<Vec<EditorCall>>>,
    pub rect: Option<Rect>,
    pub open_succeeds: bool,
}

impl TestEditor {
    pub fn new(log: Rc<RefCell<Vec<EditorCall>>>) -> Self {
        Self {
            log,
            rect: Some(Rect::new(0, 0, 904, 542)),
            open_succeeds: true,
        }
    }
}

impl Editor for TestEditor {
    fn open(&mut self, parent: WindowHandle) -> bool {
        self.log.borrow_mut().push(EditorCall::Open(parent));
        self.open_succeeds
    }

    fn close(&mut self) {
        self.log.borrow_mut().push(EditorCall::Close);
    }

    fn idle(&mut self) {
        self.log.borrow_mut().push(EditorCall::Idle);
    }

    fn rect(&self) -> Option<Rect> {
        self.rect
    }

    fn parameter_changed(&mut self, index: u32, value: ParameterValue) {
        self.log.borrow_mut().push(EditorCall::ParameterChanged(index, value));
    }
}

impl Drop for TestEditor {
    fn drop(&mut self) {
        self.log.borrow_mut().push(EditorCall::Dropped);
    }
}
