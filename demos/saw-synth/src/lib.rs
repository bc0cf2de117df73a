//! Saw Synth - example engine and editor wired through Blockbridge.
//!
//! # Pieces
//!
//! 1. **`SawEngine`** - polyphonic sawtooth engine rendering fixed 32-sample
//!    blocks, implements [`SynthEngine`]
//! 2. **`SawEditor`** - headless editor that only talks to a [`ParameterHandle`],
//!    implements [`Editor`]
//! 3. **`CONFIG`** - static plugin identity
//!
//! # Parameters
//!
//! | Host index | Internal id | Name | Range |
//! |------------|-------------|------|-------|
//! | 0 | 10 | Volume | 0..1 gain |
//! | 1 | 11 | Detune (cents) | -50..+50 cents |
//! | 2 | 20 | Release | 5 ms..2 s |
//!
//! Program changes load one of [`PROGRAMS`]; CC 7 sets the volume. Both
//! show up in host parameter reads after the next block.
//!
//! ```ignore
//! let mut plugin = create_plugin(&CONFIG, 48_000.0, |rate| Ok(SawEngine::new(rate)));
//! let ui = create_ui(&plugin, window, SawEditor::new);
//! ```

use blockbridge::prelude::*;

// =============================================================================
// Plugin Configuration
// =============================================================================

/// Shared plugin identity.
pub static CONFIG: Config = Config::new("Saw Synth", "Bbrg", "saw1")
    .with_description("Polyphonic sawtooth demo engine")
    .with_maker("Blockbridge")
    .with_homepage("https://example.com/blockbridge/saw-synth")
    .with_license("MIT")
    .with_version(0, 1, 0);

/// Simultaneous voices.
const VOICES: usize = 8;

/// Stereo output, both channels carry the same signal.
const OUTPUTS: usize = 2;

/// Pitch bend range in semitones either way.
const BEND_RANGE: f32 = 2.0;

/// Host index to internal id.
const PARAMETER_IDS: [ParameterId; 3] = [VOLUME, DETUNE, RELEASE];

const VOLUME: ParameterId = 10;
const DETUNE: ParameterId = 11;
const RELEASE: ParameterId = 20;

const CC_VOLUME: u8 = 7;

/// Factory programs: `[volume, detune, release]`.
pub const PROGRAMS: [[ParameterValue; 3]; 3] = [
    [0.7, 0.5, 0.3],
    [0.5, 0.65, 0.8],
    [0.9, 0.45, 0.05],
];

// =============================================================================
// Voice Architecture
// =============================================================================

#[derive(Copy, Clone, Default)]
struct SawVoice {
    channel: u8,
    note: u8,
    /// Key is down.
    held: bool,
    velocity: f32,
    /// Envelope output, 0..velocity.
    level: f32,
    /// Oscillator phase (0.0-1.0)
    phase: f32,
}

impl SawVoice {
    fn is_sounding(&self) -> bool {
        self.held || self.level > 1.0e-4
    }

    fn trigger(&mut self, channel: u8, note: u8, velocity: u8) {
        self.channel = channel;
        self.note = note;
        self.held = true;
        self.velocity = velocity as f32 / 127.0;
        // Soft retrigger: keep the current level to avoid clicks
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Polyphonic sawtooth engine.
pub struct SawEngine {
    sample_rate: f64,
    active: bool,
    time: EngineTime,
    voices: [SawVoice; VOICES],
    /// Monotonic counter for oldest-voice stealing.
    ages: [u64; VOICES],
    age: u64,
    bend: f32,
    volume: ParameterValue,
    detune: ParameterValue,
    release: ParameterValue,
    outputs: [[f32; BLOCK_SIZE]; OUTPUTS],
}

impl SawEngine {
    pub fn new(sample_rate: f64) -> Self {
        let [volume, detune, release] = PROGRAMS[0];
        Self {
            sample_rate,
            active: false,
            time: EngineTime::default(),
            voices: [SawVoice::default(); VOICES],
            ages: [0; VOICES],
            age: 0,
            bend: 0.0,
            volume,
            detune,
            release,
            outputs: [[0.0; BLOCK_SIZE]; OUTPUTS],
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Last time pushed by the bridge.
    pub fn time(&self) -> EngineTime {
        self.time
    }

    /// Number of voices still producing sound.
    pub fn sounding_voices(&self) -> usize {
        self.voices.iter().filter(|v| v.is_sounding()).count()
    }

    fn load_program(&mut self, program: u8) {
        let [volume, detune, release] = PROGRAMS[program as usize % PROGRAMS.len()];
        self.volume = volume;
        self.detune = detune;
        self.release = release;
    }

    /// Per-sample multiplier reaching -80 dB over the release time.
    fn release_coefficient(&self) -> f32 {
        let seconds = 0.005 + self.release as f64 * 1.995;
        let samples = (seconds * self.sample_rate).max(1.0);
        (-9.21 / samples).exp() as f32
    }

    fn phase_increment(&self, note: u8) -> f32 {
        let cents = (self.detune - 0.5) * 100.0;
        let semitones = note as f32 - 69.0 + self.bend * BEND_RANGE + cents / 100.0;
        let hz = 440.0 * 2f32.powf(semitones / 12.0);
        (hz as f64 / self.sample_rate) as f32
    }

    fn allocate_voice(&mut self) -> usize {
        if let Some(free) = self.voices.iter().position(|v| !v.is_sounding()) {
            return free;
        }
        self.ages
            .iter()
            .enumerate()
            .min_by_key(|(_, age)| **age)
            .map(|(index, _)| index)
            .unwrap_or(0)
    }
}

impl SynthEngine for SawEngine {
    const PARAMETER_COUNT: u32 = PARAMETER_IDS.len() as u32;

    fn process(&mut self) {
        if !self.active || self.sample_rate <= 0.0 {
            self.outputs = [[0.0; BLOCK_SIZE]; OUTPUTS];
            return;
        }

        let release = self.release_coefficient();
        let attack = 1.0 / (0.002 * self.sample_rate as f32).max(1.0);
        let mut block = [0.0f32; BLOCK_SIZE];

        for index in 0..VOICES {
            let voice = self.voices[index];
            if !voice.is_sounding() {
                continue;
            }
            let increment = self.phase_increment(voice.note);
            let voice = &mut self.voices[index];

            for out in block.iter_mut() {
                if voice.held {
                    voice.level = (voice.level + attack).min(voice.velocity);
                } else {
                    voice.level *= release;
                }
                *out += (2.0 * voice.phase - 1.0) * voice.level;
                voice.phase = (voice.phase + increment).fract();
            }
        }

        let gain = self.volume / VOICES as f32 * 2.0;
        for channel in self.outputs.iter_mut() {
            for (out, sample) in channel.iter_mut().zip(block.iter()) {
                *out = sample * gain;
            }
        }
    }

    fn num_outputs(&self) -> usize {
        OUTPUTS
    }

    fn output(&self, channel: usize) -> &[f32; BLOCK_SIZE] {
        &self.outputs[channel]
    }

    fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    fn set_time(&mut self, time: EngineTime) {
        self.time = time;
    }

    fn set_audio_processing_active(&mut self, active: bool) {
        self.active = active;
    }

    fn remap_external_api_to_internal_id(&self, host_index: u32) -> ParameterId {
        PARAMETER_IDS
            .get(host_index as usize)
            .copied()
            .unwrap_or(ParameterId::MAX)
    }

    fn parameter_01(&self, id: ParameterId) -> ParameterValue {
        match id {
            VOLUME => self.volume,
            DETUNE => self.detune,
            RELEASE => self.release,
            _ => 0.0,
        }
    }

    fn set_parameter_01(&mut self, id: ParameterId, value: ParameterValue, _force_immediate: bool) {
        // No smoothing, every write is immediate
        match id {
            VOLUME => self.volume = value,
            DETUNE => self.detune = value,
            RELEASE => self.release = value,
            _ => {}
        }
    }

    fn parameter_name(&self, id: ParameterId) -> &str {
        match id {
            VOLUME => "Volume",
            DETUNE => "Detune (cents)",
            RELEASE => "Release",
            _ => "",
        }
    }

    fn play_note(&mut self, channel: u8, note: u8, velocity: u8, _detune: i32) {
        let index = self.allocate_voice();
        self.voices[index].trigger(channel, note, velocity);
        self.age += 1;
        self.ages[index] = self.age;
    }

    fn release_note(&mut self, channel: u8, note: u8, _velocity: u8) {
        for voice in self.voices.iter_mut() {
            if voice.held && voice.channel == channel && voice.note == note {
                voice.held = false;
            }
        }
    }

    fn pitch_bend(&mut self, _channel: u8, value: i32) {
        self.bend = value as f32 / 8192.0;
    }

    fn channel_controller(&mut self, _channel: u8, controller: u8, value: u8) {
        if controller == CC_VOLUME {
            self.volume = value as f32 / 127.0;
        }
    }

    fn program_change(&mut self, _channel: u8, program: u8) {
        self.load_program(program);
    }

    fn channel_aftertouch(&mut self, _channel: u8, _pressure: u8) {}

    fn poly_aftertouch(&mut self, _channel: u8, _note: u8, _pressure: u8) {}

    fn all_notes_off(&mut self) {
        for voice in self.voices.iter_mut() {
            *voice = SawVoice::default();
        }
    }
}

// =============================================================================
// Editor
// =============================================================================

/// Headless editor: tracks parameter values and counts redraws.
pub struct SawEditor {
    parameters: ParameterHandle,
    parent: Option<WindowHandle>,
    shown: Vec<ParameterValue>,
    redraws: usize,
}

impl SawEditor {
    /// Editor factory passed to `create_ui`.
    pub fn new(parameters: ParameterHandle) -> BridgeResult<Self> {
        let shown = (0..parameters.count()).map(|i| parameters.get(i)).collect();
        Ok(Self {
            parameters,
            parent: None,
            shown,
            redraws: 0,
        })
    }

    pub fn parent(&self) -> Option<WindowHandle> {
        self.parent
    }

    /// Value currently drawn for a host index.
    pub fn shown(&self, index: u32) -> Option<ParameterValue> {
        self.shown.get(index as usize).copied()
    }

    pub fn redraws(&self) -> usize {
        self.redraws
    }

    /// A knob drag: write through the shared parameter slots.
    pub fn drag(&mut self, index: u32, value: ParameterValue) {
        self.parameters.set(index, value);
        if let Some(shown) = self.shown.get_mut(index as usize) {
            *shown = self.parameters.get(index);
        }
    }
}

impl Editor for SawEditor {
    fn open(&mut self, parent: WindowHandle) -> bool {
        if parent.is_null() {
            return false;
        }
        self.parent = Some(parent);
        true
    }

    fn close(&mut self) {
        self.parent = None;
    }

    fn idle(&mut self) {
        // Pick up changes made by the engine (programs, CCs) or the host
        for (index, shown) in self.shown.iter_mut().enumerate() {
            let value = self.parameters.get(index as u32);
            if value != *shown {
                log::trace!("Redraw parameter {} -> {}", index, value);
                *shown = value;
                self.redraws += 1;
            }
        }
    }

    fn rect(&self) -> Option<Rect> {
        Some(Rect::new(0, 0, 480, 240))
    }

    fn parameter_changed(&mut self, index: u32, value: ParameterValue) {
        if let Some(shown) = self.shown.get_mut(index as usize) {
            *shown = value;
            self.redraws += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RATE: f64 = 48_000.0;

    fn plugin() -> SynthPlugin<SawEngine> {
        let mut plugin = create_plugin(&CONFIG, RATE, |rate| Ok(SawEngine::new(rate)));
        plugin.activate();
        plugin
    }

    fn render(
        plugin: &mut SynthPlugin<SawEngine>,
        frames: usize,
        events: &[MidiEvent<'_>],
    ) -> [Vec<f32>; 2] {
        let mut left = vec![0.0; frames];
        let mut right = vec![0.0; frames];
        plugin.run(
            &[],
            &mut [left.as_mut_slice(), right.as_mut_slice()],
            frames,
            events,
            &TimePosition::playing_at(120.0),
        );
        [left, right]
    }

    #[test]
    fn test_descriptors() {
        let plugin = plugin();
        assert_eq!(plugin.parameter_count(), 3);

        let detune = plugin.parameter_descriptor(1).unwrap();
        assert_eq!(detune.name.as_str(), "Detune (cents)");
        assert_eq!(detune.symbol.as_str(), "Detune__cents_");
        assert_eq!(detune.default_value, PROGRAMS[0][1]);
    }

    #[test]
    fn test_silent_without_notes() {
        let mut plugin = plugin();
        let [left, _] = render(&mut plugin, 256, &[]);
        assert!(left.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_note_renders_audio() {
        let mut plugin = plugin();
        // Drained at the second block start
        let events = [MidiEvent::short(0, &[0x90, 57, 100])];
        let [left, right] = render(&mut plugin, 512, &events);

        assert!(left[..BLOCK_SIZE].iter().all(|&s| s == 0.0));
        assert!(left[BLOCK_SIZE..].iter().any(|&s| s.abs() > 0.01));
        assert_eq!(left, right);
        assert_eq!(plugin.engine().unwrap().sounding_voices(), 1);
    }

    #[test]
    fn test_deactivate_silences() {
        let mut plugin = plugin();
        render(&mut plugin, 128, &[MidiEvent::short(0, &[0x90, 60, 127])]);
        assert_eq!(plugin.engine().unwrap().sounding_voices(), 1);

        plugin.deactivate();
        assert_eq!(plugin.engine().unwrap().sounding_voices(), 0);
        assert!(!plugin.engine().unwrap().is_active());
    }

    #[test]
    fn test_note_off_releases() {
        let mut plugin = plugin();
        plugin.set_parameter_value(2, 0.0);
        render(&mut plugin, 64, &[MidiEvent::short(0, &[0x90, 60, 127])]);
        render(&mut plugin, 64, &[MidiEvent::short(0, &[0x80, 60, 0])]);

        // Shortest release is 5 ms
        render(&mut plugin, 4_800, &[]);
        assert_eq!(plugin.engine().unwrap().sounding_voices(), 0);
    }

    #[test]
    fn test_voice_stealing() {
        let mut plugin = plugin();
        let events: Vec<_> = (0..VOICES as u8 + 2)
            .map(|n| MidiEvent::short(0, &[0x90, 48 + n, 100]))
            .collect();
        render(&mut plugin, 64, &events);
        assert_eq!(plugin.engine().unwrap().sounding_voices(), VOICES);
    }

    #[test]
    fn test_program_change_reaches_host() {
        let mut plugin = plugin();
        render(&mut plugin, 64, &[MidiEvent::short(0, &[0xC0, 1])]);

        assert_eq!(plugin.parameter_value(0), PROGRAMS[1][0]);
        assert_eq!(plugin.parameter_value(2), PROGRAMS[1][2]);
    }

    #[test]
    fn test_transport_reaches_engine() {
        let mut plugin = plugin();
        render(&mut plugin, 96, &[]);
        let time = plugin.engine().unwrap().time();
        assert_eq!(time.tempo, 120.0);
        assert!(time.ppq_position > 0.0);
    }

    #[test]
    fn test_editor_round_trip() {
        let mut plugin = plugin();
        let mut ui = create_ui(&plugin, WindowHandle::new(0x42), SawEditor::new);
        assert_eq!(ui.size(), Some(Size::new(480, 240)));

        ui.set_visible(true);
        assert_eq!(ui.state(), EditorState::Open);
        assert_eq!(ui.editor().unwrap().parent(), Some(WindowHandle::new(0x42)));

        // Engine-side change shows up on the next idle
        render(&mut plugin, 64, &[MidiEvent::short(0, &[0xB0, CC_VOLUME, 0])]);
        ui.idle();
        assert_eq!(ui.editor().unwrap().shown(0), Some(0.0));
        assert_eq!(ui.editor().unwrap().redraws(), 1);

        ui.set_visible(false);
        assert_eq!(ui.editor().unwrap().parent(), None);
    }

    #[test]
    fn test_editor_refuses_null_window() {
        let plugin = plugin();
        let mut ui = create_ui(&plugin, WindowHandle::new(0), SawEditor::new);
        ui.set_visible(true);
        assert_eq!(ui.state(), EditorState::Closed);
    }

    #[test]
    fn test_editor_drag_reaches_engine() {
        let mut plugin = plugin();
        let handle = plugin.parameter_handle().unwrap();
        let mut editor = SawEditor::new(handle).unwrap();

        editor.drag(0, 0.25);
        assert_eq!(editor.shown(0), Some(0.25));
        render(&mut plugin, 32, &[]);
        assert_eq!(plugin.engine().unwrap().parameter_01(VOLUME), 0.25);
    }
}
