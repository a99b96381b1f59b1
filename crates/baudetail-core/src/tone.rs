//! Procedural audio cue descriptors.
//!
//! Each interaction cue is described as one or more sine [`Voice`]s, each with
//! a frequency envelope and an exponentially decaying gain envelope. A
//! descriptor is pure data: hosts realize it through their own audio facility,
//! or render it to PCM samples with [`ToneDescriptor::render`].
//!
//! | cue | voices |
//! |---|---|
//! | [`Cue::Hover`] | 2400 → 1800 Hz over 50 ms, gain 0.03 → 0 |
//! | [`Cue::Click`] | 800 → 400 Hz over 80 ms, gain 0.08 → 0 over 100 ms |
//! | [`Cue::Select`] | 600 Hz for 80 ms, then 900 Hz from 60 ms for 90 ms |
//! | [`Cue::Error`] | 200 Hz stepping to 150 Hz at 100 ms, gain 0.06 → 0 over 200 ms |

use std::{f32::consts::TAU, fmt};

/// Gain value an exponential decay ramps down to. Exponential ramps cannot
/// reach zero, so "silent" is this floor.
pub const SILENCE: f32 = 0.001;

/// An interaction cue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    Hover,
    Click,
    Select,
    Error,
}

impl Cue {
    pub const ALL: [Self; 4] = [Self::Hover, Self::Click, Self::Select, Self::Error];

    pub fn name(self) -> &'static str {
        match self {
            Self::Hover => "hover",
            Self::Click => "click",
            Self::Select => "select",
            Self::Error => "error",
        }
    }

    /// Returns the tone played for this cue.
    pub fn descriptor(self) -> ToneDescriptor {
        match self {
            Self::Hover => ToneDescriptor::new(vec![Voice::new(
                0.0,
                0.05,
                FrequencyEnvelope::exponential(2400.0, 1800.0, 0.05),
                GainEnvelope::new(0.03, 0.05),
            )]),
            Self::Click => ToneDescriptor::new(vec![Voice::new(
                0.0,
                0.1,
                FrequencyEnvelope::exponential(800.0, 400.0, 0.08),
                GainEnvelope::new(0.08, 0.1),
            )]),
            Self::Select => ToneDescriptor::new(vec![
                Voice::new(
                    0.0,
                    0.08,
                    FrequencyEnvelope::constant(600.0),
                    GainEnvelope::new(0.06, 0.08),
                ),
                Voice::new(
                    0.06,
                    0.09,
                    FrequencyEnvelope::constant(900.0),
                    GainEnvelope::new(0.06, 0.09),
                ),
            ]),
            Self::Error => ToneDescriptor::new(vec![Voice::new(
                0.0,
                0.2,
                FrequencyEnvelope::step(200.0, 150.0, 0.1),
                GainEnvelope::new(0.06, 0.2),
            )]),
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the frequency moves from its start to its end value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ramp {
    /// Exponential glide, reaching the end value at the ramp time.
    Exponential,
    /// Holds the start value, then jumps to the end value at the ramp time.
    Step,
}

/// Frequency over time for one voice, in Hz and seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyEnvelope {
    start_hz: f32,
    end_hz: f32,
    ramp: Ramp,
    ramp_secs: f32,
}

impl FrequencyEnvelope {
    pub fn exponential(start_hz: f32, end_hz: f32, ramp_secs: f32) -> Self {
        Self {
            start_hz,
            end_hz,
            ramp: Ramp::Exponential,
            ramp_secs,
        }
    }

    pub fn step(start_hz: f32, end_hz: f32, at_secs: f32) -> Self {
        Self {
            start_hz,
            end_hz,
            ramp: Ramp::Step,
            ramp_secs: at_secs,
        }
    }

    pub fn constant(hz: f32) -> Self {
        Self::step(hz, hz, 0.0)
    }

    pub fn start_hz(&self) -> f32 {
        self.start_hz
    }

    pub fn end_hz(&self) -> f32 {
        self.end_hz
    }

    pub fn ramp(&self) -> Ramp {
        self.ramp
    }

    pub fn ramp_secs(&self) -> f32 {
        self.ramp_secs
    }

    /// Frequency at `t` seconds after the voice starts.
    pub fn at(&self, t: f32) -> f32 {
        match self.ramp {
            Ramp::Step if t < self.ramp_secs => self.start_hz,
            Ramp::Step => self.end_hz,
            Ramp::Exponential => exponential_at(self.start_hz, self.end_hz, self.ramp_secs, t),
        }
    }
}

/// Gain over time for one voice: starts at `peak` and decays exponentially to
/// [`SILENCE`] over `decay_secs`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainEnvelope {
    peak: f32,
    decay_secs: f32,
}

impl GainEnvelope {
    pub fn new(peak: f32, decay_secs: f32) -> Self {
        Self { peak, decay_secs }
    }

    pub fn peak(&self) -> f32 {
        self.peak
    }

    pub fn decay_secs(&self) -> f32 {
        self.decay_secs
    }

    /// Gain at `t` seconds after the voice starts.
    pub fn at(&self, t: f32) -> f32 {
        exponential_at(self.peak, SILENCE, self.decay_secs, t)
    }
}

fn exponential_at(from: f32, to: f32, secs: f32, t: f32) -> f32 {
    if t <= 0.0 {
        return from;
    }
    if secs <= 0.0 || t >= secs || from <= 0.0 || to <= 0.0 {
        return to;
    }
    from * (to / from).powf(t / secs)
}

/// A single sine oscillator within a tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    offset_secs: f32,
    duration_secs: f32,
    frequency: FrequencyEnvelope,
    gain: GainEnvelope,
}

impl Voice {
    pub fn new(
        offset_secs: f32,
        duration_secs: f32,
        frequency: FrequencyEnvelope,
        gain: GainEnvelope,
    ) -> Self {
        Self {
            offset_secs,
            duration_secs,
            frequency,
            gain,
        }
    }

    /// Start time relative to the beginning of the tone.
    pub fn offset_secs(&self) -> f32 {
        self.offset_secs
    }

    pub fn duration_secs(&self) -> f32 {
        self.duration_secs
    }

    pub fn end_secs(&self) -> f32 {
        self.offset_secs + self.duration_secs
    }

    pub fn frequency(&self) -> &FrequencyEnvelope {
        &self.frequency
    }

    pub fn gain(&self) -> &GainEnvelope {
        &self.gain
    }
}

/// A complete procedural tone: the sum of its voices.
#[derive(Debug, Clone, PartialEq)]
pub struct ToneDescriptor {
    voices: Vec<Voice>,
}

impl ToneDescriptor {
    pub fn new(voices: Vec<Voice>) -> Self {
        Self { voices }
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Total length of the tone in seconds.
    pub fn duration_secs(&self) -> f32 {
        self.voices
            .iter()
            .map(Voice::end_secs)
            .fold(0.0, f32::max)
    }

    /// Renders the tone into mono PCM samples in `[-1, 1]`.
    ///
    /// ```
    /// use baudetail_core::tone::Cue;
    ///
    /// let samples = Cue::Hover.descriptor().render(48_000);
    /// assert_eq!(samples.len(), 2_400);
    /// ```
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let len = (self.duration_secs() * rate).round() as usize;
        let mut samples = vec![0.0f32; len];

        for voice in &self.voices {
            let first = (voice.offset_secs * rate).round() as usize;
            let last = ((voice.end_secs() * rate).round() as usize).min(len);
            let mut phase = 0.0f32;
            for (i, sample) in samples.iter_mut().enumerate().take(last).skip(first) {
                let t = (i - first) as f32 / rate;
                *sample += phase.sin() * voice.gain.at(t);
                phase = (phase + TAU * voice.frequency.at(t) / rate) % TAU;
            }
        }

        samples
    }
}
