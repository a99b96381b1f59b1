//! Tone synthesizer: plays interaction cues through a lazily acquired output.
//!
//! The synthesizer owns a single [`AudioOutput`] per viewer session. It is
//! opened through an [`AudioBackend`] the first time a cue is emitted and then
//! reused for every cue. If the backend cannot provide an output the
//! synthesizer remembers that and every later cue is a silent no-op; playback
//! failures are likewise swallowed. Nothing here ever blocks or returns an
//! error to the caller.

use std::{cell::RefCell, fmt, rc::Rc};

use log::{debug, trace};
use thiserror::Error;

use baudetail_core::tone::{Cue, ToneDescriptor};

/// Reasons audio cannot be produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio output is unavailable: {0}")]
    Unavailable(String),

    #[error("playback failed: {0}")]
    Playback(String),
}

/// A host audio facility capable of opening an output.
pub trait AudioBackend {
    /// Opens the shared output.
    ///
    /// # Errors
    ///
    /// Returns [`AudioError::Unavailable`] if the environment has no usable
    /// audio (unsupported, blocked by gesture policy, denied permission).
    fn open(&self) -> Result<Box<dyn AudioOutput>, AudioError>;
}

/// An open audio output that plays tone descriptors fire-and-forget.
pub trait AudioOutput {
    /// Starts playing `tone`. Must return without waiting for the tone to end.
    fn play(&mut self, cue: Cue, tone: &ToneDescriptor) -> Result<(), AudioError>;
}

/// Backend for environments without audio; every cue is dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullBackend;

impl AudioBackend for NullBackend {
    fn open(&self) -> Result<Box<dyn AudioOutput>, AudioError> {
        Err(AudioError::Unavailable("no audio backend".to_string()))
    }
}

/// Backend that records played cues in memory.
///
/// Useful for hosts that drive audio elsewhere and for asserting cue
/// emission.
#[derive(Debug, Default, Clone)]
pub struct RecordingBackend {
    played: Rc<RefCell<Vec<Cue>>>,
    opened: Rc<RefCell<usize>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cues played so far, in order.
    pub fn played(&self) -> Vec<Cue> {
        self.played.borrow().clone()
    }

    /// Number of times an output was opened.
    pub fn open_count(&self) -> usize {
        *self.opened.borrow()
    }
}

impl AudioBackend for RecordingBackend {
    fn open(&self) -> Result<Box<dyn AudioOutput>, AudioError> {
        *self.opened.borrow_mut() += 1;
        Ok(Box::new(RecordingOutput {
            played: Rc::clone(&self.played),
        }))
    }
}

struct RecordingOutput {
    played: Rc<RefCell<Vec<Cue>>>,
}

impl AudioOutput for RecordingOutput {
    fn play(&mut self, cue: Cue, _tone: &ToneDescriptor) -> Result<(), AudioError> {
        self.played.borrow_mut().push(cue);
        Ok(())
    }
}

enum OutputState {
    Unopened,
    Open(Box<dyn AudioOutput>),
    Unavailable,
}

/// Emits interaction cues.
pub struct ToneSynthesizer {
    backend: Box<dyn AudioBackend>,
    output: OutputState,
}

impl ToneSynthesizer {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            output: OutputState::Unopened,
        }
    }

    /// Creates a synthesizer that never produces sound.
    pub fn silent() -> Self {
        Self::new(Box::new(NullBackend))
    }

    /// Plays `cue`, opening the output on first use.
    ///
    /// Returns true if the cue was handed to the output.
    pub fn emit(&mut self, cue: Cue) -> bool {
        if matches!(self.output, OutputState::Unopened) {
            self.output = match self.backend.open() {
                Ok(output) => {
                    debug!("Audio output opened");
                    OutputState::Open(output)
                }
                Err(err) => {
                    debug!(err:%; "Audio unavailable, cues disabled");
                    OutputState::Unavailable
                }
            };
        }

        let OutputState::Open(output) = &mut self.output else {
            return false;
        };

        match output.play(cue, &cue.descriptor()) {
            Ok(()) => {
                trace!(cue = cue.name(); "Cue played");
                true
            }
            Err(err) => {
                debug!(cue = cue.name(), err:%; "Cue dropped");
                false
            }
        }
    }

    /// Returns true if an output has been opened and not released.
    pub fn is_open(&self) -> bool {
        matches!(self.output, OutputState::Open(_))
    }

    /// Returns true if opening the output failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self.output, OutputState::Unavailable)
    }

    /// Releases the output. A later cue opens a fresh one.
    pub fn release(&mut self) {
        if matches!(self.output, OutputState::Open(_)) {
            debug!("Audio output released");
        }
        self.output = OutputState::Unopened;
    }
}

impl fmt::Debug for ToneSynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output = match self.output {
            OutputState::Unopened => "unopened",
            OutputState::Open(_) => "open",
            OutputState::Unavailable => "unavailable",
        };
        f.debug_struct("ToneSynthesizer")
            .field("output", &output)
            .finish()
    }
}
