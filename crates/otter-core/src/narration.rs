//! Typewriter narration synchronised loosely with a voice-over clip.
//!
//! Text is revealed one character per `delay`, the first one immediately.
//! The audio clip plays on its own clock; completion waits for whichever of
//! the two finishes last and is reported exactly once.

use std::time::Duration;

use crate::constants::NARRATION_CHAR_DELAY_MS;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioState {
    /// No clip for this narration.
    None,
    /// Clip handed to the front-end, playback not yet confirmed.
    Requested,
    Playing,
    Ended,
    /// Playback refused (autoplay policy) or errored. Treated as ended.
    Failed,
}

impl AudioState {
    #[inline]
    pub fn is_done(self) -> bool {
        matches!(self, AudioState::None | AudioState::Ended | AudioState::Failed)
    }
}

/// What one [`NarrationSequencer::tick`] produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NarrationStep {
    pub revealed: bool,
    pub completed: bool,
}

#[derive(Clone, Debug)]
pub struct NarrationSequencer {
    chars: Vec<char>,
    revealed: usize,
    delay: Duration,
    since_reveal: Duration,
    audio: AudioState,
    started: bool,
    completed: bool,
    reveal_steps: usize,
}

impl Default for NarrationSequencer {
    fn default() -> Self {
        Self::new(Duration::from_millis(NARRATION_CHAR_DELAY_MS))
    }
}

impl NarrationSequencer {
    pub fn new(delay: Duration) -> Self {
        Self {
            chars: Vec::new(),
            revealed: 0,
            delay,
            since_reveal: Duration::ZERO,
            audio: AudioState::None,
            started: false,
            completed: false,
            reveal_steps: 0,
        }
    }

    /// Start (or restart) a narration. Reveals the first character right away.
    /// With `with_audio` the front-end is expected to start the page's
    /// voice-over clip and report back through the `audio_*` methods.
    pub fn play(&mut self, text: &str, with_audio: bool) {
        self.chars = text.chars().collect();
        self.revealed = 0;
        self.reveal_steps = 0;
        self.since_reveal = Duration::ZERO;
        self.audio = if with_audio {
            AudioState::Requested
        } else {
            AudioState::None
        };
        self.started = true;
        self.completed = false;
        if !self.chars.is_empty() {
            self.reveal_one();
        }
        log::debug!("[narration] play {} chars, audio={}", self.chars.len(), with_audio);
    }

    /// Drop the current narration entirely.
    pub fn stop(&mut self) {
        *self = Self::new(self.delay);
    }

    fn reveal_one(&mut self) {
        self.revealed += 1;
        self.reveal_steps += 1;
        self.since_reveal = Duration::ZERO;
    }

    pub fn tick(&mut self, dt: Duration) -> NarrationStep {
        let mut step = NarrationStep::default();
        if !self.started || self.completed {
            return step;
        }
        if self.revealed < self.chars.len() {
            self.since_reveal += dt;
            if self.since_reveal >= self.delay {
                self.reveal_one();
                step.revealed = true;
            }
        }
        step.completed = self.check_complete();
        step
    }

    fn check_complete(&mut self) -> bool {
        if self.completed || !self.started {
            return false;
        }
        if self.text_done() && self.audio.is_done() {
            self.completed = true;
            log::debug!("[narration] complete");
            return true;
        }
        false
    }

    pub fn audio_started(&mut self) {
        if self.audio == AudioState::Requested {
            self.audio = AudioState::Playing;
        }
    }

    pub fn audio_ended(&mut self) {
        if matches!(self.audio, AudioState::Requested | AudioState::Playing) {
            self.audio = AudioState::Ended;
        }
    }

    pub fn audio_failed(&mut self) {
        if matches!(self.audio, AudioState::Requested | AudioState::Playing) {
            log::warn!("[narration] audio playback refused, continuing with text only");
            self.audio = AudioState::Failed;
        }
    }

    pub fn audio_state(&self) -> AudioState {
        self.audio
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn text_done(&self) -> bool {
        self.revealed >= self.chars.len()
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    pub fn reveal_steps(&self) -> usize {
        self.reveal_steps
    }

    pub fn revealed_text(&self) -> String {
        self.chars[..self.revealed.min(self.chars.len())].iter().collect()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}
