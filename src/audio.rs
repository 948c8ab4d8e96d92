//! Sound cue collaborator
//!
//! The scene never plays audio itself. It asks an injected [`SoundPlayer`]
//! for one-shot effects and background tracks; the host maps those onto
//! whatever mixer it has.

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// A tapped refuse starts flying to the boat
    Collect,
    /// The stage was just cleaned
    Cleaned,
}

/// Audio sink the scene talks to
pub trait SoundPlayer {
    /// Play a one-shot effect
    fn play_effect(&mut self, cue: SoundCue);
    /// Replace the looping background track
    fn play_background(&mut self, track: &str);
    /// Silence the background track
    fn stop_background(&mut self);
}

/// Discards every request
#[derive(Debug, Clone, Copy, Default)]
pub struct MutedSound;

impl SoundPlayer for MutedSound {
    fn play_effect(&mut self, _cue: SoundCue) {}
    fn play_background(&mut self, _track: &str) {}
    fn stop_background(&mut self) {}
}

/// Something the scene asked the sound player to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundEvent {
    Effect(SoundCue),
    Background(String),
    StopBackground,
}

/// Records requests in order. Used by the headless runner and tests.
#[derive(Debug, Clone, Default)]
pub struct SoundLog {
    pub events: Vec<SoundEvent>,
    /// Track currently looping, if any
    pub background: Option<String>,
    muted: bool,
}

impl SoundLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop recording effects (background bookkeeping continues)
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Number of times an effect was played
    pub fn effect_count(&self, cue: SoundCue) -> usize {
        self.events
            .iter()
            .filter(|e| **e == SoundEvent::Effect(cue))
            .count()
    }
}

impl SoundPlayer for SoundLog {
    fn play_effect(&mut self, cue: SoundCue) {
        if self.muted {
            return;
        }
        self.events.push(SoundEvent::Effect(cue));
    }

    fn play_background(&mut self, track: &str) {
        self.background = Some(track.to_string());
        self.events.push(SoundEvent::Background(track.to_string()));
    }

    fn stop_background(&mut self) {
        self.background = None;
        self.events.push(SoundEvent::StopBackground);
    }
}
