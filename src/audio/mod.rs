//! Audio: one-shot cues and the procedural chiptune sequencer
//!
//! The simulation never talks to an audio device. It queues [`GameEvent`]s,
//! and [`route_events`] forwards them to a [`Sequencer`] that owns the output.
//! Every backend call is fire-and-forget: a missing or failing backend only
//! means silence.

pub mod drums;
pub mod sequencer;
pub mod tracks;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use sequencer::{Sequencer, TimerRequest, WakeAction};
pub use tracks::{Pitch, Track};

use crate::sim::GameEvent;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Player flapped
    Flap,
    /// Passed a razor
    Score,
    /// Terminal collision
    Death,
    /// New personal best at game over
    HighScore,
    /// UI button press
    Click,
}

/// Music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackId {
    /// A minor, 110 BPM
    NeonFuneral,
    /// E minor, 95 BPM half-time
    DigitalHeartbreak,
    /// D minor, 125 BPM punk; doubles as the menu theme
    BrokenStatic,
    /// D minor, 100 BPM heavy
    GameOver,
}

impl TrackId {
    /// Tracks eligible for in-game music
    pub const GAMEPLAY: [TrackId; 3] = [
        TrackId::NeonFuneral,
        TrackId::DigitalHeartbreak,
        TrackId::BrokenStatic,
    ];

    /// Start screen theme
    pub const MENU: TrackId = TrackId::BrokenStatic;
}

/// Synth voice used for a scheduled note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instrument {
    /// Square lead
    Lead,
    /// Sine sub plus triangle punch an octave up
    Bass,
    /// Short sawtooth
    Arp,
    Kick,
    Snare,
    HiHat,
    OpenHat,
    Crash,
    /// Pitched tom; frequency falls by an octave
    Tom,
}

/// A sound scheduled at an absolute time on the output's clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub instrument: Instrument,
    /// Hz; ignored by unpitched percussion
    pub freq: f32,
    /// Seconds on the output clock
    pub start: f64,
    /// Seconds
    pub duration: f64,
    pub volume: f32,
}

/// Gain levels applied to the output buses
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixLevels {
    pub master: f32,
    pub music: f32,
    pub sfx: f32,
    pub muted: bool,
}

impl Default for MixLevels {
    fn default() -> Self {
        Self {
            master: 0.4,
            music: 0.5,
            sfx: 0.7,
            muted: false,
        }
    }
}

impl MixLevels {
    /// Master gain after mute
    pub fn effective_master(&self) -> f32 {
        if self.muted { 0.0 } else { self.master.clamp(0.0, 1.0) }
    }
}

/// Sound output owned by the sequencer
///
/// Music voices go to a replaceable music bus; cues go to a separate effects
/// bus that survives music teardown.
pub trait AudioOutput {
    /// Current time on the output clock (seconds)
    fn now(&self) -> f64;

    /// Queue a music voice at its absolute start time
    fn schedule(&mut self, voice: &Voice);

    /// Disconnect the music bus and replace it, cutting every voice that was
    /// scheduled on the old one
    fn rebuild_music_bus(&mut self);

    /// Play a one-shot effect immediately
    fn play_cue(&mut self, cue: SoundCue);

    fn set_mix(&mut self, mix: &MixLevels);
}

/// Forward the simulation's audio requests to the sequencer
pub fn route_events<'a, O, I>(events: I, sequencer: &mut Sequencer<O>)
where
    O: AudioOutput,
    I: IntoIterator<Item = &'a GameEvent>,
{
    for event in events {
        match event {
            GameEvent::Cue(cue) => sequencer.play_cue(*cue),
            GameEvent::PlayTrack(track) => sequencer.play_track(*track),
            GameEvent::StopMusic => sequencer.stop(),
            GameEvent::ShowScore { .. } | GameEvent::RunFinished(_) => {}
        }
    }
}
