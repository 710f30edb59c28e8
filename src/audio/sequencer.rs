//! Session-gated music scheduler
//!
//! A pass of a track is turned into voices with absolute start times on the
//! output clock, all computed from a single reference "now". The sequencer
//! never sleeps: anything that must happen later (the debounced start, the
//! loop re-arm) is returned as a [`TimerRequest`] for the host to fire through
//! [`Sequencer::wake`]. Each request carries the session it was issued in;
//! stopping or switching tracks bumps the session, so stale requests become
//! no-ops instead of double-scheduling.

use super::tracks::{Note, Track, VoiceMix};
use super::{AudioOutput, Instrument, MixLevels, SoundCue, TrackId, Voice};

/// Lead time between "now" and the first scheduled voice (seconds)
pub const SCHEDULE_LEAD_SECS: f64 = 0.1;
/// Delay before a requested track actually starts (ms)
pub const START_DEBOUNCE_MS: f64 = 50.0;
/// The next pass is scheduled this long before the current one ends (ms)
pub const LOOP_REARM_EARLY_MS: f64 = 100.0;

/// What a timer does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WakeAction {
    /// Begin playing a track after the debounce
    Start(TrackId),
    /// Schedule the next pass of the current track
    Loop(TrackId),
}

/// A deferred call into the sequencer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerRequest {
    pub delay_ms: f64,
    pub session: u64,
    pub action: WakeAction,
}

pub struct Sequencer<O: AudioOutput> {
    output: O,
    session: u64,
    playing: bool,
    current: Option<TrackId>,
    timers: Vec<TimerRequest>,
}

impl<O: AudioOutput> Sequencer<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            session: 0,
            playing: false,
            current: None,
            timers: Vec::new(),
        }
    }

    /// Current play session; bumped on every stop and track request
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn current_track(&self) -> Option<TrackId> {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// Timers issued since the last drain
    pub fn pending_timers(&self) -> &[TimerRequest] {
        &self.timers
    }

    /// Hand all issued timers to the host
    pub fn drain_timers(&mut self) -> Vec<TimerRequest> {
        std::mem::take(&mut self.timers)
    }

    /// Stop immediately
    ///
    /// Invalidates every outstanding timer and tears down the music bus so
    /// voices already queued on the output are cut. Idempotent.
    pub fn stop(&mut self) {
        self.session += 1;
        self.playing = false;
        self.current = None;
        self.timers.clear();
        self.output.rebuild_music_bus();
        log::debug!("music stopped (session {})", self.session);
    }

    /// Stop whatever is playing and start `track` after a short debounce
    ///
    /// A second request within the debounce window supersedes the first.
    pub fn play_track(&mut self, track: TrackId) {
        self.stop();
        self.session += 1;
        self.timers.push(TimerRequest {
            delay_ms: START_DEBOUNCE_MS,
            session: self.session,
            action: WakeAction::Start(track),
        });
        log::debug!("track {track:?} requested (session {})", self.session);
    }

    /// Fire a timer previously returned by [`Sequencer::drain_timers`]
    ///
    /// Returns whether the request was still current.
    pub fn wake(&mut self, request: TimerRequest) -> bool {
        if request.session != self.session {
            return false;
        }
        match request.action {
            WakeAction::Start(track) => {
                self.playing = true;
                self.current = Some(track);
                self.schedule_pass(track);
                true
            }
            WakeAction::Loop(track) => {
                if !self.playing || self.current != Some(track) {
                    return false;
                }
                self.schedule_pass(track);
                true
            }
        }
    }

    pub fn play_cue(&mut self, cue: SoundCue) {
        self.output.play_cue(cue);
    }

    pub fn set_mix(&mut self, mix: &MixLevels) {
        self.output.set_mix(mix);
    }

    /// Schedule one full pass of `id` and arm the loop
    fn schedule_pass(&mut self, id: TrackId) {
        let track = Track::get(id);
        let now = self.output.now() + SCHEDULE_LEAD_SECS;

        for voice in pass_voices(track, now) {
            self.output.schedule(&voice);
        }

        self.timers.push(TimerRequest {
            delay_ms: track.loop_secs() * 1000.0 - LOOP_REARM_EARLY_MS,
            session: self.session,
            action: WakeAction::Loop(id),
        });
    }
}

/// Every voice of one pass, starting at `now` (seconds)
pub fn pass_voices(track: &Track, now: f64) -> Vec<Voice> {
    let beat = track.beat_secs();
    let mut voices = Vec::new();

    line_voices(&mut voices, track, track.melody, Instrument::Lead, track.lead, now);
    line_voices(&mut voices, track, track.bass, Instrument::Bass, track.bass_mix, now);

    let step = beat / 2.0;
    for bar in 0..track.bars() {
        for (i, pitch) in track.arpeggio.iter().enumerate() {
            let octave = if i % 2 == 0 { 4 } else { 5 };
            voices.push(Voice {
                instrument: Instrument::Arp,
                freq: pitch.freq(octave),
                start: now + (bar as usize * 8 + i) as f64 * step,
                duration: step * track.arp_mix.gate as f64,
                volume: track.arp_mix.volume,
            });
        }

        let bar_start = now + bar as f64 * 4.0 * beat;
        for hit in track.drums.bar(bar) {
            voices.push(Voice {
                instrument: hit.instrument,
                freq: hit.freq,
                start: bar_start + hit.beat as f64 * beat,
                duration: 0.0,
                volume: hit.volume,
            });
        }
    }

    voices
}

/// Lay a note line end to end, repeating it until the pass is full
fn line_voices(
    out: &mut Vec<Voice>,
    track: &Track,
    notes: &[Note],
    instrument: Instrument,
    mix: VoiceMix,
    now: f64,
) {
    let line_beats: f32 = notes.iter().map(|n| n.beats).sum();
    if line_beats <= 0.0 {
        return;
    }

    let beat = track.beat_secs();
    let mut time = 0.0f32;
    for note in notes.iter().cycle() {
        if time >= track.loop_beats {
            break;
        }
        out.push(Voice {
            instrument,
            freq: note.pitch.freq(note.octave),
            start: now + time as f64 * beat,
            duration: note.beats as f64 * beat * mix.gate as f64,
            volume: mix.volume,
        });
        time += note.beats;
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Output with a virtual clock that records what would have sounded
    ///
    /// Voices are tagged with the music bus generation they were scheduled
    /// on. Rebuilding the bus drops every not-yet-sounded voice of the old
    /// generation, as disconnecting a real gain node does.
    #[derive(Debug, Default)]
    pub struct RecordingOutput {
        pub time: f64,
        pub generation: u32,
        pub pending: Vec<(u32, Voice)>,
        pub sounded: Vec<(u32, Voice)>,
        pub cues: Vec<SoundCue>,
        pub mix: Option<MixLevels>,
    }

    impl RecordingOutput {
        /// Move the clock forward, sounding every voice that has started
        pub fn advance_to(&mut self, time: f64) {
            self.time = time;
            let (due, rest): (Vec<_>, Vec<_>) =
                self.pending.drain(..).partition(|(_, v)| v.start <= time);
            self.sounded.extend(due);
            self.pending = rest;
        }
    }

    impl AudioOutput for RecordingOutput {
        fn now(&self) -> f64 {
            self.time
        }

        fn schedule(&mut self, voice: &Voice) {
            self.pending.push((self.generation, *voice));
        }

        fn rebuild_music_bus(&mut self) {
            let old = self.generation;
            self.pending.retain(|(generation, _)| *generation != old);
            self.generation += 1;
        }

        fn play_cue(&mut self, cue: SoundCue) {
            self.cues.push(cue);
        }

        fn set_mix(&mut self, mix: &MixLevels) {
            self.mix = Some(*mix);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingOutput;
    use super::*;

    fn start(seq: &mut Sequencer<RecordingOutput>, track: TrackId) {
        seq.play_track(track);
        for timer in seq.drain_timers() {
            seq.wake(timer);
        }
    }

    #[test]
    fn test_start_is_debounced() {
        let mut seq = Sequencer::new(RecordingOutput::default());
        seq.play_track(TrackId::NeonFuneral);
        assert!(seq.output().pending.is_empty());
        assert!(!seq.is_playing());

        let timers = seq.drain_timers();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[0].delay_ms, START_DEBOUNCE_MS);
        assert!(seq.wake(timers[0]));
        assert!(seq.is_playing());
        assert_eq!(seq.current_track(), Some(TrackId::NeonFuneral));
        assert!(!seq.output().pending.is_empty());
    }

    #[test]
    fn test_start_times_accumulate_from_one_reference() {
        let mut output = RecordingOutput::default();
        output.time = 10.0;
        let mut seq = Sequencer::new(output);
        start(&mut seq, TrackId::BrokenStatic);

        let track = Track::get(TrackId::BrokenStatic);
        let beat = track.beat_secs();
        let leads: Vec<f64> = seq
            .output()
            .pending
            .iter()
            .filter(|(_, v)| v.instrument == Instrument::Lead)
            .map(|(_, v)| v.start)
            .collect();
        let origin = 10.0 + SCHEDULE_LEAD_SECS;
        assert!((leads[0] - origin).abs() < 1e-9);
        // D D F: 1 beat, 1 beat
        assert!((leads[1] - (origin + beat)).abs() < 1e-9);
        assert!((leads[2] - (origin + 2.0 * beat)).abs() < 1e-9);
    }

    #[test]
    fn test_loop_rearms_before_pass_ends() {
        let mut seq = Sequencer::new(RecordingOutput::default());
        start(&mut seq, TrackId::NeonFuneral);
        let timers = seq.drain_timers();
        assert_eq!(timers.len(), 1);
        let expected = Track::get(TrackId::NeonFuneral).loop_secs() * 1000.0 - LOOP_REARM_EARLY_MS;
        assert!((timers[0].delay_ms - expected).abs() < 1e-6);
        assert_eq!(timers[0].action, WakeAction::Loop(TrackId::NeonFuneral));

        let before = seq.output().pending.len();
        assert!(seq.wake(timers[0]));
        assert_eq!(seq.output().pending.len(), before * 2);
    }

    #[test]
    fn test_stale_loop_is_a_no_op() {
        let mut seq = Sequencer::new(RecordingOutput::default());
        start(&mut seq, TrackId::NeonFuneral);
        let stale = seq.drain_timers();
        seq.stop();
        let pending = seq.output().pending.len();
        assert!(!seq.wake(stale[0]));
        assert_eq!(seq.output().pending.len(), pending);
    }

    #[test]
    fn test_newer_request_supersedes_in_flight_start() {
        let mut seq = Sequencer::new(RecordingOutput::default());
        seq.play_track(TrackId::NeonFuneral);
        let first = seq.drain_timers();
        seq.play_track(TrackId::DigitalHeartbreak);
        let second = seq.drain_timers();

        assert!(!seq.wake(first[0]));
        assert!(seq.wake(second[0]));
        assert_eq!(seq.current_track(), Some(TrackId::DigitalHeartbreak));
    }

    #[test]
    fn test_stop_then_switch_silences_old_track() {
        let mut seq = Sequencer::new(RecordingOutput::default());
        start(&mut seq, TrackId::NeonFuneral);
        let old_loop = seq.drain_timers();
        let old_generation = seq.output().generation;

        // A couple of seconds in, most of the pass is still queued
        seq.output_mut().advance_to(2.0);
        let sounded_before_stop = seq.output().sounded.len();
        assert!(sounded_before_stop > 0);
        assert!(!seq.output().pending.is_empty());

        seq.stop();
        start(&mut seq, TrackId::BrokenStatic);
        // The old loop timer fires late; it must not schedule anything
        assert!(!seq.wake(old_loop[0]));

        seq.output_mut().advance_to(1_000.0);
        let old_after_stop = seq
            .output()
            .sounded
            .iter()
            .skip(sounded_before_stop)
            .filter(|(generation, _)| *generation == old_generation)
            .count();
        assert_eq!(old_after_stop, 0);
        assert!(seq.output().sounded.len() > sounded_before_stop);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let mut seq = Sequencer::new(RecordingOutput::default());
        seq.stop();
        seq.stop();
        assert!(!seq.is_playing());
        assert!(seq.current_track().is_none());
        assert!(seq.pending_timers().is_empty());
    }

    #[test]
    fn test_pass_fills_loop_length() {
        let track = Track::get(TrackId::GameOver);
        let voices = pass_voices(track, 0.0);
        let end = track.loop_secs();
        assert!(voices.iter().all(|v| v.start < end));
        let arps = voices.iter().filter(|v| v.instrument == Instrument::Arp).count();
        assert_eq!(arps, track.bars() as usize * 8);
    }
}
