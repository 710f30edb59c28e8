//! Note tables for the music tracks
//!
//! Each track is up to three voices (melody, bass, arpeggio) written as
//! (pitch, octave, beats) plus a percussion style. Start times come from
//! accumulating beats, so the tables carry durations only.

use super::drums::DrumStyle;
use super::TrackId;

/// Pitch class; flats and sharps share a frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pitch {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    Bb,
    B,
}

impl Pitch {
    /// Frequency in octave 4 (A4 = 440 Hz)
    fn base_freq(self) -> f32 {
        match self {
            Pitch::C => 261.63,
            Pitch::Cs => 277.18,
            Pitch::D => 293.66,
            Pitch::Ds => 311.13,
            Pitch::E => 329.63,
            Pitch::F => 349.23,
            Pitch::Fs => 369.99,
            Pitch::G => 392.00,
            Pitch::Gs => 415.30,
            Pitch::A => 440.00,
            Pitch::Bb => 466.16,
            Pitch::B => 493.88,
        }
    }

    pub fn freq(self, octave: i32) -> f32 {
        self.base_freq() * 2f32.powi(octave - 4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Note {
    pub pitch: Pitch,
    pub octave: i32,
    pub beats: f32,
}

const fn n(pitch: Pitch, octave: i32, beats: f32) -> Note {
    Note {
        pitch,
        octave,
        beats,
    }
}

/// Volume and gate (fraction of the note length that sounds) per voice
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoiceMix {
    pub volume: f32,
    pub gate: f32,
}

const fn mix(volume: f32, gate: f32) -> VoiceMix {
    VoiceMix { volume, gate }
}

#[derive(Debug, Clone, Copy)]
pub struct Track {
    pub id: TrackId,
    pub tempo: f32,
    pub melody: &'static [Note],
    pub bass: &'static [Note],
    /// Eight 8th-note steps per bar, alternating octave 4 and 5
    pub arpeggio: [Pitch; 8],
    pub drums: DrumStyle,
    pub lead: VoiceMix,
    pub bass_mix: VoiceMix,
    pub arp_mix: VoiceMix,
    /// Length of one pass before the loop re-arms; shorter voices repeat
    /// to fill it
    pub loop_beats: f32,
}

impl Track {
    pub fn get(id: TrackId) -> &'static Track {
        match id {
            TrackId::NeonFuneral => &NEON_FUNERAL,
            TrackId::DigitalHeartbreak => &DIGITAL_HEARTBREAK,
            TrackId::BrokenStatic => &BROKEN_STATIC,
            TrackId::GameOver => &GAME_OVER,
        }
    }

    /// Seconds per beat
    pub fn beat_secs(&self) -> f64 {
        60.0 / self.tempo as f64
    }

    /// Bars of arpeggio and percussion per pass
    pub fn bars(&self) -> u32 {
        (self.loop_beats / 4.0) as u32
    }

    /// Seconds per pass
    pub fn loop_secs(&self) -> f64 {
        self.loop_beats as f64 * self.beat_secs()
    }
}

use Pitch::*;

static NEON_FUNERAL: Track = Track {
    id: TrackId::NeonFuneral,
    tempo: 110.0,
    melody: &[
        n(A, 5, 2.0), n(C, 6, 2.0), n(B, 5, 2.0), n(A, 5, 2.0),
        n(G, 5, 2.0), n(A, 5, 2.0), n(E, 5, 4.0),
        n(A, 5, 2.0), n(C, 6, 2.0), n(B, 5, 2.0), n(A, 5, 2.0),
        n(G, 5, 2.0), n(E, 5, 2.0), n(A, 5, 4.0),
        n(C, 6, 2.0), n(D, 6, 2.0), n(E, 6, 4.0),
        n(D, 6, 2.0), n(C, 6, 2.0), n(B, 5, 4.0),
        n(A, 5, 2.0), n(B, 5, 2.0), n(C, 6, 2.0), n(B, 5, 2.0),
        n(A, 5, 4.0), n(G, 5, 4.0),
        n(E, 6, 2.0), n(D, 6, 2.0), n(C, 6, 4.0),
        n(D, 6, 2.0), n(E, 6, 2.0), n(D, 6, 4.0),
        n(C, 6, 2.0), n(B, 5, 2.0), n(A, 5, 4.0),
        n(B, 5, 2.0), n(C, 6, 2.0), n(A, 5, 4.0),
        n(A, 5, 2.0), n(C, 6, 2.0), n(B, 5, 2.0), n(A, 5, 2.0),
        n(G, 5, 2.0), n(A, 5, 2.0), n(E, 5, 4.0),
        n(A, 5, 2.0), n(G, 5, 2.0), n(E, 5, 4.0),
        n(A, 5, 8.0),
    ],
    bass: &[
        n(A, 2, 4.0), n(A, 2, 4.0), n(F, 2, 4.0), n(F, 2, 4.0),
        n(C, 2, 4.0), n(C, 2, 4.0), n(G, 2, 4.0), n(G, 2, 4.0),
        n(A, 2, 4.0), n(A, 2, 4.0), n(F, 2, 4.0), n(F, 2, 4.0),
        n(C, 2, 4.0), n(C, 2, 4.0), n(G, 2, 4.0), n(G, 2, 4.0),
    ],
    arpeggio: [A, E, A, C, E, A, C, E],
    drums: DrumStyle::Rock,
    lead: mix(0.18, 0.9),
    bass_mix: mix(0.35, 0.95),
    arp_mix: mix(0.08, 0.7),
    loop_beats: 128.0,
};

static DIGITAL_HEARTBREAK: Track = Track {
    id: TrackId::DigitalHeartbreak,
    tempo: 95.0,
    melody: &[
        n(E, 5, 4.0), n(G, 5, 4.0), n(Fs, 5, 4.0), n(E, 5, 4.0),
        n(D, 5, 4.0), n(E, 5, 4.0), n(B, 4, 8.0),
        n(E, 5, 4.0), n(G, 5, 4.0), n(A, 5, 4.0), n(G, 5, 4.0),
        n(Fs, 5, 4.0), n(E, 5, 4.0), n(E, 5, 8.0),
        n(B, 5, 4.0), n(A, 5, 4.0), n(G, 5, 8.0),
        n(A, 5, 4.0), n(B, 5, 4.0), n(A, 5, 8.0),
        n(G, 5, 4.0), n(Fs, 5, 4.0), n(E, 5, 8.0),
        n(Fs, 5, 4.0), n(G, 5, 4.0), n(E, 5, 8.0),
    ],
    bass: &[
        n(E, 2, 8.0), n(C, 2, 8.0), n(D, 2, 8.0), n(B, 1, 8.0),
        n(E, 2, 8.0), n(C, 2, 8.0), n(D, 2, 8.0), n(B, 1, 8.0),
    ],
    arpeggio: [E, B, E, G, B, E, G, B],
    drums: DrumStyle::HalfTime,
    lead: mix(0.15, 0.85),
    bass_mix: mix(0.3, 0.9),
    arp_mix: mix(0.06, 0.6),
    loop_beats: 128.0,
};

static BROKEN_STATIC: Track = Track {
    id: TrackId::BrokenStatic,
    tempo: 125.0,
    melody: &[
        n(D, 5, 1.0), n(D, 5, 1.0), n(F, 5, 2.0), n(G, 5, 2.0), n(A, 5, 2.0),
        n(G, 5, 2.0), n(F, 5, 2.0), n(E, 5, 2.0), n(D, 5, 2.0),
        n(D, 5, 1.0), n(D, 5, 1.0), n(F, 5, 2.0), n(G, 5, 2.0), n(A, 5, 2.0),
        n(Bb, 5, 2.0), n(A, 5, 2.0), n(G, 5, 2.0), n(D, 5, 2.0),
        n(D, 5, 1.0), n(D, 5, 1.0), n(F, 5, 2.0), n(G, 5, 2.0), n(A, 5, 2.0),
        n(G, 5, 2.0), n(F, 5, 2.0), n(E, 5, 2.0), n(D, 5, 2.0),
        n(D, 5, 1.0), n(D, 5, 1.0), n(F, 5, 2.0), n(G, 5, 2.0), n(A, 5, 2.0),
        n(Bb, 5, 2.0), n(A, 5, 2.0), n(G, 5, 2.0), n(D, 5, 2.0),
    ],
    bass: &[
        n(D, 2, 4.0), n(D, 2, 4.0), n(Bb, 1, 4.0), n(Bb, 1, 4.0),
        n(F, 2, 4.0), n(F, 2, 4.0), n(C, 2, 4.0), n(C, 2, 4.0),
        n(D, 2, 4.0), n(D, 2, 4.0), n(Bb, 1, 4.0), n(Bb, 1, 4.0),
        n(F, 2, 4.0), n(F, 2, 4.0), n(C, 2, 4.0), n(C, 2, 4.0),
    ],
    arpeggio: [D, A, D, F, A, D, F, A],
    drums: DrumStyle::Punk,
    lead: mix(0.2, 0.85),
    bass_mix: mix(0.38, 0.9),
    arp_mix: mix(0.1, 0.6),
    loop_beats: 64.0,
};

static GAME_OVER: Track = Track {
    id: TrackId::GameOver,
    tempo: 100.0,
    melody: &[
        n(D, 5, 2.0), n(F, 5, 2.0), n(A, 5, 4.0),
        n(G, 5, 2.0), n(F, 5, 2.0), n(D, 5, 4.0),
        n(D, 5, 2.0), n(F, 5, 2.0), n(G, 5, 2.0), n(A, 5, 2.0),
        n(F, 5, 4.0), n(D, 5, 4.0),
        n(A, 5, 2.0), n(G, 5, 2.0), n(F, 5, 4.0),
        n(G, 5, 2.0), n(F, 5, 2.0), n(D, 5, 4.0),
        n(D, 5, 2.0), n(F, 5, 2.0), n(A, 5, 4.0),
        n(D, 5, 8.0),
    ],
    bass: &[
        n(D, 2, 4.0), n(D, 2, 4.0), n(Bb, 1, 4.0), n(Bb, 1, 4.0),
        n(F, 2, 4.0), n(F, 2, 4.0), n(A, 1, 4.0), n(A, 1, 4.0),
        n(D, 2, 4.0), n(D, 2, 4.0), n(Bb, 1, 4.0), n(Bb, 1, 4.0),
        n(F, 2, 4.0), n(F, 2, 4.0), n(D, 2, 8.0),
    ],
    arpeggio: [D, A, D, F, A, D, F, A],
    drums: DrumStyle::Heavy,
    lead: mix(0.16, 0.85),
    bass_mix: mix(0.5, 0.9),
    arp_mix: mix(0.06, 0.5),
    loop_beats: 64.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    fn total_beats(notes: &[Note]) -> f32 {
        notes.iter().map(|n| n.beats).sum()
    }

    #[test]
    fn test_note_frequencies() {
        assert_eq!(A.freq(4), 440.0);
        assert_eq!(A.freq(5), 880.0);
        assert!((A.freq(2) - 110.0).abs() < 1e-4);
    }

    #[test]
    fn test_voices_fit_the_loop() {
        for id in [
            TrackId::NeonFuneral,
            TrackId::DigitalHeartbreak,
            TrackId::BrokenStatic,
            TrackId::GameOver,
        ] {
            let track = Track::get(id);
            assert_eq!(track.id, id);
            assert!(total_beats(track.melody) <= track.loop_beats, "{id:?} melody");
            assert!(total_beats(track.bass) <= track.loop_beats, "{id:?} bass");
            assert_eq!(track.bars() as f32 * 4.0, track.loop_beats, "{id:?} bars");
        }
    }

    #[test]
    fn test_loop_length() {
        let track = Track::get(TrackId::NeonFuneral);
        let expected = 128.0 * 60.0 / 110.0;
        assert!((track.loop_secs() - expected).abs() < 1e-9);
    }
}
