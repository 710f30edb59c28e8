//! Per-bar percussion templates
//!
//! A style maps a bar index to the hits in that bar. Variation (crashes,
//! tom fills) is keyed on the bar index so every pass of a track plays the
//! same pattern.

use super::Instrument;

/// A percussion hit within a bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrumHit {
    pub instrument: Instrument,
    /// Offset from the start of the bar in beats
    pub beat: f32,
    pub volume: f32,
    /// Only used by toms
    pub freq: f32,
}

const fn hit(instrument: Instrument, beat: f32, volume: f32) -> DrumHit {
    DrumHit {
        instrument,
        beat,
        volume,
        freq: 0.0,
    }
}

/// Descending tom fill on the last beat of a phrase
const TOM_FILL: [(f32, f32); 4] = [(3.0, 180.0), (3.25, 140.0), (3.5, 110.0), (3.75, 90.0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrumStyle {
    /// Kick on 1 and 3, snare on 2 and 4, 8th hats, open hat on the and of 4
    Rock,
    /// Kick on 1, snare on 3, quarter hats
    HalfTime,
    /// Four on the floor with two open-hat accents
    Punk,
    /// Rock with an extra kick on the and of 2, no fills
    Heavy,
}

impl DrumStyle {
    /// All hits for bar `bar` (0-based)
    pub fn bar(&self, bar: u32) -> Vec<DrumHit> {
        let mut hits = Vec::with_capacity(20);
        let crash_every = match self {
            DrumStyle::HalfTime => 8,
            _ => 4,
        };

        match self {
            DrumStyle::Rock => {
                hits.push(hit(Instrument::Kick, 0.0, 0.45));
                hits.push(hit(Instrument::Kick, 2.0, 0.45));
                hits.push(hit(Instrument::Snare, 1.0, 0.35));
                hits.push(hit(Instrument::Snare, 3.0, 0.35));
                for i in 0..8 {
                    let volume = if i % 2 == 0 { 0.12 } else { 0.08 };
                    hits.push(hit(Instrument::HiHat, i as f32 * 0.5, volume));
                }
                hits.push(hit(Instrument::OpenHat, 3.5, 0.1));
            }
            DrumStyle::HalfTime => {
                hits.push(hit(Instrument::Kick, 0.0, 0.4));
                if bar % 2 == 1 {
                    hits.push(hit(Instrument::Kick, 2.0, 0.25));
                }
                hits.push(hit(Instrument::Snare, 2.0, 0.3));
                for i in 0..4 {
                    hits.push(hit(Instrument::HiHat, i as f32, 0.08));
                }
                hits.push(hit(Instrument::OpenHat, 3.0, 0.07));
            }
            DrumStyle::Punk => {
                for i in 0..4 {
                    hits.push(hit(Instrument::Kick, i as f32, 0.48));
                }
                hits.push(hit(Instrument::Snare, 1.0, 0.38));
                hits.push(hit(Instrument::Snare, 3.0, 0.38));
                for i in 0..8 {
                    hits.push(hit(Instrument::HiHat, i as f32 * 0.5, 0.14));
                }
                hits.push(hit(Instrument::OpenHat, 1.5, 0.1));
                hits.push(hit(Instrument::OpenHat, 3.5, 0.1));
            }
            DrumStyle::Heavy => {
                hits.push(hit(Instrument::Kick, 0.0, 0.55));
                hits.push(hit(Instrument::Kick, 2.0, 0.55));
                hits.push(hit(Instrument::Kick, 1.5, 0.35));
                hits.push(hit(Instrument::Snare, 1.0, 0.4));
                hits.push(hit(Instrument::Snare, 3.0, 0.4));
                for i in 0..8 {
                    hits.push(hit(Instrument::HiHat, i as f32 * 0.5, 0.12));
                }
                hits.push(hit(Instrument::OpenHat, 3.5, 0.1));
            }
        }

        if bar % crash_every == 0 {
            let volume = match self {
                DrumStyle::Rock => 0.15,
                DrumStyle::HalfTime => 0.12,
                DrumStyle::Punk | DrumStyle::Heavy => 0.18,
            };
            hits.push(hit(Instrument::Crash, 0.0, volume));
        }

        let fill_volume = match self {
            DrumStyle::Rock => Some(0.25),
            DrumStyle::Punk => Some(0.3),
            DrumStyle::HalfTime | DrumStyle::Heavy => None,
        };
        if let (Some(volume), 7) = (fill_volume, bar % 8) {
            for (beat, freq) in TOM_FILL {
                hits.push(DrumHit {
                    freq,
                    ..hit(Instrument::Tom, beat, volume)
                });
            }
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(hits: &[DrumHit], instrument: Instrument) -> usize {
        hits.iter().filter(|h| h.instrument == instrument).count()
    }

    #[test]
    fn test_rock_backbeat() {
        let hits = DrumStyle::Rock.bar(1);
        let kicks: Vec<f32> = hits
            .iter()
            .filter(|h| h.instrument == Instrument::Kick)
            .map(|h| h.beat)
            .collect();
        let snares: Vec<f32> = hits
            .iter()
            .filter(|h| h.instrument == Instrument::Snare)
            .map(|h| h.beat)
            .collect();
        assert_eq!(kicks, vec![0.0, 2.0]);
        assert_eq!(snares, vec![1.0, 3.0]);
        assert_eq!(count(&hits, Instrument::HiHat), 8);
        assert_eq!(count(&hits, Instrument::Crash), 0);
    }

    #[test]
    fn test_crash_every_four_bars() {
        for bar in 0..16 {
            let crashes = count(&DrumStyle::Rock.bar(bar), Instrument::Crash);
            assert_eq!(crashes, usize::from(bar % 4 == 0), "bar {bar}");
        }
    }

    #[test]
    fn test_tom_fill_closes_each_phrase() {
        let fill = DrumStyle::Rock.bar(7);
        let toms: Vec<(f32, f32)> = fill
            .iter()
            .filter(|h| h.instrument == Instrument::Tom)
            .map(|h| (h.beat, h.freq))
            .collect();
        assert_eq!(toms, TOM_FILL.to_vec());
        assert_eq!(count(&DrumStyle::Rock.bar(15), Instrument::Tom), 4);
        assert_eq!(count(&DrumStyle::Rock.bar(8), Instrument::Tom), 0);
        assert_eq!(count(&DrumStyle::Heavy.bar(7), Instrument::Tom), 0);
    }

    #[test]
    fn test_hits_stay_inside_the_bar() {
        for style in [DrumStyle::Rock, DrumStyle::HalfTime, DrumStyle::Punk, DrumStyle::Heavy] {
            for bar in 0..32 {
                assert!(style.bar(bar).iter().all(|h| (0.0..4.0).contains(&h.beat)));
            }
        }
    }
}
