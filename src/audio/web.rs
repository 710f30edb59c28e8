//! Web Audio backend
//!
//! Graph: voices -> music bus / sfx bus -> master -> destination. The music
//! bus is replaced wholesale on stop, which cuts everything queued on it.
//! Every node call is allowed to fail; a failure drops that sound only.

use rand::Rng;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    AudioBuffer, AudioContext, AudioContextState, BiquadFilterType, GainNode, OscillatorNode,
    OscillatorType,
};

use super::{AudioOutput, Instrument, MixLevels, SoundCue, Voice};

/// Floor for exponential ramps (they cannot reach zero)
const SILENT: f32 = 0.001;

/// Filtered noise burst
struct Noise {
    /// Buffer length (s)
    length: f64,
    /// Envelope time constant as a fraction of the buffer
    decay: f32,
    /// High-pass cutoff (Hz)
    cutoff: f32,
    /// Gain ramp length (s)
    ring: f64,
}

const SNARE: Noise = Noise { length: 0.12, decay: 0.1, cutoff: 2500.0, ring: 0.1 };
const HI_HAT: Noise = Noise { length: 0.04, decay: 0.06, cutoff: 9000.0, ring: 0.03 };
const OPEN_HAT: Noise = Noise { length: 0.15, decay: 0.2, cutoff: 7000.0, ring: 0.12 };
const CRASH: Noise = Noise { length: 0.6, decay: 0.25, cutoff: 5000.0, ring: 0.5 };

struct Graph {
    master: GainNode,
    music: GainNode,
    sfx: GainNode,
}

pub struct WebAudioOutput {
    ctx: Option<AudioContext>,
    graph: Option<Graph>,
    mix: MixLevels,
}

impl WebAudioOutput {
    pub fn new(mix: MixLevels) -> Self {
        // Not available outside secure contexts or without a user gesture
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        let graph = ctx.as_ref().and_then(|ctx| Self::build_graph(ctx, &mix));
        Self { ctx, graph, mix }
    }

    fn build_graph(ctx: &AudioContext, mix: &MixLevels) -> Option<Graph> {
        let master = ctx.create_gain().ok()?;
        master.gain().set_value(mix.effective_master());
        master.connect_with_audio_node(&ctx.destination()).ok()?;

        let music = ctx.create_gain().ok()?;
        music.gain().set_value(mix.music.clamp(0.0, 1.0));
        music.connect_with_audio_node(&master).ok()?;

        let sfx = ctx.create_gain().ok()?;
        sfx.gain().set_value(mix.sfx.clamp(0.0, 1.0));
        sfx.connect_with_audio_node(&master).ok()?;

        Some(Graph { master, music, sfx })
    }

    /// Resume a suspended context and play a silent buffer (iOS unlock)
    ///
    /// Must be called from inside a user gesture handler.
    pub fn unlock(&self) {
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == AudioContextState::Suspended {
            if let Ok(promise) = ctx.resume() {
                wasm_bindgen_futures::spawn_local(async move {
                    if JsFuture::from(promise).await.is_err() {
                        log::warn!("AudioContext resume was rejected");
                    }
                });
            }
        }

        let Ok(buffer) = ctx.create_buffer(1, 1, 22050.0) else { return };
        let Ok(source) = ctx.create_buffer_source() else { return };
        source.set_buffer(Some(&buffer));
        if source.connect_with_audio_node(&ctx.destination()).is_ok() {
            source.start().ok();
        }
    }

    /// Oscillator routed through its own gain into `bus`
    fn create_osc(
        &self,
        ctx: &AudioContext,
        bus: &GainNode,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(bus).ok()?;

        Some((osc, gain))
    }

    /// Exponentially decaying white noise through a high-pass filter
    fn play_noise(&self, ctx: &AudioContext, bus: &GainNode, noise: &Noise, t: f64, volume: f32) {
        let Some(buffer) = noise_buffer(ctx, noise.length, noise.decay) else { return };
        let Ok(source) = ctx.create_buffer_source() else { return };
        let Ok(filter) = ctx.create_biquad_filter() else { return };
        let Ok(gain) = ctx.create_gain() else { return };

        source.set_buffer(Some(&buffer));
        filter.set_type(BiquadFilterType::Highpass);
        filter.frequency().set_value(noise.cutoff);
        gain.gain().set_value_at_time(volume, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(SILENT, t + noise.ring).ok();

        if source.connect_with_audio_node(&filter).is_err()
            || filter.connect_with_audio_node(&gain).is_err()
            || gain.connect_with_audio_node(bus).is_err()
        {
            return;
        }
        source.start_with_when(t).ok();
        source.stop_with_when(t + noise.length).ok();
    }

    fn play_lead(&self, ctx: &AudioContext, bus: &GainNode, v: &Voice) {
        let Some((osc, gain)) = self.create_osc(ctx, bus, v.freq, OscillatorType::Square) else {
            return;
        };
        let (t, d) = (v.start, v.duration);
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain().linear_ramp_to_value_at_time(v.volume, t + 0.02).ok();
        gain.gain().set_value_at_time(v.volume * 0.8, t + d * 0.7).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + d).ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + d + 0.01).ok();
    }

    fn play_bass(&self, ctx: &AudioContext, bus: &GainNode, v: &Voice) {
        let (t, d) = (v.start, v.duration);

        // Sub
        if let Some((osc, gain)) = self.create_osc(ctx, bus, v.freq, OscillatorType::Sine) {
            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain().linear_ramp_to_value_at_time(v.volume, t + 0.01).ok();
            gain.gain().set_value_at_time(v.volume * 0.9, t + d * 0.8).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + d).ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + d + 0.01).ok();
        }

        // Punch an octave up
        if let Some((osc, gain)) =
            self.create_osc(ctx, bus, v.freq * 2.0, OscillatorType::Triangle)
        {
            gain.gain().set_value_at_time(v.volume * 0.3, t).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, t + d * 0.3).ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + d + 0.01).ok();
        }
    }

    fn play_arp(&self, ctx: &AudioContext, bus: &GainNode, v: &Voice) {
        let Some((osc, gain)) = self.create_osc(ctx, bus, v.freq, OscillatorType::Sawtooth) else {
            return;
        };
        let (t, d) = (v.start, v.duration);
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain().linear_ramp_to_value_at_time(v.volume, t + 0.01).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + d).ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + d + 0.01).ok();
    }

    /// Tom: sine dropping an octave
    fn play_tom(&self, ctx: &AudioContext, bus: &GainNode, t: f64, freq: f32, volume: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, bus, freq, OscillatorType::Sine) else {
            return;
        };
        osc.frequency().set_value_at_time(freq, t).ok();
        osc.frequency().exponential_ramp_to_value_at_time(freq * 0.5, t + 0.12).ok();
        gain.gain().set_value_at_time(volume, t).ok();
        gain.gain().exponential_ramp_to_value_at_time(SILENT, t + 0.18).ok();
        osc.start_with_when(t).ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// 808-style kick: pitch drop plus a click transient
    fn play_kick(&self, ctx: &AudioContext, bus: &GainNode, t: f64, volume: f32) {
        if let Some((osc, gain)) = self.create_osc(ctx, bus, 180.0, OscillatorType::Sine) {
            osc.frequency().set_value_at_time(180.0, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(35.0, t + 0.08).ok();
            gain.gain().set_value_at_time(volume, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(SILENT, t + 0.2).ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.25).ok();
        }

        // Click attack
        if let Some((osc, gain)) = self.create_osc(ctx, bus, 900.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(volume * 0.3, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(SILENT, t + 0.01).ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.02).ok();
        }
    }

    fn play_snare(&self, ctx: &AudioContext, bus: &GainNode, t: f64, volume: f32) {
        self.play_noise(ctx, bus, &SNARE, t, volume);

        // Body
        if let Some((osc, gain)) = self.create_osc(ctx, bus, 200.0, OscillatorType::Triangle) {
            osc.frequency().set_value_at_time(200.0, t).ok();
            osc.frequency().exponential_ramp_to_value_at_time(100.0, t + 0.03).ok();
            gain.gain().set_value_at_time(volume * 0.5, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(SILENT, t + 0.05).ok();
            osc.start_with_when(t).ok();
            osc.stop_with_when(t + 0.08).ok();
        }
    }

    fn play_voice(&self, ctx: &AudioContext, bus: &GainNode, v: &Voice) {
        match v.instrument {
            Instrument::Lead => self.play_lead(ctx, bus, v),
            Instrument::Bass => self.play_bass(ctx, bus, v),
            Instrument::Arp => self.play_arp(ctx, bus, v),
            Instrument::Kick => self.play_kick(ctx, bus, v.start, v.volume),
            Instrument::Snare => self.play_snare(ctx, bus, v.start, v.volume),
            Instrument::HiHat => self.play_noise(ctx, bus, &HI_HAT, v.start, v.volume),
            Instrument::OpenHat => self.play_noise(ctx, bus, &OPEN_HAT, v.start, v.volume),
            Instrument::Crash => self.play_noise(ctx, bus, &CRASH, v.start, v.volume),
            Instrument::Tom => self.play_tom(ctx, bus, v.start, v.freq, v.volume),
        }
    }

    /// Quick rising chirp
    fn play_flap(&self, ctx: &AudioContext, bus: &GainNode) {
        let Some((osc, gain)) = self.create_osc(ctx, bus, 400.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(600.0, t + 0.04).ok();
        gain.gain().set_value_at_time(0.3, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.08).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Two-step blip
    fn play_score(&self, ctx: &AudioContext, bus: &GainNode) {
        let Some((osc, gain)) = self.create_osc(ctx, bus, 880.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();
        osc.frequency().set_value_at_time(880.0, t).ok();
        osc.frequency().set_value_at_time(1100.0, t + 0.05).ok();
        gain.gain().set_value_at_time(0.2, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.15).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.2).ok();
    }

    /// Descending crash
    fn play_death(&self, ctx: &AudioContext, bus: &GainNode) {
        let Some((osc, gain)) = self.create_osc(ctx, bus, 400.0, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();
        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency().linear_ramp_to_value_at_time(80.0, t + 0.4).ok();
        gain.gain().set_value_at_time(0.3, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.5).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.6).ok();
    }

    /// Rising C major arpeggio fanfare
    fn play_high_score(&self, ctx: &AudioContext, bus: &GainNode) {
        let t = ctx.current_time();
        for (i, freq) in [523.0, 659.0, 784.0, 1047.0].into_iter().enumerate() {
            let Some((osc, gain)) = self.create_osc(ctx, bus, freq, OscillatorType::Square) else {
                continue;
            };
            let start = t + i as f64 * 0.15;
            gain.gain().set_value_at_time(0.15, start).ok();
            gain.gain().linear_ramp_to_value_at_time(0.0, start + 0.2).ok();
            osc.start_with_when(start).ok();
            osc.stop_with_when(start + 0.25).ok();
        }
    }

    fn play_click(&self, ctx: &AudioContext, bus: &GainNode) {
        let Some((osc, gain)) = self.create_osc(ctx, bus, 800.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(0.1, t).ok();
        gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.05).ok();
        osc.start().ok();
        osc.stop_with_when(t + 0.06).ok();
    }
}

/// Mono buffer of `length` seconds of noise with envelope `exp(-i / (n * decay))`
fn noise_buffer(ctx: &AudioContext, length: f64, decay: f32) -> Option<AudioBuffer> {
    let rate = ctx.sample_rate();
    let frames = ((rate as f64 * length) as u32).max(1);
    let buffer = ctx.create_buffer(1, frames, rate).ok()?;

    let mut rng = rand::rng();
    let falloff = frames as f32 * decay;
    let mut samples: Vec<f32> = (0..frames)
        .map(|i| rng.random_range(-1.0f32..1.0) * (-(i as f32) / falloff).exp())
        .collect();
    buffer.copy_to_channel(&mut samples, 0).ok()?;
    Some(buffer)
}

impl AudioOutput for WebAudioOutput {
    fn now(&self) -> f64 {
        self.ctx.as_ref().map(|ctx| ctx.current_time()).unwrap_or(0.0)
    }

    fn schedule(&mut self, voice: &Voice) {
        let (Some(ctx), Some(graph)) = (&self.ctx, &self.graph) else {
            return;
        };
        self.play_voice(ctx, &graph.music, voice);
    }

    fn rebuild_music_bus(&mut self) {
        let (Some(ctx), Some(graph)) = (&self.ctx, &mut self.graph) else {
            return;
        };
        graph.music.disconnect().ok();
        let Ok(music) = ctx.create_gain() else {
            log::warn!("Failed to rebuild music bus");
            return;
        };
        music.gain().set_value(self.mix.music.clamp(0.0, 1.0));
        music.connect_with_audio_node(&graph.master).ok();
        graph.music = music;
    }

    fn play_cue(&mut self, cue: SoundCue) {
        let (Some(ctx), Some(graph)) = (&self.ctx, &self.graph) else {
            return;
        };
        if self.mix.effective_master() <= 0.0 {
            return;
        }

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            SoundCue::Flap => self.play_flap(ctx, &graph.sfx),
            SoundCue::Score => self.play_score(ctx, &graph.sfx),
            SoundCue::Death => self.play_death(ctx, &graph.sfx),
            SoundCue::HighScore => self.play_high_score(ctx, &graph.sfx),
            SoundCue::Click => self.play_click(ctx, &graph.sfx),
        }
    }

    fn set_mix(&mut self, mix: &MixLevels) {
        self.mix = *mix;
        if let Some(graph) = &self.graph {
            graph.master.gain().set_value(mix.effective_master());
            graph.music.gain().set_value(mix.music.clamp(0.0, 1.0));
            graph.sfx.gain().set_value(mix.sfx.clamp(0.0, 1.0));
        }
    }
}
