//! Audio system using Web Audio API
//!
//! Every effect is synthesized from oscillators at play time.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Body jumps
    Flap,
    /// Obstacle passed
    Score,
    /// Run ended on a collision
    Crash,
    /// Run beat the stored best
    HighScore,
    /// Menu button pressed
    MenuSelect,
}

/// One oscillator voice: start/end frequency, envelope peak and length
struct Voice {
    wave: OscillatorType,
    from_hz: f32,
    to_hz: f32,
    peak: f32,
    delay: f64,
    length: f64,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Not available outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: settings.effective_volume(),
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        for voice in voices(effect) {
            self.play_voice(ctx, &voice);
        }
    }

    /// Create an oscillator routed through its own gain node
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    fn play_voice(&self, ctx: &AudioContext, voice: &Voice) {
        let Some((osc, gain)) = self.create_osc(ctx, voice.from_hz, voice.wave) else {
            return;
        };
        let t = ctx.current_time() + voice.delay;

        gain.gain().set_value_at_time(self.volume * voice.peak, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + voice.length)
            .ok();
        if voice.to_hz != voice.from_hz {
            osc.frequency().set_value_at_time(voice.from_hz, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(voice.to_hz, t + voice.length)
                .ok();
        }

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + voice.length + 0.05).ok();
    }
}

fn voices(effect: SoundEffect) -> Vec<Voice> {
    let tone = |wave, from_hz, to_hz, peak, delay, length| Voice {
        wave,
        from_hz,
        to_hz,
        peak,
        delay,
        length,
    };

    match effect {
        // Quick upward chirp
        SoundEffect::Flap => vec![tone(OscillatorType::Triangle, 300.0, 600.0, 0.25, 0.0, 0.1)],
        SoundEffect::Score => vec![
            tone(OscillatorType::Sine, 880.0, 880.0, 0.2, 0.0, 0.08),
            tone(OscillatorType::Sine, 1320.0, 1320.0, 0.2, 0.06, 0.12),
        ],
        // Thud plus a falling buzz
        SoundEffect::Crash => vec![
            tone(OscillatorType::Sine, 120.0, 40.0, 0.5, 0.0, 0.25),
            tone(OscillatorType::Sawtooth, 400.0, 80.0, 0.2, 0.0, 0.4),
        ],
        SoundEffect::HighScore => [500.0, 600.0, 700.0, 800.0, 1000.0]
            .iter()
            .enumerate()
            .map(|(i, &hz)| tone(OscillatorType::Triangle, hz, hz, 0.25, i as f64 * 0.08, 0.25))
            .collect(),
        SoundEffect::MenuSelect => vec![tone(OscillatorType::Square, 660.0, 660.0, 0.1, 0.0, 0.05)],
    }
}
