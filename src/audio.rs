//! Audio feedback using the Web Speech and Web Audio APIs
//!
//! Hits are praised out loud; bow releases and hits also get short procedural
//! sound effects. Either capability may be missing, in which case it is
//! skipped silently.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType, SpeechSynthesis, SpeechSynthesisUtterance};

use crate::settings::Settings;
use crate::sim::{GameEvent, TargetKind};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Arrow leaves the bow
    Release,
    /// Arrow strikes a standard target
    HitStandard,
    /// Arrow strikes a moving target
    HitMoving,
    /// Unhit target moved elsewhere
    Relocate,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    speech: Option<SpeechSynthesis>,
    volume: f32,
    sfx: bool,
    voice: bool,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sound effects disabled");
        }
        let speech = web_sys::window().and_then(|w| w.speech_synthesis().ok());
        if speech.is_none() {
            log::warn!("Speech synthesis unavailable - spoken praise disabled");
        }
        Self {
            ctx,
            speech,
            volume: settings.volume.clamp(0.0, 1.0),
            sfx: settings.sfx,
            voice: settings.voice,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// React to a simulation event
    pub fn handle(&self, event: &GameEvent) {
        match event {
            GameEvent::ArrowFired { .. } => self.play(SoundEffect::Release),
            GameEvent::TargetHit { kind, praise, .. } => {
                self.play(match kind {
                    TargetKind::Standard => SoundEffect::HitStandard,
                    TargetKind::Moving => SoundEffect::HitMoving,
                });
                self.speak(praise);
            }
            GameEvent::TargetRelocated { .. } => self.play(SoundEffect::Relocate),
            _ => {}
        }
    }

    /// Say `text`, cutting off anything still being spoken
    pub fn speak(&self, text: &str) {
        if !self.voice {
            return;
        }
        let Some(speech) = &self.speech else { return };
        let Ok(utterance) = SpeechSynthesisUtterance::new_with_text(text) else {
            return;
        };
        utterance.set_rate(1.05);
        utterance.set_pitch(1.0);
        utterance.set_volume(0.95);
        speech.cancel();
        speech.speak(&utterance);
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        if !self.sfx || self.volume <= 0.0 {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        let vol = self.volume;
        match effect {
            SoundEffect::Release => self.play_release(ctx, vol),
            SoundEffect::HitStandard => self.play_hit(ctx, vol, 520.0),
            SoundEffect::HitMoving => self.play_hit(ctx, vol, 440.0),
            SoundEffect::Relocate => self.play_relocate(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Bowstring twang - quick falling pluck
    fn play_release(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();
        osc.frequency().set_value_at_time(220.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(90.0, t + 0.1)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Hit - wooden thunk followed by a bright chime
    fn play_hit(&self, ctx: &AudioContext, vol: f32, chime: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 140.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(70.0, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        for (i, mult) in [1.0_f32, 1.5].iter().enumerate() {
            let delay = 0.04 + i as f64 * 0.07;
            if let Some((osc, gain)) = self.create_osc(ctx, chime * mult, OscillatorType::Triangle) {
                let start = t + delay;
                gain.gain().set_value_at_time(vol * 0.25, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.25)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.3).ok();
            }
        }
    }

    /// Relocate - soft rising blip
    fn play_relocate(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sine) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.15, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.2)
            .ok();
        osc.frequency().set_value_at_time(300.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(600.0, t + 0.15)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.25).ok();
    }
}
