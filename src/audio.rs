//! Sound cues
//!
//! The simulation only emits `GameEvent`s; this module maps them to cues and
//! plays them. On the web the cues are procedural Web Audio tones, so no
//! asset files are needed.

use crate::config::AudioConfig;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player took a damage tick or hit
    Damage,
    /// A boost appeared in the world
    BoostCreated,
    /// Boost collected
    BoostPicked,
    /// Parcel delivered
    Reward,
    GameOver,
}

impl SoundEffect {
    /// Cue for a simulation event, if it has one
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::PlayerDamaged { .. } => Some(SoundEffect::Damage),
            GameEvent::BoostSpawned { .. } => Some(SoundEffect::BoostCreated),
            GameEvent::BoostCollected { .. } => Some(SoundEffect::BoostPicked),
            GameEvent::Delivered { .. } => Some(SoundEffect::Reward),
            GameEvent::GameOver { .. } => Some(SoundEffect::GameOver),
            GameEvent::RunStarted
            | GameEvent::DashClassActivated { .. }
            | GameEvent::PowerUp { .. } => None,
        }
    }

    /// Effective volume: per-cue level scaled by the SFX master
    pub fn volume(self, config: &AudioConfig) -> f32 {
        let cue = match self {
            SoundEffect::Damage => config.damage,
            SoundEffect::BoostCreated => config.boost_created,
            SoundEffect::BoostPicked => config.boost_picked,
            SoundEffect::Reward => config.reward,
            SoundEffect::GameOver => config.game_over,
        };
        (cue * config.sfx_volume).clamp(0.0, 1.0)
    }
}

/// Fire-and-forget cue player
///
/// Implementations must never fail the caller.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
}

/// Silent sink for native and headless runs
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, effect: SoundEffect, _volume: f32) {
        log::trace!("cue {:?}", effect);
    }
}

/// Map drained events to cues and play them
pub fn play_events(sink: &mut dyn AudioSink, config: &AudioConfig, events: &[GameEvent]) {
    for effect in events.iter().filter_map(SoundEffect::for_event) {
        let vol = effect.volume(config);
        if vol > 0.0 {
            sink.play(effect, vol);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect};

    /// Web Audio backed sink
    pub struct WebAudio {
        ctx: Option<AudioContext>,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // Fails outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self { ctx }
        }

        /// Resume the context (browsers require a user gesture first)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
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

        /// Single decaying tone, optionally sliding to `to_freq`
        fn blip(
            ctx: &AudioContext,
            at: f64,
            freq: f32,
            to_freq: Option<f32>,
            osc_type: OscillatorType,
            vol: f32,
            len: f64,
        ) {
            let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
                return;
            };
            gain.gain().set_value_at_time(vol, at).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, at + len)
                .ok();
            if let Some(to) = to_freq {
                osc.frequency().set_value_at_time(freq, at).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(to, at + len)
                    .ok();
            }
            osc.start_with_when(at).ok();
            osc.stop_with_when(at + len + 0.05).ok();
        }

        /// Notes played one after another
        fn arpeggio(
            ctx: &AudioContext,
            notes: &[f32],
            gap: f64,
            osc_type: OscillatorType,
            vol: f32,
            len: f64,
        ) {
            let t = ctx.current_time();
            for (i, freq) in notes.iter().enumerate() {
                Self::blip(ctx, t + i as f64 * gap, *freq, None, osc_type, vol, len);
            }
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect, vol: f32) {
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            let t = ctx.current_time();
            match effect {
                SoundEffect::Damage => {
                    Self::blip(ctx, t, 180.0, Some(60.0), OscillatorType::Square, vol * 0.5, 0.12)
                }
                SoundEffect::BoostCreated => {
                    Self::blip(ctx, t, 500.0, Some(900.0), OscillatorType::Triangle, vol * 0.3, 0.15)
                }
                SoundEffect::BoostPicked => Self::arpeggio(
                    ctx,
                    &[600.0, 800.0, 1000.0],
                    0.08,
                    OscillatorType::Sine,
                    vol * 0.25,
                    0.15,
                ),
                SoundEffect::Reward => Self::arpeggio(
                    ctx,
                    &[400.0, 500.0, 600.0, 800.0],
                    0.1,
                    OscillatorType::Triangle,
                    vol * 0.3,
                    0.4,
                ),
                SoundEffect::GameOver => Self::arpeggio(
                    ctx,
                    &[400.0, 350.0, 300.0, 200.0],
                    0.2,
                    OscillatorType::Sine,
                    vol * 0.3,
                    0.3,
                ),
            }
        }
    }
}

/// Records cues instead of playing them
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct RecordingAudio {
    pub played: Vec<(SoundEffect, f32)>,
}

#[cfg(test)]
impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        self.played.push((effect, volume));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BoostKind, EnemyKind, GameOverReason};

    #[test]
    fn test_events_map_to_cues() {
        let damaged = GameEvent::PlayerDamaged {
            amount: 5.0,
            source: EnemyKind::Mob,
        };
        assert_eq!(SoundEffect::for_event(&damaged), Some(SoundEffect::Damage));
        assert_eq!(
            SoundEffect::for_event(&GameEvent::BoostCollected {
                kind: BoostKind::Coin
            }),
            Some(SoundEffect::BoostPicked)
        );
        assert_eq!(SoundEffect::for_event(&GameEvent::PowerUp { step: 1 }), None);
        assert_eq!(SoundEffect::for_event(&GameEvent::RunStarted), None);
    }

    #[test]
    fn test_volume_scales_by_master() {
        let config = AudioConfig::default();
        assert!((SoundEffect::Reward.volume(&config) - 0.6).abs() < 1e-6);
        assert!((SoundEffect::Damage.volume(&config) - 0.18).abs() < 1e-6);
    }

    #[test]
    fn test_play_events_skips_silent_cues() {
        let mut config = AudioConfig::default();
        config.damage = 0.0;
        let mut sink = RecordingAudio::default();
        let events = [
            GameEvent::PlayerDamaged {
                amount: 5.0,
                source: EnemyKind::Dash,
            },
            GameEvent::Delivered { deliveries: 1 },
            GameEvent::GameOver {
                reason: GameOverReason::TimeUp,
            },
        ];
        play_events(&mut sink, &config, &events);
        let cues: Vec<_> = sink.played.iter().map(|(e, _)| *e).collect();
        assert_eq!(cues, vec![SoundEffect::Reward, SoundEffect::GameOver]);
    }
}
