//! Audio feedback using the Web Audio API
//!
//! One procedurally generated cue: a falling sawtooth "pop" per destroyed
//! target. No external files needed.
//!
//! Audio must never affect the game. Every Web Audio failure is swallowed.

use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

use crate::platform::Feedback;

/// Pop cue: start pitch (Hz)
const POP_START_HZ: f32 = 220.0;
/// Pop cue: end pitch (Hz)
const POP_END_HZ: f32 = 0.01;
/// Pop cue: peak gain at full volume
const POP_GAIN: f32 = 0.2;
/// Pop cue length (seconds)
const POP_SECONDS: f64 = 0.3;

/// Audio manager for the overlay
pub struct AudioManager {
    /// Created lazily on the first cue (browsers want a user gesture first)
    ctx: Option<AudioContext>,
    /// Set once construction failed; audio then stays off
    unavailable: bool,
    volume: f32,
}

impl AudioManager {
    pub fn new(volume: f32) -> Self {
        Self {
            ctx: None,
            unavailable: false,
            volume: volume.clamp(0.0, 1.0),
        }
    }

    fn context(&mut self) -> Option<&AudioContext> {
        if self.ctx.is_none() && !self.unavailable {
            match AudioContext::new() {
                Ok(ctx) => self.ctx = Some(ctx),
                Err(_) => {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    self.unavailable = true;
                }
            }
        }
        let ctx = self.ctx.as_ref()?;
        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        Some(ctx)
    }

    /// Create an oscillator routed through a gain node to the speakers
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

    /// Target destroyed - descending sawtooth pop
    pub fn play_pop(&mut self) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        let Some(ctx) = self.context() else { return };
        let Some((osc, gain)) = Self::create_osc(ctx, POP_START_HZ, OscillatorType::Sawtooth) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(POP_START_HZ, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(POP_END_HZ, t + POP_SECONDS)
            .ok();
        gain.gain().set_value_at_time(POP_GAIN * vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.001, t + POP_SECONDS)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + POP_SECONDS).ok();
    }
}

impl Feedback for AudioManager {
    fn target_destroyed(&mut self) {
        self.play_pop();
    }
}
