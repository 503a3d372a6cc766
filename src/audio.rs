//! Audio boundary
//!
//! The simulation only emits fire-and-forget notifications; synthesis lives
//! in platform adapters. Sinks must never block or fail the caller: an
//! adapter whose backend is unavailable should log once and go quiet.

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player bullet fired
    Shoot,
    /// Ship destroyed, or something rammed
    Explosion,
    /// Bullet struck an asteroid or saucer
    Hit,
    /// Bonus life granted
    ExtraLife,
}

/// Receiver for sound notifications
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);
    /// Engine rumble starts (looping until `stop_thrust`)
    fn start_thrust(&mut self);
    fn stop_thrust(&mut self);
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}
    fn start_thrust(&mut self) {}
    fn stop_thrust(&mut self) {}
}

/// Writes every notification to the log (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        log::trace!("sfx {:?}", effect);
    }

    fn start_thrust(&mut self) {
        log::trace!("thrust on");
    }

    fn stop_thrust(&mut self) {
        log::trace!("thrust off");
    }
}
