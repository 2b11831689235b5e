//! Playback clock and direction state machine.
//!
//! The clock owns elapsed time inside the active segment, the play/pause flag,
//! speed magnitude and travel direction. Forward and Reverse re-derive the
//! direction on every tick; Bounce and ReverseBounce keep it across ticks and
//! flip it when the clock sits on the boundary it is travelling toward.

use serde::{Deserialize, Serialize};

use crate::config::PlayMode;

/// Wrap or clamp `t` into `[0, duration]`.
///
/// Looping wraps with a Euclidean remainder, so any finite overshoot terminates in
/// one step; an overshoot that is an exact multiple of `duration` lands on
/// `duration` rather than 0. Non-looping clamps. Non-finite input and non-positive
/// durations yield 0.
pub fn wrap_time(t: f32, duration: f32, looping: bool) -> f32 {
    if !t.is_finite() || !(duration > 0.0) {
        return 0.0;
    }
    if t >= 0.0 && t <= duration {
        return t;
    }
    if !looping {
        return if t < 0.0 { 0.0 } else { duration };
    }
    let m = t.rem_euclid(duration);
    if t > duration && m == 0.0 {
        duration
    } else {
        // rem_euclid can round up to `duration` for tiny negative inputs
        m.min(duration)
    }
}

/// Playback state advanced once per tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PlaybackClock {
    time: f32,
    duration: f32,
    playing: bool,
    speed: f32,
    direction: f32,
    looping: bool,
    mode: PlayMode,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(1.0, 1.0, true, PlayMode::Forward)
    }
}

impl PlaybackClock {
    /// Create a paused clock at time 0.
    ///
    /// A negative `speed` is stored as its magnitude and reverses the direction the
    /// mode would otherwise start with.
    pub fn new(duration: f32, speed: f32, looping: bool, mode: PlayMode) -> Self {
        let mut clock = Self {
            time: 0.0,
            duration: if duration > 0.0 { duration } else { 1.0 },
            playing: false,
            speed: speed.abs(),
            direction: mode.initial_direction(),
            looping,
            mode,
        };
        if speed < 0.0 {
            clock.direction = -clock.direction;
        }
        clock
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Current travel direction, always `1.0` or `-1.0`.
    #[inline]
    pub fn direction(&self) -> f32 {
        self.direction
    }

    #[inline]
    pub fn looping(&self) -> bool {
        self.looping
    }

    #[inline]
    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    /// Resume from the current time.
    pub fn play(&mut self) {
        self.playing = true;
    }

    /// Freeze time.
    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Pause, rewind to 0 and re-derive direction from the mode.
    pub fn stop(&mut self) {
        self.playing = false;
        self.time = 0.0;
        self.direction = self.mode.initial_direction();
    }

    /// Set speed. Negative values store the magnitude and travel backwards.
    pub fn set_speed(&mut self, speed: f32) {
        if speed < 0.0 {
            self.direction = -1.0;
            self.speed = -speed;
        } else {
            self.speed = speed;
            if self.direction == 0.0 {
                self.direction = 1.0;
            }
        }
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Switch mode and re-derive direction from it.
    pub fn set_mode(&mut self, mode: PlayMode) {
        self.mode = mode;
        self.direction = mode.initial_direction();
    }

    /// Replace the active duration and rewind; used on segment activation.
    pub fn reset_to(&mut self, duration: f32) {
        self.duration = if duration > 0.0 { duration } else { 1.0 };
        self.time = 0.0;
    }

    /// Jump to `time`, wrapped or clamped like a tick would.
    pub fn seek(&mut self, time: f32) {
        self.time = wrap_time(time, self.duration, self.looping);
    }

    /// Direction to travel this tick, before the delta is applied.
    fn effective_direction(&self) -> f32 {
        if !self.mode.is_bounce() {
            return self.mode.initial_direction();
        }
        let dir = if self.direction == 0.0 {
            1.0
        } else {
            self.direction
        };
        if (self.time <= 0.0 && dir < 0.0) || (self.time >= self.duration && dir > 0.0) {
            -dir
        } else {
            dir
        }
    }

    /// Advance by `dt` seconds if playing. Returns the resulting time.
    pub fn advance(&mut self, dt: f32) -> f32 {
        if self.playing {
            self.direction = self.effective_direction();
            let signed_speed = self.speed * self.direction;
            self.time = wrap_time(self.time + dt * signed_speed, self.duration, self.looping);
        }
        self.time
    }

    /// `time / duration` clamped to `[0, 1]`.
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.time / self.duration).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// True when a non-looping clock rests on the boundary it is travelling toward.
    ///
    /// The clock itself never pauses at the end; hosts wanting stop-at-end call
    /// [`pause`](Self::pause) when this turns true.
    pub fn is_at_end(&self) -> bool {
        if self.looping {
            return false;
        }
        match self.mode {
            PlayMode::Forward => self.time >= self.duration,
            PlayMode::Reverse => self.time <= 0.0,
            // Bounce turns around at either edge and never finishes on its own.
            PlayMode::Bounce | PlayMode::ReverseBounce => false,
        }
    }
}
