//! Playhead over a runnable animation.
//!
//! Reversal keeps the current time: reversing halfway through plays back from
//! the halfway point, and resuming forward continues from wherever the
//! playhead is.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Reverse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Running,
    ReachedEnd,
    ReachedStart,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Playback {
    time: f32,
    duration: f32,
    direction: Direction,
}

impl Playback {
    pub fn new(duration: f32) -> Self {
        Self {
            time: 0.0,
            duration: duration.max(0.0),
            direction: Direction::Forward,
        }
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Rewind to zero and play forward.
    pub fn restart(&mut self) {
        self.time = 0.0;
        self.direction = Direction::Forward;
    }

    pub fn play_forward(&mut self) {
        self.direction = Direction::Forward;
    }

    pub fn reverse(&mut self) {
        self.direction = Direction::Reverse;
    }

    /// Move the playhead by `dt` seconds in the current direction.
    pub fn advance(&mut self, dt: f32) -> PlaybackStatus {
        let step = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.direction {
            Direction::Forward => {
                self.time = (self.time + step).min(self.duration);
                if self.time >= self.duration {
                    PlaybackStatus::ReachedEnd
                } else {
                    PlaybackStatus::Running
                }
            }
            Direction::Reverse => {
                self.time = (self.time - step).max(0.0);
                if self.time <= 0.0 {
                    PlaybackStatus::ReachedStart
                } else {
                    PlaybackStatus::Running
                }
            }
        }
    }

    /// Normalized playhead. A zero-length playback reads as 1 when moving
    /// forward and 0 when reversing.
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            self.time / self.duration
        } else if self.direction == Direction::Forward {
            1.0
        } else {
            0.0
        }
    }
}
