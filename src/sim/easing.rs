//! Frame-stepped easing state for rotation and scale animation
//!
//! The player flip and the death-circle effect both animate through a
//! cubic ease-out driven one step per simulation tick, so the same
//! animation always takes the same number of frames.

/// Classic cubic ease-out: `c * ((t/d - 1)^3 + 1) + b`.
///
/// `t` is the elapsed time, `b` the start value, `c` the total change,
/// `d` the duration. `t` is clamped to `[0, d]`.
#[inline]
pub fn cubic_ease_out(t: f32, b: f32, c: f32, d: f32) -> f32 {
    let n = (t.clamp(0.0, d) / d) - 1.0;
    c * (n * n * n + 1.0) + b
}

/// An in-flight cubic ease-out animation, advanced one frame per call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EaseOut {
    /// Elapsed frames
    pub t: f32,
    /// Start value
    pub b: f32,
    /// Total change from start to end
    pub c: f32,
    /// Duration in frames
    pub d: f32,
    /// Set once `t` reaches `d`
    pub finished: bool,
}

impl EaseOut {
    pub fn new(b: f32, c: f32, d: f32) -> Self {
        Self {
            t: 0.0,
            b,
            c,
            d,
            finished: false,
        }
    }

    /// A finished animation resting at `value`.
    pub fn done_at(value: f32) -> Self {
        Self {
            t: 0.0,
            b: value,
            c: 0.0,
            d: 1.0,
            finished: true,
        }
    }

    /// Restart from a new base with a new change magnitude.
    pub fn restart(&mut self, b: f32, c: f32, d: f32) {
        *self = Self::new(b, c, d);
    }

    /// Advance one frame and return the current eased value.
    /// Once finished, keeps returning the terminal value.
    pub fn step(&mut self) -> f32 {
        if self.finished {
            return self.b + self.c;
        }
        self.t += 1.0;
        if self.t >= self.d {
            self.t = self.d;
            self.finished = true;
        }
        cubic_ease_out(self.t, self.b, self.c, self.d)
    }

    /// Current value without advancing.
    pub fn value(&self) -> f32 {
        if self.finished {
            self.b + self.c
        } else {
            cubic_ease_out(self.t, self.b, self.c, self.d)
        }
    }

    /// Terminal value this animation is heading toward.
    pub fn target(&self) -> f32 {
        self.b + self.c
    }
}
