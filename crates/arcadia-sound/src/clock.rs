//! Frame-relative time source for stream updates.
//!
//! The graph converts "now" into a sample count using the fraction of the
//! current video frame that has elapsed. The emulation scheduler owns the real
//! clock; the graph only asks it for that fraction.

use std::cell::Cell;
use std::rc::Rc;

/// Reports how far the current frame has progressed.
pub trait FrameClock {
    /// Elapsed fraction of the current frame, `0.0..=1.0`.
    fn frame_fraction(&self) -> f64;
}

/// Settable clock shared between the scheduler and the graph.
///
/// Clones share the same position, so a scheduler can keep one handle while
/// the graph owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    fraction: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Creates a clock at the start of a frame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock to `fraction` of the current frame, clamped to `0.0..=1.0`.
    pub fn set(&self, fraction: f64) {
        let fraction = if fraction.is_nan() {
            0.0
        } else {
            fraction.clamp(0.0, 1.0)
        };
        self.fraction.set(fraction);
    }
}

impl FrameClock for ManualClock {
    fn frame_fraction(&self) -> f64 {
        self.fraction.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_position() {
        let clock = ManualClock::new();
        let view = clock.clone();
        clock.set(0.25);
        assert_eq!(view.frame_fraction(), 0.25);
        clock.set(3.0);
        assert_eq!(view.frame_fraction(), 1.0);
        clock.set(f64::NAN);
        assert_eq!(view.frame_fraction(), 0.0);
    }
}
