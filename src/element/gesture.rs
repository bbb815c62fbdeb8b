//! Touch gesture geometry.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::driver::{Point, WindowSize};

/// Duration of one swipe gesture.
pub const SWIPE_DURATION: Duration = Duration::from_secs(2);

/// Fraction of the viewport where a swipe starts.
const NEAR: f64 = 0.85;

/// Fraction of the viewport where a swipe ends.
const FAR: f64 = 0.15;

/// Direction the content moves under the finger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SwipeDirection {
    /// Finger moves from the bottom toward the top.
    Up,
    /// Finger moves from the top toward the bottom.
    Down,
    /// Finger moves from the right toward the left.
    Left,
    /// Finger moves from the left toward the right.
    Right,
}

impl SwipeDirection {
    /// Returns the start and end points of this swipe on a viewport.
    #[must_use]
    pub fn vector(self, window: WindowSize) -> (Point, Point) {
        let width = f64::from(window.width);
        let height = f64::from(window.height);
        let at = |x: f64, y: f64| Point::new(x.round() as i64, y.round() as i64);

        let vertical = (at(width / 2.0, height * NEAR), at(width / 2.0, height * FAR));
        let horizontal = (at(width * NEAR, height / 2.0), at(width * FAR, height / 2.0));

        match self {
            Self::Up => vertical,
            Self::Down => (vertical.1, vertical.0),
            Self::Left => horizontal,
            Self::Right => (horizontal.1, horizontal.0),
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
        };
        f.write_str(name)
    }
}
