//! Range bar (brick) representation.

use chrono::NaiveDateTime;
use std::fmt;

/// Direction of a brick. `Last` marks the provisional brick still absorbing ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BrickKind {
    Last,
    Up,
    Down,
}

impl BrickKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrickKind::Last => "last",
            BrickKind::Up => "up",
            BrickKind::Down => "down",
        }
    }

    /// Sign applied to `brick_size` when stepping in this direction.
    pub(crate) fn step_sign(&self) -> f64 {
        match self {
            BrickKind::Up => 1.0,
            BrickKind::Down => -1.0,
            BrickKind::Last => 0.0,
        }
    }
}

impl fmt::Display for BrickKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub time: NaiveDateTime,
    pub kind: BrickKind,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub ticks_count: u32,
    pub volume: f64,
}

impl Brick {
    /// A fresh provisional brick seeded by a single tick.
    pub fn provisional(time: NaiveDateTime, price: f64, volume: f64) -> Self {
        Brick {
            time,
            kind: BrickKind::Last,
            open: price,
            high: price,
            low: price,
            close: price,
            ticks_count: 1,
            volume,
        }
    }

    pub fn ohlc(&self) -> [f64; 4] {
        [self.open, self.high, self.low, self.close]
    }

    /// max(open, close)
    pub fn line_up(&self) -> f64 {
        self.open.max(self.close)
    }

    /// min(open, close)
    pub fn line_down(&self) -> f64 {
        self.open.min(self.close)
    }

    pub fn is_provisional(&self) -> bool {
        self.kind == BrickKind::Last
    }
}
