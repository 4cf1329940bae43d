//! Streaming tick-to-brick aggregation.
//!
//! A [`RangeChart`] keeps an append-only list of bricks whose final element is
//! the only one ever written. Every tick is measured against the open of that
//! final brick: while the distance stays under `brick_size` the brick absorbs
//! the tick, and once it reaches one or more multiples of `brick_size` the
//! brick is completed in that direction and any further whole steps are
//! emitted as synthetic bricks, followed by a new provisional brick.

use chrono::NaiveDateTime;
use tracing::trace;

use super::brick::{Brick, BrickKind};
use super::error::{check_brick_size, RangeTraderError};
use super::tick::Tick;

#[derive(Debug, Clone)]
pub struct RangeChart {
    brick_size: f64,
    bricks: Vec<Brick>,
}

impl RangeChart {
    pub fn new(brick_size: f64) -> Result<Self, RangeTraderError> {
        Ok(RangeChart {
            brick_size: check_brick_size(brick_size)?,
            bricks: Vec::with_capacity(1_000),
        })
    }

    /// Replay a tick series into a fresh chart.
    pub fn from_ticks(brick_size: f64, ticks: &[Tick]) -> Result<Self, RangeTraderError> {
        let mut chart = RangeChart::new(brick_size)?;
        for tick in ticks {
            chart.feed(tick.time, tick.price, tick.volume, None)?;
        }
        Ok(chart)
    }

    pub fn brick_size(&self) -> f64 {
        self.brick_size
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// The brick still being written, if any tick has been seen.
    pub fn current(&self) -> Option<&Brick> {
        self.bricks.last()
    }

    /// Every brick except the current one.
    pub fn completed(&self) -> &[Brick] {
        match self.bricks.split_last() {
            Some((_, done)) => done,
            None => &[],
        }
    }

    /// Feed one tick. Returns how many bricks the tick completed.
    ///
    /// `brick_size_override` replaces the chart's brick size before the tick
    /// is measured and stays in effect for later ticks.
    pub fn feed(
        &mut self,
        time: NaiveDateTime,
        price: f64,
        volume: f64,
        brick_size_override: Option<f64>,
    ) -> Result<usize, RangeTraderError> {
        if let Some(size) = brick_size_override {
            self.brick_size = check_brick_size(size)?;
        }

        let before = self.bricks.len();
        let size = self.brick_size;

        let Some(last) = self.bricks.last_mut() else {
            self.bricks.push(Brick::provisional(time, price, volume));
            return Ok(0);
        };

        if whole_steps((price - last.open).abs(), size) == 0 {
            last.close = price;
            last.high = max4(last.open, last.high, last.low, last.close);
            last.low = min4(last.open, last.high, last.low, last.close);
            last.ticks_count += 1;
            last.volume += volume;
        }

        // Runs even when the tick was absorbed above; the step count is then zero.
        let (open, kind) = (last.open, last.kind);
        let (direction, distance) = match kind {
            BrickKind::Up | BrickKind::Last => {
                if price > open {
                    (BrickKind::Up, price - open)
                } else {
                    (BrickKind::Down, open - price)
                }
            }
            BrickKind::Down => {
                if price < open {
                    (BrickKind::Down, open - price)
                } else {
                    (BrickKind::Up, price - open)
                }
            }
        };

        let steps = whole_steps(distance, size);
        if steps > 0 {
            self.add_bricks(direction, time, price, volume, steps);
        }

        Ok(self.bricks.len() - before)
    }

    fn add_bricks(
        &mut self,
        direction: BrickKind,
        time: NaiveDateTime,
        price: f64,
        volume: f64,
        steps: usize,
    ) {
        let offset = direction.step_sign() * self.brick_size;

        let Some(last) = self.bricks.last_mut() else {
            return;
        };

        if last.kind == BrickKind::Last {
            // Only the extreme on the side of travel moves; the other keeps
            // whatever the provisional brick accumulated.
            last.kind = direction;
            last.close = last.open + offset;
            match direction {
                BrickKind::Up => last.high = last.close,
                BrickKind::Down => last.low = last.close,
                BrickKind::Last => {}
            }
        }

        let mut anchor = last.close;
        for _ in 1..steps {
            let close = anchor + offset;
            self.bricks.push(Brick {
                time,
                kind: direction,
                open: anchor,
                high: anchor.max(close),
                low: anchor.min(close),
                close,
                ticks_count: 0,
                volume: 0.0,
            });
            anchor = close;
        }

        self.bricks.push(Brick {
            time,
            kind: BrickKind::Last,
            open: anchor,
            high: price.max(anchor),
            low: price.min(anchor),
            close: price,
            ticks_count: 1,
            volume,
        });

        trace!(%direction, steps, price, "bricks completed");
    }

    /// Completed bricks with consecutive repeats of the same upper line removed.
    ///
    /// The provisional brick is never included.
    pub fn unique_bricks(&self) -> Vec<Brick> {
        let mut unique: Vec<Brick> = Vec::new();
        for brick in self.completed() {
            if unique.last().is_some_and(|kept| kept.line_up() == brick.line_up()) {
                continue;
            }
            unique.push(brick.clone());
        }
        unique
    }
}

fn whole_steps(distance: f64, brick_size: f64) -> usize {
    (distance / brick_size).floor() as usize
}

fn max4(a: f64, b: f64, c: f64, d: f64) -> f64 {
    a.max(b).max(c).max(d)
}

fn min4(a: f64, b: f64, c: f64, d: f64) -> f64 {
    a.min(b).min(c).min(d)
}
