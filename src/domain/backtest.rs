//! Single-position backtest engine driven brick by brick.
//!
//! BacktestConfig defines the run parameters read from the INI file.

use tracing::debug;

use super::brick::Brick;
use super::error::RangeTraderError;
use super::position::{Position, Side};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbol: String,
    pub brick_size: f64,
    pub slippage: f64,
    pub close_at_end: bool,
}

/// Marks at most one open position against the latest brick.
///
/// Every fill, including each mark-to-market, is priced on the side that
/// would execute it, so a round trip with no price change costs twice the
/// slippage.
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    slippage: f64,
    bricks: Vec<Brick>,
    positions: Vec<Position>,
}

impl BacktestEngine {
    pub fn new(slippage: f64) -> Result<Self, RangeTraderError> {
        if !(slippage.is_finite() && slippage >= 0.0) {
            return Err(RangeTraderError::InvalidSlippage { value: slippage });
        }
        Ok(BacktestEngine {
            slippage,
            bricks: Vec::new(),
            positions: Vec::new(),
        })
    }

    pub fn slippage(&self) -> f64 {
        self.slippage
    }

    pub fn bricks(&self) -> &[Brick] {
        &self.bricks
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn into_positions(self) -> Vec<Position> {
        self.positions
    }

    pub fn closed_positions(&self) -> impl Iterator<Item = &Position> {
        self.positions.iter().filter(|p| !p.is_open())
    }

    pub fn current_position(&self) -> Option<&Position> {
        self.positions.last().filter(|p| p.is_open())
    }

    pub fn add_brick(&mut self, brick: Brick) {
        self.bricks.push(brick);
        self.statistics(false);
    }

    pub fn open_position(&mut self, side: Side) -> Result<&Position, RangeTraderError> {
        if self.current_position().is_some() {
            return Err(RangeTraderError::PositionAlreadyOpen);
        }
        let brick = self.bricks.last().ok_or(RangeTraderError::NoBricks)?;

        let position = Position::new(brick.time, side, side.fill_price(brick.close, self.slippage));
        debug!(%side, open_price = position.open_price, date = %position.date, "position opened");
        self.positions.push(position);
        self.statistics(false);

        self.current_position().ok_or(RangeTraderError::NoOpenPosition)
    }

    pub fn close_position(&mut self) -> Result<&Position, RangeTraderError> {
        if self.current_position().is_none() {
            return Err(RangeTraderError::NoOpenPosition);
        }
        self.statistics(true);

        let closed = self.positions.last().ok_or(RangeTraderError::NoOpenPosition)?;
        debug!(side = %closed.side, profit = closed.profit, "position closed");
        Ok(closed)
    }

    fn statistics(&mut self, close: bool) {
        let Some(brick) = self.bricks.last() else {
            return;
        };
        let Some(position) = self.positions.last_mut().filter(|p| p.is_open()) else {
            return;
        };
        let mark = position.side.opposite().fill_price(brick.close, self.slippage);
        position.update(mark, close);
    }
}
