//! Simulated position tracking.

use chrono::NaiveDateTime;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// The side that unwinds a position on this side.
    pub fn opposite(&self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }

    /// Fill price for an order on this side: buyers pay up, sellers give up.
    pub fn fill_price(&self, price: f64, slippage: f64) -> f64 {
        match self {
            Side::Buy => price + slippage,
            Side::Sell => price - slippage,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub date: NaiveDateTime,
    pub side: Side,
    pub open_price: f64,
    pub close_price: Option<f64>,
    pub current_price: f64,
    pub profit: f64,
}

impl Position {
    pub fn new(date: NaiveDateTime, side: Side, open_price: f64) -> Self {
        Position {
            date,
            side,
            open_price,
            close_price: None,
            current_price: 0.0,
            profit: 0.0,
        }
    }

    pub fn is_open(&self) -> bool {
        self.close_price.is_none()
    }

    /// Mark the position at `price`, closing it at that price when `close` is set.
    pub fn update(&mut self, price: f64, close: bool) {
        self.current_price = price;
        if close {
            self.close_price = Some(price);
        }
        self.profit = match self.side {
            Side::Buy => price - self.open_price,
            Side::Sell => self.open_price - price,
        };
    }
}
