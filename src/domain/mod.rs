//! Core domain types and logic.

pub mod tick;
pub mod brick;
pub mod brick_size;
pub mod range_chart;
pub mod position;
pub mod backtest;
pub mod strategy;
pub mod metrics;
pub mod config_validation;
pub mod error;
