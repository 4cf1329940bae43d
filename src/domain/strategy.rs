//! Brick-following driver that runs a tick series through the aggregator
//! and the backtest engine.
//!
//! The newest brick completed by a tick decides the side: an up brick wants
//! to be long, a down brick wants to be short. An opposite position is closed
//! before the new one is opened.

use tracing::{debug, info};

use super::backtest::{BacktestConfig, BacktestEngine};
use super::brick::{Brick, BrickKind};
use super::brick_size::BrickSizeSchedule;
use super::error::RangeTraderError;
use super::metrics::Summary;
use super::position::{Position, Side};
use super::range_chart::RangeChart;
use super::tick::Tick;

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub bricks: Vec<Brick>,
    pub positions: Vec<Position>,
    pub summary: Summary,
}

/// Side wanted after a completed brick of the given kind.
pub fn signal(kind: BrickKind) -> Option<Side> {
    match kind {
        BrickKind::Up => Some(Side::Buy),
        BrickKind::Down => Some(Side::Sell),
        BrickKind::Last => None,
    }
}

pub fn run_backtest(
    ticks: &[Tick],
    config: &BacktestConfig,
    schedule: Option<&BrickSizeSchedule>,
) -> Result<BacktestResult, RangeTraderError> {
    let mut chart = RangeChart::new(config.brick_size)?;
    let mut engine = BacktestEngine::new(config.slippage)?;

    info!(
        symbol = %config.symbol,
        ticks = ticks.len(),
        brick_size = config.brick_size,
        slippage = config.slippage,
        "running backtest"
    );

    for tick in ticks {
        let override_size = schedule.and_then(|s| s.size_at(tick.time));
        let completed = chart.feed(tick.time, tick.price, tick.volume, override_size)?;
        if completed == 0 {
            continue;
        }

        let done = chart.completed();
        for brick in &done[done.len() - completed..] {
            engine.add_brick(brick.clone());
        }

        let Some(wanted) = done.last().and_then(|b| signal(b.kind)) else {
            continue;
        };
        follow(&mut engine, wanted)?;
    }

    if config.close_at_end && engine.current_position().is_some() {
        if let Some(current) = chart.current() {
            engine.add_brick(current.clone());
        }
        engine.close_position()?;
    }

    let positions = engine.into_positions();
    let summary = Summary::compute(&positions);
    info!(
        bricks = chart.len(),
        positions = positions.len(),
        total_profit = summary.total_profit,
        "backtest finished"
    );

    Ok(BacktestResult {
        bricks: chart.bricks().to_vec(),
        positions,
        summary,
    })
}

fn follow(engine: &mut BacktestEngine, wanted: Side) -> Result<(), RangeTraderError> {
    match engine.current_position().map(|p| p.side) {
        Some(side) if side == wanted => return Ok(()),
        Some(_) => {
            engine.close_position()?;
        }
        None => {}
    }
    debug!(%wanted, "following brick direction");
    engine.open_position(wanted)?;
    Ok(())
}
