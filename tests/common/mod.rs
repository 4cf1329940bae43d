#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rangetrader::domain::backtest::BacktestConfig;
use rangetrader::domain::brick::Brick;
use rangetrader::domain::brick_size::BrickSizeSchedule;
use rangetrader::domain::error::RangeTraderError;
use rangetrader::domain::position::Position;
pub use rangetrader::domain::tick::Tick;
use rangetrader::ports::report_port::ReportPort;
use rangetrader::ports::tick_port::TickPort;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

pub struct MockTickPort {
    pub ticks: Vec<Tick>,
    pub schedule: Option<BrickSizeSchedule>,
    pub error: Option<String>,
}

impl MockTickPort {
    pub fn new() -> Self {
        Self {
            ticks: Vec::new(),
            schedule: None,
            error: None,
        }
    }

    pub fn with_ticks(mut self, ticks: Vec<Tick>) -> Self {
        self.ticks = ticks;
        self
    }

    pub fn with_schedule(mut self, schedule: BrickSizeSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl TickPort for MockTickPort {
    fn fetch_ticks(&self, _source: &Path) -> Result<Vec<Tick>, RangeTraderError> {
        if let Some(reason) = &self.error {
            return Err(RangeTraderError::TickData {
                reason: reason.clone(),
            });
        }
        Ok(self.ticks.clone())
    }

    fn fetch_schedule(&self, source: &Path) -> Result<BrickSizeSchedule, RangeTraderError> {
        self.schedule
            .clone()
            .ok_or_else(|| RangeTraderError::TickData {
                reason: format!("no schedule at {}", source.display()),
            })
    }
}

/// Captures whatever the pipeline writes instead of touching disk.
#[derive(Default)]
pub struct MockReportPort {
    pub bricks: RefCell<Vec<Brick>>,
    pub positions: RefCell<Vec<Position>>,
    pub paths: RefCell<Vec<PathBuf>>,
}

impl MockReportPort {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReportPort for MockReportPort {
    fn write_bricks(&self, bricks: &[Brick], output_path: &Path) -> Result<(), RangeTraderError> {
        self.bricks.borrow_mut().extend_from_slice(bricks);
        self.paths.borrow_mut().push(output_path.to_path_buf());
        Ok(())
    }

    fn write_positions(
        &self,
        positions: &[Position],
        output_path: &Path,
    ) -> Result<(), RangeTraderError> {
        self.positions.borrow_mut().extend_from_slice(positions);
        self.paths.borrow_mut().push(output_path.to_path_buf());
        Ok(())
    }
}

pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 7, 3)
        .unwrap()
        .and_hms_opt(9, 0, 0)
        .unwrap()
}

pub fn at(secs: i64) -> NaiveDateTime {
    base_time() + Duration::seconds(secs)
}

pub fn make_tick(secs: i64, price: f64, volume: f64) -> Tick {
    Tick::new(at(secs), price, volume)
}

/// One tick per second starting at `base_time`, unit volume.
pub fn make_ticks(prices: &[f64]) -> Vec<Tick> {
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| make_tick(i as i64, p, 1.0))
        .collect()
}

pub fn make_config(brick_size: f64, slippage: f64) -> BacktestConfig {
    BacktestConfig {
        symbol: "WINQ24".to_string(),
        brick_size,
        slippage,
        close_at_end: true,
    }
}

/// Ticks in the on-disk CSV layout, one per second from `base_time`.
pub fn ticks_csv(prices: &[f64]) -> String {
    let start = base_time().and_utc().timestamp_millis();
    let mut out = String::from("time_msc,bid,ask,last,volume_real,flags\n");
    for (i, p) in prices.iter().enumerate() {
        out.push_str(&format!("{},0,0,{},1,0\n", start + i as i64 * 1000, p));
    }
    out
}
