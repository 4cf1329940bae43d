//! CSV tick and schedule source adapter.
//!
//! Ticks are read from a headered file with `time_msc`, `last` and
//! `volume_real` columns; any other column is ignored. Schedules use
//! `time_msc` and `brick_size`.

use crate::domain::brick_size::{BrickSizeEntry, BrickSizeSchedule};
use crate::domain::error::RangeTraderError;
use crate::domain::tick::Tick;
use crate::ports::tick_port::TickPort;
use chrono::DateTime;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct TickRecord {
    time_msc: i64,
    last: f64,
    volume_real: f64,
}

#[derive(Debug, Deserialize)]
struct ScheduleRecord {
    time_msc: i64,
    brick_size: f64,
}

#[derive(Debug, Default)]
pub struct CsvAdapter;

impl CsvAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Parse ticks from any reader holding CSV text.
    pub fn read_ticks<R: Read>(reader: R) -> Result<Vec<Tick>, RangeTraderError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut ticks = Vec::new();

        for (row, result) in rdr.deserialize::<TickRecord>().enumerate() {
            let record = result.map_err(|e| RangeTraderError::TickData {
                reason: format!("CSV parse error: {}", e),
            })?;
            let tick = Tick::from_millis(record.time_msc, record.last, record.volume_real)
                .ok_or_else(|| RangeTraderError::TickData {
                    reason: format!("row {}: time_msc {} out of range", row + 1, record.time_msc),
                })?;
            ticks.push(tick);
        }

        Ok(ticks)
    }

    pub fn read_schedule<R: Read>(reader: R) -> Result<BrickSizeSchedule, RangeTraderError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut entries = Vec::new();

        for (row, result) in rdr.deserialize::<ScheduleRecord>().enumerate() {
            let record = result.map_err(|e| RangeTraderError::TickData {
                reason: format!("CSV parse error: {}", e),
            })?;
            let time = DateTime::from_timestamp_millis(record.time_msc)
                .ok_or_else(|| RangeTraderError::TickData {
                    reason: format!("row {}: time_msc {} out of range", row + 1, record.time_msc),
                })?
                .naive_utc();
            entries.push(BrickSizeEntry {
                time,
                brick_size: record.brick_size,
            });
        }

        BrickSizeSchedule::new(entries)
    }

    fn open(source: &Path) -> Result<File, RangeTraderError> {
        File::open(source).map_err(|e| RangeTraderError::TickData {
            reason: format!("failed to read {}: {}", source.display(), e),
        })
    }
}

impl TickPort for CsvAdapter {
    fn fetch_ticks(&self, source: &Path) -> Result<Vec<Tick>, RangeTraderError> {
        Self::read_ticks(Self::open(source)?)
    }

    fn fetch_schedule(&self, source: &Path) -> Result<BrickSizeSchedule, RangeTraderError> {
        Self::read_schedule(Self::open(source)?)
    }
}
