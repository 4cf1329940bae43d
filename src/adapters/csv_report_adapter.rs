//! CSV output for bricks and position history.

use crate::domain::brick::Brick;
use crate::domain::error::RangeTraderError;
use crate::domain::position::Position;
use crate::ports::report_port::ReportPort;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Serialize)]
struct BrickRow {
    time: String,
    kind: &'static str,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    ticks_count: u32,
    volume: f64,
}

impl From<&Brick> for BrickRow {
    fn from(b: &Brick) -> Self {
        BrickRow {
            time: format_time(b.time),
            kind: b.kind.as_str(),
            open: b.open,
            high: b.high,
            low: b.low,
            close: b.close,
            ticks_count: b.ticks_count,
            volume: b.volume,
        }
    }
}

#[derive(Debug, Serialize)]
struct PositionRow {
    date: String,
    side: &'static str,
    open_price: f64,
    close_price: Option<f64>,
    current_price: f64,
    profit: f64,
}

impl From<&Position> for PositionRow {
    fn from(p: &Position) -> Self {
        PositionRow {
            date: format_time(p.date),
            side: p.side.as_str(),
            open_price: p.open_price,
            close_price: p.close_price,
            current_price: p.current_price,
            profit: p.profit,
        }
    }
}

pub fn format_time(time: NaiveDateTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_bricks_to<W: Write>(bricks: &[Brick], writer: W) -> Result<(), RangeTraderError> {
        write_rows(writer, bricks.iter().map(BrickRow::from))
    }

    pub fn write_positions_to<W: Write>(
        positions: &[Position],
        writer: W,
    ) -> Result<(), RangeTraderError> {
        write_rows(writer, positions.iter().map(PositionRow::from))
    }

    fn create(output_path: &Path) -> Result<File, RangeTraderError> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        Ok(File::create(output_path)?)
    }
}

fn write_rows<W: Write, T: Serialize>(
    writer: W,
    rows: impl Iterator<Item = T>,
) -> Result<(), RangeTraderError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row).map_err(|e| RangeTraderError::TickData {
            reason: format!("CSV write error: {}", e),
        })?;
    }
    wtr.flush()?;
    Ok(())
}

impl ReportPort for CsvReportAdapter {
    fn write_bricks(&self, bricks: &[Brick], output_path: &Path) -> Result<(), RangeTraderError> {
        Self::write_bricks_to(bricks, Self::create(output_path)?)
    }

    fn write_positions(
        &self,
        positions: &[Position],
        output_path: &Path,
    ) -> Result<(), RangeTraderError> {
        Self::write_positions_to(positions, Self::create(output_path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::brick::BrickKind;
    use crate::domain::position::Side;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, 3)
            .unwrap()
            .and_hms_milli_opt(9, 30, 0, 250)
            .unwrap()
    }

    fn sample_brick() -> Brick {
        Brick {
            time: at(),
            kind: BrickKind::Down,
            open: 11.0,
            high: 11.2,
            low: 10.0,
            close: 10.0,
            ticks_count: 1,
            volume: 3.0,
        }
    }

    #[test]
    fn bricks_csv_layout() {
        let mut buf = Vec::new();
        CsvReportAdapter::write_bricks_to(&[sample_brick()], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("time,kind,open,high,low,close,ticks_count,volume")
        );
        assert_eq!(
            lines.next(),
            Some("2024-07-03 09:30:00.250,down,11.0,11.2,10.0,10.0,1,3.0")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn positions_csv_leaves_open_close_price_empty() {
        let mut closed = Position::new(at(), Side::Buy, 101.0);
        closed.update(104.0, true);
        let open = Position::new(at(), Side::Sell, 99.0);

        let mut buf = Vec::new();
        CsvReportAdapter::write_positions_to(&[closed, open], &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "date,side,open_price,close_price,current_price,profit"
        );
        assert_eq!(lines[1], "2024-07-03 09:30:00.250,buy,101.0,104.0,104.0,3.0");
        assert_eq!(lines[2], "2024-07-03 09:30:00.250,sell,99.0,,0.0,0.0");
    }

    #[test]
    fn write_bricks_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("bricks.csv");
        CsvReportAdapter::new()
            .write_bricks(&[sample_brick()], &path)
            .unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
    }
}
