//! Time-keyed brick size overrides.

use chrono::NaiveDateTime;

use super::error::{check_brick_size, RangeTraderError};

#[derive(Debug, Clone, PartialEq)]
pub struct BrickSizeEntry {
    pub time: NaiveDateTime,
    pub brick_size: f64,
}

/// Brick sizes that take effect from a point in time, e.g. a volatility
/// measure recomputed on a slower timeframe.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrickSizeSchedule {
    entries: Vec<BrickSizeEntry>,
}

impl BrickSizeSchedule {
    pub fn new(mut entries: Vec<BrickSizeEntry>) -> Result<Self, RangeTraderError> {
        for entry in &entries {
            check_brick_size(entry.brick_size)?;
        }
        entries.sort_by_key(|e| e.time);
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[BrickSizeEntry] {
        &self.entries
    }

    /// Size of the latest entry stamped strictly before `time`.
    pub fn size_at(&self, time: NaiveDateTime) -> Option<f64> {
        let idx = self.entries.partition_point(|e| e.time < time);
        idx.checked_sub(1).map(|i| self.entries[i].brick_size)
    }
}
