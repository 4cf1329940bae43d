//! Tick and brick-size schedule source port trait.

use crate::domain::brick_size::BrickSizeSchedule;
use crate::domain::error::RangeTraderError;
use crate::domain::tick::Tick;
use std::path::Path;

pub trait TickPort {
    /// Ticks in source order. Filtering is left to the caller.
    fn fetch_ticks(&self, source: &Path) -> Result<Vec<Tick>, RangeTraderError>;

    fn fetch_schedule(&self, source: &Path) -> Result<BrickSizeSchedule, RangeTraderError>;
}
