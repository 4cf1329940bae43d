//! Result output port trait.

use crate::domain::brick::Brick;
use crate::domain::error::RangeTraderError;
use crate::domain::position::Position;
use std::path::Path;

/// Port for writing bricks and position history.
pub trait ReportPort {
    fn write_bricks(&self, bricks: &[Brick], output_path: &Path) -> Result<(), RangeTraderError>;

    fn write_positions(
        &self,
        positions: &[Position],
        output_path: &Path,
    ) -> Result<(), RangeTraderError>;
}
