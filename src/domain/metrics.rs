//! Result statistics over closed positions.

use super::position::Position;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub gain: f64,
    pub gain_count: usize,
    pub loss: f64,
    pub loss_count: usize,
    pub op_count: usize,
    pub total_profit: f64,
    pub win_rate: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl Summary {
    /// Open positions are ignored. A zero-profit trade counts as a loss.
    pub fn compute(positions: &[Position]) -> Self {
        let mut summary = Summary::default();

        for pos in positions.iter().filter(|p| !p.is_open()) {
            let profit = pos.profit;
            summary.op_count += 1;
            if profit > 0.0 {
                summary.gain += profit;
                summary.gain_count += 1;
                summary.largest_win = summary.largest_win.max(profit);
            } else {
                summary.loss += profit;
                summary.loss_count += 1;
                summary.largest_loss = summary.largest_loss.min(profit);
            }
        }

        summary.total_profit = summary.gain + summary.loss;
        summary.win_rate = if summary.op_count > 0 {
            summary.gain_count as f64 / summary.op_count as f64
        } else {
            0.0
        };
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::position::Side;
    use chrono::NaiveDate;

    fn closed(side: Side, open: f64, close: f64) -> Position {
        let date = NaiveDate::from_ymd_opt(2024, 7, 3)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut pos = Position::new(date, side, open);
        pos.update(close, true);
        pos
    }

    #[test]
    fn empty_positions() {
        let s = Summary::compute(&[]);
        assert_eq!(s, Summary::default());
    }

    #[test]
    fn gains_and_losses_split() {
        let positions = vec![
            closed(Side::Buy, 100.0, 110.0),
            closed(Side::Sell, 100.0, 104.0),
            closed(Side::Sell, 100.0, 95.0),
            closed(Side::Buy, 100.0, 100.0),
        ];
        let s = Summary::compute(&positions);

        assert_eq!(s.op_count, 4);
        assert_eq!(s.gain_count, 2);
        assert_eq!(s.loss_count, 2);
        assert!((s.gain - 15.0).abs() < f64::EPSILON);
        assert!((s.loss - (-4.0)).abs() < f64::EPSILON);
        assert!((s.total_profit - 11.0).abs() < f64::EPSILON);
        assert!((s.win_rate - 0.5).abs() < f64::EPSILON);
        assert!((s.largest_win - 10.0).abs() < f64::EPSILON);
        assert!((s.largest_loss - (-4.0)).abs() < f64::EPSILON);
    }

    #[test]
    fn open_position_is_skipped() {
        let date = NaiveDate::from_ymd_opt(2024, 7, 3)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        let mut open = Position::new(date, Side::Buy, 100.0);
        open.update(150.0, false);

        let s = Summary::compute(&[closed(Side::Buy, 100.0, 90.0), open]);
        assert_eq!(s.op_count, 1);
        assert_eq!(s.gain_count, 0);
        assert!((s.total_profit - (-10.0)).abs() < f64::EPSILON);
    }
}
