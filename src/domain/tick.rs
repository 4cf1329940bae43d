//! Raw price samples and the feed-side tick filter.

use chrono::{DateTime, NaiveDateTime};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub time: NaiveDateTime,
    pub price: f64,
    pub volume: f64,
}

impl Tick {
    pub fn new(time: NaiveDateTime, price: f64, volume: f64) -> Self {
        Tick {
            time,
            price,
            volume,
        }
    }

    /// Build a tick from a Unix timestamp in milliseconds.
    pub fn from_millis(time_msc: i64, price: f64, volume: f64) -> Option<Self> {
        DateTime::from_timestamp_millis(time_msc).map(|dt| Tick::new(dt.naive_utc(), price, volume))
    }
}

/// Guards the aggregator against samples it must never see.
///
/// A tick is rejected if it is stamped at the Unix epoch, is earlier than the
/// last accepted tick, or carries a non-finite price or a negative or
/// non-finite volume. Ticks sharing a timestamp are all kept.
#[derive(Debug, Clone, Default)]
pub struct TickFilter {
    last_time: Option<NaiveDateTime>,
    rejected: usize,
}

impl TickFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, tick: &Tick) -> bool {
        let ok = tick.time.and_utc().timestamp_millis() != 0
            && self.last_time.is_none_or(|last| tick.time >= last)
            && tick.price.is_finite()
            && tick.volume.is_finite()
            && tick.volume >= 0.0;

        if ok {
            self.last_time = Some(tick.time);
        } else {
            self.rejected += 1;
        }
        ok
    }

    pub fn last_time(&self) -> Option<NaiveDateTime> {
        self.last_time
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Keep only the ticks this filter accepts, in order.
    pub fn filter_all(&mut self, ticks: impl IntoIterator<Item = Tick>) -> Vec<Tick> {
        ticks.into_iter().filter(|t| self.accept(t)).collect()
    }
}
