//! Price bars and series preparation.
//!
//! Raw rows arrive as `[time, open, close, high, low, volume, amount]`.
//! Open and close come before high and low; that order is fixed by the
//! upstream market feed and must not be "corrected" to OHLC.

use chrono::{DateTime, NaiveDateTime};
use serde::Deserialize;

/// Number of fields in a raw bar row.
pub const RAW_FIELDS: usize = 7;

/// One time-bucketed price/volume observation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
    pub amount: f64,
}

impl Bar {
    /// Seconds since the Unix epoch.
    pub fn unix_seconds(&self) -> i64 {
        self.timestamp.and_utc().timestamp()
    }
}

/// A single untyped field as delivered by the data collaborator.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Flag(bool),
}

impl RawValue {
    /// Numeric view of the field; `None` when it cannot be read as a finite number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(v) => Some(*v).filter(|v| v.is_finite()),
            RawValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            RawValue::Flag(b) => Some(if *b { 1.0 } else { 0.0 }),
        }
    }
}

/// Field names accepted for keyed rows.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct KeyedRawBar {
    #[serde(alias = "timestamp", alias = "Time", alias = "Date")]
    pub time: Option<RawValue>,
    #[serde(alias = "Open")]
    pub open: Option<RawValue>,
    #[serde(alias = "Close")]
    pub close: Option<RawValue>,
    #[serde(alias = "High")]
    pub high: Option<RawValue>,
    #[serde(alias = "Low")]
    pub low: Option<RawValue>,
    #[serde(alias = "Volume")]
    pub volume: Option<RawValue>,
    #[serde(alias = "Amount")]
    pub amount: Option<RawValue>,
}

/// One unprepared bar: either a positional row or a keyed object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawBar {
    Row(Vec<Option<RawValue>>),
    Keyed(KeyedRawBar),
}

impl RawBar {
    /// Build a positional row from plain numbers, in feed order.
    pub fn from_values(values: [f64; RAW_FIELDS]) -> Self {
        RawBar::Row(values.iter().map(|v| Some(RawValue::Number(*v))).collect())
    }

    fn fields(&self) -> [Option<&RawValue>; RAW_FIELDS] {
        match self {
            RawBar::Row(values) => {
                let mut out = [None; RAW_FIELDS];
                for (slot, value) in out.iter_mut().zip(values.iter()) {
                    *slot = value.as_ref();
                }
                out
            }
            RawBar::Keyed(k) => [
                k.time.as_ref(),
                k.open.as_ref(),
                k.close.as_ref(),
                k.high.as_ref(),
                k.low.as_ref(),
                k.volume.as_ref(),
                k.amount.as_ref(),
            ],
        }
    }

    /// Coerce into a typed bar. Returns `None` only when the timestamp is unusable;
    /// every other missing or malformed field becomes 0.0.
    pub fn to_bar(&self) -> Option<Bar> {
        let [time, open, close, high, low, volume, amount] = self.fields();
        let secs = time.and_then(RawValue::as_f64)?;
        let timestamp = DateTime::from_timestamp(secs as i64, 0)?.naive_utc();
        let num = |v: Option<&RawValue>| v.and_then(RawValue::as_f64).unwrap_or(0.0);

        Some(Bar {
            timestamp,
            open: num(open),
            close: num(close),
            high: num(high),
            low: num(low),
            volume: num(volume),
            amount: num(amount),
        })
    }
}

/// Bars sorted strictly ascending by timestamp, one bar per timestamp.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Coerce, sort and de-duplicate raw rows. Rows without a usable timestamp are
    /// dropped; for repeated timestamps the row that arrived last wins.
    pub fn prepare(raw: &[RawBar]) -> Self {
        let mut bars = Vec::with_capacity(raw.len());
        let mut dropped = 0usize;
        for row in raw {
            match row.to_bar() {
                Some(bar) => bars.push(bar),
                None => dropped += 1,
            }
        }
        if dropped > 0 {
            tracing::warn!(dropped, "skipped bars without a usable timestamp");
        }
        Self::from_bars(bars)
    }

    pub fn from_bars(mut bars: Vec<Bar>) -> Self {
        // stable: later duplicates stay after earlier ones
        bars.sort_by_key(|b| b.timestamp);
        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(prev) if prev.timestamp == bar.timestamp => *prev = bar,
                _ => deduped.push(bar),
            }
        }
        Self { bars: deduped }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }

    /// Index of the first bar of the trailing window of `count` bars.
    pub fn tail_start(&self, count: usize) -> usize {
        self.bars.len().saturating_sub(count)
    }
}
