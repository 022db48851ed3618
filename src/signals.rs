//! Buy/sell advisories from a quote's position inside its 52-week range.
//!
//! A symbol trading at (or through) its yearly high is a sell, one within the
//! top fifth of the range is a softer sell. The low side mirrors that for
//! buys. Both sides are judged independently, so a snapshot can carry two
//! advisories at once.

use crate::tickers::Symbol;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Width of the "near an extreme" band, as a percentage of the yearly range.
pub const PROXIMITY_PERCENT: f64 = 20.0;

/// The price fields the classifier looks at, for one symbol.
///
/// Everything is optional because the upstream feed routinely omits fields.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSnapshot {
    pub symbol: Symbol,
    pub fifty_two_week_high: Option<f64>,
    pub fifty_two_week_low: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    /// Highest price a buyer currently offers.
    pub bid: Option<f64>,
    /// Lowest price a seller currently accepts.
    pub ask: Option<f64>,
}

/// Advisory emitted by [`classify`]. Serializes as `SELL_AT_YEAR_HIGH` etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Advisory {
    /// Trading at or above the 52-week high.
    SellAtYearHigh,
    /// Bid within the top band of the yearly range.
    SellNearHigh,
    /// Trading at or below the 52-week low.
    BuyAtYearLow,
    /// Ask within the bottom band of the yearly range.
    BuyNearLow,
}

impl Advisory {
    pub fn is_sell(self) -> bool {
        matches!(self, Advisory::SellAtYearHigh | Advisory::SellNearHigh)
    }

    pub fn is_buy(self) -> bool {
        !self.is_sell()
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::SellAtYearHigh => write!(f, "sell, 1y high"),
            Advisory::SellNearHigh => write!(f, "sell, close to high"),
            Advisory::BuyAtYearLow => write!(f, "buy, 1y low"),
            Advisory::BuyNearLow => write!(f, "buy, close to low"),
        }
    }
}

/// Classification failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// The 52-week extremes are missing or do not form a positive range.
    #[error("{symbol}: invalid 52-week range (high {}, low {})", fmt_opt(.high), fmt_opt(.low))]
    InvalidSnapshot {
        symbol: Symbol,
        high: Option<f64>,
        low: Option<f64>,
    },
}

fn fmt_opt(value: &Option<f64>) -> String {
    value.map_or_else(|| "missing".to_string(), |v| v.to_string())
}

/// Classify one snapshot.
///
/// Returns the high-side advisory (if any) followed by the low-side one (if
/// any). An absent bid, ask, or day extreme just fails the comparison it is
/// part of. Fails only when the yearly range is not strictly positive.
pub fn classify(snapshot: &QuoteSnapshot) -> Result<Vec<Advisory>, ClassifyError> {
    let invalid = || ClassifyError::InvalidSnapshot {
        symbol: snapshot.symbol.clone(),
        high: snapshot.fifty_two_week_high,
        low: snapshot.fifty_two_week_low,
    };

    let (Some(high), Some(low)) = (snapshot.fifty_two_week_high, snapshot.fifty_two_week_low)
    else {
        return Err(invalid());
    };

    let yearly_range = high - low;
    // Also rejects NaN.
    if !(yearly_range > 0.0 && yearly_range.is_finite()) {
        return Err(invalid());
    }
    let band = yearly_range * PROXIMITY_PERCENT / 100.0;

    let mut advisories = Vec::with_capacity(2);

    if snapshot.day_high == Some(high) || above(snapshot.bid, high) {
        advisories.push(Advisory::SellAtYearHigh);
    } else if above(snapshot.bid, high - band) {
        advisories.push(Advisory::SellNearHigh);
    }

    if snapshot.day_low == Some(low) || below(snapshot.ask, low) {
        advisories.push(Advisory::BuyAtYearLow);
    } else if below(snapshot.ask, low + band) {
        advisories.push(Advisory::BuyNearLow);
    }

    Ok(advisories)
}

fn above(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

fn below(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v < threshold)
}

/// Outcome for one dashboard row.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Verdict {
    /// Nothing fetched for this symbol yet.
    #[default]
    NoData,
    Signals(Vec<Advisory>),
    Unclassifiable(ClassifyError),
}

impl Verdict {
    pub fn from_result(result: Result<Vec<Advisory>, ClassifyError>) -> Self {
        match result {
            Ok(advisories) => Verdict::Signals(advisories),
            Err(e) => Verdict::Unclassifiable(e),
        }
    }

    pub fn advisories(&self) -> &[Advisory] {
        match self {
            Verdict::Signals(advisories) => advisories,
            _ => &[],
        }
    }

    pub fn has_sell(&self) -> bool {
        self.advisories().iter().any(|a| a.is_sell())
    }

    pub fn has_buy(&self) -> bool {
        self.advisories().iter().any(|a| a.is_buy())
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::NoData => write!(f, "no data"),
            Verdict::Unclassifiable(_) => write!(f, "n/a"),
            Verdict::Signals(advisories) => {
                let labels: Vec<String> = advisories.iter().map(ToString::to_string).collect();
                write!(f, "{}", labels.join("; "))
            }
        }
    }
}
