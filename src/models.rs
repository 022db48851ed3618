//! Data models for quotes and dashboard rows.

use crate::signals::{QuoteSnapshot, Verdict, classify};
use crate::tickers::Symbol;
use chrono::{DateTime, Utc};

/// A quote as projected from the provider payload.
///
/// Price fields are optional: the feed leaves them out for halted symbols,
/// closed books and freshly listed instruments.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Ticker symbol (e.g., "AAPL")
    pub symbol: Symbol,
    /// Full name of the security
    pub name: Option<String>,
    /// Last traded price
    pub price: Option<f64>,
    /// Highest price a buyer is ready to pay
    pub bid: Option<f64>,
    /// Lowest price a seller is ready to accept
    pub ask: Option<f64>,
    /// Price change from previous close
    pub change: Option<f64>,
    /// Percentage change from previous close
    pub change_percent: Option<f64>,
    /// Day's high price
    pub day_high: Option<f64>,
    /// Day's low price
    pub day_low: Option<f64>,
    /// 52-week high
    pub year_high: Option<f64>,
    /// 52-week low
    pub year_low: Option<f64>,
    /// Currency of the quote
    pub currency: Option<String>,
    /// Exchange where the security is traded
    pub exchange: Option<String>,
    /// Market state (PRE, REGULAR, POST, CLOSED)
    pub market_state: MarketState,
    /// Timestamp of the quote
    pub timestamp: DateTime<Utc>,
}

impl Quote {
    /// A quote carrying only a symbol.
    #[cfg(test)]
    pub fn new(symbol: Symbol) -> Self {
        Self {
            symbol,
            name: None,
            price: None,
            bid: None,
            ask: None,
            change: None,
            change_percent: None,
            day_high: None,
            day_low: None,
            year_high: None,
            year_low: None,
            currency: None,
            exchange: None,
            market_state: MarketState::default(),
            timestamp: Utc::now(),
        }
    }

    /// The fields the classifier needs.
    pub fn snapshot(&self) -> QuoteSnapshot {
        QuoteSnapshot {
            symbol: self.symbol.clone(),
            fifty_two_week_high: self.year_high,
            fifty_two_week_low: self.year_low,
            day_high: self.day_high,
            day_low: self.day_low,
            bid: self.bid,
            ask: self.ask,
        }
    }
}

/// Market trading state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarketState {
    Pre,
    Regular,
    Post,
    #[default]
    Closed,
}

impl std::fmt::Display for MarketState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketState::Pre => write!(f, "Pre"),
            MarketState::Regular => write!(f, "Open"),
            MarketState::Post => write!(f, "Post"),
            MarketState::Closed => write!(f, "Closed"),
        }
    }
}

/// One line of the dashboard: a watched symbol and whatever we know about it.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerRow {
    pub symbol: Symbol,
    pub quote: Option<Quote>,
    pub verdict: Verdict,
}

impl TickerRow {
    /// A row that has not been fetched yet.
    pub fn pending(symbol: Symbol) -> Self {
        Self {
            symbol,
            quote: None,
            verdict: Verdict::NoData,
        }
    }

    /// Replace the quote and reclassify. `None` means the provider had
    /// nothing for this symbol.
    pub fn update(&mut self, quote: Option<Quote>) {
        self.verdict = match &quote {
            Some(q) => Verdict::from_result(classify(&q.snapshot())),
            None => Verdict::NoData,
        };
        self.quote = quote;
    }

    fn field(&self, get: impl Fn(&Quote) -> Option<f64>) -> Option<f64> {
        self.quote.as_ref().and_then(get)
    }

    pub fn price(&self) -> Option<f64> {
        self.field(|q| q.price)
    }

    pub fn bid(&self) -> Option<f64> {
        self.field(|q| q.bid)
    }

    pub fn ask(&self) -> Option<f64> {
        self.field(|q| q.ask)
    }

    pub fn day_high(&self) -> Option<f64> {
        self.field(|q| q.day_high)
    }

    pub fn day_low(&self) -> Option<f64> {
        self.field(|q| q.day_low)
    }

    pub fn year_high(&self) -> Option<f64> {
        self.field(|q| q.year_high)
    }

    pub fn year_low(&self) -> Option<f64> {
        self.field(|q| q.year_low)
    }

    pub fn change(&self) -> Option<f64> {
        self.field(|q| q.change)
    }

    pub fn change_percent(&self) -> Option<f64> {
        self.field(|q| q.change_percent)
    }

    /// Long name if the provider sent one.
    pub fn name(&self) -> Option<&str> {
        self.quote.as_ref().and_then(|q| q.name.as_deref())
    }
}
