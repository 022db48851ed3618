//! Quote providers.
//!
//! The dashboard only needs "give me quotes for these symbols". Yahoo Finance
//! is the real source; tests plug in their own [`QuoteProvider`].

use crate::models::{MarketState, Quote};
use crate::tickers::Symbol;
use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

const YAHOO_FINANCE_URL: &str = "https://query1.finance.yahoo.com/v7/finance/quote";

/// Yahoo rejects requests without a browser-like agent.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Something that can fetch quotes.
///
/// Symbols the source does not know are simply absent from the result.
pub trait QuoteProvider {
    fn fetch_quotes(&self, symbols: &[Symbol]) -> impl Future<Output = Result<Vec<Quote>>> + Send;
}

/// Yahoo Finance API client.
pub struct YahooFinanceClient {
    client: Client,
    timeout: Duration,
}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client.
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, timeout })
    }
}

impl QuoteProvider for YahooFinanceClient {
    async fn fetch_quotes(&self, symbols: &[Symbol]) -> Result<Vec<Quote>> {
        if symbols.is_empty() {
            return Ok(Vec::new());
        }

        let url = quote_url(symbols);
        debug!(%url, count = symbols.len(), "requesting quotes");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .context("Failed to fetch quotes from Yahoo Finance")?;

        if !response.status().is_success() {
            anyhow::bail!("Yahoo Finance API returned error: {}", response.status());
        }

        let data: YahooResponse = response
            .json()
            .await
            .context("Failed to parse Yahoo Finance response")?;

        Ok(data.into_quotes())
    }
}

fn quote_url(symbols: &[Symbol]) -> String {
    let symbols_param = symbols
        .iter()
        .map(|s| urlencoding::encode(s.as_str()).into_owned())
        .collect::<Vec<_>>()
        .join(",");
    format!("{}?symbols={}", YAHOO_FINANCE_URL, symbols_param)
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooResponse {
    quote_response: QuoteResponse,
}

impl YahooResponse {
    fn into_quotes(self) -> Vec<Quote> {
        if let Some(error) = self.quote_response.error {
            warn!(%error, "Yahoo Finance reported an error alongside results");
        }
        self.quote_response
            .result
            .into_iter()
            .filter_map(|r| match Symbol::new(&r.symbol) {
                Ok(symbol) => Some(r.into_quote(symbol)),
                Err(_) => {
                    warn!("dropping quote with blank symbol");
                    None
                }
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    result: Vec<YahooQuote>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuote {
    symbol: String,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    regular_market_change: Option<f64>,
    #[serde(default)]
    regular_market_change_percent: Option<f64>,
    #[serde(default)]
    regular_market_day_high: Option<f64>,
    #[serde(default)]
    regular_market_day_low: Option<f64>,
    #[serde(default)]
    fifty_two_week_high: Option<f64>,
    #[serde(default)]
    fifty_two_week_low: Option<f64>,
    #[serde(default)]
    bid: Option<f64>,
    #[serde(default)]
    ask: Option<f64>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    exchange: Option<String>,
    #[serde(default)]
    market_state: Option<String>,
    #[serde(default)]
    regular_market_time: Option<i64>,
}

impl YahooQuote {
    fn into_quote(self, symbol: Symbol) -> Quote {
        Quote {
            symbol,
            name: self.long_name.or(self.short_name),
            price: self.regular_market_price,
            // Yahoo reports an empty book as 0.
            bid: self.bid.filter(|b| *b > 0.0),
            ask: self.ask.filter(|a| *a > 0.0),
            change: self.regular_market_change,
            change_percent: self.regular_market_change_percent,
            day_high: self.regular_market_day_high,
            day_low: self.regular_market_day_low,
            year_high: self.fifty_two_week_high,
            year_low: self.fifty_two_week_low,
            currency: self.currency,
            exchange: self.exchange,
            market_state: parse_market_state(self.market_state.as_deref()),
            timestamp: self
                .regular_market_time
                .and_then(|t| Utc.timestamp_opt(t, 0).single())
                .unwrap_or_else(Utc::now),
        }
    }
}

fn parse_market_state(s: Option<&str>) -> MarketState {
    match s {
        Some("PRE") | Some("PREPRE") => MarketState::Pre,
        Some("REGULAR") => MarketState::Regular,
        Some("POST") | Some("POSTPOST") => MarketState::Post,
        _ => MarketState::Closed,
    }
}
