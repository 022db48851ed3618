//! Application state and logic.

use crate::api::QuoteProvider;
use crate::models::{Quote, TickerRow};
use crate::signals::Verdict;
use crate::tickers::{Symbol, TickerSet};
use anyhow::Result;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Auto-refresh never runs more often than this.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Runtime settings resolved from the command line and config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub refresh_interval: Duration,
    pub show_header: bool,
    pub show_details: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(60),
            show_header: true,
            show_details: true,
        }
    }
}

/// Signal counts across all rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub sell: usize,
    pub buy: usize,
    pub unclassifiable: usize,
    pub no_data: usize,
}

/// Application state.
pub struct App<P> {
    /// Symbols being watched
    pub tickers: TickerSet,
    /// One row per symbol, sorted by symbol
    pub rows: Vec<TickerRow>,
    /// Quote source
    provider: P,
    /// Last refresh attempt
    pub last_refresh: Option<Instant>,
    /// Refresh interval
    pub refresh_interval: Duration,
    /// Completed refresh count
    pub iteration: u64,
    /// Is the app running
    pub running: bool,
    /// Error message to display
    pub error: Option<String>,
    /// Status line text
    pub status: String,
    /// Selected row index
    pub selected: usize,
    /// Show help overlay
    pub show_help: bool,
    /// Show summary header
    pub show_header: bool,
    /// Show details pane
    pub show_details: bool,
}

impl<P: QuoteProvider> App<P> {
    /// Create a new application for `tickers`.
    pub fn new(tickers: TickerSet, provider: P, settings: &Settings) -> Self {
        let rows = tickers.sorted().into_iter().map(TickerRow::pending).collect();

        Self {
            tickers,
            rows,
            provider,
            last_refresh: None,
            refresh_interval: settings.refresh_interval.max(MIN_REFRESH_INTERVAL),
            iteration: 0,
            running: true,
            error: None,
            status: "Starting".to_string(),
            selected: 0,
            show_help: false,
            show_header: settings.show_header,
            show_details: settings.show_details,
        }
    }

    /// Check if refresh is needed.
    pub fn needs_refresh(&self) -> bool {
        match self.last_refresh {
            None => true,
            Some(last) => last.elapsed() >= self.refresh_interval,
        }
    }

    /// Fetch quotes and reclassify every row, propagating provider errors.
    pub async fn fetch(&mut self) -> Result<()> {
        let symbols: Vec<Symbol> = self.rows.iter().map(|r| r.symbol.clone()).collect();
        let started = Instant::now();
        let quotes = self.provider.fetch_quotes(&symbols).await?;
        info!(
            requested = symbols.len(),
            received = quotes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "quotes fetched"
        );

        self.apply_quotes(quotes);
        self.last_refresh = Some(Instant::now());
        self.iteration += 1;
        Ok(())
    }

    /// Refresh quotes, keeping the previous rows and recording the error
    /// if the provider fails.
    pub async fn refresh(&mut self) {
        match self.fetch().await {
            Ok(()) => {
                self.error = None;
                self.status = "Updated".to_string();
            }
            Err(e) => {
                warn!("quote refresh failed: {:#}", e);
                self.error = Some(format!("API Error: {:#}", e));
                self.status = "Update failed".to_string();
                // Back off until the next interval instead of retrying every tick.
                self.last_refresh = Some(Instant::now());
            }
        }
    }

    /// Merge fetched quotes into the rows. Symbols we did not ask for are
    /// ignored; rows the provider skipped fall back to no data.
    pub fn apply_quotes(&mut self, quotes: Vec<Quote>) {
        let mut by_symbol: HashMap<Symbol, Quote> = quotes
            .into_iter()
            .filter(|q| self.tickers.contains(q.symbol.as_str()))
            .map(|q| (q.symbol.clone(), q))
            .collect();

        for row in &mut self.rows {
            row.update(by_symbol.remove(&row.symbol));
            match &row.verdict {
                Verdict::Unclassifiable(e) => warn!("cannot classify {}: {}", row.symbol, e),
                Verdict::NoData => debug!(symbol = %row.symbol, "no quote returned"),
                Verdict::Signals(advisories) if !advisories.is_empty() => {
                    debug!(symbol = %row.symbol, verdict = %row.verdict, "signal")
                }
                Verdict::Signals(_) => {}
            }
        }
    }

    /// Count rows by verdict.
    pub fn summary(&self) -> Summary {
        self.rows
            .iter()
            .fold(Summary::default(), |mut summary, row| {
                match &row.verdict {
                    Verdict::NoData => summary.no_data += 1,
                    Verdict::Unclassifiable(_) => summary.unclassifiable += 1,
                    v => {
                        summary.sell += usize::from(v.has_sell());
                        summary.buy += usize::from(v.has_buy());
                    }
                }
                summary
            })
    }

    /// Move selection up.
    pub fn select_up(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.status_for_selection();
    }

    /// Move selection down.
    pub fn select_down(&mut self) {
        if self.selected < self.rows.len().saturating_sub(1) {
            self.selected += 1;
        }
        self.status_for_selection();
    }

    /// Move selection to top.
    pub fn select_top(&mut self) {
        self.selected = 0;
        self.status_for_selection();
    }

    /// Move selection to bottom.
    pub fn select_bottom(&mut self) {
        self.selected = self.rows.len().saturating_sub(1);
        self.status_for_selection();
    }

    /// Show the highlighted security's name, or its symbol if unknown.
    fn status_for_selection(&mut self) {
        if let Some(status) = self
            .selected_row()
            .map(|row| row.name().unwrap_or(row.symbol.as_str()).to_string())
        {
            self.status = status;
        }
    }

    /// Get the currently selected row.
    pub fn selected_row(&self) -> Option<&TickerRow> {
        self.rows.get(self.selected)
    }

    /// Force a refresh on the next loop turn.
    pub fn request_refresh(&mut self) {
        self.last_refresh = None;
    }

    /// Toggle help display.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Toggle details pane.
    pub fn toggle_details(&mut self) {
        self.show_details = !self.show_details;
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn should_quit(&self) -> bool {
        !self.running
    }

    /// Get time since last refresh as human readable string.
    pub fn time_since_refresh(&self) -> String {
        match self.last_refresh {
            Some(t) => {
                let elapsed = Duration::from_secs(t.elapsed().as_secs());
                format!("{} ago", humantime::format_duration(elapsed))
            }
            None => "never".to_string(),
        }
    }
}
