//! Ticker symbols and the set of them a session watches.
//!
//! A ticker set comes either from a text file (one symbol per line, blank
//! lines and `#` comments ignored) or from an explicit list given on the
//! command line. Both paths normalize through [`Symbol::new`], so nothing
//! downstream can tell them apart.

use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Lines starting with this are ignored in ticker files.
const COMMENT_MARKER: char = '#';

/// Errors raised while building symbols or ticker sets.
#[derive(Debug, Error)]
pub enum TickerError {
    /// The input was empty after trimming whitespace.
    #[error("ticker symbol is empty")]
    EmptySymbol,

    /// The ticker file could not be opened or read.
    #[error("failed to read tickers from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A normalized ticker symbol: trimmed, uppercase, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(String);

impl Symbol {
    /// Normalize `raw` into a symbol.
    pub fn new(raw: &str) -> Result<Self, TickerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TickerError::EmptySymbol);
        }
        Ok(Self(trimmed.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// Deduplicated set of symbols for one run.
///
/// Built once at startup and never mutated afterwards. Iteration order is
/// unspecified; use [`TickerSet::sorted`] where order matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickerSet {
    symbols: HashSet<Symbol>,
}

impl TickerSet {
    /// Read a ticker file from disk.
    pub fn from_file(path: &Path) -> Result<Self, TickerError> {
        let read_err = |source| TickerError::Read {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(read_err)?;
        Self::from_reader(BufReader::new(file)).map_err(read_err)
    }

    /// Read a ticker listing from any buffered source.
    pub fn from_reader<R: BufRead>(reader: R) -> io::Result<Self> {
        let lines = reader.lines().collect::<io::Result<Vec<_>>>()?;
        Ok(load_ticker_set(lines))
    }

    /// Build a set from explicitly supplied symbols.
    ///
    /// Entries are normalized like file lines but not filtered: a `#` is kept
    /// as part of the symbol and a blank entry is an error.
    pub fn from_list<I, S>(items: I) -> Result<Self, TickerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items
            .into_iter()
            .map(|item| Symbol::new(item.as_ref()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, symbol: &str) -> bool {
        Symbol::new(symbol).is_ok_and(|s| self.symbols.contains(&s))
    }

    /// Symbols in ascending order.
    pub fn sorted(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.symbols.iter().cloned().collect();
        symbols.sort();
        symbols
    }
}

impl FromIterator<Symbol> for TickerSet {
    fn from_iter<T: IntoIterator<Item = Symbol>>(iter: T) -> Self {
        Self {
            symbols: iter.into_iter().collect(),
        }
    }
}

/// Parse ticker file lines into a set.
///
/// Blank lines and lines whose first non-whitespace character is `#` are
/// skipped. Everything else is trimmed and uppercased. Never fails.
pub fn load_ticker_set<I, S>(lines: I) -> TickerSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .filter_map(|line| {
            let line = line.as_ref().trim();
            if line.starts_with(COMMENT_MARKER) {
                return None;
            }
            // Blank lines fail here and are dropped.
            Symbol::new(line).ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn set_of(symbols: &[&str]) -> TickerSet {
        TickerSet::from_list(symbols).unwrap()
    }

    #[test]
    fn test_symbol_normalization() {
        let symbol = Symbol::new("  brk-b \t").unwrap();
        assert_eq!(symbol.as_str(), "BRK-B");
        assert_eq!(symbol, Symbol::new("BRK-B").unwrap());
    }

    #[test]
    fn test_symbol_rejects_blank() {
        assert!(matches!(Symbol::new(""), Err(TickerError::EmptySymbol)));
        assert!(matches!(Symbol::new("   "), Err(TickerError::EmptySymbol)));
    }

    #[test]
    fn test_load_filters_comments_and_blanks() {
        let set = load_ticker_set(["# comment", "", "  ", "msft", "GOOG"]);
        assert_eq!(set, set_of(&["MSFT", "GOOG"]));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_load_indented_comment_is_skipped() {
        let set = load_ticker_set(["   # indented", "aapl"]);
        assert_eq!(set, set_of(&["AAPL"]));
    }

    #[test]
    fn test_load_collapses_case_duplicates() {
        let set = load_ticker_set(["AAPL", "aapl", " Aapl "]);
        assert_eq!(set.len(), 1);
        assert!(set.contains("AAPL"));
        assert!(set.contains("aapl"));
    }

    #[test]
    fn test_load_is_idempotent() {
        let lines = ["tsla", "# skip", "nvda", "TSLA"];
        assert_eq!(load_ticker_set(lines), load_ticker_set(lines));
    }

    #[test]
    fn test_from_reader_handles_crlf() {
        let input = Cursor::new("ibm\r\n# note\r\n\r\nko\r\n");
        let set = TickerSet::from_reader(input).unwrap();
        assert_eq!(set, set_of(&["IBM", "KO"]));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# watchlist").unwrap();
        writeln!(file, "amzn").unwrap();
        writeln!(file, "meta").unwrap();
        let set = TickerSet::from_file(file.path()).unwrap();
        assert_eq!(set.sorted(), set_of(&["AMZN", "META"]).sorted());
    }

    #[test]
    fn test_from_file_missing() {
        let err = TickerSet::from_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, TickerError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn test_from_list_normalizes_without_filtering() {
        let set = TickerSet::from_list(["aapl", " msft ", "AAPL"]).unwrap();
        assert_eq!(set.sorted(), vec![
            Symbol::new("AAPL").unwrap(),
            Symbol::new("MSFT").unwrap(),
        ]);

        let set = TickerSet::from_list(["#odd"]).unwrap();
        assert!(set.contains("#ODD"));
    }

    #[test]
    fn test_from_list_rejects_blank_entry() {
        assert!(matches!(
            TickerSet::from_list(["AAPL", " "]),
            Err(TickerError::EmptySymbol)
        ));
    }

    #[test]
    fn test_both_paths_converge() {
        let from_file = load_ticker_set(["goog", "msft"]);
        let from_list = TickerSet::from_list(["GOOG", "msft"]).unwrap();
        assert_eq!(from_file, from_list);
    }

    #[test]
    fn test_sorted_is_ascending() {
        let set = load_ticker_set(["zm", "aapl", "msft"]);
        let sorted: Vec<String> = set.sorted().into_iter().map(String::from).collect();
        assert_eq!(sorted, ["AAPL", "MSFT", "ZM"]);
    }
}
