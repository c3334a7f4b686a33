//! Ticker universe for batch backtesting.
//!
//! Parses ticker lists from configuration or a ticker file and normalises
//! them to unique upper-case symbols, preserving order.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    DuplicateCode(String),

    #[error("ticker list is empty")]
    Empty,

    #[error("ticker file has no '{0}' column")]
    MissingColumn(String),
}

/// Parse a comma-separated list such as `"aapl, MSFT,nvda"`.
pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    normalize_codes(input.split(','))
}

/// Trim, upper-case and de-duplicate tickers, keeping their order.
pub fn normalize_codes<'a, I>(tokens: I) -> Result<Vec<String>, UniverseError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    if codes.is_empty() {
        return Err(UniverseError::Empty);
    }
    Ok(codes)
}
