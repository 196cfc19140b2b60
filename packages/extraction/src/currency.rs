//! Currency detection and the shared exchange-rate note.
//!
//! The resolver runs once per run, before fan-out. Its output is the only
//! value every extraction task shares.

use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::error::{RateError, RateResult};
use crate::traits::rates::RateSource;

static CURRENCY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcurrency\s*[:\-]\s*([A-Z]{3})\b").expect("currency pattern is valid")
});

/// Read-only text injected verbatim into every extraction task.
///
/// Cloning shares the same allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichmentNote(Arc<str>);

impl EnrichmentNote {
    pub fn new(text: impl Into<Arc<str>>) -> Self {
        Self(text.into())
    }

    /// Note telling extractors which live rate to use.
    pub fn exchange_rate(currency: &str, home: &str, rate: f64, fetched: NaiveDate) -> Self {
        Self::new(format!(
            "LIVE EXCHANGE RATE: 1 {currency} = {rate:.4} {home} (fetched {})\n\
             Use this exact rate for all {home} conversions and agentRemarks.",
            fetched.format("%m/%d/%y"),
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EnrichmentNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Find a `Currency: XXX` style declaration. Returns the upper-cased code.
pub fn detect_currency(text: &str) -> Option<String> {
    CURRENCY_LINE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
}

/// Turns document text into an optional exchange-rate note.
///
/// Never fails: a missing declaration, the home currency, or any rate
/// source problem all yield `None`.
#[derive(Clone)]
pub struct CurrencyResolver {
    source: Arc<dyn RateSource>,
    home_currency: String,
    timeout: Duration,
}

impl CurrencyResolver {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self {
            source,
            home_currency: "CAD".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_home_currency(mut self, currency: impl Into<String>) -> Self {
        self.home_currency = currency.into().to_ascii_uppercase();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn home_currency(&self) -> &str {
        &self.home_currency
    }

    /// Resolve using `today` as the fetch date printed in the note.
    pub async fn resolve(&self, text: &str, today: NaiveDate) -> Option<EnrichmentNote> {
        let currency = detect_currency(text)?;
        if currency == self.home_currency {
            debug!(currency = %currency, "Document already in home currency");
            return None;
        }

        let start = Instant::now();
        let quote = tokio::time::timeout(
            self.timeout,
            self.source.quote(&currency, &self.home_currency),
        )
        .await;

        match quote {
            Ok(Ok(rate)) if rate.is_finite() && rate > 0.0 => {
                info!(
                    currency = %currency,
                    rate,
                    duration_ms = start.elapsed().as_millis(),
                    "Fetched exchange rate"
                );
                Some(EnrichmentNote::exchange_rate(
                    &currency,
                    &self.home_currency,
                    rate,
                    today,
                ))
            }
            Ok(Ok(rate)) => {
                warn!(currency = %currency, rate, "Rate source returned an unusable rate");
                None
            }
            Ok(Err(e)) => {
                warn!(currency = %currency, error = %e, "Exchange rate lookup failed");
                None
            }
            Err(_) => {
                warn!(
                    currency = %currency,
                    timeout_ms = self.timeout.as_millis(),
                    "Exchange rate lookup timed out"
                );
                None
            }
        }
    }
}

/// ECB reference rates via the Frankfurter API (no key required).
#[derive(Debug, Clone)]
pub struct FrankfurterRates {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LatestRates {
    rates: HashMap<String, f64>,
}

impl FrankfurterRates {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.frankfurter.app".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl Default for FrankfurterRates {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateSource for FrankfurterRates {
    async fn quote(&self, from: &str, to: &str) -> RateResult<f64> {
        let url = format!("{}/latest?from={}&to={}", self.base_url, from, to);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateError::Http(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateError::Status(status.as_u16()));
        }

        let body: LatestRates = response
            .json()
            .await
            .map_err(|e| RateError::Http(Box::new(e)))?;

        body.rates
            .get(to)
            .copied()
            .ok_or_else(|| RateError::MissingRate {
                currency: to.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockRateSource;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 19).unwrap()
    }

    #[test]
    fn test_detect_currency_variants() {
        assert_eq!(detect_currency("CURRENCY: usd"), Some("USD".into()));
        assert_eq!(detect_currency("Total 100\nCurrency - EUR\n"), Some("EUR".into()));
        assert_eq!(detect_currency("currency:GBP"), Some("GBP".into()));
        assert_eq!(detect_currency("Total: 100 EUR"), None);
        // Needs exactly three letters
        assert_eq!(detect_currency("Currency: EURO"), None);
    }

    #[test]
    fn test_note_format() {
        let note = EnrichmentNote::exchange_rate("EUR", "CAD", 1.482_345, today());
        assert_eq!(
            note.as_str(),
            "LIVE EXCHANGE RATE: 1 EUR = 1.4823 CAD (fetched 02/19/26)\n\
             Use this exact rate for all CAD conversions and agentRemarks."
        );
    }

    #[tokio::test]
    async fn test_home_currency_skips_lookup() {
        let rates = Arc::new(MockRateSource::new().with_rate("CAD", 1.0));
        let resolver = CurrencyResolver::new(rates.clone());

        assert!(resolver.resolve("Currency: CAD", today()).await.is_none());
        assert!(resolver.resolve("no declaration here", today()).await.is_none());
        assert!(rates.calls().is_empty());
    }

    #[tokio::test]
    async fn test_foreign_currency_fetches_once() {
        let rates = Arc::new(MockRateSource::new().with_rate("USD", 1.3571));
        let resolver = CurrencyResolver::new(rates.clone());

        let note = resolver.resolve("Currency: USD", today()).await.unwrap();

        assert!(note.as_str().starts_with("LIVE EXCHANGE RATE: 1 USD = 1.3571 CAD"));
        assert_eq!(rates.calls(), vec![("USD".to_string(), "CAD".to_string())]);
    }

    #[tokio::test]
    async fn test_source_failure_is_soft() {
        let rates = Arc::new(MockRateSource::new().failing());
        let resolver = CurrencyResolver::new(rates.clone());

        assert!(resolver.resolve("Currency: EUR", today()).await.is_none());
        assert_eq!(rates.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_source_times_out() {
        let rates = Arc::new(
            MockRateSource::new()
                .with_rate("EUR", 1.5)
                .with_delay(Duration::from_secs(30)),
        );
        let resolver = CurrencyResolver::new(rates).with_timeout(Duration::from_secs(10));

        assert!(resolver.resolve("Currency: EUR", today()).await.is_none());
    }

    #[tokio::test]
    async fn test_non_positive_rate_is_ignored() {
        let rates = Arc::new(MockRateSource::new().with_rate("JPY", 0.0));
        let resolver = CurrencyResolver::new(rates);

        assert!(resolver.resolve("Currency: JPY", today()).await.is_none());
    }
}
