use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};

use tickersent_core::FeedSpec;

/// A named feed endpoint template taken from the watchlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSource {
    pub name: String,
    url_template: String,
}

impl FeedSource {
    #[must_use]
    pub fn new(name: impl Into<String>, url_template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url_template: url_template.into(),
        }
    }

    /// Build sources from validated watchlist feed specs.
    #[must_use]
    pub fn from_specs(specs: &[FeedSpec]) -> Vec<Self> {
        specs
            .iter()
            .map(|spec| Self::new(spec.name.clone(), spec.url.clone()))
            .collect()
    }

    /// Substitute the symbol into the `{symbol}` placeholder.
    ///
    /// The symbol is percent-encoded so tickers with separators (`BRK.B`)
    /// stay valid inside query strings.
    #[must_use]
    pub fn url_for(&self, symbol: &str) -> String {
        let encoded = utf8_percent_encode(symbol, NON_ALPHANUMERIC).to_string();
        self.url_template.replace("{symbol}", &encoded)
    }
}
