use regex::Regex;

/// Cleans raw headline text into the form the scorer operates on.
///
/// The pipeline is deterministic and order-sensitive: URLs are stripped
/// before the non-letter pass, otherwise their punctuation would leave
/// fragments of the URL behind (`httpexamplecom`). Construct once and
/// reuse; the regexes are compiled in [`Normalizer::new`].
pub struct Normalizer {
    url: Regex,
    mention: Regex,
    non_letter: Regex,
}

impl Normalizer {
    /// Compile the normalization regexes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            url: Regex::new(r"http\S+|www\S+").expect("valid url regex"),
            mention: Regex::new(r"@\w+|#").expect("valid mention regex"),
            non_letter: Regex::new(r"[^a-zA-Z\s]").expect("valid non-letter regex"),
        }
    }

    /// Normalize one headline. Pure and total: any input yields a (possibly
    /// empty) string of lowercase ASCII words separated by single spaces.
    ///
    /// Steps, in order: lowercase; strip URL tokens; strip `@mentions` and
    /// literal `#` markers (the hashtag word itself survives); strip every
    /// character outside ASCII letters and whitespace; collapse whitespace
    /// runs and trim.
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        let text = text.to_lowercase();
        let text = self.url.replace_all(&text, "");
        let text = self.mention.replace_all(&text, "");
        let text = self.non_letter.replace_all(&text, "");
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}
