//! Labeled field extraction — lightweight regex-based scanner for
//! `Label: value` lines in free-text model output.

use regex::Regex;
use tracing::debug;

/// Characters a labeled value may consist of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// SAN-like move tokens: letters, digits and `+ # = -`.
    MoveChars,
    /// Decimal digits only.
    Digits,
}

impl CharClass {
    fn pattern(self) -> &'static str {
        match self {
            CharClass::MoveChars => r"A-Za-z0-9+#=\-",
            CharClass::Digits => r"0-9",
        }
    }
}

/// Scanner for the first `<label>:` occurrence followed by optional
/// whitespace and a maximal non-empty run of `class` characters.
#[derive(Debug, Clone)]
pub struct LabeledField {
    label: String,
    re: Regex,
}

impl LabeledField {
    pub fn new(label: &str, class: CharClass) -> Result<Self, regex::Error> {
        let pattern = format!(r"{}:\s*([{}]+)", regex::escape(label), class.pattern());
        Ok(Self {
            label: label.to_string(),
            re: Regex::new(&pattern)?,
        })
    }

    /// Returns the captured value of the first match, if any.
    pub fn extract<'a>(&self, text: &'a str) -> Option<&'a str> {
        let value = self.re.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str());
        if value.is_none() {
            debug!(label = %self.label, "Labeled field not found in response");
        }
        value
    }
}
