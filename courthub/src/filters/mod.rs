//! Query-string filters applied to listed documents.

use regex::{Regex, RegexBuilder};

use crate::errors::{ValidationError, ValidationResult};

/// Case-insensitive literal substring matcher. Regex metacharacters in the
/// search term are matched as plain text.
#[derive(Debug, Clone)]
pub struct TextMatcher {
    pattern: Regex,
}

impl TextMatcher {
    /// Returns `None` for an absent or blank term, meaning "match everything".
    pub fn new(term: Option<&str>) -> ValidationResult<Option<Self>> {
        let Some(term) = term.map(str::trim).filter(|term| !term.is_empty()) else {
            return Ok(None);
        };
        let pattern = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .map_err(|err| ValidationError::single("search", "validation.pattern", err.to_string()))?;
        Ok(Some(Self { pattern }))
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Parses an optional numeric query bound. Blank and `*` mean unbounded.
pub fn parse_numeric_bound(field: &str, value: Option<&str>) -> ValidationResult<Option<f64>> {
    let Some(raw) = value.map(str::trim) else {
        return Ok(None);
    };
    if raw.is_empty() || raw == "*" {
        return Ok(None);
    }
    match raw.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(ValidationError::single(
            field,
            "validation.number",
            format!("{field} must be a number"),
        )),
    }
}

/// Inclusive numeric range with optional ends.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericRange {
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}
