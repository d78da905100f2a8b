//! Value codec
//!
//! Splits textual property values into numeric components and the text
//! scaffolding around them, and stitches interpolated numbers back into the
//! same shape: `"rgb(10, 20, 30)"` becomes digits `[10, 20, 30]` and
//! scaffolding `["rgb(", ", ", ", ", ")"]`.

use crate::error::{AnimationError, Result};
use regex::Regex;
use smallvec::SmallVec;
use std::fmt;
use std::sync::OnceLock;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"-?\d*\.?\d+").expect("Invalid regex pattern"))
}

/// A property value as supplied by the caller
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    /// Whether the textual form ends in a non-digit (a unit such as `px`)
    pub fn has_unit(&self) -> bool {
        match self {
            Value::Number(n) => !n.is_finite(),
            Value::Text(text) => text.chars().last().is_some_and(|c| !c.is_ascii_digit()),
        }
    }

    /// Textual form with `unit` appended
    pub fn with_unit(&self, unit: &str) -> Value {
        Value::Text(format!("{self}{unit}"))
    }

    pub fn is_hex(&self) -> bool {
        matches!(self, Value::Text(text) if text.starts_with('#'))
    }

    pub fn is_rgb(&self) -> bool {
        matches!(self, Value::Text(text) if text.starts_with("rgb"))
    }

    pub fn split(&self) -> SplitValue {
        split(&self.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Text(text) => f.write_str(text),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value as f64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

/// Render a number the way a browser stringifies it: no trailing `.0`,
/// negative zero as `0`.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    format!("{n}")
}

/// One numeric component of a value.
///
/// Parsed components remember the text they were matched from, so an
/// unchanged component renders exactly as written (`"1.50"` stays `"1.50"`).
/// Computed components render with [`format_number`].
#[derive(Clone, Debug, PartialEq)]
pub struct Digit {
    pub value: f64,
    source: Option<String>,
}

impl Digit {
    /// Component matched from `text`, `None` if it is not a number
    pub fn parse(text: &str) -> Option<Self> {
        let value = text.parse::<f64>().ok()?;
        Some(Self {
            value,
            source: Some(text.to_string()),
        })
    }

    pub fn computed(value: f64) -> Self {
        Self {
            value,
            source: None,
        }
    }

    /// Text this component was parsed from
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl From<f64> for Digit {
    fn from(value: f64) -> Self {
        Digit::computed(value)
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(text) => f.write_str(text),
            None => f.write_str(&format_number(self.value)),
        }
    }
}

/// A value decomposed into numbers and the text around them.
///
/// `others.len() == digits.len() + 1`: leading and trailing scaffolding is
/// kept even when empty.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SplitValue {
    pub digits: SmallVec<[Digit; 4]>,
    pub others: SmallVec<[String; 5]>,
}

impl SplitValue {
    pub fn recompose(&self) -> String {
        recompose(&self.digits, &self.others)
    }

    /// Numeric values of every component
    pub fn values(&self) -> SmallVec<[f64; 4]> {
        self.digits.iter().map(|digit| digit.value).collect()
    }
}

/// Extract every `-?\d*\.?\d+` token as a number, keeping the residual text
pub fn split(text: &str) -> SplitValue {
    let pattern = number_pattern();
    let digits = pattern
        .find_iter(text)
        .filter_map(|m| Digit::parse(m.as_str()))
        .collect();
    let others = pattern.split(text).map(str::to_string).collect();
    SplitValue { digits, others }
}

/// Interleave `others[0], digits[0], others[1], ..., others[n]`
pub fn recompose(digits: &[Digit], others: &[String]) -> String {
    let mut out = String::new();
    for (i, piece) in others.iter().enumerate() {
        if i > 0 {
            if let Some(digit) = digits.get(i - 1) {
                out.push_str(&digit.to_string());
            }
        }
        out.push_str(piece);
    }
    out
}

/// Convert `#rgb` / `#rrggbb` to `rgb(r, g, b)`. Text already starting with
/// `rgb` passes through unchanged.
pub fn hex_to_rgb(text: &str) -> Result<String> {
    if text.starts_with("rgb") {
        return Ok(text.to_string());
    }

    let invalid = || AnimationError::InvalidColor(text.to_string());
    let hex = text.strip_prefix('#').unwrap_or(text);
    if !hex.is_ascii() {
        return Err(invalid());
    }

    let expanded: String = if hex.len() < 6 {
        hex.chars().flat_map(|c| [c, c]).collect()
    } else {
        hex.to_string()
    };
    if expanded.len() < 6 {
        return Err(invalid());
    }

    let channel = |i: usize| {
        u8::from_str_radix(&expanded[i * 2..i * 2 + 2], 16).map_err(|_| invalid())
    };
    let (r, g, b) = (channel(0)?, channel(1)?, channel(2)?);
    Ok(format!("rgb({r}, {g}, {b})"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extracts_numbers_and_scaffolding() {
        let split = split("translate(10px, -20.5px)");
        assert_eq!(split.values().as_slice(), &[10.0, -20.5]);
        assert_eq!(split.others.as_slice(), &["translate(", "px, ", "px)"]);
    }

    #[test]
    fn test_split_keeps_empty_edges() {
        let split = split("100px");
        assert_eq!(split.values().as_slice(), &[100.0]);
        assert_eq!(split.others.as_slice(), &["", "px"]);

        let split = super::split(".5");
        assert_eq!(split.values().as_slice(), &[0.5]);
        assert_eq!(split.others.as_slice(), &["", ""]);
    }

    #[test]
    fn test_split_without_numbers() {
        let split = split("auto");
        assert!(split.digits.is_empty());
        assert_eq!(split.others.as_slice(), &["auto"]);
        assert_eq!(split.recompose(), "auto");
    }

    #[test]
    fn test_recompose_inverts_split() {
        for text in [
            "0",
            "-45deg",
            "rgb(255, 128, 0)",
            "M10 20 L30.5 -40",
            "1.5 2.5 3.5",
            "scale(2) rotate(90deg)",
        ] {
            assert_eq!(split(text).recompose(), text);
        }
    }

    #[test]
    fn test_recompose_keeps_number_spelling() {
        for text in [
            "1.50px",
            ".5",
            "translateX(007px)",
            "-0deg",
            "0.10 0.20",
            "rgb(010, 20, 30)",
        ] {
            let split = split(text);
            assert_eq!(recompose(&split.digits, &split.others), text);
        }
        assert_eq!(split("1.50px").digits[0].source(), Some("1.50"));
        assert_eq!(split("-0deg").digits[0].value, 0.0);
    }

    #[test]
    fn test_recompose_substitutes_digits() {
        let others: Vec<String> = ["rgb(", ", ", ", ", ")"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let digits = [Digit::from(1.0), Digit::from(2.5), Digit::parse("03").unwrap()];
        assert_eq!(recompose(&digits, &others), "rgb(1, 2.5, 03)");
    }

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#fff").unwrap(), "rgb(255, 255, 255)");
        assert_eq!(hex_to_rgb("#1e90ff").unwrap(), "rgb(30, 144, 255)");
        assert_eq!(hex_to_rgb("#A0b").unwrap(), "rgb(170, 0, 187)");
        assert_eq!(hex_to_rgb("rgb(1, 2, 3)").unwrap(), "rgb(1, 2, 3)");
        assert!(matches!(hex_to_rgb("#zzz"), Err(AnimationError::InvalidColor(_))));
        assert!(hex_to_rgb("#").is_err());
    }

    #[test]
    fn test_number_formatting() {
        assert_eq!(Value::from(1.0).to_string(), "1");
        assert_eq!(Value::from(0.25).to_string(), "0.25");
        assert_eq!(Value::from(-0.0).to_string(), "0");
        assert_eq!(Value::from(-12).to_string(), "-12");
    }

    #[test]
    fn test_unit_detection() {
        assert!(!Value::from(10).has_unit());
        assert!(!Value::from("10").has_unit());
        assert!(Value::from("10px").has_unit());
        assert!(Value::from("50%").has_unit());
        assert_eq!(Value::from(10).with_unit("deg"), Value::from("10deg"));
    }
}
