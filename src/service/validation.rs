//! Declarative field rules evaluated in order against a single form value.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Human-readable message for the first rule a value broke.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        ValidationError(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Rule {
    /// Trimmed value must not be empty.
    Required,
    MaxLength(usize),
    MinLength(usize),
    PositiveInteger,
    /// Only checked when the value is numeric; anything else passes.
    Range(f64, f64),
}

impl FromStr for Rule {
    type Err = ValidationError;

    /// Parses `required`, `maxLength:N`, `minLength:N`, `positiveInteger`, `range:MIN:MAX`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ValidationError::new(format!("unknown validation rule: {}", s));
        let mut parts = s.split(':');
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();
        let rule = match (name, args.as_slice()) {
            ("required", []) => Rule::Required,
            ("positiveInteger", []) => Rule::PositiveInteger,
            ("maxLength", [n]) => Rule::MaxLength(n.trim().parse().map_err(|_| unknown())?),
            ("minLength", [n]) => Rule::MinLength(n.trim().parse().map_err(|_| unknown())?),
            ("range", [min, max]) => {
                let min: f64 = min.trim().parse().map_err(|_| unknown())?;
                let max: f64 = max.trim().parse().map_err(|_| unknown())?;
                Rule::Range(min, max)
            }
            _ => return Err(unknown()),
        };
        Ok(rule)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => write!(f, "required"),
            Rule::MaxLength(n) => write!(f, "maxLength:{}", n),
            Rule::MinLength(n) => write!(f, "minLength:{}", n),
            Rule::PositiveInteger => write!(f, "positiveInteger"),
            Rule::Range(min, max) => write!(f, "range:{}:{}", min, max),
        }
    }
}

/// Lenient numeric coercion used by `PositiveInteger` and `Range`.
/// Surrounding whitespace is ignored and a blank string counts as zero.
/// Accepts decimal and exponent notation, unsigned `0x`/`0o`/`0b` integers,
/// and `Infinity` with an optional sign. Anything else is non-numeric.
pub fn parse_number(value: &str) -> Option<f64> {
    let v = value.trim();
    if v.is_empty() {
        return Some(0.0);
    }
    let unsigned = v.strip_prefix(['+', '-']).unwrap_or(v);
    if unsigned == "Infinity" {
        return Some(if v.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY });
    }
    if let Some(radix) = radix_prefix(v) {
        return parse_radix(&v[2..], radix);
    }
    // `str::parse::<f64>` also takes `inf` and `nan` spellings.
    if !v.bytes().all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) {
        return None;
    }
    v.parse::<f64>().ok()
}

fn radix_prefix(v: &str) -> Option<u32> {
    match v.get(..2)? {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    }
}

fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    Some(
        digits
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
    )
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn rule_error(field_name: &str, value: &str, rule: &Rule) -> Option<String> {
    match *rule {
        Rule::Required => value
            .trim()
            .is_empty()
            .then(|| format!("{} is required", field_name)),
        Rule::MaxLength(max) => {
            (char_len(value) > max).then(|| format!("{} must be at most {} characters", field_name, max))
        }
        Rule::MinLength(min) => {
            (char_len(value) < min).then(|| format!("{} must be at least {} characters", field_name, min))
        }
        Rule::PositiveInteger => {
            let ok = parse_number(value).is_some_and(|n| n.is_finite() && n > 0.0 && n.fract() == 0.0);
            (!ok).then(|| format!("{} must be a positive integer", field_name))
        }
        Rule::Range(min, max) => match parse_number(value) {
            Some(n) if n < min || n > max => Some(format!("{} must be between {} and {}", field_name, min, max)),
            _ => None,
        },
    }
}

/// Check `value` against `rules` in order and return the first violation's message.
///
/// ```
/// use notekeeper::service::{validate, Rule};
///
/// let err = validate("Title", "", &[Rule::Required, Rule::MaxLength(3)]);
/// assert_eq!(err.as_deref(), Some("Title is required"));
/// ```
pub fn validate(field_name: &str, value: &str, rules: &[Rule]) -> Option<String> {
    rules.iter().find_map(|rule| rule_error(field_name, value, rule))
}

/// `validate` as a `Result`, for chaining with `?`.
pub fn check(field_name: &str, value: &str, rules: &[Rule]) -> ValidationResult<()> {
    match validate(field_name, value, rules) {
        Some(message) => Err(ValidationError::new(message)),
        None => Ok(()),
    }
}

/// Parse declarative rule strings such as `["required", "maxLength:100"]`.
pub fn parse_rules<S: AsRef<str>>(rules: &[S]) -> ValidationResult<Vec<Rule>> {
    rules.iter().map(|r| r.as_ref().parse()).collect()
}
