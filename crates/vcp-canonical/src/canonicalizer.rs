use serde_json::{Number, Value};
use std::fmt;

/// Error returned when canonicalization fails.
#[derive(thiserror::Error, Debug)]
pub enum CanonicalizationError {
    /// Non-finite number (NaN/Infinity) detected.
    #[error("non-finite number detected at {0}")]
    NonFiniteNumber(String),
    /// A number that is neither integral nor representable as `f64`.
    #[error("unrepresentable number at {0}")]
    UnrepresentableNumber(String),
    /// String encoding failed.
    #[error("string encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
    /// Canonical bytes were not valid UTF-8.
    #[error("canonical output is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Helper for building JSON paths in error messages.
#[derive(Debug, Clone)]
struct Path {
    segments: Vec<String>,
}

impl Path {
    fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    fn push_field(&self, field: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(field.to_string());
        Self { segments }
    }

    fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(format!("[{}]", index));
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            write!(f, "root")
        } else {
            write!(f, "{}", self.segments.join("."))
        }
    }
}

/// Canonicalizer that emits deterministic bytes for any JSON value.
///
/// Encoding rules:
/// - object members sorted by key (code point order), at every depth
/// - no whitespace between tokens (`,` and `:` separators only)
/// - strings written with literal Unicode; only `"`, `\` and control
///   characters are escaped
/// - integer literals in plain decimal at any magnitude (`-0` becomes `0`);
///   other numbers as `f64` in shortest round-trip form, with
///   exponent notation below `1e-4` and from `1e16` upward (`1e+16`,
///   `1.5e-07`)
/// - `true`, `false`, `null` literals
///
/// Two values that are equal ignoring key order produce identical bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Canonicalizer;

impl Canonicalizer {
    /// Creates a new canonicalizer.
    pub fn new() -> Self {
        Self
    }

    /// Produces the canonical UTF-8 bytes for `value`.
    pub fn canonicalize(&self, value: &Value) -> Result<Vec<u8>, CanonicalizationError> {
        let mut out = Vec::new();
        self.write_value(value, &Path::root(), &mut out)?;
        Ok(out)
    }

    /// Produces the canonical form as a `String`.
    pub fn canonicalize_to_string(&self, value: &Value) -> Result<String, CanonicalizationError> {
        let bytes = self.canonicalize(value)?;
        Ok(String::from_utf8(bytes)?)
    }

    #[allow(clippy::only_used_in_recursion)]
    fn write_value(
        &self,
        value: &Value,
        path: &Path,
        out: &mut Vec<u8>,
    ) -> Result<(), CanonicalizationError> {
        match value {
            Value::Null => out.extend_from_slice(b"null"),
            Value::Bool(true) => out.extend_from_slice(b"true"),
            Value::Bool(false) => out.extend_from_slice(b"false"),
            Value::Number(num) => write_number(num, path, out)?,
            Value::String(s) => write_string(s, out)?,
            Value::Array(items) => {
                out.push(b'[');
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        out.push(b',');
                    }
                    self.write_value(item, &path.push_index(idx), out)?;
                }
                out.push(b']');
            }
            Value::Object(map) => {
                // Sort explicitly; the map's own iteration order depends on
                // serde_json feature flags elsewhere in the build.
                let mut members: Vec<(&String, &Value)> = map.iter().collect();
                members.sort_by(|a, b| a.0.cmp(b.0));

                out.push(b'{');
                for (idx, (key, child)) in members.into_iter().enumerate() {
                    if idx > 0 {
                        out.push(b',');
                    }
                    write_string(key, out)?;
                    out.push(b':');
                    self.write_value(child, &path.push_field(key), out)?;
                }
                out.push(b'}');
            }
        }
        Ok(())
    }
}

fn write_string(s: &str, out: &mut Vec<u8>) -> Result<(), CanonicalizationError> {
    serde_json::to_writer(&mut *out, s)?;
    Ok(())
}

fn write_number(num: &Number, path: &Path, out: &mut Vec<u8>) -> Result<(), CanonicalizationError> {
    // With `arbitrary_precision` the number keeps its source text, so integers
    // of any magnitude are written digit for digit.
    let literal = num.to_string();
    if is_integer_literal(&literal) {
        let digits = if literal == "-0" { "0" } else { literal.as_str() };
        out.extend_from_slice(digits.as_bytes());
        return Ok(());
    }

    let value = num
        .as_f64()
        .ok_or_else(|| CanonicalizationError::UnrepresentableNumber(path.to_string()))?;
    if !value.is_finite() {
        return Err(CanonicalizationError::NonFiniteNumber(path.to_string()));
    }

    // `{:e}` yields the shortest round-trip digits; only the layout is changed.
    out.extend_from_slice(format_float(&format!("{:e}", value)).as_bytes());
    Ok(())
}

/// True for literals without a fraction or exponent, e.g. `-42`.
fn is_integer_literal(literal: &str) -> bool {
    let digits = literal.strip_prefix('-').unwrap_or(literal);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Re-lays out a shortest-digits float rendering into canonical form.
fn format_float(shortest: &str) -> String {
    let (sign, unsigned) = match shortest.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", shortest),
    };
    let (mantissa, exponent) = match unsigned.split_once(|c: char| c == 'e' || c == 'E') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (unsigned, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut digits = format!("{}{}", int_part, frac_part);
    // Position of the decimal point relative to the start of `digits`.
    let mut point = int_part.len() as i32 + exponent;

    let leading = digits.len() - digits.trim_start_matches('0').len();
    digits.drain(..leading);
    point -= leading as i32;
    let significant = digits.trim_end_matches('0').len();
    digits.truncate(significant);

    if digits.is_empty() {
        return format!("{}0.0", sign);
    }

    let len = digits.len() as i32;
    let body = if -4 < point && point <= 16 {
        if point <= 0 {
            format!("0.{}{}", "0".repeat((-point) as usize), digits)
        } else if point >= len {
            format!("{}{}.0", digits, "0".repeat((point - len) as usize))
        } else {
            let (whole, fraction) = digits.split_at(point as usize);
            format!("{}.{}", whole, fraction)
        }
    } else {
        let (first, rest) = digits.split_at(1);
        let exp = point - 1;
        let exp_sign = if exp < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{}e{}{:02}", first, exp_sign, exp.abs())
        } else {
            format!("{}.{}e{}{:02}", first, rest, exp_sign, exp.abs())
        }
    };

    format!("{}{}", sign, body)
}
