//! Masking sensitive columns before records leave the source.
//!
//! Masks are written `column:algorithm[:param]`, for example `email:email`,
//! `card:credit_card` or `salary:range:10000`. Records are JSON objects. JSON
//! `null` passes through every mask except `redact`, `fixed` and `stars`.

use std::{
    borrow::Cow,
    collections::{BTreeMap, HashMap},
    str::FromStr,
};

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime};
use hmac::{Hmac, Mac};
use md5::Md5;
use rand::{distr::Alphanumeric, Rng};
use serde_json::{Map, Number, Value};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::common::*;

/// A parsed `column:algorithm[:param]` mask.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MaskConfig {
    /// The column to mask.
    pub column: String,
    /// The name of the masking algorithm.
    pub algorithm: String,
    /// An optional algorithm-specific parameter.
    pub param: Option<String>,
}

impl FromStr for MaskConfig {
    type Err = MaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = s.split(':').collect::<Vec<_>>();
        match parts[..] {
            [column, algorithm] => Ok(MaskConfig {
                column: column.to_owned(),
                algorithm: algorithm.to_owned(),
                param: None,
            }),
            [column, algorithm, param] => Ok(MaskConfig {
                column: column.to_owned(),
                algorithm: algorithm.to_owned(),
                param: Some(param.to_owned()),
            }),
            _ => Err(MaskError::InvalidConfig(s.to_owned())),
        }
    }
}

/// A masking algorithm, with its parameter resolved.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum MaskAlgorithm {
    /// Hex SHA-256 of the value.
    Sha256,
    /// Hex MD5 of the value.
    Md5,
    /// Hex HMAC-SHA256 of the value.
    Hmac { key: String },
    /// Keep the first and last letter of the local part of an email address.
    Email,
    /// Keep the first three digits of a phone number.
    Phone,
    /// Keep the last four digits of a card number.
    CreditCard,
    /// Keep the last four digits of a social security number.
    Ssn,
    /// Replace with `"REDACTED"`.
    Redact,
    /// Replace every character with `*`.
    Stars,
    /// Replace with fixed text.
    Fixed { text: String },
    /// Replace with a random value of the same shape.
    Random,
    /// Keep `chars_to_show` characters at each end.
    Partial { chars_to_show: usize },
    /// Keep only the first character.
    FirstLetter,
    /// Replace with a random UUID, stable per value.
    Uuid,
    /// Replace with a sequence number, stable per value.
    Sequential,
    /// Round to the nearest multiple of `precision`.
    Round { precision: f64 },
    /// Replace with the `"lower-upper"` bucket containing the value.
    Range { bucket_size: f64 },
    /// Add up to `level * |value|` of random noise.
    Noise { level: f64 },
    /// Move dates by up to `max_days` in either direction.
    DateShift { max_days: i64 },
    /// Keep only the year of a date.
    YearOnly,
    /// Keep only the year and month of a date.
    MonthYear,
}

impl MaskAlgorithm {
    /// Look up an algorithm by name, case-insensitively.
    pub fn from_name(algorithm: &str, param: Option<&str>) -> Result<Self, MaskError> {
        let name = algorithm.to_ascii_lowercase();
        let invalid = || MaskError::InvalidParam {
            algorithm: name.clone(),
            param: param.unwrap_or_default().to_owned(),
        };
        let positive_f64 = |default: f64| -> Result<f64, MaskError> {
            match param {
                None => Ok(default),
                Some(p) => match p.parse::<i64>() {
                    Ok(n) if n > 0 => Ok(n as f64),
                    _ => Err(invalid()),
                },
            }
        };

        Ok(match &name[..] {
            "hash" | "sha256" => MaskAlgorithm::Sha256,
            "md5" => MaskAlgorithm::Md5,
            "hmac" => MaskAlgorithm::Hmac {
                key: param.unwrap_or("default-key").to_owned(),
            },
            "email" => MaskAlgorithm::Email,
            "phone" => MaskAlgorithm::Phone,
            "credit_card" => MaskAlgorithm::CreditCard,
            "ssn" => MaskAlgorithm::Ssn,
            "redact" => MaskAlgorithm::Redact,
            "stars" => MaskAlgorithm::Stars,
            "fixed" => MaskAlgorithm::Fixed {
                text: param.unwrap_or("MASKED").to_owned(),
            },
            "random" => MaskAlgorithm::Random,
            "partial" => MaskAlgorithm::Partial {
                chars_to_show: match param {
                    None => 2,
                    Some(p) => p.parse().map_err(|_| invalid())?,
                },
            },
            "first_letter" => MaskAlgorithm::FirstLetter,
            "uuid" => MaskAlgorithm::Uuid,
            "sequential" => MaskAlgorithm::Sequential,
            "round" => MaskAlgorithm::Round {
                precision: positive_f64(10.0)?,
            },
            "range" => MaskAlgorithm::Range {
                bucket_size: positive_f64(100.0)?,
            },
            "noise" => MaskAlgorithm::Noise {
                level: match param {
                    None => 0.1,
                    Some(p) => match p.parse::<f64>() {
                        Ok(level) if level.is_finite() && level >= 0.0 => level,
                        _ => return Err(invalid()),
                    },
                },
            },
            "date_shift" => MaskAlgorithm::DateShift {
                max_days: match param {
                    None => 30,
                    Some(p) => match p.parse::<i64>() {
                        Ok(days) if (0..=36_500).contains(&days) => days,
                        _ => return Err(invalid()),
                    },
                },
            },
            "year_only" => MaskAlgorithm::YearOnly,
            "month_year" => MaskAlgorithm::MonthYear,
            _ => return Err(MaskError::UnknownAlgorithm(algorithm.to_ascii_lowercase())),
        })
    }
}

impl FromStr for MaskAlgorithm {
    type Err = MaskError;

    /// Parse `algorithm[:param]`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((algorithm, param)) => Self::from_name(algorithm, Some(param)),
            None => Self::from_name(s, None),
        }
    }
}

/// Applies masks, remembering the tokens it has handed out so that the same
/// input always gets the same token.
#[derive(Debug, Default)]
pub struct MaskingEngine {
    uuid_tokens: HashMap<String, String>,
    sequential_tokens: HashMap<String, u64>,
    sequential_counter: u64,
}

impl MaskingEngine {
    /// Create an engine with no tokens handed out yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask a single value.
    pub fn mask(&mut self, algorithm: &MaskAlgorithm, value: &Value) -> Result<Value> {
        let text = as_text(value);
        let masked = match algorithm {
            // Replacements which apply even to `null`.
            MaskAlgorithm::Redact => Value::from("REDACTED"),
            MaskAlgorithm::Fixed { text } => Value::from(text.as_str()),
            MaskAlgorithm::Stars if is_falsy(value) => Value::from(""),
            MaskAlgorithm::Stars => Value::from(stars(char_len(&text))),

            _ if value.is_null() => Value::Null,

            MaskAlgorithm::Sha256 => Value::from(hex::encode(Sha256::digest(text.as_bytes()))),
            MaskAlgorithm::Md5 => Value::from(hex::encode(Md5::digest(text.as_bytes()))),
            MaskAlgorithm::Hmac { key } => {
                let mut mac = Hmac::<Sha256>::new_from_slice(key.as_bytes())
                    .map_err(|_| format_err!("cannot use HMAC key"))?;
                mac.update(text.as_bytes());
                Value::from(hex::encode(mac.finalize().into_bytes()))
            }

            _ if is_falsy(value) && is_string_mask(algorithm) => value.clone(),
            MaskAlgorithm::Email => Value::from(mask_email(&text)),
            MaskAlgorithm::Phone => Value::from(mask_phone(&text)),
            MaskAlgorithm::CreditCard => Value::from(mask_credit_card(&text)),
            MaskAlgorithm::Ssn => Value::from(mask_ssn(&text)),
            MaskAlgorithm::Partial { chars_to_show } => {
                Value::from(partial_mask(&text, *chars_to_show))
            }
            MaskAlgorithm::FirstLetter => Value::from(first_letter_mask(&text)),

            MaskAlgorithm::Random => random_replace(value),
            MaskAlgorithm::Uuid => {
                let token = self
                    .uuid_tokens
                    .entry(text.into_owned())
                    .or_insert_with(|| Uuid::new_v4().to_string());
                Value::from(token.as_str())
            }
            MaskAlgorithm::Sequential => {
                let next = self.sequential_counter + 1;
                let token = *self
                    .sequential_tokens
                    .entry(text.into_owned())
                    .or_insert(next);
                if token == next {
                    self.sequential_counter = next;
                }
                Value::from(token)
            }

            MaskAlgorithm::Round { precision } => match as_number(value) {
                Some(num) => number_value((num / precision).round_ties_even() * precision),
                None => value.clone(),
            },
            MaskAlgorithm::Range { bucket_size } => match as_number(value) {
                Some(num) => {
                    let lower = (num / bucket_size).floor() * bucket_size;
                    Value::from(format!("{}-{}", lower as i64, (lower + bucket_size) as i64))
                }
                None => value.clone(),
            },
            MaskAlgorithm::Noise { level } => match as_number(value) {
                Some(num) => {
                    // Scale after sampling, so huge levels can't overflow the range.
                    let noise = rand::rng().random_range(-1.0_f64..=1.0) * *level * num.abs();
                    if value.is_i64() || value.is_u64() {
                        Value::from((num + noise).trunc() as i64)
                    } else {
                        number_value(num + noise)
                    }
                }
                None => value.clone(),
            },

            MaskAlgorithm::DateShift { max_days } => match parse_date(value) {
                Some(date) => {
                    let shift = rand::rng().random_range(-max_days..=*max_days);
                    match date.checked_add_signed(Duration::days(shift)) {
                        Some(shifted) => Value::from(shifted.format("%Y-%m-%d").to_string()),
                        None => value.clone(),
                    }
                }
                None => value.clone(),
            },
            MaskAlgorithm::YearOnly => match parse_date(value) {
                Some(date) => Value::from(date.year()),
                None => value.clone(),
            },
            MaskAlgorithm::MonthYear => match parse_date(value) {
                Some(date) => Value::from(format!("{}-{:02}", date.year(), date.month())),
                None => value.clone(),
            },
        };
        Ok(masked)
    }
}

/// Masks which leave empty strings, zeros and `false` alone.
fn is_string_mask(algorithm: &MaskAlgorithm) -> bool {
    matches!(
        algorithm,
        MaskAlgorithm::Email
            | MaskAlgorithm::Phone
            | MaskAlgorithm::CreditCard
            | MaskAlgorithm::Ssn
            | MaskAlgorithm::Partial { .. }
            | MaskAlgorithm::FirstLetter
    )
}

/// Is this value empty, zero, `false` or `null`?
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// The text we mask: strings as-is, booleans as `True` or `False`, and
/// anything else as JSON.
fn as_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Bool(true) => Cow::Borrowed("True"),
        Value::Bool(false) => Cow::Borrowed("False"),
        other => Cow::Owned(other.to_string()),
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

/// Use an integer if `num` is whole, so that `round` of an integer column
/// stays an integer.
fn number_value(num: f64) -> Value {
    if num.fract() == 0.0 && num.abs() < 9.0e15 {
        Value::from(num as i64)
    } else {
        Number::from_f64(num).map_or(Value::Null, Value::Number)
    }
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    let s = value.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn stars(n: usize) -> String {
    "*".repeat(n)
}

fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        None => partial_mask(email, 2),
        Some((local, domain)) => {
            let local_len = char_len(local);
            let masked_local = if local_len <= 2 {
                stars(local_len)
            } else {
                let mut chars = local.chars();
                let first = chars.next().unwrap_or_default();
                let last = chars.next_back().unwrap_or_default();
                format!("{}{}{}", first, stars(local_len - 2), last)
            };
            format!("{}@{}", masked_local, domain)
        }
    }
}

fn mask_phone(phone: &str) -> String {
    let digits = digits_only(phone);
    if digits.len() < 10 {
        stars(digits.len())
    } else {
        format!("{}-***-****", &digits[..3])
    }
}

fn mask_credit_card(card: &str) -> String {
    let digits = digits_only(card);
    if digits.len() < 12 {
        stars(digits.len())
    } else {
        format!("{}{}", stars(digits.len() - 4), &digits[digits.len() - 4..])
    }
}

fn mask_ssn(ssn: &str) -> String {
    let digits = digits_only(ssn);
    if digits.len() != 9 {
        stars(digits.len())
    } else {
        format!("***-**-{}", &digits[5..])
    }
}

fn partial_mask(s: &str, chars_to_show: usize) -> String {
    let chars = s.chars().collect::<Vec<_>>();
    if chars.len() <= chars_to_show.saturating_mul(2) {
        return stars(chars.len());
    }
    let head = chars[..chars_to_show].iter().collect::<String>();
    let tail = chars[chars.len() - chars_to_show..].iter().collect::<String>();
    format!("{}{}{}", head, stars(chars.len() - 2 * chars_to_show), tail)
}

fn first_letter_mask(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if chars.clone().next().is_some() => {
            format!("{}{}", first, stars(chars.count()))
        }
        _ => s.to_owned(),
    }
}

/// Replace a value with random data of the same shape: integers with the same
/// number of digits, floats between zero and twice the value, and strings
/// with random alphanumerics of the same length.
fn random_replace(value: &Value) -> Value {
    let mut rng = rand::rng();
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            let magnitude = n.to_string().trim_start_matches('-').len().min(18) as u32;
            let low = if magnitude == 1 { 1 } else { 10_i64.pow(magnitude - 1) };
            let high = 10_i64.pow(magnitude) - 1;
            Value::from(rng.random_range(low..=high))
        }
        Value::Number(n) => {
            let high = n.as_f64().unwrap_or_default().abs() * 2.0;
            if high > 0.0 && high.is_finite() {
                number_value(rng.random_range(0.0..high))
            } else {
                Value::from(0.0)
            }
        }
        Value::String(s) => Value::from(
            (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(char_len(s))
                .map(char::from)
                .collect::<String>(),
        ),
        other => Value::from(other.to_string()),
    }
}

/// Masks named columns of JSON records.
#[derive(Debug, Default)]
pub struct ColumnMasker {
    engine: MaskingEngine,
    masks: BTreeMap<String, MaskAlgorithm>,
}

impl ColumnMasker {
    /// Build a masker from `column:algorithm[:param]` strings. If a column is
    /// listed twice, the last mask wins.
    pub fn new<I, S>(configs: I) -> Result<Self, MaskError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut masks = BTreeMap::new();
        for config in configs {
            let config = config.as_ref().parse::<MaskConfig>()?;
            let algorithm =
                MaskAlgorithm::from_name(&config.algorithm, config.param.as_deref())?;
            masks.insert(config.column, algorithm);
        }
        Ok(ColumnMasker {
            engine: MaskingEngine::new(),
            masks,
        })
    }

    /// Build a masker from the `masks` in our configuration file.
    pub fn from_config(config: &Configuration) -> Result<Self> {
        Ok(Self::new(config.masks()?)?)
    }

    /// Are there any masks to apply?
    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    /// Mask any configured columns present in `record`. A column we fail to
    /// mask is left unchanged, with a warning.
    pub fn apply(&mut self, record: &mut Map<String, Value>) {
        for (column, algorithm) in &self.masks {
            if let Some(value) = record.get_mut(column) {
                match self.engine.mask(algorithm, value) {
                    Ok(masked) => *value = masked,
                    Err(err) => warn!("Failed to mask column {}: {}", column, err),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn mask(spec: &str, value: Value) -> Value {
        let algorithm = spec.parse::<MaskAlgorithm>().unwrap();
        MaskingEngine::new().mask(&algorithm, &value).unwrap()
    }

    #[test]
    fn parses_mask_configs() {
        assert_eq!(
            "email:email".parse::<MaskConfig>().unwrap(),
            MaskConfig {
                column: "email".to_owned(),
                algorithm: "email".to_owned(),
                param: None,
            },
        );
        assert_eq!(
            "name:partial:3".parse::<MaskConfig>().unwrap().param.as_deref(),
            Some("3"),
        );
        for bad in ["email", "a:b:c:d"] {
            assert_eq!(
                bad.parse::<MaskConfig>(),
                Err(MaskError::InvalidConfig(bad.to_owned())),
            );
        }
    }

    #[test]
    fn algorithm_names() {
        assert_eq!(MaskAlgorithm::from_name("SHA256", None), Ok(MaskAlgorithm::Sha256));
        assert_eq!(
            MaskAlgorithm::from_name("bogus", None),
            Err(MaskError::UnknownAlgorithm("bogus".to_owned())),
        );
        assert!(MaskAlgorithm::from_name("round", Some("0")).is_err());
        assert!(MaskAlgorithm::from_name("partial", Some("x")).is_err());
        assert!(MaskAlgorithm::from_name("noise", Some("-1")).is_err());
    }

    #[test]
    fn hashes() {
        assert_eq!(
            mask("sha256", json!("abc")),
            json!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"),
        );
        assert_eq!(mask("md5", json!("abc")), json!("900150983cd24fb0d6963f7d28e17f72"));
        assert_eq!(mask("hmac:k", json!(1)), mask("hmac:k", json!("1")));
        assert_ne!(mask("hmac:k", json!("a")), mask("hmac:other", json!("a")));
        assert_eq!(mask("sha256", Value::Null), Value::Null);
        assert_eq!(mask("sha256", json!(true)), mask("sha256", json!("True")));
        assert_eq!(mask("md5", json!(false)), mask("md5", json!("False")));
    }

    #[test]
    fn format_preserving_masks() {
        assert_eq!(mask("email", json!("john.doe@example.com")), json!("j******e@example.com"));
        assert_eq!(mask("email", json!("jo@example.com")), json!("**@example.com"));
        assert_eq!(mask("email", json!("notanemail")), json!("no******il"));
        assert_eq!(mask("phone", json!("+1 (555) 123-4567")), json!("155-***-****"));
        assert_eq!(mask("phone", json!("12345")), json!("*****"));
        assert_eq!(
            mask("credit_card", json!("4111 1111 1111 1234")),
            json!("************1234"),
        );
        assert_eq!(mask("ssn", json!("123-45-6789")), json!("***-**-6789"));
        assert_eq!(mask("ssn", json!("1234")), json!("****"));
        assert_eq!(mask("email", json!("")), json!(""));
    }

    #[test]
    fn redaction_and_partial_masks() {
        assert_eq!(mask("redact", json!("secret")), json!("REDACTED"));
        assert_eq!(mask("redact", Value::Null), json!("REDACTED"));
        assert_eq!(mask("stars", json!("abc")), json!("***"));
        assert_eq!(mask("stars", Value::Null), json!(""));
        assert_eq!(mask("fixed", json!("x")), json!("MASKED"));
        assert_eq!(mask("fixed:hidden", json!("x")), json!("hidden"));
        assert_eq!(mask("partial", json!("abcdefgh")), json!("ab****gh"));
        assert_eq!(mask("partial:1", json!("abc")), json!("a*c"));
        assert_eq!(mask("partial", json!("abcd")), json!("****"));
        assert_eq!(mask("first_letter", json!("Alice")), json!("A****"));
        assert_eq!(mask("first_letter", json!("A")), json!("A"));
    }

    #[test]
    fn random_keeps_shape() {
        let n = mask("random", json!(4321));
        let n = n.as_i64().unwrap();
        assert!((1000..=9999).contains(&n));

        let s = mask("random", json!("hello"));
        let s = s.as_str().unwrap();
        assert_eq!(s.len(), 5);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));

        let f = mask("random", json!(2.5)).as_f64().unwrap();
        assert!((0.0..5.0).contains(&f));
    }

    #[test]
    fn tokens_are_stable_per_engine() {
        let mut engine = MaskingEngine::new();
        let seq = MaskAlgorithm::Sequential;
        assert_eq!(engine.mask(&seq, &json!("a")).unwrap(), json!(1));
        assert_eq!(engine.mask(&seq, &json!("b")).unwrap(), json!(2));
        assert_eq!(engine.mask(&seq, &json!("a")).unwrap(), json!(1));

        let uuid = MaskAlgorithm::Uuid;
        let first = engine.mask(&uuid, &json!("a")).unwrap();
        assert_eq!(engine.mask(&uuid, &json!("a")).unwrap(), first);
        assert_ne!(engine.mask(&uuid, &json!("b")).unwrap(), first);
        assert!(Uuid::parse_str(first.as_str().unwrap()).is_ok());
    }

    #[test]
    fn numeric_masks() {
        assert_eq!(mask("round", json!(123)), json!(120));
        assert_eq!(mask("round:100", json!("1250")), json!(1200));
        assert_eq!(mask("round", json!("n/a")), json!("n/a"));
        assert_eq!(mask("range", json!(150)), json!("100-200"));
        assert_eq!(mask("range:10", json!(-5)), json!("-10-0"));
        assert_eq!(mask("noise:0", json!(42)), json!(42));

        let noisy = mask("noise:0.5", json!(100.0)).as_f64().unwrap();
        assert!((50.0..=150.0).contains(&noisy));
    }

    #[test]
    fn huge_noise_level_does_not_overflow() {
        let algorithm = "noise:1e308".parse::<MaskAlgorithm>().unwrap();
        assert_eq!(algorithm, MaskAlgorithm::Noise { level: 1e308 });
        let noisy = MaskingEngine::new()
            .mask(&algorithm, &json!(1.0e-300))
            .unwrap()
            .as_f64()
            .unwrap();
        assert!(noisy.is_finite());
        assert!(noisy.abs() <= 1.0e8 + 1.0);
    }

    #[test]
    fn date_masks() {
        assert_eq!(mask("year_only", json!("2023-06-15")), json!(2023));
        assert_eq!(mask("year_only", json!("2023-06-15T10:00:00Z")), json!(2023));
        assert_eq!(mask("month_year", json!("2023-06-15 10:00:00")), json!("2023-06"));
        assert_eq!(mask("month_year", json!("not a date")), json!("not a date"));
        assert_eq!(mask("date_shift:0", json!("2023-06-15T10:00:00Z")), json!("2023-06-15"));

        let shifted = mask("date_shift:5", json!("2023-06-15"));
        let shifted = NaiveDate::parse_from_str(shifted.as_str().unwrap(), "%Y-%m-%d").unwrap();
        let original = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        assert!((shifted - original).num_days().abs() <= 5);
    }

    #[test]
    fn column_masker_masks_only_listed_columns() {
        let mut masker = ColumnMasker::new(["email:email", "ssn:redact", "ssn:ssn"]).unwrap();
        let mut record = json!({
            "email": "jane@example.com",
            "ssn": "123456789",
            "name": "Jane",
        });
        masker.apply(record.as_object_mut().unwrap());
        assert_eq!(
            record,
            json!({
                "email": "j**e@example.com",
                "ssn": "***-**-6789",
                "name": "Jane",
            }),
        );
    }

    #[test]
    fn column_masker_rejects_bad_configs() {
        assert_eq!(
            ColumnMasker::new(["email"]).unwrap_err(),
            MaskError::InvalidConfig("email".to_owned()),
        );
        assert!(ColumnMasker::new(Vec::<String>::new()).unwrap().is_empty());
    }
}
