use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error};

use crate::word::Word256;

/// Words serialize as `0x`-prefixed lowercase hex and accept either hex or
/// decimal strings on input.
impl Serialize for Word256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{self:#x}"))
    }
}

impl<'de> Deserialize<'de> for Word256 {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        word256::deser_hex_or_dec_str(d)
    }
}

pub mod word256 {
    use super::*;

    pub mod dec_str {
        use super::*;

        pub fn deserialize<'de, D>(d: D) -> Result<Word256, D::Error>
        where
            D: Deserializer<'de>,
        {
            let value = String::deserialize(d)?;
            if value.starts_with("0x") {
                return Err(D::Error::custom(format!(
                    "expected a decimal word, got {value}"
                )));
            }
            value
                .parse()
                .map_err(|e| D::Error::custom(format!("invalid word {value}: {e}")))
        }

        pub fn serialize<S>(value: &Word256, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.serialize_str(&value.to_string())
        }
    }

    pub fn deser_hex_or_dec_str<'de, D>(d: D) -> Result<Word256, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(d)?;
        value
            .trim()
            .parse()
            .map_err(|e| D::Error::custom(format!("invalid word {value}: {e}")))
    }

    pub mod vec {
        use super::*;
        use serde::de::IntoDeserializer;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Word256>, D::Error>
        where
            D: Deserializer<'de>,
        {
            let raw_vec = Vec::<String>::deserialize(deserializer)?;
            raw_vec
                .into_iter()
                .map(|s| super::deser_hex_or_dec_str(s.into_deserializer()))
                .collect()
        }

        pub fn serialize<S>(value: &[Word256], serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            serializer.collect_seq(value.iter().map(|word| format!("{word:#x}")))
        }
    }
}

pub mod duration {
    use super::*;

    pub mod opt {
        use super::*;

        pub fn deserialize<'de, D>(d: D) -> Result<Option<Duration>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(d)? {
                Some(value) => parse_duration(&value)
                    .map(Some)
                    .ok_or_else(|| D::Error::custom(format!("Failed to parse Duration: {value}"))),
                None => Ok(None),
            }
        }

        pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match value {
                Some(duration) => serializer.serialize_str(&format!("{}ms", duration.as_millis())),
                None => serializer.serialize_none(),
            }
        }
    }
}

/// Parses durations such as `"250ms"`, `"1.5s"` or `"1m30s"`.
///
/// Accepted units are `h`, `m`, `s`, `ms`, `us` and `ns`. A bare number is
/// read as milliseconds. Returns `None` on malformed input.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(millis) = input.parse::<u64>() {
        return Some(Duration::from_millis(millis));
    }

    let mut total = Duration::ZERO;
    let mut number = String::new();
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_ascii_digit() || c == '.' {
            number.push(c);
            continue;
        }
        let value: f64 = number.parse().ok()?;
        let secs = match c {
            'h' => 3600.0 * value,
            'm' if chars.peek() == Some(&'s') => {
                chars.next();
                value / 1_000.0
            }
            'm' => 60.0 * value,
            's' => value,
            'u' | 'µ' if chars.next() == Some('s') => value / 1_000_000.0,
            'n' if chars.next() == Some('s') => value / 1_000_000_000.0,
            _ => return None,
        };
        // Out of range or non-finite values are malformed, not a panic.
        let component = Duration::try_from_secs_f64(secs).ok()?;
        total = total.checked_add(component)?;
        number.clear();
    }
    // Trailing digits without a unit.
    if !number.is_empty() {
        return None;
    }
    Some(total)
}
