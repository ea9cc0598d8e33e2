//! # Value Objects
//!
//! Exact decimal amounts as reported by the node.

use std::fmt;
use std::str::FromStr;

use primitive_types::U256;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

/// Maximum number of fractional digits a [`Decimal`] can carry.
pub const MAX_DECIMAL_SCALE: u32 = 77;

/// Reasons a string is not a decimal amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecimalParseError {
    /// Nothing to parse.
    #[error("empty decimal")]
    Empty,

    /// Characters other than digits and a single point.
    #[error("invalid decimal literal: {0:?}")]
    Invalid(String),

    /// Too many digits for 256 bits.
    #[error("decimal out of range: {0:?}")]
    Overflow(String),
}

/// Non-negative decimal number.
///
/// Stored as `mantissa * 10^-scale`, normalized so that trailing fractional
/// zeros are stripped. `"1.50"` and `"1.5"` compare equal.
///
/// The mantissa is a `U256` and the scale is at most [`MAX_DECIMAL_SCALE`],
/// so precision is bounded: literals needing more than 256 bits of
/// significant digits fail with [`DecimalParseError::Overflow`] and surface
/// as decode errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Decimal {
    mantissa: U256,
    scale: u32,
}

impl Decimal {
    /// Zero.
    pub fn zero() -> Self {
        Self::default()
    }

    /// An integer amount.
    pub fn from_integer(value: impl Into<U256>) -> Self {
        Self {
            mantissa: value.into(),
            scale: 0,
        }
    }

    /// Build from raw parts, normalizing the scale.
    pub fn from_parts(mantissa: U256, scale: u32) -> Result<Self, DecimalParseError> {
        if scale > MAX_DECIMAL_SCALE {
            return Err(DecimalParseError::Overflow(format!("scale {}", scale)));
        }
        Ok(Self { mantissa, scale }.normalized())
    }

    /// Digits without the decimal point.
    pub fn mantissa(&self) -> U256 {
        self.mantissa
    }

    /// Number of fractional digits.
    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// True for zero.
    pub fn is_zero(&self) -> bool {
        self.mantissa.is_zero()
    }

    /// The value as an integer, if it has no fractional part.
    pub fn to_integer(&self) -> Option<U256> {
        (self.scale == 0).then_some(self.mantissa)
    }

    fn normalized(mut self) -> Self {
        let ten = U256::from(10u8);
        while self.scale > 0 && !self.mantissa.is_zero() && (self.mantissa % ten).is_zero() {
            self.mantissa = self.mantissa / ten;
            self.scale -= 1;
        }
        if self.mantissa.is_zero() {
            self.scale = 0;
        }
        self
    }
}

impl FromStr for Decimal {
    type Err = DecimalParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DecimalParseError::Empty);
        }

        let (int_part, frac_part) = match s.split_once('.') {
            Some((i, f)) => (i, f),
            None => (s, ""),
        };
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if int_part.is_empty() || !all_digits(int_part) || !all_digits(frac_part) {
            return Err(DecimalParseError::Invalid(s.to_string()));
        }
        if frac_part.len() > MAX_DECIMAL_SCALE as usize {
            return Err(DecimalParseError::Overflow(s.to_string()));
        }

        let digits = format!("{}{}", int_part, frac_part);
        let mantissa =
            U256::from_dec_str(&digits).map_err(|_| DecimalParseError::Overflow(s.to_string()))?;

        Self::from_parts(mantissa, frac_part.len() as u32)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.mantissa.to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }

        let padded = format!("{:0>width$}", digits, width = scale + 1);
        let (int_part, frac_part) = padded.split_at(padded.len() - scale);
        write!(f, "{}.{}", int_part, frac_part)
    }
}

impl Serialize for Decimal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Decimal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DecimalVisitor;

        impl Visitor<'_> for DecimalVisitor {
            type Value = Decimal;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative decimal as a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
                Ok(Decimal::from_integer(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
                u64::try_from(v)
                    .map(Decimal::from_integer)
                    .map_err(|_| E::custom(format!("negative amount {}", v)))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
                v.to_string().parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(DecimalVisitor)
    }
}

/// Serialize a [`U256`] as a plain decimal string.
pub fn serialize_u256_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}
