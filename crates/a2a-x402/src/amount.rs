use std::fmt;
use std::str::FromStr;

use serde::ser::Error as _;
use serde::{Serialize, Serializer};

use crate::constants::{USDC_DECIMALS, USDC_UNIT};
use crate::error::AgentError;

/// An amount of USDC, held as integer micro-units (6 decimals).
///
/// Parsing never goes through `f64`. The marketplace expects `amount_usdc`
/// as a JSON number, so serialization converts to `f64`; amounts are capped
/// at [`UsdcAmount::MAX_EXACT`] (15 significant digits), where every value
/// survives that conversion and prints back as the same decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UsdcAmount(u64);

impl UsdcAmount {
    pub const ZERO: Self = Self(0);

    /// 999,999,999.999999 USDC.
    pub const MAX_EXACT: Self = Self(999_999_999_999_999);

    pub fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    pub fn micros(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Parse a decimal string such as `"1"`, `"0.25"` or `"$0.01"`.
    ///
    /// Digits beyond the sixth decimal place are rejected rather than
    /// silently truncated.
    pub fn parse(input: &str) -> Result<Self, AgentError> {
        let cleaned = input.trim().trim_start_matches('$');
        if cleaned.is_empty() {
            return Err(AgentError::InvalidAmount(format!(
                "invalid amount '{input}': empty"
            )));
        }
        if !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return Err(AgentError::InvalidAmount(format!(
                "invalid amount '{input}': expected a decimal number"
            )));
        }

        let (integer_part, fractional_part) = cleaned.split_once('.').unwrap_or((cleaned, ""));
        if fractional_part.contains('.') {
            return Err(AgentError::InvalidAmount(format!(
                "invalid amount '{input}': more than one decimal point"
            )));
        }
        if integer_part.is_empty() && fractional_part.is_empty() {
            return Err(AgentError::InvalidAmount(format!(
                "invalid amount '{input}': no digits"
            )));
        }

        let decimals = USDC_DECIMALS as usize;
        if fractional_part.len() > decimals {
            return Err(AgentError::InvalidAmount(format!(
                "invalid amount '{input}': more than {decimals} decimal places"
            )));
        }

        let integer: u64 = if integer_part.is_empty() {
            0
        } else {
            integer_part.parse().map_err(|e| {
                AgentError::InvalidAmount(format!("invalid amount '{input}': integer part: {e}"))
            })?
        };

        let fractional: u64 = if fractional_part.is_empty() {
            0
        } else {
            let padded = format!("{fractional_part:0<decimals$}");
            padded.parse().map_err(|e| {
                AgentError::InvalidAmount(format!("invalid amount '{input}': fractional part: {e}"))
            })?
        };

        integer
            .checked_mul(USDC_UNIT)
            .and_then(|v| v.checked_add(fractional))
            .filter(|micros| *micros <= Self::MAX_EXACT.0)
            .map(Self)
            .ok_or_else(|| {
                AgentError::InvalidAmount(format!(
                    "invalid amount '{input}': exceeds {}",
                    Self::MAX_EXACT
                ))
            })
    }

    /// Amount as whole USDC. Exact up to [`UsdcAmount::MAX_EXACT`].
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / USDC_UNIT as f64
    }
}

impl FromStr for UsdcAmount {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Renders like the marketplace's own formatting: at least one fractional
/// digit, trailing zeros dropped (`1.0`, `0.01`, `12.5`).
impl fmt::Display for UsdcAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let integer = self.0 / USDC_UNIT;
        let fractional = self.0 % USDC_UNIT;
        let digits = format!("{fractional:0width$}", width = USDC_DECIMALS as usize);
        let trimmed = digits.trim_end_matches('0');
        if trimmed.is_empty() {
            write!(f, "{integer}.0")
        } else {
            write!(f, "{integer}.{trimmed}")
        }
    }
}

impl Serialize for UsdcAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if *self > Self::MAX_EXACT {
            return Err(S::Error::custom(format!(
                "amount {self} exceeds {} and cannot be sent as an exact JSON number",
                Self::MAX_EXACT
            )));
        }
        serializer.serialize_f64(self.as_f64())
    }
}
