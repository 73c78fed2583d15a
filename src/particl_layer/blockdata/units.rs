use std::convert::TryFrom;
use std::fmt;

use crate::errors::*;
use crate::particl_layer::network::constants::AMOUNT_DECIMAL_POINT;

/// Integer amount in satoshis (1e-8 PART).
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(pub u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn as_sat(&self) -> u64 {
        self.0
    }

    pub fn from_sat(satoshis: u64) -> Self {
        Amount(satoshis)
    }

    /// Parses a backend decimal amount (`"1352.23715049"`) into minor units.
    ///
    /// An empty string is zero. Digits past `decimal_point` are truncated, the same
    /// way the backend's own integer conversion behaves. Signs, exponents and any
    /// other non-digit characters are rejected.
    pub fn from_decimal_str(s: &str, decimal_point: usize) -> Result<Self> {
        let fail = || Error::from(ErrorKind::AmountConversion(s.to_string()));
        let (int_part, frac_part) = match s.find('.') {
            Some(i) => (&s[..i], &s[i + 1..]),
            None => (s, ""),
        };
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
            || (s.contains('.') && int_part.is_empty() && frac_part.is_empty())
        {
            return Err(fail());
        }
        let mut digits = String::with_capacity(int_part.len() + decimal_point);
        digits.push_str(int_part);
        if frac_part.len() > decimal_point {
            digits.push_str(&frac_part[..decimal_point]);
        } else {
            digits.push_str(frac_part);
            digits.extend(std::iter::repeat('0').take(decimal_point - frac_part.len()));
        }
        if digits.is_empty() {
            return Ok(Amount::ZERO);
        }
        digits.parse::<u64>().map(Amount).map_err(|_| fail())
    }

    /// Formats the amount with `decimal_point` fractional digits.
    pub fn to_decimal_string(&self, decimal_point: usize) -> String {
        if decimal_point == 0 {
            return self.0.to_string();
        }
        // past 10^19 every u64 is a pure fraction
        match u32::try_from(decimal_point)
            .ok()
            .and_then(|exp| 10u64.checked_pow(exp))
        {
            Some(divisor) => format!(
                "{}.{:0width$}",
                self.0 / divisor,
                self.0 % divisor,
                width = decimal_point
            ),
            None => format!("0.{:0width$}", self.0, width = decimal_point),
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string(AMOUNT_DECIMAL_POINT))
    }
}

impl std::ops::Add for Amount {
    type Output = Amount;

    fn add(self, other: Amount) -> Amount {
        Amount(self.0 + other.0)
    }
}

impl std::iter::Sum for Amount {
    fn sum<I: Iterator<Item = Amount>>(iter: I) -> Amount {
        iter.fold(Amount(0), |acc, val| acc + val)
    }
}

impl From<u64> for Amount {
    fn from(satoshis: u64) -> Self {
        Amount(satoshis)
    }
}

impl From<Amount> for u64 {
    fn from(amount: Amount) -> u64 {
        amount.0
    }
}
