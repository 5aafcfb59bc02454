//! Currency codes and decimal precision policy.
//!
//! CRITICAL: Never use floating-point for money calculations. Amounts
//! are `rust_decimal::Decimal`, rounded to [`AMOUNT_SCALE`] decimal
//! places; stored FX rates are rounded to [`RATE_SCALE`].

use serde::{Deserialize, Serialize};

/// Decimal places for monetary amounts (raw and base currency).
pub const AMOUNT_SCALE: u32 = 2;

/// Decimal places for stored FX rates.
pub const RATE_SCALE: u32 = 4;

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Chinese Yuan
    Cny,
    /// Euro
    Eur,
    /// Japanese Yen
    Jpy,
    /// British Pound
    Gbp,
    /// Hong Kong Dollar
    Hkd,
    /// Macanese Pataca
    Mop,
}

impl Currency {
    /// All currencies the book supports.
    ///
    /// A rate pull fetches every one of these for the requested date, so a
    /// single pull satisfies subsequent lookups of any supported currency.
    pub const ALL: [Self; 7] = [
        Self::Usd,
        Self::Cny,
        Self::Eur,
        Self::Jpy,
        Self::Gbp,
        Self::Hkd,
        Self::Mop,
    ];

    /// The fixed global reference currency.
    ///
    /// Stored rates are quoted as units of the target currency per 100
    /// units of this currency.
    pub const REFERENCE: Self = Self::Usd;

    /// Returns the ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Cny => "CNY",
            Self::Eur => "EUR",
            Self::Jpy => "JPY",
            Self::Gbp => "GBP",
            Self::Hkd => "HKD",
            Self::Mop => "MOP",
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "CNY" => Ok(Self::Cny),
            "EUR" => Ok(Self::Eur),
            "JPY" => Ok(Self::Jpy),
            "GBP" => Ok(Self::Gbp),
            "HKD" => Ok(Self::Hkd),
            "MOP" => Ok(Self::Mop),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert_eq!(Currency::Cny.to_string(), "CNY");
        assert_eq!(Currency::Mop.to_string(), "MOP");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);
        assert_eq!(Currency::from_str("cny").unwrap(), Currency::Cny);
        assert_eq!(Currency::from_str("Hkd").unwrap(), Currency::Hkd);

        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_all_includes_reference() {
        assert!(Currency::ALL.contains(&Currency::REFERENCE));
    }

    #[test]
    fn test_round_trip_all() {
        for currency in Currency::ALL {
            assert_eq!(Currency::from_str(currency.code()).unwrap(), currency);
        }
    }
}
