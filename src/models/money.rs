use std::{fmt, str::FromStr};

/// Dollar amount held as whole cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    cents: u64,
}

impl Money {
    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub fn from_dollars(dollars: u64) -> Self {
        Self {
            cents: dollars.saturating_mul(100),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.cents / 100, self.cents % 100)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount `{0}`")]
pub struct InvalidAmount(pub String);

impl FromStr for Money {
    type Err = InvalidAmount;

    /// Accepts what drivers type into an amount field: `76`, `76.5`, `$1,076.50`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidAmount(s.to_string());
        let trimmed = s.trim();
        let raw = trimmed
            .strip_prefix('$')
            .unwrap_or(trimmed)
            .trim()
            .replace(',', "");

        let (whole, frac) = raw.split_once('.').unwrap_or((raw.as_str(), ""));
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if !all_digits(whole) || !all_digits(frac) || frac.len() > 2 {
            return Err(invalid());
        }

        let dollars: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_cents: u64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => frac.parse().map_err(|_| invalid())?,
        };

        dollars
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(frac_cents))
            .map(Money::from_cents)
            .ok_or_else(invalid)
    }
}
