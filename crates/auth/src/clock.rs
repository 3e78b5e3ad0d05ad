//! Ban expiry computation.

use core::str::FromStr;

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::Denial;

/// How long a ban lasts.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BanDuration {
    #[serde(rename = "1_day")]
    OneDay,
    #[serde(rename = "1_week")]
    OneWeek,
    #[serde(rename = "1_month")]
    OneMonth,
    #[serde(rename = "permanent")]
    Permanent,
}

impl BanDuration {
    pub fn as_str(&self) -> &'static str {
        match self {
            BanDuration::OneDay => "1_day",
            BanDuration::OneWeek => "1_week",
            BanDuration::OneMonth => "1_month",
            BanDuration::Permanent => "permanent",
        }
    }
}

impl core::fmt::Display for BanDuration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BanDuration {
    type Err = Denial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1_day" => Ok(BanDuration::OneDay),
            "1_week" => Ok(BanDuration::OneWeek),
            "1_month" => Ok(BanDuration::OneMonth),
            "permanent" => Ok(BanDuration::Permanent),
            other => Err(Denial::invalid_input(format!(
                "ban duration must be one of 1_day, 1_week, 1_month, permanent (got '{other}')"
            ))),
        }
    }
}

/// When a ban issued at `now` ends. `Ok(None)` means permanent.
///
/// A calendar month clamps to the last valid day of the target month
/// (Jan 31 + 1 month = Feb 28, or Feb 29 in a leap year). A bounded ban
/// always ends strictly after `now`; an end past the representable range is
/// `InvalidInput`.
pub fn expiry(now: DateTime<Utc>, duration: BanDuration) -> Result<Option<DateTime<Utc>>, Denial> {
    let end = match duration {
        BanDuration::OneDay => now.checked_add_signed(Duration::hours(24)),
        BanDuration::OneWeek => now.checked_add_signed(Duration::days(7)),
        BanDuration::OneMonth => now.checked_add_months(Months::new(1)),
        BanDuration::Permanent => return Ok(None),
    };
    end.map(Some).ok_or_else(|| {
        Denial::invalid_input(format!("a {duration} ban starting at {now} ends out of range"))
    })
}
