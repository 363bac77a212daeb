//! Sampling frequency of a view, in whole hours.

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;

use crate::error::CoreError;

/// Spacing between two consecutive calendar entries.
///
/// Always a positive whole number of hours: every node of a view graph
/// aligns its children on this unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u32);

impl Frequency {
    /// Creates a frequency of `hours` hours.
    ///
    /// # Errors
    /// [`CoreError::InvalidFrequency`] when `hours` is zero.
    pub fn from_hours(hours: u32) -> Result<Self, CoreError> {
        if hours == 0 {
            return Err(CoreError::InvalidFrequency(
                "frequency must be at least one hour".to_string(),
            ));
        }
        Ok(Self(hours))
    }

    /// Number of hours between two calendar entries.
    #[must_use]
    pub fn hours(self) -> u32 {
        self.0
    }

    /// Frequency as a chrono duration.
    #[must_use]
    pub fn as_delta(self) -> TimeDelta {
        TimeDelta::hours(i64::from(self.0))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h", self.0)
    }
}

impl FromStr for Frequency {
    type Err = CoreError;

    /// Accepts `"6"`, `"6h"`, `"1d"`, `"360m"` and `"21600s"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_lowercase();
        let invalid = || CoreError::InvalidFrequency(s.to_string());

        let (digits, seconds_per_unit) = match text.char_indices().last() {
            Some((pos, 'h')) => (&text[..pos], 3600),
            Some((pos, 'd')) => (&text[..pos], 86_400),
            Some((pos, 'm')) => (&text[..pos], 60),
            Some((pos, 's')) => (&text[..pos], 1),
            Some(_) => (text.as_str(), 3600),
            None => return Err(invalid()),
        };

        let count: u64 = digits.trim().parse().map_err(|_| invalid())?;
        let seconds = count.checked_mul(seconds_per_unit).ok_or_else(invalid)?;
        if seconds % 3600 != 0 {
            return Err(CoreError::InvalidFrequency(format!(
                "{s} is not a whole number of hours"
            )));
        }
        let hours = u32::try_from(seconds / 3600).map_err(|_| invalid())?;
        Self::from_hours(hours)
    }
}

impl serde::Serialize for Frequency {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum FrequencyRaw {
    Hours(u64),
    Text(String),
}

impl<'de> serde::Deserialize<'de> for Frequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match FrequencyRaw::deserialize(deserializer)? {
            FrequencyRaw::Hours(hours) => u32::try_from(hours)
                .map_err(|_| CoreError::InvalidFrequency(hours.to_string()))
                .and_then(Frequency::from_hours)
                .map_err(serde::de::Error::custom),
            FrequencyRaw::Text(text) => text.parse().map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frequency_from_str() {
        assert_eq!("6h".parse::<Frequency>().unwrap().hours(), 6);
        assert_eq!("6H".parse::<Frequency>().unwrap().hours(), 6);
        assert_eq!("12".parse::<Frequency>().unwrap().hours(), 12);
        assert_eq!("1d".parse::<Frequency>().unwrap().hours(), 24);
        assert_eq!("180m".parse::<Frequency>().unwrap().hours(), 3);
        assert_eq!("3600s".parse::<Frequency>().unwrap().hours(), 1);
    }

    #[test]
    fn test_frequency_rejects_sub_hour_and_zero() {
        assert!("30m".parse::<Frequency>().is_err());
        assert!("0h".parse::<Frequency>().is_err());
        assert!("".parse::<Frequency>().is_err());
        assert!("six hours".parse::<Frequency>().is_err());
        assert!(Frequency::from_hours(0).is_err());
    }

    #[test]
    fn test_frequency_display_and_delta() {
        let f = Frequency::from_hours(6).unwrap();
        assert_eq!(f.to_string(), "6h");
        assert_eq!(f.as_delta(), TimeDelta::hours(6));
    }

    #[test]
    fn test_frequency_serde_accepts_number_and_string() {
        let from_number: Frequency = serde_json::from_str("6").unwrap();
        let from_text: Frequency = serde_json::from_str("\"1d\"").unwrap();
        assert_eq!(from_number.hours(), 6);
        assert_eq!(from_text.hours(), 24);
        assert!(serde_json::from_str::<Frequency>("0").is_err());

        let json = serde_json::to_string(&from_number).unwrap();
        assert_eq!(json, "\"6h\"");
        let back: Frequency = serde_json::from_str(&json).unwrap();
        assert_eq!(back, from_number);
    }
}
