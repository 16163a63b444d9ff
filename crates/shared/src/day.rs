use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};
use time::Weekday;

#[derive(
    EnumString,
    Display,
    VariantArray,
    Serialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    pub fn weekday(self) -> Weekday {
        match self {
            Day::Sunday => Weekday::Sunday,
            Day::Monday => Weekday::Monday,
            Day::Tuesday => Weekday::Tuesday,
            Day::Wednesday => Weekday::Wednesday,
            Day::Thursday => Weekday::Thursday,
            Day::Friday => Weekday::Friday,
            Day::Saturday => Weekday::Saturday,
        }
    }

    /// Position of this day in a week that starts on `first_day`, 0 to 6.
    pub fn position_from(self, first_day: Day) -> u8 {
        let day = self.weekday().number_days_from_sunday();
        let first = first_day.weekday().number_days_from_sunday();

        (day + 7 - first) % 7
    }
}

// Same parser as `FromStr`, so config and catalog accept any letter case.
impl<'de> Deserialize<'de> for Day {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Day::from_str(&name)
            .map_err(|_| serde::de::Error::custom(format!("Invalid day: {name}")))
    }
}
