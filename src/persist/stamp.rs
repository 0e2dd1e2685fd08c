use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

use super::error::PersistError;

/// `strftime` layout of a run stamp, e.g. `05_03_2024_141502`.
pub const STAMP_FORMAT: &str = "%d_%m_%Y_%H%M%S";

/// Identifies the artifacts written by one run.
///
/// Create it once where a run starts and pass it to every save call, so all
/// files of the run share the same suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RunStamp(String);

impl RunStamp {
    /// Stamp for the current local time.
    #[must_use]
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }

    #[must_use]
    pub fn from_datetime<Tz>(at: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        Self(at.format(STAMP_FORMAT).to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `data_{stamp}.json`
    #[must_use]
    pub fn data_file(&self) -> String {
        format!("data_{}.json", self.0)
    }

    /// `embeddings_{stamp}.json`
    #[must_use]
    pub fn embeddings_file(&self) -> String {
        format!("embeddings_{}.json", self.0)
    }

    /// `INFO_{stamp}.txt`
    #[must_use]
    pub fn info_file(&self) -> String {
        format!("INFO_{}.txt", self.0)
    }
}

impl FromStr for RunStamp {
    type Err = PersistError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        NaiveDateTime::parse_from_str(value, STAMP_FORMAT).map_err(|_| {
            PersistError::InvalidStamp {
                value: value.to_string(),
            }
        })?;
        Ok(Self(value.to_string()))
    }
}

impl fmt::Display for RunStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
