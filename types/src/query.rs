//! The immutable input to every verification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;

/// Date format accepted for dates of birth and death.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A request to verify whether a person is deceased.
///
/// The name is whitespace-collapsed and the country upper-cased on
/// construction; everything else is stored as given and checked by
/// [`VerificationQuery::validate`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationQuery {
    full_name: String,
    date_of_birth: String,
    country: String,
    #[serde(default)]
    national_id: Option<String>,
    #[serde(default)]
    last_known_location: Option<String>,
    #[serde(default)]
    claimed_date_of_death: Option<String>,
}

impl VerificationQuery {
    pub fn new(
        full_name: impl AsRef<str>,
        date_of_birth: impl Into<String>,
        country: impl AsRef<str>,
    ) -> Self {
        Self {
            full_name: collapse_whitespace(full_name.as_ref()),
            date_of_birth: date_of_birth.into().trim().to_string(),
            country: country.as_ref().trim().to_uppercase(),
            national_id: None,
            last_known_location: None,
            claimed_date_of_death: None,
        }
    }

    pub fn with_national_id(mut self, national_id: impl Into<String>) -> Self {
        self.national_id = Some(national_id.into());
        self
    }

    pub fn with_last_known_location(mut self, location: impl Into<String>) -> Self {
        self.last_known_location = Some(location.into());
        self
    }

    pub fn with_claimed_date_of_death(mut self, date: impl Into<String>) -> Self {
        self.claimed_date_of_death = Some(date.into().trim().to_string());
        self
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn date_of_birth(&self) -> &str {
        &self.date_of_birth
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn national_id(&self) -> Option<&str> {
        self.national_id.as_deref()
    }

    pub fn last_known_location(&self) -> Option<&str> {
        self.last_known_location.as_deref()
    }

    pub fn claimed_date_of_death(&self) -> Option<&str> {
        self.claimed_date_of_death.as_deref()
    }

    /// The claimed date of death, if present and well-formed.
    pub fn claimed_death_date(&self) -> Option<NaiveDate> {
        self.claimed_date_of_death
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
    }

    /// Check that the query is complete enough to send to any source.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.full_name.is_empty() {
            return Err(QueryError::EmptyName);
        }
        if self.country.is_empty() {
            return Err(QueryError::EmptyCountry);
        }
        parse_date("date_of_birth", &self.date_of_birth)?;
        if let Some(dod) = &self.claimed_date_of_death {
            parse_date("claimed_date_of_death", dod)?;
        }
        Ok(())
    }

    /// First and last name tokens. `None` for single-token names.
    pub fn first_and_last(&self) -> Option<(&str, &str)> {
        let mut tokens = self.full_name.split(' ');
        let first = tokens.next()?;
        let last = tokens.last()?;
        Some((first, last))
    }

    /// Deterministic cache key over (full name, date of birth, country).
    pub fn cache_key(&self) -> String {
        format!(
            "{}|{}|{}",
            self.full_name.to_lowercase(),
            self.date_of_birth,
            self.country
        )
    }

    /// Name-derived key (`first_last`, lower-case) used by the demo lookup table.
    pub fn name_key(&self) -> Option<String> {
        let (first, last) = self.first_and_last()?;
        Some(format!("{}_{}", first.to_lowercase(), last.to_lowercase()))
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| QueryError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
