//! Validated input types shared by the OpenMRS client crates.
//!
//! Values typed on the command line are checked here once, before any request is built, so the
//! gateway only ever serialises well-formed payloads.

use std::{fmt, str::FromStr};

/// Errors that can occur when creating validated input types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// The input did not name a gender OpenMRS accepts
    #[error("unknown gender '{0}' (expected M, F, O or U)")]
    UnknownGender(String),
}

/// A string type that guarantees non-empty content.
///
/// Input is trimmed during construction. Used for person names and patient identifiers, where
/// OpenMRS would otherwise accept a blank value and create an unusable record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Administrative gender as stored on an OpenMRS person.
///
/// Serialised as the single upper-case letter the REST API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    #[serde(rename = "O")]
    Other,
    #[serde(rename = "U")]
    Unknown,
}

impl Gender {
    pub fn as_code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
            Gender::Unknown => "U",
        }
    }
}

impl FromStr for Gender {
    type Err = TextError;

    /// Accepts the one-letter code in either case, or the full English word.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Ok(Gender::Male),
            "F" | "FEMALE" => Ok(Gender::Female),
            "O" | "OTHER" => Ok(Gender::Other),
            "U" | "UNKNOWN" => Ok(Gender::Unknown),
            _ => Err(TextError::UnknownGender(s.to_owned())),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}
