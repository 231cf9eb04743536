//! # dishcheck types
//!
//! Small validated string types shared by the catalog, the ledger and the API layers.

use std::borrow::Borrow;

/// Errors that can occur when creating validated text types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
    /// A catalog code contained whitespace between other characters
    #[error("code must not contain whitespace: {0:?}")]
    Whitespace(String),
}

/// A string that holds at least one non-whitespace character.
///
/// Input is trimmed on construction, so `"  Carbonara "` is stored as `"Carbonara"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input` and rejects the result if nothing is left.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] for empty or whitespace-only input.
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

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// Identifier of an allergen or ingredient in the catalog (`"gluten"`, `"milk_protein"`).
///
/// Codes are trimmed, non-empty and free of inner whitespace. They compare and order as plain
/// strings, and maps keyed by `Code` can be queried with a `&str` through [`Borrow`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(String);

impl Code {
    /// Parses a catalog code.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::Empty`] for blank input and [`TextError::Whitespace`] when the
    /// trimmed code still contains whitespace.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(TextError::Whitespace(trimmed.to_owned()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Code {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Code {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for Code {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Code {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Code::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Carbonara ").unwrap();
        assert_eq!(text.as_str(), "Carbonara");
    }

    #[test]
    fn non_empty_text_rejects_whitespace_only() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!(NonEmptyText::new(""), Err(TextError::Empty));
    }

    #[test]
    fn code_rejects_inner_whitespace() {
        let err = Code::parse("milk protein").expect_err("should reject");
        assert_eq!(err, TextError::Whitespace("milk protein".into()));
    }

    #[test]
    fn code_set_can_be_queried_by_str() {
        let codes: BTreeSet<Code> = ["gluten", "lactose"]
            .into_iter()
            .map(|c| Code::parse(c).unwrap())
            .collect();
        assert!(codes.contains("gluten"));
        assert!(!codes.contains("soy"));
    }

    #[test]
    fn code_deserialize_validates() {
        let ok: Code = serde_json::from_str("\" eggs \"").unwrap();
        assert_eq!(ok.as_str(), "eggs");
        assert!(serde_json::from_str::<Code>("\"\"").is_err());
    }
}
