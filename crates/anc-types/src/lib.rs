/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// The input text exceeded the maximum permitted length
    #[error("Text exceeds maximum length of {max} characters")]
    TooLong { max: usize },
}

/// Classification of a free-form identifier supplied by a user.
///
/// A raw identifier is never trusted: before any lookup it is classified by
/// shape so that callers can choose the cheapest applicable lookup strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// Empty (or whitespace-only) input.
    Empty,
    /// Decimal digits only; candidate for a direct by-ID lookup.
    Numeric,
    /// Contains an `@`; candidate for a by-email lookup.
    Email,
    /// Anything else (e.g. a partial name).
    FreeText,
}

/// An opaque identifier string as typed by a user.
///
/// May be empty, a decimal numeral, an email-shaped string, or free text.
/// The input is trimmed of leading and trailing whitespace during
/// construction; classification is available via [`RawIdentifier::kind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawIdentifier(String);

impl RawIdentifier {
    /// Creates a new `RawIdentifier` from the given input.
    ///
    /// Unlike other validated types in this crate, an empty input is
    /// permitted: emptiness is a meaningful classification
    /// ([`IdentifierKind::Empty`]) that resolution handles explicitly.
    pub fn new(input: impl AsRef<str>) -> Self {
        Self(input.as_ref().trim().to_owned())
    }

    /// Classifies the identifier by shape.
    pub fn kind(&self) -> IdentifierKind {
        if self.0.is_empty() {
            IdentifierKind::Empty
        } else if self.0.bytes().all(|b| b.is_ascii_digit()) {
            IdentifierKind::Numeric
        } else if self.0.contains('@') {
            IdentifierKind::Email
        } else {
            IdentifierKind::FreeText
        }
    }

    /// Returns the trimmed identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the trimmed input was empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for RawIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RawIdentifier {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl serde::Serialize for RawIdentifier {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for RawIdentifier {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(RawIdentifier::new(&s))
    }
}

/// A string type for clinician advice notes.
///
/// Wraps a `String` guaranteed to contain at least one non-whitespace
/// character and to be no longer than [`AdviceText::MAX_LEN`] characters.
/// The input is trimmed during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdviceText(String);

impl AdviceText {
    /// Maximum permitted advice length in characters.
    pub const MAX_LEN: usize = 5000;

    /// Creates a new `AdviceText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the
    /// trimmed result is empty, or longer than [`AdviceText::MAX_LEN`]
    /// characters, an error is returned.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` or `TextError::TooLong`.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(TextError::TooLong { max: Self::MAX_LEN });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AdviceText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AdviceText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for AdviceText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for AdviceText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        AdviceText::new(&s).map_err(serde::de::Error::custom)
    }
}
