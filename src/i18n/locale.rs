//! Locale type: a validated, owned locale code.
//!
//! `Locale` is the key of every translation map and the element type of
//! every `LanguageSet`. The only rule enforced here is that the code is not
//! empty. Codes are kept exactly as given; whitespace trimming and case
//! normalisation happen in the registry at the boundary. Whether a locale is *supported* is decided by the
//! [`LocaleRegistry`](crate::i18n::LocaleRegistry) at the boundary.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use thiserror::Error;

/// Errors raised when building or validating a locale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocaleError {
    #[error("locale code must not be empty")]
    Empty,

    #[error("unsupported locale: '{0}'")]
    Unsupported(String),

    #[error("malformed locale code: '{0}'")]
    Malformed(String),
}

/// A non-empty locale code such as `"en"`, `"fr"` or `"pt-BR"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Create a locale from a code.
    ///
    /// Any non-empty code is accepted verbatim.
    ///
    /// # Example
    /// ```
    /// use catalog_i18n::i18n::Locale;
    ///
    /// let french = Locale::new("fr").unwrap();
    /// assert_eq!(french.code(), "fr");
    /// assert!(Locale::new("").is_err());
    /// ```
    pub fn new(code: impl AsRef<str>) -> Result<Self, LocaleError> {
        let code = code.as_ref();
        if code.is_empty() {
            return Err(LocaleError::Empty);
        }
        Ok(Self(code.to_string()))
    }

    /// The locale code as written.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// The primary language subtag (`"pt"` for `"pt-BR"`).
    pub fn primary(&self) -> &str {
        self.0
            .split(['-', '_'])
            .next()
            .unwrap_or(self.0.as_str())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locale {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Lets maps keyed by `Locale` be queried with a plain `&str`.
impl Borrow<str> for Locale {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Locale {
    type Error = LocaleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Locale::new(value)
    }
}

impl TryFrom<&str> for Locale {
    type Error = LocaleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Locale::new(value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

impl PartialEq<str> for Locale {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Locale {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
