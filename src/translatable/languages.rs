//! The denormalized list of locales a record has translations for.

use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate locale '{0}' in language set")]
pub struct DuplicateLocale(pub String);

/// Ordered, duplicate-free list of populated locales.
///
/// Newly added locales go to the front. Stored as a JSON array; decoding a
/// list that repeats a locale fails.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Locale>", into = "Vec<Locale>")]
pub struct LanguageSet(Vec<Locale>);

impl LanguageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The set a record starts with: only its creation locale.
    pub fn single(locale: Locale) -> Self {
        Self(vec![locale])
    }

    /// Add a locale at the front unless it is already present.
    ///
    /// Returns `true` if the set changed.
    pub fn insert(&mut self, locale: Locale) -> bool {
        if self.contains(locale.code()) {
            return false;
        }
        self.0.insert(0, locale);
        true
    }

    /// Remove a locale. Removing an absent locale is a no-op returning `false`.
    pub fn remove(&mut self, locale: &str) -> bool {
        match self.0.iter().position(|l| l.code() == locale) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.0.iter().any(|l| l.code() == locale)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Locale> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Locale] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Locale codes in set order.
    pub fn codes(&self) -> Vec<&str> {
        self.0.iter().map(Locale::code).collect()
    }
}

impl TryFrom<Vec<Locale>> for LanguageSet {
    type Error = DuplicateLocale;

    fn try_from(locales: Vec<Locale>) -> Result<Self, Self::Error> {
        for (index, locale) in locales.iter().enumerate() {
            if locales[..index].contains(locale) {
                return Err(DuplicateLocale(locale.code().to_string()));
            }
        }
        Ok(Self(locales))
    }
}

impl From<LanguageSet> for Vec<Locale> {
    fn from(set: LanguageSet) -> Self {
        set.0
    }
}

impl<'a> IntoIterator for &'a LanguageSet {
    type Item = &'a Locale;
    type IntoIter = std::slice::Iter<'a, Locale>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
