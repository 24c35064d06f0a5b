//! Locale-keyed values for one named attribute of a record.

use crate::i18n::{Locale, LocaleContext, ResolvedFrom};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether a field consults the configured fallback locale when neither the
/// display locale nor the current locale has a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    Disabled,
    Enabled,
}

/// A translatable attribute: a map from locale to value.
///
/// Serialized as a plain JSON object (`{"en": "Shoes", "fr": "Chaussures"}`),
/// which is also the stored form of the field.
///
/// The raw operations here (`set`, `forget`) never touch the owning record's
/// [`LanguageSet`](crate::translatable::LanguageSet); use the
/// [`TranslatableRecord`](crate::translatable::TranslatableRecord) methods to
/// keep it in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TranslatableField<T> {
    translations: BTreeMap<Locale, T>,
}

impl<T> Default for TranslatableField<T> {
    fn default() -> Self {
        Self {
            translations: BTreeMap::new(),
        }
    }
}

impl<T> TranslatableField<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A field holding one translation.
    pub fn single(locale: Locale, value: T) -> Self {
        let mut field = Self::new();
        field.set(locale, value);
        field
    }

    /// Insert or overwrite the value for `locale`, returning the previous one.
    pub fn set(&mut self, locale: Locale, value: T) -> Option<T> {
        self.translations.insert(locale, value)
    }

    /// The value stored for exactly `locale`, if any.
    pub fn get(&self, locale: &str) -> Option<&T> {
        self.translations.get(locale)
    }

    /// Remove the value for `locale`. Removing an absent locale is a no-op.
    pub fn forget(&mut self, locale: &str) -> Option<T> {
        self.translations.remove(locale)
    }

    pub fn contains(&self, locale: &str) -> bool {
        self.translations.contains_key(locale)
    }

    /// Locales that have a value, in code order.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.translations.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Locale, &T)> {
        self.translations.iter()
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    /// Resolve an unqualified read and report which step answered.
    ///
    /// Order: `display` override, then the context's current locale, then
    /// (only with [`Fallback::Enabled`]) the context's fallback locale. No
    /// other locale is ever substituted.
    pub fn resolve_from(
        &self,
        ctx: &LocaleContext,
        display: Option<&Locale>,
        fallback: Fallback,
    ) -> Option<(ResolvedFrom, &T)> {
        if let Some(value) = display.and_then(|locale| self.get(locale.code())) {
            return Some((ResolvedFrom::Display, value));
        }
        if let Some(value) = self.get(ctx.current().code()) {
            return Some((ResolvedFrom::Current, value));
        }
        if fallback == Fallback::Enabled {
            if let Some(value) = self.get(ctx.fallback().code()) {
                return Some((ResolvedFrom::Fallback, value));
            }
        }
        None
    }

    /// Resolve an unqualified read. Absent when nothing in the chain matches.
    ///
    /// The outcome is counted in the context's metrics recorder, if any.
    pub fn resolve(
        &self,
        ctx: &LocaleContext,
        display: Option<&Locale>,
        fallback: Fallback,
    ) -> Option<&T> {
        let resolved = self.resolve_from(ctx, display, fallback);
        ctx.record(resolved.map(|(from, _)| from));
        resolved.map(|(_, value)| value)
    }
}

/// Locale bookkeeping shared by every `TranslatableField<T>`, regardless of
/// its value type. Lets a record walk all of its fields at once.
pub trait LocaleKeys {
    fn populated_locales(&self) -> Vec<&Locale>;

    /// Remove `locale`; `true` if a value was removed.
    fn forget_locale(&mut self, locale: &str) -> bool;

    fn has_locale(&self, locale: &str) -> bool;

    /// Which step of the resolution chain would answer a read, without
    /// recording it.
    fn resolution_step(
        &self,
        ctx: &LocaleContext,
        display: Option<&Locale>,
        fallback: Fallback,
    ) -> Option<ResolvedFrom>;
}

impl<T> LocaleKeys for TranslatableField<T> {
    fn populated_locales(&self) -> Vec<&Locale> {
        self.locales().collect()
    }

    fn forget_locale(&mut self, locale: &str) -> bool {
        self.forget(locale).is_some()
    }

    fn has_locale(&self, locale: &str) -> bool {
        self.contains(locale)
    }

    fn resolution_step(
        &self,
        ctx: &LocaleContext,
        display: Option<&Locale>,
        fallback: Fallback,
    ) -> Option<ResolvedFrom> {
        self.resolve_from(ctx, display, fallback).map(|(from, _)| from)
    }
}

impl TranslatableField<String> {
    /// Resolve a text field; unresolved reads are the empty string.
    pub fn resolve_text(&self, ctx: &LocaleContext, display: Option<&Locale>) -> &str {
        self.resolve(ctx, display, Fallback::Disabled)
            .map(String::as_str)
            .unwrap_or("")
    }
}
