//! The capability every translated catalog entity shares.

use crate::i18n::{Locale, LocaleContext};
use crate::translatable::{Fallback, LanguageSet, LocaleKeys, TranslatableField};
use std::collections::BTreeSet;
use tracing::debug;

/// A record owning translatable fields and a [`LanguageSet`].
///
/// Implementors only expose their parts; every translation operation is a
/// provided method. The record-level writes keep the `LanguageSet` in step
/// with the fields, unlike the raw [`TranslatableField`] operations.
pub trait TranslatableRecord {
    /// Names of the translatable fields, in the same order as
    /// [`translatable_fields`](Self::translatable_fields) returns them.
    const TRANSLATABLE_FIELDS: &'static [&'static str];

    /// Translatable fields that consult the fallback locale.
    const FALLBACK_FIELDS: &'static [&'static str] = &[];

    fn languages(&self) -> &LanguageSet;
    fn languages_mut(&mut self) -> &mut LanguageSet;

    fn display_locale(&self) -> Option<&Locale>;
    fn display_locale_mut(&mut self) -> &mut Option<Locale>;

    fn translatable_fields(&self) -> Vec<&dyn LocaleKeys>;
    fn translatable_fields_mut(&mut self) -> Vec<&mut dyn LocaleKeys>;

    /// Render this instance in `locale` from now on.
    ///
    /// Not checked against the `LanguageSet`: an unpopulated locale simply
    /// falls through to the current and fallback locales on read.
    fn set_display_locale(&mut self, locale: Locale) {
        *self.display_locale_mut() = Some(locale);
    }

    fn clear_display_locale(&mut self) {
        *self.display_locale_mut() = None;
    }

    /// Every locale populated in at least one translatable field.
    fn translated_locales(&self) -> BTreeSet<Locale> {
        self.translatable_fields()
            .into_iter()
            .flat_map(|field| field.populated_locales())
            .cloned()
            .collect()
    }

    /// Write one translation and track its locale.
    ///
    /// Returns `true` if the locale was new to the `LanguageSet`.
    fn set_translation<T, F>(&mut self, field: F, locale: Locale, value: T) -> bool
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> &mut TranslatableField<T>,
    {
        field(self).set(locale.clone(), value);
        self.languages_mut().insert(locale)
    }

    /// Remove one translation.
    ///
    /// The locale leaves the `LanguageSet` once no translatable field holds
    /// it any more.
    fn forget_translation<T, F>(&mut self, field: F, locale: &str) -> Option<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> &mut TranslatableField<T>,
    {
        let removed = field(self).forget(locale);
        if !self.translated_locales().contains(locale) {
            self.languages_mut().remove(locale);
        }
        removed
    }

    /// Delete every translation in `locale`.
    ///
    /// A locale missing from the `LanguageSet` is left alone and `false` is
    /// returned.
    fn delete_translation(&mut self, locale: &str) -> bool {
        if !self.languages().contains(locale) {
            debug!("Locale '{}' not in language set, nothing to delete", locale);
            return false;
        }
        for field in self.translatable_fields_mut() {
            field.forget_locale(locale);
        }
        self.languages_mut().remove(locale)
    }

    /// Locales present in some field but missing from the `LanguageSet`.
    fn untracked_locales(&self) -> Vec<Locale> {
        self.translated_locales()
            .into_iter()
            .filter(|locale| !self.languages().contains(locale.code()))
            .collect()
    }

    /// Prepend every untracked locale to the `LanguageSet`.
    ///
    /// Returns the locales that were added.
    fn sync_languages(&mut self) -> Vec<Locale> {
        let missing = self.untracked_locales();
        for locale in &missing {
            self.languages_mut().insert(locale.clone());
        }
        missing
    }

    /// Resolve every translatable field once through `ctx` and count the
    /// outcomes in its metrics recorder.
    fn record_resolutions(&self, ctx: &LocaleContext) {
        for (name, field) in Self::TRANSLATABLE_FIELDS.iter().zip(self.translatable_fields()) {
            let fallback = if Self::FALLBACK_FIELDS.contains(name) {
                Fallback::Enabled
            } else {
                Fallback::Disabled
            };
            ctx.record(field.resolution_step(ctx, self.display_locale(), fallback));
        }
    }

    /// `(field name, locale)` pairs whose locale is missing from the
    /// `LanguageSet`.
    fn untracked_translations(&self) -> Vec<(&'static str, Locale)> {
        Self::TRANSLATABLE_FIELDS
            .iter()
            .zip(self.translatable_fields())
            .flat_map(|(name, field)| {
                field
                    .populated_locales()
                    .into_iter()
                    .filter(|locale| !self.languages().contains(locale.code()))
                    .map(|locale| (*name, locale.clone()))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}
