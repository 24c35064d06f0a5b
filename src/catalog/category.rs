use crate::catalog::Status;
use crate::i18n::{Locale, LocaleContext};
use crate::translatable::{LanguageSet, LocaleKeys, TranslatableField, TranslatableRecord};
use serde::{Deserialize, Serialize};

/// A product category with a translated title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Option<i64>,
    pub title: TranslatableField<String>,
    pub status: Status,
    pub languages: LanguageSet,
    #[serde(skip)]
    display_locale: Option<Locale>,
}

impl Category {
    /// A new, unsaved category translated into `locale` only.
    pub fn new(locale: Locale, title: impl Into<String>, status: Status) -> Self {
        Self {
            id: None,
            title: TranslatableField::single(locale.clone(), title.into()),
            status,
            languages: LanguageSet::single(locale),
            display_locale: None,
        }
    }

    /// Write the `locale` translation and status, then render in `locale`.
    pub fn update(&mut self, locale: Locale, title: impl Into<String>, status: Status) {
        self.set_translation(|c| &mut c.title, locale.clone(), title.into());
        self.status = status;
        self.set_display_locale(locale);
    }

    /// The title in the best available locale, or `""`.
    pub fn title(&self, ctx: &LocaleContext) -> &str {
        self.title.resolve_text(ctx, self.display_locale.as_ref())
    }
}

impl TranslatableRecord for Category {
    const TRANSLATABLE_FIELDS: &'static [&'static str] = &["title"];

    fn languages(&self) -> &LanguageSet {
        &self.languages
    }

    fn languages_mut(&mut self) -> &mut LanguageSet {
        &mut self.languages
    }

    fn display_locale(&self) -> Option<&Locale> {
        self.display_locale.as_ref()
    }

    fn display_locale_mut(&mut self) -> &mut Option<Locale> {
        &mut self.display_locale
    }

    fn translatable_fields(&self) -> Vec<&dyn LocaleKeys> {
        vec![&self.title]
    }

    fn translatable_fields_mut(&mut self) -> Vec<&mut dyn LocaleKeys> {
        vec![&mut self.title]
    }
}
