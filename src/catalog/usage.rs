//! Product usage guides and their steps.

use crate::i18n::{Locale, LocaleContext};
use crate::translatable::{LanguageSet, LocaleKeys, TranslatableField, TranslatableRecord};
use serde::{Deserialize, Serialize};

/// How-to guide attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductUsage {
    pub id: Option<i64>,
    pub product_id: i64,
    pub title: TranslatableField<String>,
    pub languages: LanguageSet,
    #[serde(skip)]
    display_locale: Option<Locale>,
}

impl ProductUsage {
    pub fn new(product_id: i64, locale: Locale, title: impl Into<String>) -> Self {
        Self {
            id: None,
            product_id,
            title: TranslatableField::single(locale.clone(), title.into()),
            languages: LanguageSet::single(locale),
            display_locale: None,
        }
    }

    pub fn update(&mut self, locale: Locale, title: impl Into<String>) {
        self.set_translation(|u| &mut u.title, locale, title.into());
    }

    pub fn title(&self, ctx: &LocaleContext) -> &str {
        self.title.resolve_text(ctx, self.display_locale.as_ref())
    }
}

impl TranslatableRecord for ProductUsage {
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

/// Translated text of one usage step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepContent {
    pub title: String,
    pub description: String,
}

/// One step of a usage guide, with a video link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageStep {
    pub id: Option<i64>,
    pub product_usage_id: i64,
    pub video: String,
    pub title: TranslatableField<String>,
    pub description: TranslatableField<String>,
    pub languages: LanguageSet,
    #[serde(skip)]
    display_locale: Option<Locale>,
}

impl UsageStep {
    pub fn new(
        product_usage_id: i64,
        locale: Locale,
        content: StepContent,
        video: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            product_usage_id,
            video: video.into(),
            title: TranslatableField::single(locale.clone(), content.title),
            description: TranslatableField::single(locale.clone(), content.description),
            languages: LanguageSet::single(locale),
            display_locale: None,
        }
    }

    pub fn update(&mut self, locale: Locale, content: StepContent, video: impl Into<String>) {
        self.set_translation(|s| &mut s.title, locale.clone(), content.title);
        self.set_translation(|s| &mut s.description, locale, content.description);
        self.video = video.into();
    }

    pub fn title(&self, ctx: &LocaleContext) -> &str {
        self.title.resolve_text(ctx, self.display_locale.as_ref())
    }

    pub fn description(&self, ctx: &LocaleContext) -> &str {
        self.description.resolve_text(ctx, self.display_locale.as_ref())
    }
}

impl TranslatableRecord for UsageStep {
    const TRANSLATABLE_FIELDS: &'static [&'static str] = &["title", "description"];

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
        vec![&self.title, &self.description]
    }

    fn translatable_fields_mut(&mut self) -> Vec<&mut dyn LocaleKeys> {
        vec![&mut self.title, &mut self.description]
    }
}
