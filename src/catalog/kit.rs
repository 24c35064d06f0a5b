use crate::catalog::Status;
use crate::i18n::{Locale, LocaleContext};
use crate::translatable::{LanguageSet, LocaleKeys, TranslatableField, TranslatableRecord};
use serde::{Deserialize, Serialize};

/// The translated content of a kit in one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitContent {
    pub eyebrow_text: String,
    pub title: String,
    pub description: String,
    pub meta_desc: String,
}

/// A discounted bundle of products.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kit {
    pub id: Option<i64>,
    pub discount: f64,
    pub status: Status,
    #[serde(default)]
    pub product_ids: Vec<i64>,
    pub eyebrow_text: TranslatableField<String>,
    pub title: TranslatableField<String>,
    pub description: TranslatableField<String>,
    pub meta_desc: TranslatableField<String>,
    pub languages: LanguageSet,
    #[serde(skip)]
    display_locale: Option<Locale>,
}

impl Kit {
    pub fn new(locale: Locale, content: KitContent, discount: f64, status: Status) -> Self {
        Self {
            id: None,
            discount,
            status,
            product_ids: Vec::new(),
            eyebrow_text: TranslatableField::single(locale.clone(), content.eyebrow_text),
            title: TranslatableField::single(locale.clone(), content.title),
            description: TranslatableField::single(locale.clone(), content.description),
            meta_desc: TranslatableField::single(locale.clone(), content.meta_desc),
            languages: LanguageSet::single(locale),
            display_locale: None,
        }
    }

    pub fn with_products(mut self, product_ids: impl IntoIterator<Item = i64>) -> Self {
        self.product_ids = product_ids.into_iter().collect();
        self
    }

    /// Write the `locale` translation, discount and status, then render in
    /// `locale`. Earlier locales stay in the language set.
    pub fn update(&mut self, locale: Locale, content: KitContent, discount: f64, status: Status) {
        self.set_translation(|k| &mut k.eyebrow_text, locale.clone(), content.eyebrow_text);
        self.set_translation(|k| &mut k.title, locale.clone(), content.title);
        self.set_translation(|k| &mut k.description, locale.clone(), content.description);
        self.set_translation(|k| &mut k.meta_desc, locale.clone(), content.meta_desc);
        self.discount = discount;
        self.status = status;
        self.set_display_locale(locale);
    }

    pub fn eyebrow_text(&self, ctx: &LocaleContext) -> &str {
        self.eyebrow_text.resolve_text(ctx, self.display_locale.as_ref())
    }

    pub fn title(&self, ctx: &LocaleContext) -> &str {
        self.title.resolve_text(ctx, self.display_locale.as_ref())
    }

    pub fn description(&self, ctx: &LocaleContext) -> &str {
        self.description.resolve_text(ctx, self.display_locale.as_ref())
    }

    pub fn meta_desc(&self, ctx: &LocaleContext) -> &str {
        self.meta_desc.resolve_text(ctx, self.display_locale.as_ref())
    }
}

impl TranslatableRecord for Kit {
    const TRANSLATABLE_FIELDS: &'static [&'static str] =
        &["eyebrow_text", "title", "description", "meta_desc"];

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
        vec![&self.eyebrow_text, &self.title, &self.description, &self.meta_desc]
    }

    fn translatable_fields_mut(&mut self) -> Vec<&mut dyn LocaleKeys> {
        vec![
            &mut self.eyebrow_text,
            &mut self.title,
            &mut self.description,
            &mut self.meta_desc,
        ]
    }
}
