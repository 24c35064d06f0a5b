use crate::catalog::Status;
use crate::i18n::{Locale, LocaleContext};
use crate::translatable::{
    Fallback, LanguageSet, LocaleKeys, TranslatableField, TranslatableRecord,
};
use serde::{Deserialize, Serialize};

/// The translated content of a product in one locale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductContent {
    pub eyebrow_text: String,
    pub title: String,
    pub description: String,
    pub meta_desc: String,
    /// Names of the options every variant must set (e.g. "Size", "Color").
    #[serde(default)]
    pub options: Vec<String>,
}

/// Plain (untranslated) product attributes overwritten by an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttributes {
    pub category_id: i64,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub is_social_responsible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<i64>,
    pub category_id: i64,
    pub code: Option<String>,
    pub status: Status,
    #[serde(default)]
    pub is_social_responsible: bool,
    pub eyebrow_text: TranslatableField<String>,
    pub title: TranslatableField<String>,
    pub description: TranslatableField<String>,
    pub meta_desc: TranslatableField<String>,
    pub options: TranslatableField<Vec<String>>,
    pub languages: LanguageSet,
    #[serde(skip)]
    display_locale: Option<Locale>,
}

impl Product {
    /// A new, unsaved product translated into `locale` only.
    pub fn new(category_id: i64, locale: Locale, content: ProductContent, status: Status) -> Self {
        Self {
            id: None,
            category_id,
            code: None,
            status,
            is_social_responsible: false,
            eyebrow_text: TranslatableField::single(locale.clone(), content.eyebrow_text),
            title: TranslatableField::single(locale.clone(), content.title),
            description: TranslatableField::single(locale.clone(), content.description),
            meta_desc: TranslatableField::single(locale.clone(), content.meta_desc),
            options: TranslatableField::single(locale.clone(), content.options),
            languages: LanguageSet::single(locale),
            display_locale: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// The current plain attributes, as a starting point for an update.
    pub fn attributes(&self) -> ProductAttributes {
        ProductAttributes {
            category_id: self.category_id,
            code: self.code.clone(),
            status: self.status,
            is_social_responsible: self.is_social_responsible,
        }
    }

    /// Write every translated field for `locale` and overwrite the plain
    /// attributes, then render in `locale`.
    pub fn update(&mut self, locale: Locale, content: ProductContent, attributes: ProductAttributes) {
        self.set_translation(|p| &mut p.eyebrow_text, locale.clone(), content.eyebrow_text);
        self.set_translation(|p| &mut p.title, locale.clone(), content.title);
        self.set_translation(|p| &mut p.description, locale.clone(), content.description);
        self.set_translation(|p| &mut p.meta_desc, locale.clone(), content.meta_desc);
        self.set_translation(|p| &mut p.options, locale.clone(), content.options);
        self.category_id = attributes.category_id;
        self.code = attributes.code;
        self.status = attributes.status;
        self.is_social_responsible = attributes.is_social_responsible;
        self.set_display_locale(locale);
    }

    /// The stored content for exactly `locale`, if the product has a title
    /// in it. Missing secondary fields read as empty.
    pub fn content(&self, locale: &str) -> Option<ProductContent> {
        let title = self.title.get(locale)?;
        let text = |field: &TranslatableField<String>| field.get(locale).cloned().unwrap_or_default();
        Some(ProductContent {
            eyebrow_text: text(&self.eyebrow_text),
            title: title.clone(),
            description: text(&self.description),
            meta_desc: text(&self.meta_desc),
            options: self.options.get(locale).cloned().unwrap_or_default(),
        })
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

    /// Option names in the best available locale; empty when unresolved.
    pub fn options(&self, ctx: &LocaleContext) -> &[String] {
        self.options
            .resolve(ctx, self.display_locale.as_ref(), Fallback::Disabled)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl TranslatableRecord for Product {
    const TRANSLATABLE_FIELDS: &'static [&'static str] =
        &["eyebrow_text", "title", "description", "meta_desc", "options"];

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
        vec![
            &self.eyebrow_text,
            &self.title,
            &self.description,
            &self.meta_desc,
            &self.options,
        ]
    }

    fn translatable_fields_mut(&mut self) -> Vec<&mut dyn LocaleKeys> {
        vec![
            &mut self.eyebrow_text,
            &mut self.title,
            &mut self.description,
            &mut self.meta_desc,
            &mut self.options,
        ]
    }
}
