use crate::i18n::{Locale, LocaleContext};
use crate::translatable::{
    Fallback, LanguageSet, LocaleKeys, TranslatableField, TranslatableRecord,
};
use serde::{Deserialize, Serialize};

/// One option value of a variant, e.g. `{"title": "Size", "value": "42"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantOption {
    pub title: String,
    pub value: String,
}

impl VariantOption {
    pub fn new(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            value: value.into(),
        }
    }
}

/// Everything needed to create or update a variant in one locale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSpec {
    /// Explicit SKU; derived from the product title and options when absent.
    #[serde(default)]
    pub sku: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub compare_at_price: Option<f64>,
    pub quantity: i64,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub videos: Vec<String>,
    pub options: Vec<VariantOption>,
}

/// A purchasable variant of a product.
///
/// Its `options` are the only translated field in the catalog that falls
/// back to the configured fallback locale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    pub id: Option<i64>,
    pub product_id: i64,
    pub sku: String,
    pub price: f64,
    pub compare_at_price: Option<f64>,
    pub quantity: i64,
    pub is_default: bool,
    #[serde(default)]
    pub videos: Vec<String>,
    pub options: TranslatableField<Vec<VariantOption>>,
    pub languages: LanguageSet,
    #[serde(skip)]
    display_locale: Option<Locale>,
}

impl Variant {
    /// A new, unsaved variant of `product_id` with options in `locale`.
    ///
    /// `product_title` is only used to derive a SKU when `spec` has none.
    pub fn new(product_id: i64, product_title: &str, locale: Locale, spec: VariantSpec) -> Self {
        let sku = spec
            .sku
            .unwrap_or_else(|| Self::derive_sku(product_title, &spec.options));
        Self {
            id: None,
            product_id,
            sku,
            price: spec.price,
            compare_at_price: spec.compare_at_price,
            quantity: spec.quantity,
            is_default: spec.is_default,
            videos: spec.videos,
            options: TranslatableField::single(locale.clone(), spec.options),
            languages: LanguageSet::single(locale),
            display_locale: None,
        }
    }

    /// Write the `locale` options and the plain attributes.
    pub fn update(&mut self, locale: Locale, product_title: &str, spec: VariantSpec) {
        self.sku = spec
            .sku
            .unwrap_or_else(|| Self::derive_sku(product_title, &spec.options));
        self.price = spec.price;
        self.compare_at_price = spec.compare_at_price;
        self.quantity = spec.quantity;
        self.is_default = spec.is_default;
        self.videos = spec.videos;
        self.set_translation(|v| &mut v.options, locale, spec.options);
    }

    /// SKU built from the product title without spaces followed by
    /// `-<option title>` for each option: `"Air Max"` + Size, Color gives
    /// `"AirMax-Size-Color"`.
    pub fn derive_sku(product_title: &str, options: &[VariantOption]) -> String {
        let mut sku = product_title.replace(' ', "");
        for option in options {
            sku.push('-');
            sku.push_str(&option.title);
        }
        sku
    }

    /// Options in the display, current or fallback locale; `None` if none of
    /// them is populated.
    pub fn options(&self, ctx: &LocaleContext) -> Option<&[VariantOption]> {
        self.options
            .resolve(ctx, self.display_locale.as_ref(), Fallback::Enabled)
            .map(Vec::as_slice)
    }
}

impl TranslatableRecord for Variant {
    const TRANSLATABLE_FIELDS: &'static [&'static str] = &["options"];
    const FALLBACK_FIELDS: &'static [&'static str] = &["options"];

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
        vec![&self.options]
    }

    fn translatable_fields_mut(&mut self) -> Vec<&mut dyn LocaleKeys> {
        vec![&mut self.options]
    }
}
