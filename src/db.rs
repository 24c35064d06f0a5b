//! SQLite persistence for translatable catalog records.
//!
//! Every record kind gets its own table:
//!
//! | column | content |
//! |---|---|
//! | `id` | primary key |
//! | `languages` | the `LanguageSet` as a JSON array |
//! | one per translatable field | that field's locale→value JSON object |
//! | `attributes` | remaining plain attributes as a JSON object |
//! | `updated_at` | RFC 3339 timestamp of the last save |
//!
//! Round-trips are lossless: map keys and values and the order of the
//! language set come back exactly as saved. Anything that fails to decode is
//! reported as [`StoreError::Corruption`] and never repaired here.

use crate::catalog::{Category, Kit, Product, ProductUsage, UsageStep, Variant};
use crate::config::Config;
use crate::translatable::{LanguageSet, TranslatableRecord};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupt {column} in {table} row {id}: {source}")]
    Corruption {
        table: &'static str,
        id: i64,
        column: String,
        #[source]
        source: serde_json::Error,
    },

    /// The record does not serialize to a JSON object holding `languages`
    /// and every name in `TRANSLATABLE_FIELDS`. Derived catalog records
    /// always do; a hand-written [`StoredRecord`] impl may not.
    #[error("cannot encode {table} record: {reason}")]
    Encode { table: &'static str, reason: String },
}

/// A translatable record that can be saved in its own table.
pub trait StoredRecord: TranslatableRecord + Serialize + DeserializeOwned {
    const TABLE: &'static str;

    fn id(&self) -> Option<i64>;
    fn set_id(&mut self, id: i64);
}

/// A record split into column values.
#[derive(Debug)]
struct EncodedRow {
    languages: String,
    attributes: String,
    fields: Vec<String>,
}

fn encode<R: StoredRecord>(record: &R) -> Result<EncodedRow, StoreError> {
    let encode_error = |reason: String| StoreError::Encode {
        table: R::TABLE,
        reason,
    };

    let value = serde_json::to_value(record).map_err(|e| encode_error(e.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(encode_error("record is not a JSON object".to_string()));
    };

    object.remove("id");
    let languages = object
        .remove("languages")
        .ok_or_else(|| encode_error("missing languages".to_string()))?;

    let mut fields = Vec::with_capacity(R::TRANSLATABLE_FIELDS.len());
    for name in R::TRANSLATABLE_FIELDS {
        let field = object
            .remove(*name)
            .ok_or_else(|| encode_error(format!("missing translatable field '{}'", name)))?;
        fields.push(field.to_string());
    }

    Ok(EncodedRow {
        languages: languages.to_string(),
        attributes: Value::Object(object).to_string(),
        fields,
    })
}

fn decode<R: StoredRecord>(row: &SqliteRow) -> Result<R, StoreError> {
    let id: i64 = row.try_get("id")?;
    let corrupt = |column: &str, source: serde_json::Error| StoreError::Corruption {
        table: R::TABLE,
        id,
        column: column.to_string(),
        source,
    };

    let attributes: String = row.try_get("attributes")?;
    let mut object: Map<String, Value> =
        serde_json::from_str(&attributes).map_err(|e| corrupt("attributes", e))?;

    let languages: String = row.try_get("languages")?;
    let languages: Value = serde_json::from_str(&languages).map_err(|e| corrupt("languages", e))?;
    LanguageSet::deserialize(&languages).map_err(|e| corrupt("languages", e))?;
    object.insert("languages".to_string(), languages);

    let mut fields = Vec::with_capacity(R::TRANSLATABLE_FIELDS.len());
    for name in R::TRANSLATABLE_FIELDS {
        let blob: String = row.try_get(*name)?;
        let translations: Map<String, Value> =
            serde_json::from_str(&blob).map_err(|e| corrupt(*name, e))?;
        fields.push((*name, translations));
    }

    object.insert("id".to_string(), Value::from(id));

    let record = with_fields(&object, &fields, |_| true);
    serde_json::from_value(record).map_err(|e| {
        let (column, source) = blame_column::<R>(&object, &fields, e);
        corrupt(column, source)
    })
}

/// `base` plus every translatable field; fields rejected by `keep` are
/// replaced by an empty map.
fn with_fields(
    base: &Map<String, Value>,
    fields: &[(&'static str, Map<String, Value>)],
    keep: impl Fn(usize) -> bool,
) -> Value {
    let mut object = base.clone();
    for (index, (name, translations)) in fields.iter().enumerate() {
        let value = if keep(index) {
            translations.clone()
        } else {
            Map::new()
        };
        object.insert(name.to_string(), Value::Object(value));
    }
    Value::Object(object)
}

/// Find the column that made a row fail to deserialize.
///
/// An empty map is a valid value for every translatable field, so each field
/// is checked alone against otherwise empty fields. If the row still fails
/// with every field emptied, the plain attributes are at fault.
fn blame_column<R: StoredRecord>(
    base: &Map<String, Value>,
    fields: &[(&'static str, Map<String, Value>)],
    original: serde_json::Error,
) -> (&'static str, serde_json::Error) {
    if let Err(e) = serde_json::from_value::<R>(with_fields(base, fields, |_| false)) {
        return ("attributes", e);
    }
    for (index, (name, _)) in fields.iter().enumerate() {
        if let Err(e) = serde_json::from_value::<R>(with_fields(base, fields, |i| i == index)) {
            return (*name, e);
        }
    }
    ("record", original)
}

/// Stored columns after `id`, in bind order.
fn data_columns<R: StoredRecord>() -> Vec<&'static str> {
    let mut columns = vec!["languages", "attributes"];
    columns.extend_from_slice(R::TRANSLATABLE_FIELDS);
    columns.push("updated_at");
    columns
}

fn select_list<R: StoredRecord>() -> String {
    let mut columns = vec!["id"];
    columns.extend(data_columns::<R>());
    columns.join(", ")
}

#[derive(Clone)]
pub struct CatalogStore {
    pool: SqlitePool,
}

impl CatalogStore {
    /// Open (creating if missing) the database and create all tables.
    ///
    /// In-memory databases are held on a single connection that never
    /// expires, since every SQLite memory connection is its own database.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");

        let pool = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None::<Duration>)
                .max_lifetime(None::<Duration>)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(max_connections.max(1))
                .connect_with(options)
                .await?
        };

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        Self::connect(&config.database_url, config.max_connections).await
    }

    /// Create the table of every catalog record kind (safe to run always).
    pub async fn migrate(&self) -> Result<(), StoreError> {
        self.ensure_table::<Category>().await?;
        self.ensure_table::<Product>().await?;
        self.ensure_table::<Kit>().await?;
        self.ensure_table::<Variant>().await?;
        self.ensure_table::<ProductUsage>().await?;
        self.ensure_table::<UsageStep>().await?;
        info!("Catalog tables ready");
        Ok(())
    }

    async fn ensure_table<R: StoredRecord>(&self) -> Result<(), StoreError> {
        let field_columns: String = R::TRANSLATABLE_FIELDS
            .iter()
            .map(|name| format!("{} TEXT NOT NULL, ", name))
            .collect();
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                languages TEXT NOT NULL,
                attributes TEXT NOT NULL,
                {}updated_at TEXT NOT NULL
            )",
            R::TABLE,
            field_columns
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert or overwrite a record; assigns the id of a new record.
    pub async fn save<R: StoredRecord>(&self, record: &mut R) -> Result<i64, StoreError> {
        let row = encode(record)?;
        let columns = data_columns::<R>();

        let mut values = vec![row.languages, row.attributes];
        values.extend(row.fields);
        values.push(Utc::now().to_rfc3339());

        let placeholders = vec!["?"; columns.len()].join(", ");

        match record.id() {
            Some(id) => {
                let assignments = columns
                    .iter()
                    .map(|column| format!("{0} = excluded.{0}", column))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!(
                    "INSERT INTO {} (id, {}) VALUES (?, {}) ON CONFLICT(id) DO UPDATE SET {}",
                    R::TABLE,
                    columns.join(", "),
                    placeholders,
                    assignments
                );

                let mut query = sqlx::query(&sql).bind(id);
                for value in values {
                    query = query.bind(value);
                }
                query.execute(&self.pool).await?;

                debug!("Saved {} row {}", R::TABLE, id);
                Ok(id)
            }
            None => {
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    R::TABLE,
                    columns.join(", "),
                    placeholders
                );

                let mut query = sqlx::query(&sql);
                for value in values {
                    query = query.bind(value);
                }
                let id = query.execute(&self.pool).await?.last_insert_rowid();
                record.set_id(id);

                debug!("Inserted {} row {}", R::TABLE, id);
                Ok(id)
            }
        }
    }

    /// Load one record. A freshly loaded record has no display locale.
    pub async fn find<R: StoredRecord>(&self, id: i64) -> Result<Option<R>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", select_list::<R>(), R::TABLE);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(decode::<R>).transpose()
    }

    /// All records of a kind, oldest first.
    pub async fn list<R: StoredRecord>(&self) -> Result<Vec<R>, StoreError> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", select_list::<R>(), R::TABLE);
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(decode::<R>).collect()
    }

    /// Records whose plain attribute `attribute` equals `parent_id`, e.g.
    /// the variants of a product (`"product_id"`).
    pub async fn list_by_parent<R: StoredRecord>(
        &self,
        attribute: &str,
        parent_id: i64,
    ) -> Result<Vec<R>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE json_extract(attributes, ?) = ? ORDER BY id",
            select_list::<R>(),
            R::TABLE
        );
        let rows = sqlx::query(&sql)
            .bind(format!("$.{}", attribute))
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode::<R>).collect()
    }

    pub async fn count<R: StoredRecord>(&self) -> Result<i64, StoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", R::TABLE);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }

    /// Delete one record. Returns `false` if it did not exist.
    pub async fn delete<R: StoredRecord>(&self, id: i64) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = ?", R::TABLE);
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a product together with its variants.
    pub async fn delete_product(&self, id: i64) -> Result<bool, StoreError> {
        self.delete_with_children::<Product, Variant>(id, "product_id")
            .await
    }

    /// Delete a usage guide together with its steps.
    pub async fn delete_product_usage(&self, id: i64) -> Result<bool, StoreError> {
        self.delete_with_children::<ProductUsage, UsageStep>(id, "product_usage_id")
            .await
    }

    async fn delete_with_children<P: StoredRecord, C: StoredRecord>(
        &self,
        id: i64,
        parent_attribute: &str,
    ) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;

        let children = format!(
            "DELETE FROM {} WHERE json_extract(attributes, ?) = ?",
            C::TABLE
        );
        let removed_children = sqlx::query(&children)
            .bind(format!("$.{}", parent_attribute))
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let parent = format!("DELETE FROM {} WHERE id = ?", P::TABLE);
        let removed = sqlx::query(&parent).bind(id).execute(&mut *tx).await?.rows_affected();

        tx.commit().await?;

        debug!(
            "Deleted {} row {} and {} {} rows",
            P::TABLE,
            id,
            removed_children,
            C::TABLE
        );
        Ok(removed > 0)
    }
}

impl StoredRecord for Category {
    const TABLE: &'static str = "categories";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl StoredRecord for Product {
    const TABLE: &'static str = "products";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl StoredRecord for Kit {
    const TABLE: &'static str = "kits";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl StoredRecord for Variant {
    const TABLE: &'static str = "variants";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl StoredRecord for ProductUsage {
    const TABLE: &'static str = "product_usages";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl StoredRecord for UsageStep {
    const TABLE: &'static str = "usage_steps";

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ProductContent, Status, StepContent, VariantOption, VariantSpec};
    use crate::i18n::{Locale, LocaleContext, ResolutionMetrics};
    use crate::translatable::{LocaleKeys, TranslatableField};
    use std::sync::Arc;
    use tempfile::TempDir;

    // ==================== Helper Functions ====================

    async fn memory_store() -> CatalogStore {
        CatalogStore::connect("sqlite::memory:", 1)
            .await
            .expect("Failed to open in-memory database")
    }

    fn locale(code: &str) -> Locale {
        Locale::new(code).unwrap()
    }

    fn content(title: &str) -> ProductContent {
        ProductContent {
            eyebrow_text: "New".to_string(),
            title: title.to_string(),
            description: "Comfortable".to_string(),
            meta_desc: "shoes".to_string(),
            options: vec!["Size".to_string()],
        }
    }

    fn variant_spec(size: &str) -> VariantSpec {
        VariantSpec {
            price: 80.0,
            quantity: 3,
            options: vec![VariantOption::new("Size", size)],
            ..VariantSpec::default()
        }
    }

    // ==================== Database Initialization Tests ====================

    #[tokio::test]
    async fn test_store_creation() {
        let store = memory_store().await;
        assert_eq!(store.count::<Category>().await.expect("count"), 0);
        assert_eq!(store.count::<UsageStep>().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_migrate_is_idempotent() {
        let store = memory_store().await;
        store.migrate().await.expect("second migrate");
        assert_eq!(store.count::<Product>().await.expect("count"), 0);
    }

    #[tokio::test]
    async fn test_store_reopening() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("catalog.db");
        let url = format!("sqlite://{}", db_path.display());

        let id = {
            let store = CatalogStore::connect(&url, 2).await.expect("open");
            let mut category = Category::new(locale("en"), "Shoes", Status::Active);
            store.save(&mut category).await.expect("save")
        };

        let store = CatalogStore::connect(&url, 2).await.expect("reopen");
        let category: Category = store.find(id).await.expect("find").expect("persisted");
        assert_eq!(category.title.get("en"), Some(&"Shoes".to_string()));
    }

    // ==================== Save / Find Tests ====================

    #[tokio::test]
    async fn test_insert_assigns_id() {
        let store = memory_store().await;
        let mut category = Category::new(locale("en"), "Shoes", Status::Active);

        let id = store.save(&mut category).await.expect("save");

        assert_eq!(category.id, Some(id));
        assert_eq!(store.count::<Category>().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_translations_and_order() {
        let store = memory_store().await;
        let mut product = Product::new(4, locale("en"), content("Sneaker"), Status::Active)
            .with_code("SNK-1");
        let attributes = product.attributes();
        product.update(locale("fr"), content("Basket"), attributes.clone());
        product.update(locale("ar"), content("Hidhaa"), attributes);

        let id = store.save(&mut product).await.expect("save");
        let loaded: Product = store.find(id).await.expect("find").expect("exists");

        assert_eq!(loaded.languages.codes(), vec!["ar", "fr", "en"]);
        assert_eq!(loaded.title, product.title);
        assert_eq!(loaded.options, product.options);
        assert_eq!(loaded.code.as_deref(), Some("SNK-1"));
        assert_eq!(loaded.category_id, 4);
    }

    #[tokio::test]
    async fn test_display_locale_not_persisted() {
        let store = memory_store().await;
        let mut category = Category::new(locale("en"), "Shoes", Status::Active);
        category.update(locale("fr"), "Chaussures", Status::Active);
        assert!(category.display_locale().is_some());

        let id = store.save(&mut category).await.expect("save");
        let loaded: Category = store.find(id).await.expect("find").expect("exists");

        assert!(loaded.display_locale().is_none());
        let ctx = LocaleContext::new(locale("en"), locale("en"));
        assert_eq!(loaded.title(&ctx), "Shoes");
    }

    #[tokio::test]
    async fn test_variant_round_trip_resolves_options() {
        let store = memory_store().await;
        let mut variant = Variant::new(3, "Sneaker", locale("en"), variant_spec("42"));
        variant.update(locale("de"), "Sneaker", variant_spec("42 DE"));
        variant.update(locale("fr"), "Sneaker", variant_spec("42 FR"));
        variant.set_display_locale(locale("de"));
        let id = store.save(&mut variant).await.expect("save");

        let mut loaded: Variant = store.find(id).await.expect("find").expect("exists");

        assert!(loaded.display_locale().is_none());
        assert_eq!(loaded.languages.codes(), vec!["fr", "de", "en"]);
        assert_eq!(loaded.options, variant.options);

        let metrics = Arc::new(ResolutionMetrics::new());
        let ctx = |current: &str| {
            LocaleContext::new(locale(current), locale("en")).with_metrics(Arc::clone(&metrics))
        };

        assert_eq!(loaded.options(&ctx("fr")).unwrap()[0].value, "42 FR");
        assert_eq!(loaded.options(&ctx("ja")).unwrap()[0].value, "42");

        loaded.set_display_locale(locale("de"));
        assert_eq!(loaded.options(&ctx("fr")).unwrap()[0].value, "42 DE");

        loaded.clear_display_locale();
        loaded.forget_translation(|v| &mut v.options, "en");
        assert_eq!(loaded.options(&ctx("ja")), None);

        assert_eq!(metrics.current_hits(), 1);
        assert_eq!(metrics.fallback_hits(), 1);
        assert_eq!(metrics.display_hits(), 1);
        assert_eq!(metrics.misses(), 1);
    }

    #[tokio::test]
    async fn test_save_existing_overwrites() {
        let store = memory_store().await;
        let mut category = Category::new(locale("en"), "Shoes", Status::Active);
        let id = store.save(&mut category).await.expect("save");

        category.update(locale("de"), "Schuhe", Status::Inactive);
        let second_id = store.save(&mut category).await.expect("update");

        assert_eq!(id, second_id);
        assert_eq!(store.count::<Category>().await.unwrap(), 1);

        let loaded: Category = store.find(id).await.unwrap().unwrap();
        assert_eq!(loaded.languages.codes(), vec!["de", "en"]);
        assert_eq!(loaded.status, Status::Inactive);
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let store = memory_store().await;
        let result: Option<Kit> = store.find(42).await.expect("find");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_in_id_order() {
        let store = memory_store().await;
        for title in ["A", "B", "C"] {
            let mut category = Category::new(locale("en"), title, Status::Active);
            store.save(&mut category).await.expect("save");
        }

        let categories: Vec<Category> = store.list().await.expect("list");
        let titles: Vec<&str> = categories
            .iter()
            .map(|c| c.title.get("en").unwrap().as_str())
            .collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_field_stored_as_json_object() {
        let store = memory_store().await;
        let mut category = Category::new(locale("en"), "Shoes", Status::Active);
        let id = store.save(&mut category).await.expect("save");

        let (title, languages): (String, String) =
            sqlx::query_as("SELECT title, languages FROM categories WHERE id = ?")
                .bind(id)
                .fetch_one(&store.pool)
                .await
                .expect("raw row");

        assert_eq!(title, r#"{"en":"Shoes"}"#);
        assert_eq!(languages, r#"["en"]"#);
    }

    // ==================== Corruption Tests ====================

    #[tokio::test]
    async fn test_malformed_field_blob_is_corruption() {
        let store = memory_store().await;
        let mut category = Category::new(locale("en"), "Shoes", Status::Active);
        let id = store.save(&mut category).await.expect("save");

        sqlx::query("UPDATE categories SET title = '{not json' WHERE id = ?")
            .bind(id)
            .execute(&store.pool)
            .await
            .expect("corrupt row");

        let result = store.find::<Category>(id).await;
        match result {
            Err(StoreError::Corruption { table, column, .. }) => {
                assert_eq!(table, "categories");
                assert_eq!(column, "title");
            }
            other => panic!("expected corruption, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_duplicate_languages_are_corruption() {
        let store = memory_store().await;
        let mut category = Category::new(locale("en"), "Shoes", Status::Active);
        let id = store.save(&mut category).await.expect("save");

        sqlx::query("UPDATE categories SET languages = '[\"en\",\"en\"]' WHERE id = ?")
            .bind(id)
            .execute(&store.pool)
            .await
            .expect("corrupt row");

        let err = store.find::<Category>(id).await.unwrap_err();
        assert!(matches!(err, StoreError::Corruption { ref column, .. } if column == "languages"));
        assert!(err.to_string().contains("duplicate locale"));
    }

    #[tokio::test]
    async fn test_wrong_value_type_is_corruption() {
        let store = memory_store().await;
        let mut category = Category::new(locale("en"), "Shoes", Status::Active);
        let id = store.save(&mut category).await.expect("save");

        sqlx::query("UPDATE categories SET title = '{\"en\": 5}' WHERE id = ?")
            .bind(id)
            .execute(&store.pool)
            .await
            .expect("corrupt row");

        let err = store.find::<Category>(id).await.unwrap_err();
        assert!(matches!(err, StoreError::Corruption { ref column, .. } if column == "title"));
    }

    #[tokio::test]
    async fn test_wrong_value_type_names_its_field() {
        let store = memory_store().await;
        let mut step = UsageStep::new(
            1,
            locale("en"),
            StepContent {
                title: "Rinse".to_string(),
                description: "Cold water".to_string(),
            },
            "video",
        );
        let id = store.save(&mut step).await.expect("save");

        sqlx::query("UPDATE usage_steps SET description = '{\"en\": [\"x\"]}' WHERE id = ?")
            .bind(id)
            .execute(&store.pool)
            .await
            .expect("corrupt row");

        match store.find::<UsageStep>(id).await {
            Err(StoreError::Corruption { table, column, .. }) => {
                assert_eq!(table, "usage_steps");
                assert_eq!(column, "description");
            }
            other => panic!("expected corruption, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_empty_locale_key_is_corruption_of_field() {
        let store = memory_store().await;
        let mut category = Category::new(locale("en"), "Shoes", Status::Active);
        let id = store.save(&mut category).await.expect("save");

        sqlx::query("UPDATE categories SET title = '{\"\": \"Shoes\"}' WHERE id = ?")
            .bind(id)
            .execute(&store.pool)
            .await
            .expect("corrupt row");

        let err = store.find::<Category>(id).await.unwrap_err();
        assert!(matches!(err, StoreError::Corruption { ref column, .. } if column == "title"));
    }

    #[tokio::test]
    async fn test_bad_attribute_is_corruption_of_attributes() {
        let store = memory_store().await;
        let mut category = Category::new(locale("en"), "Shoes", Status::Active);
        let id = store.save(&mut category).await.expect("save");

        sqlx::query("UPDATE categories SET attributes = '{\"status\": 9}' WHERE id = ?")
            .bind(id)
            .execute(&store.pool)
            .await
            .expect("corrupt row");

        let err = store.find::<Category>(id).await.unwrap_err();
        assert!(matches!(err, StoreError::Corruption { ref column, .. } if column == "attributes"));
    }

    /// A record whose serde name for `title` disagrees with its declared
    /// translatable field names.
    #[derive(Debug, Serialize, Deserialize)]
    struct Misnamed {
        id: Option<i64>,
        #[serde(rename = "name")]
        title: TranslatableField<String>,
        languages: LanguageSet,
        #[serde(skip)]
        display_locale: Option<Locale>,
    }

    impl TranslatableRecord for Misnamed {
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

    impl StoredRecord for Misnamed {
        const TABLE: &'static str = "misnamed";

        fn id(&self) -> Option<i64> {
            self.id
        }

        fn set_id(&mut self, id: i64) {
            self.id = Some(id);
        }
    }

    #[tokio::test]
    async fn test_save_rejects_record_missing_declared_field() {
        let store = memory_store().await;
        let mut record = Misnamed {
            id: None,
            title: TranslatableField::single(locale("en"), "x".to_string()),
            languages: LanguageSet::single(locale("en")),
            display_locale: None,
        };

        let err = store.save(&mut record).await.unwrap_err();

        match err {
            StoreError::Encode { table, reason } => {
                assert_eq!(table, "misnamed");
                assert!(reason.contains("title"));
            }
            other => panic!("expected encode error, got {:?}", other),
        }
        assert!(record.id.is_none());
    }

    // ==================== Delete Tests ====================

    #[tokio::test]
    async fn test_delete_record() {
        let store = memory_store().await;
        let mut kit = Kit::new(
            locale("en"),
            crate::catalog::KitContent::default(),
            5.0,
            Status::Active,
        );
        let id = store.save(&mut kit).await.expect("save");

        assert!(store.delete::<Kit>(id).await.expect("delete"));
        assert!(!store.delete::<Kit>(id).await.expect("second delete"));
        assert!(store.find::<Kit>(id).await.expect("find").is_none());
    }

    #[tokio::test]
    async fn test_delete_product_cascades_to_variants() {
        let store = memory_store().await;
        let mut product = Product::new(1, locale("en"), content("Sneaker"), Status::Active);
        let product_id = store.save(&mut product).await.expect("save product");

        let mut other = Product::new(1, locale("en"), content("Boot"), Status::Active);
        let other_id = store.save(&mut other).await.expect("save other");

        for (parent, size) in [(product_id, "41"), (product_id, "42"), (other_id, "43")] {
            let mut variant = Variant::new(parent, "Sneaker", locale("en"), variant_spec(size));
            store.save(&mut variant).await.expect("save variant");
        }

        let variants: Vec<Variant> = store
            .list_by_parent("product_id", product_id)
            .await
            .expect("variants");
        assert_eq!(variants.len(), 2);

        assert!(store.delete_product(product_id).await.expect("delete"));

        assert!(store.find::<Product>(product_id).await.unwrap().is_none());
        let remaining: Vec<Variant> = store.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].product_id, other_id);
    }

    #[tokio::test]
    async fn test_delete_product_usage_cascades_to_steps() {
        let store = memory_store().await;
        let mut usage = ProductUsage::new(1, locale("en"), "How to clean");
        let usage_id = store.save(&mut usage).await.expect("save usage");

        for title in ["Rinse", "Dry"] {
            let mut step = UsageStep::new(
                usage_id,
                locale("en"),
                StepContent {
                    title: title.to_string(),
                    description: String::new(),
                },
                "video",
            );
            store.save(&mut step).await.expect("save step");
        }

        assert!(store.delete_product_usage(usage_id).await.expect("delete"));
        assert_eq!(store.count::<UsageStep>().await.unwrap(), 0);
        assert_eq!(store.count::<ProductUsage>().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_product_reports_false() {
        let store = memory_store().await;
        assert!(!store.delete_product(99).await.expect("delete"));
    }

    // ==================== Encoding Tests ====================

    #[test]
    fn test_encode_splits_columns() {
        let mut variant = Variant::new(3, "Sneaker", locale("en"), variant_spec("42"));
        variant.id = Some(8);

        let row = encode(&variant).expect("encode");
        let attributes: Value = serde_json::from_str(&row.attributes).unwrap();

        assert_eq!(row.languages, r#"["en"]"#);
        assert_eq!(row.fields.len(), 1);
        assert_eq!(row.fields[0], r#"{"en":[{"title":"Size","value":"42"}]}"#);
        assert_eq!(attributes["product_id"], 3);
        assert!(attributes.get("id").is_none());
        assert!(attributes.get("options").is_none());
    }

    #[test]
    fn test_data_columns_order() {
        assert_eq!(
            data_columns::<UsageStep>(),
            vec!["languages", "attributes", "title", "description", "updated_at"]
        );
    }
}
