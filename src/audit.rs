//! Language-set audit.
//!
//! Finds stored records whose translatable fields hold locales their
//! `LanguageSet` does not list (raw field writes and rows written by other
//! tools can leave records in that state) and optionally repairs them by
//! prepending the missing locales.
//!
//! Also measures translation coverage: how every stored field resolves in
//! each supported locale.

use crate::catalog::{Category, Kit, Product, ProductUsage, UsageStep, Variant};
use crate::db::{CatalogStore, StoreError, StoredRecord};
use crate::i18n::{Locale, LocaleContext, LocaleRegistry, MetricsReport, ResolutionMetrics};
use crate::translatable::TranslatableRecord;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One record with translations in locales it does not track.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UntrackedRecord {
    pub table: &'static str,
    pub id: i64,
    /// `(field, locale)` pairs missing from the language set.
    pub translations: Vec<(&'static str, Locale)>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AuditReport {
    pub scanned: usize,
    pub untracked: Vec<UntrackedRecord>,
    pub repaired: usize,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.untracked.is_empty()
    }

    fn merge(&mut self, other: AuditReport) {
        self.scanned += other.scanned;
        self.untracked.extend(other.untracked);
        self.repaired += other.repaired;
    }
}

/// Audit every record of one kind, saving repaired records when `repair`.
pub async fn audit_languages<R: StoredRecord>(
    store: &CatalogStore,
    repair: bool,
) -> Result<AuditReport, StoreError> {
    let mut report = AuditReport::default();

    for mut record in store.list::<R>().await? {
        report.scanned += 1;

        let translations = record.untracked_translations();
        if translations.is_empty() {
            continue;
        }

        let id = record.id().unwrap_or_default();
        for (field, locale) in &translations {
            warn!(
                "{} row {}: field '{}' has locale '{}' missing from languages",
                R::TABLE,
                id,
                field,
                locale
            );
        }

        if repair {
            let added = record.sync_languages();
            store.save(&mut record).await?;
            info!("Repaired {} row {}: tracked {} locale(s)", R::TABLE, id, added.len());
            report.repaired += 1;
        }

        report.untracked.push(UntrackedRecord {
            table: R::TABLE,
            id,
            translations,
        });
    }

    Ok(report)
}

/// Audit all catalog tables.
pub async fn audit_catalog(store: &CatalogStore, repair: bool) -> Result<AuditReport, StoreError> {
    let mut report = AuditReport::default();
    report.merge(audit_languages::<Category>(store, repair).await?);
    report.merge(audit_languages::<Product>(store, repair).await?);
    report.merge(audit_languages::<Variant>(store, repair).await?);
    report.merge(audit_languages::<Kit>(store, repair).await?);
    report.merge(audit_languages::<ProductUsage>(store, repair).await?);
    report.merge(audit_languages::<UsageStep>(store, repair).await?);

    info!(
        "Audit finished: {} scanned, {} untracked, {} repaired",
        report.scanned,
        report.untracked.len(),
        report.repaired
    );
    Ok(report)
}

async fn resolve_all<R: StoredRecord>(
    store: &CatalogStore,
    contexts: &[LocaleContext],
) -> Result<(), StoreError> {
    let records = store.list::<R>().await?;
    for ctx in contexts {
        for record in &records {
            record.record_resolutions(ctx);
        }
    }
    debug!("Resolved {} {} rows in {} locale(s)", records.len(), R::TABLE, contexts.len());
    Ok(())
}

/// Resolve every translatable field of every record once per supported
/// locale and report which step of the chain answered.
pub async fn translation_coverage(
    store: &CatalogStore,
    registry: &LocaleRegistry,
) -> Result<MetricsReport, StoreError> {
    let metrics = Arc::new(ResolutionMetrics::new());
    let contexts: Vec<LocaleContext> = registry
        .supported()
        .iter()
        .map(|locale| {
            LocaleContext::new(locale.clone(), registry.fallback_locale().clone())
                .with_metrics(Arc::clone(&metrics))
        })
        .collect();

    resolve_all::<Category>(store, &contexts).await?;
    resolve_all::<Product>(store, &contexts).await?;
    resolve_all::<Variant>(store, &contexts).await?;
    resolve_all::<Kit>(store, &contexts).await?;
    resolve_all::<ProductUsage>(store, &contexts).await?;
    resolve_all::<UsageStep>(store, &contexts).await?;

    let report = metrics.report();
    info!(
        "Coverage: {} reads, {:.1}% unresolved",
        report.total_reads, report.miss_rate
    );
    Ok(report)
}
