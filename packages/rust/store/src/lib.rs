//! MongoDB persistence layer.
//!
//! [`VocabularyStore`] is the seam the pipeline writes through; [`MongoStore`]
//! implements it with one bulk replace-or-insert per collection, keyed by
//! each record's natural key rather than any generated id. Re-applying an
//! unchanged record set is a no-op at the storage layer.

use mongodb::bson::{Document, doc, to_document};
use mongodb::options::{ReplaceOneModel, WriteModel};
use mongodb::{Client, Namespace};
use tracing::info;

use lexisync_shared::{Language, LexiSyncError, Result, SkillRecord, TranslationRecord};

/// Collection names in the target database.
pub const LANGUAGES_COLLECTION: &str = "languages";
pub const SKILLS_COLLECTION: &str = "skills";
pub const WORDS_COLLECTION: &str = "words";

/// Counts reported for one bulk upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpsertReport {
    /// Documents inserted because no natural-key match existed.
    pub inserted: u64,
    /// Documents that matched an existing natural key.
    pub matched: u64,
    /// Matched documents that were actually rewritten.
    pub modified: u64,
}

impl UpsertReport {
    /// Fold another batch's counts into this report.
    pub fn merge(&mut self, other: UpsertReport) {
        self.inserted += other.inserted;
        self.matched += other.matched;
        self.modified += other.modified;
    }
}

/// The document-store capability the pipeline persists through.
///
/// Each call submits its records as a single bulk replace-or-insert against
/// one collection. A record fully replaces any existing document sharing its
/// natural key; fields absent from the new record are dropped.
pub trait VocabularyStore {
    /// Upsert languages keyed by `id`.
    fn upsert_languages(&self, records: &[Language])
    -> impl Future<Output = Result<UpsertReport>>;

    /// Upsert skills keyed by `id`.
    fn upsert_skills(&self, records: &[SkillRecord])
    -> impl Future<Output = Result<UpsertReport>>;

    /// Upsert translation records keyed by `(from, to, word)`.
    fn upsert_words(&self, records: &[TranslationRecord])
    -> impl Future<Output = Result<UpsertReport>>;
}

// ---------------------------------------------------------------------------
// Natural-key filters
// ---------------------------------------------------------------------------

/// Upsert filter for a language: `{id}`.
pub fn language_filter(record: &Language) -> Document {
    doc! { "id": &record.id }
}

/// Upsert filter for a skill: `{id}`.
pub fn skill_filter(record: &SkillRecord) -> Document {
    doc! { "id": &record.id }
}

/// Upsert filter for a translation record: `{from, to, word}`.
pub fn word_filter(record: &TranslationRecord) -> Document {
    doc! { "from": &record.from, "to": &record.to, "word": &record.word }
}

// ---------------------------------------------------------------------------
// MongoStore
// ---------------------------------------------------------------------------

/// MongoDB-backed [`VocabularyStore`].
pub struct MongoStore {
    client: Client,
    database: String,
}

impl MongoStore {
    /// Connect to the store at `uri`, targeting `database`.
    pub async fn connect(uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| LexiSyncError::Storage(format!("connect: {e}")))?;

        Ok(Self {
            client,
            database: database.to_string(),
        })
    }

    /// Submit one ordered bulk of replace-or-insert models against a
    /// collection. Any per-operation error fails the whole call.
    async fn bulk_replace<T: serde::Serialize>(
        &self,
        collection: &str,
        records: &[T],
        filter: impl Fn(&T) -> Document,
    ) -> Result<UpsertReport> {
        if records.is_empty() {
            return Ok(UpsertReport::default());
        }

        let namespace = Namespace::new(self.database.clone(), collection);
        let mut models = Vec::with_capacity(records.len());
        for record in records {
            let replacement = to_document(record)
                .map_err(|e| LexiSyncError::Storage(format!("{collection}: encode: {e}")))?;
            models.push(WriteModel::ReplaceOne(
                ReplaceOneModel::builder()
                    .namespace(namespace.clone())
                    .filter(filter(record))
                    .replacement(replacement)
                    .upsert(true)
                    .build(),
            ));
        }

        let result = self
            .client
            .bulk_write(models)
            .await
            .map_err(|e| LexiSyncError::Storage(format!("{collection}: bulk write: {e}")))?;

        let report = UpsertReport {
            inserted: result.upserted_count as u64,
            matched: result.matched_count as u64,
            modified: result.modified_count as u64,
        };

        info!(
            collection,
            inserted = report.inserted,
            matched = report.matched,
            modified = report.modified,
            "bulk upsert applied"
        );

        Ok(report)
    }
}

impl VocabularyStore for MongoStore {
    async fn upsert_languages(&self, records: &[Language]) -> Result<UpsertReport> {
        self.bulk_replace(LANGUAGES_COLLECTION, records, language_filter)
            .await
    }

    async fn upsert_skills(&self, records: &[SkillRecord]) -> Result<UpsertReport> {
        self.bulk_replace(SKILLS_COLLECTION, records, skill_filter)
            .await
    }

    async fn upsert_words(&self, records: &[TranslationRecord]) -> Result<UpsertReport> {
        self.bulk_replace(WORDS_COLLECTION, records, word_filter)
            .await
    }
}
