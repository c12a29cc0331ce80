//! Course traversal: drives the fetch sequence and aggregation for a run.
//!
//! Everything is sequential and fail-fast. Every remote fetch goes through
//! the content cache, and every write is a natural-key upsert, so aborting
//! mid-run never corrupts persisted data and re-running is safe and cheaper.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use lexisync_cache::{ContentCache, keys};
use lexisync_provider::CourseProvider;
use lexisync_shared::{Course, Language, LexiSyncError, Result, SkillRecord};
use lexisync_store::{UpsertReport, VocabularyStore};

// ---------------------------------------------------------------------------
// WordIndex
// ---------------------------------------------------------------------------

/// The word → skills multimap for one course.
///
/// Distinct words are kept in first-seen traversal order; each maps to an
/// ordered, deduplicated list of the skill ids that reference it. Owned by
/// one course's traversal and moved into the translation step.
#[derive(Debug, Default)]
pub struct WordIndex {
    order: Vec<String>,
    skills_by_word: HashMap<String, Vec<String>>,
}

impl WordIndex {
    /// Record that `skill_id` references `word`. A word seen before keeps
    /// its position and gains the skill; a repeated (word, skill) pair is
    /// a no-op.
    pub fn record(&mut self, word: &str, skill_id: &str) {
        match self.skills_by_word.get_mut(word) {
            Some(skills) => {
                if !skills.iter().any(|s| s == skill_id) {
                    skills.push(skill_id.to_string());
                }
            }
            None => {
                self.order.push(word.to_string());
                self.skills_by_word
                    .insert(word.to_string(), vec![skill_id.to_string()]);
            }
        }
    }

    /// Distinct words in first-seen order.
    pub fn words(&self) -> &[String] {
        &self.order
    }

    /// Skill ids referencing `word`, in traversal order.
    pub fn skills_for(&self, word: &str) -> Option<&[String]> {
        self.skills_by_word.get(word).map(Vec::as_slice)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Decompose into the ordered word list and the word → skills map.
    pub fn into_parts(self) -> (Vec<String>, HashMap<String, Vec<String>>) {
        (self.order, self.skills_by_word)
    }
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for reporting sync status.
pub trait SyncProgress {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called when a course's processing begins.
    fn course_started(&self, course_id: &str, current: usize, total: usize);
    /// Called after a skill's word list is collected.
    fn skill_collected(&self, skill_id: &str, current: usize, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl SyncProgress for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn course_started(&self, _course_id: &str, _current: usize, _total: usize) {}
    fn skill_collected(&self, _skill_id: &str, _current: usize, _total: usize) {}
}

// ---------------------------------------------------------------------------
// Sync pipeline
// ---------------------------------------------------------------------------

/// Result of one sync run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Courses processed.
    pub courses: usize,
    /// Upsert counts for the `languages` collection.
    pub languages: UpsertReport,
    /// Accumulated upsert counts for the `skills` collection.
    pub skills: UpsertReport,
    /// Accumulated upsert counts for the `words` collection.
    pub words: UpsertReport,
    /// Total elapsed time.
    pub elapsed: Duration,
}

/// Run the full sync pipeline for the configured course allow-list.
///
/// 1. Fetch the catalog (cached) and resolve the allow-list against it.
/// 2. Persist the deduplicated learning-language set.
/// 3. Per course, in allow-list order: fetch skills (cached), stamp and
///    persist them, then collect each skill's words (cached) into the
///    course's [`WordIndex`].
/// 4. Translate the index in batches and persist the records.
///
/// Any error aborts the run. The language set is derived from selected
/// courses' learning languages only; `from` languages are not persisted.
#[instrument(skip_all, fields(courses = allow_list.len()))]
pub async fn sync_courses<P, S>(
    provider: &P,
    cache: &ContentCache,
    store: &S,
    allow_list: &[String],
    progress: &dyn SyncProgress,
) -> Result<SyncReport>
where
    P: CourseProvider,
    S: VocabularyStore,
{
    let start = Instant::now();

    if allow_list.is_empty() {
        return Err(LexiSyncError::invariant(
            "course allow-list is empty, no language set can be derived",
        ));
    }

    // --- Phase 1: Catalog ---
    progress.phase("Fetching course catalog");
    let catalog: Vec<Course> = cache
        .get_with(&keys::courses(), || async move { provider.get_courses().await })
        .await?;

    let mut selected: Vec<Course> = Vec::with_capacity(allow_list.len());
    for course_id in allow_list {
        let course = catalog
            .iter()
            .find(|c| &c.id == course_id)
            .ok_or_else(|| {
                LexiSyncError::invariant(format!(
                    "course {course_id} not present in the fetched catalog"
                ))
            })?;
        selected.push(course.clone());
    }

    // --- Phase 2: Languages ---
    progress.phase("Persisting languages");
    let mut languages: Vec<Language> = Vec::new();
    for course in &selected {
        if !languages.iter().any(|l| l.id == course.learning_language.id) {
            languages.push(course.learning_language.clone());
        }
    }
    let mut report = SyncReport {
        courses: selected.len(),
        languages: store.upsert_languages(&languages).await?,
        ..Default::default()
    };

    // --- Phase 3: Courses ---
    for (i, course) in selected.iter().enumerate() {
        progress.course_started(&course.id, i + 1, selected.len());
        info!(course = %course.id, "processing course");

        let skills = cache
            .get_with(&keys::course_skills(&course.id), || async move {
                provider.get_course_skills(&course.id).await
            })
            .await?;

        let records: Vec<SkillRecord> = skills
            .into_iter()
            .enumerate()
            .map(|(order, skill)| SkillRecord::from_provider(skill, course, order))
            .collect();
        report.skills.merge(store.upsert_skills(&records).await?);

        let mut index = WordIndex::default();
        let total = records.len();
        for (j, skill) in records.iter().enumerate() {
            let words: Vec<String> = cache
                .get_with(&keys::skill_words(&skill.id), || async move {
                    provider.get_skill_words(&skill.id).await
                })
                .await?;
            for word in &words {
                index.record(word, &skill.id);
            }
            progress.skill_collected(&skill.id, j + 1, total);
        }

        info!(
            course = %course.id,
            skills = total,
            distinct_words = index.len(),
            "course collected"
        );

        // --- Phase 4: Translate & persist ---
        let translated = crate::batch::translate_words(provider, cache, course, index).await?;
        report.words.merge(store.upsert_words(&translated).await?);
    }

    report.elapsed = start.elapsed();

    info!(
        courses = report.courses,
        languages_inserted = report.languages.inserted,
        skills_inserted = report.skills.inserted,
        words_inserted = report.words.inserted,
        elapsed_ms = report.elapsed.as_millis(),
        "sync complete"
    );

    Ok(report)
}
