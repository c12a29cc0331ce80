//! Vocabulary sync pipeline: catalog → courses → skills → words → translations.

pub mod batch;
pub mod traverse;

pub use batch::{TRANSLATION_BATCH_SIZE, translate_words};
pub use traverse::{SilentProgress, SyncProgress, SyncReport, WordIndex, sync_courses};

#[cfg(test)]
pub(crate) mod testutil {
    //! In-memory fakes behind the provider and store seams.

    use std::cell::RefCell;
    use std::collections::HashMap;

    use lexisync_cache::ContentCache;
    use lexisync_provider::{CourseProvider, TranslationPayload};
    use lexisync_shared::{
        Course, Language, LexiSyncError, ProviderSkill, Result, SkillRecord, TranslationRecord,
    };
    use lexisync_store::{UpsertReport, VocabularyStore};

    /// Fresh cache over a unique scratch directory.
    pub fn test_cache() -> ContentCache {
        let root = std::env::temp_dir().join(format!("lexisync_core_{}", uuid::Uuid::now_v7()));
        ContentCache::new(root)
    }

    pub fn language(id: &str, name: &str) -> Language {
        Language {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn course(id: &str, learning: (&str, &str), from: (&str, &str)) -> Course {
        Course {
            id: id.into(),
            learning_language: language(learning.0, learning.1),
            from_language: language(from.0, from.1),
        }
    }

    pub fn skill(id: &str, title: &str) -> ProviderSkill {
        ProviderSkill {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Remote-call counters recorded by [`FakeProvider`].
    #[derive(Debug, Default)]
    pub struct CallCounts {
        pub courses: usize,
        pub skills: HashMap<String, usize>,
        pub words: HashMap<String, usize>,
        pub translate: usize,
        pub batch_sizes: Vec<usize>,
    }

    /// Scripted in-memory provider with per-endpoint call counting.
    #[derive(Default)]
    pub struct FakeProvider {
        pub catalog: Vec<Course>,
        pub skills: HashMap<String, Vec<ProviderSkill>>,
        pub words: HashMap<String, Vec<String>>,
        /// Drop one payload from every translate response (misalignment).
        pub short_translate_response: bool,
        pub calls: RefCell<CallCounts>,
    }

    impl FakeProvider {
        pub fn translation_of(word: &str) -> String {
            format!("{word}-translated")
        }
    }

    impl CourseProvider for FakeProvider {
        async fn get_courses(&self) -> Result<Vec<Course>> {
            self.calls.borrow_mut().courses += 1;
            Ok(self.catalog.clone())
        }

        async fn get_course_skills(&self, course_id: &str) -> Result<Vec<ProviderSkill>> {
            *self
                .calls
                .borrow_mut()
                .skills
                .entry(course_id.to_string())
                .or_default() += 1;
            self.skills
                .get(course_id)
                .cloned()
                .ok_or_else(|| LexiSyncError::Provider(format!("no skills for {course_id}")))
        }

        async fn get_skill_words(&self, skill_id: &str) -> Result<Vec<String>> {
            *self
                .calls
                .borrow_mut()
                .words
                .entry(skill_id.to_string())
                .or_default() += 1;
            self.words
                .get(skill_id)
                .cloned()
                .ok_or_else(|| LexiSyncError::Provider(format!("no words for {skill_id}")))
        }

        async fn translate(
            &self,
            _course_id: &str,
            batch: &[String],
        ) -> Result<Vec<TranslationPayload>> {
            let mut calls = self.calls.borrow_mut();
            calls.translate += 1;
            calls.batch_sizes.push(batch.len());

            let mut payloads: Vec<TranslationPayload> = batch
                .iter()
                .map(|word| vec![Self::translation_of(word)])
                .collect();
            if self.short_translate_response {
                payloads.pop();
            }
            Ok(payloads)
        }
    }

    /// In-memory store with replace-or-insert semantics keyed by natural key.
    #[derive(Default)]
    pub struct FakeStore {
        pub languages: RefCell<HashMap<String, Language>>,
        pub skills: RefCell<HashMap<String, SkillRecord>>,
        pub words: RefCell<HashMap<(String, String, String), TranslationRecord>>,
        /// The ordered record sequence of the most recent `upsert_words` call.
        pub last_word_batch: RefCell<Vec<TranslationRecord>>,
    }

    fn apply_upsert<K: std::hash::Hash + Eq, V: Clone + PartialEq>(
        collection: &mut HashMap<K, V>,
        entries: impl IntoIterator<Item = (K, V)>,
    ) -> UpsertReport {
        let mut report = UpsertReport::default();
        for (key, value) in entries {
            match collection.get(&key) {
                Some(existing) => {
                    report.matched += 1;
                    if existing != &value {
                        report.modified += 1;
                    }
                }
                None => report.inserted += 1,
            }
            collection.insert(key, value);
        }
        report
    }

    impl VocabularyStore for FakeStore {
        async fn upsert_languages(&self, records: &[Language]) -> Result<UpsertReport> {
            Ok(apply_upsert(
                &mut self.languages.borrow_mut(),
                records.iter().map(|r| (r.id.clone(), r.clone())),
            ))
        }

        async fn upsert_skills(&self, records: &[SkillRecord]) -> Result<UpsertReport> {
            Ok(apply_upsert(
                &mut self.skills.borrow_mut(),
                records.iter().map(|r| (r.id.clone(), r.clone())),
            ))
        }

        async fn upsert_words(&self, records: &[TranslationRecord]) -> Result<UpsertReport> {
            *self.last_word_batch.borrow_mut() = records.to_vec();
            Ok(apply_upsert(
                &mut self.words.borrow_mut(),
                records
                    .iter()
                    .map(|r| ((r.from.clone(), r.to.clone(), r.word.clone()), r.clone())),
            ))
        }
    }
}
