//! Translation batching: dedup → fixed-size chunks → cache-checked remote
//! calls → positionally reassembled, deterministically ordered records.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::instrument;

use lexisync_cache::{ContentCache, keys};
use lexisync_provider::CourseProvider;
use lexisync_shared::{Course, LexiSyncError, Result, TranslationRecord};

use crate::traverse::WordIndex;

/// Words submitted per remote translate call. Bounds request/response size;
/// deliberately a constant, not configuration.
pub const TRANSLATION_BATCH_SIZE: usize = 50;

/// Translate every distinct word in `index` for `course`.
///
/// Chunks are processed sequentially in index order, one cache-checked
/// remote call per chunk. The provider response is positionally aligned
/// with the chunk (`result[i]` ↔ `word[i]`); a length mismatch aborts the
/// run. The returned records are sorted by word under case-insensitive
/// collation — the sole ordering guarantee on output.
#[instrument(skip_all, fields(course = %course.id, words = index.len()))]
pub async fn translate_words<P: CourseProvider>(
    provider: &P,
    cache: &ContentCache,
    course: &Course,
    index: WordIndex,
) -> Result<Vec<TranslationRecord>> {
    let (words, mut skills_by_word) = index.into_parts();
    let mut translations_by_word: HashMap<String, Vec<String>> =
        HashMap::with_capacity(words.len());

    for chunk in words.chunks(TRANSLATION_BATCH_SIZE) {
        let key = keys::translation_batch(&course.id, chunk);
        let payloads = cache
            .get_with(&key, || async move { provider.translate(&course.id, chunk).await })
            .await?;

        if payloads.len() != chunk.len() {
            return Err(LexiSyncError::invariant(format!(
                "course {}: translate returned {} payloads for a {}-word batch",
                course.id,
                payloads.len(),
                chunk.len()
            )));
        }

        for (word, payload) in chunk.iter().zip(payloads) {
            translations_by_word.insert(word.clone(), payload);
        }
    }

    let mut records: Vec<TranslationRecord> = words
        .into_iter()
        .map(|word| {
            let translations = translations_by_word.remove(&word).unwrap_or_default();
            let skills = skills_by_word.remove(&word).unwrap_or_default();
            TranslationRecord {
                word,
                from: course.learning_language.id.clone(),
                to: course.from_language.id.clone(),
                translations,
                skills,
            }
        })
        .collect();

    records.sort_by(|a, b| collate(&a.word, &b.word));
    Ok(records)
}

/// Case-insensitive word ordering with a byte-order tie-break.
///
/// Deterministic regardless of traversal or batch order; stands in for
/// locale collation.
fn collate(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
