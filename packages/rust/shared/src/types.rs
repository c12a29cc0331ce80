//! Core domain types for the vocabulary sync pipeline.
//!
//! Provider-facing types (`Course`, `Language`, `ProviderSkill`) mirror the
//! remote JSON payloads; record types (`SkillRecord`, `TranslationRecord`)
//! are what the pipeline derives and persists.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A language offered by the provider.
///
/// Persisted to the `languages` collection keyed by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    /// Provider language code (e.g., `en`, `vi`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
}

// ---------------------------------------------------------------------------
// Course
// ---------------------------------------------------------------------------

/// A learning-language/known-language pair offered by the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Fixed course code (e.g., `DUOLINGO_VI_EN`).
    pub id: String,
    /// The language being learned.
    pub learning_language: Language,
    /// The language the course is taught in.
    pub from_language: Language,
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

/// A skill as returned by the provider, before course context is stamped on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSkill {
    /// Provider skill identifier.
    pub id: String,
    /// Display title.
    pub title: String,
}

/// A skill enriched with its owning course's language pair and position.
///
/// Persisted to the `skills` collection keyed by `id`. `order` is the
/// zero-based position within the course's skill list at fetch time and
/// resets per course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRecord {
    pub id: String,
    pub title: String,
    /// Learning-language id of the owning course.
    pub from: String,
    /// Known-language id of the owning course.
    pub to: String,
    pub order: usize,
}

impl SkillRecord {
    /// Stamp a provider skill with its owning course's language pair and
    /// its zero-based position in the fetched skill list.
    pub fn from_provider(skill: ProviderSkill, course: &Course, order: usize) -> Self {
        Self {
            id: skill.id,
            title: skill.title,
            from: course.learning_language.id.clone(),
            to: course.from_language.id.clone(),
            order,
        }
    }
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

/// A translated word together with the skills that reference it.
///
/// Persisted to the `words` collection keyed by `(from, to, word)`. The
/// skill list is non-empty by construction: a word only enters the pipeline
/// because some skill referenced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub word: String,
    /// Learning-language id (the word's language).
    pub from: String,
    /// Known-language id (the translations' language).
    pub to: String,
    /// Translation strings returned by the provider for this word.
    pub translations: Vec<String>,
    /// Ids of every skill that references this word, in traversal order.
    pub skills: Vec<String>,
}
