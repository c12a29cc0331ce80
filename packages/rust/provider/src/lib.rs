//! Remote course-provider capability.
//!
//! [`CourseProvider`] is the seam the pipeline drives; [`HttpCourseProvider`]
//! is the reqwest-backed implementation against the real API. Tests supply
//! in-memory fakes instead.

pub mod http;

pub use http::{Credentials, HttpCourseProvider};

use lexisync_shared::{Course, ProviderSkill, Result};

/// Translation strings returned for one word.
pub type TranslationPayload = Vec<String>;

/// The remote course-provider capability.
///
/// `translate` returns one payload per submitted word, positionally aligned
/// with the batch: `result[i]` holds the translations of `batch[i]`. Any
/// cache or retry layer must preserve that contract.
pub trait CourseProvider {
    /// Fetch the full course catalog.
    fn get_courses(&self) -> impl Future<Output = Result<Vec<Course>>>;

    /// Fetch one course's skills. The returned order is significant and
    /// becomes each skill's `order` field.
    fn get_course_skills(&self, course_id: &str)
    -> impl Future<Output = Result<Vec<ProviderSkill>>>;

    /// Fetch one skill's word list.
    fn get_skill_words(&self, skill_id: &str) -> impl Future<Output = Result<Vec<String>>>;

    /// Translate an ordered batch of words in a course's language pair.
    fn translate(
        &self,
        course_id: &str,
        batch: &[String],
    ) -> impl Future<Output = Result<Vec<TranslationPayload>>>;
}
