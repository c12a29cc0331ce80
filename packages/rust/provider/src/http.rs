//! reqwest-backed [`CourseProvider`] implementation.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use lexisync_shared::{Course, LexiSyncError, ProviderSkill, Result};

use crate::{CourseProvider, TranslationPayload};

/// Provider login credentials, read from the environment by the caller.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Login response carrying the session token.
#[derive(Debug, Deserialize)]
struct LoginResponse {
    jwt: String,
}

/// Request body for a translation batch.
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    words: &'a [String],
}

/// Authenticated HTTP client for the course provider API.
#[derive(Debug)]
pub struct HttpCourseProvider {
    client: reqwest::Client,
    base_url: String,
    jwt: String,
}

impl HttpCourseProvider {
    /// Log in and return an authenticated provider handle.
    #[instrument(skip_all, fields(base_url = %base_url))]
    pub async fn login(base_url: &str, credentials: &Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("LexiSync/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| LexiSyncError::Provider(format!("client build: {e}")))?;

        let url = format!("{}/login", base_url.trim_end_matches('/'));
        let response = client
            .post(&url)
            .json(credentials)
            .send()
            .await
            .map_err(|e| LexiSyncError::Provider(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LexiSyncError::Provider(format!("{url}: HTTP {status}")));
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| LexiSyncError::Provider(format!("{url}: {e}")))?;

        info!(username = %credentials.username, "provider login succeeded");

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            jwt: login.jwt,
        })
    }

    /// GET a JSON resource under the API root.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.jwt)
            .send()
            .await
            .map_err(|e| LexiSyncError::Provider(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LexiSyncError::Provider(format!("{url}: HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| LexiSyncError::Provider(format!("{url}: {e}")))
    }
}

impl CourseProvider for HttpCourseProvider {
    async fn get_courses(&self) -> Result<Vec<Course>> {
        self.get_json("/api/courses").await
    }

    async fn get_course_skills(&self, course_id: &str) -> Result<Vec<ProviderSkill>> {
        self.get_json(&format!("/api/courses/{course_id}/skills")).await
    }

    async fn get_skill_words(&self, skill_id: &str) -> Result<Vec<String>> {
        self.get_json(&format!("/api/skills/{skill_id}/words")).await
    }

    async fn translate(
        &self,
        course_id: &str,
        batch: &[String],
    ) -> Result<Vec<TranslationPayload>> {
        let url = format!("{}/api/courses/{course_id}/translate", self.base_url);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.jwt)
            .json(&TranslateRequest { words: batch })
            .send()
            .await
            .map_err(|e| LexiSyncError::Provider(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LexiSyncError::Provider(format!("{url}: HTTP {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| LexiSyncError::Provider(format!("{url}: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const COURSES_JSON: &str = r#"[
        {
            "id": "DUOLINGO_VI_EN",
            "learningLanguage": {"id": "vi", "name": "Vietnamese"},
            "fromLanguage": {"id": "en", "name": "English"}
        }
    ]"#;

    async fn logged_in_provider(server: &MockServer) -> HttpCourseProvider {
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"{"jwt": "token-123"}"#),
            )
            .mount(server)
            .await;

        let credentials = Credentials {
            username: "learner".into(),
            password: "hunter2".into(),
        };
        HttpCourseProvider::login(&server.uri(), &credentials)
            .await
            .expect("login")
    }

    #[tokio::test]
    async fn login_then_fetch_courses_with_bearer_token() {
        let server = MockServer::start().await;
        let provider = logged_in_provider(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/courses"))
            .and(header("authorization", "Bearer token-123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(COURSES_JSON))
            .mount(&server)
            .await;

        let courses = provider.get_courses().await.expect("get courses");
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].id, "DUOLINGO_VI_EN");
        assert_eq!(courses[0].learning_language.id, "vi");
    }

    #[tokio::test]
    async fn login_failure_surfaces_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let credentials = Credentials {
            username: "learner".into(),
            password: "wrong".into(),
        };
        let result = HttpCourseProvider::login(&server.uri(), &credentials).await;
        let err = result.expect_err("login must fail");
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn skill_and_word_endpoints() {
        let server = MockServer::start().await;
        let provider = logged_in_provider(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/courses/DUOLINGO_VI_EN/skills"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[{"id": "s1", "title": "Basics"}, {"id": "s2", "title": "Food"}]"#,
            ))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/api/skills/s1/words"))
            .respond_with(
                ResponseTemplate::new(200).set_body_string(r#"["chào", "cảm ơn"]"#),
            )
            .mount(&server)
            .await;

        let skills = provider
            .get_course_skills("DUOLINGO_VI_EN")
            .await
            .expect("skills");
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].title, "Basics");

        let words = provider.get_skill_words("s1").await.expect("words");
        assert_eq!(words, vec!["chào", "cảm ơn"]);
    }

    #[tokio::test]
    async fn translate_posts_exact_ordered_batch() {
        let server = MockServer::start().await;
        let provider = logged_in_provider(&server).await;

        let batch: Vec<String> = vec!["chào".into(), "cảm ơn".into()];

        Mock::given(method("POST"))
            .and(path("/api/courses/DUOLINGO_VI_EN/translate"))
            .and(body_json(serde_json::json!({"words": ["chào", "cảm ơn"]})))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"[["hello", "hi"], ["thank you"]]"#,
            ))
            .mount(&server)
            .await;

        let payloads = provider
            .translate("DUOLINGO_VI_EN", &batch)
            .await
            .expect("translate");
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0], vec!["hello", "hi"]);
        assert_eq!(payloads[1], vec!["thank you"]);
    }

    #[tokio::test]
    async fn remote_error_is_a_provider_error() {
        let server = MockServer::start().await;
        let provider = logged_in_provider(&server).await;

        Mock::given(method("GET"))
            .and(path("/api/courses"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = provider.get_courses().await.expect_err("must fail");
        assert!(matches!(err, LexiSyncError::Provider(_)));
    }
}
