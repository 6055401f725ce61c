//! # Skills API Client
//!
//! Typed access to the skills backend: the JSON API under `/api/v1` and the
//! Markdown endpoints served at the site root.
//!
//! Every call is a single GET with no retry and no caching. Failures come
//! back as [`ClientError`] without local recovery.

mod config;
mod error;

pub use config::{ClientConfig, DEFAULT_API_PREFIX, DEFAULT_BACKEND_URL};
pub use error::{ClientError, ClientResult};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::future::Future;
use tokio_util::sync::CancellationToken;

use crate::models::{SkillDetail, SkillList, SkillSummary};

/// Percent-encode a value for use as a single URL path segment
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) pass through unchanged,
/// so URL-safe skill names appear verbatim in the request path.
pub fn encode_segment(raw: &str) -> Cow<'_, str> {
    urlencoding::encode(raw)
}

/// Backend operations the view layer depends on
#[async_trait]
pub trait SkillsApi: Send + Sync {
    /// List skills, optionally filtered by a search query
    async fn list_skills(&self, query: Option<&str>) -> ClientResult<Vec<SkillSummary>>;

    /// Fetch one skill's detail by name
    async fn get_skill_detail(&self, name: &str) -> ClientResult<SkillDetail>;
}

/// Race a request against a cancellation token
///
/// Resolves to [`ClientError::Cancelled`] as soon as the token fires; the
/// request future is dropped, which aborts the underlying connection.
pub async fn cancellable<T, F>(token: &CancellationToken, request: F) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => Err(ClientError::Cancelled),
        result = request => result,
    }
}

/// HTTP client for the skills backend
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct SkillsClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl SkillsClient {
    /// Build a client from configuration, validating the base URL
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let parsed = Url::parse(config.origin()).map_err(|e| ClientError::InvalidUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl {
                url: config.base_url.clone(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(|source| ClientError::Transport {
            url: config.base_url.clone(),
            source,
        })?;

        Ok(Self { http, config })
    }

    /// Client for the default local backend
    pub fn local() -> ClientResult<Self> {
        Self::new(ClientConfig::default())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL of a path under the JSON API prefix
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}{}{}",
            self.config.origin(),
            self.config.normalized_prefix(),
            path
        )
    }

    /// Absolute URL of a path at the site root
    pub fn site_url(&self, path: &str) -> String {
        format!("{}{}", self.config.origin(), path)
    }

    pub fn skills_url(&self) -> String {
        self.api_url("/skills")
    }

    pub fn skill_url(&self, name: &str) -> String {
        self.api_url(&format!("/skills/{}", encode_segment(name)))
    }

    pub fn download_url(&self, name: &str) -> String {
        self.api_url(&format!("/download/{}", encode_segment(name)))
    }

    pub fn skill_markdown_url(&self, name: &str) -> String {
        self.site_url(&format!("/skill/{}.md", encode_segment(name)))
    }

    pub fn guide_url(&self) -> String {
        self.site_url("/skill.md")
    }

    /// List skills; `q` is sent only when a query is given
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn list_skills(&self, query: Option<&str>) -> ClientResult<Vec<SkillSummary>> {
        let mut url = Url::parse(&self.skills_url()).map_err(|e| ClientError::InvalidUrl {
            url: self.skills_url(),
            reason: e.to_string(),
        })?;
        if let Some(q) = query {
            url.query_pairs_mut().append_pair("q", q);
        }

        let list: SkillList = self.get_json(self.http.get(url.clone()), url.as_str()).await?;
        tracing::debug!(count = list.skills.len(), "Listed skills");
        Ok(list.skills)
    }

    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn get_skill_detail(&self, name: &str) -> ClientResult<SkillDetail> {
        let url = self.skill_url(name);
        self.get_json(self.http.get(&url), &url).await
    }

    /// Markdown rendering of a skill, served at `/skill/{name}.md`
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn get_skill_markdown(&self, name: &str) -> ClientResult<String> {
        let url = self.skill_markdown_url(name);
        self.get_text(self.http.get(&url), &url).await
    }

    /// Registry-wide Markdown guide served at `/skill.md`
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn get_registry_guide(&self) -> ClientResult<String> {
        let url = self.guide_url();
        self.get_text(self.http.get(&url), &url).await
    }

    /// ZIP archive of a skill's directory
    #[tracing::instrument(skip(self), level = "debug")]
    pub async fn download_skill_archive(&self, name: &str) -> ClientResult<Bytes> {
        let url = self.download_url(name);
        let response = self.send(self.http.get(&url), &url).await?;
        response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { url, source })
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> ClientResult<Response> {
        let response = request.send().await.map_err(|source| {
            tracing::debug!(url = %url, error = %source, "Request failed");
            ClientError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(url = %url, status = %status, "Backend returned error status");
        Err(ClientError::Status {
            status,
            url: url.to_string(),
            body,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> ClientResult<T> {
        let response = self.send(request, url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|e| ClientError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn get_text(&self, request: RequestBuilder, url: &str) -> ClientResult<String> {
        let response = self.send(request, url).await?;
        response.text().await.map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl SkillsApi for SkillsClient {
    async fn list_skills(&self, query: Option<&str>) -> ClientResult<Vec<SkillSummary>> {
        SkillsClient::list_skills(self, query).await
    }

    async fn get_skill_detail(&self, name: &str) -> ClientResult<SkillDetail> {
        SkillsClient::get_skill_detail(self, name).await
    }}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::{header, StatusCode, Uri},
        response::{IntoResponse, Json, Response},
        Router,
    };
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    type RequestLog = Arc<Mutex<Vec<String>>>;

    async fn fake_backend(State(log): State<RequestLog>, uri: Uri) -> Response {
        log.lock().unwrap().push(uri.to_string());

        match uri.path() {
            "/api/v1/skills" => Json(json!({
                "skills": [{"name": "python"}, {"name": "python-asyncio"}]
            }))
            .into_response(),
            "/api/v1/skills/python" => Json(json!({
                "name": "python",
                "description": "Python helpers",
                "readme": "# Python",
                "file_tree": "- SKILL.md\n"
            }))
            .into_response(),
            "/api/v1/skills/slow" => {
                tokio::time::sleep(Duration::from_secs(10)).await;
                Json(json!({"name": "slow"})).into_response()
            }
            "/api/v1/skills/broken" => "not json".into_response(),
            "/api/v1/download/python" => (
                [(header::CONTENT_TYPE, "application/zip")],
                vec![0x50u8, 0x4b, 0x03, 0x04],
            )
                .into_response(),
            "/skill.md" => "# Skills Registry\n".into_response(),
            "/skill/python.md" => "# python\n\n> Python helpers".into_response(),
            _ => (
                StatusCode::NOT_FOUND,
                Json(json!({"error": "Skill not found"})),
            )
                .into_response(),
        }
    }

    async fn spawn_backend() -> (SkillsClient, RequestLog) {
        let log: RequestLog = Arc::default();
        let app = Router::new()
            .fallback(fake_backend)
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = SkillsClient::new(ClientConfig::new(format!("http://{}", addr))).unwrap();
        (client, log)
    }

    #[test]
    fn test_encode_segment() {
        assert_eq!(encode_segment("python-asyncio"), "python-asyncio");
        assert_eq!(encode_segment("my skill/v2"), "my%20skill%2Fv2");
        assert_eq!(encode_segment("a?b#c"), "a%3Fb%23c");
    }

    #[test]
    fn test_url_building() {
        let client = SkillsClient::new(ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(client.skills_url(), "http://localhost:8080/api/v1/skills");
        assert_eq!(
            client.skill_url("pdf-toolkit"),
            "http://localhost:8080/api/v1/skills/pdf-toolkit"
        );
        assert_eq!(
            client.skill_url("../etc"),
            "http://localhost:8080/api/v1/skills/..%2Fetc"
        );
        assert_eq!(
            client.skill_markdown_url("pdf-toolkit"),
            "http://localhost:8080/skill/pdf-toolkit.md"
        );
        assert_eq!(client.guide_url(), "http://localhost:8080/skill.md");
        assert_eq!(
            client.download_url("pdf-toolkit"),
            "http://localhost:8080/api/v1/download/pdf-toolkit"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = SkillsClient::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));

        let err = SkillsClient::new(ClientConfig::new("ftp://example.com")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[tokio::test]
    async fn test_list_skills_sends_query_only_when_given() {
        let (client, log) = spawn_backend().await;

        let skills = client.list_skills(Some("python")).await.unwrap();
        let names: Vec<_> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["python", "python-asyncio"]);

        client.list_skills(None).await.unwrap();
        client.list_skills(Some("")).await.unwrap();

        let log = log.lock().unwrap().clone();
        assert_eq!(
            log,
            vec![
                "/api/v1/skills?q=python".to_string(),
                "/api/v1/skills".to_string(),
                "/api/v1/skills?q=".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_list_error_reports_full_request_url() {
        let offline = SkillsClient::new(
            ClientConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2)),
        )
        .unwrap();

        match offline.list_skills(Some("pdf tools")).await.unwrap_err() {
            ClientError::Transport { url, .. } => {
                assert_eq!(url, "http://127.0.0.1:1/api/v1/skills?q=pdf+tools")
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_skill_detail() {
        let (client, log) = spawn_backend().await;

        let detail = client.get_skill_detail("python").await.unwrap();
        assert_eq!(detail.name(), "python");
        assert_eq!(detail.readme, "# Python");
        assert_eq!(log.lock().unwrap().as_slice(), ["/api/v1/skills/python"]);
    }

    #[tokio::test]
    async fn test_detail_name_is_encoded_as_one_segment() {
        let (client, log) = spawn_backend().await;

        let err = client.get_skill_detail("a b/c").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(log.lock().unwrap().as_slice(), ["/api/v1/skills/a%20b%2Fc"]);
    }

    #[tokio::test]
    async fn test_not_found_is_distinguishable_from_unreachable() {
        let (client, _log) = spawn_backend().await;

        let err = client.get_skill_detail("nonexistent").await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.is_transport());
        assert_eq!(err.backend_message().as_deref(), Some("Skill not found"));

        let offline = SkillsClient::new(
            ClientConfig::new("http://127.0.0.1:1").with_timeout(Duration::from_secs(2)),
        )
        .unwrap();
        let err = offline.get_skill_detail("python").await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.status().is_none());
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (client, _log) = spawn_backend().await;

        let err = client.get_skill_detail("broken").await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_markdown_endpoints() {
        let (client, _log) = spawn_backend().await;

        let md = client.get_skill_markdown("python").await.unwrap();
        assert!(md.starts_with("# python"));

        let guide = client.get_registry_guide().await.unwrap();
        assert!(guide.contains("Skills Registry"));

        let err = client.get_skill_markdown("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_download_archive() {
        let (client, _log) = spawn_backend().await;

        let bytes = client.download_skill_archive("python").await.unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn test_cancellation_aborts_pending_request() {
        let (client, _log) = spawn_backend().await;
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let result = cancellable(&token, client.get_skill_detail("slow")).await;
        assert!(matches!(result, Err(ClientError::Cancelled)));
    }

    #[tokio::test]
    async fn test_duplicate_requests_are_independent() {
        let (client, log) = spawn_backend().await;

        let (a, b) = tokio::join!(
            client.get_skill_detail("python"),
            client.get_skill_detail("python")
        );
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
