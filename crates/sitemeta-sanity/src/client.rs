//! Sanity HTTP client: GROQ query execution against the content-store API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use sitemeta_core::{ContentStore, Error, RawSiteMetadata, Result};

use crate::image;

/// GROQ projection for the single site-metadata record.
///
/// Image fields are projected down to their raw asset references so the wire
/// shape stays flat strings; the client resolves them to CDN URLs on demand.
pub const METADATA_QUERY: &str = r#"*[_type == "metadata"][0]{
  siteTitle, siteDescription, defaultPageTitle, defaultPageDescription,
  keywords, canonicalUrl, robotsIndex, robotsFollow, googleVerification,
  sitePublisher, appleMobileWebAppTitle, siteAuthor,
  "favicon": favicon.asset._ref,
  "favicon16": favicon16.asset._ref,
  "favicon32": favicon32.asset._ref,
  "appleTouchIcon": appleTouchIcon.asset._ref,
  "ogImage": ogImage.asset._ref,
  ogImageAlt, ogType, ogSiteName, ogUrl, ogLocale,
  twitterCard, twitterSite, twitterCreator,
  "twitterImage": twitterImage.asset._ref,
  linkedInUrl, facebookUrl, instagramUrl, youtubeUrl
}"#;

/// Configuration for the Sanity client.
#[derive(Debug, Clone)]
pub struct SanityConfig {
    /// Sanity project identifier.
    pub project_id: String,
    /// Dataset name (e.g. "production").
    pub dataset: String,
    /// Date-pinned API version, e.g. "v2024-01-01".
    pub api_version: String,
    /// Token for private datasets (None for public datasets).
    pub token: Option<String>,
    /// Query timeout in seconds.
    pub timeout_secs: u64,
    /// API base override (tests point this at a local server).
    pub api_base: Option<String>,
}

impl SanityConfig {
    /// Read configuration from environment variables.
    ///
    /// `SANITY_PROJECT_ID` is required; `SANITY_DATASET`,
    /// `SANITY_API_VERSION`, `SANITY_TOKEN`, and
    /// `SITEMETA_FETCH_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self> {
        let project_id = std::env::var("SANITY_PROJECT_ID")
            .map_err(|_| Error::Config("SANITY_PROJECT_ID not set".to_string()))?;
        let dataset = std::env::var("SANITY_DATASET")
            .unwrap_or_else(|_| sitemeta_core::defaults::SANITY_DATASET.to_string());
        let api_version = std::env::var("SANITY_API_VERSION")
            .unwrap_or_else(|_| sitemeta_core::defaults::SANITY_API_VERSION.to_string());
        let token = std::env::var("SANITY_TOKEN").ok().filter(|t| !t.is_empty());
        let timeout_secs = std::env::var("SITEMETA_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(sitemeta_core::defaults::FETCH_TIMEOUT_SECS);

        Ok(Self {
            project_id,
            dataset,
            api_version,
            token,
            timeout_secs,
            api_base: None,
        })
    }
}

/// Query API response envelope.
#[derive(Deserialize)]
struct QueryResponse {
    result: Option<RawSiteMetadata>,
}

/// Sanity content-store client.
pub struct SanityClient {
    client: Client,
    config: SanityConfig,
    query_url: String,
}

impl SanityClient {
    /// Create a client from explicit configuration.
    pub fn with_config(config: SanityConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_base = config
            .api_base
            .clone()
            .unwrap_or_else(|| format!("https://{}.api.sanity.io", config.project_id));
        let query_url = format!(
            "{}/{}/data/query/{}",
            api_base, config.api_version, config.dataset
        );

        info!(
            subsystem = "sanity",
            project = %config.project_id,
            dataset = %config.dataset,
            api_version = %config.api_version,
            "Initializing Sanity client"
        );

        Ok(Self {
            client,
            config,
            query_url,
        })
    }

    /// Create a client from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::with_config(SanityConfig::from_env()?)
    }

    /// The full query URL (base + version + dataset).
    pub fn query_url(&self) -> &str {
        &self.query_url
    }

    /// Execute a GROQ query and decode the `result` field.
    async fn query(&self, groq: &str) -> Result<Option<RawSiteMetadata>> {
        let start = Instant::now();
        let url = format!("{}?query={}", self.query_url, urlencoding::encode(groq));

        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::ContentStore(format!("Query request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ContentStore(format!(
                "Sanity returned {}: {}",
                status, body
            )));
        }

        let envelope: QueryResponse = response
            .json()
            .await
            .map_err(|e| Error::ContentStore(format!("Failed to parse response: {}", e)))?;

        debug!(
            subsystem = "sanity",
            op = "query",
            duration_ms = start.elapsed().as_millis() as u64,
            found = envelope.result.is_some(),
            "GROQ query complete"
        );

        Ok(envelope.result)
    }
}

#[async_trait]
impl ContentStore for SanityClient {
    async fn fetch_metadata(&self) -> Result<Option<RawSiteMetadata>> {
        self.query(METADATA_QUERY).await
    }

    fn image_url(&self, image_ref: &str) -> Option<String> {
        let url = image::cdn_url(&self.config.project_id, &self.config.dataset, image_ref);
        if url.is_none() {
            warn!(
                subsystem = "sanity",
                image_ref = %image_ref,
                "Dropping malformed image reference"
            );
        }
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param_contains};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_base: Option<String>) -> SanityConfig {
        SanityConfig {
            project_id: "projx".to_string(),
            dataset: "production".to_string(),
            api_version: "v2024-01-01".to_string(),
            token: None,
            timeout_secs: 5,
            api_base,
        }
    }

    #[test]
    fn query_url_defaults_to_project_host() {
        let client = SanityClient::with_config(test_config(None)).unwrap();
        assert_eq!(
            client.query_url(),
            "https://projx.api.sanity.io/v2024-01-01/data/query/production"
        );
    }

    #[test]
    fn image_url_resolves_through_project_and_dataset() {
        let client = SanityClient::with_config(test_config(None)).unwrap();
        assert_eq!(
            client.image_url("image-abc123-64x64-png").as_deref(),
            Some("https://cdn.sanity.io/images/projx/production/abc123-64x64.png")
        );
        assert!(client.image_url("not-an-image-ref").is_none());
    }

    #[tokio::test]
    async fn fetch_metadata_decodes_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2024-01-01/data/query/production"))
            .and(query_param_contains("query", "_type == \"metadata\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "result": {
                    "siteTitle": "Acme",
                    "robotsIndex": false,
                    "ogImage": "image-abc123-64x64-png"
                },
                "ms": 3
            })))
            .mount(&server)
            .await;

        let client = SanityClient::with_config(test_config(Some(server.uri()))).unwrap();
        let record = client.fetch_metadata().await.unwrap().unwrap();
        assert_eq!(record.site_title.as_deref(), Some("Acme"));
        assert_eq!(record.robots_index, Some(false));
        assert_eq!(record.og_image.as_deref(), Some("image-abc123-64x64-png"));
    }

    #[tokio::test]
    async fn fetch_metadata_null_result_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "result": null, "ms": 1 })),
            )
            .mount(&server)
            .await;

        let client = SanityClient::with_config(test_config(Some(server.uri()))).unwrap();
        assert!(client.fetch_metadata().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fetch_metadata_maps_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = SanityClient::with_config(test_config(Some(server.uri()))).unwrap();
        let err = client.fetch_metadata().await.unwrap_err();
        assert!(err.to_string().contains("Sanity returned"));
    }
}
