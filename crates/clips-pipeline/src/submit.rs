//! Submission endpoint client.
//!
//! Multipart POST of the trimmed clip, its thumbnail, and the entered
//! metadata, plus the category listing fetched once at pipeline mount.

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use clips_models::{Category, ClipMetadata, ProcessedOutput};

use crate::error::{PipelineError, PipelineResult};

/// Submission client configuration.
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Base URL of the clips site.
    pub base_url: String,
    /// Request timeout. Not a contract requirement, but large uploads
    /// over a dead connection should not hang forever.
    pub timeout: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl SubmitConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("CLIPS_API_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("SUBMIT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        }
    }
}

/// Successful submission response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedClip {
    /// Identifier of the newly created clip, used for post-success
    /// navigation.
    pub clip_id: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(rename = "clipId")]
    clip_id: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<String>,
    message: Option<String>,
}

/// Client for the clips submission endpoint.
pub struct SubmitClient {
    http: Client,
    config: SubmitConfig,
}

impl SubmitClient {
    /// Create a new submission client.
    pub fn new(config: SubmitConfig) -> PipelineResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(PipelineError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> PipelineResult<Self> {
        Self::new(SubmitConfig::from_env())
    }

    /// POST the processed output and metadata as a multipart form.
    ///
    /// On a non-2xx response the server's error message is surfaced
    /// verbatim; transport failures come back as `Network`. Either way
    /// the caller keeps the output and may resubmit.
    pub async fn upload(
        &self,
        output: &ProcessedOutput,
        metadata: &ClipMetadata,
    ) -> PipelineResult<CreatedClip> {
        let url = format!("{}/api/upload", self.config.base_url);
        debug!(%url, video_bytes = output.video.len(), "submitting clip");

        let video = Part::bytes(output.video.clone())
            .file_name("trimmed-video.mp4")
            .mime_str("video/mp4")
            .map_err(PipelineError::Network)?;
        let thumbnail = Part::bytes(output.thumbnail.clone())
            .file_name("thumbnail.jpg")
            .mime_str("image/jpeg")
            .map_err(PipelineError::Network)?;

        let mut form = Form::new()
            .part("video", video)
            .part("thumbnail", thumbnail)
            .text("clipName", metadata.trimmed_title().to_string())
            .text("length", output.length_seconds().to_string())
            .text("private", metadata.is_private.to_string());

        if !metadata.category_ids.is_empty() {
            let joined = metadata
                .category_ids
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(",");
            form = form.text("categories", joined);
        }

        let response = self.http.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .and_then(|body| body.error.or(body.message))
                .unwrap_or_else(|| format!("Failed to upload video ({})", status));
            return Err(PipelineError::Submission { message });
        }

        let body: UploadResponse = response.json().await?;
        info!(clip_id = %body.clip_id, "clip created");
        Ok(CreatedClip {
            clip_id: body.clip_id,
        })
    }

    /// Fetch the category listing for the metadata stage's picker.
    pub async fn list_categories(&self) -> PipelineResult<Vec<Category>> {
        let url = format!("{}/api/categories", self.config.base_url);
        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(PipelineError::Submission {
                message: format!("Failed to load categories ({})", response.status()),
            });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_output() -> ProcessedOutput {
        ProcessedOutput {
            video: b"mp4 bytes".to_vec(),
            thumbnail: b"jpeg bytes".to_vec(),
            duration_seconds: 10.0,
        }
    }

    fn sample_metadata() -> ClipMetadata {
        ClipMetadata {
            title: " Test Clip ".into(),
            is_private: false,
            category_ids: Default::default(),
        }
    }

    fn client_for(server: &MockServer) -> SubmitClient {
        SubmitClient::new(SubmitConfig {
            base_url: server.uri(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_upload_success_returns_clip_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"success": true, "clipId": "abc"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let created = client
            .upload(&sample_output(), &sample_metadata())
            .await
            .unwrap();
        assert_eq!(created.clip_id, "abc");
    }

    #[tokio::test]
    async fn test_upload_failure_surfaces_server_message_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_json(serde_json::json!({"error": "Missing required fields"})),
            )
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .upload(&sample_output(), &sample_metadata())
            .await
            .unwrap_err();
        match err {
            PipelineError::Submission { message } => {
                assert_eq!(message, "Missing required fields");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_failure_still_gets_a_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/upload"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let err = client
            .upload(&sample_output(), &sample_metadata())
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Submission { .. }));
    }

    #[tokio::test]
    async fn test_list_categories() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": "gaming", "name": "Gaming"},
                {"id": "music", "name": "Music"}
            ])))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let categories = client.list_categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].id, "gaming");
    }
}
