//! Hosted inference backend over the Gradio HTTP API.
//!
//! Drives one generation against a hosted space: optionally uploads the
//! conditioning image, queues the call on the text-to-video or
//! image-to-video endpoint, waits for the server-sent result event, and
//! downloads the produced clip to a local temp file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::client::{
    GenerationRequest, VideoGenerator, HEIGHT, SEED, USE_RANDOM_SEED, WIDTH,
};
use crate::error::GeneratorError;

/// Text-to-video endpoint name on the hosted space.
const ENDPOINT_T2V: &str = "generate_video";
/// Image-to-video endpoint name on the hosted space.
const ENDPOINT_I2V: &str = "generate_image_to_video";

/// HTTP client for one hosted generation space.
pub struct RemoteGenerator {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// Response returned when a call is queued on the space.
#[derive(Debug, Deserialize)]
struct CallResponse {
    event_id: String,
}

impl RemoteGenerator {
    /// Create a client for `space`, either a full base URL
    /// (`https://host`) or a hub space id (`owner/name`), which resolves
    /// to the standard `https://{owner}-{name}.hf.space` host.
    pub fn new(space: &str, token: Option<String>) -> Self {
        let base_url = if space.starts_with("http://") || space.starts_with("https://") {
            space.trim_end_matches('/').to_string()
        } else {
            let slug = space.to_ascii_lowercase().replace(['/', '_', '.'], "-");
            format!("https://{slug}.hf.space")
        };

        Self {
            client: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    /// Base URL the client resolves calls against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Upload a local file to the space, returning the server-side path
    /// usable as a `FileData` reference in call payloads.
    async fn upload(&self, path: &Path) -> Result<String, GeneratorError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.png".to_string());

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
        let form = reqwest::multipart::Form::new().part("files", part);

        let response = self
            .request(self.client.post(format!("{}/gradio_api/upload", self.base_url)))
            .multipart(form)
            .send()
            .await?;

        let paths: Vec<String> = Self::parse_response(response).await?;
        paths
            .into_iter()
            .next()
            .ok_or_else(|| GeneratorError::Protocol("Upload returned no file path".to_string()))
    }

    /// Queue a call on `endpoint`, returning the event id to poll.
    async fn queue_call(
        &self,
        endpoint: &str,
        data: Vec<serde_json::Value>,
    ) -> Result<String, GeneratorError> {
        let body = serde_json::json!({ "data": data });

        let response = self
            .request(
                self.client
                    .post(format!("{}/gradio_api/call/{endpoint}", self.base_url)),
            )
            .json(&body)
            .send()
            .await?;

        let call: CallResponse = Self::parse_response(response).await?;
        Ok(call.event_id)
    }

    /// Wait for the result of a queued call.
    ///
    /// The result endpoint streams server-sent events and closes after the
    /// terminal `complete` (or `error`) event, so reading the whole body is
    /// the wait. Returns the `data` array of the complete event.
    async fn await_result(
        &self,
        endpoint: &str,
        event_id: &str,
    ) -> Result<Vec<serde_json::Value>, GeneratorError> {
        let response = self
            .request(self.client.get(format!(
                "{}/gradio_api/call/{endpoint}/{event_id}",
                self.base_url
            )))
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;

        let mut current_event = String::new();
        for line in body.lines() {
            if let Some(name) = line.strip_prefix("event:") {
                current_event = name.trim().to_string();
            } else if let Some(payload) = line.strip_prefix("data:") {
                match current_event.as_str() {
                    "complete" => {
                        let data: Vec<serde_json::Value> = serde_json::from_str(payload.trim())
                            .map_err(|e| {
                                GeneratorError::Protocol(format!("Malformed result payload: {e}"))
                            })?;
                        return Ok(data);
                    }
                    "error" => {
                        return Err(GeneratorError::Protocol(format!(
                            "Generation errored upstream: {}",
                            payload.trim()
                        )));
                    }
                    _ => {}
                }
            }
        }

        Err(GeneratorError::Protocol(
            "Result stream ended without a complete event".to_string(),
        ))
    }

    /// Resolve the artifact reference in a result payload to a URL.
    fn artifact_url(&self, data: &[serde_json::Value]) -> Result<String, GeneratorError> {
        let first = data
            .first()
            .ok_or_else(|| GeneratorError::MissingArtifact("empty result data".to_string()))?;

        if let Some(url) = first.get("url").and_then(|u| u.as_str()) {
            return Ok(url.to_string());
        }
        if let Some(path) = first.get("path").and_then(|p| p.as_str()) {
            return Ok(format!("{}/gradio_api/file={path}", self.base_url));
        }
        if let Some(path) = first.as_str() {
            return Ok(format!("{}/gradio_api/file={path}", self.base_url));
        }

        Err(GeneratorError::MissingArtifact(format!(
            "unrecognized result entry: {first}"
        )))
    }

    /// Download the artifact to a local `.mp4` temp file.
    async fn download(&self, url: &str) -> Result<PathBuf, GeneratorError> {
        let response = self.request(self.client.get(url)).send().await?;
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Err(GeneratorError::MissingArtifact(format!(
                "empty download from {url}"
            )));
        }

        let file = tempfile::Builder::new().suffix(".mp4").tempfile()?;
        tokio::fs::write(file.path(), &bytes).await?;
        Ok(file.into_temp_path().keep().map_err(std::io::Error::from)?)
    }

    // ---- private helpers ----

    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, GeneratorError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GeneratorError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GeneratorError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait::async_trait]
impl VideoGenerator for RemoteGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<PathBuf, GeneratorError> {
        let sampling = [
            serde_json::json!(USE_RANDOM_SEED),
            serde_json::json!(SEED),
            serde_json::json!(HEIGHT),
            serde_json::json!(WIDTH),
        ];

        let (endpoint, data) = match &request.image {
            Some(image) => {
                let server_path = self.upload(image).await?;
                let file_data = serde_json::json!({
                    "path": server_path,
                    "meta": { "_type": "gradio.FileData" },
                });
                let mut data = vec![
                    file_data,
                    serde_json::json!(request.prompt),
                    serde_json::json!(request.negative_prompt),
                ];
                data.extend(sampling);
                (ENDPOINT_I2V, data)
            }
            None => {
                let mut data = vec![
                    serde_json::json!(request.prompt),
                    serde_json::json!(request.negative_prompt),
                ];
                data.extend(sampling);
                (ENDPOINT_T2V, data)
            }
        };

        tracing::debug!(endpoint, base_url = %self.base_url, "Queueing remote generation");
        let event_id = self.queue_call(endpoint, data).await?;

        let result = self.await_result(endpoint, &event_id).await?;
        let url = self.artifact_url(&result)?;

        tracing::debug!(%url, "Downloading generated artifact");
        self.download(&url).await
    }
}
