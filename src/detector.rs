use crate::config::DetectorConfig;
use crate::detection::DetectionReply;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use thiserror::Error;
use tracing::instrument;

const DEFAULT_DETECTION_ERROR: &str = "Detection failed";

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("Could not connect to model server: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Detection(String),
    #[error("Invalid response from model server: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// HTTP client for the remote detection service.
///
/// One POST per call, no retries. A non-2xx status or an unreachable server
/// surfaces as [`DetectorError::Transport`]; a well-formed reply with
/// `success: false` surfaces as [`DetectorError::Detection`].
pub struct DetectorClient {
    client: reqwest::Client,
    detect_url: String,
}

impl DetectorClient {
    pub fn new(config: &DetectorConfig) -> Result<Self, DetectorError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            detect_url: config.detect_url(),
        })
    }

    #[instrument(skip(self, image))]
    pub async fn detect(&self, image: Bytes) -> Result<DetectionReply, DetectorError> {
        let part = Part::bytes(image.to_vec())
            .file_name("image.jpg")
            .mime_str("image/jpeg")?;
        let form = Form::new().part("image", part);

        let response = self
            .client
            .post(&self.detect_url)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body = response.bytes().await?;
        let reply: DetectionReply = serde_json::from_slice(&body)?;

        if !reply.success {
            let message = reply
                .error
                .unwrap_or_else(|| DEFAULT_DETECTION_ERROR.to_string());
            return Err(DetectorError::Detection(message));
        }

        Ok(reply)
    }
}
