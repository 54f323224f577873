//! Image storage service implementation
//!
//! Uploads hotel and room images to the hosted storage service's object API
//! and hands back the public URL the console displays.

use std::time::Duration;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;
use crate::config::StorageConfig;
use crate::utils::errors::{HotelConsoleError, Result, StorageError};
use crate::utils::helpers::{sanitize_filename, upstream_error_message};
use crate::utils::logging::log_api_error;

/// Image formats the console accepts
pub const ACCEPTED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// An uploaded file as received from the client
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Location of a stored object
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredObject {
    pub path: String,
    pub public_url: String,
}

#[derive(Clone, Debug)]
pub struct StorageService {
    client: Client,
    config: StorageConfig,
}

impl StorageService {
    pub fn new(config: StorageConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("HotelConsole/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HotelConsoleError::Http)?;

        Ok(Self { client, config })
    }

    /// Check type and size before anything leaves the process
    pub fn validate(&self, upload: &ImageUpload) -> Result<String> {
        if upload.bytes.is_empty() {
            return Err(StorageError::EmptyFile.into());
        }

        if upload.bytes.len() > self.config.max_upload_bytes {
            return Err(HotelConsoleError::PayloadTooLarge { limit: self.config.max_upload_bytes });
        }

        let content_type = normalize_content_type(&upload.content_type);
        if !ACCEPTED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(StorageError::UnsupportedContentType(upload.content_type.clone()).into());
        }

        Ok(content_type)
    }

    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/object/public/{}/{}",
            self.config.api_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.bucket),
            encode_path(path)
        )
    }

    fn upload_url(&self, path: &str) -> String {
        format!(
            "{}/object/{}/{}",
            self.config.api_url.trim_end_matches('/'),
            urlencoding::encode(&self.config.bucket),
            encode_path(path)
        )
    }

    /// Store an image under `folder` and return where it landed
    pub async fn upload_image(&self, folder: &str, upload: ImageUpload) -> Result<StoredObject> {
        let content_type = self.validate(&upload)?;
        let path = object_path(folder, &upload.file_name);
        let url = self.upload_url(&path);

        debug!(path = %path, size = upload.bytes.len(), content_type = %content_type, "Uploading image");

        let response = self.client
            .post(&url)
            .bearer_auth(&self.config.service_key)
            .header("apikey", &self.config.service_key)
            .header("x-upsert", "true")
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(upload.bytes)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StorageError::Timeout
                } else if e.is_connect() {
                    StorageError::ServiceUnavailable
                } else {
                    StorageError::UploadFailed { status: 0, message: e.to_string() }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = upstream_error_message(&body);
            log_api_error("storage", &message, Some(path.as_str()));
            return Err(StorageError::UploadFailed { status, message }.into());
        }

        let stored = StoredObject {
            public_url: self.public_url(&path),
            path,
        };
        info!(path = %stored.path, "Image stored");
        Ok(stored)
    }
}

/// `{folder}/{uuid}-{sanitized name}`; the uuid keeps repeated uploads apart
pub fn object_path(folder: &str, file_name: &str) -> String {
    let folder = folder.trim_matches('/');
    format!("{}/{}-{}", folder, Uuid::new_v4(), sanitize_filename(file_name))
}

/// Percent-encode each segment, keeping the separators
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}
