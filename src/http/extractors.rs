//! Custom Axum extractors
//!
//! Thin wrappers over axum's own extractors whose rejections come back in
//! the API's JSON error shape instead of plain text.

use axum::extract::multipart::MultipartError;
use axum::extract::{FromRequest, FromRequestParts, Multipart, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;

use crate::services::ImageUpload;
use crate::utils::errors::HotelConsoleError;

/// Multipart field carrying the uploaded image
const IMAGE_FIELD: &str = "file";

/// Path parameter, e.g. a numeric id or a profile UUID
pub struct Id<T>(pub T);

impl<S, T> FromRequestParts<S> for Id<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = HotelConsoleError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| HotelConsoleError::InvalidInput(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Query string parameters
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = HotelConsoleError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| HotelConsoleError::InvalidInput(e.body_text()))?;
        Ok(Self(value))
    }
}

/// JSON request body
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = HotelConsoleError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| HotelConsoleError::InvalidInput(e.body_text()))?;
        Ok(Self(value))
    }
}

/// Pull the image out of a multipart body; other fields are ignored
pub async fn read_image_upload(mut multipart: Multipart, limit: usize) -> Result<ImageUpload, HotelConsoleError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        return Ok(ImageUpload {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }

    Err(HotelConsoleError::InvalidInput(format!(
        "multipart field `{}` is required",
        IMAGE_FIELD
    )))
}

fn multipart_error(e: MultipartError, limit: usize) -> HotelConsoleError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HotelConsoleError::PayloadTooLarge { limit }
    } else {
        e.into()
    }
}
