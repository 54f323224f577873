//! Hotel catalog service
//!
//! Partners only ever see hotels they own; a hotel outside their scope is
//! reported as missing rather than forbidden.

use tracing::info;
use validator::Validate;
use crate::database::HotelRepository;
use crate::models::{CreateHotelRequest, Hotel, HotelFilter, Paginated, Pagination, UpdateHotelRequest};
use crate::services::auth::AuthContext;
use crate::services::storage::{ImageUpload, StorageService};
use crate::utils::errors::{HotelConsoleError, Result};
use crate::utils::logging::log_catalog_change;

#[derive(Clone, Debug)]
pub struct HotelService {
    hotels: HotelRepository,
    storage: StorageService,
}

impl HotelService {
    pub fn new(hotels: HotelRepository, storage: StorageService) -> Self {
        Self { hotels, storage }
    }

    pub async fn list(&self, ctx: &AuthContext, filter: &HotelFilter, pagination: Pagination) -> Result<Paginated<Hotel>> {
        let (hotels, total) = self.hotels.list(filter, ctx.owner_scope(), pagination).await?;
        Ok(Paginated::new(hotels, total, pagination))
    }

    pub async fn get(&self, ctx: &AuthContext, id: i64) -> Result<Hotel> {
        self.hotels
            .find_by_id(id, ctx.owner_scope())
            .await?
            .ok_or(HotelConsoleError::HotelNotFound { hotel_id: id })
    }

    /// Create a hotel; partners always become its owner
    pub async fn create(&self, ctx: &AuthContext, request: CreateHotelRequest) -> Result<Hotel> {
        request.validate()?;
        ensure_not_blank("name", &request.name)?;
        ensure_not_blank("city", &request.city)?;
        ensure_not_blank("country", &request.country)?;

        let owner_id = if ctx.is_admin() {
            request.owner_id
        } else {
            Some(ctx.user_id)
        };

        let hotel = self.hotels.create(request, owner_id).await?;
        log_catalog_change("hotel", hotel.id, "create", ctx.user_id);
        Ok(hotel)
    }

    /// Partial update; only administrators may hand a hotel to another owner
    pub async fn update(&self, ctx: &AuthContext, id: i64, mut request: UpdateHotelRequest) -> Result<Hotel> {
        request.validate()?;
        ensure_update_not_blank(&request)?;
        if !ctx.is_admin() {
            request.owner_id = None;
        }

        let hotel = self.hotels
            .update(id, request, ctx.owner_scope())
            .await?
            .ok_or(HotelConsoleError::HotelNotFound { hotel_id: id })?;

        log_catalog_change("hotel", id, "update", ctx.user_id);
        Ok(hotel)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> Result<()> {
        ctx.require_admin()?;

        if !self.hotels.delete(id).await? {
            return Err(HotelConsoleError::HotelNotFound { hotel_id: id });
        }

        log_catalog_change("hotel", id, "delete", ctx.user_id);
        Ok(())
    }

    /// Upload a new hotel image and point the hotel at it
    pub async fn set_image(&self, ctx: &AuthContext, id: i64, upload: ImageUpload) -> Result<Hotel> {
        self.get(ctx, id).await?;

        let stored = self.storage.upload_image(&format!("hotels/{}", id), upload).await?;
        let hotel = self.hotels
            .set_image(id, &stored.public_url, ctx.owner_scope())
            .await?
            .ok_or(HotelConsoleError::HotelNotFound { hotel_id: id })?;

        info!(hotel_id = id, path = %stored.path, "Hotel image replaced");
        Ok(hotel)
    }
}

pub(crate) fn ensure_not_blank(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(HotelConsoleError::InvalidInput(format!("{} must not be blank", field)));
    }
    Ok(())
}

/// Fields required on create may be left out of an update, but not blanked
fn ensure_update_not_blank(request: &UpdateHotelRequest) -> Result<()> {
    let fields = [("name", &request.name), ("city", &request.city), ("country", &request.country)];
    for (field, value) in fields {
        if let Some(value) = value {
            ensure_not_blank(field, value)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_blank_values_rejected() {
        assert_matches!(ensure_not_blank("name", "  \t"), Err(HotelConsoleError::InvalidInput(msg)) if msg == "name must not be blank");
        assert!(ensure_not_blank("name", "Casa do Rio").is_ok());
    }

    #[test]
    fn test_update_rejects_blanked_required_fields() {
        let request = UpdateHotelRequest {
            city: Some("   ".to_string()),
            ..Default::default()
        };
        assert_matches!(ensure_update_not_blank(&request), Err(HotelConsoleError::InvalidInput(msg)) if msg.starts_with("city"));

        let request = UpdateHotelRequest {
            country: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(ensure_update_not_blank(&request).is_err());
    }

    #[test]
    fn test_update_allows_omitted_fields() {
        assert!(ensure_update_not_blank(&UpdateHotelRequest::default()).is_ok());

        let request = UpdateHotelRequest {
            name: Some("Casa do Mar".to_string()),
            star_rating: Some(5),
            ..Default::default()
        };
        assert!(ensure_update_not_blank(&request).is_ok());
    }
}
