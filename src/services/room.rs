//! Room catalog service
//!
//! Rooms are reached through their hotel, so a partner can only touch rooms
//! of hotels they own.

use tracing::info;
use validator::Validate;
use crate::database::{HotelRepository, RoomRepository};
use crate::models::{CreateRoomRequest, Paginated, Pagination, Room, RoomFilter, RoomStatus, UpdateRoomRequest};
use crate::services::auth::AuthContext;
use crate::services::hotel::ensure_not_blank;
use crate::services::storage::{ImageUpload, StorageService};
use crate::utils::errors::{HotelConsoleError, Result};
use crate::utils::logging::log_catalog_change;

#[derive(Clone, Debug)]
pub struct RoomService {
    rooms: RoomRepository,
    hotels: HotelRepository,
    storage: StorageService,
}

impl RoomService {
    pub fn new(rooms: RoomRepository, hotels: HotelRepository, storage: StorageService) -> Self {
        Self { rooms, hotels, storage }
    }

    async fn ensure_hotel(&self, ctx: &AuthContext, hotel_id: i64) -> Result<()> {
        match self.hotels.find_by_id(hotel_id, ctx.owner_scope()).await? {
            Some(_) => Ok(()),
            None => Err(HotelConsoleError::HotelNotFound { hotel_id }),
        }
    }

    pub async fn list(&self, ctx: &AuthContext, hotel_id: i64, filter: &RoomFilter, pagination: Pagination) -> Result<Paginated<Room>> {
        self.ensure_hotel(ctx, hotel_id).await?;
        let (rooms, total) = self.rooms.list(hotel_id, filter, pagination).await?;
        Ok(Paginated::new(rooms, total, pagination))
    }

    pub async fn get(&self, ctx: &AuthContext, id: i64) -> Result<Room> {
        self.rooms
            .find_by_id(id, ctx.owner_scope())
            .await?
            .ok_or(HotelConsoleError::RoomNotFound { room_id: id })
    }

    pub async fn create(&self, ctx: &AuthContext, hotel_id: i64, request: CreateRoomRequest) -> Result<Room> {
        request.validate()?;
        ensure_not_blank("room_number", &request.room_number)?;
        self.ensure_hotel(ctx, hotel_id).await?;

        let room = self.rooms.create(hotel_id, request).await?;
        log_catalog_change("room", room.id, "create", ctx.user_id);
        Ok(room)
    }

    pub async fn update(&self, ctx: &AuthContext, id: i64, request: UpdateRoomRequest) -> Result<Room> {
        request.validate()?;
        if let Some(number) = &request.room_number {
            ensure_not_blank("room_number", number)?;
        }
        self.get(ctx, id).await?;

        let room = self.rooms
            .update(id, request)
            .await?
            .ok_or(HotelConsoleError::RoomNotFound { room_id: id })?;

        log_catalog_change("room", id, "update", ctx.user_id);
        Ok(room)
    }

    /// Direct status change; no transition rules apply
    pub async fn set_status(&self, ctx: &AuthContext, id: i64, status: RoomStatus) -> Result<Room> {
        self.get(ctx, id).await?;

        let room = self.rooms
            .set_status(id, status)
            .await?
            .ok_or(HotelConsoleError::RoomNotFound { room_id: id })?;

        info!(room_id = id, status = %status, user_id = %ctx.user_id, "Room status changed");
        Ok(room)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> Result<()> {
        self.get(ctx, id).await?;

        if !self.rooms.delete(id).await? {
            return Err(HotelConsoleError::RoomNotFound { room_id: id });
        }

        log_catalog_change("room", id, "delete", ctx.user_id);
        Ok(())
    }

    pub async fn set_image(&self, ctx: &AuthContext, id: i64, upload: ImageUpload) -> Result<Room> {
        let room = self.get(ctx, id).await?;

        let folder = format!("hotels/{}/rooms/{}", room.hotel_id, id);
        let stored = self.storage.upload_image(&folder, upload).await?;
        let room = self.rooms
            .set_image(id, &stored.public_url)
            .await?
            .ok_or(HotelConsoleError::RoomNotFound { room_id: id })?;

        info!(room_id = id, path = %stored.path, "Room image replaced");
        Ok(room)
    }
}
