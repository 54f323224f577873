//! Reservation service implementation
//!
//! Handles bookings together with their payments and staff notes. Status
//! changes are plain field updates: the console lets staff correct any
//! status to any other.

use tracing::{debug, info};
use validator::Validate;
use crate::database::DatabaseService;
use crate::models::{
    CreateNoteRequest, CreateReservationRequest, DateRange, Journey, NewReservation, Paginated, Pagination, Payment,
    PaymentStatus, PaymentSummary, RecordPaymentRequest, Reservation, ReservationDetail, ReservationFilter,
    ReservationListItem, ReservationNote, ReservationStatus, ReservationView, Room, UpdateReservationRequest,
};
use crate::services::auth::AuthContext;
use crate::utils::errors::{HotelConsoleError, Result};
use crate::utils::helpers::round_to;
use crate::utils::logging::log_reservation_action;

/// Price of a stay at the room's nightly rate
pub fn quote_total(stay: DateRange, price_per_night: f64) -> f64 {
    round_to(stay.nights() as f64 * price_per_night, 2)
}

fn ensure_valid_stay(stay: DateRange) -> Result<()> {
    if !stay.is_valid() {
        return Err(HotelConsoleError::InvalidInput(format!(
            "check-out ({}) must be after check-in ({})",
            stay.check_out, stay.check_in
        )));
    }
    Ok(())
}

fn ensure_capacity(room: &Room, guests: i32) -> Result<()> {
    if guests > room.capacity {
        return Err(HotelConsoleError::InvalidInput(format!(
            "room {} sleeps {} guests, {} requested",
            room.room_number, room.capacity, guests
        )));
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct ReservationService {
    db: DatabaseService,
}

impl ReservationService {
    pub fn new(db: DatabaseService) -> Self {
        Self { db }
    }

    async fn find(&self, ctx: &AuthContext, id: i64) -> Result<ReservationListItem> {
        self.db.reservations
            .find_by_id(id, ctx.owner_scope())
            .await?
            .ok_or(HotelConsoleError::ReservationNotFound { reservation_id: id })
    }

    async fn find_room(&self, ctx: &AuthContext, room_id: i64) -> Result<Room> {
        self.db.rooms
            .find_by_id(room_id, ctx.owner_scope())
            .await?
            .ok_or(HotelConsoleError::RoomNotFound { room_id })
    }

    pub async fn list(&self, ctx: &AuthContext, filter: &ReservationFilter, pagination: Pagination) -> Result<Paginated<ReservationView>> {
        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if to < from {
                return Err(HotelConsoleError::InvalidInput("`to` must not be before `from`".to_string()));
            }
        }

        let (items, total) = self.db.reservations.list(filter, ctx.owner_scope(), pagination).await?;
        Ok(Paginated::new(items, total, pagination).map(ReservationView::from))
    }

    /// Reservation with journey, payments and notes
    pub async fn get(&self, ctx: &AuthContext, id: i64) -> Result<ReservationDetail> {
        let item = self.find(ctx, id).await?;
        let (payments, notes) = self.db.reservation_activity(id).await?;

        let status = item.reservation.status().unwrap_or(ReservationStatus::Pending);
        let payment_summary = PaymentSummary::from_payments(item.reservation.total_amount, &payments);

        Ok(ReservationDetail {
            view: ReservationView::from(item),
            journey: Journey::for_status(status),
            payments,
            payment_summary,
            notes,
        })
    }

    pub async fn create(&self, ctx: &AuthContext, request: CreateReservationRequest) -> Result<Reservation> {
        request.validate()?;
        let stay = DateRange::new(request.check_in, request.check_out);
        ensure_valid_stay(stay)?;

        let room = self.find_room(ctx, request.room_id).await?;
        if let Some(hotel_id) = request.hotel_id {
            if hotel_id != room.hotel_id {
                return Err(HotelConsoleError::InvalidInput(format!(
                    "room {} does not belong to hotel {}",
                    room.id, hotel_id
                )));
            }
        }
        ensure_capacity(&room, request.guests)?;

        let total_amount = request
            .total_amount
            .unwrap_or_else(|| quote_total(stay, room.price_per_night));

        let reservation = self.db.reservations
            .create(NewReservation {
                hotel_id: room.hotel_id,
                room_id: room.id,
                guest_name: request.guest_name.trim().to_string(),
                guest_email: request.guest_email.trim().to_lowercase(),
                guest_phone: request.guest_phone,
                stay,
                guests: request.guests,
                total_amount,
                status: request.status.unwrap_or(ReservationStatus::Pending),
                special_requests: request.special_requests,
            })
            .await?;

        log_reservation_action(reservation.id, "create", ctx.user_id, Some(reservation.status.as_str()));
        Ok(reservation)
    }

    /// Partial update. Dates are checked against the merged values and a new
    /// stay is re-priced unless an explicit amount is given.
    pub async fn update(&self, ctx: &AuthContext, id: i64, mut request: UpdateReservationRequest) -> Result<Reservation> {
        request.validate()?;
        let current = self.find(ctx, id).await?.reservation;

        let stay = DateRange::new(
            request.check_in.unwrap_or(current.check_in),
            request.check_out.unwrap_or(current.check_out),
        );
        ensure_valid_stay(stay)?;

        let dates_changed = stay != current.stay();
        if request.guests.is_some() || (dates_changed && request.total_amount.is_none()) {
            let room = self.find_room(ctx, current.room_id).await?;
            if let Some(guests) = request.guests {
                ensure_capacity(&room, guests)?;
            }
            if dates_changed && request.total_amount.is_none() {
                request.total_amount = Some(quote_total(stay, room.price_per_night));
                debug!(reservation_id = id, nights = stay.nights(), "Stay re-priced");
            }
        }

        let reservation = self.db.reservations
            .update(id, request)
            .await?
            .ok_or(HotelConsoleError::ReservationNotFound { reservation_id: id })?;

        log_reservation_action(id, "update", ctx.user_id, None);
        Ok(reservation)
    }

    pub async fn update_status(&self, ctx: &AuthContext, id: i64, status: ReservationStatus) -> Result<Reservation> {
        self.find(ctx, id).await?;

        let reservation = self.db.reservations
            .update_status(id, status)
            .await?
            .ok_or(HotelConsoleError::ReservationNotFound { reservation_id: id })?;

        log_reservation_action(id, "set_status", ctx.user_id, Some(status.as_str()));
        Ok(reservation)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: i64) -> Result<()> {
        ctx.require_admin()?;

        if !self.db.reservations.delete(id).await? {
            return Err(HotelConsoleError::ReservationNotFound { reservation_id: id });
        }

        log_reservation_action(id, "delete", ctx.user_id, None);
        Ok(())
    }

    pub async fn list_notes(&self, ctx: &AuthContext, reservation_id: i64) -> Result<Vec<ReservationNote>> {
        self.find(ctx, reservation_id).await?;
        self.db.notes.list_for_reservation(reservation_id).await
    }

    /// Add a staff note authored by the caller
    pub async fn add_note(&self, ctx: &AuthContext, reservation_id: i64, request: CreateNoteRequest) -> Result<ReservationNote> {
        request.validate()?;
        if request.body.trim().is_empty() {
            return Err(HotelConsoleError::InvalidInput("note must not be blank".to_string()));
        }
        self.find(ctx, reservation_id).await?;

        let note = self.db.notes.create(reservation_id, ctx.user_id, &request.body).await?;
        log_reservation_action(reservation_id, "add_note", ctx.user_id, None);
        Ok(note)
    }

    pub async fn list_payments(&self, ctx: &AuthContext, reservation_id: i64) -> Result<Vec<Payment>> {
        self.find(ctx, reservation_id).await?;
        self.db.payments.list_for_reservation(reservation_id).await
    }

    pub async fn record_payment(&self, ctx: &AuthContext, reservation_id: i64, request: RecordPaymentRequest) -> Result<Payment> {
        request.validate()?;
        self.find(ctx, reservation_id).await?;

        let payment = self.db.payments.create(reservation_id, request).await?;
        info!(
            reservation_id,
            payment_id = payment.id,
            amount = payment.amount,
            status = %payment.status,
            "Payment recorded"
        );
        Ok(payment)
    }

    pub async fn update_payment_status(&self, ctx: &AuthContext, payment_id: i64, status: PaymentStatus) -> Result<Payment> {
        self.db.payments
            .find_by_id(payment_id, ctx.owner_scope())
            .await?
            .ok_or(HotelConsoleError::PaymentNotFound { payment_id })?;

        let payment = self.db.payments
            .update_status(payment_id, status)
            .await?
            .ok_or(HotelConsoleError::PaymentNotFound { payment_id })?;

        log_reservation_action(payment.reservation_id, "set_payment_status", ctx.user_id, Some(status.as_str()));
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn room(capacity: i32) -> Room {
        Room {
            id: 3,
            hotel_id: 1,
            room_number: "101".to_string(),
            room_type: "double".to_string(),
            capacity,
            price_per_night: 89.9,
            status: "available".to_string(),
            image_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_quote_total_multiplies_nights() {
        let stay = DateRange::new(date(2024, 7, 1), date(2024, 7, 4));
        assert_eq!(quote_total(stay, 89.9), 269.7);
    }

    #[test]
    fn test_quote_total_for_inverted_stay_is_zero() {
        let stay = DateRange::new(date(2024, 7, 4), date(2024, 7, 1));
        assert_eq!(quote_total(stay, 120.0), 0.0);
    }

    #[test]
    fn test_same_day_stay_rejected() {
        let stay = DateRange::new(date(2024, 7, 1), date(2024, 7, 1));
        assert!(matches!(ensure_valid_stay(stay), Err(HotelConsoleError::InvalidInput(_))));
    }

    #[test]
    fn test_capacity_check() {
        assert!(ensure_capacity(&room(2), 2).is_ok());
        assert!(matches!(ensure_capacity(&room(2), 3), Err(HotelConsoleError::InvalidInput(_))));
    }
}
