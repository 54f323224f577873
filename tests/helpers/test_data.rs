//! Test data helpers
//!
//! Settings, access tokens and request bodies for the integration tests.

use chrono::{NaiveDate, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use uuid::Uuid;
use HotelConsole::config::Settings;

use super::mock_servers::{TEST_BUCKET, TEST_SERVICE_KEY};

pub const TEST_JWT_SECRET: &str = "integration-test-signing-secret-0123456789";
pub const TEST_AUDIENCE: &str = "authenticated";

/// Settings pointing at the given database and mock servers
pub fn test_settings(database_url: &str, auth_api_url: &str, storage_api_url: &str) -> Settings {
    let mut settings = Settings::default();
    settings.database.url = database_url.to_string();
    settings.auth.jwt_secret = TEST_JWT_SECRET.to_string();
    settings.auth.jwt_audience = TEST_AUDIENCE.to_string();
    settings.auth.api_url = auth_api_url.to_string();
    settings.auth.service_key = TEST_SERVICE_KEY.to_string();
    settings.auth.timeout_seconds = 5;
    settings.storage.api_url = storage_api_url.to_string();
    settings.storage.bucket = TEST_BUCKET.to_string();
    settings.storage.service_key = TEST_SERVICE_KEY.to_string();
    settings.storage.timeout_seconds = 5;
    settings.features.summary_cache = false;
    settings.features.rate_limit = false;
    settings
}

/// Access token for `user_id` valid for `ttl_seconds` (negative for expired)
pub fn token_with_secret(user_id: Uuid, secret: &str, ttl_seconds: i64) -> String {
    let claims = json!({
        "sub": user_id,
        "email": format!("{}@example.com", user_id.simple()),
        "aud": TEST_AUDIENCE,
        "role": "authenticated",
        "exp": Utc::now().timestamp() + ttl_seconds,
    });

    encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
        .expect("failed to sign test token")
}

/// Valid access token for `user_id`
pub fn access_token(user_id: Uuid) -> String {
    token_with_secret(user_id, TEST_JWT_SECRET, 3600)
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn hotel_body(name: &str, city: &str) -> Value {
    json!({
        "name": name,
        "city": city,
        "country": "Portugal",
        "star_rating": 4,
    })
}

pub fn room_body(room_number: &str, capacity: i32, price_per_night: f64) -> Value {
    json!({
        "room_number": room_number,
        "room_type": "double",
        "capacity": capacity,
        "price_per_night": price_per_night,
    })
}

/// Reservation for a generated guest
pub fn reservation_body(room_id: i64, check_in: NaiveDate, check_out: NaiveDate) -> Value {
    let guest_name: String = Name().fake();
    let guest_email: String = SafeEmail().fake();

    json!({
        "room_id": room_id,
        "guest_name": guest_name,
        "guest_email": guest_email,
        "check_in": check_in,
        "check_out": check_out,
        "guests": 2,
    })
}
