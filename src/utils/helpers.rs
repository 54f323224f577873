//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use serde_json::Value;

/// Pull a human readable message out of an upstream error body.
///
/// The hosted services answer with `msg`, `message`, `error_description` or
/// `error` depending on the endpoint; anything else is returned as text.
pub fn upstream_error_message(body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(Value::String(message)) = fields.get(key) {
                if !message.trim().is_empty() {
                    return message.trim().to_string();
                }
            }
        }
    }

    let text = body.trim();
    if text.is_empty() {
        "no error details returned".to_string()
    } else {
        text.chars().take(500).collect()
    }
}

/// Build an `ILIKE` pattern matching `search` anywhere, with wildcards in the
/// user's text escaped. Returns `None` for blank input.
pub fn ilike_pattern(search: &str) -> Option<String> {
    let trimmed = normalize_whitespace(search);
    if trimmed.is_empty() {
        return None;
    }

    let escaped = trimmed
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_");

    Some(format!("%{}%", escaped))
}

/// Sanitize filename for safe storage
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(filename);

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();

    let sanitized = sanitized.trim_start_matches('.').to_string();
    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

/// Generate a random alphanumeric string
pub fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                            abcdefghijklmnopqrstuvwxyz\
                            0123456789";
    let mut rng = rand::thread_rng();

    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Normalize whitespace in text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Percentage of `part` in `whole`, rounded to one decimal place
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        return 0.0;
    }
    round_to(part as f64 * 100.0 / whole as f64, 1)
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ilike_pattern_escapes_wildcards() {
        assert_eq!(ilike_pattern("  anna  smith "), Some("%anna smith%".to_string()));
        assert_eq!(ilike_pattern("50%_off"), Some(r"%50\%\_off%".to_string()));
        assert_eq!(ilike_pattern("   "), None);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Lobby Photo (1).JPG"), "lobby_photo__1_.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..."), "upload");
    }

    #[test]
    fn test_generate_random_string() {
        let value = generate_random_string(16);
        assert_eq!(value.len(), 16);
        assert!(value.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_upstream_error_message() {
        assert_eq!(upstream_error_message(r#"{"msg":"User already registered"}"#), "User already registered");
        assert_eq!(upstream_error_message(r#"{"code":400,"message":"Bucket not found"}"#), "Bucket not found");
        assert_eq!(upstream_error_message(r#"{"error":"invalid_grant"}"#), "invalid_grant");
        assert_eq!(upstream_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(upstream_error_message(""), "no error details returned");
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(1, 3), 33.3);
        assert_eq!(percentage(2, 3), 66.7);
        assert_eq!(percentage(5, 5), 100.0);
    }
}
