//! Webhook authentication.
//!
//! A webhook is accepted only if it carries our app key, its body is signed
//! with our secret, and its `time_ms` is within [`MAX_WEBHOOK_AGE_MS`] of
//! the local clock. Every failure collapses to `None`; the reason is only
//! logged at debug level.

use serde_json::Value;
use tracing::debug;

use crate::crypto;
use crate::domain::config::PusherConfig;
use crate::domain::types::ResponseMap;
use crate::ports::TimeSource;

/// Maximum distance between `time_ms` and the local clock (5 minutes)
pub const MAX_WEBHOOK_AGE_MS: u64 = 300_000;

/// Validate a webhook and return its parsed body.
///
/// `key` and `signature` come from the `X-Pusher-Key` and
/// `X-Pusher-Signature` headers; `body` is the raw request body.
pub fn validate_webhook(
    config: &PusherConfig,
    clock: &dyn TimeSource,
    key: &str,
    signature: &str,
    body: &str,
) -> Option<ResponseMap> {
    if !crypto::constant_time_compare(key, &config.key) {
        debug!("Webhook rejected: unknown key");
        return None;
    }

    if !crypto::verify(&config.secret, body, signature) {
        debug!("Webhook rejected: bad signature");
        return None;
    }

    let parsed = match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            debug!("Webhook rejected: body is not a JSON object");
            return None;
        }
        Err(e) => {
            debug!(error = %e, "Webhook rejected: malformed JSON");
            return None;
        }
    };

    let Some(time_ms) = parsed.get("time_ms").and_then(Value::as_u64) else {
        debug!("Webhook rejected: time_ms missing or not an integer");
        return None;
    };

    let now_ms = clock.now_millis();
    let age_ms = now_ms.abs_diff(time_ms);
    if age_ms > MAX_WEBHOOK_AGE_MS {
        debug!(time_ms, now_ms, "Webhook rejected: stale timestamp");
        return None;
    }

    Some(parsed)
}
