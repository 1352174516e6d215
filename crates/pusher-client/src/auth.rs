//! Private and presence channel authentication tokens.
//!
//! The browser client posts `socket_id` and `channel_name` to the app
//! server, which answers with the JSON produced here. For presence
//! channels the member data is signed together with the socket and
//! channel, and returned verbatim as `channel_data`.

use serde_json::{json, Value};
use tracing::debug;

use crate::crypto;
use crate::domain::config::PusherConfig;

/// Build the string that is signed for a channel subscription.
///
/// `channel_data` must be the exact JSON text that is returned to the
/// client, otherwise the signature will not verify on the other side.
pub fn string_to_sign(socket_id: &str, channel: &str, channel_data: Option<&str>) -> String {
    match channel_data {
        Some(data) => format!("{socket_id}:{channel}:{data}"),
        None => format!("{socket_id}:{channel}"),
    }
}

/// Produce the JSON auth response for `socket_id` subscribing to `channel`.
///
/// Returns `{"auth":"<key>:<signature>"}`, plus `"channel_data"` when
/// `custom_data` is supplied. Inputs are not validated here.
pub fn authenticate(
    config: &PusherConfig,
    channel: &str,
    socket_id: &str,
    custom_data: Option<&Value>,
) -> String {
    // Encoded once; the same text is signed and returned.
    let channel_data = custom_data.map(Value::to_string);

    let to_sign = string_to_sign(socket_id, channel, channel_data.as_deref());
    let signature = crypto::sign(&config.secret, &to_sign);

    debug!(
        channel,
        socket_id,
        presence = channel_data.is_some(),
        "Signed channel subscription"
    );

    let mut response = json!({ "auth": format!("{}:{}", config.key, signature) });
    if let Some(data) = channel_data {
        response["channel_data"] = Value::String(data);
    }
    response.to_string()
}
