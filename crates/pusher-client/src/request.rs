//! Request assembly and REST request signing.
//!
//! Each API operation turns its inputs into a [`RequestDescriptor`] after
//! running its validators. The descriptor is then signed into an
//! [`HttpRequest`] carrying `auth_key`, `auth_timestamp`, `auth_version`,
//! `body_md5` (POST only) and `auth_signature`.
//!
//! Signature input:
//!
//! ```text
//! <METHOD>\n<path>\n<k1=v1&k2=v2...>   (keys sorted, values unescaped)
//! ```

use std::collections::BTreeMap;

use serde_json::{json, Value};

use crate::crypto;
use crate::domain::config::PusherConfig;
use crate::domain::error::ValidationError;
use crate::domain::validation::{
    run_validators, validate_channel, validate_channel_count, validate_data_length,
    validate_event_name, validate_socket_id, Validator,
};
use crate::ports::{HttpMethod, HttpRequest};

/// Version of the REST auth scheme
pub const AUTH_VERSION: &str = "1.0";

/// Unsigned request: verb, path, query parameters and optional body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    /// Path starting with `/apps/<app_id>`
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub body: Option<String>,
}

impl RequestDescriptor {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            query: BTreeMap::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            query: BTreeMap::new(),
            body: Some(body.into()),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Sign the request with the app credentials at `timestamp` (unix seconds).
    pub fn sign(self, config: &PusherConfig, timestamp: u64) -> HttpRequest {
        let mut params = self.query;
        params.insert("auth_key".into(), config.key.clone());
        params.insert("auth_timestamp".into(), timestamp.to_string());
        params.insert("auth_version".into(), AUTH_VERSION.into());
        if let Some(body) = &self.body {
            params.insert("body_md5".into(), crypto::body_md5(body));
        }

        let to_sign = string_to_sign(self.method, &self.path, &params);
        let signature = crypto::sign(&config.secret, &to_sign);

        let mut query: Vec<(String, String)> = params.into_iter().collect();
        query.push(("auth_signature".into(), signature));

        HttpRequest {
            method: self.method,
            url: format!("{}{}", config.base_url(), self.path),
            query,
            body: self.body,
        }
    }
}

/// Canonical signature input for a request.
pub fn string_to_sign(method: HttpMethod, path: &str, params: &BTreeMap<String, String>) -> String {
    let query = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}\n{}\n{}", method, path, query)
}

/// Encode event data for the wire. Strings pass through, anything else is
/// JSON-encoded once.
pub fn encode_event_data(data: &Value) -> String {
    match data {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn join_attributes<S: AsRef<str>>(attributes: &[S]) -> Option<String> {
    if attributes.is_empty() {
        return None;
    }
    Some(
        attributes
            .iter()
            .map(|a| a.as_ref())
            .collect::<Vec<&str>>()
            .join(","),
    )
}

/// `POST /apps/<id>/events`
pub fn trigger<S: AsRef<str>>(
    app_id: &str,
    channels: &[S],
    event_name: &str,
    data: &Value,
    socket_id: Option<&str>,
) -> Result<RequestDescriptor, ValidationError> {
    let encoded = encode_event_data(data);

    let mut validators: Vec<Validator<'_>> = vec![Box::new(|| validate_channel_count(channels))];
    for channel in channels {
        validators.push(Box::new(move || validate_channel(channel.as_ref())));
    }
    validators.push(Box::new(|| validate_event_name(event_name)));
    validators.push(Box::new(|| validate_data_length(&encoded)));
    if let Some(id) = socket_id {
        validators.push(Box::new(move || validate_socket_id(id)));
    }
    run_validators(&validators)?;

    let channel_names: Vec<&str> = channels.iter().map(|c| c.as_ref()).collect();
    let mut body = json!({
        "name": event_name,
        "channels": channel_names,
        "data": encoded,
    });
    if let Some(id) = socket_id {
        body["socket_id"] = Value::String(id.to_string());
    }

    Ok(RequestDescriptor::post(
        format!("/apps/{app_id}/events"),
        body.to_string(),
    ))
}

/// `GET /apps/<id>/channels`
pub fn channels_info<S: AsRef<str>>(
    app_id: &str,
    prefix_filter: Option<&str>,
    attributes: &[S],
) -> Result<RequestDescriptor, ValidationError> {
    let mut request = RequestDescriptor::get(format!("/apps/{app_id}/channels"));
    if let Some(prefix) = prefix_filter {
        request = request.with_param("filter_by_prefix", prefix);
    }
    if let Some(info) = join_attributes(attributes) {
        request = request.with_param("info", info);
    }
    Ok(request)
}

/// `GET /apps/<id>/channels/<channel>`
pub fn channel_info<S: AsRef<str>>(
    app_id: &str,
    channel: &str,
    attributes: &[S],
) -> Result<RequestDescriptor, ValidationError> {
    validate_channel(channel)?;

    let mut request = RequestDescriptor::get(format!("/apps/{app_id}/channels/{channel}"));
    if let Some(info) = join_attributes(attributes) {
        request = request.with_param("info", info);
    }
    Ok(request)
}

/// `GET /apps/<id>/channels/<channel>/users`
pub fn users_info(app_id: &str, channel: &str) -> Result<RequestDescriptor, ValidationError> {
    validate_channel(channel)?;
    Ok(RequestDescriptor::get(format!(
        "/apps/{app_id}/channels/{channel}/users"
    )))
}
