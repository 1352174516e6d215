//! Structural checks applied to request inputs.
//!
//! All validators are pure. Request assembly runs them in order and stops
//! at the first failure, so nothing is sent for a rejected request.

use super::error::ValidationError;

/// Maximum channel name length (characters)
pub const MAX_CHANNEL_NAME_LENGTH: usize = 200;

/// Maximum event name length (characters)
pub const MAX_EVENT_NAME_LENGTH: usize = 200;

/// Maximum serialized event payload (10 KiB)
pub const MAX_DATA_LENGTH: usize = 10 * 1024;

/// Maximum channels targeted by one trigger
pub const MAX_CHANNELS_PER_TRIGGER: usize = 100;

fn is_channel_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '=' | '@' | ',' | '.' | ';')
}

/// Validate a channel name.
pub fn validate_channel(name: &str) -> Result<(), ValidationError> {
    let length = name.chars().count();
    if length > MAX_CHANNEL_NAME_LENGTH {
        return Err(ValidationError::ChannelNameTooLong {
            length,
            max: MAX_CHANNEL_NAME_LENGTH,
        });
    }

    if name.is_empty() || !name.chars().all(is_channel_char) {
        return Err(ValidationError::InvalidChannelName(name.to_string()));
    }

    Ok(())
}

/// Validate an event name.
pub fn validate_event_name(name: &str) -> Result<(), ValidationError> {
    let length = name.chars().count();
    if length > MAX_EVENT_NAME_LENGTH {
        return Err(ValidationError::EventNameTooLong {
            length,
            max: MAX_EVENT_NAME_LENGTH,
        });
    }
    Ok(())
}

/// Validate the serialized event payload. Measured in bytes.
pub fn validate_data_length(serialized: &str) -> Result<(), ValidationError> {
    if serialized.len() > MAX_DATA_LENGTH {
        return Err(ValidationError::PayloadTooLarge {
            size: serialized.len(),
            max: MAX_DATA_LENGTH,
        });
    }
    Ok(())
}

/// Validate the number of channels in a trigger. Zero channels is also rejected.
pub fn validate_channel_count<S: AsRef<str>>(channels: &[S]) -> Result<(), ValidationError> {
    let count = channels.len();
    if count == 0 || count > MAX_CHANNELS_PER_TRIGGER {
        return Err(ValidationError::TooManyChannels {
            count,
            max: MAX_CHANNELS_PER_TRIGGER,
        });
    }
    Ok(())
}

/// Validate a socket id (`<digits>.<digits>`).
pub fn validate_socket_id(socket_id: &str) -> Result<(), ValidationError> {
    let valid = match socket_id.split_once('.') {
        Some((left, right)) => {
            !left.is_empty()
                && !right.is_empty()
                && left.bytes().all(|b| b.is_ascii_digit())
                && right.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidSocketId(socket_id.to_string()));
    }
    Ok(())
}

/// A deferred validation step, bound to its input.
pub type Validator<'a> = Box<dyn Fn() -> Result<(), ValidationError> + 'a>;

/// Run validators in order, returning the first failure.
pub fn run_validators(validators: &[Validator<'_>]) -> Result<(), ValidationError> {
    validators.iter().try_for_each(|validate| validate())
}
