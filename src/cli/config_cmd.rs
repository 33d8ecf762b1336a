//! Config command handler

use serde_json::{Map, Value};

use crate::application::ports::ConfigStore;
use crate::domain::capture::{Device, FlashMode};
use crate::domain::config::RecorderConfig;
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let parsed = parse_config_value(key, value)?;

    let config = store.load().await?;
    let updated = set_value(&config, key, parsed)?;

    store.save(&updated).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    match get_value(&config, key)? {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = get_value(&config, key)?;
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }
    Ok(())
}

/// Location of a key inside the serialized config document.
///
/// `max_duration`, `device` and `output_dir` live at the top level, every
/// other key under `[capture]` with dots as table separators.
fn key_path(key: &str) -> Vec<&str> {
    match key {
        "max_duration" | "device" | "output_dir" => vec![key],
        _ => std::iter::once("capture").chain(key.split('.')).collect(),
    }
}

fn get_value(config: &RecorderConfig, key: &str) -> Result<Option<String>, ConfigError> {
    let document =
        serde_json::to_value(config).map_err(|e| ConfigError::ParseError(e.to_string()))?;

    let mut current = &document;
    for part in key_path(key) {
        match current.get(part) {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }

    Ok(match current {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}

fn set_value(config: &RecorderConfig, key: &str, value: Value) -> Result<RecorderConfig, ConfigError> {
    let mut document =
        serde_json::to_value(config).map_err(|e| ConfigError::WriteError(e.to_string()))?;

    let path = key_path(key);
    let (leaf, tables) = match path.split_last() {
        Some(split) => split,
        None => return Ok(config.clone()),
    };

    let mut current = &mut document;
    for table in tables {
        let object = as_object(current, key)?;
        current = object
            .entry(table.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    as_object(current, key)?.insert(leaf.to_string(), value);

    serde_json::from_value(document).map_err(|e| ConfigError::ValidationError {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn as_object<'a>(value: &'a mut Value, key: &str) -> Result<&'a mut Map<String, Value>, ConfigError> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    value
        .as_object_mut()
        .ok_or_else(|| ConfigError::ValidationError {
            key: key.to_string(),
            message: "Config file has a non-table value on this path".to_string(),
        })
}

/// Validate a config value and convert it to its stored form
fn parse_config_value(key: &str, value: &str) -> Result<Value, ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "max_duration" => {
            let duration: Duration = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            Ok(Value::String(duration.to_string()))
        }
        "device" => {
            let device: Device = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            Ok(Value::String(device.to_string()))
        }
        "flash_mode" => {
            let mode: FlashMode = value.parse().map_err(|e| invalid(format!("{}", e)))?;
            Ok(Value::String(mode.to_string()))
        }
        "auto_set_orientation" | "video.enabled" | "audio.enabled" => parse_bool(value)
            .map(Value::Bool)
            .map_err(|_| invalid("Value must be 'true' or 'false'".to_string())),
        "video.bitrate" | "audio.bitrate" => match value.parse::<u32>() {
            Ok(bps) if bps > 0 => Ok(Value::from(bps)),
            _ => Err(invalid("Value must be a positive number of bits per second".to_string())),
        },
        "audio.channels" => match value.parse::<u16>() {
            Ok(channels) if channels > 0 => Ok(Value::from(channels)),
            _ => Err(invalid("Value must be a positive channel count".to_string())),
        },
        "video.timescale" => match value.parse::<f64>() {
            Ok(scale) if scale.is_finite() && scale > 0.0 => Ok(Value::from(scale)),
            _ => Err(invalid("Value must be a number greater than 0".to_string())),
        },
        "video.quality" | "audio.quality" => parse_quality(value)
            .map(|q| Value::String(q.to_string()))
            .ok_or_else(|| invalid(format!("Invalid value '{}'. Valid: highest, medium, low", value))),
        "video.format" | "audio.format" | "output_dir" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
            Ok(Value::String(value.to_string()))
        }
        _ => Ok(Value::String(value.to_string())),
    }
}

/// Accept short or full preset names
fn parse_quality(value: &str) -> Option<&'static str> {
    match value.to_lowercase().as_str() {
        "highest" | "highestquality" => Some("HighestQuality"),
        "medium" | "mediumquality" => Some("MediumQuality"),
        "low" | "lowquality" => Some("LowQuality"),
        _ => None,
    }
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Result<bool, ()> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Ok(true),
        "false" | "no" | "0" => Ok(false),
        _ => Err(()),
    }
}
