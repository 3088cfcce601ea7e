//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::capture::CaptureMode;
use crate::domain::config::{AppConfig, LinuxConfig};
use crate::domain::error::ConfigError;
use crate::domain::recording::Duration;
use crate::domain::transcode::{is_valid_preset, MAX_CRF, VALID_PRESETS};

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
    ensure_known_key(key)?;

    let mut config = store.load().await?;
    set_value(&mut config, key, value)?;
    store.save(&config).await?;

    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    match get_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = get_value(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    let resolutions = config
        .resolutions
        .as_ref()
        .map(|list| list.join(", "))
        .unwrap_or_else(|| NOT_SET.to_string());
    presenter.key_value("resolutions", &resolutions);

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        });
    }
    Ok(())
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: message.into(),
    }
}

/// Validate `value` for `key` and store it in `config`
fn set_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "mode" => {
            let mode = parse_u32(key, value)?;
            let max = CaptureMode::ALL.len() as u32;
            if !(1..=max).contains(&mode) {
                return Err(invalid(key, format!("Value must be between 1 and {}", max)));
            }
            config.mode = Some(mode);
        }
        "resolution" => {
            let resolution = parse_u32(key, value)?;
            let max = config.catalog().resolution_count();
            if !(1..=max).contains(&resolution) {
                return Err(invalid(key, format!("Value must be between 1 and {}", max)));
            }
            config.resolution = Some(resolution);
        }
        "duration" | "stall_timeout" => {
            let parsed = value
                .parse::<Duration>()
                .map_err(|e| invalid(key, e.to_string()))?;
            if key == "duration" {
                config.duration = Some(parsed.to_string());
            } else {
                config.stall_timeout = Some(parsed.to_string());
            }
        }
        "frame_rate" => {
            let rate = parse_u32(key, value)?;
            if rate == 0 {
                return Err(invalid(key, "Value must be greater than zero"));
            }
            config.frame_rate = Some(rate);
        }
        "audio_bitrate" => {
            let bitrate = parse_u32(key, value)?;
            if bitrate == 0 {
                return Err(invalid(key, "Value must be greater than zero"));
            }
            config.audio_bitrate = Some(bitrate);
        }
        "output_dir" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Value must not be empty"));
            }
            config.output_dir = Some(value.to_string());
        }
        "preset" => {
            let preset = value.to_lowercase();
            if !is_valid_preset(&preset) {
                return Err(invalid(
                    key,
                    format!("Invalid value '{}'. Valid: {}", value, VALID_PRESETS.join(", ")),
                ));
            }
            config.preset = Some(preset);
        }
        "crf" => {
            let crf = value
                .parse::<u8>()
                .ok()
                .filter(|crf| *crf <= MAX_CRF)
                .ok_or_else(|| invalid(key, format!("Value must be between 0 and {}", MAX_CRF)))?;
            config.crf = Some(crf);
        }
        "progress" => {
            config.progress = Some(parse_bool(value).ok_or_else(|| {
                invalid(key, "Value must be 'true' or 'false'")
            })?);
        }
        "linux.display" | "linux.camera_device" | "linux.audio_source" => {
            if value.trim().is_empty() {
                return Err(invalid(key, "Value must not be empty"));
            }
            let linux = config.linux.get_or_insert_with(LinuxConfig::default);
            let slot = match key {
                "linux.display" => &mut linux.display,
                "linux.camera_device" => &mut linux.camera_device,
                _ => &mut linux.audio_source,
            };
            *slot = Some(value.to_string());
        }
        _ => return Err(invalid(key, "Key cannot be set from the command line")),
    }
    Ok(())
}

/// Current value of `key`, if set
fn get_value(config: &AppConfig, key: &str) -> Option<String> {
    let linux = config.linux.as_ref();
    match key {
        "mode" => config.mode.map(|v| v.to_string()),
        "resolution" => config.resolution.map(|v| v.to_string()),
        "duration" => config.duration.clone(),
        "frame_rate" => config.frame_rate.map(|v| v.to_string()),
        "audio_bitrate" => config.audio_bitrate.map(|v| v.to_string()),
        "output_dir" => config.output_dir.clone(),
        "preset" => config.preset.clone(),
        "crf" => config.crf.map(|v| v.to_string()),
        "stall_timeout" => config.stall_timeout.clone(),
        "progress" => config.progress.map(|v| v.to_string()),
        "linux.display" => linux.and_then(|l| l.display.clone()),
        "linux.camera_device" => linux.and_then(|l| l.camera_device.clone()),
        "linux.audio_source" => linux.and_then(|l| l.audio_source.clone()),
        _ => None,
    }
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(key, "Value must be a whole number"))
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(key: &str, value: &str) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::empty();
        set_value(&mut config, key, value)?;
        Ok(config)
    }

    #[test]
    fn parse_bool_values() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("NO"), Some(false));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn mode_must_be_a_catalog_key() {
        assert_eq!(set("mode", "4").unwrap().mode, Some(4));
        assert!(set("mode", "0").is_err());
        assert!(set("mode", "5").is_err());
        assert!(set("mode", "screen").is_err());
    }

    #[test]
    fn resolution_respects_configured_catalog() {
        assert_eq!(set("resolution", "5").unwrap().resolution, Some(5));
        assert!(set("resolution", "6").is_err());

        let mut config = AppConfig {
            resolutions: Some(vec!["800x600".to_string()]),
            ..Default::default()
        };
        assert!(set_value(&mut config, "resolution", "2").is_err());
        assert!(set_value(&mut config, "resolution", "1").is_ok());
    }

    #[test]
    fn durations_are_normalised() {
        assert_eq!(set("duration", "90s").unwrap().duration.as_deref(), Some("1m30s"));
        assert_eq!(set("stall_timeout", "45s").unwrap().stall_timeout.as_deref(), Some("45s"));
        assert!(set("duration", "forever").is_err());
    }

    #[test]
    fn crf_and_preset_bounds() {
        assert_eq!(set("crf", "51").unwrap().crf, Some(51));
        assert!(set("crf", "52").is_err());
        assert_eq!(set("preset", "VeryFast").unwrap().preset.as_deref(), Some("veryfast"));
        assert!(set("preset", "instant").is_err());
    }

    #[test]
    fn zero_rates_are_rejected() {
        assert!(set("frame_rate", "0").is_err());
        assert!(set("audio_bitrate", "0").is_err());
        assert_eq!(set("frame_rate", "24").unwrap().frame_rate, Some(24));
    }

    #[test]
    fn linux_keys_create_section() {
        let config = set("linux.camera_device", "/dev/video2").unwrap();
        assert_eq!(config.camera_device_or_default(), "/dev/video2");
        assert_eq!(get_value(&config, "linux.camera_device").as_deref(), Some("/dev/video2"));
        assert_eq!(get_value(&config, "linux.display"), None);
    }

    #[test]
    fn every_settable_key_reads_back() {
        let mut config = AppConfig::empty();
        let values = [
            ("mode", "1"),
            ("resolution", "2"),
            ("duration", "10s"),
            ("frame_rate", "25"),
            ("audio_bitrate", "96000"),
            ("output_dir", "/tmp/clips"),
            ("preset", "fast"),
            ("crf", "20"),
            ("stall_timeout", "1m"),
            ("progress", "false"),
            ("linux.display", ":1"),
            ("linux.camera_device", "/dev/video1"),
            ("linux.audio_source", "mic"),
        ];
        assert_eq!(values.len(), VALID_CONFIG_KEYS.len());

        for (key, value) in values {
            set_value(&mut config, key, value).unwrap();
            assert_eq!(get_value(&config, key).as_deref(), Some(value), "key {}", key);
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(ensure_known_key("api_key").is_err());
        assert!(ensure_known_key("crf").is_ok());
    }
}
