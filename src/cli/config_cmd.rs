//! Config command handler

use url::Url;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::upload::{Language, ProcessingMode};

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
    let normalized = validate_config_value(key, value)?;

    let mut config = store.load().await?;
    apply(&mut config, key, normalized.clone())?;

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, normalized));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;

    let config = store.load().await?;
    presenter.output(lookup(&config, key).as_deref().unwrap_or(NOT_SET));

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        presenter.key_value(key, lookup(&config, key).as_deref().unwrap_or(NOT_SET));
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

fn lookup(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "server_url" => config.server_url.clone(),
        "mode" => config.mode.clone(),
        "language" => config.language.clone(),
        "output_dir" => config.output_dir.clone(),
        "timeout_secs" => config.timeout_secs.map(|t| t.to_string()),
        _ => None,
    }
}

fn apply(config: &mut AppConfig, key: &str, value: String) -> Result<(), ConfigError> {
    match key {
        "server_url" => config.server_url = Some(value),
        "mode" => config.mode = Some(value),
        "language" => config.language = Some(value),
        "output_dir" => config.output_dir = Some(value),
        "timeout_secs" => config.timeout_secs = Some(parse_timeout(key, &value)?),
        _ => return check_key(key),
    }
    Ok(())
}

/// Validate a config value and return its canonical form
fn validate_config_value(key: &str, value: &str) -> Result<String, ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "server_url" => {
            let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(invalid("URL must use http or https".to_string()));
            }
            Ok(value.to_string())
        }
        "mode" => value
            .parse::<ProcessingMode>()
            .map(|m| m.to_string())
            .map_err(|e| invalid(e.to_string())),
        "language" => value
            .parse::<Language>()
            .map(|l| l.to_string())
            .map_err(|e| invalid(e.to_string())),
        "timeout_secs" => parse_timeout(key, value).map(|t| t.to_string()),
        "output_dir" if value.trim().is_empty() => {
            Err(invalid("Directory must not be empty".to_string()))
        }
        _ => Ok(value.to_string()),
    }
}

fn parse_timeout(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must be a positive number of seconds".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::XdgConfigStore;

    #[test]
    fn validate_server_url() {
        assert!(validate_config_value("server_url", "https://polish.example.com").is_ok());
        assert!(validate_config_value("server_url", "ftp://example.com").is_err());
        assert!(validate_config_value("server_url", "not a url").is_err());
    }

    #[test]
    fn validate_mode_normalizes() {
        assert_eq!(validate_config_value("mode", "mic").unwrap(), "external");
        assert_eq!(validate_config_value("mode", "LAPTOP_CELULAR").unwrap(), "laptop");
        assert!(validate_config_value("mode", "studio").is_err());
    }

    #[test]
    fn validate_language() {
        assert_eq!(validate_config_value("language", "en-US").unwrap(), "en");
        assert!(validate_config_value("language", "fr").is_err());
    }

    #[test]
    fn validate_timeout() {
        assert_eq!(validate_config_value("timeout_secs", "60").unwrap(), "60");
        assert!(validate_config_value("timeout_secs", "0").is_err());
        assert!(validate_config_value("timeout_secs", "soon").is_err());
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(matches!(
            check_key("api_key"),
            Err(ConfigError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = XdgConfigStore::with_path(dir.path().join("config.toml"));
        let presenter = Presenter::new();

        handle_set(&store, &presenter, "mode", "mic").await.unwrap();
        handle_set(&store, &presenter, "timeout_secs", "45").await.unwrap();

        let config = store.load().await.unwrap();
        assert_eq!(config.mode.as_deref(), Some("external"));
        assert_eq!(config.timeout_secs, Some(45));
        assert_eq!(lookup(&config, "language"), None);
    }
}
