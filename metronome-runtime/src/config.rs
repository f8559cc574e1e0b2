use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};

use crate::error::TimerError;
use crate::time_unit::parse_duration;

/// Load configuration from a TOML file, with `APP_`-prefixed environment
/// variables layered on top.
pub fn load_toml_config<P: AsRef<Path>>(path: P) -> Result<Config, TimerError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Toml))
        .add_source(Environment::with_prefix("APP").separator("_"))
        .build()?;
    Ok(config)
}

/// Load configuration from a YAML file, with `APP_`-prefixed environment
/// variables layered on top.
pub fn load_yaml_config<P: AsRef<Path>>(path: P) -> Result<Config, TimerError> {
    let config = Config::builder()
        .add_source(File::from(path.as_ref()).format(FileFormat::Yaml))
        .add_source(Environment::with_prefix("APP").separator("_"))
        .build()?;
    Ok(config)
}

/// Resolve a `${key}` or `${key:default}` placeholder against the loaded
/// configuration. Plain values pass through unchanged.
pub fn resolve_value(value: &str, config: &Config) -> Result<String, TimerError> {
    let Some(inner) = value
        .strip_prefix("${")
        .and_then(|inner| inner.strip_suffix('}'))
    else {
        return Ok(value.to_string());
    };

    match inner.split_once(':') {
        Some((key, default)) => Ok(config
            .get_string(key)
            .unwrap_or_else(|_| default.to_string())),
        None => Ok(config.get_string(inner)?),
    }
}

/// Resolve a placeholder and parse the result as a duration expression.
pub fn resolve_duration(value: &str, config: &Config) -> Result<Duration, TimerError> {
    let resolved = resolve_value(value, config)?;
    parse_duration(&resolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(key: &str, value: &str) -> Config {
        Config::builder()
            .set_override(key, value)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn plain_values_pass_through() {
        let config = Config::builder().build().unwrap();
        assert_eq!(resolve_value("5s", &config).unwrap(), "5s");
        assert_eq!(resolve_value("true", &config).unwrap(), "true");
    }

    #[test]
    fn placeholders_read_the_config() {
        let config = config_with("timers.poll", "250ms");
        assert_eq!(
            resolve_value("${timers.poll}", &config).unwrap(),
            "250ms"
        );
        assert_eq!(
            resolve_value("${timers.poll:1s}", &config).unwrap(),
            "250ms"
        );
    }

    #[test]
    fn missing_keys_fall_back_to_the_default() {
        let config = Config::builder().build().unwrap();
        assert_eq!(
            resolve_value("${timers.poll:1s}", &config).unwrap(),
            "1s"
        );
        assert!(resolve_value("${timers.poll}", &config).is_err());
    }

    #[test]
    fn resolves_and_parses_durations() {
        let config = config_with("timers.poll", "250ms");
        assert_eq!(
            resolve_duration("${timers.poll}", &config).unwrap(),
            Duration::from_millis(250)
        );
        assert_eq!(
            resolve_duration("2s", &config).unwrap(),
            Duration::from_secs(2)
        );
    }
}
