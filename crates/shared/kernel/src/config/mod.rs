use config::{Config, Environment, File};
use ohub_domain::constants::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

#[ohub_derive::ohub_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered configuration: a file first, then `OHUB__`-prefixed environment variables.
///
/// * With `Some(path)` the file must exist (`server.toml`, or any format `config` detects
///   from the extension; the extension may be omitted).
/// * With `None` the default `server` file is used when present, so a bare environment
///   (or no settings at all) is enough to start.
///
/// Nested keys use double underscores: `OHUB__DATABASE__URL` sets `database.url`.
///
/// # Errors
/// Returns [`ConfigError::Config`] when an explicit file is missing, a source cannot be
/// parsed, or the merged values do not deserialize into `T`.
///
/// # Example
/// ```rust
/// use ohub_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let cfg: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let required = path.is_some();
    let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    load(&path, required, environment())
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true)
}

fn load<T>(path: &Path, required: bool, environment: Environment) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    info!(path = %path.display(), required, "Loading configuration");

    Config::builder()
        .add_source(File::from(path).required(required))
        .add_source(environment)
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use ohub_domain::config::ApiConfig;
    use std::collections::HashMap;
    use std::fs;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> =
            vars.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect();
        environment().source(Some(source))
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let cfg: ApiConfig = load(Path::new("does-not-exist"), false, env(&[])).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.url, "mem://");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let err = load::<ApiConfig>(Path::new("does-not-exist"), true, env(&[])).unwrap_err();
        assert!(err.to_string().contains("Failed to build config"));
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("server.toml");
        fs::write(
            &file,
            "[server]\nport = 9000\n\n[database]\nurl = \"mem://\"\nnamespace = \"file\"\n",
        )
        .unwrap();

        let cfg: ApiConfig = load(
            &file,
            true,
            env(&[("OHUB__SERVER__PORT", "9100"), ("OHUB__LOGGING__LEVEL", "debug")]),
        )
        .unwrap();

        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.database.namespace, "file");
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn malformed_values_are_reported() {
        let err =
            load::<ApiConfig>(Path::new("nope"), false, env(&[("OHUB__SERVER__PORT", "high")]))
                .unwrap_err();
        assert!(err.to_string().contains("Failed to deserialize config"));
    }
}
