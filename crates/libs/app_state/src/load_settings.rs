use crate::{AppSettings, RawSettings};
use color_eyre::eyre::{Context, Result};
use std::env;
use std::path::Path;
use tracing::debug;

/// Loads `config/settings.yaml`, `.env` and `APP__*` environment overrides.
pub fn load_app_settings() -> Result<AppSettings> {
    load_settings_from_path(Path::new("config/settings.yaml"), true)
}

/// Loads settings from a specific YAML file.
///
/// With `load_env` set, `.env` is read and environment variables override the file:
/// `APP__SECTION__KEY` for any key, plus `EMAIL_USER` / `EMAIL_PASS` for the mail account.
pub fn load_settings_from_path(config_path: &Path, load_env: bool) -> Result<AppSettings> {
    let config_path = config_path
        .canonicalize()
        .wrap_err_with(|| format!("Cannot find settings file {}", config_path.display()))?;

    let mut builder = config::Config::builder().add_source(config::File::from(config_path));

    if load_env {
        dotenv::from_path(".env").ok();
        builder = builder
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("secrets.email_user", env::var("EMAIL_USER").ok())?
            .set_override_option("secrets.email_pass", env::var("EMAIL_PASS").ok())?;
    }

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    let settings = AppSettings::try_from(raw_settings)?;
    debug!(?settings, "Loaded settings");

    Ok(settings)
}
