pub mod error;

use crate::config::error::ConfigError;
use crate::shared::utils;
use chrono_tz::Tz;
use mlua::{Lua, Table, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
};

const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/calendar.readonly";
const DEFAULT_REDIRECT_URL: &str = "http://127.0.0.1:9004";

#[derive(Debug, PartialEq, Eq)]
pub struct Config {
    pub source: Source,
    pub settings: Settings,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Settings {
    /// `None` means the system time zone.
    pub tz: Option<Tz>,
    pub oauth_file_path: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Source {
    pub google: GoogleSource,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GoogleSource {
    pub oauth2: GoogleOAuth2,
}

#[derive(Debug, PartialEq, Eq)]
pub struct GoogleOAuth2 {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_url: String,
    pub scopes: Vec<String>,
}

pub fn init() -> anyhow::Result<Config> {
    let path_buf = get_config_file_path()?;
    tracing::debug!(path = %path_buf.display(), "loading config");
    load_config(&path_buf)
}

fn get_config_file_path() -> anyhow::Result<PathBuf> {
    let config_file_path = match env::var("GALENDAR_CONFIG_FILE_PATH") {
        Ok(path) => path.trim().to_string(),
        Err(_) => {
            let home_dir =
                env::var("HOME").map_err(|_e| ConfigError::HomeEnvironmentNotFoundError)?;
            format!("{}/.config/galendar/config.lua", home_dir)
        }
    };

    let config_file_path_buf = utils::path::expand_tilde(&config_file_path);

    if config_file_path_buf.is_file() {
        Ok(config_file_path_buf)
    } else {
        Err(
            ConfigError::ConfigFileNotFoundError(utils::path::contract_tilde(
                &config_file_path_buf,
            ))
            .into(),
        )
    }
}

fn get_oauth_path() -> anyhow::Result<PathBuf> {
    let home_dir = env::var("HOME").map_err(|_e| ConfigError::HomeEnvironmentNotFoundError)?;
    Ok(PathBuf::from(home_dir).join(".local/share/galendar/oauth"))
}

fn load_config(config_file_path: &Path) -> anyhow::Result<Config> {
    let lua = Lua::new();
    let shown_path = utils::path::contract_tilde(config_file_path);
    let missing =
        |field: &str| ConfigError::RequiredFieldNotFound(field.to_owned(), shown_path.clone());

    let config_dir = config_file_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .to_string_lossy();

    lua.load(format!(
        r#"package.path = package.path .. ";{}/?.lua""#,
        config_dir
    ))
    .exec()
    .map_err(|e| ConfigError::LuaRuntimeError(e.to_string()))?;

    let config_code = fs::read_to_string(config_file_path)?;
    let config_eval: Value = lua
        .load(&config_code)
        .set_name(shown_path.as_str())
        .eval()
        .map_err(|e| ConfigError::LuaRuntimeError(e.to_string()))?;

    let Value::Table(config_tbl) = config_eval else {
        return Err(missing("config.lua did not return a table!").into());
    };

    let source_tbl: Table = config_tbl
        .get::<_, Option<Table>>("source")?
        .ok_or_else(|| missing("source"))?;
    let google_tbl: Table = source_tbl
        .get::<_, Option<Table>>("google")?
        .ok_or_else(|| missing("source.google"))?;
    let google_oauth2_tbl: Table = google_tbl
        .get::<_, Option<Table>>("oauth2")?
        .ok_or_else(|| missing("source.google.oauth2"))?;

    let client_id: String = google_oauth2_tbl
        .get::<_, Option<String>>("clientID")?
        .ok_or_else(|| missing("source.google.oauth2.clientID"))?;
    let client_secret: String = google_oauth2_tbl
        .get::<_, Option<String>>("clientSecret")?
        .ok_or_else(|| missing("source.google.oauth2.clientSecret"))?;
    let redirect_url: String = google_oauth2_tbl
        .get::<_, Option<String>>("redirectURL")?
        .unwrap_or_else(|| DEFAULT_REDIRECT_URL.to_string());

    let scopes: Vec<String> = match google_oauth2_tbl.get::<_, Option<Table>>("scopes")? {
        Some(scopes_tbl) => scopes_tbl.sequence_values().collect::<Result<_, _>>()?,
        None => vec![DEFAULT_SCOPE.to_string()],
    };

    let settings_tbl = config_tbl.get::<_, Option<Table>>("settings")?;
    let oauth_file_path = match settings_tbl
        .as_ref()
        .map(|t| t.get::<_, Option<String>>("oauthFilePath"))
        .transpose()?
        .flatten()
    {
        Some(path) => utils::path::expand_tilde(&path)
            .to_string_lossy()
            .to_string(),
        None => get_oauth_path()?.to_string_lossy().to_string(),
    };
    let tz = settings_tbl
        .as_ref()
        .map(|t| t.get::<_, Option<String>>("TZ"))
        .transpose()?
        .flatten()
        .map(|tz_name| {
            tz_name
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimeZone(tz_name.clone(), shown_path.clone()))
        })
        .transpose()?;

    Ok(Config {
        source: Source {
            google: GoogleSource {
                oauth2: GoogleOAuth2 {
                    client_id,
                    client_secret,
                    redirect_url,
                    scopes,
                },
            },
        },
        settings: Settings {
            tz,
            oauth_file_path,
        },
    })
}
