use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

use crate::currency::CurrencyType;
use crate::utils::paths::{app_data_dir, config_file_in, ensure_dir};

const TMP_SUFFIX: &str = "tmp";

/// Setting names accepted by [`Settings::set`].
pub const SETTING_KEYS: [&str; 5] = [
    "theme",
    "color_scheme",
    "compact_layout",
    "default_currency",
    "simulated_delay_ms",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Unknown setting `{0}`")]
    UnknownKey(String),
    #[error("Invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppTheme {
    Light,
    Dark,
    #[default]
    System,
}

impl AppTheme {
    /// Unknown names fall back to [`AppTheme::System`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "light" => AppTheme::Light,
            "dark" => AppTheme::Dark,
            _ => AppTheme::System,
        }
    }
}

impl fmt::Display for AppTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorScheme {
    #[default]
    DefaultBlue,
    EarthlyColor,
    EmeraldCourt,
    RoseBlossom,
    OceanMist,
    AutumnEmber,
    BlackWhite,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 7] = [
        ColorScheme::DefaultBlue,
        ColorScheme::EarthlyColor,
        ColorScheme::EmeraldCourt,
        ColorScheme::RoseBlossom,
        ColorScheme::OceanMist,
        ColorScheme::AutumnEmber,
        ColorScheme::BlackWhite,
    ];

    /// Matches names ignoring case, `-`, `_` and spaces; unknown names give the default.
    pub fn parse(value: &str) -> Self {
        let wanted: String = value
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.to_string().to_ascii_lowercase() == wanted)
            .unwrap_or_default()
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// User preferences persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: AppTheme,
    pub color_scheme: ColorScheme,
    pub compact_layout: bool,
    pub default_currency: CurrencyType,
    pub simulated_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: AppTheme::default(),
            color_scheme: ColorScheme::default(),
            compact_layout: false,
            default_currency: CurrencyType::default(),
            simulated_delay_ms: 0,
        }
    }
}

impl Settings {
    /// Updates a single setting by name.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "theme" => self.theme = AppTheme::parse(value),
            "color_scheme" => self.color_scheme = ColorScheme::parse(value),
            "compact_layout" => {
                self.compact_layout = match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => return Err(invalid()),
                }
            }
            "default_currency" => self.default_currency = CurrencyType::find(value),
            "simulated_delay_ms" => {
                self.simulated_delay_ms = value.trim().parse().map_err(|_| invalid())?
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }

    /// `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("theme", self.theme.to_string()),
            ("color_scheme", self.color_scheme.to_string()),
            ("compact_layout", self.compact_layout.to_string()),
            ("default_currency", self.default_currency.to_string()),
            ("simulated_delay_ms", self.simulated_delay_ms.to_string()),
        ]
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: config_file_in(&base),
        })
    }

    /// Reads settings, returning defaults when the file does not exist yet.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Settings::default())
        }
    }

    pub fn save(&self, settings: &Settings) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(settings)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Loads, updates one key and saves.
    pub fn set(&self, key: &str, value: &str) -> Result<Settings, ConfigError> {
        let mut settings = self.load()?;
        settings.set(key, value)?;
        self.save(&settings)?;
        tracing::info!(key, value, "Setting updated");
        Ok(settings)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
