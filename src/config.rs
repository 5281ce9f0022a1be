use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::render::{OutputFormat, Style};

const CONFIG_PATH_ENV_VAR: &str = "WALLCAL_CONFIG_FILE";

pub const DEFAULT_MONTHS: i64 = 12;
pub const DEFAULT_OUTPUT: &str = "calendar.xml";

pub(crate) fn find_configfile_locations() -> io::Result<Vec<PathBuf>> {
    let home = dirs::home_dir().ok_or_else(|| {
        io::Error::new(io::ErrorKind::Other, "Unable to find home directory")
    })?;

    let home_config = home.join(".wallcal.toml");

    let config_xdg = if let Ok(dir) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(dir).join("wallcal").join("config.toml")
    } else {
        dirs::config_dir()
            .unwrap_or_else(|| home.join(".config"))
            .join("wallcal")
            .join("config.toml")
    };

    let mut locations = vec![config_xdg, home_config];

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.insert(0, PathBuf::from(path));
    }

    Ok(locations)
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub months: i64,
    pub output: PathBuf,
    pub format: OutputFormat,
    pub style: Style,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            months: DEFAULT_MONTHS,
            output: PathBuf::from(DEFAULT_OUTPUT),
            format: OutputFormat::default(),
            style: Style::default(),
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Config::from_toml(&content).map_err(|err| {
            let msg = format!("{} ({})", err.message.as_deref().unwrap_or(""), path.display());
            err.with_msg(&msg)
        })
    }
}

/// Loads the config at `path` if given, otherwise the first config found
/// in the default locations, otherwise the defaults.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::info!("Loading config from {}", path.display());
        return Config::from_file(path);
    }

    let locations = match find_configfile_locations() {
        Ok(locations) => locations,
        Err(e) => {
            log::warn!("{}", e);
            Vec::new()
        }
    };

    match locations.iter().find(|p| p.is_file()) {
        Some(path) => {
            log::info!("Loading config from {}", path.display());
            Config::from_file(path)
        }
        None => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn partial_config() {
        let config = Config::from_toml(
            r#"
            months = 6
            format = "text"

            [style]
            font = "Helvetica"
            weekend_fill = "EEEEEE"
            "#,
        )
        .unwrap();

        assert_eq!(config.months, 6);
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.format, OutputFormat::Text);
        assert_eq!(config.style.font, "Helvetica");
        assert_eq!(config.style.weekend_fill, "EEEEEE");
        assert_eq!(config.style.muted_color, Style::default().muted_color);
        assert_eq!(config.style.row_height, 576);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let err = Config::from_toml("format = \"pdf\"").unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::ConfigParse));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let path = std::env::temp_dir().join(format!("wallcal-config-{}.toml", std::process::id()));
        fs::write(&path, "output = \"wall.xml\"\n").unwrap();

        let config = load_suitable_config(Some(&path)).unwrap();
        assert_eq!(config.output, PathBuf::from("wall.xml"));
        assert_eq!(config.months, DEFAULT_MONTHS);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_explicit_path_is_an_error() {
        let path = Path::new("/nonexistent/wallcal/config.toml");
        let err = load_suitable_config(Some(path)).unwrap_err();
        assert!(matches!(err.kind, crate::error::ErrorKind::IOError(_)));
    }
}
