use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::utils;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// WebDriver endpoint the browser sessions connect to
    /// (chromedriver listens on 9515 out of the box).
    pub webdriver_url: String,
    pub headless: bool,
    /// Seconds to let script-driven content populate after navigation and
    /// after each scroll.
    pub settle_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: true,
            settle_secs: 2,
        }
    }
}

impl AppConfig {
    pub fn load() -> Self {
        let path = utils::config_path();
        match read_config(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("unreadable config {:?}, using defaults: {err}", path);
                AppConfig::default()
            }
        }
    }
}

fn read_config(path: &PathBuf) -> Result<AppConfig, String> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = fs::read_to_string(path).map_err(|err| err.to_string())?;
    serde_json::from_str(&contents).map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"webdriver_url": "http://chrome:4444/wd/hub"}"#)
                .expect("parse config");
        assert_eq!(config.webdriver_url, "http://chrome:4444/wd/hub");
        assert!(config.headless);
        assert_eq!(config.settle_secs, 2);
    }
}
