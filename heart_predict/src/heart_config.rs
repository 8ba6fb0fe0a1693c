
use heart_client::DEFAULT_BASE_URL;
use serde_derive::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            base_url: String::from(DEFAULT_BASE_URL),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Terminal columns to draw into, 0 follows the terminal itself.
    pub width: u16,
    pub show_descriptions: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            width: 0,
            show_descriptions: true,
        }
    }
}

/// Every key is optional; an empty settings file gives the public service
/// and default display options.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct HeartConfig {
    pub service: ServiceConfig,
    pub display: DisplayConfig,
}
