use std::path::PathBuf;
use std::sync::{OnceLock, RwLock};

use serde::{Deserialize, Serialize};
use tracing::error;


pub(crate) static CONFIG_PATH: OnceLock<PathBuf> = OnceLock::new();
pub(crate) static CONFIG: OnceLock<RwLock<DocumentDefaults>> = OnceLock::new();


/// Defaults applied to a document when the caller doesn't specify otherwise.
#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct DocumentDefaults {
    pub pdf_version_major: u32,
    pub pdf_version_minor: u32,
    pub raster_version_major: u32,
    pub raster_version_minor: u32,
    pub producer: String,
    pub creator: String,
}

impl Default for DocumentDefaults {
    fn default() -> Self {
        DocumentDefaults {
            pdf_version_major: 1,
            pdf_version_minor: 4,
            raster_version_major: 1,
            raster_version_minor: 0,
            producer: "pdfraster_core".to_string(),
            creator: "pdfraster_core".to_string(),
        }
    }
}


pub(crate) fn load_config() -> Option<DocumentDefaults> {
    let config_path = CONFIG_PATH.get()
        .expect("CONFIG_PATH not set?!");
    let config_string = match std::fs::read_to_string(config_path) {
        Ok(cs) => cs,
        Err(e) => {
            error!("failed to read config from {}: {}", config_path.display(), e);
            return None;
        }
    };
    let config: DocumentDefaults = match toml::from_str(&config_string) {
        Ok(c) => c,
        Err(e) => {
            error!("failed to parse config from {}: {}", config_path.display(), e);
            return None;
        },
    };
    Some(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_pdf_1_4_raster_1_0_document() {
        let defaults = DocumentDefaults::default();
        assert_eq!(defaults.pdf_version_major, 1);
        assert_eq!(defaults.pdf_version_minor, 4);
        assert_eq!(defaults.raster_version_major, 1);
        assert_eq!(defaults.raster_version_minor, 0);
    }

    #[test]
    fn round_trips_through_toml() {
        let defaults = DocumentDefaults::default();
        let text = toml::to_string(&defaults).unwrap();
        let parsed: DocumentDefaults = toml::from_str(&text).unwrap();
        assert_eq!(defaults, parsed);
    }
}
