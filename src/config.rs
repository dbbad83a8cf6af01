use crate::error::ConfigError;
use log::warn;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub target_province: String,
    pub pending_marker: String,
    pub reports_path: String,
    pub output_dir: String,
    pub preview_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_province: "cebu".to_string(),
            pending_marker: "pending".to_string(),
            reports_path: "emergencies.json".to_string(),
            output_dir: ".".to_string(),
            preview_rows: 5,
        }
    }
}

impl AppConfig {
    /// Defaults, or the JSON file named by `RELIEF_CONFIG`, overridden by
    /// the other `RELIEF_*` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = match lookup("RELIEF_CONFIG") {
            Some(path) => Self::from_file(&path).unwrap_or_else(|e| {
                warn!("Ignoring config file {}: {}", path, e);
                Self::default()
            }),
            None => Self::default(),
        };
        if let Some(v) = lookup("RELIEF_PROVINCE") {
            cfg.target_province = v;
        }
        if let Some(v) = lookup("RELIEF_PENDING_MARKER") {
            cfg.pending_marker = v;
        }
        if let Some(v) = lookup("RELIEF_REPORTS") {
            cfg.reports_path = v;
        }
        if let Some(v) = lookup("RELIEF_OUTPUT_DIR") {
            cfg.output_dir = v;
        }
        if let Some(v) = lookup("RELIEF_PREVIEW_ROWS") {
            match v.trim().parse() {
                Ok(n) => cfg.preview_rows = n,
                Err(_) => warn!("Ignoring RELIEF_PREVIEW_ROWS={:?}: not a number", v),
            }
        }
        cfg
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn output_path(&self, file_name: &str) -> String {
        std::path::Path::new(&self.output_dir)
            .join(file_name)
            .to_string_lossy()
            .into_owned()
    }
}
