use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Default attachment size ceiling: 20 MiB, below the chat transport's own
/// bot-download limit.
pub const DEFAULT_ATTACHMENT_MAX_BYTES: u64 = 20 * 1024 * 1024;

/// Global configuration loaded from `~/.config/tgdrop/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TgdropConfig {
    /// Bot API token. Empty means "take it from the environment".
    #[serde(default)]
    pub bot_token: String,
    /// Usernames allowed to submit files and links.
    #[serde(default)]
    pub allowed_usernames: Vec<String>,
    /// Extensions accepted for download, matched case-insensitively.
    pub allowed_extensions: Vec<String>,
    /// Base directory files are saved under.
    pub save_path: PathBuf,
    /// Selectable destination subfolders.
    pub folders: Vec<String>,
    /// Subfolder selected at startup.
    pub default_folder: String,
    /// Pause between queue items, in milliseconds.
    #[serde(default)]
    pub delay_ms: u64,
    /// Declared-size ceiling for chat attachments, in bytes.
    #[serde(default = "default_attachment_max_bytes")]
    pub attachment_max_bytes: u64,
}

fn default_attachment_max_bytes() -> u64 {
    DEFAULT_ATTACHMENT_MAX_BYTES
}

impl Default for TgdropConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            allowed_usernames: Vec::new(),
            allowed_extensions: vec![
                "mp4".to_string(),
                "mp3".to_string(),
                "pdf".to_string(),
                "jpg".to_string(),
                "png".to_string(),
                "zip".to_string(),
            ],
            save_path: PathBuf::from("./files"),
            folders: vec!["files".to_string()],
            default_folder: "files".to_string(),
            delay_ms: 0,
            attachment_max_bytes: DEFAULT_ATTACHMENT_MAX_BYTES,
        }
    }
}

impl TgdropConfig {
    /// Overlays environment variables onto the file config, where set:
    /// `YOUR_BOT_TOKEN`, `YOUR_USERNAME`, `ALLOWED_EXTENSIONS`
    /// (comma-separated), `SAVE_PATH`.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(token) = std::env::var("YOUR_BOT_TOKEN") {
            if !token.is_empty() {
                self.bot_token = token;
            }
        }
        if let Ok(users) = std::env::var("YOUR_USERNAME") {
            let users = parse_csv(&users);
            if !users.is_empty() {
                self.allowed_usernames = users;
            }
        }
        if let Ok(exts) = std::env::var("ALLOWED_EXTENSIONS") {
            let exts = parse_csv(&exts);
            if !exts.is_empty() {
                self.allowed_extensions = exts;
            }
        }
        if let Ok(path) = std::env::var("SAVE_PATH") {
            if !path.is_empty() {
                self.save_path = PathBuf::from(path);
            }
        }
    }

    pub fn limits(&self) -> crate::validate::Limits {
        crate::validate::Limits::new(&self.allowed_extensions, self.attachment_max_bytes)
    }
}

/// Splits a comma-separated value into trimmed, non-empty entries.
pub fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tgdrop")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
/// Environment overrides are applied after either branch.
pub fn load_or_init() -> Result<TgdropConfig> {
    let path = config_path()?;
    let mut cfg = if path.exists() {
        let data = fs::read_to_string(&path)?;
        toml::from_str(&data)?
    } else {
        let default_cfg = TgdropConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        default_cfg
    };
    cfg.apply_env_overrides();
    Ok(cfg)
}
