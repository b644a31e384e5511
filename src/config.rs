use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const DEFAULT_CONFIG_PATH: &str = "config.yml";
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
pub const CONFIG_PATH_ENV: &str = "CONFIG_PATH";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiKeysConfig {
    #[serde(default)]
    pub active: Vec<String>,
    #[serde(default)]
    pub disabled: Vec<String>,
}

impl ApiKeysConfig {
    fn usable(&self) -> impl Iterator<Item = &str> {
        let bad: HashSet<&str> = self.disabled.iter().map(|s| s.as_str()).collect();
        self.active
            .iter()
            .map(|s| s.as_str())
            .filter(move |k| !k.is_empty() && !bad.contains(k))
    }

    pub fn has_usable(&self) -> bool {
        self.usable().next().is_some()
    }

    /// Round-robins over the active keys that are not disabled.
    pub fn rotated(&self) -> Option<&str> {
        let good_keys: Vec<&str> = self.usable().collect();
        if good_keys.is_empty() {
            return None;
        }
        let index = API_KEY_COUNTER.fetch_add(1, Ordering::Relaxed) % good_keys.len();
        Some(good_keys[index])
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Seconds per upstream call, 0 disables the timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
    /// Upper bound on fetched pages per request, 0 disables it.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    #[serde(default)]
    pub keys: ApiKeysConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            max_pages: default_max_pages(),
            keys: ApiKeysConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct PlaylistConfig {
    #[serde(default)]
    pub default_mode: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub playlist: PlaylistConfig,
}

static API_KEY_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_base_url() -> String {
    "https://www.googleapis.com/youtube/v3".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_pages() -> usize {
    200
}

impl Config {
    pub fn from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        // An empty file deserializes to unit, not to a mapping.
        if contents.trim().is_empty() {
            return Ok(Config::default());
        }
        let mut config: Config = serde_yaml::from_str(contents)?;
        config.tidy();
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Resolves the config path from `CONFIG_PATH`, falling back to `config.yml`.
    pub fn path_from_env() -> String {
        std::env::var(CONFIG_PATH_ENV)
            .ok()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
    }

    pub fn apply_env_overrides(&mut self) {
        self.merge_api_key(std::env::var(API_KEY_ENV).ok());
    }

    pub fn merge_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()) {
            if !self.api.keys.active.contains(&key) {
                self.api.keys.active.insert(0, key);
            }
        }
    }

    pub fn tidy(&mut self) {
        let mut clean_keys = self
            .api
            .keys
            .active
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>();
        clean_keys.sort();
        clean_keys.dedup();
        self.api.keys.active = clean_keys;

        let mut clean_disabled = self
            .api
            .keys
            .disabled
            .iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect::<Vec<_>>();
        clean_disabled.sort();
        clean_disabled.dedup();
        self.api.keys.disabled = clean_disabled;

        self.api.base_url = self.api.base_url.trim().trim_end_matches('/').to_string();
    }

    pub fn has_api_key(&self) -> bool {
        self.api.keys.has_usable()
    }
}
