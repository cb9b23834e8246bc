use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub youtube_api_key: Option<String>,
    pub youtube_base_url: String,
    /// When set, chat goes through the backend relay instead of Gemini directly.
    pub backend_url: Option<String>,
    pub id_token: Option<String>,
    pub store_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();
        Self {
            gemini_api_key: first_var(&["GOOGLE_API_KEY", "VITE_GEMINI_API_KEY"]),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            youtube_api_key: first_var(&["YOUTUBE_API_KEY", "VITE_YOUTUBE_API_KEY"]),
            youtube_base_url: env::var("YOUTUBE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_YOUTUBE_BASE_URL.to_string()),
            backend_url: first_var(&["VITE_BACKEND_URL"]),
            id_token: first_var(&["LEARNMYWAY_ID_TOKEN"]),
            store_path: env::var("LEARNMYWAY_STORE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| Self::default_store_path()),
        }
    }

    fn default_store_path() -> PathBuf {
        let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("learnmyway");
        path.push("store.db");
        path
    }
}

/// First non-empty variable among `names`.
fn first_var(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}
