use shared::types::Result;

pub const SESSIONS_KEY: &str = "eduChat:sessions:v1";
pub const PROGRESS_KEY: &str = "eduChat:progress";
pub const USER_PERFORMANCE_KEY: &str = "eduChat:userPerformance";

/// String key-value store standing in for browser local storage.
/// Opened at startup; `clear` backs the `logout` command.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}
