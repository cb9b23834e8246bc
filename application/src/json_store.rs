use domain::storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::types::Result;

/// Decode a JSON value, falling back to `T::default()` when the key is
/// absent, unreadable or corrupt.
pub fn read_or_default<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            tracing::warn!(key, error = %e, "storage read failed");
            return T::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "discarding corrupt stored value");
        T::default()
    })
}

pub fn write_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let serialized = serde_json::to_string(value)?;
    store.set(key, &serialized)
}
