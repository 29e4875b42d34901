//! Per-chat key/value storage contract. No concrete store ships here.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::driver::ChatId;
use crate::error::DriverError;

pub trait KvStore {
    fn get(&self, chat_id: ChatId, key: &str) -> Result<Option<String>, DriverError>;
    fn set(&self, chat_id: ChatId, key: &str, value: &str) -> Result<(), DriverError>;
    fn delete(&self, chat_id: ChatId, key: &str) -> Result<(), DriverError>;

    fn get_json<T: DeserializeOwned>(&self, chat_id: ChatId, key: &str) -> Result<Option<T>, DriverError> {
        match self.get(chat_id, key)? {
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| DriverError(e.to_string())),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize>(&self, chat_id: ChatId, key: &str, value: &T) -> Result<(), DriverError> {
        let raw = serde_json::to_string(value).map_err(|e| DriverError(e.to_string()))?;
        self.set(chat_id, key, &raw)
    }
}
