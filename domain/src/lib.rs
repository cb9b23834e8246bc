pub mod attempt_policy;
pub mod chat_state;
pub mod error;
pub mod gateway;
pub mod models;
pub mod notes;
pub mod session;
pub mod speech;
pub mod storage;
pub mod subjects;
