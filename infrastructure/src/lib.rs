pub mod ai_gateway;
pub mod backend_client;
pub mod config;
pub mod docx_notes;
pub mod gemini_client;
pub mod memory_store;
pub mod sqlite_store;
pub mod youtube_client;
