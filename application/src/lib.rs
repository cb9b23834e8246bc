pub mod attempt_service;
pub mod chat_service;
pub mod json_store;
pub mod progress_service;
pub mod prompt_builder;
pub mod response_segmenter;
pub mod session_service;
pub mod speech_service;
pub mod study_plan_service;
