pub mod cli;
pub mod console_speech;
pub mod material;
