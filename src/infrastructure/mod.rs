// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod file_storage;
pub mod gemini_gateway;
pub mod gemini_request;
pub mod memory_storage;
