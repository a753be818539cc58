// Application layer - Use cases and the ports they depend on
pub mod analysis_gateway;
pub mod analysis_session;
pub mod chat_service;
pub mod history_store;
pub mod key_value_storage;
pub mod project_service;

#[cfg(test)]
pub mod test_support;
