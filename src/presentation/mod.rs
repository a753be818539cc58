// Presentation layer - Local JSON API for the front end
pub mod app_state;
pub mod dto;
pub mod handlers;
pub mod router;
