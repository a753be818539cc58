// Domain layer - Pure data shared by every other layer
pub mod analysis;
pub mod chat;
pub mod history;
pub mod image;
pub mod project;
pub mod session;
pub mod valuation;
