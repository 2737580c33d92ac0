pub mod auth;
pub mod root;
pub mod settings;
pub mod summary;
pub mod trips;
