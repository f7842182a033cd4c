pub mod auth;
pub mod board;
pub mod error;
pub mod event;
pub mod identity;
