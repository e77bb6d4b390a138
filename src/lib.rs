pub mod api;
pub mod app;
pub mod auth;
pub mod contacts;
pub mod session;
pub mod storage;
pub mod utils;

#[cfg(feature = "gui")]
pub mod ui;
