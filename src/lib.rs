pub mod api;
pub mod config;
pub mod error;
pub mod filter;
pub mod forms;
pub mod models;
pub mod notify;
pub mod observability;
pub mod state;
pub mod storage;
pub mod store;
