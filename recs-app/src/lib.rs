pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

mod app_context;

pub use app_context::{AppContext, Clients};
pub use config::AppConfig;
