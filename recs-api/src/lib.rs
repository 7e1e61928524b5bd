mod flash;
mod routes;
mod session;
pub mod views;

pub use routes::build_router;
