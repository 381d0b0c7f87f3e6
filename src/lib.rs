mod annotate;
mod detection;
mod detector;
mod page;
mod routes;
mod server;
mod storage;

pub mod app;
pub mod config;

pub use app::start_app;
