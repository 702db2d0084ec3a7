pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod graph;
pub mod store;

pub use config::Config;
pub use engine::GraphExplorer;
pub use error::{GraphError, Result};
pub use store::GraphStore;
