pub mod app;
pub mod args;
pub mod config;
pub mod errors;
pub mod mime;
pub mod storage;
pub mod utils;

pub use app::run_app;
pub use args::Args;
pub use config::Config;
pub use storage::{OperationResult, StorageFacade};
