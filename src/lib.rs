pub mod app;
pub mod config;
pub mod dashboard;
pub mod day;
pub mod errors;
pub mod handlers;
pub mod leaderboard;
pub mod models;
pub mod progress;
pub mod session;
pub mod state;
pub mod storage;
pub mod store;
pub mod streak;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use state::AppState;
pub use storage::{load_data, JsonStore};
pub use tracker::Tracker;
