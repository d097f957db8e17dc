//! Threadbar - terminal thread header and agent selector
//!
//! Threadbar renders the header bar of a single chat thread (project title
//! with inline rename, usage badge, share and panel controls) together with
//! the agent selector used when composing messages. All persistence goes
//! through the backend HTTP API; the UI itself only owns overlay and edit
//! state.

pub mod agent;
pub mod api;
pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod paths;
pub mod tui;
pub mod usage;

pub use agent::{Agent, McpIntegration};
pub use app::App;
pub use config::Config;
pub use error::ApiError;
