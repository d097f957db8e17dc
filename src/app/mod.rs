//! Application state and logic

mod event;
mod handler;
pub mod header;
mod notify;
pub mod rename;
pub mod selector;
mod state;
pub mod worker;

pub use event::{Event, Handler};
pub use handler::handle_action;
pub use header::HeaderState;
pub use notify::{Toast, ToastLevel, Toasts};
pub use rename::{ApplyOutcome, CommitOutcome, EditState, RenameFlow, TitleInput};
pub use selector::{AgentSelector, MenuRow};
pub use state::{App, Mode, ThreadContext};
pub use worker::{BackgroundExecutor, InlineExecutor, RenameExecutor};
