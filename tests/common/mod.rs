//! Common test utilities shared across integration tests

pub mod doubles;

pub use doubles::{Backend, RecordingInvalidator, RecordingNotifier, RenameMode, build_app};
