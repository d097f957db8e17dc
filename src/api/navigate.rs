//! Navigators: opening frontend routes from the terminal

use super::Navigator;
use parking_lot::Mutex;
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use tracing::{debug, info, warn};

/// Opens routes in the system browser
#[derive(Debug, Clone)]
pub struct BrowserNavigator {
    web_url: String,
}

impl BrowserNavigator {
    /// Create a navigator rooted at `web_url`
    #[must_use]
    pub fn new(web_url: &str) -> Self {
        Self {
            web_url: web_url.trim_end_matches('/').to_string(),
        }
    }

    /// Absolute URL for `route`
    #[must_use]
    pub fn url_for(&self, route: &str) -> String {
        format!("{}/{}", self.web_url, route.trim_start_matches('/'))
    }
}

/// System command that opens `url` in the default browser
fn opener_command(url: &str) -> Command {
    if cfg!(target_os = "macos") {
        let mut command = Command::new("open");
        command.arg(url);
        command
    } else if cfg!(target_os = "windows") {
        // Empty title argument so `start` does not take the URL as one
        let mut command = Command::new("cmd");
        command.args(["/C", "start", "", url]);
        command
    } else {
        let mut command = Command::new("xdg-open");
        command.arg(url);
        command
    }
}

/// Start `command` with no stdio and wait for it on a background thread
fn spawn_detached(mut command: Command) -> io::Result<JoinHandle<io::Result<ExitStatus>>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(std::thread::spawn(move || {
        let status = child.wait();
        match &status {
            Ok(status) if !status.success() => debug!(%status, "Browser opener exited"),
            Ok(_) => {}
            Err(e) => warn!("Failed to wait for browser opener: {e}"),
        }
        status
    }))
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, route: &str) {
        let url = self.url_for(route);
        // The opener must not write into the TUI
        match spawn_detached(opener_command(&url)) {
            Ok(_) => info!(%url, "Opened browser"),
            Err(e) => warn!(%url, "Failed to open browser: {e}"),
        }
    }
}

/// Records routes instead of opening them
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    /// Create an empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes navigated to so far, oldest first
    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        self.routes.lock().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: &str) {
        info!(%route, "Navigation requested");
        self.routes.lock().push(route.to_string());
    }
}

impl<N: Navigator + ?Sized> Navigator for std::sync::Arc<N> {
    fn navigate(&self, route: &str) {
        (**self).navigate(route);
    }
}
