//! Inline project rename
//!
//! The header title is either displayed (`Viewing`) or edited in place
//! (`Editing`). Leaving edit mode never waits on the network: a changed name
//! is handed off as a [`PendingRename`] and the state returns to `Viewing`
//! immediately. The outcome is applied later by [`RenameFlow::apply`], in
//! whatever order completions arrive.
//!
//! The committed name itself belongs to the caller; this type only sees it
//! through arguments, so "draft equals committed while viewing" holds by
//! construction.

use crate::api::{Notifier, Project};
use crate::cache::{CacheInvalidator, CacheKey};
use crate::error::{ApiError, RENAME_FAILED_MESSAGE};
use tracing::{debug, info, warn};

/// Maximum length of a project name, in characters
pub const MAX_NAME_LEN: usize = 50;

/// Name the backend gives a project before it is titled
pub const PLACEHOLDER_TITLE: &str = "Project";

/// Whether `name` is still the loading placeholder
#[must_use]
pub fn is_placeholder(name: &str) -> bool {
    name.is_empty() || name == PLACEHOLDER_TITLE
}

/// Single-line edit buffer for the title field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TitleInput {
    buffer: String,
    /// Cursor position within `buffer` (byte offset)
    cursor: usize,
    /// Whole buffer selected; the next edit replaces it
    select_all: bool,
}

impl TitleInput {
    /// Create a buffer holding `content` with the cursor at the end
    #[must_use]
    pub fn new(content: &str) -> Self {
        Self {
            buffer: content.to_string(),
            cursor: content.len(),
            select_all: false,
        }
    }

    /// Current text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Cursor position in characters (for terminal cursor placement)
    #[must_use]
    pub fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].chars().count()
    }

    /// Whether the whole buffer is selected
    #[must_use]
    pub const fn is_all_selected(&self) -> bool {
        self.select_all
    }

    /// Select the entire buffer
    pub fn select_all(&mut self) {
        self.select_all = !self.buffer.is_empty();
        self.cursor = self.buffer.len();
    }

    fn take_selection(&mut self) -> bool {
        if self.select_all {
            self.select_all = false;
            self.buffer.clear();
            self.cursor = 0;
            true
        } else {
            false
        }
    }

    /// Insert a character at the cursor, replacing a full selection
    ///
    /// Input beyond [`MAX_NAME_LEN`] characters is ignored.
    pub fn insert_char(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        self.take_selection();
        if self.buffer.chars().count() >= MAX_NAME_LEN {
            return;
        }
        self.buffer.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Delete the character before the cursor (backspace)
    pub fn backspace(&mut self) {
        if self.take_selection() {
            return;
        }
        if self.cursor > 0 {
            let prev_char_boundary = self.buffer[..self.cursor]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
            self.buffer.remove(prev_char_boundary);
            self.cursor = prev_char_boundary;
        }
    }

    /// Delete the character at the cursor (delete key)
    pub fn delete(&mut self) {
        if self.take_selection() {
            return;
        }
        if self.cursor < self.buffer.len() {
            self.buffer.remove(self.cursor);
        }
    }

    /// Move cursor left by one character
    pub fn cursor_left(&mut self) {
        if std::mem::take(&mut self.select_all) {
            self.cursor = 0;
            return;
        }
        if self.cursor > 0 {
            self.cursor = self.buffer[..self.cursor]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
        }
    }

    /// Move cursor right by one character
    pub fn cursor_right(&mut self) {
        if std::mem::take(&mut self.select_all) {
            self.cursor = self.buffer.len();
            return;
        }
        if let Some(c) = self.buffer[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    /// Delete the previous word, readline style
    pub fn delete_word(&mut self) {
        if self.take_selection() || self.cursor == 0 {
            return;
        }
        let before = &self.buffer[..self.cursor];
        let word_end = before.trim_end().len();
        let start = before[..word_end]
            .char_indices()
            .rev()
            .find(|(_, ch)| ch.is_whitespace())
            .map_or(0, |(i, ch)| i + ch.len_utf8());
        self.buffer.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Move cursor to start of line
    pub const fn cursor_home(&mut self) {
        self.select_all = false;
        self.cursor = 0;
    }

    /// Move cursor to end of line
    pub const fn cursor_end(&mut self) {
        self.select_all = false;
        self.cursor = self.buffer.len();
    }
}

/// Display/edit state of the title
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditState {
    /// Showing the committed name
    #[default]
    Viewing,
    /// Editing a draft
    Editing(TitleInput),
}

/// A rename handed off to the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRename {
    /// Monotonic attempt number
    pub generation: u64,
    /// Project being renamed
    pub project_id: String,
    /// Committed name when the commit happened
    pub previous_name: String,
    /// Requested name
    pub new_name: String,
}

/// A finished rename request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameCompletion {
    /// The request that was sent
    pub request: PendingRename,
    /// What the updater returned; `Ok(None)` counts as a failure
    pub result: Result<Option<Project>, ApiError>,
}

/// What a commit attempt did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Not editing; nothing happened
    NotEditing,
    /// Draft was blank; reverted silently
    EmptyDraft,
    /// Draft matched the committed name; no call made
    Unchanged,
    /// No project id; error reported, no call made
    MissingProjectId,
    /// Rename handed off; apply the completion when it arrives
    Dispatched(PendingRename),
}

/// What applying a completion did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The new name was committed
    Renamed(String),
    /// The rename failed; the error was reported
    Failed(String),
    /// Dropped because a newer rename already landed
    Stale,
}

/// The inline rename state machine
#[derive(Debug, Default)]
pub struct RenameFlow {
    state: EditState,
    focus_requested: bool,
    next_generation: u64,
    newest_applied: Option<u64>,
    strict_ordering: bool,
}

impl RenameFlow {
    /// Create a flow in `Viewing`
    ///
    /// With `strict_ordering`, completions older than the newest one
    /// already applied are discarded instead of applied.
    #[must_use]
    pub fn new(strict_ordering: bool) -> Self {
        Self {
            strict_ordering,
            ..Self::default()
        }
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> &EditState {
        &self.state
    }

    /// Whether the title is being edited
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing(_))
    }

    /// The draft while editing, otherwise the committed name
    #[must_use]
    pub fn draft<'a>(&'a self, committed: &'a str) -> &'a str {
        match &self.state {
            EditState::Editing(input) => input.text(),
            EditState::Viewing => committed,
        }
    }

    /// The edit buffer, while editing
    #[must_use]
    pub const fn input(&self) -> Option<&TitleInput> {
        match &self.state {
            EditState::Editing(input) => Some(input),
            EditState::Viewing => None,
        }
    }

    /// Mutable edit buffer, while editing
    pub const fn input_mut(&mut self) -> Option<&mut TitleInput> {
        match &mut self.state {
            EditState::Editing(input) => Some(input),
            EditState::Viewing => None,
        }
    }

    /// Enter `Editing` with the draft set to `committed`
    ///
    /// Returns `false` (and stays put) when already editing or when the
    /// title is still the loading placeholder.
    pub fn start(&mut self, committed: &str) -> bool {
        if self.is_editing() || is_placeholder(committed) {
            return false;
        }
        self.state = EditState::Editing(TitleInput::new(committed));
        self.focus_requested = true;
        debug!("Started editing project name");
        true
    }

    /// Consume the pending focus request
    ///
    /// Called once the edit field has been drawn. Selects the whole draft and
    /// returns `true` exactly once per entry into `Editing`.
    pub fn take_focus_request(&mut self) -> bool {
        if !std::mem::take(&mut self.focus_requested) {
            return false;
        }
        match &mut self.state {
            EditState::Editing(input) => {
                input.select_all();
                true
            }
            EditState::Viewing => false,
        }
    }

    /// Discard the draft and return to `Viewing`
    pub fn cancel(&mut self) {
        if self.is_editing() {
            debug!("Cancelled project rename");
        }
        self.state = EditState::Viewing;
        self.focus_requested = false;
    }

    /// Leave `Editing`, handing off a rename if the draft changed
    ///
    /// The transition to `Viewing` is immediate regardless of outcome.
    pub fn commit(
        &mut self,
        committed: &str,
        project_id: Option<&str>,
        notifier: &dyn Notifier,
    ) -> CommitOutcome {
        let EditState::Editing(input) = std::mem::take(&mut self.state) else {
            return CommitOutcome::NotEditing;
        };
        self.focus_requested = false;
        let draft = input.text();

        if draft.trim().is_empty() {
            debug!("Blank project name; reverting");
            return CommitOutcome::EmptyDraft;
        }
        if draft == committed {
            return CommitOutcome::Unchanged;
        }
        let Some(project_id) = project_id.filter(|id| !id.is_empty()) else {
            notifier.notify_error(&ApiError::MissingProjectId.to_string());
            return CommitOutcome::MissingProjectId;
        };

        self.next_generation += 1;
        let pending = PendingRename {
            generation: self.next_generation,
            project_id: project_id.to_string(),
            previous_name: committed.to_string(),
            new_name: draft.to_string(),
        };
        info!(
            generation = pending.generation,
            project_id = %pending.project_id,
            new_name = %pending.new_name,
            "Dispatching project rename"
        );
        CommitOutcome::Dispatched(pending)
    }

    /// Apply a finished rename
    ///
    /// On success, `on_renamed` receives the new name and the project's cache
    /// scope is invalidated. On failure the error is reported and the draft,
    /// if an edit is open again, is reset to the name captured at commit.
    pub fn apply(
        &mut self,
        completion: RenameCompletion,
        notifier: &dyn Notifier,
        invalidator: &dyn CacheInvalidator,
        on_renamed: impl FnOnce(&str),
    ) -> ApplyOutcome {
        let RenameCompletion { request, result } = completion;

        if self.strict_ordering
            && self
                .newest_applied
                .is_some_and(|newest| request.generation < newest)
        {
            warn!(
                generation = request.generation,
                "Dropping out-of-order rename result"
            );
            return ApplyOutcome::Stale;
        }
        self.newest_applied = Some(
            self.newest_applied
                .map_or(request.generation, |n| n.max(request.generation)),
        );

        match result.and_then(|project| project.ok_or(ApiError::EmptyResult)) {
            Ok(_) => {
                info!(
                    generation = request.generation,
                    name = %request.new_name,
                    "Project renamed"
                );
                on_renamed(&request.new_name);
                invalidator.invalidate(&CacheKey::Project(request.project_id));
                ApplyOutcome::Renamed(request.new_name)
            }
            Err(e) => {
                let message = e.user_message(RENAME_FAILED_MESSAGE);
                warn!(generation = request.generation, "Failed to rename project: {message}");
                notifier.notify_error(&message);
                if let EditState::Editing(input) = &mut self.state {
                    *input = TitleInput::new(&request.previous_name);
                }
                ApplyOutcome::Failed(message)
            }
        }
    }
}
