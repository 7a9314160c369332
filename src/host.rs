//! Trait seams onto the host editor.
//!
//! Everything a command handler needs from the embedding editor goes through
//! these traits: prompts, notifications, clipboard, URL opening, metadata
//! edits and output surfaces. The editor supplies the implementations; tests
//! use scripted fakes.

use crate::notebook::MetadataMap;
use anyhow::Result;

/// Options shown alongside an input box prompt.
#[derive(Debug, Clone, Default)]
pub struct InputBoxOptions {
    /// Short title for the prompt (e.g. "Module name").
    pub title: String,
    /// Pre-filled value, usually the current metadata value or its default.
    pub value: String,
    /// Longer guidance text displayed with the input box.
    pub prompt: String,
}

/// One entry in a quick-pick list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickItem {
    /// The text to display.
    pub label: String,
    /// The value recorded when this entry is chosen.
    pub value: String,
}

impl PickItem {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Interactive facilities of the host editor.
///
/// `input_box` and `quick_pick` return `None` when the user dismisses the
/// prompt; handlers treat that as "no change".
pub trait EditorEnv {
    /// Ask the user for a line of text. `None` means cancelled.
    fn input_box(&mut self, options: InputBoxOptions) -> Option<String>;

    /// Ask the user to pick one entry. Returns the index into `items`,
    /// or `None` when dismissed.
    fn quick_pick(&mut self, items: &[PickItem]) -> Option<usize>;

    /// Show a user-facing error notification.
    fn show_error(&mut self, message: &str);

    /// Show a user-facing information notification.
    fn show_info(&mut self, message: &str);

    /// Hand a URL to the environment's opener. The URL is not validated.
    fn open_external(&mut self, url: &str);

    /// Place text on the clipboard.
    fn write_clipboard(&mut self, text: &str);
}

/// The host editor's notebook document edit API.
///
/// Edits replace the cell's whole metadata map in one operation; concurrent
/// edits are not coordinated and the last write wins, matching the host's
/// own document-edit semantics.
pub trait NotebookHost {
    /// Replace the metadata of the cell at `cell_index`.
    fn update_cell_metadata(&mut self, cell_index: usize, metadata: MetadataMap) -> Result<()>;

    /// Re-execute the cell at `cell_index`.
    fn run_cell(&mut self, cell_index: usize) -> Result<()>;
}

/// A line-oriented output surface (e.g. an editor output panel).
pub trait OutputChannel {
    /// Drop any previously emitted lines.
    fn clear(&mut self);

    /// Emit one line.
    fn append_line(&mut self, line: &str);

    /// Reveal the surface to the user.
    fn show(&mut self);
}

/// In-memory `OutputChannel` for hosts without a panel of their own.
#[derive(Debug, Default)]
pub struct BufferedOutputChannel {
    lines: Vec<String>,
    visible: bool,
}

impl BufferedOutputChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines emitted since the last `clear`.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether `show` has been called since the last `clear`.
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl OutputChannel for BufferedOutputChannel {
    fn clear(&mut self) {
        self.lines.clear();
        self.visible = false;
    }

    fn append_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn show(&mut self) {
        self.visible = true;
    }
}
