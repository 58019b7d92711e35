//! View adapter for the chat widget
//!
//! `ChatView` names every element the controller touches. `Transcript` is the
//! in-memory implementation the terminal front end renders from; it also
//! serves as the test double for the controller.

use std::sync::{Mutex, MutexGuard};

use crate::state::{ChatRole, PlaceholderId, RenderedMessage};

/// The elements the widget controller reads and writes.
///
/// Methods take `&self`: implementations hold their own interior state, the
/// same way page elements are shared handles.
pub trait ChatView: Send + Sync {
    fn set_window_visible(&self, visible: bool);
    fn set_toggle_active(&self, active: bool);

    fn input_value(&self) -> String;
    fn set_input_value(&self, value: &str);
    /// Collapse the input to its minimum height before measuring.
    fn reset_input_height(&self);
    /// Height the current input content needs, in rows.
    fn input_scroll_height(&self) -> u16;
    fn set_input_height(&self, rows: u16);
    fn focus_input(&self);

    /// Value of the ticker field, or `None` when the page has no such field.
    fn ticker_value(&self) -> Option<String>;

    fn set_send_enabled(&self, enabled: bool);
    fn set_send_loading(&self, loading: bool);

    /// Remove the initial welcome block. No-op once removed.
    fn remove_welcome(&self);
    fn append_message(&self, message: RenderedMessage);
    fn append_placeholder(&self, id: &PlaceholderId);
    /// Returns whether a placeholder with this id was present.
    fn remove_placeholder(&self, id: &PlaceholderId) -> bool;
    fn scroll_to_bottom(&self);
}

/// One block in the messages container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Message(RenderedMessage),
    Placeholder(PlaceholderId),
}

/// Everything a renderer needs, copied out under one lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptState {
    pub window_visible: bool,
    pub toggle_active: bool,
    pub welcome: bool,
    pub entries: Vec<Entry>,
    /// Set by `scroll_to_bottom`, cleared by the renderer once honored.
    pub pin_to_bottom: bool,

    pub input: String,
    /// Cursor position in chars, not bytes.
    pub input_cursor: usize,
    pub input_height: u16,
    pub input_focused: bool,

    /// `None` when the ticker field is not part of the layout.
    pub ticker: Option<String>,
    pub ticker_cursor: usize,

    pub send_enabled: bool,
    pub send_loading: bool,
}

impl TranscriptState {
    pub fn messages(&self) -> impl Iterator<Item = &RenderedMessage> {
        self.entries.iter().filter_map(|e| match e {
            Entry::Message(m) => Some(m),
            Entry::Placeholder(_) => None,
        })
    }

    pub fn messages_with_role(&self, role: ChatRole) -> Vec<&RenderedMessage> {
        self.messages().filter(|m| m.role == role).collect()
    }

    pub fn placeholders(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Placeholder(_)))
            .count()
    }
}

/// In-memory chat window.
pub struct Transcript {
    state: Mutex<TranscriptState>,
    max_input_rows: u16,
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

impl Transcript {
    /// A window with a welcome block and, if `ticker` is `Some`, a ticker field
    /// prefilled with it.
    pub fn new(ticker: Option<String>, max_input_rows: u16) -> Self {
        let ticker_cursor = ticker.as_ref().map(|t| t.chars().count()).unwrap_or(0);
        Self {
            state: Mutex::new(TranscriptState {
                window_visible: true,
                toggle_active: false,
                welcome: true,
                entries: Vec::new(),
                pin_to_bottom: false,
                input: String::new(),
                input_cursor: 0,
                input_height: 1,
                input_focused: false,
                ticker,
                ticker_cursor,
                send_enabled: true,
                send_loading: false,
            }),
            max_input_rows: max_input_rows.max(1),
        }
    }

    pub fn snapshot(&self) -> TranscriptState {
        self.lock().clone()
    }

    /// Returns whether the view asked to be scrolled to the bottom since the
    /// last call.
    pub fn take_pin_to_bottom(&self) -> bool {
        std::mem::take(&mut self.lock().pin_to_bottom)
    }

    pub fn set_input_focused(&self, focused: bool) {
        self.lock().input_focused = focused;
    }

    // Input editing

    pub fn insert_char(&self, c: char) {
        let mut state = self.lock();
        let byte_pos = char_to_byte_index(&state.input, state.input_cursor);
        state.input.insert(byte_pos, c);
        state.input_cursor += 1;
    }

    pub fn backspace(&self) {
        let mut state = self.lock();
        if state.input_cursor > 0 {
            state.input_cursor -= 1;
            let byte_pos = char_to_byte_index(&state.input, state.input_cursor);
            state.input.remove(byte_pos);
        }
    }

    pub fn delete(&self) {
        let mut state = self.lock();
        if state.input_cursor < state.input.chars().count() {
            let byte_pos = char_to_byte_index(&state.input, state.input_cursor);
            state.input.remove(byte_pos);
        }
    }

    pub fn cursor_left(&self) {
        let mut state = self.lock();
        state.input_cursor = state.input_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&self) {
        let mut state = self.lock();
        state.input_cursor = (state.input_cursor + 1).min(state.input.chars().count());
    }

    pub fn cursor_home(&self) {
        self.lock().input_cursor = 0;
    }

    pub fn cursor_end(&self) {
        let mut state = self.lock();
        state.input_cursor = state.input.chars().count();
    }

    // Ticker field editing

    pub fn ticker_insert_char(&self, c: char) {
        let mut guard = self.lock();
        let state = &mut *guard;
        let cursor = state.ticker_cursor;
        if let Some(ticker) = state.ticker.as_mut() {
            let byte_pos = char_to_byte_index(ticker, cursor);
            ticker.insert(byte_pos, c);
            state.ticker_cursor += 1;
        }
    }

    pub fn ticker_backspace(&self) {
        let mut guard = self.lock();
        let state = &mut *guard;
        let cursor = state.ticker_cursor;
        if cursor == 0 {
            return;
        }
        if let Some(ticker) = state.ticker.as_mut() {
            let byte_pos = char_to_byte_index(ticker, cursor - 1);
            ticker.remove(byte_pos);
            state.ticker_cursor -= 1;
        }
    }

    fn lock(&self) -> MutexGuard<'_, TranscriptState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ChatView for Transcript {
    fn set_window_visible(&self, visible: bool) {
        self.lock().window_visible = visible;
    }

    fn set_toggle_active(&self, active: bool) {
        self.lock().toggle_active = active;
    }

    fn input_value(&self) -> String {
        self.lock().input.clone()
    }

    fn set_input_value(&self, value: &str) {
        let mut state = self.lock();
        state.input = value.to_string();
        state.input_cursor = value.chars().count();
    }

    fn reset_input_height(&self) {
        self.lock().input_height = 1;
    }

    fn input_scroll_height(&self) -> u16 {
        let state = self.lock();
        let rows = state.input.split('\n').count().max(1);
        (rows as u16).min(self.max_input_rows)
    }

    fn set_input_height(&self, rows: u16) {
        self.lock().input_height = rows.clamp(1, self.max_input_rows);
    }

    fn focus_input(&self) {
        self.lock().input_focused = true;
    }

    fn ticker_value(&self) -> Option<String> {
        self.lock().ticker.clone()
    }

    fn set_send_enabled(&self, enabled: bool) {
        self.lock().send_enabled = enabled;
    }

    fn set_send_loading(&self, loading: bool) {
        self.lock().send_loading = loading;
    }

    fn remove_welcome(&self) {
        self.lock().welcome = false;
    }

    fn append_message(&self, message: RenderedMessage) {
        self.lock().entries.push(Entry::Message(message));
    }

    fn append_placeholder(&self, id: &PlaceholderId) {
        self.lock().entries.push(Entry::Placeholder(id.clone()));
    }

    fn remove_placeholder(&self, id: &PlaceholderId) -> bool {
        let mut state = self.lock();
        let before = state.entries.len();
        state
            .entries
            .retain(|e| !matches!(e, Entry::Placeholder(p) if p == id));
        state.entries.len() != before
    }

    fn scroll_to_bottom(&self) {
        self.lock().pin_to_bottom = true;
    }
}
