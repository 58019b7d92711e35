//! UI-agnostic widget state types
//!
//! These types are shared between the controller and whatever view renders
//! it (the terminal front end, or a test double).

use serde::{Deserialize, Serialize};

/// Visibility and request state of one widget instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WidgetState {
    pub open: bool,
    /// True exactly while one chat request is outstanding.
    pub loading: bool,
}

/// Who a rendered message is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
    Error,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::Error => "error",
        }
    }
}

/// A message as handed to the view: content is already formatted markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub content: String,
    pub role: ChatRole,
    pub timestamp: String,
}

/// Identifier of a transient "typing" placeholder block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceholderId(String);

impl PlaceholderId {
    pub fn generate() -> Self {
        Self(format!("loading-{}", uuid::Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlaceholderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
