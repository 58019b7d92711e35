pub mod api;
pub mod config;
pub mod format;
pub mod locale;
pub mod scheduler;
pub mod state;
pub mod view;
pub mod widget;

// Re-export main types for convenience
pub use api::{ChatApi, ChatReply, ChatRequest, HttpChatApi, SessionConfig, TickerAck};
pub use config::Config;
pub use format::format_message;
pub use locale::Locale;
pub use scheduler::{Clock, LocalClock, ManualScheduler, Scheduler, TaskHandle, TokioScheduler};
pub use state::{ChatRole, PlaceholderId, RenderedMessage, WidgetState};
pub use view::{ChatView, Transcript};
pub use widget::{ChatWidget, IgnoreReason, KeyAction, KeyPress, SendOutcome, WidgetOptions};
