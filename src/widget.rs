//! The chat widget controller
//!
//! Owns the widget state (visibility, in-flight flag) and drives a
//! [`ChatView`] in response to user actions. The only asynchronous operation
//! is [`ChatWidget::send_message`]; everything else returns immediately.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::api::{ChatApi, ChatRequest};
use crate::config::Config;
use crate::format::format_message;
use crate::locale::Locale;
use crate::scheduler::{Clock, LocalClock, Scheduler, TaskHandle, TokioScheduler};
use crate::state::{ChatRole, PlaceholderId, RenderedMessage, WidgetState};
use crate::view::ChatView;

/// A key press as far as the input field is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPress {
    Enter { shift: bool },
    Other,
}

/// What the caller should do with the key after the widget saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Suppress the default edit and run `send_message`.
    Send,
    /// Let the default edit through.
    Default,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptyInput,
    Busy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Ignored(IgnoreReason),
    /// No ticker could be resolved; nothing was posted.
    MissingTicker,
    Answered,
    /// The backend replied with an error indicator.
    ServerError,
    /// The exchange never completed.
    TransportError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetOptions {
    pub locale: Locale,
    pub focus_delay: Duration,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            focus_delay: Duration::from_millis(100),
        }
    }
}

impl From<&Config> for WidgetOptions {
    fn from(config: &Config) -> Self {
        Self {
            locale: config.locale,
            focus_delay: config.focus_delay(),
        }
    }
}

pub struct ChatWidget<V, A, S = TokioScheduler, C = LocalClock> {
    view: Arc<V>,
    api: A,
    scheduler: S,
    clock: C,
    options: WidgetOptions,
    state: Mutex<WidgetState>,
    pending_focus: Mutex<Option<TaskHandle>>,
}

/// Holds the loading flag for one request and releases it, together with the
/// send control, when dropped.
struct LoadingGuard<'a, V: ChatView> {
    state: &'a Mutex<WidgetState>,
    view: &'a V,
}

impl<'a, V: ChatView> LoadingGuard<'a, V> {
    fn acquire(state: &'a Mutex<WidgetState>, view: &'a V) -> Option<Self> {
        {
            let mut state = lock(state);
            if state.loading {
                return None;
            }
            state.loading = true;
        }
        view.set_send_enabled(false);
        view.set_send_loading(true);
        Some(Self { state, view })
    }
}

impl<V: ChatView> Drop for LoadingGuard<'_, V> {
    fn drop(&mut self) {
        lock(self.state).loading = false;
        self.view.set_send_enabled(true);
        self.view.set_send_loading(false);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl<V, A, S, C> ChatWidget<V, A, S, C>
where
    V: ChatView + 'static,
    A: ChatApi,
    S: Scheduler,
    C: Clock,
{
    pub fn new(view: Arc<V>, api: A, scheduler: S, clock: C, options: WidgetOptions) -> Self {
        Self {
            view,
            api,
            scheduler,
            clock,
            options,
            state: Mutex::new(WidgetState::default()),
            pending_focus: Mutex::new(None),
        }
    }

    pub fn view(&self) -> &Arc<V> {
        &self.view
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn locale(&self) -> Locale {
        self.options.locale
    }

    pub fn state(&self) -> WidgetState {
        *lock(&self.state)
    }

    pub fn is_open(&self) -> bool {
        lock(&self.state).open
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Force the window closed, whatever the view currently shows.
    pub fn init(&self) {
        lock(&self.state).open = false;
        self.cancel_pending_focus();
        self.view.set_window_visible(false);
        self.view.set_toggle_active(false);
    }

    /// Flip visibility. Opening schedules an input focus after the configured
    /// delay; closing cancels it if it has not fired. Returns the new state.
    pub fn toggle(&self) -> bool {
        let open = {
            let mut state = lock(&self.state);
            state.open = !state.open;
            state.open
        };

        self.cancel_pending_focus();
        self.view.set_window_visible(open);
        self.view.set_toggle_active(open);

        if open {
            let view = Arc::clone(&self.view);
            let handle = self
                .scheduler
                .schedule(self.options.focus_delay, Box::new(move || view.focus_input()));
            *lock(&self.pending_focus) = Some(handle);
        }

        tracing::debug!(open, "chat window toggled");
        open
    }

    /// Put a preset question in the input, size it, and focus it.
    pub fn use_example(&self, question: &str) {
        self.view.set_input_value(question);
        self.fit_input_height();
        self.view.focus_input();
    }

    pub fn handle_key_press(&self, key: KeyPress) -> KeyAction {
        match key {
            KeyPress::Enter { shift: false } => KeyAction::Send,
            _ => {
                self.fit_input_height();
                KeyAction::Default
            }
        }
    }

    /// Send whatever is in the input and render the reply.
    ///
    /// Never fails: every error ends up as an error-styled message, and the
    /// loading flag and send control are restored on every exit path.
    pub async fn send_message(&self) -> SendOutcome {
        let message = self.view.input_value().trim().to_string();
        if message.is_empty() {
            return SendOutcome::Ignored(IgnoreReason::EmptyInput);
        }
        if self.is_loading() {
            return SendOutcome::Ignored(IgnoreReason::Busy);
        }

        let Some(ticker) = self.resolve_ticker().await else {
            self.render_message(self.options.locale.missing_ticker(), ChatRole::Error);
            return SendOutcome::MissingTicker;
        };

        // Re-checked under the lock: another send may have claimed the flag
        // while the ticker was being resolved.
        let Some(_loading) = LoadingGuard::acquire(&self.state, &*self.view) else {
            return SendOutcome::Ignored(IgnoreReason::Busy);
        };

        self.render_message(&message, ChatRole::User);
        self.view.set_input_value("");
        self.view.reset_input_height();
        let placeholder = self.render_placeholder();

        tracing::info!(%ticker, chars = message.chars().count(), "sending chat message");
        let request = ChatRequest { message, ticker };
        let result = self.api.send_message(&request).await;

        self.remove_placeholder(&placeholder);

        match result {
            Ok(reply) if reply.is_error() => {
                tracing::warn!(error = ?reply.error, "backend reported an error");
                let text = reply.error_text(self.options.locale.generic_error());
                self.render_message(&text, ChatRole::Error);
                SendOutcome::ServerError
            }
            Ok(reply) => {
                let text = reply.response.as_deref().unwrap_or_default();
                self.render_message(text, ChatRole::Assistant);
                SendOutcome::Answered
            }
            Err(e) => {
                tracing::warn!("chat request failed: {:#}", e);
                let text = self.options.locale.connection_error(&format!("{:#}", e));
                self.render_message(&text, ChatRole::Error);
                SendOutcome::TransportError
            }
        }
    }

    /// Ticker from the view's field if it has one, else from the session
    /// config endpoint. Fetch failures are logged and treated as "not found".
    pub async fn resolve_ticker(&self) -> Option<String> {
        if let Some(value) = self.view.ticker_value() {
            let ticker = value.trim();
            if !ticker.is_empty() {
                return Some(ticker.to_uppercase());
            }
        }

        match self.api.fetch_config().await {
            Ok(config) => config
                .ticker
                .filter(|t| !t.is_empty())
                .map(|t| t.to_uppercase()),
            Err(e) => {
                tracing::debug!("Could not fetch ticker from session: {:#}", e);
                None
            }
        }
    }

    pub fn render_message(&self, content: &str, role: ChatRole) -> RenderedMessage {
        self.view.remove_welcome();

        let message = RenderedMessage {
            content: format_message(content),
            role,
            timestamp: self.options.locale.format_time(self.clock.now()),
        };
        self.view.append_message(message.clone());
        self.view.scroll_to_bottom();
        message
    }

    pub fn render_placeholder(&self) -> PlaceholderId {
        let id = PlaceholderId::generate();
        self.view.append_placeholder(&id);
        self.view.scroll_to_bottom();
        id
    }

    /// No-op if the placeholder is already gone.
    pub fn remove_placeholder(&self, id: &PlaceholderId) {
        self.view.remove_placeholder(id);
    }

    fn fit_input_height(&self) {
        self.view.reset_input_height();
        let rows = self.view.input_scroll_height();
        self.view.set_input_height(rows);
    }

    fn cancel_pending_focus(&self) {
        if let Some(handle) = lock(&self.pending_focus).take() {
            handle.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ChatReply, SessionConfig, TickerAck};
    use crate::scheduler::{FixedClock, ManualScheduler};
    use crate::view::Transcript;
    use anyhow::{anyhow, Result};
    use async_trait::async_trait;
    use chrono::NaiveTime;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    enum ChatBehavior {
        Reply(ChatReply),
        Fail(&'static str),
    }

    struct FakeApi {
        chat: ChatBehavior,
        config_ticker: Option<Option<String>>,
        requests: Mutex<Vec<ChatRequest>>,
        config_calls: AtomicUsize,
        chat_gate: Option<Arc<Notify>>,
        config_gate: Option<Arc<Notify>>,
    }

    impl FakeApi {
        fn new(chat: ChatBehavior) -> Self {
            Self {
                chat,
                config_ticker: None,
                requests: Mutex::new(Vec::new()),
                config_calls: AtomicUsize::new(0),
                chat_gate: None,
                config_gate: None,
            }
        }

        fn answering(text: &str) -> Self {
            Self::new(ChatBehavior::Reply(ChatReply {
                response: Some(text.to_string()),
                ..Default::default()
            }))
        }

        fn with_config_ticker(mut self, ticker: Option<&str>) -> Self {
            self.config_ticker = Some(ticker.map(str::to_string));
            self
        }

        fn requests(&self) -> Vec<ChatRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ChatApi for FakeApi {
        async fn send_message(&self, request: &ChatRequest) -> Result<ChatReply> {
            self.requests.lock().unwrap().push(request.clone());
            if let Some(gate) = &self.chat_gate {
                gate.notified().await;
            }
            match &self.chat {
                ChatBehavior::Reply(reply) => Ok(reply.clone()),
                ChatBehavior::Fail(msg) => Err(anyhow!(*msg)),
            }
        }

        async fn fetch_config(&self) -> Result<SessionConfig> {
            self.config_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.config_gate {
                gate.notified().await;
            }
            match &self.config_ticker {
                Some(ticker) => Ok(SessionConfig {
                    ticker: ticker.clone(),
                }),
                None => Err(anyhow!("connection refused")),
            }
        }

        async fn set_ticker(&self, ticker: &str, _initialize_rag: bool) -> Result<TickerAck> {
            Ok(TickerAck {
                success: true,
                ticker: Some(ticker.to_string()),
                ..Default::default()
            })
        }
    }

    type TestWidget = ChatWidget<Transcript, FakeApi, ManualScheduler, FixedClock>;

    fn widget(ticker_field: Option<&str>, api: FakeApi) -> TestWidget {
        let view = Arc::new(Transcript::new(ticker_field.map(str::to_string), 5));
        let clock = FixedClock(NaiveTime::from_hms_opt(14, 7, 0).unwrap());
        ChatWidget::new(view, api, ManualScheduler::new(), clock, WidgetOptions::default())
    }

    #[tokio::test]
    async fn test_empty_or_whitespace_input_is_ignored() {
        let w = widget(Some("AAPL"), FakeApi::answering("x"));
        assert_eq!(w.send_message().await, SendOutcome::Ignored(IgnoreReason::EmptyInput));

        w.view().set_input_value("   \n ");
        assert_eq!(w.send_message().await, SendOutcome::Ignored(IgnoreReason::EmptyInput));

        let snap = w.view().snapshot();
        assert!(snap.entries.is_empty());
        assert!(snap.welcome);
        assert!(w.api().requests().is_empty());
        assert_eq!(w.api().config_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_send_posts_message_and_ticker() {
        let w = widget(Some("AAPL"), FakeApi::answering("Buy signal"));
        w.view().set_input_value("Hello");

        assert_eq!(w.send_message().await, SendOutcome::Answered);

        assert_eq!(
            w.api().requests(),
            vec![ChatRequest {
                message: "Hello".to_string(),
                ticker: "AAPL".to_string(),
            }]
        );
        assert_eq!(
            serde_json::to_value(&w.api().requests()[0]).unwrap(),
            serde_json::json!({"message": "Hello", "ticker": "AAPL"})
        );
    }

    #[tokio::test]
    async fn test_successful_reply_renders_assistant_message() {
        let w = widget(Some("AAPL"), FakeApi::answering("Buy signal"));
        w.view().set_input_value("Hello");
        w.send_message().await;

        let snap = w.view().snapshot();
        let assistant = snap.messages_with_role(ChatRole::Assistant);
        assert_eq!(assistant.len(), 1);
        assert!(assistant[0].content.contains("Buy signal"));
        assert_eq!(snap.messages_with_role(ChatRole::User)[0].content, "Hello");
        assert_eq!(snap.placeholders(), 0);
        assert!(!snap.welcome);
        assert_eq!(snap.input, "");
        assert_eq!(snap.input_height, 1);
    }

    #[tokio::test]
    async fn test_server_error_renders_error_message() {
        let api = FakeApi::new(ChatBehavior::Reply(ChatReply {
            error: Some("bad".into()),
            ..Default::default()
        }));
        let w = widget(Some("AAPL"), api);
        w.view().set_input_value("Hello");

        assert_eq!(w.send_message().await, SendOutcome::ServerError);

        let snap = w.view().snapshot();
        let errors = snap.messages_with_role(ChatRole::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].content, "bad");
        assert_eq!(snap.placeholders(), 0);
        assert!(snap.messages_with_role(ChatRole::Assistant).is_empty());
    }

    #[tokio::test]
    async fn test_server_error_prefers_response_text() {
        let api = FakeApi::new(ChatBehavior::Reply(ChatReply {
            error: Some("Query failed".into()),
            response: Some("**Erreur** lors de la génération".to_string()),
            ticker: None,
        }));
        let w = widget(Some("AAPL"), api);
        w.view().set_input_value("Hello");
        w.send_message().await;

        let snap = w.view().snapshot();
        assert_eq!(
            snap.messages_with_role(ChatRole::Error)[0].content,
            "<strong>Erreur</strong> lors de la génération"
        );
    }

    #[tokio::test]
    async fn test_boolean_error_flag_is_a_server_error() {
        let reply: ChatReply =
            serde_json::from_value(serde_json::json!({"error": true, "response": "x"})).unwrap();
        let w = widget(Some("AAPL"), FakeApi::new(ChatBehavior::Reply(reply)));
        w.view().set_input_value("Hello");

        assert_eq!(w.send_message().await, SendOutcome::ServerError);

        let snap = w.view().snapshot();
        let errors = snap.messages_with_role(ChatRole::Error);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].content, "x");
        assert!(snap.messages_with_role(ChatRole::Assistant).is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_renders_one_error_and_restores_state() {
        let w = widget(Some("AAPL"), FakeApi::new(ChatBehavior::Fail("Failed to fetch")));
        w.view().set_input_value("Hello");

        assert_eq!(w.send_message().await, SendOutcome::TransportError);

        let snap = w.view().snapshot();
        let errors = snap.messages_with_role(ChatRole::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].content.contains("Failed to fetch"));
        assert!(errors[0].content.starts_with("Erreur de connexion"));
        assert_eq!(snap.placeholders(), 0);
        assert!(snap.send_enabled);
        assert!(!snap.send_loading);
        assert!(!w.is_loading());
    }

    #[tokio::test]
    async fn test_state_restored_after_every_outcome() {
        let behaviors = vec![
            ChatBehavior::Reply(ChatReply {
                response: Some("ok".to_string()),
                ..Default::default()
            }),
            ChatBehavior::Reply(ChatReply {
                error: Some("bad".into()),
                ..Default::default()
            }),
            ChatBehavior::Fail("reset by peer"),
        ];

        for behavior in behaviors {
            let w = widget(Some("AAPL"), FakeApi::new(behavior));
            w.view().set_input_value("Hello");
            w.send_message().await;

            let snap = w.view().snapshot();
            assert!(!w.is_loading());
            assert!(snap.send_enabled);
            assert!(!snap.send_loading);
        }
    }

    #[tokio::test]
    async fn test_missing_ticker_renders_error_without_posting() {
        // No field, config fetch fails
        let w = widget(None, FakeApi::answering("x"));
        w.view().set_input_value("Hello");
        assert_eq!(w.send_message().await, SendOutcome::MissingTicker);

        let snap = w.view().snapshot();
        let errors = snap.messages_with_role(ChatRole::Error);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].content.contains("sélectionner un symbole"));
        assert!(w.api().requests().is_empty());
        assert_eq!(snap.input, "Hello");
        assert!(!w.is_loading());

        // Blank field, config returns no ticker
        let w = widget(Some("  "), FakeApi::answering("x").with_config_ticker(Some("")));
        w.view().set_input_value("Hello");
        assert_eq!(w.send_message().await, SendOutcome::MissingTicker);
        assert!(w.api().requests().is_empty());
        assert_eq!(w.api().config_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_ticker_resolution_order() {
        let w = widget(Some(" aapl "), FakeApi::answering("x").with_config_ticker(Some("msft")));
        assert_eq!(w.resolve_ticker().await.as_deref(), Some("AAPL"));
        assert_eq!(w.api().config_calls.load(Ordering::SeqCst), 0);

        let w = widget(None, FakeApi::answering("x").with_config_ticker(Some("msft")));
        assert_eq!(w.resolve_ticker().await.as_deref(), Some("MSFT"));

        let w = widget(None, FakeApi::answering("x").with_config_ticker(None));
        assert_eq!(w.resolve_ticker().await, None);
    }

    #[tokio::test]
    async fn test_send_while_loading_makes_no_second_request() {
        let gate = Arc::new(Notify::new());
        let mut api = FakeApi::answering("done");
        api.chat_gate = Some(gate.clone());
        let w = Arc::new(widget(Some("AAPL"), api));

        w.view().set_input_value("first");
        let first = tokio::spawn({
            let w = w.clone();
            async move { w.send_message().await }
        });

        while w.api().requests().is_empty() {
            tokio::task::yield_now().await;
        }
        assert!(w.is_loading());
        let snap = w.view().snapshot();
        assert_eq!(snap.placeholders(), 1);
        assert!(!snap.send_enabled);
        assert!(snap.send_loading);

        w.view().set_input_value("second");
        assert_eq!(w.send_message().await, SendOutcome::Ignored(IgnoreReason::Busy));
        assert_eq!(w.api().requests().len(), 1);

        gate.notify_one();
        assert_eq!(first.await.unwrap(), SendOutcome::Answered);
        assert!(!w.is_loading());
        assert_eq!(w.api().requests().len(), 1);
    }

    #[tokio::test]
    async fn test_racing_sends_during_ticker_fetch_post_once() {
        let config_gate = Arc::new(Notify::new());
        let chat_gate = Arc::new(Notify::new());
        let mut api = FakeApi::answering("done").with_config_ticker(Some("aapl"));
        api.config_gate = Some(config_gate.clone());
        api.chat_gate = Some(chat_gate.clone());
        let w = Arc::new(widget(None, api));
        w.view().set_input_value("Hello");

        let spawn_send = |w: Arc<TestWidget>| tokio::spawn(async move { w.send_message().await });
        let a = spawn_send(w.clone());
        let b = spawn_send(w.clone());

        while w.api().config_calls.load(Ordering::SeqCst) < 2 {
            tokio::task::yield_now().await;
        }
        config_gate.notify_waiters();

        while !(a.is_finished() || b.is_finished()) {
            tokio::task::yield_now().await;
        }
        assert_eq!(w.api().requests().len(), 1);

        chat_gate.notify_one();
        let mut outcomes = vec![a.await.unwrap(), b.await.unwrap()];
        outcomes.sort_by_key(|o| format!("{:?}", o));
        assert_eq!(
            outcomes,
            vec![SendOutcome::Answered, SendOutcome::Ignored(IgnoreReason::Busy)]
        );
        assert_eq!(w.api().requests().len(), 1);
        assert!(!w.is_loading());
    }

    #[test]
    fn test_toggle_schedules_focus_after_delay() {
        let w = widget(None, FakeApi::answering("x"));
        w.init();

        assert!(w.toggle());
        let snap = w.view().snapshot();
        assert!(snap.window_visible);
        assert!(snap.toggle_active);
        assert!(!snap.input_focused);

        w.scheduler().advance(Duration::from_millis(99));
        assert!(!w.view().snapshot().input_focused);
        w.scheduler().advance(Duration::from_millis(1));
        assert!(w.view().snapshot().input_focused);
    }

    #[test]
    fn test_closing_cancels_pending_focus() {
        let w = widget(None, FakeApi::answering("x"));
        assert!(w.toggle());
        assert!(!w.toggle());

        let snap = w.view().snapshot();
        assert!(!snap.window_visible);
        assert!(!snap.toggle_active);
        assert_eq!(w.scheduler().advance(Duration::from_secs(1)), 0);
        assert!(!w.view().snapshot().input_focused);
    }

    #[test]
    fn test_init_forces_window_closed() {
        let w = widget(None, FakeApi::answering("x"));
        assert!(w.view().snapshot().window_visible);
        w.toggle();
        w.init();

        assert!(!w.is_open());
        assert!(!w.view().snapshot().window_visible);
        // Next toggle opens again
        assert!(w.toggle());
    }

    #[test]
    fn test_use_example_fills_sizes_and_focuses() {
        let w = widget(None, FakeApi::answering("x"));
        w.use_example("Quels sont les risques ?\nEt les opportunités ?");

        let snap = w.view().snapshot();
        assert_eq!(snap.input, "Quels sont les risques ?\nEt les opportunités ?");
        assert_eq!(snap.input_height, 2);
        assert!(snap.input_focused);
    }

    #[test]
    fn test_key_press_handling() {
        let w = widget(None, FakeApi::answering("x"));
        assert_eq!(w.handle_key_press(KeyPress::Enter { shift: false }), KeyAction::Send);

        w.view().set_input_value("a\nb\nc");
        assert_eq!(w.handle_key_press(KeyPress::Enter { shift: true }), KeyAction::Default);
        assert_eq!(w.view().snapshot().input_height, 3);

        w.view().set_input_value("a");
        assert_eq!(w.handle_key_press(KeyPress::Other), KeyAction::Default);
        assert_eq!(w.view().snapshot().input_height, 1);
    }

    #[test]
    fn test_render_message_formats_and_stamps() {
        let w = widget(None, FakeApi::answering("x"));
        let message = w.render_message("**bold** and *italic*\nline2", ChatRole::Assistant);

        assert_eq!(message.content, "<strong>bold</strong> and <em>italic</em><br>line2");
        assert_eq!(message.timestamp, "14:07");
        let snap = w.view().snapshot();
        assert!(!snap.welcome);
        assert!(snap.pin_to_bottom);
        assert_eq!(snap.messages().count(), 1);
    }

    #[test]
    fn test_placeholder_removal_is_idempotent() {
        let w = widget(None, FakeApi::answering("x"));
        let id = w.render_placeholder();
        assert_eq!(w.view().snapshot().placeholders(), 1);
        w.remove_placeholder(&id);
        w.remove_placeholder(&id);
        assert_eq!(w.view().snapshot().placeholders(), 0);
    }

    #[tokio::test]
    async fn test_english_locale_messages() {
        let view = Arc::new(Transcript::new(None, 5));
        let clock = FixedClock(NaiveTime::from_hms_opt(14, 7, 0).unwrap());
        let options = WidgetOptions {
            locale: Locale::En,
            ..Default::default()
        };
        let w = ChatWidget::new(view, FakeApi::answering("x"), ManualScheduler::new(), clock, options);
        w.view().set_input_value("Hello");

        assert_eq!(w.send_message().await, SendOutcome::MissingTicker);
        let snap = w.view().snapshot();
        let error = &snap.messages_with_role(ChatRole::Error)[0];
        assert!(error.content.starts_with("Please select a ticker"));
        assert_eq!(error.timestamp, "02:07 PM");
    }
}
