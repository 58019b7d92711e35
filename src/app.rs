use std::sync::Arc;

use tickerchat::{ChatApi, ChatWidget, Config, HttpChatApi, LocalClock, Locale, TokioScheduler, Transcript, WidgetOptions};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::tui::AppEvent;

pub type Widget = ChatWidget<Transcript, HttpChatApi, TokioScheduler, LocalClock>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    /// The sidebar ticker field
    Ticker,
    /// The chat input (only reachable while the window is open)
    Input,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub focus: FocusPane,
    pub locale: Locale,

    // Widget
    pub widget: Arc<Widget>,
    pub view: Arc<Transcript>,
    pub send_task: Option<JoinHandle<()>>,
    pub examples: Vec<String>,

    // Chat scroll state
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of message area for scroll calculations
    pub chat_width: u16,  // Width of message area for wrap calculations

    // Footer status line (ticker commits)
    pub status: Option<String>,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub events: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(config: &Config, events: mpsc::UnboundedSender<AppEvent>) -> Self {
        let view = Arc::new(Transcript::new(
            Some(config.default_ticker.clone().unwrap_or_default()),
            config.max_input_rows,
        ));
        let api = HttpChatApi::new(&config.base_url);
        let widget = ChatWidget::new(
            Arc::clone(&view),
            api,
            TokioScheduler,
            LocalClock,
            WidgetOptions::from(config),
        );

        Self {
            should_quit: false,
            focus: FocusPane::Ticker,
            locale: config.locale,
            widget: Arc::new(widget),
            view,
            send_task: None,
            examples: config.examples.clone(),
            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            status: None,
            animation_frame: 0,
            events,
        }
    }

    pub fn toggle_chat(&mut self) {
        let open = self.widget.toggle();
        self.focus = if open { FocusPane::Input } else { FocusPane::Ticker };
        self.view.set_input_focused(false);
    }

    pub fn cycle_focus(&mut self) {
        self.focus = match self.focus {
            FocusPane::Ticker if self.widget.is_open() => FocusPane::Input,
            _ => FocusPane::Ticker,
        };
        self.view.set_input_focused(self.focus == FocusPane::Input);
    }

    /// Run a send in the background; the outcome comes back as `AppEvent::SendFinished`.
    pub fn start_send(&mut self) {
        if self.widget.is_loading() {
            return;
        }

        let widget = Arc::clone(&self.widget);
        let tx = self.events.clone();
        self.send_task = Some(tokio::spawn(async move {
            let outcome = widget.send_message().await;
            let _ = tx.send(AppEvent::SendFinished(outcome));
        }));
    }

    /// Post the ticker field to the backend; the result comes back as `AppEvent::TickerSet`.
    pub fn commit_ticker(&mut self) {
        let ticker = match self.view.snapshot().ticker {
            Some(t) if !t.trim().is_empty() => t.trim().to_uppercase(),
            _ => return,
        };

        let widget = Arc::clone(&self.widget);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = widget
                .api()
                .set_ticker(&ticker, true)
                .await
                .map_err(|e| format!("{:#}", e));
            let _ = tx.send(AppEvent::TickerSet { ticker, result });
        });
    }

    pub fn use_example(&mut self, index: usize) {
        let Some(question) = self.examples.get(index).cloned() else {
            return;
        };
        if !self.widget.is_open() {
            self.toggle_chat();
        }
        self.focus = FocusPane::Input;
        self.widget.use_example(&question);
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.widget.is_loading() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(3);
    }

    pub fn scroll_down(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_add(3);
    }

    /// Scroll so the last of `total_lines` rendered lines is visible
    pub fn scroll_chat_to_bottom(&mut self, total_lines: u16) {
        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }
}
