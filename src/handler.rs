use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tickerchat::{Config, KeyAction, KeyPress};
use crate::app::{App, FocusPane};
use crate::tui::AppEvent;

pub async fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize => {}
        AppEvent::Tick => {
            app.tick_animation();
        }
        AppEvent::SendFinished(outcome) => {
            tracing::debug!(?outcome, "send finished");
            app.send_task = None;
        }
        AppEvent::TickerSet { ticker, result } => handle_ticker_set(app, &ticker, result),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    // Global keys that work in any focus
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('t') if ctrl => {
            app.toggle_chat();
            return;
        }
        KeyCode::Tab => {
            app.cycle_focus();
            return;
        }
        KeyCode::Esc if app.widget.is_open() => {
            app.toggle_chat();
            return;
        }
        KeyCode::F(n @ 1..=4) => {
            app.use_example(usize::from(n - 1));
            return;
        }
        KeyCode::PageUp => {
            app.scroll_up();
            return;
        }
        KeyCode::PageDown => {
            app.scroll_down();
            return;
        }
        _ => {}
    }

    match app.focus {
        FocusPane::Ticker => handle_ticker_editing(app, key),
        FocusPane::Input => handle_input_editing(app, key),
    }
}

fn handle_ticker_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_ticker(),
        KeyCode::Backspace => app.view.ticker_backspace(),
        KeyCode::Char(c) if !c.is_whitespace() && !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.view.ticker_insert_char(c.to_ascii_uppercase());
        }
        _ => {}
    }
}

fn handle_input_editing(app: &mut App, key: KeyEvent) {
    // Terminals rarely report Shift+Enter, so Alt+Enter also inserts a newline
    let shift = key
        .modifiers
        .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT);

    let press = match key.code {
        KeyCode::Enter => KeyPress::Enter { shift },
        _ => KeyPress::Other,
    };

    // Apply the edit first so the widget measures the new content
    match key.code {
        KeyCode::Enter if shift => app.view.insert_char('\n'),
        KeyCode::Enter => {}
        KeyCode::Backspace => app.view.backspace(),
        KeyCode::Delete => app.view.delete(),
        KeyCode::Left => app.view.cursor_left(),
        KeyCode::Right => app.view.cursor_right(),
        KeyCode::Home => app.view.cursor_home(),
        KeyCode::End => app.view.cursor_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.view.insert_char(c)
        }
        _ => return,
    }

    if app.widget.handle_key_press(press) == KeyAction::Send {
        app.start_send();
    }
}

fn handle_ticker_set(app: &mut App, ticker: &str, result: Result<tickerchat::TickerAck, String>) {
    match result {
        Ok(ack) if ack.success => {
            tracing::info!(%ticker, "ticker selected");
            app.status = Some(app.locale.ticker_saved(ticker));
            if let Err(e) = Config::save_default_ticker(ticker) {
                tracing::warn!("could not save default ticker: {:#}", e);
            }
        }
        Ok(ack) => {
            let detail = ack.error.or(ack.message).unwrap_or_default();
            tracing::warn!(%ticker, %detail, "backend rejected ticker");
            app.status = Some(app.locale.ticker_failed(&detail));
        }
        Err(e) => {
            tracing::warn!(%ticker, "set ticker failed: {}", e);
            app.status = Some(app.locale.ticker_failed(&e));
        }
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.scroll_down(),
        MouseEventKind::ScrollUp => app.scroll_up(),
        _ => {}
    }
}
