use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use tickerchat::view::{Entry, TranscriptState};
use tickerchat::ChatRole;
use crate::app::{App, FocusPane};

const TAGS: [&str; 4] = ["<strong>", "</strong>", "<em>", "</em>"];

/// Convert formatted message markup into styled lines: `<br>` splits lines,
/// `<strong>`/`<em>` toggle bold and italic. Anything else is literal text.
pub fn parse_markup(markup: &str) -> Vec<Line<'static>> {
    markup.split("<br>").map(parse_markup_line).collect()
}

fn parse_markup_line(text: &str) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current_text = String::new();
    let mut bold = false;
    let mut italic = false;
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(tag) = TAGS.iter().find(|t| rest.starts_with(**t)) {
            // Push any accumulated text with the style in effect before the tag
            if !current_text.is_empty() {
                spans.push(Span::styled(
                    std::mem::take(&mut current_text),
                    markup_style(bold, italic),
                ));
            }
            match *tag {
                "<strong>" => bold = true,
                "</strong>" => bold = false,
                "<em>" => italic = true,
                _ => italic = false,
            }
            rest = &rest[tag.len()..];
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                current_text.push(c);
            }
            rest = chars.as_str();
        }
    }

    if !current_text.is_empty() {
        spans.push(Span::styled(current_text, markup_style(bold, italic)));
    }

    if spans.is_empty() {
        Line::default()
    } else {
        Line::from(spans)
    }
}

fn markup_style(bold: bool, italic: bool) -> Style {
    let mut style = Style::default();
    if bold {
        style = style.add_modifier(Modifier::BOLD);
    }
    if italic {
        style = style.add_modifier(Modifier::ITALIC);
    }
    style
}

fn role_color(role: ChatRole) -> Color {
    match role {
        ChatRole::User => Color::Cyan,
        ChatRole::Assistant => Color::Yellow,
        ChatRole::Error => Color::Red,
    }
}

/// Rows a set of lines occupies once wrapped to `width`
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    lines
        .iter()
        .map(|line| {
            let w = line.width();
            if w == 0 { 1 } else { w.div_ceil(width) }
        })
        .sum::<usize>()
        .min(usize::from(u16::MAX)) as u16
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();
    let snap = app.view.snapshot();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, &snap, frame, header_area);

    let [sidebar_area, main_area] = Layout::horizontal([
        Constraint::Length(26),
        Constraint::Min(0),
    ])
    .areas(body_area);

    render_sidebar(app, &snap, frame, sidebar_area);

    if snap.window_visible {
        render_chat_window(app, &snap, frame, main_area);
    } else {
        render_closed(app, &snap, frame, main_area);
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, snap: &TranscriptState, frame: &mut Frame, area: Rect) {
    let ticker = snap
        .ticker
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(|t| format!(" [{}]", t.to_uppercase()))
        .unwrap_or_default();

    let title = Line::from(vec![
        Span::styled(" tickerchat ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(ticker, Style::default().fg(Color::Yellow)),
        Span::raw(" "),
        Span::styled(
            format!("v{} · {}", env!("CARGO_PKG_VERSION"), app.locale.as_str()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_sidebar(app: &App, snap: &TranscriptState, frame: &mut Frame, area: Rect) {
    let [ticker_area, examples_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let focused = app.focus == FocusPane::Ticker;
    let ticker_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Yellow } else { Color::DarkGray }))
        .title(format!(" {} ", app.locale.ticker_field()));

    let ticker = snap.ticker.clone().unwrap_or_default();
    frame.render_widget(
        Paragraph::new(ticker).style(Style::default().fg(Color::Cyan)).block(ticker_block),
        ticker_area,
    );

    if focused {
        let cursor_x = (snap.ticker_cursor as u16).min(ticker_area.width.saturating_sub(3));
        frame.set_cursor_position((ticker_area.x + cursor_x + 1, ticker_area.y + 1));
    }

    let items: Vec<Line> = app
        .examples
        .iter()
        .take(4)
        .enumerate()
        .map(|(i, q)| {
            Line::from(vec![
                Span::styled(format!("F{} ", i + 1), Style::default().fg(Color::Yellow)),
                Span::raw(q.clone()),
            ])
        })
        .collect();

    let examples = Paragraph::new(items)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)))
        .wrap(Wrap { trim: true });
    frame.render_widget(examples, examples_area);
}

fn render_closed(app: &App, snap: &TranscriptState, frame: &mut Frame, area: Rect) {
    let [hint_area, button_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    let hint = Paragraph::new(app.locale.open_hint())
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(hint, hint_area);

    let button_style = if snap.toggle_active {
        Style::default().fg(Color::Black).bg(Color::Cyan)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let [_, button_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(12),
    ])
    .areas(button_area);
    let button = Paragraph::new(" 💬 Chat ")
        .style(button_style)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(button, button_area);
}

fn render_chat_window(app: &mut App, snap: &TranscriptState, frame: &mut Frame, area: Rect) {
    let input_rows = snap.input_height.max(1);
    let [messages_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(input_rows.saturating_add(2)),
    ])
    .areas(area);

    // Store message area dimensions for scroll calculations (inner size minus borders)
    app.chat_height = messages_area.height.saturating_sub(2);
    app.chat_width = messages_area.width.saturating_sub(2);

    let mut lines: Vec<Line> = Vec::new();

    if snap.welcome {
        lines.push(Line::from(Span::styled(
            app.locale.welcome(),
            Style::default().fg(Color::DarkGray),
        )));
    }

    for entry in &snap.entries {
        match entry {
            Entry::Message(msg) => {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{}:", app.locale.role_label(msg.role)),
                        Style::default().fg(role_color(msg.role)).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(format!(" {}", msg.timestamp), Style::default().fg(Color::DarkGray)),
                ]));
                let body = parse_markup(&msg.content);
                if msg.role == ChatRole::Error {
                    lines.extend(body.into_iter().map(|l| l.style(Style::default().fg(Color::Red))));
                } else {
                    lines.extend(body);
                }
                lines.push(Line::default());
            }
            Entry::Placeholder(_) => {
                lines.push(Line::from(Span::styled(
                    format!("{}:", app.locale.role_label(ChatRole::Assistant)),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                )));
                // Animated ellipsis: cycles through ".", "..", "..."
                let dots = ".".repeat((app.animation_frame as usize) + 1);
                lines.push(Line::from(Span::styled(
                    format!("{}{}", app.locale.typing(), dots),
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
                )));
            }
        }
    }

    if app.view.take_pin_to_bottom() {
        let total = wrapped_height(&lines, app.chat_width);
        app.scroll_chat_to_bottom(total);
    }

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Assistant (Esc to close, PgUp/PgDn to scroll) ");

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: false })
        .scroll((app.chat_scroll, 0));
    frame.render_widget(chat, messages_area);

    // Input with the send control state in its title
    let input_focused = app.focus == FocusPane::Input;
    let border_color = if snap.send_loading {
        Color::DarkGray
    } else if input_focused {
        Color::Yellow
    } else {
        Color::DarkGray
    };
    let send_label = match (snap.send_enabled, snap.send_loading) {
        (_, true) => " ⏳ ",
        (true, false) => " Enter ➤ ",
        (false, false) => " ✕ ",
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Message (Alt+Enter: newline) ")
        .title_bottom(Line::from(send_label).right_aligned());

    // Keep the cursor line visible when the input has more lines than rows
    let before_cursor: String = snap.input.chars().take(snap.input_cursor).collect();
    let cursor_row = before_cursor.matches('\n').count() as u16;
    let cursor_col = before_cursor
        .rsplit('\n')
        .next()
        .map(|l| l.chars().count())
        .unwrap_or(0) as u16;
    let input_scroll = cursor_row.saturating_sub(input_rows.saturating_sub(1));

    let input = Paragraph::new(snap.input.as_str())
        .style(Style::default().fg(Color::Cyan))
        .block(input_block)
        .scroll((input_scroll, 0));
    frame.render_widget(input, input_area);

    if input_focused && snap.input_focused {
        let inner_width = input_area.width.saturating_sub(2);
        frame.set_cursor_position((
            input_area.x + 1 + cursor_col.min(inner_width.saturating_sub(1)),
            input_area.y + 1 + (cursor_row - input_scroll),
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" Ctrl+T ", Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::raw(" chat "),
        Span::styled(" Tab ", Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::raw(" focus "),
        Span::styled(" Ctrl+C ", Style::default().fg(Color::Black).bg(Color::Cyan)),
        Span::raw(" quit "),
    ];

    if let Some(status) = &app.status {
        spans.push(Span::styled(format!(" {}", status), Style::default().fg(Color::Yellow)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
