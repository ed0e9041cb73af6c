use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Tabs, Wrap},
    Frame,
};
use crate::application::{Feedback, Session, View};
use crate::domain::{format_duration, IpFamily, Measurement, StatusClass};

pub const MIN_WIDTH: u16 = 90;
pub const MIN_HEIGHT: u16 = 28;

const PLACEHOLDER: &str = "https://google.com";
const SUBDUED: Color = Color::DarkGray;
const HIGHLIGHT: Color = Color::Magenta;

const HELP_ITEMS: [(&str, &str); 6] = [
    ("DNS Lookup", "Time spent resolving the host name to its IP address(es). Zero when the URL already contains an IP."),
    ("TCP Connection", "Time to open a TCP connection to the chosen address."),
    ("TLS Handshake", "Time for both sides to agree on protocol version, cipher and keys. Zero for plain http:// targets."),
    ("Server Processing", "From the connection being ready until the first response byte. Includes sending the request and one network round trip."),
    ("Content Transfer", "From the first response byte until the response was read completely."),
    ("Total", "Wall time of the whole request, from before the DNS lookup to the last byte."),
];

pub fn draw(f: &mut Frame, session: &Session) {
    let area = f.area();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        draw_too_small(f, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    let titles: Vec<Line> = View::ALL.iter().map(|v| Line::from(v.title())).collect();
    let tabs = Tabs::new(titles)
        .select(session.view().index())
        .block(Block::default().borders(Borders::ALL).title("resptime"))
        .highlight_style(Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD));
    f.render_widget(tabs, chunks[0]);

    match session.view() {
        View::Request => draw_request(f, chunks[1], session),
        View::History => draw_history(f, chunks[1], session),
        View::Help => draw_help(f, chunks[1]),
        View::About => draw_about(f, chunks[1]),
    }

    let footer = Line::from(vec![
        Span::styled(Local::now().format("%Y-%m-%d %H:%M:%S").to_string(), Style::default().fg(SUBDUED)),
        Span::raw("   enter submit | tab/shift+tab switch view | ↑/↓ select | esc quit"),
    ]);
    f.render_widget(Paragraph::new(footer), chunks[2]);
}

fn draw_too_small(f: &mut Frame, area: Rect) {
    let dim = |value: u16, min: u16| {
        let color = if value < min { Color::Red } else { Color::Green };
        Span::styled(value.to_string(), Style::default().fg(color))
    };
    let text = vec![
        Line::from("Terminal too small to display content"),
        Line::from(format!("Please resize your terminal to at least {}x{}", MIN_WIDTH, MIN_HEIGHT)),
        Line::from(""),
        Line::from(vec![
            Span::raw("Your current terminal size is: "),
            dim(area.width, MIN_WIDTH),
            Span::raw(" x "),
            dim(area.height, MIN_HEIGHT),
        ]),
    ];
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), area);
}

fn draw_request(f: &mut Frame, area: Rect, session: &Session) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let input = session.input();
    let text = if input.value().is_empty() {
        Span::styled(PLACEHOLDER, Style::default().fg(SUBDUED))
    } else {
        Span::raw(input.value())
    };
    f.render_widget(Paragraph::new(Line::from(text)).block(Block::default().borders(Borders::ALL).title("URL")), chunks[0]);
    let cursor_x = chunks[0].x + 1 + (input.cursor() as u16).min(chunks[0].width.saturating_sub(3));
    f.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));

    f.render_widget(Paragraph::new(feedback_line(session.feedback(), session.is_locked())), chunks[1]);

    let block = Block::default().borders(Borders::ALL).title("Breakdown");
    match session.current() {
        Some(m) => {
            let rows = breakdown_rows(m).into_iter().map(|(label, value)| {
                let value_style = if label == "Status" { status_style(m.http.class()) } else { Style::default() };
                Row::new(vec![
                    Span::styled(label, Style::default().fg(SUBDUED)),
                    Span::styled(value, value_style),
                ])
            });
            let table = Table::new(rows, [Constraint::Length(22), Constraint::Min(20)]).block(block);
            f.render_widget(table, chunks[2]);
        }
        None => {
            let hint = Paragraph::new("Type a URL and press enter to measure it.").style(Style::default().fg(SUBDUED)).block(block);
            f.render_widget(hint, chunks[2]);
        }
    }
}

fn feedback_line(feedback: &Feedback, locked: bool) -> Line<'static> {
    match feedback {
        Feedback::None => Line::from(""),
        Feedback::Loading if locked => Line::styled("Loading…", Style::default().fg(Color::Yellow)),
        Feedback::Loading => Line::from(""),
        Feedback::Success => Line::styled("Successfully measured", Style::default().fg(Color::Green)),
        Feedback::Error(msg) => Line::styled(msg.clone(), Style::default().fg(Color::Red)),
    }
}

fn status_style(class: StatusClass) -> Style {
    match class {
        StatusClass::Success => Style::default().fg(Color::Green),
        StatusClass::Redirect => Style::default().fg(Color::Yellow),
        StatusClass::ClientError | StatusClass::ServerError => Style::default().fg(Color::Red),
        StatusClass::Informational | StatusClass::Unknown => Style::default(),
    }
}

/// Label/value pairs shown for the current measurement.
pub fn breakdown_rows(m: &Measurement) -> Vec<(String, String)> {
    let t = &m.timings;
    let mut rows: Vec<(String, String)> = vec![
        ("ID".into(), format!("{:03}", m.id)),
        ("URL".into(), m.url.clone()),
        ("IP".into(), format!("{} ({})", m.connection_address, IpFamily::of(&m.connection_address))),
        ("Status".into(), m.status_line()),
        ("Protocol".into(), protocol_summary(m)),
    ];
    if let Some(location) = &m.location {
        rows.push(("Location".into(), format!("{} (not followed)", location)));
    }
    rows.extend([
        ("DNS Lookup".into(), format_duration(t.dns_lookup)),
        ("TCP Connection".into(), format_duration(t.connect)),
        ("TLS Handshake".into(), format_duration(t.tls_handshake)),
        ("Server Processing".into(), format_duration(t.server_processing)),
        ("Content Transfer".into(), format_duration(t.content_transfer)),
        ("Total".into(), format_duration(t.total)),
        ("Body".into(), format!("{} bytes", m.body_bytes)),
        ("Slowest".into(), m.slowest_phase().unwrap_or("none (fast)").to_string()),
        ("Measured at".into(), m.measured_at.format("%H:%M:%S").to_string()),
    ]);
    if !m.resolved_addresses.is_empty() {
        rows.push((String::new(), String::new()));
        rows.push(("Alternative Addrs:".into(), String::new()));
        for (i, ip) in m.resolved_addresses.iter().enumerate() {
            rows.push((format!("{:>10}", i + 1), ip.to_string()));
        }
    }
    rows
}

fn protocol_summary(m: &Measurement) -> String {
    match &m.tls {
        Some(tls) => {
            let alpn = tls.alpn.as_deref().unwrap_or("-");
            format!("{}  {}  alpn={}  {}", m.http.version, tls.version, alpn, tls.cipher)
        }
        None => format!("{}  (no TLS)", m.http.version),
    }
}

pub const HISTORY_COLUMNS: [&str; 8] = ["ID", "URL", "DNS", "TCP", "TLS", "Server Processing", "Transfer", "Total"];

/// One history table row, in [`HISTORY_COLUMNS`] order.
pub fn history_row(m: &Measurement) -> [String; 8] {
    let t = &m.timings;
    let url = m.url.strip_prefix("https://").unwrap_or(&m.url);
    [
        format!("{:03}", m.id),
        url.to_string(),
        format_duration(t.dns_lookup),
        format_duration(t.connect),
        format_duration(t.tls_handshake),
        format_duration(t.server_processing),
        format_duration(t.content_transfer),
        format_duration(t.total),
    ]
}

fn draw_history(f: &mut Frame, area: Rect, session: &Session) {
    let header = Row::new(HISTORY_COLUMNS).style(Style::default().add_modifier(Modifier::BOLD)).bottom_margin(1);
    let rows = session.history().all().iter().map(|m| Row::new(history_row(m)));
    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(18),
        Constraint::Length(11),
        Constraint::Length(11),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(format!("History ({})", session.history().len())))
        .row_highlight_style(Style::default().fg(Color::White).bg(HIGHLIGHT));
    let mut state = TableState::default().with_selected(session.selected());
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for (title, desc) in HELP_ITEMS {
        lines.push(Line::styled(title, Style::default().add_modifier(Modifier::BOLD)));
        lines.push(Line::styled(desc, Style::default().fg(SUBDUED)));
        lines.push(Line::from(""));
    }
    lines.push(Line::from("Keys:"));
    lines.push(Line::from("  enter          measure the URL in the input field"));
    lines.push(Line::from("  tab/shift+tab  next / previous view"));
    lines.push(Line::from("  ↑ / ↓          move the selection in History"));
    lines.push(Line::from("  esc / ctrl+c   quit"));
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}

fn draw_about(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled(concat!("resptime ", env!("CARGO_PKG_VERSION")), Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD | Modifier::ITALIC)),
        Line::from(""),
        Line::from("Measures where the time of a single HTTP(S) request goes: DNS, TCP, TLS,"),
        Line::from("server processing and content transfer."),
        Line::from(""),
        Line::from("Every request uses a fresh connection and redirects are never followed."),
        Line::from("History lives in memory only and is gone when the program exits."),
    ];
    f.render_widget(Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("About")), area);
}
