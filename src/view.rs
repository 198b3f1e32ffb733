// Dashboard frame: title, hint line and the container table.

use crate::models::{ContainerRecord, PollSnapshot};
use crate::version;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Cell, Padding, Paragraph, Row, Table};

pub const HEADERS: [&str; 7] = [
    "ID", "Name", "CPU", "Memory", "Block I/O", "Network", "Status",
];
const WIDTHS: [u16; 7] = [14, 20, 8, 10, 22, 22, 20];

/// Longest name or status shown before clipping.
const MAX_TEXT: usize = 20;
const CPU_HOT: f64 = 50.0;

const ACCENT: Color = Color::Rgb(0x00, 0xD9, 0xFF);
const HEADER: Color = Color::Rgb(0xFF, 0xA5, 0x00);
const GOOD: Color = Color::Rgb(0x00, 0xFF, 0x00);
const BAD: Color = Color::Rgb(0xFF, 0x44, 0x44);
const MUTED: Color = Color::Rgb(0x88, 0x88, 0x88);
const HINT: Color = Color::Rgb(0x66, 0x66, 0x66);
const NETWORK: Color = Color::Rgb(0x05, 0xF8, 0x46);
const FRAME: Color = Color::Rgb(0x44, 0x44, 0x44);

/// Cut `s` to `max` characters, ending in ".." when shortened.
pub fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(2)).collect();
    out.push_str("..");
    out
}

/// CPU at or above 50% is flagged.
pub fn cpu_is_hot(cpu_percent: &str) -> bool {
    cpu_percent
        .trim_end_matches('%')
        .parse::<f64>()
        .is_ok_and(|v| v >= CPU_HOT)
}

pub fn status_is_exited(status: &str) -> bool {
    status.to_lowercase().contains("exit")
}

/// Text shown instead of rows when a cycle produced none.
pub fn placeholder(snapshot: &PollSnapshot) -> Option<(String, Color)> {
    if !snapshot.is_empty() {
        return None;
    }
    Some(match &snapshot.error {
        Some(e) => (format!("Error: {e}"), BAD),
        None => ("No containers running".to_string(), MUTED),
    })
}

fn record_row(r: &ContainerRecord) -> Row<'static> {
    let cpu_color = if cpu_is_hot(&r.cpu_percent) { BAD } else { GOOD };
    let status_color = if status_is_exited(&r.status) { BAD } else { GOOD };
    Row::new(vec![
        colored(r.id.clone(), ACCENT),
        Cell::from(clip(&r.name, MAX_TEXT)),
        colored(r.cpu_percent.clone(), cpu_color),
        colored(r.memory.clone(), ACCENT),
        Cell::from(r.block_io.clone()),
        colored(r.network.clone(), NETWORK),
        colored(clip(&r.status, MAX_TEXT), status_color),
    ])
}

fn colored(text: String, color: Color) -> Cell<'static> {
    Cell::from(text).style(Style::new().fg(color))
}

pub fn render(frame: &mut Frame, snapshot: &PollSnapshot) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::new().fg(FRAME))
        .padding(Padding::new(2, 2, 1, 1));
    let inner = block.inner(frame.area());
    frame.render_widget(block, frame.area());

    let [heading, body] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(inner);
    render_heading(frame, heading);

    let header = Row::new(HEADERS)
        .style(Style::new().fg(HEADER).add_modifier(Modifier::BOLD))
        .bottom_margin(1);
    let widths = WIDTHS.map(Constraint::Length);

    match placeholder(snapshot) {
        None => {
            let rows: Vec<Row> = snapshot.records.iter().map(record_row).collect();
            frame.render_widget(Table::new(rows, widths).header(header), body);
        }
        Some((text, color)) => {
            let [head, rest] =
                Layout::vertical([Constraint::Length(2), Constraint::Min(0)]).areas(body);
            frame.render_widget(Table::new(Vec::<Row>::new(), widths).header(header), head);
            frame.render_widget(Paragraph::new(text).style(Style::new().fg(color)), rest);
        }
    }
}

fn render_heading(frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::styled(
            version::title(),
            Style::new().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Line::styled("Press q or Ctrl+C to exit", Style::new().fg(HINT)),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}
