//! Terminal drawing of a heart_predict Ui. Every screen is laid out with
//! ratatui widgets into an off-screen Buffer, which is then printed line by
//! line so it scrolls along with the command prompt.

use std::io::{self, IsTerminal, Write};

use crossterm::queue;
use crossterm::style::{
    Attribute, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Gauge, Paragraph, Widget, Wrap},
};

use heart_predict::ui::{self, Metric, Node};
use heart_predict::DisplayConfig;

const FALLBACK_WIDTH: u16 = 100;
const MIN_WIDTH: u16 = 40;
const LABEL_WIDTH: usize = 24;
const GAUGE_HEIGHT: u16 = 4;
const CHART_HEIGHT: u16 = 12;
const MAX_BAR_WIDTH: u16 = 24;
const BAR_PALETTE: [Color; 6] = [
    Color::LightBlue,
    Color::LightRed,
    Color::Green,
    Color::Magenta,
    Color::Yellow,
    Color::Cyan,
];

fn color(color: ui::Color) -> Color {
    match color {
        ui::Color::LightBlue => Color::LightBlue,
        ui::Color::DarkBlue => Color::Blue,
        ui::Color::Green => Color::Green,
        ui::Color::Yellow => Color::Yellow,
        ui::Color::Red => Color::Red,
    }
}

fn bold() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

fn muted() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Lines a greedy word wrap needs for `text` at `width` columns.
fn wrapped_height(text: &str, width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let mut lines = 1;
    let mut used = 0;
    // split on single spaces so padding counts toward the line
    for word in text.split(' ') {
        let len = word.chars().count();
        if used > 0 && used + 1 + len <= width {
            used += 1 + len;
            continue;
        }
        if used > 0 {
            lines += 1;
        }
        used = len;
        // words wider than a line are broken across several
        while used > width {
            lines += 1;
            used -= width;
        }
    }
    u16::try_from(lines).unwrap_or(u16::MAX)
}

fn field_text(label: &str, value: &str, bounds: &str, show_bounds: bool) -> String {
    let mut text = format!("{:<w$} {}", label, value, w = LABEL_WIDTH);
    if show_bounds {
        text.push_str(&format!("  <{}>", bounds));
    }
    text
}

fn metric_spans(metrics: &[Metric]) -> Vec<Span<'static>> {
    let mut spans = vec![];
    for (i, metric) in metrics.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("   |   ", muted()));
        }
        if !metric.label.is_empty() {
            spans.push(Span::styled(format!("{}: ", metric.label), muted()));
        }
        spans.push(Span::styled(metric.value.clone(), bold()));
        if let Some(delta) = &metric.delta {
            let (text, fg) = match delta.strip_prefix('-') {
                Some(_) => (format!(" ({})", delta), Color::Red),
                None => (format!(" (+{})", delta), Color::Green),
            };
            spans.push(Span::styled(text, Style::default().fg(fg)));
        }
    }
    spans
}

fn node_height(node: &Node, display: &DisplayConfig, show_bounds: bool, width: u16) -> u16 {
    let inner = width.saturating_sub(2);
    match node {
        Node::Title(_) | Node::Heading(_) => 2,
        Node::Text(text) => wrapped_height(text, width),
        Node::Info(text) | Node::Error(text) => wrapped_height(text, inner) + 2,
        Node::Expander { items, .. } => {
            if display.show_descriptions {
                items
                    .iter()
                    .map(|item| wrapped_height(&format!("- {}", item), inner))
                    .sum::<u16>()
                    + 2
            } else {
                1
            }
        }
        Node::Field {
            label,
            value,
            bounds,
        } => wrapped_height(&field_text(label, value, bounds, show_bounds), width),
        Node::Prediction(_) => 3,
        Node::Gauge(_) => GAUGE_HEIGHT,
        Node::BarChart(_) => CHART_HEIGHT,
        Node::Metrics(_) => 1,
    }
}

/// Draws a gauge as a filled bar colored after the band its value sits in,
/// with a strip of every band underneath and a marker at the threshold.
fn draw_gauge(gauge: &ui::Gauge, area: Rect, buf: &mut Buffer) {
    let frame = Style::default().fg(color(gauge.bar_color));
    let block = Block::default()
        .title(Span::styled(
            format!(
                " {} {:.1} ({:+.1} vs {}) ",
                gauge.title,
                gauge.value,
                gauge.delta(),
                gauge.reference
            ),
            bold(),
        ))
        .borders(Borders::ALL)
        .border_style(frame);
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(inner);

    let (low, high) = gauge.axis;
    let ratio = if high > low {
        ((gauge.value - low) / (high - low)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let fill = color(gauge.band_color().unwrap_or(gauge.bar_color));
    Gauge::default()
        .gauge_style(Style::default().fg(fill))
        .ratio(ratio)
        .label(Span::styled(format!("{:.1}", gauge.value), bold()))
        .render(rows[0], buf);

    Paragraph::new(Line::from(band_strip(gauge, rows[1].width))).render(rows[1], buf);
}

fn band_strip(gauge: &ui::Gauge, width: u16) -> Vec<Span<'static>> {
    let (low, high) = gauge.axis;
    let columns = usize::from(width);
    if columns == 0 || high <= low {
        return vec![];
    }
    let span = high - low;
    let marker = (((gauge.threshold - low) / span * columns as f64).floor() as i64)
        .clamp(0, columns as i64 - 1) as usize;

    let mut spans: Vec<Span<'static>> = vec![];
    let mut run = String::new();
    let mut run_color: Option<Color> = None;
    for column in 0..columns {
        if column == marker {
            if let Some(fg) = run_color.take() {
                spans.push(Span::styled(std::mem::take(&mut run), Style::default().fg(fg)));
            }
            spans.push(Span::styled("┃", bold().fg(color(gauge.bar_color))));
            continue;
        }
        let at = low + (column as f64 + 0.5) / columns as f64 * span;
        let fg = gauge.color_at(at).map(color).unwrap_or(Color::Reset);
        if run_color != Some(fg) {
            if let Some(previous) = run_color {
                spans.push(Span::styled(std::mem::take(&mut run), Style::default().fg(previous)));
            }
            run_color = Some(fg);
        }
        run.push('━');
    }
    if let Some(fg) = run_color {
        spans.push(Span::styled(run, Style::default().fg(fg)));
    }
    spans
}

fn draw_bar_chart(chart: &ui::BarChart, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", chart.title), bold()))
        .borders(Borders::ALL);

    let count = chart.bars.len().max(1) as u16;
    let gap = 1;
    let inner_width = area.width.saturating_sub(2);
    let bar_width = (inner_width.saturating_sub(gap * (count - 1)) / count).clamp(1, MAX_BAR_WIDTH);

    let bars: Vec<Bar> = chart
        .bars
        .iter()
        .zip(BAR_PALETTE.iter().cycle())
        .map(|(bar, fg)| {
            let bar_widget = Bar::default()
                .label(Line::from(bar.label.clone()))
                .value(bar.value.max(0.0).round() as u64)
                .style(Style::default().fg(*fg))
                .value_style(Style::default().fg(Color::Black).bg(*fg));
            if chart.show_values {
                bar_widget
            } else {
                bar_widget.text_value(String::new())
            }
        })
        .collect();

    BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(gap)
        .render(area, buf);
}

fn draw_node(node: &Node, area: Rect, buf: &mut Buffer, display: &DisplayConfig, show_bounds: bool) {
    let wrap = Wrap { trim: false };
    match node {
        Node::Title(title) => Paragraph::new(Line::styled(
            title.clone(),
            bold().fg(Color::LightRed),
        ))
        .block(Block::default().borders(Borders::BOTTOM))
        .render(area, buf),
        Node::Heading(heading) => Paragraph::new(vec![
            Line::default(),
            Line::styled(heading.clone(), bold().add_modifier(Modifier::UNDERLINED)),
        ])
        .render(area, buf),
        Node::Text(text) => Paragraph::new(text.as_str()).wrap(wrap).render(area, buf),
        Node::Info(text) => Paragraph::new(text.as_str())
            .style(Style::default().fg(Color::LightBlue))
            .wrap(wrap)
            .block(Block::default().title(" Info ").borders(Borders::ALL))
            .render(area, buf),
        Node::Expander { title, items } => {
            if display.show_descriptions {
                let lines: Vec<Line> = items
                    .iter()
                    .map(|item| Line::from(format!("- {}", item)))
                    .collect();
                Paragraph::new(lines)
                    .wrap(wrap)
                    .block(
                        Block::default()
                            .title(Span::styled(format!(" ▼ {} ", title), bold()))
                            .borders(Borders::ALL)
                            .border_style(muted()),
                    )
                    .render(area, buf)
            } else {
                Paragraph::new(Line::styled(format!("▶ {}", title), bold())).render(area, buf)
            }
        }
        Node::Field {
            label,
            value,
            bounds,
        } => {
            let mut spans = vec![
                Span::styled(format!("{:<w$} ", label, w = LABEL_WIDTH), muted()),
                Span::styled(value.clone(), bold()),
            ];
            if show_bounds {
                spans.push(Span::styled(format!("  <{}>", bounds), muted()));
            }
            Paragraph::new(Line::from(spans)).wrap(wrap).render(area, buf)
        }
        Node::Prediction(prediction) => Paragraph::new(Line::styled(
            prediction.clone(),
            bold().fg(Color::LightRed),
        ))
        .alignment(Alignment::Center)
        .block(Block::default().title(" Prediction ").borders(Borders::ALL))
        .render(area, buf),
        Node::Gauge(gauge) => draw_gauge(gauge, area, buf),
        Node::BarChart(chart) => draw_bar_chart(chart, area, buf),
        Node::Metrics(metrics) => Paragraph::new(Line::from(metric_spans(metrics))).render(area, buf),
        Node::Error(message) => Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(wrap)
            .block(
                Block::default()
                    .title(Span::styled(" Error ", bold()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red)),
            )
            .render(area, buf),
    }
}

/// Columns to draw into: the configured width, else the terminal's.
pub fn screen_width(display: &DisplayConfig) -> u16 {
    let width = match display.width {
        0 => crossterm::terminal::size()
            .map(|(columns, _)| columns)
            .unwrap_or(FALLBACK_WIDTH),
        width => width,
    };
    width.max(MIN_WIDTH)
}

/// Lays out the sidebar, a divider, then the main area, one node under the
/// other. With show_bounds every field also lists the values it accepts.
pub fn draw(ui: &ui::Ui, display: &DisplayConfig, show_bounds: bool, width: u16) -> Buffer {
    // None marks the divider between sidebar and main area
    let mut sections: Vec<(Option<&Node>, u16)> = vec![];
    for node in &ui.sidebar {
        sections.push((Some(node), node_height(node, display, show_bounds, width)));
    }
    sections.push((None, 2));
    for node in &ui.main {
        sections.push((Some(node), node_height(node, display, show_bounds, width)));
    }

    let height = sections.iter().map(|(_, h)| *h).sum();
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(sections.iter().map(|(_, h)| Constraint::Length(*h)))
        .split(area);

    for ((section, _), chunk) in sections.iter().zip(chunks.iter()) {
        match section {
            Some(node) => draw_node(node, *chunk, &mut buf, display, show_bounds),
            None => Block::default()
                .borders(Borders::BOTTOM)
                .border_style(muted())
                .render(*chunk, &mut buf),
        }
    }
    buf
}

/// Writes the buffer out row by row. Styles are only sent when `styled`,
/// so piped output stays plain text.
pub fn print_buffer<W: Write>(buf: &Buffer, out: &mut W, styled: bool) -> io::Result<()> {
    let area = buf.area;
    for y in area.top()..area.bottom() {
        if !styled {
            let row: String = (area.left()..area.right())
                .map(|x| buf[(x, y)].symbol())
                .collect();
            writeln!(out, "{}", row.trim_end())?;
            continue;
        }

        let mut current = None;
        for x in area.left()..area.right() {
            let cell = &buf[(x, y)];
            let look = (cell.fg, cell.bg, cell.modifier);
            if current != Some(look) {
                queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                if cell.fg != Color::Reset {
                    queue!(out, SetForegroundColor(cell.fg.into()))?;
                }
                if cell.bg != Color::Reset {
                    queue!(out, SetBackgroundColor(cell.bg.into()))?;
                }
                if cell.modifier.contains(Modifier::BOLD) {
                    queue!(out, SetAttribute(Attribute::Bold))?;
                }
                if cell.modifier.contains(Modifier::UNDERLINED) {
                    queue!(out, SetAttribute(Attribute::Underlined))?;
                }
                current = Some(look);
            }
            queue!(out, Print(cell.symbol()))?;
        }
        queue!(out, SetAttribute(Attribute::Reset), ResetColor, Print("\n"))?;
    }
    out.flush()
}

/// Draws the Ui and prints it to stdout, colored when stdout is a terminal.
pub fn show(ui: &ui::Ui, display: &DisplayConfig, show_bounds: bool) -> io::Result<()> {
    let buf = draw(ui, display, show_bounds, screen_width(display));
    let stdout = io::stdout();
    let styled = stdout.is_terminal();
    print_buffer(&buf, &mut stdout.lock(), styled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heart_predict::render::{bmi_gauge, health_days_chart, risk_factors_node, sleep_gauge};
    use heart_predict::{HealthProfile, Session};

    fn display() -> DisplayConfig {
        DisplayConfig {
            width: 100,
            show_descriptions: false,
        }
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect()
            })
            .collect()
    }

    fn shows(buf: &Buffer, text: &str) -> bool {
        rows(buf).iter().any(|row| row.contains(text))
    }

    fn draw_one(node: &Node, width: u16) -> Buffer {
        let area = Rect::new(0, 0, width, node_height(node, &display(), false, width));
        let mut buf = Buffer::empty(area);
        draw_node(node, area, &mut buf, &display(), false);
        buf
    }

    #[test]
    fn wrap_height_counts_lines() {
        assert_eq!(wrapped_height("", 10), 1);
        assert_eq!(wrapped_height("aaaa bbbb", 9), 1);
        assert_eq!(wrapped_height("aaaa bbbb", 8), 2);
        assert_eq!(wrapped_height("aaaaaaaaaaaa", 5), 3);
        assert_eq!(wrapped_height("aa      bb", 9), 2);
    }

    #[test]
    fn gauge_fill_takes_band_color() {
        let buf = draw_one(&Node::Gauge(sleep_gauge(6.0)), 40);
        assert!(shows(&buf, "Sleep Hours 6.0 (-2.0 vs 8)"));
        assert!(shows(&buf, "6.0"));

        // row 1 is the bar, half of it filled in the yellow band color
        let filled = &buf[(1, 1)];
        assert_eq!(filled.symbol(), "█");
        assert_eq!(filled.fg, Color::Yellow);
        assert_ne!(buf[(37, 1)].symbol(), "█");
        // the frame is the dark bar color
        assert_eq!(buf[(0, 0)].fg, Color::Blue);
    }

    #[test]
    fn band_strip_marks_threshold() {
        let buf = draw_one(&Node::Gauge(sleep_gauge(6.0)), 26);
        // 24 inner columns over a 0-12 axis: two columns per hour
        let strip = rows(&buf)[2].clone();
        let marker = strip.chars().position(|c| c == '┃').unwrap();
        assert_eq!(marker, 13);
        assert_eq!(buf[(13, 2)].fg, Color::Blue);
        assert_eq!(buf[(1, 2)].fg, Color::Red);
        assert_eq!(buf[(16, 2)].fg, Color::Green);
        assert_eq!(buf[(24, 2)].fg, Color::Yellow);
    }

    #[test]
    fn gauge_past_axis_is_full_in_bar_color() {
        let buf = draw_one(&Node::Gauge(bmi_gauge(52.0)), 40);
        assert_eq!(buf[(1, 1)].symbol(), "█");
        assert_eq!(buf[(38, 1)].symbol(), "█");
        assert_eq!(buf[(1, 1)].fg, Color::Blue);
    }

    #[test]
    fn health_days_chart_shows_values() {
        let node = Node::BarChart(health_days_chart(&HealthProfile::default()));
        let buf = draw_one(&node, 100);
        assert!(shows(&buf, "Physical and Mental Health Days in the Last Month"));
        assert!(shows(&buf, "Good Physical Health"));
        assert!(shows(&buf, "Poor Mental Health"));
        assert!(shows(&buf, "28"));
    }

    #[test]
    fn risk_bars_hide_values() {
        let profile = HealthProfile {
            had_skin_cancer: true,
            ..Default::default()
        };
        let buf = draw_one(&risk_factors_node(&profile), 60);
        assert!(shows(&buf, "Present Risk Factors"));
        assert!(shows(&buf, "Skin Cancer"));
        assert!(!shows(&buf, "1"));
    }

    #[test]
    fn collapsed_descriptions_and_bounds() {
        let ui = Session::new().view();
        let buf = draw(&ui, &display(), true, 100);
        assert!(shows(&buf, "▶ Variable Descriptions"));
        assert!(!shows(&buf, "Your height in meters"));
        assert!(shows(&buf, "<0 - 24>"));
        assert!(shows(&buf, "Heart Disease Prediction App"));
    }

    #[test]
    fn error_is_framed_in_red() {
        let buf = draw_one(&Node::Error(String::from("Error connecting to the prediction server")), 60);
        assert!(shows(&buf, "Error connecting to the prediction server"));
        assert_eq!(buf[(0, 0)].fg, Color::Red);
    }

    #[test]
    fn metrics_show_signed_delta() {
        let node = Node::Metrics(vec![Metric {
            label: String::new(),
            value: String::from("27.3"),
            delta: Some(String::from("2.3")),
        }]);
        let buf = draw_one(&node, 40);
        assert!(rows(&buf)[0].starts_with("27.3 (+2.3)"));
        assert_eq!(buf[(5, 0)].fg, Color::Green);
    }

    #[test]
    fn plain_print_trims_rows() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 8, 2));
        buf.set_string(0, 0, "BMI", Style::default().fg(Color::Red));
        let mut out = vec![];
        print_buffer(&buf, &mut out, false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "BMI\n\n");

        let mut out = vec![];
        print_buffer(&buf, &mut out, true).unwrap();
        let styled = String::from_utf8(out).unwrap();
        assert!(styled.contains("\u{1b}["));
        assert!(styled.contains("BMI"));
    }
}
