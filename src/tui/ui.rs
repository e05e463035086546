use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};

use crate::output::{format_row_detail, format_score, format_weight, truncate_name};
use crate::scoring::{SortColumn, SortDirection, CRITERIA_COUNT, MAX_WEIGHT};
use crate::tui::app::{App, InputMode};
use crate::tui::theme::ThemeColors;

const TITLE: &str = "NIRF Re-rank";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 16 || area.width < 50 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Sliders(borders + one per criterion) + Subsets(1) + Table(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(CRITERIA_COUNT as u16 + 2),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_sliders(frame, chunks[1], app);
    render_subsets(frame, chunks[2], app);
    render_table(frame, chunks[3], app);
    render_status_bar(frame, chunks[4], app);

    match app.input_mode {
        InputMode::Help => render_help_popup(frame, &app.colors),
        InputMode::ScoreBreakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let mut spans = vec![Span::styled(TITLE, Style::default().fg(colors.title_color).bold())];

    let right = format!(
        "{} of {} institutions | {}",
        app.rows().len(),
        app.view_model.total_institutions(),
        app.view_model.policy().label()
    );
    let padding_len = (area.width as usize).saturating_sub(TITLE.len() + right.len());
    spans.push(Span::raw(" ".repeat(padding_len)));
    spans.push(Span::styled(right, Style::default().fg(colors.muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_sliders(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let block = Block::bordered()
        .title(" Weights ")
        .border_style(Style::default().fg(colors.muted));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let criteria = app.view_model.criteria();
    let values = app.view_model.sliders().values();

    // "▶ CODE________ " + bar + " 100.0"
    let code_width = 12;
    let name_width = (inner.width as usize / 3).min(40);
    let bar_width = (inner.width as usize).saturating_sub(2 + code_width + name_width + 9).max(5);

    let lines: Vec<Line> = criteria
        .iter()
        .enumerate()
        .map(|(i, criterion)| {
            let focused = i == app.focused_slider;
            let marker = if focused { "▶ " } else { "  " };
            let fill_color = if focused { colors.slider_focus } else { colors.slider_fill };
            let label_style = if focused {
                Style::default().fg(colors.slider_focus).bold()
            } else {
                Style::default()
            };

            let mut spans = vec![
                Span::styled(marker, Style::default().fg(colors.slider_focus)),
                Span::styled(format!("{:<width$}", criterion.code, width = code_width), label_style),
                Span::styled(
                    format!(
                        "{:<width$}",
                        truncate_name(&criterion.name, name_width.saturating_sub(1)),
                        width = name_width
                    ),
                    Style::default().fg(colors.muted),
                ),
            ];
            spans.extend(bar(values[i], MAX_WEIGHT, bar_width, fill_color, colors.bar_empty).spans);
            spans.push(Span::styled(
                format!(" {:>6}", format_weight(values[i])),
                label_style,
            ));
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_subsets(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let subsets = app.view_model.subsets();
    if subsets.is_empty() {
        return;
    }

    let mut spans = vec![Span::styled("Subsets: ", Style::default().fg(colors.muted))];
    for (i, subset) in subsets.iter().enumerate() {
        let (mark, color) = if subset.included {
            ("[x]", colors.subset_on)
        } else {
            ("[ ]", colors.subset_off)
        };
        spans.push(Span::styled(
            format!("{}", i + 1),
            Style::default().fg(colors.status_key_color),
        ));
        spans.push(Span::styled(
            format!(":{} {}  ", mark, subset.name),
            Style::default().fg(color),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let colors = app.colors.clone();
    let criteria = app.view_model.criteria().clone();
    let sort = app.view_model.sort();
    let cursor = app.header_cursor_column();
    let rows = app.rows();

    if rows.is_empty() {
        let empty_msg = Paragraph::new("No institutions to show (all subsets hidden?)")
            .alignment(Alignment::Center)
            .block(Block::default());
        frame.render_widget(empty_msg, area);
        return;
    }

    // Calculate max score for bar scaling
    let max_score = rows.iter().map(|r| r.score).fold(0.0_f64, f64::max);

    let table_rows: Vec<Row> = rows
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let score_color = colors.score_color(row.score, max_score);
            let mut score_spans = vec![Span::styled(
                format!("{:>6} ", format_score(row.score)),
                Style::default().fg(score_color),
            )];
            score_spans.extend(bar(row.score, max_score, 8, score_color, colors.bar_empty).spans);

            let row_style = if idx % 2 == 1 {
                Style::default().bg(colors.row_alt_bg)
            } else {
                Style::default()
            };

            let mut cells = vec![
                Cell::from(format!("{}.", row.rank)).style(Style::default().fg(colors.index_color)),
                Cell::from(row.institution.id.clone()),
                Cell::from(row.institution.label().to_string()),
            ];
            cells.extend(
                row.institution
                    .subscores
                    .iter()
                    .map(|s| Cell::from(format!("{:>6.2}", s))),
            );
            cells.push(Cell::from(Line::from(score_spans)));

            Row::new(cells).style(row_style)
        })
        .collect();

    let header_cells: Vec<Cell> = SortColumn::all()
        .into_iter()
        .map(|column| {
            let mut title = column.title(&criteria);
            let mut style = colors.header_style;
            if let Some(spec) = sort.filter(|s| s.column == column) {
                title.push_str(match spec.direction {
                    SortDirection::Ascending => " ▲",
                    SortDirection::Descending => " ▼",
                });
                style = colors.sort_header_style;
            }
            if column == cursor {
                style = style.reversed();
            }
            Cell::from(title).style(style)
        })
        .collect();

    let mut widths = vec![
        Constraint::Length(5),  // Rank: "999."
        Constraint::Length(14), // Institute Id
        Constraint::Fill(1),    // Name
    ];
    widths.extend(std::iter::repeat(Constraint::Length(8)).take(CRITERIA_COUNT));
    widths.push(Constraint::Length(16)); // Score + bar: "100.00 ████░░░░"

    let table = Table::new(table_rows, widths)
        .header(Row::new(header_cells).bottom_margin(1))
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let colors = &app.colors;
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") {
            colors.flash_error
        } else {
            colors.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints = [
            ("↑/↓", ":slider "),
            ("←/→", ":weight "),
            ("j/k", ":row "),
            ("</>", ":column "),
            ("s", ":sort "),
            ("r", ":reset "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(colors.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

/// Horizontal bar of `width` cells filled in proportion to `value / max`.
fn bar(value: f64, max: f64, width: usize, filled_color: Color, empty_color: Color) -> Line<'static> {
    let ratio = if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = (ratio * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);

    let mut spans = Vec::new();
    if filled > 0 {
        spans.push(Span::styled("█".repeat(filled), Style::default().fg(filled_color)));
    }
    if empty > 0 {
        spans.push(Span::styled("░".repeat(empty), Style::default().fg(empty_color)));
    }

    Line::from(spans)
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_help_popup(frame: &mut Frame, colors: &ThemeColors) {
    let popup_area = centered_rect_fixed(56, 19, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", colors.popup_title))
        .border_style(Style::default().fg(colors.popup_border))
        .style(Style::default().bg(colors.popup_bg));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(colors.status_key_color).bold();
    let entries = [
        ("Up / Down / Tab", "Focus previous / next slider"),
        ("Left / Right", "Move focused slider by one step"),
        ("Shift+arrows, [ ]", "Move focused slider by 10"),
        ("r", "Reset weights to defaults"),
        ("1-9", "Show/hide subset"),
        ("j / k", "Move row selection"),
        ("< / >", "Move column cursor"),
        ("s / Enter", "Sort by column (asc, desc, off)"),
        ("b", "Score breakdown for selected row"),
        ("o", "Open methodology document"),
        ("?", "Show/hide this help"),
        ("q / Ctrl-c", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(format!("{:<20}", key), key_style),
                Span::raw(*action),
            ])
        })
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let colors = &app.colors;
    let Some(row) = app.selected_row() else {
        return;
    };

    let text = format_row_detail(
        row,
        app.view_model.criteria(),
        app.view_model.weights(),
        app.view_model.policy(),
        false,
    );
    let height = text.lines().count() as u16 + 4;
    let popup_area = centered_rect_fixed(60, height, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Score Breakdown ", colors.popup_title))
        .border_style(Style::default().fg(colors.popup_border))
        .style(Style::default().bg(colors.popup_bg));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines: Vec<Line> = text.lines().map(|l| Line::from(l.to_string())).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc/b: close  j/k: next row",
        Style::default().fg(colors.muted),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::tests::test_app;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_bar_proportions() {
        let line = bar(50.0, 100.0, 8, Color::Green, Color::DarkGray);
        assert_eq!(line.spans[0].content, "████");
        assert_eq!(line.spans[1].content, "░░░░");

        let empty = bar(10.0, 0.0, 4, Color::Green, Color::DarkGray);
        assert_eq!(empty.spans.len(), 1);
        assert_eq!(empty.spans[0].content, "░░░░");
    }

    #[test]
    fn test_centered_rect_fixed_clamps() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered_rect_fixed(40, 4, area);
        assert_eq!(rect, Rect::new(0, 3, 20, 4));
    }

    #[test]
    fn test_draw_renders_sliders_and_rows() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        let text = buffer_text(&terminal);

        assert!(text.contains(TITLE));
        assert!(text.contains("Weights"));
        assert!(text.contains("Perception"));
        assert!(text.contains("IR-1"));
        assert!(text.contains("[x] IITs"));
    }

    #[test]
    fn test_draw_too_small() {
        let mut app = test_app();
        let mut terminal = Terminal::new(TestBackend::new(30, 5)).unwrap();
        terminal.draw(|frame| draw(frame, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Terminal too small"));
    }
}
