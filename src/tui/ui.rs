use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};

use crate::output::{format_average, format_percentage, format_rank, DISCLAIMER};
use crate::tui::app::{App, Field, InputMode};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 12 || area.width < 50 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Prior(1) + Table(fill) + Summary(4) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Length(1), // Prior score line
        Constraint::Fill(1),   // Subject table
        Constraint::Length(4), // Summary panel
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_prior(frame, chunks[1], app);
    render_table(frame, chunks[2], app);
    render_summary(frame, chunks[3], app);
    render_status_bar(frame, chunks[4], app);

    match app.input_mode {
        InputMode::PriorInput => render_prior_popup(frame, app),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::RankBreakdown => render_breakdown_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let left = "Konkur Calculator";
    let right = format!(
        "{} subjects, {} questions",
        app.session.subjects.len(),
        app.session
            .subjects
            .iter()
            .map(|s| s.total_questions)
            .sum::<u32>()
    );
    let padding_len = (area.width as usize).saturating_sub(left.len() + right.len());

    let title = Line::from(vec![
        Span::styled(left, Style::default().fg(app.colors.title_color).bold()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right, Style::default().fg(app.colors.muted)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_prior(frame: &mut Frame, area: Rect, app: &App) {
    let value = match app.session.prior_academic_score {
        Some(p) => Span::raw(p.to_string()),
        None => Span::styled(
            format!("not set (assumes {})", app.estimator.default_prior()),
            Style::default().fg(app.colors.muted),
        ),
    };
    let line = Line::from(vec![
        Span::styled("Diploma GPA: ", Style::default().fg(app.colors.muted)),
        value,
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn count_cell(count: Option<u32>, selected: bool, app: &App) -> Cell<'static> {
    let (text, mut style) = match count {
        Some(c) => (c.to_string(), Style::default()),
        None => ("-".to_string(), Style::default().fg(app.colors.empty_cell)),
    };
    if selected {
        style = style.patch(app.colors.field_selected);
    }
    Cell::from(format!("{:>5}", text)).style(style)
}

fn render_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let selected_row = app.table_state.selected();

    let rows: Vec<Row> = app
        .session
        .subjects
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let is_selected = selected_row == Some(idx);
            let cell_selected = |field: Field| is_selected && app.field == field;

            let percentage = match record.percentage {
                Some(p) => Cell::from(format!("{:>9}", format_percentage(p)))
                    .style(Style::default().fg(app.colors.percentage_color(p)).bold()),
                None => Cell::from(format!("{:>9}", "-"))
                    .style(Style::default().fg(app.colors.empty_cell)),
            };

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(app.colors.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(record.name.clone()),
                Cell::from(format!("{:>5}", record.total_questions))
                    .style(Style::default().fg(app.colors.muted)),
                count_cell(record.correct, cell_selected(Field::Correct), app),
                count_cell(record.wrong, cell_selected(Field::Wrong), app),
                count_cell(record.unanswered, cell_selected(Field::Unanswered), app),
                percentage,
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Fill(1),     // Subject name
        Constraint::Length(7),   // Total
        Constraint::Length(8),   // Correct
        Constraint::Length(8),   // Wrong
        Constraint::Length(10),  // Unanswered
        Constraint::Length(10),  // Percentage
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["Subject", "Total", "Correct", "Wrong", "Blank", "Percent"])
                .style(app.colors.header_style)
                .bottom_margin(1),
        )
        .row_highlight_style(app.colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_summary(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered()
        .title(" Estimate ")
        .border_style(Style::default().fg(app.colors.muted));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match app.summary.and_then(|s| s.average.zip(s.rank)) {
        Some((average, rank)) => vec![
            Line::from(vec![
                Span::styled("Rank ", Style::default().fg(app.colors.muted)),
                Span::styled(
                    format_rank(rank.value()),
                    Style::default().fg(app.colors.rank_color).bold(),
                ),
                Span::styled("   Average ", Style::default().fg(app.colors.muted)),
                Span::styled(format_average(average), Style::default().bold()),
            ]),
            Line::from(Span::styled(DISCLAIMER, Style::default().fg(app.colors.muted))),
        ],
        None => vec![Line::from(Span::styled(
            "Press a to compute all percentages and estimate your rank",
            Style::default().fg(app.colors.muted),
        ))],
    };

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        let msg_color = if msg.starts_with("Error") || msg.contains("first") {
            app.colors.flash_error
        } else {
            app.colors.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints = [
            ("j/k", ":subject "),
            ("Tab", ":field "),
            ("0-9", ":edit "),
            ("Enter", ":percent "),
            ("a", ":all "),
            ("p", ":GPA "),
            ("x", ":clear "),
            ("?", ":help "),
            ("q", ":quit"),
        ];

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(app.colors.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(app.colors.status_bar_bg)),
        area,
    );
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

fn popup_block<'a>(title: &'a str, app: &App) -> Block<'a> {
    Block::bordered()
        .title(title)
        .title_style(app.colors.popup_title)
        .border_style(Style::default().fg(app.colors.popup_border))
}

/// Render the prior score (diploma GPA) input popup
fn render_prior_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(44, 4, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Diploma GPA ", app);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([
        Constraint::Length(1), // Input line
        Constraint::Length(1), // Help text
    ])
    .split(inner);

    let input = Paragraph::new(format!("{}|", app.prior_input));
    frame.render_widget(input, chunks[0]);

    let help = Paragraph::new("Enter: confirm | Esc: cancel | e.g. 18.50")
        .style(Style::default().fg(app.colors.muted));
    frame.render_widget(help, chunks[1]);
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(56, 16, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Keyboard Shortcuts ", app);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(app.colors.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Next subject"),
        ("k / Up        ", "Previous subject"),
        ("Tab / l       ", "Next field (correct, wrong, blank)"),
        ("S-Tab / h     ", "Previous field"),
        ("0-9 / Bksp    ", "Edit the selected count"),
        ("Enter / c     ", "Compute this subject's percentage"),
        ("a             ", "Compute all and estimate rank"),
        ("p             ", "Enter diploma GPA"),
        ("b             ", "Show how the rank was estimated"),
        ("x             ", "Clear all subjects"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, label)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*label)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Render the rank breakdown popup
fn render_breakdown_popup(frame: &mut Frame, app: &App) {
    let Some(breakdown) = app.rank_breakdown() else {
        return;
    };

    let popup_area = centered_rect_fixed(60, 9, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = popup_block(" Rank Estimate ", app);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = Vec::new();
    for term in &breakdown.terms {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<12}", term.label), Style::default().bold()),
            Span::raw(term.description.clone()),
            Span::styled(
                format!(" = {:.1}", term.contribution),
                Style::default().fg(app.colors.muted),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(format!("{:<12}", "Rank"), Style::default().bold()),
        Span::styled(
            format!("max(1, round({:.1})) = {}", breakdown.raw, format_rank(breakdown.rank.value())),
            Style::default().fg(app.colors.rank_color),
        ),
    ]));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Esc / b to close",
        Style::default().fg(app.colors.muted),
    )));

    frame.render_widget(Paragraph::new(lines), inner);
}
