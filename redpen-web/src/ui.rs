//! Terminal UI rendering for Redpen Web
//!
//! This module mirrors redpen-cli's UI but uses ratzilla's rendering.

use ratzilla::ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use redpen_core::{highlight_runs, App, Category, DiffSegment, Focus, Mode, SegmentKind, View};

// Catppuccin Mocha colors
const SURFACE0: Color = Color::Rgb(49, 50, 68);
const SURFACE1: Color = Color::Rgb(69, 71, 90);
const TEXT: Color = Color::Rgb(205, 214, 244);
const SUBTEXT0: Color = Color::Rgb(166, 173, 200);
const RED: Color = Color::Rgb(243, 139, 168);
const YELLOW: Color = Color::Rgb(249, 226, 175);
const GREEN: Color = Color::Rgb(166, 227, 161);
const BLUE: Color = Color::Rgb(137, 180, 250);
const MAUVE: Color = Color::Rgb(203, 166, 247);
const TEAL: Color = Color::Rgb(148, 226, 213);

pub fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_title_bar(frame, app, chunks[0]);
    draw_main_area(frame, app, chunks[1]);
    draw_status_bar(frame, app, chunks[2]);

    match app.mode {
        Mode::Detail => draw_detail(frame, app),
        Mode::Help => draw_help(frame),
        Mode::Normal => {}
    }
}

fn draw_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let count = app.corrections().len();
    let current = if count > 0 { app.sidebar_selected + 1 } else { 0 };

    let title_text = format!(" Redpen (Web) - {} [{}/{}]", app.title(), current, count);
    let title_bar = Paragraph::new(title_text).style(Style::default().fg(TEXT).bg(SURFACE0));
    frame.render_widget(title_bar, area);

    let legend = legend_line();
    let width = (legend.width() as u16).min(area.width);
    let legend_area = Rect::new(area.right() - width, area.y, width, 1);
    frame.render_widget(Paragraph::new(legend).style(Style::default().bg(SURFACE0)), legend_area);
}

/// Category colors as shown on the markers
fn legend_line() -> Line<'static> {
    let mut spans = vec![Span::styled("Legend:", Style::default().fg(SUBTEXT0))];
    for category in Category::all() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            category.as_str(),
            Style::default()
                .fg(category_color(*category))
                .add_modifier(Modifier::UNDERLINED),
        ));
    }
    spans.push(Span::raw(" "));
    Line::from(spans)
}

fn draw_main_area(frame: &mut Frame, app: &App, area: Rect) {
    let area = match app.feedback() {
        Some((heading, feedback)) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(4), Constraint::Min(0)])
                .split(area);
            draw_feedback(frame, heading, feedback, rows[0]);
            rows[1]
        }
        None => area,
    };

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Document
            Constraint::Length(34), // Sidebar
        ])
        .split(area);

    match app.view {
        View::Highlighted => draw_highlighted(frame, app, chunks[0]),
        View::Diff => draw_diff(frame, app, chunks[0]),
    }
    draw_sidebar(frame, app, chunks[1]);
}

fn pane_style(app: &App, focus: Focus) -> Style {
    if app.focus == focus {
        Style::default().fg(BLUE)
    } else {
        Style::default().fg(SUBTEXT0)
    }
}

fn draw_highlighted(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(pane_style(app, Focus::Document))
        .title("Corrected");

    let Some(analysis) = &app.analysis else {
        frame.render_widget(block, area);
        return;
    };

    let selected = app.selected_correction().map(|(index, _)| index);
    let pieces = highlight_runs(&analysis.highlighted)
        .into_iter()
        .map(|run| {
            let style = match run.marker {
                Some(marker) => {
                    let style = Style::default()
                        .fg(category_color(marker.category))
                        .add_modifier(Modifier::UNDERLINED);
                    if Some(marker.index) == selected {
                        style.bg(SURFACE1).add_modifier(Modifier::BOLD)
                    } else {
                        style
                    }
                }
                None => Style::default().fg(TEXT),
            };
            (run.text, style)
        });

    let paragraph = Paragraph::new(styled_lines(pieces))
        .block(block)
        .scroll((app.scroll, 0))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_diff(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let Some(analysis) = &app.analysis else {
        return;
    };

    let (removed, added) = analysis.diff.change_counts();
    draw_segments(
        frame,
        app,
        &analysis.diff.original,
        format!("Original (-{removed})"),
        chunks[0],
    );
    draw_segments(
        frame,
        app,
        &analysis.diff.corrected,
        format!("Corrected (+{added})"),
        chunks[1],
    );
}

fn draw_segments(frame: &mut Frame, app: &App, segments: &[DiffSegment], title: String, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(pane_style(app, Focus::Document))
        .title(title);

    let pieces = segments
        .iter()
        .map(|segment| (segment.text.clone(), segment_style(segment.kind)));

    let paragraph = Paragraph::new(styled_lines(pieces))
        .block(block)
        .scroll((app.scroll, 0))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn segment_style(kind: SegmentKind) -> Style {
    match kind {
        SegmentKind::Unchanged => Style::default().fg(TEXT),
        SegmentKind::Removed => Style::default()
            .fg(RED)
            .add_modifier(Modifier::CROSSED_OUT),
        SegmentKind::Added => Style::default().fg(GREEN).add_modifier(Modifier::BOLD),
    }
}

/// Split styled text on newlines into ratatui lines
fn styled_lines(pieces: impl Iterator<Item = (String, Style)>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();

    for (text, style) in pieces {
        let mut parts = text.split('\n').peekable();
        while let Some(part) = parts.next() {
            if !part.is_empty() {
                current.push(Span::styled(part.to_string(), style));
            }
            if parts.peek().is_some() {
                lines.push(Line::from(std::mem::take(&mut current)));
            }
        }
    }
    if !current.is_empty() {
        lines.push(Line::from(current));
    }
    lines
}

fn draw_feedback(frame: &mut Frame, heading: &str, feedback: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MAUVE))
        .title(Span::styled(
            heading.to_uppercase(),
            Style::default().fg(MAUVE).add_modifier(Modifier::BOLD),
        ));

    let paragraph = Paragraph::new(Span::styled(
        format!("\"{feedback}\""),
        Style::default().fg(TEXT).add_modifier(Modifier::ITALIC),
    ))
    .block(block)
    .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn draw_sidebar(frame: &mut Frame, app: &App, area: Rect) {
    let corrections = app.corrections();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(pane_style(app, Focus::Sidebar))
        .title(format!("Corrections ({})", corrections.len()));

    let items: Vec<ListItem> = corrections
        .iter()
        .enumerate()
        .map(|(i, correction)| {
            let selected = i == app.sidebar_selected;
            let marker = if selected { ">" } else { " " };
            let placed = if app.is_placed(i) { "" } else { "?" };

            let label = correction
                .category()
                .map(|c| c.key())
                .unwrap_or(correction.kind.as_str());
            let line1 = format!("{} [{}]{} {}", marker, label, placed, preview(&correction.replacement, 18));
            let line2 = format!("   was \"{}\"", preview(&correction.original, 22));

            let color = correction.category().map(category_color).unwrap_or(SUBTEXT0);
            let style = if selected {
                Style::default().fg(color).bg(SURFACE1)
            } else {
                Style::default().fg(color)
            };

            ListItem::new(vec![
                Line::from(Span::styled(line1, style)),
                Line::from(Span::styled(line2, style.fg(SUBTEXT0))),
            ])
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mode_str = match app.mode {
        Mode::Normal => match app.view {
            View::Highlighted => "HIGHLIGHT",
            View::Diff => "DIFF",
        },
        Mode::Detail => "DETAIL",
        Mode::Help => "HELP",
    };

    let status = app.status_message.as_deref().unwrap_or("");
    let help_hint = "j/k scroll | ]/[ next/prev | v view | Enter detail | e export | ? help";

    let status_text = format!(
        " {} | {}",
        mode_str,
        if status.is_empty() { help_hint } else { status },
    );

    let status_bar = Paragraph::new(status_text).style(Style::default().fg(SUBTEXT0).bg(SURFACE0));
    frame.render_widget(status_bar, area);
}

fn draw_detail(frame: &mut Frame, app: &App) {
    let Some((index, correction)) = app.selected_correction() else {
        return;
    };

    let area = centered_rect(60, 14, frame.area());
    frame.render_widget(Clear, area);

    let color = correction.category().map(category_color).unwrap_or(SUBTEXT0);
    let heading = correction
        .category()
        .map(|c| c.as_str())
        .unwrap_or(correction.kind.as_str());

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(format!("#{} {} (any key to close)", index + 1, heading));

    let mut lines = vec![
        Line::from(vec![
            Span::styled(correction.original.clone(), Style::default().fg(RED).add_modifier(Modifier::CROSSED_OUT)),
            Span::styled(" -> ", Style::default().fg(SUBTEXT0)),
            Span::styled(correction.replacement.clone(), Style::default().fg(GREEN).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
    ];

    if !correction.explanation.is_empty() {
        lines.push(Line::from(Span::styled(correction.explanation.clone(), Style::default().fg(TEXT))));
    }

    if !correction.examples.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Examples",
            Style::default().fg(MAUVE).add_modifier(Modifier::BOLD),
        )));
        for example in &correction.examples {
            lines.push(Line::from(Span::styled(format!("  {example}"), Style::default().fg(TEAL))));
        }
    }

    if !app.is_placed(index) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Not located in the corrected text",
            Style::default().fg(SUBTEXT0),
        )));
    }

    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn draw_help(frame: &mut Frame) {
    let area = centered_rect(60, 17, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BLUE))
        .title("Help (press any key to close)");

    let help_text = vec![
        Line::from(Span::styled("Navigation", Style::default().fg(MAUVE).add_modifier(Modifier::BOLD))),
        Line::from("  j/k      Scroll down/up (or move in sidebar)"),
        Line::from("  g        Go to top"),
        Line::from("  ]/[      Next/prev correction"),
        Line::from("  Tab      Toggle document/sidebar"),
        Line::from(""),
        Line::from(Span::styled("Review", Style::default().fg(MAUVE).add_modifier(Modifier::BOLD))),
        Line::from("  v        Toggle highlighted/diff view"),
        Line::from("  Enter    Show correction details"),
        Line::from(""),
        Line::from(Span::styled("File", Style::default().fg(MAUVE).add_modifier(Modifier::BOLD))),
        Line::from("  e        Download review as JSON"),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", Style::default().fg(SUBTEXT0))),
    ];

    frame.render_widget(Paragraph::new(help_text).block(block), area);
}

fn category_color(category: Category) -> Color {
    match category {
        Category::Spelling => RED,
        Category::Grammar => BLUE,
        Category::Tone => MAUVE,
        Category::Punctuation => YELLOW,
    }
}

fn preview(text: &str, max: usize) -> String {
    let mut preview: String = text.chars().take(max).collect::<String>().replace('\n', " ");
    if text.chars().count() > max {
        preview.push_str("...");
    }
    preview
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

