//! Layout and widgets for the terminal form.

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::app::{App, Focus, Outcome};
use crate::types::{Emphasis, Pollutant, SeverityBand};

/// Draw the main UI layout.
pub fn draw_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),  // Header
            Constraint::Min(14),    // Form + result
            Constraint::Length(3),  // Footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    draw_form(frame, body[0], app);
    draw_result(frame, body[1], app);
    draw_footer(frame, chunks[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new("Air Quality Index Predictor")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(title, area);
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    let mut lines: Vec<Line> = Pollutant::ALL
        .iter()
        .map(|pollutant| {
            let index = pollutant.index();
            let focused = app.focus == Focus::Field(index);
            let value_style = if focused {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if focused { "▶ " } else { "  " };

            Line::from(vec![
                Span::raw(marker),
                Span::styled(
                    format!("{:<38}", pollutant.label()),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(format!(" {:>10} ", app.fields[index]), value_style),
            ])
        })
        .collect();

    let button_style = if app.focus == Focus::PredictButton {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("  [ Predict ]  ", button_style)));

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Enter Pollutant Concentrations "),
    );

    frame.render_widget(form, area);
}

fn draw_result(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Result ");

    let paragraph = match &app.outcome {
        Some(Outcome::Report(report)) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    report.metric_text(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::raw(""),
                Line::from(Span::styled(
                    format!(" {} ", report.banner_text()),
                    banner_style(report.band),
                )),
                Line::raw(""),
                Line::from(Span::styled(
                    format!("model: {}  latency: {} μs", report.model, report.latency_us),
                    Style::default().fg(Color::DarkGray),
                )),
            ];
            if report.out_of_range {
                lines.push(Line::from(Span::styled(
                    "Estimate lies outside the 0-500 index scale",
                    Style::default().fg(Color::Yellow),
                )));
            }
            Paragraph::new(lines)
        }
        Some(Outcome::Failure(message)) => Paragraph::new(message.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true }),
        None => Paragraph::new("Enter concentrations and press Predict")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
    };

    frame.render_widget(paragraph.block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = "[↑↓/Tab] Move  [0-9 .] Edit  [r] Reset field  [Enter/Ctrl+P] Predict  [q] Quit";

    let status = match &app.status_message {
        Some((message, _)) => format!("{} | {}", message, app.metrics.summary_line()),
        None => app.metrics.summary_line(),
    };

    let footer = Paragraph::new(vec![Line::raw(status), Line::raw(help)])
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));

    frame.render_widget(footer, area);
}

fn banner_style(band: SeverityBand) -> Style {
    let color = match band.emphasis() {
        Emphasis::Success => Color::Green,
        Emphasis::Info => Color::Blue,
        Emphasis::Warning => Color::Yellow,
        Emphasis::Error => Color::Red,
        Emphasis::Neutral => Color::Gray,
    };
    Style::default()
        .fg(Color::Black)
        .bg(color)
        .add_modifier(Modifier::BOLD)
}
