use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use hexle::{
    game::{Game, RoundTime, Summary},
    util::format_clock,
};

use crate::ui::toast_widget;

const PANEL_WIDTH: u16 = 44;

/// Pure presenter for a single round line of the summary
pub fn present_round(index: usize, round: &RoundTime) -> Line<'static> {
    let label = format!("Round {} ({} letters): ", index + 1, round.word_length);
    let time_style = if round.recorded {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };
    let mut spans = vec![
        Span::raw(label),
        Span::styled(format_clock(round.elapsed), time_style),
    ];
    if !round.recorded {
        spans.push(Span::styled(
            " (full limit)",
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    Line::from(spans)
}

pub fn summary_lines(summary: &Summary) -> Vec<Line<'static>> {
    let mut lines: Vec<Line> = summary
        .rounds
        .iter()
        .enumerate()
        .map(|(i, r)| present_round(i, r))
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::raw("Total: "),
        Span::styled(
            format_clock(summary.total),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
    ]));
    lines
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

pub fn render_summary(game: &Game, f: &mut Frame) {
    let summary = game.summary();
    let lines = summary_lines(&summary);

    // borders plus the toast and legend rows underneath
    let panel_height = lines.len() as u16 + 2;
    let area = centered(f.area(), PANEL_WIDTH, panel_height + 4);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(panel_height),
            Constraint::Length(1), // padding
            Constraint::Length(1), // toast
            Constraint::Length(1), // padding
            Constraint::Length(1), // legend
        ])
        .split(area);

    let panel = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Final Stats")
                .title_alignment(Alignment::Center),
        )
        .alignment(Alignment::Center);
    f.render_widget(panel, chunks[0]);

    if let Some(toast) = game.toast(Instant::now()) {
        f.render_widget(toast_widget(toast), chunks[2]);
    }

    let legend = Paragraph::new(Span::styled(
        "(enter) play again / (esc) quit",
        Style::default().add_modifier(Modifier::DIM | Modifier::ITALIC),
    ))
    .alignment(Alignment::Center);
    f.render_widget(legend, chunks[4]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_present_round_recorded() {
        let line = present_round(
            0,
            &RoundTime {
                word_length: 5,
                elapsed: Duration::from_secs(83),
                recorded: true,
            },
        );
        assert_eq!(line_text(&line), "Round 1 (5 letters): 01:23");
    }

    #[test]
    fn test_present_round_charged_limit() {
        let line = present_round(
            2,
            &RoundTime {
                word_length: 9,
                elapsed: Duration::from_secs(300),
                recorded: false,
            },
        );
        assert_eq!(line_text(&line), "Round 3 (9 letters): 05:00 (full limit)");
    }

    #[test]
    fn test_summary_lines_total() {
        let summary = Summary {
            rounds: vec![
                RoundTime {
                    word_length: 5,
                    elapsed: Duration::from_secs(60),
                    recorded: true,
                },
                RoundTime {
                    word_length: 7,
                    elapsed: Duration::from_secs(300),
                    recorded: true,
                },
            ],
            total: Duration::from_secs(360),
        };
        let lines = summary_lines(&summary);
        assert_eq!(lines.len(), 4);
        assert_eq!(line_text(&lines[3]), "Total: 06:00");
    }

    #[test]
    fn test_centered_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        let rect = centered(area, 44, 4);
        assert_eq!(rect, Rect::new(0, 3, 20, 4));
    }
}
