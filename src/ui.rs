pub mod screen;
pub mod summary;

use std::time::Instant;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use hexle::{
    evaluate::{KeyStates, LetterScore},
    game::{Game, Phase, Round, Toast, ToastKind, MAX_ATTEMPTS},
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const KEYBOARD_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        render_play(&self.game, Instant::now(), area, buf);
    }
}

/// Board, keyboard, countdown and toast for the round in progress
pub fn render_play(game: &Game, now: Instant, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(1),                  // countdown
                Constraint::Length(1),                  // padding
                Constraint::Length(MAX_ATTEMPTS as u16), // board
                Constraint::Length(1),                  // padding
                Constraint::Length(1),                  // toast
                Constraint::Length(1),                  // padding
                Constraint::Length(3),                  // keyboard
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ]
            .as_ref(),
        )
        .split(area);

    let countdown_style = if game.round().remaining(now).as_secs() <= 30 {
        bold_style.fg(Color::Red)
    } else {
        bold_style
    };
    Paragraph::new(Span::styled(game.countdown_text(now), countdown_style))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    Paragraph::new(board_lines(game.round(), game.phase()))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

    if let Some(toast) = game.toast(now) {
        toast_widget(toast).render(chunks[4], buf);
    }

    Paragraph::new(keyboard_lines(&game.round().keys))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

    let legend = if game.is_validating() {
        "checking dictionary..."
    } else {
        "(enter) submit / (backspace) delete / (ctrl+r) restart / (esc) quit"
    };
    Paragraph::new(Span::styled(legend, dim_style.add_modifier(Modifier::ITALIC)))
        .alignment(Alignment::Center)
        .render(chunks[8], buf);
}

pub fn toast_widget(toast: &Toast) -> Paragraph<'_> {
    let color = match toast.kind {
        ToastKind::Info => Color::Cyan,
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
    };
    Paragraph::new(Span::styled(
        toast.text.as_str(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
}

pub fn score_style(score: Option<LetterScore>) -> Style {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    match score {
        Some(LetterScore::Correct) => bold_style.fg(Color::Black).bg(Color::Green),
        Some(LetterScore::Present) => bold_style.fg(Color::Black).bg(Color::Yellow),
        Some(LetterScore::Absent) => bold_style.fg(Color::White).bg(Color::DarkGray),
        None => bold_style,
    }
}

fn tile(letter: Option<char>, style: Style) -> Span<'static> {
    Span::styled(format!(" {} ", letter.unwrap_or('·')), style)
}

fn board_lines(round: &Round, phase: &Phase) -> Vec<Line<'static>> {
    let typed_style = Style::default()
        .add_modifier(Modifier::BOLD)
        .add_modifier(Modifier::UNDERLINED);
    let pending_style = typed_style.add_modifier(Modifier::ITALIC | Modifier::DIM);
    let empty_style = Style::default().add_modifier(Modifier::DIM);

    (0..MAX_ATTEMPTS)
        .map(|i| {
            let spans: Vec<Span> = if let Some(row) = round.rows.get(i) {
                row.word
                    .chars()
                    .zip(row.scores.iter())
                    .map(|(c, score)| tile(Some(c), score_style(Some(*score))))
                    .collect()
            } else if i == round.rows.len() && !matches!(phase, Phase::Finished) {
                let style = if matches!(phase, Phase::Validating { .. }) {
                    pending_style
                } else {
                    typed_style
                };
                let typed: Vec<char> = round.guess.chars().collect();
                (0..round.word_length)
                    .map(|j| match typed.get(j) {
                        Some(c) => tile(Some(*c), style),
                        None => tile(None, empty_style),
                    })
                    .collect()
            } else {
                (0..round.word_length)
                    .map(|_| tile(None, empty_style))
                    .collect()
            };
            Line::from(spans)
        })
        .collect()
}

fn keyboard_lines(keys: &KeyStates) -> Vec<Line<'static>> {
    KEYBOARD_ROWS
        .iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .chars()
                .map(|c| tile(Some(c), score_style(keys.get(c))))
                .collect();
            Line::from(spans)
        })
        .collect()
}
