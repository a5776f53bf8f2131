use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::game::{GameState, LetterState, SessionStatus};
use crate::word_bank::Language;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const KEYBOARD_ROW_LEN: usize = 13;
const ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

const TITLE_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const DIM_STYLE: Style = Style::new().add_modifier(Modifier::DIM);
const WON_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Green)
    .add_modifier(Modifier::BOLD);
const LOST_STYLE: Style = Style::new()
    .fg(Color::White)
    .bg(Color::Red)
    .add_modifier(Modifier::BOLD);
const FAREWELL_STYLE: Style = Style::new()
    .fg(Color::LightMagenta)
    .add_modifier(Modifier::ITALIC);

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let game = &self.game;
        let inner_width = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);

        let status = game.status_text();
        let status_lines = (status.width() as u16).div_ceil(inner_width).max(1);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(2),            // title + blurb
                Constraint::Length(1),            // padding
                Constraint::Length(status_lines), // status
                Constraint::Length(1),            // padding
                Constraint::Length(2),            // language chips
                Constraint::Length(1),            // timer
                Constraint::Length(1),            // padding
                Constraint::Length(1),            // word
                Constraint::Length(1),            // padding
                Constraint::Length(2),            // keyboard
                Constraint::Length(1),            // padding
                Constraint::Length(1),            // guesses remaining
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        render_header(game, chunks[0], buf);
        render_status(game, &status, chunks[2], buf);
        render_chips(game, chunks[4], buf);

        Paragraph::new(Span::styled(
            game.remaining_time().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        render_word(game, chunks[7], buf);
        render_keyboard(game, chunks[9], buf);

        Paragraph::new(format!("Guesses remaining: {}", game.guesses_remaining()))
            .alignment(Alignment::Center)
            .render(chunks[11], buf);

        let legend = if game.is_game_over() {
            "(enter) new game / (esc)ape"
        } else {
            "type a letter to guess / (esc)ape"
        };
        Paragraph::new(Span::styled(
            legend,
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[13], buf);
    }
}

fn render_header(game: &GameState, area: Rect, buf: &mut Buffer) {
    let lines = vec![
        Line::from(Span::styled("Assembly: Endgame", TITLE_STYLE)),
        Line::from(Span::styled(
            format!(
                "Guess the word within {} attempts to keep the programming world safe from Assembly!",
                game.max_wrong_guesses()
            ),
            DIM_STYLE,
        )),
    ];
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_status(game: &GameState, status: &str, area: Rect, buf: &mut Buffer) {
    let style = match game.session_status() {
        SessionStatus::Won => WON_STYLE,
        SessionStatus::LostByGuesses | SessionStatus::LostByTimeout => LOST_STYLE,
        SessionStatus::InProgress => FAREWELL_STYLE,
    };
    Paragraph::new(Span::styled(status.to_string(), style))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn chip_style(language: &Language, lost: bool) -> Style {
    if lost {
        return Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
    }
    let mut style = Style::default();
    if let Some((r, g, b)) = language.background_rgb() {
        style = style.bg(Color::Rgb(r, g, b));
    }
    if let Some((r, g, b)) = language.foreground_rgb() {
        style = style.fg(Color::Rgb(r, g, b));
    }
    style
}

fn render_chips(game: &GameState, area: Rect, buf: &mut Buffer) {
    let wrong = game.wrong_guess_count();
    let mut spans = Vec::new();
    for (idx, language) in game.languages().iter().enumerate() {
        let lost = idx < wrong;
        let label = if lost {
            format!(" 💀 {} ", language.name)
        } else {
            format!(" {} ", language.name)
        };
        spans.push(Span::styled(label, chip_style(language, lost)));
        spans.push(Span::raw(" "));
    }
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_word(game: &GameState, area: Rect, buf: &mut Buffer) {
    let lost = game.session_status().is_lost();
    let missed = game.missed_letters();
    let spans: Vec<Span> = game
        .masked_word()
        .into_iter()
        .flat_map(|slot| {
            let cell = match slot {
                Some(c) => {
                    let style = if lost && missed.contains(&c) {
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().add_modifier(Modifier::BOLD)
                    };
                    Span::styled(format!(" {} ", c.to_ascii_uppercase()), style)
                }
                None => Span::styled(" _ ", DIM_STYLE),
            };
            [cell, Span::raw(" ")]
        })
        .collect();
    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn key_style(state: LetterState, disabled: bool) -> Style {
    let style = match state {
        LetterState::Correct => Style::default().fg(Color::Black).bg(Color::Green),
        LetterState::Wrong => Style::default().fg(Color::White).bg(Color::Red),
        LetterState::Unguessed => Style::default().fg(Color::Black).bg(Color::Yellow),
    };
    if disabled {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

fn render_keyboard(game: &GameState, area: Rect, buf: &mut Buffer) {
    let disabled = game.is_game_over();
    let letters: Vec<char> = ALPHABET.chars().collect();
    let lines: Vec<Line> = letters
        .chunks(KEYBOARD_ROW_LEN)
        .map(|row| {
            let spans: Vec<Span> = row
                .iter()
                .flat_map(|&c| {
                    [
                        Span::styled(
                            format!(" {} ", c.to_ascii_uppercase()),
                            key_style(game.letter_state(c), disabled),
                        ),
                        Span::raw(" "),
                    ]
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}
