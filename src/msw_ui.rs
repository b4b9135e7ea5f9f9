// Terminal front-end: renders the board from engine queries and forwards input to it
// Owns only view state (cursor, dialog, layout); every game rule lives in the board

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Terminal;
use std::error::Error;
use std::io::{self, Stdout};
use tracing::info;
use unicode_width::UnicodeWidthStr;

use crate::msw_color::Palette;
use mswpr::msw_board::{Board, BoardError};
use mswpr::msw_config::{save_config, Config, COLS, MINES, ROWS};

// Menu entries (key, label); Esc is drawn separately on the status row
const MENU_ITEMS: [(&str, &str); 5] = [
    ("F2", "New"),
    ("F7", "Icons"),
    ("F8", "Indicator"),
    ("F", "Flag"),
    ("Space", "Reveal"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Won,
    Lost,
}

#[derive(Debug, Clone, Copy)]
enum Move {
    Reveal,
    Flag,
}

/// Glyph and foreground colour for each kind of covered or mined cell
struct Glyphs {
    hidden: (&'static str, Color),
    mine: (&'static str, Color),
    flag: (&'static str, Color),
}

impl Glyphs {
    fn new(ascii: bool, p: &Palette) -> Self {
        Glyphs {
            hidden: (if ascii { "." } else { "■" }, p.hidden),
            mine: (if ascii { "*" } else { "☼" }, p.mine),
            flag: (if ascii { "F" } else { "⚑" }, p.flag),
        }
    }
}

#[derive(Debug)]
struct UiState {
    cursor: (usize, usize), // (row, col)
    outcome: Option<Outcome>,
    board_rect: Option<Rect>,
}

impl UiState {
    fn new() -> Self {
        UiState {
            cursor: (0, 0),
            outcome: None,
            board_rect: None,
        }
    }

    fn step_cursor(&mut self, dr: isize, dc: isize, rows: usize, cols: usize) {
        let r = (self.cursor.0 as isize + dr).clamp(0, rows as isize - 1) as usize;
        let c = (self.cursor.1 as isize + dc).clamp(0, cols as isize - 1) as usize;
        self.cursor = (r, c);
    }

    /// Map a terminal position to a board cell; each cell is two columns wide
    fn cell_at(&self, column: u16, row: u16, rows: usize, cols: usize) -> Option<(usize, usize)> {
        let brect = self.board_rect?;
        let inner = Rect::new(brect.x + 1, brect.y + 1, brect.width.saturating_sub(2), brect.height.saturating_sub(2));
        if column < inner.x || row < inner.y {
            return None;
        }
        let c = ((column - inner.x) / 2) as usize;
        let r = (row - inner.y) as usize;
        (r < rows && c < cols).then_some((r, c))
    }
}

pub fn run(cfg: &mut Config) -> Result<(), Box<dyn Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, cfg);

    // restore the terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    cfg: &mut Config,
) -> Result<(), Box<dyn Error>> {
    let palette = Palette::detect();
    let mut glyphs = Glyphs::new(cfg.ascii_icons, &palette);
    let mut board = Board::new(ROWS, COLS, MINES);
    let mut ui = UiState::new();
    info!(rows = ROWS, cols = COLS, mines = MINES, "new game");

    loop {
        terminal.draw(|f| {
            let size = f.size();
            let (min_w, min_h) = min_size(&board);
            if size.width < min_w || size.height < min_h {
                ui.board_rect = None;
                let warn_lines = vec![
                    Spans::from(Span::raw("Terminal size too small.")),
                    Spans::from(Span::raw(format!("Minimum required: {} x {}", min_w, min_h))),
                ];
                let warn = Paragraph::new(Text::from(warn_lines))
                    .block(Block::default().borders(Borders::ALL).title("Resize Terminal"))
                    .alignment(Alignment::Center);
                f.render_widget(Clear, size);
                let area = center_rect(40u16.min(size.width), 4u16.min(size.height), size);
                f.render_widget(warn, area);
                return;
            }

            // layout: top menu row, center board, bottom status
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(6), Constraint::Length(3)].as_ref())
                .split(size);

            f.render_widget(menu_paragraph(&palette), chunks[0]);
            f.render_widget(status_paragraph(&board, chunks[2].width, &palette), chunks[2]);

            let board_area = center_rect((board.cols() * 2) as u16 + 3, board.rows() as u16 + 2, chunks[1]);
            ui.board_rect = Some(board_area);
            let title = format!("{}x{}", board.rows(), board.cols());
            let paragraph = Paragraph::new(Text::from(board_lines(&board, &ui, cfg, &glyphs, &palette)))
                .block(Block::default().borders(Borders::ALL).title(title).title_alignment(Alignment::Center));
            f.render_widget(paragraph, board_area);

            if let Some(outcome) = ui.outcome {
                let (title, headline, detail) = match outcome {
                    Outcome::Won => ("Success", "Mines Cleared — You Win!", "Every safe cell is open."),
                    Outcome::Lost => ("Failure", "Mine Exploded — You Lose!", "Better luck next time."),
                };
                let rect = bottom_centered_block(44, 7, size);
                f.render_widget(Clear, rect);
                let lines = vec![
                    Spans::from(Span::raw("")),
                    Spans::from(Span::styled(headline, Style::default().add_modifier(Modifier::BOLD))),
                    Spans::from(Span::raw(detail)),
                    Spans::from(Span::raw("")),
                    Spans::from(Span::styled("Press any key for a new game", Style::default().fg(palette.key))),
                ];
                let p = Paragraph::new(Text::from(lines))
                    .block(Block::default().borders(Borders::ALL).title(title))
                    .alignment(Alignment::Center);
                f.render_widget(p, rect);
            }
        })?;

        match event::read()? {
            Event::Key(KeyEvent { code, kind: KeyEventKind::Press, .. }) => {
                // any key dismisses the end-of-game dialog
                if ui.outcome.is_some() {
                    new_game(&mut board, &mut ui);
                    continue;
                }
                match code {
                    KeyCode::Esc => break,
                    KeyCode::F(2) => new_game(&mut board, &mut ui),
                    KeyCode::F(7) => {
                        cfg.ascii_icons = !cfg.ascii_icons;
                        glyphs = Glyphs::new(cfg.ascii_icons, &palette);
                        save_config(cfg);
                    }
                    KeyCode::F(8) => {
                        cfg.show_indicator = !cfg.show_indicator;
                        save_config(cfg);
                    }
                    KeyCode::Left => ui.step_cursor(0, -1, board.rows(), board.cols()),
                    KeyCode::Right => ui.step_cursor(0, 1, board.rows(), board.cols()),
                    KeyCode::Up => ui.step_cursor(-1, 0, board.rows(), board.cols()),
                    KeyCode::Down => ui.step_cursor(1, 0, board.rows(), board.cols()),
                    KeyCode::Char(' ') | KeyCode::Enter => play(&mut board, &mut ui, Move::Reveal)?,
                    KeyCode::Char('f') | KeyCode::Char('F') => play(&mut board, &mut ui, Move::Flag)?,
                    _ => {}
                }
            }
            Event::Mouse(me) => {
                if ui.outcome.is_some() {
                    if let MouseEventKind::Down(_) = me.kind {
                        new_game(&mut board, &mut ui);
                    }
                    continue;
                }
                let Some(pos) = ui.cell_at(me.column, me.row, board.rows(), board.cols()) else {
                    continue;
                };
                match me.kind {
                    MouseEventKind::Moved => ui.cursor = pos,
                    MouseEventKind::Down(MouseButton::Left) => {
                        ui.cursor = pos;
                        play(&mut board, &mut ui, Move::Reveal)?;
                    }
                    MouseEventKind::Down(MouseButton::Right) => {
                        ui.cursor = pos;
                        play(&mut board, &mut ui, Move::Flag)?;
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Forward a move at the cursor to the board, then settle the outcome
fn play(board: &mut Board, ui: &mut UiState, mv: Move) -> Result<(), BoardError> {
    let (row, col) = ui.cursor;
    match mv {
        Move::Reveal => board.reveal(row, col)?,
        Move::Flag => board.toggle_flag(row, col)?,
    }
    if board.is_game_over() {
        board.reveal_all_mines();
        ui.outcome = Some(Outcome::Lost);
        info!(row, col, "game lost");
    } else if board.is_win() {
        ui.outcome = Some(Outcome::Won);
        info!("game won");
    }
    Ok(())
}

fn new_game(board: &mut Board, ui: &mut UiState) {
    *board = Board::new(ROWS, COLS, MINES);
    ui.cursor = (0, 0);
    ui.outcome = None;
    info!(rows = ROWS, cols = COLS, mines = MINES, "new game");
}

fn min_size(board: &Board) -> (u16, u16) {
    let menu_w = MENU_ITEMS.iter().map(|(k, l)| k.width() + 2 + l.width() + 3).sum::<usize>() + 2;
    let w = (board.cols() * 2 + 3).max(menu_w) as u16;
    let h = board.rows() as u16 + 8;
    (w, h)
}

fn menu_paragraph(palette: &Palette) -> Paragraph<'static> {
    let mut spans = vec![Span::raw(" ")];
    for (i, (key, label)) in MENU_ITEMS.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(*key, Style::default().fg(palette.key).add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(format!(": {}", label)));
    }
    Paragraph::new(Spans::from(spans)).block(Block::default().borders(Borders::ALL)).alignment(Alignment::Left)
}

/// Mine and flag counters on the left, Esc: Exit right-aligned
fn status_paragraph(board: &Board, width: u16, palette: &Palette) -> Paragraph<'static> {
    let left = format!(
        " Mines: {}   Flags left: {} ",
        board.mine_total(),
        board.mine_total() - board.flags_placed()
    );
    let (right_key, right_rest) = ("Esc", "Exit");
    let inner_w = width.saturating_sub(2) as usize;
    let used = left.width() + right_key.width() + 2 + right_rest.width() + 1;
    let mid_spaces = inner_w.saturating_sub(used).max(1);
    let spans = vec![
        Span::raw(left),
        Span::raw(" ".repeat(mid_spaces)),
        Span::styled(right_key, Style::default().fg(palette.key).add_modifier(Modifier::BOLD)),
        Span::raw(format!(": {} ", right_rest)),
    ];
    Paragraph::new(Text::from(Spans::from(spans))).block(Block::default().borders(Borders::ALL))
}

fn board_lines(board: &Board, ui: &UiState, cfg: &Config, glyphs: &Glyphs, p: &Palette) -> Vec<Spans<'static>> {
    let mut lines = Vec::with_capacity(board.rows());
    for r in 0..board.rows() {
        let mut spans = Vec::with_capacity(board.cols() + 1);
        for c in 0..board.cols() {
            let cell = board.cell(r, c).unwrap_or_default();
            let (s, mut style) = if cell.revealed {
                if cell.mine {
                    (glyphs.mine.0.to_string(), Style::default().fg(glyphs.mine.1).bg(p.opened))
                } else if cell.adj > 0 {
                    (cell.adj.to_string(), Style::default().fg(p.digit(cell.adj)).bg(p.opened).add_modifier(Modifier::BOLD))
                } else {
                    (" ".to_string(), Style::default().bg(p.opened))
                }
            } else if cell.flagged {
                (glyphs.flag.0.to_string(), Style::default().fg(glyphs.flag.1).bg(p.board))
            } else {
                (glyphs.hidden.0.to_string(), Style::default().fg(glyphs.hidden.1).bg(p.board))
            };
            let at_cursor = ui.outcome.is_none() && ui.cursor == (r, c);
            if at_cursor {
                style = style.bg(p.cursor);
            }
            if cfg.show_indicator && at_cursor {
                spans.push(Span::styled("▸", style.fg(p.key).add_modifier(Modifier::BOLD)));
                spans.push(Span::styled(s, style));
            } else {
                spans.push(Span::styled(format!(" {}", s), style));
            }
        }
        // trailing padding column in the board background
        spans.push(Span::styled(" ", Style::default().bg(p.board)));
        lines.push(Spans::from(spans));
    }
    lines
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn bottom_centered_block(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + r.height.saturating_sub(height);
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}
