// Board engine: mine placement, adjacency counts, reveal propagation and flags
// Holds no presentation state; the front-end re-reads it after every mutation

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fmt;
use tracing::{debug, trace};

/// Error returned for coordinates outside the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::OutOfBounds { row, col, rows, cols } => write!(
                f,
                "cell ({}, {}) is outside the {}x{} board",
                row, col, rows, cols
            ),
        }
    }
}

impl Error for BoardError {}

/// Lifecycle of a single game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    NotStarted, // No mines placed yet
    InProgress,
    Won,
    Lost,
}

/// A single cell on the board
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub mine: bool,     // Contains a mine
    pub revealed: bool, // Uncovered by the player (or by reveal_all_mines)
    pub flagged: bool,  // Marked by the player
    pub adj: u8,        // Adjacent mine count (0-8)
}

/// Board state and mutation rules
///
/// Mines are placed lazily on the first reveal so the first cell opened is always safe.
/// The random source is a type parameter so tests can inject a seeded generator.
#[derive(Debug, Clone)]
pub struct Board<R = StdRng> {
    rows: usize,
    cols: usize,
    mine_total: usize,
    cells: Vec<Cell>,
    flags_placed: usize,
    revealed_count: usize,
    game_over: bool,
    mines_placed: bool,
    rng: R,
}

impl Board<StdRng> {
    /// Create an empty board whose mines will come from an entropy-seeded generator
    pub fn new(rows: usize, cols: usize, mines: usize) -> Self {
        Board::with_rng(rows, cols, mines, StdRng::from_entropy())
    }

    /// Create a board with mines already at the given cells
    ///
    /// Placement is considered done, so the first reveal is not guaranteed safe.
    /// Duplicate positions count once.
    pub fn with_layout(
        rows: usize,
        cols: usize,
        mines: &[(usize, usize)],
    ) -> Result<Self, BoardError> {
        let mut board = Board::with_rng(rows, cols, 0, StdRng::from_entropy());
        for &(row, col) in mines {
            let idx = board.index(row, col)?;
            if !board.cells[idx].mine {
                board.cells[idx].mine = true;
                board.mine_total += 1;
            }
        }
        board.count_adjacent();
        board.mines_placed = true;
        Ok(board)
    }
}

impl<R: Rng> Board<R> {
    /// Create an empty board drawing mine positions from `rng`
    ///
    /// The mine count is clamped to leave at least one safe cell.
    pub fn with_rng(rows: usize, cols: usize, mines: usize, rng: R) -> Self {
        let n = rows * cols;
        Board {
            rows,
            cols,
            mine_total: mines.min(n.saturating_sub(1)),
            cells: vec![Cell::default(); n],
            flags_placed: 0,
            revealed_count: 0,
            game_over: false,
            mines_placed: false,
            rng,
        }
    }

    /// Reveal a cell, flooding outward from cells with no adjacent mines
    ///
    /// Does nothing after a loss or on a revealed or flagged cell.
    /// The first accepted reveal places the mines, never on this cell.
    pub fn reveal(&mut self, row: usize, col: usize) -> Result<(), BoardError> {
        let start = self.index(row, col)?;
        if self.game_over || self.cells[start].revealed || self.cells[start].flagged {
            return Ok(());
        }
        if !self.mines_placed {
            self.place_mines(start);
        }

        let before = self.revealed_count;
        let mut pending = vec![start];
        while let Some(idx) = pending.pop() {
            let cell = &mut self.cells[idx];
            if cell.revealed || cell.flagged {
                continue;
            }
            cell.revealed = true;
            let Cell { mine, adj, .. } = *cell;
            self.revealed_count += 1;
            if mine {
                debug!(row = idx / self.cols, col = idx % self.cols, "mine revealed, game over");
                self.game_over = true;
                return Ok(());
            }
            if adj == 0 {
                pending.extend(self.neighbours(idx).filter(|&n| !self.cells[n].revealed));
            }
        }
        debug!(row, col, opened = self.revealed_count - before, "cells revealed");
        Ok(())
    }

    /// Toggle the flag on a hidden cell
    ///
    /// New flags are refused once as many flags as mines are on the board.
    pub fn toggle_flag(&mut self, row: usize, col: usize) -> Result<(), BoardError> {
        let idx = self.index(row, col)?;
        if self.game_over || self.cells[idx].revealed {
            return Ok(());
        }
        if self.cells[idx].flagged {
            self.cells[idx].flagged = false;
            self.flags_placed -= 1;
        } else if self.flags_placed < self.mine_total {
            self.cells[idx].flagged = true;
            self.flags_placed += 1;
        }
        trace!(row, col, flags = self.flags_placed, "flag toggled");
        Ok(())
    }

    /// Uncover every mine, e.g. to show the layout after a loss
    pub fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut().filter(|c| c.mine) {
            cell.revealed = true;
        }
    }

    fn place_mines(&mut self, safe: usize) {
        let n = self.cells.len();
        let mut placed = 0;
        while placed < self.mine_total {
            let i = self.rng.gen_range(0..n);
            if i == safe || self.cells[i].mine {
                continue;
            }
            self.cells[i].mine = true;
            placed += 1;
        }
        self.count_adjacent();
        self.mines_placed = true;
        debug!(
            mines = placed,
            safe_row = safe / self.cols,
            safe_col = safe % self.cols,
            "mines placed"
        );
    }
}

impl<R> Board<R> {
    /// Every non-mine cell has been revealed
    pub fn is_win(&self) -> bool {
        self.revealed_count == self.cells.len() - self.mine_total
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn state(&self) -> GameState {
        if self.game_over {
            GameState::Lost
        } else if !self.mines_placed {
            GameState::NotStarted
        } else if self.is_win() {
            GameState::Won
        } else {
            GameState::InProgress
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn mine_total(&self) -> usize {
        self.mine_total
    }

    pub fn flags_placed(&self) -> usize {
        self.flags_placed
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn mines_placed(&self) -> bool {
        self.mines_placed
    }

    pub fn cell(&self, row: usize, col: usize) -> Result<Cell, BoardError> {
        self.index(row, col).map(|i| self.cells[i])
    }

    pub fn has_mine(&self, row: usize, col: usize) -> Result<bool, BoardError> {
        self.cell(row, col).map(|c| c.mine)
    }

    pub fn is_revealed(&self, row: usize, col: usize) -> Result<bool, BoardError> {
        self.cell(row, col).map(|c| c.revealed)
    }

    pub fn is_flagged(&self, row: usize, col: usize) -> Result<bool, BoardError> {
        self.cell(row, col).map(|c| c.flagged)
    }

    pub fn adjacent_mines(&self, row: usize, col: usize) -> Result<u8, BoardError> {
        self.cell(row, col).map(|c| c.adj)
    }

    /// Convert (row, col) coordinates to a flat index
    fn index(&self, row: usize, col: usize) -> Result<usize, BoardError> {
        if row < self.rows && col < self.cols {
            Ok(row * self.cols + col)
        } else {
            Err(BoardError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Flat indices of the Moore neighbourhood, clipped at the edges
    fn neighbours(&self, idx: usize) -> impl Iterator<Item = usize> {
        let (row, col, cols) = (idx / self.cols, idx % self.cols, self.cols);
        let rows = row.saturating_sub(1)..=(row + 1).min(self.rows - 1);
        rows.flat_map(move |r| {
            (col.saturating_sub(1)..=(col + 1).min(cols - 1)).map(move |c| (r, c))
        })
        .filter(move |&(r, c)| (r, c) != (row, col))
        .map(move |(r, c)| r * cols + c)
    }

    fn count_adjacent(&mut self) {
        for idx in 0..self.cells.len() {
            let adj = self.neighbours(idx).filter(|&n| self.cells[n].mine).count();
            self.cells[idx].adj = adj as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;

    fn seeded(rows: usize, cols: usize, mines: usize, seed: u64) -> Board<ChaCha8Rng> {
        Board::with_rng(rows, cols, mines, ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn new_board_is_empty() {
        let board = seeded(4, 6, 5, 1);
        assert_eq!(board.state(), GameState::NotStarted);
        assert!(!board.mines_placed());
        assert!(board.cells.iter().all(|c| *c == Cell::default()));
    }

    #[test]
    fn neighbours_are_clipped() {
        let board = seeded(3, 4, 1, 0);
        let mut corner: Vec<_> = board.neighbours(0).collect();
        corner.sort();
        assert_eq!(corner, vec![1, 4, 5]);
        assert_eq!(board.neighbours(1).count(), 5);
        assert_eq!(board.neighbours(5).count(), 8);
        assert_eq!(board.neighbours(11).count(), 3);
    }

    #[test]
    fn single_row_board_neighbours() {
        let board = seeded(1, 5, 1, 0);
        let mut mid: Vec<_> = board.neighbours(2).collect();
        mid.sort();
        assert_eq!(mid, vec![1, 3]);
    }

    #[test]
    fn mine_count_is_clamped() {
        let board = seeded(2, 2, 10, 0);
        assert_eq!(board.mine_total(), 3);
    }

    #[test]
    fn first_reveal_places_mines() {
        let mut board = seeded(6, 6, 35, 9);
        board.reveal(2, 3).unwrap();
        assert!(board.mines_placed());
        assert_eq!(board.cells.iter().filter(|c| c.mine).count(), 35);
        assert!(!board.has_mine(2, 3).unwrap());
        // Only one safe cell, so the game is won immediately
        assert!(board.is_win());
        assert_eq!(board.state(), GameState::Won);
    }

    #[test]
    fn out_of_bounds_is_reported() {
        let mut board = seeded(3, 3, 1, 0);
        let err = board.reveal(3, 0).unwrap_err();
        assert_eq!(
            err,
            BoardError::OutOfBounds {
                row: 3,
                col: 0,
                rows: 3,
                cols: 3
            }
        );
        assert_eq!(err.to_string(), "cell (3, 0) is outside the 3x3 board");
        assert!(board.toggle_flag(0, 3).is_err());
        assert!(board.is_flagged(9, 9).is_err());
        assert!(!board.mines_placed());
    }

    #[test]
    fn layout_counts_duplicates_once() {
        let board = Board::with_layout(3, 3, &[(1, 1), (1, 1)]).unwrap();
        assert_eq!(board.mine_total(), 1);
        assert_eq!(board.adjacent_mines(0, 0).unwrap(), 1);
        assert_eq!(board.adjacent_mines(1, 1).unwrap(), 0);
        assert!(Board::with_layout(3, 3, &[(0, 3)]).is_err());
    }

    #[test]
    fn flood_stops_at_flags() {
        let mut board = Board::with_layout(1, 5, &[(0, 4)]).unwrap();
        board.toggle_flag(0, 2).unwrap();
        board.reveal(0, 0).unwrap();
        assert!(board.is_revealed(0, 1).unwrap());
        assert!(!board.is_revealed(0, 2).unwrap());
        assert!(board.is_flagged(0, 2).unwrap());
        assert!(!board.is_revealed(0, 3).unwrap());
        assert_eq!(board.revealed_count(), 2);
    }

    #[test]
    fn reveal_on_flagged_cell_is_ignored() {
        let mut board = seeded(5, 5, 3, 4);
        board.toggle_flag(2, 2).unwrap();
        board.reveal(2, 2).unwrap();
        assert!(!board.mines_placed());
        assert_eq!(board.revealed_count(), 0);
    }

    #[test]
    fn unflag_restores_budget() {
        let mut board = seeded(3, 3, 1, 2);
        board.toggle_flag(0, 0).unwrap();
        board.toggle_flag(0, 1).unwrap();
        assert!(!board.is_flagged(0, 1).unwrap());
        board.toggle_flag(0, 0).unwrap();
        assert_eq!(board.flags_placed(), 0);
        board.toggle_flag(0, 1).unwrap();
        assert!(board.is_flagged(0, 1).unwrap());
    }
}
