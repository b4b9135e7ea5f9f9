// Minesweeper board engine and front-end preferences
// The terminal front-end in main.rs drives the board purely through these APIs

pub mod msw_board; // Board state, reveal/flag rules, win and loss detection
pub mod msw_config; // Persisted preferences and fixed board geometry

pub use msw_board::{Board, BoardError, Cell, GameState};
