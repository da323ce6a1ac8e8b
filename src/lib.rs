pub mod config;
pub mod constants;
pub mod difficulty;
pub mod entities;
pub mod error;
pub mod field;
pub mod game;
pub mod input;
pub mod rendering;
pub mod round;
pub mod scheduler;
pub mod terminal_io;
pub mod types;
