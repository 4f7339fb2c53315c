pub mod cli;
pub mod db;
pub mod parser;

pub use cli::{commands, ux};
