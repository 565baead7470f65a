pub mod analysis;
pub mod cli;
pub mod combat;
pub mod config;
pub mod data;
pub mod error;
pub mod tournament;

pub use error::{CodemonError, Result};
