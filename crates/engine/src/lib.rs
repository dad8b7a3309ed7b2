//! EssenceCalc Engine library.
//!
//! This crate contains everything around the rules engine that touches the
//! outside world.
//!
//! ## Structure
//!
//! - `use_cases/` - The essence session: engine plus persistence
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `cli` - Command-line entry point
//! - `app` - Application composition

pub mod app;
pub mod cli;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
