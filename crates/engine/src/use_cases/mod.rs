//! Use cases - User story orchestration.
//!
//! Use cases orchestrate the domain engine and infrastructure ports to
//! fulfill user stories.

pub mod session;

pub use session::{EssenceSession, SessionError};
