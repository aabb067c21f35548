//! Decides where the user may go given the current session, and turns
//! session outcomes into navigation

mod guard;
mod route;
mod router;

pub use guard::{evaluate, GuardDecision};
pub use route::{Route, UnknownRoute};
pub use router::{Navigator, RouterAdapter};
