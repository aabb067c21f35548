#![warn(unused_crate_dependencies)]

mod warning_suppress {
    // Only used in the binary
    use tokio as _;
}

mod app;
pub mod cli;
mod navigator;
pub mod tracing;

pub use app::ConsoleApp;
pub use navigator::ConsoleNavigator;
