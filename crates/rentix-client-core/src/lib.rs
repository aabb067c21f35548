//! Client side core of Rentix: token storage, the API gateway, the session
//! state machine and the navigation rules derived from the session.
//! NB: The assumption is made that the async runtime has already been started
//! before any functions from this library are called

#![warn(unused_crate_dependencies)]


mod client;
pub mod configuration;
pub mod menu;
pub mod navigation;
pub mod onboarding;
pub mod session;
pub mod token_store;

pub use client::{no_cb, ApiReceiver, Client, UiCallBack, UnauthorizedHook, NO_ARGS};
pub use configuration::{get_configuration, ClientConfiguration};
pub use menu::{project_menu, MenuEntry};
pub use navigation::{evaluate, GuardDecision, Navigator, Route, RouterAdapter};
pub use onboarding::{
    CompanyOnboarding, OnboardingError, OnboardingStep, OnboardingSummary, OwnerChoice,
};
pub use session::{
    SessionBackend, SessionError, SessionManager, SessionOutcome, SessionPhase, SessionSnapshot,
};
pub use token_store::{FileTokenStore, MemoryTokenStore, SharedTokenStore, TokenStore};
