use std::{fmt::Display, str::FromStr};

use strum::IntoEnumIterator;

/// Every screen of the application
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::EnumIter,
    strum::EnumCount,
)]
pub enum Route {
    Login,
    SelectCompany,
    CreateCompany,
    Dashboard,
    Properties,
    Contracts,
    Tenants,
    Taxes,
    Team,
    Settings,
    MyContracts,
    MyInvoices,
    FiscalProfile,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("no screen is served at {0:?}")]
pub struct UnknownRoute(pub String);

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::SelectCompany => "/select-company",
            Route::CreateCompany => "/create-company",
            Route::Dashboard => "/app/dashboard",
            Route::Properties => "/app/properties",
            Route::Contracts => "/app/contracts",
            Route::Tenants => "/app/tenants",
            Route::Taxes => "/app/taxes",
            Route::Team => "/app/team",
            Route::Settings => "/app/settings",
            Route::MyContracts => "/app/my-contracts",
            Route::MyInvoices => "/app/my-invoices",
            Route::FiscalProfile => "/app/fiscal-profile",
        }
    }

    /// Ignores a trailing slash. `/` and `/app` lead to the dashboard
    pub fn from_path(path: &str) -> Option<Self> {
        let path = match path.trim_end_matches('/') {
            "" | "/app" => return Some(Route::Dashboard),
            trimmed => trimmed,
        };
        Self::iter().find(|route| route.path() == path)
    }

    /// Reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    /// Screens used to establish a company context, reachable without one
    pub fn is_context_setup(&self) -> bool {
        matches!(self, Route::SelectCompany | Route::CreateCompany)
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = UnknownRoute;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_path(s).ok_or_else(|| UnknownRoute(s.to_string()))
    }
}
