//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub const PANIC_ON_RARE_ERR: bool = true;

pub mod client {
    /// Used when no configuration is available
    pub const CLIENT_DEFAULT_SERVER_ADDRESS: &str = "http://localhost:3000";
    pub const CLIENT_DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
    pub const CLIENT_DEFAULT_TOKEN_FILE: &str = "rentix_session.ron";
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;

    pub const PATH_LOGIN: PathSpec = PathSpec::post("/auth/login");
    pub const PATH_USERS_ME: PathSpec = PathSpec::get("/users/me");
    pub const PATH_MY_COMPANIES: PathSpec = PathSpec::get("/companies/my-companies");
    pub const PATH_SELECT_COMPANY: PathSpec = PathSpec::post("/context/select-company");
    pub const PATH_USERS: PathSpec = PathSpec::get("/users");
    pub const PATH_USERS_NEW: PathSpec = PathSpec::post("/users");
    pub const PATH_ADDRESS_DRAFT: PathSpec = PathSpec::post("/addresses/draft");

    /// Suffix appended to a resource base path to list soft deleted records
    pub const PATH_SUFFIX_TRASH: &str = "/trash";
    /// Suffix appended to a record path to undo a soft delete
    pub const PATH_SUFFIX_RESTORE: &str = "/restore";

    /// A 401 from these paths is reported to the caller but does not end the
    /// session. The identity and context endpoints can fail transiently while
    /// the session is being set up and login is expected to return 401 for
    /// wrong credentials.
    pub const PATHS_EXEMPT_FROM_FORCED_LOGOUT: [&str; 3] =
        ["/auth/login", "/users/me", "/context/select-company"];

    pub fn is_exempt_from_forced_logout(path: &str) -> bool {
        PATHS_EXEMPT_FROM_FORCED_LOGOUT.contains(&path)
    }
}
