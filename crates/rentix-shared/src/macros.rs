/// Panics in debug builds (when [`crate::const_config::PANIC_ON_RARE_ERR`] is
/// on) so errors that should never happen are noticed during development
#[macro_export]
macro_rules! debug_panic {
    ($arg: expr) => {
        if cfg!(debug_assertions) && $crate::const_config::PANIC_ON_RARE_ERR {
            panic!("Unexpected error in the Rentix client: {:?}", $arg)
        }
    };
}

/// For failures with no known cause that do not stop the client, eg. the
/// session file could not be written
#[macro_export]
macro_rules! log_err_as_error {
    ($arg: expr) => {
        $crate::log_err_as_error!($arg, "unexpected failure")
    };
    ($arg: expr, $msg: literal) => {
        if let Err(err) = $arg {
            tracing::error!(?err, $msg);
            $crate::debug_panic!(err);
        }
    };
}

/// For failures that are expected now and then, eg. a receiver that went
/// away before its response arrived
#[macro_export]
macro_rules! log_err_as_warn {
    ($arg: expr) => {
        $crate::log_err_as_warn!($arg, "ignored failure")
    };
    ($arg: expr, $msg: literal) => {
        if let Err(mishap) = $arg {
            tracing::warn!(?mishap, $msg);
        }
    };
}
