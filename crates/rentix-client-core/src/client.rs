use closure_traits::{ChannelCallBack, ChannelCallBackOutput};
use futures::channel::oneshot;
use rentix_shared::{
    const_config::path::{is_exempt_from_forced_logout, PathSpec, PATH_LOGIN},
    errors::{ApiError, ApiResult, ErrorPayload},
    log_err_as_warn,
    storage::StoreKey,
};
use reqwest::{Method, StatusCode};
use std::fmt::Debug;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::{configuration::ClientSettings, token_store::SharedTokenStore};

pub mod api;

/// Use as the arguments of requests that do not take any
pub const NO_ARGS: &[(&str, &str)] = &[];

pub type ApiReceiver<T> = oneshot::Receiver<ApiResult<T>>;

/// Run after the gateway ended the session because a protected request was
/// rejected with 401. The token store has already been cleared when it runs
pub type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

/// The API gateway. Cheap to clone, all clones share the same token store
#[derive(Debug, Clone)]
pub struct Client {
    api_client: reqwest::Client,
    token_store: SharedTokenStore,
    inner: Arc<Mutex<ClientInner>>,
}

struct ClientInner {
    server_address: String,
    on_unauthorized: Option<UnauthorizedHook>,
}

impl Debug for ClientInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientInner")
            .field("server_address", &self.server_address)
            .field("has_unauthorized_hook", &self.on_unauthorized.is_some())
            .finish()
    }
}

impl ClientInner {
    fn new(server_address: String) -> Self {
        Self {
            server_address: server_address.trim_end_matches('/').to_string(),
            on_unauthorized: None,
        }
    }
}

impl Client {
    #[tracing::instrument(name = "NEW CLIENT-CORE", skip(token_store))]
    pub fn new(server_address: String, token_store: SharedTokenStore) -> Self {
        Self::build(server_address, None, token_store)
    }

    pub fn from_settings(settings: &ClientSettings, token_store: SharedTokenStore) -> Self {
        Self::build(
            settings.server_address.clone(),
            Some(Duration::from_secs(settings.request_timeout_secs)),
            token_store,
        )
    }

    fn build(
        server_address: String,
        timeout: Option<Duration>,
        token_store: SharedTokenStore,
    ) -> Self {
        let builder = reqwest::Client::builder();
        // Timeouts are only supported natively, the browser has its own
        #[cfg(not(target_arch = "wasm32"))]
        let builder = match timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };
        #[cfg(target_arch = "wasm32")]
        let _ = timeout;
        let api_client = builder.build().expect("Unable to create reqwest client");
        Self {
            api_client,
            token_store,
            inner: Arc::new(Mutex::new(ClientInner::new(server_address))),
        }
    }

    /// Replaces any hook set before
    pub fn set_unauthorized_hook(&self, hook: UnauthorizedHook) {
        self.inner.lock().expect("mutex poisoned").on_unauthorized = Some(hook);
    }

    pub fn server_address(&self) -> String {
        self.inner
            .lock()
            .expect("mutex poisoned")
            .server_address
            .clone()
    }

    pub fn token_store(&self) -> &SharedTokenStore {
        &self.token_store
    }

    pub fn has_access_token(&self) -> bool {
        self.token_store.get(StoreKey::AccessToken).is_some()
    }

    #[tracing::instrument(skip(args, bearer, on_done))]
    // WARNING: Must skip args as it may contain sensitive info and "safe" versions
    // would usually already be logged by the caller
    fn initiate_request<T, F, O>(
        &self,
        method: Method,
        path: &str,
        bearer: Option<&str>,
        args: &T,
        on_done: F,
    ) where
        T: serde::Serialize + Debug + ?Sized,
        F: ChannelCallBack<O>,
        O: ChannelCallBackOutput,
    {
        let is_query_method = method == Method::GET || method == Method::DELETE;
        let mut request = self.api_client.request(method, self.path_to_url(path));
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        request = if is_query_method {
            request.query(args)
        } else {
            request.json(args)
        };
        reqwest_cross::fetch(request, on_done)
    }

    /// Every request except login carries the current access token (if any)
    fn bearer_for(&self, path: &str) -> Option<String> {
        if path == PATH_LOGIN.path {
            None
        } else {
            self.token_store.get(StoreKey::AccessToken)
        }
    }

    fn send_spec_expect_json<F, T, U>(
        &self,
        path_spec: PathSpec,
        args: &T,
        ui_notify: F,
    ) -> ApiReceiver<U>
    where
        T: serde::Serialize + Debug + ?Sized,
        F: UiCallBack,
        U: Send + Debug + serde::de::DeserializeOwned + 'static,
    {
        debug!(%path_spec, "sending");
        self.send_request_expect_json(path_spec.method, path_spec.path.to_string(), args, ui_notify)
    }

    fn send_request_expect_json<F, T, U>(
        &self,
        method: Method,
        path: String,
        args: &T,
        ui_notify: F,
    ) -> ApiReceiver<U>
    where
        T: serde::Serialize + Debug + ?Sized,
        F: UiCallBack,
        U: Send + Debug + serde::de::DeserializeOwned + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let bearer = self.bearer_for(&path);
        let client = self.clone();
        let sent_with = bearer.clone();
        let request_path = path.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_json_body(resp).await;
            let msg = client.screen_unauthorized(&request_path, sent_with.as_deref(), msg);
            log_err_as_warn!(tx.send(msg), "response arrived after its receiver was dropped");
            ui_notify();
        };
        self.initiate_request(method, &path, bearer.as_deref(), args, on_done);
        rx
    }

    fn send_request_expect_empty<F, T>(
        &self,
        method: Method,
        path: String,
        args: &T,
        ui_notify: F,
    ) -> ApiReceiver<()>
    where
        T: serde::Serialize + Debug + ?Sized,
        F: UiCallBack,
    {
        let (tx, rx) = oneshot::channel();
        let bearer = self.bearer_for(&path);
        let client = self.clone();
        let sent_with = bearer.clone();
        let request_path = path.clone();
        let on_done = move |resp: reqwest::Result<reqwest::Response>| async move {
            let msg = process_empty(resp).await;
            let msg = client.screen_unauthorized(&request_path, sent_with.as_deref(), msg);
            log_err_as_warn!(tx.send(msg), "response arrived after its receiver was dropped");
            ui_notify();
        };
        self.initiate_request(method, &path, bearer.as_deref(), args, on_done);
        rx
    }

    /// Converts a 401 on a protected path into a forced logout. A 401 for a
    /// token that has since been replaced (or removed) is passed through as is
    /// so it cannot end the session that replaced it
    fn screen_unauthorized<U>(
        &self,
        path: &str,
        sent_with: Option<&str>,
        result: ApiResult<U>,
    ) -> ApiResult<U> {
        match result {
            Err(ApiError::Unauthorized(payload)) if !is_exempt_from_forced_logout(path) => {
                let current = self.token_store.get(StoreKey::AccessToken);
                if current.is_none() || current.as_deref() != sent_with {
                    debug!(path, "ignoring 401 for a token that is no longer in use");
                    return Err(ApiError::Unauthorized(payload));
                }
                warn!(path, ?payload, "protected request rejected as unauthorized");
                self.force_logout();
                Err(ApiError::SessionExpired)
            }
            other => other,
        }
    }

    #[tracing::instrument]
    fn force_logout(&self) {
        self.token_store.clear();
        let hook = self
            .inner
            .lock()
            .expect("mutex poisoned")
            .on_unauthorized
            .clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    #[tracing::instrument(ret)]
    fn path_to_url(&self, path: &str) -> String {
        format!(
            "{}{path}",
            &self
                .inner
                .lock()
                .expect("failed to unlock client mutex")
                .server_address
        )
    }
}

/// Empty function for use when a call back isn't needed
pub fn no_cb() {}

#[tracing::instrument(ret, err(Debug))]
async fn process_empty(response: reqwest::Result<reqwest::Response>) -> ApiResult<()> {
    let (response, status) = extract_response(response)?;
    if status.is_success() {
        Ok(())
    } else {
        Err(handle_error(response).await)
    }
}

#[tracing::instrument(ret, err(Debug))]
async fn process_json_body<T>(response: reqwest::Result<reqwest::Response>) -> ApiResult<T>
where
    T: Debug + serde::de::DeserializeOwned,
{
    let (response, status) = extract_response(response)?;
    if !status.is_success() {
        return Err(handle_error(response).await);
    }
    response
        .json()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

#[tracing::instrument(ret)]
async fn handle_error(response: reqwest::Response) -> ApiError {
    let status = response.status();
    debug_assert!(
        !status.is_success(),
        "this is supposed to be an error, right? Status code is: {status}"
    );
    let body = response.text().await.unwrap_or_default();
    let payload = ErrorPayload::from_body(status.as_u16(), &body);
    if status == StatusCode::UNAUTHORIZED {
        ApiError::Unauthorized(payload)
    } else {
        ApiError::Rejected {
            status: status.as_u16(),
            payload,
        }
    }
}

/// Provides a way to standardize the error message
#[tracing::instrument(ret, err(Debug))]
fn extract_response(
    response: reqwest::Result<reqwest::Response>,
) -> ApiResult<(reqwest::Response, StatusCode)> {
    let response = response.map_err(|err| {
        info!("Response is err: {err:#?}");
        ApiError::Transport(err.to_string())
    })?;
    let status = response.status();
    Ok((response, status))
}

pub trait UiCallBack: 'static + Send + FnOnce() {}
impl<T> UiCallBack for T where T: 'static + Send + FnOnce() {}

#[cfg(not(target_arch = "wasm32"))]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + Send + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> + Send {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> + Send {}
}

#[cfg(target_arch = "wasm32")]
pub mod closure_traits {
    pub trait ChannelCallBack<O>:
        'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    impl<T, O> ChannelCallBack<O> for T where
        T: 'static + FnOnce(reqwest::Result<reqwest::Response>) -> O
    {
    }
    pub trait ChannelCallBackOutput: futures::Future<Output = ()> {}
    impl<T> ChannelCallBackOutput for T where T: futures::Future<Output = ()> {}
}
