//! Standard CRUD operations for every [`Resource`]. Rules about what is valid
//! live in the backend, errors come back as [`rentix_shared::errors::ApiError`]
//! with a message that can be shown to the user

use reqwest::Method;
use rentix_shared::{
    const_config::path::{PATH_SUFFIX_RESTORE, PATH_SUFFIX_TRASH},
    id::RecordId,
    resources::{Resource, SoftDeletable},
};

use crate::{
    client::{ApiReceiver, UiCallBack, NO_ARGS},
    Client,
};

impl Client {
    #[tracing::instrument(skip(ui_notify), fields(resource = R::PATH))]
    pub fn find_all<R: Resource, F: UiCallBack>(&self, ui_notify: F) -> ApiReceiver<Vec<R>> {
        self.send_request_expect_json(Method::GET, R::PATH.to_string(), NO_ARGS, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify), fields(resource = R::PATH))]
    pub fn find_one<R: Resource, F: UiCallBack>(
        &self,
        id: &RecordId,
        ui_notify: F,
    ) -> ApiReceiver<R> {
        self.send_request_expect_json(Method::GET, R::record_path(id), NO_ARGS, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify), fields(resource = R::PATH))]
    pub fn create<R: Resource, F: UiCallBack>(
        &self,
        draft: &R::Draft,
        ui_notify: F,
    ) -> ApiReceiver<R> {
        self.send_request_expect_json(Method::POST, R::PATH.to_string(), draft, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify), fields(resource = R::PATH))]
    pub fn update<R: Resource, F: UiCallBack>(
        &self,
        id: &RecordId,
        draft: &R::Draft,
        ui_notify: F,
    ) -> ApiReceiver<R> {
        self.send_request_expect_json(Method::PATCH, R::record_path(id), draft, ui_notify)
    }

    /// For soft deletable resources this only moves the record to the trash
    #[tracing::instrument(skip(ui_notify), fields(resource = R::PATH))]
    pub fn remove<R: Resource, F: UiCallBack>(
        &self,
        id: &RecordId,
        ui_notify: F,
    ) -> ApiReceiver<()> {
        self.send_request_expect_empty(Method::DELETE, R::record_path(id), NO_ARGS, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify), fields(resource = R::PATH))]
    pub fn find_trash<R: SoftDeletable, F: UiCallBack>(&self, ui_notify: F) -> ApiReceiver<Vec<R>> {
        let path = format!("{}{PATH_SUFFIX_TRASH}", R::PATH);
        self.send_request_expect_json(Method::GET, path, NO_ARGS, ui_notify)
    }

    #[tracing::instrument(skip(ui_notify), fields(resource = R::PATH))]
    pub fn restore<R: SoftDeletable, F: UiCallBack>(
        &self,
        id: &RecordId,
        ui_notify: F,
    ) -> ApiReceiver<R> {
        let path = format!("{}{PATH_SUFFIX_RESTORE}", R::record_path(id));
        self.send_request_expect_json(Method::PATCH, path, &serde_json::json!({}), ui_notify)
    }
}
