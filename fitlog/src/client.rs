use std::sync::RwLock;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    domain::{Activity, ActivityPatch},
    ApiUrl, AuthResponse, Credentials,
};

/// Client for the activity-log API. Owns the bearer token used on every
/// authenticated request; the token is read when a request is built, so a
/// call already in flight keeps the token it was constructed with.
pub struct FitlogClient {
    http: reqwest::Client,
    base_url: ApiUrl,
    token: RwLock<Option<String>>,
}

impl FitlogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: ApiUrl::new(base_url),
            token: RwLock::new(None),
        }
    }

    /// Creates a client from the `FITLOG_API_URL` environment variable.
    pub fn from_env() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: ApiUrl::from_env(),
            token: RwLock::new(None),
        }
    }

    /// Replaces the bearer token. Requests built after this call carry the
    /// new value; `None` drops the Authorization header entirely.
    pub fn set_token(&self, token: Option<String>) {
        *self.token.write().unwrap() = token;
    }

    /// The token currently attached to outgoing requests, if any.
    pub fn bearer_token(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    /// Builds a request for an authenticated endpoint, attaching the bearer
    /// token when one is set.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = self.base_url.append_path(path);
        tracing::debug!(%method, url = url.as_ref(), "building request");
        let req = self.http.request(method, url.as_ref());
        match self.token.read().unwrap().as_deref() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Builds a request for an `auth/*` endpoint. Never carries a token.
    fn auth_request(&self, path: &str) -> reqwest::RequestBuilder {
        self.http.post(self.base_url.append_path(path).as_ref())
    }

    fn error_for_status(status: StatusCode) -> Option<ApiError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Some(ApiError::Unauthorized)
        } else if !status.is_success() {
            Some(ApiError::Rejected(status.as_u16()))
        } else {
            None
        }
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        match Self::error_for_status(resp.status()) {
            Some(err) => {
                tracing::warn!(status = resp.status().as_u16(), "request failed: {}", err);
                Err(err)
            }
            None => Ok(resp),
        }
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(format!("failed to parse response as JSON: {}", e)))
    }

    /// POST auth/sign-in.
    #[tracing::instrument(skip_all, fields(email = %credentials.email))]
    pub async fn sign_in(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.dispatch(self.auth_request("auth/sign-in").json(credentials))
            .await
    }

    /// POST auth/sign-up. The server may answer with a token or with an
    /// empty body; registration never establishes a session either way.
    #[tracing::instrument(skip_all, fields(email = %credentials.email))]
    pub async fn sign_up(&self, credentials: &Credentials) -> Result<Option<AuthResponse>, ApiError> {
        let resp = self
            .send(self.auth_request("auth/sign-up").json(credentials))
            .await?;

        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|e| ApiError::Decode(format!("failed to parse response as JSON: {}", e)))
    }

    /// GET activities.
    pub async fn list_activities(&self) -> Result<Vec<Activity>, ApiError> {
        self.dispatch(self.request(Method::GET, "activities")).await
    }

    /// GET activities/{id}.
    pub async fn activity(&self, id: i64) -> Result<Activity, ApiError> {
        self.dispatch(self.request(Method::GET, &format!("activities/{}", id)))
            .await
    }

    /// POST activities. `activity.id` is expected to be `None`; the created
    /// record comes back with the server-assigned id.
    pub async fn create_activity(&self, activity: &Activity) -> Result<Activity, ApiError> {
        self.dispatch(self.request(Method::POST, "activities").json(activity))
            .await
    }

    /// PATCH activities/{id} with the fields present in `patch`.
    pub async fn update_activity(
        &self,
        id: i64,
        patch: &ActivityPatch,
    ) -> Result<Activity, ApiError> {
        self.dispatch(
            self.request(Method::PATCH, &format!("activities/{}", id))
                .json(patch),
        )
        .await
    }

    /// DELETE activities/{id}. Success has an empty body.
    pub async fn delete_activity(&self, id: i64) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &format!("activities/{}", id)))
            .await?;
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ApiError {
    /// 401/403: the caller must re-authenticate.
    #[error("unauthorized, sign in again")]
    Unauthorized,
    #[error("request rejected with status {0}")]
    Rejected(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// True for the not-found class of rejections.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Rejected(404))
    }
}
