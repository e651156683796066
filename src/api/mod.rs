//! Service facade for Pathways.
//!
//! Dispatches requests in-process against a [`Store`]. Responses carry an
//! HTTP status code and the dashboard's JSON envelope: `{"data", "message"?}`
//! on success and `{"message", "code"?}` on failure.

mod request;
pub mod routes;

use std::fmt;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use request::{ApiRequest, Method};
pub use routes::{match_route, Route};

use crate::core::{
    Actor, Config, Patch, Store, StoreError, User, UserPatch, UserRole, ViewFilter,
};
use crate::workflow::WorkflowError;

/// API error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Method {method} not allowed on {route}")]
    MethodNotAllowed { method: Method, route: &'static str },

    #[error("Invalid body: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) | Self::Serialization(_) => 400,
            Self::NotFound(_) => 404,
            Self::MethodNotAllowed { .. } => 405,
            Self::Conflict(_) => 409,
        }
    }

    /// Machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "VERSION_CONFLICT",
            Self::MethodNotAllowed { .. } => "METHOD_NOT_ALLOWED",
            Self::Serialization(_) => "INVALID_BODY",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } => Self::NotFound(err.to_string()),
            StoreError::Validation(message) => Self::BadRequest(message),
            StoreError::Workflow(inner) => inner.into(),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::VersionConflict { .. } => Self::Conflict(err.to_string()),
            WorkflowError::StageNotFound(_) | WorkflowError::TaskNotFound { .. } => {
                Self::NotFound(err.to_string())
            }
            WorkflowError::UnknownStage(_)
            | WorkflowError::StageMismatch { .. }
            | WorkflowError::DuplicateTask { .. } => Self::BadRequest(err.to_string()),
        }
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// A response: status code plus JSON envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `data` member of a success envelope.
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }

    /// The `message` member, present on errors and some successes.
    pub fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }

    fn error(err: &ApiError) -> Self {
        let body = serde_json::json!({ "message": err.to_string(), "code": err.code() });
        Self { status: err.status_code(), body }
    }
}

#[derive(Serialize)]
struct DataEnvelope {
    data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
}

/// A successful handler result before it is wrapped in the envelope.
struct Reply {
    status: u16,
    data: Value,
    message: Option<&'static str>,
}

impl Reply {
    fn ok(data: impl Serialize) -> ApiResult<Self> {
        Ok(Self { status: 200, data: to_value(data)?, message: None })
    }

    fn with(status: u16, data: impl Serialize, message: &'static str) -> ApiResult<Self> {
        Ok(Self { status, data: to_value(data)?, message: Some(message) })
    }
}

fn to_value(data: impl Serialize) -> ApiResult<Value> {
    serde_json::to_value(data).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Body of `POST /users`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: UserRole,

    /// Write-only. Required and checked for presence, but never stored.
    pub password: String,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("password", &"<redacted>")
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Body of `GET /users`.
#[derive(Debug, Serialize)]
pub struct UserList<'a> {
    pub users: &'a [User],
    pub total: usize,
}

fn enabled_by_default() -> bool {
    true
}

/// Service information returned by `GET /`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub base_url: String,
}

/// In-process request dispatcher over a shared store.
#[derive(Debug)]
pub struct ApiService {
    store: Mutex<Store>,
    filter: ViewFilter,
    base_url: String,
}

impl ApiService {
    /// Create a service over `store` using the filter and address from `config`.
    pub fn new(store: Store, config: &Config) -> Self {
        Self {
            store: Mutex::new(store),
            filter: config.view_filter(),
            base_url: config.api.base_url(),
        }
    }

    /// Handle one request. Errors are rendered into the error envelope.
    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        let result = self.dispatch(request).and_then(|reply| {
            let body = to_value(DataEnvelope { data: reply.data, message: reply.message })?;
            Ok(ApiResponse { status: reply.status, body })
        });

        match result {
            Ok(response) => {
                tracing::debug!(
                    method = %request.method,
                    path = %request.path,
                    status = response.status,
                    "Handled request"
                );
                response
            }
            Err(err) => {
                tracing::warn!(
                    method = %request.method,
                    path = %request.path,
                    error = %err,
                    "Request failed"
                );
                ApiResponse::error(&err)
            }
        }
    }

    /// Run `f` with exclusive access to the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut Store) -> R) -> R {
        f(&mut self.store.lock())
    }

    /// Take the store back out of the service.
    pub fn into_store(self) -> Store {
        self.store.into_inner()
    }

    fn dispatch(&self, request: &ApiRequest) -> ApiResult<Reply> {
        let segments = request.segments();
        let route = match_route(&segments)
            .ok_or_else(|| ApiError::NotFound(format!("No route for {}", request.path)))?;

        match (request.method, route) {
            (Method::Get, Route::Root) => Reply::ok(ServiceInfo {
                name: crate::APP_NAME,
                version: crate::VERSION,
                base_url: self.base_url.clone(),
            }),
            (Method::Get, Route::Clients) => {
                let store = self.store.lock();
                match self.actor(request)? {
                    Some(actor) => Reply::ok(store.visible_clients(&self.filter, &actor)),
                    None => Reply::ok(store.clients()),
                }
            }
            (Method::Get, Route::ClientWorkflow { client_id }) => {
                let mut store = self.store.lock();
                let entry = store.workflow(client_id)?;
                Reply::ok(entry)
            }
            (Method::Post, Route::ToggleTask { client_id, stage_id, task_id }) => {
                let expected = request.query_parsed::<u64>("expectedVersion")?;
                let updated =
                    self.store.lock().toggle_workflow_task(client_id, stage_id, task_id, expected)?;
                Reply::ok(updated)
            }
            (Method::Get, Route::Users) => {
                let store = self.store.lock();
                let users = store.users().list();
                Reply::ok(UserList { users, total: users.len() })
            }
            (Method::Post, Route::Users) => {
                let draft: NewUser = request.json()?;
                if draft.password.is_empty() {
                    return Err(ApiError::BadRequest("password must not be empty".into()));
                }
                let user =
                    User { enabled: draft.enabled, ..User::new(draft.name, draft.email, draft.role) };
                let created = self.store.lock().users_mut().create(user)?;
                Reply::with(201, created, "User created successfully")
            }
            (Method::Get, Route::User { id }) => Reply::ok(self.store.lock().users().get(id)?),
            (Method::Put, Route::User { id }) => {
                let patch: UserPatch = request.json()?;
                if patch.is_empty() {
                    return Err(ApiError::BadRequest("No fields to update".into()));
                }
                let updated = self.store.lock().users_mut().update(id, patch)?;
                Reply::with(200, updated, "User updated successfully")
            }
            (Method::Delete, Route::User { id }) => {
                self.store.lock().users_mut().delete(id)?;
                Reply::with(200, Value::Null, "User deleted successfully")
            }
            (Method::Get, Route::Meetings) => {
                let store = self.store.lock();
                match self.actor(request)? {
                    Some(actor) => Reply::ok(store.visible_meetings(&self.filter, &actor)),
                    None => Reply::ok(store.meetings().list()),
                }
            }
            (method, route) => Err(ApiError::MethodNotAllowed { method, route: route.pattern() }),
        }
    }

    /// The actor named by `visibleTo` and `role`; `None` when neither is given.
    fn actor(&self, request: &ApiRequest) -> ApiResult<Option<Actor>> {
        match (request.query("visibleTo"), request.query("role")) {
            (None, None) => Ok(None),
            (Some(name), Some(role)) => Ok(Some(Actor::new(name, role))),
            _ => Err(ApiError::BadRequest("visibleTo and role must be given together".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn service() -> ApiService {
        ApiService::new(Store::seeded(), &Config::default())
    }

    fn get(service: &ApiService, target: &str) -> ApiResponse {
        service.handle(&ApiRequest::get(target).unwrap())
    }

    #[test]
    fn test_root_info() {
        let response = get(&service(), "/");
        assert_eq!(response.status, 200);
        assert_eq!(response.data().unwrap()["name"], "pathways");
    }

    #[test]
    fn test_unknown_route_is_404() {
        let response = get(&service(), "/nowhere");
        assert_eq!(response.status, 404);
        assert_eq!(response.body["code"], "NOT_FOUND");
        assert!(response.data().is_none());
    }

    #[test]
    fn test_wrong_method_is_405() {
        let response = service().handle(&ApiRequest::post("/clients").unwrap());
        assert_eq!(response.status, 405);
        assert_eq!(response.body["code"], "METHOD_NOT_ALLOWED");
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(ApiError::from(StoreError::not_found("User", "9")).status_code(), 404);
        assert_eq!(ApiError::from(StoreError::Validation("x".into())).status_code(), 400);
        let conflict = StoreError::Workflow(WorkflowError::VersionConflict { expected: 1, actual: 2 });
        assert_eq!(ApiError::from(conflict).status_code(), 409);
    }

    #[test]
    fn test_partial_actor_rejected() {
        let response = get(&service(), "/clients?visibleTo=Jane%20Smith");
        assert_eq!(response.status, 400);
    }

    #[test]
    fn test_create_user_envelope() {
        let service = service();
        let request = ApiRequest::post("/users").unwrap().with_body(json!({
            "name": "New Rep",
            "email": "new.rep@pathways.com",
            "role": "Pathways Representative",
            "password": "ignored"
        }));

        let response = service.handle(&request);
        assert_eq!(response.status, 201);
        assert_eq!(response.message(), Some("User created successfully"));
        assert_eq!(response.data().unwrap()["enabled"], true);
        assert_eq!(service.with_store(|s| s.users().len()), 8);
    }

    #[test]
    fn test_user_list_envelope() {
        let response = get(&service(), "/users");
        let data = response.data().unwrap();
        assert_eq!(data["total"], 7);
        assert_eq!(data["users"].as_array().unwrap().len(), 7);
        assert_eq!(data["users"][0]["name"], "Admin User");
    }

    #[test]
    fn test_create_user_requires_password() {
        let service = service();
        let missing = ApiRequest::post("/users").unwrap().with_body(json!({
            "name": "New Rep", "email": "new.rep@pathways.com", "role": "Admin"
        }));
        assert_eq!(service.handle(&missing).body["code"], "INVALID_BODY");

        let blank = ApiRequest::post("/users").unwrap().with_body(json!({
            "name": "New Rep", "email": "new.rep@pathways.com", "role": "Admin", "password": ""
        }));
        assert_eq!(service.handle(&blank).status, 400);
        assert_eq!(service.with_store(|s| s.users().len()), 7);
    }

    #[test]
    fn test_empty_user_update_rejected() {
        let service = service();
        let request = ApiRequest::new(Method::Put, "/users/2").unwrap().with_body(json!({}));
        assert_eq!(service.handle(&request).status, 400);
    }
}
