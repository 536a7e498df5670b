//! The remote records API as seen by the stores.

use async_trait::async_trait;
use serde::Serialize;

use super::errors::ApiResult;
use crate::{
    activity::ActivityLogEntry,
    directory::UserPatch,
    session::{AcademicProfile, AccountStatus, Role, UserAccount},
};

/// `POST /auth/login` body
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `POST /auth/register` body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub status: AccountStatus,
    #[serde(flatten)]
    pub profile: AcademicProfile,
}

/// Parsed `POST /auth/login` response
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserAccount,
}

/// Operations of the remote records API.
///
/// Implementations map transport failures and response status onto
/// [`ApiError`](super::ApiError) and run every body through
/// [`wire`](super::wire) before returning, so callers only see typed values.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    /// `POST /auth/login`
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;

    /// `POST /auth/register`
    async fn register(&self, request: &RegisterRequest) -> ApiResult<()>;

    /// `GET /auth/user`
    async fn current_user(&self, token: &str) -> ApiResult<UserAccount>;

    /// `GET /users`, unfiltered
    async fn list_users(&self, token: &str) -> ApiResult<Vec<UserAccount>>;

    /// `PUT /users/:id`
    async fn update_user(&self, token: &str, id: &str, patch: &UserPatch) -> ApiResult<()>;

    /// `DELETE /users/:id`
    async fn delete_user(&self, token: &str, id: &str) -> ApiResult<()>;

    /// `GET /logs`
    async fn activity_logs(&self, token: &str) -> ApiResult<Vec<ActivityLogEntry>>;

    /// `GET /users/export`
    async fn export_users(&self, token: &str) -> ApiResult<Vec<u8>>;
}
