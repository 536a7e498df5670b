//! In-memory stand-in for the remote records API.
#![allow(dead_code)]

use async_trait::async_trait;
use campus_records::{
    activity::{ActivityKind, ActivityLogEntry},
    directory::UserPatch,
    net::{ApiError, ApiResult, LoginRequest, LoginResponse, RecordsApi, RegisterRequest},
    session::{AcademicProfile, AccountStatus, Role, UserAccount},
};
use chrono::{Duration, TimeZone, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

pub const PASSWORD: &str = "secret1";
pub const ADMIN_EMAIL: &str = "admin0@uni.edu";
pub const STUDENT_EMAIL: &str = "student0@uni.edu";

#[derive(Default)]
struct FakeState {
    accounts: Vec<UserAccount>,
    passwords: HashMap<String, String>,
    tokens: HashMap<String, String>,
    logs: Vec<ActivityLogEntry>,
    registered: Vec<RegisterRequest>,
    export: Option<Vec<u8>>,
    fail_next: Option<ApiError>,
    calls: HashMap<&'static str, usize>,
    next_token: usize,
}

/// Server double with real accounts, tokens and call counting
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    /// Directory of `admins` administrators and `students` students, all
    /// sharing [`PASSWORD`]
    pub fn with_directory(admins: usize, students: usize) -> Self {
        let api = FakeApi::default();
        {
            let mut state = api.state.lock().unwrap();
            for i in 0..admins {
                let account = account(&format!("a{i}"), "Admin", &i.to_string(), Role::Admin);
                state.passwords.insert(account.email.clone(), PASSWORD.to_string());
                state.accounts.push(account);
            }
            for i in 0..students {
                let mut account =
                    account(&format!("s{i}"), "Student", &i.to_string(), Role::Student);
                if i % 3 == 2 {
                    account.status = AccountStatus::Inactive;
                }
                state.passwords.insert(account.email.clone(), PASSWORD.to_string());
                state.accounts.push(account);
            }
            state.logs = sample_logs();
        }
        api
    }

    pub fn calls(&self, operation: &'static str) -> usize {
        self.state.lock().unwrap().calls.get(operation).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.state.lock().unwrap().calls.values().sum()
    }

    /// Fail the next call with `error`
    pub fn fail_next(&self, error: ApiError) {
        self.state.lock().unwrap().fail_next = Some(error);
    }

    /// Every issued token stops resolving
    pub fn revoke_tokens(&self) {
        self.state.lock().unwrap().tokens.clear();
    }

    /// Make the export endpoint available with a fixed body
    pub fn serve_export(&self, body: &[u8]) {
        self.state.lock().unwrap().export = Some(body.to_vec());
    }

    pub fn set_logs(&self, logs: Vec<ActivityLogEntry>) {
        self.state.lock().unwrap().logs = logs;
    }

    pub fn registered(&self) -> Vec<RegisterRequest> {
        self.state.lock().unwrap().registered.clone()
    }

    pub fn server_account(&self, id: &str) -> Option<UserAccount> {
        let state = self.state.lock().unwrap();
        state.accounts.iter().find(|a| a.id == id).cloned()
    }

    /// Issue a token for `email` without going through login
    pub fn issue_token(&self, email: &str) -> String {
        let mut state = self.state.lock().unwrap();
        let id = state
            .accounts
            .iter()
            .find(|a| a.email == email)
            .map(|a| a.id.clone())
            .unwrap();
        new_token(&mut state, id)
    }

    fn begin(&self, operation: &'static str) -> ApiResult<std::sync::MutexGuard<'_, FakeState>> {
        let mut state = self.state.lock().unwrap();
        *state.calls.entry(operation).or_default() += 1;
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(state),
        }
    }
}

fn new_token(state: &mut FakeState, user_id: String) -> String {
    state.next_token += 1;
    let token = format!("token-{}", state.next_token);
    state.tokens.insert(token.clone(), user_id);
    token
}

fn caller(state: &FakeState, token: &str) -> ApiResult<UserAccount> {
    let id = state.tokens.get(token).ok_or(ApiError::Unauthorized)?;
    state
        .accounts
        .iter()
        .find(|a| &a.id == id)
        .cloned()
        .ok_or(ApiError::Unauthorized)
}

fn admin_caller(state: &FakeState, token: &str) -> ApiResult<UserAccount> {
    let user = caller(state, token)?;
    if !user.is_admin() {
        return Err(ApiError::Forbidden);
    }
    Ok(user)
}

#[async_trait]
impl RecordsApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        let mut state = self.begin("login")?;
        if state.passwords.get(&request.email) != Some(&request.password) {
            return Err(ApiError::InvalidCredentials);
        }
        let user = state
            .accounts
            .iter()
            .find(|a| a.email == request.email)
            .cloned()
            .ok_or(ApiError::InvalidCredentials)?;
        let token = new_token(&mut state, user.id.clone());
        Ok(LoginResponse { token, user })
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        let mut state = self.begin("register")?;
        if state.accounts.iter().any(|a| a.has_email(&request.email)) {
            return Err(ApiError::Rejected {
                status: 400,
                message: "User already exists".to_string(),
            });
        }
        let id = format!("r{}", state.registered.len());
        state.accounts.push(UserAccount {
            id,
            first_name: request.first_name.clone(),
            last_name: request.last_name.clone(),
            email: request.email.clone(),
            role: request.role,
            status: request.status,
            profile: request.profile.clone(),
        });
        state
            .passwords
            .insert(request.email.clone(), request.password.clone());
        state.registered.push(request.clone());
        Ok(())
    }

    async fn current_user(&self, token: &str) -> ApiResult<UserAccount> {
        let state = self.begin("current_user")?;
        caller(&state, token)
    }

    async fn list_users(&self, token: &str) -> ApiResult<Vec<UserAccount>> {
        let accounts = {
            let state = self.begin("list_users")?;
            admin_caller(&state, token)?;
            state.accounts.clone()
        };
        // Let observers run while the request is "in flight"
        tokio::task::yield_now().await;
        Ok(accounts)
    }

    async fn update_user(&self, token: &str, id: &str, patch: &UserPatch) -> ApiResult<()> {
        let mut state = self.begin("update_user")?;
        admin_caller(&state, token)?;
        let account = state
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or(ApiError::NotFound)?;
        patch.apply(account);
        Ok(())
    }

    async fn delete_user(&self, token: &str, id: &str) -> ApiResult<()> {
        let mut state = self.begin("delete_user")?;
        admin_caller(&state, token)?;
        let before = state.accounts.len();
        state.accounts.retain(|a| a.id != id);
        if state.accounts.len() == before {
            return Err(ApiError::NotFound);
        }
        Ok(())
    }

    async fn activity_logs(&self, token: &str) -> ApiResult<Vec<ActivityLogEntry>> {
        let state = self.begin("activity_logs")?;
        admin_caller(&state, token)?;
        Ok(state.logs.clone())
    }

    async fn export_users(&self, token: &str) -> ApiResult<Vec<u8>> {
        let state = self.begin("export_users")?;
        admin_caller(&state, token)?;
        state.export.clone().ok_or(ApiError::NotFound)
    }
}

pub fn account(id: &str, first_name: &str, last_name: &str, role: Role) -> UserAccount {
    let prefix = match role {
        Role::Admin => "admin",
        Role::Student => "student",
    };
    UserAccount {
        id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{prefix}{last_name}@uni.edu"),
        role,
        status: AccountStatus::Active,
        profile: AcademicProfile {
            department: Some("Computer Science".to_string()),
            level: Some("200".to_string()),
            ..Default::default()
        },
    }
}

/// Seven entries, oldest first
pub fn sample_logs() -> Vec<ActivityLogEntry> {
    let start = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
    let kinds = [
        ActivityKind::Register,
        ActivityKind::Login,
        ActivityKind::Update,
        ActivityKind::Login,
        ActivityKind::Delete,
        ActivityKind::Login,
        ActivityKind::Update,
    ];
    kinds
        .into_iter()
        .enumerate()
        .map(|(i, kind)| ActivityLogEntry {
            id: format!("log{i}"),
            actor: "Admin 0".to_string(),
            action: format!("{kind} #{i}"),
            timestamp: start + Duration::minutes(i as i64 * 5),
            kind,
        })
        .collect()
}
