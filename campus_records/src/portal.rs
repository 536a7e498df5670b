//! Portal: ties the session to the router and the role's stores.
//!
//! Signing in picks the workspace for the role: a student gets an
//! [`AcademicRecordStore`], an admin gets a [`DirectoryStore`] and an
//! [`ActivityFeed`]. Signing out, or any call whose token the server
//! rejects, drops the workspace and returns the router to the sign-in page.

use log::{info, warn};
use std::sync::Arc;
use thiserror::Error;

use crate::{
    activity::ActivityFeed,
    directory::{DirectoryError, DirectoryFilter, DirectoryStore, UserPatch},
    net::{ApiError, RecordsApi},
    preferences::Preferences,
    records::{AcademicRecordStore, RecordsError},
    router::{Tab, ViewRouter},
    session::{RegistrationProfile, Role, Session, SessionError, SessionStore, UserAccount},
    storage::{KeyValueStore, StorageError},
};

/// Portal errors
#[derive(Debug, Error)]
pub enum PortalError {
    /// No signed-in user
    #[error("Not signed in")]
    NotAuthenticated,

    /// Signed-in role has no such workspace
    #[error("Not available for the {0} role")]
    WrongRole(Role),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Records(#[from] RecordsError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl PortalError {
    /// Whether the server rejected the session token
    pub fn invalidates_session(&self) -> bool {
        match self {
            PortalError::Session(err) => err.invalidates_session(),
            PortalError::Directory(err) => err.invalidates_session(),
            PortalError::Api(err) => err.invalidates_session(),
            _ => false,
        }
    }

    pub fn client_message(&self) -> String {
        match self {
            PortalError::Session(err) => err.client_message(),
            PortalError::Records(err) => err.client_message(),
            PortalError::Directory(err) => err.client_message(),
            PortalError::Api(err) => err.client_message(),
            PortalError::Storage(_) => "Could not save settings on this device".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Result type for portal operations
pub type PortalResult<T> = Result<T, PortalError>;

/// Role-specific state, present only while signed in
#[derive(Default)]
pub enum Workspace {
    #[default]
    SignedOut,
    Student(AcademicRecordStore),
    Admin(AdminWorkspace),
}

/// Administrator state
pub struct AdminWorkspace {
    pub directory: DirectoryStore,
    pub activity: ActivityFeed,
}

/// Client portal
pub struct Portal {
    api: Arc<dyn RecordsApi>,
    sessions: SessionStore,
    router: ViewRouter,
    preferences: Preferences,
    workspace: Workspace,
}

impl Portal {
    pub fn new(api: Arc<dyn RecordsApi>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self {
            sessions: SessionStore::new(api.clone(), storage.clone()),
            router: ViewRouter::new(),
            preferences: Preferences::load(storage),
            workspace: Workspace::SignedOut,
            api,
        }
    }

    /// Sign in and open the role's workspace on the dashboard
    pub async fn login(&mut self, email: &str, password: &str) -> PortalResult<&Session> {
        let role = self.sessions.login(email, password).await?.role();
        self.open_workspace(role);
        self.sessions.session().ok_or(PortalError::NotAuthenticated)
    }

    /// Create an account; the caller signs in separately
    pub async fn register(&self, registration: RegistrationProfile) -> PortalResult<()> {
        self.sessions.register(registration).await?;
        Ok(())
    }

    /// Resume a persisted session, if its token still resolves
    ///
    /// When it does not, any session already held is gone too and the portal
    /// returns to the sign-in page.
    pub async fn restore(&mut self) -> Option<&Session> {
        match self.sessions.restore().await.map(Session::role) {
            Some(role) => {
                self.open_workspace(role);
                self.sessions.session()
            }
            None => {
                self.close_workspace();
                None
            }
        }
    }

    /// Re-fetch the signed-in account
    pub async fn refresh_session(&mut self) -> PortalResult<&Session> {
        let result = self.sessions.refresh().await.map(Session::role);
        let role = self.settle(result)?;
        if self.router.role() != Some(role) {
            // Role changed server-side
            self.open_workspace(role);
        }
        self.sessions.session().ok_or(PortalError::NotAuthenticated)
    }

    /// Sign out and drop every role-scoped store
    pub fn logout(&mut self) -> PortalResult<()> {
        self.close_workspace();
        self.sessions.logout()?;
        Ok(())
    }

    /// Select a tab; ignored when the role lacks it
    pub fn select_tab(&mut self, tab: Tab) -> bool {
        self.router.select(tab)
    }

    pub fn router(&self) -> &ViewRouter {
        &self.router
    }

    pub fn session(&self) -> Option<&Session> {
        self.sessions.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.sessions.is_authenticated()
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn dark_mode(&self) -> bool {
        self.preferences.dark_mode()
    }

    /// Flip and persist the display mode
    pub fn toggle_dark_mode(&mut self) -> PortalResult<bool> {
        Ok(self.preferences.toggle()?)
    }

    /// The student's course records
    pub fn records(&self) -> PortalResult<&AcademicRecordStore> {
        match &self.workspace {
            Workspace::Student(records) => Ok(records),
            other => Err(self.workspace_error(other)),
        }
    }

    pub fn records_mut(&mut self) -> PortalResult<&mut AcademicRecordStore> {
        let role = self.sessions.role();
        match &mut self.workspace {
            Workspace::Student(records) => Ok(records),
            _ => Err(role.map_or(PortalError::NotAuthenticated, PortalError::WrongRole)),
        }
    }

    /// The admin's account directory
    pub fn directory(&self) -> PortalResult<&DirectoryStore> {
        self.admin().map(|admin| &admin.directory)
    }

    pub fn directory_mut(&mut self) -> PortalResult<&mut DirectoryStore> {
        self.admin_mut().map(|admin| &mut admin.directory)
    }

    /// The admin's activity feed as last loaded
    pub fn activity(&self) -> PortalResult<&ActivityFeed> {
        self.admin().map(|admin| &admin.activity)
    }

    /// Fetch every account and apply `filter`
    pub async fn load_directory(&mut self, filter: DirectoryFilter) -> PortalResult<Vec<UserAccount>> {
        let session = self.current_session()?;
        let admin = admin_of(&mut self.workspace, session.role())?;
        let result = admin.directory.load(&session, filter).await;
        self.settle(result)
    }

    /// Fetch the activity log into the feed
    pub async fn load_activity(&mut self) -> PortalResult<&ActivityFeed> {
        let session = self.current_session()?;
        admin_of(&mut self.workspace, session.role())?;

        let result = self.api.activity_logs(&session.token).await;
        let entries = self.settle(result)?;
        info!("Loaded {} activity entries", entries.len());

        let admin = admin_of(&mut self.workspace, session.role())?;
        admin.activity = ActivityFeed::new(entries);
        Ok(&admin.activity)
    }

    /// Dashboard data: directory with the current filter, then activity
    pub async fn load_admin_data(&mut self) -> PortalResult<()> {
        let filter = self.directory()?.filter().clone();
        self.load_directory(filter).await?;
        self.load_activity().await?;
        Ok(())
    }

    pub async fn delete_user(&mut self, id: &str) -> PortalResult<()> {
        let session = self.current_session()?;
        let admin = admin_of(&mut self.workspace, session.role())?;
        let result = admin.directory.delete_user(&session, id).await;
        self.settle(result)
    }

    pub async fn update_user(&mut self, id: &str, patch: UserPatch) -> PortalResult<UserAccount> {
        let session = self.current_session()?;
        let admin = admin_of(&mut self.workspace, session.role())?;
        let result = admin.directory.update_user(&session, id, patch).await;
        self.settle(result)
    }

    /// CSV export of the directory
    pub async fn export_users(&mut self) -> PortalResult<Vec<u8>> {
        let session = self.current_session()?;
        let result = self.directory()?.export(&session).await;
        self.settle(result)
    }

    fn open_workspace(&mut self, role: Role) {
        self.workspace = match role {
            Role::Student => Workspace::Student(AcademicRecordStore::new()),
            Role::Admin => Workspace::Admin(AdminWorkspace {
                directory: DirectoryStore::new(self.api.clone()),
                activity: ActivityFeed::default(),
            }),
        };
        self.router.enter(role);
    }

    fn close_workspace(&mut self) {
        self.workspace = Workspace::SignedOut;
        self.router.leave();
    }

    /// Pass a result through, signing out if the token was rejected
    fn settle<T, E>(&mut self, result: Result<T, E>) -> PortalResult<T>
    where
        E: Into<PortalError>,
    {
        result.map_err(|err| {
            let err = err.into();
            if err.invalidates_session() {
                warn!("Token rejected, signing out");
                self.sessions.invalidate();
                self.close_workspace();
            }
            err
        })
    }

    /// Owned copy so the session can be passed while a store is borrowed
    fn current_session(&self) -> PortalResult<Session> {
        self.sessions
            .session()
            .cloned()
            .ok_or(PortalError::NotAuthenticated)
    }

    fn admin(&self) -> PortalResult<&AdminWorkspace> {
        match &self.workspace {
            Workspace::Admin(admin) => Ok(admin),
            other => Err(self.workspace_error(other)),
        }
    }

    fn admin_mut(&mut self) -> PortalResult<&mut AdminWorkspace> {
        let role = self.sessions.role().ok_or(PortalError::NotAuthenticated)?;
        admin_of(&mut self.workspace, role)
    }

    fn workspace_error(&self, workspace: &Workspace) -> PortalError {
        match (workspace, self.sessions.role()) {
            (Workspace::SignedOut, _) | (_, None) => PortalError::NotAuthenticated,
            (_, Some(role)) => PortalError::WrongRole(role),
        }
    }
}

fn admin_of(workspace: &mut Workspace, role: Role) -> PortalResult<&mut AdminWorkspace> {
    match workspace {
        Workspace::Admin(admin) => Ok(admin),
        Workspace::SignedOut => Err(PortalError::NotAuthenticated),
        Workspace::Student(_) => Err(PortalError::WrongRole(role)),
    }
}
