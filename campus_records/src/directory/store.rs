//! Admin directory store.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use super::{
    errors::{DirectoryError, DirectoryResult},
    export::export_snapshot,
    models::{DirectoryFilter, DirectorySummary, LEVELS, RoleFilter, StatusFilter, UserPatch},
};
use crate::{
    net::{ApiError, RecordsApi},
    session::{Session, UserAccount},
    validation::{ValidationError, require, validate_email},
};

/// Shared read handle on a store's in-flight flag.
///
/// Clones observe the same flag, so a view can poll it while the store is
/// mutably borrowed by the pending load.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn raise(&self) -> LoadingGuard {
        self.0.store(true, Ordering::Release);
        LoadingGuard(self.0.clone())
    }
}

/// Lowers the flag when the load finishes or its future is dropped
struct LoadingGuard(Arc<AtomicBool>);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Cached copy of every account plus the admin's current filter.
///
/// The list is fetched whole and filtered client-side; changing the filter
/// never triggers a request. Summary counts always describe the full list.
pub struct DirectoryStore {
    api: Arc<dyn RecordsApi>,
    accounts: Vec<UserAccount>,
    filter: DirectoryFilter,
    loading: LoadingFlag,
}

impl DirectoryStore {
    pub fn new(api: Arc<dyn RecordsApi>) -> Self {
        Self {
            api,
            accounts: Vec::new(),
            filter: DirectoryFilter::default(),
            loading: LoadingFlag::default(),
        }
    }

    /// Fetch every account, adopt `filter`, and return the visible rows
    ///
    /// # Errors
    ///
    /// * `DirectoryError::Forbidden` - session is not an admin; no request made
    /// * `DirectoryError::Api` - the fetch failed; cache left as it was
    pub async fn load(
        &mut self,
        session: &Session,
        filter: DirectoryFilter,
    ) -> DirectoryResult<Vec<UserAccount>> {
        ensure_admin(session)?;

        let accounts = {
            let _loading = self.loading.raise();
            self.api.list_users(&session.token).await?
        };

        log::info!("Loaded {} directory accounts", accounts.len());
        self.accounts = accounts;
        self.filter = filter;
        Ok(self.visible().into_iter().cloned().collect())
    }

    /// Re-fetch with the current filter
    pub async fn reload(&mut self, session: &Session) -> DirectoryResult<Vec<UserAccount>> {
        let filter = self.filter.clone();
        self.load(session, filter).await
    }

    /// Delete an account on the server, then drop it from the cache
    pub async fn delete_user(&mut self, session: &Session, id: &str) -> DirectoryResult<()> {
        ensure_admin(session)?;
        self.api.delete_user(&session.token, id).await?;

        self.accounts.retain(|a| a.id != id);
        log::info!("Deleted user {id}");
        Ok(())
    }

    /// Validate and send a patch; on success apply it to the cached account
    ///
    /// # Errors
    ///
    /// * `DirectoryError::Forbidden` - session is not an admin
    /// * `DirectoryError::UnknownUser` - id not in the loaded directory
    /// * `DirectoryError::Validation` - empty name, bad or duplicate email,
    ///   unknown level
    /// * `DirectoryError::Api` - the server refused; cache untouched
    pub async fn update_user(
        &mut self,
        session: &Session,
        id: &str,
        mut patch: UserPatch,
    ) -> DirectoryResult<UserAccount> {
        ensure_admin(session)?;
        if self.account(id).is_none() {
            return Err(DirectoryError::UnknownUser(id.to_string()));
        }
        self.validate_patch(id, &mut patch)?;

        self.api.update_user(&session.token, id, &patch).await?;

        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| DirectoryError::UnknownUser(id.to_string()))?;
        patch.apply(account);
        log::info!("Updated user {id}");
        Ok(account.clone())
    }

    /// Server export when available, else a local snapshot of the visible rows
    pub async fn export(&self, session: &Session) -> DirectoryResult<Vec<u8>> {
        ensure_admin(session)?;
        match self.api.export_users(&session.token).await {
            Ok(bytes) => Ok(bytes),
            Err(ApiError::NotFound) => {
                log::info!("Server export unavailable, formatting snapshot locally");
                Ok(self.export_snapshot()?.into_bytes())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Snapshot of the visible rows
    pub fn export_snapshot(&self) -> DirectoryResult<String> {
        export_snapshot(self.visible())
    }

    pub fn filter(&self) -> &DirectoryFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: DirectoryFilter) {
        self.filter = filter;
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.filter.search_term = term.into();
    }

    pub fn set_role_filter(&mut self, role: RoleFilter) {
        self.filter.role = role;
    }

    pub fn set_status_filter(&mut self, status: StatusFilter) {
        self.filter.status = status;
    }

    /// Cached accounts passing the current filter, in server order
    pub fn visible(&self) -> Vec<&UserAccount> {
        self.accounts
            .iter()
            .filter(|a| self.filter.matches(a))
            .collect()
    }

    /// Every cached account, unfiltered
    pub fn accounts(&self) -> &[UserAccount] {
        &self.accounts
    }

    pub fn account(&self, id: &str) -> Option<&UserAccount> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Counts over the unfiltered cache
    pub fn summary(&self) -> DirectorySummary {
        DirectorySummary::of(&self.accounts)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    /// Forget every cached account and reset the filter
    pub fn clear(&mut self) {
        self.accounts.clear();
        self.filter = DirectoryFilter::default();
    }

    fn validate_patch(&self, id: &str, patch: &mut UserPatch) -> DirectoryResult<()> {
        if let Some(first_name) = patch.first_name.as_mut() {
            require("first name", first_name)?;
            *first_name = first_name.trim().to_string();
        }
        if let Some(last_name) = patch.last_name.as_mut() {
            require("last name", last_name)?;
            *last_name = last_name.trim().to_string();
        }
        if let Some(email) = patch.email.as_mut() {
            *email = validate_email(email)?;
            let taken = self
                .accounts
                .iter()
                .any(|a| a.id != id && a.has_email(email));
            if taken {
                return Err(ValidationError::DuplicateEmail(email.clone()).into());
            }
        }
        if let Some(level) = patch
            .level
            .as_deref()
            .filter(|level| !LEVELS.contains(&level.trim()))
        {
            return Err(ValidationError::InvalidChoice {
                field: "level",
                value: level.to_string(),
            }
            .into());
        }
        if let Some(cgpa) = patch.cgpa.filter(|c| !(0.0..=5.0).contains(c)) {
            return Err(ValidationError::InvalidChoice {
                field: "cgpa",
                value: cgpa.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

fn ensure_admin(session: &Session) -> DirectoryResult<()> {
    if !session.is_admin() {
        log::warn!(
            "Refusing directory access for non-admin {}",
            session.user.email
        );
        return Err(DirectoryError::Forbidden);
    }
    Ok(())
}
