//! Directory filter, patch and summary models.

use serde::Serialize;
use std::{fmt, str::FromStr};

use crate::{
    session::{AccountStatus, Role, UserAccount},
    validation::ValidationError,
};

/// Academic levels offered by the edit form
pub const LEVELS: [&str; 5] = ["100", "200", "300", "400", "500"];

/// Role predicate of a [`DirectoryFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
}

impl RoleFilter {
    pub fn matches(&self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(wanted) => *wanted == role,
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleFilter::All => f.write_str("all"),
            RoleFilter::Only(role) => role.fmt(f),
        }
    }
}

impl FromStr for RoleFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(RoleFilter::All);
        }
        s.parse().map(RoleFilter::Only)
    }
}

/// Status predicate of a [`DirectoryFilter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(AccountStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: AccountStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

/// Which accounts the admin table shows. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirectoryFilter {
    pub search_term: String,
    pub role: RoleFilter,
    pub status: StatusFilter,
}

impl DirectoryFilter {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search_term: term.into(),
            ..Default::default()
        }
    }

    pub fn with_role(mut self, role: RoleFilter) -> Self {
        self.role = role;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Search, role and status predicates ANDed together.
    ///
    /// The search term is a case-insensitive substring of "First Last" or
    /// the email; an empty term matches everyone.
    pub fn matches(&self, account: &UserAccount) -> bool {
        self.matches_search(account)
            && self.role.matches(account.role)
            && self.status.matches(account.status)
    }

    fn matches_search(&self, account: &UserAccount) -> bool {
        if self.search_term.is_empty() {
            return true;
        }
        let needle = self.search_term.to_lowercase();
        account.display_name().to_lowercase().contains(&needle)
            || account.email.to_lowercase().contains(&needle)
    }
}

/// Partial update of an account; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AccountStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(rename = "matricNumber", skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgpa: Option<f64>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        *self == UserPatch::default()
    }

    /// Copy every set field onto `account`
    pub fn apply(&self, account: &mut UserAccount) {
        if let Some(first_name) = &self.first_name {
            account.first_name = first_name.clone();
        }
        if let Some(last_name) = &self.last_name {
            account.last_name = last_name.clone();
        }
        if let Some(email) = &self.email {
            account.email = email.clone();
        }
        if let Some(role) = self.role {
            account.role = role;
        }
        if let Some(status) = self.status {
            account.status = status;
        }

        let profile = &mut account.profile;
        if let Some(department) = &self.department {
            profile.department = Some(department.clone());
        }
        if let Some(level) = &self.level {
            profile.level = Some(level.clone());
        }
        if let Some(student_id) = &self.student_id {
            profile.student_id = Some(student_id.clone());
        }
        if let Some(phone) = &self.phone {
            profile.phone = Some(phone.clone());
        }
        if let Some(advisor) = &self.advisor {
            profile.advisor = Some(advisor.clone());
        }
        if self.cgpa.is_some() {
            profile.cgpa = self.cgpa;
        }
    }
}

/// Summary tiles of the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectorySummary {
    pub total: usize,
    pub active: usize,
    pub students: usize,
    pub admins: usize,
}

impl DirectorySummary {
    pub fn of<'a, I>(accounts: I) -> Self
    where
        I: IntoIterator<Item = &'a UserAccount>,
    {
        accounts
            .into_iter()
            .fold(DirectorySummary::default(), |mut summary, account| {
                summary.total += 1;
                if account.is_active() {
                    summary.active += 1;
                }
                match account.role {
                    Role::Student => summary.students += 1,
                    Role::Admin => summary.admins += 1,
                }
                summary
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AcademicProfile;

    fn account(first: &str, last: &str, email: &str, role: Role) -> UserAccount {
        UserAccount {
            id: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            role,
            status: AccountStatus::Active,
            profile: AcademicProfile::default(),
        }
    }

    #[test]
    fn test_search_matches_full_name_across_space() {
        let ada = account("Ada", "Lovelace", "ada@uni.edu", Role::Student);
        assert!(DirectoryFilter::search("a love").matches(&ada));
        assert!(DirectoryFilter::search("LOVELACE").matches(&ada));
        assert!(DirectoryFilter::search("").matches(&ada));
        assert!(!DirectoryFilter::search("turing").matches(&ada));
    }

    #[test]
    fn test_search_matches_email() {
        let ada = account("Ada", "Lovelace", "countess@Uni.edu", Role::Student);
        assert!(DirectoryFilter::search("uni.EDU").matches(&ada));
    }

    #[test]
    fn test_predicates_are_anded() {
        let mut ada = account("Ada", "Lovelace", "ada@uni.edu", Role::Admin);
        ada.status = AccountStatus::Inactive;

        let filter = DirectoryFilter::search("ada").with_role(RoleFilter::Only(Role::Admin));
        assert!(filter.matches(&ada));
        assert!(
            !filter
                .clone()
                .with_status(StatusFilter::Only(AccountStatus::Active))
                .matches(&ada)
        );
        assert!(
            !DirectoryFilter::search("ada")
                .with_role(RoleFilter::Only(Role::Student))
                .matches(&ada)
        );
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!("all".parse::<RoleFilter>().unwrap(), RoleFilter::All);
        assert_eq!(
            "Admin".parse::<RoleFilter>().unwrap(),
            RoleFilter::Only(Role::Admin)
        );
        assert_eq!(
            "inactive".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(AccountStatus::Inactive)
        );
        assert!("everyone".parse::<RoleFilter>().is_err());
    }

    #[test]
    fn test_patch_apply_and_serialize() {
        let mut ada = account("Ada", "Lovelace", "ada@uni.edu", Role::Student);
        let patch = UserPatch {
            level: Some("300".to_string()),
            status: Some(AccountStatus::Inactive),
            ..Default::default()
        };

        patch.apply(&mut ada);
        assert_eq!(ada.profile.level.as_deref(), Some("300"));
        assert_eq!(ada.status, AccountStatus::Inactive);
        assert_eq!(ada.first_name, "Ada");

        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({"status": "inactive", "level": "300"}));
        assert!(!patch.is_empty());
        assert!(UserPatch::default().is_empty());
    }

    #[test]
    fn test_summary() {
        let mut accounts = vec![
            account("A", "A", "a@x.io", Role::Admin),
            account("B", "B", "b@x.io", Role::Student),
            account("C", "C", "c@x.io", Role::Student),
        ];
        accounts[2].status = AccountStatus::Inactive;

        let summary = DirectorySummary::of(&accounts);
        assert_eq!(
            summary,
            DirectorySummary {
                total: 3,
                active: 2,
                students: 2,
                admins: 1
            }
        );
    }
}
