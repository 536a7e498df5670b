//! Role-driven view routing.
//!
//! The signed-in role alone decides which tabs exist. Selecting a tab the
//! role does not have is ignored rather than reported.

use std::{fmt, str::FromStr};

use crate::{session::Role, validation::ValidationError};

/// Navigable page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tab {
    Dashboard,
    Users,
    Analytics,
    Activity,
    Courses,
    Grades,
    Profile,
    Settings,
}

/// Tabs an administrator sees, in display order.
pub const ADMIN_TABS: [Tab; 5] = [
    Tab::Dashboard,
    Tab::Users,
    Tab::Analytics,
    Tab::Activity,
    Tab::Settings,
];

/// Tabs a student sees, in display order.
pub const STUDENT_TABS: [Tab; 5] = [
    Tab::Dashboard,
    Tab::Courses,
    Tab::Grades,
    Tab::Profile,
    Tab::Settings,
];

impl Tab {
    /// Menu label
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Users => "User Management",
            Tab::Analytics => "Analytics",
            Tab::Activity => "Activity Logs",
            Tab::Courses => "My Courses",
            Tab::Grades => "My Grades",
            Tab::Profile => "My Profile",
            Tab::Settings => "Settings",
        }
    }

    /// Short command name
    pub fn slug(&self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Users => "users",
            Tab::Analytics => "analytics",
            Tab::Activity => "activity",
            Tab::Courses => "courses",
            Tab::Grades => "grades",
            Tab::Profile => "profile",
            Tab::Settings => "settings",
        }
    }

    /// Tabs available to a role
    pub fn for_role(role: Role) -> &'static [Tab] {
        match role {
            Role::Admin => &ADMIN_TABS,
            Role::Student => &STUDENT_TABS,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tab {
    type Err = ValidationError;

    /// Accepts the slug or the menu label, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        [ADMIN_TABS, STUDENT_TABS]
            .iter()
            .flatten()
            .copied()
            .find(|tab| {
                tab.slug().eq_ignore_ascii_case(wanted) || tab.label().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ValidationError::InvalidChoice {
                field: "tab",
                value: wanted.to_string(),
            })
    }
}

/// Router state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouterState {
    #[default]
    Unauthenticated,
    Student(Tab),
    Admin(Tab),
}

/// Tab selection for the signed-in role
#[derive(Debug, Clone, Default)]
pub struct ViewRouter {
    state: RouterState,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the authenticated state for `role`, landing on the dashboard.
    pub fn enter(&mut self, role: Role) {
        self.state = match role {
            Role::Admin => RouterState::Admin(Tab::Dashboard),
            Role::Student => RouterState::Student(Tab::Dashboard),
        };
    }

    /// Back to the signed-out state
    pub fn leave(&mut self) {
        self.state = RouterState::Unauthenticated;
    }

    /// Switch tabs. Returns whether the selection was applied; a tab outside
    /// the role's set, or any selection while signed out, changes nothing.
    pub fn select(&mut self, tab: Tab) -> bool {
        if !self.allowed_tabs().contains(&tab) {
            return false;
        }
        self.state = match self.state {
            RouterState::Admin(_) => RouterState::Admin(tab),
            RouterState::Student(_) => RouterState::Student(tab),
            RouterState::Unauthenticated => return false,
        };
        true
    }

    pub fn state(&self) -> RouterState {
        self.state
    }

    pub fn role(&self) -> Option<Role> {
        match self.state {
            RouterState::Unauthenticated => None,
            RouterState::Student(_) => Some(Role::Student),
            RouterState::Admin(_) => Some(Role::Admin),
        }
    }

    pub fn allowed_tabs(&self) -> &'static [Tab] {
        self.role().map(Tab::for_role).unwrap_or(&[])
    }

    pub fn current(&self) -> Option<Tab> {
        match self.state {
            RouterState::Unauthenticated => None,
            RouterState::Student(tab) | RouterState::Admin(tab) => Some(tab),
        }
    }

    /// Heading for the current page
    pub fn title(&self) -> &'static str {
        match self.state {
            RouterState::Unauthenticated => "Sign In",
            RouterState::Admin(Tab::Dashboard) => "Admin Dashboard",
            RouterState::Student(Tab::Dashboard) => "Student Dashboard",
            RouterState::Student(tab) | RouterState::Admin(tab) => tab.label(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_lands_on_dashboard() {
        let mut router = ViewRouter::new();
        assert_eq!(router.current(), None);
        assert!(router.allowed_tabs().is_empty());

        router.enter(Role::Admin);
        assert_eq!(router.state(), RouterState::Admin(Tab::Dashboard));
        assert_eq!(router.title(), "Admin Dashboard");

        router.enter(Role::Student);
        assert_eq!(router.state(), RouterState::Student(Tab::Dashboard));
        assert_eq!(router.title(), "Student Dashboard");
    }

    #[test]
    fn test_role_determines_tabs() {
        let mut router = ViewRouter::new();
        router.enter(Role::Student);
        assert_eq!(router.allowed_tabs(), &STUDENT_TABS);

        router.enter(Role::Admin);
        assert_eq!(router.allowed_tabs(), &ADMIN_TABS);
    }

    #[test]
    fn test_disallowed_selection_is_ignored() {
        let mut router = ViewRouter::new();
        router.enter(Role::Student);
        assert!(router.select(Tab::Grades));

        assert!(!router.select(Tab::Users));
        assert_eq!(router.current(), Some(Tab::Grades));

        router.enter(Role::Admin);
        assert!(!router.select(Tab::Courses));
        assert_eq!(router.current(), Some(Tab::Dashboard));
    }

    #[test]
    fn test_selection_while_signed_out() {
        let mut router = ViewRouter::new();
        assert!(!router.select(Tab::Settings));
        assert_eq!(router.state(), RouterState::Unauthenticated);
        assert_eq!(router.title(), "Sign In");
    }

    #[test]
    fn test_leave_resets() {
        let mut router = ViewRouter::new();
        router.enter(Role::Admin);
        router.select(Tab::Activity);
        router.leave();
        assert_eq!(router.current(), None);

        router.enter(Role::Admin);
        assert_eq!(router.current(), Some(Tab::Dashboard));
    }

    #[test]
    fn test_tab_parse() {
        assert_eq!("users".parse::<Tab>().unwrap(), Tab::Users);
        assert_eq!("My Grades".parse::<Tab>().unwrap(), Tab::Grades);
        assert_eq!(" Activity Logs ".parse::<Tab>().unwrap(), Tab::Activity);
        assert!("billing".parse::<Tab>().is_err());
    }

    #[test]
    fn test_titles() {
        let mut router = ViewRouter::new();
        router.enter(Role::Admin);
        router.select(Tab::Users);
        assert_eq!(router.title(), "User Management");

        router.enter(Role::Student);
        router.select(Tab::Profile);
        assert_eq!(router.title(), "My Profile");
    }
}
