//! Executes shell commands against a [`Portal`] and renders the results.

use anyhow::{Context, Result};
use campus_records::{
    activity::{ActivityLogEntry, format_timestamp},
    directory::{DirectorySummary, EXPORT_FILE_NAME},
    portal::{Portal, PortalError, PortalResult},
    records::{Course, CourseStats, RecordsResult},
    router::Tab,
    session::{Role, UserAccount},
};
use std::{fmt::Write as _, path::PathBuf};

use crate::commands::Command;

pub const HELP: &str = "\
COMMANDS:
  help                              Show this help
  tabs                              List the tabs for your role
  tab <name>                        Switch tab (e.g. 'tab grades')
  dark                              Toggle dark mode
  logout                            Sign out
  quit                              Exit

STUDENT:
  courses                           List your courses
  add <code> <credits> <grade|-> <name...>
                                    Add a course ('-' for ungraded)
  grade <id> <grade>                Set a course grade (A, A-, B+, ... F)
  progress <id> <delta>             Adjust progress, e.g. 'progress 3 +10'
  fav <id>                          Toggle favorite
  drop <id>                         Delete a course
  gpa [<semester> <year>]           Overall or term GPA
  stats                             Course totals

ADMIN:
  users                             Reload and list the directory
  search [term]                     Filter by name or email
  role <all|student|admin>          Filter by role
  status <all|active|inactive>      Filter by status
  edit <id> <field> <value...>      Update an account
  remove <id>                       Delete an account
  export [path]                     Save the directory as CSV
  logs                              Full activity log
  recent                            Latest activity
";

/// What the caller should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    SignedOut,
    Quit,
}

/// Command output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub flow: Flow,
    pub text: String,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            flow: Flow::Continue,
            text: text.into(),
        }
    }
}

/// Interactive session over a portal
pub struct Shell {
    portal: Portal,
}

impl Shell {
    pub fn new(portal: Portal) -> Self {
        Self { portal }
    }

    pub fn portal(&self) -> &Portal {
        &self.portal
    }

    pub fn portal_mut(&mut self) -> &mut Portal {
        &mut self.portal
    }

    /// Prompt prefix showing the current page
    pub fn prompt(&self) -> String {
        let mode = if self.portal.dark_mode() { "dark" } else { "light" };
        format!("[{} | {}]> ", self.portal.router().title(), mode)
    }

    /// Run one command
    pub async fn execute(&mut self, command: Command) -> Result<Reply> {
        let reply = match command {
            Command::Help => Reply::text(HELP),
            Command::Quit => Reply {
                flow: Flow::Quit,
                text: "Goodbye".to_string(),
            },
            Command::Logout => {
                self.portal.logout()?;
                Reply {
                    flow: Flow::SignedOut,
                    text: "Signed out".to_string(),
                }
            }
            Command::Dark => {
                let dark = self.portal.toggle_dark_mode()?;
                Reply::text(format!("Dark mode {}", if dark { "on" } else { "off" }))
            }
            Command::Tabs => Reply::text(self.render_tabs()),
            Command::Tab(tab) => self.open_tab(tab).await?,

            Command::Courses => Reply::text(render_courses(self.portal.records()?.courses())),
            Command::AddCourse(draft) => {
                let course = records(self.portal.records_mut()?.add_course(draft))?;
                Reply::text(format!(
                    "Added {} {} (id {})",
                    course.code, course.name, course.id
                ))
            }
            Command::Grade(id, grade) => {
                records(self.portal.records_mut()?.update_grade(id, grade))?;
                Reply::text(format!("Course {id} graded {grade}"))
            }
            Command::Progress(id, delta) => {
                let progress = records(self.portal.records_mut()?.adjust_progress(id, delta))?;
                Reply::text(format!("Course {id} progress: {progress}%"))
            }
            Command::Favorite(id) => {
                let favorite = records(self.portal.records_mut()?.toggle_favorite(id))?;
                let state = if favorite { "added to" } else { "removed from" };
                Reply::text(format!("Course {id} {state} favorites"))
            }
            Command::DropCourse(id) => {
                let course = records(self.portal.records_mut()?.delete_course(id))?;
                Reply::text(format!("Dropped {} {}", course.code, course.name))
            }
            Command::Gpa(None) => {
                Reply::text(format!("GPA: {}", self.portal.records()?.gpa()))
            }
            Command::Gpa(Some((semester, year))) => {
                let gpa = self.portal.records()?.term_gpa(&semester, &year);
                Reply::text(format!("GPA for {semester} {year}: {gpa}"))
            }
            Command::Stats => {
                let store = self.portal.records()?;
                Reply::text(render_stats(&store.stats(), &store.gpa().to_string()))
            }

            Command::Users => {
                let filter = self.portal.directory()?.filter().clone();
                self.portal.load_directory(filter).await?;
                Reply::text(self.render_directory()?)
            }
            Command::Search(term) => {
                self.portal.directory_mut()?.set_search_term(term);
                Reply::text(self.render_directory()?)
            }
            Command::RoleFilter(role) => {
                self.portal.directory_mut()?.set_role_filter(role);
                Reply::text(self.render_directory()?)
            }
            Command::StatusFilter(status) => {
                self.portal.directory_mut()?.set_status_filter(status);
                Reply::text(self.render_directory()?)
            }
            Command::Edit { id, patch } => {
                let account = self.portal.update_user(&id, patch).await?;
                Reply::text(format!("Updated {}", describe_account(&account)))
            }
            Command::RemoveUser(id) => {
                self.portal.delete_user(&id).await?;
                Reply::text(format!("Removed user {id}"))
            }
            Command::Export(path) => {
                let bytes = self.portal.export_users().await?;
                let path = PathBuf::from(path.unwrap_or_else(|| EXPORT_FILE_NAME.to_string()));
                std::fs::write(&path, &bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                Reply::text(format!("Exported {} bytes to {}", bytes.len(), path.display()))
            }
            Command::Logs => {
                let feed = self.portal.load_activity().await?;
                Reply::text(render_activity(feed.all()))
            }
            Command::Recent => {
                let feed = self.portal.load_activity().await?;
                Reply::text(render_activity(feed.recent()))
            }
        };
        Ok(reply)
    }

    async fn open_tab(&mut self, tab: Tab) -> Result<Reply> {
        if !self.portal.select_tab(tab) {
            return Ok(Reply::text(format!("'{tab}' is not available")));
        }

        let title = self.portal.router().title();
        let body = match (self.portal.router().role(), tab) {
            (Some(Role::Admin), Tab::Dashboard) => {
                self.portal.load_admin_data().await?;
                let summary = self.portal.directory()?.summary();
                let recent = render_activity(self.portal.activity()?.recent());
                format!("{}\n\nRecent Activity\n{recent}", render_summary(&summary))
            }
            (Some(Role::Admin), Tab::Users) => {
                let filter = self.portal.directory()?.filter().clone();
                self.portal.load_directory(filter).await?;
                self.render_directory()?
            }
            (Some(Role::Admin), Tab::Activity) => {
                render_activity(self.portal.load_activity().await?.all())
            }
            (Some(Role::Student), Tab::Dashboard) => {
                let store = self.portal.records()?;
                render_stats(&store.stats(), &store.gpa().to_string())
            }
            (Some(Role::Student), Tab::Courses | Tab::Grades) => {
                render_courses(self.portal.records()?.courses())
            }
            (_, Tab::Profile) => self
                .portal
                .session()
                .map(|s| render_profile(&s.user))
                .unwrap_or_default(),
            _ => String::new(),
        };
        Ok(Reply::text(format!("== {title} ==\n{body}")))
    }

    fn render_tabs(&self) -> String {
        let current = self.portal.router().current();
        self.portal
            .router()
            .allowed_tabs()
            .iter()
            .map(|tab| {
                let marker = if Some(*tab) == current { "*" } else { " " };
                format!("{marker} {:<10} {}", tab.slug(), tab.label())
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_directory(&self) -> PortalResult<String> {
        let directory = self.portal.directory()?;
        let filter = directory.filter();
        let mut out = format!(
            "{}\nFilter: search='{}' role={} status={}\n",
            render_summary(&directory.summary()),
            filter.search_term,
            filter.role,
            filter.status
        );
        let visible = directory.visible();
        if visible.is_empty() {
            out.push_str("No users match");
        } else {
            let rows: Vec<String> = visible.into_iter().map(describe_account).collect();
            out.push_str(&rows.join("\n"));
        }
        Ok(out)
    }
}

fn records<T>(result: RecordsResult<T>) -> PortalResult<T> {
    result.map_err(PortalError::from)
}

/// One line per course
pub fn render_courses(courses: &[Course]) -> String {
    if courses.is_empty() {
        return "No courses yet. Use 'add' to create one".to_string();
    }
    courses
        .iter()
        .map(|c| {
            format!(
                "{:>14} {}{:<8} {:<28} {} cr  {:<8} {:>3}%",
                c.id,
                if c.is_favorite { "*" } else { " " },
                c.code,
                c.name,
                c.credit_hours,
                c.grade,
                c.progress
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_stats(stats: &CourseStats, gpa: &str) -> String {
    format!(
        "Courses: {}  Completed: {}  Credit hours: {}  Favorites: {}  Fees: {:.2}\nGPA: {gpa}",
        stats.total, stats.completed, stats.credit_hours, stats.favorites, stats.fees
    )
}

pub fn render_summary(summary: &DirectorySummary) -> String {
    format!(
        "Total users: {}  Active: {}  Students: {}  Admins: {}",
        summary.total, summary.active, summary.students, summary.admins
    )
}

pub fn render_activity(entries: &[ActivityLogEntry]) -> String {
    if entries.is_empty() {
        return "No activity".to_string();
    }
    entries
        .iter()
        .map(|e| {
            format!(
                "{}  {:<8} {} - {}",
                format_timestamp(&e.timestamp),
                e.kind,
                e.actor,
                e.action
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_profile(user: &UserAccount) -> String {
    let profile = &user.profile;
    let mut out = format!(
        "Name:       {}\nEmail:      {}\nRole:       {}\nStatus:     {}",
        user.display_name(),
        user.email,
        user.role,
        user.status
    );
    let optional = [
        ("Matric", profile.student_id.clone()),
        ("Department", profile.department.clone()),
        ("Level", profile.level.clone()),
        ("Phone", profile.phone.clone()),
        ("Advisor", profile.advisor.clone()),
        ("CGPA", profile.cgpa.map(|c| format!("{c:.2}"))),
        ("Started", profile.date_started.map(|d| d.to_string())),
    ];
    for (label, value) in optional {
        if let Some(value) = value {
            let _ = write!(out, "\n{:<11} {value}", format!("{label}:"));
        }
    }
    out
}

fn describe_account(account: &UserAccount) -> String {
    format!(
        "{:<24} {:<24} {:<30} {:<7} {}",
        account.id,
        account.display_name(),
        account.email,
        account.role,
        account.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_records::{
        activity::ActivityKind,
        records::{AcademicRecordStore, CourseDraft, Grade},
        session::{AcademicProfile, AccountStatus},
    };
    use chrono::{TimeZone, Utc};

    fn user() -> UserAccount {
        UserAccount {
            id: "u1".to_string(),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane@uni.edu".to_string(),
            role: Role::Student,
            status: AccountStatus::Active,
            profile: AcademicProfile {
                student_id: Some("CS/2025/007".to_string()),
                cgpa: Some(3.5),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_render_courses() {
        assert!(render_courses(&[]).contains("No courses"));

        let mut store = AcademicRecordStore::new();
        let id = store
            .add_course(CourseDraft::new("Data Structures", "cs201", 3).with_grade(Grade::A))
            .unwrap()
            .id;
        store.toggle_favorite(id).unwrap();

        let text = render_courses(store.courses());
        assert!(text.contains("*CS201"));
        assert!(text.contains("Data Structures"));
        assert!(text.contains("  0%"));
    }

    #[test]
    fn test_render_stats() {
        let stats = CourseStats {
            total: 2,
            completed: 1,
            credit_hours: 6,
            fees: 150.0,
            favorites: 0,
        };
        let text = render_stats(&stats, "3.65");
        assert!(text.contains("Credit hours: 6"));
        assert!(text.contains("Fees: 150.00"));
        assert!(text.ends_with("GPA: 3.65"));
    }

    #[test]
    fn test_render_activity() {
        assert_eq!(render_activity(&[]), "No activity");

        let entry = ActivityLogEntry {
            id: "l1".to_string(),
            actor: "Admin".to_string(),
            action: "Deleted user".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap(),
            kind: ActivityKind::Delete,
        };
        let text = render_activity(&[entry]);
        assert!(text.contains("delete"));
        assert!(text.contains("Admin - Deleted user"));
    }

    #[test]
    fn test_render_profile_skips_missing() {
        let text = render_profile(&user());
        assert!(text.contains("Jane Doe"));
        assert!(text.contains("CS/2025/007"));
        assert!(text.contains("3.50"));
        assert!(!text.contains("Advisor"));
    }

    #[test]
    fn test_render_summary() {
        let summary = DirectorySummary {
            total: 10,
            active: 8,
            students: 7,
            admins: 3,
        };
        assert_eq!(
            render_summary(&summary),
            "Total users: 10  Active: 8  Students: 7  Admins: 3"
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        for command in [
            "tabs", "tab <name>", "courses", "add ", "grade ", "progress ", "fav ", "drop ",
            "gpa", "stats", "users", "search", "role ", "status ", "edit ", "remove ",
            "export", "logs", "recent", "dark", "logout", "quit",
        ] {
            assert!(HELP.contains(command), "help should mention {command}");
        }
    }
}
