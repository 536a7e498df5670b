use campus_records::{
    directory::{RoleFilter, StatusFilter, UserPatch},
    records::{CourseDraft, CourseId, Grade},
    router::Tab,
    session::{AccountStatus, Role},
};
use std::fmt;

/// A parsed shell command.
#[derive(Debug, Clone)]
pub enum Command {
    Help,
    Tabs,
    Tab(Tab),
    Courses,
    AddCourse(CourseDraft),
    Grade(CourseId, Grade),
    Progress(CourseId, i32),
    Favorite(CourseId),
    DropCourse(CourseId),
    /// Overall GPA, or one term's
    Gpa(Option<(String, String)>),
    Stats,
    Users,
    Search(String),
    RoleFilter(RoleFilter),
    StatusFilter(StatusFilter),
    Edit { id: String, patch: UserPatch },
    RemoveUser(String),
    Export(Option<String>),
    Logs,
    Recent,
    Dark,
    Logout,
    Quit,
}

impl Command {
    /// Whether the shell should ask before running it
    pub fn is_destructive(&self) -> bool {
        matches!(self, Command::DropCourse(_) | Command::RemoveUser(_))
    }
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Command is missing an argument.
    MissingArgument { command: &'static str, usage: &'static str },
    /// Argument is not a valid number.
    InvalidNumber(String),
    /// Argument is not one of the accepted values.
    InvalidValue(String),
    /// `edit` field that cannot be changed.
    UnknownField(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingArgument { command, usage } => {
                write!(f, "'{}' is missing an argument. Usage: {}", command, usage)
            }
            Self::InvalidNumber(value) => write!(f, "Invalid number '{}'", value),
            Self::InvalidValue(reason) => write!(f, "{}", reason),
            Self::UnknownField(field) => write!(
                f,
                "Unknown field '{}'. Editable fields: {}",
                field,
                EDITABLE_FIELDS.join(", ")
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Fields accepted by `edit`
pub const EDITABLE_FIELDS: [&str; 11] = [
    "first", "last", "email", "role", "status", "department", "level", "matric", "phone",
    "advisor", "cgpa",
];

/// Parse a command string into a [`Command`].
///
/// # Examples
///
/// ```
/// use campus_client::commands::{Command, parse_command};
///
/// assert!(matches!(parse_command("gpa"), Ok(Command::Gpa(None))));
/// assert!(matches!(parse_command("progress 42 -10"), Ok(Command::Progress(_, -10))));
/// assert!(parse_command("fly").is_err());
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    // Try single-word commands first
    match trimmed {
        "help" | "?" => return Ok(Command::Help),
        "tabs" => return Ok(Command::Tabs),
        "courses" => return Ok(Command::Courses),
        "stats" => return Ok(Command::Stats),
        "users" => return Ok(Command::Users),
        "logs" => return Ok(Command::Logs),
        "recent" => return Ok(Command::Recent),
        "dark" => return Ok(Command::Dark),
        "logout" => return Ok(Command::Logout),
        "quit" | "exit" => return Ok(Command::Quit),
        _ => {}
    }

    // Parse multi-word commands
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();
    match parts.first() {
        Some(&"tab") => parse_tab_command(&parts),
        Some(&"add") => parse_add_command(&parts),
        Some(&"grade") => {
            let id = course_id(&parts, "grade", "grade <id> <grade>")?;
            let grade = arg(&parts, 2, "grade", "grade <id> <grade>")?;
            Ok(Command::Grade(id, parse_grade(grade)?))
        }
        Some(&"progress") => {
            let id = course_id(&parts, "progress", "progress <id> <delta>")?;
            let delta = arg(&parts, 2, "progress", "progress <id> <delta>")?;
            let delta = delta
                .trim_start_matches('+')
                .parse::<i32>()
                .map_err(|_| ParseError::InvalidNumber(delta.to_string()))?;
            Ok(Command::Progress(id, delta))
        }
        Some(&"fav") => Ok(Command::Favorite(course_id(&parts, "fav", "fav <id>")?)),
        Some(&"drop") => Ok(Command::DropCourse(course_id(&parts, "drop", "drop <id>")?)),
        Some(&"gpa") => match (parts.get(1), parts.get(2)) {
            (None, _) => Ok(Command::Gpa(None)),
            (Some(semester), Some(year)) => {
                Ok(Command::Gpa(Some((semester.to_string(), year.to_string()))))
            }
            (Some(_), None) => Err(ParseError::MissingArgument {
                command: "gpa",
                usage: "gpa [<semester> <year>]",
            }),
        },
        Some(&"search") => Ok(Command::Search(rest(&parts, 1))),
        Some(&"role") => {
            let value = arg(&parts, 1, "role", "role <all|student|admin>")?;
            value
                .parse()
                .map(Command::RoleFilter)
                .map_err(|e| ParseError::InvalidValue(e.to_string()))
        }
        Some(&"status") => {
            let value = arg(&parts, 1, "status", "status <all|active|inactive>")?;
            value
                .parse()
                .map(Command::StatusFilter)
                .map_err(|e| ParseError::InvalidValue(e.to_string()))
        }
        Some(&"edit") => parse_edit_command(&parts),
        Some(&"remove") => {
            let id = arg(&parts, 1, "remove", "remove <id>")?;
            Ok(Command::RemoveUser(id.to_string()))
        }
        Some(&"export") => Ok(Command::Export(parts.get(1).map(|p| p.to_string()))),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse a tab command: "tab NAME"
fn parse_tab_command(parts: &[&str]) -> Result<Command, ParseError> {
    let name = rest(parts, 1);
    if name.is_empty() {
        return Err(ParseError::MissingArgument {
            command: "tab",
            usage: "tab <name>",
        });
    }
    name.parse::<Tab>()
        .map(Command::Tab)
        .map_err(|e| ParseError::InvalidValue(e.to_string()))
}

/// Parse an add command: "add CODE CREDITS GRADE|- NAME..."
fn parse_add_command(parts: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "add <code> <credits> <grade|-> <name...>";
    let code = arg(parts, 1, "add", USAGE)?;
    let credits = arg(parts, 2, "add", USAGE)?;
    let grade = arg(parts, 3, "add", USAGE)?;
    let name = rest(parts, 4);
    if name.is_empty() {
        return Err(ParseError::MissingArgument {
            command: "add",
            usage: USAGE,
        });
    }

    let credits = credits
        .parse::<u8>()
        .map_err(|_| ParseError::InvalidNumber(credits.to_string()))?;
    let mut draft = CourseDraft::new(name, code, credits);
    if grade != "-" {
        draft = draft.with_grade(parse_grade(grade)?);
    }
    Ok(Command::AddCourse(draft))
}

/// Parse an edit command: "edit ID FIELD VALUE..."
fn parse_edit_command(parts: &[&str]) -> Result<Command, ParseError> {
    const USAGE: &str = "edit <id> <field> <value...>";
    let id = arg(parts, 1, "edit", USAGE)?.to_string();
    let field = arg(parts, 2, "edit", USAGE)?;
    let value = rest(parts, 3);
    if value.is_empty() {
        return Err(ParseError::MissingArgument {
            command: "edit",
            usage: USAGE,
        });
    }

    let mut patch = UserPatch::default();
    match field.to_ascii_lowercase().as_str() {
        "first" => patch.first_name = Some(value),
        "last" => patch.last_name = Some(value),
        "email" => patch.email = Some(value),
        "role" => {
            patch.role = Some(
                value
                    .parse::<Role>()
                    .map_err(|e| ParseError::InvalidValue(e.to_string()))?,
            )
        }
        "status" => {
            patch.status = Some(
                value
                    .parse::<AccountStatus>()
                    .map_err(|e| ParseError::InvalidValue(e.to_string()))?,
            )
        }
        "department" => patch.department = Some(value),
        "level" => patch.level = Some(value),
        "matric" => patch.student_id = Some(value),
        "phone" => patch.phone = Some(value),
        "advisor" => patch.advisor = Some(value),
        "cgpa" => {
            patch.cgpa = Some(
                value
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidNumber(value.clone()))?,
            )
        }
        other => return Err(ParseError::UnknownField(other.to_string())),
    }
    Ok(Command::Edit { id, patch })
}

fn arg<'a>(
    parts: &[&'a str],
    index: usize,
    command: &'static str,
    usage: &'static str,
) -> Result<&'a str, ParseError> {
    parts
        .get(index)
        .copied()
        .ok_or(ParseError::MissingArgument { command, usage })
}

fn rest(parts: &[&str], from: usize) -> String {
    parts.get(from..).map(|p| p.join(" ")).unwrap_or_default()
}

fn course_id(parts: &[&str], command: &'static str, usage: &'static str) -> Result<CourseId, ParseError> {
    let raw = arg(parts, 1, command, usage)?;
    raw.parse()
        .map_err(|_| ParseError::InvalidNumber(raw.to_string()))
}

fn parse_grade(raw: &str) -> Result<Grade, ParseError> {
    raw.parse()
        .map_err(|e: campus_records::ValidationError| ParseError::InvalidValue(e.to_string()))
}
