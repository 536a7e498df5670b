//! Terminal client for the campus records portal.
//!
//! The client signs in against the records API, then runs a line-based shell
//! whose commands depend on the signed-in role.

use anyhow::{Context, Result};
use campus_client::{
    api_client::HttpApi,
    commands::{Command, parse_command},
    config::{ClientConfig, ConfigOverrides},
    logging,
    shell::{Flow, Shell},
    storage::FileStore,
};
use campus_records::{
    Portal, PortalError, RegistrationProfile,
    session::{AcademicProfile, Role},
};
use pico_args::Arguments;
use std::{
    io::{self, Write},
    sync::Arc,
};

const HELP: &str = "\
Campus records terminal client

USAGE:
  campus_client [OPTIONS]

OPTIONS:
  --server URL          API base URL  [default: http://localhost:5000/api]
  --timeout SECS        Request timeout in seconds  [default: 30]
  --users-path PATH     Account list endpoint  [default: /users]
                        (edits, deletes and export stay under /users)
  --storage FILE        Token and preferences file  [default: .campus_records.json]
  --email EMAIL         Email for login
  --password PASS       Password for login

FLAGS:
  --restore             Resume the saved session if the token is still valid
  --register            Create an account before signing in
  -h, --help            Print help information

Environment variables CAMPUS_API_URL, CAMPUS_REQUEST_TIMEOUT_SECS,
CAMPUS_USERS_PATH and CAMPUS_STORAGE_PATH are read when the matching
option is absent. A .env file in the working directory is honoured.
";

struct Args {
    overrides: ConfigOverrides,
    email: Option<String>,
    password: Option<String>,
    restore: bool,
    register: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let mut pargs = Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let args = Args {
        overrides: ConfigOverrides {
            api_url: pargs.opt_value_from_str("--server").ok().flatten(),
            request_timeout_secs: pargs
                .opt_value_from_str("--timeout")
                .context("--timeout expects a whole number of seconds")?,
            users_path: pargs.opt_value_from_str("--users-path").ok().flatten(),
            storage_path: pargs.opt_value_from_str("--storage").ok().flatten(),
        },
        email: pargs.opt_value_from_str("--email").ok().flatten(),
        password: pargs.opt_value_from_str("--password").ok().flatten(),
        restore: pargs.contains("--restore"),
        register: pargs.contains("--register"),
    };

    logging::init();
    run(args).await
}

async fn run(args: Args) -> Result<()> {
    let config = ClientConfig::from_env(args.overrides).context("Invalid configuration")?;
    tracing::info!(api_url = %config.api_url, "Starting campus client");

    let api = HttpApi::new(&config).context("Failed to build HTTP client")?;
    let storage = FileStore::new(config.storage_path.clone());
    let mut shell = Shell::new(Portal::new(Arc::new(api), Arc::new(storage)));

    if args.restore {
        match shell.portal_mut().restore().await {
            Some(session) => println!("Welcome back, {}", session.user.display_name()),
            None => println!("No saved session, please sign in"),
        }
    }

    if args.register && !shell.portal().is_authenticated() {
        register(&mut shell, args.email.clone()).await?;
    }

    let mut email = args.email;
    let mut password = args.password;

    loop {
        if !shell.portal().is_authenticated() {
            if !sign_in(&mut shell, email.take(), password.take()).await? {
                println!("Goodbye");
                return Ok(());
            }
        }

        print!("{}", shell.prompt());
        io::stdout().flush()?;

        let Some(line) = read_line()? else {
            println!();
            return Ok(());
        };
        if line.is_empty() {
            continue;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };

        if command.is_destructive() && !confirm(&command)? {
            println!("Cancelled");
            continue;
        }

        match shell.execute(command).await {
            Ok(reply) => {
                if !reply.text.is_empty() {
                    println!("{}", reply.text);
                }
                match reply.flow {
                    Flow::Continue | Flow::SignedOut => {}
                    Flow::Quit => return Ok(()),
                }
            }
            Err(err) => {
                tracing::debug!(error = ?err, "Command failed");
                println!("Error: {}", describe(&err));
                if !shell.portal().is_authenticated() {
                    println!("Your session has ended, please sign in again");
                }
            }
        }
    }
}

/// Prompt until a login succeeds. `false` when input ends.
async fn sign_in(
    shell: &mut Shell,
    mut email: Option<String>,
    mut password: Option<String>,
) -> Result<bool> {
    loop {
        let email = match email.take() {
            Some(email) => email,
            None => match prompt("Email: ")? {
                Some(email) => email,
                None => return Ok(false),
            },
        };
        let password = match password.take() {
            Some(password) => password,
            None => match prompt("Password: ")? {
                Some(password) => password,
                None => return Ok(false),
            },
        };

        println!("Signing in as {email}...");
        match shell.portal_mut().login(&email, &password).await {
            Ok(session) => {
                let greeting = match session.role() {
                    Role::Admin => "administrator",
                    Role::Student => "student",
                };
                println!("Welcome, {} ({greeting})", session.user.display_name());
                println!("Type 'help' for commands");
                return Ok(true);
            }
            Err(err) => println!("Login failed: {}", err.client_message()),
        }
    }
}

async fn register(shell: &mut Shell, email: Option<String>) -> Result<()> {
    println!("Create an account");
    let first_name = prompt("First name: ")?.unwrap_or_default();
    let last_name = prompt("Last name: ")?.unwrap_or_default();
    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?.unwrap_or_default(),
    };
    let password = prompt("Password: ")?.unwrap_or_default();
    let department = prompt("Department (blank for default): ")?.unwrap_or_default();

    let mut profile = RegistrationProfile::new(first_name, last_name, email, password);
    if !department.is_empty() {
        profile.profile = AcademicProfile {
            department: Some(department),
            ..Default::default()
        };
    }

    match shell.portal().register(profile).await {
        Ok(()) => println!("Registered, please sign in"),
        Err(err) => println!("Registration failed: {}", err.client_message()),
    }
    Ok(())
}

fn confirm(command: &Command) -> Result<bool> {
    let what = match command {
        Command::DropCourse(id) => format!("course {id}"),
        Command::RemoveUser(id) => format!("user {id}"),
        _ => "this".to_string(),
    };
    let answer = prompt(&format!("Delete {what}? [y/N] "))?.unwrap_or_default();
    Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn prompt(label: &str) -> Result<Option<String>> {
    print!("{label}");
    io::stdout().flush()?;
    read_line()
}

/// Trimmed line from stdin, `None` at end of input
fn read_line() -> Result<Option<String>> {
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Failed to read from stdin")?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim().to_string()))
}

fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PortalError>() {
        Some(err) => err.client_message(),
        None => format!("{err:#}"),
    }
}
