//! Command-line front end for the Folio stores.
//!
//! # Responsibility
//! - Wire user commands to store operations and render results as text.
//! - Own confirmation prompts for the irreversible bulk operations.
//!
//! The management commands are gated behind the account session, the way
//! the original dashboard was; sending a contact message is public.

use clap::{Args, Parser, Subcommand};
use folio_core::db::open_db;
use folio_core::{
    default_log_level, init_logging, AccountStore, ContactMessage, LogEntry, MessageStore,
    Project, ProjectDraft, ProjectStore, Skill, SkillStore, SqliteKvRepository,
};
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

const EXPORT_FILE_NAME: &str = "projects-export.json";

#[derive(Parser)]
#[command(name = "folio", version, about = "Local-first portfolio content manager")]
struct Cli {
    /// SQLite database file holding all portfolio content.
    #[arg(long, default_value = "folio.sqlite3")]
    db: PathBuf,

    /// Directory for rolling log files; file logging is off when absent.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error.
    #[arg(long)]
    log_level: Option<String>,

    /// Answer yes to every confirmation prompt.
    #[arg(long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new account and make it current.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in and open the management gate.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log out and close the management gate.
    Logout,
    /// Manage portfolio projects.
    #[command(subcommand)]
    Project(ProjectCommand),
    /// Manage the skill catalog.
    #[command(subcommand)]
    Skill(SkillCommand),
    /// Send or manage contact messages.
    #[command(subcommand)]
    Message(MessageCommand),
}

#[derive(Args)]
struct ProjectFields {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    /// Image URL or embedded binary-as-text payload.
    #[arg(long)]
    image: Option<String>,
    /// Technology label; repeat the flag for multiple entries.
    #[arg(long = "tech")]
    technologies: Vec<String>,
    /// Live demo URL.
    #[arg(long)]
    demo: Option<String>,
}

impl From<ProjectFields> for ProjectDraft {
    fn from(fields: ProjectFields) -> Self {
        ProjectDraft {
            title: fields.title,
            description: fields.description,
            image: fields.image,
            technologies: fields.technologies,
            demo: fields.demo,
        }
    }
}

#[derive(Subcommand)]
enum ProjectCommand {
    /// Add a new project.
    Add(ProjectFields),
    /// List active projects, optionally filtered.
    List {
        /// Case-insensitive filter over title, description and technologies.
        #[arg(long)]
        filter: Option<String>,
    },
    /// Replace the fields of an existing project.
    Edit {
        #[arg(long)]
        id: i64,
        #[command(flatten)]
        fields: ProjectFields,
    },
    /// Move a project into the recycle bin.
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Restore the most recent single deletion (one shot).
    Restore,
    /// Move every active project into the recycle bin.
    Clear,
    /// Show the recycle bin.
    Bin,
    /// Permanently empty the recycle bin.
    PurgeBin,
    /// Show the deletion log.
    Logs,
    /// Permanently empty the deletion log.
    ClearLogs,
    /// Write the active projects to a JSON file.
    Export {
        /// Output path; defaults to projects-export.json.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Merge projects from an exported JSON file.
    Import {
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Subcommand)]
enum SkillCommand {
    /// Add a skill to the catalog.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        icon: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        code: Option<String>,
    },
    /// List the skill catalog.
    List,
    /// Soft-delete a skill by name.
    Delete {
        #[arg(long)]
        name: String,
    },
    /// Restore the last deleted skill.
    Restore,
}

#[derive(Subcommand)]
enum MessageCommand {
    /// Submit a contact message (no login required).
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
    },
    /// List received messages.
    List,
    /// Permanently delete a message by id.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let conn = open_db(&cli.db)?;
    let mut accounts = AccountStore::load(SqliteKvRepository::try_new(&conn)?)?;

    match cli.command {
        Command::Register {
            name,
            email,
            password,
        } => {
            let user = accounts.register(&name, &email, &password)?;
            println!("registered {}", user.email);
        }
        Command::Login { email, password } => {
            let user = accounts.login(&email, &password)?;
            println!("logged in as {}", user.email);
        }
        Command::Logout => {
            accounts.logout()?;
            println!("logged out");
        }
        Command::Project(command) => {
            ensure_logged_in(&accounts)?;
            let store = ProjectStore::load(SqliteKvRepository::try_new(&conn)?)?;
            run_project(command, store, cli.yes)?;
        }
        Command::Skill(command) => {
            ensure_logged_in(&accounts)?;
            let store = SkillStore::load(SqliteKvRepository::try_new(&conn)?)?;
            run_skill(command, store)?;
        }
        Command::Message(command) => {
            let store = MessageStore::load(SqliteKvRepository::try_new(&conn)?)?;
            run_message(command, store, &accounts)?;
        }
    }

    Ok(())
}

fn run_project(
    command: ProjectCommand,
    mut store: ProjectStore<SqliteKvRepository<'_>>,
    assume_yes: bool,
) -> Result<(), Box<dyn Error>> {
    match command {
        ProjectCommand::Add(fields) => {
            let project = store.create(fields.into())?;
            println!("added project {} `{}`", project.id, project.title);
        }
        ProjectCommand::List { filter } => {
            let projects = store.filtered(filter.as_deref().unwrap_or(""));
            if projects.is_empty() {
                println!("no projects to display.");
            }
            for project in projects {
                print_project(project);
            }
            if store.restore_available() {
                println!("(one deleted project can be restored)");
            }
        }
        ProjectCommand::Edit { id, fields } => {
            let project = store.update(id, fields.into())?;
            println!("updated project {} `{}`", project.id, project.title);
        }
        ProjectCommand::Delete { id } => {
            let outcome = store.delete(id)?;
            println!("moved `{}` to the recycle bin", outcome.project.title);
            if outcome.restorable {
                println!("(restorable once with `project restore`)");
            }
        }
        ProjectCommand::Restore => {
            let project = store.restore()?;
            println!("restored `{}`", project.title);
        }
        ProjectCommand::Clear => {
            if confirm("delete all projects?", assume_yes)? {
                let moved = store.clear_all()?;
                println!("moved {moved} projects to the recycle bin");
            }
        }
        ProjectCommand::Bin => {
            if store.recycled().is_empty() {
                println!("no deleted projects.");
            }
            for project in store.recycled() {
                print_project(project);
            }
        }
        ProjectCommand::PurgeBin => {
            if confirm("permanently delete all recycled projects?", assume_yes)? {
                let purged = store.purge_recycle_bin()?;
                println!("purged {purged} projects");
            }
        }
        ProjectCommand::Logs => {
            for entry in store.logs() {
                print_log_entry(entry);
            }
        }
        ProjectCommand::ClearLogs => {
            if confirm("clear the deletion log?", assume_yes)? {
                store.clear_log()?;
                println!("logs cleared");
            }
        }
        ProjectCommand::Export { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME));
            std::fs::write(&path, store.export_json()?)?;
            println!("exported {} projects to {}", store.active().len(), path.display());
        }
        ProjectCommand::Import { input } => {
            let payload = std::fs::read_to_string(&input)?;
            let imported = store.import_merge(&payload)?;
            println!("imported {imported} projects");
        }
    }
    Ok(())
}

fn run_skill(
    command: SkillCommand,
    mut store: SkillStore<SqliteKvRepository<'_>>,
) -> Result<(), Box<dyn Error>> {
    match command {
        SkillCommand::Add {
            name,
            icon,
            color,
            description,
            code,
        } => {
            let skill = store.create(Skill {
                name,
                icon,
                color,
                description,
                code,
            })?;
            println!("added skill `{}`", skill.name);
        }
        SkillCommand::List => {
            if store.active().is_empty() {
                println!("no skills added yet.");
            }
            for skill in store.active() {
                println!("{} [{}]", skill.name, skill.icon);
                if let Some(description) = &skill.description {
                    println!("  {description}");
                }
            }
        }
        SkillCommand::Delete { name } => {
            let skill = store.delete(&name)?;
            println!("deleted skill `{}` (restorable once)", skill.name);
        }
        SkillCommand::Restore => {
            let skill = store.restore()?;
            println!("restored skill `{}`", skill.name);
        }
    }
    Ok(())
}

fn run_message(
    command: MessageCommand,
    mut store: MessageStore<SqliteKvRepository<'_>>,
    accounts: &AccountStore<SqliteKvRepository<'_>>,
) -> Result<(), Box<dyn Error>> {
    match command {
        MessageCommand::Send {
            name,
            email,
            message,
        } => {
            let record = store.append(&name, &email, &message)?;
            println!("message sent (id {})", record.id);
        }
        MessageCommand::List => {
            ensure_logged_in(accounts)?;
            for message in store.messages() {
                print_message(message);
            }
        }
        MessageCommand::Delete { id } => {
            ensure_logged_in(accounts)?;
            store.delete(id)?;
            println!("deleted message {id}");
        }
    }
    Ok(())
}

fn ensure_logged_in(accounts: &AccountStore<SqliteKvRepository<'_>>) -> Result<(), Box<dyn Error>> {
    if accounts.is_logged_in()? {
        Ok(())
    } else {
        Err("please log in to manage portfolio content".into())
    }
}

fn confirm(prompt: &str, assume_yes: bool) -> io::Result<bool> {
    if assume_yes {
        return Ok(true);
    }

    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let confirmed = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
    if !confirmed {
        println!("aborted");
    }
    Ok(confirmed)
}

fn print_project(project: &Project) {
    println!("{} `{}`: {}", project.id, project.title, project.description);
    if !project.technologies.is_empty() {
        println!("  tech: {}", project.technologies.join(", "));
    }
    if let Some(demo) = &project.demo {
        println!("  demo: {demo}");
    }
}

fn print_log_entry(entry: &LogEntry) {
    println!("\"{}\" was deleted at {}", entry.title, entry.time);
}

fn print_message(message: &ContactMessage) {
    println!(
        "{} [{}] {} <{}>: {}",
        message.id, message.date, message.name, message.email, message.message
    );
}
