use std::io::{BufRead, Write};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_console::collection::{FilterCriteria, StatusFilter};
use campus_console::models::*;
use campus_console::mutation::{AlwaysConfirm, ConfirmAction};
use campus_console::notify::{Notification, NotificationKind, NotificationSink, Notifier};
use campus_console::{Console, ConsoleConfig, EntityService};

#[derive(Parser)]
#[command(name = "campusctl")]
#[command(about = "Administration console for the campus platform")]
struct Cli {
    /// API base URL (overrides config file and CAMPUS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store a bearer token after checking it with the server
    Login {
        #[arg(long)]
        token: String,
    },
    /// Clear the stored session
    Logout,
    /// Show the signed-in principal
    Whoami,
    /// Manage students
    #[command(subcommand)]
    Students(StudentCommand),
    /// Manage teachers
    #[command(subcommand)]
    Teachers(TeacherCommand),
    /// Manage admins
    #[command(subcommand)]
    Admins(AdminCommand),
    /// Review pending courses
    #[command(subcommand)]
    Courses(CourseCommand),
    /// Show or change the saved configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the saved settings and the file they live in
    Show,
    /// Save the API base URL
    SetUrl { url: String },
    /// Save a per-request timeout in seconds; omit to remove it
    SetTimeout { secs: Option<u64> },
}

#[derive(Args)]
struct ListArgs {
    /// Case-insensitive substring to search for
    #[arg(short, long, default_value = "")]
    search: String,
    /// Field the search applies to
    #[arg(short, long)]
    field: Option<String>,
    /// Status to keep, or "all"
    #[arg(long, default_value = "all")]
    status: String,
}

#[derive(Args)]
struct DeleteArgs {
    id: i64,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    yes: bool,
}

#[derive(Args)]
struct PersonArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    dni: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long, default_value = "active")]
    status: String,
}

#[derive(Subcommand)]
enum StudentCommand {
    List(ListArgs),
    Create(PersonArgs),
    Update {
        id: i64,
        #[command(flatten)]
        person: PersonArgs,
    },
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
enum TeacherCommand {
    List(ListArgs),
    Create {
        #[command(flatten)]
        person: PersonArgs,
        #[arg(long)]
        specialty: Option<String>,
    },
    Update {
        id: i64,
        #[command(flatten)]
        person: PersonArgs,
        #[arg(long)]
        specialty: Option<String>,
    },
    Delete(DeleteArgs),
}

#[derive(Args)]
struct AdminArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long, default_value = "active")]
    status: String,
}

#[derive(Subcommand)]
enum AdminCommand {
    List(ListArgs),
    Create(AdminArgs),
    Update {
        id: i64,
        #[command(flatten)]
        admin: AdminArgs,
    },
    Delete(DeleteArgs),
}

#[derive(Subcommand)]
enum CourseCommand {
    /// List courses awaiting review
    Pending(ListArgs),
    Approve {
        id: i64,
    },
    Reject {
        id: i64,
        #[arg(long)]
        reason: Option<String>,
    },
    BulkApprove {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
}

/// Prints notifications to stderr so stdout only carries command output.
#[derive(Debug)]
struct StderrSink;

impl NotificationSink for StderrSink {
    fn deliver(&self, notification: &Notification) {
        let marker = match notification.kind {
            NotificationKind::Success => "ok",
            NotificationKind::Error => "error",
            NotificationKind::Info => "info",
        };
        eprintln!("[{}] {}", marker, notification.message);
    }
}

/// Asks on stdin; anything but "y"/"yes" declines.
struct PromptConfirm;

impl ConfirmAction for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        if let Err(e) = std::io::stderr().flush() {
            tracing::debug!("Failed to flush confirmation prompt: {}", e);
        }
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Initialize tracing on stderr; stdout is reserved for command output.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "campus_console=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let command = match cli.command {
        Commands::Config(cmd) => return run_config(cmd),
        other => other,
    };

    let mut config = ConsoleConfig::load();
    if let Some(url) = cli.api_url {
        config.base_url = url;
    }
    let notifier = Notifier::with_sink(config.notification_ttl(), Arc::new(StderrSink));
    let console = Console::new(config)?.with_notifier(notifier);

    match command {
        Commands::Login { token } => {
            let principal = console.login_with_token(&token).await?;
            println!(
                "{} (id {}, role {})",
                principal.display_name, principal.id, principal.role
            );
        }
        Commands::Logout => console.logout(),
        Commands::Whoami => match console.current_principal().await? {
            Some(principal) => println!(
                "{} (id {}, role {}, roles [{}])",
                principal.display_name,
                principal.id,
                principal.role,
                principal.roles.join(", ")
            ),
            None => anyhow::bail!("Not signed in. Run `campusctl login --token <TOKEN>`."),
        },
        Commands::Students(cmd) => run_students(&console, cmd).await?,
        Commands::Teachers(cmd) => run_teachers(&console, cmd).await?,
        Commands::Admins(cmd) => run_admins(&console, cmd).await?,
        Commands::Courses(cmd) => run_courses(&console, cmd).await?,
        Commands::Config(cmd) => run_config(cmd)?,
    }

    Ok(())
}

/// Edits the config file itself, so environment overrides never get saved.
fn run_config(cmd: ConfigCommand) -> anyhow::Result<()> {
    let path = ConsoleConfig::config_path()
        .ok_or_else(|| anyhow::anyhow!("No config directory on this platform"))?;
    let mut config = ConsoleConfig::read_from(&path)?;

    match cmd {
        ConfigCommand::Show => {
            println!("# {}", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }
        ConfigCommand::SetUrl { url } => config.base_url = url.trim().to_string(),
        ConfigCommand::SetTimeout { secs } => config.request_timeout_secs = secs,
    }

    config.write_to(&path)?;
    eprintln!("Saved {}", path.display());
    Ok(())
}

fn parse_account_status(s: &str) -> anyhow::Result<AccountStatus> {
    AccountStatus::from_str(s)
        .ok_or_else(|| anyhow::anyhow!("Unknown status `{}` (active, inactive, banned)", s))
}

fn parse_status_filter<S>(
    s: &str,
    parse: impl Fn(&str) -> Option<S>,
) -> anyhow::Result<StatusFilter<S>> {
    if s == "all" {
        return Ok(StatusFilter::All);
    }
    parse(s)
        .map(StatusFilter::Only)
        .ok_or_else(|| anyhow::anyhow!("Unknown status filter `{}`", s))
}

fn parse_field<F: Default>(
    s: Option<&str>,
    parse: impl Fn(&str) -> Option<F>,
) -> anyhow::Result<F> {
    match s {
        None => Ok(F::default()),
        Some(s) => parse(s).ok_or_else(|| anyhow::anyhow!("Unknown search field `{}`", s)),
    }
}

/// Load the list, apply criteria, print the filtered rows.
async fn list<E: Resource>(
    mut service: EntityService<E>,
    criteria: FilterCriteria<E>,
    render: impl Fn(&E) -> String,
) -> anyhow::Result<()> {
    service.collection_mut().set_criteria(criteria);
    service.reload().await?;

    let collection = service.collection();
    for entity in collection.filtered() {
        println!("{}", render(entity));
    }
    eprintln!(
        "{} of {} {} records",
        collection.filtered().len(),
        collection.canonical().len(),
        E::LABEL.to_lowercase()
    );
    Ok(())
}

async fn delete<E: Editable>(
    mut service: EntityService<E>,
    args: DeleteArgs,
) -> anyhow::Result<()> {
    let removed = if args.yes {
        service.remove(args.id, &AlwaysConfirm).await?
    } else {
        service.remove(args.id, &PromptConfirm).await?
    };
    if !removed {
        eprintln!("Cancelled");
    }
    Ok(())
}

fn opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn status_label(status: Option<AccountStatus>) -> &'static str {
    status.map(|s| s.as_str()).unwrap_or("unknown")
}

fn student_form(args: PersonArgs) -> anyhow::Result<StudentForm> {
    Ok(StudentForm {
        status: parse_account_status(&args.status)?,
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        dni: args.dni,
        password: args.password,
    })
}

fn teacher_form(args: PersonArgs, specialty: Option<String>) -> anyhow::Result<TeacherForm> {
    Ok(TeacherForm {
        status: parse_account_status(&args.status)?,
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone: args.phone,
        dni: args.dni,
        specialty,
        password: args.password,
    })
}

fn admin_form(args: AdminArgs) -> anyhow::Result<AdminForm> {
    Ok(AdminForm {
        status: parse_account_status(&args.status)?,
        name: args.name,
        email: args.email,
        phone: args.phone,
        password: args.password,
    })
}

async fn run_students(console: &Console, cmd: StudentCommand) -> anyhow::Result<()> {
    let mut service = console.students();
    match cmd {
        StudentCommand::List(args) => {
            let criteria = FilterCriteria::<Student>::new(
                args.search,
                parse_field(args.field.as_deref(), StudentField::from_str)?,
                parse_status_filter(&args.status, AccountStatus::from_str)?,
            );
            list(service, criteria, |s: &Student| {
                format!(
                    "{:>6}  {:<20} {:<20} {:<30} {:<12} {}",
                    s.id,
                    opt(&s.first_name),
                    opt(&s.last_name),
                    opt(&s.email),
                    opt(&s.dni),
                    status_label(s.status)
                )
            })
            .await
        }
        StudentCommand::Create(args) => Ok(service.create(&student_form(args)?).await?),
        StudentCommand::Update { id, person } => {
            Ok(service.update(id, &student_form(person)?).await?)
        }
        StudentCommand::Delete(args) => delete(service, args).await,
    }
}

async fn run_teachers(console: &Console, cmd: TeacherCommand) -> anyhow::Result<()> {
    let mut service = console.teachers();
    match cmd {
        TeacherCommand::List(args) => {
            let criteria = FilterCriteria::<Teacher>::new(
                args.search,
                parse_field(args.field.as_deref(), TeacherField::from_str)?,
                parse_status_filter(&args.status, AccountStatus::from_str)?,
            );
            list(service, criteria, |t: &Teacher| {
                format!(
                    "{:>6}  {:<20} {:<20} {:<30} {:<20} {}",
                    t.id,
                    opt(&t.first_name),
                    opt(&t.last_name),
                    opt(&t.email),
                    opt(&t.specialty),
                    status_label(t.status)
                )
            })
            .await
        }
        TeacherCommand::Create { person, specialty } => {
            Ok(service.create(&teacher_form(person, specialty)?).await?)
        }
        TeacherCommand::Update {
            id,
            person,
            specialty,
        } => Ok(service.update(id, &teacher_form(person, specialty)?).await?),
        TeacherCommand::Delete(args) => delete(service, args).await,
    }
}

async fn run_admins(console: &Console, cmd: AdminCommand) -> anyhow::Result<()> {
    let mut service = console.admins();
    match cmd {
        AdminCommand::List(args) => {
            let criteria = FilterCriteria::<Admin>::new(
                args.search,
                parse_field(args.field.as_deref(), AdminField::from_str)?,
                parse_status_filter(&args.status, AccountStatus::from_str)?,
            );
            list(service, criteria, |a: &Admin| {
                format!(
                    "{:>6}  {:<30} {:<30} {}",
                    a.id,
                    opt(&a.name),
                    opt(&a.email),
                    status_label(a.status)
                )
            })
            .await
        }
        AdminCommand::Create(args) => Ok(service.create(&admin_form(args)?).await?),
        AdminCommand::Update { id, admin } => Ok(service.update(id, &admin_form(admin)?).await?),
        AdminCommand::Delete(args) => delete(service, args).await,
    }
}

async fn run_courses(console: &Console, cmd: CourseCommand) -> anyhow::Result<()> {
    let mut service = console.pending_courses();
    match cmd {
        CourseCommand::Pending(args) => {
            let criteria = FilterCriteria::<PendingCourse>::new(
                args.search,
                parse_field(args.field.as_deref(), CourseField::from_str)?,
                parse_status_filter(&args.status, Publication::from_str)?,
            );
            list(service, criteria, |c: &PendingCourse| {
                format!(
                    "{:>6}  {:<40} {:<20} {:<25} {}",
                    c.id,
                    opt(&c.title),
                    opt(&c.category),
                    opt(&c.teacher_name),
                    Publication::from_flag(c.is_published).as_str()
                )
            })
            .await
        }
        CourseCommand::Approve { id } => Ok(service.approve(id).await?),
        CourseCommand::Reject { id, reason } => Ok(service.reject(id, reason.as_deref()).await?),
        CourseCommand::BulkApprove { ids } => Ok(service.bulk_approve(&ids).await?),
    }
}
