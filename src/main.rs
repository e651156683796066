//! Pathways - client case management for a senior-care placement service.
//!
//! Every invocation starts from a fresh in-memory store, loaded with the
//! reference data unless `[store] seed = false` is configured.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pathways::api::{ApiRequest, ApiService, Method};
use pathways::core::{Config, Owned, Store};
use pathways::workflow::{StageId, VersionedWorkflow};

/// Client case management for senior-care placement
#[derive(Parser)]
#[command(name = "pathways")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Read configuration from this file instead of the default locations
    #[arg(long, global = true, env = "PATHWAYS_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// List clients visible to an actor
    Clients {
        /// Actor name (defaults to the configured actor)
        #[arg(long = "as", value_name = "NAME")]
        actor: Option<String>,

        /// Actor role (defaults to the configured role)
        #[arg(long)]
        role: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Inspect or update a client's workflow
    Workflow {
        #[command(subcommand)]
        operation: WorkflowOperation,
    },

    /// List meetings visible to an actor
    Meetings {
        /// Actor name (defaults to the configured actor)
        #[arg(long = "as", value_name = "NAME")]
        actor: Option<String>,

        /// Actor role (defaults to the configured role)
        #[arg(long)]
        role: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// List dashboard users
    Users {
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// List partner companies
    Companies {
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// List partner contacts
    Contacts {
        /// Only contacts at this company
        #[arg(long)]
        company: Option<String>,

        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// List case tasks
    Tasks {
        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Send one request through the service facade and print the response
    Api {
        /// HTTP method (GET, POST, PUT, DELETE)
        method: String,

        /// Request path, e.g. /clients/1/workflow
        path: String,

        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
    },

    /// Show configuration
    Config {
        /// Show config file path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum WorkflowOperation {
    /// Show a client's workflow
    Show {
        /// Client id
        client_id: String,

        #[arg(short, long, value_enum, default_value_t)]
        format: Format,
    },

    /// Toggle one checklist task and show the result
    Toggle {
        /// Client id
        client_id: String,

        /// Stage id (initial, assessment, planning, revised-planning, transition, completed)
        stage: String,

        /// Task id within the stage
        task: String,

        /// Fail unless the workflow is at this version
        #[arg(long)]
        expected_version: Option<u64>,
    },

    /// Flag or clear an issue on a stage
    Flag {
        /// Client id
        client_id: String,

        /// Stage id
        stage: StageId,

        /// Clear the flag instead of setting it
        #[arg(long)]
        clear: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Clients { actor, role, format } => {
            cmd_clients(&config, actor.as_deref(), role.as_deref(), format)?;
        }
        Commands::Workflow { operation } => {
            cmd_workflow(&config, operation)?;
        }
        Commands::Meetings { actor, role, format } => {
            cmd_meetings(&config, actor.as_deref(), role.as_deref(), format)?;
        }
        Commands::Users { format } => {
            let store = open_store(&config);
            print_records(store.users().list(), format, |u| {
                let state = if u.enabled { "" } else { " (disabled)" };
                format!("{:<6} {:<16} {:<30} {}{}", short_id(&u.id), u.name, u.email, u.role, state)
            })?;
        }
        Commands::Companies { format } => {
            let store = open_store(&config);
            print_records(store.companies().list(), format, |c| {
                format!(
                    "{:<6} {:<30} {:<18} {}",
                    short_id(&c.id),
                    c.name,
                    c.company_type.as_str(),
                    c.contact_info.phone
                )
            })?;
        }
        Commands::Contacts { company, format } => {
            let store = open_store(&config);
            let contacts: Vec<_> = match company.as_deref() {
                Some(name) => store.contacts_at(name).into_iter().cloned().collect(),
                None => store.contacts().list().to_vec(),
            };
            print_records(&contacts, format, |c| {
                format!(
                    "{:<6} {:<18} {:<22} {}",
                    short_id(&c.id),
                    c.name,
                    c.title,
                    c.company.as_deref().unwrap_or("-")
                )
            })?;
        }
        Commands::Tasks { format } => {
            let store = open_store(&config);
            let now = chrono::Utc::now();
            print_records(store.tasks().list(), format, |t| {
                let overdue = if t.is_overdue(now) { " OVERDUE" } else { "" };
                format!(
                    "{:<6} {:<24} due {} [{:?}/{:?}] {}{}",
                    short_id(&t.id),
                    t.title,
                    t.due_date.format("%Y-%m-%d"),
                    t.priority,
                    t.status,
                    t.owner_name(),
                    overdue
                )
            })?;
        }
        Commands::Api { method, path, body } => {
            cmd_api(&config, &method, &path, body.as_deref())?;
        }
        Commands::Config { path } => {
            cmd_config(&config, path)?;
        }
        Commands::Completions { shell } => {
            cmd_completions(shell);
        }
    }

    Ok(())
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load(),
    }
}

fn open_store(config: &Config) -> Store {
    if config.store.seed {
        Store::seeded()
    } else {
        Store::new()
    }
}

/// First eight characters of an id; seeded ids are already short.
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

fn print_records<T: Serialize>(
    records: &[T],
    format: Format,
    line: impl Fn(&T) -> String,
) -> Result<()> {
    match format {
        Format::Json => print_json(records)?,
        Format::Text => {
            for record in records {
                println!("{}", line(record));
            }
            println!("\nTotal: {}", records.len());
        }
    }
    Ok(())
}

/// List clients visible to an actor.
fn cmd_clients(
    config: &Config,
    actor: Option<&str>,
    role: Option<&str>,
    format: Format,
) -> Result<()> {
    let mut store = open_store(config);
    let actor = config.actor(actor, role);
    let filter = config.view_filter();

    let visible: Vec<_> = store.visible_clients(&filter, &actor).into_iter().cloned().collect();

    if let Format::Json = format {
        return print_json(&visible);
    }

    for client in &visible {
        // Status and workflow stage are tracked independently; show both.
        let stage = store.workflow(&client.id)?.workflow.current_stage;
        println!(
            "{:<6} {:<18} status: {:<11} stage: {:<17} {}",
            short_id(&client.id),
            client.name,
            client.status,
            stage.label(),
            client.representative
        );
    }
    println!("\nTotal: {} clients visible to {} ({})", visible.len(), actor.name, actor.role);

    Ok(())
}

/// Handle workflow commands.
fn cmd_workflow(config: &Config, operation: WorkflowOperation) -> Result<()> {
    let mut store = open_store(config);

    match operation {
        WorkflowOperation::Show { client_id, format } => {
            let entry = store.workflow(&client_id)?.clone();
            match format {
                Format::Json => print_json(&entry)?,
                Format::Text => print_workflow(&store, &entry),
            }
        }
        WorkflowOperation::Toggle { client_id, stage, task, expected_version } => {
            let entry = store.toggle_workflow_task(&client_id, &stage, &task, expected_version)?;
            print_workflow(&store, &entry);
        }
        WorkflowOperation::Flag { client_id, stage, clear } => {
            let entry = store.flag_workflow_issue(&client_id, stage, !clear, None)?;
            print_workflow(&store, &entry);
        }
    }

    Ok(())
}

fn print_workflow(store: &Store, entry: &VersionedWorkflow) {
    let workflow = &entry.workflow;
    let name = store.client(&workflow.client_id).map_or("?", |c| c.name.as_str());

    println!(
        "{} - {} ({:.0}% overall, version {})",
        name,
        workflow.current().label,
        workflow.overall_completion(),
        entry.version
    );

    for (summary, stage) in workflow.stage_summaries().iter().zip(workflow.stages()) {
        let marker = if summary.current { ">" } else { " " };
        println!(
            "{} {:<17} {}/{} {:>4.0}%  {:?}",
            marker,
            summary.label,
            summary.completed,
            summary.total,
            summary.percentage,
            summary.state
        );
        for task in &stage.tasks {
            let check = if task.completed { "x" } else { " " };
            println!("      [{}] {:>2} {}", check, task.id, task.label);
        }
    }
}

/// List meetings visible to an actor.
fn cmd_meetings(
    config: &Config,
    actor: Option<&str>,
    role: Option<&str>,
    format: Format,
) -> Result<()> {
    let store = open_store(config);
    let actor = config.actor(actor, role);
    let meetings = store.visible_meetings(&config.view_filter(), &actor);

    match format {
        Format::Json => print_json(&meetings)?,
        Format::Text => {
            for meeting in &meetings {
                println!(
                    "{} {:>4}m  {:<36} {}",
                    meeting.start.format("%Y-%m-%d %H:%M"),
                    meeting.duration().num_minutes(),
                    meeting.title,
                    meeting.representative
                );
            }
            println!("\nTotal: {} meetings", meetings.len());
        }
    }

    Ok(())
}

/// Run one request through the service facade.
fn cmd_api(config: &Config, method: &str, path: &str, body: Option<&str>) -> Result<()> {
    let method: Method = method.parse()?;
    let mut request = ApiRequest::new(method, path)?;
    if let Some(body) = body {
        request = request.with_body_str(body)?;
    }

    let service = ApiService::new(open_store(config), config);
    let response = service.handle(&request);
    print_json(&response.body)?;

    if !response.is_success() {
        anyhow::bail!("{} {} failed with status {}", method, request.path, response.status);
    }
    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "pathways", &mut io::stdout());
}

/// Show configuration.
fn cmd_config(config: &Config, show_path: bool) -> Result<()> {
    if show_path {
        match Config::active_path() {
            Some(path) => println!("{}", path.display()),
            None => {
                if let Some(dir) = Config::config_dir() {
                    println!("{} (not created)", dir.join("config.toml").display());
                }
            }
        }
        return Ok(());
    }

    let toml = toml::to_string_pretty(config)?;
    println!("{toml}");

    Ok(())
}
