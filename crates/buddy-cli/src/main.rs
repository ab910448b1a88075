//! Buddy CLI - manage Buddy workspace variables and members

use clap::{ArgAction, Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use buddy_core::ProviderConfig;
use buddy_provider::Provider;

mod commands;
mod display;
mod error;
mod exit_codes;

use commands::Context;
use commands::variable::VariableArgs;

#[derive(Parser)]
#[command(name = "buddy")]
#[command(version)]
#[command(about = "Manage Buddy workspace variables, members and project access", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Workspace API URL, e.g. https://api.buddy.works/workspaces/acme
    #[arg(long, global = true, env = "BUDDY_URL")]
    url: Option<String>,

    /// Personal access token
    #[arg(long, global = true, env = "BUDDY_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Skip TLS certificate verification
    #[arg(long, global = true)]
    insecure: bool,

    /// Config file (default: <config dir>/buddy/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Workspace and project variables
    Variable {
        #[command(subcommand)]
        command: VariableCommands,
    },

    /// Workspace members
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },

    /// Project access for workspace members
    ProjectMember {
        #[command(subcommand)]
        command: ProjectMemberCommands,
    },
}

#[derive(Subcommand)]
enum VariableCommands {
    /// Create a variable
    Create {
        #[command(flatten)]
        args: VariableArgs,

        /// Create the variable in this project instead of the workspace
        #[arg(long)]
        project: Option<String>,
    },

    /// Show a variable
    Get {
        id: String,

        #[arg(long)]
        project: Option<String>,
    },

    /// Update a variable (the key cannot change)
    Update {
        id: String,

        #[command(flatten)]
        args: VariableArgs,

        #[arg(long)]
        project: Option<String>,
    },

    /// Delete a variable
    Delete {
        id: String,

        #[arg(long)]
        project: Option<String>,
    },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// Invite a user by email
    Invite {
        email: String,

        /// Make the new member a workspace administrator
        #[arg(long)]
        admin: bool,
    },

    /// Show a member
    Get { id: String },

    /// Grant or revoke administrator rights
    SetAdmin {
        id: String,

        #[arg(action = ArgAction::Set)]
        admin: bool,
    },

    /// Remove a member from the workspace
    Remove { id: String },

    /// Find a member by exact email
    Lookup { email: String },

    /// List members sorted by name
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 50)]
        per_page: u32,
    },
}

#[derive(Subcommand)]
enum ProjectMemberCommands {
    /// Add a member to a project with a permission set
    Add {
        project: String,
        member_id: u64,

        #[arg(long)]
        permission_set: u64,
    },

    /// Show a project member
    Get { project: String, member_id: u64 },

    /// Change a project member's permission set
    Update {
        project: String,
        member_id: u64,

        #[arg(long)]
        permission_set: u64,
    },

    /// Remove a member from a project
    Remove { project: String, member_id: u64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }

    Ok(())
}

/// Log to stderr so stdout stays machine-readable
fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file, then environment, then flags
fn load_config(cli: &Cli) -> error::Result<ProviderConfig> {
    let config = match &cli.config {
        Some(path) => ProviderConfig::load_from(path)?,
        None => ProviderConfig::load()?,
    };
    let mut config = config.with_env_overrides()?;

    if let Some(url) = cli.url.as_deref().filter(|u| !u.is_empty()) {
        config.buddy_url = url.to_string();
    }
    if let Some(token) = cli.token.as_deref().filter(|t| !t.is_empty()) {
        config.token = token.to_string();
    }
    if cli.insecure {
        config.verify_ssl = false;
    }

    Ok(config)
}

async fn run(cli: Cli) -> error::Result<()> {
    let config = load_config(&cli)?;
    tracing::debug!(url = %config.buddy_url, verify_ssl = config.verify_ssl, "using workspace");

    let ctx = Context {
        provider: Provider::configure(config)?,
        json: cli.json,
    };

    match cli.command {
        Commands::Variable { command } => match command {
            VariableCommands::Create { args, project } => {
                commands::variable::create(&ctx, &args, project.as_deref()).await
            }
            VariableCommands::Get { id, project } => {
                commands::variable::get(&ctx, &id, project.as_deref()).await
            }
            VariableCommands::Update { id, args, project } => {
                commands::variable::update(&ctx, &id, &args, project.as_deref()).await
            }
            VariableCommands::Delete { id, project } => {
                commands::variable::delete(&ctx, &id, project.as_deref()).await
            }
        },

        Commands::Member { command } => match command {
            MemberCommands::Invite { email, admin } => {
                commands::member::invite(&ctx, &email, admin).await
            }
            MemberCommands::Get { id } => commands::member::get(&ctx, &id).await,
            MemberCommands::SetAdmin { id, admin } => {
                commands::member::set_admin(&ctx, &id, admin).await
            }
            MemberCommands::Remove { id } => commands::member::remove(&ctx, &id).await,
            MemberCommands::Lookup { email } => commands::member::lookup(&ctx, &email).await,
            MemberCommands::List { page, per_page } => {
                commands::member::list(&ctx, page, per_page).await
            }
        },

        Commands::ProjectMember { command } => match command {
            ProjectMemberCommands::Add {
                project,
                member_id,
                permission_set,
            } => commands::project_member::add(&ctx, &project, member_id, permission_set).await,
            ProjectMemberCommands::Get { project, member_id } => {
                commands::project_member::get(&ctx, &project, member_id).await
            }
            ProjectMemberCommands::Update {
                project,
                member_id,
                permission_set,
            } => {
                commands::project_member::update(&ctx, &project, member_id, permission_set).await
            }
            ProjectMemberCommands::Remove { project, member_id } => {
                commands::project_member::remove(&ctx, &project, member_id).await
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let cli = Cli::parse_from([
            "buddy",
            "--url",
            "https://buddy.example.com/workspaces/acme",
            "--token",
            "flag-token",
            "--insecure",
            "--config",
            "/nonexistent/buddy/config.yaml",
            "member",
            "list",
        ]);
        let err = load_config(&cli).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_parses_set_admin() {
        let cli = Cli::parse_from(["buddy", "member", "set-admin", "12", "false"]);
        match cli.command {
            Commands::Member {
                command: MemberCommands::SetAdmin { id, admin },
            } => {
                assert_eq!(id, "12");
                assert!(!admin);
            }
            _ => panic!("expected member set-admin"),
        }
    }

    #[test]
    fn test_parses_variable_type() {
        let cli = Cli::parse_from([
            "buddy", "variable", "create", "--key", "K", "--value", "v", "--type", "ssh_key",
            "--project", "web",
        ]);
        match cli.command {
            Commands::Variable {
                command: VariableCommands::Create { args, project },
            } => {
                assert_eq!(args.var_type, buddy_core::VariableType::SshKey);
                assert_eq!(project.as_deref(), Some("web"));
                assert!(!args.encrypted);
            }
            _ => panic!("expected variable create"),
        }
    }
}
