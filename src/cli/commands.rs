use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use log::debug;
use crate::cli::abbrev;
use crate::cli::error::{user_error, validate_non_empty, validate_status};
use crate::cli::output::{
    format_next_options, format_session, format_stage_catalogue, format_status_update_request,
    format_timeline, get_terminal_width, is_tty,
};
use crate::models::{LeadStatus, LeadTimeline, Session, SessionUser};
use crate::pipeline::{build_status_update, default_stages, next_status_options, resolve_timeline, canonical_index};
use crate::session::{Config, SessionStore};
use crate::utils::parse_duration;
use anyhow::{Context, Result};

#[derive(Parser)]
#[command(name = "leadline")]
#[command(about = "Lead pipeline timeline - stage progress and status transitions for sales leads")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the stage timeline of a lead
    Timeline {
        /// Lead timeline JSON file
        file: PathBuf,
        /// Override the lead's current status
        #[arg(long)]
        status: Option<String>,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// List the default pipeline stages
    Stages {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// List the statuses a lead may move to next
    Next {
        /// Current status
        status: String,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Validate a status change and print the request for the backend
    Update {
        /// Lead timeline JSON file
        file: PathBuf,
        /// New status
        status: String,
        /// Remark recorded with the status change
        #[arg(long, default_value = "")]
        remark: String,
        /// Output the request as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start a session with a bearer token
    Login {
        /// Bearer token issued by the backend
        #[arg(long)]
        token: String,
        /// User display name
        #[arg(long)]
        user: String,
        /// User id
        #[arg(long = "user-id")]
        user_id: Option<String>,
        /// User email
        #[arg(long)]
        email: Option<String>,
        /// Role (e.g. admin, agent)
        #[arg(long, default_value = "agent")]
        role: String,
        /// Session lifetime (e.g. 8h, 1d); no expiry if omitted
        #[arg(long)]
        ttl: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the current session
    Whoami {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let args = match abbrev::expand_command_abbreviations(args) {
        Ok(expanded) => expanded,
        Err(e) => user_error(&e),
    };

    let cli = match Cli::try_parse_from(std::iter::once("leadline".to_string()).chain(args)) {
        Ok(cli) => cli,
        Err(e) => {
            use clap::error::ErrorKind;
            match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    e.print()?;
                    return Ok(());
                }
                _ => {
                    let rendered = e.render().to_string();
                    let message = rendered.trim_start_matches("error: ").trim_end();
                    user_error(message);
                }
            }
        }
    };

    handle_command(cli)
}

fn handle_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Timeline { file, status, json } => handle_timeline(&file, status, json),
        Commands::Stages { json } => handle_stages(json),
        Commands::Next { status, json } => handle_next(&status, json),
        Commands::Update { file, status, remark, json } => handle_update(&file, &status, &remark, json),
        Commands::Login { token, user, user_id, email, role, ttl } => {
            handle_login(token, user, user_id, email, role, ttl)
        }
        Commands::Logout => handle_logout(),
        Commands::Whoami { json } => handle_whoami(json),
    }
}

/// Read and parse a lead timeline file
fn load_timeline(path: &Path) -> Result<LeadTimeline> {
    if !path.exists() {
        user_error(&format!("Timeline file not found: {}", path.display()));
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read timeline file: {}", path.display()))?;
    match LeadTimeline::from_json(&content) {
        Ok(timeline) => Ok(timeline),
        Err(e) => user_error(&format!("Invalid timeline file {}: {}", path.display(), e)),
    }
}

fn session_store() -> Result<(Config, SessionStore)> {
    let config = Config::load()?;
    let store = SessionStore::new(config.session_path.clone());
    Ok((config, store))
}

fn handle_timeline(file: &Path, status_override: Option<String>, json: bool) -> Result<()> {
    let mut timeline = load_timeline(file)?;
    if let Some(status) = status_override {
        timeline.current_status = status;
    }
    debug!("resolving timeline for status '{}' over {} stages", timeline.current_status, timeline.stages.len());

    let view = resolve_timeline(&timeline.stages, &timeline.current_status, &timeline.status_history);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let lead_label = match (&timeline.lead_id, &timeline.lead_name) {
        (Some(id), Some(name)) => Some(format!("Lead {} -- {}", id, name)),
        (Some(id), None) => Some(format!("Lead {}", id)),
        (None, Some(name)) => Some(name.clone()),
        (None, None) => None,
    };
    print!(
        "{}",
        format_timeline(&view, lead_label.as_deref(), &timeline.current_status, is_tty(), get_terminal_width())
    );
    Ok(())
}

fn handle_stages(json: bool) -> Result<()> {
    let stages = default_stages();
    if json {
        let rows: Vec<_> = stages.iter().map(|stage| {
            let position = LeadStatus::parse(&stage.name).and_then(canonical_index);
            serde_json::json!({
                "name": stage.name,
                "description": stage.description,
                "estimatedDuration": stage.estimated_duration,
                "position": position,
            })
        }).collect();
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", format_stage_catalogue(&stages));
    }
    Ok(())
}

fn handle_next(status: &str, json: bool) -> Result<()> {
    let current = match validate_status(status) {
        Ok(current) => current,
        Err(e) => user_error(&e),
    };
    let options = next_status_options(status);

    if json {
        let value = serde_json::json!({
            "status": current,
            "nextStatusOptions": options,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", format_next_options(current, &options));
    }
    Ok(())
}

fn handle_update(file: &Path, status: &str, remark: &str, json: bool) -> Result<()> {
    let (config, store) = session_store()?;
    let session = match store.load().context("Failed to load session")? {
        Some(session) => session,
        None => user_error("Not logged in. Run 'leadline login' first."),
    };

    let timeline = load_timeline(file)?;
    let update = match build_status_update(&timeline, status, remark) {
        Ok(update) => update,
        Err(e) => user_error(&e.to_string()),
    };
    let url = config.status_update_url(&update.lead_id);
    let authorization = session.authorization_header();

    if json {
        let value = serde_json::json!({
            "method": "PUT",
            "url": url,
            "headers": {
                "Authorization": authorization,
                "Content-Type": "application/json",
            },
            "body": update,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", format_status_update_request(&url, &authorization, &update)?);
    }
    Ok(())
}

fn handle_login(
    token: String,
    user: String,
    user_id: Option<String>,
    email: Option<String>,
    role: String,
    ttl: Option<String>,
) -> Result<()> {
    if let Err(e) = validate_non_empty(&token, "Token") {
        user_error(&e);
    }
    if let Err(e) = validate_non_empty(&user, "User name") {
        user_error(&e);
    }
    let ttl_secs = match ttl.as_deref().map(parse_duration).transpose() {
        Ok(secs) => secs,
        Err(e) => user_error(&e.to_string()),
    };

    let (_, store) = session_store()?;
    let session = Session::new(
        token.trim().to_string(),
        SessionUser { id: user_id, name: user.trim().to_string(), email },
        role,
        ttl_secs,
    );
    store.save(&session).context("Failed to save session")?;

    println!("Logged in as {} ({}).", session.user.name, session.role);
    Ok(())
}

fn handle_logout() -> Result<()> {
    let (_, store) = session_store()?;
    if store.clear().context("Failed to clear session")? {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

fn handle_whoami(json: bool) -> Result<()> {
    let (_, store) = session_store()?;
    let session = match store.load().context("Failed to load session")? {
        Some(session) => session,
        None => user_error("Not logged in."),
    };

    if json {
        // Never echo the token itself
        let value = serde_json::json!({
            "id": session.id,
            "user": session.user,
            "role": session.role,
            "startedAt": session.started_at,
            "expiresAt": session.expires_at,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!("{}", format_session(&session));
    }
    Ok(())
}
