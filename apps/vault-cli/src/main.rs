//! UserVault CLI binary.
//!
//! A thin terminal front-end over the record store and view crates. It plays
//! the roles the core leaves to the UI layer: gathering form fields,
//! rendering the projected list, and gating deletes behind an explicit
//! confirmation.

mod config;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use entities::{Role, UserDraft};
use record_store::{FileBackend, RecordStore, RecordStoreError};
use uuid::Uuid;
use view::{Session, SortKey, SubmitOutcome, ViewState};

use crate::config::Config;

#[derive(Parser)]
#[command(name = "uservault", about = "Manage the local user records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a user record.
    Add {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        /// One of: admin, editor, viewer.
        #[arg(long)]
        role: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: String,
        /// Repeat of --password; defaults to the same value.
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Edit an existing record. Omitting --password keeps the current one.
    Edit {
        id: Uuid,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        /// One of: admin, editor, viewer.
        #[arg(long)]
        role: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Repeat of --password; defaults to the same value.
        #[arg(long)]
        confirm_password: Option<String>,
    },
    /// Delete a record, after confirmation.
    Rm {
        id: Uuid,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// List records, filtered and sorted.
    List {
        /// Substring filter over name, email, role, and phone.
        #[arg(long, default_value = "")]
        query: String,
        /// One of: newest, oldest, name_asc, name_desc.
        #[arg(long, default_value = "newest")]
        sort: String,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env();
    init_tracing(&config.log_level);

    let cli = Cli::parse();

    let backend = FileBackend::open(&config.data_dir).with_context(|| {
        format!("opening data directory {}", config.data_dir.display())
    })?;
    tracing::debug!(data_dir = %config.data_dir.display(), "store opened");
    let mut session = Session::new(RecordStore::open(backend));

    let code = match cli.command {
        Command::Add {
            full_name,
            email,
            role,
            phone,
            password,
            confirm_password,
        } => {
            let draft = build_draft(full_name, email, &role, phone, password, confirm_password)?;
            submit(&mut session, &draft)
        }
        Command::Edit {
            id,
            full_name,
            email,
            role,
            phone,
            password,
            confirm_password,
        } => {
            let draft = build_draft(
                full_name,
                email,
                &role,
                phone,
                password.unwrap_or_default(),
                confirm_password,
            )?;
            match session.begin_edit(id) {
                Ok(_) => submit(&mut session, &draft),
                Err(RecordStoreError::NotFound { id }) => {
                    eprintln!("No user with id {id}.");
                    ExitCode::FAILURE
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Rm { id, yes } => remove(&mut session, id, yes)?,
        Command::List { query, sort } => {
            let Some(sort) = SortKey::parse(&sort) else {
                bail!("unknown sort '{sort}' (expected newest, oldest, name_asc, or name_desc)");
            };
            session.set_query(query);
            session.set_sort(sort);
            render(&session.view());
            ExitCode::SUCCESS
        }
    };

    Ok(code)
}

/// Assembles the form draft a submit carries.
fn build_draft(
    full_name: String,
    email: String,
    role: &str,
    phone: Option<String>,
    password: String,
    confirm_password: Option<String>,
) -> anyhow::Result<UserDraft> {
    let Some(role) = Role::parse(role) else {
        bail!("unknown role '{role}' (expected admin, editor, or viewer)");
    };

    let confirmation = match confirm_password {
        Some(confirmation) => confirmation,
        None => password.clone(),
    };

    let mut draft = UserDraft::new(full_name, email, role);
    draft.phone = phone.unwrap_or_default();
    draft.secret = password;
    draft.secret_confirmation = confirmation;
    Ok(draft)
}

/// Submits the draft and renders the outcome or the inline field errors.
fn submit<B: record_store::StorageBackend>(
    session: &mut Session<B>,
    draft: &UserDraft,
) -> ExitCode {
    match session.submit(draft) {
        Ok(SubmitOutcome::Created(record)) => {
            println!("You successfully registered.");
            println!("  id: {}", record.id);
            ExitCode::SUCCESS
        }
        Ok(SubmitOutcome::Updated(record)) => {
            println!("Record updated successfully.");
            println!("  id: {}", record.id);
            ExitCode::SUCCESS
        }
        Err(RecordStoreError::Validation(failed)) => {
            for (field, violation) in failed.iter() {
                eprintln!("{field}: {}", violation.message(field));
            }
            ExitCode::FAILURE
        }
        Err(RecordStoreError::DuplicateEmail { .. }) => {
            eprintln!("email: This email is already registered.");
            ExitCode::FAILURE
        }
        Err(RecordStoreError::NotFound { id }) => {
            eprintln!("No user with id {id}.");
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the delete flow: prompt, confirmation signal, removal.
fn remove<B: record_store::StorageBackend>(
    session: &mut Session<B>,
    id: Uuid,
    yes: bool,
) -> anyhow::Result<ExitCode> {
    let Some(record) = session.request_delete(id) else {
        eprintln!("No user with id {id}.");
        return Ok(ExitCode::FAILURE);
    };

    if !yes {
        print!("Delete user \"{}\"? [y/N] ", record.full_name);
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            session.cancel_delete();
            println!("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    if session.confirm_delete()? {
        println!("Record deleted successfully.");
    } else {
        println!("Nothing to delete.");
    }
    Ok(ExitCode::SUCCESS)
}

/// Renders the projected list with its aggregate counts.
fn render(view: &ViewState) {
    if view.total == 0 {
        println!("No users yet.");
        return;
    }

    let plural = if view.total == 1 { "user" } else { "users" };
    println!("{} {plural}, {} matching", view.total, view.matching);

    if view.entries.is_empty() {
        println!("No matches. Try a different search.");
        return;
    }

    for entry in &view.entries {
        let record = &entry.record;
        let mut line = format!(
            "{}  {} <{}>  {}",
            record.id, record.full_name, record.email, record.role
        );
        if let Some(phone) = &record.phone {
            line.push_str(&format!("  {phone}"));
        }
        line.push_str(&format!(
            "  created {}",
            record.created_at.format("%Y-%m-%d %H:%M")
        ));
        if let Some(updated_at) = record.updated_at {
            line.push_str(&format!("  updated {}", updated_at.format("%Y-%m-%d %H:%M")));
        }
        if entry.just_updated {
            line.push_str("  *");
        }
        println!("{line}");
    }
}

/// Initializes tracing with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
