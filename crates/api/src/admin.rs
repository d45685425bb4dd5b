//! Maintenance commands behind the `gridops-admin` binary.
//!
//! ```text
//! gridops-admin migrate
//! gridops-admin sync-usernames --field staff_id --dry-run
//! gridops-admin sync-usernames --field email --force --limit 50
//! gridops-admin create-user --username ama --email ama@grid.example --admin
//! ```
//!
//! Only `migrate` touches the schema. Every other command expects it to be
//! current already (the server applies migrations at startup too).

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use gridops_core::account::validate_email;
use gridops_core::username_sync::{plan_username_sync, SyncField, SyncPlan};
use gridops_db::models::user::CreateUser;
use gridops_db::repositories::{SyncOutcome, UserRepo};
use gridops_db::DbPool;

use crate::auth::password::hash_password;

#[derive(Debug, Parser)]
#[command(name = "gridops-admin", about = "GridOps maintenance commands")]
pub struct Cli {
    /// PostgreSQL connection string.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Copy a user field into the username.
    ///
    /// Requires --dry-run or --force. Usernames already taken are reported
    /// and skipped.
    SyncUsernames {
        /// Source field: `staff_id` or `email`.
        #[arg(long, default_value = "staff_id")]
        field: SyncField,
        /// Print the planned renames without writing anything.
        #[arg(long)]
        dry_run: bool,
        /// Apply the planned renames in one transaction.
        #[arg(long)]
        force: bool,
        /// Examine at most this many users (0 = all).
        #[arg(long, default_value_t = 0)]
        limit: usize,
    },
    /// Create a login account.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long)]
        staff_id: Option<String>,
        /// Grant the admin role.
        #[arg(long)]
        admin: bool,
        /// Initial password. Without one the user sets it themselves.
        #[arg(long, env = "GRIDOPS_NEW_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
}

pub async fn execute(pool: &DbPool, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Migrate => {
            gridops_db::run_migrations(pool)
                .await
                .context("applying migrations")?;
            println!("Migrations applied.");
            Ok(())
        }
        Command::SyncUsernames {
            field,
            dry_run,
            force,
            limit,
        } => sync_usernames(pool, field, dry_run, force, limit)
            .await
            .map(|_| ()),
        Command::CreateUser {
            username,
            email,
            staff_id,
            admin,
            password,
        } => create_user(pool, username, email, staff_id, admin, password).await,
    }
}

/// Plan a username sync and, with `force` and without `dry_run`, apply it.
///
/// Returns the applied outcome, or `None` for a dry run. A dry run only
/// reads.
pub async fn sync_usernames(
    pool: &DbPool,
    field: SyncField,
    dry_run: bool,
    force: bool,
    limit: usize,
) -> anyhow::Result<Option<SyncOutcome>> {
    if !dry_run && !force {
        bail!("refusing to run without --dry-run or --force");
    }

    let candidates = UserRepo::list_sync_candidates(pool, field)
        .await
        .context("listing candidates")?;
    let existing = UserRepo::all_usernames(pool)
        .await
        .context("loading usernames")?;
    let plan = plan_username_sync(&candidates, &existing, limit);

    print_plan(&plan, field);

    if dry_run {
        println!("Dry run: no changes written.");
        return Ok(None);
    }

    let outcome = UserRepo::apply_username_sync(pool, &plan.updates, field)
        .await
        .context("applying username sync")?;
    for rename in &outcome.skipped {
        println!(
            "  skipped user {} ('{}' was taken before the write)",
            rename.user_id, rename.to
        );
    }
    tracing::info!(
        applied = outcome.applied.len(),
        skipped = outcome.skipped.len(),
        %field,
        "Username sync complete",
    );
    println!(
        "Applied {} rename(s), skipped {}.",
        outcome.applied.len(),
        outcome.skipped.len()
    );
    Ok(Some(outcome))
}

fn print_plan(plan: &SyncPlan, field: SyncField) {
    println!(
        "Source field: {field}. Candidates: {} (processing {}).",
        plan.total_candidates, plan.processed
    );
    for rename in &plan.updates {
        println!("  user {}: '{}' -> '{}'", rename.user_id, rename.from, rename.to);
    }
    for collision in &plan.collisions {
        println!(
            "  collision, user {}: '{}' is already in use",
            collision.user_id, collision.to
        );
    }
    println!(
        "{} planned update(s), {} collision(s).",
        plan.updates.len(),
        plan.collisions.len()
    );
}

async fn create_user(
    pool: &DbPool,
    username: String,
    email: String,
    staff_id: Option<String>,
    admin: bool,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = username.trim().to_string();
    if username.is_empty() {
        bail!("--username must not be empty");
    }
    let email = email.trim().to_string();
    if !email.is_empty() {
        validate_email(&email)?;
    }
    let password_hash = password
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(hash_password)
        .transpose()
        .map_err(|e| anyhow::anyhow!("hashing password: {e}"))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username,
            email,
            staff_id: staff_id.filter(|s| !s.trim().is_empty()),
            password_hash,
            is_staff: admin,
        },
    )
    .await
    .context("creating user")?;

    println!(
        "Created user {} (id {}, role {}){}",
        user.username,
        user.id,
        user.role(),
        if user.has_usable_password() {
            ""
        } else {
            "; no password set"
        }
    );
    Ok(())
}
