//! Dashboard command-line client: signs in, reads lists and assigns products
//! through the same data layer the dashboard views use.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use dashboard::DashboardSettings;
use dashboard::domain::{
    AssignedUser, AssignmentDraft, Dashboard, EntityId, LoginCredentials, SelectionState, Session,
};
use dashboard::outbound::{FileSessionStore, HttpApiClient};

/// `dashboard` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "dashboard",
    about = "Administer users, regions and demo product assignments",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Sign in and store the session.
    Login {
        /// Employee SESA id.
        #[arg(long = "ses-id", value_name = "id")]
        ses_id: String,
        /// Account password.
        #[arg(long, value_name = "password")]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// List regions.
    Regions,
    /// List the countries of one region.
    Countries {
        /// Region id.
        #[arg(long, value_name = "id")]
        region: String,
    },
    /// Find users matching all four filters.
    FilterUsers {
        /// Region id.
        #[arg(long, value_name = "id")]
        region: String,
        /// Country id.
        #[arg(long, value_name = "id")]
        country: String,
        /// Department name.
        #[arg(long)]
        department: String,
        /// Designation name.
        #[arg(long)]
        designation: String,
    },
    /// Assign one product to several users.
    Assign {
        /// Demo product id.
        #[arg(long, value_name = "id")]
        product: String,
        /// User id; repeat for each user.
        #[arg(long = "user", value_name = "id", required = true)]
        users: Vec<String>,
    },
    /// List product-to-user mappings.
    Mappings,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = DashboardSettings::load_from_iter([OsString::from("dashboard")])
        .wrap_err("failed to load dashboard settings")?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run(args.command, settings))
}

async fn run(command: Command, settings: DashboardSettings) -> Result<()> {
    let base = settings
        .api_base_url()
        .wrap_err("invalid DASHBOARD_API_BASE_URL")?;
    let client = HttpApiClient::new(base, settings.request_timeout())
        .wrap_err("failed to build HTTP client")?;
    let store = FileSessionStore::new(settings.token_path());
    let dashboard = Dashboard::new(Arc::new(client)).with_session_store(Arc::new(store));

    match command {
        Command::Login { ses_id, password } => {
            let credentials = LoginCredentials::try_from_parts(&ses_id, &password)?;
            let session = dashboard.login(&credentials).await?;
            println!(
                "signed in as {} ({})",
                session.user().name,
                session.role().display_title()
            );
            if session.awaiting_approval() {
                println!("account is awaiting approval");
            }
        }
        Command::Logout => {
            if let Some(session) = dashboard.restore_session()? {
                dashboard.logout(session)?;
            }
            println!("signed out");
        }
        Command::Regions => {
            let session = signed_in(&dashboard)?;
            print_rows(&dashboard.regions(&session).await?)?;
        }
        Command::Countries { region } => {
            let session = signed_in(&dashboard)?;
            let region = parse_id(&region)?;
            print_rows(&dashboard.countries(&session, &region).await?)?;
        }
        Command::FilterUsers {
            region,
            country,
            department,
            designation,
        } => {
            let session = signed_in(&dashboard)?;
            let mut selection = SelectionState::default();
            selection.select_region(Some(parse_id(&region)?));
            selection.select_country(Some(parse_id(&country)?));
            selection.set_department(department);
            selection.set_designation(designation);
            print_rows(&dashboard.filter_users(&session, &mut selection).await?)?;
        }
        Command::Assign { product, users } => {
            let session = signed_in(&dashboard)?;
            let mut draft = AssignmentDraft::default();
            draft.select_product(Some(parse_id(&product)?));
            for user in users {
                let id = parse_id(&user)?;
                draft.add(AssignedUser { name: user, id })?;
            }
            let report = dashboard.assign_product(&session, &draft).await?;
            println!(
                "assigned {} to {} users",
                report.product(),
                report.assigned().len()
            );
        }
        Command::Mappings => {
            let session = signed_in(&dashboard)?;
            print_rows(&dashboard.mappings(&session).await?)?;
        }
    }
    Ok(())
}

fn signed_in(dashboard: &Dashboard<HttpApiClient>) -> Result<Session> {
    dashboard
        .restore_session()?
        .ok_or_else(|| eyre!("not signed in; run `dashboard login` first"))
}

fn parse_id(raw: &str) -> Result<EntityId> {
    EntityId::new(raw.trim()).wrap_err_with(|| format!("invalid id {raw:?}"))
}

fn print_rows<T: Serialize>(rows: &[T]) -> Result<()> {
    for row in rows {
        println!("{}", serde_json::to_string(row)?);
    }
    Ok(())
}
