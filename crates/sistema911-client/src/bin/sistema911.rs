//! Sistema 911 CLI Tool
//!
//! Inspect and maintain a registry account from the command line, using a
//! bearer token issued by the identity provider.
//!
//! Usage:
//!   sistema911 [--token <token>] profile
//!   sistema911 addresses | contacts | medical | insurance | bank-accounts
//!   sistema911 events [--open]
//!   sistema911 cancel-event <id>
//!   sistema911 user-by-rut <rut> | user-by-phone <phone>
//!   sistema911 check-email <email>
//!   sistema911 dashboard
//!
//! Backend location and schema come from `SISTEMA911_API_URL`,
//! `SISTEMA911_API_PREFIX` and `SISTEMA911_SCHEMA`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use sistema911_client::{
    load_dashboard, ApiClient, ApiConfig, IdentityProvider, ReqwestTransport, SessionUser, TokenSession,
};
use sistema911_model::{mask_account_number, SchemaVersion};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sistema911")]
#[command(author = "Sistema 911/1619")]
#[command(version = "0.1.0")]
#[command(about = "Query and maintain a Sistema 911/1619 registry account", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Identity token sent as bearer credential
    #[arg(long, env = "SISTEMA911_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Account uid the token belongs to
    #[arg(long, env = "SISTEMA911_UID", default_value = "cli")]
    uid: String,

    /// Use the legacy insurance/bank field names
    #[arg(long)]
    legacy_schema: bool,

    /// Output format: json or compact
    #[arg(short, long, default_value = "json")]
    format: String,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the signed-in user's profile
    Profile,

    /// Look a user up by RUT
    UserByRut { rut: String },

    /// Look a user up by phone number
    UserByPhone { phone: String },

    /// List addresses
    Addresses,

    /// List emergency contacts
    Contacts,

    /// Show medical information
    Medical,

    /// List health insurance records
    Insurance,

    /// List bank accounts (numbers masked)
    BankAccounts {
        /// Print full account numbers
        #[arg(long)]
        reveal: bool,
    },

    /// List emergency events
    Events {
        /// Only events that are neither resolved nor cancelled
        #[arg(long)]
        open: bool,
    },

    /// Cancel an open emergency event
    CancelEvent { id: String },

    /// Check whether an email can still be registered
    CheckEmail { email: String },

    /// Load the whole dashboard
    Dashboard,

    /// Sign out on the backend
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = ApiConfig::from_env().context("invalid backend configuration")?;
    if cli.legacy_schema {
        config = config.with_schema(SchemaVersion::Legacy);
    }

    let identity: Arc<dyn IdentityProvider> = match &cli.token {
        Some(token) => Arc::new(TokenSession::new(token.clone(), SessionUser::new(cli.uid.clone()))),
        None => Arc::new(TokenSession::signed_out()),
    };
    let api = ApiClient::new(config, Arc::new(ReqwestTransport::new()), identity);

    let result = run(&api, cli.command).await?;

    let output_str = match cli.format.as_str() {
        "json" => serde_json::to_string_pretty(&result)?,
        "compact" => serde_json::to_string(&result)?,
        other => bail!("unknown format '{}'", other),
    };

    if let Some(output_path) = cli.output {
        fs::write(&output_path, &output_str)?;
        eprintln!("Output written to: {}", output_path.display());
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

async fn run(api: &ApiClient, command: Commands) -> Result<Value> {
    let value = match command {
        Commands::Profile => serde_json::to_value(api.get_profile().await?)?,
        Commands::UserByRut { rut } => serde_json::to_value(api.get_user_by_rut(&rut).await?)?,
        Commands::UserByPhone { phone } => serde_json::to_value(api.get_user_by_phone(&phone).await?)?,
        Commands::Addresses => serde_json::to_value(api.get_addresses().await?)?,
        Commands::Contacts => serde_json::to_value(api.get_emergency_contacts().await?)?,
        Commands::Medical => match api.get_medical_info().await? {
            Some(info) => serde_json::to_value(info)?,
            None => json!({ "medical_info": null }),
        },
        Commands::Insurance => serde_json::to_value(api.get_health_insurances().await?)?,
        Commands::BankAccounts { reveal } => {
            let mut accounts = api.get_bank_accounts().await?;
            if !reveal {
                for account in &mut accounts {
                    account.account_number = mask_account_number(&account.account_number);
                }
            }
            serde_json::to_value(accounts)?
        }
        Commands::Events { open } => {
            let events = api.get_emergency_events().await?;
            let events: Vec<_> = events.into_iter().filter(|e| !open || e.is_open()).collect();
            serde_json::to_value(events)?
        }
        Commands::CancelEvent { id } => {
            let event = api.get_emergency_event(&id).await?;
            serde_json::to_value(api.cancel_emergency_event(&event).await?)?
        }
        Commands::CheckEmail { email } => serde_json::to_value(api.check_email(&email).await?)?,
        Commands::Dashboard => {
            let snapshot = load_dashboard(api).await;
            let mut value = serde_json::to_value(&snapshot)?;
            value["has_completed_onboarding"] = json!(snapshot.has_completed_onboarding());
            value["bank_accounts"] = json!(snapshot
                .masked_accounts()
                .into_iter()
                .map(|(bank, number)| json!({ "bank_name": bank, "account_number": number }))
                .collect::<Vec<_>>());
            value
        }
        Commands::Logout => {
            api.logout().await?;
            json!({ "status": "signed_out" })
        }
    };
    Ok(value)
}
