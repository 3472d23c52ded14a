use chrono::Utc;
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use venpay::application::engine::{PaymentEngine, RetryOutcome};
use venpay::config::EngineConfig;
use venpay::domain::ledger::{Account, Amount};
use venpay::domain::payment::PaymentStatus;
use venpay::domain::ports::StateStoreBox;
use venpay::domain::session::Session;
use venpay::domain::vendor::PaymentType;
use venpay::error::PaymentError;
use venpay::infrastructure::local::LocalStore;
use venpay::infrastructure::mirrored::MirroredStore;
use venpay::interfaces::csv::report_writer::ReportWriter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory of the durable local store
    #[arg(long, env = "VENPAY_DATA_DIR", default_value = ".venpay")]
    data_dir: PathBuf,

    /// Directory of the workbook mirror. May be absent; the local store is
    /// used on its own then.
    #[arg(long, env = "VENPAY_WORKBOOK")]
    workbook: Option<PathBuf>,

    /// JSON config file overriding the default policy knobs
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Record the logged-in-user marker
    Login { username: String },
    /// Clear the logged-in-user marker
    Logout,
    /// Manage the vendor list
    Vendor {
        #[command(subcommand)]
        command: VendorCommand,
    },
    /// Pay a vendor now (by id or 1-based index)
    Pay {
        vendor: String,
        /// Also skip the vendor's next scheduled payment
        #[arg(long)]
        skip_next: bool,
    },
    /// Run one scheduled-payment pass over the vendor list
    RunScheduled,
    /// Retry a pending payment by id
    Retry { payment: String },
    /// List pending payments
    Pending,
    /// List the full payment history
    History,
    /// Show the account balances
    Balances,
    /// Print the current report as CSV; optionally export it
    Report {
        /// Also write the report to this CSV file
        #[arg(long)]
        out: Option<PathBuf>,
        /// Include the vendor section
        #[arg(long)]
        include_vendors: bool,
    },
}

#[derive(Subcommand)]
enum VendorCommand {
    Add {
        name: String,
        #[arg(long, default_value = "weekly")]
        payment_type: PaymentType,
        #[arg(long, default_value = "account1")]
        account: Account,
        /// Per-vendor charge overriding the configured flat amount
        #[arg(long)]
        amount: Option<Amount>,
    },
    Edit {
        id: String,
        name: String,
        #[arg(long)]
        payment_type: PaymentType,
        #[arg(long)]
        account: Account,
        #[arg(long)]
        amount: Option<Amount>,
    },
    Delete { id: String },
    /// Set (or clear) the skip-next-scheduled-payment flag
    Skip {
        id: String,
        #[arg(long)]
        clear: bool,
    },
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let local = LocalStore::open(&cli.data_dir).into_diagnostic()?;

    match &cli.command {
        Command::Login { username } => {
            let session = Session::new(username);
            if session.username.is_empty() {
                return Err(PaymentError::ValidationError("username is required".to_string()))
                    .into_diagnostic();
            }
            local.save_session(&session).into_diagnostic()?;
            println!("Logged in as {}", session.username);
            return Ok(());
        }
        Command::Logout => {
            local.clear_session().into_diagnostic()?;
            println!("Logged out");
            return Ok(());
        }
        _ => {
            local
                .load_session()
                .into_diagnostic()?
                .ok_or(PaymentError::SessionRequired)
                .into_diagnostic()?;
        }
    }

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path).into_diagnostic()?,
        None => EngineConfig::default(),
    };
    let store = MirroredStore::new(local, cli.workbook.as_deref());
    let boxed: StateStoreBox = Box::new(store);
    let mut engine = PaymentEngine::load(config, boxed).await.into_diagnostic()?;

    match cli.command {
        Command::Login { .. } | Command::Logout => unreachable!("handled above"),
        Command::Vendor { command } => run_vendor(&mut engine, command).await?,
        Command::Pay { vendor, skip_next } => {
            let id = resolve_vendor(&engine, &vendor).into_diagnostic()?;
            let outcome = engine
                .pay_now(&id, skip_next, Utc::now())
                .await
                .into_diagnostic()?;
            if outcome.sufficient {
                println!(
                    "Paid ${} to {}",
                    outcome.payment.amount, outcome.payment.vendor_name
                );
            } else {
                println!(
                    "Insufficient funds for {}. Payment pending (id {}).",
                    outcome.payment.vendor_name, outcome.payment.id
                );
            }
        }
        Command::RunScheduled => {
            let summary = engine.run_scheduled(Utc::now()).await;
            println!("Scheduled payments run:\n{summary}");
        }
        Command::Retry { payment } => {
            let vendor_name = engine
                .payments()
                .iter()
                .find(|p| p.id == payment)
                .map(|p| p.vendor_name.clone());
            match (engine.retry_pending(&payment).await, vendor_name) {
                (RetryOutcome::Completed, Some(name)) => {
                    println!("Payment to {name} completed on retry.");
                }
                (RetryOutcome::StillPending, Some(name)) => {
                    println!("Still insufficient funds for {name}.");
                }
                _ => println!("Nothing to retry."),
            }
        }
        Command::Pending => {
            for p in engine
                .payments()
                .iter()
                .filter(|p| p.status == PaymentStatus::Pending)
            {
                println!("{}  {}  {}  ${}  {}", p.id, p.date.to_rfc3339(), p.vendor_name, p.amount, p.kind);
            }
        }
        Command::History => {
            for p in engine.payments() {
                println!(
                    "{}  {}  {}  ${}  {}  {}",
                    p.id,
                    p.date.to_rfc3339(),
                    p.vendor_name,
                    p.amount,
                    p.status,
                    p.kind
                );
            }
        }
        Command::Balances => {
            println!("Account 1: ${}", engine.ledger().account1);
            println!("Account 2: ${}", engine.ledger().account2);
        }
        Command::Report {
            out,
            include_vendors,
        } => {
            let report = engine.report(include_vendors, Utc::now());

            // The engine owns its boxed store, so build a second adapter for
            // the explicit export path.
            if let Some(workbook) = &cli.workbook {
                let export_store = MirroredStore::new(
                    LocalStore::open(&cli.data_dir).into_diagnostic()?,
                    Some(workbook.as_path()),
                );
                if let Err(e) = export_store.export_report(&report) {
                    eprintln!(
                        "warning: report export failed ({e}); the preview below is still current"
                    );
                }
            }
            if let Some(path) = out {
                let written = File::create(&path)
                    .map_err(PaymentError::from)
                    .and_then(|file| ReportWriter::new(file).write_report(&report));
                if let Err(e) = written {
                    eprintln!(
                        "warning: report export failed ({e}); the preview below is still current"
                    );
                }
            }

            let stdout = io::stdout();
            ReportWriter::new(stdout.lock())
                .write_report(&report)
                .into_diagnostic()?;
        }
    }

    Ok(())
}

async fn run_vendor(engine: &mut PaymentEngine, command: VendorCommand) -> Result<()> {
    match command {
        VendorCommand::Add {
            name,
            payment_type,
            account,
            amount,
        } => {
            let vendor = engine
                .add_vendor(&name, payment_type, account, amount, Utc::now())
                .await
                .into_diagnostic()?;
            println!("Added vendor {} (id {})", vendor.name, vendor.id);
        }
        VendorCommand::Edit {
            id,
            name,
            payment_type,
            account,
            amount,
        } => {
            if engine
                .edit_vendor(&id, &name, payment_type, account, amount)
                .await
            {
                println!("Vendor updated");
            }
        }
        VendorCommand::Delete { id } => {
            if engine.delete_vendor(&id).await {
                println!("Vendor deleted");
            }
        }
        VendorCommand::Skip { id, clear } => {
            if engine.set_skip_next(&id, !clear).await {
                println!(
                    "Skip-next {}",
                    if clear { "cleared" } else { "set" }
                );
            }
        }
        VendorCommand::List => {
            for v in engine.vendors().iter() {
                let skip = if v.skip_next { "  [skip next]" } else { "" };
                let amount = match v.amount {
                    Some(a) => format!("  (${a})"),
                    None => String::new(),
                };
                println!(
                    "{}. {} - {} - {} (id {}){}{}",
                    v.index, v.name, v.payment_type, v.assigned_account, v.id, amount, skip
                );
            }
        }
    }
    Ok(())
}

fn resolve_vendor(engine: &PaymentEngine, key: &str) -> std::result::Result<String, PaymentError> {
    if let Some(v) = engine.vendors().get(key) {
        return Ok(v.id.clone());
    }
    if let Ok(index) = key.parse::<usize>()
        && let Some(v) = engine.vendors().get_by_index(index)
    {
        return Ok(v.id.clone());
    }
    Err(PaymentError::NotFound(format!("vendor {key}")))
}
