use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use notify_core::constants::DEFAULT_DATA_DIR;
use notify_core::{classify, title_for, IngestOutcome, NavigationTarget, ReconciliationEngine};
use notify_store::{FileNotificationStore, StoreScope};
use notify_types::{NonEmptyText, NotificationId, RawEvent};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

#[derive(Parser)]
#[command(name = "notify")]
#[command(about = "Admin notification store CLI")]
struct Cli {
    /// Data directory (defaults to NOTIFY_DATA_DIR, then notification_data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Admin identifier whose list to use
    #[arg(long, global = true, conflicts_with = "deployment")]
    admin: Option<String>,
    /// Use the shared deployment-wide list
    #[arg(long, global = true)]
    deployment: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List notifications, newest first
    List,
    /// Print the unread count
    Unread,
    /// Mark one notification read
    MarkRead {
        /// Notification id
        id: String,
    },
    /// Mark every notification read
    MarkAllRead,
    /// Remove every notification
    Clear,
    /// Merge a raw event given as JSON, e.g. '{"kind":"new_report_filed","message":"..."}'
    Ingest {
        json: String,
    },
    /// Show the category and title an event kind maps to
    Classify {
        kind: String,
    },
    /// Show where an event kind navigates
    Target {
        kind: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Classify { kind }) => {
            println!("{} ({})", title_for(kind), classify(kind));
            return Ok(());
        }
        Some(Commands::Target { kind }) => {
            match NavigationTarget::for_kind(kind) {
                Some(target) => println!("{}", target),
                None => println!("No navigation target for '{}'", kind),
            }
            return Ok(());
        }
        Some(_) => {}
        None => {
            println!("Use --help to see available commands");
            return Ok(());
        }
    }

    let mut engine = open_engine(&cli)?;

    match cli.command {
        Some(Commands::List) => {
            let notifications = engine.notifications();
            if notifications.is_empty() {
                println!("No notifications found.");
            }
            for n in notifications {
                println!(
                    "{} [{}]{} {}: {}",
                    n.id,
                    n.category,
                    if n.read { "" } else { " *" },
                    n.title,
                    n.message
                );
            }
        }
        Some(Commands::Unread) => println!("{}", engine.unread_count()),
        Some(Commands::MarkRead { id }) => {
            let id: NotificationId = id.parse().context("invalid notification id")?;
            if engine.mark_read(&id) {
                println!("Marked {} as read", id);
            } else {
                println!("Nothing to do for {}", id);
            }
        }
        Some(Commands::MarkAllRead) => {
            engine.mark_all_read();
            println!("All notifications marked as read");
        }
        Some(Commands::Clear) => {
            engine.clear();
            println!("Notifications cleared");
        }
        Some(Commands::Ingest { json }) => {
            let event = RawEvent::decode(&json)?;
            match engine.ingest(event) {
                IngestOutcome::Appended(id) => println!("Added notification {}", id),
                IngestOutcome::Duplicate => println!("Duplicate of an unread notification, skipped"),
                IngestOutcome::NoSession => bail!("no notification scope selected"),
            }
        }
        Some(Commands::Classify { .. }) | Some(Commands::Target { .. }) | None => {}
    }

    Ok(())
}

fn open_engine(cli: &Cli) -> anyhow::Result<ReconciliationEngine> {
    let scope = match (&cli.admin, cli.deployment) {
        (Some(admin), false) => StoreScope::for_identity(&NonEmptyText::new(admin)?),
        (None, true) => StoreScope::Deployment,
        _ => bail!("pass --admin <id> or --deployment to choose a notification list"),
    };

    let data_dir = cli.data_dir.clone().unwrap_or_else(|| {
        std::env::var("NOTIFY_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    });
    let store = FileNotificationStore::new(&data_dir)
        .with_context(|| format!("cannot open data directory {}", data_dir.display()))?;

    let (alerts, _) = broadcast::channel(1);
    let mut engine = ReconciliationEngine::new(Arc::new(store), alerts);
    engine.begin_session(scope);
    Ok(engine)
}
