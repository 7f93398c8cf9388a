//! `repairdesk`: manage repair-shop service orders from the terminal.

mod display;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use repairdesk::store::{FileBackend, SlotBackend, SqliteBackend, DEFAULT_SLOT};
use repairdesk::{
    DeleteResult, Order, OrderBook, OrderBookConfig, OrderDraft, OrderId, Part, Region, Status,
    StatusFilter, UpdateResult,
};

/// SQLite database file name inside the data directory.
const SQLITE_FILE: &str = "repairdesk.db";

#[derive(Parser)]
#[command(name = "repairdesk")]
#[command(about = "Track repair-shop service orders", version)]
struct Cli {
    /// Directory holding the order data.
    #[arg(long, global = true, env = "REPAIRDESK_DATA_DIR", default_value = "./repairdesk-data")]
    data_dir: PathBuf,

    /// Storage backend.
    #[arg(long, global = true, env = "REPAIRDESK_BACKEND", value_enum, default_value_t = BackendKind::Json)]
    backend: BackendKind,

    /// Slot key the collection is stored under.
    #[arg(long, global = true, default_value = DEFAULT_SLOT)]
    slot: String,

    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// One JSON file per slot.
    Json,
    /// A single SQLite database.
    Sqlite,
}

#[derive(Subcommand)]
enum Command {
    /// Register a new order.
    Add {
        #[arg(long)]
        tool: String,
        #[arg(long)]
        client: String,
        #[command(flatten)]
        fields: OrderFields,
    },
    /// Change fields of an existing order.
    Edit {
        id: String,
        #[arg(long)]
        tool: Option<String>,
        #[arg(long)]
        client: Option<String>,
        #[command(flatten)]
        fields: OrderFields,
        /// Drop all parts before adding the given ones.
        #[arg(long)]
        clear_parts: bool,
        /// Remove the region.
        #[arg(long, conflicts_with = "region")]
        clear_region: bool,
    },
    /// List orders, newest first.
    List {
        /// Case-insensitive text matched against tool, client, phone and region.
        #[arg(long, short, default_value = "")]
        query: String,
        /// all, received, in_progress, done or returned.
        #[arg(long, short, default_value = "all")]
        status: StatusFilter,
    },
    /// Show one order with its parts.
    Show { id: String },
    /// Counts by status and total revenue.
    Stats,
    /// Delete an order. Deleting a missing order is not an error.
    Delete { id: String },
    /// List the known regions.
    Regions,
}

/// Optional order fields shared by `add` and `edit`.
#[derive(Args)]
struct OrderFields {
    /// Client phone; an empty value clears it.
    #[arg(long)]
    phone: Option<String>,
    /// Region name, see `regions`.
    #[arg(long)]
    region: Option<Region>,
    /// received, in_progress, done or returned.
    #[arg(long)]
    status: Option<Status>,
    #[arg(long)]
    comment: Option<String>,
    /// Labor price in rubles.
    #[arg(long)]
    labor: Option<f64>,
    /// A part as NAME:PRICE[:QTY]; repeatable.
    #[arg(long = "part", value_name = "NAME:PRICE[:QTY]")]
    parts: Vec<Part>,
}

impl OrderFields {
    fn apply(self, draft: &mut OrderDraft) {
        if let Some(phone) = self.phone {
            draft.client_phone = Some(phone);
        }
        if let Some(region) = self.region {
            draft.region = Some(region);
        }
        if let Some(status) = self.status {
            draft.status = status;
        }
        if let Some(comment) = self.comment {
            draft.comment = comment;
        }
        if let Some(labor) = self.labor {
            draft.labor_price = labor;
        }
        draft.parts.extend(self.parts);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Command::Regions = cli.command {
        for region in Region::ALL {
            println!("{region}");
        }
        return Ok(());
    }

    let backend = open_backend(cli.backend, &cli.data_dir)?;
    let config = OrderBookConfig {
        slot: cli.slot,
        ..OrderBookConfig::default()
    };
    let mut book = OrderBook::open(backend, config);
    debug!(orders = book.len(), "order book opened");

    match cli.command {
        Command::Add {
            tool,
            client,
            fields,
        } => {
            let mut draft = OrderDraft::new(tool, client);
            fields.apply(&mut draft);
            let order = book.create(draft).context("Failed to create order")?;
            print_card(&order);
        }
        Command::Edit {
            id,
            tool,
            client,
            fields,
            clear_parts,
            clear_region,
        } => {
            let id = OrderId::new(id);
            let Some(current) = book.get(&id) else {
                bail!("Order {id} not found");
            };
            let mut draft = current.to_draft();
            if let Some(tool) = tool {
                draft.tool_name = tool;
            }
            if let Some(client) = client {
                draft.client_name = client;
            }
            if clear_parts {
                draft.parts.clear();
            }
            if clear_region {
                draft.region = None;
            }
            fields.apply(&mut draft);

            let edited = Order::from_draft(id.clone(), draft, current.created_at);
            match book.update(edited).context("Failed to update order")? {
                UpdateResult::Updated(order) => print_card(&order),
                UpdateResult::NotFound => bail!("Order {id} not found"),
            }
        }
        Command::List { query, status } => {
            let orders = book.view(&query, status);
            if orders.is_empty() {
                println!("No orders.");
            } else {
                print!(
                    "{}",
                    display::table(&orders, |o| o.created_at.with_timezone(&Local))
                );
            }
        }
        Command::Show { id } => {
            let id = OrderId::new(id);
            let order = book
                .get(&id)
                .with_context(|| format!("Order {id} not found"))?;
            print_card(order);
        }
        Command::Stats => print!("{}", display::stats(&book.stats())),
        Command::Delete { id } => {
            match book
                .delete(&OrderId::new(id.clone()))
                .context("Failed to delete order")?
            {
                DeleteResult::Deleted(order) => println!("Deleted {} ({})", order.id, order.tool_name),
                DeleteResult::Absent => println!("Order {id} was already absent"),
            }
        }
        Command::Regions => {}
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins; otherwise `warn`, or
/// `debug` with `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_backend(kind: BackendKind, data_dir: &Path) -> Result<Box<dyn SlotBackend>> {
    match kind {
        BackendKind::Json => {
            let backend = FileBackend::open(data_dir).with_context(|| {
                format!("Failed to open data directory '{}'", data_dir.display())
            })?;
            Ok(Box::new(backend))
        }
        BackendKind::Sqlite => {
            std::fs::create_dir_all(data_dir).with_context(|| {
                format!("Failed to create data directory '{}'", data_dir.display())
            })?;
            let path = data_dir.join(SQLITE_FILE);
            let backend = SqliteBackend::open(&path)
                .with_context(|| format!("Failed to open database '{}'", path.display()))?;
            Ok(Box::new(backend))
        }
    }
}

fn print_card(order: &Order) {
    print!(
        "{}",
        display::card(
            order,
            &order.created_at.with_timezone(&Local),
            &order.updated_at.with_timezone(&Local),
        )
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_parses_repeated_parts() {
        let cli = Cli::parse_from([
            "repairdesk",
            "add",
            "--tool",
            "Drill",
            "--client",
            "Ivanov",
            "--labor",
            "500",
            "--part",
            "Carbon brush:100:2",
            "--part",
            "Screw:5",
        ]);
        let Command::Add { fields, .. } = cli.command else {
            panic!("expected add");
        };
        let mut draft = OrderDraft::new("Drill", "Ivanov");
        fields.apply(&mut draft);
        assert_eq!(draft.parts.len(), 2);
        assert_eq!(draft.total(), 705.0);
    }

    #[test]
    fn test_global_options_and_filter() {
        let cli = Cli::parse_from([
            "repairdesk",
            "--backend",
            "sqlite",
            "--data-dir",
            "/tmp/x",
            "list",
            "--status",
            "in_progress",
        ]);
        assert_eq!(cli.backend, BackendKind::Sqlite);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/x"));
        let Command::List { status, query } = cli.command else {
            panic!("expected list");
        };
        assert_eq!(status, StatusFilter::Only(Status::InProgress));
        assert!(query.is_empty());
    }

    #[test]
    fn test_edit_rejects_unknown_region() {
        let parsed = Cli::try_parse_from(["repairdesk", "edit", "abc", "--region", "Атлантида"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_backends_share_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        for kind in [BackendKind::Json, BackendKind::Sqlite] {
            let backend = open_backend(kind, &dir.path().join("data")).unwrap();
            let mut book = OrderBook::open(backend, OrderBookConfig::default());
            book.create(OrderDraft::new("Drill", "Ivanov")).unwrap();
            assert_eq!(book.len(), 1);
        }
        assert!(dir.path().join("data").join(SQLITE_FILE).exists());
    }
}
