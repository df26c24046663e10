#![forbid(unsafe_code)]

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use corecycler_settings::config::{IniStore, SettingsStore};
use corecycler_settings::constants;
use corecycler_settings::field::FieldRegistry;
use corecycler_settings::launcher::{SystemRunner, Tool, ToolLauncher};
use corecycler_settings::profiles::{Session, headless_registry};
use corecycler_settings::sync::{ConsoleNotifier, SharedStore, SyncContext};

#[derive(Parser, Debug)]
#[command(name = "corecycler-settings", version, about = "Edit CoreCycler's config.ini and launch its helper tools")]
struct Cli {
    /// Settings file to edit
    #[arg(long, default_value = constants::config::FILENAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the settings file as JSON
    Show {
        /// Only this section
        #[arg(long)]
        section: Option<String>,
    },
    /// List every field with the value loaded from the settings file
    Fields,
    /// Apply field changes in order, e.g. `prime95.modeOverride=true`
    Set {
        #[arg(required = true, value_name = "FIELD=VALUE")]
        assignments: Vec<String>,
    },
    /// Start a helper program
    Launch {
        #[arg(value_enum)]
        tool: Tool,
    },
}

#[derive(Serialize)]
struct FieldEntry {
    id: &'static str,
    kind: &'static str,
    value: serde_json::Value,
}

fn init_tracing() -> Result<()> {
    let log_level = match std::env::var(constants::config::LOG_LEVEL_ENV)
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install tracing subscriber")
}

fn show(store: &IniStore, section: Option<&str>) -> Result<()> {
    let sections: Vec<String> = match section {
        Some(name) => vec![name.to_string()],
        None => store.sections(),
    };
    let dump: BTreeMap<String, BTreeMap<String, String>> = sections
        .into_iter()
        .map(|name| {
            let entries = store.read_section(&name);
            (name, entries)
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&dump)?);
    Ok(())
}

fn list_fields(registry: &FieldRegistry) -> Result<()> {
    let entries: Vec<FieldEntry> = registry
        .iter()
        .map(|(id, handle)| FieldEntry {
            id: id.as_str(),
            kind: handle.kind(),
            value: handle.to_json(),
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn apply(registry: &FieldRegistry, assignments: &[String]) -> Result<()> {
    for assignment in assignments {
        let (name, raw) = assignment
            .split_once('=')
            .with_context(|| format!("Expected FIELD=VALUE, got '{assignment}'"))?;
        let name = name.trim();
        let Some((id, handle)) = registry.find(name) else {
            bail!("Unknown field '{name}' (see `fields`)");
        };
        handle
            .set_from_str(raw)
            .with_context(|| format!("Failed to set {id}"))?;
        info!(field = %id, value = %handle.to_json(), "Applied change");
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    if let Commands::Launch { tool } = cli.command {
        let base_dir = std::env::current_dir().context("Failed to resolve working directory")?;
        let launcher = ToolLauncher::new(base_dir, SystemRunner);
        if launcher.launch_reporting(tool, &ConsoleNotifier).is_none() {
            bail!("Failed to launch {}", tool.label());
        }
        return Ok(());
    }

    let store = IniStore::open(&cli.config)
        .with_context(|| format!("Failed to open settings file {}", cli.config.display()))?;

    if let Commands::Show { section } = &cli.command {
        return show(&store, section.as_deref());
    }

    let store = Rc::new(RefCell::new(store));
    let shared: SharedStore = store.clone();
    let ctx = SyncContext::new(shared, Rc::new(ConsoleNotifier));
    let registry = headless_registry();
    let _session = Session::attach(&ctx, &registry);

    match &cli.command {
        Commands::Fields => list_fields(&registry),
        Commands::Set { assignments } => apply(&registry, assignments),
        Commands::Show { .. } | Commands::Launch { .. } => Ok(()),
    }
}
