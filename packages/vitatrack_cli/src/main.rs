use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};

use vitatrack::catalog::{self, CategoryInfo};
use vitatrack::{CategoryFilter, Device, DeviceCategory, DeviceRegistry, RegistryConfig};

#[derive(Debug, Parser)]
#[command(
    name = "vitatrack",
    version,
    about = "Manage simulated health-device pairings",
    long_about = "vitatrack drives an in-memory device registry: add health peripherals\n\
        from the catalog, connect and disconnect them over a simulated link, and\n\
        list them by category.\n\n\
        EXAMPLES:\n\
        \n  vitatrack catalog --category bloodPressure   Show manufacturers and models\n\
        \n  vitatrack demo                               Run the pairing walkthrough\n\
        \n  vitatrack --latency-ms 500 session           Interactive session on stdin"
)]
struct Cli {
    /// JSON registry config file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Simulated pairing latency, overrides the config file
    #[arg(long, global = true, value_name = "MS")]
    latency_ms: Option<u64>,

    /// Fail connects that take longer than this
    #[arg(long, global = true, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Start without the built-in sample devices
    #[arg(long, global = true)]
    no_samples: bool,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List categories with their manufacturers and models
    Catalog {
        /// Only show this category (e.g. bloodPressure, scale)
        #[arg(long, value_name = "CATEGORY")]
        category: Option<DeviceCategory>,
    },

    /// Add, connect, filter, disconnect and remove a blood pressure cuff
    Demo,

    /// Read registry commands from stdin, one per line
    Session,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let out = Output { json: cli.json };

    match &cli.command {
        Command::Catalog { category } => print_catalog(&out, *category),
        Command::Demo => {
            let registry = DeviceRegistry::new(build_config(&cli)?);
            run_demo(&out, &registry).await
        }
        Command::Session => {
            let registry = Arc::new(DeviceRegistry::new(build_config(&cli)?));
            run_session(out, registry).await
        }
    }
}

fn build_config(cli: &Cli) -> Result<RegistryConfig> {
    let mut config = match &cli.config {
        Some(path) => RegistryConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => RegistryConfig::default(),
    };
    if let Some(ms) = cli.latency_ms {
        config.connect_latency_ms = ms;
    }
    if let Some(ms) = cli.timeout_ms {
        config.connect_timeout_ms = Some(ms);
    }
    if cli.no_samples {
        config.seed_sample_devices = false;
    }
    log::debug!("Registry config: {:?}", config);
    Ok(config)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
struct Output {
    json: bool,
}

impl Output {
    fn device(&self, device: &Device) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(device)?);
        } else {
            println!("{}", describe(device));
        }
        Ok(())
    }

    fn devices(&self, devices: &[Device]) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(devices)?);
        } else if devices.is_empty() {
            println!("(no devices)");
        } else {
            for device in devices {
                println!("{}", describe(device));
            }
        }
        Ok(())
    }
}

fn describe(device: &Device) -> String {
    let info = catalog::category_info(device.category.into());
    let state = if device.is_connected {
        "connected"
    } else {
        "disconnected"
    };
    let synced = device
        .last_sync_date
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "never".to_string());
    let low = if device.battery_level.is_low() {
        " (low)"
    } else {
        ""
    };
    format!(
        "{}  {} [{}] {} {}  battery {}{}  mac {}  last sync {}",
        device.id,
        device.name,
        info.display_name,
        device.model,
        state,
        device.battery_level,
        low,
        device.mac_address,
        synced
    )
}

#[derive(Serialize)]
struct CatalogEntry {
    #[serde(flatten)]
    info: CategoryInfo,
    manufacturers: Vec<ManufacturerEntry>,
}

#[derive(Serialize)]
struct ManufacturerEntry {
    name: &'static str,
    models: &'static [&'static str],
}

fn print_catalog(out: &Output, only: Option<DeviceCategory>) -> Result<()> {
    let entries: Vec<CatalogEntry> = DeviceCategory::ALL
        .into_iter()
        .filter(|c| only.map_or(true, |wanted| wanted == *c))
        .map(|category| CatalogEntry {
            info: *catalog::category_info(category.into()),
            manufacturers: catalog::manufacturers(category)
                .iter()
                .copied()
                .map(|name| ManufacturerEntry {
                    name,
                    models: catalog::models(name, category),
                })
                .collect(),
        })
        .collect();

    if out.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    for entry in &entries {
        println!(
            "{} ({}, icon {}, {})",
            entry.info.display_name, entry.info.filter, entry.info.icon, entry.info.color
        );
        for manufacturer in &entry.manufacturers {
            println!("  {}: {}", manufacturer.name, manufacturer.models.join(", "));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Demo
// ---------------------------------------------------------------------------

async fn run_demo(out: &Output, registry: &DeviceRegistry) -> Result<()> {
    println!("1. Adding 欧姆龙 HEM-7156");
    let device = registry.add_device("欧姆龙", "HEM-7156", DeviceCategory::BloodPressure)?;
    out.device(&device)?;

    println!("2. Connecting (latency {} ms)", registry.config().connect_latency_ms);
    let device = registry.connect_device(&device.id).await?;
    out.device(&device)?;

    println!("3. Blood pressure devices");
    out.devices(&registry.list_devices(DeviceCategory::BloodPressure.into()))?;

    println!("4. Disconnecting");
    let device = registry.disconnect_device(&device.id)?;
    out.device(&device)?;

    println!("5. Removing twice");
    let first = registry.remove_device(&device.id).is_some();
    let second = registry.remove_device(&device.id).is_some();
    println!("   first removed: {}, second removed: {}", first, second);

    println!("Remaining devices");
    out.devices(&registry.list_devices(CategoryFilter::All))?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

const SESSION_HELP: &str = "\
commands:
  add <category> <manufacturer> [model]
  manual <category> <manufacturer> <model> <mac> <name...>
  list [all|<category>]
  connect <id>        (runs in the background)
  cancel <id>
  disconnect <id>
  remove <id>
  battery <id> <percent>
  show <id>
  help
  quit";

async fn run_session(out: Output, registry: Arc<DeviceRegistry>) -> Result<()> {
    if out.json {
        let mut events = registry.subscribe();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                if let Ok(line) = serde_json::to_string(&event) {
                    println!("{}", line);
                }
            }
        });
    }

    println!("vitatrack session; type 'help' for commands");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };
        let Some(line) = line else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((command, args)) = words.split_first() else {
            continue;
        };
        if *command == "quit" || *command == "exit" {
            break;
        }
        if let Err(e) = handle_command(&out, &registry, command, args) {
            eprintln!("error: {}", e);
        }
    }

    for id in registry.connecting() {
        registry.cancel_connect(&id);
    }
    Ok(())
}

fn handle_command(
    out: &Output,
    registry: &Arc<DeviceRegistry>,
    command: &str,
    args: &[&str],
) -> Result<()> {
    match (command, args) {
        ("help", _) => println!("{}", SESSION_HELP),
        ("add", [category, manufacturer, rest @ ..]) => {
            let category = parse_category(category)?;
            let model = match rest {
                [] => catalog::models(manufacturer, category)
                    .first()
                    .copied()
                    .ok_or_else(|| anyhow!("No models for {}", manufacturer))?
                    .to_string(),
                words => words.join(" "),
            };
            let device = registry.add_device(manufacturer, &model, category)?;
            out.device(&device)?;
        }
        ("manual", [category, manufacturer, model, mac, name @ ..]) if !name.is_empty() => {
            let category = parse_category(category)?;
            let device =
                registry.add_manual_device(&name.join(" "), manufacturer, model, category, mac)?;
            out.device(&device)?;
        }
        ("list", []) => out.devices(&registry.list_devices(CategoryFilter::All))?,
        ("list", [filter]) => {
            let filter: CategoryFilter = filter.parse().map_err(|e: String| anyhow!(e))?;
            out.devices(&registry.list_devices(filter))?;
        }
        ("connect", [id]) => {
            let attempt = registry.begin_connect(id)?;
            let out = *out;
            tokio::spawn(async move {
                let id = attempt.device_id().to_string();
                match attempt.wait().await {
                    Ok(device) => {
                        if let Err(e) = out.device(&device) {
                            log::warn!("Failed to print {}: {}", id, e);
                        }
                    }
                    Err(e) => eprintln!("connect {}: {}", id, e),
                }
            });
        }
        ("cancel", [id]) => {
            if !registry.cancel_connect(id) {
                println!("{} has no connect in flight", id);
            }
        }
        ("disconnect", [id]) => out.device(&registry.disconnect_device(id)?)?,
        ("remove", [id]) => match registry.remove_device(id) {
            Some(device) => out.device(&device)?,
            None => println!("{} not present", id),
        },
        ("battery", [id, percent]) => {
            let percent: u8 = percent
                .parse()
                .with_context(|| format!("Invalid battery percent {}", percent))?;
            out.device(&registry.set_battery_level(id, percent)?)?;
        }
        ("show", [id]) => {
            let device = registry
                .find_device(id)
                .ok_or_else(|| anyhow!("Device not found: {}", id))?;
            let state = registry
                .connection_state(id)
                .map(|s| s.to_string())
                .unwrap_or_default();
            out.device(&device)?;
            if !out.json {
                println!("  state: {}", state);
            }
        }
        _ => bail!("Unrecognised command '{}'; type 'help'", command),
    }
    Ok(())
}

fn parse_category(s: &str) -> Result<DeviceCategory> {
    s.parse().map_err(|e: String| anyhow!(e))
}
