use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};

use slotscriber::board::Board;
use slotscriber::config::Config;
use slotscriber::input::{BoardEvent, Phase, PointerPosition, SurfaceOffset};
use slotscriber::session::{SlotStatus, inspect_slots, options_from_config};

#[derive(Parser, Debug)]
#[command(name = "slotscriber")]
#[command(version, about = "Two-click line annotation over background images")]
struct Cli {
    /// Configuration file (defaults to ~/.config/slotscriber/config.toml)
    #[arg(long, short = 'c', value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay clicks onto a slot; every two clicks draw and persist one line
    Draw {
        /// Slot index (position in the configured image list)
        slot: usize,

        /// Click position as X,Y (repeat for each click)
        #[arg(long = "click", value_name = "X,Y", required = true, allow_hyphen_values = true)]
        clicks: Vec<PointerPosition>,

        /// Surface origin as LEFT,TOP; clicks are given relative to the same origin
        #[arg(long, value_name = "LEFT,TOP", allow_hyphen_values = true)]
        offset: Option<PointerPosition>,

        /// Write the resulting surface to this PNG file
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Erase every line on a slot and persist the empty history
    Clear {
        /// Slot index
        slot: usize,

        /// Write the cleared surface to this PNG file
        #[arg(long, short = 'o', value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render slots (background plus stored lines) to PNG files
    Render {
        /// Only render this slot
        #[arg(long)]
        slot: Option<usize>,

        /// Directory receiving slot-<index>.png files
        #[arg(long, value_name = "DIR", default_value = ".")]
        output_dir: PathBuf,
    },

    /// Show where each slot's history is stored and what it holds
    Inspect,

    /// Print the JSON schema of the configuration file
    Schema,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if let Command::Schema = cli.command {
        println!("{}", Config::json_schema()?);
        return Ok(());
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => Config::get_config_path()?,
    };
    let config = Config::load_from(&config_path)?;
    let config_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if let Command::Inspect = cli.command {
        return run_inspect(&config, &config_dir);
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let mut board = Board::from_config(&config, &config_dir, runtime.handle())?;
    let timeout = Duration::from_millis(config.background.timeout_ms);

    match cli.command {
        Command::Draw {
            slot,
            clicks,
            offset,
            output,
        } => {
            let offset = offset
                .map(|origin| SurfaceOffset::new(origin.x, origin.y))
                .unwrap_or_default();
            board.open_slot(slot)?;

            let slot_board = board
                .slot_mut(slot)
                .context("slot disappeared after opening")?;
            for raw in clicks {
                slot_board.click(raw, offset);
            }
            if slot_board.phase() == Phase::AwaitingSecondPoint {
                log::warn!("Odd number of clicks; the last click has no second point and was dropped");
            }
            println!(
                "Slot {} now holds {} line(s)",
                slot,
                slot_board.history().len()
            );

            if let Some(path) = output {
                board.wait_for_backgrounds(timeout);
                board.render_slot(slot, &path)?;
                println!("Rendered slot {} to {}", slot, path.display());
            }
        }
        Command::Clear { slot, output } => {
            board.open_slot(slot)?;
            board.dispatch(slot, BoardEvent::Clear)?;
            println!("Cleared slot {slot}");

            if let Some(path) = output {
                board.wait_for_backgrounds(timeout);
                board.render_slot(slot, &path)?;
                println!("Rendered slot {} to {}", slot, path.display());
            }
        }
        Command::Render { slot, output_dir } => {
            let indices: Vec<usize> = match slot {
                Some(index) => vec![index],
                None => (0..board.len()).collect(),
            };
            if indices.is_empty() {
                bail!("No images configured; add [[images]] entries to {}", config_path.display());
            }

            std::fs::create_dir_all(&output_dir)
                .with_context(|| format!("Failed to create {}", output_dir.display()))?;
            for index in &indices {
                board.open_slot(*index)?;
            }
            board.wait_for_backgrounds(timeout);
            for index in indices {
                let path = output_dir.join(format!("slot-{index}.png"));
                board.render_slot(index, &path)?;
                println!("Rendered slot {} to {}", index, path.display());
            }
        }
        Command::Inspect | Command::Schema => {}
    }

    Ok(())
}

fn run_inspect(config: &Config, config_dir: &Path) -> Result<()> {
    let options = options_from_config(&config.storage, config_dir)?;
    println!("Storage directory: {}", options.base_dir.display());
    println!(
        "Limits: {} segments per slot, {} bytes per value, backups {}",
        options.max_segments_per_slot,
        options.max_file_size_bytes,
        if options.backup { "on" } else { "off" }
    );

    if config.images.is_empty() {
        println!("No images configured.");
        return Ok(());
    }

    for (inspection, image) in inspect_slots(&options, config.images.len())?
        .into_iter()
        .zip(&config.images)
    {
        let status = match &inspection.status {
            SlotStatus::Missing => "no history".to_string(),
            SlotStatus::Stored { segments } => format!("{segments} line(s)"),
            SlotStatus::Malformed(reason) => format!("unreadable ({reason})"),
        };
        println!("Slot {} [{}]: {}", inspection.key, image.image_url, status);
        println!("  path: {}", inspection.path.display());
        if let Some(size) = inspection.size_bytes {
            println!("  size: {size} bytes");
        }
        if let Some(modified) = inspection.modified {
            let modified: DateTime<Local> = modified.into();
            println!("  modified: {}", modified.format("%Y-%m-%d %H:%M:%S"));
        }
        if inspection.backup_exists {
            println!("  backup: {}", inspection.backup_path.display());
        }
    }

    Ok(())
}
