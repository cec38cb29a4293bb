//! Mirage Theme - command line orchestrator
//!
//! Drives the integration lifecycle from the shell. Live service calls are
//! written to stdout as JSON lines for the host to pick up.

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Stdout};
use std::path::{Path, PathBuf};

use mirage_theme::{
    commands::{Command, CommandMessage},
    config::{config_path, Config},
    generate,
    host::JsonLinesRegistry,
    output::{to_json, to_yaml},
    presets::{import_settings, PresetStore, SettingsExport},
    Integration,
};

/// Mirage Theme - glass-style themes for the Mirage dashboard
#[derive(Parser)]
#[command(name = "mirage-theme")]
#[command(version, about)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the generated themes
    Generate {
        #[arg(long, value_enum, default_value_t = Format::Yaml)]
        format: Format,
    },
    /// Generate and deliver the themes
    Apply,
    /// Remove uploaded backgrounds and clear both themes
    Remove,
    /// Manage style presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },
    /// Export the stored options as JSON
    ExportSettings {
        /// Write to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Import options from an export document or a bare options object
    ImportSettings { file: PathBuf },
    /// Upload a background image
    Upload { file: PathBuf },
    /// Dispatch one command message and print the response
    Command { json: String },
}

#[derive(Subcommand)]
enum PresetAction {
    /// List built-in and user presets
    List,
    /// Apply a preset over the stored options
    Apply { name: String },
    /// Save the stored options as a user preset
    Save { name: String },
    /// Delete a user preset
    Delete { name: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Yaml,
    Json,
}

type CliIntegration = Integration<JsonLinesRegistry<Stdout>>;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let explicit_config = cli.config.is_some();
    let path = match cli.config {
        Some(path) => path,
        None => config_path().context("Failed to locate config file")?,
    };
    let config = load_config(&path)?;

    match cli.command {
        Commands::Generate { format } => {
            let theme = generate(&config.options);
            let rendered = match format {
                Format::Yaml => to_yaml(&theme)?,
                Format::Json => to_json(&theme)?,
            };
            println!("{}", rendered.trim_end());
        }
        Commands::Apply => {
            integration(config, &path).setup();
        }
        Commands::Remove => {
            let mut integration = integration(config, &path);
            integration.remove();
            integration.unload();
        }
        Commands::Preset { action } => run_preset(action, config, &path, explicit_config)?,
        Commands::ExportSettings { out } => {
            let json = SettingsExport::new(&config.options).to_json()?;
            match out {
                Some(out) => {
                    fs::write(&out, json)
                        .with_context(|| format!("Failed to write {}", out.display()))?;
                    log::info!("Settings exported to {}", out.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::ImportSettings { file } => {
            let json = fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let options = import_settings(&json)?;
            integration(config, &path).options_updated(options)?;
        }
        Commands::Upload { file } => {
            let file_name = file
                .file_name()
                .and_then(|n| n.to_str())
                .context("Upload path has no file name")?
                .to_string();
            let bytes =
                fs::read(&file).with_context(|| format!("Failed to read {}", file.display()))?;
            let file_data = format!(
                "data:{};base64,{}",
                mime_type(&file),
                STANDARD.encode(bytes)
            );
            let response = integration(config, &path).handle_command(CommandMessage {
                id: 1,
                command: Command::UploadImage {
                    file_name,
                    file_data,
                },
            });
            println!("{}", serde_json::to_string(&response)?);
        }
        Commands::Command { json } => {
            let response = integration(config, &path).handle_raw(&json);
            println!("{}", serde_json::to_string(&response)?);
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    Config::load_from(path).with_context(|| format!("Failed to load {}", path.display()))
}

fn integration(config: Config, path: &Path) -> CliIntegration {
    Integration::new(
        config,
        Some(path.to_path_buf()),
        JsonLinesRegistry::new(io::stdout()),
    )
}

/// User presets live next to the config file in use.
fn preset_store(config_path: &Path, explicit_config: bool) -> Result<PresetStore> {
    if explicit_config {
        Ok(PresetStore::load_from(
            &config_path.with_file_name("presets.json"),
        )?)
    } else {
        Ok(PresetStore::load()?)
    }
}

fn run_preset(
    action: PresetAction,
    config: Config,
    path: &Path,
    explicit_config: bool,
) -> Result<()> {
    let mut presets = preset_store(path, explicit_config)?;
    match action {
        PresetAction::List => {
            for preset in presets.all() {
                let marker = if preset.is_default { " (built-in)" } else { "" };
                println!("{}{}", preset.name, marker);
            }
        }
        PresetAction::Apply { name } => {
            integration(config, path).apply_preset(&presets, &name)?;
        }
        PresetAction::Save { name } => {
            presets.save_preset(&name, &config.options)?;
            log::info!("Saved preset '{}'", name.trim());
        }
        PresetAction::Delete { name } => {
            presets.delete_preset(&name)?;
            log::info!("Deleted preset '{}'", name);
        }
    }
    Ok(())
}

fn mime_type(file: &Path) -> &'static str {
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
