use std::path::PathBuf;

use clap::{Parser, Subcommand};

use auth_settings::config::schema::{render_schema, settings_schema};
use auth_settings::config::validation::validate_document;
use auth_settings::config::{AuthSettings, LoadOptions};
use auth_settings::device::{generate_device_id, DeviceCatalog};
use auth_settings::observability::init_logging;

#[derive(Parser)]
#[command(name = "settings-cli")]
#[command(about = "Management CLI for client auth settings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the settings JSON schema
    Schema,
    /// Validate a settings file and print diagnostics
    Validate { file: PathBuf },
    /// Load a settings file and write it back with the device resolved
    Normalize { file: PathBuf },
    /// Print a freshly generated device id
    DeviceId,
    /// List the known Android device packages
    Profiles,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging("auth_settings=warn");
    let cli = Cli::parse();

    match cli.command {
        Commands::Schema => {
            println!("{}", render_schema(&settings_schema())?);
        }
        Commands::Validate { file } => {
            let text = std::fs::read_to_string(&file)?;
            let errors = validate_document(&text, &settings_schema())?;
            if errors.is_empty() {
                println!("{}: valid", file.display());
                return Ok(());
            }
            for error in &errors {
                eprintln!("{} {}", file.display(), error);
            }
            std::process::exit(1);
        }
        Commands::Normalize { file } => {
            let mut settings = AuthSettings::new();
            settings.load(&file, LoadOptions::default())?;
            println!(
                "{}: {} ({})",
                file.display(),
                settings.device_config.device_package_name,
                settings.device_config.device_id
            );
        }
        Commands::DeviceId => {
            println!("{}", generate_device_id());
        }
        Commands::Profiles => {
            for key in DeviceCatalog::builtin().android_keys() {
                println!("{}", key);
            }
        }
    }

    Ok(())
}
