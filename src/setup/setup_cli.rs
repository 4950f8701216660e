use clap::{Parser, Subcommand};
use kontrol_backend::config::Config;
use kontrol_backend::helper::admin_helpers;
use kontrol_backend::models::db_operations::{config_db_operations, DataStore};
use kontrol_backend::setup::data_setup;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "setup_cli", author, version, about = "A CLI for initial application setup.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a .env configuration file. Defaults to ./.env when present.
    #[arg(long, value_name = "FILE")]
    env_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    Data {
        #[command(subcommand)]
        action: DataAction,
    },
    Personel {
        #[command(subcommand)]
        action: PersonelAction,
    },
}

#[derive(Subcommand, Debug)]
enum DataAction {
    /// Writes a default config.json and an empty kayitlar.json.
    Init {
        /// Overwrite an existing config.json.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PersonelAction {
    Add {
        #[arg(long)]
        isim: String,
    },
    Remove {
        #[arg(long)]
        isim: String,
    },
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_env(cli.env_file.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Error: Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let store = DataStore::new(config.data_dir());

    let result = match &cli.command {
        Commands::Data { action: DataAction::Init { force } } => {
            data_setup::init_data_dir(&store, *force).map(|wrote| {
                if wrote {
                    println!("✅ Default config written to {}", store.config_path().display());
                } else {
                    println!("ℹ️ Keeping existing {} (use --force to overwrite)", store.config_path().display());
                }
                println!("✅ Submission log ready at {}", store.kayitlar_path().display());
            })
        }
        Commands::Personel { action } => match action {
            PersonelAction::Add { isim } => admin_helpers::add_personel(&store, isim).map(print_roster),
            PersonelAction::Remove { isim } => admin_helpers::remove_personel(&store, isim).map(print_roster),
            PersonelAction::List => config_db_operations::read_config(&store).map(|c| print_roster(c.personeller)),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_roster(personeller: Vec<String>) {
    if personeller.is_empty() {
        println!("No staff registered.");
        return;
    }
    println!("--- Staff ({}) ---", personeller.len());
    for isim in personeller {
        println!("- {}", isim);
    }
}
