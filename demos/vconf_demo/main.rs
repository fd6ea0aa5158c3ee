//! # vconf demo application
//!
//! A small CLI that loads a configuration file with
//! [vconf](https://docs.rs/vconf) and either queries it or extracts it into a
//! typed struct. It exists to demonstrate and manually verify vconf's
//! features.
//!
//! ## Running
//!
//! ```sh
//! cargo run --example vconf_demo -- demos/vconf_demo/demo.conf
//! cargo run --example vconf_demo -- demos/vconf_demo/demo.conf query get server.port --as u32
//! ```
//!
//! ## Features demonstrated
//!
//! | Feature             | How to exercise it                                  |
//! |---------------------|-----------------------------------------------------|
//! | Typed extraction    | `... demo.conf` (default `show` command)            |
//! | Strict extraction   | `... demo.conf show --strict` after adding a typo   |
//! | `list`              | `... demo.conf query list`                          |
//! | Typed `get`         | `... demo.conf query get server.debug --as bool`    |
//! | URL decomposition   | `... demo.conf query url upstream`                  |
//! | List elements       | `... demo.conf query items backends`                |

mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use vconf::{Config, QueryArgs};

use config::DemoConfig;

// ---------------------------------------------------------------------------
// CLI definitions
// ---------------------------------------------------------------------------

/// vconf demo - load a configuration file and inspect it.
#[derive(Parser, Debug)]
#[command(name = "vconf-demo")]
struct Cli {
    /// Configuration file to load.
    file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the file into the demo's typed settings and print them.
    Show {
        /// Reject keys the settings struct does not know.
        #[arg(long)]
        strict: bool,
    },
    /// Query raw or decoded values (list, get, url, items).
    Query(QueryArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn show(config: &Config, strict: bool) -> Result<(), vconf::VconfError> {
    let settings: DemoConfig = if strict {
        vconf::from_config_strict(config)?
    } else {
        vconf::from_config(config)?
    };
    println!("{settings:#?}");
    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let config = Config::from_path(&cli.file).unwrap_or_else(|e| {
        eprintln!("Failed to load config:\n{e}");
        std::process::exit(1);
    });

    let result = match cli.command {
        None => show(&config, false),
        Some(Commands::Show { strict }) => show(&config, strict),
        Some(Commands::Query(args)) => config
            .handle(args.into_query())
            .map(|result| println!("{result}")),
    };

    if let Err(e) = result {
        eprintln!("Error:\n{e}");
        std::process::exit(1);
    }
}
