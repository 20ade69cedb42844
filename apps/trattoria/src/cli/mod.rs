//! # Trattoria CLI Module
//!
//! This module implements the CLI interface for Trattoria.
//!
//! ## Available Commands
//!
//! - `init` - Create an empty restaurant file
//! - `status` - Show entity and link counts
//! - `seed` - Fill an empty restaurant with demo data
//! - `verify` - Run the integrity verifier
//! - `export` - Export the restaurant as JSON or binary
//! - `menu` - List menus, items and ingredients
//! - `staff` - List staff and the supervision hierarchy
//! - `reservations` - List a customer's reservations
//! - `unlink-ingredient` - Remove an ingredient from a menu item
//! - `supervise` - Set a manager's supervisor
//! - `delete-order` - Delete an order and everything it owns

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use trattoria_core::TrattoriaError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Trattoria - restaurant model with a relationship-integrity engine
#[derive(Parser, Debug)]
#[command(name = "trattoria")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the restaurant file [default: trattoria.bin]
    #[arg(short = 'D', long, global = true)]
    pub data: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Export encodings.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Binary,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an empty restaurant file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show entity and link counts
    Status,

    /// Fill an empty restaurant with demo data
    Seed,

    /// Check every relationship invariant
    Verify,

    /// Export the restaurant
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format
        #[arg(short = 't', long, value_enum, default_value = "json")]
        format: ExportFormat,
    },

    /// List menus, items and their ingredients
    Menu,

    /// List staff and who supervises whom
    Staff,

    /// List a customer's reservations
    Reservations {
        /// Customer id
        #[arg(long)]
        customer: u64,
    },

    /// Remove an ingredient from a menu item
    UnlinkIngredient {
        /// Menu item id
        #[arg(long)]
        item: u64,

        /// Ingredient id
        #[arg(long)]
        ingredient: u64,
    },

    /// Make a manager report to another manager
    Supervise {
        /// Staff id of the subordinate
        #[arg(long)]
        staff: u64,

        /// Staff id of the supervisor
        #[arg(long)]
        supervisor: u64,
    },

    /// Delete an order with its payments, invoice and requests
    DeleteOrder {
        /// Order id
        #[arg(long)]
        order: u64,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments and resolved configuration.
pub fn execute(cli: Cli, config: &AppConfig) -> Result<(), TrattoriaError> {
    let data = config.data_path.as_path();
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Init { force }) => cmd_init(data, force),
        Some(Commands::Status) | None => cmd_status(data, json_mode),
        Some(Commands::Seed) => cmd_seed(data, config, json_mode),
        Some(Commands::Verify) => cmd_verify(data, json_mode),
        Some(Commands::Export { output, format }) => cmd_export(data, &output, format),
        Some(Commands::Menu) => cmd_menu(data, json_mode),
        Some(Commands::Staff) => cmd_staff(data, json_mode),
        Some(Commands::Reservations { customer }) => cmd_reservations(data, json_mode, customer),
        Some(Commands::UnlinkIngredient { item, ingredient }) => {
            cmd_unlink_ingredient(data, item, ingredient)
        }
        Some(Commands::Supervise { staff, supervisor }) => cmd_supervise(data, staff, supervisor),
        Some(Commands::DeleteOrder { order }) => cmd_delete_order(data, order),
    }
}
