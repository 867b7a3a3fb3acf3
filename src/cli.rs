use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fridgenote")]
#[command(about = "Photograph or type a shopping list and walk the shop in aisle order", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file
    #[arg(short, long, default_value = "config.json", global = true)]
    pub config: String,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Capture items, organise them by aisle and print the route
    Organise {
        /// Items separated by commas or newlines
        #[arg(short, long)]
        text: Option<String>,

        /// Text file with one item per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Photo of a handwritten list (needs ocr.endpoint)
        #[arg(short, long)]
        image: Option<PathBuf>,

        /// Write shopping-list-YYYY-MM-DD.txt into this folder
        #[arg(short, long)]
        export: Option<PathBuf>,

        /// Save the organised list under this name
        #[arg(short, long)]
        save: Option<String>,

        /// Pin an item to an aisle, as "item text=Category"
        #[arg(short = 'm', long = "move")]
        moves: Vec<String>,
    },

    /// Show saved lists
    Lists {
        /// Print one list in full
        #[arg(long)]
        id: Option<i64>,

        /// Delete a saved list
        #[arg(long)]
        delete: Option<i64>,
    },

    /// List stores, optionally near the configured home location
    Stores {
        /// Only stores within search_radius_km of home
        #[arg(long)]
        nearby: bool,

        /// Filter by name, chain or address
        #[arg(long)]
        search: Option<String>,
    },

    /// Compare basket prices across supermarkets
    Compare {
        /// Items separated by commas or newlines
        #[arg(required = true)]
        text: String,

        /// Include online delivery estimates
        #[arg(long)]
        online: bool,
    },
}
