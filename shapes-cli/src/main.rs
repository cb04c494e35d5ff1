//! CLI and HTTP server for square/polygon intersection.
//!
//! Provides:
//! - An HTTP CRUD API over squares and polygons, optionally backed by a snapshot file
//! - One-off evaluation of a square against a file of polygons

mod server;
mod snapshot;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};

use shapes_core::{intersected_polygons, Polygon, ShapeId, Square};

#[derive(Parser)]
#[command(name = "shapes")]
#[command(about = "Squares, polygons, and which polygons each square intersects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Snapshot file (JSON, gzipped if it ends in .gz); loaded at startup, rewritten on every change
        #[arg(short, long)]
        data: Option<PathBuf>,
    },

    /// Print the ids of the polygons a square intersects
    Intersect {
        /// Square (JSON, e.g. '{"xPoints": "0,10,10,0", "yPoints": "0,0,10,10"}')
        #[arg(short, long)]
        square: String,

        /// Polygons file: a JSON array of polygons, or a snapshot (JSON, gzipped if it ends in .gz)
        #[arg(short, long)]
        polygons: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, data } => {
            server::run_server(server::ServerConfig { port, data }).await?;
        }
        Commands::Intersect { square, polygons } => {
            let ids = intersect(&square, &polygons)?;
            println!("{}", serde_json::to_string(&ids)?);
        }
    }
    Ok(())
}

fn intersect(square: &str, polygons: &Path) -> Result<Vec<ShapeId>> {
    let square: Square = serde_json::from_str(square)?;
    let polygons: Vec<Polygon> = match snapshot::read_json::<serde_json::Value>(polygons)? {
        value @ serde_json::Value::Array(_) => serde_json::from_value(value)?,
        value => serde_json::from_value::<snapshot::Snapshot>(value)?.polygons,
    };
    Ok(intersected_polygons(&square, &polygons)?)
}
