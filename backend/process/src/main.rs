use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use process::{Selections, browse_report, engine, facets_report, fetch_into, import_csv, load};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace the stored restaurants with a spreadsheet export
    Import {
        csv: PathBuf,

        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Print the options every filter would offer
    Facets {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print the restaurants matching the filters
    Browse {
        #[command(flatten)]
        source: Source,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Copy the restaurants of a running server into the store
    Fetch {
        url: String,

        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct Source {
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    #[arg(long, default_value = "sample-restaurants.csv")]
    sample_csv: PathBuf,
}

#[derive(Args, Debug)]
struct FilterArgs {
    #[arg(long)]
    city: Vec<String>,

    #[arg(long)]
    neighborhood: Vec<String>,

    #[arg(long)]
    cuisine: Vec<String>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    reservation: Option<String>,

    #[arg(long)]
    price: Vec<String>,
}

impl From<FilterArgs> for Selections {
    fn from(args: FilterArgs) -> Self {
        Self {
            city: args.city,
            neighborhood: args.neighborhood,
            cuisine_type: args.cuisine,
            name: args.name,
            reservation_needed: args.reservation,
            price_range: args.price,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match Cli::parse().command {
        Command::Import { csv, data_dir } => {
            import_csv(&csv, &data_dir)?;
        }
        Command::Facets { source, filters } => {
            let loaded = load(&source.data_dir, &source.sample_csv);
            let engine = engine(&loaded.restaurants, &filters.into());
            println!("{}", facets_report(&engine.facets()));
        }
        Command::Browse { source, filters } => {
            let loaded = load(&source.data_dir, &source.sample_csv);
            let engine = engine(&loaded.restaurants, &filters.into());
            println!("{}", browse_report(&engine));
        }
        Command::Fetch { url, data_dir } => {
            fetch_into(&url, &data_dir).await?;
        }
    }

    Ok(())
}
