use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use catalog_browser::favorites::FavoriteSnapshot;
use catalog_browser::listing::{ListingFilters, ListingState};
use catalog_browser::model::CharacterRecord;
use catalog_browser::runtime::{setup_tracing, BrowserConfig, BrowserSystem, CancellationToken};

#[derive(Parser, Debug)]
#[command(name = "catalog-browser", version, about = "Browse the character catalog")]
struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(long, global = true, help = "TOML configuration file")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List characters, directly or as residents of a location.
    List {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        species: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show one character with the other residents of its origin.
    Show { id: u32 },
    Favorites {
        #[command(subcommand)]
        command: FavoriteCommands,
    },
}

#[derive(Subcommand, Debug)]
enum FavoriteCommands {
    List,
    Toggle { id: u32 },
    Clear,
}

#[derive(Serialize)]
struct JsonOut<T: Serialize> {
    ok: bool,
    data: T,
}

#[derive(Serialize)]
struct ListingOut<'a> {
    page: u32,
    total_pages: u32,
    items: &'a [CharacterRecord],
}

fn print_json<T: Serialize>(data: T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&JsonOut { ok: true, data })?);
    Ok(())
}

fn print_character(record: &CharacterRecord) {
    println!(
        "{}\t{}\t{:?}\t{}\t{}",
        record.id, record.name, record.status, record.species, record.origin.name
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();
    let cli = Cli::parse();

    let config = BrowserConfig::load(cli.config.as_deref()).context("loading configuration")?;
    let system = BrowserSystem::new(&config)?;
    let outcome = execute(&cli, &system).await;
    system.shutdown().await?;
    outcome
}

async fn execute(cli: &Cli, system: &BrowserSystem) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();
    match &cli.command {
        Commands::List {
            name,
            species,
            location,
            page,
        } => {
            let mut listing = system.listing(ListingFilters::new(name, species, location));
            listing.set_page(*page);
            let result = match listing.load(&cancel).await {
                ListingState::Ready(result) => result,
                ListingState::Failed(e) => return Err(e).context("listing characters"),
                ListingState::Loading => anyhow::bail!("listing did not settle"),
            };
            if cli.json {
                print_json(ListingOut {
                    page: listing.page(),
                    total_pages: result.total_pages(),
                    items: result.items(),
                })?;
            } else if result.items().is_empty() {
                println!("no characters found");
            } else {
                for record in result.items() {
                    print_character(record);
                }
                println!("page {} of {}", listing.page(), result.total_pages());
            }
        }
        Commands::Show { id } => {
            let detail = system
                .pipeline
                .character_detail(*id, &cancel)
                .await
                .with_context(|| format!("loading character {id}"))?;
            let favorite = system.favorites.is_favorite(*id).await?;
            if cli.json {
                print_json(&detail)?;
            } else {
                let c = &detail.character;
                println!("name: {}{}", c.name, if favorite { " *" } else { "" });
                println!("status: {:?}", c.status);
                println!("species: {}", c.species);
                println!("gender: {:?}", c.gender);
                println!("origin: {}", c.origin.name);
                println!("location: {}", c.location.name);
                if !detail.neighbors.is_empty() {
                    println!("from the same origin:");
                    for neighbor in &detail.neighbors {
                        print_character(neighbor);
                    }
                }
            }
        }
        Commands::Favorites { command } => match command {
            FavoriteCommands::List => {
                let favorites: Vec<FavoriteSnapshot> =
                    system.favorites.snapshot().await?.into_values().collect();
                if cli.json {
                    print_json(&favorites)?;
                } else if favorites.is_empty() {
                    println!("no favorites");
                } else {
                    for f in &favorites {
                        println!("{}\t{}\t{}", f.id, f.name, f.species);
                    }
                }
            }
            FavoriteCommands::Toggle { id } => {
                let record = system
                    .catalog
                    .character(*id)
                    .await
                    .with_context(|| format!("loading character {id}"))?;
                let added = system.favorites.toggle(&record).await?;
                if cli.json {
                    print_json(serde_json::json!({ "id": id, "favorite": added }))?;
                } else if added {
                    println!("added {} to favorites", record.name);
                } else {
                    println!("removed {} from favorites", record.name);
                }
            }
            FavoriteCommands::Clear => {
                system.favorites.clear().await?;
                if cli.json {
                    print_json(serde_json::json!({ "cleared": true }))?;
                } else {
                    println!("favorites cleared");
                }
            }
        },
    }
    Ok(())
}
