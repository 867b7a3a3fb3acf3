mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use fridgenote::analyzer::delivery::online_services;
use fridgenote::analyzer::location::{
    directions_url, filter_stores, store_distance_km, walking_minutes,
};
use fridgenote::capture::ocr::NoOcr;
use fridgenote::capture::{capture_image, manual_entry, OcrProvider, RemoteOcrProvider};
use fridgenote::config::{load_or_default, AppConfig, StorageBackend};
use fridgenote::export::{export_file_name, export_list};
use fridgenote::model::{NewShoppingList, ShoppingItem, StorageError};
use fridgenote::service::{NearbyQuery, ShoppingService};
use fridgenote::storage::{seed_if_empty, MemStorage, SqliteStorage, Storage};
use fridgenote::{ListObserver, ListSession};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Logs every propagated change of the organised list.
struct RouteLogger;

impl ListObserver for RouteLogger {
    fn list_updated(&self, items: &[ShoppingItem]) {
        info!("Route updated: {} items", items.len());
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    std::panic::set_hook(Box::new(|panic_info| {
        error!("Panic occurred: {:?}", panic_info);
    }));

    let config = match load_or_default(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let taxonomy = match config.taxonomy() {
        Ok(t) => Arc::new(t),
        Err(e) => {
            error!("Taxonomy error: {}", e);
            return;
        }
    };

    let storage = match open_storage(&config) {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {:?}", e);
            return;
        }
    };

    let service = ShoppingService::new(storage, taxonomy);

    let result = match cli.command {
        Commands::Organise {
            text,
            file,
            image,
            export,
            save,
            moves,
        } => {
            organise(&service, &config, text, file.as_deref(), image.as_deref(), export.as_deref(), save, &moves)
                .await
        }
        Commands::Lists { id, delete } => lists(&service, id, delete).await,
        Commands::Stores { nearby, search } => stores(&service, &config, nearby, search).await,
        Commands::Compare { text, online } => compare(&service, &text, online).await,
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn open_storage(config: &AppConfig) -> Result<Box<dyn Storage>, StorageError> {
    let mut storage: Box<dyn Storage> = match config.storage {
        StorageBackend::Memory => Box::new(MemStorage::new()),
        StorageBackend::Sqlite => Box::new(SqliteStorage::new(&config.database_path)?),
    };
    seed_if_empty(storage.as_mut())?;
    Ok(storage)
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[allow(clippy::too_many_arguments)]
async fn organise(
    service: &ShoppingService,
    config: &AppConfig,
    text: Option<String>,
    file: Option<&Path>,
    image: Option<&Path>,
    export: Option<&Path>,
    save: Option<String>,
    moves: &[String],
) -> CliResult {
    let mut session = ListSession::new(service.taxonomy());
    session.subscribe(Arc::new(RouteLogger));

    let mut typed = text.unwrap_or_default();
    if let Some(path) = file {
        typed.push('\n');
        typed.push_str(&fs::read_to_string(path)?);
    }
    session.append(manual_entry(&typed));
    if let Some(path) = image {
        let bytes = fs::read(path)?;
        let provider: Box<dyn OcrProvider> = match &config.ocr.endpoint {
            Some(endpoint) => Box::new(RemoteOcrProvider::new(
                endpoint.clone(),
                config.ocr.timeout_seconds,
            )?),
            None => {
                warn!("No OCR endpoint configured");
                Box::new(NoOcr)
            }
        };
        session.append(capture_image(provider.as_ref(), &bytes, &config.ocr).await);
    }

    for entry in moves {
        let Some((item_text, category)) = entry.split_once('=') else {
            warn!("Ignoring move '{}', expected \"item=Category\"", entry);
            continue;
        };
        let id = session
            .items()
            .iter()
            .find(|i| i.text.eq_ignore_ascii_case(item_text.trim()))
            .map(|i| i.id.clone());
        match id {
            Some(id) => session.move_to_category(&id, category.trim())?,
            None => warn!("No item '{}' to move", item_text.trim()),
        }
    }

    if session.items().is_empty() {
        info!("No items to organise");
        return Ok(());
    }

    let rendered = export_list(session.items(), session.taxonomy());
    println!("{}", rendered);

    if let Some(dir) = export {
        fs::create_dir_all(dir)?;
        let path = dir.join(export_file_name(chrono::Local::now().date_naive()));
        fs::write(&path, &rendered)?;
        info!("Exported list to {}", path.display());
    }

    if let Some(name) = save {
        let list = service
            .create_list(NewShoppingList {
                name,
                items: session.items().to_vec(),
            })
            .await?;
        println!("\nSaved as list #{}", list.id);
    }

    Ok(())
}

async fn lists(service: &ShoppingService, id: Option<i64>, delete: Option<i64>) -> CliResult {
    if let Some(id) = delete {
        service.delete_list(id).await?;
        println!("Deleted list #{}", id);
        return Ok(());
    }

    if let Some(id) = id {
        let session = service.open_session(id).await?;
        let (done, total) = session.progress();
        println!("{}\n\n{}/{} done", export_list(session.items(), session.taxonomy()), done, total);
        return Ok(());
    }

    let saved = service.lists().await?;
    if saved.is_empty() {
        println!("No saved lists.");
    }
    for list in saved {
        println!(
            "#{} {} ({} items, {})",
            list.id,
            list.name,
            list.items.len(),
            list.created_at.format("%Y-%m-%d")
        );
    }
    Ok(())
}

async fn stores(
    service: &ShoppingService,
    config: &AppConfig,
    nearby: bool,
    search: Option<String>,
) -> CliResult {
    let near = match (nearby, config.home) {
        (true, Some(home)) => Some(NearbyQuery {
            latitude: home.latitude,
            longitude: home.longitude,
            radius_km: config.search_radius_km,
        }),
        (true, None) => {
            warn!("No home location configured, listing all stores");
            None
        }
        (false, _) => None,
    };

    let found = service.stores(near).await?;
    let shown = filter_stores(&found, search.as_deref().unwrap_or(""));
    if shown.is_empty() {
        println!("No stores found.");
    }

    for store in shown {
        println!("{} [{}]\n  {}\n  {}", store.name, store.chain, store.address, store.opening_hours);
        if let Some(home) = config.home {
            let km = store_distance_km(store, home.latitude, home.longitude);
            println!("  {:.1} km, ~{} min walk", km, walking_minutes(km));
        }
        println!("  {}", directions_url(store));
    }
    Ok(())
}

async fn compare(service: &ShoppingService, text: &str, online: bool) -> CliResult {
    let items = manual_entry(text);
    let comparison = service.compare(&items).await?;

    for m in &comparison.matches {
        match m.best {
            Some((chain, price)) => {
                println!("{} -> {}: best £{:.2} at {}", m.item.text, m.product.name, price, chain.name())
            }
            None => println!("{} -> {}: no prices", m.item.text, m.product.name),
        }
    }
    println!();
    for (chain, total) in &comparison.totals {
        println!("{:<12} £{:.2}", chain.name(), total);
    }
    if let Some((chain, _)) = comparison.cheapest {
        println!("\nCheapest: {} (save £{:.2})", chain.name(), comparison.savings);
    }

    if online {
        println!();
        for shop in online_services() {
            let status = if shop.meets_minimum(&items) { "ok" } else { "below minimum" };
            println!(
                "{}: ~£{:.2} + £{:.2} delivery ({}) {}",
                shop.name,
                shop.estimated_total(&items),
                shop.delivery_fee,
                status,
                shop.url
            );
        }
    }
    Ok(())
}
