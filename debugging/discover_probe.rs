//! Call one service operation against the live API and print the result as JSON.
//! Usage:
//!   cargo run --bin discover_probe -- featured [all|movies|shows]
//!   cargo run --bin discover_probe -- trending [all|movies|shows] [page]
//!   cargo run --bin discover_probe -- airing [all|movies|shows] [timezone]
//!   cargo run --bin discover_probe -- movie|tv <tmdb_id>
//!   cargo run --bin discover_probe -- season <tmdb_id> <season_number>
//!   cargo run --bin discover_probe -- related <movie|tv> <tmdb_id>
//!   cargo run --bin discover_probe -- reviews <movie|tv> <tmdb_id> [page]
//!   cargo run --bin discover_probe -- providers <movie|tv> <tmdb_id> [region]
//!   cargo run --bin discover_probe -- search <query> [all|movies|shows] [page]
//!   cargo run --bin discover_probe -- lists
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{anyhow, Context, Result};
use cinedex::cache::MemoryCache;
use cinedex::config::Config;
use cinedex::images::ImageUrls;
use cinedex::tmdb::TmdbClient;
use cinedex::transform::Transformer;
use cinedex::{MediaKind, MediaService, Scope};
use dotenvy::dotenv;
use serde::Serialize;
use std::env;
use std::sync::Arc;

fn usage() -> ! {
    eprintln!("Usage: cargo run --bin discover_probe -- <featured|trending|airing> [scope] [page|timezone]");
    eprintln!("       cargo run --bin discover_probe -- <movie|tv> <tmdb_id>");
    eprintln!("       cargo run --bin discover_probe -- season <tmdb_id> <season_number>");
    eprintln!("       cargo run --bin discover_probe -- <related|reviews|providers> <movie|tv> <tmdb_id> [page|region]");
    eprintln!("       cargo run --bin discover_probe -- search <query> [scope] [page]");
    eprintln!("       cargo run --bin discover_probe -- lists");
    std::process::exit(1);
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn arg<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str> {
    args.get(i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing {}", name))
}

fn scope_arg(args: &[String], i: usize) -> Result<Scope> {
    match args.get(i) {
        Some(s) => Ok(s.parse()?),
        None => Ok(Scope::All),
    }
}

fn id_arg(args: &[String], i: usize) -> Result<i64> {
    arg(args, i, "tmdb_id")?
        .parse()
        .context("tmdb_id must be an integer")
}

fn page_arg(args: &[String], i: usize) -> Result<u32> {
    match args.get(i) {
        Some(p) => p.parse().context("page must be a positive integer"),
        None => Ok(1),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let config = Config::from_env()?;
    let service = MediaService::new(
        Arc::new(TmdbClient::new(&config.tmdb)?),
        Arc::new(MemoryCache::new()),
        Transformer::new(ImageUrls::new(&config.app_url)),
    )
    .with_default_timezone(config.default_timezone);

    match args[1].as_str() {
        "featured" => print(&service.get_featured(scope_arg(&args, 2)?).await),
        "trending" => {
            let page = page_arg(&args, 3)?;
            print(&service.get_trending_page(scope_arg(&args, 2)?, page).await)
        }
        "airing" => {
            let tz = args.get(3).map(String::as_str);
            print(&service.get_airing(scope_arg(&args, 2)?, tz).await)
        }
        "movie" => print(&service.get_movie_details(id_arg(&args, 2)?).await),
        "tv" => print(&service.get_show_details(id_arg(&args, 2)?).await),
        "season" => {
            let number: i32 = arg(&args, 3, "season number")?
                .parse()
                .context("season number must be an integer")?;
            print(&service.get_season(id_arg(&args, 2)?, number).await?)
        }
        "related" => {
            let kind: MediaKind = arg(&args, 2, "media kind")?.parse()?;
            print(&service.get_related(kind, id_arg(&args, 3)?).await?)
        }
        "reviews" => {
            let kind: MediaKind = arg(&args, 2, "media kind")?.parse()?;
            let page = page_arg(&args, 4)?;
            print(&service.get_reviews(kind, id_arg(&args, 3)?, page).await?)
        }
        "providers" => {
            let kind: MediaKind = arg(&args, 2, "media kind")?.parse()?;
            let region = args.get(4).map(String::as_str);
            print(&service.get_watch_providers(kind, id_arg(&args, 3)?, region).await?)
        }
        "search" => {
            let query = arg(&args, 2, "query")?;
            let page = page_arg(&args, 4)?;
            print(&service.search(query, scope_arg(&args, 3)?, page).await?)
        }
        "lists" => print(&service.get_curated_lists().await),
        _ => usage(),
    }
}
