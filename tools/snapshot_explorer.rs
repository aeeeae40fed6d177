use std::env;
use std::process;

use mediashelf::app::data::CatalogKind;
use mediashelf::app::filters::{SortKey, ViewState};
use mediashelf::app::loader::{fetch_snapshot, SnapshotSource};
use mediashelf::app::ui::home::catalog_totals;
use mediashelf::config::load_config;

fn usage() -> ! {
    eprintln!(
        "Usage: cargo run --bin snapshot_explorer <movies|tvshows|music> [limit] \
         [--sort title|artist|size|date] [--desc] [--query text] [--source dir-or-url]"
    );
    process::exit(1);
}

fn flag_value(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1).cloned())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let Some(kind) = args.get(1).and_then(|a| CatalogKind::from_str(a)) else {
        usage();
    };
    let limit: usize = match args.get(2) {
        Some(a) if !a.starts_with("--") => a.parse().unwrap_or(10),
        _ => 10,
    };

    let raw_source = flag_value(&args, "--source").unwrap_or_else(|| load_config().data_source);
    let source = SnapshotSource::from_config(&raw_source);
    println!("Reading {}", source.location(kind));

    let catalog = match fetch_snapshot(&source, kind) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("load failed: {e}");
            process::exit(2);
        }
    };

    for (label, value) in catalog_totals(&catalog) {
        println!("{label:>16}: {value}");
    }

    let mut state = ViewState::new(kind);
    if let Some(key) = flag_value(&args, "--sort").as_deref().and_then(SortKey::from_str) {
        if SortKey::options(kind).contains(&key) {
            state.key = key;
        } else {
            eprintln!("sort key `{}` does not apply to {}", key.as_str(), kind.label());
        }
    }
    if args.iter().any(|a| a == "--desc") {
        state.direction = state.direction.flipped();
    }
    if let Some(q) = flag_value(&args, "--query") {
        state.set_query(&q.trim().to_lowercase());
    }

    let order = state.derive(&catalog);
    println!(
        "\n{} of {} entries, sorted by {} {}",
        order.len(),
        catalog.len(),
        state.key.label(),
        state.key.arrow(state.direction)
    );
    for (n, &idx) in order.iter().take(limit).enumerate() {
        println!(
            "{:>4}. {:<48} {:>6} {:>12}",
            n + 1,
            catalog.primary_name(idx),
            catalog.date_key(idx),
            catalog.size_human(idx)
        );
    }
}
