//! # Seed Data Generator
//!
//! Populates the product table with development data.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p inventory-db --bin seed
//!
//! # Generate custom amount into a specific file
//! cargo run -p inventory-db --bin seed -- --count 1000 --db ./data/inventory.db
//! ```
//!
//! Each product gets a manufacturer, a SKU of the form `{MFR}-{LINE}-{NNNN}`,
//! a 12-digit UPC, a price between 1.99 and 49.98 and a stock level between
//! 0 and 250, so the ranking has plenty of ties to break.

use inventory_core::{Money, Product};
use inventory_db::{Database, DbConfig};
use std::env;

/// Manufacturers and their product lines.
const CATALOG: &[(&str, &[&str])] = &[
    (
        "Acme",
        &["Widget", "Sprocket", "Anvil", "Rocket Skates", "Giant Magnet"],
    ),
    (
        "Globex",
        &["Flux Capacitor", "Hover Board", "Heat Lamp", "Desk Fan"],
    ),
    (
        "Initech",
        &["Stapler", "Label Maker", "Paper Tray", "Cable Ties", "Toner"],
    ),
    (
        "Umbrella",
        &["First Aid Kit", "Face Mask", "Hand Gel", "Thermometer"],
    ),
    (
        "Stark",
        &["Work Light", "Drill", "Socket Set", "Tape Measure", "Level"],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./inventory.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(count);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Inventory Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./inventory.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Inventory Seed Data Generator");
    println!("=============================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected, migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!("Generating products...");

    let repo = db.products();
    let start = std::time::Instant::now();
    let mut generated = 0;

    for seed in 0..count {
        let product = generate_product(seed);

        if let Err(e) = repo.insert(&product).await {
            eprintln!("Failed to insert {}: {}", product.sku, e);
            continue;
        }

        generated += 1;
        if generated % 50 == 0 {
            println!("  Generated {} products...", generated);
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);

    println!();
    println!("Current top 10:");
    for product in repo.top_n(10).await? {
        println!(
            "  {:>5}  {:<28} {:>8}",
            product.quantity_on_hand,
            product.product_name,
            product.price_per_unit.to_string()
        );
    }

    db.close().await;
    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates one deterministic product for `seed`.
fn generate_product(seed: usize) -> Product {
    let (manufacturer, lines) = CATALOG[seed % CATALOG.len()];
    let line = lines[(seed / CATALOG.len()) % lines.len()];

    let code: String = manufacturer.chars().take(3).collect::<String>().to_uppercase();
    let line_code: String = line
        .split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .to_uppercase();

    Product {
        product_id: 0,
        manufacturer: manufacturer.to_string(),
        sku: format!("{}-{}-{:04}", code, line_code, seed),
        upc: format!("0{:011}", 10_000_000 + seed * 7919),
        price_per_unit: Money::from_cents(199 + ((seed * 37) % 4800) as i64),
        quantity_on_hand: ((seed * 53) % 251) as i64,
        product_name: format!("{} Mk{}", line, seed / (CATALOG.len() * 5) + 1),
    }
}
