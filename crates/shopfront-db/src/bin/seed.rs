//! # Seed Data Generator
//!
//! Populates a database with demo accounts and products for development.
//!
//! ## Usage
//! ```bash
//! # Seed the default ./store.db
//! cargo run -p shopfront-db --bin seed
//!
//! # Specify database path
//! cargo run -p shopfront-db --bin seed -- ./data/store.db
//! ```
//!
//! ## What It Creates
//! - A sales account (id printed on completion)
//! - A catalog of products across a handful of categories, with spread
//!   prices and stock levels
//!
//! Customers register themselves through the terminal.

use shopfront_core::Product;
use shopfront_db::{Database, DbConfig, StoreResult};

/// (category, name, price in cents, stock)
const PRODUCTS: &[(&str, &str, i64, i64)] = &[
    ("Beverages", "Orange Juice 1L", 349, 40),
    ("Beverages", "Cold Brew Coffee", 499, 25),
    ("Beverages", "Sparkling Water 6-pack", 579, 60),
    ("Beverages", "Green Tea Box", 429, 30),
    ("Beverages", "Lemonade 1L", 299, 0),
    ("Snacks", "Sea Salt Chips", 329, 50),
    ("Snacks", "Dark Chocolate Bar", 249, 80),
    ("Snacks", "Trail Mix 500g", 699, 35),
    ("Snacks", "Oat Cookies", 399, 20),
    ("Dairy", "Whole Milk 2L", 389, 45),
    ("Dairy", "Oat Milk 1L", 499, 30),
    ("Dairy", "Greek Yogurt 4-pack", 549, 25),
    ("Dairy", "Cheddar Block 400g", 799, 15),
    ("Pantry", "Spaghetti 500g", 219, 90),
    ("Pantry", "Basmati Rice 2kg", 1099, 40),
    ("Pantry", "Crushed Tomatoes", 189, 70),
    ("Pantry", "Olive Oil 750ml", 1299, 18),
    ("Household", "Dish Soap", 349, 55),
    ("Household", "Paper Towels 4-pack", 649, 3),
    ("Household", "Laundry Detergent", 1199, 22),
];

#[tokio::main]
async fn main() -> StoreResult<()> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "store.db".to_string());
    println!("Seeding {path}");

    let db = Database::connect(DbConfig::new(&path).create_if_missing(true)).await?;

    if db.products().count().await? > 0 {
        println!("Database already has products; nothing to do.");
        return Ok(());
    }

    let products = db.products();
    for (index, (category, name, price_cents, stock)) in PRODUCTS.iter().enumerate() {
        products
            .insert(&Product {
                id: index as i64 + 1,
                name: name.to_string(),
                category: category.to_string(),
                price_cents: *price_cents,
                stock: *stock,
                description: format!("{name} from the {category} aisle."),
            })
            .await?;
    }

    // One sales account so the staff menu is reachable out of the box.
    // Customers register themselves; sales staff are provisioned here.
    let max_id: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM users")
        .fetch_one(db.pool())
        .await?;
    let sales_id = max_id.unwrap_or(0) + 1;
    sqlx::query("INSERT INTO users (id, password, role) VALUES (?1, 'sales', 'sales')")
        .bind(sales_id)
        .execute(db.pool())
        .await?;

    println!(
        "Seeded {} products. Sales login: id {sales_id}, password 'sales'.",
        PRODUCTS.len()
    );

    db.close().await;
    Ok(())
}
