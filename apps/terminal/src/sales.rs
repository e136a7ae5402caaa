//! Sales-staff menu: product price/stock edits and sales reports.
//!
//! The edits here are administrative and sit outside the checkout
//! transaction; checkout re-validates stock on its own connection, so an
//! edit can never drive a committed stock count negative.

use anyhow::Result;
use chrono::Utc;

use shopfront_core::{validation, Money, User};
use shopfront_db::repository::report::trailing_week_start;
use shopfront_db::Database;

use crate::prompt;

pub async fn sales_menu(db: &Database, user: &User) -> Result<()> {
    loop {
        println!("\n========= Sales Menu ({}) =========", user.name);
        println!("1. Update product price/stock");
        println!("2. Weekly sales report (last 7 days)");
        println!("3. Top products");
        println!("4. Logout");
        println!("===================================");

        match prompt::prompt("Please enter your choice: ")?.as_str() {
            "1" => update_product_flow(db).await?,
            "2" => weekly_report(db).await?,
            "3" => top_products(db).await?,
            "4" => {
                println!("\nSee you next time!");
                return Ok(());
            }
            _ => println!("\n[x] Invalid input! Please select 1-4."),
        }
    }
}

async fn update_product_flow(db: &Database) -> Result<()> {
    let product = loop {
        let Some(id) =
            prompt::prompt_parse_or_quit::<i64>("\nEnter product id to view/update (q to cancel): ")?
        else {
            println!("Cancelled.");
            return Ok(());
        };
        match db.products().get_by_id(id).await? {
            Some(product) => break product,
            None => println!("[x] No such product. Try another id."),
        }
    };

    println!("\nCurrent product info:");
    println!("Id:          {}", product.id);
    println!("Name:        {}", product.name);
    println!("Category:    {}", product.category);
    println!("Price:       {}", product.price());
    println!("Stock:       {}", product.stock);
    println!("Description: {}", product.description);

    // Price first, then stock; blank skips either edit.
    loop {
        let input = prompt::prompt("\nEnter new price (blank to skip, q to cancel): ")?;
        if input.is_empty() {
            break;
        }
        if input.eq_ignore_ascii_case("q") {
            println!("Cancelled.");
            return Ok(());
        }
        match Money::parse(&input) {
            Some(price) if validation::validate_price_cents(price.cents()).is_ok() => {
                db.products().set_price(product.id, price).await?;
                println!("[✓] Price updated to {price}.");
                break;
            }
            _ => println!("[x] Invalid price: enter a non-negative amount like 12.99."),
        }
    }

    loop {
        let input = prompt::prompt("Enter new stock (blank to skip, q to cancel): ")?;
        if input.is_empty() {
            break;
        }
        if input.eq_ignore_ascii_case("q") {
            println!("Cancelled.");
            return Ok(());
        }
        match input.parse::<i64>() {
            Ok(stock) if validation::validate_stock(stock).is_ok() => {
                db.products().set_stock(product.id, stock).await?;
                println!("[✓] Stock updated to {stock}.");
                break;
            }
            _ => println!("[x] Invalid stock: enter a non-negative integer."),
        }
    }

    Ok(())
}

async fn weekly_report(db: &Database) -> Result<()> {
    let since = trailing_week_start(Utc::now());
    let metrics = db.reports().weekly_metrics(since).await?;

    println!("\n===== Weekly Sales Report (last 7 days inclusive) =====");
    println!("Distinct orders:          {}", metrics.orders);
    println!("Distinct products sold:   {}", metrics.products);
    println!("Distinct customers:       {}", metrics.customers);
    println!("Avg spend per customer:   {}", metrics.avg_per_customer());
    println!("Total sales:              {}", metrics.total_sales());
    Ok(())
}

async fn top_products(db: &Database) -> Result<()> {
    println!("\n===== Top by Distinct Orders (ties at rank 3 included) =====");
    let by_orders = db.reports().top_products_by_orders().await?;
    if by_orders.is_empty() {
        println!("(no data)");
    }
    for (place, rank) in by_orders.iter().enumerate() {
        println!(
            "{}. [{}] {}  orders={}",
            place + 1,
            rank.product_id,
            rank.name,
            rank.count
        );
    }

    println!("\n===== Top by Views (ties at rank 3 included) =====");
    let by_views = db.reports().top_products_by_views().await?;
    if by_views.is_empty() {
        println!("(no data)");
    }
    for (place, rank) in by_views.iter().enumerate() {
        println!(
            "{}. [{}] {}  views={}",
            place + 1,
            rank.product_id,
            rank.name,
            rank.count
        );
    }
    Ok(())
}
