//! Customer menu: catalog browsing, cart management, checkout and order
//! history.
//!
//! Every business decision (stock checks, cart collapsing, the checkout
//! transaction) happens in shopfront-db and comes back as a typed result;
//! this module prompts, retries on invalid input and renders.

use anyhow::Result;

use shopfront_core::{validation, CartMode, DomainError, Money, SessionKey, User};
use shopfront_db::{Database, StoreError};

use crate::prompt;

const SEARCH_LIMIT: u32 = 50;

pub async fn customer_menu(db: &Database, user: &User, key: &SessionKey) -> Result<()> {
    loop {
        println!("\n========= Store Menu ({}) =========", user.name);
        println!("1. Search products");
        println!("2. View product details");
        println!("3. Manage cart");
        println!("4. Checkout");
        println!("5. Order history");
        println!("6. Logout");
        println!("===================================");

        match prompt::prompt("Please enter your choice: ")?.as_str() {
            "1" => search_products(db, key).await?,
            "2" => view_product(db, key).await?,
            "3" => manage_cart(db, key).await?,
            "4" => checkout(db, key).await?,
            "5" => order_history(db, key).await?,
            "6" => {
                println!("\nSee you next time!");
                return Ok(());
            }
            _ => println!("\n[x] Invalid input! Please select 1-6."),
        }
    }
}

async fn search_products(db: &Database, key: &SessionKey) -> Result<()> {
    let query = loop {
        let input = prompt::prompt("\nEnter keywords: ")?;
        match validation::validate_search_query(&input) {
            Ok(query) => break query,
            Err(err) => println!("[x] {err}"),
        }
    };

    let products = db.products().search(&query, SEARCH_LIMIT).await?;
    db.sessions().record_search(key, &query).await?;

    if products.is_empty() {
        println!("\nNo products matched '{query}'.");
        return Ok(());
    }

    println!("\n{:>5}  {:<30} {:<15} {:>10} {:>7}", "id", "name", "category", "price", "stock");
    for p in &products {
        println!(
            "{:>5}  {:<30} {:<15} {:>10} {:>7}",
            p.id,
            p.name,
            p.category,
            p.price().to_string(),
            p.stock
        );
    }
    Ok(())
}

async fn view_product(db: &Database, key: &SessionKey) -> Result<()> {
    let id: i64 = prompt::prompt_parse("\nEnter product id: ")?;

    let Some(product) = db.products().get_by_id(id).await? else {
        println!("\n[x] No product with id {id}.");
        return Ok(());
    };
    db.sessions().record_product_view(key, id).await?;

    println!("\n----- Product {} -----", product.id);
    println!("Name:        {}", product.name);
    println!("Category:    {}", product.category);
    println!("Price:       {}", product.price());
    println!("In stock:    {}", product.stock);
    println!("Description: {}", product.description);
    Ok(())
}

async fn manage_cart(db: &Database, key: &SessionKey) -> Result<()> {
    loop {
        render_cart(db, key).await?;

        println!("\na. Add product   s. Set quantity   r. Remove product");
        println!("c. Clear cart    b. Back");

        match prompt::prompt("Please enter your choice: ")?.as_str() {
            "a" => mutate_line(db, key, CartMode::Add).await?,
            "s" => mutate_line(db, key, CartMode::Set).await?,
            "r" => {
                let id: i64 = prompt::prompt_parse("Enter product id to remove: ")?;
                db.carts().remove_line(key, id).await?;
                println!("Removed (if it was in the cart).");
            }
            "c" => {
                db.carts().clear(key).await?;
                println!("Cart cleared.");
            }
            "b" => return Ok(()),
            _ => println!("\n[x] Invalid input! Please select a, s, r, c or b."),
        }
    }
}

async fn render_cart(db: &Database, key: &SessionKey) -> Result<()> {
    let lines = db.carts().list_lines(key).await?;

    if lines.is_empty() {
        println!("\nYour cart is empty.");
        return Ok(());
    }

    println!("\n{:>5}  {:<30} {:>10} {:>5} {:>7} {:>10}", "id", "name", "price", "qty", "stock", "total");
    let mut total = Money::zero();
    for line in &lines {
        total += line.line_total();
        println!(
            "{:>5}  {:<30} {:>10} {:>5} {:>7} {:>10}",
            line.product_id,
            line.name,
            line.unit_price().to_string(),
            line.quantity,
            line.available_stock,
            line.line_total().to_string()
        );
    }
    println!("{:>72}", format!("Cart total: {total}"));
    Ok(())
}

/// Prompts for a product and quantity, then applies one cart mutation.
async fn mutate_line(db: &Database, key: &SessionKey, mode: CartMode) -> Result<()> {
    let id: i64 = prompt::prompt_parse("Enter product id: ")?;
    let quantity = loop {
        let qty: i64 = prompt::prompt_parse("Enter quantity (0 removes the line): ")?;
        match validation::validate_quantity(qty) {
            Ok(()) => break qty,
            Err(err) => println!("[x] {err}"),
        }
    };

    match db.carts().upsert_line(key, id, quantity, mode).await {
        Ok(0) => println!("Line removed from cart."),
        Ok(new_quantity) => println!("[✓] Cart updated: quantity is now {new_quantity}."),
        Err(StoreError::Domain(DomainError::ProductNotFound(id))) => {
            println!("[x] No product with id {id}.");
        }
        Err(StoreError::Domain(DomainError::CartStockExceeded {
            available,
            requested,
            ..
        })) => {
            println!("[x] Not enough stock: {available} available, cart would need {requested}.");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn checkout(db: &Database, key: &SessionKey) -> Result<()> {
    render_cart(db, key).await?;

    let address = loop {
        let input = prompt::prompt("\nEnter shipping address (or blank to cancel): ")?;
        if input.is_empty() {
            println!("Checkout cancelled.");
            return Ok(());
        }
        match validation::validate_shipping_address(&input) {
            Ok(()) => break input,
            Err(err) => println!("[x] {err}"),
        }
    };

    match db.orders().place_order(key, &address).await {
        Ok(order_number) => {
            println!("\n[✓] Order #{order_number} placed. Thank you!");
        }
        Err(StoreError::Domain(DomainError::EmptyCart)) => {
            println!("\n[x] Your cart is empty.");
        }
        Err(StoreError::Domain(DomainError::InsufficientStock {
            product_id,
            available,
            requested,
        })) => {
            println!(
                "\n[x] Not enough stock for product {product_id}: {available} available, {requested} requested."
            );
            println!("[x] Checkout cancelled; nothing was charged and your cart is unchanged.");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}

async fn order_history(db: &Database, key: &SessionKey) -> Result<()> {
    let orders = db.orders().get_orders_for_customer(key.customer_id).await?;

    if orders.is_empty() {
        println!("\nYou have not placed any orders yet.");
        return Ok(());
    }

    println!("\n{:>7}  {:<22} {:>10}  {}", "order", "placed at", "total", "ship to");
    for order in &orders {
        println!(
            "{:>7}  {:<22} {:>10}  {}",
            order.order_number,
            order.placed_at.format("%Y-%m-%d %H:%M:%S"),
            order.total().to_string(),
            order.shipping_address
        );
    }

    let input = prompt::prompt("\nEnter an order number for details (blank to go back): ")?;
    if input.is_empty() {
        return Ok(());
    }
    let Ok(order_number) = input.parse::<i64>() else {
        println!("[x] Not an order number.");
        return Ok(());
    };

    match db.orders().get_order_details(order_number).await {
        Ok(details) => {
            println!("\n----- Order #{order_number} -----");
            println!("{:<30} {:<15} {:>5} {:>10} {:>10}", "product", "category", "qty", "price", "total");
            let mut total = Money::zero();
            for d in &details {
                total += d.line_total();
                println!(
                    "{:<30} {:<15} {:>5} {:>10} {:>10}",
                    d.product_name,
                    d.category,
                    d.quantity,
                    d.unit_price().to_string(),
                    d.line_total().to_string()
                );
            }
            println!("{:>74}", format!("Order total: {total}"));
        }
        Err(StoreError::Domain(DomainError::OrderNotFound(n))) => {
            println!("[x] No order #{n}.");
        }
        Err(err) => return Err(err.into()),
    }
    Ok(())
}
