//! # Domain Types
//!
//! Core domain types used throughout the shopfront.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │     Order       │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  order_number   │   │  line_number    │       │
//! │  │  price_cents    │   │  placed_at      │   │  quantity       │       │
//! │  │  stock          │   │  shipping_addr  │   │  price captured │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   SessionKey    │   │    CartLine     │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  customer_id    │   │  quantity > 0   │   │  id             │       │
//! │  │  session_number │   │  joined view    │   │  role           │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Pattern
//! Entities are keyed by small integers assigned application-side
//! (max + 1). Order numbers are dense and monotonic; session numbers
//! count up per customer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Accounts
// =============================================================================

/// Account role: drives which terminal menu a login lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Shops: browses the catalog, fills a cart, places orders.
    Customer,
    /// Edits product price/stock and reads sales reports.
    Sales,
}

impl Role {
    /// Lowercase name as stored in the database.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Sales => "sales",
        }
    }
}

/// A login account joined with its display name.
///
/// The stored password is plain text and is compared verbatim at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,

    /// Customer name for customers, "Sales" for sales staff.
    pub name: String,

    pub role: Role,

    /// Stored password (plain text, compared verbatim).
    pub password: String,
}

// =============================================================================
// Sessions
// =============================================================================

/// Identity of one shopping visit: scopes the cart and any order placed
/// during the visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey {
    pub customer_id: i64,
    pub session_number: i64,
}

impl SessionKey {
    pub const fn new(customer_id: i64, session_number: i64) -> Self {
        SessionKey {
            customer_id,
            session_number,
        }
    }
}

/// One shopping visit. `ended_at` stays `None` until logout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Session {
    pub customer_id: i64,
    pub session_number: i64,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Session {
    /// The key other operations use to scope themselves to this visit.
    #[inline]
    pub fn key(&self) -> SessionKey {
        SessionKey::new(self.customer_id, self.session_number)
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// A product available for sale.
///
/// `stock` is the single source of truth for availability; it is mutated
/// only by the administrative stock edit and by order placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier, stable for the life of the product.
    pub id: i64,

    /// Display name shown in listings and receipts.
    pub name: String,

    pub category: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units available to sell. Never negative in any committed state.
    pub stock: i64,

    pub description: String,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether `quantity` units could be sold right now.
    #[inline]
    pub fn can_supply(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// How a cart mutation combines with an existing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartMode {
    /// New quantity = existing + requested (inserts if absent).
    Add,
    /// New quantity = requested, replacing whatever was there.
    Set,
}

/// One cart line joined with its product, as rendered to the shopper.
///
/// A line only exists while its quantity is positive; `available_stock`
/// is the product's current stock at read time, shown so the shopper can
/// see a line that has gone stale before checkout rejects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CartLine {
    pub product_id: i64,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub available_stock: i64,
}

impl CartLine {
    /// Returns the current unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total at the current catalog price (carts do not freeze
    /// prices; only order lines do).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().times(self.quantity)
    }
}

// =============================================================================
// Orders
// =============================================================================

/// An order header. Created exactly once per successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
    /// Unique, monotonically assigned (max existing + 1).
    pub order_number: i64,

    pub customer_id: i64,
    pub session_number: i64,
    pub placed_at: DateTime<Utc>,

    /// Stored verbatim as entered; never interpreted.
    pub shipping_address: String,
}

/// One product entry within an order.
///
/// Uses the snapshot pattern: `unit_price_cents` is the catalog price
/// frozen at checkout and is immutable thereafter, decoupled from later
/// catalog price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub order_number: i64,

    /// 1-based and dense within an order, assigned in cart listing order.
    pub line_number: i64,

    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl OrderLine {
    /// Returns the captured unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total at the captured price.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().times(self.quantity)
    }
}

/// One order line joined with its product, as rendered on a receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLineDetail {
    pub product_name: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl OrderLineDetail {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

/// One row in a customer's order history, with the total computed from
/// the order's lines at their captured prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderSummary {
    pub order_number: i64,
    pub placed_at: DateTime<Utc>,
    pub shipping_address: String,
    pub total_cents: i64,
}

impl OrderSummary {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Reporting
// =============================================================================

/// Aggregate sales metrics over a trailing window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyMetrics {
    /// Distinct orders placed in the window.
    pub orders: i64,

    /// Distinct products sold in the window.
    pub products: i64,

    /// Distinct customers who placed an order in the window.
    pub customers: i64,

    /// Sum of line totals at captured prices, in cents.
    pub total_sales_cents: i64,

    /// `total_sales_cents / customers`, zero when no customers ordered.
    pub avg_per_customer_cents: i64,
}

impl WeeklyMetrics {
    #[inline]
    pub fn total_sales(&self) -> Money {
        Money::from_cents(self.total_sales_cents)
    }

    #[inline]
    pub fn avg_per_customer(&self) -> Money {
        Money::from_cents(self.avg_per_customer_cents)
    }
}

/// One row of a top-products ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductRank {
    pub product_id: i64,
    pub name: String,

    /// Distinct orders or recorded views, depending on the ranking.
    pub count: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================
