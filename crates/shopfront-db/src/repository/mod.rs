//! # Repository Module
//!
//! Database repository implementations for the shopfront.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Terminal flow                                                         │
//! │       │                                                                 │
//! │       │  db.orders().place_order(&key, address)                        │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  OrderRepository                                                       │
//! │  ├── place_order(&self, key, shipping_address)                         │
//! │  ├── get_order_details(&self, order_number)                            │
//! │  └── get_orders_for_customer(&self, customer_id)                       │
//! │       │                                                                 │
//! │       │  SQL on a pooled connection (one transaction for checkout)     │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog reads and administrative edits
//! - [`cart::CartRepository`] - Per-session cart lines
//! - [`order::OrderRepository`] - The checkout transaction and order reads
//! - [`session::SessionRepository`] - Sessions and the activity log
//! - [`customer::CustomerRepository`] - Accounts and registration
//! - [`report::ReportRepository`] - Sales metrics

pub mod cart;
pub mod customer;
pub mod order;
pub mod product;
pub mod report;
pub mod session;
