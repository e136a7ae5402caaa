//! # shopfront-core: Pure Domain Logic for the Shopfront
//!
//! This crate is the heart of the storefront. It holds the typed records,
//! the integer-cents money type, the domain errors and the input
//! validators, all as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Shopfront Architecture                       │
//! │                                                                 │
//! │  apps/terminal ── prompts, menus, rendering                    │
//! │        │                                                        │
//! │        ▼                                                        │
//! │  shopfront-db ── SQLite stores + the checkout transaction      │
//! │        │                                                        │
//! │        ▼                                                        │
//! │  ★ shopfront-core (THIS CRATE) ★                               │
//! │    types • money • errors • validation                         │
//! │    NO I/O • NO DATABASE • PURE FUNCTIONS                       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure functions**: same input, same output. Nothing in here touches
//!    a database, the clock, or the filesystem.
//! 2. **Integer money**: all monetary values are cents (`i64`) to avoid
//!    float errors.
//! 3. **Explicit errors**: all failures are typed enum variants, never
//!    strings or panics.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{DomainError, DomainResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity a single cart line may carry.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;
