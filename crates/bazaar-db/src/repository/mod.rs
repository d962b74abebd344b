//! # Repository Module
//!
//! Database repository implementations for Bazaar Commerce.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Checkout / admin endpoint                                             │
//! │       │                                                                 │
//! │       │  db.discounts().find_coupon("SAVE30")                          │
//! │       │  ↓                                                              │
//! │       ▼                                                                 │
//! │  DiscountRepository                                                    │
//! │  ├── find_coupon(&self, code)                                          │
//! │  ├── find_product_discounts(&self, product_id)                         │
//! │  └── find_category_discounts(&self, category_id)                       │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  The old one-manager-class-per-table layout collapses into these       │
//! │  read/write contracts; SQL is isolated in one place per concern.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Product catalog reads and writes
//! - [`category::CategoryRepository`] - Category reads and writes
//! - [`discount::DiscountRepository`] - The discount catalog (three kinds)
//! - [`usage::UsageLedger`] - Coupon usage counting and atomic recording
//! - [`order::OrderRepository`] - Order and order item persistence

pub mod category;
pub mod discount;
pub mod order;
pub mod product;
pub mod usage;
