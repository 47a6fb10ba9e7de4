//! # luxorsdk
//!
//! A Rust SDK for the [Luxor](https://luxor.tech) mining pool's GraphQL API.
//!
//! The crate issues parameterized queries against the pool's authenticated
//! endpoint and normalizes the service's heterogeneous responses (numeric
//! strings, nullable counters, nested edge/node collections, timestamps in
//! an implicit fixed offset) into a stable typed result model.
//!
//! ## Quick Navigation
//!
//! | Module | Description | Common Use Cases |
//! |--------|-------------|------------------|
//! | [`http`] | Authenticated GraphQL client | Subaccount, worker and payout queries |
//! | [`types`] | Canonical record types | Workers, hashrate series, transactions |
//! | [`error`] | Typed error kinds | Distinguishing transport from bad data |
//!
//! ## Features
//!
//! - All pool query operations: subaccounts, worker details, worker and
//!   subaccount hashrate histories, mining summaries, hashrate scores,
//!   transaction history, profile and pool hashrate
//! - Hash rate scaling across the full unit range (H up to ZH) in decimal
//!   arithmetic, no binary floating-point error accumulation
//! - Strict separation of absent data (documented defaults) from malformed
//!   data (typed hard errors)
//! - Pagination passthrough with the service's page-size conventions
//!
//! ## Getting Started
//!
//! ### Installation
//!
//! Add to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! luxorsdk = "0.1"
//! tokio = { version = "1", features = ["full"] }
//! anyhow = "1"
//! ```
//!
//! ### Your First Query
//!
//! ```no_run
//! use luxorsdk::{Client, HashRateUnit, MiningProfile, WorkerDetailsOptions};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Client::new(MiningProfile::Btc, HashRateUnit::Tera)
//!         .with_key(std::env::var("LUXOR_API_KEY")?);
//!
//!     let workers = client
//!         .worker_details("my-subaccount", WorkerDetailsOptions::default())
//!         .await?;
//!
//!     for worker in workers {
//!         println!("{}: {} TH/s ({})", worker.name, worker.hashrate, worker.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Hashrate Histories
//!
//! ```no_run
//! use luxorsdk::{
//!     Client, HashRateUnit, HashrateInterval, MiningProfile, Pagination,
//!     WorkerHashrateOptions,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = Client::new(MiningProfile::Btc, HashRateUnit::Tera)
//!     .with_key("your-api-key");
//!
//! let history = client
//!     .worker_hashrate_history(
//!         "my-subaccount",
//!         "rig-01",
//!         WorkerHashrateOptions {
//!             duration: HashrateInterval::OneDay,
//!             bucket: HashrateInterval::OneHour,
//!             coin: None,
//!             units: None,
//!             pagination: Pagination::default(),
//!         },
//!     )
//!     .await?;
//!
//! for point in history {
//!     println!("{}: {} TH/s over {} samples", point.time, point.hashrate, point.data_points);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture Decisions
//!
//! ### High-Precision Unit Scaling
//!
//! Raw hash rate readings arrive as arbitrary-precision decimal strings and
//! are scaled with [`rust_decimal::Decimal`]: divided by 1000 once per unit
//! step, rounding half-to-even at the type's 28-significant-digit limit. The
//! value is exported to `f64` exactly once, after the last division, so
//! converting a reading to a unit and back recovers the original figure to
//! decimal precision.
//!
//! ### Absent vs. Malformed
//!
//! The service omits counters and rates that are zero or unknown. An absent
//! field takes its documented default (0 for counters, 0.0 for rates); a
//! present-but-unparseable field is always a typed error
//! ([`Error::InvalidNumericLiteral`], [`Error::InvalidTimestamp`]). The two
//! paths never mix, and a mapper either returns a complete sequence or fails
//! as a whole.
//!
//! ### Server Order Is Preserved
//!
//! Collections are returned in the exact order the service produced them
//! (e.g. most recent first for histories ordered by the query document). The
//! mappers never sort or deduplicate.
//!
//! ## Modules
//!
//! - [`http`]: the authenticated GraphQL client and all query entry points
//! - [`types`]: query parameter enums and canonical record types
//! - [`error`]: the crate's error enum

pub mod error;
pub mod http;
pub mod types;

mod coerce;
mod response;

pub use error::{Error, Result};
pub use http::Client;
pub use types::*;

/// Re-exported decimal type from rust_decimal.
///
/// Used for precise scaling of raw hash rate readings.
pub use rust_decimal::{Decimal, dec};
