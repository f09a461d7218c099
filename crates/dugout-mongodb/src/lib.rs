//! MongoDB walkthrough for dugout
//!
//! Connects to an Azure Cosmos DB (API for MongoDB) account, or any MongoDB
//! server, and runs a fixed insert / query / update / delete sequence against
//! the `player` collection.
//!
//! # Features
//! - Configuration from environment variables, credentials never embedded
//! - Fixed-deadline budgets for setup and for the operation sequence
//! - Typed records and free-form documents through one insert path
//! - Forward-only cursor that is released on every exit path

pub mod budget;
pub mod config;
pub mod connection;
pub mod cursor;
pub mod query;
pub mod record;
pub mod store;
pub mod walkthrough;

pub use budget::Budget;
pub use config::ConnectionConfig;
pub use connection::Connection;
pub use cursor::RecordCursor;
pub use dugout_common::{DugoutError, Result};
pub use query::{Filter, FindQuery, Update};
pub use record::{Player, PlayerDocument, Record, RecordDocument};
pub use store::{RecordStore, UpdateOutcome};
pub use walkthrough::{Walkthrough, WalkthroughReport};
