pub mod store;
pub use store::{Store, StoreTx};
pub mod postgres;
pub use postgres::PgStore;

#[cfg(test)]
pub mod memory;
