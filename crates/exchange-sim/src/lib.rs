//! Exchange Simulator
//!
//! A scriptable in-memory implementation of the exchange port for
//! integration tests and dry runs. Snapshots are set by the test
//! harness; order commands mutate a plain in-memory book.

pub mod sim;

pub use sim::SimExchange;
