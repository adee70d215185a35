//! Coordr - classic concurrency coordination scenarios
//!
//! Three coordinators built on tokio: a ring of agents sharing neighbouring
//! resources without deadlock, a bounded producer/consumer pipeline that
//! drops on overflow and shuts down on a failure threshold, and a single
//! server draining a bounded waiting room with backpressure.

pub mod config;
pub mod coordination;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod ring;
pub mod service;

pub use error::{CoordError, Result};
