//! Business-term producers.
//!
//! Each producer reads one business term from a parsed notice and returns
//! at most one release fragment. Producers are registered in a
//! [`ProducerRegistry`]; registration order is the order their fragments
//! are merged in.

mod config;
mod core;
mod handler;
pub mod producers;
mod types;

pub use config::create_default_registry;
pub use core::ProducerRegistry;
pub use handler::FragmentProducer;
pub use types::{entities, entity, ProducerContext};
