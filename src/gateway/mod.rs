//! Gateway entry points: the builder and the completion service façade.

mod builder;
mod service;

pub use builder::{Traingate, TraingateBuilder};
pub use service::CompletionService;
