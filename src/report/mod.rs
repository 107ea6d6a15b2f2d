//! Report module - process-wide diagnostic log

mod logger;

pub use logger::{debug, error, info, init_logging, warning};
