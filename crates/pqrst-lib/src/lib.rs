pub mod config;
pub mod detectors;
pub mod error;
pub mod io;
pub mod metrics;
pub mod signal;

pub use config::*;
pub use detectors::*;
pub use error::*;
pub use metrics::*;
pub use signal::*;
