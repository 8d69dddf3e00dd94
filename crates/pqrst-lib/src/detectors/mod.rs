pub mod pqrst;
pub mod rpeaks;
pub mod subpeaks;
pub mod window;

pub use pqrst::*;
