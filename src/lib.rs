pub mod aoj_icpc;
pub mod atcoder;
pub mod category;
mod error;
pub mod participants;
pub mod problem_set;
pub mod render;
pub mod sampler;

pub use error::{Error, Result};
