pub mod models;
pub mod ports;
pub mod services;

mod error;
mod validation;

pub use error::*;
pub use validation::*;
