mod avatar;
mod ids;
mod profile;

pub use avatar::*;
pub use ids::*;
pub use profile::*;
