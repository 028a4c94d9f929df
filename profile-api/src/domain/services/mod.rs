mod avatar;
mod profile;

pub use avatar::AvatarProcessor;
pub use profile::ProfileServiceImpl;
