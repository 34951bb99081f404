pub mod logging;
pub mod resource;
pub mod time;

// Re-exported so the logging macros resolve `log` through this crate.
pub use log;

pub use logging::Profile;
pub use resource::{change_extension, FsResources, MemoryResources, ResourceError, ResourceLoader};
pub use time::{Clock, ClockError};
