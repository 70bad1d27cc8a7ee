// Windows probes. Every function has a non-Windows fallback so the rest of
// the crate builds and tests everywhere.

pub mod event_log;
pub mod file_version;
pub mod gpu;
pub mod registry;

pub use event_log::query_application_errors;
pub use file_version::get_file_version;
pub use gpu::{get_video_controllers, VideoController};
pub use registry::hardware_scheduling_enabled;
