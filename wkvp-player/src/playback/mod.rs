//! Playback engine modules
//!
//! Leaves first: the clock tracker classifies media position updates, the
//! timeline answers sorted range queries, the scheduler decides what is due,
//! the lifecycle manager renders and retires visuals, the progress
//! coordinator persists position, and the session ties them together.

pub mod clock;
pub mod lifecycle;
pub mod progress;
pub mod scheduler;
pub mod session;
pub mod timeline;

pub use clock::{ClockTracker, ClockTransition};
pub use lifecycle::OverlayLifecycle;
pub use progress::ProgressCoordinator;
pub use scheduler::OverlayScheduler;
pub use timeline::OverlayTimeline;
