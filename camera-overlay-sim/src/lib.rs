//! # camera-overlay-sim
//!
//! Deterministic simulated backend for camera-overlay-kit.
//!
//! Provides:
//! - `SimCamera` — in-memory camera service with fault injection
//! - `SimDisplay` — in-memory display/window system with screen power
//!   and viewport simulation
//! - `RecordingNotifier` — notification recorder
//! - `MemorySettings` — in-memory settings store
//!
//! Camera and display events are delivered from two separate dispatcher
//! threads, matching the threading shape of real platforms. Integration
//! tests drive the core's lifecycle against this backend.

pub mod camera;
pub mod dispatcher;
pub mod display;
pub mod notifier;
pub mod settings;

pub use camera::{FixedProbe, SimCamera, SimCameraSpec};
pub use dispatcher::EventDispatcher;
pub use display::SimDisplay;
pub use notifier::RecordingNotifier;
pub use settings::MemorySettings;
