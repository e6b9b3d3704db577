pub mod camera;
pub mod error;
pub mod notification;
pub mod state;
pub mod transform;
