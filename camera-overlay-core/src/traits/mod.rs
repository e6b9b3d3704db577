pub mod camera_device;
pub mod camera_provider;
pub mod delegate;
pub mod display_host;
pub mod notifier;
pub mod probe;
pub mod settings_store;
