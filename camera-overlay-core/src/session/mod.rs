pub mod lock;
pub mod manager;
pub mod probe;
pub mod size;
