pub mod device;
pub mod document;
pub mod health;

pub use device::*;
pub use document::*;
pub use health::*;
