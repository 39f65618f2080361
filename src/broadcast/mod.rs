//! Fan-out of frames to connected streaming clients.

pub mod frame;
pub mod registry;

pub use frame::Frame;
pub use registry::{ClientChannel, ClientRegistry};
