#[cfg(feature = "debug-hooks")]
pub mod debug;
pub mod health;
pub mod public;
pub mod sse;
