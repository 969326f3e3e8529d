//! Time-domain scope core for a stream of I/Q samples.
//!
//! A producer thread feeds blocks into a [`ScopeProcessor`]; a render thread takes
//! snapshots through a [`ScopeView`] and receives [`ScopeFrame`]s with plot geometry
//! and axis labels ready for any 2D renderer.
pub mod scope;
pub use scope::*;
