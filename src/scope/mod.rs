// src/scope/mod.rs
pub mod buffer;
pub mod config;
pub mod error;
pub mod mapper;
pub mod pipeline;
pub mod plot;
pub mod processor;
pub mod sample;
pub mod source;
pub mod view;
pub mod viewport;
pub use buffer::{AutoScale, SampleBuffer, Snapshot};
pub use config::{ScopeConfig, TimeWindow};
pub use error::ScopeError;
pub use mapper::{GridLine, Orientation, PlotArea, PlotMapper, Tick, Trace, TraceChannel};
pub use pipeline::{join_worker, spawn_producer, RefreshLoop, ViewCommand};
pub use plot::{render_frame_png, PlotStyle};
pub use processor::ScopeProcessor;
pub use sample::{ChannelSet, ComplexSample, DisplayMode};
pub use source::{IqSource, ManualSource, SimulatedOokSource};
pub use view::{ScopeFrame, ScopeView};
pub use viewport::Viewport;
