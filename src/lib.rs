//! Liquid glass refraction effect over live host content.
//!
//! The pipeline has three decoupled workers around a shared core:
//!
//! - a capture scheduler that periodically snapshots the background
//!   behind the element into a padded region, with hysteresis so small
//!   movements reuse the cached region ([`capture`]),
//! - a position tracker that reconstructs the element's sub-pixel
//!   screen position every frame ([`tracking`]),
//! - a render loop on a dedicated thread that uploads the latest
//!   capture and draws the refraction shader at the display rate
//!   ([`rendering`]).
//!
//! Captures travel through a single-slot handoff ([`scene::SceneSlot`]):
//! the renderer only ever sees the newest scene, and a slow consumer
//! never blocks the capture side. [`view::LiquidGlassView`] is the
//! host-facing facade that wires everything to the surface lifecycle.

pub mod capture;
pub mod config;
pub mod error;
pub mod geometry;
pub mod host;
pub mod rendering;
pub mod scene;
pub mod state;
pub mod task;
pub mod tracking;
pub mod view;

pub use capture::CaptureScheduler;
pub use config::GlassConfig;
pub use error::{GlassError, GlassResult};
pub use geometry::Rect;
pub use host::{PositionSource, SnapshotSource};
pub use scene::{CapturedScene, SceneSlot};
pub use state::{SharedViewState, ViewState};
pub use tracking::PositionTracker;
pub use view::LiquidGlassView;
