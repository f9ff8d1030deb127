//! pretty-term - Animated Terminal Text
//!
//! Styled, live-updating text elements for character terminals: progress
//! bars, spinners, countdown timers, task lists, and background tasks that
//! report their own status. All animations share one serialized render
//! surface, so concurrent elements and plain prints never garble each
//! other's output.
//!
//! # Architecture
//!
//! ```text
//! caller ──start_*()──▶ AnimationManager
//!                            │ allocates state, spawns render task
//!                            ▼
//!                       render task ──every tick──▶ frame renderer
//!                            │                          │
//!                    handle mutations              frame lines
//!                    (thread-safe)                      │
//!                            ▼                          ▼
//!                      shared state  ─────────▶  RenderSurface
//!                                                (one writer at a time,
//!                                                 in-place redraw)
//! ```
//!
//! # Key Types
//!
//! - [`AnimationManager`]: starts animations and serializes their output
//! - [`ProgressHandle`], [`SpinnerHandle`], [`TimerHandle`],
//!   [`TaskListHandle`], [`TaskHandle`]: thread-safe control of a running
//!   animation
//! - [`RenderSurface`]: the shared terminal sink with in-place redraw
//! - [`text`]: escape-aware length, truncation, and padding helpers
//!
//! # Quick Start
//!
//! ```ignore
//! use pretty_term::{AnimationManager, SpinnerStyle};
//!
//! #[tokio::main]
//! async fn main() {
//!     let manager = AnimationManager::new();
//!
//!     let spinner = manager.start_spinner("resolving dependencies", SpinnerStyle::Dots);
//!     // ... work ...
//!     spinner.complete("dependencies resolved");
//!     spinner.wait().await;
//!
//!     manager.shutdown();
//! }
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod animation;
pub mod style;
pub mod surface;
pub mod term;
pub mod text;

pub use animation::handle::{
    ProgressHandle, SpinnerHandle, StatusUpdater, TaskHandle, TaskListHandle, TimerHandle,
};
pub use animation::manager::{
    AnimationManager, AnimationManagerConfig, CompletionCallback, ProgressSupplier,
};
pub use animation::{AnimationId, Outcome, Phase, SpinnerTone, TaskItem, TaskStatus};
pub use style::{ProgressStyle, Rgb, SpinnerStyle, RESET};
pub use surface::{FrameSlot, RenderSurface, SurfaceError};
pub use term::{is_ansi_supported, terminal_width, FALLBACK_WIDTH};
