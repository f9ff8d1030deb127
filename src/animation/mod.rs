//! Concurrent Animation Engine
//!
//! Handle-based live terminal elements: progress bars, spinners, countdown
//! timers, task lists, and live tasks. Each started animation owns a
//! private periodic render task; callers mutate shared state through a
//! thread-safe handle, and the next tick observes the mutation.
//!
//! # Lifecycle
//!
//! ```text
//! Created → Running → Completing → Terminal(Success | Failure | Cancelled)
//! ```
//!
//! A terminal mutator (`complete`, `fail`, `cancel`) moves the state to
//! Completing; the render task then writes exactly one final frame and
//! stops. No frame is ever written after Terminal, and mutators after
//! terminalization are silent no-ops.

pub mod handle;
pub mod manager;
pub mod renderer;

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use crate::style::{ProgressStyle, Rgb, SpinnerStyle};

/// Unique identifier for a running animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl std::fmt::Display for AnimationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "anim_{}", self.0)
    }
}

/// Lifecycle phase of an animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Allocated but not yet ticking
    Created,
    /// Render task is ticking
    Running,
    /// Terminal mutator accepted; one final frame still owed
    Completing,
    /// Finished; no further frames, mutators are no-ops
    Terminal,
}

impl Phase {
    /// Whether mutators are still accepted in this phase.
    #[must_use]
    pub fn is_live(self) -> bool {
        matches!(self, Self::Created | Self::Running)
    }

    /// Whether the animation has fully stopped.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal)
    }
}

/// Terminal outcome of an animation, with its final message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Finished successfully
    Success(String),
    /// Finished with an error
    Failure(String),
    /// Stopped before finishing
    Cancelled(String),
}

impl Outcome {
    /// The final message attached to this outcome.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Failure(m) | Self::Cancelled(m) => m,
        }
    }

    /// Status glyph for the final frame.
    #[must_use]
    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Success(_) => "✓",
            Self::Failure(_) => "✗",
            Self::Cancelled(_) => "⊘",
        }
    }

    /// Color for the final frame glyph.
    #[must_use]
    pub fn color(&self) -> Rgb {
        match self {
            Self::Success(_) => Rgb::SUCCESS,
            Self::Failure(_) => Rgb::FAILURE,
            Self::Cancelled(_) => Rgb::REMAINING,
        }
    }

    /// Whether this outcome is a success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Status of one entry in a task list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Not started yet
    Pending,
    /// Currently being worked on (rendered with a spinner glyph)
    InProgress,
    /// Finished successfully
    Complete,
    /// Finished with an error
    Failed,
}

/// One entry in a task list animation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    /// Display label for this entry
    pub label: String,
    /// Current status
    pub status: TaskStatus,
}

impl TaskItem {
    /// Create a pending entry.
    #[must_use]
    pub fn pending(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: TaskStatus::Pending,
        }
    }
}

/// Tone of a spinner, affecting its glyph color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpinnerTone {
    /// Regular activity
    #[default]
    Normal,
    /// Informational note
    Info,
    /// Something worth attention, but not fatal
    Warning,
}

/// Normalize a caller-supplied progress value into `[0, 1]`.
///
/// Out-of-range and non-finite values are clamped, never rejected:
/// animations run unattended and must not crash over bad input.
#[must_use]
pub(crate) fn clamp_progress(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

// ============================================================================
// Per-kind animation state
// ============================================================================

/// State for a progress bar animation.
#[derive(Debug)]
pub(crate) struct ProgressState {
    pub progress: f64,
    pub indeterminate: bool,
    pub bar_width: u16,
    pub style: ProgressStyle,
}

/// State for a spinner animation.
#[derive(Debug)]
pub(crate) struct SpinnerState {
    pub style: SpinnerStyle,
    pub tone: SpinnerTone,
}

/// State for a countdown timer animation.
#[derive(Debug)]
pub(crate) struct TimerState {
    pub remaining: std::time::Duration,
    pub paused: bool,
}

/// State for a task list animation.
#[derive(Debug)]
pub(crate) struct TaskListState {
    pub tasks: Vec<TaskItem>,
    pub spinner: SpinnerStyle,
}

/// State for a live task animation driven by a caller-supplied body.
#[derive(Debug)]
pub(crate) struct TaskState {
    pub progress: Option<f64>,
    pub details: Vec<String>,
}

/// Most detail lines a live task keeps; older lines roll off.
pub(crate) const MAX_DETAIL_LINES: usize = 4;

// ============================================================================
// Shared state cell
// ============================================================================

/// Mutable animation state shared between a handle and its render task.
#[derive(Debug)]
pub(crate) struct CellInner<S> {
    pub phase: Phase,
    pub message: String,
    pub tick: u64,
    pub cancel_requested: bool,
    pub outcome: Option<Outcome>,
    pub state: S,
}

impl<S> CellInner<S> {
    /// Accept a terminal outcome if still live. Idempotent: once an
    /// outcome has been accepted every later attempt is ignored.
    pub fn complete_with(&mut self, outcome: Outcome) -> bool {
        if !self.phase.is_live() {
            return false;
        }
        self.outcome = Some(outcome);
        self.phase = Phase::Completing;
        true
    }
}

/// The synchronized cell owning one animation's state.
///
/// Mutated by the caller thread (through a handle) and read by the render
/// task; the mutex is the only synchronization point between them.
#[derive(Debug)]
pub(crate) struct AnimationCell<S> {
    pub id: AnimationId,
    inner: Mutex<CellInner<S>>,
    done: Notify,
}

impl<S> AnimationCell<S> {
    pub fn new(id: AnimationId, message: impl Into<String>, state: S) -> Arc<Self> {
        Arc::new(Self {
            id,
            inner: Mutex::new(CellInner {
                phase: Phase::Created,
                message: message.into(),
                tick: 0,
                cancel_requested: false,
                outcome: None,
                state,
            }),
            done: Notify::new(),
        })
    }

    pub fn lock(&self) -> MutexGuard<'_, CellInner<S>> {
        self.inner.lock()
    }

    /// Run a mutation only while the animation is live. Returns whether it
    /// ran; ignored mutations are the post-terminal no-op contract.
    pub fn update_live(&self, f: impl FnOnce(&mut CellInner<S>)) -> bool {
        let mut inner = self.inner.lock();
        if !inner.phase.is_live() {
            return false;
        }
        f(&mut inner);
        true
    }

    /// Accept a terminal outcome if still live.
    pub fn terminalize(&self, outcome: Outcome) -> bool {
        self.inner.lock().complete_with(outcome)
    }

    /// Force the cell straight to Terminal without a final frame.
    ///
    /// Used by shutdown and by capacity refusal: the handle becomes inert
    /// and any cooperative body sees the cancel flag.
    pub fn force_terminal(&self) {
        {
            let mut inner = self.inner.lock();
            inner.cancel_requested = true;
            inner.phase = Phase::Terminal;
        }
        self.done.notify_waiters();
    }

    /// Whether mutators are still accepted.
    pub fn is_live(&self) -> bool {
        self.inner.lock().phase.is_live()
    }

    /// Wake everyone waiting on [`wait_done`](Self::wait_done).
    pub fn notify_done(&self) {
        self.done.notify_waiters();
    }

    /// Wait until the animation reaches Terminal.
    pub async fn wait_done(&self) {
        loop {
            let notified = self.done.notified();
            if self.inner.lock().phase.is_terminal() {
                return;
            }
            notified.await;
        }
    }
}
