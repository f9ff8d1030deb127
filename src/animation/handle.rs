//! Animation Handles
//!
//! The caller-facing side of each animation: cheap clonable wrappers around
//! the shared state cell. Every mutator takes the cell lock for the
//! duration of the mutation and returns immediately; the render task picks
//! up the change on its next tick.
//!
//! All terminal mutators are idempotent. After an animation has reached a
//! terminal state, further mutations are silent no-ops (logged at debug).

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::animation::{
    clamp_progress, AnimationCell, Outcome, ProgressState, SpinnerState, SpinnerTone,
    TaskListState, TaskState, TaskStatus, TimerState, MAX_DETAIL_LINES,
};

/// Handle to a running progress bar.
#[derive(Clone)]
pub struct ProgressHandle {
    cell: Arc<AnimationCell<ProgressState>>,
}

impl ProgressHandle {
    pub(crate) fn new(cell: Arc<AnimationCell<ProgressState>>) -> Self {
        Self { cell }
    }

    /// Set the fraction complete. Values outside `[0, 1]` are clamped.
    pub fn update(&self, progress: f64) {
        if !self.cell.update_live(|inner| {
            inner.state.progress = clamp_progress(progress);
        }) {
            debug!(id = %self.cell.id, "progress update ignored after terminal state");
        }
    }

    /// Replace the message shown next to the bar.
    pub fn message(&self, message: impl Into<String>) {
        let message = message.into();
        if !self.cell.update_live(|inner| inner.message = message) {
            debug!(id = %self.cell.id, "message update ignored after terminal state");
        }
    }

    /// Finish successfully with a final message.
    pub fn complete(&self, message: impl Into<String>) {
        self.cell.terminalize(Outcome::Success(message.into()));
    }

    /// Finish with a failure message.
    pub fn fail(&self, message: impl Into<String>) {
        self.cell.terminalize(Outcome::Failure(message.into()));
    }

    /// Whether the bar is still accepting updates.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.cell.is_live()
    }

    /// Wait until the final frame has been written.
    pub async fn wait(&self) {
        self.cell.wait_done().await;
    }
}

/// Handle to a running spinner.
#[derive(Clone)]
pub struct SpinnerHandle {
    cell: Arc<AnimationCell<SpinnerState>>,
}

impl SpinnerHandle {
    pub(crate) fn new(cell: Arc<AnimationCell<SpinnerState>>) -> Self {
        Self { cell }
    }

    /// Replace the spinner message.
    pub fn update(&self, message: impl Into<String>) {
        let message = message.into();
        if !self.cell.update_live(|inner| {
            inner.message = message;
            inner.state.tone = SpinnerTone::Normal;
        }) {
            debug!(id = %self.cell.id, "spinner update ignored after terminal state");
        }
    }

    /// Show an informational message without stopping the spinner.
    pub fn info(&self, message: impl Into<String>) {
        let message = message.into();
        self.cell.update_live(|inner| {
            inner.message = message;
            inner.state.tone = SpinnerTone::Info;
        });
    }

    /// Show a warning message without stopping the spinner.
    pub fn warning(&self, message: impl Into<String>) {
        let message = message.into();
        self.cell.update_live(|inner| {
            inner.message = message;
            inner.state.tone = SpinnerTone::Warning;
        });
    }

    /// Finish successfully with a final message.
    pub fn complete(&self, message: impl Into<String>) {
        self.cell.terminalize(Outcome::Success(message.into()));
    }

    /// Finish with a failure message.
    pub fn fail(&self, message: impl Into<String>) {
        self.cell.terminalize(Outcome::Failure(message.into()));
    }

    /// Stop the spinner without declaring success or failure. The current
    /// message becomes the final frame.
    pub fn stop(&self) {
        let message = self.cell.lock().message.clone();
        self.cell.terminalize(Outcome::Cancelled(message));
    }

    /// Whether the spinner is still accepting updates.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.cell.is_live()
    }

    /// Wait until the final frame has been written.
    pub async fn wait(&self) {
        self.cell.wait_done().await;
    }
}

/// Handle to a running countdown timer.
#[derive(Clone)]
pub struct TimerHandle {
    cell: Arc<AnimationCell<TimerState>>,
}

impl TimerHandle {
    pub(crate) fn new(cell: Arc<AnimationCell<TimerState>>) -> Self {
        Self { cell }
    }

    /// Freeze the countdown; the clock keeps rendering but stops moving.
    pub fn pause(&self) {
        self.cell.update_live(|inner| inner.state.paused = true);
    }

    /// Resume a paused countdown.
    pub fn resume(&self) {
        self.cell.update_live(|inner| inner.state.paused = false);
    }

    /// Extend the countdown by `extra`.
    pub fn add_time(&self, extra: Duration) {
        self.cell
            .update_live(|inner| inner.state.remaining += extra);
    }

    /// Replace the message shown next to the clock.
    pub fn message(&self, message: impl Into<String>) {
        let message = message.into();
        self.cell.update_live(|inner| inner.message = message);
    }

    /// Time left on the countdown.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.cell.lock().state.remaining
    }

    /// Stop the countdown before it expires.
    pub fn cancel(&self, final_message: impl Into<String>) {
        self.cell
            .terminalize(Outcome::Cancelled(final_message.into()));
    }

    /// Whether the countdown is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.cell.is_live()
    }

    /// Wait until the countdown has expired or been cancelled.
    pub async fn wait(&self) {
        self.cell.wait_done().await;
    }
}

/// Handle to a running task list.
#[derive(Clone)]
pub struct TaskListHandle {
    cell: Arc<AnimationCell<TaskListState>>,
}

impl TaskListHandle {
    pub(crate) fn new(cell: Arc<AnimationCell<TaskListState>>) -> Self {
        Self { cell }
    }

    /// Set the status of the task at `index`. Out-of-range indices are
    /// ignored with a debug log.
    pub fn set_status(&self, index: usize, status: TaskStatus) {
        self.cell.update_live(|inner| {
            if let Some(task) = inner.state.tasks.get_mut(index) {
                task.status = status;
            } else {
                debug!(index, "task index out of range; status update ignored");
            }
        });
    }

    /// Mark the task at `index` as in progress.
    pub fn mark_in_progress(&self, index: usize) {
        self.set_status(index, TaskStatus::InProgress);
    }

    /// Mark the task at `index` as complete.
    pub fn mark_complete(&self, index: usize) {
        self.set_status(index, TaskStatus::Complete);
    }

    /// Mark the task at `index` as failed.
    pub fn mark_failed(&self, index: usize) {
        self.set_status(index, TaskStatus::Failed);
    }

    /// Finish the list successfully with a summary message.
    pub fn complete(&self, message: impl Into<String>) {
        self.cell.terminalize(Outcome::Success(message.into()));
    }

    /// Finish the list with a failure message.
    pub fn fail(&self, message: impl Into<String>) {
        self.cell.terminalize(Outcome::Failure(message.into()));
    }

    /// Whether the list is still accepting updates.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.cell.is_live()
    }

    /// Wait until the final frame has been written.
    pub async fn wait(&self) {
        self.cell.wait_done().await;
    }
}

/// Handle to a task running its own body in the background.
///
/// Unlike the other handles this one has no terminal mutators: the outcome
/// is decided by the body's return value. Cancellation is cooperative.
#[derive(Clone)]
pub struct TaskHandle {
    cell: Arc<AnimationCell<TaskState>>,
}

impl TaskHandle {
    pub(crate) fn new(cell: Arc<AnimationCell<TaskState>>) -> Self {
        Self { cell }
    }

    /// Whether the task body is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.cell.is_live()
    }

    /// Request cooperative cancellation. Returns whether the request was
    /// newly registered; the body decides when (and whether) to stop.
    pub fn cancel(&self) -> bool {
        let mut inner = self.cell.lock();
        if !inner.phase.is_live() || inner.cancel_requested {
            return false;
        }
        inner.cancel_requested = true;
        true
    }

    /// Wait until the task has finished.
    pub async fn wait(&self) {
        self.cell.wait_done().await;
    }
}

/// Status reporter passed into a task body.
///
/// The body calls these to drive its own animation: status text, optional
/// progress, scrolling detail lines, and the cancellation check.
pub struct StatusUpdater {
    cell: Arc<AnimationCell<TaskState>>,
}

impl StatusUpdater {
    pub(crate) fn new(cell: Arc<AnimationCell<TaskState>>) -> Self {
        Self { cell }
    }

    /// Replace the status line.
    pub fn status(&self, message: impl Into<String>) -> &Self {
        let message = message.into();
        self.cell.update_live(|inner| inner.message = message);
        self
    }

    /// Report fractional progress; enables the inline progress bar.
    pub fn progress(&self, progress: f64) -> &Self {
        self.cell
            .update_live(|inner| inner.state.progress = Some(clamp_progress(progress)));
        self
    }

    /// Append a detail line beneath the status. Only the most recent few
    /// lines are kept; older ones roll off.
    pub fn detail(&self, line: impl Into<String>) -> &Self {
        let line = line.into();
        self.cell.update_live(|inner| {
            inner.state.details.push(line);
            if inner.state.details.len() > MAX_DETAIL_LINES {
                inner.state.details.remove(0);
            }
        });
        self
    }

    /// Whether cancellation has been requested. A cooperative body should
    /// poll this at convenient points and return early when set.
    #[must_use]
    pub fn is_cancellation_requested(&self) -> bool {
        self.cell.lock().cancel_requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationId;
    use crate::style::{ProgressStyle, SpinnerStyle};

    fn progress_cell() -> Arc<AnimationCell<ProgressState>> {
        AnimationCell::new(
            AnimationId(1),
            "work",
            ProgressState {
                progress: 0.0,
                indeterminate: false,
                bar_width: 22,
                style: ProgressStyle::Block,
            },
        )
    }

    #[test]
    fn test_progress_update_clamps() {
        let cell = progress_cell();
        let handle = ProgressHandle::new(cell.clone());
        handle.update(1.7);
        assert_eq!(cell.lock().state.progress, 1.0);
        handle.update(-2.0);
        assert_eq!(cell.lock().state.progress, 0.0);
    }

    #[test]
    fn test_progress_complete_then_update_is_noop() {
        let cell = progress_cell();
        let handle = ProgressHandle::new(cell.clone());
        handle.update(0.4);
        handle.complete("done");
        handle.update(0.9);
        handle.fail("too late");

        let inner = cell.lock();
        assert_eq!(inner.state.progress, 0.4);
        assert_eq!(inner.outcome, Some(Outcome::Success("done".to_string())));
    }

    #[test]
    fn test_spinner_stop_keeps_current_message() {
        let cell = AnimationCell::new(
            AnimationId(2),
            "thinking",
            SpinnerState {
                style: SpinnerStyle::Dots,
                tone: SpinnerTone::Normal,
            },
        );
        let handle = SpinnerHandle::new(cell.clone());
        handle.update("still thinking");
        handle.stop();
        assert_eq!(
            cell.lock().outcome,
            Some(Outcome::Cancelled("still thinking".to_string()))
        );
    }

    #[test]
    fn test_spinner_warning_sets_tone_without_stopping() {
        let cell = AnimationCell::new(
            AnimationId(3),
            "working",
            SpinnerState {
                style: SpinnerStyle::Dots,
                tone: SpinnerTone::Normal,
            },
        );
        let handle = SpinnerHandle::new(cell.clone());
        handle.warning("disk almost full");
        let inner = cell.lock();
        assert_eq!(inner.state.tone, SpinnerTone::Warning);
        assert_eq!(inner.message, "disk almost full");
        assert!(inner.phase.is_live());
    }

    #[test]
    fn test_timer_pause_and_add_time() {
        let cell = AnimationCell::new(
            AnimationId(4),
            "deadline",
            TimerState {
                remaining: Duration::from_secs(10),
                paused: false,
            },
        );
        let handle = TimerHandle::new(cell.clone());
        handle.pause();
        assert!(cell.lock().state.paused);
        handle.add_time(Duration::from_secs(5));
        assert_eq!(handle.remaining(), Duration::from_secs(15));
        handle.resume();
        assert!(!cell.lock().state.paused);
    }

    #[test]
    fn test_task_list_out_of_range_ignored() {
        let cell = AnimationCell::new(
            AnimationId(5),
            "steps",
            TaskListState {
                tasks: vec![crate::animation::TaskItem::pending("one")],
                spinner: SpinnerStyle::Dots,
            },
        );
        let handle = TaskListHandle::new(cell.clone());
        handle.mark_complete(0);
        handle.mark_failed(7);
        let inner = cell.lock();
        assert_eq!(inner.state.tasks[0].status, TaskStatus::Complete);
        assert_eq!(inner.state.tasks.len(), 1);
    }

    #[test]
    fn test_task_cancel_once() {
        let cell = AnimationCell::new(
            AnimationId(6),
            "job",
            TaskState {
                progress: None,
                details: Vec::new(),
            },
        );
        let handle = TaskHandle::new(cell.clone());
        assert!(handle.cancel());
        assert!(!handle.cancel());
        assert!(cell.lock().cancel_requested);
    }

    #[test]
    fn test_status_updater_detail_cap() {
        let cell = AnimationCell::new(
            AnimationId(7),
            "job",
            TaskState {
                progress: None,
                details: Vec::new(),
            },
        );
        let updater = StatusUpdater::new(cell.clone());
        for i in 0..8 {
            updater.detail(format!("line {i}"));
        }
        let inner = cell.lock();
        assert_eq!(inner.state.details.len(), MAX_DETAIL_LINES);
        assert_eq!(inner.state.details.first().unwrap(), "line 4");
        assert_eq!(inner.state.details.last().unwrap(), "line 7");
    }

    #[test]
    fn test_status_updater_chains() {
        let cell = AnimationCell::new(
            AnimationId(8),
            "job",
            TaskState {
                progress: None,
                details: Vec::new(),
            },
        );
        let updater = StatusUpdater::new(cell.clone());
        updater.status("compiling").progress(0.25).detail("crate a");
        let inner = cell.lock();
        assert_eq!(inner.message, "compiling");
        assert_eq!(inner.state.progress, Some(0.25));
        assert_eq!(inner.state.details, vec!["crate a".to_string()]);
    }
}
