//! Animation Manager
//!
//! Owns the render surface and a bounded registry of running animations.
//! Every `start_*` call allocates a state cell, spawns a periodic render
//! task on the tokio runtime, and returns a handle immediately; the render
//! task ticks at a fixed interval, reads the cell, renders a frame, and
//! writes it through the shared surface.
//!
//! The registry is bounded: once `max_animations` render tasks are live,
//! further starts are refused with a warning and return an inert handle
//! rather than blocking or erroring. [`shutdown`](AnimationManager::shutdown)
//! force-terminates everything still running; it is the only way to stop an
//! animation that never reaches a natural terminal state.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, warn};

use crate::animation::handle::{
    ProgressHandle, SpinnerHandle, StatusUpdater, TaskHandle, TaskListHandle, TimerHandle,
};
use crate::animation::renderer::{self, RenderContext};
use crate::animation::{
    clamp_progress, AnimationCell, AnimationId, CellInner, Outcome, Phase, ProgressState,
    SpinnerState, SpinnerTone, TaskItem, TaskListState, TaskState, TimerState,
};
use crate::style::{ProgressStyle, SpinnerStyle};
use crate::surface::{FrameSlot, RenderSurface, SurfaceError};
use crate::term;

/// Polls the current fraction complete for a supplier-driven progress bar.
pub type ProgressSupplier = Box<dyn Fn() -> f64 + Send + 'static>;

/// Invoked once when an animation finishes successfully.
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// Tuning knobs for the animation manager.
#[derive(Debug, Clone)]
pub struct AnimationManagerConfig {
    /// Interval between render ticks.
    pub tick_interval: Duration,
    /// Maximum concurrently running animations; starts beyond this are
    /// refused with an inert handle.
    pub max_animations: usize,
    /// Fixed frame width; when unset the terminal is probed at each start.
    pub frame_width: Option<u16>,
}

impl Default for AnimationManagerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(100),
            max_animations: 16,
            frame_width: None,
        }
    }
}

/// Type-erased hook for force-terminating one animation at shutdown.
trait KillSwitch: Send + Sync {
    fn kill(&self);
}

impl<S: Send + 'static> KillSwitch for AnimationCell<S> {
    fn kill(&self) {
        self.force_terminal();
    }
}

struct Registration {
    kill: Arc<dyn KillSwitch>,
    task: JoinHandle<()>,
}

struct ManagerShared {
    config: AnimationManagerConfig,
    surface: Arc<RenderSurface>,
    registry: Mutex<HashMap<AnimationId, Registration>>,
    next_id: AtomicU64,
    shut_down: AtomicBool,
}

/// The central entry point: starts animations and serializes their output.
///
/// Cheap to clone; all clones share the surface and registry. Must be used
/// from within a tokio runtime, since each start spawns a render task.
#[derive(Clone)]
pub struct AnimationManager {
    shared: Arc<ManagerShared>,
}

/// What one render tick decided to do, computed under the cell lock and
/// executed after it is released.
enum Step {
    Draw(Vec<String>),
    Final(Vec<String>, bool),
    Skip,
    Stop,
}

fn final_step<S>(inner: &mut CellInner<S>, ctx: &RenderContext) -> Step {
    inner.phase = Phase::Terminal;
    let outcome = inner
        .outcome
        .clone()
        .unwrap_or_else(|| Outcome::Cancelled(inner.message.clone()));
    Step::Final(
        vec![renderer::outcome_line(&outcome, ctx)],
        outcome.is_success(),
    )
}

impl AnimationManager {
    /// Create a manager over stdout with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_surface(Arc::new(RenderSurface::stdout()), AnimationManagerConfig::default())
    }

    /// Create a manager over stdout with a custom configuration.
    #[must_use]
    pub fn with_config(config: AnimationManagerConfig) -> Self {
        Self::with_surface(Arc::new(RenderSurface::stdout()), config)
    }

    /// Create a manager over an explicit surface. This is how tests capture
    /// rendered output.
    #[must_use]
    pub fn with_surface(surface: Arc<RenderSurface>, config: AnimationManagerConfig) -> Self {
        Self {
            shared: Arc::new(ManagerShared {
                config,
                surface,
                registry: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                shut_down: AtomicBool::new(false),
            }),
        }
    }

    /// Start a determinate progress bar.
    ///
    /// When `supplier` is given it is polled every tick and drives the bar;
    /// reaching 1.0 completes the animation and fires `on_complete`. Without
    /// a supplier the bar only moves through
    /// [`ProgressHandle::update`].
    pub fn start_progress_bar(
        &self,
        bar_width: u16,
        style: ProgressStyle,
        message: impl Into<String>,
        supplier: Option<ProgressSupplier>,
        on_complete: Option<CompletionCallback>,
    ) -> ProgressHandle {
        let cell = self.new_cell(
            message,
            ProgressState {
                progress: 0.0,
                indeterminate: false,
                bar_width,
                style,
            },
        );
        self.launch(
            cell.clone(),
            move |inner| {
                if let Some(supplier) = &supplier {
                    let p = clamp_progress(supplier());
                    inner.state.progress = p;
                    if p >= 1.0 {
                        let message = inner.message.clone();
                        inner.complete_with(Outcome::Success(message));
                    }
                }
            },
            |inner, ctx| {
                vec![renderer::progress_line(
                    &inner.message,
                    inner.state.progress,
                    inner.state.bar_width,
                    inner.state.style,
                    ctx,
                )]
            },
            on_complete,
        );
        ProgressHandle::new(cell)
    }

    /// Start an indeterminate progress bar: a bouncing segment that runs
    /// until the handle terminalizes it.
    pub fn start_indeterminate_progress(
        &self,
        message: impl Into<String>,
        style: ProgressStyle,
    ) -> ProgressHandle {
        let cell = self.new_cell(
            message,
            ProgressState {
                progress: 0.0,
                indeterminate: true,
                bar_width: 22,
                style,
            },
        );
        self.launch(
            cell.clone(),
            |_inner| {},
            |inner, ctx| {
                vec![renderer::indeterminate_line(
                    &inner.message,
                    inner.tick,
                    inner.state.bar_width,
                    inner.state.style,
                    ctx,
                )]
            },
            None,
        );
        ProgressHandle::new(cell)
    }

    /// Start a spinner.
    pub fn start_spinner(
        &self,
        message: impl Into<String>,
        style: SpinnerStyle,
    ) -> SpinnerHandle {
        let cell = self.new_cell(
            message,
            SpinnerState {
                style,
                tone: SpinnerTone::Normal,
            },
        );
        self.launch(
            cell.clone(),
            |_inner| {},
            |inner, ctx| {
                vec![renderer::spinner_line(
                    &inner.message,
                    inner.state.style,
                    inner.state.tone,
                    inner.tick,
                    ctx,
                )]
            },
            None,
        );
        SpinnerHandle::new(cell)
    }

    /// Start a countdown from `seconds`.
    ///
    /// The clock decrements by one tick interval per unpaused tick, so the
    /// countdown is deterministic under tick delays. Reaching zero completes
    /// the animation and fires `on_complete`.
    pub fn start_countdown(
        &self,
        seconds: u64,
        message: impl Into<String>,
        on_complete: Option<CompletionCallback>,
    ) -> TimerHandle {
        let tick = self.shared.config.tick_interval;
        let cell = self.new_cell(
            message,
            TimerState {
                remaining: Duration::from_secs(seconds),
                paused: false,
            },
        );
        self.launch(
            cell.clone(),
            move |inner| {
                if !inner.state.paused {
                    inner.state.remaining = inner.state.remaining.saturating_sub(tick);
                    if inner.state.remaining.is_zero() {
                        let message = inner.message.clone();
                        inner.complete_with(Outcome::Success(message));
                    }
                }
            },
            |inner, ctx| {
                vec![renderer::timer_line(
                    &inner.message,
                    inner.state.remaining,
                    inner.state.paused,
                    ctx,
                )]
            },
            on_complete,
        );
        TimerHandle::new(cell)
    }

    /// Start a task list with all entries pending.
    pub fn start_task_list(
        &self,
        message: impl Into<String>,
        labels: impl IntoIterator<Item = impl Into<String>>,
    ) -> TaskListHandle {
        let cell = self.new_cell(
            message,
            TaskListState {
                tasks: labels.into_iter().map(TaskItem::pending).collect(),
                spinner: SpinnerStyle::Dots,
            },
        );
        self.launch(
            cell.clone(),
            |_inner| {},
            |inner, ctx| {
                renderer::task_list_lines(&inner.state.tasks, inner.state.spinner, inner.tick, ctx)
            },
            None,
        );
        TaskListHandle::new(cell)
    }

    /// Start a task whose body runs on a blocking worker thread.
    ///
    /// The body reports through the [`StatusUpdater`] and decides the
    /// outcome by its return value: `Ok` is success (or cancelled, if
    /// cancellation was requested and the body chose to stop), `Err` is
    /// failure, and a panic is caught and reported as failure.
    pub fn start_task<F>(&self, initial_message: impl Into<String>, body: F) -> TaskHandle
    where
        F: FnOnce(&StatusUpdater) -> anyhow::Result<()> + Send + 'static,
    {
        let cell = self.new_cell(
            initial_message,
            TaskState {
                progress: None,
                details: Vec::new(),
            },
        );
        self.launch(
            cell.clone(),
            |_inner| {},
            |inner, ctx| {
                renderer::task_lines(
                    &inner.message,
                    inner.state.progress,
                    &inner.state.details,
                    inner.tick,
                    ctx,
                )
            },
            None,
        );

        // A refused start leaves the cell terminal; never run the body then.
        if cell.is_live() {
            let body_cell = cell.clone();
            tokio::spawn(async move {
                let worker_cell = body_cell.clone();
                let result = tokio::task::spawn_blocking(move || {
                    let updater = StatusUpdater::new(worker_cell);
                    body(&updater)
                })
                .await;

                let (message, cancelled) = {
                    let inner = body_cell.lock();
                    (inner.message.clone(), inner.cancel_requested)
                };
                let outcome = match result {
                    Ok(Ok(())) if cancelled => Outcome::Cancelled(message),
                    Ok(Ok(())) => Outcome::Success(message),
                    Ok(Err(e)) => Outcome::Failure(e.to_string()),
                    Err(join_error) => {
                        error!(error = %join_error, "task body panicked");
                        Outcome::Failure(format!("{message}: task body panicked"))
                    }
                };
                body_cell.terminalize(outcome);
            });
        }

        TaskHandle::new(cell)
    }

    /// Print a plain line through the shared surface, serialized against
    /// all running animations.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] when the output stream is broken.
    pub fn write_line(&self, line: &str) -> Result<(), SurfaceError> {
        self.shared.surface.write_line(line)
    }

    /// Number of animations currently registered.
    #[must_use]
    pub fn active_count(&self) -> usize {
        let mut registry = self.shared.registry.lock();
        registry.retain(|_, registration| !registration.task.is_finished());
        registry.len()
    }

    /// Force-terminate every outstanding animation and refuse new starts.
    ///
    /// Outstanding handles become inert and cooperative task bodies observe
    /// a cancellation request; bodies that ignore it keep running on their
    /// worker thread, but nothing they do renders anymore.
    pub fn shutdown(&self) {
        self.shared.shut_down.store(true, Ordering::SeqCst);
        let drained: Vec<Registration> = {
            let mut registry = self.shared.registry.lock();
            registry.drain().map(|(_, r)| r).collect()
        };
        let count = drained.len();
        for registration in drained {
            registration.kill.kill();
            registration.task.abort();
        }
        debug!(count, "animation manager shut down");
    }

    fn new_cell<S>(&self, message: impl Into<String>, state: S) -> Arc<AnimationCell<S>> {
        let id = AnimationId(self.shared.next_id.fetch_add(1, Ordering::Relaxed));
        AnimationCell::new(id, message, state)
    }

    /// Spawn the periodic render task for `cell`, or refuse and leave the
    /// cell terminal when shut down or at capacity.
    fn launch<S, A, R>(
        &self,
        cell: Arc<AnimationCell<S>>,
        mut advance: A,
        render: R,
        on_success: Option<CompletionCallback>,
    ) where
        S: Send + 'static,
        A: FnMut(&mut CellInner<S>) + Send + 'static,
        R: Fn(&CellInner<S>, &RenderContext) -> Vec<String> + Send + 'static,
    {
        let shared = self.shared.clone();
        let id = cell.id;

        // One lock span covers the admission check, the spawn, and the
        // insert. A concurrent shutdown therefore either drains this
        // registration or makes this call refuse; a render task can never
        // be spawned without being registered, and concurrent starts
        // cannot overshoot the capacity bound.
        let mut registry = shared.registry.lock();
        registry.retain(|_, registration| !registration.task.is_finished());
        if shared.shut_down.load(Ordering::SeqCst) {
            drop(registry);
            warn!(%id, "animation refused: manager is shut down");
            cell.force_terminal();
            return;
        }
        if registry.len() >= shared.config.max_animations {
            drop(registry);
            warn!(
                %id,
                limit = shared.config.max_animations,
                "animation refused: too many concurrent animations"
            );
            cell.force_terminal();
            return;
        }

        cell.lock().phase = Phase::Running;

        let ctx = RenderContext::new(
            shared.config.frame_width.unwrap_or_else(term::terminal_width),
            shared.surface.is_ansi(),
        );
        let tick_interval = shared.config.tick_interval;
        let task_cell = cell.clone();
        let task_shared = shared.clone();
        let mut on_success = on_success;

        let task = tokio::spawn(async move {
            let mut slot = FrameSlot::new();
            let mut interval = tokio::time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                // Decide under the lock, write after releasing it.
                let step = {
                    let mut inner = task_cell.lock();
                    match inner.phase {
                        Phase::Terminal => Step::Stop,
                        Phase::Completing => final_step(&mut inner, &ctx),
                        Phase::Created | Phase::Running => {
                            advance(&mut inner);
                            if inner.phase.is_live() {
                                match catch_unwind(AssertUnwindSafe(|| render(&inner, &ctx))) {
                                    Ok(frame) => {
                                        inner.tick += 1;
                                        Step::Draw(frame)
                                    }
                                    // A bad frame skips this tick and keeps
                                    // the previous frame visible; it must
                                    // not kill the render task.
                                    Err(_) => {
                                        error!(id = %task_cell.id, "frame renderer panicked; keeping previous frame");
                                        Step::Skip
                                    }
                                }
                            } else {
                                final_step(&mut inner, &ctx)
                            }
                        }
                    }
                };

                match step {
                    Step::Draw(frame) => task_shared.surface.write_frame(&mut slot, &frame),
                    Step::Final(frame, success) => {
                        task_shared.surface.write_frame(&mut slot, &frame);
                        if success {
                            if let Some(callback) = on_success.take() {
                                callback();
                            }
                        }
                        break;
                    }
                    Step::Skip => {}
                    Step::Stop => break,
                }
            }

            task_cell.notify_done();
            // Blocks until the insert below has released the registry, so
            // self-removal can never precede registration.
            task_shared.registry.lock().remove(&task_cell.id);
            debug!(id = %task_cell.id, "render task finished");
        });

        registry.insert(id, Registration { kill: cell, task });
    }
}

impl Default for AnimationManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::atomic::AtomicUsize;

    /// Shared capture buffer usable as a surface writer.
    #[derive(Clone, Default)]
    struct CaptureBuf(Arc<Mutex<Vec<u8>>>);

    impl CaptureBuf {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl Write for CaptureBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture_manager(max_animations: usize) -> (AnimationManager, CaptureBuf) {
        let buf = CaptureBuf::default();
        // Append mode keeps the captured output free of cursor movement.
        let surface = Arc::new(RenderSurface::new(Box::new(buf.clone()), false));
        let manager = AnimationManager::with_surface(
            surface,
            AnimationManagerConfig {
                tick_interval: Duration::from_millis(5),
                max_animations,
                frame_width: Some(60),
            },
        );
        (manager, buf)
    }

    #[tokio::test]
    async fn test_spinner_renders_then_completes() {
        let (manager, buf) = capture_manager(16);
        let handle = manager.start_spinner("loading", SpinnerStyle::Line);

        tokio::time::sleep(Duration::from_millis(20)).await;
        handle.complete("loaded");
        handle.wait().await;

        let out = buf.contents();
        assert!(out.contains("loading"));
        assert!(out.contains("✓ loaded"));
        assert!(!handle.is_running());
    }

    #[tokio::test]
    async fn test_exactly_one_final_frame() {
        let (manager, buf) = capture_manager(16);
        let handle = manager.start_spinner("step", SpinnerStyle::Line);

        handle.fail("broke");
        handle.fail("broke again");
        handle.complete("nope");
        handle.wait().await;
        tokio::time::sleep(Duration::from_millis(25)).await;

        let out = buf.contents();
        assert_eq!(out.matches("✗ broke").count(), 1);
        assert!(!out.contains("broke again"));
        assert!(!out.contains("✓"));
    }

    #[tokio::test]
    async fn test_supplier_driven_progress_fires_on_complete() {
        let (manager, buf) = capture_manager(16);
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_cb = fired.clone();
        let polls = Arc::new(AtomicUsize::new(0));
        let polls_supplier = polls.clone();

        let handle = manager.start_progress_bar(
            12,
            ProgressStyle::Bar,
            "copying",
            Some(Box::new(move || {
                let n = polls_supplier.fetch_add(1, Ordering::SeqCst);
                (n as f64) / 4.0
            })),
            Some(Box::new(move || {
                fired_cb.fetch_add(1, Ordering::SeqCst);
            })),
        );

        handle.wait().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(buf.contents().contains("✓ copying"));
    }

    #[tokio::test]
    async fn test_countdown_completes_and_fires_callback() {
        let (manager, buf) = capture_manager(16);
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_cb = fired.clone();

        let handle = manager.start_countdown(
            0,
            "time's up",
            Some(Box::new(move || {
                fired_cb.fetch_add(1, Ordering::SeqCst);
            })),
        );

        handle.wait().await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(buf.contents().contains("✓ time's up"));
    }

    #[tokio::test]
    async fn test_task_body_outcomes() {
        let (manager, buf) = capture_manager(16);

        let ok = manager.start_task("building", |updater| {
            updater.status("built");
            Ok(())
        });
        ok.wait().await;

        let err = manager.start_task("linking", |_updater| {
            Err(anyhow::anyhow!("missing symbol"))
        });
        err.wait().await;

        let out = buf.contents();
        assert!(out.contains("✓ built"));
        assert!(out.contains("✗ missing symbol"));
    }

    #[tokio::test]
    async fn test_task_cooperative_cancel() {
        let (manager, buf) = capture_manager(16);

        let handle = manager.start_task("long job", |updater| {
            while !updater.is_cancellation_requested() {
                std::thread::sleep(Duration::from_millis(2));
            }
            Ok(())
        });

        tokio::time::sleep(Duration::from_millis(15)).await;
        assert!(handle.cancel());
        handle.wait().await;

        assert!(buf.contents().contains("⊘ long job"));
    }

    #[tokio::test]
    async fn test_capacity_refusal_returns_inert_handle() {
        let (manager, _buf) = capture_manager(1);

        let first = manager.start_spinner("one", SpinnerStyle::Line);
        let second = manager.start_spinner("two", SpinnerStyle::Line);

        assert!(first.is_running());
        assert!(!second.is_running());
        // Waiting on a refused handle returns immediately.
        second.wait().await;

        first.complete("done");
        first.wait().await;
    }

    #[tokio::test]
    async fn test_shutdown_makes_handles_inert() {
        let (manager, _buf) = capture_manager(16);

        let spinner = manager.start_spinner("a", SpinnerStyle::Line);
        let timer = manager.start_countdown(3600, "b", None);

        manager.shutdown();

        assert!(!spinner.is_running());
        assert!(!timer.is_running());
        spinner.wait().await;
        timer.wait().await;

        // New starts are refused after shutdown.
        let late = manager.start_spinner("late", SpinnerStyle::Line);
        assert!(!late.is_running());
    }

    #[tokio::test]
    async fn test_task_list_lifecycle() {
        let (manager, buf) = capture_manager(16);

        let list = manager.start_task_list("steps", ["fetch", "verify"]);
        list.mark_in_progress(0);
        tokio::time::sleep(Duration::from_millis(20)).await;
        list.mark_complete(0);
        list.complete("all done");
        list.wait().await;

        let out = buf.contents();
        assert!(out.contains("fetch"));
        assert!(out.contains("✓ all done"));
    }

    #[tokio::test]
    async fn test_write_line_serialized_with_animations() {
        let (manager, buf) = capture_manager(16);
        let handle = manager.start_spinner("busy", SpinnerStyle::Line);

        manager.write_line("interleaved note").unwrap();
        handle.complete("ok");
        handle.wait().await;

        let out = buf.contents();
        // The plain line is intact on its own line.
        assert!(out.lines().any(|l| l == "interleaved note"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_starts_racing_shutdown_leave_nothing_running() {
        for _ in 0..25 {
            let (manager, buf) = capture_manager(16);

            let starter = manager.clone();
            let starting = tokio::spawn(async move {
                (0..4)
                    .map(|i| starter.start_spinner(format!("job-{i}"), SpinnerStyle::Line))
                    .collect::<Vec<_>>()
            });
            let stopper = manager.clone();
            let stopping = tokio::spawn(async move { stopper.shutdown() });

            let handles = starting.await.unwrap();
            stopping.await.unwrap();
            for handle in &handles {
                handle.wait().await;
                assert!(!handle.is_running());
            }

            // A frame already past its tick may still land; after that
            // the surface must stay silent forever.
            tokio::time::sleep(Duration::from_millis(15)).await;
            let settled = buf.contents().len();
            tokio::time::sleep(Duration::from_millis(30)).await;
            assert_eq!(buf.contents().len(), settled);
            assert_eq!(manager.active_count(), 0);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_starts_respect_capacity_bound() {
        let (manager, _buf) = capture_manager(2);

        let mut starts = Vec::new();
        for i in 0..8 {
            let m = manager.clone();
            starts.push(tokio::spawn(async move {
                m.start_spinner(format!("s{i}"), SpinnerStyle::Line)
            }));
        }
        let mut handles = Vec::new();
        for start in starts {
            handles.push(start.await.unwrap());
        }

        // Spinners never self-terminate, so exactly the admitted ones run.
        assert_eq!(handles.iter().filter(|h| h.is_running()).count(), 2);
        assert_eq!(manager.active_count(), 2);

        manager.shutdown();
        for handle in &handles {
            handle.wait().await;
        }
    }

    #[tokio::test]
    async fn test_renderer_panic_skips_tick_and_keeps_rendering() {
        let (manager, buf) = capture_manager(16);
        let cell = manager.new_cell("flaky", ());
        let calls = Arc::new(AtomicUsize::new(0));
        let render_calls = calls.clone();

        manager.launch(
            cell.clone(),
            |_inner| {},
            move |_inner, _ctx| {
                let n = render_calls.fetch_add(1, Ordering::SeqCst);
                if n == 1 {
                    panic!("malformed state");
                }
                vec![format!("frame {n}")]
            },
            None,
        );

        while calls.load(Ordering::SeqCst) < 3 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        cell.terminalize(Outcome::Success("recovered".into()));
        cell.wait_done().await;

        let out = buf.contents();
        assert!(out.contains("frame 0"));
        // The panicking call produced no frame, and the loop survived it.
        assert!(!out.lines().any(|l| l == "frame 1"));
        assert!(out.contains("frame 2"));
        assert!(out.contains("✓ recovered"));
    }
}
