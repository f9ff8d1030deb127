//! Frame Renderers
//!
//! Pure functions mapping (state, width, tick) to the text frame for one
//! animation kind. No I/O and no shared state, so every renderer is
//! unit-testable in isolation; the scheduler wires them to live state.
//!
//! Every line is truncated escape-aware to the frame width, so a frame can
//! never wrap and corrupt the in-place redraw arithmetic.

use std::time::Duration;

use crate::animation::{clamp_progress, Outcome, SpinnerTone, TaskItem, TaskStatus};
use crate::style::{ProgressStyle, Rgb, SpinnerStyle};
use crate::text;

/// Rendering parameters fixed at animation start.
#[derive(Clone, Copy, Debug)]
pub struct RenderContext {
    /// Total frame width in terminal columns
    pub width: u16,
    /// Whether color escape codes are emitted
    pub color: bool,
}

impl RenderContext {
    /// Create a context.
    #[must_use]
    pub fn new(width: u16, color: bool) -> Self {
        Self { width, color }
    }

    /// Apply `color` to `text` when colors are enabled.
    #[must_use]
    pub fn paint(&self, color: Rgb, text: &str) -> String {
        if self.color {
            color.paint(text)
        } else {
            text.to_string()
        }
    }

    fn clip(&self, line: String) -> String {
        text::truncate(&line, self.width as usize)
    }
}

/// Render a determinate progress bar line.
///
/// Two of `bar_width`'s cells are reserved for the brackets; filled cells
/// are `round(progress * (bar_width - 2))`. Progress outside `[0, 1]` is
/// clamped, never an error.
#[must_use]
pub fn progress_line(
    message: &str,
    progress: f64,
    bar_width: u16,
    style: ProgressStyle,
    ctx: &RenderContext,
) -> String {
    let p = clamp_progress(progress);
    let cells = bar_width.saturating_sub(2) as usize;
    let filled = ((p * cells as f64).round() as usize).min(cells);
    let percent = (p * 100.0).round() as u32;

    let bar = bar_body(filled, cells, style, ctx);
    let percent_text = ctx.paint(Rgb::PERCENT, &format!("{percent:>3}%"));

    ctx.clip(assemble_bar_line(message, &bar, &percent_text, bar_width, ctx))
}

/// Render an indeterminate progress line: a segment bouncing across the
/// bar, driven by the tick counter.
#[must_use]
pub fn indeterminate_line(
    message: &str,
    tick: u64,
    bar_width: u16,
    style: ProgressStyle,
    ctx: &RenderContext,
) -> String {
    let cells = bar_width.saturating_sub(2) as usize;
    let segment = (cells / 4).max(1).min(cells.max(1));
    let span = cells.saturating_sub(segment);

    let position = if span == 0 {
        0
    } else {
        let phase = (tick as usize) % (2 * span);
        if phase <= span {
            phase
        } else {
            2 * span - phase
        }
    };

    let (open, close) = style.brackets();
    let mut body = String::new();
    body.push_str(&ctx.paint(
        Rgb::REMAINING,
        &style.empty().to_string().repeat(position),
    ));
    body.push_str(&ctx.paint(
        Rgb::BAR,
        &style.filled().to_string().repeat(segment.min(cells)),
    ));
    body.push_str(&ctx.paint(
        Rgb::REMAINING,
        &style.empty().to_string().repeat(cells - position - segment.min(cells)),
    ));

    let bar = format!("{open}{body}{close}");
    let mut line = String::new();
    if !message.is_empty() {
        line.push_str(&ctx.paint(Rgb::MESSAGE, &fit_message(message, bar_width, ctx)));
        line.push(' ');
    }
    line.push_str(&bar);
    ctx.clip(line)
}

/// Render a spinner line: current glyph plus the message.
///
/// The glyph is `frames[tick % frames.len()]`; the tick advances once per
/// render regardless of message changes.
#[must_use]
pub fn spinner_line(
    message: &str,
    style: SpinnerStyle,
    tone: SpinnerTone,
    tick: u64,
    ctx: &RenderContext,
) -> String {
    let glyph_color = match tone {
        SpinnerTone::Normal => Rgb::SPINNER,
        SpinnerTone::Info => Rgb::new(30, 144, 255),
        SpinnerTone::Warning => Rgb::WARNING,
    };
    let line = format!(
        "{} {}",
        ctx.paint(glyph_color, style.frame(tick)),
        ctx.paint(Rgb::MESSAGE, message)
    );
    ctx.clip(line)
}

/// Render a countdown line as `MM:SS` plus the message.
#[must_use]
pub fn timer_line(message: &str, remaining: Duration, paused: bool, ctx: &RenderContext) -> String {
    let total = remaining.as_secs();
    let clock = format!("{:02}:{:02}", total / 60, total % 60);

    let mut line = format!(
        "{} {}",
        ctx.paint(Rgb::PERCENT, &clock),
        ctx.paint(Rgb::MESSAGE, message)
    );
    if paused {
        line.push_str(&ctx.paint(Rgb::REMAINING, " (paused)"));
    }
    ctx.clip(line)
}

/// Render a task list: exactly one line per task, status glyph plus label.
#[must_use]
pub fn task_list_lines(
    tasks: &[TaskItem],
    spinner: SpinnerStyle,
    tick: u64,
    ctx: &RenderContext,
) -> Vec<String> {
    tasks
        .iter()
        .map(|task| {
            let (glyph, color) = match task.status {
                TaskStatus::Pending => ("○", Rgb::REMAINING),
                TaskStatus::InProgress => (spinner.frame(tick), Rgb::SPINNER),
                TaskStatus::Complete => ("✓", Rgb::SUCCESS),
                TaskStatus::Failed => ("✗", Rgb::FAILURE),
            };
            ctx.clip(format!(
                "{} {}",
                ctx.paint(color, glyph),
                ctx.paint(Rgb::MESSAGE, &task.label)
            ))
        })
        .collect()
}

/// Render a live task: spinner status line, optional progress bar, and the
/// most recent detail lines beneath.
#[must_use]
pub fn task_lines(
    message: &str,
    progress: Option<f64>,
    details: &[String],
    tick: u64,
    ctx: &RenderContext,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(2 + details.len());
    lines.push(spinner_line(
        message,
        SpinnerStyle::Dots,
        SpinnerTone::Normal,
        tick,
        ctx,
    ));
    if let Some(p) = progress {
        lines.push(ctx.clip(format!(
            "  {}",
            progress_line("", p, 22, ProgressStyle::Block, ctx)
        )));
    }
    for detail in details {
        lines.push(ctx.clip(format!("  {}", ctx.paint(Rgb::REMAINING, detail))));
    }
    lines
}

/// Render the single final frame for a terminal outcome.
#[must_use]
pub fn outcome_line(outcome: &Outcome, ctx: &RenderContext) -> String {
    ctx.clip(format!(
        "{} {}",
        ctx.paint(outcome.color(), outcome.glyph()),
        ctx.paint(Rgb::MESSAGE, outcome.message())
    ))
}

fn bar_body(filled: usize, cells: usize, style: ProgressStyle, ctx: &RenderContext) -> String {
    let (open, close) = style.brackets();
    let filled_part = style.filled().to_string().repeat(filled);
    let empty_part = style.empty().to_string().repeat(cells - filled);
    format!(
        "{open}{}{}{close}",
        ctx.paint(Rgb::BAR, &filled_part),
        ctx.paint(Rgb::REMAINING, &empty_part)
    )
}

fn assemble_bar_line(
    message: &str,
    bar: &str,
    percent_text: &str,
    bar_width: u16,
    ctx: &RenderContext,
) -> String {
    let mut line = String::new();
    if !message.is_empty() {
        line.push_str(&ctx.paint(Rgb::MESSAGE, &fit_message(message, bar_width, ctx)));
        line.push(' ');
    }
    line.push_str(bar);
    line.push(' ');
    line.push_str(percent_text);
    line
}

/// Shorten a message so message + bar + percentage fit the frame width.
/// Measured in display cells so wide glyphs do not overflow the line.
fn fit_message(message: &str, bar_width: u16, ctx: &RenderContext) -> String {
    let reserved = bar_width as usize + 6;
    let available = (ctx.width as usize).saturating_sub(reserved);
    if text::visible_width(message) <= available {
        message.to_string()
    } else {
        text::truncate(message, available)
    }
}
