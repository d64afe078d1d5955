// Colored terminal presenter

use crate::present::{Frame, Notifier, Renderer, Severity};
use crate::task::{Task, now};
use colored::{Color, ColoredString, Colorize};
use std::fmt::Write as _;
use std::io::Write;
use tracing::warn;

const CONFETTI: [(&str, Color); 6] = [
    ("*", Color::Red),
    ("+", Color::Yellow),
    ("o", Color::Green),
    ("*", Color::Cyan),
    ("+", Color::Blue),
    ("o", Color::Magenta),
];

/// Draws views and notifications as text
pub struct TerminalPresenter<W: Write> {
    out: W,
    sample_hint: &'static str,
    show_date: bool,
}

impl TerminalPresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            sample_hint: "Run `tasklist sample` to add sample tasks.",
            show_date: true,
        }
    }

    /// Text shown under the empty list
    pub fn with_sample_hint(mut self, hint: &'static str) -> Self {
        self.sample_hint = hint;
        self
    }

    pub fn with_date(mut self, show_date: bool) -> Self {
        self.show_date = show_date;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "Failed to write to terminal");
        }
    }
}

impl<W: Write> Renderer for TerminalPresenter<W> {
    fn render(&mut self, frame: &Frame<'_>) {
        let dark = frame.theme.is_dark();
        let mut text = String::new();

        if self.show_date {
            // e.g. "Saturday, October 17, 2026"
            let date = now().with_timezone(&chrono::Local).format("%A, %B %-d, %Y").to_string();
            let _ = writeln!(text, "{}", accent(&date, dark).bold());
        }

        match frame.empty {
            Some(empty) => {
                let _ = writeln!(text, "  {}", empty.headline().bold());
                let _ = writeln!(text, "  {}", empty.hint().dimmed());
                if empty.offers_samples() {
                    let _ = writeln!(text, "  {}", self.sample_hint.italic());
                }
            }
            None => {
                let width = frame.tasks.len().to_string().len();
                for (index, task) in frame.tasks.iter().enumerate() {
                    let _ = writeln!(text, "{:>w$}. {}", index + 1, task_line(task, dark), w = width + 2);
                }
            }
        }

        let _ = writeln!(text, "{} {}", frame.summary.to_string().dimmed(), format!("[{}]", frame.filter).dimmed());
        self.emit(&text);
    }
}

impl<W: Write> Notifier for TerminalPresenter<W> {
    fn notify(&mut self, message: &str, severity: Severity) {
        let line = format!("{}\n", paint(message, severity));
        self.emit(&line);
    }

    fn celebrate(&mut self) {
        let mut line = String::new();
        for i in 0..24 {
            let (glyph, color) = CONFETTI[i % CONFETTI.len()];
            line.push_str(&glyph.color(color).to_string());
        }
        line.push('\n');
        self.emit(&line);
    }
}

fn task_line(task: &Task, dark: bool) -> String {
    if task.completed {
        format!("{} {}", "[x]".green(), task.text.strikethrough().dimmed())
    } else if dark {
        format!("{} {}", "[ ]".bright_white(), task.text.bright_white())
    } else {
        format!("[ ] {}", task.text)
    }
}

fn accent(text: &str, dark: bool) -> ColoredString {
    if dark { text.bright_cyan() } else { text.blue() }
}

fn paint(message: &str, severity: Severity) -> ColoredString {
    match severity {
        Severity::Success => message.green(),
        Severity::Warning => message.yellow(),
        Severity::Danger => message.red(),
        Severity::Info => message.cyan(),
        Severity::Default => message.purple(),
    }
}
