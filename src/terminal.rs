//! Line-oriented terminal presentation
//!
//! Renders the dialog snapshot to stdout and forwards stdin input to the
//! controller. Runs on the main thread, outside the tokio runtime.

use std::io::{BufRead, Write};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;
use tracing::debug;

use modal_plus::{DialogSnapshot, SharedDialog};

/// A user action read from the terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInput {
    /// Zero-based button index
    Button(usize),
    Escape,
    Backdrop,
}

/// Parse one input line. Buttons are numbered from 1.
pub fn parse_input(line: &str, button_count: usize) -> Option<UserInput> {
    let line = line.trim().to_lowercase();
    match line.as_str() {
        "esc" | "escape" | "q" => Some(UserInput::Escape),
        "backdrop" | "b" => Some(UserInput::Backdrop),
        other => match other.parse::<usize>() {
            Ok(n) if n >= 1 && n <= button_count => Some(UserInput::Button(n - 1)),
            _ => None,
        },
    }
}

pub fn render(snapshot: &DialogSnapshot, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== {} ==", snapshot.title)?;
    writeln!(out, "{}", snapshot.display_message())?;
    writeln!(out)?;
    for (i, button) in snapshot.buttons.iter().enumerate() {
        let disabled = if button.disabled { ", disabled" } else { "" };
        writeln!(out, "  [{}] {} ({}{})", i + 1, button.caption, button.style.name(), disabled)?;
    }
    write!(out, "Choose a button number, 'esc' or 'backdrop': ")?;
    out.flush()
}

/// Drive `dialog` from the terminal until `request` completes
pub fn run<T>(dialog: SharedDialog, rt: &Runtime, mut request: JoinHandle<T>) -> anyhow::Result<T> {
    let mut changes = dialog.blocking_read().subscribe();
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    loop {
        let snapshot = dialog.blocking_read().snapshot();

        if !snapshot.visible {
            let finished = rt.block_on(async {
                tokio::select! {
                    res = &mut request => Some(res),
                    _ = changes.changed() => None,
                }
            });
            match finished {
                Some(res) => return Ok(res?),
                None => continue,
            }
        }

        render(&snapshot, &mut stdout)?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // stdin closed: nobody left to answer
            debug!("stdin closed, hiding dialog");
            dialog.blocking_write().hide();
            continue;
        }

        let mut controller = dialog.blocking_write();
        match parse_input(&line, snapshot.buttons.len()) {
            Some(UserInput::Button(index)) => controller.on_button_activated(index),
            Some(UserInput::Escape) => controller.on_key_escape(),
            Some(UserInput::Backdrop) => controller.on_backdrop_activated(),
            None => writeln!(stdout, "Unrecognized input: {}", line.trim())?,
        }
    }
}
