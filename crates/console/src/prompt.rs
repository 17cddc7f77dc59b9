//! Terminal implementations of the notification and confirmation seams

use std::io::{self, BufRead, Write};

use salesops::notify::{Confirm, Level, Notifier};

/// Prints notifications to stderr so stdout stays clean for data
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, level: Level, message: &str) {
        eprintln!("{} {}", marker(level), message);
    }
}

fn marker(level: Level) -> &'static str {
    match level {
        Level::Success => "✓",
        Level::Info => "•",
        Level::Error => "✗",
    }
}

/// Asks on stderr and reads the answer from stdin
#[derive(Debug, Clone, Copy)]
pub struct PromptConfirm {
    assume_yes: bool,
}

impl PromptConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for PromptConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{} [y/N] ", prompt);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
