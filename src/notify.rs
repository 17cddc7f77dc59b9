//! Transient user notifications and confirmation prompts

use log::{error, info};
use std::sync::Mutex;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

/// A delivered notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Receives the outcome of a user action
pub trait Notifier {
    fn notify(&self, level: Level, message: &str);

    fn success(&self, message: &str) {
        self.notify(Level::Success, message);
    }

    fn info(&self, message: &str) {
        self.notify(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.notify(Level::Error, message);
    }
}

/// Sends notifications to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: Level, message: &str) {
        match level {
            Level::Success | Level::Info => info!("{}", message),
            Level::Error => error!("{}", message),
        }
    }
}

/// Keeps every notification in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    entries: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything received so far, oldest first
    pub fn entries(&self) -> Vec<Notification> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries().into_iter().map(|n| n.message).collect()
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, level: Level, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(Notification {
                level,
                message: message.to_string(),
            });
        }
    }
}

/// Asks the user to confirm a destructive action
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Capture(Mutex<Vec<(log::Level, String)>>);

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            self.0.lock().unwrap().push((record.level(), record.args().to_string()));
        }

        fn flush(&self) {}
    }

    static CAPTURED: Capture = Capture(Mutex::new(Vec::new()));

    #[test]
    fn log_notifier_maps_levels() {
        log::set_logger(&CAPTURED).unwrap();
        log::set_max_level(log::LevelFilter::Info);

        let notifier: &dyn Notifier = &LogNotifier;
        notifier.success("Rule created successfully");
        notifier.info("Inventory validation started");
        notifier.error("Failed to delete rule");

        let records = CAPTURED.0.lock().unwrap();
        assert!(records.contains(&(log::Level::Info, "Rule created successfully".into())));
        assert!(records.contains(&(log::Level::Info, "Inventory validation started".into())));
        assert!(records.contains(&(log::Level::Error, "Failed to delete rule".into())));
    }

    #[test]
    fn memory_notifier_records_in_order() {
        let notifier = MemoryNotifier::new();
        notifier.success("Rule created successfully");
        notifier.error("Failed to delete rule");
        assert_eq!(
            notifier.entries(),
            vec![
                Notification { level: Level::Success, message: "Rule created successfully".into() },
                Notification { level: Level::Error, message: "Failed to delete rule".into() },
            ]
        );
    }

    #[test]
    fn closures_confirm() {
        let decline = |_: &str| false;
        assert!(!decline.confirm("Are you sure?"));
    }
}
