//! Notification sink for pushed updates.

/// Receives the identifiers of scripts that were pushed successfully.
pub trait Notifier {
    fn notify(&self, updated: &[String]);
}

/// Notifier that only writes an info log line.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, updated: &[String]) {
        log::info!("->: script update: {}", updated.join(","));
    }
}

impl<T: Notifier + ?Sized> Notifier for Box<T> {
    fn notify(&self, updated: &[String]) {
        (**self).notify(updated)
    }
}
