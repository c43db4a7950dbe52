//! Debounced settings writer.
//!
//! Owns the `SettingsStore` on a background thread. Every scheduled value
//! replaces the pending one and restarts the trailing window; the latest
//! value is saved once the window passes quietly. Last write wins.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use super::persist::SettingsStore;
use super::SettingsError;
use crate::models::AccessibilitySettings;

enum Command {
    Save(AccessibilitySettings),
    Flush(mpsc::Sender<()>),
}

/// Handle to the writer thread. Dropping it writes anything pending and
/// joins the thread.
pub struct DebouncedWriter {
    tx: Option<mpsc::Sender<Command>>,
    handle: Option<JoinHandle<()>>,
}

impl DebouncedWriter {
    pub fn spawn(store: Arc<dyn SettingsStore>, window: Duration) -> Result<Self, SettingsError> {
        let (tx, rx) = mpsc::channel();
        let handle = std::thread::Builder::new()
            .name("healthvis-settings-writer".into())
            .spawn(move || writer_loop(rx, store.as_ref(), window))?;

        Ok(Self {
            tx: Some(tx),
            handle: Some(handle),
        })
    }

    /// Queue `settings` for saving after the window.
    pub fn schedule(&self, settings: AccessibilitySettings) -> Result<(), SettingsError> {
        self.send(Command::Save(settings))
    }

    /// Save the pending value now and wait until it has been written.
    pub fn flush(&self) -> Result<(), SettingsError> {
        let (ack_tx, ack_rx) = mpsc::channel();
        self.send(Command::Flush(ack_tx))?;
        ack_rx.recv().map_err(|_| SettingsError::WriterStopped)
    }

    fn send(&self, command: Command) -> Result<(), SettingsError> {
        self.tx
            .as_ref()
            .ok_or(SettingsError::WriterStopped)?
            .send(command)
            .map_err(|_| SettingsError::WriterStopped)
    }
}

impl Drop for DebouncedWriter {
    fn drop(&mut self) {
        // Closing the channel ends the loop after a final write.
        self.tx.take();
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
    }
}

fn writer_loop(rx: mpsc::Receiver<Command>, store: &dyn SettingsStore, window: Duration) {
    let mut pending: Option<AccessibilitySettings> = None;

    loop {
        let command = if pending.is_some() {
            match rx.recv_timeout(window) {
                Ok(command) => command,
                Err(RecvTimeoutError::Timeout) => {
                    write_pending(store, &mut pending);
                    continue;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        } else {
            match rx.recv() {
                Ok(command) => command,
                Err(_) => break,
            }
        };

        match command {
            Command::Save(settings) => pending = Some(settings),
            Command::Flush(ack) => {
                write_pending(store, &mut pending);
                let _ = ack.send(());
            }
        }
    }

    write_pending(store, &mut pending);
    tracing::debug!("Settings writer stopped");
}

fn write_pending(store: &dyn SettingsStore, pending: &mut Option<AccessibilitySettings>) {
    let Some(settings) = pending.take() else {
        return;
    };
    match store.save(&settings) {
        Ok(()) => tracing::debug!(mode = %settings.mode, "Accessibility settings saved"),
        Err(e) => tracing::warn!(error = %e, "Failed to persist accessibility settings"),
    }
}
