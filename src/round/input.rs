use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time;

use crate::error::StaleEvent;

pub type WindowId = u64;

/// Raw interactions coming from the screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
    /// A single press on the word card.
    Primary,
    /// A press recognized as the second half of a double press.
    Secondary,
    /// The explicit "correct" button.
    MarkCorrect,
    /// The explicit "skip" button.
    MarkSkip,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkEvent {
    MarkCorrect,
    MarkSkip,
}

impl MarkEvent {
    pub fn is_correct(self) -> bool {
        self == MarkEvent::MarkCorrect
    }
}

/// Tells a single press from a double press.
///
/// A primary activation arms a hold-off window; if it elapses untouched the press
/// was a single one and `MarkCorrect` is emitted through `window_elapsed`. A
/// secondary activation while armed disarms the window and emits `MarkSkip`
/// straight away.
pub struct InputDisambiguator {
    hold_off: Duration,
    on_elapsed: Arc<dyn Fn(WindowId) + Send + Sync>,
    pending: Option<PendingWindow>,
    next_window_id: WindowId,
}

struct PendingWindow {
    id: WindowId,
    handle: JoinHandle<()>,
}

impl InputDisambiguator {
    pub fn new<F>(hold_off: Duration, on_elapsed: F) -> Self
    where
        F: Fn(WindowId) + Send + Sync + 'static,
    {
        InputDisambiguator {
            hold_off,
            on_elapsed: Arc::new(on_elapsed),
            pending: None,
            next_window_id: 0,
        }
    }

    /// Returns the mark to apply right away, `None` when a window was armed.
    pub fn activate(&mut self, activation: Activation) -> Result<Option<MarkEvent>, StaleEvent> {
        match activation {
            Activation::MarkCorrect => Ok(Some(MarkEvent::MarkCorrect)),
            Activation::MarkSkip => Ok(Some(MarkEvent::MarkSkip)),
            Activation::Primary => {
                if self.pending.is_some() {
                    return Err(StaleEvent::AlreadyArmed);
                }
                self.arm();
                Ok(None)
            }
            Activation::Secondary => match self.pending.take() {
                Some(pending) => {
                    pending.handle.abort();
                    Ok(Some(MarkEvent::MarkSkip))
                }
                None => Err(StaleEvent::UnarmedSecondary),
            },
        }
    }

    pub fn window_elapsed(&mut self, window_id: WindowId) -> Result<MarkEvent, StaleEvent> {
        match &self.pending {
            Some(pending) if pending.id == window_id => {
                self.pending = None;
                Ok(MarkEvent::MarkCorrect)
            }
            _ => Err(StaleEvent::UnknownWindow(window_id)),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    fn arm(&mut self) {
        self.next_window_id += 1;
        let id = self.next_window_id;
        let hold_off = self.hold_off;
        let on_elapsed = Arc::clone(&self.on_elapsed);

        let handle = tokio::spawn(async move {
            time::sleep(hold_off).await;
            on_elapsed(id);
        });

        self.pending = Some(PendingWindow { id, handle });
    }
}

impl Drop for InputDisambiguator {
    fn drop(&mut self) {
        self.cancel();
    }
}
