use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

pub type TimerId = u64;

pub const TICK: Duration = Duration::from_secs(1);

/// A countdown ticking once per second in a background task.
///
/// Only one countdown is live at a time: starting a new one cancels the previous
/// one, and dropping the timer cancels it too. Callbacks of a cancelled countdown
/// may already be queued by the time `cancel` returns, so every countdown is
/// started with an id that the callbacks are expected to carry along.
#[derive(Default)]
pub struct RoundTimer {
    live: Option<LiveTimer>,
}

struct LiveTimer {
    id: TimerId,
    handle: JoinHandle<()>,
}

impl RoundTimer {
    /// Counts down from `seconds`, calling `on_tick` with the remaining seconds after
    /// every tick and `on_expire` once when zero is reached.
    pub fn start<T, E>(&mut self, id: TimerId, seconds: u32, on_tick: T, on_expire: E)
    where
        T: Fn(u32) + Send + 'static,
        E: FnOnce() + Send + 'static,
    {
        self.cancel();

        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + TICK, TICK);
            let mut remaining = seconds;
            while remaining > 0 {
                interval.tick().await;
                remaining -= 1;
                on_tick(remaining);
            }
            on_expire();
        });

        self.live = Some(LiveTimer { id, handle });
    }

    pub fn cancel(&mut self) {
        if let Some(live) = self.live.take() {
            live.handle.abort();
        }
    }

    /// The id of the last started countdown, until it is cancelled. Stays set after
    /// expiry so that the expiry callback can still be matched.
    pub fn id(&self) -> Option<TimerId> {
        self.live.as_ref().map(|live| live.id)
    }

    pub fn is_running(&self) -> bool {
        self.live
            .as_ref()
            .map(|live| !live.handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for RoundTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
