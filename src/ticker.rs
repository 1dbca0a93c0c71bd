// File: src/ticker.rs
use chrono::{DateTime, Local};
use std::time::Duration;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

/// Periodic wall-clock tick feeding an event channel.
///
/// The task lives exactly as long as the `Ticker`: dropping it (or calling
/// `stop`) aborts the task. Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn spawn<T, F>(period: Duration, tx: Sender<T>, make_event: F) -> Self
    where
        T: Send + 'static,
        F: Fn(DateTime<Local>) -> T + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(make_event(Local::now())).await.is_err() {
                    log::debug!("Tick receiver closed, stopping ticker");
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_ticks_arrive_periodically() {
        let (tx, mut rx) = mpsc::channel(8);
        let _ticker = Ticker::spawn(Duration::from_secs(1), tx, |now| now);

        // First tick fires immediately, then once per period.
        for _ in 0..3 {
            assert!(rx.recv().await.is_some());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_ticks() {
        let (tx, mut rx) = mpsc::channel(8);
        let ticker = Ticker::spawn(Duration::from_secs(1), tx, |_| ());
        assert!(rx.recv().await.is_some());

        ticker.stop();

        // Once the task is gone its sender is dropped and the channel drains.
        let drained = time::timeout(Duration::from_secs(5), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(drained.is_ok());
    }
}
