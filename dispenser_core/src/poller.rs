//! Background switch sampling.
//!
//! `InputPoller` spawns a thread that owns the `Switches` adapter, samples
//! it once per poll period and forwards decoded `InputEvent`s through a
//! single-slot channel. When the controller has not collected the previous
//! event yet, the stale one is displaced so the newest sample wins.
//!
//! Each `InputPoller` owns exactly one thread, shut down and joined on drop.
use crossbeam_channel as xch;
use dispenser_traits::Switches;
use dispenser_traits::clock::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use crate::event::InputEvent;
use crate::ticker::Ticker;

pub struct InputPoller {
    rx: xch::Receiver<InputEvent>,
    displaced: Arc<AtomicU64>,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl InputPoller {
    pub fn spawn<W: Switches + Send + 'static>(
        mut switches: W,
        period: Duration,
        clock: Arc<dyn Clock + Send + Sync>,
    ) -> Self {
        let (tx, rx) = xch::bounded(1);
        // second handle so the sender side can evict a stale event
        let evict = rx.clone();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let displaced = Arc::new(AtomicU64::new(0));
        let displaced_clone = displaced.clone();

        let join_handle = std::thread::spawn(move || {
            let mut ticker = Ticker::new(clock, period);
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("poller thread received shutdown signal");
                    break;
                }

                let event = match switches.poll() {
                    Ok(state) => InputEvent::from(state),
                    Err(e) => {
                        let err = crate::hw_error::map_input_error(&*e);
                        tracing::debug!(error = %err, "switch read failed; treating as idle");
                        InputEvent::None
                    }
                };

                if event != InputEvent::None {
                    tracing::debug!(?event, "switch event");
                    match tx.try_send(event) {
                        Ok(()) => {}
                        Err(xch::TrySendError::Full(ev)) => {
                            if evict.try_recv().is_ok() {
                                displaced_clone.fetch_add(1, Ordering::Relaxed);
                            }
                            // the slot is ours now; only the controller also receives
                            let _ = tx.try_send(ev);
                        }
                        Err(xch::TrySendError::Disconnected(_)) => {
                            tracing::debug!("poller consumer disconnected, exiting thread");
                            break;
                        }
                    }
                }

                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                ticker.wait();
            }
            tracing::trace!("poller thread exiting cleanly");
        });

        Self {
            rx,
            displaced,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Newest pending event, if any. Consumes it.
    pub fn latest(&self) -> Option<InputEvent> {
        self.rx.try_iter().last()
    }

    /// All pending events in arrival order.
    pub fn drain(&self) -> Vec<InputEvent> {
        self.rx.try_iter().collect()
    }

    /// Events overwritten before the controller collected them.
    pub fn displaced(&self) -> u64 {
        self.displaced.load(Ordering::Relaxed)
    }
}

impl Drop for InputPoller {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // exits at its next shutdown check, at most one poll period away
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("poller thread joined");
                }
                Err(e) => {
                    tracing::warn!(?e, "poller thread panicked during shutdown");
                }
            }
        }
    }
}
