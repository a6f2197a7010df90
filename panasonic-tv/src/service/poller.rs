use std::thread;
use std::time::Duration;

use crossbeam::channel::{self, RecvTimeoutError, Sender};

/// Handle to a background thread ticking at a fixed interval
///
/// The first tick runs immediately. Dropping or cancelling the handle stops
/// the loop; a tick already running completes but no further tick starts.
#[derive(Debug)]
pub(crate) struct PollHandle {
    _stop: Sender<()>,
}

impl PollHandle {
    /// Spawn the polling thread
    ///
    /// `tick` returns `false` to end the loop on its own.
    pub fn spawn<F>(name: String, interval: Duration, mut tick: F) -> std::io::Result<PollHandle>
    where
        F: FnMut() -> bool + Send + 'static,
    {
        let (stop_tx, stop_rx) = channel::bounded::<()>(0);

        thread::Builder::new().name(name).spawn(move || loop {
            if !tick() {
                break;
            }
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => continue,
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        })?;

        Ok(PollHandle { _stop: stop_tx })
    }

    pub fn cancel(self) {
        drop(self);
    }
}
