use std::{
    io,
    sync::mpsc::{self, RecvTimeoutError, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use log::{trace, warn};

use crate::Message;

/// Background thread that posts [`Message::Tick`] at a fixed interval.
///
/// Dropping the cancel sender disconnects the thread's wait, so cancellation
/// takes effect immediately instead of after the current interval.
#[derive(Debug)]
pub(crate) struct Clock {
    cancel: Sender<()>,
    thread: JoinHandle<()>,
}

impl Clock {
    pub(crate) fn spawn(interval: Duration, ticks: Sender<Message>) -> io::Result<Self> {
        let (cancel, cancelled) = mpsc::channel::<()>();
        let thread = thread::Builder::new()
            .name("grid-chase-clock".to_owned())
            .spawn(move || loop {
                match cancelled.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if ticks.send(Message::Tick).is_err() {
                            trace!("session gone, clock exiting");
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;
        Ok(Self { cancel, thread })
    }

    pub(crate) fn cancel(self) {
        drop(self.cancel);
        if self.thread.join().is_err() {
            warn!("session clock thread panicked");
        }
    }
}
