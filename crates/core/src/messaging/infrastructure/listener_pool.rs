use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use thiserror::Error;

use crate::messaging::domain::queue_message::QueueMessage;
use crate::pipeline::duke_image_use_case::DukeImageUseCase;
use crate::shared::constants::MAX_LISTENER_CONCURRENCY;

#[derive(Error, Debug)]
pub enum QueueError {
    #[error("listener pool is closed")]
    Closed,
}

/// Totals gathered by the listener threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub hello: usize,
    pub converted: usize,
    pub failed: usize,
}

#[derive(Default)]
struct Counters {
    hello: AtomicUsize,
    converted: AtomicUsize,
    failed: AtomicUsize,
}

impl Counters {
    fn snapshot(&self) -> ListenerStats {
        ListenerStats {
            hello: self.hello.load(Ordering::Relaxed),
            converted: self.converted.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Consumes queued messages on a fixed set of worker threads.
///
/// Image messages go through [`DukeImageUseCase::process_and_discard`], so
/// a bad payload is logged and counted but never stops a worker.
pub struct ListenerPool {
    sender: Option<crossbeam_channel::Sender<QueueMessage>>,
    workers: Vec<JoinHandle<()>>,
    counters: Arc<Counters>,
}

impl ListenerPool {
    /// Starts `concurrency` listeners, clamped to `1..=MAX_LISTENER_CONCURRENCY`.
    pub fn start(use_case: Arc<DukeImageUseCase>, concurrency: usize) -> Self {
        Self::spawn(Some(use_case), concurrency)
    }

    /// Starts listeners with no image pipeline, for text messages only.
    /// Image messages are logged and counted as failed.
    pub fn start_text_only(concurrency: usize) -> Self {
        Self::spawn(None, concurrency)
    }

    fn spawn(use_case: Option<Arc<DukeImageUseCase>>, concurrency: usize) -> Self {
        let concurrency = concurrency.clamp(1, MAX_LISTENER_CONCURRENCY);
        let (sender, receiver) = crossbeam_channel::unbounded::<QueueMessage>();
        let counters = Arc::new(Counters::default());

        let workers = (0..concurrency)
            .map(|id| {
                spawn_listener(
                    id,
                    receiver.clone(),
                    use_case.clone(),
                    Arc::clone(&counters),
                )
            })
            .collect();
        log::info!("Started {concurrency} listeners");

        Self {
            sender: Some(sender),
            workers,
            counters,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.workers.len()
    }

    /// Enqueues a message without waiting for it to be handled.
    pub fn send(&self, message: QueueMessage) -> Result<(), QueueError> {
        let sender = self.sender.as_ref().ok_or(QueueError::Closed)?;
        sender.send(message).map_err(|_| QueueError::Closed)
    }

    /// Stops accepting messages, lets the listeners drain the queue and
    /// waits for them to exit.
    pub fn shutdown(mut self) -> ListenerStats {
        self.close_and_join();
        let stats = self.counters.snapshot();
        log::info!(
            "Listeners stopped: {} hello, {} converted, {} failed",
            stats.hello,
            stats.converted,
            stats.failed
        );
        stats
    }

    fn close_and_join(&mut self) {
        // Dropping the last sender ends each listener's receive loop
        self.sender.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("A listener thread panicked");
            }
        }
    }
}

impl Drop for ListenerPool {
    fn drop(&mut self) {
        self.close_and_join();
    }
}

fn spawn_listener(
    id: usize,
    receiver: crossbeam_channel::Receiver<QueueMessage>,
    use_case: Option<Arc<DukeImageUseCase>>,
    counters: Arc<Counters>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        for message in receiver {
            log::info!("received! {message:?} (listener {id})");
            match message {
                QueueMessage::Hello(text) => {
                    log::info!("msg={text}");
                    counters.hello.fetch_add(1, Ordering::Relaxed);
                }
                QueueMessage::FaceConverter(bytes) => {
                    let converted = match &use_case {
                        Some(use_case) => use_case.process_and_discard(&bytes),
                        None => {
                            log::error!("Discarding image: no pipeline configured");
                            false
                        }
                    };
                    if converted {
                        counters.converted.fetch_add(1, Ordering::Relaxed);
                    } else {
                        counters.failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }
        }
    })
}
