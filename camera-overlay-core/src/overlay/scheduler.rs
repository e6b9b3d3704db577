//! Debounced restart scheduling.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;

enum Command {
    Schedule(Duration),
    Cancel,
    Shutdown,
}

/// A single cancelable delayed task on a dedicated worker thread.
///
/// At most one execution is pending at a time: scheduling again moves
/// the deadline, `cancel` clears it. The task runs on the worker
/// thread.
pub struct RestartScheduler {
    commands: Sender<Command>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RestartScheduler {
    pub fn new<F>(task: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (commands, receiver) = mpsc::channel::<Command>();
        let worker = thread::Builder::new()
            .name("overlay-restart".to_string())
            .spawn(move || {
                let mut deadline: Option<Instant> = None;
                loop {
                    let command = match deadline {
                        Some(at) => {
                            let now = Instant::now();
                            if at <= now {
                                deadline = None;
                                task();
                                continue;
                            }
                            match receiver.recv_timeout(at - now) {
                                Ok(command) => command,
                                Err(RecvTimeoutError::Timeout) => {
                                    deadline = None;
                                    task();
                                    continue;
                                }
                                Err(RecvTimeoutError::Disconnected) => break,
                            }
                        }
                        None => match receiver.recv() {
                            Ok(command) => command,
                            Err(_) => break,
                        },
                    };
                    match command {
                        Command::Schedule(delay) => deadline = Some(Instant::now() + delay),
                        Command::Cancel => deadline = None,
                        Command::Shutdown => break,
                    }
                }
            })
            .expect("failed to spawn restart scheduler thread");

        Self {
            commands,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Arm (or re-arm) the task to fire after `delay`. A pending
    /// deadline is superseded.
    pub fn schedule(&self, delay: Duration) {
        let _ = self.commands.send(Command::Schedule(delay));
    }

    /// Clear any pending deadline.
    pub fn cancel(&self) {
        let _ = self.commands.send(Command::Cancel);
    }
}

impl Drop for RestartScheduler {
    fn drop(&mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.join();
        }
    }
}
