//! Asynchronous event delivery for the simulated backend.

use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use parking_lot::Mutex;

enum Task {
    Run(Box<dyn FnOnce() + Send>),
    Shutdown,
}

/// A single named thread that runs posted closures in order.
///
/// Stands in for the platform's callback threads: camera and display
/// events are posted here so they reach the core asynchronously, never
/// from inside the call that caused them.
pub struct EventDispatcher {
    tasks: Sender<Task>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl EventDispatcher {
    pub fn new(name: &str) -> Self {
        let (tasks, receiver) = mpsc::channel::<Task>();
        let worker = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Ok(task) = receiver.recv() {
                    match task {
                        Task::Run(task) => task(),
                        Task::Shutdown => break,
                    }
                }
            })
            .expect("failed to spawn event dispatcher thread");
        Self {
            tasks,
            worker: Mutex::new(Some(worker)),
        }
    }

    /// Queue `task` for execution on the dispatcher thread.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        let _ = self.tasks.send(Task::Run(Box::new(task)));
    }

    /// Block until every task queued before this call has run.
    pub fn flush(&self) {
        let (done, wait) = mpsc::channel::<()>();
        self.post(move || {
            let _ = done.send(());
        });
        let _ = wait.recv();
    }
}

impl Drop for EventDispatcher {
    fn drop(&mut self) {
        let _ = self.tasks.send(Task::Shutdown);
        if let Some(worker) = self.worker.lock().take() {
            let _ = worker.join();
        }
    }
}
