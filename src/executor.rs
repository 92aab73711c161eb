use once_cell::sync::OnceCell;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait CompletionContext: Send + Sync {
    fn post(&self, task: Task);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl CompletionContext for Immediate {
    fn post(&self, task: Task) {
        task()
    }
}

#[derive(Debug, Clone)]
pub struct MainLoopHandle {
    sender: Sender<Task>,
}

impl CompletionContext for MainLoopHandle {
    fn post(&self, task: Task) {
        if self.sender.send(task).is_err() {
            log::warn!("main loop is gone, dropping completion");
        }
    }
}

/// Completion queue drained by one owner thread, e.g. a UI loop.
pub struct MainLoop {
    receiver: Receiver<Task>,
}

impl MainLoop {
    pub fn channel() -> (MainLoopHandle, MainLoop) {
        let (sender, receiver) = mpsc::channel();
        (MainLoopHandle { sender }, MainLoop { receiver })
    }

    /// Runs every completion that is already queued and returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        ran
    }

    pub fn run_next(&self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                task();
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }
}

pub fn default_worker_threads() -> usize {
    std::thread::available_parallelism()
        .map(|threads| threads.get())
        .unwrap_or(4)
}

pub struct ThreadExecutor {
    worker_threads: usize,
    workers: OnceCell<Option<ThreadPool>>,
    completion: Arc<dyn CompletionContext>,
}

impl ThreadExecutor {
    pub fn new(completion: Arc<dyn CompletionContext>) -> Self {
        Self::with_worker_threads(completion, default_worker_threads())
    }

    pub fn with_worker_threads(
        completion: Arc<dyn CompletionContext>,
        worker_threads: usize,
    ) -> Self {
        Self {
            worker_threads: worker_threads.max(1),
            workers: OnceCell::new(),
            completion,
        }
    }

    pub fn worker_threads(&self) -> usize {
        self.worker_threads
    }

    pub fn execute<T, A, R>(&self, action: A, on_result: R)
    where
        T: Send + 'static,
        A: FnOnce() -> T + Send + 'static,
        R: FnOnce(T) + Send + 'static,
    {
        let completion = Arc::clone(&self.completion);
        let job = move || {
            let result = action();
            completion.post(Box::new(move || on_result(result)));
        };
        match self.pool() {
            Some(pool) => pool.spawn(job),
            None => rayon::spawn(job),
        }
    }

    fn pool(&self) -> Option<&ThreadPool> {
        self.workers
            .get_or_init(|| {
                match ThreadPoolBuilder::new()
                    .num_threads(self.worker_threads)
                    .thread_name(|idx| format!("qr-nbu-worker-{idx}"))
                    .panic_handler(|payload| {
                        log::error!("worker task panicked: {}", panic_message(payload.as_ref()))
                    })
                    .build()
                {
                    Ok(pool) => Some(pool),
                    Err(err) => {
                        log::warn!("worker pool unavailable, using the global pool: {err}");
                        None
                    }
                }
            })
            .as_ref()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn result_is_delivered_on_main_loop() {
        let (handle, main_loop) = MainLoop::channel();
        let executor = ThreadExecutor::with_worker_threads(Arc::new(handle), 2);
        let (done_tx, done_rx) = mpsc::channel();
        let main_thread = thread::current().id();

        executor.execute(
            || thread::current().id(),
            move |worker| {
                done_tx.send((worker, thread::current().id())).unwrap();
            },
        );

        assert!(main_loop.run_next(Duration::from_secs(5)));
        let (worker, delivered_on) = done_rx.try_recv().unwrap();
        assert_ne!(worker, main_thread);
        assert_eq!(delivered_on, main_thread);
    }

    #[test]
    fn immediate_context_runs_on_worker() {
        let executor = ThreadExecutor::with_worker_threads(Arc::new(Immediate), 1);
        let (done_tx, done_rx) = mpsc::channel();
        executor.execute(|| 21 * 2, move |value| done_tx.send(value).unwrap());
        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)), Ok(42));
    }

    #[test]
    fn run_pending_drains_queue() {
        let (handle, main_loop) = MainLoop::channel();
        let (done_tx, done_rx) = mpsc::channel();
        for value in 0..3 {
            let done_tx = done_tx.clone();
            handle.post(Box::new(move || done_tx.send(value).unwrap()));
        }
        assert_eq!(main_loop.run_pending(), 3);
        assert_eq!(done_rx.try_iter().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(!main_loop.run_next(Duration::from_millis(10)));
    }

    #[test]
    fn panicking_completion_keeps_worker_alive() {
        let executor = ThreadExecutor::with_worker_threads(Arc::new(Immediate), 1);
        executor.execute(|| (), |()| panic!("completion failed"));

        let (done_tx, done_rx) = mpsc::channel();
        executor.execute(|| 7, move |value| done_tx.send(value).unwrap());
        assert_eq!(done_rx.recv_timeout(Duration::from_secs(5)), Ok(7));
    }

    #[test]
    fn panic_message_reads_str_and_string() {
        let borrowed: Box<dyn Any + Send> = Box::new("boom");
        let owned: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let other: Box<dyn Any + Send> = Box::new(3u8);
        assert_eq!(panic_message(borrowed.as_ref()), "boom");
        assert_eq!(panic_message(owned.as_ref()), "bang");
        assert_eq!(panic_message(other.as_ref()), "non-string panic payload");
    }

    #[test]
    fn worker_count_is_at_least_one() {
        let executor = ThreadExecutor::with_worker_threads(Arc::new(Immediate), 0);
        assert_eq!(executor.worker_threads(), 1);
        assert!(default_worker_threads() >= 1);
    }
}
