// schedule.rs - Two-stage step scheduling: a timer delay, then execution on the next frame

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::runtime::{Builder, Runtime};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Cancellation flag owned by one run session.
#[derive(Clone, Debug)]
pub struct RunToken {
    session: u64,
    cancelled: Arc<AtomicBool>,
}

impl RunToken {
    pub fn new(session: u64) -> Self {
        Self {
            session,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    #[inline]
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// A step waiting for its delay and then for a frame to run on.
#[derive(Clone, Debug)]
pub struct PendingStep {
    token: RunToken,
}

impl PendingStep {
    pub fn new(token: RunToken) -> Self {
        Self { token }
    }

    #[inline]
    pub fn token(&self) -> &RunToken {
        &self.token
    }
}

pub trait StepScheduler {
    /// Make `step` ready once `delay` has elapsed.
    fn schedule(&mut self, step: PendingStep, delay: Duration);

    /// Steps whose delay has elapsed, oldest first. Called from the frame callback.
    fn drain_ready(&mut self) -> Vec<PendingStep>;
}

pub type Waker = Arc<dyn Fn() + Send + Sync>;

/// Timer stage runs on a tokio runtime; ready steps are handed back over a channel.
pub struct TokioScheduler {
    runtime: Runtime,
    ready_tx: UnboundedSender<PendingStep>,
    ready_rx: UnboundedReceiver<PendingStep>,
    waker: Option<Waker>,
}

impl TokioScheduler {
    pub fn new() -> std::io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("conway-timer")
            .enable_time()
            .build()?;
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        Ok(Self {
            runtime,
            ready_tx,
            ready_rx,
            waker: None,
        })
    }

    /// Called whenever a step becomes ready, e.g. to request a repaint.
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }
}

impl StepScheduler for TokioScheduler {
    fn schedule(&mut self, step: PendingStep, delay: Duration) {
        let ready_tx = self.ready_tx.clone();
        let waker = self.waker.clone();
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if ready_tx.send(step).is_ok() {
                if let Some(wake) = waker {
                    wake();
                }
            }
        });
    }

    fn drain_ready(&mut self) -> Vec<PendingStep> {
        let mut ready = Vec::new();
        while let Ok(step) = self.ready_rx.try_recv() {
            ready.push(step);
        }
        ready
    }
}

/// Every scheduled step is ready at the next frame. Used headless and in tests.
#[derive(Debug, Default)]
pub struct ImmediateScheduler {
    queue: VecDeque<PendingStep>,
    last_delay: Option<Duration>,
}

impl ImmediateScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn last_delay(&self) -> Option<Duration> {
        self.last_delay
    }
}

impl StepScheduler for ImmediateScheduler {
    fn schedule(&mut self, step: PendingStep, delay: Duration) {
        self.last_delay = Some(delay);
        self.queue.push_back(step);
    }

    fn drain_ready(&mut self) -> Vec<PendingStep> {
        self.queue.drain(..).collect()
    }
}
