use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Owning handle for a spawned orchestration run.
///
/// Dropping the handle tears the run down: the stop signal is sent and the task is
/// aborted, which drops any in-flight provider request together with its timer.
#[derive(Debug)]
pub struct RunHandle {
    inner: Option<JoinHandle<()>>,
    stop_tx: Option<oneshot::Sender<()>>,
}

impl RunHandle {
    /// Wrap a spawned run and the sender half of its stop signal.
    #[must_use]
    pub const fn new(inner: JoinHandle<()>, stop_tx: oneshot::Sender<()>) -> Self {
        Self {
            inner: Some(inner),
            stop_tx: Some(stop_tx),
        }
    }

    /// Returns true once the run task has completed (or was torn down).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.inner.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Tear the run down immediately.
    pub fn cancel(mut self) {
        self.teardown();
    }

    // Stop first so a run parked on the signal exits cleanly, then abort
    // whatever is still running.
    fn teardown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.inner.take()
            && !task.is_finished()
        {
            task.abort();
        }
    }

    /// Wait for the run to finish on its own, without tearing it down.
    pub async fn join(mut self) {
        if let Some(h) = self.inner.take() {
            let _ = h.await;
        }
    }
}

impl Drop for RunHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}
