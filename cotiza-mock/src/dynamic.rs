use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cotiza_core::{CotizaError, RequestSpec, Transport};
use serde_json::Value;
use tokio::sync::Mutex;

/// Instruction for how a request should behave for a given provider.
#[derive(Clone, Debug)]
pub enum MockBehavior {
    /// Return the provided body immediately.
    Return(Value),
    /// Return the provided body after a delay.
    Delayed(Duration, Value),
    /// Fail immediately with the provided error.
    Fail(CotizaError),
    /// Hang indefinitely (simulate a stalled upstream).
    Hang,
}

#[derive(Default)]
struct InternalState {
    rules: HashMap<String, MockBehavior>,
    requests: HashMap<String, Vec<RequestSpec>>,
    order: Vec<String>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
    in_flight: Arc<AtomicUsize>,
}

impl DynamicMockController {
    /// Set the behavior for requests issued on behalf of `provider`.
    pub async fn set_behavior(&self, provider: &str, behavior: MockBehavior) {
        let mut guard = self.state.lock().await;
        guard.rules.insert(provider.to_string(), behavior);
    }

    /// Number of requests issued for `provider`.
    pub async fn calls(&self, provider: &str) -> usize {
        let guard = self.state.lock().await;
        guard.requests.get(provider).map_or(0, Vec::len)
    }

    /// Return a copy of the request log for `provider`.
    pub async fn requests(&self, provider: &str) -> Vec<RequestSpec> {
        let guard = self.state.lock().await;
        guard.requests.get(provider).cloned().unwrap_or_default()
    }

    /// Provider labels in the order their requests arrived.
    pub async fn call_order(&self) -> Vec<String> {
        let guard = self.state.lock().await;
        guard.order.clone()
    }

    /// Requests currently awaiting a response. Drops to zero once a pending request
    /// future is dropped (timeout or teardown).
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.rules.clear();
        guard.requests.clear();
        guard.order.clear();
    }
}

/// A transport that defers all behavior to an external controller.
///
/// Providers without a configured behavior fail with a `Transport` error.
pub struct DynamicMockTransport {
    state: Arc<Mutex<InternalState>>,
    in_flight: Arc<AtomicUsize>,
}

impl DynamicMockTransport {
    /// Create a new dynamic mock transport and its controller.
    #[must_use]
    pub fn new_with_controller() -> (Arc<dyn Transport>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let in_flight = Arc::new(AtomicUsize::new(0));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
            in_flight: Arc::clone(&in_flight),
        };
        let me = Arc::new(Self { state, in_flight });
        (me as Arc<dyn Transport>, controller)
    }
}

struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Transport for DynamicMockTransport {
    async fn get_json(&self, provider: &str, req: &RequestSpec) -> Result<Value, CotizaError> {
        // Log the request and take a behavior snapshot without holding the lock
        // across await points.
        let behavior = {
            let mut guard = self.state.lock().await;
            guard
                .requests
                .entry(provider.to_string())
                .or_default()
                .push(req.clone());
            guard.order.push(provider.to_string());
            guard.rules.get(provider).cloned()
        };

        let _in_flight = InFlight::enter(&self.in_flight);
        match behavior {
            Some(MockBehavior::Return(body)) => Ok(body),
            Some(MockBehavior::Delayed(delay, body)) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
            Some(MockBehavior::Fail(e)) => Err(e),
            Some(MockBehavior::Hang) => std::future::pending().await,
            None => Err(CotizaError::transport(provider, "no mock behavior configured")),
        }
    }
}
