//! Background curve worker
//!
//! Curve generation runs off the interactive loop. The handle sends typed
//! requests to a tokio task and only ever surfaces the response to its most
//! recent request:
//! - queued requests are coalesced to the newest before computing
//! - the computation itself runs on the blocking pool
//! - responses to superseded requests are dropped on receipt

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{CurveError, CurveResult};
use crate::generator::{generate_curves, CurveOptions, Polyline};
use crate::topology::ConnectionPoint;

/// Monotonic identifier of a curve request
pub type RequestId = u64;

/// A request to smooth a point set
#[derive(Clone, Debug)]
pub struct CurveRequest {
    pub id: RequestId,
    pub points: Arc<[ConnectionPoint]>,
    pub options: CurveOptions,
}

/// The worker's answer to one request
#[derive(Clone, Debug)]
pub struct CurveResponse {
    pub id: RequestId,
    pub result: CurveResult<Vec<Polyline>>,
}

/// Handle to the curve worker task
#[derive(Debug)]
pub struct CurveWorker {
    requests: mpsc::UnboundedSender<CurveRequest>,
    responses: mpsc::UnboundedReceiver<CurveResponse>,
    next_id: RequestId,
    latest: Option<RequestId>,
    task: JoinHandle<()>,
}

impl CurveWorker {
    /// Spawn the worker on the current tokio runtime.
    ///
    /// Must be called from within a runtime context.
    pub fn spawn() -> Self {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let (response_tx, response_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(request_rx, response_tx));

        Self {
            requests: request_tx,
            responses: response_rx,
            next_id: 0,
            latest: None,
            task,
        }
    }

    /// Queue a computation; any earlier request becomes stale
    pub fn submit(
        &mut self,
        points: impl Into<Arc<[ConnectionPoint]>>,
        options: CurveOptions,
    ) -> CurveResult<RequestId> {
        self.next_id += 1;
        let id = self.next_id;

        self.requests
            .send(CurveRequest {
                id,
                points: points.into(),
                options,
            })
            .map_err(|_| CurveError::WorkerClosed)?;

        tracing::debug!("Submitted curve request {}", id);
        self.latest = Some(id);
        Ok(id)
    }

    /// Id of the request whose response is still awaited, if any
    pub fn latest_request(&self) -> Option<RequestId> {
        self.latest
    }

    /// Forget the pending request so its response is discarded
    pub fn cancel(&mut self) {
        self.latest = None;
    }

    fn accept(&mut self, response: CurveResponse) -> Option<CurveResponse> {
        if Some(response.id) == self.latest {
            self.latest = None;
            Some(response)
        } else {
            tracing::debug!("Discarding stale curve response {}", response.id);
            None
        }
    }

    /// Non-blocking poll for the latest response
    pub fn try_recv(&mut self) -> Option<CurveResponse> {
        while let Ok(response) = self.responses.try_recv() {
            if let Some(response) = self.accept(response) {
                return Some(response);
            }
        }
        None
    }

    /// Wait for the latest response.
    ///
    /// Returns `None` when nothing is pending or the worker has stopped.
    pub async fn recv(&mut self) -> Option<CurveResponse> {
        while self.latest.is_some() {
            let response = self.responses.recv().await?;
            if let Some(response) = self.accept(response) {
                return Some(response);
            }
        }
        None
    }
}

impl Drop for CurveWorker {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut requests: mpsc::UnboundedReceiver<CurveRequest>,
    responses: mpsc::UnboundedSender<CurveResponse>,
) {
    while let Some(mut request) = requests.recv().await {
        while let Ok(newer) = requests.try_recv() {
            tracing::debug!("Curve request {} superseded by {}", request.id, newer.id);
            request = newer;
        }

        let CurveRequest { id, points, options } = request;
        let result = tokio::task::spawn_blocking(move || generate_curves(&points, &options))
            .await
            .unwrap_or_else(|e| Err(CurveError::WorkerFailed(e.to_string())));

        if responses.send(CurveResponse { id, result }).is_err() {
            break;
        }
    }
}
