use tokio::sync::watch;

/// Per-request context the engine consults while loading snapshots. Cheap to
/// clone; cancellation fans out to every clone.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: Option<String>,
    canceled: watch::Receiver<bool>,
}

/// Owning side of a request's cancellation signal.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl RequestContext {
    pub fn new() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        (RequestContext { request_id: None, canceled: rx }, CancelHandle { tx })
    }

    /// Context that can never be canceled, for tests and background work.
    pub fn detached() -> Self {
        let (_tx, rx) = watch::channel(false);
        RequestContext { request_id: None, canceled: rx }
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn is_canceled(&self) -> bool {
        *self.canceled.borrow()
    }

    /// Resolves once the request is canceled; pends forever if the handle is
    /// gone without having canceled.
    pub async fn canceled(&self) {
        let mut rx = self.canceled.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::detached()
    }
}
