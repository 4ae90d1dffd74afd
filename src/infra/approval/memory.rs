//! In-memory approval gateway.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::{ApprovalGateway, ApprovalRequest, EngineError, MoveApprovalRequest};
use crate::util::clock::now_ms;
use crate::util::RequestId;

/// What a stored request asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Use of one cross-department resource by a new placement.
    Placement(ApprovalRequest),
    /// Relocation of a confirmed cross-department assignment.
    Move(MoveApprovalRequest),
}

impl RequestKind {
    /// Session the request concerns.
    #[must_use]
    pub fn class_session_id(&self) -> &str {
        match self {
            Self::Placement(r) => &r.class_session_id,
            Self::Move(r) => &r.class_session_id,
        }
    }
}

/// A request held by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRequest {
    /// Request identifier.
    pub id: RequestId,
    /// Request body.
    pub kind: RequestKind,
    /// Still awaiting a decision.
    pub active: bool,
    /// Timestamp milliseconds.
    pub created_at_ms: u128,
}

/// Gateway that records requests in memory.
#[derive(Default)]
pub struct InMemoryApprovalGateway {
    requests: Mutex<Vec<StoredRequest>>,
}

impl InMemoryApprovalGateway {
    /// Create an empty gateway.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All requests, in creation order.
    #[must_use]
    pub fn requests(&self) -> Vec<StoredRequest> {
        self.requests.lock().clone()
    }

    /// Active requests for a session.
    #[must_use]
    pub fn active_for_session(&self, session_id: &str) -> Vec<StoredRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.active && r.kind.class_session_id() == session_id)
            .cloned()
            .collect()
    }

    fn push(&self, kind: RequestKind) -> RequestId {
        let id = uuid::Uuid::new_v4();
        self.requests.lock().push(StoredRequest {
            id,
            kind,
            active: true,
            created_at_ms: now_ms(),
        });
        id
    }
}

#[async_trait]
impl ApprovalGateway for InMemoryApprovalGateway {
    async fn create_request(&self, request: ApprovalRequest) -> Result<RequestId, EngineError> {
        tracing::debug!(
            session = %request.class_session_id,
            resource = %request.resource_id,
            department = %request.target_department_id,
            "approval requested"
        );
        Ok(self.push(RequestKind::Placement(request)))
    }

    async fn request_move_approval(
        &self,
        request: MoveApprovalRequest,
    ) -> Result<RequestId, EngineError> {
        tracing::debug!(
            session = %request.class_session_id,
            period = request.new_start_period_index,
            "move approval requested"
        );
        Ok(self.push(RequestKind::Move(request)))
    }

    async fn cancel_active_requests_for_class_session(
        &self,
        session_id: &str,
    ) -> Result<usize, EngineError> {
        let mut cancelled = 0;
        for request in self.requests.lock().iter_mut() {
            if request.active && request.kind.class_session_id() == session_id {
                request.active = false;
                cancelled += 1;
            }
        }
        Ok(cancelled)
    }
}
