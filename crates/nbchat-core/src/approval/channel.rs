//! Channel-based approval gate
//!
//! The orchestrator sends each approval request through an mpsc channel;
//! every request carries a oneshot sender for the decision. A host UI task
//! owns the receiver and answers one request at a time. Dropping the
//! responder (or the receiver) counts as a denial.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::ApprovalGate;
use crate::provider::ToolCall;

/// Request sent through the approval channel
#[derive(Debug)]
pub struct ApprovalRequest {
    /// Unique id of this request
    pub id: String,
    pub tool_call: ToolCall,
    response_tx: oneshot::Sender<bool>,
}

impl ApprovalRequest {
    pub fn respond(self, approved: bool) {
        let _ = self.response_tx.send(approved);
    }
}

/// Receiver half, owned by the host
pub type ApprovalReceiver = mpsc::UnboundedReceiver<ApprovalRequest>;

/// Create a gate and the receiver the host answers from
pub fn approval_channel() -> (ChannelApprovalGate, ApprovalReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelApprovalGate { tx }, rx)
}

/// Gate that forwards each request to a host over a channel
#[derive(Clone)]
pub struct ChannelApprovalGate {
    tx: mpsc::UnboundedSender<ApprovalRequest>,
}

#[async_trait]
impl ApprovalGate for ChannelApprovalGate {
    async fn request_approval(&self, call: &ToolCall) -> bool {
        let (response_tx, response_rx) = oneshot::channel();
        let id = uuid::Uuid::new_v4().to_string();
        let request = ApprovalRequest {
            id: id.clone(),
            tool_call: call.clone(),
            response_tx,
        };

        if self.tx.send(request).is_err() {
            warn!(
                request_id = %id,
                tool = call.name(),
                "Approval receiver dropped, denying tool call"
            );
            return false;
        }
        debug!(request_id = %id, tool = call.name(), "Waiting for approval");

        response_rx.await.unwrap_or_else(|_| {
            warn!(
                request_id = %id,
                tool = call.name(),
                "Approval responder dropped, denying tool call"
            );
            false
        })
    }
}
