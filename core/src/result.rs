//! Hands a finishing scene's result to the scene that asked for it.

use stage_types::{PendingRequest, SceneResult};

use crate::host::SceneHost;
use crate::stack::{SceneEntry, SceneStack};

pub struct ResultChannel;

impl ResultChannel {
    pub fn associate(entry: &mut SceneEntry, request: PendingRequest) {
        entry.set_pending_request(request);
    }

    /// Deliver `result` to the requester if it is still on the stack.
    ///
    /// Returns whether the requester received it. A missing requester drops
    /// the result; there is no queueing or redelivery.
    pub fn deliver<H: SceneHost + ?Sized>(
        stack: &SceneStack,
        host: &mut H,
        request: PendingRequest,
        result: SceneResult,
    ) -> bool {
        if !stack.contains(&request.requester) {
            tracing::debug!(
                requester = %request.requester,
                request_code = request.request_code,
                "Dropping scene result: requester left the stack"
            );
            return false;
        }
        match host.find_by_tag_mut(&request.requester) {
            Some(scene) => {
                scene.receive_result(request.request_code, result);
                true
            }
            None => {
                tracing::debug!(
                    requester = %request.requester,
                    "Dropping scene result: requester has no live instance"
                );
                false
            }
        }
    }
}
