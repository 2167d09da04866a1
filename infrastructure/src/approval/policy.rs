use async_trait::async_trait;
use mcp_application::{ApprovalError, ApprovalService};
use mcp_domain::{ReviewDecision, ReviewRequest};
use tracing::info;

/// Answers every review with the same decision, without asking anyone.
///
/// Used by the CLI, which has no reviewer to wait for.
#[derive(Debug, Clone)]
pub struct PolicyApprover {
    approve: bool,
    feedback: Option<String>,
}

impl PolicyApprover {
    pub fn approve_all() -> Self {
        Self {
            approve: true,
            feedback: None,
        }
    }

    pub fn reject_all() -> Self {
        Self {
            approve: false,
            feedback: None,
        }
    }

    pub fn with_feedback(mut self, feedback: Option<String>) -> Self {
        self.feedback = feedback;
        self
    }

    fn reviewer(&self) -> &'static str {
        if self.approve {
            "auto-approve"
        } else {
            "auto-reject"
        }
    }
}

#[async_trait]
impl ApprovalService for PolicyApprover {
    async fn review(&self, request: &ReviewRequest) -> Result<ReviewDecision, ApprovalError> {
        info!(
            "{} {} for step '{}' answered by {}",
            request.kind,
            request.id,
            request.step_id,
            self.reviewer()
        );
        Ok(ReviewDecision {
            approved: self.approve,
            feedback: self.feedback.clone(),
            reviewer: Some(self.reviewer().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_domain::ReviewKind;
    use serde_json::json;

    fn request() -> ReviewRequest {
        ReviewRequest::new(ReviewKind::Approval, "s1", "solve", json!({}))
    }

    #[tokio::test]
    async fn test_approve_all() {
        let decision = PolicyApprover::approve_all()
            .review(&request())
            .await
            .unwrap();
        assert!(decision.approved);
        assert_eq!(decision.reviewer.as_deref(), Some("auto-approve"));
        assert!(decision.feedback.is_none());
    }

    #[tokio::test]
    async fn test_reject_all_with_feedback() {
        let decision = PolicyApprover::reject_all()
            .with_feedback(Some("frozen until audit".to_string()))
            .review(&request())
            .await
            .unwrap();
        assert!(!decision.approved);
        assert_eq!(decision.feedback.as_deref(), Some("frozen until audit"));
    }
}
