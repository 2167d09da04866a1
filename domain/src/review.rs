//! Human review requests and decisions.
//!
//! A protocol can hand control to a person in two ways: a `human_review`
//! step, or an approval gate listed in `protocol.humanInTheLoop`. Both
//! produce a [`ReviewRequest`] and wait for a [`ReviewDecision`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewKind {
    /// A `human_review` step asking for sign-off on the work so far.
    Review,
    /// A gate in front of a step listed in `approvalSteps`.
    Approval,
}

impl ReviewKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewKind::Review => "review",
            ReviewKind::Approval => "approval",
        }
    }
}

impl std::fmt::Display for ReviewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub id: String,
    pub kind: ReviewKind,
    pub session_id: String,
    pub step_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// What the reviewer is asked to look at.
    pub data: Value,
    pub requested_at: DateTime<Utc>,
}

impl ReviewRequest {
    pub fn new(
        kind: ReviewKind,
        session_id: impl Into<String>,
        step_id: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            id: format!("review-{}", uuid::Uuid::new_v4()),
            kind,
            session_id: session_id.into(),
            step_id: step_id.into(),
            description: None,
            data,
            requested_at: Utc::now(),
        }
    }

    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDecision {
    pub approved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
}

impl ReviewDecision {
    pub fn approve() -> Self {
        Self {
            approved: true,
            feedback: None,
            reviewer: None,
        }
    }

    pub fn reject(feedback: impl Into<String>) -> Self {
        Self {
            approved: false,
            feedback: Some(feedback.into()),
            reviewer: None,
        }
    }

    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    pub fn with_reviewer(mut self, reviewer: impl Into<String>) -> Self {
        self.reviewer = Some(reviewer.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_ids_are_unique() {
        let a = ReviewRequest::new(ReviewKind::Review, "s1", "review", json!({}));
        let b = ReviewRequest::new(ReviewKind::Review, "s1", "review", json!({}));
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("review-"));
    }

    #[test]
    fn test_request_wire_format() {
        let request = ReviewRequest::new(ReviewKind::Approval, "s1", "solve", json!({"x": 1}))
            .with_description(Some("Approve solving".to_string()));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["kind"], "approval");
        assert_eq!(json["stepId"], "solve");
        assert_eq!(json["description"], "Approve solving");
    }

    #[test]
    fn test_rejection_carries_feedback() {
        let decision = ReviewDecision::reject("budget too high").with_reviewer("ops");
        assert!(!decision.approved);
        assert_eq!(decision.feedback.as_deref(), Some("budget too high"));
        assert_eq!(decision.reviewer.as_deref(), Some("ops"));
    }
}
