//! Approval configuration from TOML (`[approval]` section)

use super::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// How review requests are answered when no person is attached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalPolicy {
    #[default]
    Approve,
    Reject,
}

/// Raw approval configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileApprovalConfig {
    pub policy: ApprovalPolicy,
    /// Feedback attached to every decision
    pub feedback: Option<String>,
}

impl FileApprovalConfig {
    pub(super) fn validate(&self) -> Vec<ConfigIssue> {
        if self.policy == ApprovalPolicy::Reject {
            return vec![ConfigIssue::warning(
                ConfigIssueCode::InvalidValue {
                    field: "approval.policy".to_string(),
                },
                "approval.policy = \"reject\" fails every human_review step and approval gate",
            )];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy_approves() {
        let config: FileApprovalConfig = toml::from_str("").unwrap();
        assert_eq!(config.policy, ApprovalPolicy::Approve);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_reject_policy_warns() {
        let config: FileApprovalConfig =
            toml::from_str("policy = \"reject\"\nfeedback = \"frozen\"").unwrap();
        assert_eq!(config.feedback.as_deref(), Some("frozen"));
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
