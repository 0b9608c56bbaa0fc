//! Target processing states.

use serde::{Deserialize, Serialize};

/// Where a target is in its recognition-data lifecycle.
///
/// Targets start in `Processing`; the simulator's lifecycle engine moves them
/// to `Success` or `Failed` after the configured delay. A recognition-affecting
/// update (image or width) puts a target back into `Processing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Processing,
    Success,
    Failed,
}

impl TargetStatus {
    /// True once the lifecycle engine has produced an outcome.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Processing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_spelling_is_lowercase() {
        assert_eq!(serde_json::to_string(&TargetStatus::Processing).unwrap(), "\"processing\"");
        assert_eq!(serde_json::to_string(&TargetStatus::Success).unwrap(), "\"success\"");
        assert_eq!(serde_json::to_string(&TargetStatus::Failed).unwrap(), "\"failed\"");
    }

    #[test]
    fn test_terminal_states() {
        assert!(!TargetStatus::Processing.is_terminal());
        assert!(TargetStatus::Success.is_terminal());
        assert!(TargetStatus::Failed.is_terminal());
    }
}
