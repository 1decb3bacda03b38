#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(pub String);

impl BranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Every ticket maps to exactly one branch, so a second run for the same
    /// ticket collides with the branch left by the first.
    pub fn for_ticket(ticket_id: &str) -> Self {
        Self(format!("issue/{}-fix", ticket_id.trim().to_lowercase()))
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_ticket_into_branch_name() {
        assert_eq!(BranchName::for_ticket("PROJ-123").as_str(), "issue/proj-123-fix");
        assert_eq!(BranchName::for_ticket("ABC-1").as_str(), "issue/abc-1-fix");
    }

    #[test]
    fn keeps_lowercase_ids_untouched() {
        assert_eq!(BranchName::for_ticket("ops-7").as_str(), "issue/ops-7-fix");
    }
}
