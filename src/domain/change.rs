use crate::domain::branch::BranchName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub branch: BranchName,
    pub file_path: String,
    pub content: String,
    pub commit_message: String,
    pub ai_generated: bool,
}

impl ChangeSet {
    pub fn commit_message_for(ticket_id: &str) -> String {
        format!("Fix for {ticket_id}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileWrite {
    Created,
    Updated,
}

impl FileWrite {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileWrite::Created => "created",
            FileWrite::Updated => "updated",
        }
    }
}
