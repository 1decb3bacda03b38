use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{AnalysisAssistant, RepositoryService, TicketService};
use crate::workflow::review::ReviewGate;

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub tickets: Arc<dyn TicketService>,
    pub repositories: Arc<dyn RepositoryService>,
    pub assistant: Option<Arc<dyn AnalysisAssistant>>,
    pub review_gate: Arc<dyn ReviewGate>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        tickets: Arc<dyn TicketService>,
        repositories: Arc<dyn RepositoryService>,
        assistant: Option<Arc<dyn AnalysisAssistant>>,
        review_gate: Arc<dyn ReviewGate>,
    ) -> Self {
        Self {
            config,
            tickets,
            repositories,
            assistant,
            review_gate,
        }
    }
}
