pub mod analysis_assistant;
pub mod repository_service;
pub mod ticket_service;

pub use analysis_assistant::AnalysisAssistant;
pub use repository_service::RepositoryService;
pub use ticket_service::TicketService;
