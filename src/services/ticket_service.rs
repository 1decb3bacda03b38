use async_trait::async_trait;

use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[async_trait]
pub trait TicketService: Send + Sync {
    async fn fetch(&self, id: &str) -> AppResult<Ticket>;
    /// Comments are append-only; nothing else about a ticket is written.
    async fn comment(&self, id: &str, text: &str) -> AppResult<()>;
}
