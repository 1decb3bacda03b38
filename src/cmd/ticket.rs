use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::domain::ticket::Ticket;
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct TicketArgs {
    #[command(subcommand)]
    pub command: TicketCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TicketCommand {
    /// Print a ticket's summary, status and description.
    Show { id: String },
    /// Append a comment to a ticket.
    Comment { id: String, text: String },
}

pub async fn run(ctx: &AppContext, command: TicketCommand) -> AppResult<()> {
    match command {
        TicketCommand::Show { id } => {
            let ticket = ctx.tickets.fetch(id.trim()).await?;
            println!("{}", describe(&ticket));
        }
        TicketCommand::Comment { id, text } => {
            ctx.tickets.comment(id.trim(), &text).await?;
            println!("Comment added to {}", id.trim());
        }
    }
    Ok(())
}

fn describe(ticket: &Ticket) -> String {
    format!(
        "{}: {}\nStatus: {}\n\n{}",
        ticket.id, ticket.summary, ticket.status, ticket.description
    )
}
