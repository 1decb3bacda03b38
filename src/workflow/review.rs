use std::io::{self, Write};

use async_trait::async_trait;
use tokio::sync::{Mutex, oneshot};

use crate::domain::repository::PullRequestHandle;
use crate::error::{AppError, AppResult};

/// The single suspension point of a run. Implementations resolve once an
/// operator has reviewed the pull request; there is no timeout.
#[async_trait]
pub trait ReviewGate: Send + Sync {
    async fn wait_for_review(&self, pull_request: &PullRequestHandle) -> AppResult<()>;
}

/// Sending half of a [`ChannelReviewGate`]. Dropping it without calling
/// [`ReviewSignal::approve`] aborts the wait.
pub struct ReviewSignal(oneshot::Sender<()>);

impl ReviewSignal {
    pub fn approve(self) {
        // The gate may already be gone if the run halted before reaching it.
        let _ = self.0.send(());
    }
}

pub struct ChannelReviewGate {
    receiver: Mutex<Option<oneshot::Receiver<()>>>,
}

impl ChannelReviewGate {
    pub fn new() -> (Self, ReviewSignal) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                receiver: Mutex::new(Some(receiver)),
            },
            ReviewSignal(sender),
        )
    }
}

#[async_trait]
impl ReviewGate for ChannelReviewGate {
    async fn wait_for_review(&self, _pull_request: &PullRequestHandle) -> AppResult<()> {
        let receiver = self
            .receiver
            .lock()
            .await
            .take()
            .ok_or_else(|| AppError::ReviewAborted("review signal already consumed".to_string()))?;
        receiver
            .await
            .map_err(|_| AppError::ReviewAborted("review signal dropped".to_string()))
    }
}

/// Operator confirmation on the terminal. The blocking read runs off the
/// async runtime and resolves a [`ChannelReviewGate`].
pub struct StdinReviewGate;

#[async_trait]
impl ReviewGate for StdinReviewGate {
    async fn wait_for_review(&self, pull_request: &PullRequestHandle) -> AppResult<()> {
        let (gate, signal) = ChannelReviewGate::new();
        let url = pull_request.url.clone();
        tokio::task::spawn_blocking(move || {
            if prompt_for_review(&url).is_ok() {
                signal.approve();
            }
        });
        gate.wait_for_review(pull_request).await
    }
}

fn prompt_for_review(url: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "PR created: {url}")?;
    write!(
        stdout,
        "Press Enter after you have reviewed/approved the PR code... "
    )?;
    stdout.flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "stdin closed before review confirmation",
        ));
    }
    Ok(())
}
