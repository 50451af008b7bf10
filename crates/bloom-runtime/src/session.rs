//! Command loop: one reply line per input line.

use anyhow::{Context, Result};
use bitmap_bloom::{MembershipFilterApi, Metrics};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::commands::{execute, Command};

/// Serve commands from `input` until EOF, writing replies to `output`.
///
/// Returns the number of commands answered.
pub async fn serve<A, R, W>(filter: &A, metrics: &Metrics, input: R, mut output: W) -> Result<usize>
where
    A: MembershipFilterApi + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut answered = 0;

    while let Some(line) = lines.next_line().await.context("Failed to read command")? {
        if line.trim().is_empty() {
            continue;
        }

        let reply = match line.parse::<Command>() {
            Ok(command) => {
                debug!(command = ?command, "Executing");
                execute(filter, metrics, command).await
            }
            Err(e) => format!("ERR {}", e),
        };

        output
            .write_all(reply.as_bytes())
            .await
            .context("Failed to write reply")?;
        output
            .write_all(b"\n")
            .await
            .context("Failed to write reply")?;
        output.flush().await.context("Failed to flush reply")?;
        answered += 1;
    }

    Ok(answered)
}
