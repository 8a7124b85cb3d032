//! # Request Loop
//!
//! Line-delimited JSON: one `RegistryRequest` per input line, one
//! `RegistryResponse` per output line, in order. Blank lines are skipped.

use std::io;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};
use username_registry::{RegistryRequestHandler, UsernameRegistryApi};

/// Answer requests from `reader` until end of input.
///
/// Returns the number of requests handled.
pub async fn serve<S, R, W>(
    handler: &RegistryRequestHandler<S>,
    reader: R,
    mut writer: W,
) -> io::Result<usize>
where
    S: UsernameRegistryApi + ?Sized,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut handled = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = handler.handle_line(line).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        writer.write_all(&encoded).await?;
        writer.flush().await?;

        handled += 1;
        debug!(handled, "Request answered");
    }

    info!(handled, "Input closed, request loop finished");
    Ok(handled)
}
