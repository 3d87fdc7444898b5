//! Request loop over async line streams.

use super::jsonrpc::{error_codes, handle_line, JsonRpcResponse};
use crate::router::Router;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

/// Serve requests from `reader` until end of input, one at a time in receipt order.
pub async fn serve<R, W>(router: &Router, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut segments = reader.split(b'\n');
    while let Some(mut raw) = segments.next_segment().await? {
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        // A line that is not UTF-8 is answered like any other unparsable line
        let response = match String::from_utf8(raw) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                debug!("Received: {}", line);
                match handle_line(router, &line) {
                    Some(response) => response,
                    None => continue,
                }
            }
            Err(e) => {
                warn!(error = %e, "Received line is not valid UTF-8");
                JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                )
            }
        };

        let response_json = serde_json::to_string(&response)?;
        debug!("Sending: {}", response_json);
        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    info!("Input closed, request loop finished");
    Ok(())
}

/// Serve on the process's standard input and output.
pub async fn run_stdio(router: &Router) -> std::io::Result<()> {
    info!("Serving on stdio");
    serve(router, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
