//! Line-oriented request session
//!
//! Reads one JSON tool call per line and writes one JSON reply per line.
//! Blank lines are skipped. A bad line gets a `failed` reply and the session
//! carries on; only I/O errors end it early.

use crate::ToolboxError;
use crate::config::SessionConfig;
use crate::ops::Reply;
use crate::tools::Dispatcher;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct Session {
    dispatcher: Arc<Dispatcher>,
    config: SessionConfig,
    cancel_token: CancellationToken,
}

impl Session {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        config: SessionConfig,
        cancel_token: CancellationToken,
    ) -> Self {
        Self {
            dispatcher,
            config,
            cancel_token,
        }
    }

    /// Serve requests until end of input or cancellation
    pub async fn run<R, W>(&self, mut reader: R, mut writer: W) -> crate::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let limit = self.config.max_request_bytes;
        let mut line = Vec::new();
        let mut served = 0u64;

        loop {
            line.clear();
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    info!("Session cancelled");
                    break;
                }
                result = read_request(&mut reader, &mut line, limit) => {
                    let reply = match result? {
                        Line::Eof => break,
                        Line::Oversize => Some(self.dispatcher.reject(&ToolboxError::Request(
                            format!("request exceeds {limit} bytes"),
                        ))),
                        Line::Complete => self.answer(&line).await,
                    };
                    let Some(reply) = reply else {
                        continue;
                    };

                    let mut out = serde_json::to_vec(&reply)?;
                    out.push(b'\n');
                    writer.write_all(&out).await?;
                    writer.flush().await?;
                    served += 1;
                }
            }
        }

        debug!(served, "Session finished");
        Ok(())
    }

    /// Reply to one request line; `None` for a blank line
    async fn answer(&self, raw: &[u8]) -> Option<Reply> {
        let request = match std::str::from_utf8(raw) {
            Ok(text) => text.trim(),
            Err(_) => {
                return Some(
                    self.dispatcher
                        .reject(&ToolboxError::Request("request is not UTF-8".to_string())),
                );
            }
        };

        if request.is_empty() {
            return None;
        }
        Some(self.dispatcher.handle_request(request).await)
    }
}

/// Outcome of reading one request line
#[derive(Debug, PartialEq, Eq)]
enum Line {
    /// Input ended before any byte of a new line
    Eof,
    /// `line` holds the request without its `\n` or `\r\n`
    Complete,
    /// Longer than the limit; the rest of it was skipped and `line` is empty
    Oversize,
}

/// Read one `\n`-terminated line into `line`, holding at most `limit` bytes
/// of it (plus one buffered chunk) in memory
async fn read_request<R>(reader: &mut R, line: &mut Vec<u8>, limit: usize) -> std::io::Result<Line>
where
    R: AsyncBufRead + Unpin,
{
    let mut started = false;
    let mut oversize = false;

    loop {
        let chunk = reader.fill_buf().await?;
        if chunk.is_empty() {
            break;
        }
        started = true;

        let newline = chunk.iter().position(|&b| b == b'\n');
        let used = newline.map_or(chunk.len(), |i| i + 1);
        if !oversize {
            line.extend_from_slice(&chunk[..used]);
            // one spare byte for a '\r' whose '\n' is still unread
            if newline.is_none() && line.len() > limit.saturating_add(1) {
                oversize = true;
                line.clear();
            }
        }
        reader.consume(used);

        if newline.is_some() {
            break;
        }
    }

    if !started {
        return Ok(Line::Eof);
    }
    if oversize {
        return Ok(Line::Oversize);
    }

    if line.last() == Some(&b'\n') {
        line.pop();
    }
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    if line.len() > limit {
        line.clear();
        return Ok(Line::Oversize);
    }
    Ok(Line::Complete)
}
