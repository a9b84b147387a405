//! Line-delimited JSON front end for the service.
//!
//! Each input line is one request object tagged by `op`; each request gets exactly one
//! response line. Failures are reported in-band as `{"error": ..., "kind": ...}` so a
//! bad request never ends the session.

use std::time::Instant;

use anyhow::Result;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::error::ServiceError;
use crate::service::LyricService;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Request {
    Search {
        #[serde(default)]
        query: String,
        #[serde(default)]
        platforms: Vec<String>,
    },
    Status,
    Formats,
    Update,
    Download {
        platform: String,
        #[serde(rename = "musicId")]
        music_id: String,
        #[serde(default)]
        format: Option<String>,
    },
}

impl Request {
    pub fn op(&self) -> &'static str {
        match self {
            Request::Search { .. } => "search",
            Request::Status => "status",
            Request::Formats => "formats",
            Request::Update => "update",
            Request::Download { .. } => "download",
        }
    }
}

/// Serve requests until the input ends or `shutdown` fires
pub async fn serve_lines<R, W>(
    service: &LyricService,
    input: R,
    mut output: W,
    shutdown: CancellationToken,
) -> Result<()>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();
    tracing::info!("Serving requests on stdin");

    loop {
        let line = tokio::select! {
            _ = shutdown.cancelled() => break,
            line = lines.next_line() => line?,
        };
        let Some(line) = line else {
            tracing::debug!("Input closed");
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(service, &line).await;
        output.write_all(response.to_string().as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }

    Ok(())
}

pub async fn handle_line(service: &LyricService, line: &str) -> Value {
    let request = match serde_json::from_str::<Request>(line) {
        Ok(request) => request,
        Err(e) => {
            return error_value(&ServiceError::InvalidRequest(e.to_string()));
        }
    };

    let op = request.op();
    let started = Instant::now();
    let result = dispatch(service, request).await;
    tracing::debug!(
        "{} {} in {}ms",
        op,
        if result.is_ok() { "ok" } else { "failed" },
        started.elapsed().as_millis()
    );

    match result {
        Ok(value) => value,
        Err(e) => {
            if e.is_client_error() {
                tracing::debug!("Rejected request: {}", e);
            } else {
                tracing::warn!("Request failed: {:#}", e);
            }
            error_value(&e)
        }
    }
}

async fn dispatch(service: &LyricService, request: Request) -> Result<Value, ServiceError> {
    let value = match request {
        Request::Search { query, platforms } => to_value(service.search(&query, &platforms).await?)?,
        Request::Status => to_value(service.status())?,
        Request::Formats => to_value(service.list_formats())?,
        Request::Update => to_value(service.trigger_reload().await?)?,
        Request::Download { platform, music_id, format } => {
            let file = service.download(&platform, &music_id, format.as_deref())?;
            json!({
                "fileName": file.file_name,
                "path": file.path.display().to_string(),
                "size": file.bytes.len(),
            })
        }
    };
    Ok(value)
}

fn to_value<T: serde::Serialize>(value: T) -> Result<Value, ServiceError> {
    serde_json::to_value(value).map_err(|e| ServiceError::Internal(e.into()))
}

fn error_value(error: &ServiceError) -> Value {
    json!({ "error": error.to_string(), "kind": error.kind() })
}
