//! MJPEG streaming over `multipart/x-mixed-replace`.
//!
//! Each client gets its own task that polls the broadcaster and feeds parts
//! through a bounded channel into the response body. Transport backpressure
//! blocks that client's next `get_frame` without affecting other readers;
//! a disconnect shows up as a failed send and ends the task silently.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
};
use bytes::{BufMut, Bytes, BytesMut};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

use super::{AppError, AppResult, AppState};

const BOUNDARY: &str = "frame";

/// Handle a streaming request: parts until the peer disconnects.
pub async fn video_stream(State(state): State<AppState>) -> AppResult<Response> {
    // The first frame is fetched before the multipart response starts, so a
    // camera that cannot be opened surfaces as a plain HTTP error.
    let first = state.broadcaster.get_frame().await?;

    let (tx, rx) = mpsc::channel::<Result<Bytes, std::io::Error>>(1);
    let broadcaster = state.broadcaster.clone();
    tokio::spawn(async move {
        if tx.send(Ok(encode_part(&first))).await.is_err() {
            return;
        }
        loop {
            match broadcaster.get_frame().await {
                Ok(frame) => {
                    if tx.send(Ok(encode_part(&frame))).await.is_err() {
                        debug!("Stream client disconnected");
                        break;
                    }
                }
                Err(e) => {
                    warn!("Stream ended: {e}");
                    break;
                }
            }
        }
    });

    let body = Body::from_stream(ReceiverStream::new(rx));

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/x-mixed-replace; boundary={BOUNDARY}"),
        )
        .header(header::CACHE_CONTROL, "no-cache, no-store")
        .header(header::CONNECTION, "close")
        .body(body)
        .map_err(|e| AppError::internal(format!("Failed to build stream response: {e}")))
}

/// One multipart part: boundary, part headers, JPEG payload, trailing CRLF.
fn encode_part(frame: &Bytes) -> Bytes {
    let head = format!(
        "--{BOUNDARY}\r\nContent-Type: image/jpeg\r\nContent-Length: {}\r\n\r\n",
        frame.len()
    );
    let mut part = BytesMut::with_capacity(head.len() + frame.len() + 2);
    part.put(head.as_bytes());
    part.put(frame.clone());
    part.put(&b"\r\n"[..]);
    part.freeze()
}
