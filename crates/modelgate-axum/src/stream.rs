//! Emulated SSE streaming.
//!
//! The gateway never streams from upstream. A streaming response is
//! fabricated from one complete non-streaming call: the assistant
//! content is split into fixed-width character chunks and emitted as
//! OpenAI-style `chat.completion.chunk` events, closed by `data: [DONE]`.
//! Upstream failures after the response headers have gone out become an
//! in-band error event, so stream readers always terminate.

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::response::sse::{Event, KeepAlive, Sse};
use chrono::Utc;
use futures_util::stream::Stream;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};
use uuid::Uuid;

use modelgate_core::ports::CompletionPort;

use crate::error::{ERROR_TYPE_API, ERROR_TYPE_PROXY};

/// Characters per fabricated stream chunk.
const STREAM_CHUNK_CHARS: usize = 20;
/// Pause between consecutive chunks.
const STREAM_CHUNK_DELAY: Duration = Duration::from_millis(30);
/// Stream terminator expected by OpenAI SSE clients.
const STREAM_DONE: &str = "[DONE]";

type EventSender = mpsc::Sender<Result<Event, Infallible>>;

/// Run one non-streaming upstream call and fabricate an SSE stream from
/// its result.
///
/// The SSE response commits immediately; the upstream call runs in a
/// spawned task feeding the channel, so failures arrive in-band.
pub(crate) fn stream_emulated_completion(
    completions: Arc<dyn CompletionPort>,
    endpoint: String,
    api_key: String,
    outbound: Value,
    model: String,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + Send + 'static> {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        match completions.complete(&endpoint, &api_key, &outbound).await {
            Ok(reply) if reply.is_success() => match reply.first_choice_content() {
                Some(content) => emit_chunks(&tx, content, &model).await,
                None => {
                    warn!("Upstream reply carried no assistant content");
                    emit_error(&tx, "upstream response had no message content", ERROR_TYPE_PROXY)
                        .await;
                }
            },
            Ok(reply) => {
                let message = reply.error_message().map_or_else(
                    || format!("upstream returned status {}", reply.status),
                    ToString::to_string,
                );
                emit_error(&tx, &message, ERROR_TYPE_API).await;
            }
            Err(error) => {
                emit_error(&tx, &error.to_string(), ERROR_TYPE_PROXY).await;
            }
        }
        // The terminator goes out even after an error so readers stop.
        let _ = tx.send(Ok(Event::default().data(STREAM_DONE))).await;
    });

    Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::new())
}

async fn emit_chunks(tx: &EventSender, content: &str, model: &str) {
    let id = format!("chatcmpl-{}", Uuid::new_v4());
    let created = Utc::now().timestamp();

    for (index, chunk) in chunk_content(content, STREAM_CHUNK_CHARS)
        .into_iter()
        .enumerate()
    {
        if index > 0 {
            tokio::time::sleep(STREAM_CHUNK_DELAY).await;
        }
        let payload = json!({
            "id": id,
            "object": "chat.completion.chunk",
            "created": created,
            "model": model,
            "choices": [{
                "index": 0,
                "delta": { "content": chunk },
                "finish_reason": null,
            }],
        });
        if tx
            .send(Ok(Event::default().data(payload.to_string())))
            .await
            .is_err()
        {
            debug!("Stream receiver dropped, client disconnected");
            return;
        }
    }
}

async fn emit_error(tx: &EventSender, message: &str, error_type: &str) {
    let payload = json!({ "error": { "message": message, "type": error_type } });
    let _ = tx.send(Ok(Event::default().data(payload.to_string()))).await;
}

/// Split content into fixed-width character chunks.
///
/// Widths count Unicode scalar values, not bytes, so multi-byte content
/// never splits inside a character.
fn chunk_content(content: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_are_fixed_width_in_order() {
        let chunks = chunk_content("hello world this is a test", STREAM_CHUNK_CHARS);
        assert_eq!(chunks, vec!["hello world this is ", "a test"]);
    }

    #[test]
    fn short_content_is_one_chunk() {
        let chunks = chunk_content("hi", STREAM_CHUNK_CHARS);
        assert_eq!(chunks, vec!["hi"]);
    }

    #[test]
    fn empty_content_yields_no_chunks() {
        assert!(chunk_content("", STREAM_CHUNK_CHARS).is_empty());
    }

    #[test]
    fn multibyte_content_splits_on_characters() {
        let content = "é".repeat(25);
        let chunks = chunk_content(&content, STREAM_CHUNK_CHARS);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 20);
        assert_eq!(chunks[1].chars().count(), 5);
    }
}
