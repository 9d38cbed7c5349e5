use std::convert::Infallible;

use warp::sse::Event;

use crate::chat::ChatEvent;

/// Frame a chat event as one unnamed SSE `data:` event
///
/// warp writes `data:` with no separator, so the payload carries a leading
/// space; clients matching on `data: ` see the usual framing.
pub fn create_chat_event(event: &ChatEvent) -> Result<Event, Infallible> {
    let payload = match serde_json::to_string(event) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize chat event");
            serde_json::json!({"type": "error", "error": e.to_string()}).to_string()
        }
    };

    Ok(Event::default().data(format!(" {}", payload)))
}
