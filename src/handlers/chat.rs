// POST /chat handler

use crate::chat::ChatRelay;
use crate::sse::create_chat_event;
use bytes::Bytes;
use futures_util::stream::StreamExt;
use std::convert::Infallible;

pub async fn chat_handler(relay: ChatRelay, body: Bytes) -> Result<impl warp::Reply, Infallible> {
    tracing::debug!(bytes = body.len(), "POST /chat");

    // The relay runs on its own task; warp only sees the receiving end.
    let event_stream = relay.spawn(body).map(|event| create_chat_event(&event));

    Ok(warp::sse::reply(
        warp::sse::keep_alive().stream(event_stream),
    ))
}
