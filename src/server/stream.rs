//! Server-Sent-Events handler relaying broadcast frames to one client.

use crate::broadcast::{ClientRegistry, Frame};
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::sse::{Event, Sse};
use futures::Stream;
use std::convert::Infallible;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shared state for every streaming connection.
#[derive(Clone)]
pub(crate) struct StreamContext {
    pub(crate) clients: ClientRegistry,
    pub(crate) shutdown: CancellationToken,
}

/// Stream frames to one client until it disconnects or live reload stops.
///
/// The client is registered for as long as the response body is alive:
/// when the client goes away the body and its channel are dropped, which
/// unregisters it. No keep-alive frames are sent while idle.
pub(crate) async fn stream_events(State(ctx): State<StreamContext>) -> impl IntoResponse {
    let events = client_events(&ctx);
    ([(header::CONNECTION, "keep-alive")], Sse::new(events))
}

fn client_events(ctx: &StreamContext) -> impl Stream<Item = Result<Event, Infallible>> + use<> {
    let mut client = ctx.clients.register();
    let shutdown = ctx.shutdown.clone();
    debug!(client = client.id(), "client connected");

    async_stream::stream! {
        yield Ok(Frame::Hello.to_event());

        loop {
            let frame = tokio::select! {
                biased;
                _ = shutdown.cancelled() => None,
                frame = client.recv() => frame,
            };

            match frame {
                Some(frame) => yield Ok(frame.to_event()),
                None => break,
            }
        }

        debug!(client = client.id(), "stream closed");
    }
}
