use std::{convert::Infallible, sync::Arc, time::Duration};

use crate::{events::LEAD_CREATED, main_lib::AppState};
use axum::{
    extract::State,
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_core::stream::Stream;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};

/// Long-lived SSE subscription. New leads arrive as default `data:` messages
/// (the dashboard's `EventSource.onmessage`); bulk deletes arrive as a named
/// `clear` event. The broadcast receiver is dropped with the stream, which
/// deregisters the subscriber on every exit path.
async fn subscribe(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let receiver = BroadcastStream::new(state.event_bus.subscribe());
    let stream = tokio_stream::StreamExt::filter_map(receiver, |event| match event {
        Ok(evt) => {
            if evt.name == LEAD_CREATED {
                let Some(payload) = evt.payload else {
                    return None;
                };
                match SseEvent::default().json_data(payload) {
                    Ok(ev) => Some(Ok(ev)),
                    Err(err) => {
                        tracing::error!("Failed to serialize SSE payload: {}", err);
                        None
                    }
                }
            } else {
                Some(Ok(SseEvent::default().event(evt.name).data("null")))
            }
        }
        // A lagged subscriber skips what it missed; it is never dropped for
        // being slow, and it never delays the rest.
        Err(BroadcastStreamRecvError::Lagged(_)) => None,
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stream", get(subscribe))
}
