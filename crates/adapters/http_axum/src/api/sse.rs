//! Server-Sent Events (SSE) stream for real-time updates.

use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::extract::State;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use tokio_stream::{Stream, StreamExt};

use zonehub_app::event_bus::Subscription;
use zonehub_app::initial_events::initial_events;
use zonehub_app::ports::Section;
use zonehub_domain::event::Event;

use crate::state::AppState;

/// Adapts a bus [`Subscription`] to a [`Stream`].
struct SubscriptionStream(Subscription);

impl Stream for SubscriptionStream {
    type Item = Event;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Event>> {
        self.get_mut().0.poll_recv(cx)
    }
}

/// `GET /api/events/stream` — SSE stream of hub events.
///
/// Subscribes to the event bus first, then sends the initial snapshot events
/// followed by live events, each JSON-encoded in an SSE `data:` frame. A
/// client that falls behind loses events rather than slowing the hub down.
/// The subscription is released when the client disconnects.
pub async fn stream<S>(
    State(state): State<AppState<S>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>>
where
    S: Section + 'static,
{
    let subscription = state.event_bus.subscription(state.subscriber_capacity);
    let snapshot = initial_events(state.aggregator.as_ref(), state.organiser.as_ref());
    tracing::debug!(initial = snapshot.len(), "SSE client connected");

    let events = tokio_stream::iter(snapshot)
        .chain(SubscriptionStream(subscription))
        .filter_map(|event| match serde_json::to_string(&event) {
            Ok(json) => Some(Ok(SseEvent::default().data(json))),
            Err(err) => {
                tracing::warn!(%err, "failed to serialize event to JSON for SSE stream");
                None
            }
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    use zonehub_app::ports::EventPublisher;
    use zonehub_domain::event::ZoneEvent;
    use zonehub_domain::id::ZoneId;

    use crate::api::testing;

    async fn next_frame(body: &mut axum::body::Body) -> String {
        let frame = tokio::time::timeout(Duration::from_secs(1), body.frame())
            .await
            .expect("frame should arrive")
            .expect("stream should not end")
            .unwrap();
        String::from_utf8(frame.into_data().unwrap().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn should_send_snapshot_then_live_events() {
        let state = testing::state();
        state.organiser.new_zone("kitchen");

        let response = testing::send(&state, "GET", "/api/events/stream", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.event_bus.subscriber_count(), 1);
        let mut body = response.into_body();

        let created = next_frame(&mut body).await;
        assert!(created.starts_with("data: "));
        assert!(created.contains(r#""type":"created""#));
        let updated = next_frame(&mut body).await;
        assert!(updated.contains(r#""type":"updated""#));

        state.event_bus.publish(
            ZoneEvent::Destroyed {
                identifier: ZoneId::new(1),
            }
            .into(),
        );
        let live = next_frame(&mut body).await;
        assert!(live.contains(r#""type":"destroyed""#));
    }

    #[tokio::test]
    async fn should_unsubscribe_when_client_disconnects() {
        let state = testing::state();

        let response = testing::send(&state, "GET", "/api/events/stream", None).await;
        assert_eq!(state.event_bus.subscriber_count(), 1);

        drop(response);
        assert_eq!(state.event_bus.subscriber_count(), 0);
    }
}
