//! Server-Sent-Events stream of book activity
//!
//! The book's hooks run synchronously on the matching context, so they do
//! nothing but push a clone onto a broadcast channel; this module turns a
//! subscription on that channel into an SSE response. Every new stream
//! starts with a `snapshot` frame so a browser can render the book before
//! the first live event arrives.

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use book::{BookEvent, OrderBook};
use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;
use std::convert::Infallible;
use tokio::sync::broadcast;
use tracing::warn;

use super::handlers::AppState;

/// Wire the book's hooks into the SSE broadcast channel
///
/// Send failures mean nobody is listening and are deliberately ignored;
/// a slow browser must never stall matching.
pub fn wire_book_events(book: &mut OrderBook, events: &broadcast::Sender<BookEvent>) {
    let sender = events.clone();
    book.set_on_trade(move |trade| {
        let _ = sender.send(BookEvent::Trade {
            trade: trade.clone(),
        });
    });

    let sender = events.clone();
    book.set_on_order_added(move |order| {
        let _ = sender.send(BookEvent::OrderAdded {
            order: order.clone(),
        });
    });

    let sender = events.clone();
    book.set_on_order_removed(move |order| {
        let _ = sender.send(BookEvent::OrderRemoved {
            order: order.clone(),
        });
    });
}

/// GET /events: snapshot frame, then one frame per hook invocation
pub async fn events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let snapshot = {
        let node = state.node.lock().await;
        node.snapshot()
    };
    let receiver = state.events.subscribe();

    let initial = stream::iter(
        frame("snapshot", &snapshot)
            .into_iter()
            .map(Ok::<_, Infallible>),
    );

    let updates = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Some(frame) = frame(event.kind(), &event) {
                        return Some((Ok(frame), receiver));
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "SSE subscriber lagged; events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(initial.chain(updates)).keep_alive(KeepAlive::default())
}

fn frame<T: Serialize>(name: &str, value: &T) -> Option<Event> {
    serde_json::to_string(value)
        .ok()
        .map(|data| Event::default().event(name).data(data))
}
