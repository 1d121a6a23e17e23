//! Server-Sent Events rendering for list endpoints.
//!
//! Each document becomes one event named after its kind (`post`, `project`)
//! carrying the document id and its JSON body. A final `complete` event with
//! the item count closes the stream.

use std::{convert::Infallible, time::Duration};

use axum::{
    http::{header::ACCEPT, HeaderMap},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::Stream;

use super::models::StreamComplete;
use crate::model::Document;

pub const EVENT_STREAM: &str = "text/event-stream";
pub const COMPLETE_EVENT: &str = "complete";

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

pub fn wants_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get_all(ACCEPT)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.contains(EVENT_STREAM))
}

pub fn documents_sse<D: Document>(
    docs: Vec<D>,
    delay: Duration,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    Sse::new(document_events(docs, delay))
        .keep_alive(KeepAlive::new().interval(KEEP_ALIVE_INTERVAL))
}

fn document_events<D: Document>(
    docs: Vec<D>,
    delay: Duration,
) -> impl Stream<Item = Result<Event, Infallible>> {
    async_stream::stream! {
        let mut count = 0;
        for doc in docs {
            if count > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            match Event::default().event(D::KIND).id(doc.id()).json_data(&doc) {
                Ok(event) => {
                    count += 1;
                    yield Ok(event);
                }
                Err(err) => log::error!("failed to encode {} {}: {}", D::KIND, doc.id(), err),
            }
        }

        match Event::default()
            .event(COMPLETE_EVENT)
            .json_data(StreamComplete { count })
        {
            Ok(event) => yield Ok(event),
            Err(err) => log::error!("failed to encode stream completion: {}", err),
        }
    }
}
