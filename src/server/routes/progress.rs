//! SSE progress endpoint
//!
//! Each event carries the full serialized task record, so a client that
//! connects late still gets a complete snapshot on the first event. The
//! stream closes itself after a terminal record.

use std::convert::Infallible;

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use futures::StreamExt;
use uuid::Uuid;

use crate::server::ServerState;
use crate::task::TaskRecord;

pub async fn progress(
    State(state): State<ServerState>,
    Path(task_id): Path<Uuid>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = state
        .coordinator
        .subscribe(task_id)
        .map(|record: TaskRecord| {
            let payload =
                serde_json::to_string(&record).unwrap_or_else(|_| "{}".to_string());
            Ok(Event::default().data(payload))
        });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
