//! # Redis
//!
//! Vote transport.
//!
//! Ballots are serialized to compact JSON and appended to a single
//! list so downstream consumers can drain them in arrival order. Redis
//! serializes concurrent appends itself; this component makes no atomicity
//! claim of its own.
//!
//! The connection is acquired once per request with a bounded timeout and is
//! not pooled or reused across requests. A failed acquisition degrades that
//! request to a read-only page view instead of failing it.

use std::time::Duration;

use metrics::counter;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// List key the queue consumers drain.
pub const VOTES_KEY: &str = "votes";

const QUEUE_TIMEOUT: Duration = Duration::from_secs(5);

/// Ephemeral `{voter_id, vote}` pair handed to the queue per submission.
#[derive(Serialize, Debug)]
pub struct VoteRecord {
    pub voter_id: String,
    pub vote: String,
}

#[derive(Error, Debug)]
pub enum PushError {
    #[error("Failed to encode vote record: {0}")]
    Encode(#[from] serde_json::Error),

    #[error(transparent)]
    Queue(#[from] redis::RedisError),
}

/// One connection attempt per request. Failure is logged and counted, never
/// fatal for the request.
pub async fn connect(client: &Client) -> Option<MultiplexedConnection> {
    match client
        .get_multiplexed_async_connection_with_timeouts(QUEUE_TIMEOUT, QUEUE_TIMEOUT)
        .await
    {
        Ok(connection) => Some(connection),
        Err(e) => {
            error!("Queue connection failed: {e}");
            counter!("queue_connect_failures_total").increment(1);
            None
        }
    }
}

/// Append one serialized ballot to the votes list.
pub async fn push_vote(
    connection: &mut MultiplexedConnection,
    record: &VoteRecord,
) -> Result<(), PushError> {
    let payload = serde_json::to_string(record)?;
    let _: () = connection.rpush(VOTES_KEY, payload).await?;

    Ok(())
}
