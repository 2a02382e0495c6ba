use std::sync::Arc;

use axum::{Form, extract::State, response::Html};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use metrics::counter;
use serde::Deserialize;
use tracing::{error, info};

use crate::{
    database::{self, VoteRecord},
    error::AppError,
    identity::{VOTER_COOKIE, resolve_voter_id},
    page::render_index,
    state::AppState,
};

#[derive(Deserialize)]
pub struct VoteForm {
    vote: Option<String>,
}

pub async fn index_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Html<String>) {
    let voter_id = resolve_voter_id(&jar);

    respond(&state, jar, voter_id, None)
}

/// Accepts a ballot and hands it to the queue best-effort. A queue outage
/// drops the vote without failing the request; only a missing form field is
/// the client's problem.
pub async fn vote_handler(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<VoteForm>,
) -> Result<(CookieJar, Html<String>), AppError> {
    let voter_id = resolve_voter_id(&jar);
    let vote = form.vote.ok_or(AppError::MissingVote)?;

    let mut recorded = None;
    if let Some(mut connection) = database::connect(&state.redis_client).await {
        info!("Received vote for {vote}");
        counter!("votes_received_total").increment(1);

        let record = VoteRecord {
            voter_id: voter_id.clone(),
            vote: vote.clone(),
        };

        if let Err(e) = database::push_vote(&mut connection, &record).await {
            error!("Error saving vote: {e}");
            counter!("vote_queue_failures_total").increment(1);
        }

        recorded = Some(vote);
    }

    Ok(respond(&state, jar, voter_id, recorded))
}

fn respond(
    state: &AppState,
    jar: CookieJar,
    voter_id: String,
    vote: Option<String>,
) -> (CookieJar, Html<String>) {
    let body = render_index(&state.config, vote.as_deref());

    // Re-set the cookie even when it came in unchanged.
    let cookie = Cookie::build((VOTER_COOKIE, voter_id)).path("/").build();

    (jar.add(cookie), Html(body))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{app, config::Config};

    const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

    /// State pointing at a port nothing listens on, so every queue
    /// connection attempt fails fast.
    fn unreachable_queue_state() -> Arc<AppState> {
        AppState::with_config(Config {
            port: 0,
            redis_url: "redis://127.0.0.1:1".to_string(),
            option_a: "Cats".to_string(),
            option_b: "Dogs".to_string(),
            hostname: "test-host".to_string(),
        })
    }

    fn cookie_value(response: &axum::response::Response) -> String {
        let header = response
            .headers()
            .get(header::SET_COOKIE)
            .expect("voter cookie missing")
            .to_str()
            .unwrap();

        let pair = header.split(';').next().unwrap();
        let (name, value) = pair.split_once('=').unwrap();
        assert_eq!(name, VOTER_COOKIE);

        value.to_string()
    }

    #[tokio::test]
    async fn get_sets_a_fresh_hex_identity() {
        let response = app(unreachable_queue_state())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let id = cookie_value(&response);
        assert!(u64::from_str_radix(&id, 16).is_ok());
    }

    #[tokio::test]
    async fn existing_identity_is_echoed_unchanged() {
        let request = Request::builder()
            .uri("/")
            .header(header::COOKIE, "voter_id=deadbeef")
            .body(Body::empty())
            .unwrap();

        let response = app(unreachable_queue_state())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(cookie_value(&response), "deadbeef");
    }

    #[tokio::test]
    async fn post_with_queue_down_still_renders() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::from("vote=Giraffes"))
            .unwrap();

        let response = app(unreachable_queue_state())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(u64::from_str_radix(&cookie_value(&response), 16).is_ok());

        // No queue connection, so the page must not claim the vote was taken.
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(!body.contains("Giraffes"));
        assert!(body.contains("Cats"));
    }

    #[tokio::test]
    async fn post_without_vote_field_is_a_client_error() {
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Body::empty())
            .unwrap();

        let response = app(unreachable_queue_state())
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_renders_both_options() {
        let response = app(unreachable_queue_state())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.contains("Cats"));
        assert!(body.contains("Dogs"));
        assert!(body.contains("test-host"));
    }
}
