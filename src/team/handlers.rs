use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{debug, info, instrument, warn};

use crate::{
    auth::CurrentUser,
    error::ApiError,
    extract::ApiJson,
    state::AppState,
    team::{
        dto::{StatusUpdateRequest, TeamMember},
        extractors::StatusFilter,
    },
};

pub fn team_routes() -> Router<AppState> {
    Router::new()
        .route("/team", get(list_team))
        .route("/me/status", patch(update_my_status))
}

/// GET /team?status=<code>...
#[instrument(skip_all)]
pub async fn list_team(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    StatusFilter(filter): StatusFilter,
) -> Result<Json<Vec<TeamMember>>, ApiError> {
    let users = state.users.list(filter.as_deref()).await?;
    debug!(caller = caller.id, filter = ?filter, count = users.len(), "team listed");
    Ok(Json(users.into_iter().map(TeamMember::from).collect()))
}

/// PATCH /me/status. Only ever touches the caller's own row.
#[instrument(skip_all)]
pub async fn update_my_status(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    ApiJson(body): ApiJson<StatusUpdateRequest>,
) -> Result<Json<TeamMember>, ApiError> {
    // never move updated_at backwards, even if the clock does
    let at = OffsetDateTime::now_utc().max(caller.updated_at);

    let Some(updated) = state.users.update_status(caller.id, body.status, at).await? else {
        warn!(user_id = caller.id, "caller row vanished before status update");
        return Err(ApiError::Unauthenticated);
    };

    info!(user_id = updated.id, status = %updated.status, "status updated");
    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::build_app;
    use crate::auth::jwt::JwtKeys;
    use crate::test_support::{call, seeded};
    use crate::users::Status;
    use axum::{
        extract::FromRef,
        http::{Method, StatusCode},
    };
    use serde_json::{json, Value};
    use time::format_description::well_known::Rfc3339;

    const TEAM: &[(&str, &str, Status)] = &[
        ("samc", "Sam Cooke", Status::Working),
        ("afranklin", "Aretha Franklin", Status::WorkingRemotely),
        ("kingluther", "Luther Vandross", Status::OnVacation),
        ("gknight", "Gladys Knight", Status::BusinessTrip),
        ("otis", "Otis Redding", Status::Working),
    ];

    async fn setup() -> (Router, String) {
        let (state, _) = seeded(TEAM).await;
        let token = JwtKeys::from_ref(&state).sign("samc").unwrap();
        (build_app(state), token)
    }

    fn labels(body: &Value) -> Vec<&str> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|m| m["status"].as_str().unwrap())
            .collect()
    }

    fn names(body: &Value) -> Vec<&str> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|m| m["full_name"].as_str().unwrap())
            .collect()
    }

    fn updated_at(member: &Value) -> OffsetDateTime {
        OffsetDateTime::parse(member["updated_at"].as_str().unwrap(), &Rfc3339).unwrap()
    }

    #[tokio::test]
    async fn unfiltered_listing_returns_everyone_by_name() {
        let (app, token) = setup().await;
        let (status, body) = call(&app, Method::GET, "/team", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            names(&body),
            [
                "Aretha Franklin",
                "Gladys Knight",
                "Luther Vandross",
                "Otis Redding",
                "Sam Cooke"
            ]
        );
        for member in body.as_array().unwrap() {
            let obj = member.as_object().unwrap();
            let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            keys.sort_unstable();
            assert_eq!(keys, ["full_name", "id", "status", "updated_at"]);
        }
    }

    #[tokio::test]
    async fn filtered_listing_only_returns_requested_statuses() {
        let (app, token) = setup().await;

        let (status, body) = call(&app, Method::GET, "/team?status=0", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(names(&body), ["Otis Redding", "Sam Cooke"]);
        assert!(labels(&body).iter().all(|l| *l == "Working"));

        let (_, body) = call(&app, Method::GET, "/team?status=0&status=2", Some(&token), None).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert!(labels(&body)
            .iter()
            .all(|l| ["Working", "On Vacation"].contains(l)));

        let (_, body) = call(
            &app,
            Method::GET,
            "/team?status=0&status=1&status=2&status=3",
            Some(&token),
            None,
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), TEAM.len());
    }

    #[tokio::test]
    async fn filter_without_matches_is_empty_list() {
        let (state, _) = seeded(&[("samc", "Sam Cooke", Status::Working)]).await;
        let token = JwtKeys::from_ref(&state).sign("samc").unwrap();
        let app = build_app(state);
        let (status, body) = call(&app, Method::GET, "/team?status=3", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn invalid_filter_is_422() {
        let (app, token) = setup().await;
        let (status, body) = call(&app, Method::GET, "/team?status=99", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("status"));
    }

    #[tokio::test]
    async fn protected_routes_reject_missing_or_bad_tokens_first() {
        let (app, _) = setup().await;

        for token in [None, Some("invalidtoken123")] {
            let (status, body) = call(&app, Method::GET, "/team", token, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({"detail": "Could not validate credentials"}));

            // auth wins over query validation
            let (status, _) = call(&app, Method::GET, "/team?status=99", token, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);

            // and over body validation, whatever the body
            for payload in [json!({"status": 0}), json!({"status": 99}), json!({})] {
                let (status, _) =
                    call(&app, Method::PATCH, "/me/status", token, Some(payload)).await;
                assert_eq!(status, StatusCode::UNAUTHORIZED);
            }
        }
    }

    #[tokio::test]
    async fn expired_or_foreign_tokens_are_rejected_by_the_routes() {
        let (state, _) = seeded(TEAM).await;

        let mut expired = JwtKeys::from_ref(&state);
        expired.ttl = std::time::Duration::ZERO;
        let expired = expired.sign("samc").unwrap();

        let mut foreign = state.config.jwt.clone();
        foreign.secret = "some-other-secret".into();
        let foreign = JwtKeys::from_config(&foreign).sign("samc").unwrap();

        let valid = JwtKeys::from_ref(&state).sign("samc").unwrap();
        let app = build_app(state);
        for token in [expired, foreign] {
            let (status, body) = call(&app, Method::GET, "/team", Some(&token), None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({"detail": "Could not validate credentials"}));

            let (status, _) = call(
                &app,
                Method::PATCH,
                "/me/status",
                Some(&token),
                Some(json!({"status": 1})),
            )
            .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }

        // the rejected updates changed nothing
        let (_, team) = call(&app, Method::GET, "/team?status=0", Some(&valid), None).await;
        assert!(names(&team).contains(&"Sam Cooke"));
    }

    #[tokio::test]
    async fn each_status_round_trips_through_listing() {
        let (app, token) = setup().await;
        let mut last = None;

        for (code, label) in [
            (0, "Working"),
            (1, "Working Remotely"),
            (2, "On Vacation"),
            (3, "Business Trip"),
        ] {
            let (status, me) = call(
                &app,
                Method::PATCH,
                "/me/status",
                Some(&token),
                Some(json!({ "status": code })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(me["status"], label);
            assert_eq!(me["full_name"], "Sam Cooke");

            let (_, team) = call(&app, Method::GET, "/team", Some(&token), None).await;
            let listed = team
                .as_array()
                .unwrap()
                .iter()
                .find(|m| m["full_name"] == "Sam Cooke")
                .unwrap();
            assert_eq!(listed["status"], label);
            assert_eq!(listed["id"], me["id"]);

            let ts = updated_at(listed);
            if let Some(prev) = last {
                assert!(ts >= prev);
            }
            last = Some(ts);
        }
    }

    #[tokio::test]
    async fn repeating_an_update_is_idempotent() {
        let (app, token) = setup().await;
        let body = json!({"status": 2});

        let (_, first) = call(&app, Method::PATCH, "/me/status", Some(&token), Some(body.clone())).await;
        let (_, second) = call(&app, Method::PATCH, "/me/status", Some(&token), Some(body)).await;
        assert_eq!(first["status"], "On Vacation");
        assert_eq!(second["status"], first["status"]);
        assert_eq!(second["id"], first["id"]);
        assert!(updated_at(&second) >= updated_at(&first));

        let (_, team) = call(&app, Method::GET, "/team?status=2", Some(&token), None).await;
        assert_eq!(names(&team), ["Luther Vandross", "Sam Cooke"]);
    }

    #[tokio::test]
    async fn update_only_touches_the_caller() {
        let (app, token) = setup().await;
        call(&app, Method::PATCH, "/me/status", Some(&token), Some(json!({"status": 3}))).await;

        let (_, team) = call(&app, Method::GET, "/team", Some(&token), None).await;
        let by_name = |name: &str| {
            team.as_array()
                .unwrap()
                .iter()
                .find(|m| m["full_name"] == name)
                .unwrap()["status"]
                .clone()
        };
        assert_eq!(by_name("Sam Cooke"), "Business Trip");
        assert_eq!(by_name("Otis Redding"), "Working");
        assert_eq!(by_name("Aretha Franklin"), "Working Remotely");
    }

    #[tokio::test]
    async fn invalid_or_missing_status_is_422() {
        let (app, token) = setup().await;
        for payload in [
            json!({"status": 99}),
            json!({"status": -1}),
            json!({"status": "1"}),
            json!({"status": null}),
            json!({}),
        ] {
            let (status, body) =
                call(&app, Method::PATCH, "/me/status", Some(&token), Some(payload)).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
            assert!(body["detail"].is_string());
        }

        let (_, team) = call(&app, Method::GET, "/team?status=0", Some(&token), None).await;
        assert!(names(&team).contains(&"Sam Cooke"));
    }
}
