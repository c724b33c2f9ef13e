use contrib_core::{ContributionSummary, Profile, Result, SyncError};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::authorizer::{ApiRequest, ApiResponse, Authorizer, PROVIDER};

const ACCEPT: &str = "application/vnd.github.v3+json";

/// Used when an error payload carries no message.
pub const QUERY_FALLBACK_MESSAGE: &str = "GraphQL query failed";

/// Contribution calendar query. The field selection is what
/// [`ContributionSummary`] deserializes; keep them in step.
pub const GRAPHQL_QUERY: &str = "query($username: String!, $from: DateTime!, $to: DateTime!) {
  user(login: $username) {
    contributionsCollection(from: $from, to: $to) {
      totalCommitContributions
      totalIssueContributions
      totalPullRequestContributions
      totalPullRequestReviewContributions
      contributionCalendar {
        totalContributions
        weeks { contributionDays { contributionCount date weekday } }
        months { name firstDay totalWeeks }
      }
    }
  }
}";

/// Inclusive UTC bounds of `year` in the form the query expects.
pub fn date_range(year: i32) -> (String, String) {
    (
        format!("{year}-01-01T00:00:00Z"),
        format!("{year}-12-31T23:59:59Z"),
    )
}

fn check_transport(response: &ApiResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    let detail = match &response.error {
        Some(e) if !e.is_empty() => e.clone(),
        _ => response.status.to_string(),
    };
    Err(SyncError::Transport(format!("GitHub API error: {detail}")))
}

/// `GET /user`.
pub async fn fetch_profile<A: Authorizer + ?Sized>(auth: &A) -> Result<Profile> {
    debug!(target: "contrib::github", "fetching profile");
    let response = auth
        .request(PROVIDER, "/user", ApiRequest::get().header("Accept", ACCEPT))
        .await?;
    check_transport(&response)?;
    serde_json::from_value(response.data)
        .map_err(|e| SyncError::Transport(format!("GitHub API error: unexpected profile payload: {e}")))
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    errors: Vec<GraphQlError>,
    data: Option<GraphQlData>,
}

#[derive(Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct GraphQlData {
    user: Option<UserNode>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserNode {
    contributions_collection: ContributionSummary,
}

/// `POST /graphql` for `login`'s calendar in `year`.
pub async fn fetch_contributions<A: Authorizer + ?Sized>(
    auth: &A,
    login: &str,
    year: i32,
) -> Result<ContributionSummary> {
    let (from, to) = date_range(year);
    debug!(target: "contrib::github", login, year, "fetching contributions");
    let body = json!({
        "query": GRAPHQL_QUERY,
        "variables": { "username": login, "from": from, "to": to },
    });
    let response = auth
        .request(
            PROVIDER,
            "/graphql",
            ApiRequest::post_json(body).header("Accept", ACCEPT),
        )
        .await?;
    check_transport(&response)?;

    let parsed: GraphQlResponse = serde_json::from_value(response.data)
        .map_err(|e| SyncError::Query(format!("malformed GraphQL response: {e}")))?;
    if let Some(first) = parsed.errors.into_iter().next() {
        let message = first
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| QUERY_FALLBACK_MESSAGE.to_string());
        return Err(SyncError::Query(message));
    }
    parsed
        .data
        .and_then(|d| d.user)
        .map(|u| u.contributions_collection)
        .ok_or_else(|| SyncError::Query(QUERY_FALLBACK_MESSAGE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockAuthorizer;
    use crate::Method;

    fn calendar_payload() -> serde_json::Value {
        json!({
            "data": { "user": { "contributionsCollection": {
                "totalCommitContributions": 5,
                "totalIssueContributions": 1,
                "totalPullRequestContributions": 2,
                "totalPullRequestReviewContributions": 0,
                "contributionCalendar": {
                    "totalContributions": 8,
                    "weeks": [{ "contributionDays": [
                        { "contributionCount": 8, "date": "2024-01-01", "weekday": 1 }
                    ]}],
                    "months": [{ "name": "Jan", "firstDay": "2024-01-01", "totalWeeks": 5 }]
                }
            }}}
        })
    }

    #[test]
    fn date_range_covers_year() {
        assert_eq!(
            date_range(2024),
            ("2024-01-01T00:00:00Z".to_string(), "2024-12-31T23:59:59Z".to_string())
        );
    }

    #[test]
    fn query_selects_calendar_fields() {
        for field in [
            "totalCommitContributions",
            "totalPullRequestReviewContributions",
            "contributionDays { contributionCount date weekday }",
            "months { name firstDay totalWeeks }",
        ] {
            assert!(GRAPHQL_QUERY.contains(field), "{field}");
        }
    }

    #[tokio::test]
    async fn profile_parses_login() {
        let auth = MockAuthorizer::connected();
        auth.push_response("/user", ApiResponse::ok(json!({"login": "octo", "avatar_url": "a"})));
        let profile = fetch_profile(&auth).await.unwrap();
        assert_eq!(profile.login, "octo");
        let calls = auth.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].path, "/user");
        assert_eq!(calls[0].request.method, Method::Get);
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let auth = MockAuthorizer::connected();
        auth.push_response("/user", ApiResponse::status(502));
        let err = fetch_profile(&auth).await.unwrap_err();
        assert_eq!(err, SyncError::Transport("GitHub API error: 502".into()));
    }

    #[tokio::test]
    async fn transport_error_text_wins_over_status() {
        let auth = MockAuthorizer::connected();
        auth.push_response("/graphql", ApiResponse::failed("connection reset"));
        let err = fetch_contributions(&auth, "octo", 2024).await.unwrap_err();
        assert_eq!(err.user_message(), "GitHub API error: connection reset");
    }

    #[tokio::test]
    async fn contributions_post_variables() {
        let auth = MockAuthorizer::connected();
        auth.push_response("/graphql", ApiResponse::ok(calendar_payload()));
        let summary = fetch_contributions(&auth, "octo", 2024).await.unwrap();
        assert_eq!(summary.total_commit_contributions, 5);
        assert_eq!(summary.calendar.weeks[0].days[0].count, 8);

        let call = &auth.calls()[0];
        assert_eq!(call.request.method, Method::Post);
        let body = call.request.body.as_ref().unwrap();
        assert_eq!(body["variables"]["username"], "octo");
        assert_eq!(body["variables"]["from"], "2024-01-01T00:00:00Z");
        assert_eq!(body["variables"]["to"], "2024-12-31T23:59:59Z");
    }

    #[tokio::test]
    async fn graphql_error_uses_first_message() {
        let auth = MockAuthorizer::connected();
        auth.push_response(
            "/graphql",
            ApiResponse::ok(json!({
                "data": null,
                "errors": [{"message": "Could not resolve to a User"}, {"message": "second"}]
            })),
        );
        let err = fetch_contributions(&auth, "ghost", 2024).await.unwrap_err();
        assert_eq!(err, SyncError::Query("Could not resolve to a User".into()));
    }

    #[tokio::test]
    async fn graphql_error_without_message_falls_back() {
        let auth = MockAuthorizer::connected();
        auth.push_response("/graphql", ApiResponse::ok(json!({"errors": [{}]})));
        let err = fetch_contributions(&auth, "ghost", 2024).await.unwrap_err();
        assert_eq!(err.user_message(), QUERY_FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn missing_user_is_query_error() {
        let auth = MockAuthorizer::connected();
        auth.push_response("/graphql", ApiResponse::ok(json!({"data": {"user": null}})));
        let err = fetch_contributions(&auth, "ghost", 2024).await.unwrap_err();
        assert_eq!(err.kind(), "query");
    }
}
