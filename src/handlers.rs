use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::{models::User, state::AppState};

pub const COLLECTION_PATH: &str = "/users";

/// Shape of a request path under the user collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserPath {
    Collection,
    Instance(i64),
}

impl UserPath {
    /// Matches `/users`, or `/users/` followed by a run of digits. Anything after the
    /// digits is ignored, so `/users/5/` and `/users/5/orders` both address user 5.
    pub fn parse(path: &str) -> Option<Self> {
        let rest = path.strip_prefix(COLLECTION_PATH)?;
        if rest.is_empty() {
            return Some(Self::Collection);
        }

        let rest = rest.strip_prefix('/')?;
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if end == 0 {
            return None;
        }
        rest[..end].parse().ok().map(Self::Instance)
    }
}

pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let Ok(path) = urlencoding::decode(uri.path()) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match UserPath::parse(&path) {
        Some(UserPath::Collection) => match method {
            Method::GET => list_users(&state).await,
            Method::POST => create_user(&state, &body).await,
            _ => StatusCode::NOT_IMPLEMENTED.into_response(),
        },
        Some(UserPath::Instance(id)) => match method {
            Method::GET => get_user(&state, id).await,
            Method::PUT => update_user(&state, id, &body).await,
            Method::DELETE => delete_user(&state, id).await,
            _ => StatusCode::NOT_IMPLEMENTED.into_response(),
        },
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

fn parse_user(body: &[u8]) -> Result<User, Response> {
    serde_json::from_slice(body).map_err(|err| {
        tracing::debug!(error = %err, "Rejected user payload");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Could not parse User object",
        )
            .into_response()
    })
}

async fn list_users(state: &AppState) -> Response {
    state.telemetry.track_event("List of clients requested.");

    match state.store.get_users().await {
        Ok(users) => Json(users).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to list users");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn get_user(state: &AppState, id: i64) -> Response {
    match state.store.get_user_by_id(id).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => {
            tracing::warn!(user_id = id, error = %err, "Failed to fetch user");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn create_user(state: &AppState, body: &[u8]) -> Response {
    let user = match parse_user(body) {
        Ok(user) => user,
        Err(response) => return response,
    };
    state.telemetry.track_event(&format!(
        "Adding new client: {} {}",
        user.first_name, user.last_name
    ));

    match state.store.add_user(user).await {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "Failed to add user");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn update_user(state: &AppState, id: i64, body: &[u8]) -> Response {
    let user = match parse_user(body) {
        Ok(user) => user,
        Err(response) => return response,
    };
    state.telemetry.track_event(&format!(
        "Client: {} {} is being updated.",
        user.first_name, user.last_name
    ));

    if user.id != id {
        return (
            StatusCode::BAD_REQUEST,
            "ID of submitted user must match ID in URL",
        )
            .into_response();
    }

    match state.store.update_user(user).await {
        Ok(_) => StatusCode::OK.into_response(),
        Err(err) => {
            tracing::warn!(user_id = id, error = %err, "Failed to update user");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

async fn delete_user(state: &AppState, id: i64) -> Response {
    state.telemetry.track_event(&format!(
        "Client with the following Id is being removed: {id}"
    ));

    match state.store.remove_user_by_id(id).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => {
            tracing::warn!(user_id = id, error = %err, "Failed to remove user");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_collection_path() {
        assert_eq!(UserPath::parse("/users"), Some(UserPath::Collection));
    }

    #[test]
    fn instance_path_with_and_without_trailing_slash() {
        assert_eq!(UserPath::parse("/users/5"), Some(UserPath::Instance(5)));
        assert_eq!(UserPath::parse("/users/5/"), Some(UserPath::Instance(5)));
        assert_eq!(UserPath::parse("/users/007"), Some(UserPath::Instance(7)));
    }

    #[test]
    fn parsed_id_matches_digits() {
        for n in [0_i64, 1, 42, 1_000_000, i64::from(u32::MAX), i64::MAX] {
            let path = format!("/users/{n}");
            let Some(UserPath::Instance(id)) = UserPath::parse(&path) else {
                panic!("{path} did not match");
            };
            assert_eq!(id, n);
            assert_eq!(id.to_string(), n.to_string());
        }
    }

    #[test]
    fn ignores_anything_after_the_digits() {
        for path in ["/users/5abc", "/users/5/orders", "/users/5//", "/users/5?"] {
            assert_eq!(UserPath::parse(path), Some(UserPath::Instance(5)), "{path}");
        }
    }

    #[test]
    fn rejects_other_shapes() {
        for path in [
            "/",
            "/users/",
            "/users//",
            "/users//5",
            "/users/abc",
            "/users/abc5",
            "/users/-1",
            "/users/+1",
            "/usersx",
            "/users5",
            "/unrelated/path",
            "/users/99999999999999999999",
        ] {
            assert_eq!(UserPath::parse(path), None, "{path}");
        }
    }
}
