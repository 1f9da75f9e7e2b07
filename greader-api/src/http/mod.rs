//! HTTP endpoints for greader-api.
//!
//! The whole API is a single fallback handler: clients mount it under
//! arbitrary prefixes and send paths that no route pattern would match,
//! so the path is split and inspected positionally instead.

pub mod diagnostics;
pub mod params;
pub mod routes;

use crate::auth::{self, Session};
use crate::error::{ApiError, ApiResult};
use crate::mutation::{self, SubscriptionEdit};
use crate::query;
use crate::server::ReaderApi;
use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json, Router};
use diagnostics::RequestSummary;
use greader_core::{StreamHint, StreamSpec};
use std::sync::Arc;

pub use params::{Params, RequestParams};
pub use routes::{match_route, Endpoint, Route};

/// Path prefixes discarded before routing.
const DISCARDED_PREFIXES: [&str; 2] = ["/api", "/greader.php"];

/// Build the HTTP router with all endpoints.
pub fn build_router(api: Arc<ReaderApi>) -> Router {
    Router::new().fallback(dispatch).layer(Extension(api))
}

async fn dispatch(
    Extension(api): Extension<Arc<ReaderApi>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request = RequestSummary {
        method: &method,
        path: uri.path(),
        query: uri.query(),
        headers: &headers,
        body: &body,
    };

    let mut response = match handle(&api, &request).await {
        Ok(response) => response,
        Err(err) => {
            diagnostics::log_error(&err, &request);
            err.into_response()
        }
    };
    add_cors_headers(response.headers_mut());
    response
}

fn add_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Authorization"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_MAX_AGE,
        HeaderValue::from_static("600"),
    );
}

fn text(body: impl Into<String>) -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=UTF-8")],
        body.into(),
    )
        .into_response()
}

fn strip_prefixes(mut path: &str) -> &str {
    for prefix in DISCARDED_PREFIXES {
        if let Some(rest) = path.strip_prefix(prefix) {
            path = rest;
        }
    }
    path
}

/// Split a path into percent-decoded segments, dropping the leading one.
fn split_path(path: &str) -> ApiResult<Vec<String>> {
    path.split('/')
        .skip(1)
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|decoded| decoded.into_owned())
                .map_err(|_| ApiError::bad_request("path is not UTF-8"))
        })
        .collect()
}

async fn handle(api: &ReaderApi, request: &RequestSummary<'_>) -> ApiResult<Response> {
    if request.method == Method::OPTIONS {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let path = strip_prefixes(request.path);
    let query = request.query.filter(|q| !q.is_empty());
    if matches!(path, "" | "/") && query.is_none() {
        return Ok(text("OK"));
    }

    let segments = split_path(path)?;
    if segments.len() < 2 {
        return Err(ApiError::bad_request("path too short"));
    }
    if !api.config().api.enabled {
        return Err(ApiError::ServiceUnavailable);
    }

    let route = match_route(&segments);
    if matches!(route, Some(Route { endpoint: Endpoint::CheckCompatibility, .. })) {
        return Ok(check_compatibility(request.headers));
    }

    let session = if segments[0] == "accounts" {
        None
    } else {
        auth::authenticate(api, request.headers)?
    };

    let Some(route) = route else {
        if routes::is_reader_path(&segments) && session.is_none() {
            return Err(ApiError::unauthorized("no session"));
        }
        return Err(ApiError::bad_request("unknown route"));
    };

    let params = RequestParams::new(query, request.body);

    if !route.endpoint.requires_session() {
        return client_login(api, &params);
    }
    let Some(session) = session else {
        return Err(ApiError::unauthorized("no session"));
    };
    if route.endpoint.requires_post() && request.method != Method::POST {
        return Err(ApiError::bad_request(format!(
            "{:?} requires POST",
            route.endpoint
        )));
    }
    if route.endpoint.requires_action_token() {
        let token = params.form().get("T").unwrap_or_default();
        auth::check_action_token(api, &session, token)?;
    }

    tracing::debug!("{:?} for user {}", route.endpoint, session.username());
    reader_endpoint(api, &session, route, &params).await
}

fn check_compatibility(headers: &HeaderMap) -> Response {
    if auth::header_credential(headers).is_some() {
        text("PASS")
    } else {
        text("FAIL get HTTP Authorization header! Wrong Web server configuration.")
    }
}

fn client_login(api: &ReaderApi, params: &RequestParams) -> ApiResult<Response> {
    match (params.request("Email"), params.request("Passwd")) {
        (Some(email), Some(password)) => Ok(text(auth::client_login(api, email, password)?)),
        _ => Err(ApiError::bad_request("ClientLogin needs Email and Passwd")),
    }
}

fn require_json_output(params: &RequestParams) -> ApiResult<()> {
    match params.query().get("output") {
        Some("json") => Ok(()),
        other => Err(ApiError::NotImplemented(format!("output={other:?}"))),
    }
}

async fn reader_endpoint(
    api: &ReaderApi,
    session: &Session,
    route: Route<'_>,
    params: &RequestParams,
) -> ApiResult<Response> {
    let form = params.form();

    let response = match route.endpoint {
        Endpoint::StreamContents => {
            let spec = contents_stream(route.tail, params, session)?;
            Json(query::stream_contents(api, &spec, &params.listing()).await?).into_response()
        }
        Endpoint::StreamItemIds => {
            let stream = params
                .query()
                .get("s")
                .ok_or_else(|| ApiError::bad_request("stream/items/ids needs s"))?;
            let newsplus = params.query().get("client") == Some("newsplus");
            Json(query::item_ids(api, session, stream, &params.listing(), newsplus).await?)
                .into_response()
        }
        Endpoint::StreamItemContents => {
            if !form.contains("i") {
                return Err(ApiError::bad_request("stream/items/contents needs i"));
            }
            let order = params.listing().order;
            Json(query::items_by_ids(api, &form.all("i"), order).await?).into_response()
        }
        Endpoint::TagList => {
            require_json_output(params)?;
            Json(query::tag_list(api).await?).into_response()
        }
        Endpoint::SubscriptionList => {
            require_json_output(params)?;
            Json(query::subscription_list(api).await?).into_response()
        }
        Endpoint::UnreadCount => {
            require_json_output(params)?;
            Json(query::unread_counts(api).await?).into_response()
        }
        Endpoint::SubscriptionEdit => {
            let action = match (params.request("s"), params.request("ac")) {
                (Some(_), Some(action)) => action,
                _ => return Err(ApiError::bad_request("subscription/edit needs s and ac")),
            };
            let edit = SubscriptionEdit {
                streams: params.repeated_with_query_fallback("s"),
                titles: params.repeated_with_query_fallback("t"),
                action: action.to_string(),
                add: params.request("a").unwrap_or_default().to_string(),
                remove: params.request("r").unwrap_or_default().to_string(),
            };
            mutation::subscription_edit(api, session, &edit).await?;
            text("OK")
        }
        Endpoint::SubscriptionQuickadd => {
            let url = params
                .request("quickadd")
                .ok_or_else(|| ApiError::bad_request("quickadd needs quickadd"))?;
            Json(mutation::quickadd(api, url).await).into_response()
        }
        Endpoint::EditTag => {
            mutation::edit_tag(
                api,
                session,
                &form.all("i"),
                form.get("a").unwrap_or_default(),
                form.get("r").unwrap_or_default(),
            )
            .await?;
            text("OK")
        }
        Endpoint::RenameTag => {
            mutation::rename_tag(
                api,
                form.get("s").unwrap_or_default(),
                form.get("dest").unwrap_or_default(),
            )
            .await?;
            text("OK")
        }
        Endpoint::DisableTag => {
            mutation::disable_tag(api, &form.all("s")).await?;
            text("OK")
        }
        Endpoint::MarkAllAsRead => {
            mutation::mark_all_as_read(api, form.get("s").unwrap_or_default(), form.get("ts"))
                .await?;
            text("OK")
        }
        Endpoint::Token => text(format!("{}\n", auth::action_token(api, session)?)),
        Endpoint::UserInfo => Json(query::user_info(session)).into_response(),
        Endpoint::ClientLogin | Endpoint::CheckCompatibility => {
            return Err(ApiError::bad_request("not a reader endpoint"));
        }
    };
    Ok(response)
}

/// Classify the stream named by the `stream/contents` path tail.
///
/// Without a tail, `s` may carry the whole stream id instead. Feed URLs
/// and label names are re-joined so unencoded slashes survive.
fn contents_stream(
    tail: &[String],
    params: &RequestParams,
    session: &Session,
) -> ApiResult<StreamSpec> {
    let from_query: Vec<String>;
    let tail = match params.query().get("s") {
        Some(stream) if tail.is_empty() => {
            from_query = stream.split('/').map(str::to_string).collect();
            from_query.as_slice()
        }
        _ => tail,
    };

    if tail.len() < 2 {
        return Ok(StreamSpec::AllItems);
    }

    let names: Vec<&str> = tail.iter().map(String::as_str).collect();
    let username = Some(session.username());
    let spec = match names.as_slice() {
        ["feed", rest @ ..] => StreamSpec::classify(&rest.join("/"), StreamHint::Feed, username),
        ["user", _, "state", "com.google", "reading-list", ..] => StreamSpec::AllItems,
        ["user", _, "state", "com.google", "starred", ..] => StreamSpec::Starred,
        ["user", _, "label", rest @ ..] if !rest.is_empty() => {
            StreamSpec::classify(&rest.join("/"), StreamHint::Label, username)
        }
        _ => return Err(ApiError::bad_request("unknown stream")),
    };
    Ok(spec)
}
