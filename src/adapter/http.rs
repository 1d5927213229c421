use axum::{
    Router,
    extract::State,
    http::header,
    response::IntoResponse
};
use tower_http::trace::TraceLayer;

use crate::domain::ReadingStore;

/// Router that answers every request, whatever the method or path, with the
/// latest reading.
///
/// The browser dashboard is served from elsewhere, hence the wildcard origin.
pub fn responder(store: ReadingStore) -> Router {
    Router::new().fallback(latest_reading).layer(TraceLayer::new_for_http()).with_state(store)
}

async fn latest_reading(State(store): State<ReadingStore>) -> impl IntoResponse {
    let reading = store.get();
    (
        [(header::CONTENT_TYPE, "text/plain"), (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        reading.as_str().to_owned()
    )
}
