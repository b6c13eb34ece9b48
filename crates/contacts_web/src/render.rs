//! Turns handler outcomes into HTTP responses.
//!
//! Pages are rendered as JSON view models with the request's flash merged in.
//! Redirect flashes are parked in the session store for the next request.

use crate::session::{SessionId, SessionStore};
use axum::http::header::{LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contacts_core::{Flash, Outcome, Page, RequestContext};
use serde::Serialize;

#[derive(Serialize)]
struct PageBody {
    #[serde(flatten)]
    page: Page,
    flash: Flash,
}

pub fn render(
    sessions: &SessionStore,
    session: Option<SessionId>,
    outcome: Outcome,
    mut ctx: RequestContext,
) -> Response {
    let flash = ctx.take_flash();
    match outcome {
        Outcome::Render(page) => (StatusCode::OK, Json(PageBody { page, flash })).into_response(),
        Outcome::Redirect(location) => {
            if flash.is_empty() {
                return (StatusCode::SEE_OTHER, [(LOCATION, location)]).into_response();
            }

            let session = session.unwrap_or_else(SessionId::generate);
            sessions.put(session, flash);
            (
                StatusCode::SEE_OTHER,
                [(LOCATION, location), (SET_COOKIE, session.cookie())],
            )
                .into_response()
        }
    }
}
