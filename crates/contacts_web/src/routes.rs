//! HTTP routes for the contacts manager.
//!
//! Every handler runs its core work through [`dispatch`], which opens a fresh
//! connection for the request and drops it when the work finishes, whether
//! it succeeded or failed.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::{Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use contacts_core::db::open_db;
use contacts_core::{
    ContactId, ContactService, GroupId, GroupService, NewContact, Outcome, RequestContext,
    ServiceResult, SqliteContactRepository, SqliteGroupRepository,
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::error::WebError;
use crate::render::render;
use crate::server::AppState;
use crate::session::SessionId;

type Contacts<'conn> = ContactService<SqliteContactRepository<'conn>, SqliteGroupRepository<'conn>>;
type Groups<'conn> = GroupService<SqliteContactRepository<'conn>, SqliteGroupRepository<'conn>>;

/// Create and edit form fields.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,
}

impl ContactForm {
    fn into_fields(self) -> NewContact {
        NewContact::trimmed(&self.contact_name, &self.contact_phone, &self.contact_email)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GroupForm {
    pub group_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
}

/// Acquires a connection, runs `work`, and renders its outcome.
///
/// The flash parked by the previous redirect is loaded into the request
/// context before `work` runs, and only removed from the store once `work`
/// has succeeded.
async fn dispatch<F>(state: Arc<AppState>, headers: &HeaderMap, work: F) -> Result<Response, WebError>
where
    F: FnOnce(&Connection, &mut RequestContext) -> ServiceResult<Outcome> + Send + 'static,
{
    let session = SessionId::from_headers(headers);
    let carried = session
        .map(|id| state.sessions.peek(id))
        .unwrap_or_default();
    let db_path = state.db_path.clone();

    let (outcome, ctx) = tokio::task::spawn_blocking(move || -> Result<_, WebError> {
        let conn = open_db(&db_path)?;
        let mut ctx = RequestContext::with_flash(carried);
        let outcome = work(&conn, &mut ctx)?;
        Ok((outcome, ctx))
    })
    .await
    .map_err(|err| WebError::Join(err.to_string()))??;

    if let Some(id) = session {
        state.sessions.take(id);
    }
    Ok(render(&state.sessions, session, outcome, ctx))
}

fn contacts(conn: &Connection) -> ServiceResult<Contacts<'_>> {
    Ok(ContactService::new(
        SqliteContactRepository::try_new(conn)?,
        SqliteGroupRepository::try_new(conn)?,
    ))
}

fn groups(conn: &Connection) -> ServiceResult<Groups<'_>> {
    Ok(GroupService::new(
        SqliteContactRepository::try_new(conn)?,
        SqliteGroupRepository::try_new(conn)?,
    ))
}

/// GET / - entry point
async fn root() -> Redirect {
    Redirect::to("/home")
}

/// GET /home - groups and contacts
async fn home(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<Response, WebError> {
    dispatch(state, &headers, |conn, _| contacts(conn)?.home()).await
}

/// GET /search?query=
async fn search(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<SearchParams>,
) -> Result<Response, WebError> {
    dispatch(state, &headers, move |conn, _| {
        contacts(conn)?.search(params.query.as_deref())
    })
    .await
}

/// GET /new - empty creation form
async fn new_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    dispatch(state, &headers, |conn, _| Ok(contacts(conn)?.new_form())).await
}

/// POST /home - create a contact
async fn create_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ContactForm>,
) -> Result<Response, WebError> {
    dispatch(state, &headers, move |conn, ctx| {
        contacts(conn)?.create(ctx, form.into_fields())
    })
    .await
}

/// GET /home/{id} - single contact
async fn show_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<ContactId>,
) -> Result<Response, WebError> {
    dispatch(state, &headers, move |conn, _| contacts(conn)?.show(id)).await
}

/// GET /home/{id}/edit - edit form
async fn edit_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<ContactId>,
) -> Result<Response, WebError> {
    dispatch(state, &headers, move |conn, _| contacts(conn)?.edit_form(id)).await
}

/// POST /home/{id} - update a contact
async fn update_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<ContactId>,
    Form(form): Form<ContactForm>,
) -> Result<Response, WebError> {
    dispatch(state, &headers, move |conn, ctx| {
        contacts(conn)?.update(ctx, id, form.into_fields())
    })
    .await
}

/// POST /home/{id}/delete
async fn delete_contact(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<ContactId>,
) -> Result<Response, WebError> {
    dispatch(state, &headers, move |conn, ctx| contacts(conn)?.delete(ctx, id)).await
}

/// GET /home/{id}/add_to_group - group picker
async fn add_to_group_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<ContactId>,
) -> Result<Response, WebError> {
    dispatch(state, &headers, move |conn, _| groups(conn)?.add_form(id)).await
}

/// GET /home/group/{group_id}
async fn group_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(group_id): Path<GroupId>,
) -> Result<Response, WebError> {
    dispatch(state, &headers, move |conn, _| groups(conn)?.group_page(group_id)).await
}

/// POST /home/groups/add/{id}
async fn add_to_group(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<ContactId>,
    Form(form): Form<GroupForm>,
) -> Result<Response, WebError> {
    dispatch(state, &headers, move |conn, ctx| {
        groups(conn)?.add(ctx, id, form.group_name.trim())
    })
    .await
}

/// POST /home/group/{group_id}/remove/{id}
async fn remove_from_group(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((group_id, id)): Path<(GroupId, ContactId)>,
) -> Result<Response, WebError> {
    dispatch(state, &headers, move |conn, ctx| {
        groups(conn)?.remove(ctx, id, group_id)
    })
    .await
}

/// Contact and group routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/home", get(home).post(create_contact))
        .route("/search", get(search))
        .route("/new", get(new_form))
        .route("/home/{id}", get(show_contact).post(update_contact))
        .route("/home/{id}/edit", get(edit_form))
        .route("/home/{id}/delete", post(delete_contact))
        .route("/home/{id}/add_to_group", get(add_to_group_form))
        .route("/home/group/{group_id}", get(group_page))
        .route("/home/groups/add/{id}", post(add_to_group))
        .route("/home/group/{group_id}/remove/{id}", post(remove_from_group))
}
