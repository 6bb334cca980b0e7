//! Admin CMS: login gate, package list and the package editor.
//!
//! Every editor action is a form POST that mutates the session's
//! [`EditorState`] and redirects back to `/admin`. Failures re-render the
//! current admin page with the message and a matching status instead.

use std::str::FromStr;

use askama::Template;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use crate::admin::upload::{self, UploadError};
use crate::admin::{BasicFields, EditSession, EditorState, EditorTab};
use crate::catalog::{BlockField, BlockKind, CatalogStore, Category, Direction, TourPackage};
use crate::error::AppError;
use crate::extractors::{
    clear_cookie, get_cookie_value, session_cookie, AdminToken, MaybeAdmin, ADMIN_COOKIE,
    ADMIN_LOGIN_PATH,
};
use crate::render::{self, ProductView};
use crate::routes::home::Html;
use crate::routes::SelectOption;
use crate::state::AppState;

const UPLOAD_LIMIT_BYTES: usize = 8 * 1024 * 1024;

#[derive(Template)]
#[template(path = "pages/admin_login.html")]
pub struct AdminLoginTemplate {
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "pages/admin_list.html")]
pub struct AdminListTemplate {
    pub products: Vec<TourPackage>,
    pub error: Option<String>,
}

/// One row of the content tab.
pub struct BlockRow {
    pub index: usize,
    pub kind: &'static str,
    pub value: String,
    pub caption: String,
    pub is_image: bool,
    pub is_paragraph: bool,
    pub is_supported: bool,
    pub is_first: bool,
    pub is_last: bool,
}

#[derive(Template)]
#[template(path = "pages/admin_editor.html")]
pub struct AdminEditorTemplate {
    pub session: EditSession,
    pub is_basic: bool,
    pub categories: Vec<SelectOption>,
    pub discount: String,
    pub description: String,
    pub tags: String,
    pub blocks: Vec<BlockRow>,
    pub view: ProductView,
    pub error: Option<String>,
}

impl AdminEditorTemplate {
    pub fn new(session: &EditSession, error: Option<String>) -> Self {
        let product = &session.product;
        let count = product.content_blocks.len();
        let blocks = product
            .content_blocks
            .blocks()
            .iter()
            .enumerate()
            .map(|(index, block)| {
                let kind = block.kind();
                BlockRow {
                    index,
                    kind: kind.map(BlockKind::as_str).unwrap_or("unsupported"),
                    value: block.value().to_string(),
                    caption: block.caption().unwrap_or_default().to_string(),
                    is_image: kind == Some(BlockKind::Image),
                    is_paragraph: kind == Some(BlockKind::Paragraph),
                    is_supported: kind.is_some(),
                    is_first: index == 0,
                    is_last: index + 1 == count,
                }
            })
            .collect();

        let categories = [
            Category::General,
            Category::Beauty,
            Category::Nightlife,
            Category::Religious,
            Category::Dmz,
        ]
        .into_iter()
        .map(|c| SelectOption::new(c.as_str(), c.admin_label(), product.category == Some(c)))
        .collect();

        Self {
            session: session.clone(),
            is_basic: session.tab == EditorTab::Basic,
            categories,
            discount: product.discount.map(|d| d.to_string()).unwrap_or_default(),
            description: product.description.clone().unwrap_or_default(),
            tags: product.tags_csv(),
            blocks,
            view: render::product_view(product, true),
            error,
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(index))
        .route("/admin/login", post(login))
        .route("/admin/logout", post(logout))
        .route("/admin/products/new", post(new_product))
        .route("/admin/products/{id}/edit", post(edit_product))
        .route("/admin/products/{id}/delete", post(delete_product))
        .route("/admin/editor/tab", post(set_tab))
        .route("/admin/editor/preview", post(toggle_preview))
        .route("/admin/editor/basic", post(update_basic))
        .route("/admin/editor/cover", post(upload_cover))
        .route("/admin/editor/blocks/insert", post(insert_block))
        .route("/admin/editor/blocks/append", post(append_block))
        .route("/admin/editor/blocks/{index}/update", post(update_block))
        .route("/admin/editor/blocks/{index}/move", post(move_block))
        .route("/admin/editor/blocks/{index}/remove", post(remove_block))
        .route("/admin/editor/blocks/{index}/upload", post(upload_block_image))
        .route("/admin/editor/save", post(save))
        .route("/admin/editor/close", post(close))
        .layer(DefaultBodyLimit::max(UPLOAD_LIMIT_BYTES))
}

/// Render whichever admin page matches the editor state.
fn render_admin(catalog: &CatalogStore, editor: &EditorState, error: Option<AppError>) -> Response {
    if let Some(e) = &error {
        tracing::warn!("Admin action failed: {}", e);
    }
    let status = error.as_ref().map(AppError::status).unwrap_or(StatusCode::OK);
    let message = error.as_ref().map(AppError::user_message);

    match editor.session() {
        Some(session) => (status, Html(AdminEditorTemplate::new(session, message))).into_response(),
        None => match catalog.list() {
            Ok(products) => (
                status,
                Html(AdminListTemplate {
                    products,
                    error: message,
                }),
            )
                .into_response(),
            Err(e) => AppError::from(e).into_response(),
        },
    }
}

/// Run `action` against the caller's editor, then redirect or re-render.
async fn apply<F>(state: &AppState, token: &AdminToken, action: F) -> Response
where
    F: FnOnce(&mut EditorState, &CatalogStore) -> Result<(), AppError>,
{
    let mut sessions = state.admin_sessions.lock().await;
    let Some(session) = sessions.get_mut(&token.0) else {
        return Redirect::to(ADMIN_LOGIN_PATH).into_response();
    };
    match action(&mut session.editor, &state.catalog) {
        Ok(()) => Redirect::to("/admin").into_response(),
        Err(e) => render_admin(&state.catalog, &session.editor, Some(e)),
    }
}

fn parse_field<T: FromStr>(raw: &str, label: &str) -> Result<T, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Validation(format!("{} must be a number", label)))
}

async fn read_image(mut multipart: Multipart) -> Result<String, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok(upload::to_data_url(
            &bytes,
            content_type.as_deref(),
            file_name.as_deref(),
        )?);
    }
    Err(UploadError::Empty.into())
}

pub async fn index(State(state): State<AppState>, MaybeAdmin(token): MaybeAdmin) -> Response {
    if let Some(token) = token {
        let mut sessions = state.admin_sessions.lock().await;
        if let Some(session) = sessions.get_mut(&token) {
            return render_admin(&state.catalog, &session.editor, None);
        }
    }
    Html(AdminLoginTemplate { error: None }).into_response()
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let gate = state.admin_gate.clone();
    let accepted = tokio::task::spawn_blocking(move || gate.verify(&form.password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !accepted {
        tracing::warn!("Rejected admin login attempt");
        return Ok((
            StatusCode::UNAUTHORIZED,
            Html(AdminLoginTemplate {
                error: Some("Incorrect password".to_string()),
            }),
        )
            .into_response());
    }

    let token = state.admin_sessions.lock().await.open();
    tracing::info!("Admin signed in");
    let max_age = state.config.admin.session_minutes * 60;

    Ok((
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/admin".to_string()),
            (header::SET_COOKIE, session_cookie(ADMIN_COOKIE, &token, max_age)),
        ],
        "",
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>, parts: Parts) -> Response {
    if let Some(token) = get_cookie_value(&parts, ADMIN_COOKIE) {
        state.admin_sessions.lock().await.close(token);
    }
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, "/".to_string()),
            (header::SET_COOKIE, clear_cookie(ADMIN_COOKIE)),
        ],
        "",
    )
        .into_response()
}

pub async fn new_product(State(state): State<AppState>, token: AdminToken) -> Response {
    apply(&state, &token, |editor, _| {
        editor.open_new();
        Ok(())
    })
    .await
}

pub async fn edit_product(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<String>,
) -> Response {
    apply(&state, &token, |editor, catalog| {
        editor.open_existing(catalog, &id)?;
        Ok(())
    })
    .await
}

pub async fn delete_product(
    State(state): State<AppState>,
    token: AdminToken,
    Path(id): Path<String>,
) -> Response {
    apply(&state, &token, |_, catalog| {
        catalog.delete(&id)?;
        tracing::info!("Deleted package {}", id);
        Ok(())
    })
    .await
}

#[derive(Deserialize)]
pub struct TabForm {
    pub tab: String,
}

pub async fn set_tab(
    State(state): State<AppState>,
    token: AdminToken,
    Form(form): Form<TabForm>,
) -> Response {
    apply(&state, &token, |editor, _| {
        let tab = EditorTab::parse(&form.tab)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown tab: {}", form.tab)))?;
        editor.session_mut()?.tab = tab;
        Ok(())
    })
    .await
}

pub async fn toggle_preview(State(state): State<AppState>, token: AdminToken) -> Response {
    apply(&state, &token, |editor, _| {
        let session = editor.session_mut()?;
        session.preview = !session.preview;
        Ok(())
    })
    .await
}

#[derive(Deserialize)]
pub struct BasicForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub reviews: String,
    #[serde(default)]
    pub discount: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub tags: String,
    /// `save` to persist right after applying the fields.
    #[serde(default)]
    pub then: Option<String>,
}

impl BasicForm {
    /// Parse against the product being edited. A field that does not parse
    /// keeps its current value, and the first such failure is returned with
    /// the fields so the rest of the submit is not lost.
    fn fields(&self, current: &TourPackage) -> (BasicFields, Option<AppError>) {
        let mut error = None;
        let discount = match self.discount.trim() {
            "" => None,
            raw => {
                let kept = current.discount.unwrap_or_default();
                Some(parse_or_keep(raw, "Discount", kept, &mut error))
            }
        };
        let category = match self.category.trim() {
            "" => None,
            raw => Category::parse(raw).or_else(|| {
                error.get_or_insert(AppError::BadRequest(format!("Unknown category: {}", raw)));
                current.category
            }),
        };
        let fields = BasicFields {
            title: self.title.clone(),
            location: self.location.clone(),
            price: parse_or_keep(&self.price, "Price", current.price, &mut error),
            rating: parse_or_keep(&self.rating, "Rating", current.rating, &mut error),
            reviews: parse_or_keep(&self.reviews, "Reviews", current.reviews, &mut error),
            discount,
            category,
            description: self.description.clone(),
            image_url: self.image_url.clone(),
            tags: self.tags.clone(),
        };
        (fields, error)
    }
}

fn parse_or_keep<T: FromStr>(
    raw: &str,
    label: &str,
    current: T,
    error: &mut Option<AppError>,
) -> T {
    match parse_field(raw, label) {
        Ok(value) => value,
        Err(e) => {
            error.get_or_insert(e);
            current
        }
    }
}

pub async fn update_basic(
    State(state): State<AppState>,
    token: AdminToken,
    Form(form): Form<BasicForm>,
) -> Response {
    apply(&state, &token, |editor, catalog| {
        let session = editor.session_mut()?;
        let (fields, error) = form.fields(&session.product);
        session.apply_basic(fields);
        if let Some(e) = error {
            return Err(e);
        }
        if form.then.as_deref() == Some("save") {
            editor.save(catalog)?;
        }
        Ok(())
    })
    .await
}

pub async fn upload_cover(
    State(state): State<AppState>,
    token: AdminToken,
    multipart: Multipart,
) -> Response {
    let image = read_image(multipart).await;
    apply(&state, &token, |editor, _| {
        let reference = image?;
        editor.session_mut()?.set_cover_image(reference);
        Ok(())
    })
    .await
}

#[derive(Deserialize)]
pub struct InsertForm {
    pub index: i64,
    pub kind: String,
}

#[derive(Deserialize)]
pub struct KindForm {
    pub kind: String,
}

fn parse_kind(raw: &str) -> Result<BlockKind, AppError> {
    BlockKind::parse(raw)
        .ok_or_else(|| AppError::BadRequest(format!("Unknown block type: {}", raw)))
}

pub async fn insert_block(
    State(state): State<AppState>,
    token: AdminToken,
    Form(form): Form<InsertForm>,
) -> Response {
    apply(&state, &token, |editor, _| {
        let kind = parse_kind(&form.kind)?;
        let session = editor.session_mut()?;
        session.document_mut().insert_at(form.index, kind);
        session.tab = EditorTab::Content;
        Ok(())
    })
    .await
}

pub async fn append_block(
    State(state): State<AppState>,
    token: AdminToken,
    Form(form): Form<KindForm>,
) -> Response {
    apply(&state, &token, |editor, _| {
        let kind = parse_kind(&form.kind)?;
        let session = editor.session_mut()?;
        session.document_mut().append(kind);
        session.tab = EditorTab::Content;
        Ok(())
    })
    .await
}

#[derive(Deserialize)]
pub struct UpdateForm {
    pub field: String,
    #[serde(default)]
    pub value: String,
}

pub async fn update_block(
    State(state): State<AppState>,
    token: AdminToken,
    Path(index): Path<usize>,
    Form(form): Form<UpdateForm>,
) -> Response {
    apply(&state, &token, |editor, _| {
        let field = BlockField::parse(&form.field)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown block field: {}", form.field)))?;
        editor
            .session_mut()?
            .document_mut()
            .update_field(index, field, form.value);
        Ok(())
    })
    .await
}

#[derive(Deserialize)]
pub struct MoveForm {
    pub direction: String,
}

pub async fn move_block(
    State(state): State<AppState>,
    token: AdminToken,
    Path(index): Path<usize>,
    Form(form): Form<MoveForm>,
) -> Response {
    apply(&state, &token, |editor, _| {
        let direction = Direction::parse(&form.direction)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown direction: {}", form.direction)))?;
        editor.session_mut()?.document_mut().move_block(index, direction);
        Ok(())
    })
    .await
}

pub async fn remove_block(
    State(state): State<AppState>,
    token: AdminToken,
    Path(index): Path<usize>,
) -> Response {
    apply(&state, &token, |editor, _| {
        editor.session_mut()?.document_mut().remove_at(index);
        Ok(())
    })
    .await
}

pub async fn upload_block_image(
    State(state): State<AppState>,
    token: AdminToken,
    Path(index): Path<usize>,
    multipart: Multipart,
) -> Response {
    let image = read_image(multipart).await;
    apply(&state, &token, |editor, _| {
        let reference = image?;
        editor
            .session_mut()?
            .document_mut()
            .update_field(index, BlockField::Value, reference);
        Ok(())
    })
    .await
}

pub async fn save(State(state): State<AppState>, token: AdminToken) -> Response {
    apply(&state, &token, |editor, catalog| {
        editor.save(catalog)?;
        Ok(())
    })
    .await
}

pub async fn close(State(state): State<AppState>, token: AdminToken) -> Response {
    apply(&state, &token, |editor, _| {
        editor.close();
        Ok(())
    })
    .await
}
