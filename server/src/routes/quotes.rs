//! Quote list, display and category routes.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use quotesync_engine::{CategoryFilter, QuoteRecord, Selection};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::AppState;

/// Request body for adding a quote.
#[derive(Debug, Deserialize)]
pub struct AddQuoteRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub category: String,
}

/// Category selector state.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub options: Vec<String>,
    pub selected: CategoryFilter,
}

/// Request body for changing the category filter.
#[derive(Debug, Deserialize)]
pub struct SelectCategoryRequest {
    pub category: String,
}

/// Response for an import.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub imported: usize,
    pub total: usize,
}

/// Create quote routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/quotes", get(list_quotes).post(add_quote))
        .route("/quotes/random", get(random_quote))
        .route("/quotes/last", get(last_quote))
        .route("/categories", get(categories))
        .route("/categories/selected", put(select_category))
        .route("/export", get(export_quotes))
        .route("/import", post(import_quotes))
}

/// GET /quotes - The full local list.
async fn list_quotes(State(state): State<AppState>) -> Json<Vec<QuoteRecord>> {
    Json(state.session.quotes().await.into_records())
}

/// POST /quotes - Add a quote.
async fn add_quote(
    State(state): State<AppState>,
    Json(request): Json<AddQuoteRequest>,
) -> Result<(StatusCode, Json<QuoteRecord>)> {
    let record = state
        .session
        .add_quote(&request.text, &request.category)
        .await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /quotes/random - Draw a quote under the current filter.
async fn random_quote(State(state): State<AppState>) -> Result<Json<Selection>> {
    Ok(Json(state.session.show_random().await?))
}

/// GET /quotes/last - The quote last drawn in this session.
async fn last_quote(State(state): State<AppState>) -> Result<Json<QuoteRecord>> {
    state
        .session
        .last_viewed()
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("no quote viewed in this session".to_string()))
}

/// GET /categories - Selector options and current selection.
async fn categories(State(state): State<AppState>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        options: state.session.categories().await,
        selected: state.session.selected_category().await,
    })
}

/// PUT /categories/selected - Change the filter and draw a quote under it.
async fn select_category(
    State(state): State<AppState>,
    Json(request): Json<SelectCategoryRequest>,
) -> Result<Json<Selection>> {
    state
        .session
        .set_category(CategoryFilter::parse(&request.category))
        .await?;
    Ok(Json(state.session.show_random().await?))
}

/// GET /export - Download the list as `quotes.json`.
async fn export_quotes(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let body = state.session.export_json().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"quotes.json\"",
            ),
        ],
        body,
    ))
}

/// POST /import - Append quotes from a JSON document.
async fn import_quotes(State(state): State<AppState>, body: String) -> Result<Json<ImportResponse>> {
    if body.trim().is_empty() {
        return Err(AppError::BadRequest("empty import document".to_string()));
    }

    let imported = state.session.import_json(&body).await?;
    Ok(Json(ImportResponse {
        imported,
        total: state.session.quotes().await.len(),
    }))
}
