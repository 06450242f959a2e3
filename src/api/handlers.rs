use std::str::FromStr;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{ArticleId, ClusterId, Dataset, Recommendation, SizeCategory, UserId},
};

use super::AppState;

const WELCOME: &str = "Welcome to the content recommendation service!";

// Request/Response types

/// Query string of the action endpoint; values are parsed by the handler so
/// malformed numbers surface as `InvalidParameter`
#[derive(Debug, Default, Deserialize)]
pub struct ActionQuery {
    pub action: Option<String>,
    pub user_id: Option<String>,
    pub words_count: Option<String>,
    pub cluster_choice: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Recommend,
    AddUser,
    AddArticle,
    LoadDatasets,
}

impl FromStr for Action {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommend" => Ok(Action::Recommend),
            "add_user" => Ok(Action::AddUser),
            "add_article" => Ok(Action::AddArticle),
            "load_datasets" => Ok(Action::LoadDatasets),
            other => Err(AppError::InvalidParameter(format!(
                "unknown action '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    pub words_count: i64,
    #[serde(alias = "cluster_choice")]
    pub cluster_id: ClusterId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserCreatedResponse {
    pub user_id: UserId,
    pub message: String,
}

impl UserCreatedResponse {
    fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            message: format!("New user added with id {}", user_id),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleCreatedResponse {
    pub article_id: ArticleId,
    pub words_count: i64,
    pub cluster_id: ClusterId,
    pub size_category: SizeCategory,
    pub message: String,
}

impl ArticleCreatedResponse {
    fn new(
        article_id: ArticleId,
        words_count: i64,
        cluster_id: ClusterId,
        size_category: SizeCategory,
    ) -> Self {
        Self {
            article_id,
            words_count,
            cluster_id,
            size_category,
            message: format!(
                "New article added with id {}: {} words in cluster {}",
                article_id, words_count, cluster_id
            ),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub clicks: usize,
    pub articles: usize,
    pub users: usize,
    pub loaded_at: DateTime<Utc>,
}

impl From<&Dataset> for DatasetSummary {
    fn from(dataset: &Dataset) -> Self {
        Self {
            clicks: dataset.tables.clicks.len(),
            articles: dataset.tables.articles.len(),
            users: dataset.tables.users.len(),
            loaded_at: dataset.loaded_at,
        }
    }
}

// Parameter parsing

fn parse_param(name: &str, raw: Option<&str>) -> AppResult<i64> {
    let raw = raw
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidParameter(format!("missing parameter '{}'", name)))?;

    raw.parse::<i64>().map_err(|_| {
        AppError::InvalidParameter(format!(
            "parameter '{}' must be an integer, got '{}'",
            name, raw
        ))
    })
}

fn parse_non_negative(name: &str, raw: Option<&str>) -> AppResult<i64> {
    let value = parse_param(name, raw)?;
    ensure_non_negative(name, value)
}

fn ensure_non_negative(name: &str, value: i64) -> AppResult<i64> {
    if value < 0 {
        return Err(AppError::InvalidParameter(format!(
            "parameter '{}' must be a non-negative integer, got {}",
            name, value
        )));
    }
    Ok(value)
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Action endpoint mirroring the `?action=` interface
pub async fn dispatch(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<ActionQuery>,
) -> AppResult<Response> {
    let Some(action) = query.action.as_deref() else {
        return Ok(Json(json!({ "message": WELCOME })).into_response());
    };
    let action: Action = action.parse()?;

    tracing::info!(request_id = %request_id, ?action, "Processing action");

    let repository = &state.repository;
    let response = match action {
        Action::Recommend => {
            let user_id = parse_param("user_id", query.user_id.as_deref())?;
            Json(repository.recommend(user_id).await?).into_response()
        }
        Action::AddUser => {
            let user_id = repository.add_user().await?;
            Json(UserCreatedResponse::new(user_id)).into_response()
        }
        Action::AddArticle => {
            let words_count = parse_non_negative("words_count", query.words_count.as_deref())?;
            let cluster_id = parse_non_negative("cluster_choice", query.cluster_choice.as_deref())?;
            let (article_id, size) = repository.add_article(words_count, cluster_id).await?;
            Json(ArticleCreatedResponse::new(
                article_id,
                words_count,
                cluster_id,
                size,
            ))
            .into_response()
        }
        Action::LoadDatasets => {
            let dataset = repository.snapshot().await?;
            Json(dataset.as_ref()).into_response()
        }
    };

    Ok(response)
}

/// Recommendations for one user
pub async fn get_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Recommendation>> {
    let user_id = parse_param("user_id", Some(user_id.as_str()))?;
    tracing::info!(request_id = %request_id, user_id, "Processing recommendation request");

    let recommendation = state.repository.recommend(user_id).await?;
    Ok(Json(recommendation))
}

/// Register a new user
pub async fn create_user(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<UserCreatedResponse>)> {
    let user_id = state.repository.add_user().await?;
    Ok((StatusCode::CREATED, Json(UserCreatedResponse::new(user_id))))
}

/// Add an article to the catalog
pub async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ArticleCreatedResponse>)> {
    let Json(request) = payload.map_err(|rejection| {
        AppError::InvalidParameter(format!("invalid article body: {}", rejection.body_text()))
    })?;
    let words_count = ensure_non_negative("words_count", request.words_count)?;
    let cluster_id = ensure_non_negative("cluster_id", request.cluster_id)?;

    let (article_id, size) = state
        .repository
        .add_article(words_count, cluster_id)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ArticleCreatedResponse::new(
            article_id,
            words_count,
            cluster_id,
            size,
        )),
    ))
}

/// Dump the loaded tables
pub async fn get_datasets(State(state): State<AppState>) -> AppResult<Response> {
    let dataset = state.repository.snapshot().await?;
    Ok(Json(dataset.as_ref()).into_response())
}

/// Force a reload from the data store
pub async fn reload_datasets(State(state): State<AppState>) -> AppResult<Json<DatasetSummary>> {
    let dataset = state.repository.reload().await?;
    Ok(Json(DatasetSummary::from(dataset.as_ref())))
}
