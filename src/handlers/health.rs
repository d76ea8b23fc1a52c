use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::prelude::*;
use sea_orm::{EntityTrait, PaginatorTrait};
use tracing::{error, instrument};

use crate::schemas::{AppState, HealthResponse};

/// Health check endpoint
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>, StatusCode> {
    // Test database connection
    let db_status = match state.db.ping().await {
        Ok(_) => "connected".to_string(),
        Err(_) => "disconnected".to_string(),
    };

    let counts = async {
        Ok::<_, sea_orm::DbErr>((
            User::find().count(&state.db).await?,
            Tag::find().count(&state.db).await?,
            Article::find().count(&state.db).await?,
        ))
    };
    let (users, tags, articles) = match counts.await {
        Ok(counts) => counts,
        Err(e) => {
            error!("Failed to count rows: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_status,
        users,
        tags,
        articles,
    };

    Ok(Json(response))
}
