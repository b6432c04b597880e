//! Transactions API endpoints

use api_types::transaction::{Transaction, TransactionNew};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;

use crate::{ServerError, server::ServerState};

/// Validate the payload, then store it inside its own session.
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Transaction>, ServerError> {
    let Json(payload) = payload?;
    let record = TransactionNew::try_from(payload)?;

    let session = state.engine.session().await?;
    let stored = session.insert(record).await?;

    tracing::info!(
        id = stored.id,
        category = %stored.category,
        is_income = stored.is_income,
        "transaction created"
    );
    Ok(Json(stored))
}
