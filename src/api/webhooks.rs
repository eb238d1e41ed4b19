use axum::{
    body::Bytes,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::error::ApiError;
use crate::delivery::DeliveryReceipt;
use crate::github::{diff_url, DiffClient};
use crate::notifications::commit_email::build_commit_email;
use crate::push::validate_push;
use crate::AppState;

/// Turn a push event into a commit email.
///
/// POST /
pub async fn push_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let content_type = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok());
    let push = validate_push(content_type, &body)?;

    tracing::info!(
        commit = %push.commit.id,
        branch = %push.branch,
        "Push webhook received"
    );

    let diff_client = DiffClient::new()?;
    let unified_diff = diff_client.fetch(&diff_url(&push.commit.url)).await?;

    let email = build_commit_email(
        &push.commit,
        &push.branch,
        &unified_diff,
        &state.config.mail,
    );

    match state.delivery.deliver(email).await? {
        DeliveryReceipt::Sent(reply) => {
            tracing::info!(commit = %push.commit.id, "Commit email sent");
            Ok((StatusCode::OK, reply).into_response())
        }
        DeliveryReceipt::Queued => {
            tracing::info!(commit = %push.commit.id, "Commit email queued");
            Ok(StatusCode::OK.into_response())
        }
    }
}
