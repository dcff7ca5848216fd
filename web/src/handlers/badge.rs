//! Badge preview, check-in and sample badge endpoints.

use crate::error::AppError;
use crate::state::AppState;
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use badge_desk_core::desk::{BadgeOutcome, CheckinOutcome, RenderedBadge};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

/// Shown as `userId` when a previewed record has none.
const UNKNOWN_USER: &str = "UNKNOWN";

/// Body of `POST /badge` and `POST /checkin`.
///
/// A missing or `null` `ticketId` is treated like a blank one.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketRequest {
    /// Ticket to look up. Surrounding whitespace is ignored.
    #[serde(default)]
    pub ticket_id: Option<String>,
}

/// Body of `POST /pdf`.
#[derive(Debug, Deserialize, Serialize)]
pub struct SampleRequest {
    /// Printed on the badge's ticket line.
    pub id: String,
}

/// Badge plus the registrant fields printed on it.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeResponse {
    /// Always `true`.
    pub ok: bool,
    /// Trimmed ticket id.
    pub ticket_id: String,
    /// Registrant id, `UNKNOWN` if the record has none.
    pub user_id: String,
    /// Name as printed.
    pub name: String,
    /// Profession as printed.
    pub profession: String,
    /// Check-in flag after the request.
    pub checked_in: bool,
    /// Check-in instant as printed, `N/A` if never checked in.
    pub checked_in_at: String,
    /// Check-in only: `true` when an earlier call had already checked in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub already_checked_in: Option<bool>,
    /// Always `application/pdf`.
    pub content_type: String,
    /// Standard base64 of the PDF.
    pub pdf_base64: String,
}

/// Sample badge.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfResponse {
    /// Always `application/pdf`.
    pub content_type: String,
    /// Standard base64 of the PDF.
    pub pdf_base64: String,
}

impl From<RenderedBadge> for PdfResponse {
    fn from(badge: RenderedBadge) -> Self {
        Self {
            content_type: badge.content_type().to_string(),
            pdf_base64: STANDARD.encode(badge.bytes()),
        }
    }
}

impl From<BadgeOutcome> for BadgeResponse {
    fn from(outcome: BadgeOutcome) -> Self {
        let name = outcome.display_name().to_string();
        let profession = outcome.display_profession().to_string();
        let checked_in_at = outcome.display_checked_in_at();
        let pdf = PdfResponse::from(outcome.badge);
        Self {
            ok: true,
            ticket_id: outcome.ticket_id.to_string(),
            user_id: outcome
                .user_id
                .map_or_else(|| UNKNOWN_USER.to_string(), |id| id.to_string()),
            name,
            profession,
            checked_in: outcome.checked_in,
            checked_in_at,
            already_checked_in: None,
            content_type: pdf.content_type,
            pdf_base64: pdf.pdf_base64,
        }
    }
}

impl From<CheckinOutcome> for BadgeResponse {
    fn from(outcome: CheckinOutcome) -> Self {
        let name = outcome.display_name().to_string();
        let profession = outcome.display_profession().to_string();
        let checked_in_at = outcome.display_checked_in_at();
        let pdf = PdfResponse::from(outcome.badge);
        Self {
            ok: true,
            ticket_id: outcome.ticket_id.to_string(),
            user_id: outcome.user_id.to_string(),
            name,
            profession,
            checked_in: true,
            checked_in_at,
            already_checked_in: Some(outcome.transition.already_checked_in()),
            content_type: pdf.content_type,
            pdf_base64: pdf.pdf_base64,
        }
    }
}

/// Preview a registrant's badge without checking them in.
///
/// # Endpoint
///
/// ```text
/// POST /badge
/// { "ticketId": "T-001" }
/// ```
///
/// # Errors
///
/// 400 blank ticket or malformed body, 404 unknown ticket, 403 store access
/// denied, 409 duplicate ticket rows, 5xx store failures.
pub async fn badge(
    State(state): State<AppState>,
    payload: Result<Json<TicketRequest>, JsonRejection>,
) -> Result<Json<BadgeResponse>, AppError> {
    let Json(request) = payload?;
    let outcome = state
        .desk()
        .preview(request.ticket_id.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(outcome.into()))
}

/// Check a registrant in and return their badge.
///
/// Repeating the call is safe; `alreadyCheckedIn` is then `true` and
/// `checkedInAt` keeps the first value.
///
/// # Endpoint
///
/// ```text
/// POST /checkin
/// { "ticketId": "T-001" }
/// ```
///
/// # Errors
///
/// As [`badge`], plus 500 when the record has no user id or the store reports
/// an impossible state.
pub async fn checkin(
    State(state): State<AppState>,
    payload: Result<Json<TicketRequest>, JsonRejection>,
) -> Result<Json<BadgeResponse>, AppError> {
    let Json(request) = payload?;
    let outcome = state
        .desk()
        .check_in(request.ticket_id.as_deref().unwrap_or_default())
        .await?;

    tracing::info!(
        ticket_id = %outcome.ticket_id,
        user_id = %outcome.user_id,
        already_checked_in = outcome.transition.already_checked_in(),
        "Checked in"
    );
    Ok(Json(outcome.into()))
}

/// Render a placeholder badge for printer setup.
///
/// # Endpoint
///
/// ```text
/// POST /pdf
/// { "id": "test-print" }
/// ```
///
/// # Errors
///
/// 400 for a malformed body.
#[allow(clippy::unused_async)]
pub async fn sample_pdf(
    State(state): State<AppState>,
    payload: Result<Json<SampleRequest>, JsonRejection>,
) -> Result<Json<PdfResponse>, AppError> {
    let Json(request) = payload?;
    let badge = state.desk().sample_badge(&request.id)?;
    Ok(Json(badge.into()))
}
