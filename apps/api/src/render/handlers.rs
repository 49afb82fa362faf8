//! Axum route handlers for the Render API.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Span};
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{build_preview, decode_photo_base64, write_pdf, PhotoImage, PreviewPayload};
use crate::layout::ladder::CapTable;
use crate::layout::{fit_and_render, LayoutContext, LayoutResult, PageStyle, PhotoSlot, Rgb};
use crate::models::resume::ResumeDocument;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub resume: ResumeDocument,
    /// `#rrggbb`; the configured default when absent.
    #[serde(default)]
    pub accent_color: Option<String>,
    /// Reserve the header photo slot. Defaults to whether photo bytes were sent.
    #[serde(default)]
    pub photo_mode: Option<bool>,
    /// Base64 PNG/JPEG or a `data:` URI. Falls back to `resume.header.photo`.
    #[serde(default)]
    pub photo_base64: Option<String>,
}

/// Selection summary without drawing commands.
#[derive(Debug, Serialize)]
pub struct FitResponse {
    pub render_id: Uuid,
    pub level: usize,
    pub scale: f32,
    pub degraded: bool,
    pub truncated: bool,
    pub summary_truncated: bool,
    pub caps: CapTable,
    pub used_height: f32,
    pub overflowed: bool,
}

#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub render_id: Uuid,
    #[serde(flatten)]
    pub preview: PreviewPayload,
}

/// A validated request, ready for the blocking layout pass.
struct RenderJob {
    document: ResumeDocument,
    style: PageStyle,
    photo: Option<PhotoImage>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/render/export
///
/// Fits the resume onto one page and returns the PDF. The decision is
/// reported in `x-layout-*` headers.
pub async fn handle_export(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Response, AppError> {
    let render_id = Uuid::new_v4();
    let job = prepare(request, &state)?;
    let fonts = state.fonts.clone();
    let span = info_span!("render_export", %render_id);

    let (result, pdf) = tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        let ctx = LayoutContext::new(fonts.as_ref(), job.style);
        let result = fit_and_render(&job.document, &ctx);
        let pdf = write_pdf(&result.page, &fonts, job.photo.as_ref())?;
        Ok::<_, AppError>((result, pdf))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in export: {e}")))??;

    info!(%render_id, bytes = pdf.len(), level = result.level(), "export complete");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .header(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"resume.pdf\"",
        )
        .header("x-layout-level", result.level().to_string())
        .header("x-layout-scale", result.scale.to_string())
        .header("x-layout-degraded", result.degraded.to_string())
        .header("x-layout-truncated", result.truncated.to_string())
        .header("x-render-id", render_id.to_string())
        .body(Body::from(pdf))
        .map_err(|e| AppError::Internal(e.into()))
}

/// POST /api/v1/render/preview
///
/// Same decision as export, returned as structured content for native layout.
pub async fn handle_preview(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<PreviewResponse>, AppError> {
    let render_id = Uuid::new_v4();
    let job = prepare(request, &state)?;
    let style = job.style;
    let result = run_layout(&state, job, info_span!("render_preview", %render_id)).await?;

    Ok(Json(PreviewResponse {
        render_id,
        preview: build_preview(&result, style.photo, style.accent),
    }))
}

/// POST /api/v1/render/fit
///
/// Reports the selected level and scale without returning page content.
pub async fn handle_fit(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<FitResponse>, AppError> {
    let render_id = Uuid::new_v4();
    let job = prepare(request, &state)?;
    let result = run_layout(&state, job, info_span!("render_fit", %render_id)).await?;

    Ok(Json(FitResponse {
        render_id,
        level: result.level(),
        scale: result.scale.value(),
        degraded: result.degraded,
        truncated: result.truncated,
        summary_truncated: result.candidate.summary_truncated,
        caps: result.candidate.caps,
        used_height: result.page.used_height,
        overflowed: result.page.overflowed(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// CPU-bound; runs off the async executor.
async fn run_layout(
    state: &AppState,
    job: RenderJob,
    span: Span,
) -> Result<LayoutResult, AppError> {
    let fonts = state.fonts.clone();
    tokio::task::spawn_blocking(move || {
        let _entered = span.enter();
        let ctx = LayoutContext::new(fonts.as_ref(), job.style);
        fit_and_render(&job.document, &ctx)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in layout: {e}")))
}

fn prepare(request: RenderRequest, state: &AppState) -> Result<RenderJob, AppError> {
    let accent = match request.accent_color.as_deref() {
        Some(hex) => Rgb::from_hex(hex).ok_or_else(|| {
            AppError::Validation(format!("accent_color '{hex}' must be #rrggbb"))
        })?,
        None => state.config.default_accent,
    };

    let payload = request
        .photo_base64
        .as_deref()
        .or(request.resume.header.photo.as_deref())
        .filter(|p| !p.trim().is_empty());
    let photo_mode = request.photo_mode.unwrap_or(payload.is_some());

    let (slot, photo) = match (photo_mode, payload) {
        (false, _) => (PhotoSlot::Off, None),
        (true, None) => (PhotoSlot::Placeholder, None),
        (true, Some(data)) => (PhotoSlot::Image, Some(decode_photo_base64(data)?)),
    };

    Ok(RenderJob {
        document: request.resume,
        style: PageStyle {
            accent,
            photo: slot,
        },
        photo,
    })
}
