use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::layout::estimator::CostModel;
use crate::layout::fit::{check_fits_one_page, FitVerdict, MeasuredHeight};
use crate::layout::model::{check_consistency, ConsistencyReport, MeasuredHeights};
use crate::layout::page_fill::{analyze_page_fill, wasted_capacity, PageFillAnalysis};
use crate::layout::planner::{plan, plan_with, PageModel};
use crate::layout::style::{resolve, LayoutBudget, ResolvedStyle, StyleConfig};
use crate::models::resume::{ResumeDocument, SectionKind};
use crate::render::print::{build_print_document, PrintDocument};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub page_model: PageModel,
    pub page_fill: Vec<PageFillAnalysis>,
    pub wasted_capacity: f64,
    pub budget: LayoutBudget,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FitRequest {
    pub rendered_height_px: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyRequest {
    pub document: ResumeDocument,
    pub measured_heights: MeasuredHeights,
    pub tolerance: Option<usize>,
}

/// POST /api/v1/layout/plan
pub async fn handle_plan(
    State(state): State<AppState>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<PlanResponse>, AppError> {
    check_document(&state, &document)?;

    let budget = LayoutBudget::from_style(&document.style);
    let page_model = plan_with(&document, &budget, &CostModel::default());
    let page_fill = analyze_page_fill(&page_model, budget.capacity);
    let wasted = wasted_capacity(&page_fill);

    info!(
        pages = page_model.page_count(),
        capacity = budget.capacity,
        "Planned resume layout"
    );

    Ok(Json(PlanResponse {
        page_model,
        page_fill,
        wasted_capacity: wasted,
        budget,
    }))
}

/// POST /api/v1/layout/print
pub async fn handle_print(
    State(state): State<AppState>,
    Json(document): Json<ResumeDocument>,
) -> Result<Json<PrintDocument>, AppError> {
    check_document(&state, &document)?;

    let page_model = plan(&document);
    Ok(Json(build_print_document(
        &page_model,
        &resolve(&document.style),
    )))
}

/// POST /api/v1/layout/style
pub async fn handle_resolve_style(
    Json(style): Json<StyleConfig>,
) -> Result<Json<ResolvedStyle>, AppError> {
    style
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(resolve(&style)))
}

/// POST /api/v1/layout/fit
pub async fn handle_fit(Json(req): Json<FitRequest>) -> Json<FitVerdict> {
    let geometry = LayoutBudget::default().geometry;
    Json(check_fits_one_page(
        &MeasuredHeight(req.rendered_height_px),
        &geometry,
    ))
}

/// POST /api/v1/layout/consistency
pub async fn handle_consistency(
    State(state): State<AppState>,
    Json(req): Json<ConsistencyRequest>,
) -> Result<Json<ConsistencyReport>, AppError> {
    check_document(&state, &req.document)?;

    let tolerance = req
        .tolerance
        .unwrap_or(state.config.consistency_tolerance_pages);
    let budget = LayoutBudget::from_style(&req.document.style);
    Ok(Json(check_consistency(
        &req.document,
        &budget,
        &req.measured_heights,
        tolerance,
    )))
}

/// Structural validation plus the per-section size limit.
fn check_document(state: &AppState, document: &ResumeDocument) -> Result<(), AppError> {
    document.validate()?;

    let limit = state.config.max_blocks_per_section;
    for kind in SectionKind::ALL.iter().filter(|k| k.is_repeatable()) {
        let count = document.block_count(*kind);
        if count > limit {
            return Err(AppError::UnprocessableEntity(format!(
                "section {} has {count} entries, limit is {limit}",
                kind.as_str()
            )));
        }
    }
    Ok(())
}
