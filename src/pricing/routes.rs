//! Quote wizard route handlers and the JSON quote API.
//!
//! The wizard is a linear flow (input -> confirm -> result -> order ->
//! complete) with an explicit back transition at every step. Form state
//! travels with each POST as hidden fields; there is no server-side
//! session. Which button the customer pressed arrives as the `action`
//! field.

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};

use crate::error::{AppError, Result};
use crate::AppState;

use super::models::Region;
use super::requests::{QuoteForm, QuoteRequest};
use super::responses::{PriceBreakdown, PricingErrorResponse};
use super::services::{
    compute_price, register_order, DbOrderStore, DbReferenceData, PricingError, ReferenceData,
};

/// Wizard and API routes, mounted at the application root
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/input", get(input))
        .route("/submit", post(submit))
        .route("/result", post(result))
        .route("/order", post(order))
        .route("/api/quote", post(api_quote))
}

/// Quote input form template
#[derive(Template)]
#[template(path = "input.html")]
struct InputTemplate {
    regions: Vec<Region>,
    form: QuoteForm,
}

/// Confirmation screen template
#[derive(Template)]
#[template(path = "confirm.html")]
struct ConfirmTemplate {
    form: QuoteForm,
    from_region_name: String,
    to_region_name: String,
}

/// Estimate result template
#[derive(Template)]
#[template(path = "result.html")]
struct ResultTemplate {
    form: QuoteForm,
    from_region_name: String,
    to_region_name: String,
    breakdown: PriceBreakdown,
}

/// Order completion template
#[derive(Template)]
#[template(path = "complete.html")]
struct CompleteTemplate {
    heading: String,
    message: String,
    note: String,
}

fn region_name(regions: &[Region], region_id: i32) -> String {
    regions
        .iter()
        .find(|region| region.id == region_id)
        .map(|region| region.name.clone())
        .unwrap_or_default()
}

/// Quote input form, empty or repopulated from a back transition
async fn input(State(state): State<AppState>) -> Result<Html<String>> {
    render_input(&state, QuoteForm::default()).await
}

async fn render_input(state: &AppState, form: QuoteForm) -> Result<Html<String>> {
    let reference = DbReferenceData {
        pool: &state.db,
        cache: &state.cache,
    };
    let regions = reference.list_regions().await?;

    let template = InputTemplate { regions, form };
    Ok(Html(template.render()?))
}

async fn render_confirm(state: &AppState, form: QuoteForm) -> Result<Html<String>> {
    let reference = DbReferenceData {
        pool: &state.db,
        cache: &state.cache,
    };
    let regions = reference.list_regions().await?;

    let template = ConfirmTemplate {
        from_region_name: region_name(&regions, form.from_region_id),
        to_region_name: region_name(&regions, form.to_region_id),
        form,
    };
    Ok(Html(template.render()?))
}

/// Input screen submit: forward to confirmation or back to the top page
async fn submit(State(state): State<AppState>, Form(form): Form<QuoteForm>) -> Result<Response> {
    match form.action.as_str() {
        "back_to_top" => Ok(Redirect::to("/").into_response()),
        "confirm" => Ok(render_confirm(&state, form).await?.into_response()),
        other => Err(AppError::InvalidForm(format!("unknown action '{}'", other))),
    }
}

/// Confirmation screen submit: compute the estimate or go back to input
async fn result(State(state): State<AppState>, Form(form): Form<QuoteForm>) -> Result<Response> {
    match form.action.as_str() {
        "back_to_input" => Ok(render_input(&state, form).await?.into_response()),
        "calculation" => {
            let order = form
                .to_order_request()
                .map_err(|e| AppError::InvalidForm(format!("scheduled date: {}", e)))?;

            let reference = DbReferenceData {
                pool: &state.db,
                cache: &state.cache,
            };
            let breakdown = compute_price(&reference, &order).await?;
            let regions = reference.list_regions().await?;

            let template = ResultTemplate {
                from_region_name: region_name(&regions, form.from_region_id),
                to_region_name: region_name(&regions, form.to_region_id),
                form,
                breakdown,
            };
            Ok(Html(template.render()?).into_response())
        }
        other => Err(AppError::InvalidForm(format!("unknown action '{}'", other))),
    }
}

/// Result screen submit: place the order or go back to confirmation
async fn order(State(state): State<AppState>, Form(form): Form<QuoteForm>) -> Result<Response> {
    match form.action.as_str() {
        "back_to_confirm" => Ok(render_confirm(&state, form).await?.into_response()),
        "complete" => {
            let order = form
                .to_order_request()
                .map_err(|e| AppError::InvalidForm(format!("scheduled date: {}", e)))?;

            let store = DbOrderStore { pool: &state.db };
            let recorded = register_order(&store, &order).await?;

            // Recorded and duplicate are both successful outcomes; only
            // the messaging differs.
            let template = if recorded {
                CompleteTemplate {
                    heading: "Your request has been received.".to_string(),
                    message: "We will call you to arrange a formal quotation.".to_string(),
                    note: "If your load changes, just tell us during the formal quote."
                        .to_string(),
                }
            } else {
                CompleteTemplate {
                    heading: "A matching request is already registered.".to_string(),
                    message: "If you did not submit it, please contact us by phone.".to_string(),
                    note: "Registered load details can still be adjusted during the formal quote."
                        .to_string(),
                }
            };
            Ok(Html(template.render()?).into_response())
        }
        other => Err(AppError::InvalidForm(format!("unknown action '{}'", other))),
    }
}

/// JSON quote endpoint: price an order without going through the wizard
async fn api_quote(
    State(state): State<AppState>,
    Json(request): Json<QuoteRequest>,
) -> std::result::Result<Json<PriceBreakdown>, (StatusCode, Json<PricingErrorResponse>)> {
    let order = request.into_order_request();
    let reference = DbReferenceData {
        pool: &state.db,
        cache: &state.cache,
    };

    match compute_price(&reference, &order).await {
        Ok(breakdown) => Ok(Json(breakdown)),
        Err(e) => Err(pricing_error_response(e)),
    }
}

fn pricing_error_response(error: PricingError) -> (StatusCode, Json<PricingErrorResponse>) {
    let (status, error_type, details) = match &error {
        PricingError::UnknownOptionalService { service_id } => (
            StatusCode::BAD_REQUEST,
            "unknown_optional_service",
            Some(serde_json::json!({ "service_id": service_id })),
        ),
        PricingError::UnknownPackage { package_id } => (
            StatusCode::BAD_REQUEST,
            "unknown_package",
            Some(serde_json::json!({ "package_id": package_id })),
        ),
        PricingError::InsufficientTruckTiers { found } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "insufficient_truck_tiers",
            Some(serde_json::json!({ "tiers_found": found })),
        ),
        PricingError::Database { .. } => {
            (StatusCode::INTERNAL_SERVER_ERROR, "reference_data_unavailable", None)
        }
    };

    tracing::warn!("Quote API request failed: {}", error);
    (
        status,
        Json(PricingErrorResponse {
            error_type: error_type.to_string(),
            message: error.to_string(),
            details,
        }),
    )
}
