//! # API REST
//!
//! REST surface for the ANC decision-support core.
//!
//! Handles:
//! - HTTP endpoints with axum, routed onto the [`ClinicalDecisionFacade`]
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON shapes, status mapping, CORS)
//!
//! All decision logic stays in `anc-core`; this crate only adapts the wire
//! contract of the original clinic backend onto the facade and supplies the
//! in-memory collaborator implementations for the demo deployment.

pub mod predictor;
pub mod store;

use anc_core::{
    ClinicalDecisionFacade, CoreConfig, DecisionError, Identity, PatientId, PlannedVisit,
    ResolveOptions, Role, ScheduleRequest, TriageAssessment, VitalsPayload,
};
use anc_types::{AdviceText, RawIdentifier};
use api_shared::{
    AdviceIn, AdviceRes, AssessmentRes, ErrorRes, HealthRes, HealthService, NextVisitRes,
    PatientDetailRes, PatientRow, PredictReq, RescheduleReq, ResolveRes, ScheduleReq, VisitRes,
};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use predictor::ScreeningStub;
use serde::Deserialize;
use std::sync::Arc;
use store::InMemoryStore;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

type Facade = ClinicalDecisionFacade<InMemoryStore, ScreeningStub, InMemoryStore>;

/// Application state shared across REST API handlers.
#[derive(Clone)]
pub struct AppState {
    facade: Arc<Facade>,
}

/// Builds the application state for the demo deployment: one shared
/// in-memory store acting as directory and scheduler, with the screening
/// stub persisting into the same store.
pub fn app_state(cfg: CoreConfig) -> AppState {
    let store = InMemoryStore::new();
    let predictor = ScreeningStub::new(store.clone());
    let facade = ClinicalDecisionFacade::new(
        store.clone(),
        predictor,
        store,
        Arc::new(cfg),
    );
    AppState {
        facade: Arc::new(facade),
    }
}

/// Builds the full router: API routes, Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/patients/resolve", get(resolve_patient))
        .route("/patients", get(list_patients))
        .route("/patients/:id", get(patient_detail))
        .route("/patients/by-email/:email", get(patient_by_email))
        .route("/patients/:id/advice", post(add_advice).get(list_advice))
        .route("/gh/predict", post(predict))
        .route("/gh/latest/:id", get(latest_assessment))
        .route("/visits/schedule", post(schedule_visit))
        .route("/visits/reschedule", post(reschedule_visit))
        .route("/visits/next", get(next_visit))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        resolve_patient,
        list_patients,
        patient_detail,
        patient_by_email,
        add_advice,
        list_advice,
        predict,
        latest_assessment,
        schedule_visit,
        reschedule_visit,
        next_visit,
    ),
    components(schemas(
        HealthRes,
        ErrorRes,
        ResolveRes,
        PatientRow,
        PatientDetailRes,
        AdviceIn,
        AdviceRes,
        PredictReq,
        AssessmentRes,
        ScheduleReq,
        RescheduleReq,
        VisitRes,
        NextVisitRes,
    ))
)]
struct ApiDoc;

/// Error wrapper mapping core error kinds onto HTTP statuses.
///
/// The body keeps the original backend's `{"detail": ...}` shape.
pub struct ApiError(DecisionError);

impl From<DecisionError> for ApiError {
    fn from(err: DecisionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DecisionError::Validation { .. }
            | DecisionError::MissingField(_)
            | DecisionError::InvalidInput(_)
            | DecisionError::OutOfWindow { .. }
            | DecisionError::OutOfRange { .. } => StatusCode::BAD_REQUEST,
            DecisionError::NotFound(_) | DecisionError::NotFoundAfterUnavailable { .. } => {
                StatusCode::NOT_FOUND
            }
            DecisionError::Unavailable(_) => StatusCode::BAD_GATEWAY,
        };
        (
            status,
            Json(ErrorRes {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Caller context for facade calls.
///
/// There is no authentication layer in this system; the acting identity is
/// carried on explicit headers by the fronting application and defaults to
/// the service identity when absent.
fn actor_identity(headers: &HeaderMap) -> Identity {
    let email = headers
        .get("x-actor-email")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("api@anc.local")
        .to_owned();
    let role = match headers
        .get("x-actor-role")
        .and_then(|v| v.to_str().ok())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("patient") => Role::Patient,
        Some("doctor") => Role::Doctor,
        Some("admin") => Role::Admin,
        _ => Role::Clinician,
    };
    Identity { email, role }
}

fn assessment_res(a: TriageAssessment) -> AssessmentRes {
    AssessmentRes {
        patient_id: a.patient.map(|p| p.0),
        tier: a.tier.to_string(),
        risk_class: a.risk_class,
        risk_score: a.risk_score,
        priority: a.priority,
        reasons: a.reasons,
        created_at: a.assessed_at,
    }
}

fn advice_res(entry: anc_core::AdviceEntry) -> AdviceRes {
    AdviceRes {
        id: entry.id,
        patient_id: entry.patient_id.0,
        text: entry.text,
        created_at: entry.created_at,
    }
}

fn visit_res(visit: PlannedVisit) -> VisitRes {
    VisitRes {
        ok: true,
        next_visit: visit.next_visit,
        status: visit.status.to_string(),
        scheduled_for: visit.scheduled_for,
    }
}

fn vitals_from_req(req: &PredictReq) -> VitalsPayload {
    VitalsPayload {
        age: req.age,
        bmi: req.bmi,
        systolic_bp: req.systolic_bp,
        diastolic_bp: req.diastolic_bp,
        heart_rate: req.heart_rate,
        previous_complications: req.previous_complications,
        preexisting_diabetes: req.preexisting_diabetes,
        gestational_diabetes: req.gestational_diabetes,
        mental_health: req.mental_health,
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check response", body = HealthRes))
)]
async fn health() -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct ResolveQuery {
    /// Free-form identifier: numeric ID, email, or partial name.
    q: String,
    /// Create a minimal record for an unknown email when true.
    #[serde(default)]
    create_if_missing: bool,
}

#[utoipa::path(
    get,
    path = "/patients/resolve",
    params(ResolveQuery),
    responses(
        (status = 200, description = "Resolved patient, or empty object when unresolved", body = ResolveRes),
        (status = 502, description = "Directory unavailable", body = ErrorRes)
    )
)]
async fn resolve_patient(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ResolveRes>, ApiError> {
    let identity = actor_identity(&headers);
    let raw = RawIdentifier::new(&query.q);
    let options = ResolveOptions {
        allow_create: query.create_if_missing,
    };
    match state.facade.resolve_patient(&identity, &raw, options) {
        Ok(id) => {
            let record = state.facade.patient_record(&identity, id)?;
            Ok(Json(ResolveRes {
                id: Some(record.id.0),
                full_name: record.full_name,
                email: record.email,
            }))
        }
        // Legacy contract: an unresolved term answers an empty object.
        Err(DecisionError::NotFound(_)) | Err(DecisionError::NotFoundAfterUnavailable { .. }) => {
            Ok(Json(ResolveRes::default()))
        }
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct ListQuery {
    /// Substring filter over name and email.
    q: Option<String>,
}

#[utoipa::path(
    get,
    path = "/patients",
    params(ListQuery),
    responses((status = 200, description = "Patients, optionally filtered", body = [PatientRow]))
)]
async fn list_patients(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<PatientRow>>, ApiError> {
    let identity = actor_identity(&headers);
    let rows = state
        .facade
        .list_patients(&identity, query.q.as_deref())?
        .into_iter()
        .map(|r| PatientRow {
            id: r.id.0,
            full_name: r.full_name,
            email: r.email,
            phone_number: r.phone_number,
        })
        .collect();
    Ok(Json(rows))
}

#[utoipa::path(
    get,
    path = "/patients/{id}",
    params(("id" = i64, Path, description = "Canonical patient identifier")),
    responses(
        (status = 200, description = "Patient detail", body = PatientDetailRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
async fn patient_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<PatientDetailRes>, ApiError> {
    let identity = actor_identity(&headers);
    let overview = state.facade.patient_overview(&identity, PatientId(id))?;
    Ok(Json(PatientDetailRes {
        id: overview.patient.id.0,
        full_name: overview.patient.full_name,
        email: overview.patient.email,
        phone_number: overview.patient.phone_number,
        next_visit: overview.next_visit.as_ref().map(|v| v.next_visit),
        appt_status: overview.next_visit.map(|v| v.status.to_string()),
        assessment: overview.assessment.map(assessment_res),
        advice: overview.advice.into_iter().map(advice_res).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/patients/by-email/{email}",
    params(("email" = String, Path, description = "Patient email")),
    responses(
        (status = 200, description = "Patient detail", body = PatientDetailRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
async fn patient_by_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(email): Path<String>,
) -> Result<Json<PatientDetailRes>, ApiError> {
    let identity = actor_identity(&headers);
    let id = state.facade.resolve_patient(
        &identity,
        &RawIdentifier::new(&email),
        ResolveOptions::default(),
    )?;
    patient_detail(State(state), headers, Path(id.0)).await
}

#[utoipa::path(
    post,
    path = "/patients/{id}/advice",
    params(("id" = i64, Path, description = "Canonical patient identifier")),
    request_body = AdviceIn,
    responses(
        (status = 200, description = "Stored advice note", body = AdviceRes),
        (status = 400, description = "Empty or overlong advice", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
async fn add_advice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<AdviceIn>,
) -> Result<Json<AdviceRes>, ApiError> {
    let identity = actor_identity(&headers);
    let text = AdviceText::new(&body.advice)
        .map_err(|e| DecisionError::InvalidInput(e.to_string()))?;
    let entry = state.facade.add_advice(&identity, PatientId(id), &text)?;
    Ok(Json(advice_res(entry)))
}

#[utoipa::path(
    get,
    path = "/patients/{id}/advice",
    params(("id" = i64, Path, description = "Canonical patient identifier")),
    responses((status = 200, description = "Advice notes, latest first", body = [AdviceRes]))
)]
async fn list_advice(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Vec<AdviceRes>>, ApiError> {
    let identity = actor_identity(&headers);
    let entries = state.facade.list_advice(&identity, PatientId(id))?;
    Ok(Json(entries.into_iter().map(advice_res).collect()))
}

#[utoipa::path(
    post,
    path = "/gh/predict",
    request_body = PredictReq,
    responses(
        (status = 200, description = "Merged triage assessment", body = AssessmentRes),
        (status = 400, description = "Vitals outside valid ranges", body = ErrorRes),
        (status = 502, description = "Predictor or directory unavailable", body = ErrorRes)
    )
)]
async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PredictReq>,
) -> Result<Json<AssessmentRes>, ApiError> {
    let identity = actor_identity(&headers);
    let payload = vitals_from_req(&body);
    let assessment = match body.patient.as_deref().map(RawIdentifier::new) {
        Some(raw) if !raw.is_empty() => state.facade.screen_by_identifier(
            &identity,
            &raw,
            ResolveOptions {
                allow_create: body.create_if_missing,
            },
            &payload,
        )?,
        _ => state.facade.screen(&identity, None, &payload)?,
    };
    Ok(Json(assessment_res(assessment)))
}

#[utoipa::path(
    get,
    path = "/gh/latest/{id}",
    params(("id" = i64, Path, description = "Canonical patient identifier")),
    responses(
        (status = 200, description = "Latest stored assessment", body = AssessmentRes),
        (status = 404, description = "No saved prediction", body = ErrorRes)
    )
)]
async fn latest_assessment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<AssessmentRes>, ApiError> {
    let identity = actor_identity(&headers);
    let assessment = state.facade.latest_assessment(&identity, PatientId(id))?;
    Ok(Json(assessment_res(assessment)))
}

#[utoipa::path(
    post,
    path = "/visits/schedule",
    request_body = ScheduleReq,
    responses(
        (status = 200, description = "Recorded visit", body = VisitRes),
        (status = 400, description = "Requested date outside the allowed window", body = ErrorRes),
        (status = 404, description = "Patient not found", body = ErrorRes)
    )
)]
async fn schedule_visit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<ScheduleReq>,
) -> Result<Json<VisitRes>, ApiError> {
    let identity = actor_identity(&headers);
    let request = ScheduleRequest {
        patient_id: PatientId(body.patient_id),
        last_visit: body.last_visit,
        requested_next: body.requested_next,
    };
    let visit = state.facade.schedule_visit(&identity, &request)?;
    Ok(Json(visit_res(visit)))
}

#[utoipa::path(
    post,
    path = "/visits/reschedule",
    request_body = RescheduleReq,
    responses(
        (status = 200, description = "Moved visit", body = VisitRes),
        (status = 400, description = "Proposed date outside the reschedule tolerance", body = ErrorRes),
        (status = 404, description = "No appointment for patient", body = ErrorRes)
    )
)]
async fn reschedule_visit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RescheduleReq>,
) -> Result<Json<VisitRes>, ApiError> {
    let identity = actor_identity(&headers);
    let visit =
        state
            .facade
            .reschedule_visit(&identity, PatientId(body.patient_id), body.new_date)?;
    Ok(Json(visit_res(visit)))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
struct NextVisitQuery {
    email: String,
}

#[utoipa::path(
    get,
    path = "/visits/next",
    params(NextVisitQuery),
    responses((status = 200, description = "Next planned visit, if any", body = NextVisitRes))
)]
async fn next_visit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<NextVisitQuery>,
) -> Result<Json<NextVisitRes>, ApiError> {
    let identity = actor_identity(&headers);
    let planned = state.facade.next_visit_by_email(&identity, &query.email)?;
    Ok(Json(match planned {
        Some(v) => NextVisitRes {
            next_visit: Some(v.next_visit),
            status: Some(v.status.to_string()),
            scheduled_for: Some(v.scheduled_for),
        },
        None => NextVisitRes::default(),
    }))
}
