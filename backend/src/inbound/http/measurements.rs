//! Measurement handlers.
//!
//! ```text
//! GET    /api/measurements/types
//! GET    /api/measurements/types/{type}/template
//! GET    /api/measurements[?userId=]
//! POST   /api/measurements
//! GET    /api/measurements/all
//! PUT    /api/measurements/{id}
//! DELETE /api/measurements/{id}
//! ```
//!
//! Write bodies carry either structured `sections` or a flat `values` map
//! keyed by template field id.

use std::collections::BTreeMap;

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{MeasurementInput, RecordMeasurementRequest};
use crate::domain::{
    CategorySummary, Error, GarmentCategory, Measurement, MeasurementId, MeasurementSection,
    MeasurementTemplate, UserId,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CreatedResponse;
use crate::inbound::http::bearer::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{measurement_shape_error, parse_category};

/// Query for `GET /api/measurements`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MeasurementQuery {
    /// Restrict the listing to one subject.
    #[param(value_type = Option<String>)]
    pub user_id: Option<UserId>,
}

/// Body for `POST /api/measurements`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeasurementBody {
    #[serde(rename = "type")]
    #[schema(example = "corporate_wear")]
    pub measurement_type: String,
    #[serde(default)]
    pub sections: Option<Vec<MeasurementSection>>,
    /// Flat `{fieldId: value}` map bound onto the type's template.
    #[serde(default)]
    pub values: Option<BTreeMap<String, String>>,
    /// Org user being measured. Required for org admins.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub user_id: Option<UserId>,
}

/// Body for `PUT /api/measurements/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateMeasurementBody {
    #[serde(default)]
    pub sections: Option<Vec<MeasurementSection>>,
    #[serde(default)]
    pub values: Option<BTreeMap<String, String>>,
}

fn measurement_input(
    sections: Option<Vec<MeasurementSection>>,
    values: Option<BTreeMap<String, String>>,
) -> Result<MeasurementInput, Error> {
    match (sections, values) {
        (Some(sections), None) => Ok(MeasurementInput::Sections(sections)),
        (None, Some(values)) => Ok(MeasurementInput::Values(values)),
        (Some(_), Some(_)) => Err(measurement_shape_error(true)),
        (None, None) => Err(measurement_shape_error(false)),
    }
}

/// The measurement types with display labels.
#[utoipa::path(
    get,
    path = "/api/measurements/types",
    responses((status = 200, description = "Measurement types", body = [CategorySummary])),
    tags = ["measurements"],
    operation_id = "listMeasurementTypes",
    security([])
)]
#[get("/measurements/types")]
pub async fn list_measurement_types(
    state: web::Data<HttpState>,
) -> web::Json<Vec<CategorySummary>> {
    web::Json(state.measurements.types())
}

/// Form template for one measurement type.
#[utoipa::path(
    get,
    path = "/api/measurements/types/{type}/template",
    params(("type" = GarmentCategory, Path, description = "Measurement type")),
    responses(
        (status = 200, description = "Template with field ids", body = MeasurementTemplate),
        (status = 404, description = "Unknown measurement type", body = Error)
    ),
    tags = ["measurements"],
    operation_id = "getMeasurementTemplate",
    security([])
)]
#[get("/measurements/types/{type}/template")]
pub async fn get_measurement_template(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MeasurementTemplate>> {
    let raw = path.into_inner();
    let measurement_type = parse_category(Some(raw.as_str()), "type")
        .ok()
        .flatten()
        .ok_or_else(|| Error::not_found(format!("Unknown measurement type: {raw}")))?;
    Ok(web::Json(state.measurements.template(measurement_type)))
}

/// Measurements the caller may see.
#[utoipa::path(
    get,
    path = "/api/measurements",
    params(MeasurementQuery),
    responses(
        (status = 200, description = "Measurements", body = [Measurement]),
        (status = 401, description = "Missing token", body = Error),
        (status = 403, description = "Subject is outside the caller's reach", body = Error)
    ),
    tags = ["measurements"],
    operation_id = "listMeasurements"
)]
#[get("/measurements")]
pub async fn list_measurements(
    state: web::Data<HttpState>,
    caller: Authenticated,
    query: web::Query<MeasurementQuery>,
) -> ApiResult<web::Json<Vec<Measurement>>> {
    let subject = query.into_inner().user_id;
    let measurements = state
        .measurements
        .list(caller.principal(), subject)
        .await?;
    Ok(web::Json(measurements))
}

/// Record a measurement set.
#[utoipa::path(
    post,
    path = "/api/measurements",
    request_body = RecordMeasurementBody,
    responses(
        (status = 201, description = "Measurement saved", body = CreatedResponse),
        (status = 400, description = "Invalid input", body = Error),
        (status = 403, description = "Caller may not measure this subject", body = Error),
        (status = 404, description = "Unknown org user", body = Error)
    ),
    tags = ["measurements"],
    operation_id = "recordMeasurement"
)]
#[post("/measurements")]
pub async fn record_measurement(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<RecordMeasurementBody>,
) -> ApiResult<HttpResponse> {
    let RecordMeasurementBody {
        measurement_type,
        sections,
        values,
        user_id,
    } = payload.into_inner();
    let measurement_type = parse_category(Some(measurement_type.as_str()), "type")?
        .ok_or_else(|| Error::invalid_request("type is required"))?;
    let request = RecordMeasurementRequest {
        measurement_type,
        input: measurement_input(sections, values)?,
        subject: user_id,
    };
    let measurement = state
        .measurements
        .record(caller.principal(), request)
        .await?;
    Ok(HttpResponse::Created().json(CreatedResponse {
        message: "Measurements saved successfully".to_owned(),
        id: measurement.id.to_string(),
    }))
}

/// Every stored measurement.
#[utoipa::path(
    get,
    path = "/api/measurements/all",
    responses(
        (status = 200, description = "All measurements", body = [Measurement]),
        (status = 403, description = "Caller is not a super admin", body = Error)
    ),
    tags = ["measurements"],
    operation_id = "listAllMeasurements"
)]
#[get("/measurements/all")]
pub async fn list_all_measurements(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<Measurement>>> {
    let measurements = state.measurements.list_all(caller.principal()).await?;
    Ok(web::Json(measurements))
}

/// Replace a measurement's sections.
#[utoipa::path(
    put,
    path = "/api/measurements/{id}",
    params(("id" = String, Path, description = "Measurement id")),
    request_body = UpdateMeasurementBody,
    responses(
        (status = 200, description = "Updated measurement", body = Measurement),
        (status = 400, description = "Invalid input", body = Error),
        (status = 403, description = "Caller may not edit this measurement", body = Error),
        (status = 404, description = "Unknown measurement", body = Error)
    ),
    tags = ["measurements"],
    operation_id = "updateMeasurement"
)]
#[put("/measurements/{id}")]
pub async fn update_measurement(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<MeasurementId>,
    payload: web::Json<UpdateMeasurementBody>,
) -> ApiResult<web::Json<Measurement>> {
    let UpdateMeasurementBody { sections, values } = payload.into_inner();
    let input = measurement_input(sections, values)?;
    let measurement = state
        .measurements
        .update(caller.principal(), &path.into_inner(), input)
        .await?;
    Ok(web::Json(measurement))
}

/// Remove a measurement.
#[utoipa::path(
    delete,
    path = "/api/measurements/{id}",
    params(("id" = String, Path, description = "Measurement id")),
    responses(
        (status = 204, description = "Measurement removed"),
        (status = 403, description = "Caller may not delete this measurement", body = Error),
        (status = 404, description = "Unknown measurement", body = Error)
    ),
    tags = ["measurements"],
    operation_id = "deleteMeasurement"
)]
#[delete("/measurements/{id}")]
pub async fn delete_measurement(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<MeasurementId>,
) -> ApiResult<HttpResponse> {
    state
        .measurements
        .delete(caller.principal(), &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SubjectKind, field_id};
    use crate::inbound::http::test_utils::{
        MockPorts, bearer, individual_principal, org_admin_principal, super_admin_principal,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;
    use serde_json::{Value, json};

    fn stored(id: &str, user: &str) -> Measurement {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).single().expect("time");
        Measurement {
            id: MeasurementId::new(id).expect("id"),
            user_id: UserId::new(user).expect("id"),
            user_type: SubjectKind::OrgUser,
            measurement_type: GarmentCategory::CorporateWear,
            sections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    async fn send(ports: MockPorts, request: test::TestRequest) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new().app_data(ports.into_state()).service(
                web::scope("/api")
                    .service(list_measurement_types)
                    .service(get_measurement_template)
                    .service(list_all_measurements)
                    .service(list_measurements)
                    .service(record_measurement)
                    .service(update_measurement)
                    .service(delete_measurement),
            ),
        )
        .await;
        let response = test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = test::read_body(response).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[rstest]
    #[actix_web::test]
    async fn template_exposes_field_ids_without_a_token() {
        let mut ports = MockPorts::default();
        ports
            .measurements
            .expect_template()
            .withf(|t| *t == GarmentCategory::SchoolUniform)
            .returning(MeasurementTemplate::for_type);
        let (status, body) = send(
            ports,
            test::TestRequest::get().uri("/api/measurements/types/school_uniform/template"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "school_uniform");
        assert_eq!(
            body["sections"][0]["fields"][2]["id"],
            field_id("Upper Body", "Sleeve Length")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_template_type_is_not_found() {
        let mut ports = MockPorts::default();
        ports.measurements.expect_template().never();
        let (status, body) = send(
            ports,
            test::TestRequest::get().uri("/api/measurements/types/evening_wear/template"),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "not_found");
    }

    #[rstest]
    #[actix_web::test]
    async fn org_admin_records_flat_values_for_an_employee() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(org_admin_principal("org-001"));
        ports
            .measurements
            .expect_record()
            .withf(|_, req| {
                req.subject.as_ref().map(UserId::as_str) == Some("ou-001")
                    && matches!(&req.input, MeasurementInput::Values(v) if v.len() == 1)
            })
            .returning(|_, _| Ok(stored("meas-101", "ou-001")));
        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/api/measurements")
                .insert_header(bearer())
                .set_json(json!({
                    "type": "corporate_wear",
                    "userId": "ou-001",
                    "values": { "upper_body_chest": "40" }
                })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["message"], "Measurements saved successfully");
        assert_eq!(body["id"], "meas-101");
    }

    #[rstest]
    #[case(json!({"type": "casual_wear"}), "missing_field")]
    #[case(
        json!({"type": "casual_wear", "sections": [], "values": {}}),
        "ambiguous_input"
    )]
    #[case(json!({"type": "evening_wear", "values": {}}), "unknown_category")]
    #[actix_web::test]
    async fn malformed_bodies_are_rejected(#[case] payload: Value, #[case] code: &str) {
        let mut ports = MockPorts::default();
        ports.authenticate_as(individual_principal("ind-001"));
        ports.measurements.expect_record().never();
        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/api/measurements")
                .insert_header(bearer())
                .set_json(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["code"], code);
    }

    #[rstest]
    #[case(json!({"type": "", "values": {}}))]
    #[case(json!({"type": "  ", "values": {}}))]
    #[actix_web::test]
    async fn blank_type_is_required(#[case] payload: Value) {
        let mut ports = MockPorts::default();
        ports.authenticate_as(individual_principal("ind-001"));
        ports.measurements.expect_record().never();
        let (status, body) = send(
            ports,
            test::TestRequest::post()
                .uri("/api/measurements")
                .insert_header(bearer())
                .set_json(payload),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "type is required");
    }

    #[rstest]
    #[actix_web::test]
    async fn listing_forwards_the_subject_filter() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(super_admin_principal());
        ports
            .measurements
            .expect_list()
            .withf(|_, subject| subject.as_ref().map(UserId::as_str) == Some("ou-002"))
            .returning(|_, _| Ok(vec![stored("meas-002", "ou-002")]));
        let (status, body) = send(
            ports,
            test::TestRequest::get()
                .uri("/api/measurements?userId=ou-002")
                .insert_header(bearer()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["userId"], "ou-002");
    }

    #[rstest]
    #[actix_web::test]
    async fn all_route_is_not_treated_as_an_id() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(super_admin_principal());
        ports
            .measurements
            .expect_list_all()
            .returning(|_| Ok(vec![stored("meas-001", "ou-001"), stored("meas-002", "ind-001")]));
        let (status, body) = send(
            ports,
            test::TestRequest::get()
                .uri("/api/measurements/all")
                .insert_header(bearer()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    #[rstest]
    #[actix_web::test]
    async fn deleting_returns_no_content() {
        let mut ports = MockPorts::default();
        ports.authenticate_as(individual_principal("ind-001"));
        ports
            .measurements
            .expect_delete()
            .times(1)
            .returning(|_, _| Ok(()));
        let (status, _) = send(
            ports,
            test::TestRequest::delete()
                .uri("/api/measurements/meas-002")
                .insert_header(bearer()),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
