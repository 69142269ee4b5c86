//! Measurement recording with subject resolution and template binding.
//!
//! Individuals measure themselves. Org admins measure the employees of their
//! own organisation and must name the employee. Super admins may read and
//! edit every record but do not record new ones.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use super::port_errors::{measurement_error, org_user_error};
use super::ports::{
    MeasurementInput, MeasurementRepository, MeasurementsService, OrgUserRepository,
    RecordMeasurementRequest,
};
use super::{
    CategorySummary, Error, GarmentCategory, Measurement, MeasurementId, MeasurementSections,
    MeasurementSubject, MeasurementTemplate, MeasurementType, MeasurementValidationError,
    OrgUser, Principal, Role, SubjectKind, UserId,
};

/// Measurement service implementing [`MeasurementsService`].
#[derive(Clone)]
pub struct MeasuringService<M, U> {
    measurements: Arc<M>,
    org_users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<M, U> MeasuringService<M, U> {
    /// Create a new service with the given repositories.
    pub fn new(measurements: Arc<M>, org_users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            measurements,
            org_users,
            clock,
        }
    }
}

fn validation_error(error: &MeasurementValidationError, field: &'static str) -> Error {
    let code = match error {
        MeasurementValidationError::NoSections => "empty",
        MeasurementValidationError::EmptySectionTitle { .. }
        | MeasurementValidationError::EmptyFieldName { .. } => "missing_field",
        MeasurementValidationError::DuplicateFieldId { .. } => "duplicate_field_id",
        MeasurementValidationError::UnknownFieldId { .. } => "unknown_field_id",
    };
    Error::invalid_request(error.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

fn bind_input(
    measurement_type: MeasurementType,
    input: MeasurementInput,
) -> Result<MeasurementSections, Error> {
    match input {
        MeasurementInput::Sections(sections) => MeasurementSections::try_new(sections)
            .map_err(|err| validation_error(&err, "sections")),
        MeasurementInput::Values(values) => MeasurementTemplate::for_type(measurement_type)
            .bind(&values)
            .map_err(|err| validation_error(&err, "values")),
    }
}

impl<M, U> MeasuringService<M, U>
where
    M: MeasurementRepository,
    U: OrgUserRepository,
{
    async fn require_org_user(&self, id: &UserId) -> Result<OrgUser, Error> {
        self.org_users
            .find(id)
            .await
            .map_err(org_user_error)?
            .ok_or_else(|| Error::not_found("Org user not found"))
    }

    async fn require_measurement(&self, id: &MeasurementId) -> Result<Measurement, Error> {
        self.measurements
            .find(id)
            .await
            .map_err(measurement_error)?
            .ok_or_else(|| Error::not_found("Measurement not found"))
    }

    /// Resolve who a new measurement describes.
    async fn resolve_subject(
        &self,
        principal: &Principal,
        requested: Option<UserId>,
    ) -> Result<MeasurementSubject, Error> {
        match principal.role() {
            Role::Individual => match requested {
                Some(other) if &other != principal.user_id() => Err(Error::forbidden(
                    "Individuals can only record their own measurements",
                )),
                _ => Ok(MeasurementSubject {
                    user_id: principal.user_id().clone(),
                    kind: SubjectKind::Individual,
                }),
            },
            Role::OrgAdmin => {
                let user_id = requested.ok_or_else(|| {
                    Error::invalid_request("userId is required for organization admins")
                        .with_details(json!({ "field": "userId", "code": "missing_field" }))
                })?;
                let employee = self.require_org_user(&user_id).await?;
                principal.require_org_admin_of(&employee.org_id)?;
                Ok(MeasurementSubject {
                    user_id,
                    kind: SubjectKind::OrgUser,
                })
            }
            Role::SuperAdmin | Role::OrgUser => Err(Error::forbidden(
                "Only individuals and organization admins can record measurements",
            )),
        }
    }

    /// Check that the caller may edit or delete `measurement`.
    async fn authorize_edit(
        &self,
        principal: &Principal,
        measurement: &Measurement,
    ) -> Result<(), Error> {
        let allowed = match principal.role() {
            Role::SuperAdmin => true,
            Role::Individual => {
                measurement.user_type == SubjectKind::Individual
                    && &measurement.user_id == principal.user_id()
            }
            Role::OrgAdmin if measurement.user_type == SubjectKind::OrgUser => {
                let employee = self.require_org_user(&measurement.user_id).await?;
                principal.administers(&employee.org_id)
            }
            Role::OrgAdmin | Role::OrgUser => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(Error::forbidden("Access denied for this measurement"))
        }
    }

    async fn list_for_kind(
        &self,
        user_id: &UserId,
        kind: SubjectKind,
    ) -> Result<Vec<Measurement>, Error> {
        let mut measurements = self
            .measurements
            .list_for_subject(user_id)
            .await
            .map_err(measurement_error)?;
        measurements.retain(|m| m.user_type == kind);
        Ok(measurements)
    }

    async fn list_for_org_admin(
        &self,
        principal: &Principal,
        subject: Option<UserId>,
    ) -> Result<Vec<Measurement>, Error> {
        if let Some(user_id) = subject {
            let employee = self.require_org_user(&user_id).await?;
            principal.require_org_admin_of(&employee.org_id)?;
            return self.list_for_kind(&user_id, SubjectKind::OrgUser).await;
        }
        let org_id = principal
            .org_id()
            .ok_or_else(|| Error::forbidden("Organization admin has no organization"))?;
        let members: HashSet<UserId> = self
            .org_users
            .list_for_org(org_id)
            .await
            .map_err(org_user_error)?
            .into_iter()
            .map(|user| user.id)
            .collect();
        let mut measurements = self.measurements.list().await.map_err(measurement_error)?;
        measurements
            .retain(|m| m.user_type == SubjectKind::OrgUser && members.contains(&m.user_id));
        Ok(measurements)
    }
}

#[async_trait]
impl<M, U> MeasurementsService for MeasuringService<M, U>
where
    M: MeasurementRepository,
    U: OrgUserRepository,
{
    fn types(&self) -> Vec<CategorySummary> {
        GarmentCategory::ALL.into_iter().map(CategorySummary::from).collect()
    }

    fn template(&self, measurement_type: MeasurementType) -> MeasurementTemplate {
        MeasurementTemplate::for_type(measurement_type)
    }

    async fn list(
        &self,
        principal: &Principal,
        subject: Option<UserId>,
    ) -> Result<Vec<Measurement>, Error> {
        match principal.role() {
            Role::SuperAdmin => match subject {
                Some(user_id) => self
                    .measurements
                    .list_for_subject(&user_id)
                    .await
                    .map_err(measurement_error),
                None => self.measurements.list().await.map_err(measurement_error),
            },
            Role::Individual => match subject {
                Some(other) if &other != principal.user_id() => Err(Error::forbidden(
                    "Individuals can only view their own measurements",
                )),
                _ => {
                    self.list_for_kind(principal.user_id(), SubjectKind::Individual)
                        .await
                }
            },
            Role::OrgAdmin => self.list_for_org_admin(principal, subject).await,
            Role::OrgUser => Err(Error::forbidden("Access denied")),
        }
    }

    async fn record(
        &self,
        principal: &Principal,
        request: RecordMeasurementRequest,
    ) -> Result<Measurement, Error> {
        let RecordMeasurementRequest {
            measurement_type,
            input,
            subject,
        } = request;
        let subject = self.resolve_subject(principal, subject).await?;
        let sections = bind_input(measurement_type, input)?;
        let measurement = Measurement::new(
            MeasurementId::generate(),
            subject,
            measurement_type,
            sections,
            self.clock.utc(),
        );
        self.measurements
            .insert(&measurement)
            .await
            .map_err(measurement_error)?;
        info!(
            measurement_id = %measurement.id,
            subject = %measurement.user_id,
            measurement_type = %measurement.measurement_type,
            "measurement recorded"
        );
        Ok(measurement)
    }

    async fn list_all(&self, principal: &Principal) -> Result<Vec<Measurement>, Error> {
        principal.require_super_admin()?;
        self.measurements.list().await.map_err(measurement_error)
    }

    async fn update(
        &self,
        principal: &Principal,
        id: &MeasurementId,
        input: MeasurementInput,
    ) -> Result<Measurement, Error> {
        let mut measurement = self.require_measurement(id).await?;
        self.authorize_edit(principal, &measurement).await?;
        let sections = bind_input(measurement.measurement_type, input)?;
        measurement.replace_sections(sections, self.clock.utc());
        if !self
            .measurements
            .update(&measurement)
            .await
            .map_err(measurement_error)?
        {
            return Err(Error::not_found("Measurement not found"));
        }
        info!(measurement_id = %id, "measurement updated");
        Ok(measurement)
    }

    async fn delete(&self, principal: &Principal, id: &MeasurementId) -> Result<(), Error> {
        let measurement = self.require_measurement(id).await?;
        self.authorize_edit(principal, &measurement).await?;
        if !self
            .measurements
            .delete(id)
            .await
            .map_err(measurement_error)?
        {
            return Err(Error::not_found("Measurement not found"));
        }
        info!(measurement_id = %id, "measurement deleted");
        Ok(())
    }
}
