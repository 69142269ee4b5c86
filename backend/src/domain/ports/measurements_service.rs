//! Driving port for recording body measurements.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::domain::{
    CategorySummary, Error, Measurement, MeasurementId, MeasurementSection, MeasurementTemplate,
    MeasurementType, Principal, UserId,
};

/// Measurement values as submitted by a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeasurementInput {
    /// Fully structured sections.
    Sections(Vec<MeasurementSection>),
    /// Flat `{fieldId: value}` map bound onto the type's template.
    Values(BTreeMap<String, String>),
}

/// Request to record a new measurement set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeasurementRequest {
    pub measurement_type: MeasurementType,
    pub input: MeasurementInput,
    /// Org user measured by an org admin. Individuals measure themselves.
    pub subject: Option<UserId>,
}

/// Domain use-case port for measurements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeasurementsService: Send + Sync {
    /// The measurement types with labels.
    fn types(&self) -> Vec<CategorySummary>;

    /// Form template for a measurement type.
    fn template(&self, measurement_type: MeasurementType) -> MeasurementTemplate;

    /// Measurements the caller may see, optionally for one subject.
    async fn list(
        &self,
        principal: &Principal,
        subject: Option<UserId>,
    ) -> Result<Vec<Measurement>, Error>;

    /// Record a measurement set.
    async fn record(
        &self,
        principal: &Principal,
        request: RecordMeasurementRequest,
    ) -> Result<Measurement, Error>;

    /// Every stored measurement. Restricted to super admins.
    async fn list_all(&self, principal: &Principal) -> Result<Vec<Measurement>, Error>;

    /// Replace a measurement's sections.
    async fn update(
        &self,
        principal: &Principal,
        id: &MeasurementId,
        input: MeasurementInput,
    ) -> Result<Measurement, Error>;

    /// Remove a measurement.
    async fn delete(&self, principal: &Principal, id: &MeasurementId) -> Result<(), Error>;
}
