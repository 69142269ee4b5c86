//! Port abstraction for stored measurement sets.
use async_trait::async_trait;

use crate::domain::{Measurement, MeasurementId, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by measurement repository adapters.
    pub enum MeasurementRepositoryError {
        /// The backing store could not complete the operation.
        Query { message: String } => "measurement repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Every measurement in insertion order.
    async fn list(&self) -> Result<Vec<Measurement>, MeasurementRepositoryError>;

    /// Measurements describing one subject.
    async fn list_for_subject(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Measurement>, MeasurementRepositoryError>;

    /// Fetch a measurement by id.
    async fn find(
        &self,
        id: &MeasurementId,
    ) -> Result<Option<Measurement>, MeasurementRepositoryError>;

    /// Store a new measurement.
    async fn insert(&self, measurement: &Measurement) -> Result<(), MeasurementRepositoryError>;

    /// Overwrite an existing measurement. Returns `false` when absent.
    async fn update(&self, measurement: &Measurement) -> Result<bool, MeasurementRepositoryError>;

    /// Remove a measurement. Returns `false` when absent.
    async fn delete(&self, id: &MeasurementId) -> Result<bool, MeasurementRepositoryError>;
}
