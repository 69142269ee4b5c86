//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: define the strongly typed records the tailoring backend stores,
//! the validation rules for creating them and the services that apply role
//! checks before touching a repository port. Nothing here knows about HTTP.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error envelope.
//! - Account, OrgUser, Organization, Product, Order, Measurement: records.
//! - Principal: the authenticated caller.
//! - *Service types: implementations of the driving ports in [`ports`].

pub mod account;
pub mod auth;
mod auth_service;
mod catalogue_service;
mod directory_service;
pub mod error;
pub mod ids;
pub mod measurement;
mod measuring_service;
pub mod order;
mod ordering_service;
pub mod organization;
mod port_errors;
pub mod ports;
pub mod principal;
pub mod product;
#[cfg(test)]
mod service_test_helpers;
pub mod trace_id;

pub use self::account::{
    AGE_MAX, AGE_MIN, Account, AccountPatch, AccountPatchFields, AccountValidationError,
    AdminDraft, Email, IndividualDraft, OrgUser, OrgUserDraft, OrgUserFields, OrgUserPatch,
    OrgUserPatchFields, Role,
};
pub use self::auth::{
    AccessToken, AuthValidationError, LoginCredentials, LoginOutcome, MIN_PASSWORD_LEN,
    NewPassword, PasswordChange,
};
pub use self::auth_service::AccountAuthService;
pub use self::catalogue_service::CatalogueService;
pub use self::directory_service::DirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::ids::{IdValidationError, MeasurementId, OrderId, OrganizationId, ProductId, UserId};
pub use self::measurement::{
    Measurement, MeasurementField, MeasurementSection, MeasurementSections, MeasurementSubject,
    MeasurementTemplate, MeasurementType, MeasurementValidationError, SectionOutline, SubjectKind,
    TemplateField, TemplateSection, field_id,
};
pub use self::measuring_service::MeasuringService;
pub use self::order::{
    Order, OrderDraft, OrderLine, OrderPlacement, OrderStatus, OrderValidationError, OrdererKind,
    order_total,
};
pub use self::ordering_service::OrderingService;
pub use self::organization::{Organization, OrganizationDraft, OrganizationFields};
pub use self::principal::Principal;
pub use self::product::{
    CategorySummary, GarmentCategory, Product, ProductCategory, ProductDraft, ProductPatch,
    ProductValidationError, UnknownCategory,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use tailor_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
