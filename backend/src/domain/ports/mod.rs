//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenCodec`]) are
//! implemented by outbound adapters. Driving ports (`*Service`,
//! [`UsersQuery`]) are implemented by the domain services and called by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod accounts_service;
mod auth_service;
mod measurement_repository;
mod measurements_service;
mod order_repository;
mod orders_service;
mod org_user_repository;
mod organization_repository;
mod organizations_service;
mod password_hasher;
mod product_repository;
mod products_service;
mod token_codec;
mod users_query;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use accounts_service::MockAccountsService;
pub use accounts_service::{AccountsService, AdminUpdate, NewAdminRequest};
#[cfg(test)]
pub use auth_service::MockAuthService;
pub use auth_service::{AuthService, SignupRequest};
#[cfg(test)]
pub use measurement_repository::MockMeasurementRepository;
pub use measurement_repository::{MeasurementRepository, MeasurementRepositoryError};
#[cfg(test)]
pub use measurements_service::MockMeasurementsService;
pub use measurements_service::{MeasurementInput, MeasurementsService, RecordMeasurementRequest};
#[cfg(test)]
pub use order_repository::MockOrderRepository;
pub use order_repository::{OrderRepository, OrderRepositoryError};
#[cfg(test)]
pub use orders_service::MockOrdersService;
pub use orders_service::{OrdersService, PlaceOrderRequest};
#[cfg(test)]
pub use org_user_repository::MockOrgUserRepository;
pub use org_user_repository::{OrgUserRepository, OrgUserRepositoryError};
#[cfg(test)]
pub use organization_repository::MockOrganizationRepository;
pub use organization_repository::{OrganizationRepository, OrganizationRepositoryError};
#[cfg(test)]
pub use organizations_service::MockOrganizationsService;
pub use organizations_service::{
    CreateOrganizationRequest, OrganizationCreated, OrganizationsService,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHash, PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use product_repository::MockProductRepository;
pub use product_repository::{ProductRepository, ProductRepositoryError};
#[cfg(test)]
pub use products_service::MockProductsService;
pub use products_service::ProductsService;
#[cfg(test)]
pub use token_codec::MockTokenCodec;
pub use token_codec::{TokenCodec, TokenCodecError};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{UserDirectory, UsersQuery};
