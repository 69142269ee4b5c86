//! Shared HTTP adapter state.
//!
//! Handlers receive this bundle through `actix_web::web::Data` so they only
//! depend on driving ports and stay testable with mocks.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsService, AuthService, MeasurementsService, OrdersService, OrganizationsService,
    ProductsService, UsersQuery,
};

/// Dependency bundle for HTTP handlers, one driving port per resource.
#[derive(Clone)]
pub struct HttpState {
    /// Login, signup and token verification.
    pub auth: Arc<dyn AuthService>,
    /// The super admin user directory.
    pub users: Arc<dyn UsersQuery>,
    /// Super admin, org admin and individual account management.
    pub accounts: Arc<dyn AccountsService>,
    /// Organisations and their members.
    pub organizations: Arc<dyn OrganizationsService>,
    /// Product catalogue.
    pub products: Arc<dyn ProductsService>,
    /// Order placement and tracking.
    pub orders: Arc<dyn OrdersService>,
    /// Measurement records and templates.
    pub measurements: Arc<dyn MeasurementsService>,
}
