//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::http::header::AUTHORIZATION;
use actix_web::web;

use crate::domain::ports::{
    MockAccountsService, MockAuthService, MockMeasurementsService, MockOrdersService,
    MockOrganizationsService, MockProductsService, MockUsersQuery,
};
use crate::domain::{Email, OrganizationId, Principal, Role, UserId};
use crate::inbound::http::state::HttpState;

/// Token value accepted by [`MockPorts::authenticate_as`].
pub const TEST_TOKEN: &str = "test-token";

/// Header pair carrying [`TEST_TOKEN`].
pub fn bearer() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {TEST_TOKEN}"))
}

/// One mock per driving port. Unused mocks reject every call.
#[derive(Default)]
pub struct MockPorts {
    pub auth: MockAuthService,
    pub users: MockUsersQuery,
    pub accounts: MockAccountsService,
    pub organizations: MockOrganizationsService,
    pub products: MockProductsService,
    pub orders: MockOrdersService,
    pub measurements: MockMeasurementsService,
}

impl MockPorts {
    /// Make [`TEST_TOKEN`] verify as `principal`.
    pub fn authenticate_as(&mut self, principal: Principal) -> &mut Self {
        self.auth
            .expect_verify_token()
            .withf(|token| token == TEST_TOKEN)
            .returning(move |_| Ok(principal.clone()));
        self
    }

    /// Wrap the mocks as handler state.
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            auth: Arc::new(self.auth),
            users: Arc::new(self.users),
            accounts: Arc::new(self.accounts),
            organizations: Arc::new(self.organizations),
            products: Arc::new(self.products),
            orders: Arc::new(self.orders),
            measurements: Arc::new(self.measurements),
        })
    }
}

fn principal(id: &str, email: &str, role: Role, org: Option<&str>) -> Principal {
    Principal::new(
        UserId::new(id).expect("fixture user id"),
        Email::new(email).expect("fixture email"),
        role,
        org.map(|o| OrganizationId::new(o).expect("fixture org id")),
    )
}

/// The seeded super admin.
pub fn super_admin_principal() -> Principal {
    principal("sa-001", "mk@admin.com", Role::SuperAdmin, None)
}

/// An org admin of `org`.
pub fn org_admin_principal(org: &str) -> Principal {
    principal("oa-001", "admin@abccorp.com", Role::OrgAdmin, Some(org))
}

/// An individual customer with id `id`.
pub fn individual_principal(id: &str) -> Principal {
    principal(id, "john@example.com", Role::Individual, None)
}
