//! Shared builders for domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use super::{
    Account, AdminDraft, Email, IndividualDraft, OrgUser, OrgUserDraft, OrgUserFields,
    OrganizationId, Principal, Role, UserId,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0)
        .single()
        .expect("fixture timestamp")
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn user_id(raw: &str) -> UserId {
    UserId::new(raw).expect("fixture user id")
}

pub(crate) fn org_id(raw: &str) -> OrganizationId {
    OrganizationId::new(raw).expect("fixture org id")
}

pub(crate) fn super_admin() -> Principal {
    Principal::new(
        user_id("sa-001"),
        Email::new("mk@admin.com").expect("email"),
        Role::SuperAdmin,
        None,
    )
}

pub(crate) fn org_admin(org: &str) -> Principal {
    Principal::new(
        user_id("oa-001"),
        Email::new("admin@abccorp.com").expect("email"),
        Role::OrgAdmin,
        Some(org_id(org)),
    )
}

pub(crate) fn individual(id: &str) -> Principal {
    Principal::new(
        user_id(id),
        Email::new(format!("{id}@example.com")).expect("email"),
        Role::Individual,
        None,
    )
}

pub(crate) fn individual_account(id: &str, email: &str) -> Account {
    let draft = IndividualDraft::try_from_parts("John Smith", email, "5551234567", "Road", None)
        .expect("fixture draft");
    Account::individual(user_id(id), draft, fixture_timestamp())
}

pub(crate) fn super_admin_account(id: &str) -> Account {
    let draft = AdminDraft::try_from_parts("Ops Admin", &format!("{id}@tailor.example"))
        .expect("fixture admin");
    Account::super_admin(user_id(id), draft, fixture_timestamp())
}

pub(crate) fn org_admin_account(id: &str, org: &str) -> Account {
    Account::org_admin(
        user_id(id),
        org_id(org),
        "ABC Admin".into(),
        Email::new(format!("{id}@abccorp.com")).expect("email"),
        fixture_timestamp(),
    )
}

pub(crate) fn org_user(id: &str, org: &str) -> OrgUser {
    let draft = OrgUserDraft::try_from_fields(OrgUserFields {
        name: "Jane Doe",
        email: "jane@abccorp.com",
        phone: "9876543211",
        address: "456 Park Ave",
        age: 28,
        department: "Finance",
    })
    .expect("fixture org user");
    OrgUser::new(
        user_id(id),
        org_id(org),
        draft,
        user_id("oa-001"),
        fixture_timestamp(),
    )
}
