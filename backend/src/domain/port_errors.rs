//! Mapping from port failures onto the domain error envelope.
//!
//! Adapter detail stays in the message; the HTTP layer redacts internal
//! errors before they reach a client.

use super::Error;
use super::ports::{
    AccountRepositoryError, MeasurementRepositoryError, OrderRepositoryError,
    OrgUserRepositoryError, OrganizationRepositoryError, PasswordHasherError,
    ProductRepositoryError, TokenCodecError,
};

pub(crate) const USER_EXISTS: &str = "User already exists";

pub(crate) fn account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::DuplicateEmail { .. } => Error::invalid_request(USER_EXISTS),
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
    }
}

pub(crate) fn organization_error(error: OrganizationRepositoryError) -> Error {
    match error {
        OrganizationRepositoryError::Query { message } => {
            Error::internal(format!("organization repository error: {message}"))
        }
    }
}

pub(crate) fn org_user_error(error: OrgUserRepositoryError) -> Error {
    match error {
        OrgUserRepositoryError::Query { message } => {
            Error::internal(format!("org user repository error: {message}"))
        }
    }
}

pub(crate) fn product_error(error: ProductRepositoryError) -> Error {
    match error {
        ProductRepositoryError::Query { message } => {
            Error::internal(format!("product repository error: {message}"))
        }
    }
}

pub(crate) fn order_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
    }
}

pub(crate) fn measurement_error(error: MeasurementRepositoryError) -> Error {
    match error {
        MeasurementRepositoryError::Query { message } => {
            Error::internal(format!("measurement repository error: {message}"))
        }
    }
}

pub(crate) fn hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

pub(crate) fn token_error(error: TokenCodecError) -> Error {
    match error {
        TokenCodecError::Invalid { .. } | TokenCodecError::Expired => {
            Error::invalid_request("Invalid token")
        }
        TokenCodecError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn duplicate_email_is_a_client_error() {
        let err = account_error(AccountRepositoryError::duplicate_email("a@b.c"));
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.message(), USER_EXISTS);
    }

    #[rstest]
    #[case(TokenCodecError::invalid("bad signature"), ErrorCode::InvalidRequest)]
    #[case(TokenCodecError::expired(), ErrorCode::InvalidRequest)]
    #[case(TokenCodecError::signing("no key"), ErrorCode::InternalError)]
    fn token_failures_map_by_kind(#[case] error: TokenCodecError, #[case] expected: ErrorCode) {
        assert_eq!(token_error(error).code(), expected);
    }
}
