//! Mapping of domain validation failures onto `invalid_request` errors.
//!
//! Every mapped error carries `details: {field, code}` so clients can attach
//! the message to the offending form field.

use serde_json::json;

use crate::domain::{
    AccountValidationError, AuthValidationError, Error, GarmentCategory, OrderValidationError,
    ProductValidationError, UnknownCategory,
};

/// Validation error codes reported in `details.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    Empty,
    InvalidEmail,
    OutOfRange,
    MustBePositive,
    ZeroQuantity,
    TotalOverflow,
    UnknownCategory,
    EmptyPatch,
    MissingField,
    AmbiguousInput,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::InvalidEmail => "invalid_email",
            Self::OutOfRange => "out_of_range",
            Self::MustBePositive => "must_be_positive",
            Self::ZeroQuantity => "zero_quantity",
            Self::TotalOverflow => "total_overflow",
            Self::UnknownCategory => "unknown_category",
            Self::EmptyPatch => "empty_patch",
            Self::MissingField => "missing_field",
            Self::AmbiguousInput => "ambiguous_input",
        }
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn account_error(err: AccountValidationError) -> Error {
    let code = match err {
        AccountValidationError::EmptyField { .. } => ErrorCode::Empty,
        AccountValidationError::InvalidEmail => ErrorCode::InvalidEmail,
        AccountValidationError::AgeOutOfRange { .. } => ErrorCode::OutOfRange,
    };
    ValidationError::new(err.field(), err.to_string()).with_code(code)
}

pub(crate) fn auth_error(err: AuthValidationError) -> Error {
    auth_error_for(err.field(), &err)
}

/// Report an authentication failure against an explicitly named field.
pub(crate) fn auth_error_for(field: &'static str, err: &AuthValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field,
        "code": err.code(),
    }))
}

pub(crate) fn product_error(err: ProductValidationError) -> Error {
    let code = match err {
        ProductValidationError::EmptyField { .. } => ErrorCode::Empty,
        ProductValidationError::ZeroPrice => ErrorCode::MustBePositive,
    };
    ValidationError::new(err.field(), err.to_string()).with_code(code)
}

pub(crate) fn order_error(err: OrderValidationError) -> Error {
    let message = err.to_string();
    match err {
        OrderValidationError::EmptyOrder => {
            ValidationError::new("products", message).with_code(ErrorCode::Empty)
        }
        OrderValidationError::ZeroQuantity { index } => {
            ValidationError::new("quantity", message).with_index(ErrorCode::ZeroQuantity, index)
        }
        OrderValidationError::EmptyProductName { index } => {
            ValidationError::new("productName", message).with_index(ErrorCode::Empty, index)
        }
        OrderValidationError::TotalOverflow => {
            ValidationError::new("products", message).with_code(ErrorCode::TotalOverflow)
        }
    }
}

pub(crate) fn empty_patch_error() -> Error {
    ValidationError::new("body", "at least one field must be supplied")
        .with_code(ErrorCode::EmptyPatch)
}

/// Measurement bodies carry exactly one of `sections` or `values`.
pub(crate) fn measurement_shape_error(supplied_both: bool) -> Error {
    if supplied_both {
        ValidationError::new("body", "supply either sections or values, not both")
            .with_code(ErrorCode::AmbiguousInput)
    } else {
        ValidationError::new("sections", "sections or values are required")
            .with_code(ErrorCode::MissingField)
    }
}

/// Parse an optional category string from a query or body.
///
/// A blank value counts as absent.
pub(crate) fn parse_category(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<GarmentCategory>, Error> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            value.parse().map_err(|err: UnknownCategory| {
                ValidationError::new(field, err.to_string()).with_code(ErrorCode::UnknownCategory)
            })
        })
        .transpose()
}
