//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure becomes an `invalid_request` error whose details
//! name the offending field and a stable snake-case code, so clients can
//! highlight the right form input.

use std::str::FromStr;

use serde_json::json;

use crate::domain::{
    CatalogueValidationError, CredentialValidationError, Error, OfferValidationError,
    UserValidationError,
};

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: FieldName, code: &str, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code,
    }))
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let name = field.as_str();
    Error::invalid_request(format!("{name} must be a valid UUID")).with_details(json!({
        "field": name,
        "value": value,
        "code": "invalid_uuid",
    }))
}

/// Parse a UUID-backed identifier from a request body field.
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = uuid::Error>,
{
    value
        .trim()
        .parse()
        .map_err(|_| invalid_uuid_error(field, value))
}

/// Parse a UUID-backed identifier from a path segment.
///
/// A malformed id cannot name an existing resource, so it reads as missing.
pub(crate) fn parse_path_id<T>(value: &str, what: &str) -> Result<T, Error>
where
    T: FromStr<Err = uuid::Error>,
{
    value
        .parse()
        .map_err(|_| Error::not_found(format!("{what} not found")))
}

fn user_error_code(err: &UserValidationError) -> &'static str {
    match err {
        UserValidationError::EmptyUsername => "empty_username",
        UserValidationError::UsernameTooLong { .. } => "username_too_long",
        UserValidationError::UsernameInvalidCharacters => "invalid_username",
        UserValidationError::EmptyEmail => "empty_email",
        UserValidationError::EmailTooLong { .. } => "email_too_long",
        UserValidationError::InvalidEmail => "invalid_email",
    }
}

pub(crate) fn map_user_validation_error(field: FieldName, err: UserValidationError) -> Error {
    field_error(field, user_error_code(&err), err.to_string())
}

pub(crate) fn map_credential_error(err: CredentialValidationError) -> Error {
    let code = match &err {
        CredentialValidationError::EmptyUsername => "empty_username",
        CredentialValidationError::EmptyPassword => "empty_password",
        CredentialValidationError::PasswordTooShort { .. } => "password_too_short",
        CredentialValidationError::PasswordEntirelyNumeric => "password_entirely_numeric",
        CredentialValidationError::ConfirmationMismatch => "password_mismatch",
        CredentialValidationError::User(inner) => user_error_code(inner),
    };
    field_error(FieldName::new(err.field()), code, err.to_string())
}

pub(crate) fn map_catalogue_error(err: CatalogueValidationError) -> Error {
    let (field, code) = match err {
        CatalogueValidationError::EmptyGameName => ("name", "empty_name"),
        CatalogueValidationError::GameNameTooLong { .. } => ("name", "name_too_long"),
        CatalogueValidationError::EmptyTitle => ("title", "empty_title"),
        CatalogueValidationError::TitleTooLong { .. } => ("title", "title_too_long"),
        CatalogueValidationError::EmptyContent => ("content", "empty_content"),
    };
    field_error(FieldName::new(field), code, err.to_string())
}

pub(crate) fn map_offer_error(err: OfferValidationError) -> Error {
    let (field, code) = match err {
        OfferValidationError::MalformedPrice => ("price", "malformed_price"),
        OfferValidationError::NegativePrice => ("price", "negative_price"),
        OfferValidationError::PriceTooPrecise => ("price", "price_too_precise"),
        OfferValidationError::PriceTooLarge => ("price", "price_too_large"),
        OfferValidationError::PriceRequired { .. } => ("price", "price_required"),
        OfferValidationError::UnknownOfferType => ("offerType", "unknown_offer_type"),
        OfferValidationError::EmptyDescription => ("description", "empty_description"),
        OfferValidationError::DescriptionTooLong { .. } => {
            ("description", "description_too_long")
        }
    };
    field_error(FieldName::new(field), code, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, GameId, OfferType};
    use rstest::rstest;
    use serde_json::Value;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error
            .details()
            .and_then(|d| d.get(key))
            .and_then(Value::as_str)
    }

    #[test]
    fn malformed_body_id_is_invalid_request() {
        let err = parse_id::<GameId>("nope", FieldName::new("gameId")).expect_err("bad id");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some("gameId"));
        assert_eq!(detail(&err, "code"), Some("invalid_uuid"));
    }

    #[test]
    fn malformed_path_id_reads_as_missing() {
        let err = parse_path_id::<GameId>("nope", "game").expect_err("bad id");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(
        CredentialValidationError::ConfirmationMismatch,
        "passwordConfirmation",
        "password_mismatch"
    )]
    #[case(
        CredentialValidationError::PasswordEntirelyNumeric,
        "password",
        "password_entirely_numeric"
    )]
    #[case(
        CredentialValidationError::User(UserValidationError::InvalidEmail),
        "email",
        "invalid_email"
    )]
    fn credential_errors_name_field(
        #[case] err: CredentialValidationError,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let mapped = map_credential_error(err);
        assert_eq!(detail(&mapped, "field"), Some(field));
        assert_eq!(detail(&mapped, "code"), Some(code));
    }

    #[test]
    fn missing_price_is_reported_on_price_field() {
        let mapped = map_offer_error(OfferValidationError::PriceRequired {
            offer_type: OfferType::Sell,
        });
        assert_eq!(mapped.message(), "Sell listings require a price");
        assert_eq!(detail(&mapped, "field"), Some("price"));
    }
}
