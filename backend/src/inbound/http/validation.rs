//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure becomes `invalid_request` with `details: {field, code}` so
//! clients can attach messages to form fields.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use pagination::{PageRequest, PageRequestError};
use serde_json::{Number, json};

use crate::domain::{
    Error, InvalidId, ListingValidationError, LoginValidationError, Money, MoneyError,
    UnknownVariant, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidNumber,
    InvalidValue,
    InvalidPage,
}

impl ValidationCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidDate => "invalid_date",
            Self::InvalidNumber => "invalid_number",
            Self::InvalidValue => "invalid_value",
            Self::InvalidPage => "invalid_pagination",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) const fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(field: &str, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {field}"),
    )
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Parse an identifier newtype such as [`crate::domain::ListingId`].
pub(crate) fn parse_id<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = InvalidId>,
{
    raw.parse().map_err(|_| {
        field_error(
            field.as_str(),
            ValidationCode::InvalidUuid,
            format!("{} must be a valid UUID", field.as_str()),
        )
    })
}

/// Parse an optional identifier, treating blank strings as absent.
pub(crate) fn parse_optional_id<T>(raw: Option<&str>, field: FieldName) -> Result<Option<T>, Error>
where
    T: FromStr<Err = InvalidId>,
{
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| parse_id(value, field))
        .transpose()
}

/// Parse a closed enum value such as a status.
pub(crate) fn parse_variant<T>(raw: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    raw.parse().map_err(|err: UnknownVariant| {
        field_error(field.as_str(), ValidationCode::InvalidValue, err.to_string())
    })
}

/// Parse an optional enum query value, treating blank strings as absent.
pub(crate) fn parse_optional_variant<T>(
    raw: Option<&str>,
    field: FieldName,
) -> Result<Option<T>, Error>
where
    T: FromStr<Err = UnknownVariant>,
{
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| parse_variant(value, field))
        .transpose()
}

/// Accept `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp.
pub(crate) fn parse_date(raw: &str, field: FieldName) -> Result<DateTime<Utc>, Error> {
    let value = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(chrono::NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|_| {
            field_error(
                field.as_str(),
                ValidationCode::InvalidDate,
                format!(
                    "{} must be a date (YYYY-MM-DD) or RFC 3339 timestamp",
                    field.as_str()
                ),
            )
        })
}

/// Convert a JSON number in major units into [`Money`].
pub(crate) fn parse_money(value: &Number, field: FieldName) -> Result<Money, Error> {
    Money::parse_decimal(&value.to_string()).map_err(|err| {
        let message = match err {
            MoneyError::TooPrecise => {
                format!("{} must have at most two decimal places", field.as_str())
            }
            MoneyError::NotANumber | MoneyError::OutOfRange => {
                format!("{} must be a valid amount", field.as_str())
            }
        };
        field_error(field.as_str(), ValidationCode::InvalidNumber, message)
    })
}

/// Accept a JSON integer that fits in `u32`; whole floats like `2.0` pass.
pub(crate) fn parse_whole_number(value: &Number, field: FieldName) -> Result<u32, Error> {
    let whole = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|float| float.fract() == 0.0 && *float >= 0.0 && *float <= f64::from(u32::MAX))
            .map(|float| {
                #[expect(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    reason = "range checked above"
                )]
                let cast = float as u64;
                cast
            })
    });
    whole
        .and_then(|number| u32::try_from(number).ok())
        .ok_or_else(|| {
            field_error(
                field.as_str(),
                ValidationCode::InvalidNumber,
                format!("{} must be a whole number", field.as_str()),
            )
        })
}

/// [`parse_whole_number`] that also refuses zero.
pub(crate) fn parse_positive_count(value: &Number, field: FieldName) -> Result<u32, Error> {
    match parse_whole_number(value, field)? {
        0 => Err(field_error(
            field.as_str(),
            ValidationCode::InvalidValue,
            format!("{} must be at least 1", field.as_str()),
        )),
        count => Ok(count),
    }
}

/// Parse `page` / `limit` query values.
pub(crate) fn parse_page(page: Option<&str>, limit: Option<&str>) -> Result<PageRequest, Error> {
    PageRequest::parse(page, limit).map_err(|err: PageRequestError| {
        field_error(err.field(), ValidationCode::InvalidPage, err.to_string())
    })
}

pub(crate) fn listing_field_error(err: &ListingValidationError) -> Error {
    field_error(err.field(), ValidationCode::InvalidValue, err.to_string())
}

pub(crate) fn user_field_error(err: &UserValidationError) -> Error {
    let field = match err {
        UserValidationError::InvalidEmail => "email",
        UserValidationError::NameTooShort { .. } | UserValidationError::NameTooLong { .. } => {
            "name"
        }
    };
    field_error(field, ValidationCode::InvalidValue, err.to_string())
}

pub(crate) fn login_field_error(err: &LoginValidationError) -> Error {
    field_error(err.field(), ValidationCode::InvalidValue, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BookingStatus, ListingId};
    use chrono::TimeZone;
    use rstest::rstest;

    const FIELD: FieldName = FieldName::new("checkIn");

    fn details(err: &Error) -> (String, String) {
        let details = err.details().expect("details present");
        (
            details["field"].as_str().expect("field").to_owned(),
            details["code"].as_str().expect("code").to_owned(),
        )
    }

    #[rstest]
    #[case("2025-03-01", Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())]
    #[case("2025-03-01T15:30:00Z", Utc.with_ymd_and_hms(2025, 3, 1, 15, 30, 0).unwrap())]
    #[case("2025-03-01T15:30:00+02:00", Utc.with_ymd_and_hms(2025, 3, 1, 13, 30, 0).unwrap())]
    fn dates_accept_plain_days_and_timestamps(#[case] raw: &str, #[case] expected: DateTime<Utc>) {
        assert_eq!(parse_date(raw, FIELD).expect("valid date"), expected);
    }

    #[rstest]
    #[case("01/03/2025")]
    #[case("2025-02-30")]
    #[case("")]
    fn bad_dates_name_the_field(#[case] raw: &str) {
        let err = parse_date(raw, FIELD).expect_err("invalid date");
        assert_eq!(details(&err), ("checkIn".to_owned(), "invalid_date".to_owned()));
    }

    #[rstest]
    #[case(json!(150), 15_000)]
    #[case(json!(99.5), 9_950)]
    #[case(json!(0.01), 1)]
    fn money_from_json_numbers(#[case] value: serde_json::Value, #[case] cents: i64) {
        let number = value.as_number().expect("number").clone();
        assert_eq!(
            parse_money(&number, FieldName::new("pricePerNight")).expect("amount"),
            Money::from_cents(cents)
        );
    }

    #[test]
    fn money_with_three_decimals_is_rejected() {
        let number = json!(10.125).as_number().expect("number").clone();
        let err = parse_money(&number, FieldName::new("pricePerNight")).expect_err("precision");
        assert_eq!(
            details(&err),
            ("pricePerNight".to_owned(), "invalid_number".to_owned())
        );
    }

    #[rstest]
    #[case(json!(3), Some(3))]
    #[case(json!(0), Some(0))]
    #[case(json!(2.0), Some(2))]
    #[case(json!(2.5), None)]
    #[case(json!(-1), None)]
    #[case(json!(5_000_000_000_u64), None)]
    fn whole_numbers(#[case] value: serde_json::Value, #[case] expected: Option<u32>) {
        let number = value.as_number().expect("number").clone();
        assert_eq!(
            parse_whole_number(&number, FieldName::new("bedrooms")).ok(),
            expected
        );
    }

    #[rstest]
    #[case(json!(1), Ok(1))]
    #[case(json!(0), Err("invalid_value"))]
    #[case(json!(0.0), Err("invalid_value"))]
    #[case(json!(-2), Err("invalid_number"))]
    fn positive_counts_refuse_zero(
        #[case] value: serde_json::Value,
        #[case] expected: Result<u32, &str>,
    ) {
        let number = value.as_number().expect("number").clone();
        let parsed = parse_positive_count(&number, FieldName::new("guestCount"));
        match expected {
            Ok(count) => assert_eq!(parsed.ok(), Some(count)),
            Err(code) => {
                let err = parsed.expect_err("rejected");
                assert_eq!(details(&err), ("guestCount".to_owned(), code.to_owned()));
            }
        }
    }

    #[test]
    fn ids_must_be_uuids() {
        let err = parse_id::<ListingId>("abc", FieldName::new("listingId")).expect_err("bad id");
        assert_eq!(
            details(&err),
            ("listingId".to_owned(), "invalid_uuid".to_owned())
        );
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("  "))]
    fn blank_optional_values_are_absent(#[case] raw: Option<&str>) {
        let id: Option<ListingId> =
            parse_optional_id(raw, FieldName::new("listingId")).expect("absent");
        assert!(id.is_none());
        let status: Option<BookingStatus> =
            parse_optional_variant(raw, FieldName::new("status")).expect("absent");
        assert!(status.is_none());
    }

    #[test]
    fn unknown_status_is_invalid_value() {
        let err = parse_variant::<BookingStatus>("DONE", FieldName::new("status"))
            .expect_err("unknown status");
        assert_eq!(details(&err), ("status".to_owned(), "invalid_value".to_owned()));
    }

    #[rstest]
    #[case(Some("0"), None, "page")]
    #[case(None, Some("101"), "limit")]
    #[case(Some("x"), None, "page")]
    fn pagination_errors_name_the_parameter(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] field: &str,
    ) {
        let err = parse_page(page, limit).expect_err("invalid pagination");
        assert_eq!(
            details(&err),
            (field.to_owned(), "invalid_pagination".to_owned())
        );
    }
}
