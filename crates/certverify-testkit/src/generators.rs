//! Proptest generators for property-based testing.

use proptest::prelude::*;

use certverify_core::{Certificate, IssueRequest};

/// A non-empty field value, including spaces and non-ASCII text.
pub fn field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9 .,'éü-]{1,40}"
}

/// A value that may be empty.
pub fn optional_field() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), field()]
}

/// A certificate with every required field present.
pub fn certificate() -> impl Strategy<Value = Certificate> {
    (field(), field(), field(), field(), optional_field()).prop_map(
        |(id, name, course, issue_date, expiry_date)| Certificate {
            id,
            name,
            course,
            issue_date,
            expiry_date,
        },
    )
}

/// An issue form where any field may be left empty.
pub fn issue_request() -> impl Strategy<Value = IssueRequest> {
    (
        optional_field(),
        optional_field(),
        optional_field(),
        optional_field(),
        optional_field(),
    )
        .prop_map(|(id, name, course, issue_date, expiry_date)| IssueRequest {
            id,
            name,
            course,
            issue_date,
            expiry_date,
        })
}
