//! Pagination query parsing helpers.

use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::*;

pub(crate) trait PageParamExt {
    /// Parse an optional integer query value, rejecting anything that is not one.
    fn into_page_value(self, name: &str) -> Result<Option<i64>, StatusError>;
}

impl PageParamExt for QueryParam<String, false> {
    fn into_page_value(self, name: &str) -> Result<Option<i64>, StatusError> {
        self.into_inner()
            .map(|value| value.trim().parse::<i64>())
            .transpose()
            .or_400(&format!("could not parse \"{name}\" query parameter"))
    }
}
