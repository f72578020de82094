// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 dotBLOG CMS contributors

//! Field-scoped validation messages returned by the backend on a failed submit.

use serde::Deserialize;

/// One message, optionally tied to a form field.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    #[serde(default, alias = "path", alias = "param")]
    pub field: Option<String>,
    #[serde(alias = "msg")]
    pub message: String,
}

/// Unordered collection of [`FieldError`]s. Display order is arrival order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    items: Vec<FieldError>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorPayload {
    Wrapped { errors: Vec<FieldError> },
    List(Vec<FieldError>),
    Single(FieldError),
    Plain { error: String },
}

impl ValidationErrors {
    pub fn new(items: Vec<FieldError>) -> Self {
        let mut errors = Self { items: Vec::new() };
        for item in items {
            errors.push(item);
        }
        errors
    }

    /// A single message not tied to any field.
    pub fn general(message: impl Into<String>) -> Self {
        Self::new(vec![FieldError {
            field: None,
            message: message.into(),
        }])
    }

    /// A message tied to `field`.
    pub fn for_field(field: &str, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError {
            field: Some(field.to_string()),
            message: message.into(),
        }])
    }

    /// Interpret a failed response body; unknown shapes become a generic message.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorPayload>(body) {
            Ok(ErrorPayload::Wrapped { errors }) | Ok(ErrorPayload::List(errors))
                if !errors.is_empty() =>
            {
                Self::new(errors)
            }
            Ok(ErrorPayload::Single(error)) => Self::new(vec![error]),
            Ok(ErrorPayload::Plain { error }) => Self::general(error),
            _ => Self::general(format!("Request failed (status {status}).")),
        }
    }

    /// Append, skipping exact duplicates.
    pub fn push(&mut self, item: FieldError) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    pub fn merge(&mut self, other: ValidationErrors) {
        for item in other.items {
            self.push(item);
        }
    }

    pub fn items(&self) -> &[FieldError] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Messages that belong to `field`.
    pub fn for_name<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.items
            .iter()
            .filter(move |item| item.field.as_deref() == Some(field))
            .map(|item| item.message.as_str())
    }
}
