//! Form Handling
//!
//! Raw field values read from the DOM, pre-submit validation, and the shared
//! create/edit mode switch used by single-form list pages.

use std::collections::HashMap;

use crate::common::dates::parse_date;
use crate::http::Method;

/// Local pre-submit failure. Carries the message shown to the user; no request
/// is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Field name to raw string value, as read from the form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormValues {
    fields: HashMap<String, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.fields.insert(name.to_string(), value.to_string());
    }

    /// Trimmed value, empty when absent
    pub fn get(&self, name: &str) -> &str {
        self.fields.get(name).map(|v| v.trim()).unwrap_or("")
    }

    /// `None` for empty or missing fields
    pub fn optional(&self, name: &str) -> Option<String> {
        Some(self.get(name)).filter(|v| !v.is_empty()).map(str::to_string)
    }

    pub fn required(&self, name: &str, message: &str) -> Result<&str, ValidationError> {
        let value = self.get(name);
        if value.is_empty() {
            Err(ValidationError::new(message))
        } else {
            Ok(value)
        }
    }

    /// Required and a finite number
    pub fn number(&self, name: &str, message: &str) -> Result<f64, ValidationError> {
        self.required(name, message)?
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ValidationError::new(message))
    }

    /// Required and a non-negative whole number
    pub fn integer(&self, name: &str, message: &str) -> Result<u32, ValidationError> {
        self.required(name, message)?
            .parse::<u32>()
            .map_err(|_| ValidationError::new(message))
    }

    /// Empty is `None`; anything else must be a `YYYY-MM-DD` date
    pub fn optional_date(&self, name: &str, message: &str) -> Result<Option<String>, ValidationError> {
        match self.optional(name) {
            None => Ok(None),
            Some(text) if text.len() == 10 && parse_date(&text).is_some() => Ok(Some(text)),
            Some(_) => Err(ValidationError::new(message)),
        }
    }

    /// Required, numeric and strictly greater than zero
    pub fn positive(&self, name: &str, message: &str) -> Result<f64, ValidationError> {
        let value = self.number(name, message)?;
        if value > 0.0 {
            Ok(value)
        } else {
            Err(ValidationError::new(message))
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Whether the shared form creates a new record or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Create,
    Edit(u64),
}

impl EditMode {
    /// Verb and path for the submit: POST to the collection or PUT to the item
    pub fn target(&self, collection: &str) -> (Method, String) {
        match self {
            EditMode::Create => (Method::Post, collection.to_string()),
            EditMode::Edit(id) => (Method::Put, format!("{}{}/", collection, id)),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditMode::Edit(_))
    }

    pub fn editing_id(&self) -> Option<u64> {
        match self {
            EditMode::Edit(id) => Some(*id),
            EditMode::Create => None,
        }
    }

    /// Pick the create or edit variant of a label
    pub fn pick<'a>(&self, create: &'a str, edit: &'a str) -> &'a str {
        if self.is_editing() {
            edit
        } else {
            create
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_and_numeric() {
        let form = FormValues::new()
            .with("sport_type", " 跑步 ")
            .with("duration_minutes", "30")
            .with("calories_burned", "abc");

        assert_eq!(form.required("sport_type", "请填写所有字段！").unwrap(), "跑步");
        assert_eq!(form.integer("duration_minutes", "请填写所有字段！").unwrap(), 30);
        assert_eq!(
            form.number("calories_burned", "请填写所有字段！").unwrap_err(),
            ValidationError::new("请填写所有字段！")
        );
        assert!(form.required("missing", "x").is_err());
    }

    #[test]
    fn test_positive_rejects_zero_and_nan() {
        let form = FormValues::new().with("a", "0").with("b", "NaN").with("c", "12.5");
        assert!(form.positive("a", "请输入有效的份量！").is_err());
        assert!(form.positive("b", "请输入有效的份量！").is_err());
        assert_eq!(form.positive("c", "请输入有效的份量！").unwrap(), 12.5);
    }

    #[test]
    fn test_optional() {
        let form: FormValues = vec![("date_of_birth", ""), ("email", "a@b.c")].into_iter().collect();
        assert_eq!(form.optional("date_of_birth"), None);
        assert_eq!(form.optional("email").as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_optional_date() {
        let form = FormValues::new()
            .with("blank", "")
            .with("good", "2003-09-01")
            .with("bad", "2003-13-01");
        assert_eq!(form.optional_date("blank", "日期格式无效").unwrap(), None);
        assert_eq!(form.optional_date("good", "日期格式无效").unwrap().as_deref(), Some("2003-09-01"));
        assert!(form.optional_date("bad", "日期格式无效").is_err());
    }

    #[test]
    fn test_edit_mode_target() {
        assert_eq!(EditMode::Create.target("/api/sports/"), (Method::Post, "/api/sports/".to_string()));
        assert_eq!(EditMode::Edit(4).target("/api/sports/"), (Method::Put, "/api/sports/4/".to_string()));
        assert_eq!(EditMode::Edit(4).pick("添加记录", "更新记录"), "更新记录");
        assert_eq!(EditMode::default(), EditMode::Create);
    }
}
