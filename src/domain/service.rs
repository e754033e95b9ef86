//! Catalog service entity and admin form.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::form::{double_option, max_chars, price, required, ListInput, NumberInput};
use crate::config::{MAX_LABEL_CHARS, MAX_TITLE_CHARS};
use crate::errors::{AppError, AppResult};

/// A bookable service offered by the business
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Service {
    pub id: i64,
    #[schema(example = "Dog Care")]
    pub category: String,
    #[schema(example = "Dog Walking")]
    pub title: String,
    pub description: String,
    #[schema(example = 30)]
    pub duration_mins: i32,
    #[schema(value_type = String, example = "25.00")]
    pub starting_price: Decimal,
    /// What the service includes, in display order
    pub includes: Vec<String>,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values inserted for a new service.
#[derive(Debug, Clone, PartialEq)]
pub struct NewService {
    pub category: String,
    pub title: String,
    pub description: String,
    pub duration_mins: i32,
    pub starting_price: Decimal,
    pub includes: Vec<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

/// Partial update; only present fields are written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServicePatch {
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_mins: Option<i32>,
    pub starting_price: Option<Decimal>,
    pub includes: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Admin service form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ServiceForm {
    pub category: String,
    pub title: String,
    pub description: String,
    /// Number or numeric text
    #[schema(value_type = Option<i64>)]
    pub duration_mins: Option<NumberInput>,
    /// Number or numeric text
    #[schema(value_type = Option<String>)]
    pub starting_price: Option<NumberInput>,
    /// JSON array or newline-separated text
    pub includes: Option<ListInput>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Admin service patch form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct ServicePatchForm {
    pub category: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub duration_mins: Option<NumberInput>,
    #[schema(value_type = Option<String>)]
    pub starting_price: Option<NumberInput>,
    /// `null` clears the list
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<Vec<String>>)]
    pub includes: Option<Option<ListInput>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

fn check_duration(value: Option<&NumberInput>, errors: &mut Vec<String>) -> i32 {
    match value
        .and_then(NumberInput::to_i64)
        .and_then(|v| i32::try_from(v).ok())
    {
        Some(minutes) if minutes > 0 => minutes,
        _ => {
            errors.push("Duration must be a positive number".to_string());
            0
        }
    }
}

fn check_price(value: Option<&NumberInput>, errors: &mut Vec<String>) -> Decimal {
    price(value).unwrap_or_else(|| {
        errors.push("Starting price must be a valid number".to_string());
        Decimal::ZERO
    })
}

fn check_category(value: &str, errors: &mut Vec<String>) -> String {
    let category = required(value, "Category is required", errors);
    max_chars(&category, MAX_LABEL_CHARS, "Category", errors);
    category
}

fn check_title(value: &str, errors: &mut Vec<String>) -> String {
    let title = required(value, "Title is required", errors);
    max_chars(&title, MAX_TITLE_CHARS, "Title", errors);
    title
}

impl ServiceForm {
    pub fn validate_form(self) -> AppResult<NewService> {
        let mut errors = Vec::new();

        let category = check_category(&self.category, &mut errors);
        let title = check_title(&self.title, &mut errors);
        let description = required(&self.description, "Description is required", &mut errors);
        let duration_mins = check_duration(self.duration_mins.as_ref(), &mut errors);
        let starting_price = check_price(self.starting_price.as_ref(), &mut errors);

        if let Some(err) = AppError::from_messages(errors) {
            return Err(err);
        }

        Ok(NewService {
            category,
            title,
            description,
            duration_mins,
            starting_price,
            includes: self.includes.unwrap_or_default().into_items(),
            is_active: self.is_active.unwrap_or(true),
            sort_order: self.sort_order.unwrap_or(0),
        })
    }
}

impl ServicePatchForm {
    /// Validate only the fields that are present.
    pub fn validate_form(self) -> AppResult<ServicePatch> {
        let mut errors = Vec::new();

        let category = self.category.map(|v| check_category(&v, &mut errors));
        let title = self.title.map(|v| check_title(&v, &mut errors));
        let description = self
            .description
            .map(|v| required(&v, "Description is required", &mut errors));
        let duration_mins = self
            .duration_mins
            .map(|v| check_duration(Some(&v), &mut errors));
        let starting_price = self
            .starting_price
            .map(|v| check_price(Some(&v), &mut errors));

        if let Some(err) = AppError::from_messages(errors) {
            return Err(err);
        }

        Ok(ServicePatch {
            category,
            title,
            description,
            duration_mins,
            starting_price,
            includes: self
                .includes
                .map(|list| list.map(ListInput::into_items).unwrap_or_default()),
            is_active: self.is_active,
            sort_order: self.sort_order,
        })
    }
}
