//! Subscription pricing plans.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::form::{double_option, max_chars, price, required, ListInput, NumberInput};
use crate::config::MAX_LABEL_CHARS;
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PricingPlan {
    pub id: i64,
    #[schema(example = "Basic")]
    pub name: String,
    #[schema(value_type = String, example = "49.00")]
    pub price_monthly: Decimal,
    pub features: Vec<String>,
    pub is_popular: bool,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPricingPlan {
    pub name: String,
    pub price_monthly: Decimal,
    pub features: Vec<String>,
    pub is_popular: bool,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PricingPlanPatch {
    pub name: Option<String>,
    pub price_monthly: Option<Decimal>,
    pub features: Option<Vec<String>>,
    pub is_popular: Option<bool>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Admin pricing plan form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PricingPlanForm {
    pub name: String,
    /// Number or numeric text
    #[schema(value_type = Option<String>)]
    pub price_monthly: Option<NumberInput>,
    /// JSON array or newline-separated text
    pub features: Option<ListInput>,
    pub is_popular: Option<bool>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

/// Admin pricing plan patch form
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct PricingPlanPatchForm {
    pub name: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price_monthly: Option<NumberInput>,
    #[serde(deserialize_with = "double_option")]
    #[schema(value_type = Option<Vec<String>>)]
    pub features: Option<Option<ListInput>>,
    pub is_popular: Option<bool>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

fn check_price(value: Option<&NumberInput>, errors: &mut Vec<String>) -> Decimal {
    price(value).unwrap_or_else(|| {
        errors.push("Monthly price must be a valid number".to_string());
        Decimal::ZERO
    })
}

fn check_name(value: &str, errors: &mut Vec<String>) -> String {
    let name = required(value, "Plan name is required", errors);
    max_chars(&name, MAX_LABEL_CHARS, "Plan name", errors);
    name
}

impl PricingPlanForm {
    pub fn validate_form(self) -> AppResult<NewPricingPlan> {
        let mut errors = Vec::new();
        let name = check_name(&self.name, &mut errors);
        let price_monthly = check_price(self.price_monthly.as_ref(), &mut errors);

        if let Some(err) = AppError::from_messages(errors) {
            return Err(err);
        }

        Ok(NewPricingPlan {
            name,
            price_monthly,
            features: self.features.unwrap_or_default().into_items(),
            is_popular: self.is_popular.unwrap_or(false),
            is_active: self.is_active.unwrap_or(true),
            sort_order: self.sort_order.unwrap_or(0),
        })
    }
}

impl PricingPlanPatchForm {
    pub fn validate_form(self) -> AppResult<PricingPlanPatch> {
        let mut errors = Vec::new();
        let name = self.name.map(|v| check_name(&v, &mut errors));
        let price_monthly = self
            .price_monthly
            .map(|v| check_price(Some(&v), &mut errors));

        if let Some(err) = AppError::from_messages(errors) {
            return Err(err);
        }

        Ok(PricingPlanPatch {
            name,
            price_monthly,
            features: self
                .features
                .map(|list| list.map(ListInput::into_items).unwrap_or_default()),
            is_popular: self.is_popular,
            is_active: self.is_active,
            sort_order: self.sort_order,
        })
    }
}
