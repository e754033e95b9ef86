//! Service catalog and pricing plans: public listings and admin CRUD.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::CATEGORY_FILTER_ALL;
use crate::domain::{
    PricingPlan, PricingPlanForm, PricingPlanPatchForm, Service, ServiceForm, ServicePatchForm,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Catalog service trait for dependency injection.
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Active services; `"All"` or blank means every category
    async fn active_services(&self, category: Option<String>) -> AppResult<Vec<Service>>;

    async fn list_services(&self) -> AppResult<Vec<Service>>;

    async fn get_service(&self, id: i64) -> AppResult<Service>;

    async fn create_service(&self, form: ServiceForm) -> AppResult<Service>;

    async fn update_service(&self, id: i64, form: ServicePatchForm) -> AppResult<Service>;

    async fn delete_service(&self, id: i64) -> AppResult<()>;

    async fn active_plans(&self) -> AppResult<Vec<PricingPlan>>;

    async fn list_plans(&self) -> AppResult<Vec<PricingPlan>>;

    async fn get_plan(&self, id: i64) -> AppResult<PricingPlan>;

    async fn create_plan(&self, form: PricingPlanForm) -> AppResult<PricingPlan>;

    async fn update_plan(&self, id: i64, form: PricingPlanPatchForm) -> AppResult<PricingPlan>;

    async fn delete_plan(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of CatalogService using Unit of Work.
pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn active_services(&self, category: Option<String>) -> AppResult<Vec<Service>> {
        let category = category
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty() && c != CATEGORY_FILTER_ALL);

        self.uow.services().find_active(category).await
    }

    async fn list_services(&self) -> AppResult<Vec<Service>> {
        self.uow.services().find_all().await
    }

    async fn get_service(&self, id: i64) -> AppResult<Service> {
        self.uow.services().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_service(&self, form: ServiceForm) -> AppResult<Service> {
        let service = self.uow.services().create(form.validate_form()?).await?;
        tracing::info!(service_id = service.id, title = %service.title, "Service created");
        Ok(service)
    }

    async fn update_service(&self, id: i64, form: ServicePatchForm) -> AppResult<Service> {
        let patch = form.validate_form()?;
        self.uow
            .services()
            .update(id, patch)
            .await?
            .ok_or_not_found()
    }

    async fn delete_service(&self, id: i64) -> AppResult<()> {
        if !self.uow.services().remove(id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(service_id = id, "Service deleted");
        Ok(())
    }

    async fn active_plans(&self) -> AppResult<Vec<PricingPlan>> {
        self.uow.pricing().find_active().await
    }

    async fn list_plans(&self) -> AppResult<Vec<PricingPlan>> {
        self.uow.pricing().find_all().await
    }

    async fn get_plan(&self, id: i64) -> AppResult<PricingPlan> {
        self.uow.pricing().find_by_id(id).await?.ok_or_not_found()
    }

    async fn create_plan(&self, form: PricingPlanForm) -> AppResult<PricingPlan> {
        let plan = self.uow.pricing().create(form.validate_form()?).await?;
        tracing::info!(plan_id = plan.id, name = %plan.name, "Pricing plan created");
        Ok(plan)
    }

    async fn update_plan(&self, id: i64, form: PricingPlanPatchForm) -> AppResult<PricingPlan> {
        let patch = form.validate_form()?;
        self.uow
            .pricing()
            .update(id, patch)
            .await?
            .ok_or_not_found()
    }

    async fn delete_plan(&self, id: i64) -> AppResult<()> {
        if !self.uow.pricing().remove(id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(plan_id = id, "Pricing plan deleted");
        Ok(())
    }
}
