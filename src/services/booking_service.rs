//! Booking lifecycle: submission, listing, status changes and counts.

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use super::container::parallel;
use crate::domain::{Booking, BookingFilter, BookingStatus, BookingSubmission, StatusCounts};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

/// One page of bookings with the per-status totals (admin listing)
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListing {
    #[schema(value_type = PaginatedBookings)]
    pub bookings: Paginated<Booking>,
    pub counts: StatusCounts,
}

/// Booking service trait for dependency injection.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Validate and store a booking; `user_id` is the signed-in customer, if any
    async fn submit(&self, submission: BookingSubmission, user_id: Option<i64>) -> AppResult<Booking>;

    async fn get(&self, id: i64) -> AppResult<Booking>;

    async fn list(&self, filter: BookingFilter, params: PaginationParams)
        -> AppResult<Paginated<Booking>>;

    async fn list_with_counts(
        &self,
        filter: BookingFilter,
        params: PaginationParams,
    ) -> AppResult<BookingListing>;

    /// Move a booking to any status; the last write wins
    async fn update_status(&self, id: i64, status: &str) -> AppResult<Booking>;

    async fn status_counts(&self) -> AppResult<StatusCounts>;

    async fn delete(&self, id: i64) -> AppResult<()>;
}

/// Concrete implementation of BookingService using Unit of Work.
pub struct BookingManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> BookingManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Catalog `(id, title)` for the submitted service id, if it still exists.
    async fn resolve_service(&self, service_id: Option<i64>) -> AppResult<Option<(i64, String)>> {
        let Some(id) = service_id else {
            return Ok(None);
        };

        match self.uow.services().find_by_id(id).await? {
            Some(service) => Ok(Some((service.id, service.title))),
            None => {
                tracing::warn!(service_id = id, "Booking references unknown service, dropping reference");
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> BookingService for BookingManager<U> {
    async fn submit(&self, submission: BookingSubmission, user_id: Option<i64>) -> AppResult<Booking> {
        let draft = submission.validate_submission()?;
        let resolved = self.resolve_service(draft.service_id).await?;

        let booking = self
            .uow
            .bookings()
            .create(draft.into_new_booking(user_id, resolved))
            .await?;

        tracing::info!(
            booking_id = booking.id,
            user_id = ?booking.user_id,
            service = %booking.service_title_snapshot,
            "Booking submitted"
        );

        Ok(booking)
    }

    async fn get(&self, id: i64) -> AppResult<Booking> {
        self.uow.bookings().find_by_id(id).await?.ok_or_not_found()
    }

    async fn list(
        &self,
        filter: BookingFilter,
        params: PaginationParams,
    ) -> AppResult<Paginated<Booking>> {
        let (rows, total) = self.uow.bookings().find_paginated(filter, params).await?;
        Ok(Paginated::new(rows, params, total))
    }

    async fn list_with_counts(
        &self,
        filter: BookingFilter,
        params: PaginationParams,
    ) -> AppResult<BookingListing> {
        let repo = self.uow.bookings();
        let ((rows, total), counts) =
            parallel::join2(repo.find_paginated(filter, params), repo.status_counts()).await?;

        Ok(BookingListing {
            bookings: Paginated::new(rows, params, total),
            counts,
        })
    }

    async fn update_status(&self, id: i64, status: &str) -> AppResult<Booking> {
        let status: BookingStatus = status.parse()?;
        self.uow
            .bookings()
            .update_status(id, status)
            .await?
            .ok_or_not_found()
    }

    async fn status_counts(&self) -> AppResult<StatusCounts> {
        self.uow.bookings().status_counts().await
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        if !self.uow.bookings().remove(id).await? {
            return Err(AppError::NotFound);
        }

        tracing::info!(booking_id = id, "Booking deleted");
        Ok(())
    }
}
