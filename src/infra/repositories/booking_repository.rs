//! Booking repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseBackend,
    DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select,
    Set,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::entities::booking::{self, ActiveModel, Entity as BookingEntity};
use crate::domain::{Booking, BookingFilter, BookingStatus, NewBooking, StatusCounts};
use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Booking repository trait
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert with status `New`
    async fn create(&self, booking: NewBooking) -> AppResult<Booking>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Booking>>;

    /// Every matching booking, newest first
    async fn find_all(&self, filter: BookingFilter) -> AppResult<Vec<Booking>>;

    /// One page of matching bookings plus the total match count
    async fn find_paginated(
        &self,
        filter: BookingFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Booking>, u64)>;

    async fn find_recent(&self, limit: u64) -> AppResult<Vec<Booking>>;

    /// `None` when the id does not exist
    async fn update_status(&self, id: i64, status: BookingStatus) -> AppResult<Option<Booking>>;

    async fn remove(&self, id: i64) -> AppResult<bool>;

    async fn status_counts(&self) -> AppResult<StatusCounts>;
}

/// SeaORM-backed booking repository
pub struct BookingStore {
    db: DatabaseConnection,
}

impl BookingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Escape LIKE wildcards and wrap the term for a substring match.
///
/// The term is lowercased the way the backend's `LOWER()` lowercases the
/// column: SQLite only folds ASCII letters, Postgres folds Unicode.
fn like_pattern(term: &str, backend: DatabaseBackend) -> String {
    let folded = match backend {
        DatabaseBackend::Sqlite => term.to_ascii_lowercase(),
        _ => term.to_lowercase(),
    };

    let mut escaped = String::with_capacity(folded.len() + 2);
    escaped.push('%');
    for ch in folded.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn filtered(filter: &BookingFilter, backend: DatabaseBackend) -> Select<BookingEntity> {
    let mut query = BookingEntity::find();

    if let Some(user_id) = filter.user_id {
        query = query.filter(booking::Column::UserId.eq(user_id));
    }

    if let Some(status) = filter.status {
        query = query.filter(booking::Column::Status.eq(status.as_str()));
    }

    if let Some(search) = &filter.search {
        let pattern = like_pattern(search, backend);
        let matches = |column: booking::Column| {
            Expr::expr(Func::lower(Expr::col(column)))
                .like(LikeExpr::new(pattern.clone()).escape('\\'))
        };

        query = query.filter(
            Condition::any()
                .add(matches(booking::Column::CustomerName))
                .add(matches(booking::Column::Phone))
                .add(matches(booking::Column::Email))
                .add(matches(booking::Column::ServiceTitleSnapshot)),
        );
    }

    query
}

fn newest_first(query: Select<BookingEntity>) -> Select<BookingEntity> {
    query
        .order_by_desc(booking::Column::CreatedAt)
        .order_by_desc(booking::Column::Id)
}

fn into_bookings(models: Vec<booking::Model>) -> AppResult<Vec<Booking>> {
    models.into_iter().map(Booking::try_from).collect()
}

#[async_trait]
impl BookingRepository for BookingStore {
    async fn create(&self, booking: NewBooking) -> AppResult<Booking> {
        let now = Utc::now();
        let active_model = ActiveModel {
            user_id: Set(booking.user_id),
            customer_name: Set(booking.customer_name),
            phone: Set(booking.phone),
            email: Set(booking.email),
            address_line1: Set(booking.address_line1),
            address_line2: Set(booking.address_line2),
            city: Set(booking.city),
            state: Set(booking.state),
            pincode: Set(booking.pincode),
            service_id: Set(booking.service_id),
            service_title_snapshot: Set(booking.service_title_snapshot),
            preferred_date: Set(booking.preferred_date),
            preferred_time: Set(booking.preferred_time),
            pet_type: Set(booking.pet_type),
            pet_breed: Set(booking.pet_breed),
            pet_age: Set(booking.pet_age),
            notes: Set(booking.notes),
            status: Set(BookingStatus::New.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active_model.insert(&self.db).await.map_err(AppError::from)?;
        Booking::try_from(model)
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Booking>> {
        BookingEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn find_all(&self, filter: BookingFilter) -> AppResult<Vec<Booking>> {
        let models = newest_first(filtered(&filter, self.db.get_database_backend()))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        into_bookings(models)
    }

    async fn find_paginated(
        &self,
        filter: BookingFilter,
        params: PaginationParams,
    ) -> AppResult<(Vec<Booking>, u64)> {
        let total = filtered(&filter, self.db.get_database_backend())
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        if params.is_empty_page() || params.offset() >= total {
            return Ok((Vec::new(), total));
        }

        let models = newest_first(filtered(&filter, self.db.get_database_backend()))
            .offset(params.offset())
            .limit(params.limit())
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok((into_bookings(models)?, total))
    }

    async fn find_recent(&self, limit: u64) -> AppResult<Vec<Booking>> {
        let models = newest_first(BookingEntity::find())
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        into_bookings(models)
    }

    async fn update_status(&self, id: i64, status: BookingStatus) -> AppResult<Option<Booking>> {
        let result = BookingEntity::update_many()
            .col_expr(booking::Column::Status, Expr::value(status.as_str()))
            .col_expr(booking::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(booking::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        tracing::info!(booking_id = id, status = %status, "Booking status updated");
        self.find_by_id(id).await
    }

    async fn remove(&self, id: i64) -> AppResult<bool> {
        let result = BookingEntity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }

    async fn status_counts(&self) -> AppResult<StatusCounts> {
        let rows: Vec<(String, i64)> = BookingEntity::find()
            .select_only()
            .column(booking::Column::Status)
            .column_as(Expr::col(booking::Column::Id).count(), "count")
            .group_by(booking::Column::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(StatusCounts::from_rows(
            rows.into_iter()
                .map(|(status, count)| (status, count.max(0) as u64)),
        ))
    }
}

impl TryFrom<booking::Model> for Booking {
    type Error = AppError;

    fn try_from(model: booking::Model) -> Result<Self, Self::Error> {
        let status = model.status.parse::<BookingStatus>().map_err(|_| {
            AppError::internal(format!(
                "Booking {} has unknown status {:?}",
                model.id, model.status
            ))
        })?;

        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            customer_name: model.customer_name,
            phone: model.phone,
            email: model.email,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            city: model.city,
            state: model.state,
            pincode: model.pincode,
            service_id: model.service_id,
            service_title_snapshot: model.service_title_snapshot,
            preferred_date: model.preferred_date,
            preferred_time: model.preferred_time,
            pet_type: model.pet_type,
            pet_breed: model.pet_breed,
            pet_age: model.pet_age,
            notes: model.notes,
            status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        let pg = DatabaseBackend::Postgres;
        assert_eq!(like_pattern("Jane", pg), "%jane%");
        assert_eq!(like_pattern("50%_off", pg), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b", pg), "%a\\\\b%");
    }

    #[test]
    fn test_like_pattern_folds_case_like_backend() {
        assert_eq!(like_pattern("ÉLODIE", DatabaseBackend::Postgres), "%élodie%");
        assert_eq!(like_pattern("ÉLODIE", DatabaseBackend::Sqlite), "%Élodie%");
    }
}
