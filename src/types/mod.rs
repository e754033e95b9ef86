//! Shared request and response types.

mod pagination;
mod response;

pub use pagination::{Paginated, PaginatedBookings, PaginationMeta, PaginationParams};
pub use response::{ApiResponse, Created, MessageResponse, NoContent};
