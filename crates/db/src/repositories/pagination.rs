//! Page fetching for list queries.

use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Select};
use tally_shared::types::{PageRequest, PageResponse};

use crate::error::RepositoryError;

/// Fetches one page of `query` together with the total row count.
pub(crate) async fn fetch_page<E>(
    db: &DatabaseConnection,
    query: Select<E>,
    request: &PageRequest,
) -> Result<PageResponse<E::Model>, RepositoryError>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let request = request.normalized();
    let paginator = query.paginate(db, request.limit());
    let total = paginator.num_items().await?;
    let data = paginator.fetch_page(request.page_index()).await?;
    Ok(PageResponse::new(data, request.page, request.per_page, total))
}
