use sqlx::PgPool;

use crate::models::category::Category;

const COLUMNS: &str = "id, name, slug, sort_order, created_at";

pub struct CategoryRepo;

impl CategoryRepo {
    /// All categories in display order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY sort_order, name");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }
}
