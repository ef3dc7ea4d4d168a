use sqlx::PgPool;

use crate::dto::HealthDependencyStatus;

use super::dependency_status;

pub(super) async fn check_postgres(pool: &PgPool) -> HealthDependencyStatus {
    let check = sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await;

    dependency_status(
        check
            .map(|_| ())
            .map_err(|error| format!("postgres check failed: {error}")),
    )
}
