//! Per-item bulk operations for admin tables
//!
//! Each id is written on its own so one failing row never hides the outcome of
//! the others; the caller gets a [`BulkOutcome`] listing both sides.

use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, sea_query::Expr,
};
use tracing::{debug, warn};

use crate::model::{BulkOutcome, dedupe_ids};
use crate::traits::{KeyedEntity, StatusEntity};

const NOT_FOUND: &str = "not found";

/// Set the activation flag of every selected row.
pub async fn set_status<E: StatusEntity>(
    db: &DatabaseConnection,
    ids: &[i32],
    status: bool,
) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();
    let now = chrono::Utc::now().naive_utc();

    for id in dedupe_ids(ids) {
        let result = E::update_many()
            .col_expr(E::status_column(), Expr::value(status))
            .col_expr(E::updated_at_column(), Expr::value(now))
            .filter(E::id_column().eq(id))
            .exec(db)
            .await;

        match result {
            Ok(res) if res.rows_affected > 0 => outcome.succeeded.push(id),
            Ok(_) => outcome.fail(id, NOT_FOUND),
            Err(e) => {
                warn!(id, error = %e, "Failed to update status");
                outcome.fail(id, e.to_string());
            }
        }
    }

    debug!(
        status,
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Bulk status update finished"
    );

    outcome
}

/// Delete every selected row.
pub async fn delete<E: KeyedEntity>(db: &DatabaseConnection, ids: &[i32]) -> BulkOutcome {
    let mut outcome = BulkOutcome::default();

    for id in dedupe_ids(ids) {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .exec(db)
            .await;

        match result {
            Ok(res) if res.rows_affected > 0 => outcome.succeeded.push(id),
            Ok(_) => outcome.fail(id, NOT_FOUND),
            Err(e) => {
                warn!(id, error = %e, "Failed to delete row");
                outcome.fail(id, e.to_string());
            }
        }
    }

    debug!(
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Bulk delete finished"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use sea_orm::{ActiveModelTrait, ConnectOptions, Database, Set};

    use super::*;
    use crate::entity::broker;
    use crate::schema::create_schema;

    async fn setup() -> DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        create_schema(&db).await.unwrap();
        db
    }

    async fn insert_broker(db: &DatabaseConnection, nome: &str) -> i32 {
        let now = chrono::Utc::now().naive_utc();
        broker::ActiveModel {
            nome: Set(nome.to_string()),
            email: Set(format!("{}@imobi.test", nome.to_lowercase())),
            telefone: Set("19999990000".to_string()),
            creci: Set("12345-F".to_string()),
            foto: Set(None),
            status: Set(true),
            criado_em: Set(now),
            atualizado_em: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn test_deactivate_every_selected_row() {
        let db = setup().await;
        let mut ids = Vec::new();
        for nome in ["Ana", "Bruno", "Carla"] {
            ids.push(insert_broker(&db, nome).await);
        }

        let outcome = set_status::<broker::Entity>(&db, &ids, false).await;

        assert!(outcome.is_complete());
        assert!(outcome.remaining_selection().is_empty());
        assert_eq!(outcome.succeeded, ids);

        let rows = broker::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|b| !b.status));
    }

    #[tokio::test]
    async fn test_missing_row_is_reported_per_item() {
        let db = setup().await;
        let id = insert_broker(&db, "Ana").await;

        let outcome = set_status::<broker::Entity>(&db, &[id, 999], false).await;

        assert_eq!(outcome.succeeded, vec![id]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].id, 999);
        assert_eq!(outcome.failed[0].reason, "not found");
        assert_eq!(outcome.remaining_selection(), vec![999]);
    }

    #[tokio::test]
    async fn test_delete_dedupes_ids() {
        let db = setup().await;
        let a = insert_broker(&db, "Ana").await;
        let b = insert_broker(&db, "Bruno").await;

        let outcome = delete::<broker::Entity>(&db, &[a, a, b]).await;

        assert_eq!(outcome.succeeded, vec![a, b]);
        assert!(outcome.is_complete());
        assert!(broker::Entity::find().all(&db).await.unwrap().is_empty());
    }
}
