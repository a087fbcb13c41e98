//! Contract shared by every table managed from the admin console

use async_trait::async_trait;
use imobi_persistence::{BulkOutcome, StatusEntity, bulk};
use sea_orm::DatabaseConnection;
use serde::{Serialize, de::DeserializeOwned};
use tracing::info;
use validator::Validate;

/// A back-office resource: listed, edited and bulk-toggled from the console.
///
/// `create` and `update` validate the form before touching the store and fail
/// with `ImobiError::InvalidData` when it does not pass.
#[async_trait]
pub trait AdminResource: Send + Sync + 'static {
    type Entity: StatusEntity;
    type Model: Serialize + Send + Sync;
    type Form: Validate + DeserializeOwned + Send + Sync;

    /// Singular name used in log lines and not-found messages
    const NAME: &'static str;

    async fn list(db: &DatabaseConnection) -> anyhow::Result<Vec<Self::Model>>;

    async fn find(db: &DatabaseConnection, id: i32) -> anyhow::Result<Self::Model>;

    async fn create(db: &DatabaseConnection, form: Self::Form) -> anyhow::Result<Self::Model>;

    async fn update(
        db: &DatabaseConnection,
        id: i32,
        form: Self::Form,
    ) -> anyhow::Result<Self::Model>;

    async fn set_status(db: &DatabaseConnection, ids: &[i32], status: bool) -> BulkOutcome {
        let outcome = bulk::set_status::<Self::Entity>(db, ids, status).await;
        info!(
            resource = Self::NAME,
            status,
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Status changed"
        );
        outcome
    }

    async fn delete(db: &DatabaseConnection, ids: &[i32]) -> BulkOutcome {
        let outcome = bulk::delete::<Self::Entity>(db, ids).await;
        info!(
            resource = Self::NAME,
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "Deleted"
        );
        outcome
    }
}
