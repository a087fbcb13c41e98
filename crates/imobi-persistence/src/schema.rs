//! Schema bootstrap
//!
//! Creates every table from its entity definition. Existing tables are left
//! untouched, so this is safe to run on each start.

use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, Schema};
use tracing::info;

use crate::entity::{
    banner, broker, chamada, content_page, form_submission, site_config, slide, user,
};

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> anyhow::Result<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();

    db.execute(backend.build(&stmt)).await?;

    Ok(())
}

pub async fn create_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    create_table(db, banner::Entity).await?;
    create_table(db, slide::Entity).await?;
    create_table(db, chamada::Entity).await?;
    create_table(db, content_page::Entity).await?;
    create_table(db, broker::Entity).await?;
    create_table(db, site_config::Entity).await?;
    create_table(db, form_submission::Entity).await?;
    create_table(db, user::Entity).await?;

    info!(backend = ?db.get_database_backend(), "Relational schema ready");

    Ok(())
}
