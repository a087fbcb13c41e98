//! Admin user service

use imobi_common::ImobiError;
use imobi_persistence::entity::user;
use sea_orm::*;
use tracing::info;

use crate::model::MAX_PASSWORD_LENGTH;

const BCRYPT_COST: u32 = 10;

pub async fn find_by_username(
    db: &DatabaseConnection,
    username: &str,
) -> anyhow::Result<Option<user::Model>> {
    let user = user::Entity::find_by_id(username.to_string()).one(db).await?;

    Ok(user)
}

pub async fn count(db: &DatabaseConnection) -> anyhow::Result<u64> {
    Ok(user::Entity::find().count(db).await?)
}

pub async fn create(db: &DatabaseConnection, username: &str, password: &str) -> anyhow::Result<()> {
    if username.trim().is_empty() {
        return Err(ImobiError::IllegalArgument("username is required".to_string()).into());
    }
    if password.is_empty() || password.len() > MAX_PASSWORD_LENGTH {
        return Err(ImobiError::IllegalArgument(format!(
            "password must have between 1 and {} bytes",
            MAX_PASSWORD_LENGTH
        ))
        .into());
    }
    if find_by_username(db, username).await?.is_some() {
        return Err(ImobiError::AlreadyExists(format!("user '{}' already exists", username)).into());
    }

    let hashed_password = bcrypt::hash(password, BCRYPT_COST)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    let entity = user::ActiveModel {
        username: Set(username.to_string()),
        password: Set(hashed_password),
        enabled: Set(true),
    };

    user::Entity::insert(entity).exec(db).await?;

    info!(username, "Admin user created");

    Ok(())
}

/// Username of the enabled account matching these credentials
pub async fn verify_credentials(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> anyhow::Result<Option<String>> {
    let Some(user) = find_by_username(db, username).await? else {
        return Ok(None);
    };
    if !user.enabled {
        return Ok(None);
    }

    let matches = bcrypt::verify(password, &user.password).unwrap_or(false);

    Ok(matches.then_some(user.username))
}

/// Create the first admin account. Does nothing once any user exists.
pub async fn ensure_bootstrap_admin(
    db: &DatabaseConnection,
    username: &str,
    password: &str,
) -> anyhow::Result<bool> {
    if count(db).await? > 0 {
        return Ok(false);
    }

    create(db, username, password).await?;
    info!(username, "Bootstrap admin created");

    Ok(true)
}

#[cfg(test)]
mod tests {
    use imobi_persistence::create_schema;

    use super::*;

    async fn setup() -> DatabaseConnection {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await.unwrap();
        create_schema(&db).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let db = setup().await;
        create(&db, "admin", "s3cret").await.unwrap();

        assert_eq!(
            verify_credentials(&db, "admin", "s3cret").await.unwrap(),
            Some("admin".to_string())
        );
        assert_eq!(verify_credentials(&db, "admin", "wrong").await.unwrap(), None);
        assert_eq!(verify_credentials(&db, "ghost", "s3cret").await.unwrap(), None);

        let stored = find_by_username(&db, "admin").await.unwrap().unwrap();
        assert_ne!(stored.password, "s3cret");
    }

    #[tokio::test]
    async fn test_bootstrap_admin_only_when_empty() {
        let db = setup().await;

        assert!(ensure_bootstrap_admin(&db, "admin", "first").await.unwrap());
        assert!(!ensure_bootstrap_admin(&db, "other", "second").await.unwrap());
        assert_eq!(count(&db).await.unwrap(), 1);
        assert!(find_by_username(&db, "other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_user() {
        let db = setup().await;
        create(&db, "admin", "x").await.unwrap();

        let err = create(&db, "admin", "y").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImobiError>(),
            Some(ImobiError::AlreadyExists(_))
        ));
    }
}
