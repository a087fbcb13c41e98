//! Institutional content pages addressed by slug

use async_trait::async_trait;
use imobi_common::ImobiError;
use imobi_persistence::entity::content_page;
use sea_orm::*;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::resource::AdminResource;
use crate::validation::{
    MAX_TITLE_LENGTH, MAX_URL_LENGTH, default_status, non_blank, not_blank, validate_form,
    validate_slug,
};

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContentPageForm {
    #[validate(length(max = 120), custom(function = "validate_slug"))]
    pub slug: String,
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "titulo is required"),
        custom(function = "not_blank")
    )]
    pub titulo: String,
    #[validate(length(max = 255))]
    pub subtitulo: Option<String>,
    #[serde(default)]
    pub conteudo: String,
    #[validate(length(max = MAX_URL_LENGTH))]
    pub imagem: Option<String>,
    #[serde(default)]
    pub ordem: i32,
    #[serde(default = "default_status")]
    pub status: bool,
}

fn slug_taken(slug: &str) -> ImobiError {
    ImobiError::AlreadyExists(format!("page slug '{}' already exists", slug))
}

/// Map a unique-constraint hit on `slug` to the same error the pre-check raises
fn map_insert_error(err: DbErr, slug: &str) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => slug_taken(slug).into(),
        _ => err.into(),
    }
}

async fn ensure_slug_free(
    db: &DatabaseConnection,
    slug: &str,
    except_id: Option<i32>,
) -> anyhow::Result<()> {
    let mut query = content_page::Entity::find().filter(content_page::Column::Slug.eq(slug));
    if let Some(id) = except_id {
        query = query.filter(content_page::Column::Id.ne(id));
    }

    if query.one(db).await?.is_some() {
        return Err(slug_taken(slug).into());
    }

    Ok(())
}

/// Published page for `/pagina/{slug}`
pub async fn find_published_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> anyhow::Result<Option<content_page::Model>> {
    let page = content_page::Entity::find()
        .filter(content_page::Column::Slug.eq(slug))
        .filter(content_page::Column::Status.eq(true))
        .one(db)
        .await?;

    Ok(page)
}

/// Published pages for navigation menus
pub async fn list_published(db: &DatabaseConnection) -> anyhow::Result<Vec<content_page::Model>> {
    let pages = content_page::Entity::find()
        .filter(content_page::Column::Status.eq(true))
        .order_by_asc(content_page::Column::Ordem)
        .order_by_asc(content_page::Column::Id)
        .all(db)
        .await?;

    Ok(pages)
}

pub struct ContentPageService;

#[async_trait]
impl AdminResource for ContentPageService {
    type Entity = content_page::Entity;
    type Model = content_page::Model;
    type Form = ContentPageForm;

    const NAME: &'static str = "page";

    async fn list(db: &DatabaseConnection) -> anyhow::Result<Vec<content_page::Model>> {
        let pages = content_page::Entity::find()
            .order_by_asc(content_page::Column::Ordem)
            .order_by_asc(content_page::Column::Id)
            .all(db)
            .await?;

        Ok(pages)
    }

    async fn find(db: &DatabaseConnection, id: i32) -> anyhow::Result<content_page::Model> {
        content_page::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ImobiError::not_found(format!("page {}", id)).into())
    }

    async fn create(
        db: &DatabaseConnection,
        form: ContentPageForm,
    ) -> anyhow::Result<content_page::Model> {
        validate_form(&form)?;
        ensure_slug_free(db, &form.slug, None).await?;

        let now = chrono::Utc::now().naive_utc();
        let model = content_page::ActiveModel {
            slug: Set(form.slug.clone()),
            titulo: Set(form.titulo.trim().to_string()),
            subtitulo: Set(non_blank(form.subtitulo)),
            conteudo: Set(form.conteudo),
            imagem: Set(non_blank(form.imagem)),
            ordem: Set(form.ordem),
            status: Set(form.status),
            criado_em: Set(now),
            atualizado_em: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| map_insert_error(e, &form.slug))?;

        info!(id = model.id, slug = %model.slug, "Content page created");

        Ok(model)
    }

    async fn update(
        db: &DatabaseConnection,
        id: i32,
        form: ContentPageForm,
    ) -> anyhow::Result<content_page::Model> {
        validate_form(&form)?;

        let existing = Self::find(db, id).await?;
        if existing.slug != form.slug {
            ensure_slug_free(db, &form.slug, Some(id)).await?;
        }

        let mut entity: content_page::ActiveModel = existing.into();
        entity.slug = Set(form.slug.clone());
        entity.titulo = Set(form.titulo.trim().to_string());
        entity.subtitulo = Set(non_blank(form.subtitulo));
        entity.conteudo = Set(form.conteudo);
        entity.imagem = Set(non_blank(form.imagem));
        entity.ordem = Set(form.ordem);
        entity.status = Set(form.status);
        entity.atualizado_em = Set(chrono::Utc::now().naive_utc());

        let model = entity
            .update(db)
            .await
            .map_err(|e| map_insert_error(e, &form.slug))?;

        info!(id, slug = %model.slug, "Content page updated");

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_db;

    fn form(slug: &str) -> ContentPageForm {
        ContentPageForm {
            slug: slug.to_string(),
            titulo: "Quem somos".to_string(),
            subtitulo: None,
            conteudo: "<p>Desde 1998</p>".to_string(),
            imagem: None,
            ordem: 0,
            status: true,
        }
    }

    #[tokio::test]
    async fn test_find_published_by_slug() {
        let db = memory_db().await;
        let page = ContentPageService::create(&db, form("quem-somos"))
            .await
            .unwrap();

        let found = find_published_by_slug(&db, "quem-somos").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(page.id));

        ContentPageService::set_status(&db, &[page.id], false).await;
        assert!(
            find_published_by_slug(&db, "quem-somos")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_duplicate_slug_is_rejected() {
        let db = memory_db().await;
        ContentPageService::create(&db, form("faq")).await.unwrap();

        let err = ContentPageService::create(&db, form("faq"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImobiError>(),
            Some(ImobiError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_update_to_taken_slug_is_rejected() {
        let db = memory_db().await;
        ContentPageService::create(&db, form("faq")).await.unwrap();
        let other = ContentPageService::create(&db, form("contato"))
            .await
            .unwrap();

        let err = ContentPageService::update(&db, other.id, form("faq"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "page slug 'faq' already exists");

        let same = ContentPageService::update(&db, other.id, form("contato")).await;
        assert!(same.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_slug() {
        let db = memory_db().await;

        let err = ContentPageService::create(&db, form("Quem Somos"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ImobiError>(),
            Some(ImobiError::InvalidData(_))
        ));
    }
}
