//! Home page banners

use async_trait::async_trait;
use imobi_common::ImobiError;
use imobi_persistence::entity::banner;
use sea_orm::*;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::resource::AdminResource;
use crate::validation::{
    MAX_TITLE_LENGTH, MAX_URL_LENGTH, default_status, non_blank, not_blank, validate_form,
};

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BannerForm {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "titulo is required"),
        custom(function = "not_blank")
    )]
    pub titulo: String,
    #[validate(length(max = 255))]
    pub subtitulo: Option<String>,
    #[validate(
        length(min = 1, max = MAX_URL_LENGTH, message = "imagem is required"),
        custom(function = "not_blank")
    )]
    pub imagem: String,
    #[validate(length(max = MAX_URL_LENGTH))]
    pub imagem_mobile: Option<String>,
    #[validate(length(max = MAX_URL_LENGTH))]
    pub link: Option<String>,
    #[serde(default)]
    pub ordem: i32,
    #[serde(default = "default_status")]
    pub status: bool,
}

/// Active banners in display order
pub async fn list_active(db: &DatabaseConnection) -> anyhow::Result<Vec<banner::Model>> {
    let banners = banner::Entity::find()
        .filter(banner::Column::Status.eq(true))
        .order_by_asc(banner::Column::Ordem)
        .order_by_asc(banner::Column::Id)
        .all(db)
        .await?;

    Ok(banners)
}

pub struct BannerService;

#[async_trait]
impl AdminResource for BannerService {
    type Entity = banner::Entity;
    type Model = banner::Model;
    type Form = BannerForm;

    const NAME: &'static str = "banner";

    async fn list(db: &DatabaseConnection) -> anyhow::Result<Vec<banner::Model>> {
        let banners = banner::Entity::find()
            .order_by_asc(banner::Column::Ordem)
            .order_by_asc(banner::Column::Id)
            .all(db)
            .await?;

        Ok(banners)
    }

    async fn find(db: &DatabaseConnection, id: i32) -> anyhow::Result<banner::Model> {
        banner::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ImobiError::not_found(format!("banner {}", id)).into())
    }

    async fn create(db: &DatabaseConnection, form: BannerForm) -> anyhow::Result<banner::Model> {
        validate_form(&form)?;

        let now = chrono::Utc::now().naive_utc();
        let model = banner::ActiveModel {
            titulo: Set(form.titulo.trim().to_string()),
            subtitulo: Set(non_blank(form.subtitulo)),
            imagem: Set(form.imagem),
            imagem_mobile: Set(non_blank(form.imagem_mobile)),
            link: Set(non_blank(form.link)),
            ordem: Set(form.ordem),
            status: Set(form.status),
            criado_em: Set(now),
            atualizado_em: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(id = model.id, "Banner created");

        Ok(model)
    }

    async fn update(
        db: &DatabaseConnection,
        id: i32,
        form: BannerForm,
    ) -> anyhow::Result<banner::Model> {
        validate_form(&form)?;

        let mut entity: banner::ActiveModel = Self::find(db, id).await?.into();
        entity.titulo = Set(form.titulo.trim().to_string());
        entity.subtitulo = Set(non_blank(form.subtitulo));
        entity.imagem = Set(form.imagem);
        entity.imagem_mobile = Set(non_blank(form.imagem_mobile));
        entity.link = Set(non_blank(form.link));
        entity.ordem = Set(form.ordem);
        entity.status = Set(form.status);
        entity.atualizado_em = Set(chrono::Utc::now().naive_utc());

        let model = entity.update(db).await?;

        info!(id, "Banner updated");

        Ok(model)
    }
}
