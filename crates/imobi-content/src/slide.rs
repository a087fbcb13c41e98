//! Carousel slides

use async_trait::async_trait;
use imobi_common::ImobiError;
use imobi_persistence::entity::slide;
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
pub struct SlideForm {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "titulo is required"),
        custom(function = "not_blank")
    )]
    pub titulo: String,
    #[validate(length(max = 255))]
    pub subtitulo: Option<String>,
    pub descricao: Option<String>,
    #[validate(
        length(min = 1, max = MAX_URL_LENGTH, message = "imagem is required"),
        custom(function = "not_blank")
    )]
    pub imagem: String,
    #[validate(length(max = MAX_URL_LENGTH))]
    pub link: Option<String>,
    #[validate(length(max = 60))]
    pub texto_botao: Option<String>,
    #[serde(default)]
    pub ordem: i32,
    #[serde(default = "default_status")]
    pub status: bool,
}

pub async fn list_active(db: &DatabaseConnection) -> anyhow::Result<Vec<slide::Model>> {
    let slides = slide::Entity::find()
        .filter(slide::Column::Status.eq(true))
        .order_by_asc(slide::Column::Ordem)
        .order_by_asc(slide::Column::Id)
        .all(db)
        .await?;

    Ok(slides)
}

pub struct SlideService;

#[async_trait]
impl AdminResource for SlideService {
    type Entity = slide::Entity;
    type Model = slide::Model;
    type Form = SlideForm;

    const NAME: &'static str = "slide";

    async fn list(db: &DatabaseConnection) -> anyhow::Result<Vec<slide::Model>> {
        let slides = slide::Entity::find()
            .order_by_asc(slide::Column::Ordem)
            .order_by_asc(slide::Column::Id)
            .all(db)
            .await?;

        Ok(slides)
    }

    async fn find(db: &DatabaseConnection, id: i32) -> anyhow::Result<slide::Model> {
        slide::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ImobiError::not_found(format!("slide {}", id)).into())
    }

    async fn create(db: &DatabaseConnection, form: SlideForm) -> anyhow::Result<slide::Model> {
        validate_form(&form)?;

        let now = chrono::Utc::now().naive_utc();
        let model = slide::ActiveModel {
            titulo: Set(form.titulo.trim().to_string()),
            subtitulo: Set(non_blank(form.subtitulo)),
            descricao: Set(non_blank(form.descricao)),
            imagem: Set(form.imagem),
            link: Set(non_blank(form.link)),
            texto_botao: Set(non_blank(form.texto_botao)),
            ordem: Set(form.ordem),
            status: Set(form.status),
            criado_em: Set(now),
            atualizado_em: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(id = model.id, "Slide created");

        Ok(model)
    }

    async fn update(
        db: &DatabaseConnection,
        id: i32,
        form: SlideForm,
    ) -> anyhow::Result<slide::Model> {
        validate_form(&form)?;

        let mut entity: slide::ActiveModel = Self::find(db, id).await?.into();
        entity.titulo = Set(form.titulo.trim().to_string());
        entity.subtitulo = Set(non_blank(form.subtitulo));
        entity.descricao = Set(non_blank(form.descricao));
        entity.imagem = Set(form.imagem);
        entity.link = Set(non_blank(form.link));
        entity.texto_botao = Set(non_blank(form.texto_botao));
        entity.ordem = Set(form.ordem);
        entity.status = Set(form.status);
        entity.atualizado_em = Set(chrono::Utc::now().naive_utc());

        let model = entity.update(db).await?;

        info!(id, "Slide updated");

        Ok(model)
    }
}
