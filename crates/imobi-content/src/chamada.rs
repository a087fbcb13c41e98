//! Call-out cards for the home page

use async_trait::async_trait;
use imobi_common::ImobiError;
use imobi_persistence::entity::chamada;
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
pub struct ChamadaForm {
    #[validate(
        length(min = 1, max = MAX_TITLE_LENGTH, message = "titulo is required"),
        custom(function = "not_blank")
    )]
    pub titulo: String,
    #[validate(length(max = 255))]
    pub subtitulo: Option<String>,
    pub conteudo: Option<String>,
    #[validate(length(max = MAX_URL_LENGTH))]
    pub imagem: Option<String>,
    #[validate(length(max = MAX_URL_LENGTH))]
    pub link: Option<String>,
    #[serde(default)]
    pub ordem: i32,
    #[serde(default = "default_status")]
    pub status: bool,
}

pub async fn list_active(db: &DatabaseConnection) -> anyhow::Result<Vec<chamada::Model>> {
    let chamadas = chamada::Entity::find()
        .filter(chamada::Column::Status.eq(true))
        .order_by_asc(chamada::Column::Ordem)
        .order_by_asc(chamada::Column::Id)
        .all(db)
        .await?;

    Ok(chamadas)
}

pub struct ChamadaService;

#[async_trait]
impl AdminResource for ChamadaService {
    type Entity = chamada::Entity;
    type Model = chamada::Model;
    type Form = ChamadaForm;

    const NAME: &'static str = "chamada";

    async fn list(db: &DatabaseConnection) -> anyhow::Result<Vec<chamada::Model>> {
        let chamadas = chamada::Entity::find()
            .order_by_asc(chamada::Column::Ordem)
            .order_by_asc(chamada::Column::Id)
            .all(db)
            .await?;

        Ok(chamadas)
    }

    async fn find(db: &DatabaseConnection, id: i32) -> anyhow::Result<chamada::Model> {
        chamada::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ImobiError::not_found(format!("chamada {}", id)).into())
    }

    async fn create(db: &DatabaseConnection, form: ChamadaForm) -> anyhow::Result<chamada::Model> {
        validate_form(&form)?;

        let now = chrono::Utc::now().naive_utc();
        let model = chamada::ActiveModel {
            titulo: Set(form.titulo.trim().to_string()),
            subtitulo: Set(non_blank(form.subtitulo)),
            conteudo: Set(non_blank(form.conteudo)),
            imagem: Set(non_blank(form.imagem)),
            link: Set(non_blank(form.link)),
            ordem: Set(form.ordem),
            status: Set(form.status),
            criado_em: Set(now),
            atualizado_em: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(id = model.id, "Chamada created");

        Ok(model)
    }

    async fn update(
        db: &DatabaseConnection,
        id: i32,
        form: ChamadaForm,
    ) -> anyhow::Result<chamada::Model> {
        validate_form(&form)?;

        let mut entity: chamada::ActiveModel = Self::find(db, id).await?.into();
        entity.titulo = Set(form.titulo.trim().to_string());
        entity.subtitulo = Set(non_blank(form.subtitulo));
        entity.conteudo = Set(non_blank(form.conteudo));
        entity.imagem = Set(non_blank(form.imagem));
        entity.link = Set(non_blank(form.link));
        entity.ordem = Set(form.ordem);
        entity.status = Set(form.status);
        entity.atualizado_em = Set(chrono::Utc::now().naive_utc());

        let model = entity.update(db).await?;

        info!(id, "Chamada updated");

        Ok(model)
    }
}
