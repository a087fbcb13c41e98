//! Carousel slide

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "slides")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub titulo: String,
    #[sea_orm(nullable)]
    pub subtitulo: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub descricao: Option<String>,
    pub imagem: String,
    #[sea_orm(nullable)]
    pub link: Option<String>,
    /// Call-to-action label rendered on the slide button
    #[sea_orm(nullable)]
    pub texto_botao: Option<String>,
    pub ordem: i32,
    pub status: bool,
    pub criado_em: DateTime,
    pub atualizado_em: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
