//! Institutional content page addressed by slug (`/pagina/{slug}`)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "paginas")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub slug: String,
    pub titulo: String,
    #[sea_orm(nullable)]
    pub subtitulo: Option<String>,
    /// Trusted HTML authored in the admin console
    #[sea_orm(column_type = "Text")]
    pub conteudo: String,
    #[sea_orm(nullable)]
    pub imagem: Option<String>,
    pub ordem: i32,
    pub status: bool,
    pub criado_em: DateTime,
    pub atualizado_em: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
