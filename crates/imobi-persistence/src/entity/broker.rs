//! Real-estate broker

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "corretores")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    /// Broker license number, stored as typed
    pub creci: String,
    #[sea_orm(nullable)]
    pub foto: Option<String>,
    pub status: bool,
    pub criado_em: DateTime,
    pub atualizado_em: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
