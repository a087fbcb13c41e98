//! Lead captured by one of the public forms

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "formularios")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Discriminator: contato, agendamento, anuncie, whatsapp, financiamento, informacao
    pub tipo: String,
    pub origem: String,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub mensagem: Option<String>,
    #[sea_orm(nullable)]
    pub codigo_imovel: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub url: Option<String>,
    /// Type-specific fields as a JSON object
    #[sea_orm(column_type = "Text", nullable)]
    pub detalhes: Option<String>,
    pub criado_em: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
