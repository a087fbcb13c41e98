//! Site configuration
//!
//! A single row stored under the well-known key [`SITE_CONFIG_ID`]; the
//! primary key enforces that at most one configuration exists.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const SITE_CONFIG_ID: i32 = 1;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "configuracoes")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub nome_empresa: String,
    #[sea_orm(nullable)]
    pub razao_social: Option<String>,
    #[sea_orm(nullable)]
    pub cnpj: Option<String>,
    #[sea_orm(nullable)]
    pub creci: Option<String>,
    pub email: String,
    pub telefone: String,
    #[sea_orm(nullable)]
    pub whatsapp: Option<String>,
    #[sea_orm(nullable)]
    pub endereco: Option<String>,
    #[sea_orm(nullable)]
    pub bairro: Option<String>,
    #[sea_orm(nullable)]
    pub cidade: Option<String>,
    #[sea_orm(nullable)]
    pub estado: Option<String>,
    #[sea_orm(nullable)]
    pub cep: Option<String>,
    #[sea_orm(nullable)]
    pub facebook: Option<String>,
    #[sea_orm(nullable)]
    pub instagram: Option<String>,
    #[sea_orm(nullable)]
    pub youtube: Option<String>,
    #[sea_orm(nullable)]
    pub linkedin: Option<String>,
    pub status: bool,
    pub criado_em: DateTime,
    pub atualizado_em: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
