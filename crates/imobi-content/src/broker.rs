//! Brokers listed on `/corretores`

use async_trait::async_trait;
use imobi_common::ImobiError;
use imobi_persistence::entity::broker;
use sea_orm::*;
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::resource::AdminResource;
use crate::validation::{
    MAX_URL_LENGTH, default_status, non_blank, not_blank, validate_form, validate_phone,
};

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BrokerForm {
    #[validate(
        length(min = 1, max = 150, message = "nome is required"),
        custom(function = "not_blank")
    )]
    pub nome: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub telefone: String,
    #[validate(
        length(min = 1, max = 20, message = "creci is required"),
        custom(function = "not_blank")
    )]
    pub creci: String,
    #[validate(length(max = MAX_URL_LENGTH))]
    pub foto: Option<String>,
    #[serde(default = "default_status")]
    pub status: bool,
}

/// Active brokers sorted by name
pub async fn list_active(db: &DatabaseConnection) -> anyhow::Result<Vec<broker::Model>> {
    let brokers = broker::Entity::find()
        .filter(broker::Column::Status.eq(true))
        .order_by_asc(broker::Column::Nome)
        .all(db)
        .await?;

    Ok(brokers)
}

pub struct BrokerService;

#[async_trait]
impl AdminResource for BrokerService {
    type Entity = broker::Entity;
    type Model = broker::Model;
    type Form = BrokerForm;

    const NAME: &'static str = "broker";

    async fn list(db: &DatabaseConnection) -> anyhow::Result<Vec<broker::Model>> {
        let brokers = broker::Entity::find()
            .order_by_asc(broker::Column::Nome)
            .order_by_asc(broker::Column::Id)
            .all(db)
            .await?;

        Ok(brokers)
    }

    async fn find(db: &DatabaseConnection, id: i32) -> anyhow::Result<broker::Model> {
        broker::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ImobiError::not_found(format!("broker {}", id)).into())
    }

    async fn create(db: &DatabaseConnection, form: BrokerForm) -> anyhow::Result<broker::Model> {
        validate_form(&form)?;

        let now = chrono::Utc::now().naive_utc();
        let model = broker::ActiveModel {
            nome: Set(form.nome.trim().to_string()),
            email: Set(form.email.trim().to_lowercase()),
            telefone: Set(form.telefone.trim().to_string()),
            creci: Set(form.creci.trim().to_string()),
            foto: Set(non_blank(form.foto)),
            status: Set(form.status),
            criado_em: Set(now),
            atualizado_em: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await?;

        info!(id = model.id, "Broker created");

        Ok(model)
    }

    async fn update(
        db: &DatabaseConnection,
        id: i32,
        form: BrokerForm,
    ) -> anyhow::Result<broker::Model> {
        validate_form(&form)?;

        let mut entity: broker::ActiveModel = Self::find(db, id).await?.into();
        entity.nome = Set(form.nome.trim().to_string());
        entity.email = Set(form.email.trim().to_lowercase());
        entity.telefone = Set(form.telefone.trim().to_string());
        entity.creci = Set(form.creci.trim().to_string());
        entity.foto = Set(non_blank(form.foto));
        entity.status = Set(form.status);
        entity.atualizado_em = Set(chrono::Utc::now().naive_utc());

        let model = entity.update(db).await?;

        info!(id, "Broker updated");

        Ok(model)
    }
}
