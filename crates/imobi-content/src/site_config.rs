//! Site configuration
//!
//! Exactly one row may exist. It always lives under
//! [`SITE_CONFIG_ID`](imobi_persistence::entity::site_config::SITE_CONFIG_ID), so a
//! second insert collides on the primary key even when two requests race past
//! the existence check.

use async_trait::async_trait;
use imobi_common::ImobiError;
use imobi_persistence::entity::site_config::{self, SITE_CONFIG_ID};
use sea_orm::*;
use serde::Deserialize;
use tracing::{info, warn};
use validator::Validate;

use crate::resource::AdminResource;
use crate::validation::{default_status, non_blank, not_blank, validate_form, validate_phone};

const ALREADY_EXISTS: &str = "site configuration already exists";

#[derive(Clone, Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfigForm {
    #[validate(
        length(min = 1, max = 150, message = "nomeEmpresa is required"),
        custom(function = "not_blank")
    )]
    pub nome_empresa: String,
    pub razao_social: Option<String>,
    #[validate(length(max = 20))]
    pub cnpj: Option<String>,
    #[validate(length(max = 20))]
    pub creci: Option<String>,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub telefone: String,
    #[validate(custom(function = "validate_phone"))]
    pub whatsapp: Option<String>,
    pub endereco: Option<String>,
    pub bairro: Option<String>,
    pub cidade: Option<String>,
    #[validate(length(max = 2))]
    pub estado: Option<String>,
    #[validate(length(max = 9))]
    pub cep: Option<String>,
    #[validate(url)]
    pub facebook: Option<String>,
    #[validate(url)]
    pub instagram: Option<String>,
    #[validate(url)]
    pub youtube: Option<String>,
    #[validate(url)]
    pub linkedin: Option<String>,
    #[serde(default = "default_status")]
    pub status: bool,
}

impl SiteConfigForm {
    /// Normalise blank optional fields before they are validated and stored
    fn normalized(self) -> Self {
        Self {
            razao_social: non_blank(self.razao_social),
            cnpj: non_blank(self.cnpj),
            creci: non_blank(self.creci),
            whatsapp: non_blank(self.whatsapp),
            endereco: non_blank(self.endereco),
            bairro: non_blank(self.bairro),
            cidade: non_blank(self.cidade),
            estado: non_blank(self.estado).map(|s| s.to_uppercase()),
            cep: non_blank(self.cep),
            facebook: non_blank(self.facebook),
            instagram: non_blank(self.instagram),
            youtube: non_blank(self.youtube),
            linkedin: non_blank(self.linkedin),
            ..self
        }
    }

    fn apply(self, entity: &mut site_config::ActiveModel) {
        entity.nome_empresa = Set(self.nome_empresa.trim().to_string());
        entity.razao_social = Set(self.razao_social);
        entity.cnpj = Set(self.cnpj);
        entity.creci = Set(self.creci);
        entity.email = Set(self.email.trim().to_string());
        entity.telefone = Set(self.telefone.trim().to_string());
        entity.whatsapp = Set(self.whatsapp);
        entity.endereco = Set(self.endereco);
        entity.bairro = Set(self.bairro);
        entity.cidade = Set(self.cidade);
        entity.estado = Set(self.estado);
        entity.cep = Set(self.cep);
        entity.facebook = Set(self.facebook);
        entity.instagram = Set(self.instagram);
        entity.youtube = Set(self.youtube);
        entity.linkedin = Set(self.linkedin);
        entity.status = Set(self.status);
    }
}

/// The configuration row, if one was created
pub async fn get(db: &DatabaseConnection) -> anyhow::Result<Option<site_config::Model>> {
    let config = site_config::Entity::find_by_id(SITE_CONFIG_ID)
        .one(db)
        .await?;

    Ok(config)
}

pub struct SiteConfigService;

#[async_trait]
impl AdminResource for SiteConfigService {
    type Entity = site_config::Entity;
    type Model = site_config::Model;
    type Form = SiteConfigForm;

    const NAME: &'static str = "site configuration";

    async fn list(db: &DatabaseConnection) -> anyhow::Result<Vec<site_config::Model>> {
        Ok(get(db).await?.into_iter().collect())
    }

    async fn find(db: &DatabaseConnection, id: i32) -> anyhow::Result<site_config::Model> {
        site_config::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ImobiError::not_found(format!("site configuration {}", id)).into())
    }

    async fn create(
        db: &DatabaseConnection,
        form: SiteConfigForm,
    ) -> anyhow::Result<site_config::Model> {
        let form = form.normalized();
        validate_form(&form)?;

        if get(db).await?.is_some() {
            return Err(ImobiError::AlreadyExists(ALREADY_EXISTS.to_string()).into());
        }

        let now = chrono::Utc::now().naive_utc();
        let mut entity = site_config::ActiveModel {
            id: Set(SITE_CONFIG_ID),
            criado_em: Set(now),
            atualizado_em: Set(now),
            ..Default::default()
        };
        form.apply(&mut entity);

        let model = entity.insert(db).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                warn!("Concurrent site configuration insert rejected");
                anyhow::Error::from(ImobiError::AlreadyExists(ALREADY_EXISTS.to_string()))
            }
            _ => e.into(),
        })?;

        info!("Site configuration created");

        Ok(model)
    }

    async fn update(
        db: &DatabaseConnection,
        id: i32,
        form: SiteConfigForm,
    ) -> anyhow::Result<site_config::Model> {
        let form = form.normalized();
        validate_form(&form)?;

        let mut entity: site_config::ActiveModel = Self::find(db, id).await?.into();
        form.apply(&mut entity);
        entity.atualizado_em = Set(chrono::Utc::now().naive_utc());

        let model = entity.update(db).await?;

        info!("Site configuration updated");

        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_db;

    fn form() -> SiteConfigForm {
        SiteConfigForm {
            nome_empresa: "Imobiliária Piracicaba".to_string(),
            razao_social: Some(String::new()),
            cnpj: None,
            creci: Some("J-12345".to_string()),
            email: "contato@imobi.test".to_string(),
            telefone: "(19) 3422-0000".to_string(),
            whatsapp: Some("19 99999-0000".to_string()),
            endereco: None,
            bairro: None,
            cidade: Some("Piracicaba".to_string()),
            estado: Some("sp".to_string()),
            cep: None,
            facebook: Some("https://facebook.com/imobi".to_string()),
            instagram: None,
            youtube: Some(" ".to_string()),
            linkedin: None,
            status: true,
        }
    }

    #[tokio::test]
    async fn test_second_create_fails_with_already_exists() {
        let db = memory_db().await;

        let created = SiteConfigService::create(&db, form()).await.unwrap();
        assert_eq!(created.id, SITE_CONFIG_ID);
        assert_eq!(created.estado.as_deref(), Some("SP"));
        assert_eq!(created.razao_social, None);
        assert_eq!(created.youtube, None);

        let err = SiteConfigService::create(&db, form()).await.unwrap_err();
        assert_eq!(err.to_string(), "site configuration already exists");
        assert!(matches!(
            err.downcast_ref::<ImobiError>(),
            Some(ImobiError::AlreadyExists(_))
        ));

        assert_eq!(SiteConfigService::list(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_get_and_update() {
        let db = memory_db().await;
        assert!(get(&db).await.unwrap().is_none());

        SiteConfigService::create(&db, form()).await.unwrap();
        let mut changed = form();
        changed.telefone = "(19) 3433-1111".to_string();
        SiteConfigService::update(&db, SITE_CONFIG_ID, changed)
            .await
            .unwrap();

        let config = get(&db).await.unwrap().unwrap();
        assert_eq!(config.telefone, "(19) 3433-1111");
    }

    #[tokio::test]
    async fn test_recreate_after_delete() {
        let db = memory_db().await;
        SiteConfigService::create(&db, form()).await.unwrap();

        let outcome = SiteConfigService::delete(&db, &[SITE_CONFIG_ID]).await;
        assert!(outcome.is_complete());

        assert!(SiteConfigService::create(&db, form()).await.is_ok());
    }
}
