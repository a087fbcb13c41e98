//! Lead capture for the public forms
//!
//! Every form posts a [`LeadForm`]; the [`FormKind`] decides which fields are
//! mandatory. Accepted leads are stored as one `formularios` row with the
//! type-specific fields serialised into `detalhes`.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use imobi_common::{ImobiError, ORGANIC_ORIGIN};
use imobi_persistence::entity::form_submission;
use imobi_persistence::{BulkOutcome, Page, bulk};
use sea_orm::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;
use validator::Validate;

use crate::validation::{non_blank, validate_form, validate_phone};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Contato,
    Agendamento,
    Anuncie,
    Whatsapp,
    Financiamento,
    Informacao,
}

impl FormKind {
    pub const ALL: [FormKind; 6] = [
        FormKind::Contato,
        FormKind::Agendamento,
        FormKind::Anuncie,
        FormKind::Whatsapp,
        FormKind::Financiamento,
        FormKind::Informacao,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::Contato => "contato",
            FormKind::Agendamento => "agendamento",
            FormKind::Anuncie => "anuncie",
            FormKind::Whatsapp => "whatsapp",
            FormKind::Financiamento => "financiamento",
            FormKind::Informacao => "informacao",
        }
    }

    fn requires_message(&self) -> bool {
        matches!(
            self,
            FormKind::Contato | FormKind::Informacao | FormKind::Anuncie
        )
    }
}

impl Display for FormKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = ImobiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ImobiError::IllegalArgument(format!("unknown form type '{}'", s)))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LeadForm {
    #[validate(length(min = 1, max = 150, message = "nome is required"))]
    pub nome: String,
    #[validate(email(message = "email is invalid"))]
    pub email: String,
    #[validate(custom(function = "validate_phone"))]
    pub telefone: String,
    #[validate(length(max = 5000))]
    pub mensagem: Option<String>,
    #[validate(length(max = 30))]
    pub codigo_imovel: Option<String>,
    #[validate(length(max = 1000))]
    pub url: Option<String>,

    /// Visit date, `YYYY-MM-DD`
    pub data_visita: Option<String>,
    pub horario_visita: Option<String>,
    /// Address of the property offered on the "anuncie" form
    pub endereco: Option<String>,
    #[validate(range(min = 0.0))]
    pub valor_imovel: Option<f64>,
    #[validate(range(min = 0.0))]
    pub valor_entrada: Option<f64>,
    #[validate(range(min = 1, max = 600))]
    pub prazo_meses: Option<u32>,
    #[validate(range(min = 0.0))]
    pub renda_mensal: Option<f64>,
}

fn missing(field: &str) -> ImobiError {
    ImobiError::InvalidData(format!("{}: required", field))
}

impl LeadForm {
    fn normalized(self) -> Self {
        Self {
            nome: self.nome.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            telefone: self.telefone.trim().to_string(),
            mensagem: non_blank(self.mensagem),
            codigo_imovel: non_blank(self.codigo_imovel),
            url: non_blank(self.url),
            data_visita: non_blank(self.data_visita),
            horario_visita: non_blank(self.horario_visita),
            endereco: non_blank(self.endereco),
            ..self
        }
    }

    /// Check the fields every form needs plus the ones `kind` adds
    pub fn validate_for(&self, kind: FormKind) -> Result<(), ImobiError> {
        validate_form(self)?;

        if kind.requires_message() && self.mensagem.is_none() {
            return Err(missing("mensagem"));
        }

        match kind {
            FormKind::Agendamento => {
                if self.codigo_imovel.is_none() {
                    return Err(missing("codigoImovel"));
                }
                let date = self.data_visita.as_deref().ok_or_else(|| missing("dataVisita"))?;
                chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                    ImobiError::InvalidData(format!("dataVisita: '{}' is not a date", date))
                })?;
            }
            FormKind::Anuncie => {
                if self.endereco.is_none() {
                    return Err(missing("endereco"));
                }
            }
            FormKind::Financiamento => match self.valor_imovel {
                Some(valor) if valor > 0.0 => {}
                _ => return Err(missing("valorImovel")),
            },
            FormKind::Contato | FormKind::Whatsapp | FormKind::Informacao => {}
        }

        Ok(())
    }

    /// Type-specific fields as a JSON object, `None` when the form has none
    fn details(&self) -> Option<String> {
        let mut details = Map::new();
        let mut put = |key: &str, value: Option<Value>| {
            if let Some(value) = value {
                details.insert(key.to_string(), value);
            }
        };

        put("dataVisita", self.data_visita.clone().map(Value::from));
        put("horarioVisita", self.horario_visita.clone().map(Value::from));
        put("endereco", self.endereco.clone().map(Value::from));
        put("valorImovel", self.valor_imovel.map(Value::from));
        put("valorEntrada", self.valor_entrada.map(Value::from));
        put("prazoMeses", self.prazo_meses.map(Value::from));
        put("rendaMensal", self.renda_mensal.map(Value::from));

        if details.is_empty() {
            None
        } else {
            Some(Value::Object(details).to_string())
        }
    }
}

/// Validate and store a lead
pub async fn submit(
    db: &DatabaseConnection,
    kind: FormKind,
    form: LeadForm,
) -> anyhow::Result<form_submission::Model> {
    let form = form.normalized();
    form.validate_for(kind)?;

    let detalhes = form.details();
    let model = form_submission::ActiveModel {
        tipo: Set(kind.as_str().to_string()),
        origem: Set(ORGANIC_ORIGIN.to_string()),
        nome: Set(form.nome),
        email: Set(form.email),
        telefone: Set(form.telefone),
        mensagem: Set(form.mensagem),
        codigo_imovel: Set(form.codigo_imovel),
        url: Set(form.url),
        detalhes: Set(detalhes),
        criado_em: Set(chrono::Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(id = model.id, tipo = %kind, "Lead captured");

    Ok(model)
}

/// Leads newest first, optionally restricted to one form type
pub async fn search_page(
    db: &DatabaseConnection,
    kind: Option<FormKind>,
    page_no: u64,
    page_size: u64,
) -> anyhow::Result<Page<form_submission::Model>> {
    let page_no = page_no.max(1);
    let page_size = page_size.clamp(1, 500);

    let mut select = form_submission::Entity::find();
    if let Some(kind) = kind {
        select = select.filter(form_submission::Column::Tipo.eq(kind.as_str()));
    }

    let total_count = select.clone().count(db).await?;

    if total_count > 0 {
        let page_items = select
            .order_by_desc(form_submission::Column::CriadoEm)
            .order_by_desc(form_submission::Column::Id)
            .offset((page_no - 1) * page_size)
            .limit(page_size)
            .all(db)
            .await?;

        return Ok(Page::new(total_count, page_no, page_size, page_items));
    }

    Ok(Page::new(0, page_no, page_size, Vec::new()))
}

pub async fn find(db: &DatabaseConnection, id: i32) -> anyhow::Result<form_submission::Model> {
    form_submission::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ImobiError::not_found(format!("submission {}", id)).into())
}

pub async fn delete(db: &DatabaseConnection, ids: &[i32]) -> BulkOutcome {
    let outcome = bulk::delete::<form_submission::Entity>(db, ids).await;
    info!(
        succeeded = outcome.succeeded.len(),
        failed = outcome.failed.len(),
        "Submissions deleted"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_db;

    fn contact() -> LeadForm {
        LeadForm {
            nome: " Maria Silva ".to_string(),
            email: "Maria@Example.com".to_string(),
            telefone: "(19) 99999-0000".to_string(),
            mensagem: Some("Gostaria de mais informações".to_string()),
            url: Some("https://imobi.test/imovel/123".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_form_kind_from_str() {
        assert_eq!("contato".parse::<FormKind>().unwrap(), FormKind::Contato);
        assert_eq!(
            "Financiamento".parse::<FormKind>().unwrap(),
            FormKind::Financiamento
        );
        assert!("newsletter".parse::<FormKind>().is_err());
    }

    #[test]
    fn test_required_fields_per_kind() {
        let mut form = contact().normalized();
        assert!(form.validate_for(FormKind::Contato).is_ok());
        assert!(form.validate_for(FormKind::Whatsapp).is_ok());

        let err = form.validate_for(FormKind::Agendamento).unwrap_err();
        assert_eq!(err.to_string(), "invalid data: codigoImovel: required");

        form.codigo_imovel = Some("1234".to_string());
        let err = form.validate_for(FormKind::Agendamento).unwrap_err();
        assert_eq!(err.to_string(), "invalid data: dataVisita: required");

        form.data_visita = Some("31/12/2026".to_string());
        assert!(form.validate_for(FormKind::Agendamento).is_err());
        form.data_visita = Some("2026-12-31".to_string());
        assert!(form.validate_for(FormKind::Agendamento).is_ok());

        assert!(form.validate_for(FormKind::Anuncie).is_err());
        assert!(form.validate_for(FormKind::Financiamento).is_err());
        form.valor_imovel = Some(0.0);
        assert!(form.validate_for(FormKind::Financiamento).is_err());
        form.valor_imovel = Some(450_000.0);
        assert!(form.validate_for(FormKind::Financiamento).is_ok());
    }

    #[test]
    fn test_message_required_for_contact() {
        let form = LeadForm {
            mensagem: None,
            ..contact()
        };
        assert!(form.validate_for(FormKind::Contato).is_err());
        assert!(form.validate_for(FormKind::Whatsapp).is_ok());
    }

    #[tokio::test]
    async fn test_submit_stores_organic_lead() {
        let db = memory_db().await;

        let form = LeadForm {
            valor_imovel: Some(300_000.0),
            prazo_meses: Some(360),
            ..contact()
        };
        let stored = submit(&db, FormKind::Financiamento, form).await.unwrap();

        assert_eq!(stored.tipo, "financiamento");
        assert_eq!(stored.origem, "organic");
        assert_eq!(stored.nome, "Maria Silva");
        assert_eq!(stored.email, "maria@example.com");

        let details: Value = serde_json::from_str(stored.detalhes.as_deref().unwrap()).unwrap();
        assert_eq!(details["valorImovel"], 300_000.0);
        assert_eq!(details["prazoMeses"], 360);
        assert!(details.get("dataVisita").is_none());
    }

    #[tokio::test]
    async fn test_invalid_lead_is_not_stored() {
        let db = memory_db().await;
        let form = LeadForm {
            telefone: "123".to_string(),
            ..contact()
        };

        assert!(submit(&db, FormKind::Contato, form).await.is_err());
        assert_eq!(search_page(&db, None, 1, 10).await.unwrap().total_count, 0);
    }

    #[tokio::test]
    async fn test_search_page_filters_by_kind() {
        let db = memory_db().await;
        submit(&db, FormKind::Contato, contact()).await.unwrap();
        submit(&db, FormKind::Whatsapp, contact()).await.unwrap();
        let latest = submit(&db, FormKind::Contato, contact()).await.unwrap();

        let page = search_page(&db, Some(FormKind::Contato), 1, 10).await.unwrap();
        assert_eq!(page.total_count, 2);
        assert_eq!(page.page_items[0].id, latest.id);

        let page = search_page(&db, None, 2, 2).await.unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.pages_available, 2);
        assert_eq!(page.page_items.len(), 1);
    }

    #[tokio::test]
    async fn test_find_and_delete() {
        let db = memory_db().await;
        let stored = submit(&db, FormKind::Contato, contact()).await.unwrap();

        assert_eq!(find(&db, stored.id).await.unwrap().id, stored.id);

        let outcome = delete(&db, &[stored.id]).await;
        assert!(outcome.is_complete());
        assert!(find(&db, stored.id).await.is_err());
    }
}
