//! Listing records as exchanged with the listing API and the document store
//!
//! Field names follow the listing API on the wire. Numeric fields arrive as
//! numbers, numeric strings or empty strings, so they are read leniently.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use imobi_common::ImobiError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Statuses a listing can carry while it is for sale
pub const SALE_STATUSES: [&str; 4] = ["VENDA", "Venda", "VENDA E ALUGUEL", "Venda e Aluguel"];

/// Statuses a listing can carry while it is for rent
pub const RENTAL_STATUSES: [&str; 4] = [
    "ALUGUEL",
    "Aluguel",
    "VENDA E ALUGUEL",
    "Venda e Aluguel",
];

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    #[serde(rename = "Foto", default, deserialize_with = "lenient_text")]
    pub foto: Option<String>,
    #[serde(
        rename = "FotoPequena",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub foto_pequena: Option<String>,
    #[serde(
        rename = "Destaque",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub destaque: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    #[serde(rename = "Codigo", deserialize_with = "code")]
    pub codigo: String,
    #[serde(
        rename = "Cidade",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub cidade: Option<String>,
    #[serde(
        rename = "Bairro",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub bairro: Option<String>,
    #[serde(
        rename = "Categoria",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub categoria: Option<String>,
    /// Purpose of the property, e.g. residential or commercial
    #[serde(
        rename = "Finalidade",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub finalidade: Option<String>,
    #[serde(
        rename = "Status",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<String>,
    #[serde(
        rename = "ValorVenda",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub valor_venda: Option<f64>,
    #[serde(
        rename = "ValorLocacao",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub valor_locacao: Option<f64>,
    #[serde(
        rename = "Dormitorios",
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub dormitorios: Option<u32>,
    #[serde(
        rename = "Suites",
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub suites: Option<u32>,
    #[serde(
        rename = "Vagas",
        default,
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub vagas: Option<u32>,
    #[serde(
        rename = "AreaTotal",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub area_total: Option<f64>,
    #[serde(
        rename = "AreaPrivativa",
        default,
        deserialize_with = "lenient_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub area_privativa: Option<f64>,
    #[serde(
        rename = "FotoDestaque",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub foto_destaque: Option<String>,
    #[serde(
        rename = "Foto",
        default,
        deserialize_with = "photos",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub fotos: Vec<Photo>,
    #[serde(
        rename = "DataHoraAtualizacao",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub data_hora_atualizacao: Option<String>,
    #[serde(
        rename = "Lancamento",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub lancamento: Option<String>,
    #[serde(
        rename = "Mobiliado",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub mobiliado: Option<String>,
    #[serde(
        rename = "Endereco",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub endereco: Option<String>,
    #[serde(
        rename = "DescricaoWeb",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub descricao_web: Option<String>,
    #[serde(
        rename = "TituloSite",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub titulo_site: Option<String>,
    /// Any other field returned by the listing API, kept as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Listing {
    pub fn price(&self, modality: Modality) -> Option<f64> {
        match modality {
            Modality::Venda => self.valor_venda,
            Modality::Aluguel => self.valor_locacao,
        }
        .filter(|v| *v > 0.0)
    }

    /// Modality implied by the listing itself: a positive sale price, then a
    /// positive rent, then the status text; sale when nothing decides.
    pub fn inferred_modality(&self) -> Modality {
        if self.price(Modality::Venda).is_some() {
            return Modality::Venda;
        }
        if self.price(Modality::Aluguel).is_some() {
            return Modality::Aluguel;
        }

        let status = self.status.as_deref().unwrap_or_default().to_uppercase();
        if status.contains("ALUGUEL") && !status.contains("VENDA") {
            Modality::Aluguel
        } else {
            Modality::Venda
        }
    }

    /// Main picture: the highlighted one, else the first of the gallery
    pub fn cover_photo(&self) -> Option<&str> {
        self.foto_destaque.as_deref().or_else(|| {
            self.fotos
                .iter()
                .find(|p| p.destaque.as_deref() == Some("Sim"))
                .or_else(|| self.fotos.first())
                .and_then(|p| p.foto.as_deref())
        })
    }
}

/// Transaction type of a listing
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Venda,
    Aluguel,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Venda => "venda",
            Modality::Aluguel => "aluguel",
        }
    }

    /// Listing field holding the price for this modality
    pub fn price_field(&self) -> &'static str {
        match self {
            Modality::Venda => "ValorVenda",
            Modality::Aluguel => "ValorLocacao",
        }
    }

    pub fn statuses(&self) -> &'static [&'static str] {
        match self {
            Modality::Venda => &SALE_STATUSES,
            Modality::Aluguel => &RENTAL_STATUSES,
        }
    }
}

impl Display for Modality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modality {
    type Err = ImobiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "venda" => Ok(Modality::Venda),
            "aluguel" => Ok(Modality::Aluguel),
            other => Err(ImobiError::InvalidData(format!(
                "modalidade must be 'venda' or 'aluguel', got '{}'",
                other
            ))),
        }
    }
}

/// What the visitor wants to do, as it appears in search URLs
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    Comprar,
    Alugar,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Comprar => "comprar",
            Action::Alugar => "alugar",
        }
    }

    pub fn modality(&self) -> Modality {
        match self {
            Action::Comprar => Modality::Venda,
            Action::Alugar => Modality::Aluguel,
        }
    }

    /// Unknown values fall back to buying
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "alugar" | "aluguel" | "locacao" => Action::Alugar,
            _ => Action::Comprar,
        }
    }
}

/// City document: neighbourhoods offered for a city
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct City {
    #[serde(rename = "_id")]
    pub id: String,
    pub nome: String,
    pub bairros: Vec<String>,
    #[serde(rename = "atualizadoEm")]
    pub atualizado_em: chrono::DateTime<chrono::Utc>,
}

/// Property categories available for each modality
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Categories {
    pub venda: Vec<String>,
    pub aluguel: Vec<String>,
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    }
}

fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value))
}

fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number(&value)
        .filter(|n| *n >= 0.0 && *n <= u32::MAX as f64)
        .map(|n| n as u32))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "invalid listing code: {}",
            other
        ))),
    }
}

/// The gallery comes either as an array or as an object keyed by position
fn photos<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Photo>, D::Error> {
    let entries: Vec<Value> = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Object(map) => {
            let mut items: Vec<(String, Value)> = map.into_iter().collect();
            items.sort_by_key(|(k, _)| k.parse::<u32>().unwrap_or(u32::MAX));
            items.into_iter().map(|(_, v)| v).collect()
        }
        _ => Vec::new(),
    };

    Ok(entries
        .into_iter()
        .filter_map(|v| serde_json::from_value::<Photo>(v).ok())
        .filter(|p| p.foto.is_some())
        .collect())
}

/// Read a pagination counter that may be a number or a numeric string
pub(crate) fn count(value: Option<&Value>) -> Option<u64> {
    value.and_then(number).filter(|n| *n >= 0.0).map(|n| n as u64)
}
