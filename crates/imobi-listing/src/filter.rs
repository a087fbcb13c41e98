//! Search filter parsed from the query string of `/busca`
//!
//! Values are kept as the visitor typed them. Numeric thresholds stay strings
//! here and are only checked when the upstream query is built.

use std::collections::HashMap;

use imobi_common::{DEFAULT_CITY, parse_flag, split_list};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::warn;

use crate::model::{Action, Modality};

/// Separator for list-valued parameters (`tipos`, `bairros`, `caracteristicas`)
pub const LIST_SEPARATOR: char = ',';

/// Fields requested from the listing API for search results and sync
pub const LISTING_FIELDS: [&str; 21] = [
    "Codigo",
    "Cidade",
    "Bairro",
    "Categoria",
    "Finalidade",
    "Status",
    "ValorVenda",
    "ValorLocacao",
    "Dormitorios",
    "Suites",
    "Vagas",
    "AreaTotal",
    "AreaPrivativa",
    "FotoDestaque",
    "DataHoraAtualizacao",
    "Lancamento",
    "Mobiliado",
    "Endereco",
    "DescricaoWeb",
    "TituloSite",
    "Caracteristicas",
];

/// Amenities may not name a field the query already filters or returns
fn is_reserved_field(name: &str) -> bool {
    LISTING_FIELDS
        .iter()
        .any(|field| field.eq_ignore_ascii_case(name))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortKey {
    #[default]
    ImovelRecente,
    MenorValor,
    MaiorValor,
    MenorArea,
    MaiorArea,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::ImovelRecente,
        SortKey::MenorValor,
        SortKey::MaiorValor,
        SortKey::MenorArea,
        SortKey::MaiorArea,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::ImovelRecente => "ImovelRecente",
            SortKey::MenorValor => "MenorValor",
            SortKey::MaiorValor => "MaiorValor",
            SortKey::MenorArea => "MenorArea",
            SortKey::MaiorArea => "MaiorArea",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::ImovelRecente => "Mais recentes",
            SortKey::MenorValor => "Menor valor",
            SortKey::MaiorValor => "Maior valor",
            SortKey::MenorArea => "Menor área",
            SortKey::MaiorArea => "Maior área",
        }
    }

    /// Unknown keys fall back to the most recent listings
    pub fn parse(raw: &str) -> Self {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(raw.trim()))
            .unwrap_or_default()
    }

    fn order(&self, modality: Modality) -> (&'static str, &'static str) {
        match self {
            SortKey::ImovelRecente => ("DataHoraAtualizacao", "desc"),
            SortKey::MenorValor => (modality.price_field(), "asc"),
            SortKey::MaiorValor => (modality.price_field(), "desc"),
            SortKey::MenorArea => ("AreaPrivativa", "asc"),
            SortKey::MaiorArea => ("AreaPrivativa", "desc"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Paginacao {
    pub pagina: u32,
    pub quantidade: u32,
}

/// Query document sent to the listing API as the `pesquisa` parameter
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Pesquisa {
    pub fields: Vec<Value>,
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub filter: Map<String, Value>,
    #[serde(skip_serializing_if = "Map::is_empty", default)]
    pub order: Map<String, Value>,
    pub paginacao: Paginacao,
}

impl Pesquisa {
    /// Unfiltered query over every listing, used by the sync
    pub fn all(page_size: u32) -> Self {
        Self {
            fields: LISTING_FIELDS.iter().map(|f| Value::from(*f)).collect(),
            filter: Map::new(),
            order: Map::new(),
            paginacao: Paginacao {
                pagina: 1,
                quantidade: page_size,
            },
        }
    }

    pub fn with_page(mut self, pagina: u32) -> Self {
        self.paginacao.pagina = pagina;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilter {
    pub acao: Action,
    pub tipos: Vec<String>,
    pub cidade: String,
    pub bairros: Vec<String>,
    pub valor_min: String,
    pub valor_max: String,
    pub dormitorios: String,
    pub suites: String,
    pub vagas: String,
    pub caracteristicas: Vec<String>,
    pub lancamento: bool,
    pub mobiliado: bool,
    pub codigo: String,
    pub pagina: u32,
    pub ordem: SortKey,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            acao: Action::Comprar,
            tipos: Vec::new(),
            cidade: DEFAULT_CITY.to_string(),
            bairros: Vec::new(),
            valor_min: String::new(),
            valor_max: String::new(),
            dormitorios: String::new(),
            suites: String::new(),
            vagas: String::new(),
            caracteristicas: Vec::new(),
            lancamento: false,
            mobiliado: false,
            codigo: String::new(),
            pagina: 1,
            ordem: SortKey::ImovelRecente,
        }
    }
}

fn threshold(value: &str, param: &str) -> Option<f64> {
    if value.is_empty() {
        return None;
    }
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() => Some(n),
        _ => {
            warn!(param, value, "Ignoring non-numeric search threshold");
            None
        }
    }
}

/// Integral amounts go upstream as integers
fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        Value::from(n as i64)
    } else {
        Value::from(n)
    }
}

impl SearchFilter {
    /// Build a fully defaulted filter from raw query parameters
    pub fn parse(params: &HashMap<String, String>) -> Self {
        let text = |key: &str| {
            params
                .get(key)
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };
        let list = |key: &str| {
            params
                .get(key)
                .map(|v| split_list(v, LIST_SEPARATOR))
                .unwrap_or_default()
        };
        let flag = |key: &str| params.get(key).map(|v| parse_flag(v)).unwrap_or(false);

        let defaults = Self::default();
        let cidade = text("cidade");

        Self {
            acao: params
                .get("acao")
                .map(|v| Action::parse(v))
                .unwrap_or(defaults.acao),
            tipos: list("tipos"),
            cidade: if cidade.is_empty() { defaults.cidade } else { cidade },
            bairros: list("bairros"),
            valor_min: text("valorMin"),
            valor_max: text("valorMax"),
            dormitorios: text("dormitorios"),
            suites: text("suites"),
            vagas: text("vagas"),
            caracteristicas: list("caracteristicas"),
            lancamento: flag("lancamento"),
            mobiliado: flag("mobiliado"),
            codigo: text("codigo"),
            pagina: params
                .get("pagina")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|p| *p > 0)
                .unwrap_or(defaults.pagina),
            ordem: params
                .get("ordem")
                .map(|v| SortKey::parse(v))
                .unwrap_or(defaults.ordem),
        }
    }

    pub fn modality(&self) -> Modality {
        self.acao.modality()
    }

    /// Listing API query for this filter
    pub fn to_pesquisa(&self, page_size: u32) -> Pesquisa {
        let modality = self.modality();
        let mut filter = Map::new();

        if !self.codigo.is_empty() {
            filter.insert("Codigo".to_string(), Value::from(self.codigo.clone()));
        } else {
            filter.insert("Status".to_string(), json!(modality.statuses()));
            filter.insert("Cidade".to_string(), Value::from(self.cidade.clone()));

            if !self.tipos.is_empty() {
                filter.insert("Categoria".to_string(), json!(self.tipos));
            }
            if !self.bairros.is_empty() {
                filter.insert("Bairro".to_string(), json!(self.bairros));
            }

            let min = threshold(&self.valor_min, "valorMin");
            let max = threshold(&self.valor_max, "valorMax");
            let range = match (min, max) {
                (Some(min), Some(max)) => Some(json!([number_value(min), number_value(max)])),
                (Some(min), None) => Some(json!([">=", number_value(min)])),
                (None, Some(max)) => Some(json!(["<=", number_value(max)])),
                (None, None) => None,
            };
            if let Some(range) = range {
                filter.insert(modality.price_field().to_string(), range);
            }

            for (field, param, value) in [
                ("Dormitorios", "dormitorios", &self.dormitorios),
                ("Suites", "suites", &self.suites),
                ("Vagas", "vagas", &self.vagas),
            ] {
                if let Some(n) = threshold(value, param) {
                    filter.insert(field.to_string(), json!([">=", number_value(n)]));
                }
            }

            for amenity in &self.caracteristicas {
                if is_reserved_field(amenity) || filter.contains_key(amenity) {
                    warn!(amenity = %amenity, "Amenity names a listing field, ignoring");
                    continue;
                }
                filter.insert(amenity.clone(), Value::from("Sim"));
            }
            if self.lancamento {
                filter.insert("Lancamento".to_string(), Value::from("Sim"));
            }
            if self.mobiliado {
                filter.insert("Mobiliado".to_string(), Value::from("Sim"));
            }
        }

        let (field, direction) = self.ordem.order(modality);
        let mut order = Map::new();
        order.insert(field.to_string(), Value::from(direction));

        Pesquisa {
            fields: LISTING_FIELDS.iter().map(|f| Value::from(*f)).collect(),
            filter,
            order,
            paginacao: Paginacao {
                pagina: self.pagina,
                quantidade: page_size,
            },
        }
    }

    /// Query string reproducing this filter on another page
    pub fn to_query_string(&self, pagina: u32) -> String {
        let defaults = Self::default();
        let mut pairs: Vec<(&str, String)> = vec![("acao", self.acao.as_str().to_string())];

        let join = |values: &[String]| values.join(&LIST_SEPARATOR.to_string());

        if !self.tipos.is_empty() {
            pairs.push(("tipos", join(&self.tipos)));
        }
        if self.cidade != defaults.cidade {
            pairs.push(("cidade", self.cidade.clone()));
        }
        if !self.bairros.is_empty() {
            pairs.push(("bairros", join(&self.bairros)));
        }
        for (key, value) in [
            ("valorMin", &self.valor_min),
            ("valorMax", &self.valor_max),
            ("dormitorios", &self.dormitorios),
            ("suites", &self.suites),
            ("vagas", &self.vagas),
            ("codigo", &self.codigo),
        ] {
            if !value.is_empty() {
                pairs.push((key, value.clone()));
            }
        }
        if !self.caracteristicas.is_empty() {
            pairs.push(("caracteristicas", join(&self.caracteristicas)));
        }
        if self.lancamento {
            pairs.push(("lancamento", "sim".to_string()));
        }
        if self.mobiliado {
            pairs.push(("mobiliado", "sim".to_string()));
        }
        if self.ordem != defaults.ordem {
            pairs.push(("ordem", self.ordem.as_str().to_string()));
        }
        if pagina > 1 {
            pairs.push(("pagina", pagina.to_string()));
        }

        serde_urlencoded::to_string(&pairs).unwrap_or_default()
    }
}
