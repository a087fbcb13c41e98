//! Human readable titles for search pages and listings

use crate::filter::SearchFilter;
use crate::model::{Listing, Modality};

fn join_pt(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [init @ .., last] => format!("{} e {}", init.join(", "), last),
    }
}

fn modality_phrase(modality: Modality) -> &'static str {
    match modality {
        Modality::Venda => "à venda",
        Modality::Aluguel => "para alugar",
    }
}

fn location(filter: &SearchFilter) -> String {
    if filter.bairros.is_empty() {
        format!("em {}", filter.cidade)
    } else {
        format!("em {} - {}", filter.cidade, filter.bairros.join(", "))
    }
}

/// Page title such as "Apartamento e Casa à venda em Piracicaba - Centro"
pub fn search_title(filter: &SearchFilter) -> String {
    if !filter.codigo.is_empty() {
        return format!("Imóvel código {}", filter.codigo);
    }

    let subject = if filter.tipos.is_empty() {
        "Imóveis".to_string()
    } else {
        join_pt(&filter.tipos)
    };

    format!(
        "{} {} {}",
        subject,
        modality_phrase(filter.modality()),
        location(filter)
    )
}

/// Meta description for a search page with `total` results
pub fn search_description(filter: &SearchFilter, total: u64) -> String {
    let noun = if total == 1 { "imóvel" } else { "imóveis" };
    let subject = if filter.tipos.is_empty() {
        String::new()
    } else {
        format!(" ({})", join_pt(&filter.tipos).to_lowercase())
    };

    format!(
        "Encontramos {} {}{} {} {}. Veja fotos, valores e detalhes de cada imóvel.",
        total,
        noun,
        subject,
        modality_phrase(filter.modality()),
        location(filter)
    )
}

/// Title for a listing card or detail page
pub fn listing_title(listing: &Listing) -> String {
    if let Some(title) = listing.titulo_site.as_deref() {
        return title.to_string();
    }

    let mut title = listing
        .categoria
        .clone()
        .unwrap_or_else(|| "Imóvel".to_string());

    match listing.dormitorios {
        Some(1) => title.push_str(" com 1 dormitório"),
        Some(n) if n > 1 => title.push_str(&format!(" com {} dormitórios", n)),
        _ => {}
    }

    title.push(' ');
    title.push_str(modality_phrase(listing.inferred_modality()));

    match (listing.bairro.as_deref(), listing.cidade.as_deref()) {
        (Some(bairro), Some(cidade)) => title.push_str(&format!(" em {}, {}", bairro, cidade)),
        (None, Some(place)) | (Some(place), None) => title.push_str(&format!(" em {}", place)),
        (None, None) => {}
    }

    title
}
