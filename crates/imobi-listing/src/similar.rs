//! Similar listings by price band
//!
//! Candidates share the base listing's city, purpose and category, carry a
//! status compatible with the modality and are priced within 15% of the base
//! price. The closest prices win.

use imobi_common::ImobiError;
use tracing::debug;

use crate::model::{Listing, Modality};
use crate::store::{CandidateQuery, ListingStore};

/// Maximum number of candidates read from the store
pub const CANDIDATE_LIMIT: usize = 100;

/// Number of similar listings returned
pub const SIMILAR_COUNT: usize = 4;

/// Inclusive price band, 85% to 115% of `base`
pub fn price_band(base: f64) -> (f64, f64) {
    (base * 85.0 / 100.0, base * 115.0 / 100.0)
}

pub async fn find_similar(
    store: &dyn ListingStore,
    code: &str,
    modality: Option<Modality>,
) -> anyhow::Result<Vec<Listing>> {
    let base = store
        .find_listing(code)
        .await?
        .ok_or_else(|| ImobiError::not_found(format!("listing {}", code)))?;

    let modality = modality.unwrap_or_else(|| base.inferred_modality());
    let base_price = base.price(modality).ok_or_else(|| {
        ImobiError::InvalidData(format!("listing {} has no valid price", code))
    })?;
    let (low, high) = price_band(base_price);

    let query = CandidateQuery {
        cidade: base.cidade.clone(),
        finalidade: base.finalidade.clone(),
        categoria: base.categoria.clone(),
        statuses: modality.statuses().iter().map(|s| s.to_string()).collect(),
        exclude_code: Some(base.codigo.clone()),
        limit: CANDIDATE_LIMIT,
    };
    let candidates = store.find_candidates(&query).await?;
    let scanned = candidates.len();

    let mut ranked: Vec<(f64, Listing)> = candidates
        .into_iter()
        .filter(|c| c.codigo != base.codigo)
        .filter_map(|c| {
            let price = c.price(modality)?;
            (low..=high)
                .contains(&price)
                .then(|| ((price - base_price).abs(), c))
        })
        .collect();

    ranked.sort_by(|(da, a), (db, b)| da.total_cmp(db).then_with(|| a.codigo.cmp(&b.codigo)));
    ranked.truncate(SIMILAR_COUNT);

    debug!(
        code,
        modality = %modality,
        base_price,
        scanned,
        selected = ranked.len(),
        "Similar listings selected"
    );

    Ok(ranked.into_iter().map(|(_, listing)| listing).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryListingStore;

    fn listing(code: &str, venda: Option<f64>, status: &str) -> Listing {
        Listing {
            codigo: code.to_string(),
            cidade: Some("Piracicaba".to_string()),
            finalidade: Some("RESIDENCIAL".to_string()),
            categoria: Some("Apartamento".to_string()),
            status: Some(status.to_string()),
            valor_venda: venda,
            ..Default::default()
        }
    }

    async fn store_with(listings: Vec<Listing>) -> MemoryListingStore {
        let store = MemoryListingStore::new();
        for l in &listings {
            store.upsert_listing(l).await.unwrap();
        }
        store
    }

    fn codes(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.codigo.as_str()).collect()
    }

    #[test]
    fn test_price_band() {
        assert_eq!(price_band(200_000.0), (170_000.0, 230_000.0));
    }

    #[tokio::test]
    async fn test_band_edges() {
        let store = store_with(vec![
            listing("base", Some(200_000.0), "VENDA"),
            listing("in", Some(229_999.0), "VENDA"),
            listing("edge", Some(230_000.0), "VENDA"),
            listing("out", Some(230_001.0), "VENDA"),
            listing("low", Some(169_999.0), "VENDA"),
        ])
        .await;

        let similar = find_similar(&store, "base", None).await.unwrap();
        assert_eq!(codes(&similar), vec!["in", "edge"]);
    }

    #[tokio::test]
    async fn test_excludes_base_listing() {
        let store = store_with(vec![
            listing("base", Some(200_000.0), "VENDA"),
            listing("twin", Some(200_000.0), "VENDA"),
        ])
        .await;

        let similar = find_similar(&store, "base", None).await.unwrap();
        assert_eq!(codes(&similar), vec!["twin"]);
    }

    #[tokio::test]
    async fn test_ranked_by_price_delta() {
        let store = store_with(vec![
            listing("base", Some(200_000.0), "VENDA"),
            listing("d500", Some(200_500.0), "VENDA"),
            listing("d100", Some(199_900.0), "VENDA"),
            listing("d9000", Some(209_000.0), "VENDA"),
        ])
        .await;

        let similar = find_similar(&store, "base", None).await.unwrap();
        assert_eq!(codes(&similar), vec!["d100", "d500", "d9000"]);
    }

    #[tokio::test]
    async fn test_returns_top_four_with_ties_by_code() {
        let mut listings = vec![listing("base", Some(100_000.0), "VENDA")];
        for code in ["f", "e", "d", "c", "b", "a"] {
            listings.push(listing(code, Some(101_000.0), "VENDA"));
        }
        let store = store_with(listings).await;

        let similar = find_similar(&store, "base", None).await.unwrap();
        assert_eq!(codes(&similar), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_status_and_category_must_match() {
        let mut other_category = listing("casa", Some(200_000.0), "VENDA");
        other_category.categoria = Some("Casa".to_string());
        let store = store_with(vec![
            listing("base", Some(200_000.0), "VENDA"),
            listing("rented", Some(200_000.0), "ALUGUEL"),
            listing("both", Some(201_000.0), "VENDA E ALUGUEL"),
            other_category,
        ])
        .await;

        let similar = find_similar(&store, "base", None).await.unwrap();
        assert_eq!(codes(&similar), vec!["both"]);
    }

    #[tokio::test]
    async fn test_explicit_rental_modality() {
        let mut base = listing("base", Some(500_000.0), "VENDA E ALUGUEL");
        base.valor_locacao = Some(2_000.0);
        let mut rental = listing("r1", None, "ALUGUEL");
        rental.valor_locacao = Some(2_200.0);
        let store = store_with(vec![base, rental]).await;

        let similar = find_similar(&store, "base", Some(Modality::Aluguel))
            .await
            .unwrap();
        assert_eq!(codes(&similar), vec!["r1"]);
    }

    #[tokio::test]
    async fn test_errors() {
        let store = store_with(vec![listing("noprice", None, "VENDA")]).await;

        let err = find_similar(&store, "missing", None).await.unwrap_err();
        assert_eq!(err.to_string(), "listing missing not found");

        let err = find_similar(&store, "noprice", None).await.unwrap_err();
        assert_eq!(err.to_string(), "invalid data: listing noprice has no valid price");
    }
}
