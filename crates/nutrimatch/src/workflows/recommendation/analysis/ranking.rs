use super::super::domain::ProductId;
use super::ScoredProduct;

/// Order by descending score. The sort is stable, so equal scores keep their
/// input (first-seen) order; no secondary key exists.
pub(crate) fn rank(mut scored: Vec<ScoredProduct>) -> Vec<ScoredProduct> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Prefix of the ranking offered as the recommendation set. Fewer than
/// `limit` eligible products yields all of them; an empty ranking yields an
/// empty selection, which callers treat as a first-class "no match" outcome.
pub(crate) fn select_top(ranked: &[ScoredProduct], limit: usize) -> Vec<ProductId> {
    ranked
        .iter()
        .take(limit)
        .map(|product| product.product_id)
        .collect()
}
