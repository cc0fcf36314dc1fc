use lcroute_types::{Route, SortedRoute, SortingData};

/// Rank by descending static weight; no external calls.
pub(crate) fn sort(candidates: &[Route]) -> Vec<SortedRoute> {
    let mut scored: Vec<(f64, SortedRoute)> = candidates
        .iter()
        .map(|route| {
            let data = SortingData {
                weight: Some(route.weight),
                ..SortingData::default()
            };
            (route.weight, super::entry(route, data))
        })
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));
    scored.into_iter().map(|(_, sr)| sr).collect()
}
