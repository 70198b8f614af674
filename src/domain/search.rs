use serde::Serialize;

use super::{
    rating::{Axis, RatingResult},
    restaurant::RestaurantRecord,
};

const KEYWORD_BONUS: f64 = 0.25;
const MAX_KEYWORD_BONUS: f64 = 0.5;

/// What a free-form query asks for. `importance` reuses the 1-5/null shape of
/// a rating: null means the query implies nothing about that axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchCriteria {
    pub importance: RatingResult,
    pub keywords: Vec<String>,
}

impl SearchCriteria {
    fn normalized_keywords(&self) -> Vec<String> {
        self.keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRestaurant {
    #[serde(flatten)]
    pub restaurant: RestaurantRecord,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub query: String,
    pub criteria: SearchCriteria,
    pub matches: Vec<RankedRestaurant>,
    /// Set when no restaurant could be scored against the query.
    /// `matches` then holds every restaurant, unranked.
    pub low_confidence: bool,
}

impl SearchResult {
    pub fn empty(query: &str) -> Self {
        SearchResult {
            query: query.to_string(),
            criteria: SearchCriteria::default(),
            matches: vec![],
            low_confidence: false,
        }
    }
}

/// Weighted mean of the known ratings, mapped onto [0, 1]. `None` when the
/// record shares no rated axis with the query.
fn axis_score(importance: &RatingResult, rating: &RatingResult) -> Option<f64> {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for axis in Axis::ALL {
        if let (Some(weight), Some(score)) = (importance.get(axis), rating.get(axis)) {
            let weight = weight.get() as f64;
            weighted += weight * (score.get() as f64 - 1.0) / 4.0;
            total_weight += weight;
        }
    }

    match total_weight > 0.0 {
        true => Some(weighted / total_weight),
        false => None,
    }
}

fn keyword_hits(keywords: &[String], restaurant: &RestaurantRecord) -> usize {
    let name = restaurant.store_name.to_lowercase();
    let appeal = restaurant
        .appeal_point
        .as_deref()
        .unwrap_or_default()
        .to_lowercase();

    keywords
        .iter()
        .filter(|k| name.contains(k.as_str()) || appeal.contains(k.as_str()))
        .count()
}

/// Scores every record against `criteria` and keeps the scorable ones.
///
/// A record is scorable when it has a rating on an axis the query cares about
/// or contains a keyword. A rating of 1 is scorable even though it scores 0.
/// When no record is scorable the result falls back to every record in id
/// order with `low_confidence` set.
pub fn rank_restaurants(
    query: &str,
    criteria: SearchCriteria,
    restaurants: Vec<RestaurantRecord>,
) -> SearchResult {
    let keywords = criteria.normalized_keywords();

    let mut scored: Vec<(RestaurantRecord, Option<f64>)> = restaurants
        .into_iter()
        .map(|r| {
            let hits = keyword_hits(&keywords, &r);
            let axis = axis_score(&criteria.importance, &r.rating);
            let score = match (axis, hits) {
                (None, 0) => None,
                (axis, hits) => {
                    let bonus = (hits as f64 * KEYWORD_BONUS).min(MAX_KEYWORD_BONUS);
                    Some(axis.unwrap_or(0.0) + bonus)
                }
            };
            (r, score)
        })
        .collect();

    if !scored.is_empty() && scored.iter().all(|(_, score)| score.is_none()) {
        scored.sort_by_key(|(r, _)| r.id);
        return SearchResult {
            query: query.to_string(),
            criteria,
            matches: scored
                .into_iter()
                .map(|(restaurant, _)| RankedRestaurant {
                    restaurant,
                    score: 0.0,
                })
                .collect(),
            low_confidence: true,
        };
    }

    let mut matches: Vec<RankedRestaurant> = scored
        .into_iter()
        .filter_map(|(restaurant, score)| score.map(|score| RankedRestaurant { restaurant, score }))
        .collect();
    matches.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.restaurant.id.cmp(&b.restaurant.id))
    });

    SearchResult {
        query: query.to_string(),
        criteria,
        matches,
        low_confidence: false,
    }
}
