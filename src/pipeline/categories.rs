//! Ranking of category tokens among listings that carry a marker category.

use std::collections::HashMap;

use serde::Serialize;

use crate::data::model::Record;

/// Separator between tokens of the category field.
pub const CATEGORY_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Count category tokens over the listings whose category field contains
/// `marker`, returning the `limit` most frequent by descending count.
/// Equal counts keep the order in which tokens were first seen.
pub fn top_categories<'a, I>(records: I, marker: &str, limit: usize) -> Vec<CategoryCount>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut order: Vec<&'a str> = Vec::new();
    let mut counts: HashMap<&'a str, usize> = HashMap::new();

    let matching = records
        .into_iter()
        .filter_map(|r| r.categories.as_deref())
        .filter(|c| c.contains(marker));

    for categories in matching {
        for token in categories.split(CATEGORY_SEPARATOR) {
            let count = counts.entry(token).or_insert_with(|| {
                order.push(token);
                0
            });
            *count += 1;
        }
    }

    let mut ranked: Vec<CategoryCount> = order
        .into_iter()
        .map(|token| CategoryCount {
            category: token.to_string(),
            count: counts[token],
        })
        .collect();
    // Stable sort keeps first-seen order among ties.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(categories: Option<&str>) -> Record {
        Record {
            id: "c".to_string(),
            name: "n".to_string(),
            city: None,
            state: None,
            latitude: None,
            longitude: None,
            rating: 3.0,
            review_count: 1,
            categories: categories.map(str::to_string),
            hours: None,
        }
    }

    #[test]
    fn test_counts_only_marked_listings() {
        let records = [
            listing(Some("Pizza, Restaurants")),
            listing(Some("Restaurants, Mexican, Bars")),
            listing(Some("Bars, Nightlife")),
            listing(None),
            listing(Some("Mexican, Restaurants")),
        ];
        let ranked = top_categories(&records, "Restaurant", 10);

        let pairs: Vec<(&str, usize)> = ranked
            .iter()
            .map(|c| (c.category.as_str(), c.count))
            .collect();
        assert_eq!(
            pairs,
            vec![("Restaurants", 3), ("Mexican", 2), ("Pizza", 1), ("Bars", 1)]
        );
    }

    #[test]
    fn test_limit_and_descending_order() {
        let records: Vec<Record> = (0..15)
            .map(|i| {
                let tokens: Vec<String> = (0..=i).map(|t| format!("Tag{t}")).collect();
                listing(Some(&format!("Restaurants, {}", tokens.join(", "))))
            })
            .collect();
        let ranked = top_categories(&records, "Restaurant", 10);

        assert_eq!(ranked.len(), 10);
        assert!(ranked.windows(2).all(|w| w[0].count >= w[1].count));
        assert_eq!(ranked[0].category, "Restaurants");
        assert_eq!(ranked[1].category, "Tag0");
    }

    #[test]
    fn test_no_matches() {
        let records = [listing(Some("Hair Salons")), listing(None)];
        assert!(top_categories(&records, "Restaurant", 10).is_empty());
        assert!(top_categories(std::iter::empty::<&Record>(), "Restaurant", 10).is_empty());
    }
}
