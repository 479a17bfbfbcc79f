use crate::data::BusinessType;
use std::collections::HashMap;

const ENTITY_MARKERS: &[&str] = &["llc", "inc", "corp", "ltd"];
const TRUST_MARKERS: &[&str] = &["trust", "estate"];

/// Classify an investor name by case-insensitive substring match.
///
/// Entity markers win over trust markers.
pub fn infer_business_type(name: &str) -> BusinessType {
    let name = name.to_lowercase();

    if ENTITY_MARKERS.iter().any(|m| name.contains(m)) {
        BusinessType::BusinessEntity
    } else if TRUST_MARKERS.iter().any(|m| name.contains(m)) {
        BusinessType::TrustOrEstate
    } else {
        BusinessType::Individual
    }
}

/// City segment of a `street, city, state zip` address: the second-to-last comma-separated part
pub fn city_of(address: &str) -> Option<&str> {
    let parts: Vec<&str> = address.split(',').collect();
    if parts.len() < 2 {
        return None;
    }
    let city = parts[parts.len() - 2].trim();
    if city.is_empty() {
        None
    } else {
        Some(city)
    }
}

/// Most frequent city across `addresses`; ties go to the city seen first.
/// Empty when no address carries a city.
pub fn infer_location<'a, I>(addresses: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    // city -> (count, first position)
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, city) in addresses.into_iter().filter_map(city_of).enumerate() {
        counts.entry(city).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then_with(|| first_b.cmp(first_a))
        })
        .map(|(city, _)| city.to_string())
        .unwrap_or_default()
}
