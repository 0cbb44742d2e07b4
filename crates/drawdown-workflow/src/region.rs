//! Country to region routing.
//!
//! Country names are normalized to a canonical key before lookup: trimmed,
//! lower-cased, and with every run of whitespace, `-` or `_` collapsed into a
//! single `_`. Unknown countries yield `None`.

use drawdown_core::enums::Region;

const COUNTRY_REGIONS: &[(&str, Region)] = &[
    // Africa
    ("algeria", Region::Africa),
    ("angola", Region::Africa),
    ("benin", Region::Africa),
    ("botswana", Region::Africa),
    ("burkina_faso", Region::Africa),
    ("cameroon", Region::Africa),
    ("cote_d'ivoire", Region::Africa),
    ("democratic_republic_of_the_congo", Region::Africa),
    ("egypt", Region::Africa),
    ("ethiopia", Region::Africa),
    ("ghana", Region::Africa),
    ("kenya", Region::Africa),
    ("madagascar", Region::Africa),
    ("malawi", Region::Africa),
    ("mali", Region::Africa),
    ("morocco", Region::Africa),
    ("mozambique", Region::Africa),
    ("namibia", Region::Africa),
    ("nigeria", Region::Africa),
    ("rwanda", Region::Africa),
    ("senegal", Region::Africa),
    ("seychelles", Region::Africa),
    ("south_africa", Region::Africa),
    ("tanzania", Region::Africa),
    ("tunisia", Region::Africa),
    ("uganda", Region::Africa),
    ("zambia", Region::Africa),
    ("zimbabwe", Region::Africa),
    // Asia
    ("bangladesh", Region::Asia),
    ("cambodia", Region::Asia),
    ("china", Region::Asia),
    ("india", Region::Asia),
    ("indonesia", Region::Asia),
    ("japan", Region::Asia),
    ("kazakhstan", Region::Asia),
    ("malaysia", Region::Asia),
    ("mongolia", Region::Asia),
    ("nepal", Region::Asia),
    ("pakistan", Region::Asia),
    ("philippines", Region::Asia),
    ("singapore", Region::Asia),
    ("south_korea", Region::Asia),
    ("sri_lanka", Region::Asia),
    ("thailand", Region::Asia),
    ("uzbekistan", Region::Asia),
    ("vietnam", Region::Asia),
    // Europe & Latin America
    ("argentina", Region::EuropeLatinAmerica),
    ("bolivia", Region::EuropeLatinAmerica),
    ("brazil", Region::EuropeLatinAmerica),
    ("chile", Region::EuropeLatinAmerica),
    ("colombia", Region::EuropeLatinAmerica),
    ("costa_rica", Region::EuropeLatinAmerica),
    ("ecuador", Region::EuropeLatinAmerica),
    ("france", Region::EuropeLatinAmerica),
    ("germany", Region::EuropeLatinAmerica),
    ("guatemala", Region::EuropeLatinAmerica),
    ("italy", Region::EuropeLatinAmerica),
    ("mexico", Region::EuropeLatinAmerica),
    ("netherlands", Region::EuropeLatinAmerica),
    ("panama", Region::EuropeLatinAmerica),
    ("paraguay", Region::EuropeLatinAmerica),
    ("peru", Region::EuropeLatinAmerica),
    ("poland", Region::EuropeLatinAmerica),
    ("portugal", Region::EuropeLatinAmerica),
    ("spain", Region::EuropeLatinAmerica),
    ("turkey", Region::EuropeLatinAmerica),
    ("ukraine", Region::EuropeLatinAmerica),
    ("united_kingdom", Region::EuropeLatinAmerica),
    ("uruguay", Region::EuropeLatinAmerica),
];

/// Alternate spellings, resolved to a canonical key before lookup.
const ALIASES: &[(&str, &str)] = &[
    ("uk", "united_kingdom"),
    ("great_britain", "united_kingdom"),
    ("ivory_coast", "cote_d'ivoire"),
    ("drc", "democratic_republic_of_the_congo"),
    ("dr_congo", "democratic_republic_of_the_congo"),
    ("korea", "south_korea"),
];

/// Normalize a free-form country name into lookup-key form.
#[must_use]
pub fn normalize_country(country: &str) -> String {
    let mut key = String::with_capacity(country.len());
    let mut pending_sep = false;
    for ch in country.trim().chars() {
        if ch.is_whitespace() || ch == '-' || ch == '_' {
            pending_sep = true;
            continue;
        }
        if pending_sep && !key.is_empty() {
            key.push('_');
        }
        pending_sep = false;
        key.extend(ch.to_lowercase());
    }
    key
}

/// Canonical key for a country, following aliases. `None` if unsupported.
#[must_use]
pub fn canonical_country(country: &str) -> Option<&'static str> {
    let key = normalize_country(country);
    let key = ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key.as_str(), |(_, canonical)| *canonical);
    COUNTRY_REGIONS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(name, _)| *name)
}

/// Region responsible for `country`, or `None` if the country is unsupported.
#[must_use]
pub fn region_for(country: &str) -> Option<Region> {
    let key = canonical_country(country)?;
    COUNTRY_REGIONS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, region)| *region)
}

/// Canonical keys of every supported country, sorted.
#[must_use]
pub fn supported_countries() -> Vec<&'static str> {
    let mut names: Vec<_> = COUNTRY_REGIONS.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}

/// Supported countries routed to `region`, sorted.
#[must_use]
pub fn countries_in(region: Region) -> Vec<&'static str> {
    let mut names: Vec<_> = COUNTRY_REGIONS
        .iter()
        .filter(|(_, r)| *r == region)
        .map(|(name, _)| *name)
        .collect();
    names.sort_unstable();
    names
}
