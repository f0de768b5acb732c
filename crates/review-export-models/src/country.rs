// Country code lookups backed by the ISO-3166 table

use isocountry::CountryCode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CountryInfo {
    pub code2: String,
    pub code3: String,
    pub name: String,
}

/// Resolve a 2- or 3-letter country code.
///
/// Total: any field that cannot be resolved echoes the input code, so an
/// unknown code `"ZZ"` yields `{ code2: "ZZ", code3: "ZZ", name: "ZZ" }`.
/// A code of the matching length is echoed as given for its own field.
pub fn resolve_country(code: &str) -> CountryInfo {
    let known = lookup(code);

    let code2 = if code.len() == 2 {
        code.to_string()
    } else {
        known.as_ref().map(|c| c.alpha2().to_string()).unwrap_or_else(|| code.to_string())
    };
    let code3 = if code.len() == 3 {
        code.to_string()
    } else {
        known.as_ref().map(|c| c.alpha3().to_string()).unwrap_or_else(|| code.to_string())
    };
    let name = known
        .map(|c| c.name().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| code.to_string());

    CountryInfo { code2, code3, name }
}

fn lookup(code: &str) -> Option<CountryCode> {
    let upper = code.trim().to_ascii_uppercase();
    match upper.len() {
        2 => CountryCode::for_alpha2(&upper).ok(),
        3 => CountryCode::for_alpha3(&upper).ok(),
        _ => None,
    }
}
