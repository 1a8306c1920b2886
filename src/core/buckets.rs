//! Parsing of the bucketed string fields stored on profiles.
//!
//! Buckets come straight from onboarding dropdowns, so they are normalized
//! before comparison: lowercased, with `$`, commas and whitespace removed,
//! and a trailing "years"/"yrs" suffix dropped.

/// Normalize a bucket label for comparison
fn normalize(raw: &str) -> String {
    let mut value: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '$' && *c != ',')
        .collect::<String>()
        .to_lowercase();

    for suffix in ["years", "year", "yrs"] {
        if let Some(stripped) = value.strip_suffix(suffix) {
            value = stripped.to_string();
            break;
        }
    }

    value
}

/// Numeric experience level for a years-of-experience bucket
///
/// `5+` → 5, `3-5` → 4, `1-3` → 2, any other non-empty value → 1.
/// Missing or blank input is level 0 so it contributes nothing.
pub fn experience_level(bucket: Option<&str>) -> u8 {
    let Some(raw) = bucket else {
        return 0;
    };

    let value = normalize(raw);
    match value.as_str() {
        "" => 0,
        "5+" => 5,
        "3-5" => 4,
        "1-3" => 2,
        _ => 1,
    }
}

/// Fraction of the revenue weight earned by a monthly revenue bucket
///
/// Descending buckets map to 1.0, 0.8, 0.6, 0.4, 0.2; unknown or missing
/// buckets earn nothing.
pub fn revenue_fraction(bucket: Option<&str>) -> f64 {
    let Some(raw) = bucket else {
        return 0.0;
    };

    match normalize(raw).as_str() {
        "500k+" => 1.0,
        "100k-500k" => 0.8,
        "50k-100k" => 0.6,
        "10k-50k" => 0.4,
        "0-10k" => 0.2,
        _ => 0.0,
    }
}
