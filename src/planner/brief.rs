use std::collections::BTreeMap;

/// Structured view of a one-sentence brief.
///
/// Briefs follow the loose form
/// `main idea; target: students; mood: warm; cta: 'wear your focus'`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BriefComponents {
    pub main_idea: String,
    pub target: String,
    pub mood: String,
    pub cta: String,
    /// Any other `key: value` parts, keys lower-cased
    pub extra: BTreeMap<String, String>,
}

pub fn parse_brief(brief: &str) -> BriefComponents {
    let mut components = BriefComponents::default();
    let mut parts = brief.split(';').map(str::trim);

    if let Some(first) = parts.next() {
        components.main_idea = first.trim_end_matches('.').trim().to_string();
    }

    for part in parts {
        let Some((key, value)) = part.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = clean_value(value);

        match key.as_str() {
            "target" => components.target = value,
            "mood" => components.mood = value,
            "cta" => components.cta = value,
            _ => {
                components.extra.insert(key, value);
            }
        }
    }

    components
}

fn clean_value(value: &str) -> String {
    value
        .trim()
        .trim_end_matches('.')
        .trim_matches(|c| c == '\'' || c == '"')
        .trim()
        .to_string()
}

/// Keyword match on the brief; `product` when nothing matches
pub fn infer_product_type(brief: &str) -> String {
    let lower = brief.to_lowercase();
    let product = if lower.contains("t-shirt") || lower.contains("shirt") {
        "t-shirt"
    } else if lower.contains("mug") {
        "mug"
    } else if lower.contains("sneaker") || lower.contains("shoe") {
        "sneaker"
    } else {
        "product"
    };
    product.to_string()
}
