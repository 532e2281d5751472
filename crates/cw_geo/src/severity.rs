/// Base severity per threat type. Unlisted threats score 1.
const BASE_SEVERITY: &[(&str, u8)] = &[
    ("Ransomware", 5),
    ("Zero-day Vulnerability", 5),
    ("APT", 5),
    ("Data Breach", 4),
    ("Supply Chain Attack", 4),
    ("Malware", 4),
    ("Phishing", 3),
    ("Social Engineering", 3),
    ("Insider Threat", 3),
    ("DDoS", 2),
    ("Other", 1),
];

/// Categories whose targets warrant a severity bump.
const ELEVATED_CATEGORIES: &[&str] =
    &["Critical Infrastructure", "Government", "Healthcare", "Financial"];

pub const MAX_SEVERITY: u8 = 5;

/// Severity score in 1..=5 for a threat type, bumped by one (capped) when the
/// article's category targets elevated sectors.
pub fn threat_severity(threat_type: &str, category: Option<&str>) -> u8 {
    let base = BASE_SEVERITY
        .iter()
        .find(|(threat, _)| *threat == threat_type)
        .map(|(_, severity)| *severity)
        .unwrap_or(1);

    match category {
        Some(category) if ELEVATED_CATEGORIES.contains(&category) => {
            (base + 1).min(MAX_SEVERITY)
        }
        _ => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_severities() {
        assert_eq!(threat_severity("Ransomware", None), 5);
        assert_eq!(threat_severity("DDoS", None), 2);
        assert_eq!(threat_severity("Other", None), 1);
    }

    #[test]
    fn test_unknown_threat_defaults_to_one() {
        assert_eq!(threat_severity("Carrier Pigeon Interception", None), 1);
        assert_eq!(threat_severity("", None), 1);
    }

    #[test]
    fn test_category_modifier() {
        assert_eq!(threat_severity("Phishing", Some("Healthcare")), 4);
        assert_eq!(threat_severity("Phishing", Some("Industry News")), 3);
    }

    #[test]
    fn test_modifier_never_exceeds_cap() {
        // min(5, 5 + 1) = 5
        assert_eq!(threat_severity("Ransomware", Some("Healthcare")), 5);
        assert_eq!(threat_severity("APT", Some("Government")), 5);
    }

    #[test]
    fn test_all_scores_within_range() {
        let threats = [
            "Ransomware",
            "Zero-day Vulnerability",
            "Data Breach",
            "Supply Chain Attack",
            "Phishing",
            "Social Engineering",
            "DDoS",
            "Insider Threat",
            "Other",
            "unknown",
        ];
        let categories = [None, Some("Healthcare"), Some("Financial"), Some("Privacy")];

        for threat in threats {
            for category in categories {
                let severity = threat_severity(threat, category);
                assert!((1..=MAX_SEVERITY).contains(&severity));
            }
        }
    }
}
