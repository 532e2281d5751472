use cw_core::Source;

/// Registered cybersecurity news sources: name, index URL, region tag.
const SOURCES: &[(&str, &str, &str)] = &[
    ("Krebs on Security", "https://krebsonsecurity.com", "North America"),
    ("The Hacker News", "https://thehackernews.com", "Global"),
    ("Bleeping Computer", "https://www.bleepingcomputer.com", "North America"),
    ("Security Week", "https://www.securityweek.com", "North America"),
    ("Dark Reading", "https://www.darkreading.com", "North America"),
    ("Threatpost", "https://threatpost.com", "North America"),
    ("CSO Online", "https://www.csoonline.com", "North America"),
    ("Naked Security", "https://nakedsecurity.sophos.com", "Europe"),
    ("Kenya Cybersecurity Report", "https://www.serianu.com/blog", "Kenya"),
    ("Kenya Tech News", "https://techweez.com/category/security", "Kenya"),
    (
        "Business Daily Security",
        "https://www.businessdailyafrica.com/bd/corporate/technology",
        "Kenya",
    ),
    ("The Standard Tech", "https://www.standardmedia.co.ke/tech", "Kenya"),
    ("ZDNet Security", "https://www.zdnet.com/security", "Global"),
    ("Infosecurity Magazine", "https://www.infosecurity-magazine.com", "Europe"),
    ("SC Magazine", "https://www.scmagazine.com", "North America"),
    ("The Register Security", "https://www.theregister.com/security", "Europe"),
    ("Cyber Scoop", "https://www.cyberscoop.com", "North America"),
    ("The Record", "https://therecord.media", "Global"),
    ("IT Security Guru", "https://www.itsecurityguru.org", "Europe"),
    ("Security Affairs", "https://securityaffairs.com", "Europe"),
    ("The Stack Asia", "https://thestack.technology/category/security", "Asia"),
    ("Security Brief Asia", "https://securitybrief.asia", "Asia"),
    ("IT News Africa", "https://www.itnewsafrica.com/category/security", "Africa"),
];

pub fn sources() -> Vec<Source> {
    SOURCES
        .iter()
        .map(|(name, url, region)| Source {
            name: name.to_string(),
            url: url.to_string(),
            region: region.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_populated() {
        let sources = sources();
        assert_eq!(sources.len(), 23);
        assert!(sources.iter().all(|s| s.url.starts_with("http")));
    }

    #[test]
    fn test_registry_regions() {
        let sources = sources();
        let kenyan = sources.iter().filter(|s| s.region == "Kenya").count();
        assert_eq!(kenyan, 4);
    }
}
