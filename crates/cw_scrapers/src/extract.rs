use scraper::{Html, Selector};

/// Structural selectors tried in order against a source index page. The first
/// selector that matches any elements wins, even when a later one would match
/// more. This mirrors how the sources are actually laid out today; revisit if
/// a source starts matching a low-quality selector first.
const ARTICLE_SELECTORS: &[&str] = &["article", ".post", ".article", ".news-item", ".story", ".entry"];

/// Title/link selectors tried in order within a matched element.
const TITLE_SELECTORS: &[&str] = &["h1 a", "h2 a", "h3 a", ".title a", ".headline a"];

/// At most this many articles are taken from a single source page.
const MAX_ARTICLES_PER_SOURCE: usize = 5;

/// A title/link pair extracted from an index page, before the body fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub title: String,
    pub url: String,
}

/// Collapse all whitespace runs to single spaces.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Extract up to [`MAX_ARTICLES_PER_SOURCE`] title/link candidates from a
/// source index page. Relative hrefs are resolved by concatenating the source
/// base URL, matching the upstream sites' link shapes.
pub fn extract_candidates(html: &str, base_url: &str) -> Vec<Candidate> {
    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    for selector_str in ARTICLE_SELECTORS {
        let selector = Selector::parse(selector_str).unwrap();
        let elements: Vec<_> = document.select(&selector).collect();
        if elements.is_empty() {
            continue;
        }

        for element in elements.into_iter().take(MAX_ARTICLES_PER_SOURCE) {
            let title_element = TITLE_SELECTORS.iter().find_map(|title_selector| {
                let selector = Selector::parse(title_selector).unwrap();
                element.select(&selector).next()
            });

            if let Some(link) = title_element {
                if let Some(href) = link.value().attr("href") {
                    if href.is_empty() {
                        continue;
                    }
                    let url = if href.starts_with("http") {
                        href.to_string()
                    } else {
                        format!("{}{}", base_url, href)
                    };
                    candidates.push(Candidate {
                        title: clean_text(&link.text().collect::<String>()),
                        url,
                    });
                }
            }
        }

        // First matching structural selector wins.
        break;
    }

    candidates
}

/// Extract the readable text of an article page: all paragraph text,
/// whitespace-normalized.
pub fn extract_body(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse("p").unwrap();

    let text = document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");

    clean_text(&text)
}
