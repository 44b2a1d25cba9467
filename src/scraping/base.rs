use anyhow::{Context, Result};
use scraper::{ElementRef, Selector};
use url::Url;

pub fn clean_text(input: &str) -> String {
    input
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

pub fn first_text(element: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    element
        .select(selector)
        .next()
        .map(|node| {
            let text = inner_text(node);
            let cleaned = clean_text(&text);
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
        .flatten()
}

pub fn inner_text(element: ElementRef<'_>) -> String {
    clean_text(&element.text().collect::<Vec<_>>().join(" "))
}

pub fn first_attr(element: &ElementRef<'_>, selector: &Selector, attr: &str) -> Option<String> {
    element
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(str::to_string)
}

/// Resolves `href` against `base` into a canonical absolute URL. Absolute
/// hrefs are validated and normalized rather than taken verbatim.
pub fn join_url(base: &str, href: &str) -> Result<String> {
    let base_url = Url::parse(base).with_context(|| format!("invalid base url {base}"))?;
    let joined = base_url
        .join(href)
        .with_context(|| format!("unresolvable link {href}"))?;
    Ok(joined.to_string())
}

pub fn absolute_url(base: &str, href: Option<String>) -> Option<String> {
    let href = href?;
    join_url(base, &href).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace() {
        assert_eq!(clean_text("  Jazz \n Night\t2026 "), "Jazz Night 2026");
    }

    #[test]
    fn joins_relative_and_keeps_absolute() {
        assert_eq!(
            join_url("https://www.example.com", "/e/show-123").unwrap(),
            "https://www.example.com/e/show-123"
        );
        assert_eq!(
            join_url("https://www.example.com", "https://other.org/x").unwrap(),
            "https://other.org/x"
        );
    }

    #[test]
    fn rejects_malformed_links() {
        assert!(join_url("https://www.example.com", "http://[broken").is_err());
    }
}
