//! PDF link discovery on the annex publication page.

use scraper::{Html, Selector};
use tracing::{debug, info, warn};

/// Collect every anchor `href` containing `"pdf"` (case-insensitive), in
/// document order.
///
/// This is a heuristic, not a content-type check: an href like
/// `pdfviewer.html` qualifies. Only the href attribute is inspected, never
/// the anchor text, and nothing is deduplicated. An empty result is not an
/// error; the caller decides whether to abort.
pub fn find_pdf_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a[href]").unwrap();

    let mut links = Vec::new();
    for element in document.select(&anchor_selector) {
        if let Some(href) = element.value().attr("href") {
            if href.to_lowercase().contains("pdf") {
                links.push(href.to_string());
            }
        }
    }

    if links.is_empty() {
        warn!("No PDF links found on page");
    } else {
        info!(count = links.len(), "Discovered PDF links");
    }
    debug!(?links, "PDF link candidates");

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_in_document_order() {
        let html = r#"
            <html><body>
                <a href="/anexo1.pdf">Anexo I</a>
                <p>texto</p>
                <a href="/outro.html">Outro</a>
                <a href="/anexo2.PDF">Anexo II</a>
                <a href="https://cdn.gov.br/anexo3.pdf?v=2">Anexo III</a>
            </body></html>
        "#;

        let links = find_pdf_links(html);
        assert_eq!(
            links,
            vec![
                "/anexo1.pdf",
                "/anexo2.PDF",
                "https://cdn.gov.br/anexo3.pdf?v=2"
            ]
        );
    }

    #[test]
    fn test_match_is_case_insensitive_and_anywhere_in_href() {
        let links = find_pdf_links(r#"<a href="/pdfviewer.html">viewer</a>"#);
        assert_eq!(links, vec!["/pdfviewer.html"]);
    }

    #[test]
    fn test_anchor_text_is_not_inspected() {
        let links = find_pdf_links(r#"<a href="/download.html">Baixar PDF</a>"#);
        assert!(links.is_empty());
    }

    #[test]
    fn test_no_deduplication() {
        let html = r#"<a href="/a.pdf">1</a><a href="/a.pdf">2</a>"#;
        assert_eq!(find_pdf_links(html), vec!["/a.pdf", "/a.pdf"]);
    }

    #[test]
    fn test_empty_page_yields_empty_vec() {
        assert!(find_pdf_links("<html><body></body></html>").is_empty());
    }

    #[test]
    fn test_output_is_subsequence_of_all_hrefs() {
        let html = r#"
            <a href="/one.pdf">1</a>
            <a href="/two.txt">2</a>
            <a href="/three.pdf">3</a>
            <a href="/four.doc">4</a>
        "#;
        let all = vec!["/one.pdf", "/two.txt", "/three.pdf", "/four.doc"];
        let links = find_pdf_links(html);

        // Every returned link appears in the full href list, in the same
        // relative order.
        let mut cursor = 0;
        for link in &links {
            let pos = all[cursor..]
                .iter()
                .position(|h| h == link)
                .expect("link must come from the page");
            cursor += pos + 1;
        }
        assert_eq!(links, vec!["/one.pdf", "/three.pdf"]);
    }
}
