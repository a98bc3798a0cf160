//! Read-only helpers over the parsed HTML tree.

use scraper::ElementRef;

/// Non-breaking space as written by the exporter.
pub(crate) const NBSP: char = '\u{a0}';

/// Class prefix of generated list styles: `lst-kix_<list id>-<level>`.
const LIST_CLASS_PREFIX: &str = "lst-kix_";

/// A child of an element, with comments and processing instructions
/// already filtered out.
#[derive(Clone, Copy)]
pub(crate) enum Child<'a> {
    Element(ElementRef<'a>),
    Text(&'a str),
}

pub(crate) fn children<'a>(element: ElementRef<'a>) -> impl Iterator<Item = Child<'a>> + 'a {
    element.children().filter_map(|node| match ElementRef::wrap(node) {
        Some(child) => Some(Child::Element(child)),
        None => node.value().as_text().map(|text| Child::Text(text)),
    })
}

pub(crate) fn child_elements<'a>(
    element: ElementRef<'a>,
) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.children().filter_map(ElementRef::wrap)
}

pub(crate) fn tag<'a>(element: &ElementRef<'a>) -> &'a str {
    element.value().name()
}

pub(crate) fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// `h1` to `h6` as a level.
pub(crate) fn heading_level(name: &str) -> Option<u8> {
    let level = name.strip_prefix('h')?.parse::<u8>().ok()?;
    (1..=6).contains(&level).then_some(level)
}

/// Nesting level of a list element, from its generated list class.
pub(crate) fn list_level(element: &ElementRef<'_>) -> u8 {
    element
        .value()
        .classes()
        .filter(|class| class.starts_with(LIST_CLASS_PREFIX))
        .find_map(|class| class.rsplit_once('-')?.1.parse().ok())
        .unwrap_or(0)
}

/// Whether `href` points at a comment or footnote anchor.
pub(crate) fn is_footnote_href(href: &str) -> bool {
    href.starts_with("#cmnt") || href.starts_with("#ftnt")
}

/// A back-reference to a comment or footnote: the anchor itself or the
/// superscript wrapping it.
pub(crate) fn is_footnote_marker(element: &ElementRef<'_>) -> bool {
    match tag(element) {
        "a" => element.value().attr("href").is_some_and(is_footnote_href),
        "sup" => element
            .descendants()
            .filter_map(ElementRef::wrap)
            .any(|d| tag(&d) == "a" && d.value().attr("href").is_some_and(is_footnote_href)),
        _ => false,
    }
}

/// Text of an element as a reader sees it: `<br>` as a newline, non-breaking
/// spaces as spaces, footnote markers removed.
pub(crate) fn plain_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_plain_text(element, &mut out);
    out
}

fn push_plain_text(element: ElementRef<'_>, out: &mut String) {
    for child in children(element) {
        match child {
            Child::Text(text) => out.extend(text.chars().map(normalize_char)),
            Child::Element(e) => match tag(&e) {
                "br" => out.push('\n'),
                "style" | "script" => {}
                _ if is_footnote_marker(&e) => {}
                _ => push_plain_text(e, out),
            },
        }
    }
}

/// Target of the first link under `element`, footnote anchors excluded.
pub(crate) fn first_link<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| tag(e) == "a")
        .filter_map(|e| e.value().attr("href"))
        .find(|href| !is_footnote_href(href))
}

pub(crate) const fn normalize_char(c: char) -> char {
    if c == NBSP { ' ' } else { c }
}

/// Collapse every whitespace run to a single space.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first_in_body(html: &Html) -> ElementRef<'_> {
        let body = child_elements(html.root_element())
            .find(|e| tag(e) == "body")
            .unwrap();
        child_elements(body).next().unwrap()
    }

    #[test]
    fn plain_text_skips_footnotes() {
        let html = Html::parse_document(
            r##"<p>One&nbsp;two<br>three<sup><a href="#cmnt1">[a]</a></sup></p>"##,
        );
        assert_eq!(plain_text(first_in_body(&html)), "One two\nthree");
    }

    #[test]
    fn list_levels() {
        let html = Html::parse_document(r#"<ul class="lst-kix_abc123-2 start"><li>x</li></ul>"#);
        assert_eq!(list_level(&first_in_body(&html)), 2);
        let html = Html::parse_document("<ol><li>x</li></ol>");
        assert_eq!(list_level(&first_in_body(&html)), 0);
    }

    #[test]
    fn heading_levels() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("hr"), None);
    }

    #[test]
    fn whitespace_collapses() {
        assert_eq!(collapse_whitespace("a \n\t b  c"), "a b c");
    }
}
