// src/links.rs
//
// Link extraction, ported from the teacher's `metadata.rs`. Used only for
// metadata enrichment (spec §11: `has_urls` and the `link_count` extra
// key) rather than as first-class output, so we keep just the link kinds
// and drop the position bookkeeping the teacher tracked for its own
// `Link` type.

#[derive(Debug, Clone, PartialEq)]
pub enum LinkKind {
    Markdown,
    Wiki,
    Reference,
    Autolink,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub target: String,
    pub kind: LinkKind,
}

pub fn extract_links(content: &str) -> Vec<Link> {
    let mut links = Vec::new();
    extract_markdown_links(content, &mut links);
    extract_wiki_links(content, &mut links);
    extract_reference_links(content, &mut links);
    extract_autolinks(content, &mut links);
    links
}

fn extract_markdown_links(content: &str, links: &mut Vec<Link>) {
    let mut chars = content.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '[' {
            continue;
        }
        if i > 0 && content.as_bytes().get(i - 1) == Some(&b'!') {
            continue;
        }

        let mut bracket_depth = 1;
        let mut text_end = None;
        let text_start = i + 1;

        for (j, ch) in chars.by_ref() {
            match ch {
                '[' => bracket_depth += 1,
                ']' => {
                    bracket_depth -= 1;
                    if bracket_depth == 0 {
                        text_end = Some(j);
                        break;
                    }
                }
                _ => {}
            }
        }

        let Some(text_end) = text_end else { continue };
        if chars.peek().map(|&(_, c)| c) != Some('(') {
            continue;
        }
        chars.next();
        let url_start = text_end + 2;
        let mut paren_depth = 1;
        let mut url_end = None;

        for (j, ch) in chars.by_ref() {
            match ch {
                '(' => paren_depth += 1,
                ')' => {
                    paren_depth -= 1;
                    if paren_depth == 0 {
                        url_end = Some(j);
                        break;
                    }
                }
                _ => {}
            }
        }

        if let Some(url_end) = url_end {
            let text = &content[text_start..text_end];
            let target = &content[url_start..url_end];
            if !text.is_empty() && !target.is_empty() {
                let target = target
                    .split_once(['"', '\''])
                    .map(|(url, _)| url.trim())
                    .unwrap_or(target)
                    .trim();
                links.push(Link {
                    target: target.to_string(),
                    kind: LinkKind::Markdown,
                });
            }
        }
    }
}

fn extract_wiki_links(content: &str, links: &mut Vec<Link>) {
    let mut i = 0;
    let bytes = content.as_bytes();

    while i < bytes.len().saturating_sub(3) {
        if bytes[i] == b'[' && bytes[i + 1] == b'[' {
            let start = i + 2;
            let mut end = None;
            for j in start..bytes.len().saturating_sub(1) {
                if bytes[j] == b']' && bytes[j + 1] == b']' {
                    end = Some(j);
                    break;
                }
            }
            if let Some(end) = end {
                let inner = &content[start..end];
                let target = inner.split('|').next().unwrap_or(inner).trim();
                if !target.is_empty() {
                    links.push(Link {
                        target: target.to_string(),
                        kind: LinkKind::Wiki,
                    });
                }
                i = end + 2;
                continue;
            }
        }
        i += 1;
    }
}

fn extract_reference_links(content: &str, links: &mut Vec<Link>) {
    let mut chars = content.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if c != '[' {
            continue;
        }
        if i > 0 && content.as_bytes().get(i - 1) == Some(&b'!') {
            continue;
        }

        let mut bracket_depth = 1;
        let mut text_end = None;
        let text_start = i + 1;
        for (j, ch) in chars.by_ref() {
            match ch {
                '[' => bracket_depth += 1,
                ']' => {
                    bracket_depth -= 1;
                    if bracket_depth == 0 {
                        text_end = Some(j);
                        break;
                    }
                }
                _ => {}
            }
        }

        let Some(text_end) = text_end else { continue };
        if chars.peek().map(|&(_, c)| c) != Some('[') {
            continue;
        }
        chars.next();
        let ref_start = text_end + 2;
        let mut ref_end = None;
        for (j, ch) in chars.by_ref() {
            if ch == ']' {
                ref_end = Some(j);
                break;
            }
        }

        if let Some(ref_end) = ref_end {
            let text = &content[text_start..text_end];
            let reference = &content[ref_start..ref_end];
            if !text.is_empty() {
                let target = if reference.is_empty() { text } else { reference };
                links.push(Link {
                    target: target.to_string(),
                    kind: LinkKind::Reference,
                });
            }
        }
    }
}

fn extract_autolinks(content: &str, links: &mut Vec<Link>) {
    let mut i = 0;
    let bytes = content.as_bytes();

    while i < bytes.len() {
        if bytes[i] == b'<' {
            let start = i + 1;
            if let Some(end_offset) = content[start..].find('>') {
                let inner = &content[start..start + end_offset];
                if inner.starts_with("http://")
                    || inner.starts_with("https://")
                    || inner.starts_with("mailto:")
                    || inner.starts_with("ftp://")
                {
                    links.push(Link {
                        target: inner.to_string(),
                        kind: LinkKind::Autolink,
                    });
                }
                i = start + end_offset + 1;
                continue;
            }
        }
        i += 1;
    }
}

/// True if `content` contains at least one `http(s)://` URL, bare or
/// wrapped in a markdown/autolink construct.
pub fn has_urls(content: &str) -> bool {
    extract_links(content)
        .iter()
        .any(|l| l.target.starts_with("http://") || l.target.starts_with("https://"))
        || content.contains("http://")
        || content.contains("https://")
}

/// Crude but effective email detection: an `@` with a non-space run on
/// each side and a dot somewhere in the domain part.
pub fn has_emails(content: &str) -> bool {
    content.split_whitespace().any(|word| {
        let word = word.trim_matches(|c: char| !c.is_alphanumeric() && c != '@' && c != '.');
        match word.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.'),
            None => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_markdown_link() {
        let links = extract_links("See [docs](https://example.com/docs) for more.");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].kind, LinkKind::Markdown);
        assert_eq!(links[0].target, "https://example.com/docs");
    }

    #[test]
    fn finds_wiki_link() {
        let links = extract_links("See [[Getting Started|guide]] for setup.");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "Getting Started");
    }

    #[test]
    fn detects_bare_url() {
        assert!(has_urls("Visit https://example.com today."));
        assert!(!has_urls("No links in this sentence."));
    }

    #[test]
    fn detects_email_address() {
        assert!(has_emails("Contact us at team@example.com please."));
        assert!(!has_emails("No contact info here."));
    }
}
