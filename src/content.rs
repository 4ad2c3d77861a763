//! Body text extraction from the MIME part tree

use crate::config::IndexOptions;
use mailparse::ParsedMail;
use tracing::debug;

/// Text and bookkeeping collected from one message body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedContent {
    /// Visible text of every indexed leaf, newline separated
    pub body: String,

    /// Filenames of every leaf that declared one, space separated
    pub filenames: String,

    /// Content types of leaves skipped by the ignore list, space separated
    pub ignored_content_types: String,
}

/// Walks a message depth-first and turns its text parts into plain text
#[derive(Debug, Clone, Default)]
pub struct ContentExtractor {
    ignored: Vec<String>,
}

#[derive(Default)]
struct Collected {
    texts: Vec<String>,
    filenames: Vec<String>,
    ignored: Vec<String>,
}

impl ContentExtractor {
    #[must_use]
    pub fn new(options: &IndexOptions) -> Self {
        Self {
            ignored: options.ignored_content_types(),
        }
    }

    /// Build an extractor from explicit content-type substrings
    pub fn with_ignored<I, S>(ignored: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            ignored: ignored
                .into_iter()
                .map(|s| s.as_ref().trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Extract text, filenames and skipped types, preserving part order
    #[must_use]
    pub fn extract(&self, mail: &ParsedMail) -> ExtractedContent {
        let mut collected = Collected::default();
        self.walk(mail, &mut collected);

        ExtractedContent {
            body: collected.texts.join("\n"),
            filenames: collected.filenames.join(" "),
            ignored_content_types: collected.ignored.join(" "),
        }
    }

    /// Whether a content type matches any ignored substring
    #[must_use]
    pub fn is_ignored(&self, content_type: &str) -> bool {
        let content_type = content_type.to_lowercase();
        self.ignored.iter().any(|i| content_type.contains(i.as_str()))
    }

    fn walk(&self, part: &ParsedMail, out: &mut Collected) {
        if !part.subparts.is_empty() {
            for child in &part.subparts {
                self.walk(child, out);
            }
            return;
        }

        if let Some(filename) = part_filename(part) {
            out.filenames.push(filename);
        }

        let content_type = part.ctype.mimetype.to_lowercase();
        if self.is_ignored(&content_type) {
            out.ignored.push(content_type);
            return;
        }

        match part.get_body() {
            Ok(payload) => {
                let text = strip_markup(&payload);
                if !text.is_empty() {
                    out.texts.push(text);
                }
            }
            Err(e) => debug!("Skipping undecodable {content_type} part: {e}"),
        }
    }
}

fn part_filename(part: &ParsedMail) -> Option<String> {
    part.get_content_disposition()
        .params
        .get("filename")
        .or_else(|| part.ctype.params.get("name"))
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
}

/// Reduce markup to its visible text
///
/// Script and style contents are dropped, common entities decoded, every
/// line trimmed and blank lines removed. Never fails: a `<` that does not
/// open a tag, and unterminated tags, are kept as text.
#[must_use]
pub fn strip_markup(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = find_tag_start(rest) {
        result.push_str(&rest[..open]);
        let tail = &rest[open..];

        if let Some(comment) = tail.strip_prefix("<!--") {
            rest = comment.find("-->").map_or("", |end| &comment[end + 3..]);
            continue;
        }

        let Some(close) = tail.find('>') else {
            result.push_str(tail);
            rest = "";
            break;
        };

        let tag = tail[1..close].trim().to_ascii_lowercase();
        rest = &tail[close + 1..];

        if let Some(closing) = raw_text_closing(&tag) {
            rest = skip_past(rest, closing);
        } else if is_line_break(&tag) {
            result.push('\n');
        }
    }
    result.push_str(rest);

    let result = result
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    result
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Position of the next `<` followed by a letter, `/` or `!`
fn find_tag_start(s: &str) -> Option<usize> {
    s.match_indices('<').map(|(i, _)| i).find(|&i| {
        s[i + 1..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
    })
}

/// Closing tag for elements whose content is not text
fn raw_text_closing(tag: &str) -> Option<&'static str> {
    match tag.split(|c: char| c.is_whitespace() || c == '/').next() {
        Some("script") => Some("</script"),
        Some("style") => Some("</style"),
        _ => None,
    }
}

/// Everything after `closing` (matched ASCII case-insensitively) and its `>`
fn skip_past<'a>(s: &'a str, closing: &str) -> &'a str {
    let lower = s.to_ascii_lowercase();
    lower
        .find(closing)
        .and_then(|at| lower[at..].find('>').map(|gt| at + gt + 1))
        .map_or("", |end| &s[end..])
}

fn is_line_break(tag: &str) -> bool {
    ["br", "/p", "/div", "/li", "/tr", "/h"]
        .iter()
        .any(|t| tag.starts_with(t))
}
