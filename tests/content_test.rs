use email_index::*;

fn extract(raw: &[u8], ignored: &[&str]) -> ExtractedContent {
    let mail = mailparse::parse_mail(raw).unwrap();
    ContentExtractor::with_ignored(ignored.iter().copied()).extract(&mail)
}

#[test]
fn test_ignored_part_contributes_type_only() {
    let raw = b"From: a@example.com\r\n\
                Message-ID: <m1@example.com>\r\n\
                Content-Type: multipart/mixed; boundary=\"XYZ\"\r\n\
                \r\n\
                --XYZ\r\n\
                Content-Type: text/plain; charset=utf-8\r\n\
                \r\n\
                Hello there\r\n\
                --XYZ\r\n\
                Content-Type: image/png\r\n\
                Content-Transfer-Encoding: base64\r\n\
                \r\n\
                iVBORw0KGgo=\r\n\
                --XYZ--\r\n";

    let content = extract(raw, &["image", "application"]);

    assert_eq!(content.body, "Hello there");
    assert_eq!(content.ignored_content_types, "image/png");
    assert_eq!(content.filenames, "");
}

#[test]
fn test_ignored_attachment_keeps_filename() {
    let raw = b"From: a@example.com\r\n\
                Content-Type: multipart/mixed; boundary=\"XYZ\"\r\n\
                \r\n\
                --XYZ\r\n\
                Content-Type: text/plain\r\n\
                \r\n\
                See attached\r\n\
                --XYZ\r\n\
                Content-Type: application/pdf; name=\"invoice.pdf\"\r\n\
                Content-Disposition: attachment; filename=\"invoice.pdf\"\r\n\
                Content-Transfer-Encoding: base64\r\n\
                \r\n\
                JVBERi0xLjQK\r\n\
                --XYZ--\r\n";

    let content = extract(raw, &["application"]);

    assert_eq!(content.body, "See attached");
    assert_eq!(content.filenames, "invoice.pdf");
    assert_eq!(content.ignored_content_types, "application/pdf");
    assert!(!content.body.contains("JVBER"));
}

#[test]
fn test_nested_parts_in_order() {
    let raw = b"From: a@example.com\r\n\
                Content-Type: multipart/mixed; boundary=\"OUTER\"\r\n\
                \r\n\
                --OUTER\r\n\
                Content-Type: multipart/alternative; boundary=\"INNER\"\r\n\
                \r\n\
                --INNER\r\n\
                Content-Type: text/plain\r\n\
                \r\n\
                First part\r\n\
                --INNER\r\n\
                Content-Type: text/html\r\n\
                \r\n\
                <html><body><p>Second part</p></body></html>\r\n\
                --INNER--\r\n\
                --OUTER\r\n\
                Content-Type: text/plain\r\n\
                Content-Disposition: attachment; filename=\"notes.txt\"\r\n\
                \r\n\
                Third part\r\n\
                --OUTER--\r\n";

    let content = extract(raw, &["image"]);

    assert_eq!(content.body, "First part\nSecond part\nThird part");
    assert_eq!(content.filenames, "notes.txt");
    assert_eq!(content.ignored_content_types, "");
}

#[test]
fn test_ignore_match_is_case_insensitive() {
    let extractor = ContentExtractor::with_ignored(["IMAGE"]);
    assert!(extractor.is_ignored("image/png"));
    assert!(extractor.is_ignored("Image/JPEG"));
    assert!(!extractor.is_ignored("text/plain"));
}

#[test]
fn test_extractor_from_options() {
    let extractor = ContentExtractor::new(&IndexOptions::default());
    assert!(extractor.is_ignored("application/octet-stream"));
    assert!(extractor.is_ignored("image/gif"));
    assert!(!extractor.is_ignored("text/html"));
}

#[test]
fn test_strip_markup_removes_script_and_style() {
    let html = "<html><head><style>p { color: red; }</style></head>\
                <body><p>Hello <b>World</b></p>\
                <script>alert('x');</script><div>Bye &amp; thanks</div></body></html>";

    let text = strip_markup(html);

    assert_eq!(text, "Hello World\nBye & thanks");
}

#[test]
fn test_strip_markup_trims_and_drops_blank_lines() {
    let text = strip_markup("  first line  \r\n\r\n\t\n   second line\n");
    assert_eq!(text, "first line\nsecond line");
}

#[test]
fn test_strip_markup_tolerates_broken_markup() {
    assert_eq!(strip_markup("a < b"), "a < b");
    assert_eq!(strip_markup("<p>unclosed <!-- note"), "unclosed");
    assert_eq!(strip_markup("<script>never closed"), "");
}

#[test]
fn test_strip_markup_keeps_literal_angle_brackets() {
    assert_eq!(
        strip_markup("Costs < 10 and > 5 today"),
        "Costs < 10 and > 5 today"
    );
    assert_eq!(
        strip_markup("I <3 this\nsee you > soon"),
        "I <3 this\nsee you > soon"
    );
}

#[test]
fn test_strip_markup_script_with_comparison() {
    let html = "<script>if (a < b) { x(); }</script><p>Visible text</p>\
                <STYLE>a < b { }</Style>After style";

    assert_eq!(strip_markup(html), "Visible text\nAfter style");
}
