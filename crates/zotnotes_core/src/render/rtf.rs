//! RTF record formatting and literal markup substitution.

use crate::model::note::NoteRecord;

/// Static RTF prologue: ANSI code page 1252, font and color tables.
pub const RTF_HEADER: &str = concat!(
    r"{\rtf1\ansi\ansicpg1252\deff0\deftab720{\fonttbl{\f0\fswiss MS Sans Serif;}",
    r"{\f1\froman\fcharset2 Symbol;}{\f2\fmodern\fprq1 Courier New;}",
    r"{\f3\froman Times New Roman;}}{\colortbl\red0\green0\blue0;",
    r"\red0\green0\blue255;\red255\green0\blue0;}\deflang1033\horzdoc{\*\fchars }{\*\lchars}",
);

/// Paragraph break placed between records and after the last one.
pub const RECORD_SEPARATOR: &str = r"\par";
const DOCUMENT_CLOSE: &str = "}";

/// Ordered find/replace pairs. Order is significant.
const REPLACEMENTS: &[(&str, &str)] = &[
    ("(<a href=", r"{\field{\*\fldinst { HYPERLINK"),
    ("\">", r"}}{\fldrslt {"),
    ("</a>)", "}}}"),
    ("<p>", r"\line"),
    ("</p>", r"\line"),
    ("<br>", r"\line"),
    ("<strong>", r"\b "),
    ("</strong>", r" \b0"),
    ("<b>", r"\b "),
    ("</b>", r" \b0"),
    ("<i>", r"\i "),
    ("</i>", r" \i0"),
    ("\u{02D8}", "&#728;"),
    ("\u{02C7}", "&#728;"),
    ("\u{008E}", "&#x8E;"),
    ("\u{2212}", "&#8722;"),
    ("\u{2715}", "&#10005;"),
    ("\u{03B5}", "&#949;"),
    ("\u{0301}", "&#769;"),
    ("\u{2192}", "&#8594;"),
    ("\u{25CF}", "&#9679;"),
    ("\u{2015}", "&#8213;"),
];

/// Formats one record: italic breadcrumb, bold title with year, creators,
/// then the raw note body.
pub fn format_record(record: &NoteRecord) -> String {
    format!(
        r"\i {}\i0 \line \fs28 \b {} ({}) \b0 \fs22 \line {} \line \fs24 {}",
        record.breadcrumb, record.title, record.date, record.creators, record.body
    )
}

/// Formats every record and joins them with paragraph breaks.
pub fn join_records(records: &[NoteRecord]) -> String {
    records
        .iter()
        .map(format_record)
        .collect::<Vec<_>>()
        .join(RECORD_SEPARATOR)
}

/// Applies the literal substitution list in order.
pub fn apply_replacements(text: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replace(from, to))
}

/// Renders records into the substituted document body.
pub fn render_body(records: &[NoteRecord]) -> String {
    apply_replacements(&join_records(records))
}

/// Wraps a body in the RTF prologue and closing brace.
pub fn wrap_document(body: &str) -> String {
    let mut document =
        String::with_capacity(RTF_HEADER.len() + body.len() + RECORD_SEPARATOR.len() + 1);
    document.push_str(RTF_HEADER);
    document.push_str(body);
    document.push_str(RECORD_SEPARATOR);
    document.push_str(DOCUMENT_CLOSE);
    document
}

#[cfg(test)]
mod tests {
    use super::{apply_replacements, format_record, join_records, wrap_document, RTF_HEADER};
    use crate::model::note::NoteRecord;

    fn record(title: &str) -> NoteRecord {
        NoteRecord {
            breadcrumb: "Theory/Memory".to_string(),
            title: title.to_string(),
            date: "2019".to_string(),
            creators: "Smith and Jones".to_string(),
            body: "<p>body</p>".to_string(),
        }
    }

    #[test]
    fn record_layout_matches_template() {
        assert_eq!(
            format_record(&record("Recall")),
            r"\i Theory/Memory\i0 \line \fs28 \b Recall (2019) \b0 \fs22 \line Smith and Jones \line \fs24 <p>body</p>"
        );
    }

    #[test]
    fn records_are_joined_with_par() {
        let joined = join_records(&[record("A"), record("B")]);
        assert_eq!(joined.matches(r"\par").count(), 1);
        assert!(joined.contains(r"</p>\par\i Theory"));
    }

    #[test]
    fn links_and_emphasis_become_rtf_fields() {
        let html = r#"<p><strong>Extracted</strong> (<a href="zotero://open-pdf/1">p. 3</a>)<br><i>x</i></p>"#;
        assert_eq!(
            apply_replacements(html),
            r#"\line\b Extracted \b0 {\field{\*\fldinst { HYPERLINK"zotero://open-pdf/1}}{\fldrslt {p. 3}}}\line\i x \i0\line"#
        );
    }

    #[test]
    fn special_characters_become_entities() {
        assert_eq!(apply_replacements("a\u{2192}b \u{03B5}"), "a&#8594;b &#949;");
    }

    #[test]
    fn document_is_wrapped_and_closed() {
        let document = wrap_document("body");
        assert!(document.starts_with(r"{\rtf1\ansi"));
        assert!(document.ends_with(r"body\par}"));
        assert_eq!(document.len(), RTF_HEADER.len() + "body".len() + 5);
    }
}
