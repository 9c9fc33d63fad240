mod support;

use support::{attachment, document, note, typed_item, FixtureLibrary, ANNOTATION_BODY};
use zotnotes_core::{NoteService, NoteServiceError};

const BOLD_TAG_BODY: &str = "<p><b>Extracted Annotations</b></p><p>second</p>";
const PLACEHOLDER_BODY: &str = "The following values have no corresponding Zotero field:";

fn memory_library() -> FixtureLibrary {
    FixtureLibrary::new()
        .with_collection("R1", "Theory", None)
        .with_collection("C1", "Memory", Some("R1"))
        .with_collection_items(
            "C1",
            vec![
                document(
                    "D1",
                    "Recall and Forgetting",
                    "2019-05-01",
                    &["C1"],
                    Some("Smith and Jones"),
                ),
                note("N1", "D1", ANNOTATION_BODY),
                note("N2", "D1", "<p>my own plain note</p>"),
                note("N3", "D1", PLACEHOLDER_BODY),
                attachment("A1", "D1"),
            ],
        )
}

#[test]
fn collection_notes_keep_only_extracted_annotations() {
    let library = memory_library();
    let service = NoteService::load(&library).unwrap();

    let report = service.collect_collection_notes("Memory").unwrap();
    assert_eq!(report.scanned_notes, 2);
    assert_eq!(report.records.len(), 1);

    let record = &report.records[0];
    assert_eq!(record.breadcrumb, "Theory/Memory");
    assert_eq!(record.title, "Recall and Forgetting");
    assert_eq!(record.date, "2019");
    assert_eq!(record.creators, "Smith and Jones");
    assert_eq!(record.body, ANNOTATION_BODY);

    // Only the annotation note triggers a parent lookup.
    assert_eq!(*library.item_requests.borrow(), vec!["D1".to_string()]);
}

#[test]
fn bold_tag_heading_is_also_an_annotation() {
    let library =
        memory_library().with_collection_items("C1", vec![note("N4", "D1", BOLD_TAG_BODY)]);
    let service = NoteService::load(&library).unwrap();

    let report = service.collect_collection_notes("Memory").unwrap();
    let bodies: Vec<_> = report.records.iter().map(|r| r.body.as_str()).collect();
    assert_eq!(bodies, [ANNOTATION_BODY, BOLD_TAG_BODY]);
}

#[test]
fn unreachable_parent_skips_only_that_note() {
    let library = memory_library().with_collection_items(
        "C1",
        vec![
            note("N5", "GONE", ANNOTATION_BODY),
            note("N6", "D1", BOLD_TAG_BODY),
        ],
    );
    let service = NoteService::load(&library).unwrap();

    let report = service.collect_collection_notes("Memory").unwrap();
    assert_eq!(report.scanned_notes, 4);
    assert_eq!(report.records.len(), 2);
    assert!(report.records.iter().all(|r| r.title == "Recall and Forgetting"));
}

#[test]
fn missing_metadata_uses_defaults() {
    let library = FixtureLibrary::new()
        .with_collection("C1", "Inbox", None)
        .with_item(document("D9", "  ", "n.d.", &[], None))
        .with_collection_items("C1", vec![note("N9", "D9", ANNOTATION_BODY)]);
    let service = NoteService::load(&library).unwrap();

    let report = service.collect_collection_notes("Inbox").unwrap();
    let record = &report.records[0];
    assert_eq!(record.breadcrumb, "None");
    assert_eq!(record.title, "No Title");
    assert_eq!(record.date, "N.d.");
    assert_eq!(record.creators, "No Author");
}

#[test]
fn breadcrumb_uses_first_collection_and_tolerates_unknown_parents() {
    let library = FixtureLibrary::new()
        .with_collection("C1", "Orphaned", Some("MISSING"))
        .with_collection("C2", "Elsewhere", None)
        .with_item(document("D1", "First", "1998", &["C1", "C2"], Some("A")))
        .with_item(document("D2", "Second", "1999", &["UNKNOWN"], Some("B")))
        .with_collection_items(
            "C2",
            vec![
                note("N1", "D1", ANNOTATION_BODY),
                note("N2", "D2", ANNOTATION_BODY),
            ],
        );
    let service = NoteService::load(&library).unwrap();

    let report = service.collect_collection_notes("Elsewhere").unwrap();
    let crumbs: Vec<_> = report
        .records
        .iter()
        .map(|r| r.breadcrumb.as_str())
        .collect();
    assert_eq!(crumbs, ["Orphaned", "None"]);
}

#[test]
fn unknown_collection_and_empty_library_are_errors() {
    let library = memory_library();
    let service = NoteService::load(&library).unwrap();
    let err = service.collect_collection_notes("memory").unwrap_err();
    assert!(matches!(err, NoteServiceError::CollectionNotFound(name) if name == "memory"));

    let empty = FixtureLibrary::new();
    let service = NoteService::load(&empty).unwrap();
    let err = service.collect_collection_notes("Memory").unwrap_err();
    assert!(matches!(err, NoteServiceError::NoCollections));
}

#[test]
fn search_notes_walk_children_of_non_attachment_hits() {
    let hit = document("D1", "Innovation Theory", "Spring 2004", &["C1"], Some("Rogers"));
    let library = FixtureLibrary::new()
        .with_collection("C1", "Innovation", None)
        .with_search_hits("innovation", vec![hit, attachment("A7", "")])
        .with_children(
            "D1",
            vec![
                attachment("A1", "D1"),
                note("N1", "D1", PLACEHOLDER_BODY),
                note("N2", "D1", ANNOTATION_BODY),
            ],
        )
        .with_children("A7", vec![note("N7", "D1", ANNOTATION_BODY)]);
    let service = NoteService::load(&library).unwrap();

    let report = service.collect_search_notes("innovation").unwrap();
    assert_eq!(report.scanned_notes, 1);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].breadcrumb, "Innovation");
    assert_eq!(report.records[0].date, "2004");
    assert_eq!(report.records[0].creators, "Rogers");
}

#[test]
fn search_without_hits_yields_empty_report() {
    let library = memory_library();
    let service = NoteService::load(&library).unwrap();

    let report = service.collect_search_notes("nothing matches").unwrap();
    assert_eq!(report.scanned_notes, 0);
    assert!(report.records.is_empty());
}

#[test]
fn library_notes_cover_every_collection_and_loose_documents() {
    let library = memory_library()
        .with_collection("C2", "Attention", None)
        .with_library_items(vec![
            document("D1", "Recall and Forgetting", "2019-05-01", &["C1"], Some("Smith and Jones")),
            document("D2", "Spotlight", "1980", &["C2"], Some("Posner")),
            document("D3", "Unfiled", "", &[], None),
            note("N1", "D1", ANNOTATION_BODY),
            note("N3", "D1", PLACEHOLDER_BODY),
            attachment("A1", "D2"),
            note("N5", "D2", BOLD_TAG_BODY),
            typed_item("N6", "noteDraft", "D3", ANNOTATION_BODY),
        ]);
    let service = NoteService::load(&library).unwrap();

    let report = service.collect_library_notes().unwrap();
    assert_eq!(report.scanned_notes, 3);
    let summary: Vec<_> = report
        .records
        .iter()
        .map(|record| (record.breadcrumb.as_str(), record.title.as_str(), record.date.as_str()))
        .collect();
    assert_eq!(
        summary,
        [
            ("Theory/Memory", "Recall and Forgetting", "2019"),
            ("Attention", "Spotlight", "1980"),
            ("None", "Unfiled", "N.d."),
        ]
    );
}

#[test]
fn empty_library_listing_yields_empty_report() {
    let library = memory_library();
    let service = NoteService::load(&library).unwrap();

    let report = service.collect_library_notes().unwrap();
    assert_eq!(report.scanned_notes, 0);
    assert!(report.records.is_empty());
}
