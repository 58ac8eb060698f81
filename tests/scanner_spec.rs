use std::io::Cursor;

use sdf_reader::sdf::format::lines::LineSource;
use sdf_reader::sdf::format::scanner::{self, RecordScanner, ScanEvent, ScanMode};
use sdf_reader::sdf::WarningKind;
use sdf_reader::{FormatMarkers, IndexConfig, SdfError};

fn source(text: &str) -> LineSource<Cursor<Vec<u8>>> {
    LineSource::new(Cursor::new(text.as_bytes().to_vec()), encoding_rs::UTF_8).expect("source")
}

fn events(text: &str, config: &IndexConfig, mode: ScanMode) -> Vec<ScanEvent> {
    let mut src = source(text);
    RecordScanner::new(&mut src, config, mode)
        .map(|event| event.expect("scan ok"))
        .collect()
}

const RECORD: &str = concat!(
    "LMFA01010001\n",
    "  LIPDMAPS08240815222D\n",
    "first comment\n",
    "\n",
    "second comment\n",
    " 18 17  0  0  0  0  0  0  0  0999 V2000\n",
    "    3.0000    0.0000    0.0000 O   0  0\n",
    "  1  2  1  0\n",
    "M  END\n",
    "> <COMMON_NAME> (1)\n",
    "Palmitic acid\n",
    "continuation line that is ignored\n",
    "\n",
    "> <SYSTEMATIC_NAME>\n",
    "\n",
    "> <UNKNOWN_TAG>\n",
    "whatever\n",
    "\n",
    "$$$$\n",
);

#[test]
fn line_source_reports_exact_byte_spans() {
    let mut src = source("ab\r\nΩ\nlast");
    assert_eq!(src.len(), 11);

    let first = src.next_line().expect("read").expect("line");
    assert_eq!((first.text.as_str(), first.ending, first.offset, first.len), ("ab", "\r\n", 0, 4));

    let second = src.next_line().expect("read").expect("line");
    assert_eq!((second.text.as_str(), second.ending, second.offset, second.len), ("Ω", "\n", 4, 3));

    let third = src.next_line().expect("read").expect("line");
    assert_eq!((third.text.as_str(), third.ending, third.offset, third.len), ("last", "", 7, 4));
    assert!(src.at_end());
    assert!(src.next_line().expect("read").is_none());

    src.seek(4).expect("seek");
    assert_eq!(src.position(), 4);
    assert!(!src.at_end());
    assert_eq!(src.next_line().expect("read").expect("line").text, "Ω");
}

#[test]
fn line_source_strips_leading_bom() {
    let mut src = LineSource::new(Cursor::new(b"\xef\xbb\xbfM1\n".to_vec()), encoding_rs::UTF_8)
        .expect("source");
    let line = src.next_line().expect("read").expect("line");
    assert_eq!(line.text, "M1");
    assert_eq!(line.len, 6);
}

#[test]
fn full_mode_materializes_every_section() {
    let config = IndexConfig::default();
    let events = events(RECORD, &config, ScanMode::Full);
    assert_eq!(events.len(), 1);
    let scanned = match &events[0] {
        ScanEvent::Record(scanned) => scanned,
        other => panic!("unexpected event {:?}", other),
    };

    let record = &scanned.record;
    assert_eq!(scanned.offset, 0);
    assert_eq!(record.id, "LMFA01010001");
    assert_eq!(record.source, "LIPDMAPS08240815222D");
    assert_eq!(record.comment, "first comment second comment");
    assert_eq!(
        record.structure_block,
        concat!(
            " 18 17  0  0  0  0  0  0  0  0999 V2000\n",
            "    3.0000    0.0000    0.0000 O   0  0\n",
            "  1  2  1  0\n",
            "M  END\n",
        )
    );
    assert_eq!(record.common_name(), Some("Palmitic acid"));
    // A tag followed directly by a blank line and another tag has an empty value.
    assert_eq!(record.name("SYSTEMATIC_NAME"), Some(""));
    assert!(!record.name_fields.contains_key("UNKNOWN_TAG"));
    assert!(record.annotation_fields.is_empty());
}

#[test]
fn index_mode_skips_structure_lines() {
    let config = IndexConfig::default();
    match &events(RECORD, &config, ScanMode::Index)[..] {
        [ScanEvent::Record(scanned)] => {
            assert!(scanned.record.structure_block.is_empty());
            assert_eq!(scanned.record.common_name(), Some("Palmitic acid"));
        }
        other => panic!("unexpected events {:?}", other),
    }
}

#[test]
fn trailing_record_without_terminator_is_complete() {
    let config = IndexConfig::default();
    let text = concat!(
        "X1\n",
        "  src\n",
        "\n",
        "  1  0\n",
        "M  END\n",
        "> <COMMON_NAME>\n",
    );
    match &events(text, &config, ScanMode::Full)[..] {
        [ScanEvent::Record(scanned)] => {
            assert_eq!(scanned.record.id, "X1");
            assert_eq!(scanned.record.common_name(), Some(""));
        }
        other => panic!("unexpected events {:?}", other),
    }
}

#[test]
fn blank_lines_and_terminators_between_records_are_skipped() {
    let config = IndexConfig::default();
    let text = concat!(
        "\n",
        "$$$$\n",
        "A\n",
        "  src\n",
        "\n",
        "  1  0\n",
        "M  END\n",
        "$$$$\n",
        "\n",
        "\n",
        "B\n",
        "  src\n",
        "\n",
        "  1  0\n",
        "M  END\n",
        "$$$$\n",
        "\n",
    );
    let offsets: Vec<(String, u64)> = events(text, &config, ScanMode::Index)
        .into_iter()
        .map(|event| match event {
            ScanEvent::Record(s) => (s.record.id, s.offset),
            ScanEvent::Malformed(w) => panic!("unexpected warning {}", w),
        })
        .collect();
    assert_eq!(offsets, vec![("A".to_string(), 6), ("B".to_string(), 36)]);
}

#[test]
fn terminator_before_structure_end_is_reported() {
    let config = IndexConfig::default();
    let text = concat!("A\n", "$$$$\n", "B\n", "  src\n", "\n", "  1  0\n", "$$$$\n");
    let kinds: Vec<WarningKind> = events(text, &config, ScanMode::Index)
        .into_iter()
        .map(|event| match event {
            ScanEvent::Malformed(w) => w.kind,
            ScanEvent::Record(s) => panic!("unexpected record {}", s.record.id),
        })
        .collect();
    assert_eq!(kinds, vec![WarningKind::UnexpectedRecordEnd, WarningKind::UnexpectedRecordEnd]);
}

#[test]
fn id_line_after_break_starts_next_record() {
    let config = IndexConfig::default();
    let text = concat!(
        "A\n",
        "  src\n",
        "\n",
        "  1  0\n",
        "M  END\n",
        "B\n",
        "  src\n",
        "\n",
        "  1  0\n",
        "M  END\n",
        "> <COMMON_NAME>\n",
        "beta\n",
        "wrapped value line\n",
        "\n",
        "C\n",
        "  src\n",
        "\n",
        "  1  0\n",
        "M  END\n",
        "> <COMMON_NAME>\n",
        "gamma\n",
        "$$$$\n",
    );
    let records: Vec<(String, u64, Option<String>)> = events(text, &config, ScanMode::Index)
        .into_iter()
        .map(|event| match event {
            ScanEvent::Record(s) => (
                s.record.id.clone(),
                s.offset,
                s.record.common_name().map(str::to_string),
            ),
            ScanEvent::Malformed(w) => panic!("unexpected warning {}", w),
        })
        .collect();
    assert_eq!(
        records,
        vec![
            ("A".to_string(), 0, None),
            ("B".to_string(), 23, Some("beta".to_string())),
            ("C".to_string(), 87, Some("gamma".to_string())),
        ]
    );
}

#[test]
fn markers_are_configurable() {
    let markers = FormatMarkers {
        tag_open: "#".to_string(),
        tag_close: String::new(),
        structure_end: "END".to_string(),
        record_end: "----".to_string(),
    };
    let config = IndexConfig::default().with_markers(markers);
    let text = concat!(
        "R1\n",
        "  tool\n",
        "\n",
        "  2  1\n",
        "END\n",
        "# COMMON_NAME\n",
        "Stearic acid\n",
        "----\n",
        "R2\n",
        "  tool\n",
        "\n",
        "  2  1\n",
        "END\n",
        "----\n",
    );
    let ids: Vec<(String, Option<String>)> = events(text, &config, ScanMode::Full)
        .into_iter()
        .map(|event| match event {
            ScanEvent::Record(s) => (s.record.id.clone(), s.record.common_name().map(str::to_string)),
            ScanEvent::Malformed(w) => panic!("unexpected warning {}", w),
        })
        .collect();
    assert_eq!(
        ids,
        vec![
            ("R1".to_string(), Some("Stearic acid".to_string())),
            ("R2".to_string(), None),
        ]
    );
}

#[test]
fn tag_labels_tolerate_trailers() {
    let markers = FormatMarkers::default();
    assert_eq!(markers.tag_label("> <COMMON_NAME>"), Some("COMMON_NAME"));
    assert_eq!(markers.tag_label("> <COMMON_NAME> (12)"), Some("COMMON_NAME"));
    assert_eq!(markers.tag_label("> < SPACED >"), Some("SPACED"));
    assert_eq!(markers.tag_label("> <UNCLOSED"), Some("UNCLOSED"));
    assert_eq!(markers.tag_label("value line"), None);
}

#[test]
fn read_one_parses_from_offset() {
    let config = IndexConfig::default();
    let text = format!("{}{}", RECORD, RECORD.replacen("LMFA01010001", "LMFA01010002", 1));
    let mut src = source(&text);

    let second = scanner::read_one(&mut src, &config, RECORD.len() as u64).expect("second");
    assert_eq!(second.record.id, "LMFA01010002");
    assert_eq!(second.offset, RECORD.len() as u64);

    let first = scanner::read_one(&mut src, &config, 0).expect("first");
    assert_eq!(first.record.id, "LMFA01010001");

    let past_end = scanner::read_one(&mut src, &config, text.len() as u64);
    assert!(matches!(past_end, Err(SdfError::RecordNotFound { .. })));
}
