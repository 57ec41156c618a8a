//! Structure Analysis Tests
//!
//! Frontmatter boundary detection, dialect detection, and cache coherence
//! of the incremental analyzer against from-scratch rescans.

use diagmark::base::{TextRange, TextSize};
use diagmark::{
    DiagramType, Document, DocumentContext, MemoryDocument, StructureAnalyzer,
};

fn fresh_diagram_type(doc: &MemoryDocument) -> DiagramType {
    StructureAnalyzer::new().diagram_type(doc)
}

#[test]
fn test_frontmatter_then_flowchart() {
    let doc = MemoryDocument::from("---\ntitle: x\n---\nflowchart TD\n  A-->B");
    let mut analyzer = StructureAnalyzer::new();

    let bounds = analyzer.frontmatter_bounds(&doc);
    assert_eq!(bounds.start, Some(1));
    assert_eq!(bounds.end, Some(3));
    assert_eq!(analyzer.diagram_type(&doc), DiagramType::Flowchart);
    assert_eq!(analyzer.line_context(&doc, 4), DocumentContext::Diagram);
    assert_eq!(analyzer.line_context(&doc, 5), DocumentContext::Diagram);
}

#[test]
fn test_delimiters_beyond_line_100_never_recognized() {
    // Opening delimiter on line 101: no frontmatter at all.
    let mut text = "pie\n".to_string();
    text.push_str(&"filler\n".repeat(99));
    text.push_str("---\nkey: v\n---");
    let doc = MemoryDocument::from(text.as_str());
    let mut analyzer = StructureAnalyzer::new();
    assert!(analyzer.frontmatter_bounds(&doc).is_none());
    assert_eq!(analyzer.diagram_type(&doc), DiagramType::Pie);
}

#[test]
fn test_unclosed_frontmatter_swallows_the_document() {
    let doc = MemoryDocument::from("---\ntitle: x\nflowchart TD\nA-->B");
    let mut analyzer = StructureAnalyzer::new();
    let bounds = analyzer.frontmatter_bounds(&doc);
    assert_eq!(bounds.start, Some(1));
    assert_eq!(bounds.end, None);
    assert_eq!(analyzer.line_context(&doc, 3), DocumentContext::Frontmatter);
    // The would-be declaration sits inside the unclosed block, so no
    // dialect is found.
    assert_eq!(analyzer.diagram_type(&doc), DiagramType::Unknown);
}

#[test]
fn test_declaration_skips_blanks_and_comments() {
    let doc = MemoryDocument::from("\n%% generated\n\n  stateDiagram-v2\n  [*] --> Idle");
    let mut analyzer = StructureAnalyzer::new();
    assert_eq!(analyzer.diagram_type(&doc), DiagramType::StateV2);
}

#[test]
fn test_incremental_analyzer_matches_rescan_over_edit_sequence() {
    let mut doc = MemoryDocument::from("---\ntitle: one\n---\nflowchart TD\nA-->B\nB-->C");
    let mut analyzer = StructureAnalyzer::new();
    assert_eq!(analyzer.diagram_type(&doc), fresh_diagram_type(&doc));

    // Edit far below the frontmatter.
    let end = doc.len();
    doc.insert(end, "\nC-->D").unwrap();
    assert_eq!(analyzer.diagram_type(&doc), fresh_diagram_type(&doc));

    // Edit the title, inside the cached region.
    let line2 = doc.line(2).unwrap();
    doc.replace(line2.range(), "title: two").unwrap();
    assert_eq!(analyzer.diagram_type(&doc), fresh_diagram_type(&doc));

    // Break the closing delimiter, making the frontmatter unclosed.
    let line3 = doc.line(3).unwrap();
    doc.insert(line3.offset, "broken ").unwrap();
    assert_eq!(analyzer.diagram_type(&doc), fresh_diagram_type(&doc));
    assert_eq!(analyzer.diagram_type(&doc), DiagramType::Unknown);

    // Restore it.
    doc.remove(TextRange::at(doc.line(3).unwrap().offset, TextSize::new(7)))
        .unwrap();
    assert_eq!(analyzer.diagram_type(&doc), fresh_diagram_type(&doc));
    assert_eq!(analyzer.diagram_type(&doc), DiagramType::Flowchart);

    // Swap the declaration to a different dialect.
    let decl = doc.line(4).unwrap();
    doc.replace(decl.range(), "erDiagram").unwrap();
    assert_eq!(analyzer.diagram_type(&doc), fresh_diagram_type(&doc));
    assert_eq!(analyzer.diagram_type(&doc), DiagramType::EntityRelationship);
}

#[test]
fn test_declaration_line_tracks_insertions_above() {
    let mut doc = MemoryDocument::from("gantt\nsection A");
    let mut analyzer = StructureAnalyzer::new();
    assert_eq!(analyzer.declaration_line(&doc), Some(1));

    doc.insert(TextSize::new(0), "---\ntitle: g\n---\n").unwrap();
    assert_eq!(analyzer.declaration_line(&doc), Some(4));
    assert_eq!(analyzer.diagram_type(&doc), DiagramType::Gantt);
}

#[test]
fn test_analyzer_caches_survive_unrelated_edits() {
    let mut doc = MemoryDocument::from("---\na: 1\n---\njourney\nsection S");
    let mut analyzer = StructureAnalyzer::new();
    assert_eq!(analyzer.diagram_type(&doc), DiagramType::UserJourney);

    // A burst of appends below both cached regions.
    for i in 0..20 {
        let end = doc.len();
        doc.insert(end, &format!("\nstep{i}: 3")).unwrap();
        assert_eq!(analyzer.diagram_type(&doc), DiagramType::UserJourney);
    }
    assert_eq!(analyzer.frontmatter_bounds(&doc).end, Some(3));
}
