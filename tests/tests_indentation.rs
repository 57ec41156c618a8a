//! Indentation Engine Tests
//!
//! Batched re-indentation across structural contexts, the YAML spacing
//! pass, idempotence, and undo grouping.

use diagmark::{
    Document, IndentUnit, IndentationEngine, MemoryDocument, StructureAnalyzer,
};

fn reindent_all(doc: &mut MemoryDocument, engine: &IndentationEngine) {
    let mut analyzer = StructureAnalyzer::new();
    let last = doc.line_count();
    engine.indent_lines(doc, &mut analyzer, 1, last).unwrap();
}

#[test]
fn test_subgraph_block_indents_body() {
    let mut doc = MemoryDocument::from("flowchart TD\nsubgraph g1\nA-->B\nend");
    let mut analyzer = StructureAnalyzer::new();
    let engine = IndentationEngine::default();

    engine.indent_line(&mut doc, &mut analyzer, 3).unwrap();
    assert_eq!(doc.line_text(3).unwrap(), "    A-->B");

    engine.indent_line(&mut doc, &mut analyzer, 4).unwrap();
    assert_eq!(doc.line_text(4).unwrap(), "end");
}

#[test]
fn test_mindmap_hierarchy_is_user_controlled() {
    let mut doc = MemoryDocument::from("mindmap\nroot\n    child\nnewline");
    let mut analyzer = StructureAnalyzer::new();
    IndentationEngine::default()
        .indent_line(&mut doc, &mut analyzer, 4)
        .unwrap();
    // Copies the previous line's indentation verbatim, no auto-increase.
    assert_eq!(doc.line_text(4).unwrap(), "    newline");
}

#[test]
fn test_yaml_colon_spacing_normalized() {
    let mut doc = MemoryDocument::from("---\nkey:value\n---\npie");
    let mut analyzer = StructureAnalyzer::new();
    IndentationEngine::default()
        .indent_lines(&mut doc, &mut analyzer, 4, 4)
        .unwrap();
    assert_eq!(doc.line_text(2).unwrap(), "key: value");
}

#[test]
fn test_sequence_else_aligns_with_alt() {
    let mut doc =
        MemoryDocument::from("sequenceDiagram\nalt ok\nA->>B: yes\nelse failed\nA->>B: no\nend");
    let engine = IndentationEngine::new(IndentUnit::Spaces(2));
    reindent_all(&mut doc, &engine);
    assert_eq!(doc.line_text(2).unwrap(), "  alt ok");
    assert_eq!(doc.line_text(3).unwrap(), "    A->>B: yes");
    assert_eq!(doc.line_text(4).unwrap(), "  else failed");
    assert_eq!(doc.line_text(5).unwrap(), "    A->>B: no");
    assert_eq!(doc.line_text(6).unwrap(), "  end");
}

#[test]
fn test_state_braces_indent_and_close() {
    let mut doc =
        MemoryDocument::from("stateDiagram-v2\nstate Moving {\nslow --> fast\n}\n[*] --> Moving");
    let engine = IndentationEngine::new(IndentUnit::Spaces(2));
    reindent_all(&mut doc, &engine);
    assert_eq!(doc.line_text(2).unwrap(), "  state Moving {");
    assert_eq!(doc.line_text(3).unwrap(), "    slow --> fast");
    assert_eq!(doc.line_text(4).unwrap(), "  }");
    assert_eq!(doc.line_text(5).unwrap(), "  [*] --> Moving");
}

#[test]
fn test_reindent_is_idempotent() {
    let mut doc = MemoryDocument::from(
        "---\ntitle:demo\nconfig:\ntheme: dark\n---\nflowchart LR\nsubgraph outer\nsubgraph inner\na-->b\nend\nend",
    );
    let engine = IndentationEngine::default();
    reindent_all(&mut doc, &engine);
    let once = doc.text_all().to_string();
    reindent_all(&mut doc, &engine);
    assert_eq!(doc.text_all(), once);
    // And the YAML fix applied exactly once.
    assert_eq!(doc.line_text(2).unwrap().trim(), "title: demo");
}

#[test]
fn test_batch_is_one_undo_step() {
    let original = "---\nkey:v\n---\nflowchart TD\nsubgraph g\nA-->B\nend";
    let mut doc = MemoryDocument::from(original);
    let engine = IndentationEngine::default();
    reindent_all(&mut doc, &engine);
    assert_ne!(doc.text_all(), original);
    assert!(doc.undo());
    assert_eq!(doc.text_all(), original);
}

#[test]
fn test_tab_indentation() {
    let mut doc = MemoryDocument::from("flowchart TD\nsubgraph g\nA-->B\nend");
    let engine = IndentationEngine::new(IndentUnit::Tabs);
    reindent_all(&mut doc, &engine);
    assert_eq!(doc.line_text(2).unwrap(), "\tsubgraph g");
    assert_eq!(doc.line_text(3).unwrap(), "\t\tA-->B");
    assert_eq!(doc.line_text(4).unwrap(), "\tend");
}

#[test]
fn test_unknown_dialect_copies_indentation() {
    let mut doc = MemoryDocument::from("someDiagram\n  first\nsecond");
    let mut analyzer = StructureAnalyzer::new();
    IndentationEngine::default()
        .indent_line(&mut doc, &mut analyzer, 3)
        .unwrap();
    assert_eq!(doc.line_text(3).unwrap(), "  second");
}
