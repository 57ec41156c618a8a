//! Identifier scanning for autocomplete.
//!
//! A stateless single pass over raw text with three states: skip
//! whitespace, skip `%%` comments, consume an identifier. Identifiers are
//! runs of ASCII letters, digits, and underscores; dialect keywords and
//! within-scan duplicates are dropped, survivors are interned through the
//! caller-owned pool and returned in first-seen order.

use rustc_hash::FxHashSet;

use crate::base::{IStr, Interner};
use crate::structure::DiagramType;

/// Collect candidate identifiers from `text`.
pub fn scan_identifiers(text: &str, diagram: DiagramType, interner: &mut Interner) -> Vec<IStr> {
    let bytes = text.as_bytes();
    let keywords = dialect_keywords(diagram);
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut out = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b <= b' ' {
            i += 1;
            continue;
        }
        if b == b'%' && bytes.get(i + 1) == Some(&b'%') {
            while i < bytes.len() && bytes[i] != b'\n' {
                i += 1;
            }
            continue;
        }
        if is_identifier_byte(b) {
            let start = i;
            while i < bytes.len() && is_identifier_byte(bytes[i]) {
                i += 1;
            }
            let word = &text[start..i];
            if !keywords.contains(&word) && seen.insert(word) {
                out.push(interner.intern(word));
            }
            continue;
        }
        i += 1;
    }
    out
}

fn is_identifier_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Keyword denylist for a dialect: declaration keywords and structural
/// vocabulary that autocomplete should never offer back as identifiers.
fn dialect_keywords(diagram: DiagramType) -> &'static [&'static str] {
    match diagram {
        DiagramType::Flowchart | DiagramType::FlowchartElk | DiagramType::Graph => &[
            "flowchart", "graph", "subgraph", "end", "direction", "TB", "TD", "BT", "RL", "LR",
            "style", "classDef", "class", "linkStyle", "click", "href",
        ],
        DiagramType::Sequence => &[
            "sequenceDiagram",
            "participant",
            "actor",
            "as",
            "activate",
            "deactivate",
            "note",
            "over",
            "loop",
            "alt",
            "else",
            "opt",
            "par",
            "and",
            "critical",
            "option",
            "break",
            "rect",
            "end",
            "autonumber",
            "box",
            "create",
            "destroy",
        ],
        DiagramType::Class | DiagramType::ClassV2 => &[
            "classDiagram", "class", "namespace", "direction", "note", "for", "link", "style",
        ],
        DiagramType::State | DiagramType::StateV2 => &[
            "stateDiagram", "state", "direction", "note", "as", "end",
        ],
        DiagramType::EntityRelationship => &["erDiagram"],
        DiagramType::Gantt => &[
            "gantt",
            "title",
            "dateFormat",
            "axisFormat",
            "excludes",
            "includes",
            "todayMarker",
            "section",
            "done",
            "active",
            "crit",
            "milestone",
            "after",
        ],
        DiagramType::Pie => &["pie", "title", "showData"],
        DiagramType::Mindmap => &["mindmap"],
        DiagramType::Timeline => &["timeline", "title", "section"],
        DiagramType::UserJourney => &["journey", "title", "section"],
        DiagramType::GitGraph => &[
            "gitGraph", "commit", "branch", "checkout", "switch", "merge", "id", "tag", "type",
            "order",
        ],
        DiagramType::C4Context
        | DiagramType::C4Container
        | DiagramType::C4Component
        | DiagramType::C4Dynamic
        | DiagramType::C4Deployment => &[
            "Person",
            "Person_Ext",
            "System",
            "System_Ext",
            "SystemDb",
            "SystemQueue",
            "Container",
            "ContainerDb",
            "ContainerQueue",
            "Component",
            "ComponentDb",
            "ComponentQueue",
            "Enterprise_Boundary",
            "System_Boundary",
            "Container_Boundary",
            "Boundary",
            "Rel",
            "BiRel",
            "Rel_U",
            "Rel_D",
            "Rel_L",
            "Rel_R",
        ],
        DiagramType::ArchitectureBeta => &["group", "service", "junction", "edge", "in"],
        DiagramType::Block => &["columns", "block", "end", "space", "style", "classDef", "class"],
        DiagramType::Requirement => &[
            "requirementDiagram",
            "requirement",
            "functionalRequirement",
            "performanceRequirement",
            "interfaceRequirement",
            "physicalRequirement",
            "designConstraint",
            "element",
            "id",
            "text",
            "risk",
            "verifymethod",
            "type",
            "docref",
            "satisfies",
            "traces",
            "contains",
            "derives",
            "refines",
            "verifies",
            "copies",
        ],
        DiagramType::Sankey => &[],
        DiagramType::XyChart => &[
            "xychart", "title", "x", "y", "line", "bar",
        ],
        DiagramType::Quadrant => &["quadrantChart", "title"],
        DiagramType::Packet => &["title"],
        DiagramType::Kanban => &["kanban"],
        DiagramType::Radar => &["title"],
        DiagramType::Treemap => &["title"],
        DiagramType::Unknown => &[],
    }
}
