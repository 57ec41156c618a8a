//! Diagram dialect detection.
//!
//! A document's dialect is named by its declaration line: the first
//! significant line after any closed frontmatter, e.g. `flowchart TD` or
//! `sequenceDiagram`. Keyword matching tries the exact table first, then a
//! fixed-order list of prefix rules for families with suffixed variants;
//! the precedence is part of the contract and covered by tests.

use std::fmt;

use smol_str::SmolStr;

/// The supported diagram grammars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramType {
    Flowchart,
    FlowchartElk,
    Graph,
    Sequence,
    State,
    StateV2,
    Class,
    ClassV2,
    EntityRelationship,
    Gantt,
    Pie,
    Mindmap,
    Timeline,
    UserJourney,
    GitGraph,
    C4Context,
    C4Container,
    C4Component,
    C4Dynamic,
    C4Deployment,
    ArchitectureBeta,
    Block,
    Requirement,
    Sankey,
    XyChart,
    Quadrant,
    Packet,
    Kanban,
    Radar,
    Treemap,
    Unknown,
}

impl DiagramType {
    /// Canonical declaration keyword for this dialect.
    pub fn keyword(&self) -> &'static str {
        match self {
            DiagramType::Flowchart => "flowchart",
            DiagramType::FlowchartElk => "flowchart-elk",
            DiagramType::Graph => "graph",
            DiagramType::Sequence => "sequenceDiagram",
            DiagramType::State => "stateDiagram",
            DiagramType::StateV2 => "stateDiagram-v2",
            DiagramType::Class => "classDiagram",
            DiagramType::ClassV2 => "classDiagram-v2",
            DiagramType::EntityRelationship => "erDiagram",
            DiagramType::Gantt => "gantt",
            DiagramType::Pie => "pie",
            DiagramType::Mindmap => "mindmap",
            DiagramType::Timeline => "timeline",
            DiagramType::UserJourney => "journey",
            DiagramType::GitGraph => "gitGraph",
            DiagramType::C4Context => "C4Context",
            DiagramType::C4Container => "C4Container",
            DiagramType::C4Component => "C4Component",
            DiagramType::C4Dynamic => "C4Dynamic",
            DiagramType::C4Deployment => "C4Deployment",
            DiagramType::ArchitectureBeta => "architecture-beta",
            DiagramType::Block => "block-beta",
            DiagramType::Requirement => "requirementDiagram",
            DiagramType::Sankey => "sankey-beta",
            DiagramType::XyChart => "xychart-beta",
            DiagramType::Quadrant => "quadrantChart",
            DiagramType::Packet => "packet-beta",
            DiagramType::Kanban => "kanban",
            DiagramType::Radar => "radar-beta",
            DiagramType::Treemap => "treemap-beta",
            DiagramType::Unknown => "unknown",
        }
    }

    /// Dialects whose hierarchy is expressed purely through user-controlled
    /// indentation; auto-indent never deepens these.
    pub fn is_indentation_based(&self) -> bool {
        matches!(
            self,
            DiagramType::Mindmap | DiagramType::Treemap | DiagramType::Kanban
        )
    }

    /// Flowchart-family dialects sharing the `subgraph`/`end` vocabulary.
    pub fn is_flowchart_family(&self) -> bool {
        matches!(
            self,
            DiagramType::Flowchart | DiagramType::FlowchartElk | DiagramType::Graph
        )
    }

    pub fn is_c4(&self) -> bool {
        matches!(
            self,
            DiagramType::C4Context
                | DiagramType::C4Container
                | DiagramType::C4Component
                | DiagramType::C4Dynamic
                | DiagramType::C4Deployment
        )
    }
}

impl fmt::Display for DiagramType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// The cached diagram declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramDeclaration {
    /// 1-based line number of the declaration.
    pub line: usize,
    /// Declaration text, trimmed, internal whitespace runs collapsed.
    pub normalized: SmolStr,
    pub diagram_type: DiagramType,
}

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_declaration(line: &str) -> SmolStr {
    let mut out = String::with_capacity(line.len());
    for word in line.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    SmolStr::from(out)
}

/// First whitespace-delimited word, or `""` for blank input.
pub fn first_word(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or("")
}

/// Whether a line can be the diagram declaration: non-blank and not a
/// diagram comment.
pub fn is_declaration_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    !trimmed.is_empty() && !trimmed.starts_with("%%")
}

/// Map a declaration keyword to its dialect.
///
/// Matching is ASCII-case-insensitive. Exact keywords win; the prefix
/// rules below only see tokens the exact table rejected.
pub fn parse_declaration_keyword(token: &str) -> DiagramType {
    let lower = token.to_ascii_lowercase();

    let exact = match lower.as_str() {
        "flowchart" => Some(DiagramType::Flowchart),
        "flowchart-elk" => Some(DiagramType::FlowchartElk),
        "graph" => Some(DiagramType::Graph),
        "sequencediagram" => Some(DiagramType::Sequence),
        "statediagram" => Some(DiagramType::State),
        "statediagram-v2" => Some(DiagramType::StateV2),
        "classdiagram" => Some(DiagramType::Class),
        "classdiagram-v2" => Some(DiagramType::ClassV2),
        "erdiagram" => Some(DiagramType::EntityRelationship),
        "gantt" => Some(DiagramType::Gantt),
        "pie" => Some(DiagramType::Pie),
        "mindmap" => Some(DiagramType::Mindmap),
        "timeline" => Some(DiagramType::Timeline),
        "journey" => Some(DiagramType::UserJourney),
        "gitgraph" => Some(DiagramType::GitGraph),
        "requirementdiagram" => Some(DiagramType::Requirement),
        "quadrantchart" => Some(DiagramType::Quadrant),
        "kanban" => Some(DiagramType::Kanban),
        "block-beta" => Some(DiagramType::Block),
        "sankey-beta" => Some(DiagramType::Sankey),
        "xychart-beta" => Some(DiagramType::XyChart),
        "packet-beta" => Some(DiagramType::Packet),
        "radar-beta" => Some(DiagramType::Radar),
        "treemap-beta" => Some(DiagramType::Treemap),
        "architecture-beta" => Some(DiagramType::ArchitectureBeta),
        _ => None,
    };
    if let Some(diagram) = exact {
        return diagram;
    }

    // Prefix rules, fixed order. Families with suffixed variants only.
    if lower.starts_with("flowchart") {
        DiagramType::Flowchart
    } else if lower.starts_with("graph") {
        DiagramType::Graph
    } else if lower.starts_with("statediagram") {
        DiagramType::State
    } else if lower.starts_with("c4") {
        match lower.as_str() {
            "c4context" => DiagramType::C4Context,
            "c4container" => DiagramType::C4Container,
            "c4component" => DiagramType::C4Component,
            "c4dynamic" => DiagramType::C4Dynamic,
            "c4deployment" => DiagramType::C4Deployment,
            _ => DiagramType::Unknown,
        }
    } else if lower.starts_with("architecture") {
        DiagramType::ArchitectureBeta
    } else if lower.starts_with("block") {
        DiagramType::Block
    } else if lower.starts_with("sankey") {
        DiagramType::Sankey
    } else if lower.starts_with("xychart") {
        DiagramType::XyChart
    } else if lower.starts_with("packet") {
        DiagramType::Packet
    } else if lower.starts_with("radar") {
        DiagramType::Radar
    } else if lower.starts_with("treemap") {
        DiagramType::Treemap
    } else {
        DiagramType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("flowchart", DiagramType::Flowchart)]
    #[case("flowchart-elk", DiagramType::FlowchartElk)]
    #[case("graph", DiagramType::Graph)]
    #[case("sequenceDiagram", DiagramType::Sequence)]
    #[case("stateDiagram", DiagramType::State)]
    #[case("stateDiagram-v2", DiagramType::StateV2)]
    #[case("classDiagram", DiagramType::Class)]
    #[case("classDiagram-v2", DiagramType::ClassV2)]
    #[case("erDiagram", DiagramType::EntityRelationship)]
    #[case("gantt", DiagramType::Gantt)]
    #[case("pie", DiagramType::Pie)]
    #[case("mindmap", DiagramType::Mindmap)]
    #[case("timeline", DiagramType::Timeline)]
    #[case("journey", DiagramType::UserJourney)]
    #[case("gitGraph", DiagramType::GitGraph)]
    #[case("requirementDiagram", DiagramType::Requirement)]
    #[case("quadrantChart", DiagramType::Quadrant)]
    #[case("kanban", DiagramType::Kanban)]
    #[case("C4Context", DiagramType::C4Context)]
    #[case("C4Deployment", DiagramType::C4Deployment)]
    #[case("architecture-beta", DiagramType::ArchitectureBeta)]
    #[case("block-beta", DiagramType::Block)]
    #[case("sankey-beta", DiagramType::Sankey)]
    #[case("xychart-beta", DiagramType::XyChart)]
    #[case("packet-beta", DiagramType::Packet)]
    #[case("radar-beta", DiagramType::Radar)]
    #[case("treemap-beta", DiagramType::Treemap)]
    fn test_exact_keywords(#[case] token: &str, #[case] expected: DiagramType) {
        assert_eq!(parse_declaration_keyword(token), expected);
    }

    #[rstest]
    #[case("flowchart-unreleased", DiagramType::Flowchart)]
    #[case("graphX", DiagramType::Graph)]
    #[case("stateDiagram-v3", DiagramType::State)]
    #[case("architecture", DiagramType::ArchitectureBeta)]
    #[case("blocky", DiagramType::Block)]
    #[case("sankey", DiagramType::Sankey)]
    #[case("xychart", DiagramType::XyChart)]
    #[case("packet", DiagramType::Packet)]
    #[case("radar", DiagramType::Radar)]
    #[case("treemap", DiagramType::Treemap)]
    #[case("C4Bogus", DiagramType::Unknown)]
    #[case("pieChartX", DiagramType::Unknown)]
    #[case("", DiagramType::Unknown)]
    fn test_prefix_rules(#[case] token: &str, #[case] expected: DiagramType) {
        assert_eq!(parse_declaration_keyword(token), expected);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert_eq!(
            parse_declaration_keyword("SEQUENCEDIAGRAM"),
            DiagramType::Sequence
        );
        assert_eq!(parse_declaration_keyword("Flowchart"), DiagramType::Flowchart);
        assert_eq!(parse_declaration_keyword("c4context"), DiagramType::C4Context);
    }

    #[test]
    fn test_normalize_declaration() {
        assert_eq!(normalize_declaration("  flowchart    TD  "), "flowchart TD");
        assert_eq!(normalize_declaration("\tgraph\t LR"), "graph LR");
        assert_eq!(normalize_declaration("   "), "");
    }

    #[test]
    fn test_declaration_line_predicate() {
        assert!(is_declaration_line("flowchart TD"));
        assert!(is_declaration_line("  pie"));
        assert!(!is_declaration_line(""));
        assert!(!is_declaration_line("   "));
        assert!(!is_declaration_line("%% a comment"));
    }

    #[test]
    fn test_first_word() {
        assert_eq!(first_word("flowchart TD"), "flowchart");
        assert_eq!(first_word("  gantt "), "gantt");
        assert_eq!(first_word(""), "");
    }
}
