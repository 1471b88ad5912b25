//! Structured-macro resolution.
//!
//! Rewrites generic `ac:*` elements left by the tree builder into typed
//! nodes: code blocks, admonitions, links, or placeholders for macros the
//! renderer does not understand.

use crate::core::ast::{Document, Element, Macro, MacroKind, Node};
use std::collections::BTreeMap;

const STRUCTURED_MACRO: &str = "ac:structured-macro";
const PARAMETER: &str = "ac:parameter";
const PLAIN_TEXT_BODY: &str = "ac:plain-text-body";
const RICH_TEXT_BODY: &str = "ac:rich-text-body";

pub fn resolve_macros(document: Document) -> Document {
    Document {
        children: resolve_all(document.children),
    }
}

fn resolve_all(nodes: Vec<Node>) -> Vec<Node> {
    nodes.into_iter().filter_map(resolve_node).collect()
}

fn resolve_node(node: Node) -> Option<Node> {
    match node {
        Node::Element(el) => resolve_element(el),
        mut other => {
            if let Some(children) = other.children_mut() {
                let resolved = resolve_all(std::mem::take(children));
                *children = resolved;
            }
            Some(other)
        }
    }
}

fn resolve_element(el: Element) -> Option<Node> {
    match el.name.as_str() {
        STRUCTURED_MACRO => Some(Node::Macro(resolve_structured_macro(el))),
        // Parameters only mean something inside a macro.
        PARAMETER => None,
        "pre" => Some(Node::Macro(Macro {
            kind: MacroKind::Code,
            parameters: BTreeMap::new(),
            body: vec![Node::Text(Node::Element(el).text_content())],
        })),
        "ac:link" => Some(resolve_link(el)),
        _ => Some(Node::Element(Element {
            children: resolve_all(el.children),
            ..el
        })),
    }
}

fn resolve_structured_macro(el: Element) -> Macro {
    let name = el
        .attr("ac:name")
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("unnamed")
        .to_ascii_lowercase();
    let parameters = collect_parameters(&el);

    match name.as_str() {
        "code" => {
            let code = el
                .child_element(PLAIN_TEXT_BODY)
                .map(|body| Node::Element(body.clone()).text_content())
                .unwrap_or_default();
            Macro {
                kind: MacroKind::Code,
                parameters,
                body: vec![Node::Text(code)],
            }
        }
        "info" | "warning" => {
            let kind = if name == "info" {
                MacroKind::Info
            } else {
                MacroKind::Warning
            };
            let body = el
                .children
                .into_iter()
                .find_map(|child| match child {
                    Node::Element(body) if body.name == RICH_TEXT_BODY => Some(body.children),
                    _ => None,
                })
                .map(|children| flatten_inline(resolve_all(children)))
                .unwrap_or_default();
            Macro {
                kind,
                parameters,
                body,
            }
        }
        _ => {
            tracing::warn!(name = %name, "unsupported structured macro");
            Macro {
                kind: MacroKind::Unsupported(name),
                parameters,
                body: Vec::new(),
            }
        }
    }
}

fn collect_parameters(el: &Element) -> BTreeMap<String, String> {
    el.children
        .iter()
        .filter_map(|child| match child {
            Node::Element(param) if param.name == PARAMETER => {
                let key = param.attr("ac:name").unwrap_or_default().to_string();
                let value = Node::Element(param.clone()).text_content();
                Some((key, value.trim().to_string()))
            }
            _ => None,
        })
        .collect()
}

/// Strips block structure, keeping inline nodes. Adjacent blocks are joined
/// by a single space.
fn flatten_inline(nodes: Vec<Node>) -> Vec<Node> {
    let mut out = Vec::new();
    push_flattened(nodes, &mut out);
    while matches!(out.last(), Some(Node::Text(t)) if t.trim().is_empty()) {
        out.pop();
    }
    out
}

fn push_flattened(nodes: Vec<Node>, out: &mut Vec<Node>) {
    for node in nodes {
        match node {
            Node::Heading { children, .. }
            | Node::Paragraph(children)
            | Node::List { children, .. }
            | Node::ListItem(children)
            | Node::Quote(children) => {
                push_flattened(children, out);
                separate_block(out);
            }
            Node::Element(el) => push_flattened(el.children, out),
            Node::Macro(m) => {
                push_flattened(m.body, out);
                separate_block(out);
            }
            Node::Rule | Node::Table(_) => separate_block(out),
            inline => out.push(inline),
        }
    }
}

fn separate_block(out: &mut Vec<Node>) {
    let ends_with_space = match out.last() {
        None => true,
        Some(Node::Text(t)) => t.ends_with(char::is_whitespace),
        Some(Node::LineBreak) => true,
        Some(_) => false,
    };
    if !ends_with_space {
        out.push(Node::Text(" ".to_string()));
    }
}

/// `<ac:link>` points at a page, attachment or URL through an `ri:*` child.
fn resolve_link(el: Element) -> Node {
    let target = el.children.iter().find_map(|child| match child {
        Node::Element(resource) if resource.name.starts_with("ri:") => resource
            .attr("ri:value")
            .or_else(|| resource.attr("ri:content-title"))
            .or_else(|| resource.attr("ri:filename"))
            .map(str::to_string),
        _ => None,
    });
    let href = target.clone().unwrap_or_default();

    let mut children = el
        .child_element("ac:link-body")
        .or_else(|| el.child_element("ac:plain-text-link-body"))
        .map(|body| resolve_all(body.children.clone()))
        .unwrap_or_default();
    if children.is_empty() {
        if let Some(title) = target {
            children.push(Node::Text(title));
        }
    }

    Node::Link { href, children }
}
