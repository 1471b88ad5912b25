use std::collections::BTreeMap;

/// Root of a parsed storage-format document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Heading { level: u8, children: Vec<Node> },
    Paragraph(Vec<Node>),
    List { ordered: bool, children: Vec<Node> },
    ListItem(Vec<Node>),
    Emphasis { kind: EmphasisKind, children: Vec<Node> },
    CodeSpan(Vec<Node>),
    Link { href: String, children: Vec<Node> },
    LineBreak,
    Rule,
    Quote(Vec<Node>),
    Text(String),
    Macro(Macro),
    /// Verbatim source of a table; rendered as a placeholder.
    Table(String),
    /// Malformed markup kept as-is.
    Unknown(String),
    /// A tag without a dedicated variant. Renders its children transparently.
    Element(Element),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisKind {
    Bold,
    Italic,
    Strikethrough,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// First direct child element with the given tag name.
    pub fn child_element(&self, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|child| match child {
            Node::Element(el) if el.name == name => Some(el),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MacroKind {
    Code,
    Info,
    Warning,
    Unsupported(String),
}

/// A resolved structured macro.
///
/// For [`MacroKind::Code`] the body is a single verbatim [`Node::Text`]; for
/// admonitions it holds inline nodes only.
#[derive(Debug, Clone, PartialEq)]
pub struct Macro {
    pub kind: MacroKind,
    pub parameters: BTreeMap<String, String>,
    pub body: Vec<Node>,
}

impl Macro {
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

impl Node {
    /// Children of container variants; empty for leaves.
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Heading { children, .. }
            | Node::Paragraph(children)
            | Node::List { children, .. }
            | Node::ListItem(children)
            | Node::Emphasis { children, .. }
            | Node::CodeSpan(children)
            | Node::Link { children, .. }
            | Node::Quote(children) => children,
            Node::Element(el) => &el.children,
            Node::Macro(m) => &m.body,
            Node::LineBreak
            | Node::Rule
            | Node::Text(_)
            | Node::Table(_)
            | Node::Unknown(_) => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Heading { children, .. }
            | Node::Paragraph(children)
            | Node::List { children, .. }
            | Node::ListItem(children)
            | Node::Emphasis { children, .. }
            | Node::CodeSpan(children)
            | Node::Link { children, .. }
            | Node::Quote(children) => Some(children),
            Node::Element(el) => Some(&mut el.children),
            Node::Macro(m) => Some(&mut m.body),
            Node::LineBreak
            | Node::Rule
            | Node::Text(_)
            | Node::Table(_)
            | Node::Unknown(_) => None,
        }
    }

    /// Whether the node lays out as a block rather than flowing inline.
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Node::Heading { .. }
                | Node::Paragraph(_)
                | Node::List { .. }
                | Node::ListItem(_)
                | Node::Rule
                | Node::Quote(_)
                | Node::Macro(_)
                | Node::Table(_)
        )
    }

    /// Concatenated text of all descendants, without any formatting.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::LineBreak => out.push('\n'),
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_content_flattens_descendants() {
        let node = Node::Paragraph(vec![
            Node::Text("a ".to_string()),
            Node::Emphasis {
                kind: EmphasisKind::Bold,
                children: vec![Node::Text("b".to_string())],
            },
            Node::LineBreak,
            Node::Text("c".to_string()),
        ]);
        assert_eq!(node.text_content(), "a b\nc");
    }

    #[test]
    fn test_child_element_lookup() {
        let el = Element {
            name: "ac:structured-macro".to_string(),
            children: vec![
                Node::Text(" ".to_string()),
                Node::Element(Element {
                    name: "ac:rich-text-body".to_string(),
                    ..Default::default()
                }),
            ],
            ..Default::default()
        };
        assert!(el.child_element("ac:rich-text-body").is_some());
        assert!(el.child_element("ac:plain-text-body").is_none());
    }
}
