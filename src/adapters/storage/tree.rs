//! Stack-based tree builder.

use super::lexer::{Token, TokenKind};
use crate::core::ast::{Document, Element, EmphasisKind, Node};
use std::collections::BTreeMap;

struct Frame {
    tag: String,
    node: Node,
}

/// Builds a [`Document`] from a token stream.
///
/// Close tags pop up to the nearest open element of the same name, so
/// overlapping or unclosed inner tags are closed along the way. Close tags
/// with no opener are dropped. Elements still open at end of input are
/// closed innermost first and kept.
#[derive(Default)]
pub struct TreeBuilder {
    root: Vec<Node>,
    stack: Vec<Frame>,
    table: Option<TableCapture>,
}

struct TableCapture {
    raw: String,
    depth: usize,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<'a>(mut self, tokens: impl IntoIterator<Item = Token<'a>>) -> Document {
        for token in tokens {
            self.push_token(token);
        }
        self.finish()
    }

    fn push_token(&mut self, token: Token<'_>) {
        if self.table.is_some() {
            self.capture_table_token(&token);
            return;
        }

        match token.kind {
            TokenKind::Text | TokenKind::CData => {
                if !token.text.is_empty() {
                    self.attach(Node::Text(token.text.into_owned()));
                }
            }
            TokenKind::Unknown => self.attach(Node::Unknown(token.raw.to_string())),
            TokenKind::Open | TokenKind::SelfClosing if token.name == "table" => {
                if token.kind == TokenKind::SelfClosing {
                    self.attach(Node::Table(token.raw.to_string()));
                } else {
                    self.table = Some(TableCapture {
                        raw: token.raw.to_string(),
                        depth: 1,
                    });
                }
            }
            TokenKind::Open if !is_void(&token.name) => {
                let node = node_for_tag(&token.name, token.attrs);
                self.stack.push(Frame {
                    tag: token.name,
                    node,
                });
            }
            TokenKind::Open | TokenKind::SelfClosing => {
                let node = node_for_tag(&token.name, token.attrs);
                self.attach(node);
            }
            TokenKind::Close => self.close(&token.name),
        }
    }

    fn capture_table_token(&mut self, token: &Token<'_>) {
        let Some(capture) = self.table.as_mut() else {
            return;
        };
        capture.raw.push_str(token.raw);
        if token.name == "table" {
            match token.kind {
                TokenKind::Open => capture.depth += 1,
                TokenKind::Close => capture.depth -= 1,
                _ => {}
            }
        }
        if capture.depth == 0 {
            if let Some(capture) = self.table.take() {
                self.attach(Node::Table(capture.raw));
            }
        }
    }

    fn close(&mut self, tag: &str) {
        let Some(index) = self.stack.iter().rposition(|frame| frame.tag == tag) else {
            tracing::debug!(tag, "ignoring close tag without opener");
            return;
        };
        while self.stack.len() > index {
            self.pop();
        }
    }

    fn pop(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.attach(frame.node);
        }
    }

    fn attach(&mut self, node: Node) {
        let children = match self.stack.last_mut() {
            Some(frame) => match frame.node.children_mut() {
                Some(children) => children,
                None => &mut self.root,
            },
            None => &mut self.root,
        };
        children.push(node);
    }

    fn finish(mut self) -> Document {
        if let Some(capture) = self.table.take() {
            self.attach(Node::Table(capture.raw));
        }
        while !self.stack.is_empty() {
            self.pop();
        }
        Document {
            children: self.root,
        }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "br" | "hr")
}

fn node_for_tag(tag: &str, attrs: BTreeMap<String, String>) -> Node {
    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => Node::Heading {
            level: tag.as_bytes()[1] - b'0',
            children: Vec::new(),
        },
        "p" => Node::Paragraph(Vec::new()),
        "ul" => Node::List {
            ordered: false,
            children: Vec::new(),
        },
        "ol" => Node::List {
            ordered: true,
            children: Vec::new(),
        },
        "li" => Node::ListItem(Vec::new()),
        "strong" | "b" => emphasis(EmphasisKind::Bold),
        "em" | "i" => emphasis(EmphasisKind::Italic),
        "s" | "del" | "strike" => emphasis(EmphasisKind::Strikethrough),
        "code" => Node::CodeSpan(Vec::new()),
        "a" => Node::Link {
            href: attrs.get("href").cloned().unwrap_or_default(),
            children: Vec::new(),
        },
        "br" => Node::LineBreak,
        "hr" => Node::Rule,
        "blockquote" => Node::Quote(Vec::new()),
        _ => Node::Element(Element {
            name: tag.to_string(),
            attrs,
            children: Vec::new(),
        }),
    }
}

fn emphasis(kind: EmphasisKind) -> Node {
    Node::Emphasis {
        kind,
        children: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::lexer::Tokenizer;

    fn build(input: &str) -> Document {
        TreeBuilder::new().build(Tokenizer::new(input))
    }

    fn text(s: &str) -> Node {
        Node::Text(s.to_string())
    }

    #[test]
    fn test_nested_lists_attach_to_correct_parent() {
        let doc = build("<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>");
        assert_eq!(doc.children.len(), 1);
        let Node::List { children: items, .. } = &doc.children[0] else {
            panic!("expected list, got {:?}", doc.children[0]);
        };
        assert_eq!(items.len(), 2);
        let inner = items[0].children();
        assert_eq!(inner[0], text("a"));
        assert!(matches!(inner[1], Node::List { ordered: false, .. }));
        assert_eq!(items[1], Node::ListItem(vec![text("c")]));
    }

    #[test]
    fn test_close_tag_pops_intervening_unclosed() {
        let doc = build("<p>a<strong>b</p>c");
        assert_eq!(
            doc.children,
            vec![
                Node::Paragraph(vec![
                    text("a"),
                    Node::Emphasis {
                        kind: EmphasisKind::Bold,
                        children: vec![text("b")],
                    },
                ]),
                text("c"),
            ]
        );
    }

    #[test]
    fn test_unmatched_close_is_ignored() {
        let doc = build("<p>a</em>b</p>");
        assert_eq!(doc.children, vec![Node::Paragraph(vec![text("a"), text("b")])]);
    }

    #[test]
    fn test_unclosed_elements_are_force_closed() {
        let doc = build("<p>x<strong>y");
        assert_eq!(
            doc.children,
            vec![Node::Paragraph(vec![
                text("x"),
                Node::Emphasis {
                    kind: EmphasisKind::Bold,
                    children: vec![text("y")],
                },
            ])]
        );
    }

    #[test]
    fn test_void_line_break_without_slash() {
        let doc = build("<p>a<br>b</p>");
        assert_eq!(
            doc.children,
            vec![Node::Paragraph(vec![text("a"), Node::LineBreak, text("b")])]
        );
    }

    #[test]
    fn test_table_is_captured_raw() {
        let input = "<table><tr><td><table><tr><td>in</td></tr></table></td></tr></table><p>after</p>";
        let doc = build(input);
        assert_eq!(doc.children.len(), 2);
        assert_eq!(
            doc.children[0],
            Node::Table(
                "<table><tr><td><table><tr><td>in</td></tr></table></td></tr></table>".to_string()
            )
        );
        assert_eq!(doc.children[1], Node::Paragraph(vec![text("after")]));
    }

    #[test]
    fn test_unknown_element_keeps_name_and_attrs() {
        let doc = build("<ac:structured-macro ac:name=\"info\">x</ac:structured-macro>");
        let Node::Element(el) = &doc.children[0] else {
            panic!("expected element");
        };
        assert_eq!(el.name, "ac:structured-macro");
        assert_eq!(el.attr("ac:name"), Some("info"));
        assert_eq!(el.children, vec![text("x")]);
    }

    #[test]
    fn test_heading_level_and_link_href() {
        let doc = build("<h4><a href=\"/x\">t</a></h4>");
        assert_eq!(
            doc.children,
            vec![Node::Heading {
                level: 4,
                children: vec![Node::Link {
                    href: "/x".to_string(),
                    children: vec![text("t")],
                }],
            }]
        );
    }
}
