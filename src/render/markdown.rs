use super::cleanup::tidy;
use super::escape::{
    code_fence, code_span, escape_fence_openers, escape_markdown_link_destination,
    escape_markdown_link_text,
};
use crate::core::ast::{Document, EmphasisKind, Macro, MacroKind, Node};
use crate::localization::{AdmonitionKind, DefaultLocalization, LocalizationStrategy};
use crate::render::Renderer;
use regex::Regex;
use std::sync::OnceLock;

fn whitespace_run() -> &'static Regex {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("whitespace pattern is valid"))
}

/// Renders a resolved [`Document`] as Markdown.
///
/// Rendering is a pure function of the tree; the renderer holds no state
/// between calls.
#[derive(Clone, Copy)]
pub struct MarkdownRenderer<'a> {
    localization: &'a dyn LocalizationStrategy,
}

impl Default for MarkdownRenderer<'static> {
    fn default() -> Self {
        Self {
            localization: &DefaultLocalization,
        }
    }
}

impl<'a> Renderer for MarkdownRenderer<'a> {
    fn render(&self, document: &Document) -> String {
        let mut out = String::new();
        self.render_blocks(&document.children, &mut out);
        tidy(&out)
    }
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(localization: &'a dyn LocalizationStrategy) -> Self {
        Self { localization }
    }

    /// Renders a block sequence. Runs of inline nodes between blocks form
    /// implicit paragraphs.
    fn render_blocks(&self, nodes: &[Node], out: &mut String) {
        let mut inline = Vec::new();
        for node in nodes {
            self.collect_block(node, out, &mut inline);
        }
        self.flush_inline(&mut inline, out);
    }

    fn collect_block<'n>(&self, node: &'n Node, out: &mut String, inline: &mut Vec<&'n Node>) {
        match node {
            Node::Element(el) => {
                for child in &el.children {
                    self.collect_block(child, out, inline);
                }
            }
            block if block.is_block() => {
                self.flush_inline(inline, out);
                self.render_block(block, out);
            }
            other => inline.push(other),
        }
    }

    fn flush_inline(&self, inline: &mut Vec<&Node>, out: &mut String) {
        if inline.is_empty() {
            return;
        }
        let mut text = String::new();
        for node in inline.drain(..) {
            self.render_inline_node(node, &mut text);
        }
        let text = text.trim();
        if !text.is_empty() {
            out.push_str(&escape_fence_openers(text));
            out.push_str("\n\n");
        }
    }

    fn render_block(&self, node: &Node, out: &mut String) {
        match node {
            Node::Heading { level, children } => {
                // Headings are single-line: breaks become spaces.
                let text = self
                    .render_inline(children)
                    .split('\n')
                    .map(str::trim)
                    .filter(|piece| !piece.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !text.is_empty() {
                    let level = usize::from((*level).clamp(1, 6));
                    out.push_str(&"#".repeat(level));
                    out.push(' ');
                    out.push_str(&text);
                    out.push_str("\n\n");
                }
            }
            Node::Paragraph(children) => self.render_blocks(children, out),
            Node::List { ordered, children } => {
                let list = self.render_list(*ordered, children);
                if !list.is_empty() {
                    out.push_str(&list);
                    out.push_str("\n\n");
                }
            }
            Node::ListItem(_) => {
                let list = self.render_list(false, std::slice::from_ref(node));
                out.push_str(&list);
                out.push_str("\n\n");
            }
            Node::Quote(children) => {
                let mut inner = String::new();
                self.render_blocks(children, &mut inner);
                let inner = tidy(&inner);
                if !inner.is_empty() {
                    out.push_str(&prefix_lines(&inner, "> "));
                    out.push_str("\n\n");
                }
            }
            Node::Rule => out.push_str("---\n\n"),
            Node::Macro(m) => {
                out.push_str(&self.render_macro(m));
                out.push_str("\n\n");
            }
            Node::Table(_) => {
                out.push_str(&self.localization.table_placeholder());
                out.push_str("\n\n");
            }
            other => {
                let mut inline = vec![other];
                self.flush_inline(&mut inline, out);
            }
        }
    }

    fn render_macro(&self, m: &Macro) -> String {
        match &m.kind {
            MacroKind::Code => {
                let language = m.parameter("language").unwrap_or_default();
                let code: String = m.body.iter().map(Node::text_content).collect();
                let code = code.trim_end_matches(['\n', '\r']);
                let fence = code_fence(code);
                format!("{fence}{language}\n{code}\n{fence}")
            }
            MacroKind::Info => self.render_admonition(AdmonitionKind::Info, m),
            MacroKind::Warning => self.render_admonition(AdmonitionKind::Warning, m),
            MacroKind::Unsupported(name) => self.localization.unsupported_macro(name),
        }
    }

    fn render_admonition(&self, kind: AdmonitionKind, m: &Macro) -> String {
        let mut line = self.localization.admonition(kind).to_string();
        if let Some(title) = m.parameter("title").filter(|t| !t.is_empty()) {
            line.push_str(" **");
            line.push_str(title);
            line.push_str("**");
        }
        let text = self.render_inline(&m.body);
        let text = text.trim();
        if !text.is_empty() {
            line.push(' ');
            line.push_str(text);
        }
        prefix_lines(&line, "> ")
    }

    fn render_list(&self, ordered: bool, children: &[Node]) -> String {
        let mut lines: Vec<String> = Vec::new();
        let mut number = 0usize;
        let mut indent = 2;

        for child in children {
            match child {
                Node::List {
                    ordered: nested_ordered,
                    children: nested,
                } => {
                    let nested = self.render_list(*nested_ordered, nested);
                    lines.extend(indent_lines(&nested, indent));
                }
                Node::Text(text) if text.trim().is_empty() => {}
                Node::ListItem(item) => {
                    number += 1;
                    let marker = list_marker(ordered, number);
                    indent = marker.len();
                    lines.extend(mark_lines(&marker, &self.render_list_item(item)));
                }
                other => {
                    number += 1;
                    let marker = list_marker(ordered, number);
                    indent = marker.len();
                    let body = self.render_list_item(std::slice::from_ref(other));
                    lines.extend(mark_lines(&marker, &body));
                }
            }
        }

        lines.join("\n")
    }

    /// Item body without its marker. Paragraphs are kept tight; nested
    /// lists and other blocks follow on their own lines.
    fn render_list_item(&self, children: &[Node]) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut inline = String::new();
        self.collect_item_parts(children, &mut parts, &mut inline);
        push_part(&mut parts, &mut inline);
        parts.join("\n")
    }

    fn collect_item_parts(&self, children: &[Node], parts: &mut Vec<String>, inline: &mut String) {
        for child in children {
            match child {
                Node::Element(el) => self.collect_item_parts(&el.children, parts, inline),
                Node::List { ordered, children } => {
                    push_part(parts, inline);
                    let nested = self.render_list(*ordered, children);
                    if !nested.is_empty() {
                        parts.push(nested);
                    }
                }
                Node::Paragraph(children) => {
                    push_part(parts, inline);
                    self.collect_item_parts(children, parts, inline);
                    push_part(parts, inline);
                }
                block if block.is_block() => {
                    push_part(parts, inline);
                    let mut rendered = String::new();
                    self.render_block(block, &mut rendered);
                    let rendered = rendered.trim_end();
                    if !rendered.is_empty() {
                        parts.push(rendered.to_string());
                    }
                }
                other => self.render_inline_node(other, inline),
            }
        }
    }

    fn render_inline(&self, nodes: &[Node]) -> String {
        let mut out = String::new();
        for node in nodes {
            self.render_inline_node(node, &mut out);
        }
        out
    }

    fn render_inline_node(&self, node: &Node, out: &mut String) {
        match node {
            Node::Text(text) => push_inline(out, &whitespace_run().replace_all(text, " ")),
            Node::Emphasis { kind, children } => {
                let inner = self.render_inline(children);
                // Keep delimiter runs of neighbouring spans apart.
                let marker = match kind {
                    EmphasisKind::Bold if out.ends_with('*') => "__",
                    EmphasisKind::Bold => "**",
                    EmphasisKind::Italic if out.ends_with('*') => "_",
                    EmphasisKind::Italic => "*",
                    EmphasisKind::Strikethrough => "~~",
                };
                if marker == "~~"
                    && out.ends_with("~~")
                    && !inner.contains('\n')
                    && inner.starts_with(|c: char| !c.is_whitespace())
                {
                    // Adjacent strikethrough spans merge into one.
                    out.truncate(out.len() - 2);
                    out.push_str(&apply_format_safely(&inner, "", marker));
                } else {
                    push_inline(out, &apply_format_safely(&inner, marker, marker));
                }
            }
            Node::CodeSpan(children) => {
                let code: String = children.iter().map(Node::text_content).collect();
                let code = whitespace_run().replace_all(&code, " ");
                if !code.trim().is_empty() {
                    push_inline(out, &code_span(&code));
                }
            }
            Node::Link { href, children } => {
                let text = self.render_inline(children);
                let text = text.trim();
                let link = match (text.is_empty(), href.is_empty()) {
                    (_, true) => text.to_string(),
                    (true, false) => format!(
                        "[{}]({})",
                        escape_markdown_link_text(href),
                        escape_markdown_link_destination(href)
                    ),
                    (false, false) => format!(
                        "[{}]({})",
                        escape_markdown_link_text(text),
                        escape_markdown_link_destination(href)
                    ),
                };
                push_inline(out, &link);
            }
            Node::LineBreak => {
                let kept = out.trim_end_matches(' ').len();
                out.truncate(kept);
                out.push_str("  \n");
            }
            Node::Element(el) => {
                for child in &el.children {
                    self.render_inline_node(child, out);
                }
            }
            Node::Unknown(raw) => push_inline(out, &self.localization.unconverted(raw.trim())),
            Node::Table(_) => push_inline(out, &self.localization.table_placeholder()),
            Node::Macro(m) => match &m.kind {
                MacroKind::Code => {
                    let code: String = m.body.iter().map(Node::text_content).collect();
                    let code = whitespace_run().replace_all(code.trim(), " ");
                    push_inline(out, &code_span(&code));
                }
                MacroKind::Unsupported(name) => {
                    push_inline(out, &self.localization.unsupported_macro(name))
                }
                MacroKind::Info | MacroKind::Warning => {
                    for child in &m.body {
                        self.render_inline_node(child, out);
                    }
                }
            },
            Node::Rule => push_inline(out, " "),
            Node::Heading { children, .. }
            | Node::Paragraph(children)
            | Node::List { children, .. }
            | Node::ListItem(children)
            | Node::Quote(children) => {
                for child in children {
                    self.render_inline_node(child, out);
                }
                push_inline(out, " ");
            }
        }
    }
}

/// Appends an inline fragment, folding a leading space into whitespace
/// already at the end of `out`.
fn push_inline(out: &mut String, piece: &str) {
    if out.ends_with([' ', '\n']) {
        out.push_str(piece.trim_start_matches(' '));
    } else {
        out.push_str(piece);
    }
}

fn push_part(parts: &mut Vec<String>, inline: &mut String) {
    let text = inline.trim();
    if !text.is_empty() {
        parts.push(escape_fence_openers(text));
    }
    inline.clear();
}

fn list_marker(ordered: bool, number: usize) -> String {
    if ordered {
        format!("{}. ", number)
    } else {
        "- ".to_string()
    }
}

/// Puts `marker` in front of the first line and aligns the rest under it.
fn mark_lines(marker: &str, body: &str) -> Vec<String> {
    if body.is_empty() {
        return vec![marker.trim_end().to_string()];
    }
    let pad = " ".repeat(marker.len());
    body.lines()
        .enumerate()
        .map(|(i, line)| match (i, line.is_empty()) {
            (0, _) => format!("{}{}", marker, line),
            (_, true) => String::new(),
            (_, false) => format!("{}{}", pad, line),
        })
        .collect()
}

fn indent_lines(body: &str, width: usize) -> Vec<String> {
    let pad = " ".repeat(width);
    body.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect()
}

fn prefix_lines(body: &str, prefix: &str) -> String {
    body.lines()
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wraps text in emphasis markers, keeping surrounding whitespace outside
/// them and marking each line separately when the text spans lines.
fn apply_format_safely(text: &str, open: &str, close: &str) -> String {
    if text.trim().is_empty() {
        return text.to_string();
    }

    let content = text.trim_matches(|c: char| c.is_whitespace() && c != '\n');
    let start = text.len() - text.trim_start_matches(|c: char| c.is_whitespace() && c != '\n').len();
    let leading_ws = &text[..start];
    let trailing_ws = &text[start + content.len()..];

    if content.contains('\n') {
        let formatted: Vec<String> = content
            .split('\n')
            .map(|line| {
                let line_trimmed = line.trim();
                if line_trimmed.is_empty() {
                    line.to_string()
                } else {
                    let line_leading = &line[..line.len() - line.trim_start().len()];
                    let line_trailing = &line[line.trim_end().len()..];
                    format!(
                        "{}{}{}{}{}",
                        line_leading, open, line_trimmed, close, line_trailing
                    )
                }
            })
            .collect();
        return format!("{}{}{}", leading_ws, formatted.join("\n"), trailing_ws);
    }

    format!("{}{}{}{}{}", leading_ws, open, content, close, trailing_ws)
}
