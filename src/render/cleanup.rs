//! Post-render normalization of blank lines.

/// Collapses runs of blank lines to a single blank line, empties
/// whitespace-only lines and trims blank lines at both ends.
///
/// Lines inside fenced code blocks are passed through untouched, including
/// fences opened after a list marker or inside a block quote. Indentation
/// and trailing hard-break spaces on content lines are preserved.
pub fn tidy(markdown: &str) -> String {
    let source: Vec<&str> = markdown.lines().collect();
    let mut lines: Vec<&str> = Vec::new();
    let mut fence: Option<Fence<'_>> = None;
    let mut pending_blank = false;

    for (index, line) in source.iter().copied().enumerate() {
        if let Some(open) = &fence {
            lines.push(line);
            if open.is_closed_by(line) {
                fence = None;
            }
            continue;
        }

        if line.trim().is_empty() {
            pending_blank = !lines.is_empty();
            continue;
        }

        if pending_blank {
            lines.push("");
            pending_blank = false;
        }
        // A fence nobody closes is ordinary text.
        fence = Fence::open(line)
            .filter(|open| source[index + 1..].iter().any(|l| open.is_closed_by(l)));
        lines.push(line);
    }

    lines.join("\n")
}

/// An open backtick fence, possibly nested in list items or block quotes.
struct Fence<'a> {
    ticks: &'a str,
    quote_depth: usize,
}

impl<'a> Fence<'a> {
    fn open(line: &'a str) -> Option<Self> {
        let (quote_depth, rest) = strip_quotes(line, usize::MAX);
        let rest = strip_list_markers(rest);
        let run = rest.len() - rest.trim_start_matches('`').len();
        // Backticks in the info string make this a code span, not a fence.
        (run >= 3 && !rest[run..].contains('`')).then(|| Fence {
            ticks: &rest[..run],
            quote_depth,
        })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let (_, rest) = strip_quotes(line, self.quote_depth);
        let candidate = rest.trim();
        candidate.len() >= self.ticks.len() && candidate.chars().all(|c| c == '`')
    }
}

/// Strips up to `max` leading `>` markers, returning how many were removed.
fn strip_quotes(line: &str, max: usize) -> (usize, &str) {
    let mut rest = line.trim_start();
    let mut depth = 0;
    while depth < max {
        match rest.strip_prefix('>') {
            Some(after) => {
                rest = after.trim_start();
                depth += 1;
            }
            None => break,
        }
    }
    (depth, rest)
}

fn strip_list_markers(line: &str) -> &str {
    let mut rest = line.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("- ") {
            rest = after.trim_start();
            continue;
        }
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits > 0 && rest[digits..].starts_with(". ") {
            rest = rest[digits + 2..].trim_start();
            continue;
        }
        return rest;
    }
}
