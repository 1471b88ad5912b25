pub fn escape_markdown_link_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '[' | ']' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Escapes a link destination. Destinations containing whitespace are
/// wrapped in angle brackets, which CommonMark accepts verbatim.
pub fn escape_markdown_link_destination(value: &str) -> String {
    if value.chars().any(char::is_whitespace) {
        let mut escaped = String::with_capacity(value.len() + 2);
        escaped.push('<');
        for ch in value.chars() {
            match ch {
                '<' | '>' | '\\' => {
                    escaped.push('\\');
                    escaped.push(ch);
                }
                '\n' | '\r' => escaped.push(' '),
                _ => escaped.push(ch),
            }
        }
        escaped.push('>');
        return escaped;
    }

    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' | '(' | ')' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Wraps text in a code span, using a fence longer than any backtick run
/// inside it.
pub fn code_span(value: &str) -> String {
    let fence = "`".repeat(longest_backtick_run(value) + 1);
    if value.starts_with('`') || value.ends_with('`') {
        format!("{fence} {value} {fence}")
    } else {
        format!("{fence}{value}{fence}")
    }
}

/// Fence for a fenced code block that cannot be closed early by the body.
pub fn code_fence(body: &str) -> String {
    "`".repeat(longest_backtick_run(body).max(2) + 1)
}

/// Escapes lines of flowing text that a Markdown reader would take as the
/// start of a fenced code block.
pub fn escape_fence_openers(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            let body = line.trim_start();
            let indent = &line[..line.len() - body.len()];
            let opens_fence = ['`', '~'].into_iter().any(|ch| {
                let run = body.len() - body.trim_start_matches(ch).len();
                run >= 3 && (ch == '~' || !body[run..].contains('`'))
            });
            if opens_fence {
                format!("{}\\{}", indent, body)
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn longest_backtick_run(value: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in value.chars() {
        if ch == '`' {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
