use pretty_assertions::assert_eq;
use storage2md::{CommentRecord, PageRecord, StorageToMarkdown};

fn render(markup: &str) -> String {
    StorageToMarkdown::with_defaults().render_fragment(markup)
}

#[test]
fn rendering_twice_is_byte_identical() {
    let markup = "<h2>a</h2><ol><li>x<ul><li>y</li></ul></li></ol><p><strong>b<em>c</em></strong></p>";
    let converter = StorageToMarkdown::with_defaults();
    assert_eq!(converter.render_fragment(markup), converter.render_fragment(markup));
}

#[test]
fn heading_renders_with_trailing_blank_line() {
    assert_eq!(render("<h3>Title</h3><p>next</p>"), "### Title\n\nnext");
}

#[test]
fn nested_list_is_indented_under_parent() {
    let markdown = render("<ol><li>one</li></ol><ul><li>a<ul><li>b</li></ul></li></ul>");
    assert_eq!(markdown, "1. one\n\n- a\n  - b");
}

#[test]
fn sibling_ordered_lists_restart_numbering() {
    let markdown = render("<ol><li>a</li><li>b</li><li>c</li></ol><p>gap</p><ol><li>d</li><li>e</li></ol>");
    assert_eq!(markdown, "1. a\n2. b\n3. c\n\ngap\n\n1. d\n2. e");
}

#[test]
fn code_macro_body_is_verbatim() {
    let markdown = render(
        r#"<ac:structured-macro ac:name="code"><ac:parameter ac:name="language">go</ac:parameter><ac:plain-text-body><![CDATA[fmt.Println("x")]]></ac:plain-text-body></ac:structured-macro>"#,
    );
    let lines: Vec<&str> = markdown.lines().collect();
    assert_eq!(lines, vec!["```go", "fmt.Println(\"x\")", "```"]);
}

#[test]
fn unclosed_strong_keeps_text_and_following_siblings() {
    assert_eq!(render("<p>a <strong>bold</p><p>after</p>"), "a **bold**\n\nafter");
    assert_eq!(render("<p>tail <strong>open"), "tail **open**");
}

#[test]
fn many_blank_lines_collapse_to_one() {
    let markdown = render("<p>a</p><p></p><p> </p><p>\n\n\n</p><p></p><p>b</p>");
    assert_eq!(markdown, "a\n\nb");
    assert!(!markdown.contains("\n\n\n"));
}

#[test]
fn comments_keep_input_order_regardless_of_timestamps() {
    let page = PageRecord {
        id: "1".to_string(),
        title: "P".to_string(),
        ..Default::default()
    };
    let comments: Vec<CommentRecord> = [
        ("C1", "2030-01-01T00:00:00Z"),
        ("C2", "2001-01-01T00:00:00Z"),
        ("C3", "2015-01-01T00:00:00Z"),
    ]
    .iter()
    .map(|(body, ts)| CommentRecord {
        author: "x".to_string(),
        timestamp: ts.to_string(),
        body: format!("<p>{}</p>", body),
        ..Default::default()
    })
    .collect();

    let content = StorageToMarkdown::with_defaults()
        .convert(&page, &comments)
        .expect("conversion should succeed")
        .content;

    let positions: Vec<usize> = ["### Comment 1\n", "C1", "### Comment 2\n", "C2", "### Comment 3\n", "C3"]
        .iter()
        .map(|needle| content.find(needle).expect("needle present"))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{content}");
}

#[test]
fn missing_comment_timestamp_omits_time_line_only() {
    let page = PageRecord {
        id: "1".to_string(),
        title: "P".to_string(),
        body: "<p>body</p>".to_string(),
        ..Default::default()
    };
    let comments = vec![
        CommentRecord {
            author: "Ann".to_string(),
            timestamp: String::new(),
            body: "<p>first</p>".to_string(),
            ..Default::default()
        },
        CommentRecord {
            author: "Ben".to_string(),
            timestamp: "2024-02-03T04:05:06Z".to_string(),
            body: "<p>second</p>".to_string(),
            ..Default::default()
        },
    ];

    let content = StorageToMarkdown::with_defaults()
        .convert(&page, &comments)
        .expect("conversion should succeed")
        .content;

    assert!(content.contains("### Comment 1\n\n- **Author:** Ann\n\nfirst\n\n### Comment 2"));
    assert!(content.ends_with(
        "### Comment 2\n\n- **Author:** Ben\n- **Created:** 2024-02-03 04:05:06 UTC\n\nsecond"
    ));
    assert_eq!(content.matches("**Created:**").count(), 1);
}

#[test]
fn conversion_is_safe_across_threads() {
    let converter = StorageToMarkdown::with_defaults();
    let markup = "<ul><li>a<ul><li>b</li></ul></li></ul>";
    let expected = converter.render_fragment(markup);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| converter.render_fragment(markup)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().expect("thread panicked"), expected);
        }
    });
}

#[test]
fn code_block_in_list_item_keeps_page_tidy() {
    let page = PageRecord {
        id: "1".to_string(),
        title: "P".to_string(),
        body: concat!(
            "<ul><li><ac:structured-macro ac:name=\"code\"><ac:plain-text-body>",
            "<![CDATA[x\n\n\n\ny]]></ac:plain-text-body></ac:structured-macro></li></ul>",
            "<p>```</p><p>tail</p>"
        )
        .to_string(),
        ..Default::default()
    };
    let comments = vec![CommentRecord {
        body: "<p>c</p>".to_string(),
        ..Default::default()
    }];

    let content = StorageToMarkdown::with_defaults()
        .convert(&page, &comments)
        .expect("conversion should succeed")
        .content;

    assert!(content.contains("- ```\n  x\n\n\n\n  y\n  ```\n\n\\```\n\ntail\n\n## Comments (1)"));
    assert!(content.ends_with("### Comment 1\n\nc"), "{content}");
    let outside_code = content.replace("  x\n\n\n\n  y", "");
    assert!(!outside_code.contains("\n\n\n"), "{content}");
}

#[test]
fn heading_with_line_break_is_one_heading() {
    assert_eq!(render("<h2>Part<br/>Two</h2><p>x</p>"), "## Part Two\n\nx");
}

#[test]
fn unnamed_macro_placeholder_names_something() {
    assert_eq!(
        render("<ac:structured-macro><ac:parameter ac:name=\"x\">1</ac:parameter></ac:structured-macro>"),
        "*[Unsupported macro: unnamed]*"
    );
}
