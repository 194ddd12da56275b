use jes::{ParseError, Position, parse, render};

#[test]
fn test_comment_lines_are_ignored() {
    let source = r#"
// page heading
h1 {
    // brand color
    color = red
}
"#;
    let tree = parse(source).unwrap();
    assert_eq!(render(&tree), "h1{color:red}");
}

#[test]
fn test_trailing_comment_terminates_value() {
    let tree = parse("h1 {\n  color = red // brand\n}").unwrap();
    assert_eq!(tree.blocks[0].declarations[0].value, "red");
}

#[test]
fn test_commented_out_block() {
    let source = "h1 {\n  color = red\n}\n// h2 {\n//   color = blue\n// }\n";
    assert_eq!(render(&parse(source).unwrap()), "h1{color:red}");
}

#[test]
fn test_comment_keeps_line_numbers() {
    assert_eq!(
        parse("// one\n// two\n}"),
        Err(ParseError::UnmatchedClosingBrace(Position::new(3, 1)))
    );
}

#[test]
fn test_url_is_not_a_comment() {
    let source = "body {\n  background = url(https://example.com/bg.png)\n}";
    assert_eq!(
        render(&parse(source).unwrap()),
        "body{background:url(https://example.com/bg.png)}"
    );
}

#[test]
fn test_quoted_slashes_are_not_a_comment() {
    let source = "a {\n  @attribute href is \"//example.com\" {\n    color = red\n  }\n}";
    assert_eq!(
        render(&parse(source).unwrap()),
        "a[href=\"//example.com\"]{color:red}"
    );
}

#[test]
fn test_apostrophe_in_value_does_not_hide_comment() {
    let with_comment = parse("a {\n  content = it's // note\n}").unwrap();
    let without = parse("a {\n  content = it's\n}").unwrap();
    assert_eq!(with_comment, without);
    assert_eq!(render(&with_comment), "a{content:it's}");
}
