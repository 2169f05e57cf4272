use std::iter::Peekable;
use std::str::Chars;

/// Split the text of a migration file into individual statements.
///
/// `;` ends a statement unless it sits inside a quoted string, a quoted
/// identifier or a comment. Each statement is trimmed; segments that are
/// empty or hold only comments are dropped. MySQL executable comments
/// (`/*! ... */`, `/*+ ... */`) count as code. Client-side `DELIMITER`
/// directives are not understood, so procedure bodies cannot be split here.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut has_code = false;
    let mut chars = sql.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ';' => {
                push_statement(&mut statements, &current, has_code);
                current.clear();
                has_code = false;
            }
            '\'' | '"' | '`' => {
                has_code = true;
                current.push(c);
                read_quoted(&mut chars, &mut current, c);
            }
            '-' if starts_dash_comment(&chars) => {
                current.push(c);
                read_line_comment(&mut chars, &mut current);
            }
            '#' => {
                current.push(c);
                read_line_comment(&mut chars, &mut current);
            }
            '/' if chars.peek() == Some(&'*') => {
                // `/*! ... */` and `/*+ ... */` are executed by MySQL
                if matches!(chars.clone().nth(1), Some('!' | '+')) {
                    has_code = true;
                }
                current.push(c);
                read_block_comment(&mut chars, &mut current);
            }
            _ => {
                if !c.is_whitespace() {
                    has_code = true;
                }
                current.push(c);
            }
        }
    }
    push_statement(&mut statements, &current, has_code);

    statements
}

fn push_statement(statements: &mut Vec<String>, segment: &str, has_code: bool) {
    let trimmed = segment.trim();
    if has_code && !trimmed.is_empty() {
        statements.push(trimmed.to_string());
    }
}

/// Consume up to and including the closing `quote`. A doubled quote is an
/// escaped quote; strings (not backtick identifiers) also honour backslash
/// escapes.
fn read_quoted(chars: &mut Peekable<Chars<'_>>, out: &mut String, quote: char) {
    while let Some(c) = chars.next() {
        out.push(c);
        if c == '\\' && quote != '`' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else if c == quote {
            if chars.peek() == Some(&quote) {
                out.push(quote);
                chars.next();
            } else {
                return;
            }
        }
    }
}

/// `--` opens a comment only when followed by whitespace, a control
/// character or the end of input, so `a--1` stays an expression.
fn starts_dash_comment(chars: &Peekable<Chars<'_>>) -> bool {
    let mut ahead = chars.clone();
    ahead.next() == Some('-') && ahead.next().is_none_or(|c| c.is_whitespace() || c.is_control())
}

fn read_line_comment(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    for c in chars.by_ref() {
        out.push(c);
        if c == '\n' {
            return;
        }
    }
}

/// Called with the opening `/` already pushed and `*` next in line
fn read_block_comment(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    if let Some(star) = chars.next() {
        out.push(star);
    }
    let mut previous = '\0';
    for c in chars.by_ref() {
        out.push(c);
        if previous == '*' && c == '/' {
            return;
        }
        previous = c;
    }
}
