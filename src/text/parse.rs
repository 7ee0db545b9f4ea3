use crate::foundation::error::{DeckError, DeckResult};

/// Styled text token stream.
///
/// `Begin`/`End` bracket a named style; the stream is well nested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Plain run without line breaks.
    Text(String),
    /// One or more line breaks.
    Newline(usize),
    /// Open a named style.
    Begin(String),
    /// Close the innermost open style.
    End,
}

/// One styled run of a laid-out line: text plus its stack of style names, outermost first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    /// Run text.
    pub text: String,
    /// Style names applied to the run.
    pub styles: Vec<String>,
}

/// Tokenize `text`, recognizing `~name{...}` blocks when `escape_char` is set.
pub fn parse_text(text: &str, escape_char: Option<char>) -> DeckResult<Vec<Token>> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut depth = 0usize;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\n' {
            flush(&mut buf, &mut out);
            push_newlines(&mut out, 1);
        } else if Some(c) == escape_char {
            let mut name = String::new();
            while let Some(&n) = chars.peek() {
                if n.is_alphanumeric() || n == '_' || n == '-' || n == '.' {
                    name.push(n);
                    chars.next();
                } else {
                    break;
                }
            }
            match chars.peek() {
                Some(&'{') if !name.is_empty() => {
                    chars.next();
                    flush(&mut buf, &mut out);
                    out.push(Token::Begin(name));
                    depth += 1;
                }
                Some(&n) if name.is_empty() && Some(n) == escape_char => {
                    chars.next();
                    buf.push(n);
                }
                _ => {
                    return Err(DeckError::configuration(format!(
                        "invalid inline style near '{c}{name}' in text {text:?}"
                    )));
                }
            }
        } else if c == '}' && depth > 0 {
            flush(&mut buf, &mut out);
            out.push(Token::End);
            depth -= 1;
        } else {
            buf.push(c);
        }
    }
    if depth > 0 {
        return Err(DeckError::configuration(format!(
            "unclosed inline style block in text {text:?}"
        )));
    }
    flush(&mut buf, &mut out);
    Ok(out)
}

fn flush(buf: &mut String, out: &mut Vec<Token>) {
    if !buf.is_empty() {
        out.push(Token::Text(std::mem::take(buf)));
    }
}

fn push_newlines(out: &mut Vec<Token>, n: usize) {
    if let Some(Token::Newline(k)) = out.last_mut() {
        *k += n;
    } else {
        out.push(Token::Newline(n));
    }
}

/// Text content with style markup removed.
pub fn tokens_to_text_without_style(tokens: &[Token]) -> String {
    let mut s = String::new();
    for t in tokens {
        match t {
            Token::Text(t) => s.push_str(t),
            Token::Newline(n) => s.extend(std::iter::repeat_n('\n', *n)),
            Token::Begin(_) | Token::End => {}
        }
    }
    s
}

/// Prefix every line with a right-aligned number in the `line_number` style.
pub fn add_line_numbers(tokens: &[Token]) -> Vec<Token> {
    let lines = 1 + tokens
        .iter()
        .map(|t| match t {
            Token::Newline(n) => *n,
            _ => 0,
        })
        .sum::<usize>();
    let width = lines.to_string().len();
    let number = |i: usize| {
        [
            Token::Begin("line_number".to_string()),
            Token::Text(format!("{i:>width$} ")),
            Token::End,
        ]
    };

    // Style blocks may span lines; reopen them after each number.
    let mut open: Vec<String> = Vec::new();
    let mut out = Vec::with_capacity(tokens.len() + lines * 3);
    let mut line = 1usize;
    out.extend(number(line));
    for t in tokens {
        match t {
            Token::Newline(n) => {
                for _ in 0..*n {
                    out.extend(open.iter().map(|_| Token::End));
                    out.push(Token::Newline(1));
                    line += 1;
                    out.extend(number(line));
                    out.extend(open.iter().cloned().map(Token::Begin));
                }
            }
            Token::Begin(name) => {
                open.push(name.clone());
                out.push(t.clone());
            }
            Token::End => {
                open.pop();
                out.push(Token::End);
            }
            Token::Text(_) => out.push(t.clone()),
        }
    }
    out
}

/// Overlay two token streams over the same text; styles of `b` nest inside styles of `a`.
pub fn tokens_merge(a: &[Token], b: &[Token]) -> DeckResult<Vec<Token>> {
    let ca = styled_chars(a);
    let cb = styled_chars(b);
    if ca.len() != cb.len() || ca.iter().zip(&cb).any(|(x, y)| x.0 != y.0) {
        return Err(DeckError::configuration(
            "cannot merge styles of token streams with different text",
        ));
    }

    let mut out = Vec::new();
    let mut current: Option<Vec<String>> = None;
    let mut buf = String::new();
    for ((ch, sa), (_, sb)) in ca.into_iter().zip(cb) {
        let mut styles = sa;
        styles.extend(sb);
        if current.as_ref() != Some(&styles) {
            close_group(&mut out, &mut buf, current.take());
            out.extend(styles.iter().cloned().map(Token::Begin));
            current = Some(styles);
        }
        if ch == '\n' {
            flush(&mut buf, &mut out);
            push_newlines(&mut out, 1);
        } else {
            buf.push(ch);
        }
    }
    close_group(&mut out, &mut buf, current);
    Ok(out)
}

fn close_group(out: &mut Vec<Token>, buf: &mut String, styles: Option<Vec<String>>) {
    flush(buf, out);
    if let Some(styles) = styles {
        out.extend(styles.iter().map(|_| Token::End));
    }
}

fn styled_chars(tokens: &[Token]) -> Vec<(char, Vec<String>)> {
    let mut stack: Vec<String> = Vec::new();
    let mut out = Vec::new();
    for t in tokens {
        match t {
            Token::Text(s) => out.extend(s.chars().map(|c| (c, stack.clone()))),
            Token::Newline(n) => out.extend(std::iter::repeat_n(('\n', stack.clone()), *n)),
            Token::Begin(name) => stack.push(name.clone()),
            Token::End => {
                stack.pop();
            }
        }
    }
    out
}

/// Split a token stream into lines of styled runs.
pub fn token_lines(tokens: &[Token]) -> Vec<Vec<Run>> {
    let mut lines = vec![Vec::new()];
    let mut stack: Vec<String> = Vec::new();
    for t in tokens {
        match t {
            Token::Text(s) => {
                if let Some(line) = lines.last_mut() {
                    line.push(Run {
                        text: s.clone(),
                        styles: stack.clone(),
                    });
                }
            }
            Token::Newline(n) => lines.extend(std::iter::repeat_n(Vec::new(), *n)),
            Token::Begin(name) => stack.push(name.clone()),
            Token::End => {
                stack.pop();
            }
        }
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/parse.rs"]
mod tests;
