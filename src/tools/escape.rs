use miette::{Diagnostic, SourceSpan};
use nom::{
    branch::alt,
    bytes::complete::is_not,
    character::complete::char,
    combinator::value,
    sequence::preceded,
    IResult, Parser as NomParser,
};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic, Clone, PartialEq, Eq)]
#[error("Invalid escape sequence")]
#[diagnostic(
    code(hexsearch::escape),
    help("supported escapes are \\n \\t \\r \\0 \\\\ \\\" and \\'")
)]
pub struct EscapeError {
    #[source_code]
    src: String,
    #[label("{label}")]
    span: SourceSpan,
    label: String,
}

impl EscapeError {
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

fn escape(input: &str) -> IResult<&str, char> {
    preceded(
        char('\\'),
        alt((
            value('\n', char('n')),
            value('\t', char('t')),
            value('\r', char('r')),
            value('\0', char('0')),
            value('\\', char('\\')),
            value('"', char('"')),
            value('\'', char('\'')),
        )),
    )
    .parse(input)
}

fn literal(input: &str) -> IResult<&str, &str> {
    is_not("\\")(input)
}

/// Decodes backslash escapes in a command-line string.
pub fn unescape(input: &str) -> Result<String, EscapeError> {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while !rest.is_empty() {
        if let Ok((remaining, text)) = literal(rest) {
            out.push_str(text);
            rest = remaining;
            continue;
        }
        match escape(rest) {
            Ok((remaining, ch)) => {
                out.push(ch);
                rest = remaining;
            }
            Err(_) => {
                let offset = input.len() - rest.len();
                let (len, label) = match rest[1..].chars().next() {
                    Some(next) => (1 + next.len_utf8(), format!("unknown escape `\\{next}`")),
                    None => (1, "dangling backslash".to_string()),
                };
                return Err(EscapeError {
                    src: input.to_string(),
                    span: (offset, len).into(),
                    label,
                });
            }
        }
    }
    Ok(out)
}
