//! Shell-style splitting of recorded command strings.
//!
//! Databases produced by CMake and Bear record each invocation as a single
//! shell-quoted string. Splitting honors POSIX-ish quoting: single quotes
//! are literal, double quotes allow backslash escapes, and an unquoted
//! backslash escapes the next character.

/// The command string ended inside a quoted region.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unbalanced quote in command string")]
pub struct UnbalancedQuote;

/// Splits a shell-quoted command string into an argument list.
///
/// Returns an error if a quoted region is left unterminated.
pub fn split_command(input: &str) -> Result<Vec<String>, UnbalancedQuote> {
    let mut args = Vec::new();
    let mut current = String::new();
    // Whether the current argument has seen any content, so that quoted
    // empty strings ("" or '') still produce an argument.
    let mut started = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            ' ' | '\t' | '\n' => {
                if started {
                    args.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            '\'' => {
                started = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(inner) => current.push(inner),
                        None => return Err(UnbalancedQuote),
                    }
                }
            }
            '"' => {
                started = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(esc @ ('"' | '\\' | '$' | '`')) => current.push(esc),
                            Some(other) => {
                                current.push('\\');
                                current.push(other);
                            }
                            None => return Err(UnbalancedQuote),
                        },
                        Some(inner) => current.push(inner),
                        None => return Err(UnbalancedQuote),
                    }
                }
            }
            '\\' => {
                started = true;
                match chars.next() {
                    Some(esc) => current.push(esc),
                    None => return Err(UnbalancedQuote),
                }
            }
            other => {
                started = true;
                current.push(other);
            }
        }
    }

    if started {
        args.push(current);
    }
    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words() {
        assert_eq!(
            split_command("cc -c foo.c -o foo.o").unwrap(),
            vec!["cc", "-c", "foo.c", "-o", "foo.o"]
        );
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(split_command("  cc   -c\tfoo.c ").unwrap(), vec!["cc", "-c", "foo.c"]);
    }

    #[test]
    fn double_quotes() {
        assert_eq!(
            split_command(r#"cc "-DNAME=\"vm\"" foo.c"#).unwrap(),
            vec!["cc", r#"-DNAME="vm""#, "foo.c"]
        );
    }

    #[test]
    fn single_quotes_literal() {
        assert_eq!(
            split_command(r"cc '-DPATH=a b\c' foo.c").unwrap(),
            vec!["cc", r"-DPATH=a b\c", "foo.c"]
        );
    }

    #[test]
    fn backslash_escapes_space() {
        assert_eq!(
            split_command(r"cc some\ dir/foo.c").unwrap(),
            vec!["cc", "some dir/foo.c"]
        );
    }

    #[test]
    fn quoted_empty_argument() {
        assert_eq!(split_command(r#"cc "" foo.c"#).unwrap(), vec!["cc", "", "foo.c"]);
    }

    #[test]
    fn double_quote_keeps_unknown_escape() {
        // Inside double quotes, backslash only escapes the shell-special set.
        assert_eq!(split_command(r#""a\nb""#).unwrap(), vec![r"a\nb"]);
    }

    #[test]
    fn unterminated_double_quote() {
        assert_eq!(split_command(r#"cc "foo"#), Err(UnbalancedQuote));
    }

    #[test]
    fn unterminated_single_quote() {
        assert_eq!(split_command("cc 'foo"), Err(UnbalancedQuote));
    }

    #[test]
    fn trailing_backslash() {
        assert_eq!(split_command(r"cc foo\"), Err(UnbalancedQuote));
    }

    #[test]
    fn empty_input() {
        assert_eq!(split_command("").unwrap(), Vec::<String>::new());
        assert_eq!(split_command("   ").unwrap(), Vec::<String>::new());
    }
}
