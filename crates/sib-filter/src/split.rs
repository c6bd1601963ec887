//! Top-level argument splitting for function-call filter syntax.

/// Split the interior of a function call into its top-level arguments.
///
/// Arguments are separated by `,` or `;`. Separators inside nested
/// parentheses or inside single- or double-quoted literals are ignored; a
/// quote preceded by a backslash neither opens nor closes a literal.
///
/// Every segment is returned trimmed, including the one after the last
/// separator, so `a, b,` yields `["a", "b", ""]`. Text that is blank as a
/// whole yields no arguments at all.
///
/// Unbalanced parentheses are not detected here.
pub fn split_arguments(text: &str) -> Vec<&str> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut arguments = Vec::new();
    let mut depth: i32 = 0;
    let mut in_single = false;
    let mut in_double = false;
    let mut start = 0;
    let mut previous = None;

    for (index, ch) in text.char_indices() {
        let escaped = previous == Some('\\');
        if in_single {
            if ch == '\'' && !escaped {
                in_single = false;
            }
        } else if in_double {
            if ch == '"' && !escaped {
                in_double = false;
            }
        } else {
            match ch {
                '\'' if !escaped => in_single = true,
                '"' if !escaped => in_double = true,
                '(' => depth += 1,
                ')' => depth -= 1,
                ',' | ';' if depth == 0 => {
                    arguments.push(text[start..index].trim());
                    start = index + ch.len_utf8();
                }
                _ => {}
            }
        }
        previous = Some(ch);
    }
    arguments.push(text[start..].trim());
    arguments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_flat_arguments() {
        assert_eq!(split_arguments("vnk, \"123\""), vec!["vnk", "\"123\""]);
    }

    #[test]
    fn semicolon_is_a_separator() {
        assert_eq!(split_arguments("a; b ;c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn keeps_nested_calls_together() {
        assert_eq!(
            split_arguments("GLEICH(a, \"1\"), GROESSER(b, '2')"),
            vec!["GLEICH(a, \"1\")", "GROESSER(b, '2')"]
        );
    }

    #[test]
    fn ignores_separators_in_literals() {
        assert_eq!(
            split_arguments("name, 'Müller, Hans', \"a;b\""),
            vec!["name", "'Müller, Hans'", "\"a;b\""]
        );
    }

    #[test]
    fn escaped_quote_does_not_close_literal() {
        assert_eq!(
            split_arguments(r#"a, "x\", y", b"#),
            vec!["a", r#""x\", y""#, "b"]
        );
    }

    #[test]
    fn keeps_trailing_argument() {
        assert_eq!(split_arguments("a,b"), vec!["a", "b"]);
        assert_eq!(split_arguments("a,"), vec!["a", ""]);
        assert_eq!(split_arguments("single"), vec!["single"]);
    }

    #[test]
    fn blank_input_has_no_arguments() {
        assert!(split_arguments("").is_empty());
        assert!(split_arguments("   ").is_empty());
    }
}
