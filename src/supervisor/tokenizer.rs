/// The most tokens a command line is split into, verb included. Anything after that is dropped.
pub const MAX_ARGS: usize = 10;

/// Splits a command line on whitespace into at most [`MAX_ARGS`] tokens.
///
/// Tokens borrow from `line`; runs of whitespace separate exactly like a single space.
/// Vertical tab counts as whitespace too.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split(is_space)
        .filter(|tok| !tok.is_empty())
        .take(MAX_ARGS)
        .collect()
}

fn is_space(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lines() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t  ").is_empty());
    }

    #[test]
    fn test_whitespace_runs() {
        assert_eq!(
            tokenize("  loadfile   PROG.BIN\t100 100  "),
            ["loadfile", "PROG.BIN", "100", "100"]
        );
    }

    #[test]
    fn test_vertical_tab_separates() {
        assert_eq!(tokenize("clk\x0b2m"), ["clk", "2m"]);
        assert!(tokenize("\x0b\x0c\r\n").is_empty());
    }

    #[test]
    fn test_bounded() {
        let line = "a b c d e f g h i j k l";
        let toks = tokenize(line);
        assert_eq!(toks.len(), MAX_ARGS);
        assert_eq!(toks.last(), Some(&"j"));
    }
}
