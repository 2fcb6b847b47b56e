//! Filesystem-safe filename sanitization.

/// Sanitizes an arbitrary remote- or user-supplied filename.
///
/// - Keeps only ASCII letters, digits, and `.`
/// - Replaces every other character with `-`
/// - Collapses consecutive replacements to a single `-`
/// - Strips leading and trailing `-`
///
/// Total and pure: never fails, empty input yields empty output. Because
/// `/`, `\` and `..` runs all collapse into `-`, the result can never
/// escape its destination directory.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '.' {
            out.push(c);
            prev_dash = false;
        } else if !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }

    out.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_illegal_chars_with_dash() {
        assert_eq!(sanitize_filename("my file!!name.mp4"), "my-file-name.mp4");
    }

    #[test]
    fn collapses_runs() {
        assert_eq!(sanitize_filename("a   ///  b.txt"), "a-b.txt");
    }

    #[test]
    fn trims_leading_and_trailing_dashes() {
        assert_eq!(sanitize_filename("!!report.pdf!!"), "report.pdf");
        assert_eq!(sanitize_filename("---"), "");
    }

    #[test]
    fn keeps_dots_so_traversal_collapses_inside_name() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "..-..-etc-passwd");
        assert!(!sanitize_filename("../../etc/passwd").contains('/'));
    }

    #[test]
    fn empty_input() {
        assert_eq!(sanitize_filename(""), "");
    }

    #[test]
    fn non_ascii_replaced() {
        assert_eq!(sanitize_filename("résumé.pdf"), "r-sum-.pdf");
    }

    #[test]
    fn output_alphabet_is_restricted() {
        let out = sanitize_filename("weird\u{0}\t*name?.tar.gz");
        assert!(out
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-'));
        assert!(!out.contains("--"));
    }
}
