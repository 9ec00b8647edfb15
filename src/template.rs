// SPEC TEMPLATING
// EACH STITCH SPEC TEMPLATE CARRIES ONE NUMERIC PLACEHOLDER ({} OR {0}).
// LITERAL BRACES ARE DOUBLED ({{ AND }}). THE MATERIALIZED COPY LANDS NEXT
// TO THE TEMPLATE WITH A .tmp SUFFIX AND IS WHAT THE SCALE BINARY READS.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::error::DriverError;

pub const MATERIALIZED_SUFFIX: &str = ".tmp";

/// Sibling path the scale binary is pointed at for a given template.
pub fn materialized_path(template: &Path) -> PathBuf {
    let mut s = template.as_os_str().to_owned();
    s.push(MATERIALIZED_SUFFIX);
    PathBuf::from(s)
}

/// Substitute `count` for the placeholder in `text`.
///
/// Returns the reason on malformed brace usage; the caller attaches the path.
pub fn render(text: &str, count: u64) -> std::result::Result<String, String> {
    let value = count.to_string();
    let mut out = String::with_capacity(text.len() + value.len());
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        match c {
            '{' => {
                if let Some(&(_, '{')) = chars.peek() {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut field = String::new();
                let mut closed = false;
                for (_, fc) in chars.by_ref() {
                    if fc == '}' {
                        closed = true;
                        break;
                    }
                    field.push(fc);
                }
                if !closed {
                    return Err(format!("unclosed '{{' at byte {}", pos));
                }
                match field.as_str() {
                    "" | "0" => out.push_str(&value),
                    other => {
                        return Err(format!("unsupported placeholder '{{{}}}' at byte {}", other, pos))
                    }
                }
            }
            '}' => {
                if let Some(&(_, '}')) = chars.peek() {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(format!("single '}}' at byte {}", pos));
                }
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

/// Read `template`, substitute `count`, write the `.tmp` sibling.
pub fn materialize(template: &Path, count: u64) -> Result<PathBuf> {
    let text = fs::read_to_string(template)
        .with_context(|| format!("reading template {}", template.display()))?;
    let rendered = render(&text, count).map_err(|reason| DriverError::Template {
        path: template.to_path_buf(),
        reason,
    })?;
    let out = materialized_path(template);
    fs::write(&out, rendered).with_context(|| format!("writing {}", out.display()))?;
    debug!(template = %template.display(), count, "materialized template");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_bare_and_indexed() {
        assert_eq!(render("n={}", 150).unwrap(), "n=150");
        assert_eq!(render("a={0} b={0}", 7).unwrap(), "a=7 b=7");
    }

    #[test]
    fn doubled_braces_are_literal() {
        let text = "var c = new Container({{image: \"alpine\"}}).replicate({});";
        assert_eq!(
            render(text, 225).unwrap(),
            "var c = new Container({image: \"alpine\"}).replicate(225);"
        );
    }

    #[test]
    fn no_placeholder_passes_through() {
        assert_eq!(render("deployWorkers(3);\n", 9).unwrap(), "deployWorkers(3);\n");
    }

    #[test]
    fn malformed_braces_rejected() {
        assert!(render("x = {", 1).is_err());
        assert!(render("x = }", 1).is_err());
        assert!(render("x = {count}", 1).is_err());
        assert!(render("x = {1}", 1).is_err());
    }

    #[test]
    fn suffix_appended_to_full_name() {
        assert_eq!(
            materialized_path(Path::new("plot/scale.spec")),
            PathBuf::from("plot/scale.spec.tmp")
        );
    }
}
