//! `bottlenose grammars`: list configured grammars.

use bottlenose_core::GrammarSummary;

use crate::bootstrap::CliContext;

/// One line per grammar: key, availability and description.
pub fn render(grammars: &[GrammarSummary]) -> String {
    if grammars.is_empty() {
        return "No grammars configured.".to_string();
    }
    let width = grammars.iter().map(|g| g.key.len()).max().unwrap_or(0);
    grammars
        .iter()
        .map(|g| {
            let status = if g.available { "available" } else { "missing" };
            let line = format!("{:<width$}  {status:<9}", g.key);
            match &g.description {
                Some(description) => format!("{line}  {description}"),
                None => line.trim_end().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn execute(ctx: &CliContext) {
    println!("{}", render(&ctx.dispatcher.grammars()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_listing() {
        assert_eq!(render(&[]), "No grammars configured.");
    }

    #[test]
    fn test_columns_align() {
        let listing = render(&[
            GrammarSummary {
                key: "erg".into(),
                description: Some("English Resource Grammar".into()),
                available: true,
            },
            GrammarSummary {
                key: "jacy".into(),
                description: None,
                available: false,
            },
        ]);
        assert_eq!(
            listing,
            "erg   available  English Resource Grammar\njacy  missing"
        );
    }
}
