//! Main commands enum.
//!
//! `parse` and `generate` take the same parameters as the HTTP endpoints and
//! run them through the same validation, so a query can be tried from a
//! shell before it is sent over HTTP.

use clap::{Args, Subcommand};

use bottlenose_core::Query;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List configured grammars
    Grammars,

    /// Parse a sentence and print the response document
    Parse {
        /// Grammar key
        grammar: String,
        /// Sentence to parse
        input: String,
        #[command(flatten)]
        params: ParseParams,
    },

    /// Generate from a SimpleMRS and print the response document
    Generate {
        /// Grammar key
        grammar: String,
        /// SimpleMRS to realize
        input: String,
        /// Maximum number of results
        #[arg(long)]
        results: Option<String>,
        /// Derivation format (json, udf, null)
        #[arg(long)]
        derivation: Option<String>,
    },
}

/// Output selection for `parse`; values are validated like query parameters.
#[derive(Args, Debug, Default)]
pub struct ParseParams {
    /// Maximum number of results
    #[arg(long)]
    pub results: Option<String>,
    /// Use generic entries for unknown words (all, null)
    #[arg(long)]
    pub generics: Option<String>,
    /// Token lattice format (json, yy, null)
    #[arg(long)]
    pub tokens: Option<String>,
    /// Derivation format (json, udf, null)
    #[arg(long)]
    pub derivation: Option<String>,
    /// MRS format (json, simple, latex, null)
    #[arg(long)]
    pub mrs: Option<String>,
    /// EDS format (json, native, penman, amr, latex, null)
    #[arg(long)]
    pub eds: Option<String>,
    /// DMRS format (json, penman, latex, null)
    #[arg(long)]
    pub dmrs: Option<String>,
    /// Include variable properties (json, null)
    #[arg(long)]
    pub properties: Option<String>,
    /// Keep only results whose MRS matches this regular expression
    #[arg(long)]
    pub filter: Option<String>,
}

/// Build a query from `input` and the flags that were given.
pub fn to_query<'a>(
    input: &str,
    flags: impl IntoIterator<Item = (&'a str, &'a Option<String>)>,
) -> Query {
    let mut query = Query::new();
    query.insert("input".to_string(), input.to_string());
    for (name, value) in flags {
        if let Some(value) = value {
            query.insert(name.to_string(), value.clone());
        }
    }
    query
}

impl ParseParams {
    pub fn to_query(&self, input: &str) -> Query {
        to_query(
            input,
            [
                ("results", &self.results),
                ("generics", &self.generics),
                ("tokens", &self.tokens),
                ("derivation", &self.derivation),
                ("mrs", &self.mrs),
                ("eds", &self.eds),
                ("dmrs", &self.dmrs),
                ("properties", &self.properties),
                ("filter", &self.filter),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use clap::Parser;

    #[test]
    fn test_parse_flags_become_query() {
        let cli = Cli::parse_from([
            "bottlenose",
            "parse",
            "erg",
            "Abrams barks",
            "--mrs",
            "json",
            "--results",
            "3",
        ]);
        let Some(Commands::Parse {
            grammar,
            input,
            params,
        }) = cli.command
        else {
            panic!("expected parse");
        };
        assert_eq!(grammar, "erg");
        let query = params.to_query(&input);
        assert_eq!(query["input"], "Abrams barks");
        assert_eq!(query["mrs"], "json");
        assert_eq!(query["results"], "3");
        assert!(!query.contains_key("eds"));
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from(["bottlenose", "serve", "--port", "9000"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Serve {
                host: None,
                port: Some(9000)
            })
        ));
    }
}
