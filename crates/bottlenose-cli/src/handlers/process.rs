//! `bottlenose parse` and `bottlenose generate`.
//!
//! Both print the same response document the HTTP endpoints return.

use bottlenose_core::{Query, ResponseDocument};

use crate::bootstrap::CliContext;
use crate::error::CliError;

fn render(document: &ResponseDocument) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(document)?)
}

pub async fn run_parse(ctx: &CliContext, grammar: &str, query: &Query) -> Result<String, CliError> {
    let document = ctx.dispatcher.parse(grammar, query).await?;
    render(&document)
}

pub async fn run_generate(
    ctx: &CliContext,
    grammar: &str,
    query: &Query,
) -> Result<String, CliError> {
    let document = ctx.dispatcher.generate(grammar, query).await?;
    render(&document)
}

pub async fn parse(ctx: &CliContext, grammar: &str, query: &Query) -> Result<(), CliError> {
    println!("{}", run_parse(ctx, grammar, query).await?);
    Ok(())
}

pub async fn generate(ctx: &CliContext, grammar: &str, query: &Query) -> Result<(), CliError> {
    println!("{}", run_generate(ctx, grammar, query).await?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bootstrap::bootstrap_with_processor;
    use crate::commands::{ParseParams, to_query};
    use async_trait::async_trait;
    use bottlenose_core::{
        AppConfig, GrammarConfig, ProcessorError, ProcessorOptions, ProcessorPort,
        ProcessorResponse, ProcessorResult,
    };
    use std::path::Path;
    use std::sync::Arc;

    const MRS: &str = r#"[ LTOP: h0 INDEX: e2 [ e SF: prop ] RELS: < [ _rain_v_1<0:8> LBL: h1 ARG0: e2 ] > HCONS: < h0 qeq h1 > ]"#;

    struct CannedProcessor;

    impl CannedProcessor {
        fn respond(input: &str, surface: Option<&str>) -> ProcessorResponse {
            ProcessorResponse {
                input: input.to_string(),
                results: vec![ProcessorResult {
                    result_id: 0,
                    mrs: Some(MRS.to_string()),
                    derivation: None,
                    surface: surface.map(str::to_string),
                }],
                readings: Some(1),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl ProcessorPort for CannedProcessor {
        async fn parse(
            &self,
            _grammar: &Path,
            input: &str,
            _options: &ProcessorOptions,
        ) -> Result<ProcessorResponse, ProcessorError> {
            Ok(Self::respond(input, None))
        }

        async fn generate(
            &self,
            _grammar: &Path,
            mrs: &str,
            _options: &ProcessorOptions,
        ) -> Result<ProcessorResponse, ProcessorError> {
            Ok(Self::respond(mrs, Some("It rains.")))
        }
    }

    fn context(image: &Path) -> CliContext {
        let config = AppConfig {
            grammars: vec![GrammarConfig {
                key: "erg".into(),
                path: image.to_path_buf(),
                description: None,
            }],
            ..AppConfig::default()
        };
        bootstrap_with_processor(&config, Arc::new(CannedProcessor)).unwrap()
    }

    #[tokio::test]
    async fn test_parse_prints_requested_fields() {
        let image = tempfile::NamedTempFile::new().unwrap();
        let ctx = context(image.path());
        let params = ParseParams {
            mrs: Some("simple".into()),
            ..ParseParams::default()
        };
        let output = run_parse(&ctx, "erg", &params.to_query("It rains."))
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["input"], "It rains.");
        assert_eq!(json["readings"], 1);
        assert!(json["results"][0]["mrs"].as_str().unwrap().contains("_rain_v_1"));
        assert!(json["results"][0].get("eds").is_none());
    }

    #[tokio::test]
    async fn test_generate_includes_surface() {
        let image = tempfile::NamedTempFile::new().unwrap();
        let ctx = context(image.path());
        let query = to_query(MRS, [("results", &Some("2".to_string()))]);
        let output = run_generate(&ctx, "erg", &query).await.unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(json["results"][0]["surface"], "It rains.");
    }

    #[tokio::test]
    async fn test_unknown_grammar_exit_code() {
        let image = tempfile::NamedTempFile::new().unwrap();
        let ctx = context(image.path());
        let query = ParseParams::default().to_query("It rains.");
        let err = run_parse(&ctx, "zhong", &query).await.unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_latex_mrs_is_unavailable() {
        let image = tempfile::NamedTempFile::new().unwrap();
        let ctx = context(image.path());
        let params = ParseParams {
            mrs: Some("latex".into()),
            ..ParseParams::default()
        };
        let err = run_parse(&ctx, "erg", &params.to_query("It rains."))
            .await
            .unwrap_err();
        assert_eq!(err.exit_code(), 69);
    }
}
