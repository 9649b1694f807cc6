//! Shared fixtures for the route tests.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use bottlenose_axum::{CorsConfig, bootstrap_with_processor, create_router};
use bottlenose_core::{
    AppConfig, GrammarConfig, ProcessorError, ProcessorOptions, ProcessorPort, ProcessorResponse,
    ProcessorResult, TokenStreams,
};
use http_body_util::BodyExt;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;
use tower::ServiceExt;

pub const MRS: &str = r#"[ LTOP: h0 INDEX: e2 [ e SF: prop TENSE: pres ] RELS: < [ proper_q<0:6> LBL: h4 ARG0: x3 [ x PERS: 3 NUM: sg ] RSTR: h5 BODY: h6 ] [ named<0:6> LBL: h7 CARG: "Abrams" ARG0: x3 ] [ _bark_v_1<7:13> LBL: h1 ARG0: e2 ARG1: x3 ] > HCONS: < h0 qeq h1 h5 qeq h7 > ]"#;
pub const UDF: &str = r#"(root_strict (21 sb-hd_mc_c 1.25 0 2 (19 hdn_bnp-pn_c 0.5 0 1 (5 abrams -0.25 0 1 ("abrams" 14 "token"))) (20 bark_v1 0.5 1 2 ("barks" 15 "token"))))"#;
pub const YY: &str = r#"(1, 0, 1, <0:6>, 1, "Abrams", 0, "null") (2, 1, 2, <7:13>, 1, "barks", 0, "null")"#;

/// Processor returning canned ACE output and counting calls.
#[derive(Default)]
pub struct MockProcessor {
    pub calls: Mutex<usize>,
    pub error: Option<fn() -> ProcessorError>,
}

impl MockProcessor {
    fn respond(&self, input: &str, surface: Option<&str>) -> Result<ProcessorResponse, ProcessorError> {
        *self.calls.lock().unwrap() += 1;
        if let Some(error) = self.error {
            return Err(error());
        }
        Ok(ProcessorResponse {
            input: input.to_string(),
            results: vec![ProcessorResult {
                result_id: 0,
                mrs: Some(MRS.to_string()),
                derivation: Some(UDF.to_string()),
                surface: surface.map(str::to_string),
            }],
            readings: Some(1),
            tcpu: Some(5),
            pedges: Some(20),
            tokens: TokenStreams {
                initial: Some(YY.to_string()),
                internal: Some(YY.to_string()),
            },
            ..Default::default()
        })
    }
}

#[async_trait]
impl ProcessorPort for MockProcessor {
    async fn parse(
        &self,
        _grammar: &Path,
        input: &str,
        _options: &ProcessorOptions,
    ) -> Result<ProcessorResponse, ProcessorError> {
        self.respond(input, None)
    }

    async fn generate(
        &self,
        _grammar: &Path,
        mrs: &str,
        _options: &ProcessorOptions,
    ) -> Result<ProcessorResponse, ProcessorError> {
        self.respond(mrs, Some("Abrams barks."))
    }
}

/// A router over one installed grammar (`erg`) and one missing one (`jacy`).
pub struct TestApp {
    pub router: Router,
    pub processor: Arc<MockProcessor>,
    _image: NamedTempFile,
}

impl TestApp {
    pub fn new(allow_jsonp: bool) -> Self {
        Self::with_processor(MockProcessor::default(), allow_jsonp)
    }

    pub fn with_processor(processor: MockProcessor, allow_jsonp: bool) -> Self {
        let image = NamedTempFile::new().unwrap();
        let config = AppConfig {
            allow_jsonp,
            grammars: vec![
                GrammarConfig {
                    key: "erg".into(),
                    path: image.path().to_path_buf(),
                    description: Some("English Resource Grammar".into()),
                },
                GrammarConfig {
                    key: "jacy".into(),
                    path: image.path().with_extension("missing"),
                    description: None,
                },
            ],
            ..AppConfig::default()
        };
        let processor = Arc::new(processor);
        let ctx = bootstrap_with_processor(&config, processor.clone()).unwrap();
        Self {
            router: create_router(ctx, &CorsConfig::AllowAll),
            processor,
            _image: image,
        }
    }

    pub fn calls(&self) -> usize {
        *self.processor.calls.lock().unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Percent-encode a query value.
pub fn encode(value: &str) -> String {
    let mut out = String::new();
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
