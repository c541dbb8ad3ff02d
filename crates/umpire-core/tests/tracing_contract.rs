//! Log capture contract: round spans carry state and provider usage, and the
//! player's free text never reaches the log stream.

use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;
use umpire_core::model::{GenerationConfig, LlmResponse};
use umpire_core::providers::llm::fake::FakeClient;
use umpire_core::providers::llm::tracing::TracingLlmClient;
use umpire_core::providers::llm::LlmClient;
use umpire_core::{Judge, Move};

const SECRET_INPUT: &str = "my password is hunter2 so play rock";

#[derive(Clone)]
struct MockWriter {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl std::io::Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for MockWriter {
    type Writer = MockWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl MockWriter {
    fn lines(&self) -> Vec<serde_json::Value> {
        let raw = String::from_utf8(self.buf.lock().unwrap().clone()).unwrap();
        raw.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).expect("fmt json line"))
            .collect()
    }

    fn raw(&self) -> String {
        String::from_utf8(self.buf.lock().unwrap().clone()).unwrap()
    }
}

fn setup_capture() -> (MockWriter, tracing::subscriber::DefaultGuard) {
    let writer = MockWriter {
        buf: Arc::new(Mutex::new(Vec::new())),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_writer(writer.clone())
        .with_max_level(tracing::Level::DEBUG)
        .json()
        .with_span_events(FmtSpan::CLOSE)
        .finish();

    (writer, tracing::subscriber::set_default(subscriber))
}

fn verdict_text(round: u32, bomb: bool) -> String {
    json!({
        "round": round,
        "user_input": SECRET_INPUT,
        "interpreted_user_move": "rock",
        "bot_move": "scissors",
        "move_status": "VALID",
        "round_winner": "User",
        "explanation": "rock beats scissors",
        "state_update": { "user_bomb_used": bomb }
    })
    .to_string()
}

/// Provider that reports token usage the way the HTTP backends do.
struct UsageClient;

#[async_trait]
impl LlmClient for UsageClient {
    async fn complete(
        &self,
        _prompt: &str,
        _config: &GenerationConfig,
    ) -> anyhow::Result<LlmResponse> {
        Ok(LlmResponse {
            text: verdict_text(1, false),
            provider: "usage".to_string(),
            model: "usage-model".to_string(),
            cached: false,
            meta: json!({ "usage": { "input_tokens": 321, "output_tokens": 54 } }),
        })
    }
    fn provider_name(&self) -> &'static str {
        "usage"
    }
}

#[tokio::test]
async fn free_text_never_logged() {
    let (writer, _guard) = setup_capture();

    let fake = Arc::new(FakeClient::new("m".into()).with_script([verdict_text(1, false)]));
    let client = Arc::new(TracingLlmClient::new(fake));
    let mut judge = Judge::new(client, GenerationConfig::default());
    judge
        .judge_round(SECRET_INPUT, Move::Scissors)
        .await
        .unwrap();

    let out = writer.raw();
    assert!(!out.is_empty());
    assert!(!out.contains("hunter2"), "player input leaked into logs");
}

#[tokio::test]
async fn request_span_records_model_and_usage() {
    let (writer, _guard) = setup_capture();

    let client = Arc::new(TracingLlmClient::new(Arc::new(UsageClient)));
    let mut judge = Judge::new(client, GenerationConfig::default());
    judge.judge_round("rock", Move::Scissors).await.unwrap();

    let request_span = writer
        .lines()
        .into_iter()
        .filter_map(|l| l.get("span").cloned())
        .find(|s| s["name"] == "gen_ai.client.request")
        .expect("gen_ai.client.request span closed");

    assert_eq!(request_span["gen_ai.system"], "usage");
    assert_eq!(request_span["gen_ai.request.model"], "usage-model");
    assert_eq!(request_span["gen_ai.usage.input_tokens"], 321);
    assert_eq!(request_span["gen_ai.usage.output_tokens"], 54);
}

#[tokio::test]
async fn round_echo_mismatch_warns_and_applies() {
    let (writer, _guard) = setup_capture();

    let fake = Arc::new(FakeClient::new("m".into()).with_script([verdict_text(9, true)]));
    let mut judge = Judge::new(fake, GenerationConfig::default());
    judge.judge_round("rock", Move::Scissors).await.unwrap();

    let warning = writer
        .lines()
        .into_iter()
        .find(|l| l["level"] == "WARN")
        .expect("mismatch warning emitted");
    assert_eq!(warning["fields"]["echoed"], 9);
    assert_eq!(warning["fields"]["tracked"], 1);
    assert_eq!(judge.state().round, 2);
    assert!(judge.state().user_bomb_used);
}

#[tokio::test]
async fn failed_round_logs_error_code() {
    let (writer, _guard) = setup_capture();

    let fake = Arc::new(FakeClient::new("m".into()).with_script(["not json at all"]));
    let mut judge = Judge::new(fake, GenerationConfig::default());
    assert!(judge.judge_round("rock", Move::Scissors).await.is_err());

    let warning = writer
        .lines()
        .into_iter()
        .find(|l| l["level"] == "WARN")
        .expect("failure warning emitted");
    assert_eq!(warning["fields"]["code"], "E_MALFORMED_JUDGMENT");
    assert_eq!(judge.state().round, 1);
}
