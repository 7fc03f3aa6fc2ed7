use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lchat::prelude::*;
use lprovider::{
    ClientFuture, ContentItem, ModelClient, ModelRequest, ModelResponse, Origin, ParameterKind,
    ParameterSpec, ProviderError, ProviderId, ToolCallRequest, ToolCallResult, ToolChoice,
    ToolSpec,
};
use ltooling::FunctionTool;
use serde_json::{Map, Value, json};

#[derive(Default)]
struct ScriptedClient {
    responses: Mutex<VecDeque<ModelResponse>>,
    repeat: Option<ModelResponse>,
    delay: Option<Duration>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl ScriptedClient {
    fn new(responses: Vec<ModelResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Self::default()
        }
    }

    fn repeating(response: ModelResponse) -> Self {
        Self {
            repeat: Some(response),
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl ModelClient for ScriptedClient {
    fn id(&self) -> ProviderId {
        ProviderId::Custom("scripted")
    }

    fn invoke<'a>(
        &'a self,
        request: ModelRequest,
    ) -> ClientFuture<'a, Result<ModelResponse, ProviderError>> {
        Box::pin(async move {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.requests.lock().expect("requests lock").push(request);
            let next = self.responses.lock().expect("responses lock").pop_front();
            next.or_else(|| self.repeat.clone())
                .ok_or_else(|| ProviderError::other("script exhausted"))
        })
    }
}

fn response(content: Vec<ContentItem>) -> ModelResponse {
    ModelResponse::new(ProviderId::Custom("scripted"), "claude-test", content)
}

fn text(value: &str) -> ModelResponse {
    response(vec![ContentItem::text(value)])
}

fn call(id: &str, name: &str, args: Value) -> ContentItem {
    ContentItem::ToolCall(ToolCallRequest::new(
        id,
        name,
        args.as_object().cloned().unwrap_or_else(Map::new),
    ))
}

type CallLog = Arc<Mutex<Vec<String>>>;

fn outline_tool(log: CallLog) -> FunctionTool {
    let spec = ToolSpec::new("get_course_outline", "Get a course outline").parameter(
        ParameterSpec::required("course_title", ParameterKind::String, "Course title"),
    );

    FunctionTool::new(spec, move |args, _ctx| {
        let log = Arc::clone(&log);
        async move {
            let title = ltooling::required_string(&args, "course_title")?;
            log.lock().expect("log lock").push(format!("outline:{title}"));
            Ok(ToolOutput::text(format!(
                "Course Title: {title}\nCourse Link: https://courses.test/mcp\nLessons (1 total):\n  Lesson 0: Introduction"
            ))
            .with_source(
                SourceRecord::new(title).with_link("https://courses.test/mcp"),
            ))
        }
    })
}

fn search_tool(log: CallLog) -> FunctionTool {
    let spec = ToolSpec::new("search_course_content", "Search course materials").parameter(
        ParameterSpec::required("query", ParameterKind::String, "What to search for"),
    );

    FunctionTool::new(spec, move |args, _ctx| {
        let log = Arc::clone(&log);
        async move {
            let query = ltooling::required_string(&args, "query")?;
            log.lock().expect("log lock").push(format!("search:{query}"));
            Ok(ToolOutput::text(format!("[MCP - Lesson 2]\nNotes about {query}"))
                .with_source(SourceRecord::new("MCP - Lesson 2")))
        }
    })
}

fn broken_tool(log: CallLog) -> FunctionTool {
    FunctionTool::new(ToolSpec::new("broken", "Always fails"), move |_args, _ctx| {
        let log = Arc::clone(&log);
        async move {
            log.lock().expect("log lock").push("broken".to_string());
            Err(ToolError::execution("vector store unavailable"))
        }
    })
}

fn course_registry(log: &CallLog) -> Arc<ToolRegistry> {
    let mut registry = ToolRegistry::new();
    registry
        .register(search_tool(Arc::clone(log)))
        .expect("register search");
    registry
        .register(outline_tool(Arc::clone(log)))
        .expect("register outline");
    registry
        .register(broken_tool(Arc::clone(log)))
        .expect("register broken");
    Arc::new(registry)
}

fn orchestrator(client: Arc<ScriptedClient>, registry: Arc<ToolRegistry>) -> ToolCallOrchestrator {
    ToolCallOrchestrator::builder(client, registry, "claude-test")
        .system_prompt("You answer questions about course materials.")
        .build()
        .expect("orchestrator should build")
}

fn tool_results(turn: &lprovider::Turn) -> Vec<ToolCallResult> {
    turn.content
        .iter()
        .filter_map(|item| match item {
            ContentItem::ToolResult(result) => Some(result.clone()),
            _ => None,
        })
        .collect()
}

fn logged(log: &CallLog) -> Vec<String> {
    log.lock().expect("log lock").clone()
}

#[tokio::test]
async fn direct_answer_without_tools_uses_one_model_call() {
    let client = Arc::new(ScriptedClient::new(vec![text(
        "Machine learning is learning patterns from data.",
    )]));
    let orchestrator = orchestrator(client.clone(), Arc::new(ToolRegistry::new()));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "What is machine learning?"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.text, "Machine learning is learning patterns from data.");
    assert_eq!(outcome.model_calls, 1);
    assert_eq!(outcome.tool_rounds, 0);
    assert_eq!(outcome.stop, StopCondition::FinalAnswer);
    assert!(outcome.sources.is_empty());

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].tools.is_empty());
    assert_eq!(requests[0].tool_choice, None);
}

#[tokio::test]
async fn text_only_response_returns_after_one_call_even_with_tools() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::new(vec![text("General answer.")]));
    let orchestrator = orchestrator(client.clone(), course_registry(&log));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "Say hi"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.text, "General answer.");
    assert_eq!(client.requests().len(), 1);
    assert_eq!(client.requests()[0].tool_choice, Some(ToolChoice::Auto));
    assert!(logged(&log).is_empty());
}

#[tokio::test]
async fn single_outline_round_returns_final_text_and_course_source() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![call(
            "toolu_outline",
            "get_course_outline",
            json!({"course_title": "MCP: Build Rich-Context AI Apps"}),
        )]),
        text("The MCP course has one lesson: Introduction."),
    ]));
    let orchestrator = orchestrator(client.clone(), course_registry(&log));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "What is the outline of the MCP course?"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.text, "The MCP course has one lesson: Introduction.");
    assert_eq!(outcome.model_calls, 2);
    assert_eq!(outcome.tool_rounds, 1);
    assert_eq!(logged(&log), ["outline:MCP: Build Rich-Context AI Apps"]);
    assert_eq!(
        outcome.sources,
        vec![
            SourceRecord::new("MCP: Build Rich-Context AI Apps")
                .with_link("https://courses.test/mcp")
        ]
    );

    let requests = client.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].tools.len(), 3);
    assert_eq!(requests[1].tool_choice, Some(ToolChoice::Auto));

    let turns = requests[1].turns.clone();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[1].origin, Origin::Assistant);
    assert_eq!(turns[2].origin, Origin::ToolResults);
    let results = tool_results(&turns[2]);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].tool_call_id, "toolu_outline");
    assert!(!results[0].is_error);
    assert!(results[0].content.starts_with("Course Title: MCP"));
}

#[tokio::test]
async fn two_sequential_rounds_keep_tools_on_every_call() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![call(
            "toolu_1",
            "get_course_outline",
            json!({"course_title": "MCP"}),
        )]),
        response(vec![
            ContentItem::text("Now searching lesson 2."),
            call("toolu_2", "search_course_content", json!({"query": "servers"})),
        ]),
        text("Lesson 2 covers servers."),
    ]));
    let orchestrator = orchestrator(client.clone(), course_registry(&log));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "What does lesson 2 of MCP cover?"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.text, "Lesson 2 covers servers.");
    assert_eq!(outcome.model_calls, 3);
    assert_eq!(outcome.tool_rounds, 2);
    assert_eq!(outcome.stop, StopCondition::FinalAnswer);
    assert_eq!(logged(&log), ["outline:MCP", "search:servers"]);

    let requests = client.requests();
    assert_eq!(requests.len(), 3);
    for request in &requests {
        assert_eq!(request.tools.len(), 3);
        assert_eq!(request.tool_choice, Some(ToolChoice::Auto));
    }

    // Search is registered first, so its sources win even though outline ran first.
    assert_eq!(outcome.sources, vec![SourceRecord::new("MCP - Lesson 2")]);
    assert_eq!(outcome.context.len(), 5);
}

#[tokio::test]
async fn round_cap_stops_after_three_model_calls() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::repeating(response(vec![call(
        "toolu_loop",
        "search_course_content",
        json!({"query": "again"}),
    )])));
    let orchestrator = orchestrator(client.clone(), course_registry(&log));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "keep searching"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.model_calls, 3);
    assert_eq!(outcome.tool_rounds, 2);
    assert_eq!(outcome.stop, StopCondition::RoundLimit);
    assert_eq!(outcome.text, "");
    assert_eq!(client.requests().len(), 3);
    assert_eq!(logged(&log).len(), 2);
}

#[tokio::test]
async fn round_cap_returns_text_carried_by_the_last_response() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::repeating(response(vec![
        call("toolu_loop", "search_course_content", json!({"query": "more"})),
        ContentItem::text("Partial answer so far."),
    ])));
    let orchestrator = orchestrator(client, course_registry(&log));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "dig deeper"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.stop, StopCondition::RoundLimit);
    assert_eq!(outcome.text, "Partial answer so far.");
}

#[tokio::test]
async fn configured_round_limit_bounds_model_calls() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::repeating(response(vec![call(
        "toolu_loop",
        "search_course_content",
        json!({"query": "again"}),
    )])));
    let orchestrator =
        ToolCallOrchestrator::builder(client.clone(), course_registry(&log), "claude-test")
            .max_tool_rounds(1)
            .build()
            .expect("orchestrator");

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "search"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.model_calls, 2);
    assert_eq!(outcome.tool_rounds, 1);
}

#[tokio::test]
async fn round_limit_above_the_cap_is_refused() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::repeating(response(vec![call(
        "toolu_loop",
        "search_course_content",
        json!({"query": "again"}),
    )])));

    let error = ToolCallOrchestrator::builder(client.clone(), course_registry(&log), "claude-test")
        .max_tool_rounds(5)
        .build()
        .expect_err("more than two rounds should be refused");

    assert_eq!(error.kind, ChatErrorKind::InvalidRequest);
    assert!(client.requests().is_empty());
    assert!(logged(&log).is_empty());
}

fn delayed_tool(name: &'static str, delay_ms: u64) -> FunctionTool {
    FunctionTool::new(ToolSpec::new(name, "Answers after a delay"), move |_args, _ctx| async move {
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        Ok(ToolOutput::text(format!("{name} done")))
    })
}

async fn assert_results_follow_request_order(parallel: bool) {
    let mut registry = ToolRegistry::new();
    registry.register(delayed_tool("slow", 60)).expect("slow");
    registry.register(delayed_tool("medium", 30)).expect("medium");
    registry.register(delayed_tool("fast", 1)).expect("fast");

    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![
            call("toolu_a", "slow", json!({})),
            call("toolu_b", "medium", json!({})),
            call("toolu_c", "fast", json!({})),
        ]),
        text("all done"),
    ]));
    let orchestrator = ToolCallOrchestrator::builder(client.clone(), Arc::new(registry), "claude-test")
        .policy(OrchestratorPolicy::default().with_parallel_tool_calls(parallel))
        .build()
        .expect("orchestrator");

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "run all three"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.model_calls, 2);
    let requests = client.requests();
    let results = tool_results(&requests[1].turns[2]);
    let ids = results
        .iter()
        .map(|result| result.tool_call_id.as_str())
        .collect::<Vec<_>>();
    let contents = results
        .iter()
        .map(|result| result.content.as_str())
        .collect::<Vec<_>>();

    assert_eq!(ids, ["toolu_a", "toolu_b", "toolu_c"]);
    assert_eq!(contents, ["slow done", "medium done", "fast done"]);
}

#[tokio::test]
async fn parallel_results_are_reassembled_in_request_order() {
    assert_results_follow_request_order(true).await;
}

#[tokio::test]
async fn sequential_results_are_in_request_order() {
    assert_results_follow_request_order(false).await;
}

#[tokio::test]
async fn tool_failure_is_contained_and_ends_after_one_follow_up() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![call("toolu_bad", "broken", json!({}))]),
        response(vec![
            ContentItem::text("The course store is unavailable right now."),
            call("toolu_retry", "broken", json!({})),
        ]),
    ]));
    let orchestrator = orchestrator(client.clone(), course_registry(&log));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "search for agents"))
        .await
        .expect("tool failures never abort the run");

    assert_eq!(outcome.model_calls, 2);
    assert_eq!(outcome.tool_rounds, 1);
    assert_eq!(outcome.stop, StopCondition::ToolFailure);
    assert_eq!(outcome.text, "The course store is unavailable right now.");
    assert_eq!(logged(&log), ["broken"]);

    let requests = client.requests();
    let results = tool_results(&requests[1].turns[2]);
    assert_eq!(results.len(), 1);
    assert!(results[0].is_error);
    assert_eq!(results[0].tool_call_id, "toolu_bad");
    assert_eq!(results[0].content, "Error: vector store unavailable");
}

#[tokio::test]
async fn failure_in_a_mixed_round_still_reports_every_result() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![
            call("toolu_ok", "search_course_content", json!({"query": "rag"})),
            call("toolu_bad", "broken", json!({})),
        ]),
        text("Found partial results."),
    ]));
    let orchestrator = orchestrator(client.clone(), course_registry(&log));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "rag?"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.stop, StopCondition::ToolFailure);
    let results = tool_results(&client.requests()[1].turns[2]);
    assert_eq!(results.len(), 2);
    assert!(!results[0].is_error);
    assert!(results[1].is_error);
}

#[tokio::test]
async fn failure_in_second_round_stops_after_third_call() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![call("toolu_1", "search_course_content", json!({"query": "a"}))]),
        response(vec![call("toolu_2", "broken", json!({}))]),
        text("Could not finish the search."),
    ]));
    let orchestrator = orchestrator(client.clone(), course_registry(&log));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "search twice"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.model_calls, 3);
    assert_eq!(outcome.tool_rounds, 2);
    assert_eq!(outcome.stop, StopCondition::ToolFailure);
    assert_eq!(outcome.text, "Could not finish the search.");
}

#[tokio::test]
async fn invalid_arguments_become_error_results() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![call("toolu_1", "search_course_content", json!({}))]),
        text("I need a search query."),
    ]));
    let orchestrator = orchestrator(client.clone(), course_registry(&log));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "search"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.stop, StopCondition::ToolFailure);
    let results = tool_results(&client.requests()[1].turns[2]);
    assert!(results[0].is_error);
    assert!(results[0].content.starts_with("Error: missing required parameter"));
    assert!(logged(&log).is_empty());
}

#[tokio::test]
async fn unknown_tool_yields_not_found_text_and_continues() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![call("toolu_1", "delete_course", json!({}))]),
        response(vec![call("toolu_2", "search_course_content", json!({"query": "x"}))]),
        text("Done."),
    ]));
    let orchestrator = orchestrator(client.clone(), course_registry(&log));

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "cleanup"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.model_calls, 3);
    assert_eq!(outcome.stop, StopCondition::FinalAnswer);
    let results = tool_results(&client.requests()[1].turns[2]);
    assert!(!results[0].is_error);
    assert_eq!(results[0].content, "Tool 'delete_course' not found");
}

#[tokio::test]
async fn slow_model_call_surfaces_as_timeout() {
    let client = Arc::new(ScriptedClient {
        delay: Some(Duration::from_secs(5)),
        ..ScriptedClient::new(vec![text("too late")])
    });
    let orchestrator = ToolCallOrchestrator::builder(client, Arc::new(ToolRegistry::new()), "claude-test")
        .model_timeout(Duration::from_millis(20))
        .build()
        .expect("orchestrator");

    let error = orchestrator
        .run(OrchestrationRequest::new("session_1", "hello"))
        .await
        .expect_err("should time out");

    assert_eq!(error.kind, ChatErrorKind::Timeout);
}

#[tokio::test]
async fn slow_tool_times_out_into_an_error_result() {
    let mut registry = ToolRegistry::new();
    registry.register(delayed_tool("slow", 5_000)).expect("slow");

    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![call("toolu_1", "slow", json!({}))]),
        text("The tool took too long."),
    ]));
    let orchestrator = ToolCallOrchestrator::builder(client.clone(), Arc::new(registry), "claude-test")
        .policy(OrchestratorPolicy::default().with_tool_timeout(Duration::from_millis(20)))
        .build()
        .expect("orchestrator");

    let outcome = orchestrator
        .run(OrchestrationRequest::new("session_1", "run slow"))
        .await
        .expect("run should succeed");

    assert_eq!(outcome.stop, StopCondition::ToolFailure);
    let results = tool_results(&client.requests()[1].turns[2]);
    assert!(results[0].is_error);
    assert!(results[0].content.contains("did not finish"));
}

#[tokio::test]
async fn caller_owned_session_keeps_sources_until_cleared() {
    let log = CallLog::default();
    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![call("toolu_1", "get_course_outline", json!({"course_title": "MCP"}))]),
        text("Outline sent."),
    ]));
    let orchestrator = orchestrator(client, course_registry(&log));
    let session = orchestrator.session();

    let outcome = orchestrator
        .run_with_session(OrchestrationRequest::new("session_1", "outline"), &session)
        .await
        .expect("run should succeed");

    assert_eq!(outcome.sources, session.collect_sources());
    assert_eq!(outcome.sources.len(), 1);

    session.clear_sources();
    assert!(session.collect_sources().is_empty());
}

#[derive(Default)]
struct PhaseRecorder {
    phases: Mutex<Vec<(OrchestrationPhase, u32)>>,
    completed: Mutex<Option<(StopCondition, u32, u32)>>,
}

impl OrchestratorHooks for PhaseRecorder {
    fn on_phase(&self, phase: OrchestrationPhase, _session_id: &SessionId, round: u32) {
        self.phases.lock().expect("phases lock").push((phase, round));
    }

    fn on_run_complete(
        &self,
        _session_id: &SessionId,
        stop: StopCondition,
        model_calls: u32,
        tool_rounds: u32,
        _elapsed: Duration,
    ) {
        *self.completed.lock().expect("completed lock") = Some((stop, model_calls, tool_rounds));
    }
}

#[tokio::test]
async fn hooks_see_each_phase_in_order() {
    use OrchestrationPhase::*;

    let log = CallLog::default();
    let hooks = Arc::new(PhaseRecorder::default());
    let client = Arc::new(ScriptedClient::new(vec![
        response(vec![call("toolu_1", "get_course_outline", json!({"course_title": "MCP"}))]),
        text("Outline sent."),
    ]));
    let orchestrator = ToolCallOrchestrator::builder(client, course_registry(&log), "claude-test")
        .hooks(hooks.clone())
        .build()
        .expect("orchestrator");

    orchestrator
        .run(OrchestrationRequest::new("session_1", "outline"))
        .await
        .expect("run should succeed");

    assert_eq!(
        hooks.phases.lock().expect("phases lock").as_slice(),
        [
            (AwaitingModel, 0),
            (ModelResponded, 0),
            (HasToolCalls, 1),
            (ExecutingTools, 1),
            (AwaitingModel, 1),
            (ModelResponded, 1),
            (Final, 1),
            (Done, 1),
        ]
    );
    assert_eq!(
        *hooks.completed.lock().expect("completed lock"),
        Some((StopCondition::FinalAnswer, 2, 1))
    );

}
