//! End-to-end tests for the simulation pipeline: text in, metrics and report out.
//! Model-backed extraction runs against a local mock of the Messages endpoint.

use std::sync::Arc;
use std::time::Duration;

use ai_client::Claude;
use axum::{routing::post, Json, Router};
use serde_json::json;

use hwsim_common::{SimError, SimulationDefaults, SimulationRequest, SimulatorKind, TechnologyNode};
use hwsim_engine::{KeywordExtractor, LlmExtractor, ParamExtractor, Simulator};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn keyword_simulator() -> Simulator {
    Simulator::new(Arc::new(KeywordExtractor::new()), SimulationDefaults::default())
}

/// Serve `reply` from `/messages` after `delay`, returning the base URL.
async fn mock_claude(reply: serde_json::Value, delay: Duration) -> String {
    let app = Router::new().route(
        "/messages",
        post(move |Json(_body): Json<serde_json::Value>| {
            let reply = reply.clone();
            async move {
                tokio::time::sleep(delay).await;
                Json(reply)
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn tool_reply(input: serde_json::Value) -> serde_json::Value {
    json!({
        "content": [{"type": "tool_use", "id": "toolu_01", "name": "record_parameters", "input": input}]
    })
}

// ---------------------------------------------------------------------------
// Keyword pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn korean_cpu_request_runs_end_to_end() {
    let request = SimulationRequest::new(
        SimulatorKind::CpuArchitecture,
        "4코어 CPU, 3.2GHz 클럭 주파수, L1 캐시 32KB, L2 캐시 256KB로 시뮬레이션 해줘",
    );
    let response = keyword_simulator().run(request).await.unwrap();

    assert_eq!(response.extracted_params["number_of_cores"], 4);
    assert_eq!(response.extracted_params["clock_frequency"], 3.2);
    let cpu = response.cpu_output.unwrap();
    assert!((cpu.ipc - 3.136).abs() < 1e-9);
    assert!(cpu.l3_hit_rate.is_none());
    assert!(response.message.starts_with("## CPU Architecture Simulation Results"));
    assert!(response.message.contains("L3 Hit Rate**: not configured"));
}

#[tokio::test]
async fn english_cpu_request_configures_l3() {
    let request = SimulationRequest::new(
        SimulatorKind::CpuArchitecture,
        "8-core 4.5 GHz, 4-wide issue, 14 stages, L1 64KB 8-way 3 cycles, \
         L3 32MB 45 cycles, MOESI, stride prefetcher, 200 GB/s",
    );
    let response = keyword_simulator().run(request).await.unwrap();

    let cpu = response.cpu_output.unwrap();
    assert_eq!(cpu.l3_hit_rate, Some(70.0));
    assert!((cpu.ipc - 4.0 * 0.8 * 0.97).abs() < 1e-9);
    assert_eq!(cpu.coherence_misses, 80);
    assert_eq!(cpu.bus_congestion, 40.0);
    assert!(response.message.contains("L3 Hit Rate**: 70.00%"));
}

#[tokio::test]
async fn korean_fab_request_reports_euv_bottleneck() {
    let request = SimulationRequest::new(
        SimulatorKind::SemiconductorFab,
        "7nm 공정, EUV 노광, 시간당 100개 웨이퍼 처리량으로 수율 시뮬레이션 해줘",
    );
    let response = keyword_simulator().run(request).await.unwrap();

    let fab = response.fab_output.unwrap();
    assert_eq!(fab.bottleneck_station_id.as_deref(), Some("Lithography_Scanner_02"));
    assert_eq!(fab.wip_level, 200);
    assert!(response.message.contains("Bottleneck Station**: Lithography_Scanner_02"));
}

#[tokio::test]
async fn arf_immersion_has_no_bottleneck() {
    let request = SimulationRequest::new(SimulatorKind::SemiconductorFab, "28nm on ArF immersion");
    let response = keyword_simulator().run(request).await.unwrap();
    assert!(response.fab_output.unwrap().bottleneck_station_id.is_none());
}

#[tokio::test]
async fn identical_requests_give_identical_results() {
    let simulator = keyword_simulator();
    let request = SimulationRequest::new(SimulatorKind::SemiconductorFab, "3nm EUV, Cpk 1.5, 300 WPH");

    let first = simulator.run(request.clone()).await.unwrap();
    let second = simulator.run(request).await.unwrap();

    assert_eq!(first.message, second.message);
    assert_eq!(first.fab_output, second.fab_output);
    assert_eq!(first.extracted_params, second.extracted_params);
}

#[tokio::test]
async fn reported_metrics_respect_their_floors_and_caps() {
    let simulator = keyword_simulator();
    for message in ["", "1 core", "64 cores 8-wide", "L1 64KB 19 cycles"] {
        let response = simulator
            .run(SimulationRequest::new(SimulatorKind::CpuArchitecture, message))
            .await
            .unwrap();
        let cpu = response.cpu_output.unwrap();
        assert!(cpu.ipc >= 0.1, "{message}: ipc {}", cpu.ipc);
        assert!(cpu.l1_hit_rate >= 80.0);
        assert!(cpu.l2_hit_rate >= 70.0);
        assert!(cpu.bus_congestion <= 50.0);
    }

    for message in ["", "3nm, Cpk 1.0, 10 WPH", "28nm Cpk 2.0 1000 WPH"] {
        let response = simulator
            .run(SimulationRequest::new(SimulatorKind::SemiconductorFab, message))
            .await
            .unwrap();
        let fab = response.fab_output.unwrap();
        assert!(fab.parametric_yield >= 50.0);
        assert!(fab.functional_yield >= 50.0);
        assert!(fab.oee >= 50.0);
        assert!(fab.line_balance_efficiency >= 70.0);
        assert!(fab.binning_distribution.grade_a >= 10.0);
        assert!(fab.binning_distribution.grade_b >= 20.0);
        assert!(fab.binning_distribution.grade_c >= 10.0);
    }
}

#[tokio::test]
async fn out_of_range_request_is_a_validation_error() {
    let request = SimulationRequest::new(SimulatorKind::CpuArchitecture, "run it at 15 GHz");
    let err = keyword_simulator().run(request).await.unwrap_err();

    assert!(err.is_client_error());
    assert!(matches!(err, SimError::Validation { ref field, .. } if field == "clock_frequency"));
}

#[tokio::test]
async fn explicit_input_ignores_the_message() {
    let mut input = SimulationDefaults::default().fab;
    input.technology_node = TechnologyNode::Nm28;
    let request = SimulationRequest::new(SimulatorKind::SemiconductorFab, "3nm EUV")
        .with_fab_input(input);

    let response = keyword_simulator().run(request).await.unwrap();

    assert!(response.extracted_params.is_empty());
    let fab = response.fab_output.unwrap();
    assert!(fab.bottleneck_station_id.is_none());
    // 0.95 × (1.67 / 2) × 100
    assert!((fab.functional_yield - 79.325).abs() < 1e-9);
}

// ---------------------------------------------------------------------------
// Model-backed extraction
// ---------------------------------------------------------------------------

#[tokio::test]
async fn llm_extraction_feeds_the_resolver() {
    let url = mock_claude(
        tool_reply(json!({"technology_node": "3nm", "lithography_source": "euv", "notes": "ignored"})),
        Duration::ZERO,
    )
    .await;
    let claude = Claude::new("sk-ant-test", "claude-test").with_base_url(url);
    let extractor = Arc::new(LlmExtractor::new(claude, Duration::from_secs(5)));
    let simulator = Simulator::new(extractor, SimulationDefaults::default());

    let response = simulator
        .run(SimulationRequest::new(SimulatorKind::SemiconductorFab, "3nm with EUV please"))
        .await
        .unwrap();

    assert_eq!(response.extracted_params.len(), 2);
    assert!(!response.extracted_params.contains_key("notes"));
    let fab = response.fab_output.unwrap();
    assert_eq!(fab.bottleneck_station_id.as_deref(), Some("Lithography_Scanner_02"));
}

#[tokio::test]
async fn llm_timeout_falls_back_to_defaults() {
    let url = mock_claude(tool_reply(json!({"number_of_cores": 16})), Duration::from_secs(2)).await;
    let claude = Claude::new("sk-ant-test", "claude-test").with_base_url(url);
    let extractor = LlmExtractor::new(claude, Duration::from_millis(100));

    let params = extractor
        .extract("16 cores", SimulatorKind::CpuArchitecture)
        .await;
    assert!(params.is_empty());
}

#[tokio::test]
async fn unreachable_model_falls_back_to_defaults() {
    // Nothing listens on the discard port.
    let claude = Claude::new("sk-ant-test", "claude-test").with_base_url("http://127.0.0.1:9");
    let simulator = Simulator::new(
        Arc::new(LlmExtractor::new(claude, Duration::from_secs(2))),
        SimulationDefaults::default(),
    );

    let response = simulator
        .run(SimulationRequest::new(SimulatorKind::CpuArchitecture, "8 cores"))
        .await
        .unwrap();

    assert!(response.extracted_params.is_empty());
    assert_eq!(response.cpu_output.unwrap().coherence_misses, 40);
}
