use std::path::PathBuf;

use mcscrape_core::{parse_targets, RunProfile};
use mcscrape_scraper::extract::essentials::{ESSENTIALS_ROOT, SCORE_SELECTOR};
use mcscrape_scraper::extract::insights::INSIGHTS_ROOT;
use mcscrape_scraper::extract::profile::PROFILE_HEADER;
use mcscrape_scraper::extract::swot::SWOT_ROOT;
use mcscrape_scraper::resolver::{ORGANIC_RESULTS, SEARCH_INPUT};
use mcscrape_scraper::scripts::{
    CHECKLIST_ROWS, FIRST_TEXT, INSIGHTS, NEWS_LIST, SEARCH_RESULT_LINK, SWOT_TILE,
};
use mcscrape_scraper::testing::{PageEvent, QueryRule, ScriptedPage};
use mcscrape_scraper::TextReportSink;
use serde_json::{json, Value};

use super::*;

const SEARCH_URL: &str = "https://duckduckgo.com/";
const INFY_URL: &str = "https://www.moneycontrol.com/india/stockpricequote/it/infosys/IT";

/// TCS never resolves; INFY resolves and has Essentials and Insights but a
/// SWOT block whose tiles cannot be read.
fn scenario_page() -> ScriptedPage {
    ScriptedPage::new()
        .with_selectors([
            SEARCH_INPUT,
            ORGANIC_RESULTS,
            SWOT_ROOT,
            ESSENTIALS_ROOT,
            INSIGHTS_ROOT,
        ])
        .on_query(
            QueryRule::new(&SEARCH_RESULT_LINK)
                .after_typing("TCS")
                .fails("results not rendered"),
        )
        .on_query(
            QueryRule::new(&SEARCH_RESULT_LINK)
                .after_typing("INFY")
                .returns(json!(INFY_URL)),
        )
        .on_query(QueryRule::new(&SWOT_TILE).fails("overlay detached"))
        .on_query(
            QueryRule::new(&FIRST_TEXT)
                .with_args(json!({ "selectors": [SCORE_SELECTOR] }))
                .returns(json!("Pass 10/12 (83%)")),
        )
        .on_query(QueryRule::new(&FIRST_TEXT).returns(Value::Null))
        .on_query(QueryRule::new(&CHECKLIST_ROWS).returns(json!([])))
        .on_query(QueryRule::new(&INSIGHTS).returns(json!({
            "piotroski_score": "7",
            "piotroski_indicates": "Strong financial position",
            "cagr": [["Revenue", "12.5%"]],
            "price": [],
            "industry": [],
        })))
        .on_query(QueryRule::new(&NEWS_LIST).returns(json!([])))
}

fn pipeline(profile: RunProfile) -> Pipeline {
    Pipeline {
        pacing: Duration::ZERO,
        ..Pipeline::for_profile(profile)
    }
}

fn targets(csv: &str) -> Vec<Target> {
    parse_targets(csv.as_bytes()).unwrap()
}

async fn run(
    page: &ScriptedPage,
    pipeline: &Pipeline,
    screenshot_dir: Option<&Path>,
    targets: &[Target],
) -> (RunSummary, String) {
    let resolver = Resolver::new(SEARCH_URL, "moneycontrol.com", 3);
    let timings = Timings::zero();
    let ctx = RunContext {
        page,
        resolver: &resolver,
        pipeline,
        timings: &timings,
        screenshot_dir,
    };
    let mut sink = TextReportSink::new(Vec::new(), pipeline.report_format()).unwrap();
    let summary = run_targets(&ctx, targets, &mut sink).await.unwrap();
    let report = String::from_utf8(sink.into_inner()).unwrap();
    (summary, report)
}

#[tokio::test]
async fn empty_target_list_never_touches_the_page() {
    let page = scenario_page();
    let (summary, report) = run(&page, &pipeline(RunProfile::Report), None, &[]).await;

    assert_eq!(summary, RunSummary::default());
    assert!(page.events().is_empty());
    assert!(!report.contains("ERROR PROCESSING"));
}

#[tokio::test]
async fn failed_target_is_logged_once_and_the_run_continues() {
    let page = scenario_page();
    let targets = targets("Symbol\nTCS\nTCS\nINFY\n");
    assert_eq!(targets.len(), 2);

    let (summary, report) = run(&page, &pipeline(RunProfile::SwotApi), None, &targets).await;

    assert_eq!(
        summary,
        RunSummary {
            processed: 1,
            failed: 1
        }
    );
    assert_eq!(report.matches("ERROR PROCESSING").count(), 1);
    let error_at = report
        .find("\nERROR PROCESSING TCS: search failed for TCS after 3 attempts")
        .expect("TCS error line");
    let infy_at = report.find("Symbol: INFY").expect("INFY record");
    assert!(error_at < infy_at);

    let mut expected = vec![SEARCH_URL; 4];
    expected.push(INFY_URL);
    assert_eq!(page.visited(), expected);
}

#[tokio::test]
async fn swot_failure_leaves_other_sections_intact() {
    let page = scenario_page();
    let (summary, report) = run(
        &page,
        &pipeline(RunProfile::SwotApi),
        None,
        &targets("Symbol\nINFY\n"),
    )
    .await;

    assert_eq!(summary.processed, 1);
    for kind in ["Strengths", "Weaknesses", "Opportunities", "Threats"] {
        assert!(report.contains(&format!("{kind}_Count: 0\n")), "{kind} missing");
        assert!(!report.contains(&format!("{kind}_Summary")));
    }
    assert!(report.contains("MC_Essentials_Score: 83\n"));
    assert!(report.contains("Piotroski_Score: 7\n"));
    assert!(report.contains("Three_Year_CAGR:\n  Revenue: 12.5%\n"));
    assert_eq!(page.queried(&INSIGHTS), 1);
}

#[tokio::test]
async fn stages_run_in_fixed_order() {
    let page = scenario_page();
    run(
        &page,
        &pipeline(RunProfile::Report),
        None,
        &targets("Symbol\nINFY\n"),
    )
    .await;

    let queries: Vec<String> = page
        .events()
        .into_iter()
        .filter_map(|e| match e {
            PageEvent::Query { name, .. } => Some(name),
            _ => None,
        })
        .collect();
    let first = |name: &str| {
        queries
            .iter()
            .position(|q| q == name)
            .unwrap_or_else(|| panic!("{name} never queried"))
    };
    assert!(first(SEARCH_RESULT_LINK.name) < first(SWOT_TILE.name));
    assert!(first(SWOT_TILE.name) < first(CHECKLIST_ROWS.name));
    assert!(first(CHECKLIST_ROWS.name) < first(INSIGHTS.name));
    assert!(first(INSIGHTS.name) < first(NEWS_LIST.name));
}

#[tokio::test]
async fn api_profiles_skip_news_and_screenshots() {
    let page = scenario_page();
    let dir = PathBuf::from("shots");
    run(
        &page,
        &pipeline(RunProfile::SwotApi),
        Some(&dir),
        &targets("Symbol\nINFY\n"),
    )
    .await;

    assert_eq!(page.queried(&NEWS_LIST), 0);
    assert_eq!(page.queried(&CHECKLIST_ROWS), 0);
    assert!(!page
        .events()
        .iter()
        .any(|e| matches!(e, PageEvent::Screenshot(_))));
}

#[tokio::test]
async fn report_profile_screenshots_each_processed_target() {
    let page = scenario_page();
    let dir = PathBuf::from("shots");
    let (_, report) = run(
        &page,
        &pipeline(RunProfile::Report),
        Some(&dir),
        &targets("Symbol\nTCS\nINFY\n"),
    )
    .await;

    let shots: Vec<PathBuf> = page
        .events()
        .into_iter()
        .filter_map(|e| match e {
            PageEvent::Screenshot(path) => Some(path),
            _ => None,
        })
        .collect();
    assert_eq!(shots.len(), 1, "failed targets are not screenshotted");
    let name = shots[0].file_name().unwrap().to_string_lossy().into_owned();
    assert!(shots[0].starts_with("shots"));
    assert!(name.starts_with("INFY_") && name.ends_with(".png"), "got {name}");
    assert!(report.contains("Company: INFY (INFY)\n"));
    assert!(report.contains("Recent News (0 items):"));
}

#[tokio::test]
async fn profile_navigation_timeout_is_not_fatal() {
    let page = scenario_page().failing_goto("stockpricequote");
    let (summary, report) = run(
        &page,
        &pipeline(RunProfile::SwotApi),
        None,
        &targets("Symbol\nINFY\n"),
    )
    .await;

    assert_eq!(summary.failed, 0);
    assert!(report.contains("Symbol: INFY"));
}

#[tokio::test]
async fn missing_profile_header_still_emits_the_record() {
    let page = scenario_page();
    let (summary, report) = run(
        &page,
        &pipeline(RunProfile::Report),
        None,
        &targets("Symbol\nINFY\n"),
    )
    .await;

    let waits = page.waited_for();
    let header_at = waits
        .iter()
        .position(|s| s == PROFILE_HEADER)
        .expect("header wait after navigation");
    let swot_at = waits
        .iter()
        .position(|s| s == SWOT_ROOT)
        .expect("SWOT section wait");
    assert!(header_at < swot_at);
    assert_eq!(summary.failed, 0);
    assert!(report.contains("Company: INFY (INFY)\n"));
}

#[tokio::test]
async fn profile_header_is_awaited_before_extraction() {
    let page = scenario_page().with_selectors([PROFILE_HEADER]);
    let (summary, _) = run(
        &page,
        &pipeline(RunProfile::SwotApi),
        None,
        &targets("Symbol\nINFY\n"),
    )
    .await;

    assert_eq!(summary.processed, 1);
    assert_eq!(
        page.waited_for()
            .iter()
            .filter(|s| s.as_str() == PROFILE_HEADER)
            .count(),
        1
    );
}
