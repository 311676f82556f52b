use serde_json::{json, Value};

use super::*;
use crate::testing::{PageEvent, QueryRule, ScriptedPage};

fn tile_rule(tile: &str, title: &str, summary: &str) -> QueryRule {
    QueryRule::new(&SWOT_TILE)
        .with_args(json!({ "tile": tile }))
        .returns(json!({ "title": title, "summary": summary }))
}

fn details_rule(container: &str, items: &[&str]) -> QueryRule {
    QueryRule::new(&LIST_ITEMS)
        .with_args(json!({ "container": container }))
        .returns(json!(items))
}

fn controls() -> Vec<&'static str> {
    let mut selectors = vec![SWOT_ROOT];
    for tile in &TILES {
        selectors.push(tile.expand);
        selectors.push(tile.collapse);
    }
    selectors
}

fn full_page() -> ScriptedPage {
    ScriptedPage::new()
        .with_selectors(controls())
        .on_query(tile_rule(".swli1", "Strengths (3)", "Low debt"))
        .on_query(tile_rule(".swli2", "Weaknesses (1)", "Falling margins"))
        .on_query(tile_rule(".swli3", "Opportunities (0)", ""))
        .on_query(tile_rule(".swli4", "Threats (2)", "Promoter pledge"))
        .on_query(details_rule("#swliSDiv", &["Zero debt", "High ROCE", "Cash rich"]))
        .on_query(details_rule("#swliWDiv", &["Margin compression"]))
        .on_query(details_rule("#swliODiv", &[]))
        .on_query(details_rule("#swliTDiv", &["Pledged shares", "FII selling"]))
}

fn target() -> Target {
    Target::new("TCS").unwrap()
}

#[tokio::test]
async fn detailed_mode_reads_all_four_tiles() {
    let page = full_page();
    let categories = extract_swot(&page, &target(), SwotMode::Detailed, &Timings::zero())
        .await
        .unwrap();

    let kinds: Vec<SwotKind> = categories.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, SwotKind::ALL.to_vec());
    assert_eq!(categories[0].count, 3);
    assert_eq!(categories[0].summary, "Low debt");
    assert_eq!(categories[0].details.len(), 3);
    assert_eq!(categories[2].count, 0);
    assert!(categories[2].details.is_empty());
    assert_eq!(categories[3].details, vec!["Pledged shares", "FII selling"]);
}

fn clicks(page: &ScriptedPage) -> Vec<String> {
    page.events()
        .into_iter()
        .filter_map(|e| match e {
            PageEvent::Click(sel) => Some(sel),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn detailed_mode_collapses_each_tile_before_the_next() {
    let page = full_page();
    extract_swot(&page, &target(), SwotMode::Detailed, &Timings::zero())
        .await
        .unwrap();

    assert_eq!(
        clicks(&page),
        vec![
            ".swli1 a",
            ".swli1 .swlicl",
            ".swli2 a",
            ".swli2 .swlicl",
            ".swli3 a",
            ".swli3 .swlicl",
            ".swli4 a",
            ".swli4 .swlicl",
        ]
    );
}

#[tokio::test]
async fn summary_mode_never_expands() {
    let page = full_page();
    let categories = extract_swot(&page, &target(), SwotMode::Summary, &Timings::zero())
        .await
        .unwrap();

    assert_eq!(categories.len(), 4);
    assert!(categories.iter().all(|c| c.details.is_empty()));
    assert!(!page.events().iter().any(|e| matches!(e, PageEvent::Click(_))));
    assert_eq!(page.queried(&LIST_ITEMS), 0);
}

#[tokio::test]
async fn missing_root_is_section_missing() {
    let page = ScriptedPage::new();
    let err = extract_swot(&page, &target(), SwotMode::Detailed, &Timings::zero())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ExtractionError::SectionMissing { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn missing_and_failing_tiles_are_skipped() {
    let page = ScriptedPage::new()
        .with_selectors([SWOT_ROOT])
        .on_query(tile_rule(".swli1", "Strengths (5)", "Brand"))
        .on_query(
            QueryRule::new(&SWOT_TILE)
                .with_args(json!({ "tile": ".swli2" }))
                .returns(Value::Null),
        )
        .on_query(
            QueryRule::new(&SWOT_TILE)
                .with_args(json!({ "tile": ".swli3" }))
                .fails("detached frame"),
        )
        .on_query(tile_rule(".swli4", "Threats (1)", "Competition"));

    let categories = extract_swot(&page, &target(), SwotMode::Summary, &Timings::zero())
        .await
        .unwrap();
    let kinds: Vec<SwotKind> = categories.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![SwotKind::Strengths, SwotKind::Threats]);
}

#[tokio::test]
async fn missing_expand_control_keeps_summary() {
    let page = ScriptedPage::new()
        .with_selectors([SWOT_ROOT])
        .on_query(tile_rule(".swli1", "Strengths (2)", "Scale"))
        .on_query(QueryRule::new(&SWOT_TILE).returns(Value::Null));

    let categories = extract_swot(&page, &target(), SwotMode::Detailed, &Timings::zero())
        .await
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].count, 2);
    assert!(categories[0].details.is_empty());
}

#[tokio::test]
async fn no_readable_tiles_is_section_missing() {
    let page = ScriptedPage::new()
        .with_selectors([SWOT_ROOT])
        .on_query(QueryRule::new(&SWOT_TILE).returns(Value::Null));
    let err = extract_swot(&page, &target(), SwotMode::Summary, &Timings::zero())
        .await
        .unwrap_err();
    assert!(
        matches!(err, ExtractionError::SectionMissing { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn unreadable_details_still_collapse_the_tile() {
    let page = ScriptedPage::new()
        .with_selectors(controls())
        .on_query(
            QueryRule::new(&LIST_ITEMS)
                .with_args(json!({ "container": "#swliSDiv" }))
                .fails("overlay detached"),
        )
        .on_query(tile_rule(".swli1", "Strengths (3)", "Low debt"))
        .on_query(tile_rule(".swli2", "Weaknesses (1)", "Falling margins"))
        .on_query(details_rule("#swliWDiv", &["Margin compression"]))
        .on_query(QueryRule::new(&SWOT_TILE).returns(Value::Null));

    let categories = extract_swot(&page, &target(), SwotMode::Detailed, &Timings::zero())
        .await
        .unwrap();

    assert_eq!(
        clicks(&page),
        vec![".swli1 a", ".swli1 .swlicl", ".swli2 a", ".swli2 .swlicl"]
    );
    let kinds: Vec<SwotKind> = categories.iter().map(|c| c.kind).collect();
    assert_eq!(kinds, vec![SwotKind::Strengths, SwotKind::Weaknesses]);
    assert_eq!(categories[0].count, 3);
    assert_eq!(categories[0].summary, "Low debt");
    assert!(categories[0].details.is_empty());
    assert_eq!(categories[1].details, vec!["Margin compression"]);
}
