//! Benchmarks for per-turn matching cost.
//!
//! Measures `IntentMatcher::best_match` over a wide frontier and a full
//! `DialogueManager::run` turn, the two paths every utterance goes through.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use scriptflow_core::{ScriptflowConfig, SlotDefinition};
use scriptflow_dialogue::{
    DialogueManager, IntentMatcher, JaccardScorer, ScenarioGraph, ScenarioSource, SlotCatalog,
    SourceNode,
};

const PHRASES: &[&str] = &[
    "我要买衣服",
    "我想看电影",
    "帮我订机票",
    "查询天气",
    "我要退货",
    "播放音乐",
    "预约挂号",
    "打车去机场",
];

/// One scenario with `width` sibling roots, each with a few intent phrases.
fn wide_graph(width: usize) -> ScenarioGraph {
    let nodes = (0..width)
        .map(|i| SourceNode {
            id: format!("node{}", i),
            intents: (0..3)
                .map(|j| format!("{}{}", PHRASES[(i + j) % PHRASES.len()], i))
                .collect(),
            slots: vec!["#size#".to_string()],
            children: vec![],
            response: "已下单，尺码#size#".to_string(),
        })
        .collect();
    ScenarioGraph::build(vec![ScenarioSource::new("bench", nodes)]).unwrap()
}

fn bench_best_match(c: &mut Criterion) {
    let graph = wide_graph(200);
    let candidates = graph.root_ids();
    let matcher = IntentMatcher::new(Arc::new(JaccardScorer));

    c.bench_function("best_match_200_candidates", |b| {
        b.iter(|| matcher.best_match(black_box("我想买一件衣服"), &candidates, &graph))
    });
}

fn bench_full_turn(c: &mut Criterion) {
    let catalog =
        SlotCatalog::new(vec![SlotDefinition::new("#size#", "您要什么尺码？", "XL|L|M|S")])
            .unwrap();
    let manager =
        DialogueManager::new(wide_graph(50), catalog, ScriptflowConfig::default()).unwrap();

    c.bench_function("run_turn_50_roots", |b| {
        b.iter(|| {
            let mut memory = manager.start_default_session().unwrap();
            manager.run(black_box("我要买衣服L码"), &mut memory)
        })
    });
}

criterion_group!(benches, bench_best_match, bench_full_turn);
criterion_main!(benches);
