use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use hwsim_common::{ParamMap, SimulatorKind};

use super::ParamExtractor;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Number {
    Float,
    Integer,
}

/// A pattern whose first capture group is a number for `key`.
struct NumberRule {
    key: &'static str,
    pattern: Regex,
    number: Number,
}

fn rule(key: &'static str, pattern: &str, number: Number) -> NumberRule {
    NumberRule {
        key,
        pattern: Regex::new(pattern).expect("valid regex"),
        number,
    }
}

static CPU_NUMBER_RULES: LazyLock<Vec<NumberRule>> = LazyLock::new(|| {
    use Number::*;
    vec![
        rule("clock_frequency", r"(?i)(\d+(?:\.\d+)?)\s*ghz", Float),
        rule("number_of_cores", r"(?i)(\d+)\s*-?\s*(?:cores?\b|코어)", Integer),
        rule("pipeline_depth", r"(?i)(\d+)\s*-?\s*stages?", Integer),
        rule("issue_width", r"(?i)(\d+)\s*-?\s*(?:wide|issue)\b", Integer),
        rule("rob_size", r"(?i)(?:\brob|re-?order\s*buffer)\D{0,12}?(\d+)", Integer),
        rule(
            "branch_prediction_accuracy",
            r"(?i)branch\D{0,40}?(\d+(?:\.\d+)?)\s*%",
            Float,
        ),
        rule(
            "main_memory_latency",
            r"(?i)(?:main\s*memory|dram|\bram)\s*latency\D{0,12}?(\d+)",
            Integer,
        ),
        rule("bus_bandwidth", r"(?i)(\d+(?:\.\d+)?)\s*gb/s", Float),
    ]
});

static FAB_NUMBER_RULES: LazyLock<Vec<NumberRule>> = LazyLock::new(|| {
    use Number::*;
    vec![
        rule("mask_layer_count", r"(?i)(\d+)\s*(?:mask\s*)?layers?", Integer),
        rule("cpk_target", r"(?i)cpk\D{0,10}?(\d+(?:\.\d+)?)", Float),
        rule(
            "cd_uniformity",
            r"(?i)cd\s*uniformity\D{0,12}?(\d+(?:\.\d+)?)",
            Float,
        ),
        rule("overlay_accuracy", OVERLAY_PATTERN, Float),
        rule(
            "throughput_wph",
            r"(?i)(\d+)\s*(?:wph|wafers?\s*(?:per|/)\s*h(?:ou)?r)",
            Integer,
        ),
        rule("throughput_wph", r"시간당\s*(\d+)\s*개?\s*웨이퍼", Integer),
        rule("mtbf", r"(?i)mtbf\D{0,12}?(\d+(?:\.\d+)?)", Float),
        rule("mttr", r"(?i)mttr\D{0,12}?(\d+(?:\.\d+)?)", Float),
        rule(
            "defect_clustering_factor",
            r"(?i)clustering\D{0,24}?(\d+(?:\.\d+)?)",
            Float,
        ),
        rule(
            "killer_defect_ratio",
            r"(?i)killer\D{0,40}?(\d+(?:\.\d+)?)\s*%",
            Float,
        ),
    ]
});

// Cache rules run on the text between one level token (`L1`, `L2`, `L3`) and the next, anchored
// right after the token, so a value is only ever credited to the nearest preceding level.
static CACHE_LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bL([123])\b").expect("valid regex"));
static CACHE_SIZE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[^0-9,;]{0,16}?(\d+(?:\.\d+)?)\s*([KMG])i?B").expect("valid regex")
});
static CACHE_WAYS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[^,;]{0,32}?(\d+)\s*-?\s*way").expect("valid regex"));
static CACHE_LATENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[^,;]{0,32}?(\d+)\s*-?\s*cycles?").expect("valid regex")
});

static PREFETCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(no\s+prefetch|stride|next[-_ ]?line)").expect("valid regex")
});
static COHERENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(moesi|mesi|msi)\b").expect("valid regex"));
static TRACE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\btrace(?:\s*file)?\s*[:=]?\s*([\w./-]+\.\w+)").expect("valid regex")
});

const OVERLAY_PATTERN: &str = r"(?i)overlay\D{0,24}?(\d+(?:\.\d+)?)\s*nm";
static OVERLAY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(OVERLAY_PATTERN).expect("valid regex"));
// A node is a whole number: "2.7nm" or "130nm" must not yield "7nm" or "30nm".
static NODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[^\d.])(28|14|7|3)\s*nm").expect("valid regex"));
static EUV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\beuv").expect("valid regex"));
static ARF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\barf|immersion").expect("valid regex"));

/// Regex-based extractor. Recognises numeric-with-unit tokens and enum keywords only.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordExtractor;

impl KeywordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous core of [`ParamExtractor::extract`].
    pub fn extract_params(&self, user_message: &str, kind: SimulatorKind) -> ParamMap {
        let mut params = ParamMap::new();
        match kind {
            SimulatorKind::CpuArchitecture => {
                apply_number_rules(&CPU_NUMBER_RULES, user_message, &mut params);
                extract_cache_fields(user_message, &mut params);
                extract_cpu_keywords(user_message, &mut params);
            }
            SimulatorKind::SemiconductorFab => {
                apply_number_rules(&FAB_NUMBER_RULES, user_message, &mut params);
                extract_fab_keywords(user_message, &mut params);
            }
        }
        params
    }
}

#[async_trait]
impl ParamExtractor for KeywordExtractor {
    async fn extract(&self, user_message: &str, kind: SimulatorKind) -> ParamMap {
        self.extract_params(user_message, kind)
    }
}

fn parse_number(raw: &str, number: Number) -> Option<Value> {
    match number {
        Number::Float => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Value::from),
        Number::Integer => raw.parse::<u64>().ok().map(Value::from),
    }
}

fn apply_number_rules(rules: &[NumberRule], text: &str, params: &mut ParamMap) {
    for rule in rules {
        if params.contains_key(rule.key) {
            continue;
        }
        let value = rule
            .pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| parse_number(m.as_str(), rule.number));
        if let Some(value) = value {
            params.insert(rule.key.to_string(), value);
        }
    }
}

/// Split `text` into `(level, following text)` pairs, one per cache-level token.
fn cache_segments(text: &str) -> Vec<(&str, &str)> {
    let tokens: Vec<_> = CACHE_LEVEL_RE.captures_iter(text).collect();
    tokens
        .iter()
        .enumerate()
        .filter_map(|(i, caps)| {
            let level = caps.get(1)?.as_str();
            let start = caps.get(0)?.end();
            let end = tokens
                .get(i + 1)
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());
            Some((level, &text[start..end]))
        })
        .collect()
}

fn extract_cache_fields(text: &str, params: &mut ParamMap) {
    for (level, segment) in cache_segments(text) {
        if let Some(caps) = CACHE_SIZE_RE.captures(segment) {
            let label = format!("{}{}B", &caps[1], caps[2].to_uppercase());
            params
                .entry(format!("l{level}_size"))
                .or_insert(Value::from(label));
        }
        for (re, suffix) in [(&*CACHE_WAYS_RE, "associativity"), (&*CACHE_LATENCY_RE, "latency")] {
            let value = re
                .captures(segment)
                .and_then(|caps| parse_number(&caps[1], Number::Integer));
            if let Some(value) = value {
                params.entry(format!("l{level}_{suffix}")).or_insert(value);
            }
        }
    }
}

fn extract_cpu_keywords(text: &str, params: &mut ParamMap) {
    if let Some(caps) = PREFETCH_RE.captures(text) {
        let found = caps[1].to_lowercase();
        let policy = if found.starts_with("no") {
            "none"
        } else if found == "stride" {
            "stride"
        } else {
            "next_line"
        };
        params.insert("prefetcher_type".to_string(), Value::from(policy));
    }
    if let Some(caps) = COHERENCE_RE.captures(text) {
        params.insert(
            "coherence_protocol".to_string(),
            Value::from(caps[1].to_lowercase()),
        );
    }
    if let Some(caps) = TRACE_RE.captures(text) {
        params.insert("trace_file".to_string(), Value::from(&caps[1]));
    }
}

fn extract_fab_keywords(text: &str, params: &mut ParamMap) {
    // Overlay figures are also "<n> nm"; keep them away from the node rule.
    let without_overlay = OVERLAY_RE.replace_all(text, " ");
    if let Some(caps) = NODE_RE.captures(&without_overlay) {
        params.insert(
            "technology_node".to_string(),
            Value::from(format!("{}nm", &caps[1])),
        );
    }
    // EUV wins when both sources are mentioned.
    if EUV_RE.is_match(text) {
        params.insert("lithography_source".to_string(), Value::from("euv"));
    } else if ARF_RE.is_match(text) {
        params.insert("lithography_source".to_string(), Value::from("arf_immersion"));
    }
}
