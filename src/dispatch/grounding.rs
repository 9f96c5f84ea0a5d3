//! 引用来源提取
//!
//! 在交换结束后运行一次：对最终回合携带的来源 URL 去重（保持首见顺序），
//! 且仅当本次交换没有任何领域工具参与（归因仍是协调员）时，把归因提升为 Google Search。

use std::collections::HashSet;

use crate::tools::AgentKind;

/// 去重来源 URL，保持首见顺序
pub fn dedupe_grounding(urls: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.iter()
        .filter(|u| seen.insert(u.as_str()))
        .cloned()
        .collect()
}

/// 归因裁决：有来源且未用过领域工具 -> WebSearch；否则保持不变
pub fn resolve_attribution(agent: AgentKind, has_grounding: bool) -> AgentKind {
    if has_grounding && agent == AgentKind::Coordinator {
        AgentKind::WebSearch
    } else {
        agent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_preserves_first_seen_order() {
        let urls = vec![
            "https://a.example".to_string(),
            "https://b.example".to_string(),
            "https://a.example".to_string(),
            "https://c.example".to_string(),
            "https://b.example".to_string(),
        ];
        assert_eq!(
            dedupe_grounding(&urls),
            vec!["https://a.example", "https://b.example", "https://c.example"]
        );
    }

    #[test]
    fn test_attribution_promoted_only_for_coordinator() {
        assert_eq!(
            resolve_attribution(AgentKind::Coordinator, true),
            AgentKind::WebSearch
        );
        assert_eq!(
            resolve_attribution(AgentKind::Coordinator, false),
            AgentKind::Coordinator
        );
        // 已有领域归因时来源不改写归因
        assert_eq!(
            resolve_attribution(AgentKind::Billing, true),
            AgentKind::Billing
        );
    }
}
