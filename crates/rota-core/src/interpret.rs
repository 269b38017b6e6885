//! Response interpreter: raw model text → validated routes.
//!
//! The model is asked for a bare JSON array but often wraps it in a fenced
//! code block. The interpreter strips those fences, parses the array into
//! typed routes, and checks the values serde cannot (stop numbering, blank
//! labels). Any failure becomes [`OptimizeError::ResponseFormat`] with the raw
//! text attached; there is no partial recovery.

use std::collections::HashSet;

use crate::error::{OptimizeError, OptimizeResult};
use crate::types::{Citation, DriverRoute, OptimizationResult};

/// Opening fence markers the model emits around JSON. Longest first.
const OPENING_FENCES: &[&str] = &["```json", "```JSON", "```"];

/// Closing fence marker.
const CLOSING_FENCE: &str = "```";

/// Strip a leading and trailing fenced code-block marker and surrounding
/// whitespace.
///
/// Only the edges of the text are touched, so backticks inside string values
/// survive. Stripping repeats until nothing changes, which makes the
/// function idempotent.
pub fn normalize(text: &str) -> String {
    let mut current = text.trim();
    loop {
        let mut next = current;
        if let Some(rest) = OPENING_FENCES.iter().find_map(|f| next.strip_prefix(*f)) {
            next = rest;
        }
        if let Some(rest) = next.strip_suffix(CLOSING_FENCE) {
            next = rest;
        }
        let next = next.trim();
        if next.len() == current.len() {
            break;
        }
        current = next;
    }
    current.to_string()
}

/// Interpret the model's answer.
///
/// `text` of `None`, empty, or whitespace only yields a result with
/// `routes: None`: the model produced nothing, which is not a parse failure.
pub fn interpret(
    text: Option<&str>,
    citations: Vec<Citation>,
    model: Option<String>,
) -> OptimizeResult<OptimizationResult> {
    let raw = match text {
        Some(t) if !t.trim().is_empty() => t,
        _ => {
            tracing::warn!("Model returned an empty response");
            return Ok(OptimizationResult {
                routes: None,
                citations,
                model,
            });
        }
    };

    let routes = parse_routes(raw)?;

    Ok(OptimizationResult {
        routes: Some(routes),
        citations,
        model,
    })
}

/// Normalize, parse and validate a route array.
pub fn parse_routes(raw: &str) -> OptimizeResult<Vec<DriverRoute>> {
    let cleaned = normalize(raw);

    let routes: Vec<DriverRoute> = serde_json::from_str(&cleaned).map_err(|e| {
        tracing::error!("Failed to parse routes from model response: {e}");
        tracing::error!("Original response text: {raw}");
        OptimizeError::ResponseFormat {
            reason: e.to_string(),
            raw: raw.to_string(),
        }
    })?;

    if let Err(reason) = validate_routes(&routes) {
        tracing::error!("Model response failed validation: {reason}");
        tracing::error!("Original response text: {raw}");
        return Err(OptimizeError::ResponseFormat {
            reason,
            raw: raw.to_string(),
        });
    }

    warn_duplicate_labels(&routes);
    tracing::debug!("Parsed {} route(s)", routes.len());
    Ok(routes)
}

/// Check the constraints typed deserialization does not cover.
fn validate_routes(routes: &[DriverRoute]) -> Result<(), String> {
    for (i, route) in routes.iter().enumerate() {
        if route.driver_label.trim().is_empty() {
            return Err(format!("route {} has a blank driver label", i + 1));
        }
        for stop in &route.stops {
            if stop.order < 1 {
                return Err(format!(
                    "{}: stop numbers start at 1, got {}",
                    route.driver_label, stop.order
                ));
            }
        }
    }
    Ok(())
}

// Duplicate labels are passed through unchanged.
fn warn_duplicate_labels(routes: &[DriverRoute]) {
    let mut seen = HashSet::new();
    for route in routes {
        if !seen.insert(route.driver_label.as_str()) {
            tracing::warn!("Duplicate driver label in response: {}", route.driver_label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CitationSource, DeliveryStop};

    const SCENARIO: &str = "```json\n[{\"driver\":\"Motorista 1\",\"route\":[{\"stop\":1,\"nome\":\"Ana\",\"morada\":\"Rua X\",\"caixas\":2,\"telefone\":\"911\"}]}]\n```";

    fn format_error(result: OptimizeResult<OptimizationResult>) -> (String, String) {
        match result {
            Err(OptimizeError::ResponseFormat { reason, raw }) => (reason, raw),
            other => panic!("expected ResponseFormat, got {other:?}"),
        }
    }

    #[test]
    fn test_scenario_fenced_single_route() {
        let result = interpret(Some(SCENARIO), vec![], None).unwrap();
        let routes = result.routes.unwrap();
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].driver_label, "Motorista 1");
        assert_eq!(routes[0].stops.len(), 1);
        let stop = &routes[0].stops[0];
        assert_eq!(stop.order, 1);
        assert_eq!(stop.customer_name, "Ana");
        assert_eq!(stop.box_count, 2);
        assert_eq!(stop.address, "Rua X");
        assert_eq!(stop.phone, "911");
    }

    #[test]
    fn test_normalize_strips_fences_and_whitespace() {
        assert_eq!(normalize("  ```json\n[]\n```  "), "[]");
        assert_eq!(normalize("```\n[1]\n```"), "[1]");
        assert_eq!(normalize("[1]"), "[1]");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        let samples = [
            "",
            "   ",
            SCENARIO,
            "``` ```json ```",
            "`````` json",
            "```` `",
            "`````json`",
            "``````json```",
            "[1] ``",
            "\n\t```JSON\n{}\n```\n",
            "no fences at all",
            "`a`b``c```d````e",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn test_normalize_only_touches_edges() {
        assert_eq!(
            normalize("```json\n[\"a```b\"]\n```"),
            "[\"a```b\"]"
        );
        assert_eq!(normalize("``` ```json [1] ``` ```"), "[1]");
        assert_eq!(normalize("a``b"), "a``b");
        assert_eq!(normalize("[1] ```json [2]"), "[1] ```json [2]");
    }

    #[test]
    fn test_empty_text_is_not_an_error() {
        let citations = vec![Citation {
            source: CitationSource::Maps,
            uri: Some("https://maps.google.com/?cid=7".to_string()),
            title: Some("Queluz".to_string()),
        }];
        for text in [None, Some(""), Some("   \n\t")] {
            let result = interpret(text, citations.clone(), None).unwrap();
            assert!(result.routes.is_none());
            assert_eq!(result.citations, citations);
        }
    }

    #[test]
    fn test_not_json_keeps_raw() {
        let (_, raw) = format_error(interpret(Some("not json"), vec![], None));
        assert_eq!(raw, "not json");
    }

    #[test]
    fn test_truncated_array_keeps_raw() {
        let text = r#"[{"driver":"X""#;
        let (_, raw) = format_error(interpret(Some(text), vec![], None));
        assert_eq!(raw, text);
    }

    #[test]
    fn test_raw_is_unmodified_for_fenced_input() {
        let text = "```json\n[{\"driver\":\"X\"}]\n```";
        let (reason, raw) = format_error(interpret(Some(text), vec![], None));
        assert_eq!(raw, text);
        assert!(reason.contains("route"));
    }

    #[test]
    fn test_rejects_stop_zero() {
        let text = r#"[{"driver":"D","route":[{"stop":0,"nome":"A","morada":"M","caixas":1,"telefone":""}]}]"#;
        let (reason, _) = format_error(interpret(Some(text), vec![], None));
        assert!(reason.contains("start at 1"));
    }

    #[test]
    fn test_rejects_negative_boxes() {
        let text = r#"[{"driver":"D","route":[{"stop":1,"nome":"A","morada":"M","caixas":-2}]}]"#;
        format_error(interpret(Some(text), vec![], None));
    }

    #[test]
    fn test_rejects_missing_address() {
        let text = r#"[{"driver":"D","route":[{"stop":1,"nome":"A","caixas":1}]}]"#;
        let (reason, _) = format_error(interpret(Some(text), vec![], None));
        assert!(reason.contains("morada"));
    }

    #[test]
    fn test_rejects_blank_driver() {
        let text = r#"[{"driver":"  ","route":[]}]"#;
        let (reason, _) = format_error(interpret(Some(text), vec![], None));
        assert!(reason.contains("blank driver label"));
    }

    #[test]
    fn test_rejects_object_instead_of_array() {
        let text = r#"{"driver":"D","route":[]}"#;
        format_error(interpret(Some(text), vec![], None));
    }

    #[test]
    fn test_extra_fields_ignored() {
        let text = r#"[{"driver":"D","eta":"10:00","route":[{"stop":1,"nome":"A","morada":"M","caixas":1,"telefone":"1","notes":"gate"}]}]"#;
        let routes = parse_routes(text).unwrap();
        assert_eq!(routes[0].stops[0].customer_name, "A");
    }

    #[test]
    fn test_empty_array_is_some_empty() {
        let result = interpret(Some("[]"), vec![], Some("gemini-2.5-flash".to_string())).unwrap();
        assert_eq!(result.routes, Some(vec![]));
        assert!(!result.has_routes());
        assert_eq!(result.model.as_deref(), Some("gemini-2.5-flash"));
    }

    #[test]
    fn test_duplicate_labels_pass_through() {
        let text = r#"[{"driver":"D","route":[]},{"driver":"D","route":[]}]"#;
        let routes = parse_routes(text).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].driver_label, routes[1].driver_label);
    }

    #[test]
    fn test_unsorted_stops_kept_in_arrival_order() {
        let text = r#"[{"driver":"D","route":[
            {"stop":2,"nome":"B","morada":"M2","caixas":1,"telefone":"2"},
            {"stop":1,"nome":"A","morada":"M1","caixas":1,"telefone":"1"}]}]"#;
        let routes = parse_routes(text).unwrap();
        assert_eq!(routes[0].stops[0].order, 2);
        assert_eq!(routes[0].sorted_stops()[0].order, 1);
    }

    #[test]
    fn test_serialize_then_parse_preserves_routes() {
        let routes = vec![
            DriverRoute {
                driver_label: "Motorista 1".to_string(),
                stops: vec![
                    DeliveryStop {
                        order: 1,
                        customer_name: "Ana Costa".to_string(),
                        address: "Rua Francisco Franco, 42 Queluz".to_string(),
                        box_count: 3,
                        phone: "9632589558".to_string(),
                    },
                    DeliveryStop {
                        order: 2,
                        customer_name: "Rui \"Zé\" Lopes".to_string(),
                        address: "Praça da República 1".to_string(),
                        box_count: 0,
                        phone: String::new(),
                    },
                ],
            },
            DriverRoute {
                driver_label: "Motorista 2".to_string(),
                stops: vec![],
            },
        ];
        let serialized = serde_json::to_string(&routes).unwrap();
        assert_eq!(parse_routes(&serialized).unwrap(), routes);

        let pretty = serde_json::to_string_pretty(&routes).unwrap();
        assert_eq!(parse_routes(&format!("```json\n{pretty}\n```")).unwrap(), routes);
    }

    #[test]
    fn test_backticks_in_values_survive_parsing() {
        let routes = vec![DriverRoute {
            driver_label: "D```1".to_string(),
            stops: vec![DeliveryStop {
                order: 1,
                customer_name: "```json".to_string(),
                address: "Rua ``` 3".to_string(),
                box_count: 1,
                phone: "```".to_string(),
            }],
        }];
        let serialized = serde_json::to_string(&routes).unwrap();
        assert_eq!(parse_routes(&serialized).unwrap(), routes);
        assert_eq!(
            parse_routes(&format!("```json\n{serialized}\n```")).unwrap(),
            routes
        );
    }
}
