//! Core data types for delivery routes.
//!
//! Field names on the wire follow the contract the model is asked to emit
//! (`driver`, `route`, `stop`, `nome`, `morada`, `caixas`, `telefone`).
//! English spellings are accepted on input as aliases.

use serde::{Deserialize, Deserializer, Serialize};

/// A single delivery destination within a driver's route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryStop {
    /// Position of the stop within the route (1-based)
    #[serde(rename = "stop", alias = "order")]
    pub order: u32,

    /// Customer name
    #[serde(rename = "nome", alias = "name")]
    pub customer_name: String,

    /// Full delivery address
    #[serde(rename = "morada", alias = "address")]
    pub address: String,

    /// Number of boxes to drop off
    #[serde(rename = "caixas", alias = "boxCount", alias = "box_count")]
    pub box_count: u32,

    /// Customer phone number; empty when the list did not show one
    #[serde(
        rename = "telefone",
        alias = "phone",
        default,
        deserialize_with = "string_or_number"
    )]
    pub phone: String,
}

/// An ordered collection of stops assigned to one labeled driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRoute {
    /// Driver label, e.g. "Motorista 1"
    #[serde(rename = "driver", alias = "driverLabel")]
    pub driver_label: String,

    /// Stops as returned by the model. Not guaranteed to be sorted.
    #[serde(rename = "route", alias = "stops")]
    pub stops: Vec<DeliveryStop>,
}

impl DriverRoute {
    /// Stops sorted by their `order` field, for display.
    pub fn sorted_stops(&self) -> Vec<&DeliveryStop> {
        let mut stops: Vec<&DeliveryStop> = self.stops.iter().collect();
        stops.sort_by_key(|s| s.order);
        stops
    }

    /// Total number of boxes across all stops.
    pub fn total_boxes(&self) -> u64 {
        self.stops.iter().map(|s| u64::from(s.box_count)).sum()
    }
}

/// Which grounding source a citation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationSource {
    Maps,
    Web,
}

/// A grounding chunk returned alongside the model answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pub source: CitationSource,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Citation {
    /// Title to display, falling back to a generic label.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.trim().is_empty() => title,
            _ => "Map link",
        }
    }
}

/// The outcome of one optimization call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Parsed routes. `None` when the model returned no text at all.
    pub routes: Option<Vec<DriverRoute>>,

    /// Grounding citations reported by the service
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,

    /// Model that produced the answer, if reported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl OptimizationResult {
    /// Whether at least one route was produced.
    pub fn has_routes(&self) -> bool {
        self.routes.as_ref().is_some_and(|r| !r.is_empty())
    }

    /// Routes as a slice (empty when none were produced).
    pub fn routes(&self) -> &[DriverRoute] {
        self.routes.as_deref().unwrap_or_default()
    }

    /// Citations that carry a link, in the order received.
    pub fn linked_citations(&self) -> impl Iterator<Item = &Citation> {
        self.citations.iter().filter(|c| c.uri.is_some())
    }
}

/// Accept a phone number written either as a JSON string or a bare number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Phone {
        Text(String),
        Number(serde_json::Number),
        Null(()),
    }

    Ok(match Phone::deserialize(deserializer)? {
        Phone::Text(s) => s,
        Phone::Number(n) => n.to_string(),
        Phone::Null(()) => String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(order: u32, name: &str, boxes: u32) -> DeliveryStop {
        DeliveryStop {
            order,
            customer_name: name.to_string(),
            address: format!("Rua {name}"),
            box_count: boxes,
            phone: String::new(),
        }
    }

    #[test]
    fn test_sorted_stops() {
        let route = DriverRoute {
            driver_label: "Motorista 1".to_string(),
            stops: vec![stop(3, "C", 1), stop(1, "A", 2), stop(2, "B", 4)],
        };
        let names: Vec<&str> = route
            .sorted_stops()
            .iter()
            .map(|s| s.customer_name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        // Original order untouched
        assert_eq!(route.stops[0].order, 3);
    }

    #[test]
    fn test_total_boxes() {
        let route = DriverRoute {
            driver_label: "Motorista 2".to_string(),
            stops: vec![stop(1, "A", 2), stop(2, "B", 5)],
        };
        assert_eq!(route.total_boxes(), 7);
    }

    #[test]
    fn test_stop_accepts_english_aliases() {
        let json = r#"{"stop":1,"name":"Ana","address":"Rua X","boxCount":2,"phone":"911"}"#;
        let parsed: DeliveryStop = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.customer_name, "Ana");
        assert_eq!(parsed.box_count, 2);
        assert_eq!(parsed.phone, "911");
    }

    #[test]
    fn test_stop_phone_number_or_missing() {
        let json = r#"{"stop":1,"nome":"Ana","morada":"Rua X","caixas":2,"telefone":912345678}"#;
        let parsed: DeliveryStop = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.phone, "912345678");

        let json = r#"{"stop":1,"nome":"Ana","morada":"Rua X","caixas":2}"#;
        let parsed: DeliveryStop = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.phone, "");
    }

    #[test]
    fn test_stop_serializes_wire_keys() {
        let json = serde_json::to_string(&stop(1, "Ana", 2)).unwrap();
        assert!(json.contains("\"nome\":\"Ana\""));
        assert!(json.contains("\"caixas\":2"));
        assert!(json.contains("\"stop\":1"));
    }

    #[test]
    fn test_citation_display_title_fallback() {
        let citation = Citation {
            source: CitationSource::Maps,
            uri: Some("https://maps.google.com/?cid=1".to_string()),
            title: None,
        };
        assert_eq!(citation.display_title(), "Map link");
    }

    #[test]
    fn test_has_routes() {
        let mut result = OptimizationResult::default();
        assert!(!result.has_routes());
        result.routes = Some(vec![]);
        assert!(!result.has_routes());
        assert!(result.routes().is_empty());
    }
}
