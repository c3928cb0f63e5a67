//! Wire and state types shared by the session controller and the backend client.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single filter value collected from the options form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Ticked toggle
    Flag(bool),
    /// Any other control value, passed through verbatim
    Text(String),
}

/// Filter set sent with one search, keyed by option name
pub type OptionMap = BTreeMap<String, OptionValue>;

/// Body of `POST /search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Structure widget output ("" when nothing was drawn)
    pub drawn: String,
    /// Text query, already overwritten by `drawn` when that is non-empty
    #[serde(rename = "q")]
    pub query: String,
    pub options: OptionMap,
}

impl SearchRequest {
    /// Assemble a request. A non-empty drawing always wins over typed text.
    pub fn build(drawn: impl Into<String>, typed: impl Into<String>, options: OptionMap) -> Self {
        let drawn = drawn.into();
        let query = if drawn.is_empty() {
            typed.into()
        } else {
            drawn.clone()
        };
        Self {
            drawn,
            query,
            options,
        }
    }
}

/// Similarity distance as the backend sends it: either a number or preformatted text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Distance {
    Number(f64),
    Text(String),
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Number(n) => write!(f, "{}", n),
            Distance::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Successful `POST /search` body. Every field is a backend-rendered fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleculeResult {
    #[serde(rename = "grid_html")]
    pub properties_html: String,
    #[serde(rename = "SMILES")]
    pub smiles: String,
    #[serde(rename = "o_dist")]
    pub origin_distance: Distance,
    pub svg: String,
}

/// The four fixed regions of the result card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultSlot {
    Properties,
    Smiles,
    Distance,
    Graphic,
}

impl ResultSlot {
    pub const ALL: [ResultSlot; 4] = [
        ResultSlot::Properties,
        ResultSlot::Smiles,
        ResultSlot::Distance,
        ResultSlot::Graphic,
    ];
}

/// Search page state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// What is on screen: loading indicator, result panel, error slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Visibility {
    pub loading: bool,
    pub result: bool,
    pub error: bool,
}

impl UiState {
    /// The only mapping from state to visibility. At most one region is shown.
    pub fn visibility(self) -> Visibility {
        match self {
            UiState::Idle => Visibility::default(),
            UiState::Loading => Visibility {
                loading: true,
                ..Visibility::default()
            },
            UiState::Succeeded => Visibility {
                result: true,
                ..Visibility::default()
            },
            UiState::Failed => Visibility {
                error: true,
                ..Visibility::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_drawn_overrides_typed_query() {
        let req = SearchRequest::build("CCO", "", OptionMap::new());
        assert_eq!(req.query, "CCO");
        assert_eq!(req.drawn, "CCO");
    }

    #[test]
    fn test_typed_query_kept_when_nothing_drawn() {
        let req = SearchRequest::build("", "c1ccccc1", OptionMap::new());
        assert_eq!(req.query, "c1ccccc1");
        assert_eq!(req.drawn, "");
    }

    #[test]
    fn test_request_wire_shape() {
        let mut options = OptionMap::new();
        options.insert("LogP".to_string(), OptionValue::Flag(true));
        options.insert("db".to_string(), OptionValue::Text("ChEMBL".to_string()));
        let req = SearchRequest::build("", "CCN", options);

        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "drawn": "",
                "q": "CCN",
                "options": { "LogP": true, "db": "ChEMBL" }
            })
        );
    }

    #[test]
    fn test_result_accepts_numeric_and_text_distance() {
        let numeric: MoleculeResult = serde_json::from_value(json!({
            "grid_html": "<div>grid</div>",
            "SMILES": "CCO",
            "o_dist": 0.25,
            "svg": "<svg/>"
        }))
        .unwrap();
        assert_eq!(numeric.origin_distance, Distance::Number(0.25));
        assert_eq!(numeric.origin_distance.to_string(), "0.25");

        let text: MoleculeResult = serde_json::from_value(json!({
            "grid_html": "",
            "SMILES": "C",
            "o_dist": "1.50",
            "svg": ""
        }))
        .unwrap();
        assert_eq!(text.origin_distance.to_string(), "1.50");
    }

    #[test]
    fn test_visibility_never_overlaps() {
        for state in [
            UiState::Idle,
            UiState::Loading,
            UiState::Succeeded,
            UiState::Failed,
        ] {
            let v = state.visibility();
            let shown = [v.loading, v.result, v.error].iter().filter(|b| **b).count();
            assert!(shown <= 1, "{:?} shows {} regions", state, shown);
            assert_eq!(v.loading, state == UiState::Loading);
        }
    }
}
