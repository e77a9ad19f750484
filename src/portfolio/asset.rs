//! Asset records supplied by the data provider.

use serde::{Deserialize, Serialize};

/// One asset in the universe.
///
/// Only `name`, `volatility` and `target_weight` feed the optimization; the
/// remaining fields are carried through for reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    /// Identifier, unique within a run.
    pub name: String,
    #[serde(default)]
    pub price: f64,
    /// Annualized volatility.
    pub volatility: f64,
    /// Historical annualized return.
    #[serde(default, alias = "return")]
    pub expected_return: f64,
    /// Target ("alpha") weight in [0, 1].
    #[serde(alias = "alphaWeight")]
    pub target_weight: f64,
    /// Weight currently held, if known.
    #[serde(default, alias = "weight", skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
}

impl AssetRecord {
    pub fn new(name: impl Into<String>, volatility: f64, target_weight: f64) -> Self {
        AssetRecord {
            id: None,
            name: name.into(),
            price: 0.0,
            volatility,
            expected_return: 0.0,
            target_weight,
            current_weight: None,
        }
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    pub fn with_expected_return(mut self, expected_return: f64) -> Self {
        self.expected_return = expected_return;
        self
    }

    pub fn with_current_weight(mut self, weight: f64) -> Self {
        self.current_weight = Some(weight);
        self
    }
}

/// Four large-cap equities with equal current holdings.
pub fn sample_universe() -> Vec<AssetRecord> {
    let rows = [
        ("AAPL", 150.25, 0.200, 0.12, 0.35),
        ("GOOGL", 2750.80, 0.245, 0.15, 0.25),
        ("MSFT", 305.50, 0.224, 0.10, 0.20),
        ("AMZN", 3380.20, 0.265, 0.18, 0.20),
    ];

    rows.iter()
        .enumerate()
        .map(|(i, &(name, price, vol, ret, target))| AssetRecord {
            id: Some(i as u32 + 1),
            ..AssetRecord::new(name, vol, target)
                .with_price(price)
                .with_expected_return(ret)
                .with_current_weight(0.25)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_universe() {
        let assets = sample_universe();
        assert_eq!(assets.len(), 4);
        assert_eq!(assets[0].name, "AAPL");
        assert_eq!(assets[3].id, Some(4));
        let total: f64 = assets.iter().map(|a| a.target_weight).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_deserialize_with_aliases() {
        let json = r#"{
            "id": 1, "name": "AAPL", "price": 150.25, "volatility": 0.2,
            "return": 0.12, "alphaWeight": 0.35, "weight": 0.25
        }"#;
        let asset: AssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(asset.expected_return, 0.12);
        assert_eq!(asset.target_weight, 0.35);
        assert_eq!(asset.current_weight, Some(0.25));
    }

    #[test]
    fn test_deserialize_minimal() {
        let json = r#"{"name": "X", "volatility": 0.1, "targetWeight": 1.0}"#;
        let asset: AssetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(asset, AssetRecord::new("X", 0.1, 1.0));
    }
}
