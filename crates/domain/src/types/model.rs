//! Extracted MI models
//!
//! A model comes in one of two shapes that carry no discriminant field.
//! [`Model`] resolves the shape when it is deserialized: each variant is
//! parsed and validated in turn and the first one that fits wins.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::validation::{bounding_box, iso_date, non_empty, Validate, ValidationError};

/// String or numeric cell content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Text(String),
    Number(f64),
}

/// Cell value together with where it was found in the source document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailedValue {
    pub value: ScalarValue,
    /// Empty, or `page;x;y;w;h`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemValue {
    Text(String),
    Number(f64),
    Detailed(DetailedValue),
}

impl ItemValue {
    /// The bare scalar, dropping any location detail
    pub fn scalar(&self) -> ScalarValue {
        match self {
            Self::Text(text) => ScalarValue::Text(text.clone()),
            Self::Number(n) => ScalarValue::Number(*n),
            Self::Detailed(detail) => detail.value.clone(),
        }
    }
}

/// One line of an extracted statement, keyed by period or column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Item {
    pub tag: String,
    pub term: String,
    /// Term as it appeared in the source document
    pub ogterm: String,
    pub values: BTreeMap<String, ItemValue>,
}

impl Validate for Item {
    fn validate(&self) -> Result<(), ValidationError> {
        for (key, value) in &self.values {
            if let ItemValue::Detailed(DetailedValue { bbox: Some(bbox), .. }) = value {
                bounding_box("bbox", bbox)
                    .map_err(|e| e.within(format!("values.{key}")))?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelFinancials {
    pub company: String,
    pub date_reporting: String,
    pub covering: String,
    pub items: Vec<Item>,
}

impl Validate for ModelFinancials {
    fn validate(&self) -> Result<(), ValidationError> {
        non_empty("company", &self.company)?;
        iso_date("dateReporting", &self.date_reporting)?;
        self.items.validate().map_err(|e| e.within("items"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceTable {
    pub title: String,
    pub columns_order: Vec<String>,
    pub items: Vec<Item>,
}

impl Validate for PerformanceTable {
    fn validate(&self) -> Result<(), ValidationError> {
        self.items.validate().map_err(|e| e.within("items"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelFundPerformance {
    pub date: String,
    pub tables: Vec<PerformanceTable>,
}

impl Validate for ModelFundPerformance {
    fn validate(&self) -> Result<(), ValidationError> {
        iso_date("date", &self.date)?;
        self.tables.validate().map_err(|e| e.within("tables"))
    }
}

/// An extracted model of either shape
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Model {
    Financials(ModelFinancials),
    FundPerformance(ModelFundPerformance),
}

impl Model {
    /// Resolve the model shape from an already parsed JSON document
    ///
    /// # Errors
    /// Returns a `ValidationError` listing why each shape was rejected.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        let financials = parse_shape::<ModelFinancials>(value.clone());
        let financials_err = match financials {
            Ok(model) => return Ok(Self::Financials(model)),
            Err(e) => e,
        };
        match parse_shape::<ModelFundPerformance>(value) {
            Ok(model) => Ok(Self::FundPerformance(model)),
            Err(fund_err) => Err(ValidationError::new(
                "model",
                format!("matches no model shape (financials: {financials_err}; fund performance: {fund_err})"),
            )),
        }
    }

    pub fn as_financials(&self) -> Option<&ModelFinancials> {
        match self {
            Self::Financials(model) => Some(model),
            Self::FundPerformance(_) => None,
        }
    }

    pub fn as_fund_performance(&self) -> Option<&ModelFundPerformance> {
        match self {
            Self::FundPerformance(model) => Some(model),
            Self::Financials(_) => None,
        }
    }
}

fn parse_shape<T>(value: serde_json::Value) -> Result<T, String>
where
    T: for<'de> Deserialize<'de> + Validate,
{
    let parsed: T = serde_json::from_value(value).map_err(|e| e.to_string())?;
    parsed.validate().map_err(|e| e.to_string())?;
    Ok(parsed)
}

impl<'de> Deserialize<'de> for Model {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl Validate for Model {
    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::Financials(model) => model.validate(),
            Self::FundPerformance(model) => model.validate(),
        }
    }
}

/// Response of the fund-portfolio consolidation endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsolidatedModelResponse {
    pub model: ModelFundPerformance,
}

impl Validate for ConsolidatedModelResponse {
    fn validate(&self) -> Result<(), ValidationError> {
        self.model.validate().map_err(|e| e.within("model"))
    }
}
