//! Typed queries against the remote tourism service.
//!
//! Every function here is a thin wrapper: serialize the query, call one tool
//! through a [`ToolCaller`], deserialize the payload.

mod models;
mod overview;

pub use models::{GeoPoint, Product, ProductKind, Resort, SearchResults, Sight};
pub use overview::{load_overview, Overview};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::i18n::Language;
use crate::mcp::{call_tool_as, ToolCaller};

pub mod tools {
    pub const SEARCH_SIGHTS:           &str = "search_sights";
    pub const LIST_SIGHT_CATEGORIES:   &str = "list_sight_categories";
    pub const SEARCH_RESORTS:          &str = "search_resorts";
    pub const SEARCH_RAIL_OFFERS:      &str = "search_rail_offers";
    pub const SEARCH_TRAVEL_PASSES:    &str = "search_travel_passes";
    pub const SEARCH_HOLIDAY_PACKAGES: &str = "search_holiday_packages";
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SightQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query:    Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city:     Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang:     Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit:    Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset:   Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ResortQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query:        Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region:       Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_altitude: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang:         Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit:        Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query:     Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category:  Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang:      Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit:     Option<u32>,
}

async fn invoke<P, T>(caller: &dyn ToolCaller, tool: &str, params: &P) -> Result<T, ClientError>
where
    P: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let arguments = serde_json::to_value(params)?;
    call_tool_as(caller, tool, arguments).await
}

pub async fn search_sights(caller: &dyn ToolCaller, query: &SightQuery) -> Result<SearchResults<Sight>, ClientError> {
    invoke(caller, tools::SEARCH_SIGHTS, query).await
}

pub async fn search_resorts(caller: &dyn ToolCaller, query: &ResortQuery) -> Result<SearchResults<Resort>, ClientError> {
    invoke(caller, tools::SEARCH_RESORTS, query).await
}

pub async fn search_products(
    caller: &dyn ToolCaller,
    kind:   ProductKind,
    query:  &ProductQuery,
) -> Result<SearchResults<Product>, ClientError> {
    invoke(caller, kind.tool_name(), query).await
}

/// Category names for the sight filter. Accepts either a bare list or
/// `{ "categories": [...] }`.
pub async fn list_sight_categories(caller: &dyn ToolCaller, lang: Language) -> Result<Vec<String>, ClientError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Categories {
        Bare(Vec<String>),
        Wrapped { categories: Vec<String> },
    }

    let params = serde_json::json!({ "lang": lang });
    let payload: Value = invoke(caller, tools::LIST_SIGHT_CATEGORIES, &params).await?;
    match serde_json::from_value::<Categories>(payload)? {
        Categories::Bare(list) | Categories::Wrapped { categories: list } => Ok(list),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::MockToolCaller;
    use serde_json::json;

    #[tokio::test]
    async fn sight_query_omits_unset_fields() {
        let mock = MockToolCaller::new()
            .respond(tools::SEARCH_SIGHTS, json!({ "results": [], "results_count": 0 }));

        let q = SightQuery { query: Some("castle".into()), lang: Some(Language::Fr), ..Default::default() };
        search_sights(&mock, &q).await.unwrap();

        assert_eq!(mock.arguments_for(tools::SEARCH_SIGHTS, 0), Some(json!({ "query": "castle", "lang": "fr" })));
    }

    #[tokio::test]
    async fn products_use_per_kind_tool() {
        let mock = MockToolCaller::new().respond(
            tools::SEARCH_TRAVEL_PASSES,
            json!({ "results": [{ "name": "Swiss Travel Pass", "price": 244.0 }], "results_count": 1 }),
        );

        let res = search_products(&mock, ProductKind::TravelPass, &ProductQuery::default()).await.unwrap();
        assert_eq!(res.results[0].price_chf, Some(244.0));
        assert_eq!(mock.arguments_for(tools::SEARCH_TRAVEL_PASSES, 0), Some(json!({})));
    }

    #[tokio::test]
    async fn categories_accept_both_shapes() {
        let mock = MockToolCaller::new()
            .respond(tools::LIST_SIGHT_CATEGORIES, json!(["museum", "nature"]))
            .respond(tools::LIST_SIGHT_CATEGORIES, json!({ "categories": ["lake"] }));

        assert_eq!(list_sight_categories(&mock, Language::De).await.unwrap(), vec!["museum", "nature"]);
        assert_eq!(list_sight_categories(&mock, Language::De).await.unwrap(), vec!["lake"]);
    }

    #[tokio::test]
    async fn plain_text_payload_is_a_decode_error() {
        let mock = MockToolCaller::new().respond(tools::SEARCH_RESORTS, json!("service busy"));
        let err = search_resorts(&mock, &ResortQuery::default()).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
    }

    #[tokio::test]
    async fn remote_error_propagates() {
        let mock = MockToolCaller::new().fail(tools::SEARCH_SIGHTS, "index offline");
        let err = search_sights(&mock, &SightQuery::default()).await.unwrap_err();
        assert!(err.is_remote());
    }
}
