use std::future::Future;

use crate::catalog::{
    search_products, search_resorts, search_sights, Product, ProductKind, ProductQuery, Resort,
    ResortQuery, SearchResults, Sight, SightQuery,
};
use crate::error::ClientError;
use crate::i18n::Language;
use crate::mcp::ToolCaller;

/// Everything the map page shows, fetched in one go.
#[derive(Debug, Default)]
pub struct Overview {
    pub sights:           SearchResults<Sight>,
    pub resorts:          SearchResults<Resort>,
    pub rail_offers:      SearchResults<Product>,
    pub travel_passes:    SearchResults<Product>,
    pub holiday_packages: SearchResults<Product>,
    /// Product families whose query failed and were replaced by an empty list.
    pub degraded:         Vec<ProductKind>,
}

impl Overview {
    pub fn products(&self, kind: ProductKind) -> &SearchResults<Product> {
        match kind {
            ProductKind::RailOffer      => &self.rail_offers,
            ProductKind::TravelPass     => &self.travel_passes,
            ProductKind::HolidayPackage => &self.holiday_packages,
        }
    }
}

/// Runs all five queries concurrently and waits for every one of them.
///
/// Sights and resorts are required: their errors are returned. A failing
/// product family is logged and shows up empty in the result.
pub async fn load_overview(caller: &dyn ToolCaller, lang: Language) -> Result<Overview, ClientError> {
    let sight_q   = SightQuery { lang: Some(lang), ..Default::default() };
    let resort_q  = ResortQuery { lang: Some(lang), ..Default::default() };
    let product_q = ProductQuery { lang: Some(lang), ..Default::default() };

    let (sights, resorts, rail, passes, holidays) = futures::join!(
        search_sights(caller, &sight_q),
        search_resorts(caller, &resort_q),
        or_empty(ProductKind::RailOffer, search_products(caller, ProductKind::RailOffer, &product_q)),
        or_empty(ProductKind::TravelPass, search_products(caller, ProductKind::TravelPass, &product_q)),
        or_empty(ProductKind::HolidayPackage, search_products(caller, ProductKind::HolidayPackage, &product_q)),
    );

    let degraded = [&rail, &passes, &holidays]
        .iter()
        .filter_map(|(_, failed)| *failed)
        .collect();

    Ok(Overview {
        sights:           sights?,
        resorts:          resorts?,
        rail_offers:      rail.0,
        travel_passes:    passes.0,
        holiday_packages: holidays.0,
        degraded,
    })
}

async fn or_empty<F>(kind: ProductKind, fut: F) -> (SearchResults<Product>, Option<ProductKind>)
where
    F: Future<Output = Result<SearchResults<Product>, ClientError>>,
{
    match fut.await {
        Ok(results) => (results, None),
        Err(e) => {
            tracing::warn!(kind = ?kind, error = %e, "product query failed, showing none");
            (SearchResults::default(), Some(kind))
        }
    }
}
