use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude", alias = "lng")]
    pub lon: f64,
}

/// `{ results: [...], results_count }` as returned by every search tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults<T> {
    #[serde(default = "Vec::new")]
    pub results:       Vec<T>,
    #[serde(default)]
    pub results_count: usize,
}

impl<T> Default for SearchResults<T> {
    fn default() -> Self {
        Self { results: Vec::new(), results_count: 0 }
    }
}

impl<T> SearchResults<T> {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Total reported by the service, which may exceed the page returned.
    pub fn total(&self) -> usize {
        self.results_count.max(self.results.len())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sight {
    #[serde(default, alias = "identifier")]
    pub id:          String,
    pub name:        String,
    #[serde(default, alias = "abstract")]
    pub description: Option<String>,
    #[serde(default)]
    pub categories:  Vec<String>,
    #[serde(default)]
    pub city:        Option<String>,
    #[serde(default, alias = "geo")]
    pub location:    Option<GeoPoint>,
    #[serde(default)]
    pub url:         Option<String>,
    #[serde(default)]
    pub image:       Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resort {
    #[serde(default, alias = "identifier")]
    pub id:         String,
    pub name:       String,
    #[serde(default)]
    pub region:     Option<String>,
    #[serde(default, alias = "altitude")]
    pub altitude_m: Option<f64>,
    #[serde(default)]
    pub slopes_km:  Option<f64>,
    #[serde(default)]
    pub lifts:      Option<u32>,
    #[serde(default, alias = "geo")]
    pub location:   Option<GeoPoint>,
    #[serde(default)]
    pub url:        Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, alias = "identifier")]
    pub id:          String,
    pub name:        String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category:    Option<String>,
    #[serde(default, alias = "price")]
    pub price_chf:   Option<f64>,
    #[serde(default, alias = "geo")]
    pub location:    Option<GeoPoint>,
    #[serde(default)]
    pub url:         Option<String>,
    #[serde(default)]
    pub image:       Option<String>,
}

/// The three product families the service exposes, each behind its own tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    RailOffer,
    TravelPass,
    HolidayPackage,
}

impl ProductKind {
    pub const ALL: [ProductKind; 3] = [ProductKind::RailOffer, ProductKind::TravelPass, ProductKind::HolidayPackage];

    pub fn tool_name(self) -> &'static str {
        match self {
            ProductKind::RailOffer      => super::tools::SEARCH_RAIL_OFFERS,
            ProductKind::TravelPass     => super::tools::SEARCH_TRAVEL_PASSES,
            ProductKind::HolidayPackage => super::tools::SEARCH_HOLIDAY_PACKAGES,
        }
    }

    /// Translation key for the section heading.
    pub fn label_key(self) -> &'static str {
        match self {
            ProductKind::RailOffer      => "products.railOffers",
            ProductKind::TravelPass     => "products.travelPasses",
            ProductKind::HolidayPackage => "products.holidayPackages",
        }
    }
}

impl std::str::FromStr for ProductKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "rail" | "rail_offer" | "rail_offers"           => Ok(ProductKind::RailOffer),
            "pass" | "travel_pass" | "travel_passes"        => Ok(ProductKind::TravelPass),
            "holiday" | "holiday_package" | "holiday_packages" => Ok(ProductKind::HolidayPackage),
            other => Err(format!("unknown product kind '{}'", other)),
        }
    }
}
