// Source: https://docs.coingecko.com/reference/coins-markets
// Every field is optional on the wire so one incomplete entry can be dropped
// without failing the whole response.
#[derive(Debug, Default, serde::Deserialize)]
pub struct CoinMarket {
    pub id: Option<String>,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub image: Option<String>,
    pub current_price: Option<f64>,
    pub total_volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    // the endpoint returns many more fields; we ignore them
}

// Fixed query for /coins/markets: top 10 by market cap, USD, one page
pub const VS_CURRENCY: &str = "usd";
pub const ORDER: &str = "market_cap_desc";
pub const PER_PAGE: u32 = 10;
pub const PAGE: u32 = 1;

pub fn markets_query() -> [(&'static str, String); 5] {
    [
        ("vs_currency", VS_CURRENCY.to_string()),
        ("order", ORDER.to_string()),
        ("per_page", PER_PAGE.to_string()),
        ("page", PAGE.to_string()),
        ("sparkline", "false".to_string()),
    ]
}
