// End-to-end: CoinGecko adapter against a local mock server, driven through App

use std::sync::{Arc, Mutex};

use coinboard::app::App;
use coinboard::config::ApiSettings;
use coinboard::engine::types::{Action, LoadStatus, SortDirection, SortField};
use coinboard::market_data::adapters::coingecko::CoinGeckoAdapter;
use coinboard::market_data::adapters::FetchError;
use coinboard::telemetry::FailureObserver;
use mockito::Matcher;

#[derive(Default)]
struct CountingObserver {
    kinds: Mutex<Vec<&'static str>>,
}

impl FailureObserver for CountingObserver {
    fn fetch_failed(&self, err: &FetchError) {
        self.kinds.lock().unwrap().push(err.kind());
    }
}

fn coin(id: &str, name: &str, cap: u64, change: Option<f64>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "symbol": &id[..3],
        "name": name,
        "image": format!("https://img.example/{id}.png"),
        "current_price": 10.5,
        "market_cap": cap,
        "total_volume": 1000,
        "price_change_percentage_24h": change,
    })
}

fn keys(app: &App) -> Vec<String> {
    app.dashboard().table.rows.into_iter().map(|r| r.key).collect()
}

async fn mount_against(server: &mockito::ServerGuard, observer: Arc<CountingObserver>) -> App {
    let settings = ApiSettings { base_url: server.url(), api_key: None };
    let source = Arc::new(CoinGeckoAdapter::new(&settings).unwrap());
    App::mount(source, observer)
}

#[tokio::test]
async fn test_fetch_filter_sort_flow() {
    let mut server = mockito::Server::new_async().await;
    let body = serde_json::Value::Array(vec![
        coin("bitcoin", "Bitcoin", 1_300_000, Some(1.5)),
        coin("ethereum", "Ethereum", 400_000, Some(-2.0)),
        coin("tether", "Tether", 110_000, None),
        coin("bitcoin-cash", "Bitcoin Cash", 9_000, Some(6.0)),
    ]);
    let mock = server
        .mock("GET", "/coins/markets")
        .match_query(Matcher::UrlEncoded("per_page".into(), "10".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await;

    let observer = Arc::new(CountingObserver::default());
    let mut app = mount_against(&server, observer.clone()).await;
    assert!(app.settle().await);
    mock.assert_async().await;
    assert_eq!(app.state().status, LoadStatus::Ready);

    // sort while filtered, then clear the filter
    app.dispatch(Action::SearchChanged("BIT".into()));
    assert_eq!(keys(&app), vec!["bitcoin", "bitcoin-cash"]);

    app.dispatch(Action::Sort(SortField::MarketCap));
    assert_eq!(keys(&app), vec!["bitcoin", "bitcoin-cash"]);
    app.dispatch(Action::Sort(SortField::MarketCap));
    assert_eq!(keys(&app), vec!["bitcoin-cash", "bitcoin"]);
    assert_eq!(app.state().market_cap_sort, Some(SortDirection::Ascending));

    app.dispatch(Action::SearchChanged(String::new()));
    assert_eq!(keys(&app), vec!["bitcoin-cash", "tether", "ethereum", "bitcoin"]);

    app.dispatch(Action::Sort(SortField::Change));
    assert_eq!(keys(&app), vec!["bitcoin-cash", "bitcoin", "ethereum", "tether"]);
    assert_eq!(app.state().market_cap_sort, Some(SortDirection::Ascending));

    let dashboard = app.dashboard();
    assert_eq!(dashboard.table.rows[3].change_24h, "n/a");
    assert_eq!(dashboard.table.rows[1].market_cap, "$1,300,000");
    assert!(observer.kinds.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_server_error_shows_empty_table() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/coins/markets")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let observer = Arc::new(CountingObserver::default());
    let mut app = mount_against(&server, observer.clone()).await;
    app.settle().await;

    assert!(app.dashboard().table.rows.is_empty());
    match &app.state().status {
        LoadStatus::Failed { reason } => assert!(reason.contains("503"), "{reason}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(*observer.kinds.lock().unwrap(), vec!["status"]);
}
