use evv_harvest::config::Config;
use evv_harvest::crawler::{Coordinator, PageSelection};
use evv_harvest::output::{CsvOutput, ListingRecord, OutputHandler, PhoneLookup};
use evv_harvest::CrawlPhase;
use std::time::{Duration, Instant};
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const INDEX_PATH: &str = "/dasinmaz-emlak-elanlari";
const PHONE_PATH: &str = "/evvaz/get_phone";

/// Creates a test configuration pointing at the mock server
fn create_test_config(origin: &str) -> Config {
    let mut config = Config::default();
    config.site.origin = origin.to_string();
    config.crawler.phone_delay_ms = 0;
    config.crawler.request_timeout_secs = 5;
    config
}

/// Index page whose listings container links to the given paths
fn index_page(links: &[&str]) -> String {
    let cards: String = links
        .iter()
        .map(|href| {
            format!(
                r#"<div class="col"><a class="img_link" href="{}"><img src="/t.jpg"></a></div>"#,
                href
            )
        })
        .collect();
    format!(
        r#"<html><body><div class="row g-lg-4 g-md-3 g-sm-3 g-3">{}</div></body></html>"#,
        cards
    )
}

/// Listing page with every extracted element present
fn listing_page(id: &str, title: &str, floor: &str) -> String {
    format!(
        r#"<html><body>
        <h1>{title}</h1>
        <span class="estate_id">{id}</span>
        <div class="price_val">120 000 ₼</div>
        <div class="card-body">Bakı ş., Yasamal r.</div>
        <h5 class="card-title">Elvin</h5>
        <p class="text-muted">Mülkiyyətçi</p>
        <div class="options"><span class="float-start">Mülkün növü</span><span class="float-end">Köhnə tikili</span></div>
        <div class="options"><span class="float-start">Şəhər</span><span class="float-end">Bakı</span></div>
        <div class="options"><span class="float-start">Sənədi</span><span class="float-end">Kupça</span></div>
        <div class="options"><span class="float-start">Mərtəbə</span><span class="float-end">{floor}</span></div>
        <div class="options"><span class="float-start">Sahəsi</span><span class="float-end">70 m²</span></div>
        <div class="options"><span class="float-start">Otaq sayı</span><span class="float-end">2</span></div>
        <div class="options"><span class="float-start">İpoteka</span><span class="float-end">Yoxdur</span></div>
        <div class="options"><span class="float-start">Əşyası</span><span class="float-end">Var</span></div>
        <div class="options"><span class="float-start">Torpaq sahəsi</span><span class="float-end">1 sot</span></div>
        <blockquote>Təcili satılır</blockquote>
        <ul class="prop_tools">
            <li>Baxışların sayı: 310</li>
            <li>Elanın tarixi: 01.10.2025</li>
            <li>Yenilənmə tarixi: <time>03.10.2025</time></li>
        </ul>
        </body></html>"#
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn is_first_index_page(request: &Request) -> bool {
    request.url.path() == INDEX_PATH && request.url.query().is_none()
}

async fn index_requests(server: &MockServer) -> Vec<Option<String>> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == INDEX_PATH)
        .map(|r| r.url.query().map(str::to_string))
        .collect()
}

#[tokio::test]
async fn test_index_fetch_count_and_query_shape() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(html(index_page(&[])))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(PageSelection::Explicit(3))
        .await
        .expect("Crawl failed");

    assert!(report.records.is_empty());
    assert_eq!(report.statistics.pages_requested, 3);
    assert_eq!(coordinator.phase(), CrawlPhase::Done);

    let mut queries = index_requests(&mock_server).await;
    queries.sort();
    assert_eq!(
        queries,
        vec![
            None,
            Some("page=24".to_string()),
            Some("page=48".to_string())
        ]
    );
}

#[tokio::test]
async fn test_auto_detect_reads_pagination_offsets() {
    let mock_server = MockServer::start().await;

    let body = r#"<html><body>
        <div class="row g-lg-4 g-md-3 g-sm-3 g-3"></div>
        <ul class="pagination">
            <li><a href="/dasinmaz-emlak-elanlari?page=24">2</a></li>
            <li><a href="/dasinmaz-emlak-elanlari?page=abc">»</a></li>
            <li><a href="/dasinmaz-emlak-elanlari?page=48">3</a></li>
        </ul>
    </body></html>"#;

    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(html(body.to_string()))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(PageSelection::AutoDetect)
        .await
        .expect("Crawl failed");

    // One probe plus pages at offsets 0, 24, 48
    assert_eq!(report.statistics.pages_requested, 3);
    assert_eq!(index_requests(&mock_server).await.len(), 4);
}

#[tokio::test]
async fn test_auto_detect_falls_back_to_one_page_on_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(PageSelection::AutoDetect)
        .await
        .expect("Crawl failed");

    assert_eq!(report.statistics.pages_requested, 1);
    assert_eq!(report.statistics.empty_pages, 1);
    assert!(report.records.is_empty());
}

#[tokio::test]
async fn test_failed_index_page_contributes_no_urls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(is_first_index_page)
        .respond_with(html(index_page(&["/menzil-101", "/menzil-102"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .and(query_param("page", "24"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    for (p, id) in [("/menzil-101", "101"), ("/menzil-102", "102")] {
        Mock::given(method("GET"))
            .and(path(p))
            .respond_with(html(listing_page(id, "Mənzil", "3 / 9")))
            .mount(&mock_server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path(PHONE_PATH))
        .respond_with(html("<div>gizli</div>".to_string()))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(PageSelection::Explicit(2))
        .await
        .expect("Crawl failed");

    assert_eq!(report.statistics.pages_requested, 2);
    assert_eq!(report.statistics.empty_pages, 1);
    assert_eq!(report.records.len(), 2);
    assert!(report
        .records
        .iter()
        .all(|r| r.phone == PhoneLookup::Unknown));
}

#[tokio::test]
async fn test_failed_listing_is_dropped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(is_first_index_page)
        .respond_with(html(index_page(&["/menzil-201", "/menzil-202"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/menzil-201"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/menzil-202"))
        .respond_with(html(listing_page("202", "Həyət evi", "1")))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(PHONE_PATH))
        .and(body_string_contains("id=202"))
        .respond_with(html(
            r#"<span><img class="phone_icon"> (055) 222-22-22</span>"#.to_string(),
        ))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(PageSelection::Explicit(1))
        .await
        .expect("Crawl failed");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].listing_id, "202");
    assert_eq!(
        report.records[0].phone,
        PhoneLookup::Found("(055) 222-22-22".to_string())
    );
    assert_eq!(report.statistics.listings_dropped, 1);
}

#[tokio::test]
async fn test_duplicate_urls_across_pages_are_kept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(html(index_page(&["/menzil-301"])))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/menzil-301"))
        .respond_with(html(listing_page("301", "Ofis", "2")))
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(PHONE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(PageSelection::Explicit(2))
        .await
        .expect("Crawl failed");

    assert_eq!(report.statistics.urls_collected, 2);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.records[0], report.records[1]);
}

#[tokio::test]
async fn test_listing_without_id_skips_phone_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(is_first_index_page)
        .respond_with(html(index_page(&["/elan-/"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/elan-/"))
        .respond_with(html("<html><body><h1>Adsız</h1></body></html>".to_string()))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(PHONE_PATH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(PageSelection::Explicit(1))
        .await
        .expect("Crawl failed");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].listing_id, "");
    assert_eq!(report.records[0].phone, PhoneLookup::NotAttempted);
    assert_eq!(report.statistics.phones_not_attempted, 1);
}

/// Serves a listing page for every path, the phone endpoint failing
async fn mount_listings(server: &MockServer, paths: &[&str]) {
    for (i, listing_path) in paths.iter().enumerate() {
        Mock::given(method("GET"))
            .and(path(*listing_path))
            .respond_with(html(listing_page(&i.to_string(), listing_path, "1")))
            .mount(server)
            .await;
    }

    Mock::given(method("POST"))
        .and(path(PHONE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(server)
        .await;
}

fn record_urls(server: &MockServer, records: &[ListingRecord]) -> Vec<String> {
    let uri = server.uri();
    records
        .iter()
        .map(|r| r.url.trim_start_matches(uri.as_str()).to_string())
        .collect()
}

#[tokio::test]
async fn test_urls_follow_page_order_not_completion_order() {
    let mock_server = MockServer::start().await;

    // First page answers last
    Mock::given(method("GET"))
        .and(is_first_index_page)
        .respond_with(html(index_page(&["/a-1", "/a-2"])).set_delay(Duration::from_millis(300)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .and(query_param("page", "24"))
        .respond_with(html(index_page(&["/b-3"])))
        .mount(&mock_server)
        .await;

    mount_listings(&mock_server, &["/a-1", "/a-2", "/b-3"]).await;

    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(PageSelection::Explicit(2))
        .await
        .expect("Crawl failed");

    assert_eq!(
        record_urls(&mock_server, &report.records),
        vec!["/a-1", "/a-2", "/b-3"]
    );
}

#[tokio::test]
async fn test_records_follow_link_order_within_a_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(is_first_index_page)
        .respond_with(html(index_page(&["/c-1", "/c-2", "/c-3"])))
        .mount(&mock_server)
        .await;

    // Slow first listing, mounted ahead of the catch-all listing mocks
    Mock::given(method("GET"))
        .and(path("/c-1"))
        .respond_with(
            html(listing_page("1", "Yavaş", "1")).set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    mount_listings(&mock_server, &["/c-2", "/c-3"]).await;

    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(PageSelection::Explicit(1))
        .await
        .expect("Crawl failed");

    assert_eq!(
        record_urls(&mock_server, &report.records),
        vec!["/c-1", "/c-2", "/c-3"]
    );
    assert_eq!(report.records[0].title, "Yavaş");
}

#[tokio::test]
async fn test_concurrency_bound_limits_in_flight_requests() {
    let mock_server = MockServer::start().await;
    let delay = Duration::from_millis(150);

    Mock::given(method("GET"))
        .and(path(INDEX_PATH))
        .respond_with(html(index_page(&[])).set_delay(delay))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(&mock_server.uri());
    config.crawler.max_concurrent_requests = 1;

    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let started = Instant::now();
    coordinator
        .run(PageSelection::Explicit(4))
        .await
        .expect("Crawl failed");

    // With one slot the four page fetches cannot overlap
    assert!(started.elapsed() >= delay * 4);
    assert_eq!(coordinator.fetcher().available_permits(), 1);
}

#[tokio::test]
async fn test_end_to_end_two_listings_to_csv() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(is_first_index_page)
        .respond_with(html(index_page(&["/menzil-satilir-401", "/menzil-satilir-402"])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/menzil-satilir-401"))
        .respond_with(html(listing_page("401", "Birinci", "4 / 12")))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/menzil-satilir-402"))
        .respond_with(html(listing_page("402", "İkinci", "9 / 12")))
        .mount(&mock_server)
        .await;

    for (id, phone) in [("401", "(050) 401-00-01"), ("402", "(050) 402-00-02")] {
        Mock::given(method("POST"))
            .and(path(PHONE_PATH))
            .and(body_string_contains(format!("id={}", id).as_str()))
            .respond_with(html(format!(
                r#"<a class="phone"><img class="phone_icon" src="/p.svg"> {} </a>"#,
                phone
            )))
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator
        .run(PageSelection::Explicit(1))
        .await
        .expect("Crawl failed");

    assert_eq!(report.records.len(), 2);

    let first = &report.records[0];
    assert_eq!(first.listing_id, "401");
    assert_eq!(first.url, format!("{}/menzil-satilir-401", mock_server.uri()));
    assert_eq!(first.title, "Birinci");
    assert_eq!(first.price, "120 000");
    assert_eq!(first.property_type, "Köhnə tikili");
    assert_eq!(first.city, "Bakı");
    assert_eq!(first.location, "Bakı ş., Yasamal r.");
    assert_eq!(first.document, "Kupça");
    assert_eq!(first.floor, "4 / 12");
    assert_eq!(first.area, "70 m²");
    assert_eq!(first.land_area, "1 sot");
    assert_eq!(first.rooms, "2");
    assert_eq!(first.mortgage, "Yoxdur");
    assert_eq!(first.furnished, "Var");
    assert_eq!(first.description, "Təcili satılır");
    assert_eq!(first.seller_name, "Elvin");
    assert_eq!(first.seller_type, "Mülkiyyətçi");
    assert_eq!(first.phone, PhoneLookup::Found("(050) 401-00-01".to_string()));
    assert_eq!(first.views, "310");
    assert_eq!(first.post_date, "01.10.2025");
    assert_eq!(first.update_date, "03.10.2025");

    assert_eq!(report.records[1].listing_id, "402");
    assert_eq!(report.records[1].floor, "9 / 12");

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = dir.path().join("output").join("listings.csv");
    let mut output = CsvOutput::create(&csv_path).expect("Failed to create CSV");
    output.write_all(&report.records).expect("Failed to write CSV");

    let mut reader = csv::Reader::from_path(&csv_path).expect("Failed to open CSV");
    let headers: Vec<String> = reader
        .headers()
        .expect("Missing header row")
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(headers, ListingRecord::FIELD_NAMES);

    let rows: Vec<csv::StringRecord> = reader
        .records()
        .collect::<Result<_, _>>()
        .expect("Failed to read rows");
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "401");
    assert_eq!(&rows[0][17], "(050) 401-00-01");
    assert_eq!(&rows[1][0], "402");
    assert_eq!(&rows[1][20], "03.10.2025");
}
