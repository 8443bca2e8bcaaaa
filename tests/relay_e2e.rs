//! End-to-end tests: a mock upstream, a live relay, and reqwest as the browser.

use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use serde_json::{json, Value};

mod common;

use common::{client, start_relay, start_upstream, test_config, MockResponse};

fn relay_path(target: &str) -> String {
    format!("/relay?url={}", urlencoding::encode(target))
}

#[tokio::test]
async fn test_html_is_rewritten_through_relay() {
    let upstream = start_upstream(|req| match req.path.as_str() {
        "/docs/index.html" => MockResponse::ok(
            "text/html; charset=utf-8",
            r##"<html><head><title>Docs</title></head><body><a href="/about">About</a><img src="logo.png" srcset="a.png 1x, b.png 2x"><a href="#top">top</a></body></html>"##,
        ),
        _ => MockResponse::status(404, "text/plain", "missing"),
    })
    .await;
    let relay = start_relay(test_config()).await;
    let target = format!("http://{}/docs/index.html", upstream);

    let res = client().get(relay.url(&relay_path(&target))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/html; charset=utf-8");
    assert_eq!(res.headers()["x-frame-options"], "ALLOWALL");
    assert_eq!(
        res.headers()["content-security-policy"],
        "default-src * 'unsafe-inline' 'unsafe-eval' data: blob:;"
    );

    let body = res.text().await.unwrap();
    assert!(body.contains(&format!("<head><base href=\"{}\">", target)));

    let about = format!("http://{}/about", upstream);
    assert!(body.contains(&format!("href=\"/relay?url={}\"", urlencoding::encode(&about))));

    let logo = format!("http://{}/docs/logo.png", upstream);
    assert!(body.contains(&format!("src=\"/relay?url={}\"", urlencoding::encode(&logo))));

    let a = format!("http://{}/docs/a.png", upstream);
    let b = format!("http://{}/docs/b.png", upstream);
    assert!(body.contains(&format!(
        "srcset=\"/relay?url={} 1x, /relay?url={} 2x\"",
        urlencoding::encode(&a),
        urlencoding::encode(&b)
    )));
    assert!(body.contains(r##"href="#top""##));

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_stylesheet_urls_are_rewritten() {
    let upstream = start_upstream(|_| {
        MockResponse::ok(
            "text/css",
            "body { background: url('img/bg.png'); } .i { background: url(data:image/png;base64,AAAA); }",
        )
    })
    .await;
    let relay = start_relay(test_config()).await;
    let target = format!("http://{}/static/site.css", upstream);

    let res = client().get(relay.url(&relay_path(&target))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "text/css");

    let body = res.text().await.unwrap();
    let bg = format!("http://{}/static/img/bg.png", upstream);
    assert!(body.contains(&format!("url(\"/relay?url={}\")", urlencoding::encode(&bg))));
    assert!(body.contains("url(data:image/png;base64,AAAA)"));

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_binary_passes_through_untouched() {
    let payload: Vec<u8> = vec![0x89, b'P', b'N', b'G', 0x00, 0xff, 0xfe, b'h', b'r', b'e', b'f'];
    let served = payload.clone();
    let upstream = start_upstream(move |_| MockResponse::ok("image/png", served.clone())).await;
    let relay = start_relay(test_config()).await;

    let target = format!("http://{}/logo.png", upstream);
    let res = client().get(relay.url(&relay_path(&target))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "image/png");
    assert_eq!(res.headers()["x-frame-options"], "ALLOWALL");
    assert_eq!(res.bytes().await.unwrap().as_ref(), payload.as_slice());

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_missing_content_type_defaults_to_octet_stream() {
    let upstream = start_upstream(|_| MockResponse::untyped("<a href=\"/x\">raw</a>")).await;
    let relay = start_relay(test_config()).await;

    let target = format!("http://{}/blob", upstream);
    let res = client().get(relay.url(&relay_path(&target))).send().await.unwrap();
    assert_eq!(res.headers()["content-type"], "application/octet-stream");
    assert_eq!(res.text().await.unwrap(), "<a href=\"/x\">raw</a>");

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_upstream_status_and_headers_policy() {
    let upstream = start_upstream(|_| {
        MockResponse::status(404, "text/html", "<p>gone</p>")
            .with_header("X-Frame-Options", "DENY")
            .with_header("Set-Cookie", "session=abc")
    })
    .await;
    let relay = start_relay(test_config()).await;

    let target = format!("http://{}/gone", upstream);
    let res = client().get(relay.url(&relay_path(&target))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["x-frame-options"], "ALLOWALL");
    assert!(res.headers().get("set-cookie").is_none());

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_redirects_are_followed_with_requested_base() {
    let upstream = start_upstream(|req| match req.path.as_str() {
        "/old" => MockResponse::redirect("/new/page"),
        "/new/page" => MockResponse::ok("text/html", "<head></head><a href=\"next\">n</a>"),
        _ => MockResponse::status(404, "text/plain", ""),
    })
    .await;
    let relay = start_relay(test_config()).await;

    let target = format!("http://{}/old", upstream);
    let res = client().get(relay.url(&relay_path(&target))).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.text().await.unwrap();
    assert!(body.contains(&format!("<base href=\"{}\">", target)));
    let next = format!("http://{}/next", upstream);
    assert!(body.contains(&urlencoding::encode(&next).into_owned()));

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_user_agent_forwarded_or_defaulted() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let record = seen.clone();
    let upstream = start_upstream(move |req| {
        record
            .lock()
            .unwrap()
            .push(req.header("user-agent").unwrap_or("").to_string());
        MockResponse::ok("text/plain", "ok")
    })
    .await;
    let relay = start_relay(test_config()).await;
    let url = relay.url(&relay_path(&format!("http://{}/", upstream)));

    client()
        .get(&url)
        .header("User-Agent", "Mozilla/5.0 (TestShell)")
        .send()
        .await
        .unwrap();

    let bare = reqwest::Client::builder().no_proxy().build().unwrap();
    let req = bare.get(&url).build().unwrap();
    assert!(req.headers().get("user-agent").is_none());
    bare.execute(req).await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen, vec!["Mozilla/5.0 (TestShell)".to_string(), "web-relay".to_string()]);

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_missing_or_blank_url_is_rejected() {
    let relay = start_relay(test_config()).await;

    for path in ["/relay", "/relay?url=", "/relay?url=%20%20"] {
        let res = client().get(relay.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "message": "URL is required", "field": "url" }));
    }

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_repeated_url_parameter_is_rejected_as_json() {
    let relay = start_relay(test_config()).await;

    let res = client()
        .get(relay.url("/relay?url=a.com&url=b.com"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert!(res.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Invalid URL", "field": "url" }));

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_unparseable_url_is_rejected() {
    let relay = start_relay(test_config()).await;

    let res = client()
        .get(relay.url(&relay_path("http://exa mple.com")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["field"], "url");

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let relay = start_relay(test_config()).await;

    let res = client()
        .get(relay.url(&relay_path("http://127.0.0.1:1/")))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Proxy fetch failed" }));

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_bare_host_is_upgraded_to_https() {
    // The mock only speaks plain HTTP, so an https upgrade surfaces as a failed fetch.
    let upstream = start_upstream(|_| MockResponse::ok("text/plain", "plain")).await;
    let mut config = test_config();
    config.upstream.request_timeout_secs = 1;
    let relay = start_relay(config).await;

    let res = client()
        .get(relay.url(&relay_path(&format!("{}/page", upstream))))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let relay = start_relay(test_config()).await;

    let res = client().get(relay.url("/health")).send().await.unwrap();
    let id = res.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(uuid::Uuid::parse_str(&id).is_ok());

    let res = client()
        .get(relay.url("/health"))
        .header("x-request-id", "caller-chosen")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "caller-chosen");

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_health_reports_version() {
    let relay = start_relay(test_config()).await;

    let body: Value = client()
        .get(relay.url("/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "operational");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    relay.shutdown.trigger();
}

#[tokio::test]
async fn test_custom_endpoint_path_shapes_links() {
    let upstream = start_upstream(|_| MockResponse::ok("text/html", "<a href=\"/x\">x</a>")).await;
    let mut config = test_config();
    config.relay.endpoint_path = "/api/proxy".into();
    let relay = start_relay(config).await;

    let target = format!("http://{}/", upstream);
    let res = client()
        .get(relay.url(&format!("/api/proxy?url={}", urlencoding::encode(&target))))
        .send()
        .await
        .unwrap();
    let body = res.text().await.unwrap();
    let x = format!("http://{}/x", upstream);
    assert!(body.contains(&format!("href=\"/api/proxy?url={}\"", urlencoding::encode(&x))));

    relay.shutdown.trigger();
}
