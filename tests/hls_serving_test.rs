//! Integration tests for playlist/segment delivery and the video listing.

#![cfg(unix)]

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;

async fn harness() -> TestHarness {
    TestHarness::new(FakeTools::new(FFMPEG_OK, FFPROBE_AUDIO)).await
}

#[tokio::test]
async fn serves_manifest_with_playlist_mime() {
    let h = harness().await;
    let manifest = b"#EXTM3U\n#EXT-X-STREAM-INF:BANDWIDTH=400000,RESOLUTION=426x240\n240p.m3u8\n";
    h.seed_job("job-a", &[("master.m3u8", manifest)]);

    let resp = h.get("/hls/job-a/master.m3u8").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.content_type(), "application/vnd.apple.mpegurl");
    assert_eq!(resp.body.as_ref(), manifest);
}

#[tokio::test]
async fn serves_segment_bytes_exactly() {
    let h = harness().await;
    let segment: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    h.seed_job("job-a", &[("480p_001.ts", &segment)]);

    let resp = h.get("/hls/job-a/480p_001.ts").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.content_type(), "video/MP2T");
    assert_eq!(
        resp.headers.get("content-length").unwrap().to_str().unwrap(),
        "4096"
    );
    assert_eq!(resp.body.as_ref(), segment.as_slice());
}

#[tokio::test]
async fn other_files_use_guessed_type() {
    let h = harness().await;
    h.seed_job("job-a", &[("poster.png", b"png"), ("notes", b"plain")]);

    let png = h.get("/hls/job-a/poster.png").await;
    assert_eq!(png.status, StatusCode::OK);
    assert_eq!(png.content_type(), "image/png");

    let raw = h.get("/hls/job-a/notes").await;
    assert_eq!(raw.status, StatusCode::OK);
    assert_eq!(raw.content_type(), "application/octet-stream");
    assert_eq!(raw.body.as_ref(), b"plain");
}

#[tokio::test]
async fn missing_files_are_not_found() {
    let h = harness().await;
    h.seed_job("job-a", &[("master.m3u8", b"#EXTM3U\n")]);

    for uri in ["/hls/job-a/360p.m3u8", "/hls/job-b/master.m3u8"] {
        let resp = h.get(uri).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(resp.json()["message"], "File not found");
    }
}

#[tokio::test]
async fn traversal_outside_job_directory_is_rejected() {
    let h = harness().await;
    h.seed_job("job-a", &[("master.m3u8", b"#EXTM3U\n")]);
    std::fs::write(h.hls_dir().join("secret.txt"), "top secret").unwrap();
    std::fs::write(h.root.path().join("outside.txt"), "top secret").unwrap();

    for uri in [
        "/hls/job-a/..%2Fsecret.txt",
        "/hls/..%2Fhls/secret.txt",
        "/hls/../outside.txt",
        "/hls/job-a/%2E%2E",
    ] {
        let resp = h.get(uri).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "{uri}");
        assert!(!resp.body.windows(10).any(|w| w == b"top secret"));
    }
}

#[tokio::test]
async fn listing_includes_only_jobs_with_manifest() {
    let h = harness().await;
    h.seed_job("done-1", &[("master.m3u8", b"#EXTM3U\n"), ("240p.m3u8", b"#EXTM3U\n")]);
    h.seed_job("done-2", &[("master.m3u8", b"#EXTM3U\n")]);
    h.seed_job("failed", &[("480p.m3u8", b"#EXTM3U\n"), ("480p_000.ts", b"x")]);

    let request = Request::get("/videos")
        .header("host", "media.example.com:8000")
        .body(Body::empty())
        .unwrap();
    let resp = h.send(request).await;
    assert_eq!(resp.status, StatusCode::OK);

    let json = resp.json();
    assert_eq!(json["status"], "success");
    assert_eq!(
        json["data"],
        serde_json::json!([
            {
                "video_id": "done-1",
                "master_url": "http://media.example.com:8000/hls/done-1/master.m3u8"
            },
            {
                "video_id": "done-2",
                "master_url": "http://media.example.com:8000/hls/done-2/master.m3u8"
            }
        ])
    );
}

#[tokio::test]
async fn listing_uses_configured_public_url() {
    let h = TestHarness::with_config(FakeTools::new(FFMPEG_OK, FFPROBE_AUDIO), |c| {
        c.public_base_url = Some("https://cdn.example.com".to_string());
    })
    .await;
    h.seed_job("done-1", &[("master.m3u8", b"#EXTM3U\n")]);

    let request = Request::get("/videos")
        .header("host", "internal:8000")
        .body(Body::empty())
        .unwrap();
    let json = h.send(request).await.json();
    assert_eq!(
        json["data"][0]["master_url"],
        "https://cdn.example.com/hls/done-1/master.m3u8"
    );
}

#[tokio::test]
async fn empty_store_lists_nothing() {
    let h = harness().await;
    let json = h.get("/videos").await.json();
    assert_eq!(json["data"], serde_json::json!([]));
}

#[tokio::test]
async fn health_and_openapi_are_served() {
    let h = harness().await;

    let health = h.get("/health").await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body.as_ref(), b"ok");

    let doc = h.get("/api-docs/openapi.json").await;
    assert_eq!(doc.status, StatusCode::OK);
    let paths = &doc.json()["paths"];
    assert!(paths.get("/upload").is_some());
    assert!(paths.get("/videos").is_some());
    assert!(paths.get("/hls/{video_id}/{filename}").is_some());
}
