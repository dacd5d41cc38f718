//! Transcript discovery and loading tests: poll budget semantics against a
//! counting probe, and payload fetch/decoding against a local mock server.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use tubescribe::transcript::{
    CaptionScan, CaptionTrack, PollPolicy, load_transcript, poll_caption_tracks, select_track,
};

const PLAYER_BLOB: &str = r#"{
    "captions": {
        "playerCaptionsTracklistRenderer": {
            "captionTracks": [
                {
                    "languageCode": "en",
                    "name": {"simpleText": "English"},
                    "baseUrl": "https://host.example/timedtext?lang=en"
                }
            ]
        }
    }
}"#;

#[tokio::test(start_paused = true)]
async fn absent_after_exactly_the_poll_budget() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();
    let policy = PollPolicy::default();

    let scan = poll_caption_tracks(
        move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                None
            }
        },
        &policy,
    )
    .await;

    assert_eq!(scan, CaptionScan::Absent);
    assert!(scan.tracks().is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), policy.max_attempts);
}

#[tokio::test(start_paused = true)]
async fn late_arriving_blob_is_found_mid_budget() {
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let scan = poll_caption_tracks(
        move || {
            let counter = counter.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                (n >= 3).then(|| PLAYER_BLOB.to_string())
            }
        },
        &PollPolicy::default(),
    )
    .await;

    let CaptionScan::Found(tracks) = scan else {
        panic!("expected tracks");
    };
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].language_code, "en");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn malformed_blob_keeps_consuming_attempts() {
    let policy = PollPolicy {
        max_attempts: 4,
        interval_ms: 500,
    };
    let calls = Arc::new(AtomicU32::new(0));
    let counter = calls.clone();

    let scan = poll_caption_tracks(
        move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Some("{not json".to_string())
            }
        },
        &policy,
    )
    .await;

    assert_eq!(scan, CaptionScan::Absent);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

fn track(code: &str, name: &str, url: &str) -> CaptionTrack {
    CaptionTrack {
        language_code: code.to_string(),
        display_name: name.to_string(),
        source_url: url.to_string(),
    }
}

#[test]
fn selection_policy_examples() {
    let tracks = vec![
        track("fr", "French", "https://host.example/fr"),
        track("en-US", "English (US)", "https://host.example/en"),
    ];
    assert_eq!(select_track(&tracks, "en").unwrap().language_code, "en-US");

    let tracks = vec![
        track("fr", "French", "https://host.example/fr"),
        track("de", "German", "https://host.example/de"),
    ];
    assert_eq!(select_track(&tracks, "en").unwrap().language_code, "fr");
}

#[tokio::test]
async fn loads_and_filters_the_json3_payload() {
    let mut server = mockito::Server::new_async().await;
    let body = r#"{
        "events": [
            {"tStartMs": 0, "segs": [{"utf8": "Hello"}]},
            {"tStartMs": 900},
            {"tStartMs": 2100, "segs": [{"utf8": "world"}]}
        ]
    }"#;
    let mock = server
        .mock("GET", "/api/timedtext")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("lang".into(), "en".into()),
            mockito::Matcher::UrlEncoded("fmt".into(), "json3".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await;

    let tracks = vec![track(
        "en",
        "English",
        &format!("{}/api/timedtext?lang=en", server.url()),
    )];

    let client = reqwest::Client::new();
    let transcript = load_transcript(&client, &tracks, "en").await.unwrap();

    mock.assert_async().await;
    assert_eq!(transcript.language, "en");
    assert_eq!(transcript.events.len(), 2);
    assert_eq!(transcript.events[0].text(), "Hello");
    assert_eq!(transcript.events[1].start_ms, 2100);
}

#[tokio::test]
async fn server_failure_yields_none_without_retry() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/timedtext")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .expect(1)
        .create_async()
        .await;

    let tracks = vec![track(
        "en",
        "English",
        &format!("{}/api/timedtext?lang=en", server.url()),
    )];

    let client = reqwest::Client::new();
    let transcript = load_transcript(&client, &tracks, "en").await;

    mock.assert_async().await;
    assert!(transcript.is_none());
}

#[tokio::test]
async fn empty_track_set_yields_none() {
    let client = reqwest::Client::new();
    assert!(load_transcript(&client, &[], "en").await.is_none());
}
