use std::io::Read;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::thread;

use fragmark::persistence::{FragmentData, FragmentService, SaveRegionRequest};
use fragmark::{Error, HttpFragmentService};

/// One recorded request as seen by the test backend.
#[derive(Debug, Clone)]
struct Seen {
    method: String,
    url: String,
    body: String,
}

type SeenLog = Arc<Mutex<Vec<Seen>>>;

/// Spawn a one-shot backend on an ephemeral port. The handler receives the
/// request path (with query string) and returns `(status, json_body)`.
fn spawn_backend<F>(handler: F) -> (SocketAddr, SeenLog)
where
    F: Fn(&str) -> (u16, String) + Send + 'static,
{
    let server = tiny_http::Server::http("127.0.0.1:0").expect("bind test server");
    let addr = server.server_addr().to_ip().expect("tcp listener");
    let seen: SeenLog = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let method = request.method().to_string();
            let url = request.url().to_owned();
            let mut body = String::new();
            let _ = request.as_reader().read_to_string(&mut body);
            log.lock().unwrap().push(Seen {
                method,
                url: url.clone(),
                body,
            });

            let (status, reply) = handler(&url);
            let response = tiny_http::Response::from_string(reply)
                .with_status_code(status)
                .with_header(
                    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
                        .expect("static header"),
                );
            let _ = request.respond(response);
        }
    });
    (addr, seen)
}

#[test]
fn save_region_posts_the_contract_body() {
    let (addr, seen) = spawn_backend(|_url| {
        (200, r#"{"success": true, "filename": "frag_001.wav"}"#.to_owned())
    });
    // Trailing slash in the base url must not produce a double slash.
    let service = HttpFragmentService::new(format!("http://{addr}/")).unwrap();

    let saved = service
        .save_region(&SaveRegionRequest {
            audio_filename: "talk.wav".to_owned(),
            start: 12.5,
            end: 17.0,
            comment: "intro remarks".to_owned(),
        })
        .unwrap();
    assert_eq!(saved.filename, "frag_001.wav");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].method, "POST");
    assert_eq!(seen[0].url, "/save_region");

    let body: serde_json::Value = serde_json::from_str(&seen[0].body).unwrap();
    assert_eq!(body["audio_filename"], "talk.wav");
    assert_eq!(body["start"], 12.5);
    assert_eq!(body["end"], 17.0);
    assert_eq!(body["comment"], "intro remarks");
}

#[test]
fn saved_regions_sends_the_audio_filename_query() {
    let (addr, seen) = spawn_backend(|_url| {
        (
            200,
            r#"{"success": true, "regions": [
                {"start": 12.5, "end": 17.0, "comment": "intro remarks", "filename": "frag_001.wav"},
                {"start": 30.0, "end": 31.0, "filename": "frag_002.wav"}
            ]}"#
            .to_owned(),
        )
    });
    let service = HttpFragmentService::new(format!("http://{addr}")).unwrap();

    let regions = service.saved_regions("talk.wav").unwrap();
    assert_eq!(regions.len(), 2);
    assert_eq!(regions[0].comment, "intro remarks");
    // Missing comment defaults to empty rather than failing the whole listing.
    assert_eq!(regions[1].comment, "");

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].method, "GET");
    assert!(seen[0].url.starts_with("/get_saved_regions?"));
    assert!(seen[0].url.contains("audio_filename=talk.wav"));
}

#[test]
fn fragment_data_round_trips() {
    let (addr, seen) = spawn_backend(|_url| {
        (
            200,
            r#"{"success": true, "fragment": {
                "start_time": 12.5, "end_time": 17.0, "duration": 4.5,
                "selected_text": "intro remarks"
            }}"#
            .to_owned(),
        )
    });
    let service = HttpFragmentService::new(format!("http://{addr}")).unwrap();

    let fragment = service.fragment_data("frag_001.wav").unwrap();
    assert_eq!(
        fragment,
        FragmentData {
            start_time: 12.5,
            end_time: 17.0,
            duration: 4.5,
            selected_text: Some("intro remarks".to_owned()),
        }
    );

    let seen = seen.lock().unwrap();
    assert!(seen[0].url.starts_with("/get_fragment_data?"));
    assert!(seen[0].url.contains("filename=frag_001.wav"));
}

#[test]
fn declared_failure_maps_to_a_service_error() {
    let (addr, _seen) = spawn_backend(|_url| {
        (
            200,
            r#"{"success": false, "error": "ffmpeg failed"}"#.to_owned(),
        )
    });
    let service = HttpFragmentService::new(format!("http://{addr}")).unwrap();

    let err = service
        .save_region(&SaveRegionRequest {
            audio_filename: "talk.wav".to_owned(),
            start: 0.0,
            end: 1.0,
            comment: String::new(),
        })
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Service {
            endpoint: "/save_region",
            ..
        }
    ));
    assert!(err.to_string().contains("ffmpeg failed"));
}

#[test]
fn http_status_errors_surface_as_transport_errors() {
    let (addr, _seen) =
        spawn_backend(|_url| (500, r#"{"success": false}"#.to_owned()));
    let service = HttpFragmentService::new(format!("http://{addr}")).unwrap();

    let err = service.saved_regions("talk.wav").unwrap_err();
    assert!(matches!(err, Error::Http(_)));
}
