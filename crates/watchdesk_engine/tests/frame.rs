use watchdesk_core::FrameVerdict;
use watchdesk_engine::{ClientSettings, FrameProbe, HttpFrameProbe};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn probe_reads_framing_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/open"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/locked"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Frame-Options", "DENY")
                .set_body_string("<html></html>"),
        )
        .mount(&server)
        .await;

    let probe = HttpFrameProbe::new(&ClientSettings::default()).unwrap();

    assert_eq!(
        probe.probe(&format!("{}/open", server.uri())).await,
        FrameVerdict::Embeddable
    );
    assert!(matches!(
        probe.probe(&format!("{}/locked", server.uri())).await,
        FrameVerdict::Refused { reason } if reason.contains("DENY")
    ));
}

#[tokio::test]
async fn error_pages_are_refused() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let probe = HttpFrameProbe::new(&ClientSettings::default()).unwrap();
    assert!(matches!(
        probe.probe(&format!("{}/gone", server.uri())).await,
        FrameVerdict::Refused { .. }
    ));
}
