use std::io;
use std::sync::{Arc, Mutex};

use transcript_api::{
    authorize, extract, fetch_periods, login, Credentials, Endpoints, Error, GradeDetail,
    Session, ShapeError, Step,
};
use wiremock::matchers::{body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOGIN_PATH: &str = "/authserver/login";
const SHEET_PATH: &str = "/student/for-std/grade/sheet/";
const LANDING_PATH: &str = "/student/for-std/grade/sheet";
const TICKET_PATH: &str = "/student/sso/login";
const INFO_PATH: &str = "/student/for-std/grade/sheet/info/402511";

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

fn credentials() -> Credentials {
    Credentials::new("20300001", "s3cret").unwrap()
}

/// In-memory log sink for a thread-local subscriber.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn session_for(server: &MockServer) -> Session {
    Session::new(Endpoints::with_base_url(&server.uri()).unwrap()).unwrap()
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("login_page.html")))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("location", format!("{}{}", server.uri(), SHEET_PATH))
                .insert_header("set-cookie", "CASTGC=TGT-1; Path=/"),
        )
        .mount(server)
        .await;
}

/// Ticket page, ticket redemption and landing page. Each hop only answers
/// when the cookies from the previous hop are present.
async fn mount_ticket_chain(server: &MockServer) {
    let ticket_page = format!(
        r#"<html><script>var locationValue = "{}{}?ticket=ST-42&amp;target=sheet";
        window.location.href = locationValue;</script></html>"#,
        server.uri(),
        TICKET_PATH
    );
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .and(header("cookie", "CASTGC=TGT-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ticket_page))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(TICKET_PATH))
        .and(query_param("ticket", "ST-42"))
        .and(query_param("target", "sheet"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("set-cookie", "SESSION=app-1; Path=/"),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(LANDING_PATH))
        .and(header_regex("cookie", "SESSION=app-1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(load_fixture("landing_page.html")),
        )
        .mount(server)
        .await;
}

async fn mount_period(server: &MockServer, period: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .and(query_param("semester", period))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_posts_credentials_and_hidden_fields() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("login_page.html")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .and(body_string_contains("username=20300001"))
        .and(body_string_contains("password=s3cret"))
        .and(body_string_contains("service="))
        .and(body_string_contains("csrf=abc"))
        .and(body_string_contains("lt=xyz"))
        .and(body_string_contains("execution=e1s1"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/", server.uri())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let result = login(&session, &credentials()).await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn login_without_redirect_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("login_page.html")))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("bad password"))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let err = login(&session, &credentials()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::HttpStatus {
            step: Step::Login,
            status: 200
        }
    ));
}

#[tokio::test]
async fn login_redirect_without_location_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(302))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let err = login(&session, &credentials()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::HttpStatus {
            step: Step::Login,
            status: 302
        }
    ));
}

#[tokio::test]
async fn login_page_error_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(LOGIN_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let err = login(&session, &credentials()).await.unwrap_err();
    assert!(matches!(
        err,
        Error::HttpStatus {
            step: Step::LoginPage,
            status: 503
        }
    ));
}

#[tokio::test]
async fn ticket_chain_reaches_landing_page() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_ticket_chain(&server).await;

    let session = session_for(&server);
    let proof = login(&session, &credentials()).await.unwrap();
    let authorized = authorize(&session, proof).await.unwrap();

    let sid = extract::student_id(authorized.landing_html()).unwrap();
    assert_eq!(sid.as_str(), "402511");
}

#[tokio::test]
async fn ticket_page_without_ticket_is_protocol_error() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let proof = login(&session, &credentials()).await.unwrap();
    let err = authorize(&session, proof).await.unwrap_err();
    assert!(matches!(
        err,
        Error::ProtocolShape(ShapeError::TicketUrlNotFound)
    ));
}

#[tokio::test]
async fn ticket_page_error_status_is_fatal() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let proof = login(&session, &credentials()).await.unwrap();
    let err = authorize(&session, proof).await.unwrap_err();
    assert!(matches!(
        err,
        Error::HttpStatus {
            step: Step::TicketPage,
            status: 500
        }
    ));
}

#[tokio::test]
async fn landing_page_error_status_is_fatal() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let ticket_page = format!(
        r#"<script>locationValue="{}{}?ticket=ST-42"</script>"#,
        server.uri(),
        TICKET_PATH
    );
    Mock::given(method("GET"))
        .and(path(SHEET_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(ticket_page))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(TICKET_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(LANDING_PATH))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let session = session_for(&server);
    let proof = login(&session, &credentials()).await.unwrap();
    let err = authorize(&session, proof).await.unwrap_err();
    assert!(matches!(
        err,
        Error::HttpStatus {
            step: Step::Landing,
            status: 403
        }
    ));
}

#[tokio::test]
async fn fresh_session_is_not_authenticated() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_ticket_chain(&server).await;
    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .and(query_param("semester", "469"))
        .and(header_regex("cookie", "SESSION=app-1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(load_fixture("period_469.json")))
        .mount(&server)
        .await;

    let logged_in = session_for(&server);
    let fresh = session_for(&server);

    // The login proof does not carry cookies; the fresh jar is empty.
    let proof = login(&logged_in, &credentials()).await.unwrap();
    let err = authorize(&fresh, proof).await.unwrap_err();
    assert!(matches!(
        err,
        Error::HttpStatus {
            step: Step::TicketPage,
            status: 404
        }
    ));

    let proof = login(&logged_in, &credentials()).await.unwrap();
    let authorized = authorize(&logged_in, proof).await.unwrap();
    let sid = extract::student_id(authorized.landing_html()).unwrap();

    let report = fetch_periods(&fresh, &authorized, &sid, &[469]).await.unwrap();
    assert!(report.payloads.is_empty());
    assert_eq!(report.skipped[0].status.as_u16(), 404);

    let report = fetch_periods(&logged_in, &authorized, &sid, &[469]).await.unwrap();
    assert_eq!(report.payloads.len(), 1);
}

#[tokio::test]
async fn login_does_not_log_credentials() {
    let server = MockServer::start().await;
    mount_login(&server).await;

    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let session = session_for(&server);
    login(&session, &credentials()).await.unwrap();

    let text = logs.contents();
    assert!(text.contains("Logged in"));
    assert!(!text.contains("20300001"));
    assert!(!text.contains("s3cret"));
}

#[tokio::test]
async fn fetch_skips_failed_period_and_normalizes_the_rest() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_ticket_chain(&server).await;
    mount_period(
        &server,
        "469",
        ResponseTemplate::new(200).set_body_string(load_fixture("period_469.json")),
    )
    .await;
    mount_period(&server, "465", ResponseTemplate::new(500)).await;
    mount_period(
        &server,
        "467",
        ResponseTemplate::new(200).set_body_string(load_fixture("period_467.json")),
    )
    .await;

    let session = session_for(&server);
    let proof = login(&session, &credentials()).await.unwrap();
    let authorized = authorize(&session, proof).await.unwrap();
    let sid = extract::student_id(authorized.landing_html()).unwrap();

    let report = fetch_periods(&session, &authorized, &sid, &[469, 465, 467])
        .await
        .unwrap();

    assert_eq!(report.payloads.len(), 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].period, 465);
    assert_eq!(report.skipped[0].status.as_u16(), 500);

    let first = &report.payloads[0].grades_by_period["469"];
    assert_eq!(
        first[0].grade_detail(),
        Some(&GradeDetail::Text(vec![
            "平时(40%):92".to_string(),
            "期末(60%):90".to_string()
        ]))
    );
    assert_eq!(first[1].grade_detail(), Some(&GradeDetail::Text(Vec::new())));

    let second = &report.payloads[1].grades_by_period["467"];
    assert_eq!(
        second[0].grade_detail(),
        Some(&GradeDetail::Text(vec!["85".to_string(), "A".to_string()]))
    );
}

#[tokio::test]
async fn fetch_aborts_on_malformed_payload() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    mount_ticket_chain(&server).await;
    mount_period(
        &server,
        "469",
        ResponseTemplate::new(200).set_body_string("{not valid json}"),
    )
    .await;

    Mock::given(method("GET"))
        .and(path(INFO_PATH))
        .and(query_param("semester", "467"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let session = session_for(&server);
    let proof = login(&session, &credentials()).await.unwrap();
    let authorized = authorize(&session, proof).await.unwrap();
    let sid = extract::student_id(authorized.landing_html()).unwrap();

    let err = fetch_periods(&session, &authorized, &sid, &[469, 467])
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MalformedPayload { period: 469, .. }));
}

#[tokio::test]
async fn close_issues_logout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/authserver/logout"))
        .and(query_param("service", "/authserver/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    session_for(&server).close().await;
}
