use easy_switch::{
    api::{CreateTokenRequest, Error, HttpImportApi, ImportApi},
    provider::OAuthProvider,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

/// Serves one single request with the given status and body, then
/// gives back the raw request.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0; 1024];

        loop {
            let n = stream.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&request);
            if let Some((head, body)) = text.split_once("\r\n\r\n") {
                let len = head
                    .lines()
                    .find_map(|line| {
                        let (key, val) = line.split_once(':')?;
                        key.eq_ignore_ascii_case("content-length")
                            .then(|| val.trim().parse::<usize>().ok())?
                    })
                    .unwrap_or_default();

                if body.len() >= len {
                    break;
                }
            }

            if n == 0 {
                break;
            }
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();

        String::from_utf8_lossy(&request).into_owned()
    });

    (url, handle)
}

fn token_request() -> CreateTokenRequest {
    CreateTokenRequest {
        provider: OAuthProvider::Google,
        code: "auth-code".into(),
        redirect_uri: "http://localhost:9999".into(),
    }
}

#[test_log::test(tokio::test)]
async fn create_token_with_session_headers() {
    let body = r#"{"Code":1000,"Token":{"ID":"token-id","Account":"john@gmail.com","Products":["Mail"]}}"#;
    let (url, server) = serve_once("200 OK", body).await;
    let api = HttpImportApi::new(&url, "uid", "access-token").with_app_version("web-mail@5.0.0");

    let token = api.create_token(&token_request()).await.unwrap();
    assert_eq!(token.id, "token-id");
    assert_eq!(token.account, "john@gmail.com");

    let request = server.await.unwrap().to_lowercase();
    assert!(request.starts_with("post /importer/v1/tokens "));
    assert!(request.contains("x-pm-uid: uid"));
    assert!(request.contains("authorization: bearer access-token"));
    assert!(request.contains("x-pm-appversion: web-mail@5.0.0"));
    assert!(request.contains(r#""code":"auth-code""#));
}

#[test_log::test(tokio::test)]
async fn read_error_envelope_of_rejected_request() {
    let body = r#"{"Code":2500,"Error":"Token expired"}"#;
    let (url, _server) = serve_once("422 Unprocessable Entity", body).await;
    let api = HttpImportApi::new(&url, "uid", "access-token");

    match api.create_token(&token_request()).await {
        Err(Error::RejectedError(code, path, msg)) => {
            assert_eq!(code, 2500);
            assert_eq!(path, "importer/v1/tokens");
            assert_eq!(msg, "Token expired");
        }
        res => panic!("unexpected result {res:?}"),
    }
}

#[test_log::test(tokio::test)]
async fn fail_with_status_when_error_is_not_json() {
    let (url, _server) = serve_once("502 Bad Gateway", "Bad Gateway").await;
    let api = HttpImportApi::new(&url, "uid", "access-token");

    let res = api.remove_calendar("cal-id").await;
    assert!(matches!(
        res,
        Err(Error::HttpError(http::Error::ResponseStatusError(status, _, _))) if status.as_u16() == 502
    ));
}

#[test_log::test(tokio::test)]
async fn remove_calendar() {
    let (url, server) = serve_once("200 OK", r#"{"Code":1000}"#).await;
    let api = HttpImportApi::new(&url, "uid", "access-token");

    api.remove_calendar("cal-id").await.unwrap();

    let request = server.await.unwrap();
    assert!(request.starts_with("DELETE /calendar/v1/cal-id "));
}
