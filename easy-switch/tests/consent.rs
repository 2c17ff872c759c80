use std::time::Duration;

use easy_switch::{
    consent::{OAuthPopup, RedirectServerPopup},
    provider::OAuthProvider,
    ImportAssistantConfig,
};
use oauth::v2_0::OAuthConfig;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::sleep,
};

fn free_port() -> u16 {
    std::net::TcpListener::bind(("localhost", 0))
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn query_param<'a>(url: &'a str, key: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix(key)?.strip_prefix('='))
}

/// Simulates the browser following the redirection of the consent
/// screen.
fn redirect(port: u16, query: String) {
    tokio::spawn(async move {
        let mut stream = loop {
            match TcpStream::connect(("localhost", port)).await {
                Ok(stream) => break stream,
                Err(_) => sleep(Duration::from_millis(20)).await,
            }
        };

        let request = format!("GET /?{query} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut response = String::new();
        let _ = stream.read_to_string(&mut response).await;
    });
}

fn popup(port: u16, outcome: &'static str) -> RedirectServerPopup {
    let config = OAuthConfig {
        client_id: "client-id".into(),
        redirect_port: Some(port),
        ..Default::default()
    };

    RedirectServerPopup::new(config, move |url| {
        assert!(url.starts_with("https://accounts.google.com/o/oauth2/v2/auth?"));
        assert_eq!(query_param(url, "access_type"), Some("offline"));
        assert_eq!(query_param(url, "prompt"), Some("consent"));
        assert_eq!(query_param(url, "client_id"), Some("client-id"));

        let state = query_param(url, "state").unwrap();
        redirect(port, format!("state={state}&{outcome}"));
    })
}

#[test_log::test(tokio::test)]
async fn catch_authorization_code() {
    let port = free_port();
    let popup = popup(port, "code=auth-code");

    let props = popup
        .authorize(OAuthProvider::Google, "email openid")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(props.code, "auth-code");
    assert_eq!(props.provider, OAuthProvider::Google);
    assert_eq!(props.redirect_uri, format!("http://localhost:{port}"));
}

#[test_log::test(tokio::test)]
async fn cancel_on_denied_consent() {
    let port = free_port();
    let popup = popup(port, "error=access_denied");

    let props = popup
        .authorize(OAuthProvider::Google, "email openid")
        .await
        .unwrap();

    assert_eq!(props, None);
}

#[test_log::test(tokio::test)]
async fn build_popup_from_config() {
    let port = free_port();
    let config = ImportAssistantConfig {
        api_url: "https://mail.example.com/api".into(),
        oauth: OAuthConfig {
            client_id: "client-id".into(),
            redirect_port: Some(port),
            ..Default::default()
        },
        ..Default::default()
    };

    let popup = config.build_popup(move |url| {
        let state = query_param(url, "state").unwrap();
        redirect(port, format!("state={state}&code=from-config"));
    });

    let props = popup
        .authorize(OAuthProvider::Google, "email")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(props.code, "from-config");
}
