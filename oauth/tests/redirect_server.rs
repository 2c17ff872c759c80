use std::time::Duration;

use oauth::v2_0::{AuthorizationCodeGrant, OAuthConfig, Redirection};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
    time::sleep,
};

async fn redirect(port: u16, query: String) -> String {
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
    response
}

fn free_port() -> u16 {
    std::net::TcpListener::bind(("localhost", 0))
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn config() -> OAuthConfig {
    OAuthConfig {
        client_id: "client-id".into(),
        auth_url: "https://accounts.google.com/o/oauth2/v2/auth".into(),
        redirect_port: Some(free_port()),
        ..Default::default()
    }
}

#[test_log::test(tokio::test)]
async fn catch_authorization_code() {
    let client = config().build_client().unwrap();
    let port = client.redirect_port;
    let grant = AuthorizationCodeGrant::new().with_scopes(["email", "openid"]);
    let (_, state) = grant.get_redirect_url(&client);

    let query = format!("state={}&code=auth-code", state.secret());
    let browser = tokio::spawn(redirect(port, query));

    let redirection = grant.wait_for_redirection(&client, state).await.unwrap();
    assert_eq!(redirection, Redirection::Authorized("auth-code".into()));

    let response = browser.await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200 OK"));
    assert!(response.contains("Authorization successful!"));
}

#[test_log::test(tokio::test)]
async fn catch_denied_consent() {
    let client = config().build_client().unwrap();
    let port = client.redirect_port;
    let grant = AuthorizationCodeGrant::new().with_scope("email");
    let (_, state) = grant.get_redirect_url(&client);

    let query = format!("error=access_denied&state={}", state.secret());
    let browser = tokio::spawn(redirect(port, query));

    let redirection = grant.wait_for_redirection(&client, state).await.unwrap();
    assert_eq!(redirection, Redirection::Denied("access_denied".into()));

    let response = browser.await.unwrap();
    assert!(response.contains("Authorization denied."));
}
