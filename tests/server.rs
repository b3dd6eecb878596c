use http::{Method, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;
use tsu_redirect::middleware::redirect_on_status::{Config, RedirectOnStatus};
use tsu_redirect::{Response, Router, Server, handler, sink};

fn app() -> RedirectOnStatus {
    let router = Router::new()
        .on(Method::GET, "/broken", handler::from_fn(|out, _req| {
            out.write_status(StatusCode::BAD_GATEWAY);
            sink::write_all(out, b"upstream exploded").unwrap();
        }))
        .on(Method::POST, "/echo", handler::from_fn(|out, req| {
            Response::builder()
                .status(StatusCode::CREATED)
                .bytes("application/octet-stream", req.body().to_vec())
                .send(out);
        }));

    let config = Config::from_toml_str(
        r#"
        redirectUri = "/maintenance"
        redirectCode = 307
        status = ["500-599"]
        "#,
    )
    .unwrap();
    RedirectOnStatus::new(router, &config, "maintenance").unwrap()
}

async fn roundtrip(addr: std::net::SocketAddr, raw: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    String::from_utf8(buf).unwrap()
}

#[tokio::test]
async fn serves_redirects_and_passthrough_over_http() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let server = Server::bind("127.0.0.1:0").await.unwrap();
    let addr = server.local_addr();
    let (stop, stopped) = oneshot::channel::<()>();
    let running = tokio::spawn(server.serve_with_shutdown(app(), async {
        let _ = stopped.await;
    }));

    let res = roundtrip(
        addr,
        "GET /broken HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 307 Temporary Redirect\r\n"), "{res}");
    assert!(res.contains("location: /maintenance\r\n"), "{res}");
    assert!(!res.contains("upstream exploded"), "{res}");

    let res = roundtrip(
        addr,
        "POST /echo HTTP/1.1\r\nhost: localhost\r\ncontent-length: 5\r\nconnection: close\r\n\r\nhello",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 201 Created\r\n"), "{res}");
    assert!(res.ends_with("\r\n\r\nhello"), "{res}");

    let res = roundtrip(
        addr,
        "GET /missing HTTP/1.1\r\nhost: localhost\r\nconnection: close\r\n\r\n",
    )
    .await;
    assert!(res.starts_with("HTTP/1.1 404 Not Found\r\n"), "{res}");

    stop.send(()).unwrap();
    running.await.unwrap().unwrap();
}

#[tokio::test]
async fn rejects_unparseable_address() {
    let err = Server::bind("not-an-address").await.err().unwrap();
    assert_eq!(err.to_string(), "invalid socket address `not-an-address`");
}
