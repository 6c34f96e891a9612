use base64::{prelude::BASE64_STANDARD, Engine};
use std::io::Cursor;
use story_reel::{
    synthesis::{generate_image, Automatic1111Client, RenderOptions},
    Error,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
    task::JoinHandle,
};

/// Serves a single canned HTTP response and hands back the request body
async fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut buf).await.unwrap();
            assert!(n > 0, "connection closed before headers were read");
            request.extend_from_slice(&buf[..n]);
            if let Some(pos) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&request[..header_end]).to_lowercase();
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        while request.len() < header_end + content_length {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&request[header_end..]).into_owned()
    });

    (base_url, handle)
}

fn png_base64() -> String {
    let mut bytes = Vec::new();
    image::RgbImage::from_pixel(4, 4, image::Rgb([200, 10, 10]))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    BASE64_STANDARD.encode(bytes)
}

fn options() -> RenderOptions {
    RenderOptions {
        model: Some("v1-5-pruned.safetensors".into()),
        lora: None,
        style: Some("illustration".into()),
    }
}

#[tokio::test]
async fn test_server_error_creates_no_file() {
    let (base_url, server) =
        serve_once("500 Internal Server Error", r#"{"error":"OutOfMemoryError"}"#.into()).await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("image_1.png");

    let client = Automatic1111Client::new(base_url);
    let result = generate_image(&client, "a red fox", &options(), &output).await;

    match result {
        Err(Error::ImageSynthesis(msg)) => {
            assert!(msg.contains("500"), "{msg}");
            assert!(msg.contains("OutOfMemoryError"), "{msg}");
        }
        other => panic!("Expected an image synthesis error, got {other:?}"),
    }
    assert!(!output.exists());
    server.await.unwrap();
}

#[tokio::test]
async fn test_success_writes_first_image() {
    let body = serde_json::json!({ "images": [png_base64()], "info": "{}" }).to_string();
    let (base_url, server) = serve_once("200 OK", body).await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("image_1.png");

    let client = Automatic1111Client::new(format!("{base_url}/"));
    generate_image(&client, "a red fox", &options(), &output)
        .await
        .expect("Image generation should succeed");

    let img = image::open(&output).unwrap();
    assert_eq!((img.width(), img.height()), (4, 4));

    let request: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
    assert_eq!(request["prompt"], "a red fox, style of illustration");
    assert_eq!(request["steps"], 20);
    assert_eq!(request["sampler_index"], "Euler a");
    assert_eq!(request["seed"], -1);
    assert_eq!(request["model"], "v1-5-pruned.safetensors");
    assert!(request.get("lora").is_none());
}

#[tokio::test]
async fn test_empty_image_list_creates_no_file() {
    let (base_url, server) = serve_once("200 OK", r#"{"images": []}"#.into()).await;
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("image_1.png");

    let client = Automatic1111Client::new(base_url);
    let result = generate_image(&client, "a red fox", &options(), &output).await;

    assert!(matches!(result, Err(Error::EmptyImageResponse)));
    assert!(!output.exists());
    server.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_api_creates_no_file() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("image_1.png");

    let client = Automatic1111Client::new(base_url);
    let result = generate_image(&client, "a red fox", &options(), &output).await;

    assert!(matches!(result, Err(Error::ImageSynthesis(_))));
    assert!(!output.exists());
}
