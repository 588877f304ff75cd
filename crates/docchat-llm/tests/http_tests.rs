//! Provider behaviour against a scripted local HTTP server

use docchat_domain::{Embedder, EmbeddingError, GenerationError, LlmProvider};
use docchat_llm::{GroqProvider, HttpSettings, OllamaEmbedder, OllamaProvider};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Requests seen by the fake server, raw (headers and body)
type Seen = Arc<Mutex<Vec<String>>>;

/// Serve one canned response per connection, in order, then stop accepting
async fn serve(responses: Vec<(u16, &'static str)>) -> (String, Seen) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    tokio::spawn(async move {
        for (status, body) in responses {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            log.lock().unwrap().push(request);

            let reply = format!(
                "HTTP/1.1 {} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
        }
    });

    (format!("http://{}", addr), seen)
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

fn fast() -> HttpSettings {
    HttpSettings::default()
        .with_timeout(Duration::from_secs(5))
        .with_base_delay(Duration::ZERO)
}

#[tokio::test]
async fn test_ollama_retries_server_error_then_succeeds() {
    let (endpoint, seen) = serve(vec![
        (500, r#"{"error":"loading model"}"#),
        (200, r#"{"response":"SAM is a segmentation model.","done":true}"#),
    ])
    .await;

    let provider = OllamaProvider::new(endpoint, "llama3.1", fast()).unwrap();
    let answer = provider.generate("What is SAM?").await.unwrap();

    assert_eq!(answer, "SAM is a segmentation model.");
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen[1].starts_with("POST /api/generate"));
    assert!(seen[1].contains(r#""stream":false"#));
}

#[tokio::test]
async fn test_ollama_missing_model() {
    let (endpoint, _) = serve(vec![(404, r#"{"error":"model 'nope' not found"}"#)]).await;

    let provider = OllamaProvider::new(endpoint, "nope", fast()).unwrap();
    let result = provider.generate("hi").await;

    assert_eq!(result.unwrap_err(), GenerationError::ModelNotAvailable("nope".into()));
}

#[tokio::test]
async fn test_groq_sends_bearer_and_parses_choice() {
    let (endpoint, seen) = serve(vec![(
        200,
        r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"I don't know."}}]}"#,
    )])
    .await;

    let provider = GroqProvider::new(Some("gsk_test".into()), "llama-3.1-8b-instant", fast())
        .unwrap()
        .with_endpoint(endpoint);
    let answer = provider.generate("prompt text").await.unwrap();

    assert_eq!(answer, "I don't know.");
    let seen = seen.lock().unwrap();
    let request = &seen[0];
    assert!(request.starts_with("POST /chat/completions"));
    assert!(request.to_lowercase().contains("authorization: bearer gsk_test"));
    assert!(request.contains(r#""role":"user""#));
    assert!(request.contains(r#""content":"prompt text""#));
}

#[tokio::test]
async fn test_groq_rate_limit_not_retried() {
    let (endpoint, seen) = serve(vec![
        (429, r#"{"error":{"message":"Rate limit reached"}}"#),
        (200, r#"{"choices":[]}"#),
    ])
    .await;

    let provider = GroqProvider::new(Some("gsk_test".into()), "llama-3.1-8b-instant", fast())
        .unwrap()
        .with_endpoint(endpoint);
    let result = provider.generate("prompt").await;

    assert_eq!(result.unwrap_err(), GenerationError::RateLimitExceeded);
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_groq_empty_choices_is_invalid() {
    let (endpoint, _) = serve(vec![(200, r#"{"choices":[]}"#)]).await;

    let provider = GroqProvider::new(Some("gsk_test".into()), "llama-3.1-8b-instant", fast())
        .unwrap()
        .with_endpoint(endpoint);

    assert!(matches!(
        provider.generate("prompt").await,
        Err(GenerationError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_embedder_returns_vector() {
    let (endpoint, seen) = serve(vec![(200, r#"{"embedding":[0.1,0.2,0.3]}"#)]).await;

    let embedder = OllamaEmbedder::new(endpoint, "all-minilm", 3, fast()).unwrap();
    let vector = embedder.embed("hello").await.unwrap();

    assert_eq!(vector, vec![0.1, 0.2, 0.3]);
    assert!(seen.lock().unwrap()[0].starts_with("POST /api/embeddings"));
}

#[tokio::test]
async fn test_embedder_rejects_wrong_dimension() {
    let (endpoint, _) = serve(vec![(200, r#"{"embedding":[0.1,0.2,0.3]}"#)]).await;

    let embedder = OllamaEmbedder::new(endpoint, "all-minilm", 4, fast()).unwrap();
    let result = embedder.embed("hello").await;

    assert_eq!(
        result.unwrap_err(),
        EmbeddingError::DimensionMismatch { expected: 4, actual: 3 }
    );
}
