use heart_client::{PredictionClient, PredictionRequest, Predictor, TransportError};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

fn sample_request() -> PredictionRequest {
    PredictionRequest {
        height_in_meters: 1.8,
        weight_in_kilograms: 81.0,
        physical_health_days: 30,
        mental_health_days: 0,
        sleep_hours: 8,
        sex: String::from("Female"),
        age_category: String::from("Age 80 or older"),
        race_ethnicity_category: String::from("Hispanic"),
        general_health: String::from("Fair"),
        smoker_status: String::from("Former smoker"),
        e_cigarette_usage: String::from("Use e-cigarettes some days"),
        alcohol_drinkers: true,
        had_diabetes: true,
        had_skin_cancer: false,
        had_kidney_disease: false,
        high_risk_last_year: false,
    }
}

async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf: Vec<u8> = vec![];
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf).to_string();
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .filter_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.trim().eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .next()
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8_lossy(&buf).to_string()
}

/// Accepts a single connection, answers it with the given status line and
/// body and hands back the raw request text.
async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status_line,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });
    (format!("http://{}/", addr), handle)
}

#[tokio::test]
async fn posts_json_payload_to_predict_path() {
    let (base_url, server) = serve_once("200 OK", r#"{"Prediction": "Heart Disease"}"#).await;
    let mut client = PredictionClient::new(&base_url).unwrap();

    let response = client.predict(&sample_request()).await.unwrap();
    assert_eq!(response.prediction, "Heart Disease");

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /predict HTTP/1.1\r\n"), "{}", raw);

    let (_, body) = raw.split_once("\r\n\r\n").unwrap();
    let body: Value = serde_json::from_str(body).unwrap();
    assert_eq!(body["PhysicalHealthDays"], 30);
    assert_eq!(body["MentalHealthDays"], 0);
    assert_eq!(body["HeightInMeters"], 1.8);
    assert_eq!(body["AlcoholDrinkers"], true);
    assert_eq!(body["ECigaretteUsage"], "Use e-cigarettes some days");
    assert_eq!(body.as_object().unwrap().len(), 16);
}

#[tokio::test]
async fn keeps_last_response_text() {
    let body = r#"{"Prediction": "No Heart Disease", "Probability": 0.07}"#;
    let (base_url, server) = serve_once("200 OK", body).await;
    let mut client = PredictionClient::new(&base_url).unwrap();

    client.predict(&sample_request()).await.unwrap();
    server.await.unwrap();

    assert_eq!(client.get_last_resp_text(), body);
    assert!(client.get_last_resp_url().ends_with("/predict"));
}

#[tokio::test]
async fn malformed_body_is_a_transport_error() {
    let (base_url, server) = serve_once("200 OK", "<html>sleeping</html>").await;
    let mut client = PredictionClient::new(&base_url).unwrap();

    let result = client.predict(&sample_request()).await;
    server.await.unwrap();

    assert!(matches!(result, Err(TransportError::Malformed(_))));
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let (base_url, server) = serve_once("503 Service Unavailable", r#"{"detail": "down"}"#).await;
    let mut client = PredictionClient::new(&base_url).unwrap();

    let result = client.predict(&sample_request()).await;
    server.await.unwrap();

    match result {
        Err(TransportError::Status { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("down"));
        }
        other => panic!("expected a status error, got {:?}", other),
    }
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // grab a free port and release it so nothing is listening there
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut client = PredictionClient::new(&format!("http://127.0.0.1:{}", port)).unwrap();

    let result = client.predict(&sample_request()).await;
    assert!(matches!(result, Err(TransportError::Request(_))));
}
