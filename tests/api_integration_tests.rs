// API Integration Tests
//
// Purpose: Drive the full router (multipart upload -> detection -> rendered page)
// with a fixed-result detector, so no model file is needed.
// Run with: cargo test --test api_integration_tests

#[cfg(feature = "api")]
mod api_tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use cotton_guide::{create_router, AppConfig, AppState, StaticDetector};
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use serde_json::Value;
    use std::io::Cursor;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt; // for oneshot

    const BOUNDARY: &str = "cotton-test-boundary";

    fn test_config() -> AppConfig {
        AppConfig {
            background_image: PathBuf::from("/nonexistent/cotton_bg.jpg"),
            ..AppConfig::default()
        }
    }

    // Helper: Create router around a fixed-result detector
    fn create_test_app(detector: StaticDetector) -> axum::Router {
        create_test_app_with_config(detector, test_config())
    }

    fn create_test_app_with_config(detector: StaticDetector, config: AppConfig) -> axum::Router {
        let state = AppState::with_detector(config, Arc::new(detector));
        create_router(state)
    }

    fn png_bytes() -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(48, 32, Rgb([245, 245, 235])));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    // Helper: multipart/form-data body with one file part
    fn multipart_body(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    // Helper: Read response body as text
    async fn text_response(response: axum::response::Response) -> String {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        String::from_utf8(body.to_vec()).expect("Response is not UTF-8")
    }

    async fn post_png(detector: StaticDetector) -> (StatusCode, String) {
        let app = create_test_app(detector);
        let body = multipart_body("image", "plant.png", "image/png", &png_bytes());
        let response = app.oneshot(upload_request(body)).await.unwrap();
        let status = response.status();
        (status, text_response(response).await)
    }

    // =========================================================================
    // Section 1: Health Check
    // =========================================================================

    #[tokio::test]
    async fn test_health_check() {
        let app = create_test_app(StaticDetector::empty());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert!(json["timestamp"].is_string());
    }

    // =========================================================================
    // Section 2: Upload Page
    // =========================================================================

    #[tokio::test]
    async fn test_home_page_has_upload_form() {
        let app = create_test_app(StaticDetector::empty());

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = text_response(response).await;
        assert!(html.contains("Cotton Species Detection for Farmers"));
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(html.contains("name=\"image\""));
        assert!(html.contains("accept=\".jpg,.jpeg,.png\""));
        // No results before an upload
        assert!(!html.contains("class=\"results\""));
        // Missing background falls back to the gradient
        assert!(html.contains("linear-gradient"));
    }

    // =========================================================================
    // Section 3: Detection Results
    // =========================================================================

    #[tokio::test]
    async fn test_detected_species_renders_all_cards() {
        let (status, html) = post_png(StaticDetector::with_labels([("G-hirsutum", 0.91)])).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("data:image/png;base64,"), "uploaded image missing");
        assert!(html.contains("data:image/jpeg;base64,"), "annotated image missing");
        assert!(html.contains("Detected Cotton Species"));

        assert!(html.contains("data-species=\"G-hirsutum\""));
        assert!(html.contains("Gossypium hirsutum (Upland Cotton)"));
        assert!(html.contains("Central America"));

        assert!(html.contains("G-hirsutum Crop Calendar"));
        assert!(html.contains("January"));
        assert!(html.contains("December"));

        assert!(html.contains("Fact about Cotton"));
    }

    #[tokio::test]
    async fn test_highest_confidence_species_is_shown() {
        let detector = StaticDetector::with_labels([("G-arboreum", 0.42), ("G-barbadense", 0.88)]);
        let (_, html) = post_png(detector).await;

        assert!(html.contains("data-species=\"G-barbadense\""));
        assert!(!html.contains("data-species=\"G-arboreum\""));
    }

    #[tokio::test]
    async fn test_no_detections_renders_warning() {
        let (status, html) = post_png(StaticDetector::empty()).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Could not identify the cotton species"));
        assert!(html.contains("class=\"card notice-warning\""));
        assert!(!html.contains("Fact about Cotton"));
    }

    #[tokio::test]
    async fn test_unknown_label_renders_warning() {
        let (status, html) = post_png(StaticDetector::with_labels([("G-mystery", 0.7)])).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("G-mystery"));
        assert!(html.contains("class=\"card notice-warning\""));
        assert!(!html.contains("species-card"));
    }

    // =========================================================================
    // Section 4: Failures Still Render The Page
    // =========================================================================

    #[tokio::test]
    async fn test_unsupported_file_renders_failure_notice() {
        let app = create_test_app(StaticDetector::with_labels([("G-hirsutum", 0.9)]));
        let body = multipart_body("image", "notes.txt", "text/plain", b"just some text");

        let response = app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = text_response(response).await;
        assert!(html.contains("Could not process image"));
        assert!(html.contains("class=\"card notice-warning\""));
        assert!(!html.contains("species-card"));
    }

    #[tokio::test]
    async fn test_detector_failure_renders_failure_notice() {
        let (status, html) = post_png(StaticDetector::failing("model exploded")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Could not process image"));
        // The uploaded image is still shown
        assert!(html.contains("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_missing_image_field_renders_notice() {
        let app = create_test_app(StaticDetector::empty());
        let body = multipart_body("attachment", "plant.png", "image/png", &png_bytes());

        let response = app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = text_response(response).await;
        assert!(html.contains("No image uploaded"));
    }

    #[tokio::test]
    async fn test_non_multipart_post_renders_failure_notice() {
        let app = create_test_app(StaticDetector::with_labels([("G-hirsutum", 0.9)]));
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("image=abc"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = text_response(response).await;
        assert!(html.contains("Could not process image"));
        assert!(html.contains("class=\"card notice-warning\""));
        // The form is still there to retry
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(!html.contains("species-card"));
    }

    #[tokio::test]
    async fn test_oversized_upload_renders_failure_notice() {
        let config = AppConfig {
            max_upload_bytes: 256,
            ..test_config()
        };
        let app = create_test_app_with_config(StaticDetector::empty(), config);
        let body = multipart_body("image", "big.png", "image/png", &vec![0u8; 4096]);

        let response = app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = text_response(response).await;
        assert!(html.contains("Could not process image"));
    }
}
