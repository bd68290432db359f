//! Product-intake flow integration tests.

#![allow(clippy::unwrap_used)]

use serde_json::{Value, json};

use techmart_integration_tests::{StubPlatform, client, spawn_inventory};

async fn setup() -> (StubPlatform, String, reqwest::Client) {
    let platform = StubPlatform::new();
    let platform_url = platform.spawn().await;
    let console = spawn_inventory(&platform_url).await;
    (platform, console, client())
}

fn product_fields() -> Value {
    json!({
        "productName": "Aspire Vero 16",
        "category": "laptop",
        "quantity": 12,
        "price": 385000,
        "processor": "Core Ultra 7",
        "os": "Windows 11",
        "graphics": "Intel Arc",
        "storage": "1TB NVMe",
    })
}

async fn upload_image(client: &reqwest::Client, console: &str) -> Value {
    let part = reqwest::multipart::Part::bytes(vec![0x89, 0x50, 0x4e, 0x47])
        .file_name("product.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    client
        .post(format!("{console}/products/image"))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn submit(client: &reqwest::Client, console: &str, fields: &Value) -> Value {
    client
        .post(format!("{console}/products"))
        .json(fields)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn submission_without_image_makes_no_network_call() {
    let (platform, console, client) = setup().await;

    let body = submit(&client, &console, &product_fields()).await;

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["status"], json!("missing_image"));
    assert_eq!(body["message"], json!("Please upload an image"));
    assert!(platform.requests().is_empty());
}

#[tokio::test]
async fn upload_then_submit_creates_the_product() {
    let (platform, console, client) = setup().await;

    let upload = upload_image(&client, &console).await;
    assert_eq!(upload["success"], json!(true));
    assert_eq!(upload["preview"], json!("data:image/png;base64,iVBORw=="));

    let body = submit(&client, &console, &product_fields()).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["status"], json!("created"));
    assert_eq!(body["message"], json!("Product added successfully"));
    assert_eq!(body["redirect"], json!("/dashboard/products/list"));

    assert_eq!(platform.calls_to("/products"), 1);
    let product = platform.last_body("/products").unwrap();
    assert_eq!(product["productName"], json!("Aspire Vero 16"));
    assert_eq!(product["quantity"], json!(12.0));
    assert_eq!(product["image"], json!("data:image/png;base64,iVBORw=="));

    // The pending image is consumed by the successful submission.
    let body = submit(&client, &console, &product_fields()).await;
    assert_eq!(body["status"], json!("missing_image"));
    assert_eq!(platform.calls_to("/products"), 1);
}

#[tokio::test]
async fn a_new_upload_replaces_the_pending_image() {
    let (platform, console, client) = setup().await;

    upload_image(&client, &console).await;

    // Second upload with different bytes replaces the first.
    let part = reqwest::multipart::Part::bytes(b"GIF89a".to_vec())
        .file_name("product.gif")
        .mime_str("image/gif")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);
    let upload: Value = client
        .post(format!("{console}/products/image"))
        .multipart(form)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(upload["preview"], json!("data:image/gif;base64,R0lGODlh"));

    submit(&client, &console, &product_fields()).await;
    let product = platform.last_body("/products").unwrap();
    assert_eq!(product["image"], json!("data:image/gif;base64,R0lGODlh"));
}

#[tokio::test]
async fn negative_quantity_and_price_are_rejected_before_any_call() {
    let (platform, console, client) = setup().await;
    upload_image(&client, &console).await;

    let mut fields = product_fields();
    fields["quantity"] = json!(-1);
    fields["price"] = json!(-1);

    let body = submit(&client, &console, &fields).await;
    assert_eq!(body["status"], json!("rejected"));
    assert_eq!(
        body["errors"]["quantity"],
        json!("Quantity cannot be a negative number")
    );
    assert_eq!(
        body["errors"]["price"],
        json!("Price cannot be a negative number")
    );

    assert_eq!(platform.calls_to("/products"), 0);
}

#[tokio::test]
async fn missing_fields_render_schema_messages() {
    let (platform, console, client) = setup().await;

    let body = submit(&client, &console, &json!({})).await;
    assert_eq!(body["status"], json!("rejected"));
    assert_eq!(body["errors"]["productName"], json!("Product name is required"));
    assert_eq!(body["errors"]["quantity"], json!("Quantity is required"));
    assert_eq!(body["errors"]["storage"], json!("Storage is required"));

    assert!(platform.requests().is_empty());
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let (platform, console, client) = setup().await;
    platform.set_product_response(409, Some(json!({ "message": "Product already exists" })));
    upload_image(&client, &console).await;

    let body = submit(&client, &console, &product_fields()).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["status"], json!("failed"));
    assert_eq!(body["message"], json!("Product already exists"));
}

#[tokio::test]
async fn error_without_message_body_falls_back_gracefully() {
    let (platform, console, client) = setup().await;
    platform.set_product_response(500, None);
    upload_image(&client, &console).await;

    let body = submit(&client, &console, &product_fields()).await;
    assert_eq!(body["status"], json!("failed"));
    assert_eq!(body["message"], json!("Failed to add product"));
}

#[tokio::test]
async fn non_created_success_status_is_not_a_creation() {
    let (platform, console, client) = setup().await;
    platform.set_product_response(200, None);
    upload_image(&client, &console).await;

    // Creation is signalled by 201 specifically.
    let body = submit(&client, &console, &product_fields()).await;
    assert_eq!(body["status"], json!("failed"));
    assert_eq!(body["message"], json!("Failed to add product"));
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let (_platform, console, client) = setup().await;

    let part = reqwest::multipart::Part::bytes(b"%PDF-1.4".to_vec())
        .file_name("spec.pdf")
        .mime_str("application/pdf")
        .unwrap();
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = client
        .post(format!("{console}/products/image"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
}
