use serde_json::{json, Value};

use crate::helpers::spawn_app;

#[tokio::test]
async fn added_restaurant_is_listed_with_nulls_intact() {
    let app = spawn_app(vec![]).await;

    let response = app
        .client
        .post(format!("{}/api/restaurants", app.address))
        .json(&json!({
            "store_name": "太一商店",
            "taste": 5,
            "atmosphere": 4,
            "appeal_point": "濃厚極太麺"
        }))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(201, response.status().as_u16());
    let id = response.json::<Value>().await.unwrap()["id"].as_i64().unwrap();

    let listed: Value = app
        .client
        .get(format!("{}/api/restaurants", app.address))
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .unwrap();

    assert_eq!(
        listed,
        json!([{
            "id": id,
            "store_name": "太一商店",
            "taste": 5,
            "cleanliness": null,
            "price": null,
            "atmosphere": 4,
            "appeal_point": "濃厚極太麺",
            "url": null,
            "image_path": null
        }])
    );

    let single = app
        .client
        .get(format!("{}/api/restaurants/{}", app.address, id))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(200, single.status().as_u16());
}

#[tokio::test]
async fn invalid_restaurants_are_rejected() {
    let app = spawn_app(vec![]).await;

    for (body, description) in [
        (json!({"store_name": "  "}), "blank name"),
        (json!({"taste": 3}), "missing name"),
        (json!({"store_name": "X", "price": 6}), "score above range"),
        (json!({"store_name": "X", "price": "cheap"}), "non-numeric score"),
    ] {
        let response = app
            .client
            .post(format!("{}/api/restaurants", app.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.");

        assert_eq!(
            400,
            response.status().as_u16(),
            "did not fail with 400 for {}",
            description
        );
    }
}

#[tokio::test]
async fn unknown_restaurant_is_not_found() {
    let app = spawn_app(vec![]).await;

    let response = app
        .client
        .get(format!("{}/api/restaurants/999", app.address))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(404, response.status().as_u16());
}
