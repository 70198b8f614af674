use actix_web::{get, http::StatusCode, post, web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;

use super::error_body;
use crate::{
    dal::restaurant_db,
    domain::{NewRestaurant, RatingResult},
};

#[derive(Deserialize)]
struct NewRestaurantBody {
    store_name: String,
    #[serde(flatten)]
    rating: RatingResult,
    appeal_point: Option<String>,
    url: Option<String>,
    image_path: Option<String>,
}

#[get("")]
pub async fn list_restaurants(pool: web::Data<SqlitePool>) -> HttpResponse {
    match restaurant_db::get_all_restaurants(&pool).await {
        Ok(restaurants) => HttpResponse::Ok().json(restaurants),
        Err(e) => {
            log::error!("Failed to read restaurants: {:?}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "failed to read restaurants".into())
        }
    }
}

#[get("/{id}")]
pub async fn get_restaurant(pool: web::Data<SqlitePool>, id: web::Path<i64>) -> HttpResponse {
    match restaurant_db::get_restaurant(&pool, id.into_inner()).await {
        Ok(Some(restaurant)) => HttpResponse::Ok().json(restaurant),
        Ok(None) => error_body(StatusCode::NOT_FOUND, "restaurant not found".into()),
        Err(e) => {
            log::error!("Failed to read restaurant: {:?}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "failed to read restaurant".into())
        }
    }
}

#[post("")]
pub async fn add_restaurant(
    pool: web::Data<SqlitePool>,
    body: web::Json<NewRestaurantBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let mut restaurant = match NewRestaurant::with_rating(&body.store_name, body.rating) {
        Ok(r) => r,
        Err(e) => return error_body(StatusCode::BAD_REQUEST, e.to_string()),
    };
    restaurant.appeal_point = body.appeal_point;
    restaurant.url = body.url;
    restaurant.image_path = body.image_path;

    match restaurant_db::insert_restaurant(&pool, &restaurant).await {
        Ok(id) => HttpResponse::Created().json(json!({ "id": id })),
        Err(e) => {
            log::error!("Failed to insert restaurant: {:?}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "failed to store restaurant".into())
        }
    }
}
