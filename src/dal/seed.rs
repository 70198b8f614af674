use sqlx::SqlitePool;

use super::restaurant_db;
use crate::domain::{Axis, NewRestaurant, RatingResult, Score};

struct MockRestaurant {
    store_name: &'static str,
    taste: i64,
    cleanliness: i64,
    atmosphere: i64,
    price: i64,
    appeal_point: &'static str,
    url: &'static str,
    image_path: &'static str,
}

const MOCK_RESTAURANTS: [MockRestaurant; 4] = [
    MockRestaurant {
        store_name: "太一商店",
        taste: 5,
        cleanliness: 3,
        atmosphere: 4,
        price: 4,
        appeal_point: "濃厚極太麺",
        url: "https://taichi-shouten.com/",
        image_path: "test1.jpg",
    },
    MockRestaurant {
        store_name: "華さん食堂",
        taste: 4,
        cleanliness: 4,
        atmosphere: 3,
        price: 5,
        appeal_point: "安くておいしい定食",
        url: "https://www.hen-takeout.com/hanasansyokudou.html",
        image_path: "test2.jpg",
    },
    MockRestaurant {
        store_name: "横浜家系ラーメン 麺一家",
        taste: 3,
        cleanliness: 4,
        atmosphere: 4,
        price: 3,
        appeal_point: "鉄板チャーハンがおいしい",
        url: "https://www.tnc.co.jp/store/shop/archives/40705",
        image_path: "test3.jpg",
    },
    MockRestaurant {
        store_name: "吉利",
        taste: 5,
        cleanliness: 5,
        atmosphere: 5,
        price: 5,
        appeal_point: "美味しい中華がたくさん食べれる！",
        url: "https://kichiri.favy.jp/",
        image_path: "test4.jpg",
    },
];

impl MockRestaurant {
    fn to_new_restaurant(&self) -> Option<NewRestaurant> {
        let rating = RatingResult::default()
            .with(Axis::Taste, Score::try_from(self.taste).ok())
            .with(Axis::Cleanliness, Score::try_from(self.cleanliness).ok())
            .with(Axis::Atmosphere, Score::try_from(self.atmosphere).ok())
            .with(Axis::Price, Score::try_from(self.price).ok());

        let mut restaurant = NewRestaurant::with_rating(self.store_name, rating).ok()?;
        restaurant.appeal_point = Some(self.appeal_point.to_string());
        restaurant.url = Some(self.url.to_string());
        restaurant.image_path = Some(self.image_path.to_string());
        Some(restaurant)
    }
}

/// Inserts the sample restaurants into an empty table. Returns how many rows were added.
pub async fn seed_mock_restaurants(pool: &SqlitePool) -> Result<usize, sqlx::Error> {
    if restaurant_db::count_restaurants(pool).await? > 0 {
        log::info!("Restaurants table already populated, skipping mock data");
        return Ok(0);
    }

    let mut inserted = 0;
    for restaurant in MOCK_RESTAURANTS.iter().filter_map(MockRestaurant::to_new_restaurant) {
        let id = restaurant_db::insert_restaurant(pool, &restaurant).await?;
        log::info!("Seeded restaurant {} as id {}", restaurant.store_name(), id);
        inserted += 1;
    }

    Ok(inserted)
}
