use sqlx::SqlitePool;

use crate::domain::{NewRestaurant, RatingResult, RestaurantRecord, Score};

#[derive(sqlx::FromRow)]
struct RestaurantRow {
    id: i64,
    store_name: String,
    taste: Option<i64>,
    cleanliness: Option<i64>,
    atmosphere: Option<i64>,
    price: Option<i64>,
    appeal_point: Option<String>,
    url: Option<String>,
    image_path: Option<String>,
}

fn stored_score(column: &str, value: Option<i64>) -> Result<Option<Score>, sqlx::Error> {
    value
        .map(Score::try_from)
        .transpose()
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: e.into(),
        })
}

impl TryFrom<RestaurantRow> for RestaurantRecord {
    type Error = sqlx::Error;

    fn try_from(row: RestaurantRow) -> Result<Self, Self::Error> {
        Ok(RestaurantRecord {
            id: row.id,
            store_name: row.store_name,
            rating: RatingResult {
                taste: stored_score("taste", row.taste)?,
                cleanliness: stored_score("cleanliness", row.cleanliness)?,
                price: stored_score("price", row.price)?,
                atmosphere: stored_score("atmosphere", row.atmosphere)?,
            },
            appeal_point: row.appeal_point,
            url: row.url,
            image_path: row.image_path,
        })
    }
}

pub async fn init_db(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r"
        create table if not exists restaurants (
            id integer primary key autoincrement,
            store_name text not null,
            taste integer,
            cleanliness integer,
            atmosphere integer,
            price integer,
            appeal_point text,
            url text,
            image_path text
        )
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn insert_restaurant(
    pool: &SqlitePool,
    restaurant: &NewRestaurant,
) -> Result<i64, sqlx::Error> {
    let score = |s: Option<Score>| s.map(i64::from);

    let result = sqlx::query(
        r"
        insert into restaurants
            (store_name, taste, cleanliness, atmosphere, price, appeal_point, url, image_path)
        values
            (?, ?, ?, ?, ?, ?, ?, ?)
        ",
    )
    .bind(restaurant.store_name())
    .bind(score(restaurant.rating.taste))
    .bind(score(restaurant.rating.cleanliness))
    .bind(score(restaurant.rating.atmosphere))
    .bind(score(restaurant.rating.price))
    .bind(restaurant.appeal_point.as_deref())
    .bind(restaurant.url.as_deref())
    .bind(restaurant.image_path.as_deref())
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

pub async fn get_all_restaurants(pool: &SqlitePool) -> Result<Vec<RestaurantRecord>, sqlx::Error> {
    sqlx::query_as::<_, RestaurantRow>(
        r"
        select
            id,
            store_name,
            taste,
            cleanliness,
            atmosphere,
            price,
            appeal_point,
            url,
            image_path
        from
            restaurants
        order by id
        ",
    )
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(RestaurantRecord::try_from)
    .collect()
}

pub async fn get_restaurant(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<RestaurantRecord>, sqlx::Error> {
    sqlx::query_as::<_, RestaurantRow>(
        r"
        select
            id,
            store_name,
            taste,
            cleanliness,
            atmosphere,
            price,
            appeal_point,
            url,
            image_path
        from
            restaurants
        where
            id = ?
        ",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .map(RestaurantRecord::try_from)
    .transpose()
}

pub async fn count_restaurants(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("select count(*) from restaurants")
        .fetch_one(pool)
        .await
}
