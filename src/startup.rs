use std::net::TcpListener;

use actix_web::{dev::Server, middleware::Logger, web, App, HttpServer};
use sqlx::SqlitePool;

use crate::{
    routes::{default_route, restaurant_route, review_route, search_route},
    services::GeminiClient,
};

pub fn run(
    listener: TcpListener,
    db_pool: SqlitePool,
    gemini_client: GeminiClient,
) -> Result<Server, std::io::Error> {
    let db_pool = web::Data::new(db_pool);
    let gemini_client = web::Data::new(gemini_client);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .service(default_route::health_check)
            .service(
                web::scope("/api")
                    .service(search_route::search_restaurants)
                    .service(web::scope("/reviews").service(review_route::analyze_review))
                    .service(
                        web::scope("/restaurants")
                            .service(restaurant_route::list_restaurants)
                            .service(restaurant_route::add_restaurant)
                            .service(restaurant_route::get_restaurant),
                    ),
            )
            .app_data(db_pool.clone())
            .app_data(gemini_client.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
