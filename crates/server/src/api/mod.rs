pub mod handlers;
pub mod resolve;
pub mod routes;
pub mod streams;

pub use routes::create_router;
