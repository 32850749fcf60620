pub mod routes;
pub mod site;

pub use routes::create_router;
pub use site::SiteState;
