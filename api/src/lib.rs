pub mod auth;
pub mod checkin;
pub mod response;
pub mod routes;
