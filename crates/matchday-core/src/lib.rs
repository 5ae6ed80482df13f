// Library root: league data model, fetch pipeline, standings table and the
// async orchestrator, shared by the terminal front end and integration tests.

pub mod api;
pub mod app;
pub mod config;
pub mod model;
pub mod pipeline;
pub mod protocol;
pub mod table;
