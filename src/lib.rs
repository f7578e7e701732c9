pub mod cli_args;
pub mod error;
mod extractor;
mod middleware;
pub mod model;
mod openapi;
mod route;
pub mod server;
pub mod state;
pub mod store;

#[cfg(test)]
mod test;
