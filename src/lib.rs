//! A trie-based HTTP router with regex segments and API versioning, built on hyper.
//!
//! ```
//! use trellis::{handler, Body, HttpRouter, HttpRouterBuilder, Params, Request, Response};
//!
//! async fn hello(params: Params, _req: Request) -> anyhow::Result<Response> {
//! 	let name = params.get(":name").unwrap_or("world").to_owned();
//! 	Ok(Response::new(Body::from(format!("hello {}", name))))
//! }
//!
//! # fn main() -> Result<(), trellis::Error> {
//! let mut builder = HttpRouterBuilder::new();
//! builder.define_segment(":name", "[a-z]+")?;
//! builder.register("/hello/:name", handler(hello), Some("GET,HEAD"))?;
//! builder.register("/hello#v2", handler(hello), None)?;
//! builder.register("*", handler(hello), None)?;
//!
//! let router = HttpRouter::from(builder.build());
//! // hyper::Server::bind(&addr).serve(router)
//! # let _ = router;
//! # Ok(())
//! # }
//! ```
//!
//! Path segments are matched literally first. A `:name` segment matches any request segment its
//! registered pattern accepts, and a trailing `*` catches whatever is left when nothing more
//! specific matches. Captures are handed to the handler as [`Params`].
//!
//! A route path may end in `#version`; such routes only answer requests whose `Accept` header
//! names that version (`application/vnd.<version>`), falling back to the version-less route.
//!
//! Registration happens on a [`RouterBuilder`]; [`RouterBuilder::build`] freezes it into a
//! read-only [`Router`] that any number of threads can match against without locking.

mod dynamic;
mod error;
mod params;
mod trie;

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::*;

/// Path parsing: segment kinds, path splitting and method lists.
pub mod route;

/// Contains the core structs of the router.
///
/// Use the RouterBuilder to create a Router.
pub mod router;

pub use dynamic::DynamicSegments;
pub use error::{Error, Result};
pub use params::Params;
pub use route::{PathSegment, ALL};
pub use router::*;
pub use trie::{HandlerEntry, Node, RouteInfo};
