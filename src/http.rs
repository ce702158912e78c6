use crate::{MatchStatus, Params, Router, RouterBuilder};
use anyhow::{Error, Result};
use hyper::{
	body::HttpBody,
	header::{HeaderName, ACCEPT},
	service::Service,
	HeaderMap, StatusCode,
};
use std::{
	any::Any,
	convert::Infallible,
	future::{ready, Future, Ready},
	panic::{self, AssertUnwindSafe},
	pin::Pin,
	sync::Arc,
	task::{Context, Poll},
	time::{Duration, Instant},
};

pub use hyper;
pub use hyper::http::response::Builder as ResponseBuilder;
pub use hyper::{Body, Method};

pub type Request = hyper::Request<Body>;
pub type Response = hyper::Response<Body>;

/// The future a route handler returns.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response>> + Send>>;

/// A route handler. Captured path variables are passed in front of the request.
pub type Handler = Arc<dyn Fn(Params, Request) -> HandlerFuture + Send + Sync>;

/// Builder for routers whose routes are HTTP [`Handler`]s.
pub type HttpRouterBuilder = RouterBuilder<Handler>;

/// A function that can convert an error into a response.
pub type ErrorHandler = fn(e: Error) -> Response;

/// A function that answers a request no route accepted.
pub type NotFoundHandler = fn(req: Request) -> Response;

/// A function that answers a request whose handler panicked.
pub type PanicHandler = fn() -> Response;

/// A function that records an answered request.
pub type RequestLogger = fn(entry: &RequestLog<'_>);

/// What a [`RequestLogger`] is told about each answered request.
#[derive(Debug, Clone)]
pub struct RequestLog<'a> {
	pub method: &'a Method,
	pub path: &'a str,
	/// Version taken from the `Accept` header, empty when there was none.
	pub version: &'a str,
	pub status: StatusCode,
	/// Response body length. Only fixed-length bodies know it; streamed bodies report `None`.
	pub size: Option<u64>,
	pub elapsed: Duration,
	pub request_id: Option<&'a str>,
}

/// Wraps an async function or closure into a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
	F: Fn(Params, Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	Arc::new(move |params: Params, req: Request| -> HandlerFuture { Box::pin(f(params, req)) })
}

fn status_response(status: StatusCode, body: impl Into<Body>) -> Response {
	let mut response = Response::new(body.into());
	*response.status_mut() = status;
	response
}

fn default_error_handler(e: Error) -> Response {
	status_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

fn default_not_found_handler(_req: Request) -> Response {
	status_response(StatusCode::NOT_FOUND, Body::empty())
}

fn default_method_not_allowed_handler(_req: Request) -> Response {
	status_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

fn default_panic_handler() -> Response {
	status_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Serve-time settings of an [`HttpRouter`].
#[derive(Clone)]
pub struct HttpConfig {
	/// Log one line per request at `info` level.
	pub log_requests: bool,
	/// Header carrying a request id. When the request has it, it is echoed on the response.
	pub request_id: Option<String>,
	/// Prefix in the `Accept` header that introduces the API version.
	pub version_prefix: String,
	pub internal_error: ErrorHandler,
	pub not_found: NotFoundHandler,
	pub method_not_allowed: NotFoundHandler,
	pub panic: PanicHandler,
	/// Called once per request when `log_requests` is set. Defaults to an `info` log line.
	pub logger: RequestLogger,
}

impl Default for HttpConfig {
	fn default() -> Self {
		Self {
			log_requests: false,
			request_id: None,
			version_prefix: "application/vnd.".to_owned(),
			internal_error: default_error_handler,
			not_found: default_not_found_handler,
			method_not_allowed: default_method_not_allowed_handler,
			panic: default_panic_handler,
			logger: log_request,
		}
	}
}

/// Extracts the version following the last `prefix` in the `Accept` header, or `""`.
pub fn request_version(headers: &HeaderMap, prefix: &str) -> String {
	let accept = match headers.get(ACCEPT).and_then(|value| value.to_str().ok()) {
		Some(accept) => accept,
		None => return String::new(),
	};

	match accept.rfind(prefix) {
		Some(i) if !prefix.is_empty() => accept[i + prefix.len()..].trim().to_owned(),
		_ => String::new(),
	}
}

/// A hyper service that routes requests through a frozen [`Router`].
#[derive(Clone)]
pub struct HttpRouter {
	router: Arc<Router<Handler>>,
	config: Arc<HttpConfig>,
}

impl From<Router<Handler>> for HttpRouter {
	fn from(router: Router<Handler>) -> Self {
		Self::with_config(router, HttpConfig::default())
	}
}

impl HttpRouter {
	pub fn with_config(router: Router<Handler>, config: HttpConfig) -> Self {
		Self {
			router: Arc::new(router),
			config: Arc::new(config),
		}
	}

	pub fn router(&self) -> &Router<Handler> {
		&self.router
	}

	pub fn config(&self) -> &HttpConfig {
		&self.config
	}

	/// A per-connection service sharing this router.
	pub fn handler(&self) -> RouteHandler {
		RouteHandler {
			router: Arc::clone(&self.router),
			config: Arc::clone(&self.config),
		}
	}
}

impl<T> Service<T> for HttpRouter {
	type Response = RouteHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(self.handler()))
	}
}

/// Routes the requests of one connection.
pub struct RouteHandler {
	router: Arc<Router<Handler>>,
	config: Arc<HttpConfig>,
}

impl Service<Request> for RouteHandler {
	type Response = Response;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, req: Request) -> Self::Future {
		let started = Instant::now();
		let config = Arc::clone(&self.config);
		let method = req.method().clone();
		let path = req.uri().path().to_owned();
		let version = request_version(req.headers(), &config.version_prefix);
		let request_id = config.request_id.as_deref().and_then(|name| {
			let value = req.headers().get(name)?.clone();
			Some((HeaderName::from_bytes(name.as_bytes()).ok()?, value))
		});

		let found = self.router.find(&path, method.as_str(), &version);
		let status = found.status;
		let response: Pin<Box<dyn Future<Output = Response> + Send>> = match found.handler {
			Some(route) => dispatch(route, found.params, req, &config),
			None if status == MatchStatus::MethodNotAllowed => {
				Box::pin(ready((config.method_not_allowed)(req)))
			}
			None => Box::pin(ready((config.not_found)(req))),
		};

		Box::pin(async move {
			let mut response = response.await;
			if let Some((name, value)) = request_id.clone() {
				response.headers_mut().insert(name, value);
			}

			if config.log_requests {
				(config.logger)(&RequestLog {
					method: &method,
					path: &path,
					version: &version,
					status: response.status(),
					size: response.body().size_hint().exact(),
					elapsed: started.elapsed(),
					request_id: request_id.as_ref().and_then(|(_, value)| value.to_str().ok()),
				});
			}
			Ok(response)
		})
	}
}

fn dispatch(
	route: &Handler,
	params: Params,
	req: Request,
	config: &HttpConfig,
) -> Pin<Box<dyn Future<Output = Response> + Send>> {
	let internal_error = config.internal_error;
	let on_panic = config.panic;

	let fut = match panic::catch_unwind(AssertUnwindSafe(|| route(params, req))) {
		Ok(fut) => fut,
		Err(payload) => {
			log::error!("handler panicked: {}", panic_message(&*payload));
			return Box::pin(ready(on_panic()));
		}
	};

	Box::pin(async move {
		match (CatchPanic { inner: fut }).await {
			Ok(Ok(response)) => response,
			Ok(Err(e)) => internal_error(e),
			Err(payload) => {
				log::error!("handler panicked: {}", panic_message(&*payload));
				on_panic()
			}
		}
	})
}

/// Turns a panic while polling the handler future into an `Err`.
struct CatchPanic {
	inner: HandlerFuture,
}

impl Future for CatchPanic {
	type Output = std::thread::Result<Result<Response>>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		let inner = &mut self.inner;
		match panic::catch_unwind(AssertUnwindSafe(|| inner.as_mut().poll(cx))) {
			Ok(Poll::Pending) => Poll::Pending,
			Ok(Poll::Ready(result)) => Poll::Ready(Ok(result)),
			Err(payload) => Poll::Ready(Err(payload)),
		}
	}
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(message) = payload.downcast_ref::<&str>() {
		*message
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.as_str()
	} else {
		"unknown panic"
	}
}

/// The default [`RequestLogger`]: `method path version status size elapsed request-id`,
/// with `-` for anything unknown.
pub fn log_request(entry: &RequestLog<'_>) {
	let size = entry
		.size
		.map_or_else(|| "-".to_owned(), |size| size.to_string());

	log::info!(
		"{} {} {} {} {} {:?} {}",
		entry.method,
		entry.path,
		if entry.version.is_empty() { "-" } else { entry.version },
		entry.status.as_u16(),
		size,
		entry.elapsed,
		entry.request_id.unwrap_or("-"),
	);
}
