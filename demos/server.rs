use trellis::{
	handler,
	hyper::{Body, Server},
	HttpConfig, HttpRouter, HttpRouterBuilder, Params, Request, Response,
};

async fn catch_all(params: Params, _req: Request) -> anyhow::Result<Response> {
	let rest = params.get("*").unwrap_or_default().to_owned();
	Ok(Response::new(Body::from(format!("caught {}\n", rest))))
}

async fn hello(_params: Params, req: Request) -> anyhow::Result<Response> {
	Ok(Response::new(Body::from(format!("hello from {}\n", req.uri().path()))))
}

async fn hello_v2(_params: Params, _req: Request) -> anyhow::Result<Response> {
	Ok(Response::new(Body::from("hello, version 2\n")))
}

async fn item(params: Params, _req: Request) -> anyhow::Result<Response> {
	dbg!(&params);
	let uuid = params.get(":uuid").unwrap_or_default().to_owned();
	Ok(Response::new(Body::from(format!("item {}\n", uuid))))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let addr = ([127, 0, 0, 1], 8080).into();

	let mut builder = HttpRouterBuilder::new();
	builder
		.define_segment(
			":uuid",
			"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
		)?
		.register("*", handler(catch_all), None)?
		.register("/hello", handler(hello), Some("GET,HEAD"))?
		.register("/hello#v2", handler(hello_v2), Some("GET"))?
		.register("/root/:uuid/item", handler(item), Some("POST,PUT"))?;

	let router = HttpRouter::with_config(
		builder.build(),
		HttpConfig {
			log_requests: true,
			request_id: Some("X-Request-Id".to_owned()),
			..HttpConfig::default()
		},
	);

	let server = Server::bind(&addr).serve(router);
	log::info!("Listening on http://{}", addr);

	server.await?;
	Ok(())
}
