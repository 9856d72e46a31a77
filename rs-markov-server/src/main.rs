use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware, web};
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use rs_markov_core::{Error, GenerationInput, Generator, ModelConfig, UnseenSeedPolicy};

/// Command line arguments, each one overriding the config file.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// TOML file with `[model]` and `[listen]` tables
	#[arg(long, short, value_name = "FILE")]
	config: Option<PathBuf>,
	/// UTF-8 corpus file
	#[arg(long, value_name = "FILE")]
	corpus: Option<PathBuf>,
	#[arg(long)]
	max_order: Option<usize>,
	/// Front-matter lines dropped from the corpus
	#[arg(long)]
	skip_lines: Option<usize>,
	/// Strip `. , ! ? ;` instead of keeping them as tokens
	#[arg(long)]
	no_punctuation: bool,
	#[arg(long, short)]
	ip: Option<IpAddr>,
	#[arg(long, short)]
	port: Option<u16>,
}

/// Content of the `--config` file.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
struct Config {
	corpus: Option<PathBuf>,
	model: ModelConfig,
	listen: Listen,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
struct Listen {
	ip: IpAddr,
	port: u16,
}

impl Default for Listen {
	fn default() -> Self {
		Self { ip: IpAddr::V4(Ipv4Addr::LOCALHOST), port: 5000 }
	}
}

impl Config {
	fn load(path: &Path) -> anyhow::Result<Self> {
		let contents = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
		toml::from_str(&contents).with_context(|| format!("parsing config {}", path.display()))
	}

	/// Applies the command line on top of the file.
	fn merge(mut self, args: &Args) -> Self {
		if let Some(corpus) = &args.corpus {
			self.corpus = Some(corpus.clone());
		}
		if let Some(max_order) = args.max_order {
			self.model.max_order = max_order;
		}
		if let Some(skip_lines) = args.skip_lines {
			self.model.skip_prefix_lines = skip_lines;
		}
		if args.no_punctuation {
			self.model.keep_punctuation = false;
		}
		if let Some(ip) = args.ip {
			self.listen.ip = ip;
		}
		if let Some(port) = args.port {
			self.listen.port = port;
		}
		self
	}
}

/// Query parameters of the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	seed: Option<String>,
	length: Option<usize>,
	temperature: Option<f64>,
	alpha: Option<f64>,
	policy: Option<UnseenSeedPolicy>,
}

impl GenerateParams {
	/// Builds a validated input, missing values falling back to the defaults.
	fn input(&self) -> Result<GenerationInput, Error> {
		let mut input = GenerationInput::default();
		if let Some(length) = self.length {
			input.set_length(length)?;
		}
		if let Some(temperature) = self.temperature {
			input.set_temperature(temperature)?;
		}
		if let Some(alpha) = self.alpha {
			input.set_alpha(alpha)?;
		}
		if let Some(policy) = self.policy {
			input.unseen_seed = policy;
		}
		Ok(input)
	}
}

/// Query parameters of the `/v1/transitions` endpoint
#[derive(Deserialize)]
struct TransitionParams {
	history: String,
	top_n: Option<usize>,
	alpha: Option<f64>,
}

/// Maps core errors onto HTTP statuses.
fn error_response(err: Error) -> HttpResponse {
	match err {
		Error::InvalidParameter(_) | Error::UnseenSeed(_) => HttpResponse::BadRequest().body(err.to_string()),
		_ => HttpResponse::InternalServerError().body(err.to_string()),
	}
}

/// HTTP GET endpoint `/v1/generate`
///
/// Continues the `seed` phrase and returns the whole text as the response body.
#[get("/v1/generate")]
async fn get_generated(generator: web::Data<Generator>, query: web::Query<GenerateParams>) -> impl Responder {
	let input = match query.input() {
		Ok(input) => input,
		Err(e) => return error_response(e),
	};
	let seed = query.seed.as_deref().unwrap_or("millet");

	match generator.predict(seed, &input) {
		Ok(result) => HttpResponse::Ok().body(result),
		Err(e) => error_response(e),
	}
}

/// HTTP GET endpoint `/v1/transitions`
///
/// Returns the most probable next tokens after `history` as JSON.
#[get("/v1/transitions")]
async fn get_transitions(generator: web::Data<Generator>, query: web::Query<TransitionParams>) -> impl Responder {
	let top_n = query.top_n.unwrap_or(10);
	let alpha = query.alpha.unwrap_or(0.01);

	match generator.top_transitions(&query.history, top_n, alpha) {
		Ok(transitions) => HttpResponse::Ok().json(transitions),
		Err(e) => error_response(e),
	}
}

#[get("/v1/stats")]
async fn get_stats(generator: web::Data<Generator>) -> impl Responder {
	HttpResponse::Ok().json(generator.stats())
}

fn routes(cfg: &mut web::ServiceConfig) {
	cfg.service(get_generated).service(get_transitions).service(get_stats);
}

/// Main entry point for the server.
///
/// Builds the generator once from the corpus and shares it read-only
/// between the Actix-web workers.
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

	let args = Args::parse();
	let config = match &args.config {
		Some(path) => {
			log::info!("reading config {}...", path.display());
			Config::load(path)?
		}
		None => Config::default(),
	}
	.merge(&args);

	let corpus = config.corpus.clone().context("no corpus given (use --corpus or `corpus` in the config file)")?;
	let generator = Generator::from_file(&corpus, &config.model).context("loading model failed")?;
	let generator = web::Data::new(generator);

	log::info!("listening on {}:{}", config.listen.ip, config.listen.port);
	HttpServer::new(move || {
		App::new()
			.wrap(middleware::Logger::default())
			.wrap(Cors::permissive())
			.app_data(generator.clone())
			.configure(routes)
	})
		.bind((config.listen.ip, config.listen.port))?
		.run()
		.await?;

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::http::StatusCode;
	use actix_web::test as actix_test;
	use rs_markov_core::Transition;

	fn generator() -> web::Data<Generator> {
		let config = ModelConfig { max_order: 1, skip_prefix_lines: 0, keep_punctuation: false };
		web::Data::new(Generator::from_text("millet ve ordu millet ve devlet", &config).unwrap())
	}

	#[actix_web::test]
	async fn test_generate_zero_length() {
		let app = actix_test::init_service(App::new().app_data(generator()).configure(routes)).await;
		let req = actix_test::TestRequest::get().uri("/v1/generate?seed=Millet&length=0").to_request();
		let body = actix_test::call_and_read_body(&app, req).await;
		assert_eq!(body, "millet");
	}

	#[actix_web::test]
	async fn test_generate_rejects_bad_temperature() {
		let app = actix_test::init_service(App::new().app_data(generator()).configure(routes)).await;
		let req = actix_test::TestRequest::get().uri("/v1/generate?seed=millet&temperature=0").to_request();
		let resp = actix_test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_generate_rejects_unseen_seed() {
		let app = actix_test::init_service(App::new().app_data(generator()).configure(routes)).await;
		let req = actix_test::TestRequest::get().uri("/v1/generate?seed=yok&policy=reject").to_request();
		let resp = actix_test::call_service(&app, req).await;
		assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	}

	#[actix_web::test]
	async fn test_transitions() {
		let app = actix_test::init_service(App::new().app_data(generator()).configure(routes)).await;
		let req = actix_test::TestRequest::get().uri("/v1/transitions?history=millet&top_n=1&alpha=0.001").to_request();
		let transitions: Vec<Transition> = actix_test::call_and_read_body_json(&app, req).await;
		assert_eq!(transitions.len(), 1);
		assert_eq!(transitions[0].token, "ve");
		assert!(transitions[0].probability > 0.9);
	}

	#[test]
	fn test_config_merge() {
		let config: Config = toml::from_str(
			r#"
			corpus = "data/nutuk.txt"
			[model]
			max_order = 3
			[listen]
			port = 8080
			"#,
		)
		.unwrap();
		let args = Args::parse_from(["rs-markov-server", "--skip-lines", "282", "--no-punctuation"]);
		let config = config.merge(&args);

		assert_eq!(config.corpus, Some(PathBuf::from("data/nutuk.txt")));
		assert_eq!(config.model.max_order, 3);
		assert_eq!(config.model.skip_prefix_lines, 282);
		assert!(!config.model.keep_punctuation);
		assert_eq!(config.listen.port, 8080);
		assert_eq!(config.listen.ip, IpAddr::V4(Ipv4Addr::LOCALHOST));
	}
}
