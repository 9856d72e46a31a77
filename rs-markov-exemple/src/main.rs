use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use rs_markov_core::{GenerationInput, Generator, ModelConfig, UnseenSeedPolicy};

/// Generates text from a corpus and shows what the model expects next.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// UTF-8 corpus file
	#[arg(long, default_value = "./data/NUTUK_1.txt")]
	corpus: PathBuf,
	/// Longest history used by the model
	#[arg(long, default_value_t = 2)]
	max_order: usize,
	/// Front-matter lines dropped from the corpus
	#[arg(long, default_value_t = 282)]
	skip_lines: usize,
	/// Strip `. , ! ? ;` instead of keeping them as tokens
	#[arg(long)]
	no_punctuation: bool,
	#[arg(long, short, default_value = "Millet ve")]
	seed_phrase: String,
	/// Number of generated tokens (0..=100)
	#[arg(long, short, default_value_t = 20)]
	length: usize,
	#[arg(long, short, default_value_t = 1.0)]
	temperature: f64,
	/// Additive smoothing constant
	#[arg(long, short, default_value_t = 0.01)]
	alpha: f64,
	/// Number of next-token candidates to print
	#[arg(long, default_value_t = 10)]
	top_n: usize,
	/// Seed of the random generator, for reproducible runs
	#[arg(long)]
	rng_seed: Option<u64>,
	/// Fail instead of picking a random start when the seed is unknown
	#[arg(long)]
	reject_unseen: bool,
}

fn main() -> anyhow::Result<()> {
	env_logger::init();
	let args = Args::parse();

	// Load and train the model once
	let config = ModelConfig {
		max_order: args.max_order,
		skip_prefix_lines: args.skip_lines,
		keep_punctuation: !args.no_punctuation,
	};
	let generator = Generator::from_file(&args.corpus, &config)
		.with_context(|| format!("loading model from {}", args.corpus.display()))?;

	let stats = generator.stats();
	log::info!("model loaded from {}", args.corpus.display());
	println!("Model loaded: {} tokens, {} distinct, order {}", stats.tokens, stats.vocabulary, stats.max_order);

	// Every value is validated here, before any generation happens
	let mut input = GenerationInput::new(args.length, args.temperature, args.alpha)?;
	if args.reject_unseen {
		input.unseen_seed = UnseenSeedPolicy::Reject;
	}

	let mut rng = match args.rng_seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_os_rng(),
	};

	log::info!("generating {} tokens after '{}'", input.length(), args.seed_phrase);
	let text = generator.generate_text(&args.seed_phrase, &input, &mut rng)?;
	println!("Generated: {text}");

	// What could come after the last generated token?
	let Some(last) = text.split(' ').next_back() else {
		return Ok(());
	};
	println!("Most likely tokens after '{last}':");
	for transition in generator.top_transitions(last, args.top_n, args.alpha)? {
		println!("{:>16}  {:.4}", transition.token, transition.probability);
	}

	Ok(())
}
