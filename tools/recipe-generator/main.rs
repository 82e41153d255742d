use clap::Parser;
use medovik::data::EvaluationRequest;
use medovik::prelude::*;
use rand::{Rng, rngs::ThreadRng};
use std::fs;

/// A CLI tool to generate randomised evaluation requests around the classic recipe
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// The path to write the generated JSON file to
    #[arg(short, long, default_value = "generated_requests.json")]
    output: String,

    /// How many requests to generate
    #[arg(short, long, default_value_t = 20)]
    count: usize,

    /// Largest relative deviation from the classic amount, per ingredient
    #[arg(long, default_value_t = 0.3)]
    spread: f64,

    /// Share of requests with a pre-heated syrup
    #[arg(long, default_value_t = 0.25)]
    caramelized_share: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if !(0.0..1.0).contains(&cli.spread) {
        eprintln!("Error: --spread ({}) must lie in [0, 1)", cli.spread);
        std::process::exit(1);
    }
    if !(0.0..=1.0).contains(&cli.caramelized_share) {
        eprintln!(
            "Error: --caramelized-share ({}) must lie in [0, 1]",
            cli.caramelized_share
        );
        std::process::exit(1);
    }

    println!(
        "Generating {} requests (spread ±{:.0}%)...",
        cli.count,
        cli.spread * 100.0
    );

    let requests: Vec<EvaluationRequest> = (0..cli.count)
        .map(|_| generate_request(&mut rng, cli.spread, cli.caramelized_share))
        .collect();

    let json_output = serde_json::to_string_pretty(&requests)?;
    fs::write(&cli.output, json_output)?;

    println!(
        "Successfully generated and saved {} requests to '{}'",
        requests.len(),
        cli.output
    );

    Ok(())
}

fn generate_request(rng: &mut ThreadRng, spread: f64, caramelized_share: f64) -> EvaluationRequest {
    let recipe = generate_recipe(rng, spread);

    let mut options = ProcessOptions::default().with_egg_temp(rng.random_range(4.0..25.0));
    if rng.random_bool(caramelized_share) {
        let mut caramelization = CaramelizationOptions::enabled();
        caramelization.preheat_temp_c = rng.random_range(105.0..=110.0);
        caramelization.preheat_minutes = rng.random_range(1.5..=3.0);
        caramelization.evaporation_fraction = rng.random_range(0.05..=0.10);
        options = options.with_caramelization(caramelization);
    }

    let batches = rng.random_range(2..=10);
    let liquid_temp = rng.random_range(70.0..100.0);

    let mut request = EvaluationRequest::default();
    request.recipe = recipe
        .iter()
        .map(|(ingredient, grams)| (ingredient.name().to_string(), grams))
        .collect();
    request.temperature_c = rng.random_range(18.0..45.0);
    request.tempering = Some(TemperingInput::from_recipe(
        &recipe,
        options.effective_egg_temp_c(),
        liquid_temp,
        batches,
    ));
    request.options = options;
    request
}

/// Scales each classic amount independently and rounds to whole grams.
fn generate_recipe(rng: &mut ThreadRng, spread: f64) -> Recipe {
    Recipe::classic()
        .iter()
        .fold(Recipe::new(), |recipe, (ingredient, grams)| {
            let factor = if spread > 0.0 {
                rng.random_range(1.0 - spread..=1.0 + spread)
            } else {
                1.0
            };
            recipe.with(ingredient, (grams * factor).round())
        })
}
