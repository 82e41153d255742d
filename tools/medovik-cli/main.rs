use clap::Parser;
use medovik::data::{DEFAULT_BATCH_COUNT, EvaluationRequest};
use medovik::prelude::*;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Dough viscosity, tempering and work-plan evaluation
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to an evaluation request JSON file (the classic recipe if omitted)
    request_path: Option<String>,

    /// Treat the request file as a JSON array of requests, as written by recipe-gen
    #[arg(long)]
    batch: bool,

    /// TOML file overriding the physical constants
    #[arg(short, long)]
    constants: Option<String>,

    /// Dough temperature in °C, overriding the request
    #[arg(short, long)]
    temperature: Option<f64>,

    /// Pre-heat the honey syrup before mixing
    #[arg(long)]
    caramelize: bool,

    /// Number of tempering batches, replacing the request's own plan (6 if neither is given)
    #[arg(short, long)]
    batches: Option<u32>,

    /// Print intermediate phase values
    #[arg(long)]
    debug: bool,

    /// Print the full report as JSON
    #[arg(long)]
    json: bool,

    /// Run in interactive mode to be prompted for inputs
    #[arg(short = 'i', long, help = "Run in interactive 'human' mode")]
    human: bool,
}

#[derive(Serialize)]
struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    caramelization: Option<CaramelizationOptions>,
    viscosity: ViscosityResult,
    decision: Decision,
    #[serde(skip_serializing_if = "Option::is_none")]
    tempering: Option<TemperingBatchPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tempering_error: Option<TemperingValidationError>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("medovik=info")))
        .with_writer(io::stderr)
        .init();

    let engine = build_engine(cli.constants.as_deref());

    if cli.human {
        run_interactive(&engine, cli.json);
    } else if cli.batch {
        run_batch(&engine, &cli);
    } else {
        run_non_interactive(&engine, cli);
    }
}

fn build_engine(constants_path: Option<&str>) -> DoughEngine {
    let builder = match constants_path {
        Some(path) => DoughEngine::builder()
            .constants_file(Path::new(path))
            .unwrap_or_else(|e| exit_with_error(&e.to_string())),
        None => DoughEngine::builder(),
    };
    builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()))
}

fn apply_overrides(mut request: EvaluationRequest, cli: &Cli) -> EvaluationRequest {
    if let Some(temperature) = cli.temperature {
        request.temperature_c = temperature;
    }
    if cli.caramelize {
        request.options.caramelization.enabled = true;
    }
    if cli.debug {
        request.options.debug = true;
    }
    if let Some(batches) = cli.batches {
        request
            .set_batch_count(batches)
            .unwrap_or_else(|e| exit_with_error(&format!("Invalid recipe: {}", e)));
    }
    request
}

fn evaluate(engine: &DoughEngine, request: &EvaluationRequest) -> Report {
    let recipe = request
        .to_recipe()
        .unwrap_or_else(|e| exit_with_error(&format!("Invalid recipe: {}", e)));

    let viscosity = engine.compute_viscosity(&recipe, request.temperature_c, &request.options);
    let decision = engine.decide(&recipe, &request.options);

    let (tempering, tempering_error) = match request
        .tempering_input(DEFAULT_BATCH_COUNT)
        .map(|input| engine.simulate_tempering(&input))
    {
        Ok(Ok(plan)) => (Some(plan), None),
        Ok(Err(e)) => (None, Some(e)),
        Err(e) => exit_with_error(&format!("Invalid recipe: {}", e)),
    };

    Report {
        caramelization: request.options.caramelization.enabled.then_some(request.options.caramelization),
        viscosity,
        decision,
        tempering,
        tempering_error,
    }
}

fn print_report(report: &Report, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(text) => println!("{}", text),
            Err(e) => exit_with_error(&format!("Failed to serialize report: {}", e)),
        }
        return;
    }

    println!("\n--- Viscosity ---");
    if let Some(caramelization) = &report.caramelization {
        println!("{}", ReportFormatter::format_caramelization(caramelization));
    }
    println!("{}", ReportFormatter::format_viscosity(&report.viscosity));
    println!("\n--- Decision ---");
    println!("{}", ReportFormatter::format_decision(&report.decision));
    if let Some(plan) = &report.tempering {
        println!("\n--- Tempering ---");
        println!("{}", ReportFormatter::format_tempering(plan));
    }
    if let Some(error) = &report.tempering_error {
        println!("\n--- Tempering ---");
        println!("{}", error);
    }
}

/// Runs the CLI in non-interactive mode, taking all arguments from the command line.
fn run_non_interactive(engine: &DoughEngine, cli: Cli) {
    let request = match &cli.request_path {
        Some(path) => EvaluationRequest::from_file(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to load request from '{}': {}", path, e))),
        None => {
            tracing::info!("No request file provided; evaluating the classic recipe");
            EvaluationRequest::default()
        }
    };
    let request = apply_overrides(request, &cli);

    let start = Instant::now();
    let report = evaluate(engine, &request);
    tracing::info!("Evaluation finished in {:?}", start.elapsed());

    print_report(&report, cli.json);
}

/// Evaluates every request in a generated file and prints one line per request.
fn run_batch(engine: &DoughEngine, cli: &Cli) {
    let path = cli
        .request_path
        .as_deref()
        .unwrap_or_else(|| exit_with_error("A request file is required with --batch."));
    let requests = EvaluationRequest::batch_from_file(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load requests from '{}': {}", path, e)));

    let start = Instant::now();
    let mut by_status = [0usize; 3];
    for (index, request) in requests.into_iter().enumerate() {
        let request = apply_overrides(request, cli);
        let report = evaluate(engine, &request);
        let decision = &report.decision;
        by_status[decision.status as usize] += 1;

        if cli.json {
            print_report(&report, true);
        } else {
            println!(
                "#{:<4} {:>5} {:>9} {:>5.1}% {:>7.0} cP at {:>5.2} °C",
                index + 1,
                decision.status.to_string(),
                decision.band.to_string(),
                decision.hydration_pct,
                decision.plan.plan_a.eta_at_optimal,
                decision.plan.plan_a.optimal_temp_c
            );
        }
    }

    println!("\n--- Batch Summary ---");
    println!("GO:    {}", by_status[Status::Go as usize]);
    println!("WAIT:  {}", by_status[Status::Wait as usize]);
    println!("STOP:  {}", by_status[Status::Stop as usize]);
    println!("Total Execution: {:?}", start.elapsed());
}

/// Runs the CLI in an interactive, human-friendly mode with prompts.
fn run_interactive(engine: &DoughEngine, json: bool) {
    println!("--- Medovik Interactive Mode ---");

    let classic = Recipe::classic();
    let mut recipe = Recipe::new();
    for (ingredient, grams) in classic.iter() {
        let value = prompt_number(&format!("{} (g)", ingredient), grams);
        recipe = recipe.with(ingredient, value);
    }

    let temperature = prompt_number("Dough temperature (°C)", 30.0);
    let egg_temp = prompt_number("Egg temperature (°C)", 20.0);
    let liquid_temp = prompt_number("Hot liquid temperature (°C)", 90.0);
    let batches = prompt_number("Tempering batches", DEFAULT_BATCH_COUNT as f64).round().max(0.0) as u32;
    let caramelize = loop {
        match prompt_for_input("Pre-heat the syrup? (y/n)", Some("n")).to_lowercase().as_str() {
            "y" | "yes" => break true,
            "n" | "no" => break false,
            _ => println!("Invalid choice. Please enter y or n."),
        }
    };

    let mut options = ProcessOptions::default().with_egg_temp(egg_temp);
    if caramelize {
        options = options.with_caramelization(CaramelizationOptions::enabled());
    }

    let mut request = EvaluationRequest::default();
    request.recipe = recipe.iter().map(|(i, g)| (i.name().to_string(), g)).collect();
    request.temperature_c = temperature;
    request.options = options;
    request.tempering = Some(TemperingInput::from_recipe(&recipe, egg_temp, liquid_temp, batches));

    let report = evaluate(engine, &request);
    print_report(&report, json);
}

fn prompt_number(prompt_text: &str, default: f64) -> f64 {
    loop {
        let input = prompt_for_input(prompt_text, Some(&default.to_string()));
        match input.parse::<f64>() {
            Ok(value) => return value,
            Err(_) => println!("Invalid number. Please try again."),
        }
    }
}

/// A helper function to prompt the user and read a line of input.
fn prompt_for_input(prompt_text: &str, default: Option<&str>) -> String {
    let mut line = String::new();
    let default_prompt = default.map_or("".to_string(), |d| format!(" [default: {}]", d));

    print!("> {}{}: ", prompt_text, default_prompt);
    if let Err(e) = io::stdout().flush() {
        exit_with_error(&format!("Failed to flush stdout: {}", e));
    }
    if let Err(e) = io::stdin().read_line(&mut line) {
        exit_with_error(&format!("Failed to read line: {}", e));
    }
    let trimmed = line.trim().to_string();

    if trimmed.is_empty() {
        default.unwrap_or("").to_string()
    } else {
        trimmed
    }
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
