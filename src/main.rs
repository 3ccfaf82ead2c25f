//! Microgrid simulator entry point: CLI wiring and config-driven runs.

use std::path::Path;
use std::process;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use microgrid_sim::config::ScenarioConfig;
use microgrid_sim::io::export::export_csv;
use microgrid_sim::sim::kpi::RunSummary;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    ticks_override: Option<usize>,
    seed_override: Option<u64>,
    telemetry_out: Option<String>,
    print_state: bool,
}

fn print_help() {
    eprintln!("microgrid-sim: tick-by-tick microgrid energy balance simulator");
    eprintln!();
    eprintln!("Usage: microgrid-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (baseline, mixed)");
    eprintln!("  --ticks <n>              Override number of ticks");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --telemetry-out <path>   Export tick records to CSV");
    eprintln!("  --state                  Print the final JSON state snapshot");
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

/// Returns the value following flag `args[*i]`, exiting with an error if absent.
fn take_value(args: &[String], i: &mut usize, what: &str) -> String {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires {what}");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        scenario_path: None,
        preset: None,
        ticks_override: None,
        seed_override: None,
        telemetry_out: None,
        print_state: false,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => {
                cli.scenario_path = Some(take_value(&args, &mut i, "a path argument"));
            }
            "--preset" => {
                cli.preset = Some(take_value(&args, &mut i, "a name argument"));
            }
            "--ticks" => {
                let raw = take_value(&args, &mut i, "a positive integer");
                match raw.parse::<usize>() {
                    Ok(n) if n > 0 => cli.ticks_override = Some(n),
                    _ => {
                        eprintln!("error: --ticks value \"{raw}\" is not a positive integer");
                        process::exit(1);
                    }
                }
            }
            "--seed" => {
                let raw = take_value(&args, &mut i, "a u64 argument");
                if let Ok(s) = raw.parse::<u64>() {
                    cli.seed_override = Some(s);
                } else {
                    eprintln!("error: --seed value \"{raw}\" is not a valid u64");
                    process::exit(1);
                }
            }
            "--telemetry-out" => {
                cli.telemetry_out = Some(take_value(&args, &mut i, "a path argument"));
            }
            "--state" => {
                cli.print_state = true;
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    if cli.scenario_path.is_some() && cli.preset.is_some() {
        eprintln!("error: --scenario and --preset are mutually exclusive");
        process::exit(1);
    }

    cli
}

fn init_tracing() {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info"),
    };
    let stderr_layer = fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}

fn main() {
    let cli = parse_args();
    init_tracing();

    // --scenario takes priority, then --preset, then baseline default
    let mut scenario = if let Some(ref path) = cli.scenario_path {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = cli.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = cli.seed_override {
        scenario.simulation.seed = seed;
    }
    if let Some(ticks) = cli.ticks_override {
        scenario.simulation.ticks = ticks;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let mut grid = match scenario.build_simulator() {
        Ok(grid) => grid,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };
    tracing::info!(
        producers = grid.producers().len(),
        consumers = grid.consumers().len(),
        ticks = scenario.simulation.ticks,
        seed = grid.seed(),
        "starting simulation"
    );

    let records = grid.run(scenario.simulation.ticks);
    tracing::info!(
        ticks = records.len(),
        final_soc = grid.battery().soc(),
        "simulation complete"
    );
    for r in &records {
        println!("{r}");
    }

    let dt_hours = grid.time_step_s() / 3600.0;
    let summary = RunSummary::from_records(&records, dt_hours);
    println!("\n{summary}");

    if let Some(ref path) = cli.telemetry_out {
        if let Err(e) = export_csv(&records, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Telemetry written to {path}");
    }

    if cli.print_state {
        match grid.state().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize state: {e}");
                process::exit(1);
            }
        }
    }
}
