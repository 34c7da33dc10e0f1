//! EV charging station simulator entry point: CLI wiring and config-driven runs.

use std::path::{Path, PathBuf};
use std::process;

use tracing::info;

use ev_solar_sim::config::ScenarioConfig;
use ev_solar_sim::io::export::{export_hourly_csv, export_report_json};
use ev_solar_sim::io::import::load_overrides;
use ev_solar_sim::logging::init_tracing;
use ev_solar_sim::sim::engine::run_simulation;
use ev_solar_sim::sim::overrides::OverrideRow;
use ev_solar_sim::sim::snapshot::OperatingSnapshot;

/// Parsed CLI arguments.
struct CliArgs {
    scenario_path: Option<String>,
    preset: Option<String>,
    overrides_path: Option<String>,
    hourly_out: Option<String>,
    report_json: Option<String>,
    snapshot: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("ev-solar-sim: solar + battery EV charging station simulator");
    eprintln!();
    eprintln!("Usage: ev-solar-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!(
        "  --preset <name>          Use a built-in preset ({})",
        ScenarioConfig::PRESETS.join(", ")
    );
    eprintln!("  --overrides <path>       Per-hour override CSV (replaces the scenario's)");
    eprintln!("  --hourly-out <path>      Export the hourly trace to CSV");
    eprintln!("  --report-json <path>     Export the full result as JSON");
    eprintln!("  --snapshot               Print the instantaneous operating snapshot and exit");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after simulation");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the baseline preset is used.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=debug) to control log output on stderr.");
}

/// Returns the value following `args[*i]`, advancing `i`, or exits with an error.
fn flag_value(args: &[String], i: &mut usize, what: &str) -> String {
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
        overrides_path: None,
        hourly_out: None,
        report_json: None,
        snapshot: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--scenario" => cli.scenario_path = Some(flag_value(&args, &mut i, "a path argument")),
            "--preset" => cli.preset = Some(flag_value(&args, &mut i, "a name argument")),
            "--overrides" => {
                cli.overrides_path = Some(flag_value(&args, &mut i, "a path argument"));
            }
            "--hourly-out" => cli.hourly_out = Some(flag_value(&args, &mut i, "a path argument")),
            "--report-json" => {
                cli.report_json = Some(flag_value(&args, &mut i, "a path argument"));
            }
            "--snapshot" => cli.snapshot = true,
            #[cfg(feature = "api")]
            "--serve" => cli.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                let raw = flag_value(&args, &mut i, "a u16 argument");
                cli.port = raw.parse().unwrap_or_else(|_| {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                });
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Loads the scenario: `--scenario` takes priority, then `--preset`, then baseline.
fn load_scenario(cli: &CliArgs) -> ScenarioConfig {
    let loaded = if let Some(ref path) = cli.scenario_path {
        ScenarioConfig::from_toml_file(Path::new(path)).map_err(|e| e.to_string())
    } else if let Some(ref name) = cli.preset {
        ScenarioConfig::from_preset(name).map_err(|e| e.to_string())
    } else {
        Ok(ScenarioConfig::baseline())
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    })
}

/// Reads the override CSV named on the command line or in the scenario, if any.
fn load_override_rows(cli: &CliArgs, scenario: &ScenarioConfig) -> Vec<OverrideRow> {
    let path = cli
        .overrides_path
        .as_ref()
        .map(PathBuf::from)
        .or_else(|| scenario.simulation.overrides.clone());
    let Some(path) = path else {
        return Vec::new();
    };
    match load_overrides(&path) {
        Ok(imported) => {
            if !imported.malformed.is_empty() {
                eprintln!(
                    "warning: skipped {} non-numeric override cell(s) in {}",
                    imported.malformed.len(),
                    path.display()
                );
            }
            imported.rows
        }
        Err(e) => {
            eprintln!("error: failed to read overrides {}: {e}", path.display());
            process::exit(1);
        }
    }
}

fn main() {
    init_tracing();
    let cli = parse_args();
    let scenario = load_scenario(&cli);

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let overrides = load_override_rows(&cli, &scenario);
    let params = scenario.to_parameters(overrides);

    if cli.snapshot {
        println!("{}", OperatingSnapshot::compute(&params));
        return;
    }

    let result = match run_simulation(&params) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    for r in &result.hourly_data {
        println!("{r}");
    }
    println!("\n{result}");

    if let Some(ref path) = cli.hourly_out {
        if let Err(e) = export_hourly_csv(&result.hourly_data, Path::new(path)) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        info!(path = %path, "hourly trace written");
    }

    if let Some(ref path) = cli.report_json {
        if let Err(e) = export_report_json(&result, Path::new(path)) {
            eprintln!("error: failed to write JSON report: {e}");
            process::exit(1);
        }
        info!(path = %path, "JSON report written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(ev_solar_sim::api::AppState { result });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
            eprintln!("error: failed to create tokio runtime: {e}");
            process::exit(1);
        });
        if let Err(e) = rt.block_on(ev_solar_sim::api::serve(state, addr)) {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
