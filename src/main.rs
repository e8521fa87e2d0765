use smoke_escape::config::{Cli, Config};
use smoke_escape::map::Cell;
use smoke_escape::scenario::{Scenario, ScenarioReport};
use smoke_escape::solver::solve_all;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let cli = Cli::parse();

    let config = if let Some(config_file) = cli.config.as_ref() {
        Config::from_yaml_file(config_file)?
    } else {
        info!("No config file specified, using default config");
        Config::default()
    }
    .override_from_command_line(&cli)?;

    let scenario = Scenario::load_from_file(&config.scenario_path, config.seed)
        .with_context(|| format!("error loading scenario {}", config.scenario_path))?
        .with_start(config.start);
    let grid = &scenario.grid;

    let grid_statistics = grid.statistics();
    info!(
        "Floor plan {}x{}: {} free, {} wall, {} exit cells; hazard horizon {} steps; start {:?}",
        grid.rows,
        grid.cols,
        grid_statistics.free,
        grid_statistics.wall,
        grid_statistics.exit,
        scenario.hazard.horizon(),
        scenario.start
    );
    if grid.has_enclosed_areas() {
        warn!("Floor plan contains enclosed areas");
    }
    if !grid.has_static_escape_route(scenario.start) {
        warn!("No exit is reachable from {:?} even ignoring time", scenario.start);
    }

    let runs = solve_all(
        grid,
        &scenario.hazard,
        scenario.start,
        config.weights,
        &config.strategies,
    );

    for run in &runs {
        match &run.result {
            Ok(solution) => {
                assert!(solution.verify(grid, &scenario.hazard, scenario.start));
                info!(
                    "{}: cost {:.3} in {} steps",
                    run.strategy,
                    solution.cost,
                    solution.steps()
                );
                for state in &solution.path {
                    let mark = match grid.cell(state.row, state.col) {
                        Cell::Exit => " exit",
                        Cell::Start => " start",
                        _ => "",
                    };
                    info!("  t={}, pos=({},{}){mark}", state.t, state.row, state.col);
                }
            }
            Err(err) => error!("{}: {err}", run.strategy),
        }
    }

    if let Some(output_path) = &config.output_path {
        ScenarioReport::new(&scenario, &runs).write_json(output_path)?;
    }

    Ok(())
}
