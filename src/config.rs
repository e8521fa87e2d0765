use anyhow::{anyhow, Context};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::cost::Weights;
use crate::solver::Strategy;

#[derive(Parser, Debug)]
#[command(
    name = "smoke-escape",
    about = "Time-aware escape routes through a floor plan filling with smoke.",
    version = "0.1"
)]
pub struct Cli {
    #[arg(long, help = "Path to a YAML config file; command line flags override it")]
    pub config: Option<String>,

    #[arg(long, help = "Path to the YAML scenario file")]
    pub scenario: Option<String>,

    #[arg(
        long,
        value_enum,
        help = "Strategies to run side by side",
        use_value_delimiter = true
    )]
    pub strategy: Vec<Strategy>,

    #[arg(
        long,
        help = "Start cell as ROW,COL; defaults to the scenario's start",
        use_value_delimiter = true
    )]
    pub start: Vec<usize>,

    #[arg(long, help = "A*: weight on the hazard value (w1)")]
    pub hazard_weight: Option<f64>,

    #[arg(long, help = "A*: cost of every move, waiting included (w2)")]
    pub step_weight: Option<f64>,

    #[arg(long, help = "A*: penalty for entering a dangerous cell (w3)")]
    pub danger_penalty: Option<f64>,

    #[arg(long, help = "A*: hazard value from which a cell counts as dangerous")]
    pub danger_threshold: Option<f64>,

    #[arg(long, help = "Seed for scenarios with a random hazard field")]
    pub seed: Option<u64>,

    #[arg(long, help = "Write the route report as JSON to this path")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scenario_path: String,
    pub strategies: Vec<Strategy>,
    pub start: Option<(usize, usize)>,
    pub weights: Weights,
    pub seed: Option<u64>,
    pub output_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scenario_path: "scenarios/office.yaml".to_string(),
            strategies: Strategy::ALL.to_vec(),
            start: None,
            weights: Weights::default(),
            seed: None,
            output_path: None,
        }
    }
}

impl Config {
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("invalid config yaml")
    }

    pub fn from_yaml_file(path: &str) -> anyhow::Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        Self::from_yaml_str(&config_str).with_context(|| format!("error with config file: {path}"))
    }

    pub fn override_from_command_line(mut self, cli: &Cli) -> anyhow::Result<Self> {
        if let Some(scenario) = &cli.scenario {
            self.scenario_path = scenario.clone();
        }
        if !cli.strategy.is_empty() {
            self.strategies = cli.strategy.clone();
        }
        match cli.start.as_slice() {
            [] => {}
            &[row, col] => self.start = Some((row, col)),
            other => {
                return Err(anyhow!(
                    "--start takes exactly ROW,COL, got {} values",
                    other.len()
                ))
            }
        }
        if let Some(hazard_weight) = cli.hazard_weight {
            self.weights.hazard_weight = hazard_weight;
        }
        if let Some(step_weight) = cli.step_weight {
            self.weights.step_weight = step_weight;
        }
        if let Some(danger_penalty) = cli.danger_penalty {
            self.weights.danger_penalty = danger_penalty;
        }
        if let Some(danger_threshold) = cli.danger_threshold {
            self.weights.danger_threshold = danger_threshold;
        }
        if cli.seed.is_some() {
            self.seed = cli.seed;
        }
        if cli.output.is_some() {
            self.output_path = cli.output.clone();
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.scenario_path.is_empty() {
            return Err(anyhow!("Scenario path must not be empty"));
        }
        if self.strategies.is_empty() {
            return Err(anyhow!("At least one strategy must be selected"));
        }
        self.weights.validate()?;
        Ok(())
    }
}
