use crate::algorithms::{Algorithm, SearchConfig};
use crate::error::ConfigError;
use crate::heuristic::Heuristic;
use clap::{Parser, ValueEnum};

/// Initial wall layout built before the first search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    Empty,
    Maze,
    Random,
}

#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Grid shortest-path search with maze generation",
    long_about = None
)]
pub struct Config {
    #[arg(long, default_value_t = 20)]
    pub cols: usize,

    #[arg(long, default_value_t = 20)]
    pub rows: usize,

    #[arg(long, value_enum, default_value_t = Algorithm::AStar)]
    pub algorithm: Algorithm,

    #[arg(long, value_enum, default_value_t = Heuristic::Manhattan)]
    pub heuristic: Heuristic,

    #[arg(long, default_value_t = false)]
    pub allow_diagonal: bool,

    /// Pause between two search steps.
    #[arg(long, default_value_t = 50)]
    pub step_delay_ms: u64,

    /// Wall probability for random obstacle fields, in (0, 1).
    #[arg(long, default_value_t = 0.3)]
    pub obstacle_density: f64,

    /// Pause between two stages of a comparison run.
    #[arg(long, default_value_t = 1000)]
    pub settle_ms: u64,

    #[arg(long, value_enum, default_value_t = Layout::Random)]
    pub layout: Layout,

    /// Seed for reproducible layouts; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Compare all heuristics with A* on fresh obstacle fields.
    #[arg(long, default_value_t = false)]
    pub compare: bool,

    #[arg(long, default_value_t = false)]
    pub batch_mode: bool,

    #[arg(long, default_value_t = 100)]
    pub num_simulations: usize,

    #[arg(long, default_value_t = 0.1)]
    pub min_density: f64,

    #[arg(long, default_value_t = 0.5)]
    pub max_density: f64,

    #[arg(long, default_value_t = 0.1)]
    pub density_step: f64,

    #[arg(long, default_value = "batch_results.csv")]
    pub output_file: String,

    #[arg(long, default_value_t = false)]
    pub no_visualization: bool,

    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cols: 20,
            rows: 20,
            algorithm: Algorithm::AStar,
            heuristic: Heuristic::Manhattan,
            allow_diagonal: false,
            step_delay_ms: 50,
            obstacle_density: 0.3,
            settle_ms: 1000,
            layout: Layout::Random,
            seed: None,
            compare: false,
            batch_mode: false,
            num_simulations: 100,
            min_density: 0.1,
            max_density: 0.5,
            density_step: 0.1,
            output_file: "batch_results.csv".to_string(),
            no_visualization: false,
            quiet: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols < 2 || self.rows < 2 {
            return Err(ConfigError::GridTooSmall {
                cols: self.cols,
                rows: self.rows,
            });
        }
        for density in [self.obstacle_density, self.min_density, self.max_density] {
            if !(density > 0.0 && density < 1.0) {
                return Err(ConfigError::InvalidDensity(density));
            }
        }
        if self.min_density > self.max_density {
            return Err(ConfigError::InvalidDensityRange {
                min: self.min_density,
                max: self.max_density,
            });
        }
        if !(self.density_step > 0.0) {
            return Err(ConfigError::InvalidDensityStep(self.density_step));
        }
        Ok(())
    }

    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            algorithm: self.algorithm,
            heuristic: self.heuristic,
            allow_diagonal: self.allow_diagonal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_cli_defaults() {
        let parsed = Config::parse_from(["grid_search"]);
        let default = Config::default();
        assert_eq!(parsed.cols, default.cols);
        assert_eq!(parsed.algorithm, default.algorithm);
        assert_eq!(parsed.heuristic, default.heuristic);
        assert_eq!(parsed.step_delay_ms, default.step_delay_ms);
        assert_eq!(parsed.obstacle_density, default.obstacle_density);
        assert_eq!(parsed.layout, default.layout);
        assert_eq!(parsed.output_file, default.output_file);
        assert!(default.validate().is_ok());
    }

    #[test]
    fn parses_option_names() {
        let config = Config::parse_from([
            "grid_search",
            "--algorithm",
            "greedy",
            "--heuristic",
            "octile",
            "--allow-diagonal",
            "--layout",
            "maze",
            "--seed",
            "42",
        ]);
        assert_eq!(config.algorithm, Algorithm::Greedy);
        assert_eq!(config.heuristic, Heuristic::Octile);
        assert!(config.allow_diagonal);
        assert_eq!(config.layout, Layout::Maze);
        assert_eq!(config.seed, Some(42));
        let astar = Config::parse_from(["grid_search", "--algorithm", "astar"]);
        assert_eq!(astar.algorithm, Algorithm::AStar);
    }

    #[test]
    fn rejects_bad_values() {
        let mut config = Config::default();
        config.obstacle_density = 1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDensity(1.0)));

        let mut config = Config::default();
        config.rows = 1;
        assert_eq!(
            config.validate(),
            Err(ConfigError::GridTooSmall { cols: 20, rows: 1 })
        );

        let mut config = Config::default();
        config.min_density = 0.6;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidDensityRange { .. })));

        let mut config = Config::default();
        config.density_step = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDensityStep(0.0)));
    }
}
