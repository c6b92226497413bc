use crate::algorithms::{self, Algorithm, SearchConfig};
use crate::config::Config;
use crate::error::BatchError;
use crate::grid::Grid;
use crate::maze::MazeGen;
use crate::statistics::reference_path_length;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rustc_hash::FxHashMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::time::Instant;

const CSV_HEADER: &str = "trial,seed,algorithm,heuristic,cols,rows,density,success,\
path_length,optimal_path_length,nodes_visited,duration_us,optimal";

#[derive(Debug, Clone)]
pub struct BatchResult {
    pub trial: usize,
    pub seed: u64,
    pub algorithm: Algorithm,
    pub heuristic: String,
    pub cols: usize,
    pub rows: usize,
    pub density: f64,
    pub success: bool,
    pub path_length: usize,
    pub optimal_path_length: usize,
    pub nodes_visited: usize,
    pub duration_us: u64,
    /// Whether `path_length` matches the reference shortest path.
    pub optimal: bool,
}

impl BatchResult {
    fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{:.2},{},{},{},{},{},{}",
            self.trial,
            self.seed,
            self.algorithm,
            self.heuristic,
            self.cols,
            self.rows,
            self.density,
            self.success,
            self.path_length,
            self.optimal_path_length,
            self.nodes_visited,
            self.duration_us,
            self.optimal
        )
    }
}

/// Headless benchmark of every algorithm over a sweep of obstacle densities.
pub struct BatchSimulation {
    config: Config,
    results: Vec<BatchResult>,
    summary: Vec<BatchResult>,
    batch_size: usize,
    total_results_written: usize,
    start_time: Instant,
}

impl BatchSimulation {
    pub fn new(config: Config) -> Self {
        BatchSimulation {
            config,
            results: Vec::new(),
            summary: Vec::new(),
            batch_size: 100,
            total_results_written: 0,
            start_time: Instant::now(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Densities swept by the run, inclusive of both ends.
    pub fn densities(&self) -> Vec<f64> {
        let mut densities = Vec::new();
        let mut i = 0;
        loop {
            let d = self.config.min_density + i as f64 * self.config.density_step;
            if d > self.config.max_density + 1e-9 {
                break;
            }
            densities.push(d);
            i += 1;
        }
        densities
    }

    pub fn results(&self) -> &[BatchResult] {
        &self.summary
    }

    pub fn run(&mut self) -> Result<(), BatchError> {
        self.config.validate()?;
        self.start_time = Instant::now();
        self.initialize_csv_file()?;

        let densities = self.densities();
        let total = densities.len() * self.config.num_simulations * Algorithm::ALL.len();
        info!(
            "Batch: {}x{} grid, {} densities, {} trials each, {} runs total",
            self.config.cols,
            self.config.rows,
            densities.len(),
            self.config.num_simulations,
            total
        );

        let base_seed = self.config.seed.unwrap_or_else(rand::random);
        for (density_index, &density) in densities.iter().enumerate() {
            for trial in 0..self.config.num_simulations {
                let seed = base_seed
                    .wrapping_add((density_index * self.config.num_simulations + trial) as u64);
                self.run_trial(trial, seed, density)?;

                if self.results.len() >= self.batch_size {
                    self.flush_results_to_csv()?;
                }
            }
            if !self.config.quiet {
                println!(
                    "Density {:.2} done ({} results so far, {:.1}s elapsed)",
                    density,
                    self.total_results_written + self.results.len(),
                    self.start_time.elapsed().as_secs_f64()
                );
            }
        }

        self.flush_results_to_csv()?;
        info!(
            "Batch finished: {} results in {:.2?} -> {}",
            self.total_results_written,
            self.start_time.elapsed(),
            self.config.output_file
        );
        Ok(())
    }

    /// One obstacle field, searched by every algorithm.
    fn run_trial(&mut self, trial: usize, seed: u64, density: f64) -> Result<(), BatchError> {
        let mut grid = Grid::new(self.config.cols, self.config.rows)?;
        MazeGen::new(StdRng::seed_from_u64(seed)).random_obstacles(&mut grid, density);
        let optimal = reference_path_length(&grid, self.config.allow_diagonal);

        for algorithm in Algorithm::ALL {
            grid.reset();
            let search = SearchConfig {
                algorithm,
                heuristic: self.config.heuristic,
                allow_diagonal: self.config.allow_diagonal,
            };
            let result = algorithms::run(&grid, search);
            let optimal_path_length = optimal.unwrap_or(0);
            let row = BatchResult {
                trial,
                seed,
                algorithm,
                heuristic: if algorithm.uses_heuristic() {
                    self.config.heuristic.to_string()
                } else {
                    "-".to_string()
                },
                cols: self.config.cols,
                rows: self.config.rows,
                density,
                success: result.found(),
                path_length: result.path_length,
                optimal_path_length,
                nodes_visited: result.nodes_visited,
                duration_us: result.duration.as_micros() as u64,
                optimal: result.found() && result.path_length == optimal_path_length,
            };
            if algorithm.is_optimal() && result.found() && !row.optimal {
                debug!(
                    "{} returned a {} cell path where {} suffice (seed {})",
                    algorithm, result.path_length, optimal_path_length, seed
                );
            }
            self.results.push(row);
        }
        Ok(())
    }

    fn initialize_csv_file(&self) -> Result<(), BatchError> {
        let mut file = File::create(&self.config.output_file)?;
        writeln!(file, "{}", CSV_HEADER)?;
        debug!("Initialized CSV file: {}", self.config.output_file);
        Ok(())
    }

    fn flush_results_to_csv(&mut self) -> Result<(), BatchError> {
        if self.results.is_empty() {
            return Ok(());
        }
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.config.output_file)?;
        for result in &self.results {
            writeln!(file, "{}", result.csv_row())?;
        }

        self.total_results_written += self.results.len();
        debug!(
            "Flushed {} results to CSV (total: {})",
            self.results.len(),
            self.total_results_written
        );
        self.summary.append(&mut self.results);
        Ok(())
    }

    pub fn print_summary(&self) {
        if self.summary.is_empty() {
            println!("No results to summarize.");
            return;
        }

        println!("\n=== BATCH SIMULATION SUMMARY ===");
        let mut groups: FxHashMap<Algorithm, Vec<&BatchResult>> = FxHashMap::default();
        for result in &self.summary {
            groups.entry(result.algorithm).or_default().push(result);
        }

        for algorithm in Algorithm::ALL {
            let Some(results) = groups.get(&algorithm) else {
                continue;
            };
            let total = results.len();
            let successful: Vec<_> = results.iter().filter(|r| r.success).collect();
            println!("\n{} results:", algorithm);
            println!(
                "  Success rate: {}/{} ({:.1}%)",
                successful.len(),
                total,
                successful.len() as f64 / total as f64 * 100.0
            );
            if successful.is_empty() {
                continue;
            }
            let n = successful.len() as f64;
            let avg_visited = successful.iter().map(|r| r.nodes_visited as f64).sum::<f64>() / n;
            let avg_length = successful.iter().map(|r| r.path_length as f64).sum::<f64>() / n;
            let avg_time = successful.iter().map(|r| r.duration_us as f64).sum::<f64>() / n;
            let non_optimal = successful.iter().filter(|r| !r.optimal).count();
            println!("  Average nodes visited: {:.1}", avg_visited);
            println!("  Average path length: {:.1}", avg_length);
            println!("  Average search time: {:.1}us", avg_time);
            println!("  Longer than shortest: {}", non_optimal);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(output_file: String) -> Config {
        Config {
            cols: 10,
            rows: 10,
            num_simulations: 3,
            min_density: 0.1,
            max_density: 0.3,
            density_step: 0.1,
            seed: Some(5),
            output_file,
            quiet: true,
            ..Config::default()
        }
    }

    #[test]
    fn density_sweep_is_inclusive() {
        let batch = BatchSimulation::new(config("unused.csv".to_string()));
        let densities = batch.densities();
        assert_eq!(densities.len(), 3);
        assert!((densities[2] - 0.3).abs() < 1e-9);
    }

    #[test]
    fn writes_one_row_per_algorithm_and_trial() {
        let path = std::env::temp_dir()
            .join(format!("grid_search_batch_{}.csv", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        let mut batch = BatchSimulation::new(config(path_str)).with_batch_size(4);
        batch.run().unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines.len(), 1 + 3 * 3 * Algorithm::ALL.len());
        assert_eq!(batch.results().len(), 3 * 3 * Algorithm::ALL.len());

        for result in batch.results() {
            assert!(result.success);
            if result.algorithm.is_optimal() {
                assert!(result.optimal, "{:?}", result);
            }
        }
        std::fs::remove_file(&path).unwrap();
    }
}
