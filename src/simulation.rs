use crate::algorithms::{Algorithm, SearchConfig, SearchResult, SearchRun, StepOutcome};
use crate::config::{Config, Layout};
use crate::error::{ConfigError, ControlError};
use crate::grid::{Color, Grid, Position, Snapshot};
use crate::heuristic::Heuristic;
use crate::maze::MazeGen;
use crate::statistics::{reference_path_length, ComparisonRecord, SearchStats};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Cooperative stop signal shared between the controller and its host.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clears the flag, returning whether it was set.
    fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

/// What a call to [`Controller::poll`] did.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    /// No run is active.
    Idle,
    /// The next step is not due yet.
    Waiting { until: Instant },
    /// One frontier cell was expanded.
    Stepped,
    /// A comparison stage generated its obstacles and is ready to search.
    StageStarted(Heuristic),
    Finished(SearchResult),
    StageFinished(ComparisonRecord),
    ComparisonFinished(Vec<ComparisonRecord>),
    /// The run stopped early; carries the partial result if a search was underway.
    Cancelled(Option<SearchResult>),
}

impl ControllerEvent {
    /// Whether the controller is idle after this event.
    pub fn ends_run(&self) -> bool {
        matches!(
            self,
            ControllerEvent::Idle
                | ControllerEvent::Finished(_)
                | ControllerEvent::ComparisonFinished(_)
                | ControllerEvent::Cancelled(_)
        )
    }
}

enum Mode {
    Idle,
    Single {
        run: SearchRun,
        optimal: Option<usize>,
    },
    Comparison {
        stage: usize,
        run: Option<SearchRun>,
        records: Vec<ComparisonRecord>,
    },
}

/// Drives searches over one grid: a single run or a four-heuristic
/// comparison, one step per poll, paced and cancellable.
pub struct Controller {
    grid: Grid,
    config: Config,
    rng: StdRng,
    cancel: CancelToken,
    mode: Mode,
    next_step_at: Option<Instant>,
    last_result: Option<SearchResult>,
    last_stats: Option<SearchStats>,
    last_comparison: Vec<ComparisonRecord>,
}

impl Controller {
    /// Builds the grid described by `config`, including its initial layout.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.cols, config.rows)?;
        let mut controller = Self::from_grid(grid, config)?;

        match controller.config.layout {
            Layout::Empty => {}
            Layout::Maze => {
                MazeGen::new(&mut controller.rng).recursive_division(&mut controller.grid);
            }
            Layout::Random => {
                let density = controller.config.obstacle_density;
                MazeGen::new(&mut controller.rng).random_obstacles(&mut controller.grid, density);
            }
        }
        info!(
            "Grid {}x{} ready with {:?} layout, {} walls",
            controller.grid.cols(),
            controller.grid.rows(),
            controller.config.layout,
            controller.grid.obstacles().len()
        );
        Ok(controller)
    }

    /// Wraps an existing grid; the layout option is ignored.
    pub fn from_grid(grid: Grid, config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Controller {
            grid,
            config,
            rng,
            cancel: CancelToken::new(),
            mode: Mode::Idle,
            next_step_at: None,
            last_result: None,
            last_stats: None,
            last_comparison: Vec::new(),
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn snapshot(&self) -> Snapshot {
        self.grid.snapshot()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.mode, Mode::Idle)
    }

    /// Result of the most recent single run or comparison stage, including
    /// cancelled ones.
    pub fn last_result(&self) -> Option<&SearchResult> {
        self.last_result.as_ref()
    }

    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last_stats.as_ref()
    }

    pub fn last_comparison(&self) -> &[ComparisonRecord] {
        &self.last_comparison
    }

    /// Handle that can stop the active run from another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn set_search_config(&mut self, search: SearchConfig) {
        self.config.algorithm = search.algorithm;
        self.config.heuristic = search.heuristic;
        self.config.allow_diagonal = search.allow_diagonal;
    }

    pub fn set_step_delay(&mut self, delay_ms: u64) {
        self.config.step_delay_ms = delay_ms;
    }

    pub fn set_settle(&mut self, settle_ms: u64) {
        self.config.settle_ms = settle_ms;
    }

    pub fn set_obstacle_density(&mut self, density: f64) -> Result<(), ConfigError> {
        if !(density > 0.0 && density < 1.0) {
            return Err(ConfigError::InvalidDensity(density));
        }
        self.config.obstacle_density = density;
        Ok(())
    }

    // Grid edits stay available while a run is active. The run works on its
    // own copy of the walls and endpoints, so they only apply to the next
    // run, and the overlay of the active run is kept until that run resets it.

    pub fn set_start(&mut self, pos: Position) -> bool {
        if self.is_running() {
            self.grid.place_start(pos)
        } else {
            self.grid.set_start(pos)
        }
    }

    pub fn set_end(&mut self, pos: Position) -> bool {
        if self.is_running() {
            self.grid.place_end(pos)
        } else {
            self.grid.set_end(pos)
        }
    }

    pub fn toggle_wall(&mut self, pos: Position) -> bool {
        self.grid.toggle_wall(pos)
    }

    pub fn generate_maze(&mut self) -> Result<usize, ControlError> {
        self.ensure_idle()?;
        Ok(MazeGen::new(&mut self.rng).recursive_division(&mut self.grid))
    }

    pub fn generate_random_obstacles(&mut self, density: f64) -> Result<usize, ControlError> {
        self.ensure_idle()?;
        Ok(MazeGen::new(&mut self.rng).random_obstacles(&mut self.grid, density))
    }

    /// Starts a single search with the given settings, which also become
    /// the controller's current search settings.
    pub fn start_search(&mut self, search: SearchConfig) -> Result<(), ControlError> {
        self.ensure_idle()?;
        self.set_search_config(search);
        self.cancel.take();
        self.grid.reset();

        let optimal = reference_path_length(&self.grid, search.allow_diagonal);
        info!(
            "Starting {} ({}) from {} to {}",
            search.algorithm,
            search.heuristic,
            self.grid.start(),
            self.grid.end()
        );
        self.mode = Mode::Single {
            run: SearchRun::new(&self.grid, search),
            optimal,
        };
        self.next_step_at = None;
        Ok(())
    }

    /// Starts a comparison of every heuristic with A*, each on a freshly
    /// generated obstacle field.
    pub fn start_comparison(&mut self) -> Result<(), ControlError> {
        self.ensure_idle()?;
        self.cancel.take();
        info!("Starting heuristic comparison");
        self.mode = Mode::Comparison {
            stage: 0,
            run: None,
            records: Vec::new(),
        };
        self.next_step_at = None;
        Ok(())
    }

    /// Requests cancellation; honoured by the next poll.
    pub fn cancel(&mut self) {
        self.cancel.cancel();
    }

    /// Cancels the active run and waits for it to stop.
    pub fn stop(&mut self) -> Option<SearchResult> {
        if !self.is_running() {
            return None;
        }
        self.cancel.cancel();
        match self.poll(Instant::now()) {
            ControllerEvent::Cancelled(result) => result,
            _ => None,
        }
    }

    /// Advances the active run by at most one step.
    pub fn poll(&mut self, now: Instant) -> ControllerEvent {
        if matches!(self.mode, Mode::Idle) {
            self.cancel.take();
            return ControllerEvent::Idle;
        }
        if self.cancel.take() {
            return self.finish_cancelled();
        }
        if let Some(until) = self.next_step_at {
            if now < until {
                return ControllerEvent::Waiting { until };
            }
        }

        match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Idle => ControllerEvent::Idle,
            Mode::Single { mut run, optimal } => {
                let outcome = self.step(&mut run, None);
                if outcome == StepOutcome::Continue {
                    self.mode = Mode::Single { run, optimal };
                    self.schedule(now, self.config.step_delay_ms);
                    return ControllerEvent::Stepped;
                }

                let result = run.result();
                self.grid.set_path(&result.path, None);
                let stats = SearchStats::new(&result, optimal);
                info!(
                    "{} finished: found {}, {} visited, path {}",
                    result.algorithm, result.found(), result.nodes_visited, result.path_length
                );
                self.last_stats = Some(stats);
                self.last_result = Some(result.clone());
                self.next_step_at = None;
                ControllerEvent::Finished(result)
            }
            Mode::Comparison { stage, run, records } => {
                self.poll_comparison(now, stage, run, records)
            }
        }
    }

    fn poll_comparison(
        &mut self,
        now: Instant,
        stage: usize,
        run: Option<SearchRun>,
        mut records: Vec<ComparisonRecord>,
    ) -> ControllerEvent {
        let heuristic = Heuristic::ALL[stage];

        let Some(mut run) = run else {
            let density = self.config.obstacle_density;
            MazeGen::new(&mut self.rng).random_obstacles(&mut self.grid, density);
            self.grid.reset();
            let search = SearchConfig {
                algorithm: Algorithm::AStar,
                heuristic,
                allow_diagonal: self.config.allow_diagonal,
            };
            debug!("Comparison stage {} uses {}", stage + 1, heuristic);
            self.mode = Mode::Comparison {
                stage,
                run: Some(SearchRun::new(&self.grid, search)),
                records,
            };
            self.schedule(now, self.config.step_delay_ms);
            return ControllerEvent::StageStarted(heuristic);
        };

        let color = heuristic.color();
        if self.step(&mut run, Some(color)) == StepOutcome::Continue {
            self.mode = Mode::Comparison {
                stage,
                run: Some(run),
                records,
            };
            self.schedule(now, self.config.step_delay_ms);
            return ControllerEvent::Stepped;
        }

        let result = run.result();
        self.grid.set_path(&result.path, Some(color));
        let record = ComparisonRecord::new(&result);
        info!(
            "{} stage finished: path {}, {} visited",
            heuristic, record.path_length, record.nodes_visited
        );
        self.last_result = Some(result);
        records.push(record.clone());

        if stage + 1 == Heuristic::ALL.len() {
            self.last_comparison = records.clone();
            self.next_step_at = None;
            return ControllerEvent::ComparisonFinished(records);
        }

        self.mode = Mode::Comparison {
            stage: stage + 1,
            run: None,
            records,
        };
        self.schedule(now, self.config.settle_ms);
        ControllerEvent::StageFinished(record)
    }

    /// Blocking driver: polls until the run ends, sleeping through pacing
    /// delays and reporting every other event to `observer`.
    pub fn run_until_idle<F>(&mut self, mut observer: F) -> ControllerEvent
    where
        F: FnMut(&Grid, &ControllerEvent),
    {
        loop {
            let now = Instant::now();
            let event = self.poll(now);
            if let ControllerEvent::Waiting { until } = event {
                thread::sleep(until.saturating_duration_since(now));
                continue;
            }
            observer(&self.grid, &event);
            if event.ends_run() {
                return event;
            }
        }
    }

    /// One search step, mirrored onto the grid overlay.
    fn step(&mut self, run: &mut SearchRun, color: Option<Color>) -> StepOutcome {
        let expanded_before = run.visited().len();
        let outcome = run.advance();
        if let Some(&pos) = run.visited().get(expanded_before) {
            self.grid.mark_closed(pos, color);
        }
        for &pos in run.last_discovered() {
            self.grid.mark_discovered(pos, color);
        }
        outcome
    }

    fn schedule(&mut self, now: Instant, delay_ms: u64) {
        self.next_step_at = (delay_ms > 0).then(|| now + Duration::from_millis(delay_ms));
    }

    fn finish_cancelled(&mut self) -> ControllerEvent {
        let result = match std::mem::replace(&mut self.mode, Mode::Idle) {
            Mode::Idle => None,
            Mode::Single { mut run, .. } => Some(run.cancel()),
            Mode::Comparison { run, .. } => run.map(|mut r| r.cancel()),
        };
        info!("Run cancelled");
        if let Some(result) = &result {
            self.last_result = Some(result.clone());
        }
        self.next_step_at = None;
        ControllerEvent::Cancelled(result)
    }

    fn ensure_idle(&self) -> Result<(), ControlError> {
        if self.is_running() {
            debug!("Rejected request while a run is active");
            return Err(ControlError::RunInProgress);
        }
        Ok(())
    }
}
