use clap::Parser;

use grid_search::batch_simulation::BatchSimulation;
use grid_search::config::Config;
use grid_search::grid::Grid;
use grid_search::simulation::{Controller, ControllerEvent};
use grid_search::statistics::print_comparison_results;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    println!("Starting grid search...");
    println!("Grid size: {}x{}", config.cols, config.rows);

    if config.batch_mode {
        let mut batch = BatchSimulation::new(config.clone());
        match batch.run() {
            Ok(()) => {
                if !config.quiet {
                    batch.print_summary();
                }
            }
            Err(e) => {
                eprintln!("Batch simulation failed: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let mut controller = match Controller::new(config.clone()) {
        Ok(controller) => controller,
        Err(e) => {
            eprintln!("Failed to build grid: {}", e);
            std::process::exit(1);
        }
    };

    let visualize = !config.no_visualization;
    if !visualize {
        controller.set_step_delay(0);
        controller.set_settle(0);
    } else {
        println!("Visualization enabled with {}ms delay", config.step_delay_ms);
    }

    let started = if config.compare {
        println!("Comparing heuristics with A* at density {}", config.obstacle_density);
        controller.start_comparison()
    } else {
        println!(
            "Algorithm: {} | Heuristic: {} | Diagonal: {}",
            config.algorithm, config.heuristic, config.allow_diagonal
        );
        controller.start_search(config.search_config())
    };
    if let Err(e) = started {
        eprintln!("Could not start: {}", e);
        std::process::exit(1);
    }

    let quiet = config.quiet;
    let final_event = controller.run_until_idle(|grid, event| {
        if visualize {
            draw(grid, event);
        } else if !quiet {
            match event {
                ControllerEvent::StageStarted(h) => println!("Running A* with {}", h),
                ControllerEvent::StageFinished(record) => println!(
                    "{}: path {}, {} visited",
                    record.heuristic, record.path_length, record.nodes_visited
                ),
                _ => {}
            }
        }
    });

    println!("\n=== FINAL RESULTS ===");
    match final_event {
        ControllerEvent::ComparisonFinished(records) => print_comparison_results(&records),
        ControllerEvent::Finished(_) => {
            if let Some(stats) = controller.last_stats() {
                println!("{}", stats);
            }
        }
        ControllerEvent::Cancelled(_) => println!("Search cancelled"),
        _ => {}
    }
}

fn draw(grid: &Grid, event: &ControllerEvent) {
    // Clear screen and home the cursor.
    print!("\x1B[2J\x1B[1;1H");
    println!("=== GRID SEARCH ===");
    match event {
        ControllerEvent::StageStarted(h) => println!("Stage: {}", h),
        ControllerEvent::Finished(result) => println!(
            "Finished: {} visited, path length {}",
            result.nodes_visited, result.path_length
        ),
        _ => println!("Expanded: {}", grid.visited_order().len()),
    }
    print!("{}", grid.snapshot());
}
