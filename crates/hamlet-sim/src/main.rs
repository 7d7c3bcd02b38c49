//! Command-line driver for the Hamlet grid-world simulation.

mod telemetry;

use anyhow::{Context, Result};
use clap::Parser;
use hamlet_core::{AgentId, Gender, SimConfig};
use hamlet_world::{EventSink, MoveEvent, Simulation, World};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

/// Simulate villagers wandering a bounded grid of capacity-limited cells
#[derive(Parser, Debug)]
#[command(name = "hamlet-sim")]
#[command(about = "Day-by-day simulation of agents on a capacity-limited grid")]
struct Args {
    /// JSON configuration file; command-line flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of days to simulate
    #[arg(long)]
    days: Option<u64>,

    /// Grid width
    #[arg(long)]
    width: Option<i32>,

    /// Grid height
    #[arg(long)]
    height: Option<i32>,

    /// Maximum summed agent size per cell
    #[arg(long)]
    capacity: Option<u32>,

    /// Number of agents generated at startup
    #[arg(long)]
    agents: Option<usize>,

    /// Shared last name for every generated agent
    #[arg(long)]
    last_name: Option<String>,

    /// Give every generated agent this gender ("Male" or "Female")
    #[arg(long)]
    gender: Option<Gender>,

    /// Shuffle the roster at the start of every day
    #[arg(long)]
    shuffle: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Print the end-of-run summary as JSON
    #[arg(long)]
    summary_json: bool,
}

impl Args {
    fn into_config(self) -> Result<SimConfig> {
        let mut config = match &self.config {
            Some(path) => SimConfig::from_file(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => SimConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(days) = self.days {
            config.days = days;
        }
        if let Some(width) = self.width {
            config.world.width = width;
        }
        if let Some(height) = self.height {
            config.world.height = height;
        }
        if let Some(capacity) = self.capacity {
            config.world.cell_capacity = capacity;
        }
        if let Some(agents) = self.agents {
            config.population.initial_agents = agents;
        }
        if self.last_name.is_some() {
            config.population.shared_last_name = self.last_name;
        }
        if self.gender.is_some() {
            config.population.gender = self.gender;
        }
        config.shuffle_order |= self.shuffle;

        config.validate()?;
        Ok(config)
    }
}

/// Prints the day log, resolving agent ids to names
struct ConsoleReporter<W: Write> {
    out: W,
    names: HashMap<AgentId, String>,
    error: Option<io::Error>,
}

impl<W: Write> ConsoleReporter<W> {
    fn new(world: &World, out: W) -> Self {
        Self {
            out,
            names: world
                .agents()
                .map(|agent| (agent.id(), agent.name.to_string()))
                .collect(),
            error: None,
        }
    }

    fn write_line(&mut self, line: std::fmt::Arguments<'_>) {
        if self.error.is_none() {
            if let Err(err) = writeln!(self.out, "{line}") {
                self.error = Some(err);
            }
        }
    }

    /// Hand back the writer, or the first write error
    fn finish(self) -> io::Result<W> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.out),
        }
    }
}

impl<W: Write> EventSink for ConsoleReporter<W> {
    fn begin_day(&mut self, day: u64) {
        self.write_line(format_args!("--- Day {day} ---"));
    }

    fn record(&mut self, event: MoveEvent) {
        let name = self
            .names
            .get(&event.agent())
            .cloned()
            .unwrap_or_else(|| event.agent().to_string());

        match event {
            MoveEvent::Moved { position, .. } => {
                self.write_line(format_args!("{name} moved to {position}."));
            }
            MoveEvent::Blocked { position, .. } => {
                self.write_line(format_args!("{name} could not move from {position}."));
            }
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    telemetry::init_telemetry(args.json_logs)?;

    let summary_json = args.summary_json;
    let config = args.into_config()?;
    info!(
        seed = config.seed,
        days = config.days,
        width = config.world.width,
        height = config.world.height,
        "Starting Hamlet simulation"
    );

    let mut sim = Simulation::new(config)?;

    for failure in sim.placement_failures() {
        println!("Could not place {} at {}.", failure.name, failure.position);
    }

    let mut reporter = ConsoleReporter::new(sim.world(), io::stdout().lock());
    let result = sim.run(&mut reporter);
    reporter.finish().context("failed to write day log")?;

    if summary_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
