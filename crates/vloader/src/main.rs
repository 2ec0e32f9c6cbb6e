use clap::{Args, Parser, Subcommand};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use vloader::command::{Command, SOCKET_PATH};
use vloader::config::{Colour, LoaderConfig};
use vloader::geometry::Bounds;
use vloader::host::HeadlessContainer;
use vloader::layout::compute_positions;
use vloader::widget::VerticalLoader;

#[derive(Parser, Debug)]
#[command(name = "vloader", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Start the animation in the running loader
    Start,
    /// Stop the animation, keeping the gap where it is
    Stop,
    /// Start when stopped, stop when running
    Toggle,
    /// Make every following step three times slower
    Slower,
    /// Make every following step three times faster
    Faster,
    /// Print whether the running loader is animating
    Status,
    /// Print the resting positions for a column of the given height
    Layout(ColumnArgs),
    /// Print the first steps the animation would take, without a window
    Steps {
        #[command(flatten)]
        column: ColumnArgs,

        /// How many steps to print
        #[arg(short = 'n', long, default_value_t = 16)]
        ticks: usize,
    },
}

#[derive(Args, Debug, Clone)]
struct ColumnArgs {
    /// Container height
    #[arg(long, default_value_t = 200.0)]
    height: f64,

    /// Container width
    #[arg(long, default_value_t = 20.0)]
    width: f64,

    #[arg(short = 'c', long)]
    count: Option<usize>,

    #[arg(short = 'r', long)]
    radius: Option<f64>,

    /// Gap size as a percentage of the height
    #[arg(short = 'g', long)]
    gap: Option<f64>,

    /// Index of the first circle below the gap
    #[arg(short = 'l', long)]
    location: Option<usize>,

    #[arg(long)]
    colour: Option<Colour>,
}

impl ColumnArgs {
    fn config(&self) -> anyhow::Result<LoaderConfig> {
        let defaults = LoaderConfig::default();
        let config = LoaderConfig {
            circle_radius: self.radius.unwrap_or(defaults.circle_radius),
            circle_colour: self.colour.unwrap_or(defaults.circle_colour),
            circles_count: self.count.unwrap_or(defaults.circles_count),
            gap_percentage: self.gap.unwrap_or(defaults.gap_percentage),
            gap_location: self.location.unwrap_or(defaults.gap_location),
        };
        Ok(config.validated()?)
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => send_command(Command::Start),
        Commands::Stop => send_command(Command::Stop),
        Commands::Toggle => send_command(Command::Toggle),
        Commands::Slower => send_command(Command::Slower),
        Commands::Faster => send_command(Command::Faster),
        Commands::Status => send_command(Command::Status),
        Commands::Layout(column) => print_layout(&column),
        Commands::Steps { column, ticks } => print_steps(&column, ticks),
    }
}

fn print_layout(column: &ColumnArgs) -> anyhow::Result<()> {
    let config = column.config()?;
    for (i, point) in compute_positions(&config, column.bounds())
        .iter()
        .enumerate()
    {
        println!("{:>3}  x={:>8.3}  y={:>8.3}", i, point.x, point.y);
    }
    Ok(())
}

fn print_steps(column: &ColumnArgs, ticks: usize) -> anyhow::Result<()> {
    let container = HeadlessContainer::new(column.bounds());
    let mut loader = VerticalLoader::new(column.config()?, container)?;

    let mut next = loader.start_animating();
    for _ in 0..ticks {
        let Some(step) = next else { break };
        println!(
            "{:>6}  circle {:>3}  y={:>8.3}  gap={}",
            step.token,
            step.slot,
            step.target_y,
            loader.animator().index()
        );
        loader.place(step.slot, step.target_y);
        next = loader.finish_step(step.token);
    }
    loader.stop_animating();
    Ok(())
}

fn send_command(command: Command) -> anyhow::Result<()> {
    let mut stream = UnixStream::connect(SOCKET_PATH).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to loader at {}: {}. Is vloader-gtk running?",
            SOCKET_PATH,
            e
        )
    })?;

    writeln!(stream, "{}", command)?;

    if command.expects_reply() {
        let mut reply = String::new();
        BufReader::new(&stream).read_line(&mut reply)?;
        println!("{}", reply.trim());
    }
    Ok(())
}
