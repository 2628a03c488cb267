use clap::{ArgAction, Args, Parser, Subcommand};
use cover_rig::config::{self, RigConfig};
use cover_rig::imaging::{GraphServer, SignedUrlBuilder};
use cover_rig::job::{self, Job, JobOutput};
use cover_rig::rig::{BreakpointOptions, Rig, Source, SrcsetOptions};
use cover_rig::types::{Block, Params, parse_param};
use cover_rig::{html, output};
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

/// Cover image and backend flags shared by `css` and `srcset`.
#[derive(Args, Clone)]
struct CoverArgs {
    /// Cover image identifier or URL, passed to the backend as `input`
    #[arg(long)]
    src: String,

    /// Natural width of the cover image in pixels
    #[arg(long)]
    width: u32,

    /// Natural height of the cover image in pixels
    #[arg(long)]
    height: u32,

    /// Graph name (defaults to `defaults.graph` from the config)
    #[arg(long)]
    graph: Option<String>,

    /// Breakpoints, comma separated (defaults to `defaults.breakpoints`)
    #[arg(long, value_delimiter = ',')]
    breakpoints: Vec<f64>,

    /// Extra backend param as key=value (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, Value)>,
}

impl CoverArgs {
    fn source(&self) -> Source<GraphServer> {
        Source {
            block: Some(Block::with_cover(&self.src, self.width, self.height)),
            config: None,
            graph: self.graph.clone(),
            params: self.params.iter().cloned().collect::<Params>(),
        }
    }

    fn breakpoints(&self) -> Option<Vec<f64>> {
        (!self.breakpoints.is_empty()).then(|| self.breakpoints.clone())
    }
}

#[derive(Parser)]
#[command(name = "cover-rig")]
#[command(about = "Responsive background-image CSS and srcset for image graphs")]
#[command(long_about = "\
Responsive background-image CSS and srcset for image graphs

Given a cover image and its natural size, cover-rig works out the crop for
every breakpoint (downscale only, aspect ratio preserved) and asks the graph
server for matching URLs.

Job files (for `run`) are JSON, one job or an array:

  [
    { \"kind\": \"breakpoints\",
      \"block\": { \"cover\": { \"src\": \"hero.jpg\", \"width\": 2000, \"height\": 1000 } },
      \"property\": \"width\", \"selector\": \".hero\", \"breakpoints\": [480, 1024] },
    { \"kind\": \"srcset\",
      \"block\": { \"cover\": { \"src\": \"hero.jpg\", \"width\": 2000, \"height\": 1000 } } },
    { \"kind\": \"media\",
      \"block\": { \"cover\": { \"src\": \"hero.jpg\", \"width\": 2000, \"height\": 1000 } },
      \"items\": [ { \"query\": \"print\", \"selector\": \".hero\", \"width\": 1200 } ] }
  ]

Fields left out (config, graph, property, selector, breakpoints) come from
rig.toml. Run 'cover-rig gen-config' to generate a documented rig.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "rig.toml", global = true)]
    config: PathBuf,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a JSON job file
    Run {
        /// Job file (one job object or an array)
        jobs: PathBuf,
        /// Print results as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Media query CSS for breakpoint ranges
    Css {
        #[command(flatten)]
        cover: CoverArgs,
        /// Media query axis: width or height
        #[arg(long)]
        property: Option<String>,
        /// Selector receiving the background image
        #[arg(long)]
        selector: Option<String>,
        /// Wrap the CSS in a <style> element
        #[arg(long = "html")]
        as_html: bool,
    },
    /// Default src and srcset for a cover image
    Srcset {
        #[command(flatten)]
        cover: CoverArgs,
        /// Print an <img> tag instead of src/srcset lines
        #[arg(long = "html")]
        as_html: bool,
        /// Alt text for --html
        #[arg(long, default_value = "")]
        alt: String,
        /// sizes attribute for --html
        #[arg(long)]
        sizes: Option<String>,
    },
    /// Print a stock rig.toml with all options documented
    GenConfig,
}

fn init_tracing(verbosity: u8) -> Result<(), Box<dyn std::error::Error>> {
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter =
        EnvFilter::from_default_env().add_directive(format!("cover_rig={}", level).parse()?);
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config_path = cli.config;
    let rig = Rig::new(SignedUrlBuilder::new());

    match cli.command {
        Command::Run { jobs, json } => {
            let site = config::load_config(&config_path)?;
            run_jobs(&rig, &site, &jobs, json)?;
        }
        Command::Css {
            cover,
            property,
            selector,
            as_html,
        } => {
            let site = config::load_config(&config_path)?;
            let mut request = Job::Breakpoints(BreakpointOptions {
                source: cover.source(),
                property,
                selector,
                breakpoints: cover.breakpoints(),
            });
            request.fill_defaults(&site);
            if let JobOutput::Css(css) = job::run_job(&rig, &request)? {
                if as_html {
                    println!("{}", html::render_style(&css).into_string());
                } else {
                    println!("{}", css);
                }
            }
        }
        Command::Srcset {
            cover,
            as_html,
            alt,
            sizes,
        } => {
            let site = config::load_config(&config_path)?;
            let mut request = Job::Srcset(SrcsetOptions {
                source: cover.source(),
                breakpoints: cover.breakpoints(),
            });
            request.fill_defaults(&site);
            if let JobOutput::Srcset(set) = job::run_job(&rig, &request)? {
                if as_html {
                    println!(
                        "{}",
                        html::render_img(&set, &alt, sizes.as_deref()).into_string()
                    );
                } else {
                    output::print_srcset(&set);
                }
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load, fill and run a job file; fail if any job failed.
fn run_jobs(
    rig: &Rig<SignedUrlBuilder>,
    site: &RigConfig,
    path: &std::path::Path,
    as_json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut jobs: Vec<Job<GraphServer>> = job::load_jobs(path)?;
    for request in &mut jobs {
        request.fill_defaults(site);
    }

    init_thread_pool(&site.processing);
    let results = job::run_batch(rig, &jobs);
    let failed = results.iter().filter(|r| r.is_err()).count();

    if as_json {
        let values = results
            .iter()
            .map(|r| match r {
                Ok(out) => serde_json::to_value(out),
                Err(e) => Ok(json!({ "error": e.to_string() })),
            })
            .collect::<Result<Vec<_>, _>>()?;
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else {
        for (i, (request, result)) in jobs.iter().zip(&results).enumerate() {
            output::print_job_result(i + 1, request.kind(), request.label(), result);
        }
    }
    eprintln!("{}", output::format_batch_summary(jobs.len(), failed));

    if failed > 0 {
        return Err(format!("{} of {} jobs failed", failed, jobs.len()).into());
    }
    Ok(())
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores; config can only lower it.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
