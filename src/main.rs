//! Main binary for the stepwise CLI

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use stepwise::config::Config;
use stepwise::levels::{build_assistant, AgentAssistant, Assistant, Level};
use stepwise::provider::select_provider;
use stepwise::repl::{run_batch, run_interactive};
use stepwise::session::SessionLog;
use stepwise::{create_tool_registry, ToolArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stepwise",
    version,
    about = "Three levels of LLM tool use: answer-only, calculator tool, multi-step agent"
)]
struct Cli {
    /// Config file (default: config/stepwise.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for the per-level session logs
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RunArgs {
    /// Run the fixed list of example prompts
    #[arg(long, conflicts_with = "query")]
    demo: bool,

    /// Answer a single query and exit
    #[arg(short, long)]
    query: Option<String>,
}

#[derive(Args)]
struct AgentArgs {
    #[command(flatten)]
    run: RunArgs,

    /// Print the step memory as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// LLM-only assistant that refuses arithmetic
    Level1(RunArgs),
    /// LLM plus a calculator tool
    Level2(RunArgs),
    /// Multi-step agent with calculator, translator and capitals tools
    Level3(AgentArgs),
    /// List the available tools
    Tools {
        /// Print OpenAI function schemas instead of a table
        #[arg(long)]
        schema: bool,
    },
    /// Run a single tool directly
    Tool {
        name: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_level(
    mut assistant: Box<dyn Assistant>,
    args: &RunArgs,
    log: &SessionLog,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut output = stdout.lock();

    if let Some(query) = &args.query {
        run_batch(assistant.as_mut(), log, [query.as_str()], &mut output)?;
    } else if args.demo {
        let prompts = assistant.level().demo_prompts();
        run_batch(assistant.as_mut(), log, prompts.iter().copied(), &mut output)?;
    } else {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        run_interactive(assistant.as_mut(), log, &mut input, &mut output)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .or_else(|| std::env::var_os("STEPWISE_CONFIG").map(PathBuf::from));
    let mut config = Config::load(config_path.as_deref()).context("failed to load configuration")?;
    if let Some(dir) = cli.log_dir {
        config.session.log_dir = dir;
    }

    match cli.command {
        Commands::Level1(args) => {
            let log = SessionLog::for_level(&config.session.log_dir, Level::One);
            run_level(build_assistant(Level::One, &config), &args, &log)
        }
        Commands::Level2(args) => {
            let log = SessionLog::for_level(&config.session.log_dir, Level::Two);
            run_level(build_assistant(Level::Two, &config), &args, &log)
        }
        Commands::Level3(args) => {
            let log = SessionLog::for_level(&config.session.log_dir, Level::Three);
            let provider = select_provider(&config.provider, Level::Three.persona());
            let assistant = AgentAssistant::new(provider).with_json_output(args.json);
            run_level(Box::new(assistant), &args.run, &log)
        }
        Commands::Tools { schema } => {
            let registry = create_tool_registry();
            if schema {
                println!("{}", serde_json::to_string_pretty(&registry.get_all_schemas())?);
            } else {
                for name in registry.list_tools() {
                    if let Some(tool) = registry.get_tool(&name) {
                        println!("{:<16} {}", name, tool.description());
                        println!("{:<16} usage: {}", "", tool.signature());
                    }
                }
            }
            Ok(())
        }
        Commands::Tool { name, args } => {
            let mut registry = create_tool_registry();
            let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
            let tool_args = ToolArgs::from_args(&arg_refs);

            match registry.execute_tool(&name, &tool_args) {
                Ok(result) => {
                    println!("{}", result.message);
                    if !result.success {
                        std::process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
            Ok(())
        }
    }
}
