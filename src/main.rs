use clap::{CommandFactory, Parser, Subcommand, builder::styling};
use eyre::{Result, WrapErr};
use owo_colors::OwoColorize;
use simple_pipeline::{
    PipelineConfig, TransformRegistry, ValidationRegistry,
    cli::{RunOptions, RunPlan, RunRequest, list_registered, run_etl, run_sql_script},
};

// CLI Styling
const STYLES: styling::Styles = styling::Styles::styled()
    .header(styling::AnsiColor::BrightWhite.on_default())
    .usage(styling::AnsiColor::BrightWhite.on_default())
    .literal(styling::AnsiColor::Green.on_default())
    .placeholder(styling::AnsiColor::Cyan.on_default());

/// Simple Pipeline: fetch a CSV, transform and validate it, then replace a Postgres table with it
#[derive(Parser, Debug)]
#[command(name = "pipeline", version, styles = STYLES)]
struct Cli {
    /// The dotenv file to source PG_CONN_STRING from when it is not already set
    #[arg(short, long, global = true, default_value = ".env")]
    env: String,

    /// More verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// Command to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract, transform, validate and load one source into one table
    Run {
        /// URL of the CSV to fetch, or a file path with --local-source
        source: String,

        /// Destination table as schema.table
        destination: String,

        /// Treat SOURCE as a local file path
        #[arg(long, alias = "local_source")]
        local_source: bool,

        /// Run the validation suite of the same name as the transform
        #[arg(long, alias = "validate_data")]
        validate_data: bool,

        /// Transform to apply; also names the validation suite
        #[arg(short, long, value_name = "TRANSFORM")]
        name: Option<String>,

        /// Option as KEY=VALUE; `name=<transform>` is the same as --name
        #[arg(short = 'o', long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },

    /// Run a SQL script with $OWNER and $REPO substituted
    Sql {
        /// Path to the .sql script
        script: String,

        /// Value substituted for $OWNER
        owner: String,

        /// Value substituted for $REPO
        repo: String,
    },

    /// List registered transforms and validation suites
    List,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        true => "debug",
        false => "info",
    };
    let env = env_logger::Env::default().filter_or("LOG_LEVEL", log_level);
    env_logger::Builder::from_env(env)
        .format_timestamp_millis()
        .init();

    let transforms = TransformRegistry::builtin();
    let suites = ValidationRegistry::builtin();

    match cli.command {
        Commands::Run {
            source,
            destination,
            local_source,
            validate_data,
            name,
            options,
        } => {
            let options = match RunOptions::from_pairs(options.as_slice())
                .and_then(|options| options.with_name(name))
            {
                Ok(options) => options,
                Err(reason) => Cli::command()
                    .error(clap::error::ErrorKind::InvalidValue, reason)
                    .exit(),
            };
            let request = RunRequest {
                source,
                destination,
                local_source,
                validate_data,
                options,
            };

            // Names resolve before credentials are read
            let plan = RunPlan::prepare(&request, &transforms, &suites)
                .wrap_err("Invalid run request")?;
            let config = PipelineConfig::from_env(&cli.env)
                .wrap_err("Failed to load configuration")?;

            log::info!(
                "Running {} → {}",
                request.source.bright_black(),
                plan.table().cyan()
            );
            run_etl(plan, &config).await.wrap_err("ETL run failed")?;
        }
        Commands::Sql {
            script,
            owner,
            repo,
        } => {
            let config = PipelineConfig::from_env(&cli.env)
                .wrap_err("Failed to load configuration")?;
            log::info!(
                "Executing {} for {}/{}",
                script.bright_black(),
                owner.cyan(),
                repo.cyan()
            );
            run_sql_script(&script, &owner, &repo, &config)
                .await
                .wrap_err_with(|| format!("Failed to execute {script}"))?;
        }
        Commands::List => {
            let (transform_names, suite_names) = list_registered(&transforms, &suites);
            println!("{}", "Transforms:".bright_white());
            for name in transform_names {
                println!("  {}", name.green());
            }
            println!("{}", "Validation suites:".bright_white());
            for name in suite_names {
                println!("  {}", name.green());
            }
        }
    }

    Ok(())
}
