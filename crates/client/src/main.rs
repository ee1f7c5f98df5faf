use anyhow::Result;
use clap::{Parser, Subcommand};
use jobfeed_client::{
    Credentials, JobBrowser, JobOrigin, JobsClient, LocalState, StaticAuthenticator,
};
use jobfeed_core::{CanonicalJob, Config};

/// Browse job listings served by jobfeed-server.
#[derive(Debug, Parser)]
#[command(name = "jobfeed-client", version)]
struct Cli {
    /// Server base URL (overrides API_BASE_URL)
    #[arg(long)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and store the session marker locally.
    Login {
        #[arg(long)]
        user: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// List all jobs.
    Jobs,
    /// Show one job in full.
    Show { id: i64 },
    /// Ask the server to re-ingest now.
    Refresh,
}

fn print_origin_notice(origin: JobOrigin) {
    if origin == JobOrigin::Cached {
        eprintln!("(server unreachable, showing cached jobs)");
    }
}

fn print_job(job: &CanonicalJob) {
    println!("{}", job.title);
    println!("{} - {}", job.company, job.location);
    println!("Salary: {}", job.salary);
    if !job.apply_link.is_empty() {
        println!("Apply: {}", job.apply_link);
    }
    if !job.description.is_empty() {
        println!();
        println!("{}", job.description);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    jobfeed_core::config::load_dotenv();
    let config = Config::from_env().client;

    let base_url = cli.server.as_deref().unwrap_or(&config.api_base_url);
    let browser = JobBrowser::new(
        JobsClient::new(base_url),
        LocalState::new(&config.state_dir),
        Box::new(StaticAuthenticator::from_config(&config)),
    );

    match cli.command {
        Command::Login { user, password } => {
            let session = browser.login(&Credentials::new(user, password)).await?;
            println!("Logged in as {}", session.user);
        }
        Command::Logout => {
            browser.logout()?;
            println!("Logged out");
        }
        Command::Jobs => {
            let listing = browser.jobs().await?;
            print_origin_notice(listing.origin);
            println!("Job Listings ({})", listing.jobs.len());
            for job in &listing.jobs {
                println!("[{}] {} - {} - {}", job.id, job.title, job.company, job.location);
            }
        }
        Command::Show { id } => {
            let (job, origin) = browser.job(id).await?;
            print_origin_notice(origin);
            match job {
                Some(job) => print_job(&job),
                None => anyhow::bail!("no job with id {id}"),
            }
        }
        Command::Refresh => {
            let summary = browser.refresh().await?;
            println!("{} ({} jobs)", summary.message, summary.inserted);
        }
    }
    Ok(())
}
