use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use chipdex::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Terminate silently on a closed pipe (`chipdex search | head`)
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let filter = if std::env::var_os("RUST_LOG").is_some() {
        EnvFilter::from_default_env()
    } else if global.verbose {
        EnvFilter::new("chipdex=debug")
    } else {
        EnvFilter::new("chipdex=warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Search(args) => chipdex::cli::commands::search::run(args, &global),
        Commands::Resolve(args) => chipdex::cli::commands::resolve::run(args, &global),
        Commands::Alt(args) => chipdex::cli::commands::alt::run(args, &global),
        Commands::Marking(args) => chipdex::cli::commands::marking::run(args, &global),
        Commands::Categories(args) => chipdex::cli::commands::categories::run(args, &global),
        Commands::Show(args) => chipdex::cli::commands::show::run(args, &global),
        Commands::Completions(args) => chipdex::cli::commands::completions::run(args),
    }
}
