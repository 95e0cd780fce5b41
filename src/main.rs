use clap::Parser;
use miette::{IntoDiagnostic, Result};
use wab::cli::{Cli, Commands};
use wab::core::Config;

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    // Without this, piping to `head`, `grep -q`, etc. causes a panic on broken pipe.
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

    wab::logging::init_logger(global.verbose, global.quiet);

    // Resolved once here and passed down; nothing below reads the environment
    let config = Config::load(global.config_overrides()).into_diagnostic()?;

    match cli.command {
        Commands::Generate(args) => wab::cli::commands::generate::run(args, &global),
        Commands::Import(args) => wab::cli::commands::import::run(args, &global, &config),
        Commands::Analyze(args) => wab::cli::commands::analyze::run(args, &global, &config),
        Commands::Dashboard(args) => wab::cli::commands::dashboard::run(args, &global, &config),
        Commands::Completions(args) => wab::cli::commands::completions::run(args),
    }
}
