use clap::Parser;
use git_dirupdate::cli::Cli;
use git_dirupdate::{output, workspace};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config();

    let root = workspace::expand_root(&cli.root)?;
    workspace::run(&root, &config, output::confirm_update, |path| {
        output::repo_callbacks(path, &config)
    })?;

    Ok(())
}
