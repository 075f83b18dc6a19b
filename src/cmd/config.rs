//! Config command - show the effective settings and optionally save them

use crate::config::Config;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Maximum reservation requests in flight while exporting
    #[arg(long)]
    concurrency: Option<usize>,

    /// Default directory for exported files
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write the effective settings to the config file
    #[arg(long)]
    save: bool,
}

impl ConfigCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let mut config = config.clone();
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }

        println!("{}", serde_json::to_string_pretty(&config)?);

        if self.save {
            let Some(path) = Config::default_path() else {
                anyhow::bail!("Cannot save config: no home directory (HOME or USERPROFILE) set");
            };
            config.save(&path)?;
            println!("Saved to {}", path.display());
        }
        Ok(())
    }
}
