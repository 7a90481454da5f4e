use anyhow::Result;
use ballstick_assets::samples;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for ballstick")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// fmt, clippy and tests
    Check,
    /// cargo fmt --check
    Fmt,
    /// clippy with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Run the render benchmark in release mode
    Bench,
    /// Render every bundled sample to PNG through the CLI
    Gallery {
        #[arg(short, long, default_value = "target/gallery")]
        out_dir: PathBuf,
        /// Named view for every image
        #[arg(long, default_value = "iso")]
        view: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check => {
            cargo("fmt check", &["fmt", "--all", "--", "--check"])?;
            cargo("clippy", CLIPPY)?;
            cargo("test", &["test", "--workspace"])?;
        }
        Commands::Fmt => cargo("fmt check", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => cargo("clippy", CLIPPY)?,
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Bench => cargo(
            "render bench",
            &["bench", "-p", "ballstick-render", "--bench", "bench_render"],
        )?,
        Commands::Gallery { out_dir, view } => {
            std::fs::create_dir_all(&out_dir)?;
            for molecule in samples::all() {
                let output = out_dir.join(format!("{}.png", molecule.id));
                let output = output.to_string_lossy();
                cargo(
                    &format!("render {}", molecule.id),
                    &[
                        "run", "-q", "-p", "ballstick-cli", "--", "render", &molecule.id,
                        "--view", &view, "-o", &output,
                    ],
                )?;
            }
            println!("Gallery written to {}", out_dir.display());
        }
    }

    Ok(())
}

const CLIPPY: &[&str] = &[
    "clippy",
    "--workspace",
    "--all-targets",
    "--",
    "-D",
    "warnings",
];

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> {step}: cargo {}", args.join(" "));
    let status = Command::new("cargo").args(args).status()?;
    if !status.success() {
        anyhow::bail!("{step} failed");
    }
    Ok(())
}
