//! Product category CLI
//!
//! Drives every `ProductCategoryDao` operation from the command line against
//! the database named in a connection settings file.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use shop_dao::{ProductCategory, ProductCategoryDao, ProductCategoryDaoDb};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "shop-categories")]
#[command(about = "Manage shop product categories")]
#[command(version)]
struct Cli {
    /// Connection settings file (db_name, db_url, db_user, db_password)
    #[arg(long, env = "SHOP_CONNECTION_CONFIG", default_value = "config/connection.properties")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every category
    List,

    /// Add a category
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        description: String,
    },

    /// Show the category with the given id
    Find { id: i32 },

    /// Print the id of the first category with the given name
    FindId { name: String },

    /// Delete the category with the given id
    Remove { id: i32 },

    /// Delete every category
    RemoveAll {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },

    /// Show the sentinel "All" category
    Default,
}

fn main() {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let dao = ProductCategoryDaoDb::connect(&cli.config);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = run(&dao, cli.command, &mut out) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run<D: ProductCategoryDao, W: Write>(dao: &D, command: Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::List => {
            let categories = dao.get_all().context("Failed to list categories")?;
            if categories.is_empty() {
                writeln!(out, "No categories")?;
            }
            for category in &categories {
                print_category(out, category)?;
            }
        }
        Commands::Add {
            name,
            department,
            description,
        } => {
            let id = dao
                .add(&ProductCategory::new(name, department, description))
                .context("Failed to add category")?;
            writeln!(out, "{} category {}", "Added".green(), id)?;
        }
        Commands::Find { id } => match dao.find(id).context("Failed to find category")? {
            Some(category) => print_category(out, &category)?,
            None => bail!("No category with id {}", id),
        },
        Commands::FindId { name } => {
            match dao.find_id_by_name(&name).context("Failed to look up category")? {
                Some(id) => writeln!(out, "{}", id)?,
                None => bail!("No category named '{}'", name),
            }
        }
        Commands::Remove { id } => {
            dao.remove(id).context("Failed to remove category")?;
            writeln!(out, "{} category {}", "Removed".green(), id)?;
        }
        Commands::RemoveAll { yes } => {
            if !yes {
                bail!("Refusing to delete every category without --yes");
            }
            let removed = dao.remove_all().context("Failed to remove categories")?;
            writeln!(out, "{} {} categories", "Removed".green(), removed)?;
        }
        Commands::Default => print_category(out, &dao.default_category())?,
    }
    Ok(())
}

fn print_category<W: Write>(out: &mut W, category: &ProductCategory) -> io::Result<()> {
    let id = category
        .id()
        .map_or_else(|| "-".to_string(), |id| id.to_string());
    writeln!(
        out,
        "{:>5}  {}  [{}]  {}",
        id,
        category.name.bold(),
        category.department,
        category.description
    )
}
