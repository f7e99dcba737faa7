//! Command-line argument parsing for mealplanner
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// mealplanner - plan your week of meals and shop for it
#[derive(Parser, Debug)]
#[command(name = "mealplanner")]
#[command(author = "Jerome (Kubashen) Naidoo")]
#[command(version)]
#[command(about = "Plan a week of meals and get a consolidated shopping list", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Use the local offline store instead of the hosted record store
    #[arg(long, global = true)]
    pub offline: bool,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage the meal library
    Meals {
        #[command(subcommand)]
        action: MealsCommand,
    },

    /// View and edit the weekly calendar
    Plan {
        #[command(subcommand)]
        action: PlanCommand,
    },

    /// Show the consolidated shopping list for a week
    Shopping {
        /// this, next, last, or any date in the week (defaults to this week)
        #[arg(short, long)]
        week: Option<String>,

        /// Toggle the checked state of item numbers (1-based)
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        check: Vec<usize>,

        /// Uncheck every item
        #[arg(long)]
        clear: bool,

        /// Print a plain list suitable for paper
        #[arg(long)]
        print: bool,
    },

    /// Serve the JSON API
    Serve {
        /// Interface to bind (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run configuration and backend health checks
    Doctor,

    /// Display current configuration
    Config,
}

#[derive(Subcommand, Debug)]
pub enum MealsCommand {
    /// List meals, newest first
    List {
        /// Filter by name, tag or ingredient
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show one meal
    Show { id: u64 },

    /// Add a meal to the library
    Add(MealFields),

    /// Edit a meal; omitted fields keep their value
    Edit {
        id: u64,

        #[command(flatten)]
        fields: MealFields,
    },

    /// Delete a meal
    Delete { id: u64 },
}

/// Meal fields shared by `add` and `edit`
#[derive(ClapArgs, Debug, Default, Clone)]
pub struct MealFields {
    #[arg(short, long)]
    pub name: Option<String>,

    /// Preparation time in minutes
    #[arg(short, long)]
    pub prep_time: Option<String>,

    #[arg(short, long)]
    pub servings: Option<String>,

    /// Ingredient line such as "2 cups flour" (repeatable; replaces the
    /// existing list on edit)
    #[arg(short, long = "ingredient")]
    pub ingredients: Vec<String>,

    /// Comma separated tags
    #[arg(short, long)]
    pub tags: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PlanCommand {
    /// Show the calendar for a week
    Show {
        /// this, next, last, or any date in the week (defaults to this week)
        #[arg(short, long)]
        week: Option<String>,
    },

    /// Put a meal into a slot
    Assign {
        /// Day (yyyy-MM-dd)
        date: String,
        /// breakfast, lunch or dinner
        slot: String,
        meal_id: u64,
    },

    /// Clear a slot
    Remove {
        /// Day (yyyy-MM-dd)
        date: String,
        /// breakfast, lunch or dinner
        slot: String,
    },

    /// Copy every slot of one week onto another
    Copy {
        /// Source week: this, next, last, or any date in it
        #[arg(long)]
        from: String,
        /// Target week: this, next, last, or any date in it
        #[arg(long)]
        to: String,
    },
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Default `tracing` filter directive
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "mealplanner=info",
            Verbosity::VeryVerbose => "mealplanner=debug,info",
        }
    }

    /// Check if should show spinners
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }
}
