//! mealplanner - Main CLI Entry Point

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

use mealplanner::{
    cli::{Args, BackendMode, Commands, Config, MealFields, MealsCommand, PlanCommand, Verbosity},
    dates, display,
    doctor::Doctor,
    server,
    services::MEAL_TABLE,
    shopping::ChecklistStore,
    store::{mock::demo_meals, MockStore, RemoteStore},
    types::MealType,
    validation::{parse_ingredient, MealForm},
    Planner, PlannerError,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbosity());

    let config = match Config::load(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            display::show_error(&e.to_string());
            std::process::exit(1);
        }
    };

    if args.no_color || !config.display.color_output {
        colored::control::set_override(false);
    }

    if let Err(e) = run(&args, config).await {
        display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}

/// Logs go to stderr; `RUST_LOG` wins over the -v/-q flags
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(args: &Args, config: Config) -> Result<()> {
    match &args.command {
        Commands::Meals { action } => {
            let planner = build_planner(args, &config).await?;
            run_meals(args, &planner, action).await
        }
        Commands::Plan { action } => {
            let planner = build_planner(args, &config).await?;
            run_plan(args, &planner, action).await
        }
        Commands::Shopping {
            week,
            check,
            clear,
            print,
        } => {
            let planner = build_planner(args, &config).await?;
            run_shopping(args, &config, &planner, week.as_deref(), check, *clear, *print).await
        }
        Commands::Serve { host, port } => {
            let planner = build_planner(args, &config).await?;
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }

            let address = config.server_addr();
            display::show_info(&format!(
                "Serving the {} store on http://{}",
                planner.store_name(),
                address
            ));
            server::serve(&address, planner).await?;
            Ok(())
        }
        Commands::Doctor => run_doctor(args, config).await,
        Commands::Config => {
            show_config(args, &config);
            Ok(())
        }
    }
}

/// Offline store when `--offline` or `backend.mode = "mock"`, hosted store
/// otherwise
async fn build_planner(args: &Args, config: &Config) -> Result<Planner> {
    if args.offline || config.backend.mode == BackendMode::Mock {
        let path = config.mock_data_file();
        let store = MockStore::open(&path)
            .await
            .with_context(|| format!("Failed to open offline data at {}", path.display()))?
            .with_delay(config.mock_delay());

        if config.mock.seed_demo {
            let seeded = store.seed_if_empty(MEAL_TABLE, demo_meals()?).await?;
            if seeded > 0 {
                debug!(seeded, "seeded demo meals");
            }
        }

        return Ok(Planner::new(Arc::new(store)));
    }

    config.validate()?;
    let store = RemoteStore::new(config.remote())?;
    Ok(Planner::new(Arc::new(store)))
}

fn parse_week(week: Option<&str>) -> Result<NaiveDate> {
    match week {
        Some(s) => Ok(dates::resolve_week(s, dates::today())?),
        None => Ok(dates::today()),
    }
}

/// Overlay the given CLI fields on a form
fn apply_fields(mut form: MealForm, fields: &MealFields) -> Result<MealForm> {
    if let Some(name) = &fields.name {
        form.name = name.clone();
    }
    if let Some(prep_time) = &fields.prep_time {
        form.prep_time = prep_time.clone();
    }
    if let Some(servings) = &fields.servings {
        form.servings = servings.clone();
    }
    if let Some(tags) = &fields.tags {
        form.tags = tags.clone();
    }
    if let Some(notes) = &fields.notes {
        form.notes = notes.clone();
    }
    if !fields.ingredients.is_empty() {
        form.ingredients = fields
            .ingredients
            .iter()
            .map(|line| parse_ingredient(line))
            .collect::<mealplanner::Result<Vec<_>>>()?;
    }
    Ok(form)
}

async fn run_meals(args: &Args, planner: &Planner, action: &MealsCommand) -> Result<()> {
    let progress = args.verbosity().show_progress();

    match action {
        MealsCommand::List { search } => {
            let pb = display::spinner("Loading meals...", progress);
            let meals = planner.search_meals(search.as_deref().unwrap_or("")).await;
            pb.finish_and_clear();
            println!("{}", display::render_meal_list(&meals?));
        }
        MealsCommand::Show { id } => {
            let meal = planner.meals().get_by_id(*id).await?;
            println!("{}", display::render_meal_card(&meal));
        }
        MealsCommand::Add(fields) => {
            let form = apply_fields(MealForm::default(), fields)?;
            let input = form.validate().map_err(PlannerError::from)?;

            let pb = display::spinner("Saving meal...", progress);
            let meal = planner.create_meal(&input).await;
            pb.finish_and_clear();
            let meal = meal?;
            display::show_success(&format!("Added meal #{} {}", meal.id, meal.name.bold()));
        }
        MealsCommand::Edit { id, fields } => {
            let existing = planner.meals().get_by_id(*id).await?;
            let form = apply_fields(MealForm::from_meal(&existing), fields)?;
            let input = form.validate().map_err(PlannerError::from)?;

            let meal = planner.update_meal(*id, &input).await?;
            display::show_success(&format!("Updated meal #{} {}", meal.id, meal.name.bold()));
        }
        MealsCommand::Delete { id } => {
            planner.delete_meal(*id).await?;
            display::show_success(&format!("Deleted meal #{}", id));
        }
    }

    Ok(())
}

async fn run_plan(args: &Args, planner: &Planner, action: &PlanCommand) -> Result<()> {
    match action {
        PlanCommand::Show { week } => {
            let week = parse_week(week.as_deref())?;
            let pb = display::spinner("Loading week...", args.verbosity().show_progress());
            let loaded = planner.week_with_meals(week).await;
            pb.finish_and_clear();

            let (plan, meals) = loaded?;
            println!("{}", display::render_week(&plan, &meals));
        }
        PlanCommand::Assign {
            date,
            slot,
            meal_id,
        } => {
            let date = dates::string_to_date(date)?;
            let slot: MealType = slot.parse()?;
            planner.assign_meal(date, date, slot, *meal_id).await?;
            display::show_success(&format!(
                "Scheduled meal #{} for {} on {}",
                meal_id,
                slot.label().to_lowercase(),
                dates::format_date(date, "%A, %b %-d")
            ));
        }
        PlanCommand::Remove { date, slot } => {
            let date = dates::string_to_date(date)?;
            let slot: MealType = slot.parse()?;
            planner.remove_meal(date, date, slot).await?;
            display::show_success(&format!(
                "Cleared {} on {}",
                slot.label().to_lowercase(),
                dates::format_date(date, "%A, %b %-d")
            ));
        }
        PlanCommand::Copy { from, to } => {
            let from = parse_week(Some(from.as_str()))?;
            let to = parse_week(Some(to.as_str()))?;
            let plan = planner.copy_week(from, to).await?;
            display::show_success(&format!(
                "Copied week of {} to week of {}",
                dates::format_week_range(dates::week_start(from)),
                dates::format_week_range(plan.week_start)
            ));
        }
    }

    Ok(())
}

async fn run_shopping(
    args: &Args,
    config: &Config,
    planner: &Planner,
    week: Option<&str>,
    check: &[usize],
    clear: bool,
    print: bool,
) -> Result<()> {
    let week = parse_week(week)?;
    let pb = display::spinner("Building shopping list...", args.verbosity().show_progress());
    let list = planner.shopping_list(week).await;
    pb.finish_and_clear();
    let mut list = list?;

    let checklist = ChecklistStore::new(config.state_dir())?;
    checklist.restore(&mut list)?;

    if clear {
        list.clear_checked();
    }
    for number in check {
        if *number == 0 {
            return Err(PlannerError::InvalidInput("Item numbers start at 1".to_string()).into());
        }
        list.toggle(number - 1)?;
    }
    if clear || !check.is_empty() {
        let path = checklist.save(&list)?;
        debug!(path = %path.display(), "checklist saved");
    }

    if print {
        println!("{}", list.render_plain());
    } else {
        println!("{}", display::render_shopping_list(&list));
    }

    Ok(())
}

async fn run_doctor(args: &Args, config: Config) -> Result<()> {
    let mut doctor = Doctor::new(config.clone(), args.offline);
    match build_planner(args, &config).await {
        Ok(planner) => doctor = doctor.with_planner(planner),
        Err(e) => display::show_warning(&format!("Store unavailable: {:#}", e)),
    }

    let checks = doctor.run_diagnostics().await;
    Doctor::display_results(&checks);

    std::process::exit(if Doctor::overall_status(&checks) { 0 } else { 1 });
}

fn mask(secret: &str) -> String {
    match secret.chars().count() {
        0 => "(not set)".dimmed().to_string(),
        n if n <= 4 => "****".to_string(),
        _ => format!("{}****", secret.chars().take(4).collect::<String>()),
    }
}

fn show_config(args: &Args, config: &Config) {
    display::show_section("mealplanner Configuration");

    let source = args
        .config
        .clone()
        .or_else(Config::default_path)
        .filter(|path| path.exists())
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in defaults".to_string());
    println!("Source: {}\n", source);

    let mode = if args.offline {
        "mock (--offline)".to_string()
    } else {
        format!("{:?}", config.backend.mode).to_lowercase()
    };

    println!("Backend:");
    println!("  Mode:        {}", mode);
    println!("  Base URL:    {}", config.backend.base_url);
    println!("  Project ID:  {}", mask(&config.backend.project_id));
    println!("  Public key:  {}", mask(&config.backend.public_key));
    println!("  Timeout:     {}s", config.backend.timeout_secs);
    println!();

    println!("Offline store:");
    println!("  Data file:   {}", config.mock_data_file().display());
    println!("  Delay:       {}ms", config.mock.delay_ms);
    println!("  Seed demo:   {}", if config.mock.seed_demo { "enabled" } else { "disabled" });
    println!();

    println!("Server:");
    println!("  Address:     {}", config.server_addr());
    println!();

    println!("Paths:");
    println!("  State dir:   {}", config.state_dir().display());
    println!("  Verbosity:   {:?}", args.verbosity());
    println!();
}
