//! Terminal rendering for the CLI
//!
//! Rendering functions return `String`s so they can be tested; the `show_*`
//! helpers print status lines in the same style throughout the binary.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

use crate::dates;
use crate::shopping::{format_quantity, ShoppingList};
use crate::types::{format_prep_time, Meal, MealType, WeekPlan};

const SLOT_WIDTH: usize = 22;

/// Print an error line
pub fn show_error(error: &str) {
    eprintln!("{} {}", "Error:".red().bold(), error.red());
}

/// Print a warning line
pub fn show_warning(warning: &str) {
    eprintln!("{} {}", "Warning:".yellow().bold(), warning.yellow());
}

pub fn show_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn show_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// Section header with underline
pub fn show_section(title: &str) {
    println!("\n{}", title.bold().cyan());
    println!("{}", "-".repeat(60).cyan());
}

/// Spinner for store round-trips; hidden when progress output is off
pub fn spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut short: String = text.chars().take(width.saturating_sub(1)).collect();
    short.push('…');
    short
}

/// One line per meal: id, name, prep time, servings, tags
pub fn render_meal_list(meals: &[Meal]) -> String {
    if meals.is_empty() {
        return "No meals found.".dimmed().to_string();
    }

    meals
        .iter()
        .map(|meal| {
            let tags = if meal.tags.is_empty() {
                String::new()
            } else {
                format!(" [{}]", meal.tags.join(", "))
            };
            format!(
                "{:>4}  {}  {}  {}{}",
                format!("#{}", meal.id).dimmed(),
                meal.name.bold(),
                format_prep_time(meal.prep_time).cyan(),
                format!("serves {}", meal.servings).dimmed(),
                tags.magenta()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full details of a single meal
pub fn render_meal_card(meal: &Meal) -> String {
    let mut lines = vec![
        format!("{} {}", meal.name.bold().cyan(), format!("#{}", meal.id).dimmed()),
        format!(
            "Prep time: {}   Servings: {}",
            format_prep_time(meal.prep_time),
            meal.servings
        ),
    ];

    if !meal.tags.is_empty() {
        lines.push(format!("Tags: {}", meal.tags.join(", ").magenta()));
    }

    lines.push(String::new());
    lines.push("Ingredients:".bold().to_string());
    if meal.ingredients.is_empty() {
        lines.push(format!("  {}", "none".dimmed()));
    }
    for ingredient in &meal.ingredients {
        lines.push(format!(
            "  {} {} {} {}",
            "•".cyan(),
            format_quantity(ingredient.quantity),
            ingredient.unit,
            ingredient.name
        ));
    }

    if !meal.notes.trim().is_empty() {
        lines.push(String::new());
        lines.push("Notes:".bold().to_string());
        lines.push(format!("  {}", meal.notes.trim()));
    }

    lines.join("\n")
}

/// Seven day rows by three slot columns, headed by the week range
pub fn render_week(plan: &WeekPlan, meals: &[Meal]) -> String {
    let names: HashMap<u64, &str> = meals.iter().map(|m| (m.id, m.name.as_str())).collect();

    let mut lines = vec![
        format!("Week of {}", dates::format_week_range(plan.week_start))
            .bold()
            .cyan()
            .to_string(),
    ];

    let mut header = format!("{:<12}", "");
    for slot in MealType::ALL {
        header.push_str(&format!("{:<width$}", slot.label(), width = SLOT_WIDTH));
    }
    lines.push(header.trim_end().bold().to_string());

    let today = dates::today();
    for day in &plan.days {
        let label = format!("{:<12}", dates::format_date(day.date, "%a %b %-d"));
        let mut row = if day.date == today {
            label.green().bold().to_string()
        } else {
            label
        };

        for slot in MealType::ALL {
            let cell = match day.get(slot) {
                Some(id) => match names.get(&id) {
                    Some(name) => {
                        format!("{:<width$}", truncate(name, SLOT_WIDTH - 2), width = SLOT_WIDTH)
                    }
                    None => {
                        let missing = format!("(missing #{})", id);
                        format!("{:<width$}", missing, width = SLOT_WIDTH).red().to_string()
                    }
                },
                None => format!("{:<width$}", "-", width = SLOT_WIDTH).dimmed().to_string(),
            };
            row.push_str(&cell);
        }
        lines.push(row.trim_end().to_string());
    }

    lines.push(format!("{} of 21 slots planned", plan.filled_slots()).dimmed().to_string());
    lines.join("\n")
}

/// Numbered shopping list with check marks and a progress count
pub fn render_shopping_list(list: &ShoppingList) -> String {
    let mut lines = vec![
        format!("Shopping list for {}", dates::format_week_range(list.week_start))
            .bold()
            .cyan()
            .to_string(),
    ];

    if list.is_empty() {
        lines.push("No meals planned for this week.".dimmed().to_string());
        return lines.join("\n");
    }

    for (index, item) in list.items.iter().enumerate() {
        let text = format!(
            "{} {} {}",
            format_quantity(item.ingredient.quantity),
            item.ingredient.unit,
            item.ingredient.name
        );
        if item.checked {
            lines.push(format!(
                "{:>3}. {} {}",
                index + 1,
                "[x]".green(),
                text.dimmed().strikethrough()
            ));
        } else {
            lines.push(format!("{:>3}. [ ] {}", index + 1, text));
        }
    }

    lines.push(String::new());
    lines.push(
        format!("{} of {} items checked", list.checked_count(), list.len())
            .dimmed()
            .to_string(),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Ingredient;

    fn meal(id: u64, name: &str) -> Meal {
        Meal {
            id,
            name: name.to_string(),
            ingredients: vec![Ingredient::new("flour", 2.0, "cups")],
            prep_time: 75,
            servings: 4,
            tags: vec!["baking".to_string()],
            notes: "Rest the dough".to_string(),
            created_at: None,
        }
    }

    fn date(s: &str) -> chrono::NaiveDate {
        dates::string_to_date(s).unwrap()
    }

    #[test]
    fn test_meal_list() {
        let out = render_meal_list(&[meal(1, "Bread"), meal(2, "Pizza")]);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("Bread"));
        assert!(out.contains("1h 15m"));
        assert!(render_meal_list(&[]).contains("No meals found."));
    }

    #[test]
    fn test_meal_card() {
        let out = render_meal_card(&meal(7, "Bread"));
        assert!(out.contains("2 cups flour"));
        assert!(out.contains("Rest the dough"));
        assert!(out.contains("Servings: 4"));
    }

    #[test]
    fn test_week_calendar() {
        let mut plan = WeekPlan::empty(1, date("2025-01-05"));
        plan.days[1].set(MealType::Dinner, Some(7));
        plan.days[2].set(MealType::Lunch, Some(99));

        let out = render_week(&plan, &[meal(7, "Bread")]);
        assert!(out.contains("Jan 5 - Jan 11, 2025"));
        assert!(out.contains("Bread"));
        assert!(out.contains("(missing #99)"));
        assert!(out.contains("2 of 21 slots planned"));
        // header + column header + 7 days + footer
        assert_eq!(out.lines().count(), 10);
    }

    #[test]
    fn test_shopping_list() {
        let meals = vec![meal(1, "Bread"), meal(2, "Pizza")];
        let mut list = ShoppingList::from_meals(date("2025-01-05"), &meals);
        list.toggle(0).unwrap();

        let out = render_shopping_list(&list);
        assert!(out.contains("4 cups flour"));
        assert!(out.contains("[x]"));
        assert!(out.contains("1 of 1 items checked"));
    }

    #[test]
    fn test_empty_shopping_list() {
        let list = ShoppingList::from_meals(date("2025-01-05"), &Vec::<Meal>::new());
        assert!(render_shopping_list(&list).contains("No meals planned"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long meal name", 8), "a very …");
    }

    #[test]
    fn test_hidden_spinner() {
        let pb = spinner("Loading", false);
        assert!(pb.is_hidden());
        pb.finish_and_clear();
    }
}
