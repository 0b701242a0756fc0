//! Command parsing and dispatch.

use anyhow::{bail, Context, Result};
use larder_core::{ApiError, Ingredient, Snapshot, Store};

/// Usage text printed for `help` and bad invocations.
pub const USAGE: &str = "\
Usage: larder <command> [args]

Commands:
  catalog [query]                              Show the ingredient catalog
  units                                        Show measurement units
  lists                                        Show your lists
  recipes                                      Show your recipes
  register                                     Register the current identity
  login <username>                             Store a bearer token in the keychain
  logout                                       Forget the stored token
  add <list> <ingredient> <type> <amount> [unit] [--custom]
  remove <list> <ingredient> <type>
  set <list> <ingredient> <type> <amount> [unit]
  move <from> <to> <ingredient> <type>
  new-list <name>
  delete-list <name>
  rename-list <old> <new>
  new-recipe <name>
  delete-recipe <name>
  recipe-add <recipe> <ingredient> <type> <amount> [unit] [--custom]
  recipe-remove <recipe> <ingredient> <type>
  add-step <recipe> <step>
  delete-step <recipe> <number>
  custom <name> <type>                         Create a custom ingredient
  delete-custom <name> <type>                  Delete a custom ingredient everywhere

Ingredients are matched by name and type; pass --custom for custom ones.";

/// Flag marking the ingredient argument as a custom ingredient.
const CUSTOM_FLAG: &str = "--custom";

#[derive(Debug, PartialEq)]
pub enum Command {
    Catalog { query: Option<String> },
    Units,
    Lists,
    Recipes,
    Register,
    Login { username: String },
    Logout,
    Add { list: String, ingredient: Ingredient },
    Remove { list: String, name: String, category: String },
    Set { list: String, name: String, category: String, amount: f64, unit: String },
    Move { from: String, to: String, name: String, category: String },
    NewList { name: String },
    DeleteList { name: String },
    RenameList { old: String, new: String },
    NewRecipe { name: String },
    DeleteRecipe { name: String },
    RecipeAdd { recipe: String, ingredient: Ingredient },
    RecipeRemove { recipe: String, name: String, category: String },
    AddStep { recipe: String, step: String },
    DeleteStep { recipe: String, number: usize },
    Custom { name: String, category: String },
    DeleteCustom { name: String, category: String },
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self> {
        let custom = args.iter().any(|a| a == CUSTOM_FLAG);
        let args: Vec<&String> = args.iter().filter(|a| *a != CUSTOM_FLAG).collect();

        let arg = |i: usize| -> Result<String> {
            args.get(i)
                .map(|a| a.to_string())
                .with_context(|| format!("Missing argument {}\n\n{}", i, USAGE))
        };
        let amount = |i: usize| -> Result<f64> {
            let raw = arg(i)?;
            raw.parse()
                .with_context(|| format!("Amount must be a number: {}", raw))
        };
        let unit = |i: usize| args.get(i).map(|a| a.to_string()).unwrap_or_default();
        let ingredient = |i: usize| -> Result<Ingredient> {
            Ok(Ingredient::new(arg(i)?, arg(i + 1)?, custom).with_amount(amount(i + 2)?, unit(i + 3)))
        };

        let Some(name) = args.first() else {
            bail!("{}", USAGE);
        };

        let command = match name.as_str() {
            "catalog" => Command::Catalog { query: args.get(1).map(|a| a.to_string()) },
            "units" => Command::Units,
            "lists" => Command::Lists,
            "recipes" => Command::Recipes,
            "register" => Command::Register,
            "login" => Command::Login { username: arg(1)? },
            "logout" => Command::Logout,
            "add" => Command::Add {
                list: arg(1)?,
                ingredient: ingredient(2)?,
            },
            "remove" => Command::Remove {
                list: arg(1)?,
                name: arg(2)?,
                category: arg(3)?,
            },
            "set" => Command::Set {
                list: arg(1)?,
                name: arg(2)?,
                category: arg(3)?,
                amount: amount(4)?,
                unit: unit(5),
            },
            "move" => Command::Move {
                from: arg(1)?,
                to: arg(2)?,
                name: arg(3)?,
                category: arg(4)?,
            },
            "new-list" => Command::NewList { name: arg(1)? },
            "delete-list" => Command::DeleteList { name: arg(1)? },
            "rename-list" => Command::RenameList { old: arg(1)?, new: arg(2)? },
            "new-recipe" => Command::NewRecipe { name: arg(1)? },
            "delete-recipe" => Command::DeleteRecipe { name: arg(1)? },
            "recipe-add" => Command::RecipeAdd {
                recipe: arg(1)?,
                ingredient: ingredient(2)?,
            },
            "recipe-remove" => Command::RecipeRemove {
                recipe: arg(1)?,
                name: arg(2)?,
                category: arg(3)?,
            },
            "add-step" => Command::AddStep { recipe: arg(1)?, step: arg(2)? },
            "delete-step" => {
                let raw = arg(2)?;
                let number = raw
                    .parse()
                    .with_context(|| format!("Step number must be a positive integer: {}", raw))?;
                Command::DeleteStep { recipe: arg(1)?, number }
            }
            "custom" => Command::Custom { name: arg(1)?, category: arg(2)? },
            "delete-custom" => Command::DeleteCustom { name: arg(1)?, category: arg(2)? },
            other => bail!("Unknown command: {}\n\n{}", other, USAGE),
        };
        Ok(command)
    }
}

/// Print a read's items, then its refresh error if there was one.
fn print_snapshot<T>(snapshot: Snapshot<T>, line: impl Fn(&T) -> String) -> Result<()> {
    for item in &snapshot.items {
        println!("{}", line(item));
    }
    match snapshot.refresh_error {
        Some(e) => Err(e).context("Could not refresh from the server; showing cached data"),
        None => Ok(()),
    }
}

fn done(result: Result<(), ApiError>, message: &str) -> Result<()> {
    result.context("The server rejected the change")?;
    println!("{}", message);
    Ok(())
}

/// Resolve an ingredient on a cached list by name and type, so custom and
/// common entries are told apart.
async fn find_on_list(store: &Store, list: &str, name: &str, category: &str) -> Result<Ingredient> {
    let lists = store.get_my_lists().await.into_result()?;
    lists
        .iter()
        .find(|l| l.name == list)
        .with_context(|| format!("No list named {}", list))?
        .ingredients
        .iter()
        .find(|i| i.name == name && i.category == category)
        .cloned()
        .with_context(|| format!("{} ({}) is not on {}", name, category, list))
}

async fn find_in_recipe(store: &Store, recipe: &str, name: &str, category: &str) -> Result<Ingredient> {
    let recipes = store.get_all_recipes().await.into_result()?;
    recipes
        .iter()
        .find(|r| r.name == recipe)
        .with_context(|| format!("No recipe named {}", recipe))?
        .ingredients
        .ingredients
        .iter()
        .find(|i| i.name == name && i.category == category)
        .cloned()
        .with_context(|| format!("{} ({}) is not in {}", name, category, recipe))
}

pub async fn run(store: &Store, command: Command) -> Result<()> {
    match command {
        Command::Catalog { query } => {
            let snapshot = match query {
                Some(q) => store.search_catalog(&q).await,
                None => store.get_all_ingredients().await,
            };
            print_snapshot(snapshot, |i| {
                let custom = if i.is_custom { " (custom)" } else { "" };
                format!("{:<30} {}{}", i.name, i.category, custom)
            })
        }
        Command::Units => print_snapshot(store.get_measurement_units().await, |u| u.clone()),
        Command::Lists => print_snapshot(store.get_my_lists().await, |l| {
            let mut out = format!("{} ({} items)", l.name, l.len());
            for i in &l.ingredients {
                out.push_str(&format!("\n  - {} {}", i.amount_display(), i.name));
            }
            out
        }),
        Command::Recipes => print_snapshot(store.get_all_recipes().await, |r| {
            let mut out = format!("{} ({} ingredients, {} steps)", r.name, r.ingredients.len(), r.step_count());
            for (n, step) in r.steps.iter().enumerate() {
                out.push_str(&format!("\n  {}. {}", n + 1, step));
            }
            out
        }),
        Command::Register => done(store.create_user().await, "Registered"),
        Command::Add { list, ingredient } => {
            let name = ingredient.name.clone();
            done(
                store.add_ingredient_to_list(&list, ingredient).await,
                &format!("Added {} to {}", name, list),
            )
        }
        Command::Remove { list, name, category } => {
            let ingredient = find_on_list(store, &list, &name, &category).await?;
            done(
                store.remove_ingredient_from_list(&list, &ingredient).await,
                &format!("Removed {} from {}", name, list),
            )
        }
        Command::Set { list, name, category, amount, unit } => {
            let ingredient = find_on_list(store, &list, &name, &category).await?;
            done(
                store.set_ingredient(&list, &ingredient, amount, &unit).await,
                &format!("Set {} on {} to {} {}", name, list, amount, unit),
            )
        }
        Command::Move { from, to, name, category } => {
            let ingredient = find_on_list(store, &from, &name, &category).await?;
            done(
                store.move_ingredient(&from, &ingredient, &to, ingredient.clone()).await,
                &format!("Moved {} from {} to {}", name, from, to),
            )
        }
        Command::NewList { name } => done(store.create_list(&name).await, &format!("Created {}", name)),
        Command::DeleteList { name } => done(store.delete_list(&name).await, &format!("Deleted {}", name)),
        Command::RenameList { old, new } => done(
            store.rename_list(&old, &new).await,
            &format!("Renamed {} to {}", old, new),
        ),
        Command::NewRecipe { name } => done(store.create_recipe(&name).await, &format!("Created recipe {}", name)),
        Command::DeleteRecipe { name } => done(store.delete_recipe(&name).await, &format!("Deleted recipe {}", name)),
        Command::RecipeAdd { recipe, ingredient } => {
            let name = ingredient.name.clone();
            done(
                store.add_ingredient_to_recipe(&recipe, ingredient).await,
                &format!("Added {} to {}", name, recipe),
            )
        }
        Command::RecipeRemove { recipe, name, category } => {
            let ingredient = find_in_recipe(store, &recipe, &name, &category).await?;
            done(
                store.delete_ingredient_in_recipe(&recipe, &ingredient).await,
                &format!("Removed {} from {}", name, recipe),
            )
        }
        Command::AddStep { recipe, step } => done(
            store.add_step_to_recipe(&recipe, &step).await,
            &format!("Added a step to {}", recipe),
        ),
        Command::DeleteStep { recipe, number } => done(
            store.delete_step_from_recipe(&recipe, number).await,
            &format!("Deleted step {} from {}", number, recipe),
        ),
        Command::Custom { name, category } => done(
            store.create_custom_ingredient(&name, &category).await,
            &format!("Created custom ingredient {}", name),
        ),
        Command::DeleteCustom { name, category } => done(
            store.delete_custom_ingredient(&name, &category).await,
            &format!("Deleted custom ingredient {}", name),
        ),
        // Handled before a Store exists
        Command::Login { .. } | Command::Logout => Ok(()),
    }
}
