use clap::{Parser, Subcommand};
use dishcheck_core::config::resolve_catalog_dir;
use dishcheck_core::constants::DEFAULT_ALLERGENS_FILENAME;
use dishcheck_core::{aggregate, Catalog, CoreConfig, IngredientFilter};
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dishcheck")]
#[command(about = "Allergen checks against the dishcheck catalog")]
struct Cli {
    /// Directory holding allergens.json and ingredients.json
    #[arg(long, global = true, env = "DISHCHECK_CATALOG_DIR")]
    catalog_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the catalog and report whether it is consistent
    Validate,
    /// List allergens
    Allergens,
    /// List ingredients
    Ingredients {
        /// Only commonly used ingredients
        #[arg(long)]
        common: bool,
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        /// Only ingredients containing this allergen code
        #[arg(long)]
        allergen: Option<String>,
    },
    /// List ingredient categories with their ingredient codes
    Categories,
    /// Show the allergens of a dish made of the given ingredient codes
    Check {
        /// Ingredient codes
        #[arg(required = true)]
        codes: Vec<String>,
    },
}

fn load_catalog(catalog_dir: Option<PathBuf>) -> Result<Catalog, Box<dyn std::error::Error>> {
    let dir = resolve_catalog_dir(catalog_dir, DEFAULT_ALLERGENS_FILENAME)?;
    Ok(Catalog::load(&CoreConfig::with_defaults(dir))?)
}

fn run(cli: Cli, out: &mut dyn Write) -> Result<(), Box<dyn std::error::Error>> {
    let Some(command) = cli.command else {
        writeln!(out, "Use 'dishcheck --help' for commands")?;
        return Ok(());
    };
    let catalog = load_catalog(cli.catalog_dir)?;

    match command {
        Commands::Validate => {
            writeln!(
                out,
                "Catalog OK: {} allergens, {} ingredients",
                catalog.allergens().len(),
                catalog.ingredients().len()
            )?;
        }
        Commands::Allergens => {
            for allergen in catalog.allergens() {
                match &allergen.description {
                    Some(description) => {
                        writeln!(out, "{}: {} ({})", allergen.code, allergen.name, description)?
                    }
                    None => writeln!(out, "{}: {}", allergen.code, allergen.name)?,
                }
            }
        }
        Commands::Ingredients {
            common,
            category,
            allergen,
        } => {
            let filter = IngredientFilter::default()
                .common_only(common)
                .category(category)
                .allergen(allergen);
            for ingredient in catalog.select(&filter) {
                let allergens: Vec<&str> =
                    ingredient.allergen_codes.iter().map(|c| c.as_str()).collect();
                writeln!(
                    out,
                    "{}: {} [{}] allergens: {}",
                    ingredient.code,
                    ingredient.name,
                    ingredient.category,
                    if allergens.is_empty() {
                        "none".to_string()
                    } else {
                        allergens.join(", ")
                    }
                )?;
            }
        }
        Commands::Categories => {
            for (category, members) in catalog.categories() {
                let codes: Vec<&str> = members.iter().map(|i| i.code.as_str()).collect();
                let label = if category.is_empty() { "(none)" } else { category };
                writeln!(out, "{}: {}", label, codes.join(", "))?;
            }
        }
        Commands::Check { codes } => {
            let result = aggregate(&codes, &catalog)?;
            if result.is_allergen_free() {
                writeln!(out, "No allergens.")?;
            }
            for allergen in &result.allergens {
                let sources: Vec<&str> = result
                    .sources(allergen.code.as_str())
                    .into_iter()
                    .map(|c| c.as_str())
                    .collect();
                writeln!(
                    out,
                    "Contains {} (from: {})",
                    allergen.name,
                    sources.join(", ")
                )?;
            }
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    let mut stdout = std::io::stdout();
    if let Err(e) = run(cli, &mut stdout) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn run_args(args: &[&str]) -> Result<String, String> {
        let data_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data");
        let mut argv = vec!["dishcheck", "--catalog-dir", data_dir.to_str().unwrap()];
        argv.extend_from_slice(args);

        let cli = Cli::try_parse_from(argv).map_err(|e| e.to_string())?;
        let mut out = Vec::new();
        run(cli, &mut out).map_err(|e| e.to_string())?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_reports_counts() {
        let out = run_args(&["validate"]).unwrap();
        assert!(out.starts_with("Catalog OK: 14 allergens"));
    }

    #[test]
    fn test_check_lists_sources() {
        let out = run_args(&["check", "bread", "pasta", "butter", "tomato"]).unwrap();
        assert!(out.contains("Contains Cereals containing gluten (from: bread, pasta)"));
        assert!(out.contains("Contains Milk (from: butter)"));
    }

    #[test]
    fn test_check_allergen_free_dish() {
        let out = run_args(&["check", "tomato", "olive_oil"]).unwrap();
        assert_eq!(out.trim(), "No allergens.");
    }

    #[test]
    fn test_check_unknown_ingredient_fails() {
        let err = run_args(&["check", "bread", "unknown_code"]).expect_err("should fail");
        assert!(err.contains("unknown_code"));
    }

    #[test]
    fn test_ingredients_filters() {
        let out = run_args(&["ingredients", "--category", "Dairy", "--common"]).unwrap();
        let codes: Vec<&str> = out.lines().map(|l| l.split(':').next().unwrap()).collect();
        assert_eq!(codes, vec!["milk", "butter", "parmesan"]);
    }

    #[test]
    fn test_ingredients_by_allergen() {
        let out = run_args(&["ingredients", "--allergen", "milk", "--common"]).unwrap();
        let codes: Vec<&str> = out.lines().map(|l| l.split(':').next().unwrap()).collect();
        assert_eq!(codes, vec!["milk", "butter", "parmesan"]);

        let out = run_args(&["ingredients", "--allergen", "no_such_allergen"]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_categories_lists_groups_in_file_order() {
        let out = run_args(&["categories"]).unwrap();
        let first = out.lines().next().unwrap();
        assert_eq!(
            first,
            "Cereals: wheat_flour, bread, pasta, egg_pasta, rice, lupin_flour"
        );
        assert_eq!(out.lines().filter(|l| l.starts_with("Cereals:")).count(), 1);
        assert!(out.contains("Dairy: milk, butter, parmesan, cream"));
    }

    #[test]
    fn test_check_requires_codes() {
        assert!(run_args(&["check"]).is_err());
    }
}
